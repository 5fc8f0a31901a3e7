//! services/api/src/adapters/latency.rs
//!
//! Simulated backend latency. Every mock store and service waits here before
//! answering so the presentation layer sees realistic, unordered completions.

use std::sync::Mutex;
use std::time::Duration;

/// The kinds of backend work that take a simulated amount of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
    Export,
    Search,
    SemanticSearch,
    Index,
    Summarize,
    Ocr,
}

impl Operation {
    /// Unscaled delay in milliseconds.
    pub fn base_millis(self) -> u64 {
        match self {
            Operation::List => 300,
            Operation::Get => 200,
            Operation::Create => 400,
            Operation::Update => 250,
            Operation::Delete => 300,
            Operation::Export => 500,
            Operation::Search => 800,
            Operation::SemanticSearch => 1200,
            Operation::Index => 1000,
            Operation::Summarize => 2000,
            Operation::Ocr => 2000,
        }
    }
}

/// Largest accepted `scale`. At this bound the slowest operation waits a few minutes.
pub const MAX_LATENCY_SCALE: f64 = 100.0;

pub struct SimulatedLatency {
    scale: f64,
    rng: Mutex<fastrand::Rng>,
}

impl SimulatedLatency {
    /// `scale` multiplies every base delay; 0 disables waiting altogether.
    /// Values above `MAX_LATENCY_SCALE` are capped.
    pub fn new(scale: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            scale: if scale.is_finite() {
                scale.clamp(0.0, MAX_LATENCY_SCALE)
            } else {
                0.0
            },
            rng: Mutex::new(rng),
        }
    }

    pub fn none() -> Self {
        Self::new(0.0, Some(0))
    }

    /// Scaled base delay plus up to 20% jitter.
    pub fn delay_for(&self, op: Operation) -> Duration {
        if self.scale == 0.0 {
            return Duration::ZERO;
        }
        let base = (op.base_millis() as f64 * self.scale) as u64;
        let jitter = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            rng.u64(0..=base / 5)
        };
        Duration::from_millis(base.saturating_add(jitter))
    }

    pub async fn wait(&self, op: Operation) {
        let delay = self.delay_for(op);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
