//! Stopping rules for the iterative solvers.

use std::time::{Duration, Instant};

/// Tolerances and iteration caps shared by every strategy.
#[derive(Debug, Clone)]
pub struct ToleranceConfig {
    /// Convergence tolerance.
    ///
    /// Used for the eigenvalue change between power-iteration steps, the
    /// subdiagonal magnitude in QR iteration, and the "already zero" test
    /// for Householder columns.
    pub tolerance: f64,
    /// Iteration cap for stand-alone power iteration and QR iteration.
    pub max_iterations: usize,
    /// Power-iteration cap for each step of the order-4 deflation chain.
    pub order4_cap: usize,
    /// Power-iteration cap for each step of the deflation loop on order ≥ 5.
    pub large_cap: usize,
    /// Wall-clock budget for a single call. `None` means only the iteration
    /// caps bound the work.
    ///
    /// When the budget runs out, iterative loops stop and return their
    /// current estimate.
    pub time_limit: Option<Duration>,
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 1000,
            order4_cap: 200,
            large_cap: 100,
            time_limit: None,
        }
    }
}

impl ToleranceConfig {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stopping rule for one call, with `cap` iterations and the deadline
    /// (if any) starting now.
    pub fn criteria(&self, cap: usize) -> Criteria {
        Criteria {
            tolerance: self.tolerance,
            max_iterations: cap,
            deadline: self.time_limit.map(|limit| Instant::now() + limit),
        }
    }
}

/// Per-call stopping rule: tolerance, iteration cap, optional deadline.
#[derive(Debug, Clone, Copy)]
pub struct Criteria {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub deadline: Option<Instant>,
}

impl Default for Criteria {
    fn default() -> Self {
        let config = ToleranceConfig::default();
        config.criteria(config.max_iterations)
    }
}

impl Criteria {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            deadline: None,
        }
    }

    /// Same rule with a different iteration cap; the deadline is shared.
    pub fn with_cap(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    pub fn with_deadline(self, deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..self
        }
    }

    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
