//! Strategy selection by matrix order.
//!
//! | Order | Default strategy |
//! |-------|------------------|
//! | 0     | empty result |
//! | 1–3   | closed form |
//! | 4     | power iteration + deflation, 4 steps, cap 200 per step |
//! | ≥ 5   | power iteration + deflation, n steps, cap 100 per step |
//!
//! The table is data ([`StrategyTable`]), so callers can reroute a range of
//! orders, e.g. to [`Strategy::QrIteration`], without touching the dispatch
//! code.
//!
//! ## Asymmetric input
//!
//! Laplacians of directed graphs are usually not symmetric. They are still
//! accepted: the closed forms are exact for any real matrix (modulo the
//! complex-pair collapse), but power iteration, deflation and unshifted QR
//! assume symmetry and give best-effort numbers only. A `warn` event is
//! emitted when such a matrix reaches an iterative strategy.

use crate::closed_form;
use crate::config::{Criteria, ToleranceConfig};
use crate::deflation::deflate;
use crate::ops::{self, sort_descending};
use crate::power::{power_iteration, EigenPair};
use crate::qr::{qr_algorithm, QrOutcome};
use crate::Result;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Absolute accuracy of [`Strategy::Deflation`] on undirected Laplacians of
/// up to eight nodes with the default caps.
///
/// Power iteration stops on a cap, so two close eigenvalues leave the
/// extracted vector slightly mixed. Deflating a mixed vector leaves a
/// spurious eigenvalue of size about `(c·s·(λ₁ - λ₂))² / λ₁` where the exact
/// zeros belong, which stays well under this bound. The smallest nonzero
/// Laplacian eigenvalue on eight nodes is `2 - 2cos(π/8) ≈ 0.152`, so
/// [`Spectrum::zero_count`](crate::Spectrum::zero_count) with this `eps`
/// still counts connected components. Use [`Strategy::QrIteration`] when
/// near-machine accuracy is needed.
pub const DEFLATION_EPS: f64 = 1e-2;

/// How one order range is solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// No eigenvalues (order 0).
    Empty,
    /// Quadratic / Cardano formulas. Only valid up to order 3.
    ClosedForm,
    /// `n` rounds of power iteration, each capped at `cap` steps, with
    /// deflation between rounds. Eigenvalues are accurate to
    /// [`DEFLATION_EPS`], not to `ToleranceConfig::tolerance`.
    Deflation { cap: usize },
    /// Unshifted QR iteration, capped at `ToleranceConfig::max_iterations`.
    QrIteration,
    /// `faer` dense symmetric eigensolver.
    #[cfg(feature = "faer")]
    Dense,
}

/// Ordered `(orders, strategy)` routes; the first matching route wins.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    routes: Vec<(RangeInclusive<usize>, Strategy)>,
}

impl StrategyTable {
    /// The default routing, with deflation caps taken from `config`.
    pub fn from_config(config: &ToleranceConfig) -> Self {
        Self {
            routes: vec![
                (0..=0, Strategy::Empty),
                (1..=closed_form::MAX_ORDER, Strategy::ClosedForm),
                (4..=4, Strategy::Deflation { cap: config.order4_cap }),
                (5..=usize::MAX, Strategy::Deflation { cap: config.large_cap }),
            ],
        }
    }

    /// Route `orders` to `strategy`, taking precedence over existing routes.
    pub fn route(&mut self, orders: RangeInclusive<usize>, strategy: Strategy) {
        self.routes.insert(0, (orders, strategy));
    }

    pub fn lookup(&self, order: usize) -> Strategy {
        self.routes
            .iter()
            .find(|(orders, _)| orders.contains(&order))
            .map_or(Strategy::QrIteration, |&(_, s)| s)
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::from_config(&ToleranceConfig::default())
    }
}

/// Computes Laplacian spectra. Owns its configuration, routing table and
/// random source; nothing is shared between instances.
#[derive(Debug, Clone)]
pub struct EigenvalueCalculator<R = StdRng> {
    config: ToleranceConfig,
    table: StrategyTable,
    rng: R,
}

impl EigenvalueCalculator<StdRng> {
    /// Calculator whose power-iteration start vectors come from OS entropy.
    pub fn new(config: ToleranceConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Calculator with a fixed seed: identical inputs give identical output.
    pub fn seeded(config: ToleranceConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl Default for EigenvalueCalculator<StdRng> {
    fn default() -> Self {
        Self::new(ToleranceConfig::default())
    }
}

impl<R: Rng> EigenvalueCalculator<R> {
    pub fn with_rng(config: ToleranceConfig, rng: R) -> Self {
        let table = StrategyTable::from_config(&config);
        Self { config, table, rng }
    }

    pub fn config(&self) -> &ToleranceConfig {
        &self.config
    }

    pub fn table(&self) -> &StrategyTable {
        &self.table
    }

    /// Builder form of [`StrategyTable::route`].
    pub fn route(mut self, orders: RangeInclusive<usize>, strategy: Strategy) -> Self {
        self.table.route(orders, strategy);
        self
    }

    /// Eigenvalues of a square matrix, largest first.
    pub fn eigenvalues(&mut self, a: &Array2<f64>) -> Result<Vec<f64>> {
        let n = ops::validate(a)?;
        let strategy = self.table.lookup(n);
        self.eigenvalues_with(a, strategy)
    }

    /// Same as [`Self::eigenvalues`] for row-vector input; ragged or
    /// non-square rows are rejected.
    pub fn eigenvalues_from_rows(&mut self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        let a = ops::from_rows(rows)?;
        self.eigenvalues(&a)
    }

    /// Eigenvalues using `strategy` regardless of the routing table.
    pub fn eigenvalues_with(&mut self, a: &Array2<f64>, strategy: Strategy) -> Result<Vec<f64>> {
        let n = ops::validate(a)?;
        tracing::debug!(n, ?strategy, "computing eigenvalues");

        let mut values = match strategy {
            Strategy::Empty => Vec::new(),
            Strategy::ClosedForm => closed_form::eigenvalues(a)?,
            Strategy::Deflation { cap } => {
                self.warn_if_asymmetric(a);
                self.deflation_chain(a, cap)
                    .into_iter()
                    .map(|pair| pair.value)
                    .collect()
            }
            Strategy::QrIteration => {
                self.warn_if_asymmetric(a);
                qr_algorithm(a, &self.criteria(self.config.max_iterations)).eigenvalues
            }
            #[cfg(feature = "faer")]
            Strategy::Dense => crate::dense::symmetric_eigenvalues(a)?,
        };

        sort_descending(&mut values);
        Ok(values)
    }

    /// Eigenpairs from the power-iteration + deflation chain, in the order
    /// they were extracted (largest magnitude first). Uses the per-step cap
    /// the table assigns to this order, or `max_iterations` when the order
    /// is routed elsewhere.
    pub fn eigenpairs(&mut self, a: &Array2<f64>) -> Result<Vec<EigenPair>> {
        let n = ops::validate(a)?;
        let cap = match self.table.lookup(n) {
            Strategy::Deflation { cap } => cap,
            _ => self.config.max_iterations,
        };
        self.warn_if_asymmetric(a);
        Ok(self.deflation_chain(a, cap))
    }

    /// Full QR iteration outcome, including the final `Q` and `R`.
    pub fn qr(&self, a: &Array2<f64>) -> Result<QrOutcome> {
        ops::validate(a)?;
        self.warn_if_asymmetric(a);
        Ok(qr_algorithm(a, &self.criteria(self.config.max_iterations)))
    }

    fn deflation_chain(&mut self, a: &Array2<f64>, cap: usize) -> Vec<EigenPair> {
        let n = a.nrows();
        let criteria = self.criteria(cap);
        let mut current = a.to_owned();
        let mut pairs = Vec::with_capacity(n);

        for step in 0..n {
            let pair = power_iteration(&current, &criteria, &mut self.rng);
            tracing::trace!(step, value = pair.value, "extracted eigenvalue");
            if step + 1 < n {
                current = deflate(&current, &pair);
            }
            pairs.push(pair);
        }

        pairs
    }

    fn criteria(&self, cap: usize) -> Criteria {
        self.config.criteria(cap)
    }

    fn warn_if_asymmetric(&self, a: &Array2<f64>) {
        if !ops::is_symmetric(a, self.config.tolerance) {
            tracing::warn!(
                n = a.nrows(),
                "asymmetric matrix given to an iterative solver; results are approximate"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::Error;
    use ndarray::array;
    use proptest::prelude::{any, prop, prop_assert, prop_assert_eq, proptest};
    use std::time::Duration;

    fn calc() -> EigenvalueCalculator {
        EigenvalueCalculator::seeded(ToleranceConfig::default(), 2024)
    }

    fn assert_close(got: &[f64], want: &[f64], tol: f64) {
        assert_eq!(got.len(), want.len(), "got {got:?}, want {want:?}");
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < tol, "got {got:?}, want {want:?}");
        }
    }

    fn cycle(n: usize) -> Graph {
        let mut g = Graph::new(n);
        for i in 0..n {
            g.add_edge(i, (i + 1) % n).unwrap();
        }
        g
    }

    #[test]
    fn test_default_routing() {
        let t = StrategyTable::default();
        assert_eq!(t.lookup(0), Strategy::Empty);
        assert_eq!(t.lookup(1), Strategy::ClosedForm);
        assert_eq!(t.lookup(3), Strategy::ClosedForm);
        assert_eq!(t.lookup(4), Strategy::Deflation { cap: 200 });
        assert_eq!(t.lookup(5), Strategy::Deflation { cap: 100 });
        assert_eq!(t.lookup(500), Strategy::Deflation { cap: 100 });
    }

    #[test]
    fn test_route_overrides_existing_entries() {
        let c = calc().route(5..=usize::MAX, Strategy::QrIteration);
        assert_eq!(c.table().lookup(7), Strategy::QrIteration);
        assert_eq!(c.table().lookup(4), Strategy::Deflation { cap: 200 });
    }

    #[test]
    fn test_empty_matrix() {
        assert!(calc().eigenvalues(&Array2::zeros((0, 0))).unwrap().is_empty());
        assert!(calc().eigenvalues_from_rows(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_isolated_node() {
        assert_eq!(calc().eigenvalues(&array![[0.0]]).unwrap(), vec![0.0]);
    }

    #[test]
    fn test_single_edge() {
        let ev = calc()
            .eigenvalues_from_rows(&[vec![1.0, -1.0], vec![-1.0, 1.0]])
            .unwrap();
        assert_close(&ev, &[2.0, 0.0], 1e-12);
    }

    #[test]
    fn test_two_isolated_nodes() {
        let ev = calc().eigenvalues(&array![[0.0, 0.0], [0.0, 0.0]]).unwrap();
        assert_eq!(ev, vec![0.0, 0.0]);
    }

    #[test]
    fn test_triangle() {
        let ev = calc().eigenvalues(&cycle(3).laplacian()).unwrap();
        assert_close(&ev, &[3.0, 3.0, 0.0], 1e-3);
    }

    #[test]
    fn test_diagonal_two_by_two() {
        let ev = calc().eigenvalues(&array![[2.0, 0.0], [0.0, 3.0]]).unwrap();
        assert_close(&ev, &[3.0, 2.0], 1e-12);
    }

    #[test]
    fn test_complete_graph_of_four() {
        let mut g = Graph::new(4);
        for i in 0..4 {
            for j in (i + 1)..4 {
                g.add_edge(i, j).unwrap();
            }
        }
        let ev = calc().eigenvalues(&g.laplacian()).unwrap();
        assert_close(&ev, &[4.0, 4.0, 4.0, 0.0], 1e-3);
    }

    #[test]
    fn test_two_disjoint_edges_have_two_zero_eigenvalues() {
        let mut g = Graph::new(4);
        g.add_edge(0, 1).unwrap();
        g.add_edge(2, 3).unwrap();
        let ev = calc().eigenvalues(&g.laplacian()).unwrap();
        assert_close(&ev, &[2.0, 2.0, 0.0, 0.0], 1e-3);
    }

    #[test]
    fn test_cycle_of_six_through_deflation_loop() {
        // λ_k = 2 - 2cos(2πk/6) = {4, 3, 3, 1, 1, 0}
        let ev = calc().eigenvalues(&cycle(6).laplacian()).unwrap();
        assert_close(&ev, &[4.0, 3.0, 3.0, 1.0, 1.0, 0.0], 1e-3);
    }

    #[test]
    fn test_deflation_agrees_with_qr_on_path() {
        let mut g = Graph::new(6);
        for i in 0..5 {
            g.add_edge(i, i + 1).unwrap();
        }
        let lap = g.laplacian();

        let mut c = calc();
        let by_deflation = c.eigenvalues(&lap).unwrap();
        let by_qr = c.eigenvalues_with(&lap, Strategy::QrIteration).unwrap();
        assert_close(&by_deflation, &by_qr, 1e-3);

        let sum: f64 = by_deflation.iter().sum();
        assert!((sum - ops::trace(&lap)).abs() < 1e-3);
    }

    #[test]
    fn test_seeded_calculators_agree_exactly() {
        let lap = cycle(7).laplacian();
        let a = EigenvalueCalculator::seeded(ToleranceConfig::default(), 9)
            .eigenvalues(&lap)
            .unwrap();
        let b = EigenvalueCalculator::seeded(ToleranceConfig::default(), 9)
            .eigenvalues(&lap)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_eigenpairs_are_unit_vectors() {
        let lap = cycle(5).laplacian();
        let pairs = calc().eigenpairs(&lap).unwrap();
        assert_eq!(pairs.len(), 5);
        for p in &pairs {
            assert!((ops::norm(p.vector.view()) - 1.0).abs() < 1e-9);
        }
        // First pair is a genuine eigenpair of the Laplacian.
        let first = &pairs[0];
        let residual = ops::mat_vec(&lap, &first.vector) - &first.vector * first.value;
        assert!(ops::norm(residual.view()) < 1e-3);
    }

    #[test]
    fn test_qr_exposes_factors() {
        let lap = cycle(4).laplacian();
        let out = calc().qr(&lap).unwrap();
        assert_eq!(out.q.dim(), (4, 4));
        assert_eq!(out.r.dim(), (4, 4));
        assert_close(&out.eigenvalues, &[4.0, 2.0, 2.0, 0.0], 1e-6);
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let err = calc()
            .eigenvalues_from_rows(&[vec![1.0, 2.0], vec![3.0]])
            .unwrap_err();
        assert!(err.is_invalid_matrix());

        let err = calc().eigenvalues(&Array2::zeros((2, 3))).unwrap_err();
        assert!(matches!(err, Error::NotSquare(2, 3)));

        let err = calc().eigenvalues(&array![[f64::INFINITY]]).unwrap_err();
        assert!(err.is_invalid_matrix());
    }

    #[test]
    fn test_closed_form_forced_on_large_order_fails() {
        let err = calc()
            .eigenvalues_with(&Array2::eye(5), Strategy::ClosedForm)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOrder { order: 5, .. }));
    }

    #[test]
    fn test_zero_time_limit_still_returns_every_eigenvalue() {
        let cfg = ToleranceConfig::default().with_time_limit(Duration::ZERO);
        let mut c = EigenvalueCalculator::seeded(cfg, 1);
        let ev = c.eigenvalues(&cycle(8).laplacian()).unwrap();
        assert_eq!(ev.len(), 8);
        assert!(ev.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_directed_two_node_graph() {
        let mut g = Graph::directed(2);
        g.add_edge(0, 1).unwrap();
        // L = [[1, -1], [0, 0]]
        let ev = calc().eigenvalues(&g.laplacian()).unwrap();
        assert_close(&ev, &[1.0, 0.0], 1e-12);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let lap = cycle(5).laplacian();
        let before = lap.clone();
        let _ = calc().eigenvalues(&lap).unwrap();
        let _ = calc().qr(&lap).unwrap();
        assert_eq!(lap, before);
    }

    #[cfg(feature = "faer")]
    #[test]
    fn test_dense_reference_agrees_with_deflation() {
        let lap = cycle(6).laplacian();
        let mut c = calc();
        let dense = c.eigenvalues_with(&lap, Strategy::Dense).unwrap();
        let ours = c.eigenvalues(&lap).unwrap();
        assert_close(&ours, &dense, 1e-3);
    }

    proptest! {
        /// Output is always sorted and has one entry per row, whatever the
        /// strategy.
        #[test]
        fn prop_sorted_and_complete(
            n in 0usize..8,
            entries in prop::collection::vec(-3.0f64..3.0, 64),
            seed in any::<u64>(),
        ) {
            let a = Array2::from_shape_fn((n, n), |(i, j)| {
                let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
                entries[lo * 8 + hi]
            });
            let mut c = EigenvalueCalculator::seeded(ToleranceConfig::default(), seed);
            for strategy in [None, Some(Strategy::QrIteration)] {
                let ev = match strategy {
                    None => c.eigenvalues(&a).unwrap(),
                    Some(s) => c.eigenvalues_with(&a, s).unwrap(),
                };
                prop_assert_eq!(ev.len(), n);
                prop_assert!(ev.windows(2).all(|w| w[0] >= w[1]), "{:?}", ev);
            }
        }
    }
}
