use super::cancellation::CancellationToken;
use super::semantics::Optimization;
use super::semantics_evaluator::{BaseSemantics, SemanticsEvaluator, Verdict};
use crate::algebra::{BudgetDirection, Cost, Monotonicity};
use crate::utils::LabelType;
use crate::waba::attack_resolver::{potential_attacks, AttackResolver, PotentialAttack, Resolution};
use crate::waba::{SupportComputer, SupportMap, UnstableFixpoint, WabaFramework};
use log::{debug, trace, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A candidate accepted by the semantics evaluator.
#[derive(Clone, Debug)]
pub(crate) struct Candidate {
    pub in_assumptions: Vec<bool>,
    pub supported: SupportMap,
    pub resolution: Resolution,
}

impl Candidate {
    /// Returns the in assumptions and the assumptions defeated by a successful attack.
    pub(crate) fn range(&self) -> Vec<bool> {
        self.in_assumptions
            .iter()
            .zip(self.resolution.defeated.iter())
            .map(|(i, d)| *i || *d)
            .collect()
    }

    /// Returns the in assumptions and the assumptions targeted by an attack, even a discarded one.
    pub(crate) fn attacked_range(&self) -> Vec<bool> {
        let mut range = self.range();
        for att in self.resolution.discarded.iter() {
            range[att.attacked] = true;
        }
        range
    }
}

/// The parameters of a search.
#[derive(Clone, Debug)]
pub(crate) struct SearchParameters {
    pub semantics: BaseSemantics,
    pub optimization: Optimization,
    pub max_results: Option<usize>,
    pub early_stop: bool,
    pub branch_and_bound: bool,
    pub n_threads: usize,
}

/// The result of a search: the accepted candidates, and whether the search was cancelled.
#[derive(Debug, Default)]
pub(crate) struct SearchOutcome {
    pub candidates: Vec<Candidate>,
    pub cancelled: bool,
}

#[derive(Debug, Default)]
struct SearchStats {
    n_nodes: AtomicUsize,
    n_pruned: AtomicUsize,
    n_rejected: AtomicUsize,
    n_accepted: AtomicUsize,
}

/// Enumerates the candidates accepted under a base semantics by a backtracking search.
///
/// The outer search assigns the assumptions in their declaration order, trying `in` before `out`.
/// A branch is pruned as soon as an in assumption gets an attack that can never be discarded.
/// For each complete assignment, an inner search chooses the attacks to discard:
/// attacks against in assumptions are always discarded, while attacks against out assumptions may be discarded or not.
/// The inner search prunes the choices whose partial cost already violates the budget,
/// or (when branch-and-bound is enabled) is already worse than the best cost found so far.
///
/// The outer search may be split among several threads on the first assumptions.
pub(crate) struct ExtensionEnumerator<'a, T>
where
    T: LabelType,
{
    framework: &'a WabaFramework<T>,
    support_computer: &'a SupportComputer<'a, T>,
    resolver: &'a AttackResolver<'a>,
    evaluator: SemanticsEvaluator<'a, T>,
    token: &'a CancellationToken,
    params: SearchParameters,
    monotonicity: Option<Monotonicity>,
    stop: AtomicBool,
    cancelled: AtomicBool,
    best_cost: Mutex<Option<Cost>>,
    stats: SearchStats,
}

struct SearchState {
    in_assumptions: Vec<bool>,
    candidates: Vec<Candidate>,
}

impl<'a, T> ExtensionEnumerator<'a, T>
where
    T: LabelType,
{
    pub(crate) fn new(
        framework: &'a WabaFramework<T>,
        support_computer: &'a SupportComputer<'a, T>,
        resolver: &'a AttackResolver<'a>,
        token: &'a CancellationToken,
        params: SearchParameters,
    ) -> Self {
        let weights = framework.explicit_weights().collect::<Vec<_>>();
        let monotonicity = resolver.monoid().monotonicity(&weights);
        ExtensionEnumerator {
            framework,
            support_computer,
            resolver,
            evaluator: SemanticsEvaluator::new(framework, support_computer, resolver),
            token,
            params,
            monotonicity,
            stop: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
            best_cost: Mutex::new(None),
            stats: SearchStats::default(),
        }
    }

    /// Runs the search.
    pub(crate) fn enumerate(&self) -> Result<SearchOutcome, UnstableFixpoint> {
        let n_assumptions = self.framework.n_assumptions();
        let depth = prefix_depth(self.params.n_threads, n_assumptions);
        let prefixes = (0..1usize << depth)
            .map(|mask| {
                (0..depth)
                    .map(|i| mask & (1 << (depth - 1 - i)) == 0)
                    .collect::<Vec<bool>>()
            })
            .collect::<Vec<Vec<bool>>>();
        debug!(
            "searching {} assumptions with {} prefixes of depth {}",
            n_assumptions,
            prefixes.len(),
            depth
        );
        let results = if self.params.n_threads > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(self.params.n_threads)
                .build()
            {
                Ok(pool) => pool.install(|| {
                    prefixes
                        .par_iter()
                        .map(|p| self.explore_prefix(p))
                        .collect::<Vec<_>>()
                }),
                Err(e) => {
                    warn!("cannot build a thread pool ({}); searching sequentially", e);
                    prefixes.iter().map(|p| self.explore_prefix(p)).collect()
                }
            }
        } else {
            prefixes.iter().map(|p| self.explore_prefix(p)).collect()
        };
        let mut candidates = Vec::new();
        for r in results {
            candidates.append(&mut r?);
        }
        debug!(
            "explored {} nodes ({} pruned); {} candidates accepted, {} rejected",
            self.stats.n_nodes.load(Ordering::Relaxed),
            self.stats.n_pruned.load(Ordering::Relaxed),
            self.stats.n_accepted.load(Ordering::Relaxed),
            self.stats.n_rejected.load(Ordering::Relaxed),
        );
        Ok(SearchOutcome {
            candidates,
            cancelled: self.cancelled.load(Ordering::Relaxed),
        })
    }

    fn explore_prefix(&self, prefix: &[bool]) -> Result<Vec<Candidate>, UnstableFixpoint> {
        let mut state = SearchState {
            in_assumptions: vec![false; self.framework.language().len()],
            candidates: Vec::new(),
        };
        let assumptions = self.framework.assumption_ids();
        for (i, value) in prefix.iter().enumerate() {
            state.in_assumptions[assumptions[i]] = *value;
        }
        if prefix.iter().any(|v| *v) && self.is_hopeless(&state.in_assumptions)? {
            self.stats.n_pruned.fetch_add(1, Ordering::Relaxed);
            return Ok(state.candidates);
        }
        self.backtrack(prefix.len(), &mut state)?;
        Ok(state.candidates)
    }

    fn backtrack(&self, depth: usize, state: &mut SearchState) -> Result<(), UnstableFixpoint> {
        if !self.enter_node() {
            return Ok(());
        }
        let assumptions = self.framework.assumption_ids();
        if depth == assumptions.len() {
            return self.explore_discards(state);
        }
        let a = assumptions[depth];
        state.in_assumptions[a] = true;
        if self.is_hopeless(&state.in_assumptions)? {
            self.stats.n_pruned.fetch_add(1, Ordering::Relaxed);
        } else {
            self.backtrack(depth + 1, state)?;
        }
        state.in_assumptions[a] = false;
        self.backtrack(depth + 1, state)
    }

    /// Checks whether an in assumption gets an attack that adding assumptions cannot make discardable.
    fn is_hopeless(&self, in_assumptions: &[bool]) -> Result<bool, UnstableFixpoint> {
        let supported = self.support_computer.compute_by_ids(in_assumptions)?;
        Ok(potential_attacks(self.framework, &supported)
            .iter()
            .any(|att| {
                in_assumptions[att.attacked] && self.resolver.is_definitely_undiscardable(att)
            }))
    }

    fn explore_discards(&self, state: &mut SearchState) -> Result<(), UnstableFixpoint> {
        let supported = self
            .support_computer
            .compute_by_ids(&state.in_assumptions)?;
        let attacks = potential_attacks(self.framework, &supported);
        let mut discarded = vec![false; attacks.len()];
        let mut cost = self.resolver.monoid().identity();
        let mut choices = Vec::new();
        for (i, att) in attacks.iter().enumerate() {
            if state.in_assumptions[att.attacked] {
                if !self.resolver.is_discardable(att) {
                    self.stats.n_pruned.fetch_add(1, Ordering::Relaxed);
                    return Ok(());
                }
                discarded[i] = true;
                cost = self.resolver.monoid().combine(&cost, att.weight);
            } else if self.resolver.is_discardable(att) {
                choices.push(i);
            }
        }
        let mut inner = InnerSearch {
            supported: &supported,
            attacks: &attacks,
            choices: &choices,
            discarded,
        };
        self.discard_backtrack(0, cost, &mut inner, state)
    }

    fn discard_backtrack(
        &self,
        index: usize,
        cost: Cost,
        inner: &mut InnerSearch,
        state: &mut SearchState,
    ) -> Result<(), UnstableFixpoint> {
        if !self.enter_node() {
            return Ok(());
        }
        if self.is_cost_hopeless(&cost) {
            self.stats.n_pruned.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
        if index == inner.choices.len() {
            return self.evaluate_leaf(inner, state);
        }
        let attack_index = inner.choices[index];
        let new_cost = self
            .resolver
            .monoid()
            .combine(&cost, inner.attacks[attack_index].weight);
        self.discard_backtrack(index + 1, cost, inner, state)?;
        inner.discarded[attack_index] = true;
        let result = self.discard_backtrack(index + 1, new_cost, inner, state);
        inner.discarded[attack_index] = false;
        result
    }

    fn evaluate_leaf(
        &self,
        inner: &InnerSearch,
        state: &mut SearchState,
    ) -> Result<(), UnstableFixpoint> {
        let mut resolution = match self.resolver.resolve(
            self.framework.language().len(),
            inner.attacks,
            &inner.discarded,
        ) {
            Ok(r) => r,
            Err(e) => {
                trace!("rejected a discard choice: {}", e);
                self.stats.n_rejected.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
        };
        match self.evaluator.evaluate(
            self.params.semantics,
            &state.in_assumptions,
            &mut resolution,
        )? {
            Verdict::Rejected(r) => {
                trace!("rejected a candidate: {:?}", r);
                self.stats.n_rejected.fetch_add(1, Ordering::Relaxed);
            }
            Verdict::Accepted => {
                if self.params.branch_and_bound && !self.update_best_cost(&resolution.cost) {
                    self.stats.n_pruned.fetch_add(1, Ordering::Relaxed);
                    return Ok(());
                }
                state.candidates.push(Candidate {
                    in_assumptions: state.in_assumptions.clone(),
                    supported: inner.supported.clone(),
                    resolution,
                });
                let n_accepted = 1 + self.stats.n_accepted.fetch_add(1, Ordering::Relaxed);
                if self.params.early_stop
                    && self
                        .params
                        .max_results
                        .map(|m| n_accepted >= m)
                        .unwrap_or(false)
                {
                    self.stop.store(true, Ordering::Relaxed);
                }
            }
        }
        Ok(())
    }

    /// Counts a new node and polls the cancellation token; returns `false` if the search must stop.
    fn enter_node(&self) -> bool {
        if self.stop.load(Ordering::Relaxed) {
            return false;
        }
        let n_nodes = 1 + self.stats.n_nodes.fetch_add(1, Ordering::Relaxed);
        if self.token.is_reached(n_nodes) {
            self.cancelled.store(true, Ordering::Relaxed);
            self.stop.store(true, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Checks whether discarding more attacks cannot lead to an acceptable cost.
    ///
    /// Costs are only bounded this way for the semantics that do not charge threats at the leaves,
    /// since a threat may change the weight of an attack that is already discarded.
    fn is_cost_hopeless(&self, cost: &Cost) -> bool {
        if matches!(
            self.params.semantics,
            BaseSemantics::Admissible | BaseSemantics::Complete
        ) {
            return false;
        }
        let budget = self.resolver.budget();
        let out_of_budget = match (self.resolver.direction(), self.monotonicity) {
            (BudgetDirection::UpperBound, Some(Monotonicity::Increasing)) => {
                cost.primary() > budget
            }
            (BudgetDirection::LowerBound, Some(Monotonicity::Decreasing)) => {
                cost.primary() < budget
            }
            _ => false,
        };
        if out_of_budget || !self.params.branch_and_bound {
            return out_of_budget;
        }
        match (self.current_best_cost(), self.params.optimization, self.monotonicity) {
            (Some(best), Optimization::Minimize, Some(Monotonicity::Increasing)) => *cost > best,
            (Some(best), Optimization::Maximize, Some(Monotonicity::Decreasing)) => *cost < best,
            _ => false,
        }
    }

    fn current_best_cost(&self) -> Option<Cost> {
        match self.best_cost.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Updates the best cost with the cost of an accepted candidate; returns `false` if the candidate is worse than the best one.
    fn update_best_cost(&self, cost: &Cost) -> bool {
        let mut guard = match self.best_cost.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let is_better = |best: &Cost| match self.params.optimization {
            Optimization::Minimize => cost < best,
            Optimization::Maximize => cost > best,
            Optimization::None => false,
        };
        match guard.as_ref() {
            Some(best) if best == cost => true,
            Some(best) if !is_better(best) => false,
            _ => {
                *guard = Some(cost.clone());
                true
            }
        }
    }
}

struct InnerSearch<'b> {
    supported: &'b SupportMap,
    attacks: &'b [PotentialAttack],
    choices: &'b [usize],
    discarded: Vec<bool>,
}

/// The maximal number of assumptions fixed by the prefixes shared between threads.
const MAX_PREFIX_DEPTH: usize = 16;

/// Returns the number of assumptions on which the search is split between threads.
fn prefix_depth(n_threads: usize, n_assumptions: usize) -> usize {
    if n_threads <= 1 {
        return 0;
    }
    let n_prefixes = n_threads.saturating_mul(4);
    let max_depth = n_assumptions.min(MAX_PREFIX_DEPTH);
    let mut depth = 0;
    while depth < max_depth && (1usize << depth) < n_prefixes {
        depth += 1;
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{GodelSemiring, MaxMonoid, Monoid, Semiring, SumMonoid, Weight};
    use crate::waba::Language;

    fn scenario_two() -> WabaFramework<&'static str> {
        let l = Language::new_with_labels(&["a", "b", "c_a"]);
        let mut framework = WabaFramework::new_with_language(l);
        framework.new_assumption(&"a").unwrap();
        framework.new_assumption(&"b").unwrap();
        framework.set_contrary(&"a", &"c_a").unwrap();
        framework.new_rule(&"c_a", &[&"b"]).unwrap();
        framework.set_weight(&"b", Weight::Finite(80.)).unwrap();
        framework
    }

    fn params(semantics: BaseSemantics, n_threads: usize) -> SearchParameters {
        SearchParameters {
            semantics,
            optimization: Optimization::None,
            max_results: None,
            early_stop: false,
            branch_and_bound: false,
            n_threads,
        }
    }

    fn in_sets(
        framework: &WabaFramework<&'static str>,
        semiring: &dyn Semiring,
        monoid: &dyn Monoid,
        budget: Weight,
        params: SearchParameters,
    ) -> Vec<Vec<&'static str>> {
        let support_computer = SupportComputer::new(framework, semiring);
        let resolver = AttackResolver::new(semiring, monoid, budget, BudgetDirection::UpperBound);
        let token = CancellationToken::default();
        let enumerator =
            ExtensionEnumerator::new(framework, &support_computer, &resolver, &token, params);
        let outcome = enumerator.enumerate().unwrap();
        assert!(!outcome.cancelled);
        let mut sets = outcome
            .candidates
            .iter()
            .map(|c| {
                c.in_assumptions
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| **b)
                    .map(|(i, _)| *framework.language().get_atom_by_id(i).label())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        sets.sort();
        sets
    }

    #[test]
    fn test_stable_without_budget() {
        let f = scenario_two();
        assert_eq!(
            vec![vec!["b"]],
            in_sets(
                &f,
                &GodelSemiring,
                &MaxMonoid,
                Weight::zero(),
                params(BaseSemantics::Stable, 1)
            )
        );
    }

    #[test]
    fn test_stable_with_budget() {
        let f = scenario_two();
        for n_threads in [1, 4] {
            assert_eq!(
                vec![vec!["a", "b"], vec!["b"]],
                in_sets(
                    &f,
                    &GodelSemiring,
                    &MaxMonoid,
                    Weight::Finite(80.),
                    params(BaseSemantics::Stable, n_threads)
                )
            );
        }
    }

    #[test]
    fn test_conflict_free_discard_choices() {
        let f = scenario_two();
        let sets = in_sets(
            &f,
            &GodelSemiring,
            &SumMonoid,
            Weight::Finite(100.),
            params(BaseSemantics::ConflictFree, 1),
        );
        // {b} appears twice: with and without discarding the attack against a
        assert_eq!(
            vec![vec![], vec!["a"], vec!["a", "b"], vec!["b"], vec!["b"]],
            sets
        );
    }

    #[test]
    fn test_early_stop() {
        let f = scenario_two();
        let mut p = params(BaseSemantics::ConflictFree, 1);
        p.max_results = Some(2);
        p.early_stop = true;
        let sets = in_sets(&f, &GodelSemiring, &SumMonoid, Weight::Finite(100.), p);
        assert_eq!(2, sets.len());
    }

    #[test]
    fn test_node_limit_cancels() {
        let f = scenario_two();
        let semiring = GodelSemiring;
        let monoid = MaxMonoid;
        let support_computer = SupportComputer::new(&f, &semiring);
        let resolver =
            AttackResolver::new(&semiring, &monoid, Weight::zero(), BudgetDirection::UpperBound);
        let token = CancellationToken::default().with_node_limit(1);
        let enumerator = ExtensionEnumerator::new(
            &f,
            &support_computer,
            &resolver,
            &token,
            params(BaseSemantics::Stable, 1),
        );
        let outcome = enumerator.enumerate().unwrap();
        assert!(outcome.cancelled);
        assert!(outcome.candidates.is_empty());
    }

    #[test]
    fn test_prefix_depth() {
        assert_eq!(0, prefix_depth(1, 10));
        assert_eq!(3, prefix_depth(2, 10));
        assert_eq!(2, prefix_depth(8, 2));
    }

    #[test]
    fn test_prefix_depth_huge_number_of_threads() {
        assert_eq!(3, prefix_depth(usize::MAX, 3));
        assert_eq!(MAX_PREFIX_DEPTH, prefix_depth(usize::MAX, 1000));
    }
}
