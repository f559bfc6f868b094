use super::cancellation::CancellationToken;
use super::extension_enumerator::{Candidate, ExtensionEnumerator, SearchParameters};
use super::grounded_computer::grounded_assumptions;
use super::maximality_filter::{intersection, is_subset, keep_maximal, keep_minimal};
use super::semantics::{Optimization, Semantics};
use super::semantics_evaluator::{BaseSemantics, SemanticsEvaluator, Verdict};
use crate::algebra::{
    BudgetDirection, Cost, Monoid, MonoidKind, Semiring, SemiringKind, UnknownAlgebra, Weight,
};
use crate::utils::LabelType;
use crate::waba::attack_resolver::{potential_attacks, AttackResolver};
use crate::waba::{Extension, SupportComputer, UnstableFixpoint, WabaFramework};
use log::{debug, info};
use thiserror::Error;

/// The errors that may occur while solving a problem.
///
/// Finding no extension is not an error; see [`SolveOutcome::Unsatisfiable`].
#[derive(Debug, Error)]
pub enum SolveError<T>
where
    T: LabelType,
{
    /// A semiring, monoid, semantics or optimization name is not registered.
    #[error(transparent)]
    UnknownAlgebra(#[from] UnknownAlgebra),
    /// The weights of the supported atoms did not stabilize.
    #[error("the support weights did not stabilize after {passes} passes")]
    UnstableFixpoint {
        /// the number of passes done before giving up
        passes: usize,
    },
    /// The search was cancelled.
    #[error("the search was cancelled ({} extension(s) found so far)", .partial.len())]
    Cancelled {
        /// the extensions found before the cancellation, if the semantics allows to return them
        partial: Vec<Extension<T>>,
    },
}

impl<T> From<UnstableFixpoint> for SolveError<T>
where
    T: LabelType,
{
    fn from(e: UnstableFixpoint) -> Self {
        SolveError::UnstableFixpoint { passes: e.passes }
    }
}

/// The outcome of a search that was not interrupted by an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome<T>
where
    T: LabelType,
{
    /// The extensions found, ordered by cost then by assumptions.
    Extensions(Vec<Extension<T>>),
    /// No candidate satisfies the semantics under the budget.
    Unsatisfiable,
}

impl<T> SolveOutcome<T>
where
    T: LabelType,
{
    /// Returns the extensions, or an empty slice for an unsatisfiable problem.
    pub fn extensions(&self) -> &[Extension<T>] {
        match self {
            SolveOutcome::Extensions(v) => v,
            SolveOutcome::Unsatisfiable => &[],
        }
    }

    /// Returns `true` iff no candidate satisfies the semantics.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, SolveOutcome::Unsatisfiable)
    }
}

/// A solver computing the extensions of a weighted ABA framework.
///
/// The solver is built with a framework, a semiring, a monoid and a semantics.
/// The other parameters are optional:
/// the budget defaults to the identity of the monoid, which gives the extensions of the unweighted framework;
/// the direction of the budget defaults to the natural one of the monoid;
/// no cost optimization is applied, all the extensions are returned, and the search is sequential and never cancelled.
///
/// # Example
///
/// ```
/// # use wabasolver::algebra::{MonoidKind, SemiringKind, Weight};
/// # use wabasolver::solvers::{Semantics, WabaSolver};
/// # use wabasolver::waba::{Language, WabaFramework};
/// let language = Language::new_with_labels(&["a", "b", "c_a"]);
/// let mut framework = WabaFramework::new_with_language(language);
/// framework.new_assumption(&"a").unwrap();
/// framework.new_assumption(&"b").unwrap();
/// framework.set_contrary(&"a", &"c_a").unwrap();
/// framework.new_rule(&"c_a", &[&"b"]).unwrap();
/// framework.set_weight(&"b", Weight::Finite(80.)).unwrap();
/// let outcome = WabaSolver::new(&framework, SemiringKind::Godel, MonoidKind::Max, Semantics::ST)
///     .with_budget(Weight::Finite(80.))
///     .solve()
///     .unwrap();
/// let in_sets = outcome
///     .extensions()
///     .iter()
///     .map(|e| e.assumption_labels())
///     .collect::<Vec<_>>();
/// assert_eq!(vec![vec![&"b"], vec![&"a", &"b"]], in_sets);
/// ```
pub struct WabaSolver<'a, T>
where
    T: LabelType,
{
    framework: &'a WabaFramework<T>,
    semiring: Box<dyn Semiring>,
    monoid: Box<dyn Monoid>,
    semantics: Semantics,
    budget: Option<Weight>,
    direction: Option<BudgetDirection>,
    optimization: Optimization,
    max_results: Option<usize>,
    token: CancellationToken,
    n_threads: usize,
    max_passes: Option<usize>,
}

impl<'a, T> WabaSolver<'a, T>
where
    T: LabelType,
{
    /// Builds a new solver.
    pub fn new(
        framework: &'a WabaFramework<T>,
        semiring: SemiringKind,
        monoid: MonoidKind,
        semantics: Semantics,
    ) -> Self {
        WabaSolver {
            framework,
            semiring: semiring.semiring(),
            monoid: monoid.monoid(),
            semantics,
            budget: None,
            direction: None,
            optimization: Optimization::None,
            max_results: None,
            token: CancellationToken::default(),
            n_threads: 1,
            max_passes: None,
        }
    }

    /// Sets the budget.
    pub fn with_budget(mut self, budget: Weight) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Sets the direction of the budget.
    pub fn with_budget_direction(mut self, direction: BudgetDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Sets the optimization of the costs.
    pub fn with_optimization(mut self, optimization: Optimization) -> Self {
        self.optimization = optimization;
        self
    }

    /// Sets the maximal number of extensions to return.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Sets the cancellation token polled during the search.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Sets the number of threads used by the search.
    pub fn with_n_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads.max(1);
        self
    }

    /// Sets the maximal number of passes of the support computation.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    /// Computes the extensions.
    pub fn solve(&self) -> Result<SolveOutcome<T>, SolveError<T>> {
        if self.max_results == Some(0) {
            return Ok(SolveOutcome::Extensions(vec![]));
        }
        let budget = self
            .budget
            .unwrap_or_else(|| self.monoid.identity().primary());
        let direction = self
            .direction
            .unwrap_or_else(|| self.monoid.default_direction());
        info!(
            "solving {} with semiring {}, monoid {}, budget {} ({})",
            self.semantics.as_ref(),
            self.semiring.name(),
            self.monoid.name(),
            budget,
            direction.as_ref()
        );
        let mut support_computer = SupportComputer::new(self.framework, self.semiring.as_ref());
        if let Some(p) = self.max_passes {
            support_computer.set_max_passes(p);
        }
        let resolver =
            AttackResolver::new(self.semiring.as_ref(), self.monoid.as_ref(), budget, direction);
        let classical_grounded =
            self.semantics == Semantics::GR && !self.has_conditional_weights();
        let (candidates, cancelled) = if classical_grounded {
            if self.token.is_reached(0) {
                (vec![], true)
            } else {
                (self.grounded_candidate(&support_computer, &resolver)?, false)
            }
        } else {
            let outcome = ExtensionEnumerator::new(
                self.framework,
                &support_computer,
                &resolver,
                &self.token,
                self.search_parameters(),
            )
            .enumerate()?;
            (outcome.candidates, outcome.cancelled)
        };
        debug!("{} candidates before filtering", candidates.len());
        if cancelled {
            let partial = if self.semantics.is_maximality_based() {
                vec![]
            } else {
                self.to_extensions(self.post_process(candidates, &resolver))
            };
            info!("search cancelled with {} partial extension(s)", partial.len());
            return Err(SolveError::Cancelled { partial });
        }
        let candidates = self.apply_maximality(candidates);
        let extensions = self.to_extensions(self.post_process(candidates, &resolver));
        info!("found {} extension(s)", extensions.len());
        if extensions.is_empty() {
            Ok(SolveOutcome::Unsatisfiable)
        } else {
            Ok(SolveOutcome::Extensions(extensions))
        }
    }

    /// Returns `true` iff some explicit weight differs from the default weight of the semiring.
    ///
    /// Otherwise, every attack is unconditional and the grounded extension is given by the classical fixpoint.
    fn has_conditional_weights(&self) -> bool {
        let s = self.semiring.as_ref();
        self.framework
            .explicit_weights()
            .any(|w| !s.is_unconditional(s.normalize(w)))
    }

    fn search_parameters(&self) -> SearchParameters {
        let is_local = !self.semantics.is_maximality_based();
        let optimizing = self.optimization != Optimization::None;
        SearchParameters {
            semantics: base_semantics(self.semantics),
            optimization: self.optimization,
            max_results: self.max_results,
            early_stop: is_local && !optimizing && self.max_results.is_some(),
            branch_and_bound: is_local && optimizing,
            n_threads: self.n_threads,
        }
    }

    fn grounded_candidate(
        &self,
        support_computer: &SupportComputer<T>,
        resolver: &AttackResolver,
    ) -> Result<Vec<Candidate>, UnstableFixpoint> {
        let in_assumptions = grounded_assumptions(self.framework, support_computer)?;
        let supported = support_computer.compute_by_ids(&in_assumptions)?;
        let attacks = potential_attacks(self.framework, &supported);
        let mut resolution = match resolver.resolve(
            self.framework.language().len(),
            &attacks,
            &vec![false; attacks.len()],
        ) {
            Ok(r) => r,
            Err(_) => return Ok(vec![]),
        };
        let evaluator = SemanticsEvaluator::new(self.framework, support_computer, resolver);
        match evaluator.evaluate(BaseSemantics::Complete, &in_assumptions, &mut resolution)? {
            Verdict::Accepted => Ok(vec![Candidate {
                in_assumptions,
                supported,
                resolution,
            }]),
            Verdict::Rejected(r) => {
                debug!("the grounded candidate is rejected: {:?}", r);
                Ok(vec![])
            }
        }
    }

    fn apply_maximality(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        match self.semantics {
            Semantics::GR => keep_minimal(candidates, |c| c.in_assumptions.clone()),
            Semantics::PR => keep_maximal(candidates, |c| c.in_assumptions.clone()),
            Semantics::SST => keep_maximal(candidates, Candidate::range),
            Semantics::STG => keep_maximal(candidates, Candidate::attacked_range),
            Semantics::ID => {
                let preferred = keep_maximal(candidates.clone(), |c| c.in_assumptions.clone());
                let ideal_bound = match intersection(preferred.iter().map(|c| &c.in_assumptions))
                {
                    Some(i) => i,
                    None => return vec![],
                };
                let included = candidates
                    .into_iter()
                    .filter(|c| is_subset(&c.in_assumptions, &ideal_bound))
                    .collect();
                keep_maximal(included, |c| c.in_assumptions.clone())
            }
            _ => candidates,
        }
    }

    /// Checks the budget again, applies the cost optimization, sorts, deduplicates and truncates the candidates.
    fn post_process(&self, candidates: Vec<Candidate>, resolver: &AttackResolver) -> Vec<Candidate> {
        let mut candidates = candidates
            .into_iter()
            .filter(|c| resolver.check_budget(&c.resolution.cost).is_ok())
            .collect::<Vec<_>>();
        let best = match self.optimization {
            Optimization::None => None,
            Optimization::Minimize => candidates.iter().map(|c| &c.resolution.cost).min().cloned(),
            Optimization::Maximize => candidates.iter().map(|c| &c.resolution.cost).max().cloned(),
        };
        if let Some(b) = best {
            candidates.retain(|c| c.resolution.cost == b);
        }
        let mut keyed = candidates
            .into_iter()
            .map(|c| (CandidateKey::new(&c), c))
            .collect::<Vec<_>>();
        let descending = self.optimization == Optimization::Maximize;
        keyed.sort_by(|(k1, _), (k2, _)| {
            let cost_order = if descending {
                k2.cost.cmp(&k1.cost)
            } else {
                k1.cost.cmp(&k2.cost)
            };
            cost_order.then_with(|| (&k1.in_ids, &k1.discarded).cmp(&(&k2.in_ids, &k2.discarded)))
        });
        keyed.dedup_by(|(k1, _), (k2, _)| k1 == k2);
        if let Some(m) = self.max_results {
            keyed.truncate(m);
        }
        keyed.into_iter().map(|(_, c)| c).collect()
    }

    fn to_extensions(&self, candidates: Vec<Candidate>) -> Vec<Extension<T>> {
        candidates
            .iter()
            .map(|c| {
                c.resolution
                    .to_extension(self.framework, &c.in_assumptions, &c.supported)
            })
            .collect()
    }
}

#[derive(PartialEq, Eq)]
struct CandidateKey {
    cost: Cost,
    in_ids: Vec<usize>,
    discarded: Vec<(usize, usize, Weight)>,
}

impl CandidateKey {
    fn new(candidate: &Candidate) -> Self {
        let mut discarded = candidate
            .resolution
            .discarded
            .iter()
            .map(|att| (att.attacked, att.attacker, att.weight))
            .collect::<Vec<_>>();
        discarded.sort_unstable();
        CandidateKey {
            cost: candidate.resolution.cost.clone(),
            in_ids: candidate
                .in_assumptions
                .iter()
                .enumerate()
                .filter(|(_, b)| **b)
                .map(|(i, _)| i)
                .collect(),
            discarded,
        }
    }
}

fn base_semantics(semantics: Semantics) -> BaseSemantics {
    match semantics {
        Semantics::CF => BaseSemantics::ConflictFree,
        Semantics::ADM | Semantics::PR | Semantics::ID => BaseSemantics::Admissible,
        Semantics::CO | Semantics::GR | Semantics::SST | Semantics::STG => BaseSemantics::Complete,
        Semantics::ST => BaseSemantics::Stable,
    }
}

/// Computes the extensions of a framework.
///
/// See [`WabaSolver`] for the default values of the optional parameters.
pub fn solve<T>(
    framework: &WabaFramework<T>,
    semiring: SemiringKind,
    monoid: MonoidKind,
    semantics: Semantics,
    budget: Option<Weight>,
    optimization: Optimization,
    max_results: Option<usize>,
) -> Result<SolveOutcome<T>, SolveError<T>>
where
    T: LabelType,
{
    let mut solver =
        WabaSolver::new(framework, semiring, monoid, semantics).with_optimization(optimization);
    if let Some(b) = budget {
        solver = solver.with_budget(b);
    }
    if let Some(m) = max_results {
        solver = solver.with_max_results(m);
    }
    solver.solve()
}

/// Computes the extensions of a framework, with the algebras, the semantics and the optimization given by their names.
///
/// Unknown names are reported by a [`SolveError::UnknownAlgebra`] error.
pub fn solve_with_names<T>(
    framework: &WabaFramework<T>,
    semiring: &str,
    monoid: &str,
    semantics: &str,
    budget: Option<Weight>,
    optimization: &str,
    max_results: Option<usize>,
) -> Result<SolveOutcome<T>, SolveError<T>>
where
    T: LabelType,
{
    solve(
        framework,
        SemiringKind::from_name(semiring)?,
        MonoidKind::from_name(monoid)?,
        Semantics::from_name(semantics)?,
        budget,
        Optimization::from_name(optimization)?,
        max_results,
    )
}
