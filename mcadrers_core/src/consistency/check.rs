//! Check of a model's consistency after removing one candidate reaction
use crate::configuration::Configuration;
use crate::consistency::dead_ends::core_dead_ends;
use crate::consistency::reachability::ReachabilityMethod;
use crate::consistency::ConsistencyError;
use crate::metabolic_model::model::Model;
use crate::optimize::solvers::LpSolver;

use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};
use tracing::info;

/// Which stage of the check decided the result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsistencyOutcome {
    /// Blocked reactions were found by solving flux balance problems
    FluxCheck,
    /// A core reaction became a structural dead end, no flux balance problem was solved
    CoreDeadEnd,
}

impl ConsistencyOutcome {
    /// Numeric code of the outcome, 1 for [`ConsistencyOutcome::FluxCheck`] and 2 for
    /// [`ConsistencyOutcome::CoreDeadEnd`]
    pub fn code(&self) -> u8 {
        match self {
            ConsistencyOutcome::FluxCheck => 1,
            ConsistencyOutcome::CoreDeadEnd => 2,
        }
    }
}

impl Display for ConsistencyOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyOutcome::FluxCheck => write!(f, "flux check"),
            ConsistencyOutcome::CoreDeadEnd => write!(f, "core dead end"),
        }
    }
}

/// Result of a consistency check
#[derive(Clone, Debug, PartialEq)]
pub struct ConsistencyReport {
    pub outcome: ConsistencyOutcome,
    /// Reactions unable to carry flux
    ///
    /// For [`ConsistencyOutcome::CoreDeadEnd`] this is the candidate followed by the dead core
    /// reactions, otherwise every blocked reaction of the reduced model, both in model order.
    pub inactive: Vec<String>,
    /// Wall clock time of the whole check
    pub elapsed: Duration,
    /// Number of LP solves performed
    pub solves: usize,
}

/// Checks which reactions become blocked when a candidate reaction is removed
///
/// Holds no state between checks, so repeating a check gives the same outcome and inactive set.
///
/// # Examples
/// ```rust
/// use mcadrers_core::configuration::Configuration;
/// use mcadrers_core::consistency::check::{ConsistencyChecker, ConsistencyOutcome};
/// use mcadrers_core::metabolic_model::model::Model;
/// use mcadrers_core::metabolic_model::reaction::ReactionBuilder;
/// use mcadrers_core::optimize::solvers::clarabel::ClarabelSolver;
/// let reactions = vec![
///     ReactionBuilder::default().id("EX_a").metabolite("a", 1.).bounds(0., 10.).build().unwrap(),
///     ReactionBuilder::default().id("R1").metabolite("a", -1.).metabolite("b", 1.).bounds(0., 10.).build().unwrap(),
///     ReactionBuilder::default().id("EX_b").metabolite("b", -1.).bounds(0., 10.).build().unwrap(),
/// ];
/// let model = Model::from_reactions(reactions, Vec::<String>::new()).unwrap();
/// let checker = ConsistencyChecker::new(ClarabelSolver::new(), Configuration::default());
/// let report = checker.check(&model, Some("R1"), &["EX_b"]).unwrap();
/// assert_eq!(report.outcome, ConsistencyOutcome::CoreDeadEnd);
/// assert_eq!(report.inactive, vec!["R1", "EX_b"]);
/// ```
#[derive(Clone, Debug)]
pub struct ConsistencyChecker<S> {
    solver: S,
    configuration: Configuration,
    structural_check: bool,
    method: ReachabilityMethod,
}

impl<S: LpSolver> ConsistencyChecker<S> {
    /// Checker running the structural check and the heuristic reachability method
    pub fn new(solver: S, configuration: Configuration) -> Self {
        ConsistencyChecker {
            solver,
            configuration,
            structural_check: true,
            method: ReachabilityMethod::default(),
        }
    }

    /// Enable or disable the structural dead end check
    pub fn with_structural_check(mut self, structural_check: bool) -> Self {
        self.structural_check = structural_check;
        self
    }

    pub fn with_method(mut self, method: ReachabilityMethod) -> Self {
        self.method = method;
        self
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Check `model` with `candidate` removed, against the reactions in `core`
    ///
    /// `model` itself is never modified.
    ///
    /// # Errors
    /// - [`ConsistencyError::Model`] if the candidate or a core reaction isn't in the model
    /// - [`ConsistencyError::Solver`] if a solve fails for a reason other than infeasibility
    pub fn check<C: AsRef<str>>(
        &self,
        model: &Model,
        candidate: Option<&str>,
        core: &[C],
    ) -> Result<ConsistencyReport, ConsistencyError> {
        let start = Instant::now();
        for reaction in core {
            model.require_reaction(reaction.as_ref())?;
        }
        let mut working = match candidate {
            Some(candidate) => model.without_reaction(candidate)?,
            None => model.clone(),
        };
        working.clear_objective();

        if self.structural_check {
            let remaining_core: Vec<&str> = core
                .iter()
                .map(|reaction| reaction.as_ref())
                .filter(|reaction| Some(*reaction) != candidate)
                .collect();
            let dead = core_dead_ends(&working, &remaining_core)?;
            if !dead.is_empty() {
                let inactive: Vec<String> = candidate
                    .map(str::to_string)
                    .into_iter()
                    .chain(dead)
                    .collect();
                let report = ConsistencyReport {
                    outcome: ConsistencyOutcome::CoreDeadEnd,
                    inactive,
                    elapsed: start.elapsed(),
                    solves: 0,
                };
                info!(
                    candidate,
                    outcome = report.outcome.code(),
                    inactive = report.inactive.len(),
                    "Core dead end"
                );
                return Ok(report);
            }
        }

        let reachability = self
            .method
            .find_blocked(&working, &self.solver, &self.configuration)?;
        let report = ConsistencyReport {
            outcome: ConsistencyOutcome::FluxCheck,
            inactive: reachability.inactive,
            elapsed: start.elapsed(),
            solves: reachability.batch_solves + reachability.single_solves,
        };
        info!(
            candidate,
            outcome = report.outcome.code(),
            inactive = report.inactive.len(),
            solves = report.solves,
            elapsed = ?report.elapsed,
            "Flux consistency check"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::model::tests::linear_model;
    use crate::metabolic_model::model::ModelError;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use crate::optimize::solvers::clarabel::ClarabelSolver;
    use crate::optimize::solvers::SolverError;
    use crate::optimize::{ObjectiveSense, ProblemSolution};
    use std::cell::Cell;

    /// Clarabel, counting how often it is asked to solve
    #[derive(Default)]
    struct CountingSolver {
        solves: Cell<usize>,
    }

    impl LpSolver for CountingSolver {
        fn optimize(
            &self,
            model: &Model,
            sense: ObjectiveSense,
            configuration: &Configuration,
        ) -> Result<ProblemSolution, SolverError> {
            self.solves.set(self.solves.get() + 1);
            ClarabelSolver::new().optimize(model, sense, configuration)
        }
    }

    /// Linear pathway with a parallel route from a to b and three reactions fixed at zero
    fn model_with_zero_bounds() -> Model {
        let mut reactions = Vec::new();
        for (id, metabolites, lb, ub) in [
            ("EX_a", vec![("a", 1.)], 0., 10.),
            ("R1", vec![("a", -1.), ("b", 1.)], 0., 10.),
            ("R1b", vec![("a", -1.), ("b", 1.)], 0., 10.),
            ("R2", vec![("b", -1.), ("c", 1.)], 0., 10.),
            ("EX_c", vec![("c", -1.)], 0., 10.),
            ("Z1", vec![("a", -1.), ("c", 1.)], 0., 0.),
            ("Z2", vec![("b", -1.), ("a", 1.)], 0., 0.),
            ("Z3", vec![("c", -1.), ("b", 1.)], 0., 0.),
        ] {
            let mut builder = ReactionBuilder::default();
            builder.id(id).bounds(lb, ub);
            for (metabolite, coefficient) in metabolites {
                builder.metabolite(metabolite, coefficient);
            }
            reactions.push(builder.build().unwrap());
        }
        Model::from_reactions(reactions, Vec::<String>::new()).unwrap()
    }

    #[test]
    fn isolated_core_reaction_skips_flux_check() {
        let model = linear_model();
        let solver = CountingSolver::default();
        let checker = ConsistencyChecker::new(&solver, Configuration::default());
        let report = checker.check(&model, Some("R1"), &["R2"]).unwrap();
        assert_eq!(report.outcome, ConsistencyOutcome::CoreDeadEnd);
        assert_eq!(report.outcome.code(), 2);
        assert_eq!(report.inactive, vec!["R1", "R2"]);
        assert_eq!(report.solves, 0);
        assert_eq!(solver.solves.get(), 0);
        // Caller's model is untouched
        assert_eq!(model.num_reactions(), 4);
        assert_eq!(model.objective(), &[0., 0., 0., 1.]);
    }

    #[test]
    fn zero_bound_reactions_are_inactive() {
        let model = model_with_zero_bounds();
        let solver = CountingSolver::default();
        let checker = ConsistencyChecker::new(&solver, Configuration::default());
        let report = checker.check(&model, Some("R1b"), &["R1", "R2"]).unwrap();
        assert_eq!(report.outcome, ConsistencyOutcome::FluxCheck);
        assert_eq!(report.outcome.code(), 1);
        assert_eq!(report.inactive, vec!["Z1", "Z2", "Z3"]);
        assert!(solver.solves.get() > 0);
        assert_eq!(report.solves, solver.solves.get());
    }

    #[test]
    fn check_is_idempotent() {
        let model = model_with_zero_bounds();
        let checker = ConsistencyChecker::new(ClarabelSolver::new(), Configuration::default());
        let first = checker.check(&model, Some("R1b"), &["R1", "R2"]).unwrap();
        let second = checker.check(&model, Some("R1b"), &["R1", "R2"]).unwrap();
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(first.inactive, second.inactive);

        let first = checker.check(&model, Some("R1"), &["R2"]);
        let second = checker.check(&model, Some("R1"), &["R2"]);
        assert_eq!(
            first.map(|r| (r.outcome, r.inactive)),
            second.map(|r| (r.outcome, r.inactive))
        );
    }

    #[test]
    fn removing_a_parallel_route_keeps_the_core() {
        let model = model_with_zero_bounds();
        let checker = ConsistencyChecker::new(ClarabelSolver::new(), Configuration::default());
        // R1 still carries a to b, so only the fixed reactions are blocked
        let report = checker.check(&model, Some("R1b"), &["R2"]).unwrap();
        assert_eq!(report.outcome, ConsistencyOutcome::FluxCheck);
        assert!(!report.inactive.contains(&"R2".to_string()));
    }

    #[test]
    fn without_structural_check_the_flux_check_runs() {
        let model = linear_model();
        let solver = CountingSolver::default();
        let checker = ConsistencyChecker::new(&solver, Configuration::default())
            .with_structural_check(false);
        let report = checker.check(&model, Some("R1"), &["R2"]).unwrap();
        assert_eq!(report.outcome, ConsistencyOutcome::FluxCheck);
        assert_eq!(report.inactive, vec!["EX_a", "R2", "EX_c"]);
        assert!(solver.solves.get() > 0);
    }

    #[test]
    fn exhaustive_method_agrees() {
        let model = model_with_zero_bounds();
        let checker = ConsistencyChecker::new(ClarabelSolver::new(), Configuration::default())
            .with_method(ReachabilityMethod::Exhaustive);
        let report = checker.check(&model, None, &["R1"]).unwrap();
        assert_eq!(report.inactive, vec!["Z1", "Z2", "Z3"]);
    }

    #[test]
    fn toy_model_fixture() {
        let path = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("test_models")
            .join("toy_model.json");
        let model = Model::read_json(path, &Configuration::default()).unwrap();
        let checker = ConsistencyChecker::new(ClarabelSolver::new(), Configuration::default());

        // Without PGI nothing makes f6p
        let report = checker.check(&model, Some("PGI"), &["PFK"]).unwrap();
        assert_eq!(report.outcome, ConsistencyOutcome::CoreDeadEnd);
        assert_eq!(report.inactive, vec!["PGI", "PFK"]);

        // BLOCKED is a dead end, but not in the core
        let report = checker.check(&model, None, &["HEX", "PFK"]).unwrap();
        assert_eq!(report.outcome, ConsistencyOutcome::FluxCheck);
        assert_eq!(report.inactive, vec!["BLOCKED"]);
    }

    #[test]
    fn unknown_reactions_are_errors() {
        let model = linear_model();
        let checker = ConsistencyChecker::new(ClarabelSolver::new(), Configuration::default());
        assert_eq!(
            checker.check(&model, Some("nope"), &["R2"]).unwrap_err(),
            ConsistencyError::Model(ModelError::UnknownReaction("nope".to_string()))
        );
        assert_eq!(
            checker.check(&model, Some("R1"), &["nope"]).unwrap_err(),
            ConsistencyError::Model(ModelError::UnknownReaction("nope".to_string()))
        );
    }
}
