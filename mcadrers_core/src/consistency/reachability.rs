//! Find reactions which can't carry flux by solving flux balance problems
use crate::configuration::Configuration;
use crate::metabolic_model::model::Model;
use crate::optimize::solvers::{LpSolver, SolverError};
use crate::optimize::{ObjectiveSense, ProblemSolution};

use tracing::{debug, warn};

/// How blocked reactions are found
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReachabilityMethod {
    /// Optimize the total flux of every unresolved reaction at once, falling back to a single
    /// reaction only when a batch resolves nothing
    #[default]
    Heuristic,
    /// Maximize and minimize every reaction on its own
    Exhaustive,
}

/// Reactions found unable to carry flux
///
/// Reactions are only ever added, never removed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InactiveSet {
    reactions: Vec<usize>,
}

impl InactiveSet {
    fn insert(&mut self, reaction: usize) {
        if !self.reactions.contains(&reaction) {
            self.reactions.push(reaction);
        }
    }

    pub fn contains(&self, reaction: usize) -> bool {
        self.reactions.contains(&reaction)
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Reaction indices in the order they were found
    pub fn indices(&self) -> &[usize] {
        &self.reactions
    }
}

/// Result of a reachability run
#[derive(Clone, Debug, PartialEq)]
pub struct Reachability {
    /// Ids of the blocked reactions, in model order
    pub inactive: Vec<String>,
    /// Number of solves optimizing several reactions at once
    pub batch_solves: usize,
    /// Number of solves optimizing a single reaction
    pub single_solves: usize,
}

impl ReachabilityMethod {
    /// Find the reactions of `model` whose flux is zero in every steady state
    ///
    /// The objective of `model` is ignored. An infeasible model has every reaction blocked.
    ///
    /// # Errors
    /// Any [`SolverError`], infeasibility isn't an error
    pub fn find_blocked<S: LpSolver>(
        &self,
        model: &Model,
        solver: &S,
        configuration: &Configuration,
    ) -> Result<Reachability, SolverError> {
        let mut run = Run::new(model, solver, configuration);
        match self {
            ReachabilityMethod::Heuristic => run.heuristic()?,
            ReachabilityMethod::Exhaustive => run.exhaustive()?,
        }
        Ok(run.finish())
    }
}

/// Shared state of one reachability run
struct Run<'a, S> {
    working: Model,
    solver: &'a S,
    configuration: &'a Configuration,
    inactive: InactiveSet,
    batch_solves: usize,
    single_solves: usize,
}

impl<'a, S: LpSolver> Run<'a, S> {
    fn new(model: &Model, solver: &'a S, configuration: &'a Configuration) -> Self {
        let mut working = model.clone();
        working.clear_objective();
        Run {
            working,
            solver,
            configuration,
            inactive: InactiveSet::default(),
            batch_solves: 0,
            single_solves: 0,
        }
    }

    fn heuristic(&mut self) -> Result<(), SolverError> {
        let mut unresolved: Vec<usize> = (0..self.working.num_reactions()).collect();
        let mut iteration = 0usize;
        while !unresolved.is_empty() {
            iteration += 1;
            let before = unresolved.len();
            for sense in [ObjectiveSense::Maximize, ObjectiveSense::Minimize] {
                if unresolved.is_empty() {
                    break;
                }
                self.working.set_objective_indices(&unresolved);
                let solution = self.solver.optimize(&self.working, sense, self.configuration)?;
                self.batch_solves += 1;
                if solution.is_infeasible() {
                    warn!(
                        remaining = unresolved.len(),
                        "Infeasible model, all unresolved reactions are blocked"
                    );
                    for reaction in unresolved.drain(..) {
                        self.inactive.insert(reaction);
                    }
                    return Ok(());
                }
                unresolved.retain(|&j| !self.is_active(&solution, j));
            }
            debug!(
                iteration,
                resolved = before - unresolved.len(),
                remaining = unresolved.len(),
                "Reachability batch"
            );
            if unresolved.len() == before {
                let reaction = unresolved.remove(0);
                if !self.single_reaction_active(reaction)? {
                    self.inactive.insert(reaction);
                }
            }
        }
        Ok(())
    }

    fn exhaustive(&mut self) -> Result<(), SolverError> {
        for reaction in 0..self.working.num_reactions() {
            if !self.single_reaction_active(reaction)? {
                self.inactive.insert(reaction);
            }
        }
        Ok(())
    }

    /// Maximize, then if needed minimize, the flux of a single reaction
    fn single_reaction_active(&mut self, reaction: usize) -> Result<bool, SolverError> {
        self.working.set_objective_indices(&[reaction]);
        for sense in [ObjectiveSense::Maximize, ObjectiveSense::Minimize] {
            let solution = self.solver.optimize(&self.working, sense, self.configuration)?;
            self.single_solves += 1;
            if self.is_active(&solution, reaction) {
                return Ok(true);
            }
        }
        debug!(reaction = %self.working.reactions()[reaction], "Blocked reaction");
        Ok(false)
    }

    fn is_active(&self, solution: &ProblemSolution, reaction: usize) -> bool {
        solution
            .flux(&self.working.reactions()[reaction])
            .is_some_and(|flux| flux.abs() > self.configuration.tolerance)
    }

    fn finish(self) -> Reachability {
        let mut indices = self.inactive.indices().to_vec();
        indices.sort_unstable();
        Reachability {
            inactive: indices
                .into_iter()
                .map(|j| self.working.reactions()[j].clone())
                .collect(),
            batch_solves: self.batch_solves,
            single_solves: self.single_solves,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::model::tests::linear_model;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use crate::optimize::solvers::clarabel::ClarabelSolver;

    /// Linear pathway with a branch which can only run backwards and a blocked side reaction
    fn branched_model() -> Model {
        let mut reactions = Vec::new();
        for (id, metabolites, lb, ub) in [
            ("EX_a", vec![("a", 1.)], 0., 10.),
            ("R1", vec![("a", -1.), ("b", 1.)], 0., 10.),
            ("EX_b", vec![("b", -1.)], 0., 10.),
            // Only able to turn c into b
            ("R2", vec![("b", -1.), ("c", 1.)], -10., 0.),
            ("EX_c", vec![("c", -1.)], -5., 0.),
            // Nothing removes d
            ("R3", vec![("a", -1.), ("d", 1.)], 0., 10.),
            ("Z", vec![("b", -1.)], 0., 0.),
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
    fn heuristic_finds_blocked_reactions() {
        let model = branched_model();
        let result = ReachabilityMethod::Heuristic
            .find_blocked(&model, &ClarabelSolver::new(), &Configuration::default())
            .unwrap();
        assert_eq!(result.inactive, vec!["R3", "Z"]);
        assert!(result.batch_solves > 0);
    }

    #[test]
    fn heuristic_matches_exhaustive() {
        let model = branched_model();
        let configuration = Configuration::default();
        let solver = ClarabelSolver::new();
        let heuristic = ReachabilityMethod::Heuristic
            .find_blocked(&model, &solver, &configuration)
            .unwrap();
        let exhaustive = ReachabilityMethod::Exhaustive
            .find_blocked(&model, &solver, &configuration)
            .unwrap();
        assert_eq!(heuristic.inactive, exhaustive.inactive);
        assert_eq!(exhaustive.batch_solves, 0);
        assert!(heuristic.single_solves < exhaustive.single_solves);
    }

    #[test]
    fn consistent_model_has_nothing_blocked() {
        let result = ReachabilityMethod::Heuristic
            .find_blocked(
                &linear_model(),
                &ClarabelSolver::new(),
                &Configuration::default(),
            )
            .unwrap();
        assert!(result.inactive.is_empty());
        // One maximization resolves the whole pathway
        assert_eq!(result.batch_solves, 1);
        assert_eq!(result.single_solves, 0);
    }

    #[test]
    fn infeasible_model_blocks_everything() {
        let mut model = linear_model();
        model.set_bounds("EX_a", 5., 5.).unwrap();
        model.set_bounds("EX_c", 3., 3.).unwrap();
        let result = ReachabilityMethod::Heuristic
            .find_blocked(&model, &ClarabelSolver::new(), &Configuration::default())
            .unwrap();
        assert_eq!(result.inactive, vec!["EX_a", "R1", "R2", "EX_c"]);
        assert_eq!(result.batch_solves, 1);
    }

    #[test]
    fn objective_of_input_is_untouched() {
        let model = linear_model();
        ReachabilityMethod::Heuristic
            .find_blocked(&model, &ClarabelSolver::new(), &Configuration::default())
            .unwrap();
        assert_eq!(model.objective(), &[0., 0., 0., 1.]);
    }

    #[test]
    fn inactive_set_only_grows() {
        let mut inactive = InactiveSet::default();
        inactive.insert(3);
        inactive.insert(1);
        inactive.insert(3);
        assert_eq!(inactive.indices(), &[3, 1]);
        assert!(inactive.contains(1));
        assert_eq!(inactive.len(), 2);
    }
}
