//! Structural dead ends of the stoichiometric matrix
//!
//! A metabolite is dead when, given the directions the reactions touching it can run in, it
//! can't be balanced at steady state: nothing can produce it, nothing can consume it, or only
//! one reaction touches it at all. Every reaction touching a dead metabolite is forced to zero
//! flux, which can in turn kill further metabolites. No LP is solved.
use crate::metabolic_model::model::{Model, ModelError};

use nalgebra_sparse::CsrMatrix;
use std::collections::VecDeque;
use tracing::trace;

/// Dead metabolites and reactions of a model
#[derive(Clone, Debug, PartialEq)]
pub struct DeadEnds {
    metabolites: Vec<bool>,
    reactions: Vec<bool>,
}

/// Reactions still able to carry flux touching one metabolite
#[derive(Clone, Copy, Debug, Default)]
struct Balance {
    live: usize,
    producers: usize,
    consumers: usize,
}

impl Balance {
    fn is_dead(&self) -> bool {
        self.producers == 0 || self.consumers == 0 || self.live <= 1
    }
}

fn can_produce(coefficient: f64, lower: f64, upper: f64) -> bool {
    (coefficient > 0. && upper > 0.) || (coefficient < 0. && lower < 0.)
}

fn can_consume(coefficient: f64, lower: f64, upper: f64) -> bool {
    (coefficient < 0. && upper > 0.) || (coefficient > 0. && lower < 0.)
}

impl DeadEnds {
    /// Find every dead metabolite and reaction of `model`
    ///
    /// Each nonzero of the stoichiometric matrix is visited a bounded number of times.
    pub fn find(model: &Model) -> Self {
        let stoichiometry = model.stoichiometry();
        let by_metabolite = CsrMatrix::from(stoichiometry);
        let lower = model.lower_bounds();
        let upper = model.upper_bounds();

        let mut reactions: Vec<bool> = lower
            .iter()
            .zip(upper)
            .map(|(lb, ub)| *lb == 0. && *ub == 0.)
            .collect();
        let mut balances = vec![Balance::default(); model.num_metabolites()];
        for (row, column, coefficient) in stoichiometry.triplet_iter() {
            if reactions[column] || *coefficient == 0. {
                continue;
            }
            let balance = &mut balances[row];
            balance.live += 1;
            if can_produce(*coefficient, lower[column], upper[column]) {
                balance.producers += 1;
            }
            if can_consume(*coefficient, lower[column], upper[column]) {
                balance.consumers += 1;
            }
        }

        let mut metabolites: Vec<bool> = balances.iter().map(Balance::is_dead).collect();
        let mut queue: VecDeque<usize> = metabolites
            .iter()
            .enumerate()
            .filter(|(_, dead)| **dead)
            .map(|(row, _)| row)
            .collect();

        while let Some(row) = queue.pop_front() {
            let touching = by_metabolite.row(row);
            for (&column, coefficient) in touching.col_indices().iter().zip(touching.values()) {
                if reactions[column] || *coefficient == 0. {
                    continue;
                }
                reactions[column] = true;
                trace!(reaction = %model.reactions()[column], "Structural dead end");
                let column_entries = stoichiometry.col(column);
                for (&other, value) in column_entries
                    .row_indices()
                    .iter()
                    .zip(column_entries.values())
                {
                    if *value == 0. {
                        continue;
                    }
                    let balance = &mut balances[other];
                    balance.live -= 1;
                    if can_produce(*value, lower[column], upper[column]) {
                        balance.producers -= 1;
                    }
                    if can_consume(*value, lower[column], upper[column]) {
                        balance.consumers -= 1;
                    }
                    if !metabolites[other] && balance.is_dead() {
                        metabolites[other] = true;
                        queue.push_back(other);
                    }
                }
            }
        }

        DeadEnds {
            metabolites,
            reactions,
        }
    }

    /// Whether the reaction at `index` can't carry flux
    pub fn is_dead_reaction(&self, index: usize) -> bool {
        self.reactions.get(index).copied().unwrap_or(false)
    }

    /// Whether the metabolite at `index` can't be balanced
    pub fn is_dead_metabolite(&self, index: usize) -> bool {
        self.metabolites.get(index).copied().unwrap_or(false)
    }

    /// Ids of the dead reactions in model order
    pub fn dead_reactions<'a>(&self, model: &'a Model) -> Vec<&'a str> {
        model
            .reactions()
            .iter()
            .zip(&self.reactions)
            .filter(|(_, dead)| **dead)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Ids of the dead metabolites in model order
    pub fn dead_metabolites<'a>(&self, model: &'a Model) -> Vec<&'a str> {
        model
            .metabolites()
            .iter()
            .zip(&self.metabolites)
            .filter(|(_, dead)| **dead)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

/// Dead reactions of `model` which belong to `core`, in model order
///
/// Dead reactions outside the core aren't reported.
///
/// # Examples
/// ```rust
/// use mcadrers_core::consistency::dead_ends::core_dead_ends;
/// use mcadrers_core::metabolic_model::model::Model;
/// use mcadrers_core::metabolic_model::reaction::ReactionBuilder;
/// let reactions = vec![
///     ReactionBuilder::default().id("EX_a").metabolite("a", 1.).bounds(0., 10.).build().unwrap(),
///     ReactionBuilder::default().id("R1").metabolite("a", -1.).metabolite("b", 1.).build().unwrap(),
/// ];
/// let model = Model::from_reactions(reactions, Vec::<String>::new()).unwrap();
/// // R1 is the only reaction touching b
/// assert_eq!(core_dead_ends(&model, &["R1"]).unwrap(), vec!["R1".to_string()]);
/// ```
pub fn core_dead_ends<S: AsRef<str>>(model: &Model, core: &[S]) -> Result<Vec<String>, ModelError> {
    let mut in_core = vec![false; model.num_reactions()];
    for reaction in core {
        in_core[model.require_reaction(reaction.as_ref())?] = true;
    }
    let dead = DeadEnds::find(model);
    Ok(model
        .reactions()
        .iter()
        .enumerate()
        .filter(|(index, _)| in_core[*index] && dead.is_dead_reaction(*index))
        .map(|(_, id)| id.clone())
        .collect())
}
