//! This module provides a struct for describing reactions when assembling a [`Model`]
//!
//! [`Model`]: crate::metabolic_model::model::Model
use crate::configuration::{DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND};
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
///
/// # Examples
/// ```rust
/// use mcadrers_core::metabolic_model::reaction::ReactionBuilder;
/// let reaction = ReactionBuilder::default()
///     .id("PGI")
///     .metabolite("g6p_c", -1.)
///     .metabolite("f6p_c", 1.)
///     .gene_reaction_rule("b4025")
///     .build()
///     .unwrap();
/// assert_eq!(reaction.lower_bound, -1000.);
/// assert_eq!(reaction.metabolites.len(), 2);
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(setter(into))]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Metabolite stoichiometry of the reaction, negative for substrates, positive for products
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene Protein Reaction rule as written in the reconstruction, empty if no genes are
    /// associated with the reaction
    #[builder(default = "String::new()")]
    pub gene_reaction_rule: String,
    /// Lower flux bound
    #[builder(default = "DEFAULT_LOWER_BOUND")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "DEFAULT_UPPER_BOUND")]
    pub upper_bound: f64,
    /// Coefficient of this reaction in the model objective
    #[builder(default = "0.")]
    pub objective_coefficient: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
}

impl ReactionBuilder {
    /// Add a single metabolite with its stoichiometric coefficient
    pub fn metabolite(&mut self, id: &str, coefficient: f64) -> &mut Self {
        self.metabolites
            .get_or_insert_with(IndexMap::new)
            .insert(id.to_string(), coefficient);
        self
    }

    /// Set both flux bounds
    pub fn bounds(&mut self, lower_bound: f64, upper_bound: f64) -> &mut Self {
        self.lower_bound = Some(lower_bound);
        self.upper_bound = Some(upper_bound);
        self
    }
}
