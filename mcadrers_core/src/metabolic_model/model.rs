//! This module provides the Model struct for representing an entire metabolic model
use crate::io::gpr_parse::{parse_gpr, GprParseError};
use crate::metabolic_model::reaction::Reaction;

use indexmap::IndexSet;
use nalgebra_sparse::{CooMatrix, CscMatrix};
use thiserror::Error;

/// Represents a Genome Scale Metabolic Model
///
/// The columns of the stoichiometric matrix, the bounds, the objective coefficients and the
/// gene reaction rules are all index aligned with the reaction ids. Every operation on the
/// model keeps this alignment.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    /// Id associated with the Model
    pub id: Option<String>,
    /// Reaction ids, in column order
    reactions: IndexSet<String>,
    /// Metabolite ids, in row order
    metabolites: IndexSet<String>,
    /// Gene ids
    genes: IndexSet<String>,
    /// Stoichiometric matrix (metabolites x reactions)
    stoichiometry: CscMatrix<f64>,
    lower_bounds: Vec<f64>,
    upper_bounds: Vec<f64>,
    /// Linear objective coefficient of each reaction
    objective: Vec<f64>,
    /// Raw gene reaction rule of each reaction
    gene_reaction_rules: Vec<String>,
}

/// Index aligned arrays used to build a [`Model`] directly, see [`Model::from_parts`]
#[derive(Clone, Debug)]
pub struct ModelParts {
    pub reactions: Vec<String>,
    pub metabolites: Vec<String>,
    pub genes: Vec<String>,
    pub stoichiometry: CscMatrix<f64>,
    pub lower_bounds: Vec<f64>,
    pub upper_bounds: Vec<f64>,
    pub objective: Vec<f64>,
    pub gene_reaction_rules: Vec<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            id: None,
            reactions: IndexSet::new(),
            metabolites: IndexSet::new(),
            genes: IndexSet::new(),
            stoichiometry: CscMatrix::zeros(0, 0),
            lower_bounds: Vec::new(),
            upper_bounds: Vec::new(),
            objective: Vec::new(),
            gene_reaction_rules: Vec::new(),
        }
    }

    /// Assemble a model from reactions
    ///
    /// Metabolites are ordered by first appearance. The gene list is `genes` followed by any
    /// gene found in a reaction's rule which wasn't already listed.
    ///
    /// # Examples
    /// ```rust
    /// use mcadrers_core::metabolic_model::model::Model;
    /// use mcadrers_core::metabolic_model::reaction::ReactionBuilder;
    /// let uptake = ReactionBuilder::default()
    ///     .id("EX_a")
    ///     .metabolite("a", 1.)
    ///     .build()
    ///     .unwrap();
    /// let convert = ReactionBuilder::default()
    ///     .id("R1")
    ///     .metabolite("a", -1.)
    ///     .gene_reaction_rule("g1 or g2")
    ///     .build()
    ///     .unwrap();
    /// let model = Model::from_reactions(vec![uptake, convert], Vec::<String>::new()).unwrap();
    /// assert_eq!(model.num_reactions(), 2);
    /// assert_eq!(model.genes().len(), 2);
    /// ```
    pub fn from_reactions<I, S>(reactions: Vec<Reaction>, genes: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Model::from_components(reactions, Vec::<String>::new(), genes)
    }

    /// Assemble a model from reactions, with the given metabolites ordered first
    ///
    /// Metabolites only found in reactions follow `metabolites` in order of first appearance.
    /// Genes are ordered the same way.
    pub fn from_components<M, T, I, S>(
        reactions: Vec<Reaction>,
        metabolites: M,
        genes: I,
    ) -> Result<Self, ModelError>
    where
        M: IntoIterator<Item = T>,
        T: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut model = Model::new_empty();
        for metabolite in metabolites {
            let metabolite = metabolite.into();
            if !model.metabolites.insert(metabolite.clone()) {
                return Err(ModelError::DuplicateId {
                    kind: "metabolite",
                    id: metabolite,
                });
            }
        }
        for gene in genes {
            let gene = gene.into();
            if !model.genes.insert(gene.clone()) {
                return Err(ModelError::DuplicateId { kind: "gene", id: gene });
            }
        }
        let mut triplets = Vec::new();
        for reaction in reactions {
            if reaction.lower_bound > reaction.upper_bound {
                return Err(ModelError::InvalidBounds {
                    reaction: reaction.id,
                    lower: reaction.lower_bound,
                    upper: reaction.upper_bound,
                });
            }
            let column = model.reactions.len();
            if !model.reactions.insert(reaction.id.clone()) {
                return Err(ModelError::DuplicateId {
                    kind: "reaction",
                    id: reaction.id,
                });
            }
            for (metabolite, coefficient) in &reaction.metabolites {
                let (row, _) = model.metabolites.insert_full(metabolite.clone());
                if *coefficient != 0. {
                    triplets.push((row, column, *coefficient));
                }
            }
            // Register genes only found in the rule
            let gpr = parse_gpr(&reaction.gene_reaction_rule).map_err(|source| {
                ModelError::InvalidGpr {
                    reaction: reaction.id.clone(),
                    source,
                }
            })?;
            if let Some(gpr) = gpr {
                for gene in gpr.genes() {
                    if !model.genes.contains(gene) {
                        model.genes.insert(gene.to_string());
                    }
                }
            }
            model.lower_bounds.push(reaction.lower_bound);
            model.upper_bounds.push(reaction.upper_bound);
            model.objective.push(reaction.objective_coefficient);
            model.gene_reaction_rules.push(reaction.gene_reaction_rule);
        }
        let mut coo = CooMatrix::new(model.metabolites.len(), model.reactions.len());
        for (row, column, coefficient) in triplets {
            coo.push(row, column, coefficient);
        }
        model.stoichiometry = CscMatrix::from(&coo);
        Ok(model)
    }

    /// Create a model from index aligned arrays, validating their alignment
    ///
    /// # Errors
    /// - [`ModelError::Misaligned`] if any array (or matrix dimension) doesn't match the
    ///   number of reactions/metabolites
    /// - [`ModelError::DuplicateId`] for repeated ids
    /// - [`ModelError::InvalidBounds`] if a lower bound exceeds its upper bound
    /// - [`ModelError::InvalidGpr`]/[`ModelError::UnknownGene`] if a rule can't be parsed or
    ///   references a gene not in `genes`
    pub fn from_parts(parts: ModelParts) -> Result<Self, ModelError> {
        let num_reactions = parts.reactions.len();
        let num_metabolites = parts.metabolites.len();
        check_length("stoichiometry columns", num_reactions, parts.stoichiometry.ncols())?;
        check_length("stoichiometry rows", num_metabolites, parts.stoichiometry.nrows())?;
        check_length("lower bounds", num_reactions, parts.lower_bounds.len())?;
        check_length("upper bounds", num_reactions, parts.upper_bounds.len())?;
        check_length("objective", num_reactions, parts.objective.len())?;
        check_length(
            "gene reaction rules",
            num_reactions,
            parts.gene_reaction_rules.len(),
        )?;

        let reactions = unique_ids("reaction", parts.reactions)?;
        let metabolites = unique_ids("metabolite", parts.metabolites)?;
        let genes = unique_ids("gene", parts.genes)?;

        for (index, reaction) in reactions.iter().enumerate() {
            let (lower, upper) = (parts.lower_bounds[index], parts.upper_bounds[index]);
            if lower > upper {
                return Err(ModelError::InvalidBounds {
                    reaction: reaction.clone(),
                    lower,
                    upper,
                });
            }
            let gpr = parse_gpr(&parts.gene_reaction_rules[index]).map_err(|source| {
                ModelError::InvalidGpr {
                    reaction: reaction.clone(),
                    source,
                }
            })?;
            if let Some(gpr) = gpr {
                if let Some(gene) = gpr.genes().into_iter().find(|g| !genes.contains(*g)) {
                    return Err(ModelError::UnknownGene {
                        reaction: reaction.clone(),
                        gene: gene.to_string(),
                    });
                }
            }
        }

        Ok(Model {
            id: None,
            reactions,
            metabolites,
            genes,
            stoichiometry: parts.stoichiometry,
            lower_bounds: parts.lower_bounds,
            upper_bounds: parts.upper_bounds,
            objective: parts.objective,
            gene_reaction_rules: parts.gene_reaction_rules,
        })
    }

    // region Accessors
    /// Reaction ids in column order
    pub fn reactions(&self) -> &IndexSet<String> {
        &self.reactions
    }

    /// Metabolite ids in row order
    pub fn metabolites(&self) -> &IndexSet<String> {
        &self.metabolites
    }

    pub fn genes(&self) -> &IndexSet<String> {
        &self.genes
    }

    pub fn num_reactions(&self) -> usize {
        self.reactions.len()
    }

    pub fn num_metabolites(&self) -> usize {
        self.metabolites.len()
    }

    /// Stoichiometric matrix, metabolites by reactions
    pub fn stoichiometry(&self) -> &CscMatrix<f64> {
        &self.stoichiometry
    }

    pub fn lower_bounds(&self) -> &[f64] {
        &self.lower_bounds
    }

    pub fn upper_bounds(&self) -> &[f64] {
        &self.upper_bounds
    }

    /// Objective coefficients, index aligned with [`Model::reactions`]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    pub fn gene_reaction_rules(&self) -> &[String] {
        &self.gene_reaction_rules
    }

    /// Column index of a reaction
    pub fn reaction_index(&self, reaction: &str) -> Option<usize> {
        self.reactions.get_index_of(reaction)
    }

    /// Column index of a reaction, or [`ModelError::UnknownReaction`]
    pub fn require_reaction(&self, reaction: &str) -> Result<usize, ModelError> {
        self.reaction_index(reaction)
            .ok_or_else(|| ModelError::UnknownReaction(reaction.to_string()))
    }
    // endregion Accessors

    // region Mutation
    /// Create a copy of the model with `reaction` removed
    ///
    /// Metabolites are kept even if no reaction uses them anymore.
    pub fn without_reaction(&self, reaction: &str) -> Result<Model, ModelError> {
        let removed = self.require_reaction(reaction)?;
        let mut coo = CooMatrix::new(self.num_metabolites(), self.num_reactions() - 1);
        for (row, column, coefficient) in self.stoichiometry.triplet_iter() {
            if column != removed {
                let column = if column > removed { column - 1 } else { column };
                coo.push(row, column, *coefficient);
            }
        }
        let mut reduced = self.clone();
        reduced.reactions.shift_remove_index(removed);
        reduced.stoichiometry = CscMatrix::from(&coo);
        reduced.lower_bounds.remove(removed);
        reduced.upper_bounds.remove(removed);
        reduced.objective.remove(removed);
        reduced.gene_reaction_rules.remove(removed);
        Ok(reduced)
    }

    /// Set all objective coefficients to zero
    pub fn clear_objective(&mut self) {
        self.objective.iter_mut().for_each(|c| *c = 0.);
    }

    /// Replace the objective with the sum of the fluxes of `reactions`
    ///
    /// The objective is left unchanged if any of the reactions is not in the model.
    pub fn set_objective<S: AsRef<str>>(&mut self, reactions: &[S]) -> Result<(), ModelError> {
        let indices = reactions
            .iter()
            .map(|r| self.require_reaction(r.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.clear_objective();
        for index in indices {
            self.objective[index] = 1.;
        }
        Ok(())
    }

    /// Replace the objective with the sum of the fluxes of the reactions at `indices`
    ///
    /// # Panics
    /// If any index is not a reaction column
    pub fn set_objective_indices(&mut self, indices: &[usize]) {
        self.clear_objective();
        for &index in indices {
            self.objective[index] = 1.;
        }
    }

    /// Set the flux bounds of a single reaction
    pub fn set_bounds(
        &mut self,
        reaction: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ModelError> {
        let index = self.require_reaction(reaction)?;
        if lower_bound > upper_bound {
            return Err(ModelError::InvalidBounds {
                reaction: reaction.to_string(),
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        self.lower_bounds[index] = lower_bound;
        self.upper_bounds[index] = upper_bound;
        Ok(())
    }
    // endregion Mutation
}

fn check_length(what: &'static str, expected: usize, found: usize) -> Result<(), ModelError> {
    if expected != found {
        return Err(ModelError::Misaligned {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

fn unique_ids(kind: &'static str, ids: Vec<String>) -> Result<IndexSet<String>, ModelError> {
    let mut set = IndexSet::with_capacity(ids.len());
    for id in ids {
        if set.contains(&id) {
            return Err(ModelError::DuplicateId { kind, id });
        }
        set.insert(id);
    }
    Ok(set)
}

/// Errors from building or modifying a [`Model`]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Reaction `{0}` is not in the model")]
    UnknownReaction(String),
    #[error("Duplicate {kind} id `{id}`")]
    DuplicateId { kind: &'static str, id: String },
    #[error("Misaligned model: {what} has length {found}, expected {expected}")]
    Misaligned {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Reaction `{reaction}` has lower bound {lower} above its upper bound {upper}")]
    InvalidBounds {
        reaction: String,
        lower: f64,
        upper: f64,
    },
    #[error("Gene `{gene}` in the rule of reaction `{reaction}` is not in the model's gene list")]
    UnknownGene { reaction: String, gene: String },
    #[error("Could not parse the gene reaction rule of `{reaction}`: {source}")]
    InvalidGpr {
        reaction: String,
        source: GprParseError,
    },
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::metabolic_model::reaction::ReactionBuilder;

    /// Linear pathway `-> a -> b -> c ->` with a gene on each internal step
    pub(crate) fn linear_model() -> Model {
        let reactions = vec![
            ReactionBuilder::default()
                .id("EX_a")
                .metabolite("a", 1.)
                .bounds(0., 10.)
                .build()
                .unwrap(),
            ReactionBuilder::default()
                .id("R1")
                .metabolite("a", -1.)
                .metabolite("b", 1.)
                .bounds(0., 10.)
                .gene_reaction_rule("g1")
                .build()
                .unwrap(),
            ReactionBuilder::default()
                .id("R2")
                .metabolite("b", -1.)
                .metabolite("c", 1.)
                .bounds(0., 10.)
                .gene_reaction_rule("g2 and g3")
                .build()
                .unwrap(),
            ReactionBuilder::default()
                .id("EX_c")
                .metabolite("c", -1.)
                .bounds(0., 10.)
                .objective_coefficient(1.)
                .build()
                .unwrap(),
        ];
        Model::from_reactions(reactions, Vec::<String>::new()).unwrap()
    }

    #[test]
    fn from_reactions() {
        let model = linear_model();
        assert_eq!(model.num_reactions(), 4);
        assert_eq!(model.num_metabolites(), 3);
        assert_eq!(
            model.genes().iter().collect::<Vec<_>>(),
            vec!["g1", "g2", "g3"]
        );
        assert_eq!(model.stoichiometry().nnz(), 6);
        assert_eq!(model.objective(), &[0., 0., 0., 1.]);
        assert_eq!(model.reaction_index("R2"), Some(2));
    }

    #[test]
    fn explicit_genes_come_first() {
        let reaction = ReactionBuilder::default()
            .id("R1")
            .gene_reaction_rule("g2 or g1")
            .build()
            .unwrap();
        let model = Model::from_reactions(vec![reaction], vec!["g1", "g0"]).unwrap();
        assert_eq!(
            model.genes().iter().collect::<Vec<_>>(),
            vec!["g1", "g0", "g2"]
        );
    }

    #[test]
    fn invalid_gpr_names_reaction() {
        let reaction = ReactionBuilder::default()
            .id("BAD")
            .gene_reaction_rule("(g1 and g2")
            .build()
            .unwrap();
        match Model::from_reactions(vec![reaction], Vec::<String>::new()) {
            Err(ModelError::InvalidGpr { reaction, .. }) => assert_eq!(reaction, "BAD"),
            other => panic!("Expected an invalid gpr error, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_reaction() {
        let r = ReactionBuilder::default().id("R1").build().unwrap();
        assert_eq!(
            Model::from_reactions(vec![r.clone(), r], Vec::<String>::new()).unwrap_err(),
            ModelError::DuplicateId {
                kind: "reaction",
                id: "R1".to_string()
            }
        );
    }

    #[test]
    fn without_reaction_keeps_alignment() {
        let model = linear_model();
        let reduced = model.without_reaction("R1").unwrap();
        assert_eq!(
            reduced.reactions().iter().collect::<Vec<_>>(),
            vec!["EX_a", "R2", "EX_c"]
        );
        assert_eq!(reduced.stoichiometry().ncols(), 3);
        assert_eq!(reduced.stoichiometry().nrows(), 3);
        assert_eq!(reduced.stoichiometry().nnz(), 4);
        assert_eq!(reduced.objective(), &[0., 0., 1.]);
        assert_eq!(reduced.gene_reaction_rules()[1], "g2 and g3");
        // Column of R2 moved to index 1, and still consumes b (row 1)
        let column = reduced.stoichiometry().col(1);
        assert_eq!(column.row_indices(), &[1, 2]);
        assert_eq!(column.values(), &[-1., 1.]);
        // Original is untouched
        assert_eq!(model.num_reactions(), 4);
    }

    #[test]
    fn without_unknown_reaction() {
        assert_eq!(
            linear_model().without_reaction("nope").unwrap_err(),
            ModelError::UnknownReaction("nope".to_string())
        );
    }

    #[test]
    fn objective_updates() {
        let mut model = linear_model();
        model.set_objective(&["R1", "R2"]).unwrap();
        assert_eq!(model.objective(), &[0., 1., 1., 0.]);
        assert!(model.set_objective(&["R1", "missing"]).is_err());
        assert_eq!(model.objective(), &[0., 1., 1., 0.]);
        model.clear_objective();
        assert_eq!(model.objective(), &[0., 0., 0., 0.]);
    }

    #[test]
    fn from_parts_validates_alignment() {
        let model = linear_model();
        let parts = ModelParts {
            reactions: model.reactions().iter().cloned().collect(),
            metabolites: model.metabolites().iter().cloned().collect(),
            genes: model.genes().iter().cloned().collect(),
            stoichiometry: model.stoichiometry().clone(),
            lower_bounds: model.lower_bounds().to_vec(),
            upper_bounds: model.upper_bounds().to_vec(),
            objective: model.objective().to_vec(),
            gene_reaction_rules: model.gene_reaction_rules().to_vec(),
        };
        let rebuilt = Model::from_parts(parts.clone()).unwrap();
        assert_eq!(rebuilt, model);

        let mut short = parts.clone();
        short.upper_bounds.pop();
        assert_eq!(
            Model::from_parts(short).unwrap_err(),
            ModelError::Misaligned {
                what: "upper bounds",
                expected: 4,
                found: 3
            }
        );

        let mut missing_gene = parts;
        missing_gene.genes.retain(|g| g != "g3");
        assert_eq!(
            Model::from_parts(missing_gene).unwrap_err(),
            ModelError::UnknownGene {
                reaction: "R2".to_string(),
                gene: "g3".to_string()
            }
        );
    }
}
