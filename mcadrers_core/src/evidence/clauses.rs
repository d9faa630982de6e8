//! Normalized clause tables for the gene reaction rules of a model
use crate::io::gpr_parse::{parse_gpr, GprParseError};
use crate::metabolic_model::gpr::Gpr;
use crate::metabolic_model::model::Model;

use indexmap::IndexMap;
use thiserror::Error;

/// A GPR rule in disjunctive normal form
///
/// Row `i` is the `i`th AND-clause, and its columns are the clause's genes. Rows are ragged,
/// [`ClauseTable::cell`] gives the rectangular view where missing members are `None`. An
/// empty table means the reaction has no associated genes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClauseTable {
    clauses: Vec<Vec<String>>,
}

impl ClauseTable {
    /// Normalize a parsed rule, `None` gives an empty table
    pub fn from_gpr(gpr: Option<&Gpr>) -> Self {
        ClauseTable {
            clauses: gpr.map(|g| g.to_clauses()).unwrap_or_default(),
        }
    }

    pub fn clauses(&self) -> &[Vec<String>] {
        &self.clauses
    }

    /// Whether the reaction has no genes assigned
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Number of members of the largest clause
    pub fn width(&self) -> usize {
        self.clauses.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Gene at `row`, `column`, `None` if that cell is empty
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.clauses
            .get(row)
            .and_then(|clause| clause.get(column))
            .map(String::as_str)
    }
}

/// Clause tables of every reaction, keyed (and ordered) by reaction id
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GprClauses {
    tables: IndexMap<String, ClauseTable>,
}

impl GprClauses {
    /// Parse the rule of every reaction in `model`
    ///
    /// # Errors
    /// - [`GprClauseError::Parse`] naming the first reaction whose rule is malformed
    /// - [`GprClauseError::UnknownGene`] if a rule uses a gene missing from the model gene list
    pub fn from_model(model: &Model) -> Result<Self, GprClauseError> {
        let clauses = GprClauses::from_rules(
            model
                .reactions()
                .iter()
                .zip(model.gene_reaction_rules())
                .map(|(r, rule)| (r.as_str(), rule.as_str())),
        )?;
        for (reaction, table) in &clauses.tables {
            for gene in table.clauses().iter().flatten() {
                if !model.genes().contains(gene) {
                    return Err(GprClauseError::UnknownGene {
                        reaction: reaction.clone(),
                        gene: gene.clone(),
                    });
                }
            }
        }
        Ok(clauses)
    }

    /// Parse `(reaction id, rule)` pairs
    ///
    /// # Examples
    /// ```rust
    /// use mcadrers_core::evidence::clauses::GprClauses;
    /// let clauses = GprClauses::from_rules([("R1", "(A) or (B) and (C)"), ("R2", "")]).unwrap();
    /// let table = clauses.get("R1").unwrap();
    /// assert_eq!(table.clauses(), &[vec!["A".to_string()], vec!["B".to_string(), "C".to_string()]]);
    /// assert!(clauses.get("R2").unwrap().is_empty());
    /// ```
    pub fn from_rules<I, R, G>(rules: I) -> Result<Self, GprClauseError>
    where
        I: IntoIterator<Item = (R, G)>,
        R: Into<String>,
        G: AsRef<str>,
    {
        let mut tables = IndexMap::new();
        for (reaction, rule) in rules {
            let reaction = reaction.into();
            let gpr = match parse_gpr(rule.as_ref()) {
                Ok(gpr) => gpr,
                Err(source) => return Err(GprClauseError::Parse { reaction, source }),
            };
            if tables.contains_key(&reaction) {
                return Err(GprClauseError::DuplicateReaction(reaction));
            }
            tables.insert(reaction, ClauseTable::from_gpr(gpr.as_ref()));
        }
        Ok(GprClauses { tables })
    }

    /// Reaction ids, in row order
    pub fn reactions(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn get(&self, reaction: &str) -> Option<&ClauseTable> {
        self.tables.get(reaction)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClauseTable)> {
        self.tables.iter().map(|(r, t)| (r.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Largest number of clauses of any reaction
    pub fn max_clauses(&self) -> usize {
        self.tables
            .values()
            .map(ClauseTable::num_clauses)
            .max()
            .unwrap_or(0)
    }
}

/// Errors from building [`GprClauses`]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GprClauseError {
    #[error("Could not parse the gene reaction rule of `{reaction}`: {source}")]
    Parse {
        reaction: String,
        source: GprParseError,
    },
    #[error("Gene `{gene}` in the rule of reaction `{reaction}` is not in the model's gene list")]
    UnknownGene { reaction: String, gene: String },
    #[error("Reaction `{0}` has more than one rule")]
    DuplicateReaction(String),
}
