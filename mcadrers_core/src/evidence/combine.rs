//! Combine gene scores through the clause tables into per-clause scores
use crate::evidence::clauses::GprClauses;
use crate::evidence::score::{GeneScores, Score};

use indexmap::IndexMap;
use nalgebra::DMatrix;

/// Clause scores of a single reaction
#[derive(Clone, Debug, PartialEq)]
pub enum ReactionClauseScores {
    /// The reaction has no genes assigned
    NoGenes,
    /// One score per AND-clause, in clause order
    Clauses(Vec<Score>),
}

/// Per-clause scores of every reaction in a [`GprClauses`] collection
///
/// Rows follow the reaction order of the clause collection. The rectangular view is
/// [`ClauseScores::width`] columns wide, where cells past the end of a reaction's clauses are
/// not applicable (`None` from [`ClauseScores::cell`], NaN in [`ClauseScores::to_matrix`]).
#[derive(Clone, Debug, PartialEq)]
pub struct ClauseScores {
    scores: IndexMap<String, ReactionClauseScores>,
    width: usize,
}

impl ClauseScores {
    /// Maximum number of clauses of any reaction
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn reactions(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    pub fn get(&self, reaction: &str) -> Option<&ReactionClauseScores> {
        self.scores.get(reaction)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ReactionClauseScores)> {
        self.scores.iter().map(|(r, s)| (r.as_str(), s))
    }

    /// Score in the rectangular view, `None` for cells which don't correspond to a clause
    /// (including every cell of a reaction without genes)
    pub fn cell(&self, row: usize, column: usize) -> Option<Score> {
        match self.scores.get_index(row) {
            Some((_, ReactionClauseScores::Clauses(scores))) => scores.get(column).copied(),
            _ => None,
        }
    }

    /// Dense matrix of the rectangular view, both undefined and not applicable cells are NaN
    pub fn to_matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.scores.len(), self.width, |row, column| {
            self.cell(row, column).map(Score::to_f64).unwrap_or(f64::NAN)
        })
    }
}

/// Score every clause of every reaction
///
/// A clause scores the minimum of its genes' scores. A gene missing from `gene_scores` makes
/// its clause [`Score::Undefined`] rather than zero.
///
/// # Examples
/// ```rust
/// use mcadrers_core::evidence::clauses::GprClauses;
/// use mcadrers_core::evidence::combine::{combine_clause_scores, ReactionClauseScores};
/// use mcadrers_core::evidence::score::{GeneScores, Score};
/// let clauses = GprClauses::from_rules([("R1", "(A) or (B) and (C)")]).unwrap();
/// let genes = GeneScores::from_pairs([("A", 0.2), ("B", 0.3), ("C", 0.4)]).unwrap();
/// let scores = combine_clause_scores(&clauses, &genes);
/// assert_eq!(
///     scores.get("R1"),
///     Some(&ReactionClauseScores::Clauses(vec![Score::Defined(0.2), Score::Defined(0.3)]))
/// );
/// ```
pub fn combine_clause_scores(clauses: &GprClauses, gene_scores: &GeneScores) -> ClauseScores {
    let scores = clauses
        .iter()
        .map(|(reaction, table)| {
            let scores = if table.is_empty() {
                ReactionClauseScores::NoGenes
            } else {
                ReactionClauseScores::Clauses(
                    table
                        .clauses()
                        .iter()
                        .map(|clause| clause_score(clause, gene_scores))
                        .collect(),
                )
            };
            (reaction.to_string(), scores)
        })
        .collect();
    ClauseScores {
        scores,
        width: clauses.max_clauses(),
    }
}

/// Minimum over the genes of a clause
fn clause_score(clause: &[String], gene_scores: &GeneScores) -> Score {
    let mut genes = clause.iter().map(|g| gene_scores.get(g));
    match genes.next() {
        Some(first) => genes.fold(first, Score::and),
        None => Score::Undefined,
    }
}
