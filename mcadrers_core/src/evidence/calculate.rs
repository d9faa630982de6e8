//! Final per-reaction evidence from clause scores and the high confidence core
use crate::configuration::Configuration;
use crate::evidence::clauses::GprClauses;
use crate::evidence::combine::{combine_clause_scores, ClauseScores, ReactionClauseScores};
use crate::evidence::score::{GeneScores, Score};
use crate::evidence::EvidenceError;
use crate::metabolic_model::model::Model;

use indexmap::IndexSet;
use tracing::debug;

/// Reactions of a model which belong to the trusted high confidence core
#[derive(Clone, Debug, PartialEq)]
pub struct HighConfidenceMask {
    mask: Vec<bool>,
}

impl HighConfidenceMask {
    /// Mask with no reaction in the core
    pub fn none(model: &Model) -> Self {
        HighConfidenceMask {
            mask: vec![false; model.num_reactions()],
        }
    }

    /// Mask index aligned with the reactions of `model`
    pub fn from_vec(model: &Model, mask: Vec<bool>) -> Result<Self, EvidenceError> {
        if mask.len() != model.num_reactions() {
            return Err(EvidenceError::MaskMisaligned {
                expected: model.num_reactions(),
                found: mask.len(),
            });
        }
        Ok(HighConfidenceMask { mask })
    }

    /// Mask from a list of core reaction ids
    pub fn from_reactions<S: AsRef<str>>(
        model: &Model,
        reactions: &[S],
    ) -> Result<Self, EvidenceError> {
        let mut mask = HighConfidenceMask::none(model);
        for reaction in reactions {
            let reaction = reaction.as_ref();
            let index = model
                .reaction_index(reaction)
                .ok_or_else(|| EvidenceError::UnknownReaction(reaction.to_string()))?;
            mask.mask[index] = true;
        }
        Ok(mask)
    }

    /// Whether the reaction at `index` is in the core
    pub fn contains(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }
}

/// Evidence of every reaction, in the model's reaction order
#[derive(Clone, Debug, PartialEq)]
pub struct Evidence {
    reactions: IndexSet<String>,
    values: Vec<Score>,
}

impl Evidence {
    pub fn reactions(&self) -> &IndexSet<String> {
        &self.reactions
    }

    pub fn values(&self) -> &[Score] {
        &self.values
    }

    /// Evidence of a single reaction
    pub fn get(&self, reaction: &str) -> Option<Score> {
        self.reactions
            .get_index_of(reaction)
            .map(|index| self.values[index])
    }

    /// Evidence as floats, undefined evidence is NaN
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.values.iter().map(|s| s.to_f64()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Score)> {
        self.reactions
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Compute the evidence of every reaction in `model`
///
/// - A gene associated reaction gets the maximum of its defined clause scores, or
///   [`Score::Undefined`] if none of its clauses are defined
/// - A reaction without genes gets 0
/// - A reaction in `mask` gets exactly 1
/// - A zero from either of the first two rules becomes [`Configuration::evidence_sentinel`]
/// - A reaction missing from `clause_scores` gets exactly 0 (or 1 if masked)
///
/// # Errors
/// [`EvidenceError::MaskMisaligned`] if the mask isn't aligned with the model reactions
pub fn calculate_evidence(
    model: &Model,
    clause_scores: &ClauseScores,
    mask: &HighConfidenceMask,
    configuration: &Configuration,
) -> Result<Evidence, EvidenceError> {
    if mask.len() != model.num_reactions() {
        return Err(EvidenceError::MaskMisaligned {
            expected: model.num_reactions(),
            found: mask.len(),
        });
    }
    let sentinel = Score::Defined(configuration.evidence_sentinel());
    let mut untouched = 0usize;
    let values = model
        .reactions()
        .iter()
        .enumerate()
        .map(|(index, reaction)| {
            let computed = match clause_scores.get(reaction) {
                None => {
                    untouched += 1;
                    return if mask.contains(index) {
                        Score::Defined(1.)
                    } else {
                        Score::Defined(0.)
                    };
                }
                Some(ReactionClauseScores::NoGenes) => Score::Defined(0.),
                Some(ReactionClauseScores::Clauses(scores)) => scores
                    .iter()
                    .fold(Score::Undefined, |acc, score| acc.or(*score)),
            };
            if mask.contains(index) {
                Score::Defined(1.)
            } else if computed == Score::Defined(0.) {
                sentinel
            } else {
                computed
            }
        })
        .collect::<Vec<_>>();
    debug!(
        reactions = values.len(),
        untouched,
        undefined = values.iter().filter(|s| !s.is_defined()).count(),
        "Calculated reaction evidence"
    );
    Ok(Evidence {
        reactions: model.reactions().clone(),
        values,
    })
}

/// Parse the rules of `model`, combine `gene_scores` through them and calculate the evidence
///
/// # Examples
/// ```rust
/// use mcadrers_core::configuration::Configuration;
/// use mcadrers_core::evidence::calculate::{reaction_evidence, HighConfidenceMask};
/// use mcadrers_core::evidence::score::{GeneScores, Score};
/// use mcadrers_core::metabolic_model::model::Model;
/// use mcadrers_core::metabolic_model::reaction::ReactionBuilder;
/// let reaction = ReactionBuilder::default()
///     .id("R1")
///     .gene_reaction_rule("(A) or (B) and (C)")
///     .build()
///     .unwrap();
/// let model = Model::from_reactions(vec![reaction], Vec::<String>::new()).unwrap();
/// let genes = GeneScores::from_pairs([("A", 0.2), ("B", 0.3), ("C", 0.4)]).unwrap();
/// let evidence = reaction_evidence(
///     &model,
///     &genes,
///     &HighConfidenceMask::none(&model),
///     &Configuration::default(),
/// )
/// .unwrap();
/// assert_eq!(evidence.get("R1"), Some(Score::Defined(0.3)));
/// ```
pub fn reaction_evidence(
    model: &Model,
    gene_scores: &GeneScores,
    mask: &HighConfidenceMask,
    configuration: &Configuration,
) -> Result<Evidence, EvidenceError> {
    let clauses = GprClauses::from_model(model)?;
    let clause_scores = combine_clause_scores(&clauses, gene_scores);
    calculate_evidence(model, &clause_scores, mask, configuration)
}
