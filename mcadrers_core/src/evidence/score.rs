//! Tri-state scores and the per-gene score vector
use crate::evidence::EvidenceError;
use indexmap::IndexMap;
use std::fmt::{Display, Formatter};

/// A confidence score which may be unknown
///
/// Unknown is kept distinct from zero: a gene without expression data has no evidence, which
/// isn't the same as evidence that it is absent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    /// A known score
    Defined(f64),
    /// No score is available
    Undefined,
}

impl Score {
    /// Conjunction (minimum), an undefined operand makes the result undefined
    pub fn and(self, other: Score) -> Score {
        match (self, other) {
            (Score::Defined(a), Score::Defined(b)) => Score::Defined(a.min(b)),
            _ => Score::Undefined,
        }
    }

    /// Disjunction (maximum), undefined operands are skipped and the result is only undefined
    /// if both operands are
    pub fn or(self, other: Score) -> Score {
        match (self, other) {
            (Score::Defined(a), Score::Defined(b)) => Score::Defined(a.max(b)),
            (Score::Defined(a), Score::Undefined) | (Score::Undefined, Score::Defined(a)) => {
                Score::Defined(a)
            }
            (Score::Undefined, Score::Undefined) => Score::Undefined,
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Score::Defined(v) => Some(v),
            Score::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Score::Defined(_))
    }

    /// Convert to a float, with undefined scores as NaN
    pub fn to_f64(self) -> f64 {
        self.value().unwrap_or(f64::NAN)
    }
}

impl From<Option<f64>> for Score {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Score::Defined(v),
            None => Score::Undefined,
        }
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Score::Defined(v) => write!(f, "{}", v),
            Score::Undefined => write!(f, "undefined"),
        }
    }
}

/// Confidence (e.g. ubiquity across samples) of each gene, in [0, 1]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeneScores {
    scores: IndexMap<String, f64>,
}

impl GeneScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(gene, score)` pairs
    ///
    /// # Examples
    /// ```rust
    /// use mcadrers_core::evidence::score::{GeneScores, Score};
    /// let scores = GeneScores::from_pairs([("g1", 0.5), ("g2", 1.0)]).unwrap();
    /// assert_eq!(scores.get("g1"), Score::Defined(0.5));
    /// assert_eq!(scores.get("g3"), Score::Undefined);
    /// assert!(GeneScores::from_pairs([("g1", 1.5)]).is_err());
    /// ```
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, EvidenceError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut scores = GeneScores::new();
        for (gene, score) in pairs {
            scores.insert(gene, score)?;
        }
        Ok(scores)
    }

    /// Add the score of a gene
    ///
    /// # Errors
    /// - [`EvidenceError::ScoreOutOfRange`] if `score` is NaN or outside [0, 1]
    /// - [`EvidenceError::DuplicateGene`] if the gene already has a score
    pub fn insert<S: Into<String>>(&mut self, gene: S, score: f64) -> Result<(), EvidenceError> {
        let gene = gene.into();
        if !(0. ..=1.).contains(&score) {
            return Err(EvidenceError::ScoreOutOfRange { gene, score });
        }
        if self.scores.contains_key(&gene) {
            return Err(EvidenceError::DuplicateGene(gene));
        }
        self.scores.insert(gene, score);
        Ok(())
    }

    /// Score of a gene, [`Score::Undefined`] if the gene has no score
    pub fn get(&self, gene: &str) -> Score {
        self.scores.get(gene).copied().into()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(g, s)| (g.as_str(), *s))
    }
}
