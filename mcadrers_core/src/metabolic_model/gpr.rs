//! Gene Protein Reaction rules represented as an AST, and their conversion into
//! disjunctive normal form (an OR of AND-clauses)
use std::fmt::{Display, Formatter};

/// Representation of a Gene Protein Reaction Rule as an AST
///
/// Operation nodes are n-ary, and the constructors [`Gpr::new_and`] and [`Gpr::new_or`] flatten
/// directly nested operations of the same kind, so `(a and b) and c` is a single `And` node
/// with three children.
#[derive(Clone, Debug, PartialEq)]
pub enum Gpr {
    /// A terminal gene node, holding the gene id
    Gene(String),
    /// All children are required
    And(Vec<Gpr>),
    /// Any one of the children is sufficient
    Or(Vec<Gpr>),
}

impl Gpr {
    /// Create a new gene node
    pub fn new_gene_node(gene: &str) -> Gpr {
        Gpr::Gene(gene.to_string())
    }

    /// Create a conjunction of `children`, a single child is returned unchanged
    pub fn new_and(children: Vec<Gpr>) -> Gpr {
        Self::new_operation(children, true)
    }

    /// Create a disjunction of `children`, a single child is returned unchanged
    pub fn new_or(children: Vec<Gpr>) -> Gpr {
        Self::new_operation(children, false)
    }

    fn new_operation(children: Vec<Gpr>, conjunction: bool) -> Gpr {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child {
                Gpr::And(inner) if conjunction => flat.extend(inner),
                Gpr::Or(inner) if !conjunction => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        if conjunction {
            Gpr::And(flat)
        } else {
            Gpr::Or(flat)
        }
    }

    /// Unique gene ids in the rule, in order of first appearance
    pub fn genes(&self) -> Vec<&str> {
        let mut genes = Vec::new();
        self.collect_genes(&mut genes);
        genes
    }

    fn collect_genes<'a>(&'a self, genes: &mut Vec<&'a str>) {
        match self {
            Gpr::Gene(id) => {
                if !genes.contains(&id.as_str()) {
                    genes.push(id.as_str())
                }
            }
            Gpr::And(children) | Gpr::Or(children) => {
                children.iter().for_each(|c| c.collect_genes(genes))
            }
        }
    }

    /// Expand the rule into disjunctive normal form
    ///
    /// Each inner vector is one AND-clause, the outer vector is their disjunction. AND nodes are
    /// distributed over their OR children, so `a and (b or c)` becomes `[[a, b], [a, c]]`.
    /// Clause order follows the order of the rule, and repeated genes are kept.
    pub fn to_clauses(&self) -> Vec<Vec<String>> {
        match self {
            Gpr::Gene(id) => vec![vec![id.clone()]],
            Gpr::Or(children) => children.iter().flat_map(|c| c.to_clauses()).collect(),
            Gpr::And(children) => {
                let mut clauses: Vec<Vec<String>> = vec![Vec::new()];
                for child in children {
                    let child_clauses = child.to_clauses();
                    clauses = clauses
                        .iter()
                        .flat_map(|prefix| {
                            child_clauses.iter().map(move |suffix| {
                                let mut clause = prefix.clone();
                                clause.extend(suffix.iter().cloned());
                                clause
                            })
                        })
                        .collect();
                }
                clauses
            }
        }
    }

    /// Generate a GPR string with gene ids from the GPR AST
    pub fn to_string_id(&self) -> String {
        match self {
            Gpr::Gene(id) => id.clone(),
            Gpr::And(children) => Self::join(children, " and "),
            Gpr::Or(children) => Self::join(children, " or "),
        }
    }

    fn join(children: &[Gpr], operator: &str) -> String {
        let inner = children
            .iter()
            .map(|c| c.to_string_id())
            .collect::<Vec<_>>()
            .join(operator);
        format!("({})", inner)
    }
}

impl Display for Gpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene(id: &str) -> Gpr {
        Gpr::new_gene_node(id)
    }

    fn clauses(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|c| c.iter().map(|g| g.to_string()).collect())
            .collect()
    }

    #[test]
    fn single_child_collapses() {
        assert_eq!(Gpr::new_and(vec![gene("a")]), gene("a"));
        assert_eq!(Gpr::new_or(vec![gene("a")]), gene("a"));
    }

    #[test]
    fn nested_operations_flatten() {
        let inner = Gpr::new_and(vec![gene("a"), gene("b")]);
        let outer = Gpr::new_and(vec![inner, gene("c")]);
        assert_eq!(outer, Gpr::And(vec![gene("a"), gene("b"), gene("c")]));

        // Different operators are not merged
        let inner = Gpr::new_or(vec![gene("a"), gene("b")]);
        let outer = Gpr::new_and(vec![inner.clone(), gene("c")]);
        assert_eq!(outer, Gpr::And(vec![inner, gene("c")]));
    }

    #[test]
    fn gene_clause() {
        assert_eq!(gene("Rv0001").to_clauses(), clauses(&[&["Rv0001"]]));
    }

    #[test]
    fn or_of_and_is_unchanged() {
        let gpr = Gpr::new_or(vec![gene("a"), Gpr::new_and(vec![gene("b"), gene("c")])]);
        assert_eq!(gpr.to_clauses(), clauses(&[&["a"], &["b", "c"]]));
    }

    #[test]
    fn and_distributes_over_or() {
        let gpr = Gpr::new_and(vec![
            gene("a"),
            Gpr::new_or(vec![gene("b"), gene("c")]),
        ]);
        assert_eq!(gpr.to_clauses(), clauses(&[&["a", "b"], &["a", "c"]]));

        let gpr = Gpr::new_and(vec![
            Gpr::new_or(vec![gene("a"), gene("b")]),
            Gpr::new_or(vec![gene("c"), gene("d")]),
        ]);
        assert_eq!(
            gpr.to_clauses(),
            clauses(&[&["a", "c"], &["a", "d"], &["b", "c"], &["b", "d"]])
        );
    }

    #[test]
    fn duplicates_are_preserved() {
        let gpr = Gpr::new_and(vec![
            gene("a"),
            Gpr::new_or(vec![gene("a"), gene("b")]),
        ]);
        assert_eq!(gpr.to_clauses(), clauses(&[&["a", "a"], &["a", "b"]]));
    }

    #[test]
    fn genes_are_unique() {
        let gpr = Gpr::new_or(vec![
            Gpr::new_and(vec![gene("a"), gene("b")]),
            Gpr::new_and(vec![gene("a"), gene("c")]),
        ]);
        assert_eq!(gpr.genes(), vec!["a", "b", "c"]);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", gene("Active1")), "Active1");
        let gpr = Gpr::new_or(vec![
            Gpr::new_and(vec![gene("Rv0001"), gene("Rv0002")]),
            gene("Rv0003"),
        ]);
        assert_eq!(format!("{}", gpr), "((Rv0001 and Rv0002) or Rv0003)");
    }
}
