use std::collections::HashMap;

use mcadrers_core::configuration::Configuration;
use mcadrers_core::consistency::check::ConsistencyChecker;
use mcadrers_core::consistency::reachability::ReachabilityMethod;
use mcadrers_core::evidence::calculate::HighConfidenceMask;
use mcadrers_core::evidence::clauses::GprClauses;
use mcadrers_core::evidence::score::GeneScores;
use mcadrers_core::metabolic_model::model::Model;
use mcadrers_core::optimize::solvers::clarabel::ClarabelSolver;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn value_error<E: std::fmt::Display>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// A metabolic model read from a COBRA JSON file
#[pyclass(name = "Model")]
struct PyModel {
    inner: Model,
}

#[pymethods]
impl PyModel {
    #[staticmethod]
    fn read_json(path: &str) -> PyResult<Self> {
        let inner = Model::read_json(path, &Configuration::default()).map_err(value_error)?;
        Ok(PyModel { inner })
    }

    #[staticmethod]
    fn from_json_str(data: &str) -> PyResult<Self> {
        let inner = Model::from_json_str(data, &Configuration::default()).map_err(value_error)?;
        Ok(PyModel { inner })
    }

    #[getter]
    fn id(&self) -> Option<String> {
        self.inner.id.clone()
    }

    #[getter]
    fn reactions(&self) -> Vec<String> {
        self.inner.reactions().iter().cloned().collect()
    }

    #[getter]
    fn genes(&self) -> Vec<String> {
        self.inner.genes().iter().cloned().collect()
    }

    fn __len__(&self) -> usize {
        self.inner.num_reactions()
    }
}

/// Normalize `(reaction, rule)` pairs into lists of AND-clauses
#[pyfunction]
fn gpr_clauses(rules: Vec<(String, String)>) -> PyResult<Vec<(String, Vec<Vec<String>>)>> {
    let clauses = GprClauses::from_rules(rules).map_err(value_error)?;
    Ok(clauses
        .iter()
        .map(|(reaction, table)| (reaction.to_string(), table.clauses().to_vec()))
        .collect())
}

/// Evidence of every reaction of `model`, in reaction order, with NaN for undefined evidence
#[pyfunction]
#[pyo3(signature = (model, gene_scores, core = None))]
fn reaction_evidence(
    model: &PyModel,
    gene_scores: HashMap<String, f64>,
    core: Option<Vec<String>>,
) -> PyResult<Vec<f64>> {
    let gene_scores = GeneScores::from_pairs(gene_scores).map_err(value_error)?;
    let mask = match core {
        Some(core) => HighConfidenceMask::from_reactions(&model.inner, &core),
        None => Ok(HighConfidenceMask::none(&model.inner)),
    }
    .map_err(value_error)?;
    let evidence = mcadrers_core::evidence::calculate::reaction_evidence(
        &model.inner,
        &gene_scores,
        &mask,
        &Configuration::default(),
    )
    .map_err(value_error)?;
    Ok(evidence.to_f64_vec())
}

/// Check `model` with `candidate` removed
///
/// Returns the outcome code (1 or 2), the inactive reactions and the elapsed time in seconds.
#[pyfunction]
#[pyo3(signature = (model, candidate, core, structural_check = true, exhaustive = false))]
fn check_model_consistency(
    model: &PyModel,
    candidate: Option<String>,
    core: Vec<String>,
    structural_check: bool,
    exhaustive: bool,
) -> PyResult<(u8, Vec<String>, f64)> {
    let method = if exhaustive {
        ReachabilityMethod::Exhaustive
    } else {
        ReachabilityMethod::Heuristic
    };
    let checker = ConsistencyChecker::new(ClarabelSolver::new(), Configuration::default())
        .with_structural_check(structural_check)
        .with_method(method);
    let report = checker
        .check(&model.inner, candidate.as_deref(), &core)
        .map_err(value_error)?;
    Ok((
        report.outcome.code(),
        report.inactive,
        report.elapsed.as_secs_f64(),
    ))
}

/// A Python module implemented in Rust. The name of this function must match
/// the `lib.name` setting in the `Cargo.toml`, else Python will not be able to
/// import the module.
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(gpr_clauses, m)?)?;
    m.add_function(wrap_pyfunction!(reaction_evidence, m)?)?;
    m.add_function(wrap_pyfunction!(check_model_consistency, m)?)?;
    m.add_class::<PyModel>()?;
    Ok(())
}
