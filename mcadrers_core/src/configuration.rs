//! Settings shared by model construction, evidence calculation and the solver
//!
//! A [`Configuration`] is created once by the caller and passed by reference to the operations
//! which need it, there is no process wide configuration.

/// Default lower flux bound for reactions without an explicit bound
pub const DEFAULT_LOWER_BOUND: f64 = -1000.;
/// Default upper flux bound for reactions without an explicit bound
pub const DEFAULT_UPPER_BOUND: f64 = 1000.;
/// Flux magnitude above which a reaction is considered active
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Configuration for building and checking models
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Lower bound used for reactions which don't specify one (or specify -inf)
    pub lower_bound: f64,
    /// Upper bound used for reactions which don't specify one (or specify +inf)
    pub upper_bound: f64,
    /// Any flux with magnitude greater than this is considered non-zero
    pub tolerance: f64,
    /// Magnitude of the negative sentinel given to reactions with exactly zero evidence
    ///
    /// Kept equal to [`Configuration::tolerance`] by default.
    pub evidence_epsilon: f64,
    /// Settings handed to the LP solver on every solve
    pub solver: SolverSettings,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            tolerance: DEFAULT_TOLERANCE,
            evidence_epsilon: DEFAULT_TOLERANCE,
            solver: SolverSettings::default(),
        }
    }
}

impl Configuration {
    /// Value assigned to reactions whose evidence would otherwise be exactly zero
    pub fn evidence_sentinel(&self) -> f64 {
        -self.evidence_epsilon.abs()
    }
}

/// Settings for the Clarabel interior point solver
#[derive(Clone, Debug, PartialEq)]
pub struct SolverSettings {
    /// Print solver progress to stdout
    pub verbose: bool,
    /// Maximum number of interior point iterations
    pub max_iter: u32,
    /// Maximum time for a single solve in seconds (infinite by default)
    pub time_limit: f64,
    /// Feasibility tolerance
    pub tol_feas: f64,
    /// Absolute duality gap tolerance
    pub tol_gap_abs: f64,
    /// Relative duality gap tolerance
    pub tol_gap_rel: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            verbose: false,
            max_iter: 200,
            time_limit: f64::INFINITY,
            tol_feas: 1e-9,
            tol_gap_abs: 1e-9,
            tol_gap_rel: 1e-9,
        }
    }
}
