//! Solver parameter names and defaults.

pub const METHOD               : &str = "Method";
pub const PRESOLVE             : &str = "Presolve";
pub const DUALIZATION          : &str = "Dualization";
pub const NUM_THREADS          : &str = "NumThreads";
pub const ENABLE_NETWORK_FLOW  : &str = "EnableNetworkFlow";
pub const ENABLE_STOCHASTIC_LP : &str = "EnableStochasticLP";
pub const SPX_COLUMN_GENERATION: &str = "SPX/ColumnGeneration";
pub const SPX_CRASH_START      : &str = "SPX/CrashStart";
pub const SPX_MAX_ITERATIONS   : &str = "SPX/MaxIterations";
pub const SPX_PRIMAL_PRICING   : &str = "SPX/PrimalPricing";
pub const SPX_DUAL_PRICING     : &str = "SPX/DualPricing";
pub const IPM_MAX_ITERATIONS   : &str = "IPM/MaxIterations";
pub const MIP_MAX_NODES        : &str = "MIP/MaxNodes";
pub const MIP_ROOT_PARALLELISM : &str = "MIP/RootParallelism";

pub const MAX_TIME             : &str = "MaxTime";
pub const SPX_PRIMAL_TOLERANCE : &str = "SPX/PrimalTolerance";
pub const SPX_DUAL_TOLERANCE   : &str = "SPX/DualTolerance";
pub const IPM_PRIMAL_TOLERANCE : &str = "IPM/PrimalTolerance";
pub const IPM_DUAL_TOLERANCE   : &str = "IPM/DualTolerance";
pub const IPM_GAP_TOLERANCE    : &str = "IPM/GapTolerance";
pub const MIP_INTEGER_TOLERANCE: &str = "MIP/IntegerTolerance";
pub const MIP_OBJECTIVE_TOLERANCE : &str = "MIP/ObjectiveTolerance";
pub const MIP_GAP_ABS          : &str = "MIP/GapAbs";
pub const MIP_GAP_REL          : &str = "MIP/GapRel";

pub const REMOTE_TOKEN         : &str = "Remote/Token";
pub const REMOTE_DESC          : &str = "Remote/Desc";
pub const REMOTE_SERVER        : &str = "Remote/Server";
pub const REMOTE_FILE_MODEL    : &str = "Remote/File/Model";
pub const REMOTE_FILE_PARAM    : &str = "Remote/File/Param";
pub const REMOTE_FILE_SOLN     : &str = "Remote/File/Soln";
pub const REMOTE_FILE_PATH     : &str = "Remote/File/Path";

/// Values of the `Method` parameter.
pub mod method {
    pub const AUTO          : i32 = -1;
    pub const PRIMAL_SIMPLEX: i32 = 0;
    pub const DUAL_SIMPLEX  : i32 = 1;
    pub const INTERIOR_POINT: i32 = 2;
}

/// A typed parameter value.
#[derive(Clone,Debug,PartialEq)]
pub enum ParamValue {
    Int(i32),
    Real(f64),
    Str(String),
}

/// All known parameters with their default values.
pub fn defaults() -> Vec<(&'static str,ParamValue)> {
    use ParamValue::*;
    vec![
        (METHOD,                 Int(method::AUTO)),
        (PRESOLVE,               Int(-1)),
        (DUALIZATION,            Int(-1)),
        (NUM_THREADS,            Int(0)),
        (ENABLE_NETWORK_FLOW,    Int(0)),
        (ENABLE_STOCHASTIC_LP,   Int(0)),
        (SPX_COLUMN_GENERATION,  Int(0)),
        (SPX_CRASH_START,        Int(0)),
        (SPX_MAX_ITERATIONS,     Int(i32::MAX)),
        (SPX_PRIMAL_PRICING,     Int(-1)),
        (SPX_DUAL_PRICING,       Int(-1)),
        (IPM_MAX_ITERATIONS,     Int(500)),
        (MIP_MAX_NODES,          Int(-1)),
        (MIP_ROOT_PARALLELISM,   Int(-1)),

        (MAX_TIME,               Real(crate::attr::INFINITY)),
        (SPX_PRIMAL_TOLERANCE,   Real(1e-6)),
        (SPX_DUAL_TOLERANCE,     Real(1e-6)),
        (IPM_PRIMAL_TOLERANCE,   Real(1e-8)),
        (IPM_DUAL_TOLERANCE,     Real(1e-8)),
        (IPM_GAP_TOLERANCE,      Real(1e-8)),
        (MIP_INTEGER_TOLERANCE,  Real(1e-6)),
        (MIP_OBJECTIVE_TOLERANCE,Real(1e-6)),
        (MIP_GAP_ABS,            Real(1e-6)),
        (MIP_GAP_REL,            Real(1e-4)),

        (REMOTE_TOKEN,           Str(String::new())),
        (REMOTE_DESC,            Str(String::new())),
        (REMOTE_SERVER,          Str(String::new())),
        (REMOTE_FILE_MODEL,      Str(String::new())),
        (REMOTE_FILE_PARAM,      Str(String::new())),
        (REMOTE_FILE_SOLN,       Str(String::new())),
        (REMOTE_FILE_PATH,       Str(String::new())),
    ]
}
