//! Result codes, model status codes and remote task states reported by the engine.

use std::fmt;
use std::str::FromStr;

macro_rules! result_codes {
    ($( $(#[$m:meta])* $variant:ident = $code:literal, $name:expr, $desc:expr; )+) => {
        /// Result code of an engine call. `Okay` is the only success value.
        #[derive(Clone,Copy,PartialEq,Eq,Hash,Debug)]
        pub enum ResultCode {
            $( $(#[$m])* $variant, )+
        }

        impl ResultCode {
            /// Numeric result code.
            pub fn code(self) -> i32 {
                match self { $( ResultCode::$variant => $code, )+ }
            }
            /// Canonical name, e.g. `MDO_NO_SOLN`.
            pub fn name(self) -> &'static str {
                match self { $( ResultCode::$variant => $name, )+ }
            }
            /// Short description of the code.
            pub fn description(self) -> &'static str {
                match self { $( ResultCode::$variant => $desc, )+ }
            }
            /// Look up a numeric code. Returns `None` for codes outside the closed set.
            pub fn from_code(code : i32) -> Option<ResultCode> {
                match code {
                    $( $code => Some(ResultCode::$variant), )+
                    _ => None
                }
            }
            /// All known result codes.
            pub fn all() -> &'static [ResultCode] {
                &[ $( ResultCode::$variant, )+ ]
            }
        }
    }
}

result_codes! {
    Okay                   =      0, "MDO_OKAY",                       "Nothing wrong";
    Error                  =     -1, "MDO_ERROR",                      "Unspecified internal error";
    NoMemory               =     -2, "MDO_NOMEMORY",                   "Insufficient memory";
    InvalidLicense         =    -10, "MDO_INVALID_LICENSE",            "License is not valid";
    HomeEnvNotFound        =    -11, "MDO_HOME_ENV_NOT_FOUND",         "Home environment variable not found";
    LibFolderNotFound      =    -12, "MDO_LIB_FOLDER_NOT_FOUND",       "Library folder not found";
    IoError                =  -1000, "MDO_IO_ERROR",                   "General IO error";
    FileReadError          =  -1001, "MDO_FILE_READ_ERROR",            "Failed to read data from file";
    FileWriteError         =  -1002, "MDO_FILE_WRITE_ERROR",           "Failed to write data to file";
    DirectoryError         =  -1003, "MDO_DIRECTORY_ERROR",            "Invalid directory";
    FormatError            =  -1100, "MDO_FORMAT_ERROR",               "Failed to parse the file";
    VersionError           =  -1101, "MDO_VERSION_ERROR",              "Incompatible file version";
    RemoteInvalidToken     =  -1200, "MDO_REMOTE_INVALID_TOKEN",       "The remote access token is not valid";
    RemoteConnectionError  =  -1201, "MDO_REMOTE_CONNECTION_ERROR",    "Failed to connect to the remote server";
    ModelInputError        =  -2000, "MDO_MODEL_INPUT_ERROR",          "Failed to input or load a model";
    ModelEmpty             =  -2001, "MDO_MODEL_EMPTY",                "Model is empty";
    ModelInvalidRowIdx     =  -2002, "MDO_MODEL_INVALID_ROW_IDX",      "Row index is not valid";
    ModelInvalidColIdx     =  -2003, "MDO_MODEL_INVALID_COL_IDX",      "Column index is not valid";
    ModelInvalidRowName    =  -2004, "MDO_MODEL_INVALID_ROW_NAME",     "Row name is not valid";
    ModelInvalidColName    =  -2005, "MDO_MODEL_INVALID_COL_NAME",     "Column name is not valid";
    ModelInvalidStrAttr    =  -2010, "MDO_MODEL_INVALID_STR_ATTR",     "A string attribute was not recognized";
    ModelInvalidIntAttr    =  -2011, "MDO_MODEL_INVALID_INT_ATTR",     "An integer attribute was not recognized";
    ModelInvalidRealAttr   =  -2012, "MDO_MODEL_INVALID_REAL_ATTR",    "A real attribute was not recognized";
    NoSoln                 =  -3000, "MDO_NO_SOLN",                    "Solution is not available";
    NoRay                  =  -3001, "MDO_NO_RAY",                     "Unbounded ray is not available";
    NoStatistics           =  -3002, "MDO_NO_STATISTICS",              "Solver statistics are not available";
    InvalidBasisStatus     =  -3003, "MDO_INVALID_BASIS_STATUS",       "Unrecognized basis status";
    ParamSetError          =  -4000, "MDO_PARAM_SET_ERROR",            "Failed to change a parameter value";
    ParamGetError          =  -4001, "MDO_PARAM_GET_ERROR",            "Failed to retrieve a parameter value";
    AbortIterationLimit    =  -9000, "MDO_ABORT_ITERATION_LIMIT",      "Iteration limit was reached";
    AbortTimeLimit         =  -9001, "MDO_ABORT_TIME_LIMIT",           "Time limit was reached";
    AbortCtrlC             =  -9002, "MDO_ABORT_CTRL_C",               "Interrupted by Control-C";
    AbortNodeLimit         =  -9003, "MDO_ABORT_NODE_LIMIT",           "Node limit was reached";
    AbortStallingNodeLimit =  -9004, "MDO_ABORT_STALLING_NODE_LIMIT",  "Stalling node limit was reached";
    AbortInvalidMethod     =  -9011, "MDO_ABORT_INVALID_METHOD",       "Selected optimization method is not supported";
    AbortSolverNotAvailable=  -9012, "MDO_ABORT_SOLVER_NOT_AVAILABLE", "Optimization solver is not available for the input model";
    SimplexNumeric         = -10000, "MDO_SIMPLEX_NUMERIC",            "Numerical difficulties in the simplex algorithm";
    InteriorNumeric        = -20000, "MDO_INTERIOR_NUMERIC",           "Numerical difficulties in the interior point algorithm";
}

impl ResultCode {
    pub fn is_ok(self) -> bool { self == ResultCode::Okay }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"{}",self.name())
    }
}

/// Model status after a solve.
#[derive(Clone,Copy,PartialEq,Eq,Hash,Debug,Default)]
pub enum Status {
    #[default]
    Unknown,
    Optimal,
    Infeasible,
    Unbounded,
    InfeasibleOrUnbounded,
    SubOptimal,
}

impl Status {
    pub fn code(self) -> i32 {
        match self {
            Status::Unknown               => 0,
            Status::Optimal               => 1,
            Status::Infeasible            => 2,
            Status::Unbounded             => 3,
            Status::InfeasibleOrUnbounded => 4,
            Status::SubOptimal            => 5,
        }
    }

    pub fn from_code(code : i32) -> Option<Status> {
        match code {
            0 => Some(Status::Unknown),
            1 => Some(Status::Optimal),
            2 => Some(Status::Infeasible),
            3 => Some(Status::Unbounded),
            4 => Some(Status::InfeasibleOrUnbounded),
            5 => Some(Status::SubOptimal),
            _ => None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Status::Unknown               => "MDO_UNKNOWN",
            Status::Optimal               => "MDO_OPTIMAL",
            Status::Infeasible            => "MDO_INFEASIBLE",
            Status::Unbounded             => "MDO_UNBOUNDED",
            Status::InfeasibleOrUnbounded => "MDO_INF_OR_UBD",
            Status::SubOptimal            => "MDO_SUB_OPTIMAL",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Status::Unknown               => "Model status is not available",
            Status::Optimal               => "Model was proven to be primal/dual feasible, and an optimal solution is available",
            Status::Infeasible            => "Model was proven to be primal infeasible",
            Status::Unbounded             => "Model was proven to be primal unbounded",
            Status::InfeasibleOrUnbounded => "Model was proven to be either primal infeasible or primal unbounded",
            Status::SubOptimal            => "A sub-optimal solution is available",
        }
    }
}

/// Lifecycle state of a job submitted for remote solving.
#[derive(Clone,Copy,PartialEq,Eq,Hash,Debug)]
pub enum RemoteTaskStatus {
    Submitted,
    Solving,
    Canceled,
    Finished,
    Failed,
}

impl RemoteTaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteTaskStatus::Submitted => "Submitted",
            RemoteTaskStatus::Solving   => "Solving",
            RemoteTaskStatus::Canceled  => "Canceled",
            RemoteTaskStatus::Finished  => "Finished",
            RemoteTaskStatus::Failed    => "Failed",
        }
    }

    /// Returns `true` if the job will not change state anymore.
    pub fn is_terminal(self) -> bool {
        matches!(self,RemoteTaskStatus::Canceled|RemoteTaskStatus::Finished|RemoteTaskStatus::Failed)
    }
}

impl FromStr for RemoteTaskStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Submitted" => Ok(RemoteTaskStatus::Submitted),
            "Solving"   => Ok(RemoteTaskStatus::Solving),
            "Canceled"  => Ok(RemoteTaskStatus::Canceled),
            "Finished"  => Ok(RemoteTaskStatus::Finished),
            "Failed"    => Ok(RemoteTaskStatus::Failed),
            _ => Err(format!("Unknown remote task status '{}'",s))
        }
    }
}

impl fmt::Display for RemoteTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress report for a remote job.
#[derive(Clone,Debug,PartialEq)]
pub struct RemoteTask {
    pub job          : String,
    pub state        : RemoteTaskStatus,
    pub model_status : Status,
    /// Result code of the remote solve
    pub result       : i32,
    pub has_soln     : bool,
}
