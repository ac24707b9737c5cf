//! Attribute vocabulary and the attribute access protocol.
//!
//! Attributes are named, typed (integer, real or string) values of a model. Model attributes are
//! addressed by name only, while variable and constraint attributes are addressed by name and
//! index. The names in this module are the ones understood by the engines in this crate; names
//! are forwarded to the engine unchecked, and an unknown name is reported by the engine as
//! [ResultCode::ModelInvalidIntAttr](crate::ResultCode::ModelInvalidIntAttr) (resp. `Real`,
//! `Str`).

use crate::error::Result;

/// Any bound with absolute value at or above this is treated as infinite.
pub const INFINITY          : f64 = 1e20;
pub const NEGATIVE_INFINITY : f64 = -1e20;

/// Returns `true` if `v` is a finite bound in the sense of [INFINITY].
pub fn is_finite(v : f64) -> bool { v > NEGATIVE_INFINITY && v < INFINITY }

//
// Model attributes
//
pub const PROB_NAME          : &str = "ProbName";
/// 1 for minimization, 0 for maximization.
pub const MIN_SENSE          : &str = "MinSense";
pub const OBJ_CONST          : &str = "ObjConst";
pub const NUM_VARS           : &str = "NumVars";
pub const NUM_CONSS          : &str = "NumConss";
pub const NUM_ENTS           : &str = "NumEnts";

//
// Variable and constraint attributes
//
pub const LB                 : &str = "LB";
pub const UB                 : &str = "UB";
pub const OBJ                : &str = "Obj";
pub const LHS                : &str = "LHS";
pub const RHS                : &str = "RHS";
pub const COL_NAME           : &str = "ColName";
pub const ROW_NAME           : &str = "RowName";
pub const IS_INTEGER         : &str = "IsInteger";

//
// Solution attributes
//
pub const SOLUTION_TIME      : &str = "SolutionTime";
pub const HAS_SOLUTION       : &str = "HasSolution";
pub const HAS_PRIMAL_RAY     : &str = "HasPrimalRay";
pub const HAS_DUAL_RAY       : &str = "HasDualRay";
pub const PRIMAL_OBJ_VAL     : &str = "PrimalObjVal";
pub const DUAL_OBJ_VAL       : &str = "DualObjVal";
/// Primal value of a variable.
pub const PRIMAL_SOLN        : &str = "PrimalSoln";
/// Dual value of a constraint.
pub const DUAL_SOLN          : &str = "DualSoln";
pub const COL_BASIS          : &str = "ColBasis";
pub const ROW_BASIS          : &str = "RowBasis";
/// Primal value of a constraint row.
pub const ACTIVITY           : &str = "Activity";
pub const MIP_GAP_ABS        : &str = "MIP/GapAbs";
pub const MIP_GAP_REL        : &str = "MIP/GapRel";
pub const REDUCED_COST       : &str = "ReducedCost";
pub const SPX_NUM_ITERS      : &str = "SPX/NumIters";
pub const IPM_NUM_ITERS      : &str = "IPM/NumIters";
pub const PRESOLVER_TIME     : &str = "PresolverTime";
pub const SOLVER_TIME        : &str = "SolverTime";
/// IIS membership of a constraint, see [IisBound].
pub const ROW_IIS            : &str = "RowIIS";
/// IIS membership of a variable bound, see [IisBound].
pub const COL_IIS            : &str = "ColIIS";

//
// Remote attributes, mirrors of the remote string parameters
//
pub const REMOTE_TOKEN       : &str = "Remote/Token";
pub const REMOTE_DESC        : &str = "Remote/Desc";
pub const REMOTE_SERVER      : &str = "Remote/Server";
pub const REMOTE_FILE_MODEL  : &str = "Remote/File/Model";
pub const REMOTE_FILE_PARAM  : &str = "Remote/File/Param";
pub const REMOTE_FILE_SOLN   : &str = "Remote/File/Soln";
pub const REMOTE_FILE_PATH   : &str = "Remote/File/Path";

/// Basis status values of `ColBasis` and `RowBasis`.
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum BasisStatus {
    IsFree   = 0,
    Basic    = 1,
    AtUpper  = 2,
    AtLower  = 3,
    SuperBasic = 4,
    IsFixed  = 5,
}

impl BasisStatus {
    pub fn from_code(code : i32) -> Option<BasisStatus> {
        match code {
            0 => Some(BasisStatus::IsFree),
            1 => Some(BasisStatus::Basic),
            2 => Some(BasisStatus::AtUpper),
            3 => Some(BasisStatus::AtLower),
            4 => Some(BasisStatus::SuperBasic),
            5 => Some(BasisStatus::IsFixed),
            _ => None
        }
    }
}

/// Which bounds of a row or column take part in an IIS, as reported by `RowIIS`/`ColIIS`.
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum IisBound {
    None  = 0,
    Upper = 2,
    Lower = 3,
    Both  = 5,
}

impl IisBound {
    pub fn from_code(code : i32) -> Option<IisBound> {
        match code {
            0 => Some(IisBound::None),
            2 => Some(IisBound::Upper),
            3 => Some(IisBound::Lower),
            5 => Some(IisBound::Both),
            _ => None
        }
    }
}

/// Relational operator of a constraint.
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum ConsSense {
    LessEqual,
    Equal,
    GreaterEqual,
}

impl ConsSense {
    /// The sense obtained when the two sides of the relation are swapped.
    pub fn inverse(self) -> ConsSense {
        match self {
            ConsSense::LessEqual    => ConsSense::GreaterEqual,
            ConsSense::Equal        => ConsSense::Equal,
            ConsSense::GreaterEqual => ConsSense::LessEqual,
        }
    }

    /// Row bounds `(lhs,rhs)` for `expr <sense> b`.
    pub fn bounds(self, b : f64) -> (f64,f64) {
        match self {
            ConsSense::LessEqual    => (NEGATIVE_INFINITY, b),
            ConsSense::Equal        => (b, b),
            ConsSense::GreaterEqual => (b, INFINITY),
        }
    }
}

/// Typed access to the attributes of a single entity (a variable, a constraint or the model
/// itself).
///
/// The entity index is implied by the implementor. All accessors forward to the engine; any
/// non-zero result code is returned as [Error::Engine](crate::Error::Engine).
pub trait AttrAccessor {
    fn int_attr(&self, att : &str) -> Result<i32>;
    fn set_int_attr(&mut self, att : &str, val : i32) -> Result<()>;
    fn real_attr(&self, att : &str) -> Result<f64>;
    fn set_real_attr(&mut self, att : &str, val : f64) -> Result<()>;
    fn str_attr(&self, att : &str) -> Result<String>;
    fn set_str_attr(&mut self, att : &str, val : &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sense() {
        assert_eq!(ConsSense::LessEqual.inverse(), ConsSense::GreaterEqual);
        assert_eq!(ConsSense::Equal.inverse(), ConsSense::Equal);
        assert_eq!(ConsSense::GreaterEqual.bounds(3.0), (3.0, INFINITY));
    }

    #[test]
    fn finiteness() {
        assert!(is_finite(0.0));
        assert!(is_finite(9.9e19));
        assert!(!is_finite(1e20));
        assert!(!is_finite(-1e30));
        assert!(!is_finite(f64::INFINITY));
    }

    #[test]
    fn iis_bound() {
        assert_eq!(IisBound::from_code(5), Some(IisBound::Both));
    }
}
