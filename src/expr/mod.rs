//! Symbolic expressions over variable and constraint handles.
//!
//! Three expression types are provided:
//! - [ExprLinear] A linear combination of variables plus a constant.
//! - [ExprQuad] A linear expression plus quadratic terms `c * x_i * x_j`.
//! - [Column] A linear combination of constraints, i.e. the column of a variable in the constraint
//!   matrix.
//!
//! All three keep their terms exactly as they were added until [ExprLinear::purge] (resp.
//! [ExprQuad::purge], [Column::purge]) is called. Purging sorts the terms by entity index and
//! merges terms for the same entity by summing the coefficients. Terms whose coefficients sum to
//! zero are kept.

mod linear;
mod quad;
mod column;

pub use linear::ExprLinear;
pub use quad::ExprQuad;
pub use column::Column;

use itertools::Itertools;
use crate::entity::Entity;

/// Sort terms by entity index and merge adjacent terms for the same entity. The sort is stable,
/// so terms that compare equal keep their relative order.
pub(crate) fn purge_terms<T>(terms : &mut Vec<(T,f64)>) where T : Entity+PartialEq {
    if terms.len() < 2 { return; }
    terms.sort_by_key(|(e,_)| (e.index(),e.model()));
    let merged : Vec<(T,f64)> = terms
        .drain(..)
        .coalesce(|a,b| if a.0 == b.0 { Ok((a.0,a.1+b.1)) } else { Err((a,b)) })
        .collect();
    *terms = merged;
}

/// Append `k * (e,c)` for each term; `k == 0` leaves `terms` untouched.
pub(crate) fn mult_add_terms<T>(terms : &mut Vec<(T,f64)>, k : f64, other : &[(T,f64)]) where T : Copy {
    if k == 0.0 { return; }
    terms.extend(other.iter().map(|&(e,c)| (e,k*c)));
}

/// Remove all raw terms referring to `e`. Returns `true` if at least one term was removed.
pub(crate) fn remove_entity<T>(terms : &mut Vec<(T,f64)>, e : &T) -> bool where T : PartialEq {
    let n = terms.len();
    terms.retain(|(t,_)| t != e);
    terms.len() != n
}

/// Term-by-term exact comparison of two purged term lists.
pub(crate) fn terms_equal<T>(lhs : &[(T,f64)], rhs : &[(T,f64)]) -> bool where T : PartialEq {
    lhs.len() == rhs.len()
        && lhs.iter().zip(rhs.iter()).all(|((e0,c0),(e1,c1))| c0 == c1 && e0 == e1)
}
