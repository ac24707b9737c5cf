//! IIS computation by deletion filtering.
//!
//! Every finite row and column bound is a candidate. Candidates are relaxed one at a time; if the
//! problem stays infeasible the bound is left out, otherwise it is restored and belongs to the
//! IIS. Feasibility is decided by solving with a zero objective.

use tracing::debug;
use mdomodel::{IisBound, ResultCode};

use crate::ffi::{self, LpData};
use crate::Backend;

#[derive(Clone,Copy,Debug)]
enum Side {
    ColLower(usize),
    ColUpper(usize),
    RowLower(usize),
    RowUpper(usize),
}

const LOWER : u8 = 1;
const UPPER : u8 = 2;

fn bound_mut(lp : &mut LpData, side : Side) -> &mut f64 {
    match side {
        Side::ColLower(j) => &mut lp.col_lower[j],
        Side::ColUpper(j) => &mut lp.col_upper[j],
        Side::RowLower(i) => &mut lp.row_lower[i],
        Side::RowUpper(i) => &mut lp.row_upper[i],
    }
}

fn relaxed(side : Side) -> f64 {
    match side {
        Side::ColLower(_) | Side::RowLower(_) => f64::NEG_INFINITY,
        Side::ColUpper(_) | Side::RowUpper(_) => f64::INFINITY,
    }
}

fn is_infeasible(b : &Backend, lp : &LpData) -> Result<bool,i32> {
    let mut h = b.instance()?;
    h.make_quiet();
    if h.pass_lp(lp) == highs_sys::STATUS_ERROR { return Err(ResultCode::ModelInputError.code()); }
    if h.run() == highs_sys::STATUS_ERROR { return Err(ResultCode::Error.code()); }
    match h.model_status() {
        ffi::MODEL_STATUS_INFEASIBLE | ffi::MODEL_STATUS_UNBOUNDED_OR_INFEASIBLE => Ok(true),
        ffi::MODEL_STATUS_OPTIMAL | ffi::MODEL_STATUS_MODEL_EMPTY | ffi::MODEL_STATUS_UNBOUNDED => Ok(false),
        ffi::MODEL_STATUS_TIME_LIMIT => Err(ResultCode::AbortTimeLimit.code()),
        ffi::MODEL_STATUS_ITERATION_LIMIT => Err(ResultCode::AbortIterationLimit.code()),
        _ => Err(ResultCode::Error.code()),
    }
}

fn flag(bits : u8) -> i32 {
    let b = match bits {
        LOWER => IisBound::Lower,
        UPPER => IisBound::Upper,
        0 => IisBound::None,
        _ => IisBound::Both,
    };
    b as i32
}

/// Compute IIS flags for rows and columns. A feasible problem yields an empty IIS.
pub(crate) fn deletion_filter(b : &Backend) -> Result<(Vec<i32>,Vec<i32>),i32> {
    let mut lp = LpData::from_store(&b.store);
    lp.col_cost.iter_mut().for_each(|c| *c = 0.0);
    lp.offset = 0.0;
    let (n,m) = (lp.num_cols(),lp.num_rows());

    if !is_infeasible(b,&lp)? {
        debug!(component = "highs", operation = "compute_iis", "Problem is feasible, IIS is empty");
        return Ok((vec![0; m],vec![0; n]));
    }

    // Bounds are tried first so that the filter prefers keeping constraints.
    let mut sides = Vec::new();
    for j in 0..n {
        if lp.col_lower[j].is_finite() { sides.push(Side::ColLower(j)); }
        if lp.col_upper[j].is_finite() { sides.push(Side::ColUpper(j)); }
    }
    for i in 0..m {
        if lp.row_lower[i].is_finite() { sides.push(Side::RowLower(i)); }
        if lp.row_upper[i].is_finite() { sides.push(Side::RowUpper(i)); }
    }

    let mut rows = vec![0u8; m];
    let mut cols = vec![0u8; n];
    let mut solves = 1;
    for &side in sides.iter() {
        let saved = std::mem::replace(bound_mut(&mut lp,side),relaxed(side));
        solves += 1;
        if is_infeasible(b,&lp)? { continue; }
        *bound_mut(&mut lp,side) = saved;
        match side {
            Side::ColLower(j) => cols[j] |= LOWER,
            Side::ColUpper(j) => cols[j] |= UPPER,
            Side::RowLower(i) => rows[i] |= LOWER,
            Side::RowUpper(i) => rows[i] |= UPPER,
        }
    }

    debug!(
        component = "highs",
        operation = "compute_iis",
        candidates = sides.len(),
        solves,
        rows = rows.iter().filter(|&&r| r != 0).count(),
        cols = cols.iter().filter(|&&c| c != 0).count(),
        "Deletion filter finished"
    );
    Ok((rows.into_iter().map(flag).collect(),cols.into_iter().map(flag).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert_eq!(flag(0),0);
        assert_eq!(flag(LOWER),IisBound::Lower as i32);
        assert_eq!(flag(UPPER),IisBound::Upper as i32);
        assert_eq!(flag(LOWER|UPPER),IisBound::Both as i32);
    }
}
