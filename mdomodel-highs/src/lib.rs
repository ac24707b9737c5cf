//! This module implements the HiGHS backend for [ModelAPI](mdomodel::ModelAPI). It supports
//! - Linear and ranged constraints, integer variables
//! - Convex quadratic objectives (continuous problems only)
//! - Reading and writing problems in the formats HiGHS supports (`.mps`, `.lp`)
//! - IIS computation by deletion filtering
//!
//! # Example
//!
//! ```no_run
//! use mdomodel::*;
//! use mdomodel_highs::Model;
//!
//! let mut m = Model::new(Some("lo"));
//! let x = m.add_var(0.0, 10.0, 1.0, false, Some("x")).unwrap();
//! let y = m.add_var(0.0, INFINITY, 1.0, false, Some("y")).unwrap();
//! m.add_cons(x + y, ConsSense::GreaterEqual, 1.0, Some("c")).unwrap();
//! m.solve_prob().unwrap();
//! assert_eq!(m.status().unwrap(), Status::Optimal);
//! let xx = m.real_attr_vars(attr::PRIMAL_SOLN, &[x,y]).unwrap();
//! println!("x = {:?}", xx);
//! ```

mod ffi;
mod iis;

use itertools::izip;
use tracing::{debug, warn};

use mdomodel::matrix::{ColData, RowData, SolutionData, SolveStats, SparseStore};
use mdomodel::{from_ieee_bound, param, BasisStatus, Engine, ModelAPI, ResultCode, Status, INFINITY};
use ffi::{Highs, LpData};

pub type Model = ModelAPI<Backend>;

const OKAY : i32 = 0;

fn rc(r : ResultCode) -> i32 { r.code() }

/// HiGHS backed engine. The problem lives in a [SparseStore]; a HiGHS instance is created
/// for each solve and kept until the next one so the solution can be written in HiGHS format.
#[derive(Default)]
pub struct Backend {
    store : SparseStore,
    highs : Option<Highs>,
}

impl Backend {
    /// Create a HiGHS instance with the current parameters applied.
    fn instance(&self) -> Result<Highs,i32> {
        let mut h = Highs::new().ok_or(rc(ResultCode::NoMemory))?;
        let log = self.store.log();
        h.set_bool_option("output_flag",log.to_console);
        h.set_bool_option("log_to_console",log.to_console);
        apply_params(&mut h,&self.store)?;
        Ok(h)
    }

    /// Create a HiGHS instance holding the full problem.
    fn load(&self) -> Result<Highs,i32> {
        let mut h = self.instance()?;
        let lp = LpData::from_store(&self.store);
        if h.pass_lp(&lp) == highs_sys::STATUS_ERROR {
            return Err(rc(ResultCode::ModelInputError));
        }
        if self.store.has_quadratic() && h.pass_hessian(&self.store) == highs_sys::STATUS_ERROR {
            return Err(rc(ResultCode::ModelInputError));
        }
        h.pass_names(&self.store);
        Ok(h)
    }

    fn solve(&mut self) -> i32 {
        if self.store.has_quadratic() && self.store.has_integers() {
            self.store.log().log("HiGHS does not support quadratic objectives with integer variables\n");
            return rc(ResultCode::AbortSolverNotAvailable);
        }
        self.store.invalidate();
        self.highs = None;

        let mut h = match self.load() { Ok(h) => h, Err(code) => return code };
        let (n,m) = (self.store.num_cols(),self.store.num_rows());
        debug!(
            component = "highs",
            operation = "solve",
            num_cols = n,
            num_rows = m,
            mip = self.store.has_integers(),
            qp = self.store.has_quadratic(),
            "Starting HiGHS"
        );
        if h.run() == highs_sys::STATUS_ERROR {
            warn!(component = "highs", operation = "solve", status = "error", "Highs_run failed");
            self.store.log().log("HiGHS returned an error\n");
            return rc(ResultCode::Error);
        }

        let model_status = h.model_status();
        let (status,code) = map_status(model_status,h.has_primal_solution());
        let mut sol = SolutionData{ status, ..Default::default() };
        let mip = self.store.has_integers();

        if model_status == ffi::MODEL_STATUS_MODEL_EMPTY {
            sol.has_solution = true;
            sol.primal_obj = self.store.obj_const();
            sol.dual_obj = sol.primal_obj;
            sol.primal = vec![0.0; n];
            sol.reduced_cost = self.store.cols().iter().map(|c| c.obj).collect();
            sol.activity = vec![0.0; m];
            sol.dual = vec![0.0; m];
        }
        else if h.has_primal_solution() {
            if let Some(raw) = h.solution(n,m) {
                sol.has_solution = true;
                sol.primal_obj = h.objective_value();
                sol.primal = raw.col_value;
                sol.activity = raw.row_value;
                if !mip && h.has_dual_solution() {
                    sol.reduced_cost = raw.col_dual;
                    sol.dual = raw.row_dual;
                }
                else {
                    sol.reduced_cost = vec![0.0; n];
                    sol.dual = vec![0.0; m];
                }
            }
        }

        if mip {
            let bound = h.double_info("mip_dual_bound").unwrap_or(sol.primal_obj);
            sol.dual_obj = bound;
            sol.mip_gap_abs = (sol.primal_obj - bound).abs();
            sol.mip_gap_rel = h.double_info("mip_gap").unwrap_or(0.0);
        }
        else if sol.has_solution {
            sol.dual_obj = sol.primal_obj;
            if let Some((cb,rb)) = h.basis(n,m) {
                sol.col_basis = izip!(cb.iter(),self.store.cols().iter()).map(|(&s,c)| basis_status(s,c.lb,c.ub)).collect();
                sol.row_basis = izip!(rb.iter(),self.store.rows().iter()).map(|(&s,r)| basis_status(s,r.lhs,r.rhs)).collect();
            }
        }

        let t = h.run_time();
        sol.stats = Some(SolveStats{
            spx_iters      : h.int_info("simplex_iteration_count").unwrap_or(0),
            ipm_iters      : h.int_info("ipm_iteration_count").unwrap_or(0),
            solution_time  : t,
            presolver_time : 0.0,
            solver_time    : t,
        });

        debug!(
            component = "highs",
            operation = "solve",
            status = "success",
            model_status,
            has_solution = sol.has_solution,
            objective = sol.primal_obj,
            "HiGHS finished"
        );
        self.store.log().log(&format!("HiGHS finished with model status {} ({})\n",model_status,status.name()));
        self.store.set_solution(sol);
        self.highs = Some(h);
        code
    }

    fn read_native(&mut self, filename : &str) -> i32 {
        let Some(mut h) = Highs::new() else { return rc(ResultCode::NoMemory); };
        h.make_quiet();
        if h.read_model(filename) == highs_sys::STATUS_ERROR {
            return rc(ResultCode::FileReadError);
        }
        let Some(lp) = h.lp() else { return rc(ResultCode::FormatError); };

        let cols : Vec<ColData> = (0..lp.num_cols()).map(|j| ColData{
            lb         : from_ieee_bound(lp.col_lower[j]),
            ub         : from_ieee_bound(lp.col_upper[j]),
            obj        : lp.col_cost[j],
            is_integer : lp.integrality.as_ref().is_some_and(|t| t[j] == highs_sys::kHighsVarTypeInteger),
            name       : h.col_name(j),
        }).collect();
        let rows : Vec<RowData> = (0..lp.num_rows()).map(|i| RowData{
            lhs  : from_ieee_bound(lp.row_lower[i]),
            rhs  : from_ieee_bound(lp.row_upper[i]),
            name : h.row_name(i),
        }).collect();
        let mut entries = Vec::with_capacity(lp.a_value.len());
        for j in 0..lp.num_cols() {
            let (b,e) = (lp.a_start[j] as usize,lp.a_start[j+1] as usize);
            for k in b..e {
                entries.push((lp.a_index[k] as usize,j,lp.a_value[k]));
            }
        }

        let r = self.store.replace_problem(cols,rows,&entries,&[]);
        if r != OKAY { return r; }
        self.store.set_min_sense(lp.min_sense);
        self.store.set_obj_const(lp.offset);
        self.highs = None;
        debug!(
            component = "highs",
            operation = "read_prob",
            file = filename,
            num_cols = lp.num_cols(),
            num_rows = lp.num_rows(),
            "Read problem"
        );
        OKAY
    }
}

/// Problem files ending in `.json` are task files, everything else is handed to HiGHS.
fn is_task_file(filename : &str) -> bool {
    filename.ends_with(".json")
}

/// Translate engine parameters into HiGHS options.
fn apply_params(h : &mut Highs, store : &SparseStore) -> Result<(),i32> {
    if let Some(t) = store.real_param(param::MAX_TIME) {
        if t < INFINITY { h.set_double_option("time_limit",t); }
    }
    if let Some(g) = store.real_param(param::MIP_GAP_REL) { h.set_double_option("mip_rel_gap",g); }
    if let Some(g) = store.real_param(param::MIP_GAP_ABS) { h.set_double_option("mip_abs_gap",g); }
    if let Some(t) = store.real_param(param::SPX_PRIMAL_TOLERANCE) { h.set_double_option("primal_feasibility_tolerance",t); }
    if let Some(t) = store.real_param(param::SPX_DUAL_TOLERANCE) { h.set_double_option("dual_feasibility_tolerance",t); }
    if let Some(t) = store.real_param(param::IPM_GAP_TOLERANCE) { h.set_double_option("ipm_optimality_tolerance",t); }
    if let Some(t) = store.real_param(param::MIP_INTEGER_TOLERANCE) { h.set_double_option("mip_feasibility_tolerance",t); }

    if let Some(n) = store.int_param(param::NUM_THREADS) {
        if n > 0 { h.set_int_option("threads",n); }
    }
    if let Some(n) = store.int_param(param::SPX_MAX_ITERATIONS) { h.set_int_option("simplex_iteration_limit",n); }
    if let Some(n) = store.int_param(param::IPM_MAX_ITERATIONS) { h.set_int_option("ipm_iteration_limit",n); }
    if let Some(n) = store.int_param(param::MIP_MAX_NODES) {
        if n >= 0 { h.set_int_option("mip_max_nodes",n); }
    }
    match store.int_param(param::PRESOLVE) {
        Some(0) => { h.set_string_option("presolve","off"); },
        Some(-1) | None => {},
        Some(_) => { h.set_string_option("presolve","on"); },
    }
    match store.int_param(param::METHOD) {
        Some(param::method::AUTO) | None => {},
        Some(param::method::PRIMAL_SIMPLEX) => {
            h.set_string_option("solver","simplex");
            h.set_int_option("simplex_strategy",4);
        },
        Some(param::method::DUAL_SIMPLEX) => {
            h.set_string_option("solver","simplex");
            h.set_int_option("simplex_strategy",1);
        },
        Some(param::method::INTERIOR_POINT) => { h.set_string_option("solver","ipm"); },
        Some(_) => return Err(rc(ResultCode::AbortInvalidMethod)),
    }
    Ok(())
}

/// Map a HiGHS model status to a [Status] and the result code of the solve.
fn map_status(model_status : i32, has_primal : bool) -> (Status,i32) {
    let partial = if has_primal { Status::SubOptimal } else { Status::Unknown };
    match model_status {
        ffi::MODEL_STATUS_OPTIMAL | ffi::MODEL_STATUS_MODEL_EMPTY => (Status::Optimal,OKAY),
        ffi::MODEL_STATUS_INFEASIBLE => (Status::Infeasible,OKAY),
        ffi::MODEL_STATUS_UNBOUNDED_OR_INFEASIBLE => (Status::InfeasibleOrUnbounded,OKAY),
        ffi::MODEL_STATUS_UNBOUNDED => (Status::Unbounded,OKAY),
        ffi::MODEL_STATUS_TIME_LIMIT => (partial,rc(ResultCode::AbortTimeLimit)),
        ffi::MODEL_STATUS_ITERATION_LIMIT => (partial,rc(ResultCode::AbortIterationLimit)),
        ffi::MODEL_STATUS_INTERRUPT => (partial,rc(ResultCode::AbortCtrlC)),
        ffi::MODEL_STATUS_MODEL_ERROR => (Status::Unknown,rc(ResultCode::ModelInputError)),
        _ => (partial,OKAY),
    }
}

/// Map a HiGHS basis status to a [BasisStatus] code.
fn basis_status(s : i32, lb : f64, ub : f64) -> i32 {
    let b = if s == highs_sys::kHighsBasisStatusBasic { BasisStatus::Basic }
        else if s == highs_sys::kHighsBasisStatusLower { if lb == ub { BasisStatus::IsFixed } else { BasisStatus::AtLower } }
        else if s == highs_sys::kHighsBasisStatusUpper { if lb == ub { BasisStatus::IsFixed } else { BasisStatus::AtUpper } }
        else if s == highs_sys::kHighsBasisStatusZero { BasisStatus::IsFree }
        else { BasisStatus::SuperBasic };
    b as i32
}

impl Engine for Backend {
    fn new(name : Option<&str>) -> Self {
        Backend{ store : SparseStore::new(name), highs : None }
    }

    fn duplicate(&self) -> Self {
        Backend{ store : self.store.clone(), highs : None }
    }

    fn store(&self) -> &SparseStore { &self.store }
    fn store_mut(&mut self) -> &mut SparseStore { &mut self.store }

    fn solve_prob(&mut self) -> i32 { self.solve() }

    fn compute_iis(&mut self) -> i32 {
        match iis::deletion_filter(self) {
            Ok((rows,cols)) => {
                self.store.set_iis(rows,cols);
                OKAY
            },
            Err(code) => code,
        }
    }

    fn free(&mut self) {
        self.highs = None;
    }

    fn read_prob(&mut self, filename : &str) -> i32 {
        if is_task_file(filename) { self.store.read_task(filename,true,false,false) }
        else { self.read_native(filename) }
    }

    fn write_prob(&self, filename : &str) -> i32 {
        if is_task_file(filename) { return self.store.write_task(filename,true,false,false); }
        let mut h = match self.load() { Ok(h) => h, Err(code) => return code };
        h.make_quiet();
        if h.write_model(filename) == highs_sys::STATUS_ERROR { rc(ResultCode::FileWriteError) } else { OKAY }
    }

    fn write_soln(&self, filename : &str) -> i32 {
        if !self.store.solution().has_solution { return rc(ResultCode::NoSoln); }
        match &self.highs {
            Some(h) => if h.write_solution(filename) == highs_sys::STATUS_ERROR { rc(ResultCode::FileWriteError) } else { OKAY },
            None => self.store.write_soln(filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdomodel::ParamValue;

    #[test]
    fn status_mapping() {
        assert_eq!(map_status(ffi::MODEL_STATUS_OPTIMAL,true),(Status::Optimal,0));
        assert_eq!(map_status(ffi::MODEL_STATUS_INFEASIBLE,false),(Status::Infeasible,0));
        assert_eq!(map_status(ffi::MODEL_STATUS_TIME_LIMIT,true),(Status::SubOptimal,ResultCode::AbortTimeLimit.code()));
        assert_eq!(map_status(ffi::MODEL_STATUS_ITERATION_LIMIT,false),(Status::Unknown,ResultCode::AbortIterationLimit.code()));
    }

    #[test]
    fn basis_mapping() {
        assert_eq!(basis_status(highs_sys::kHighsBasisStatusBasic,0.0,1.0),BasisStatus::Basic as i32);
        assert_eq!(basis_status(highs_sys::kHighsBasisStatusLower,1.0,1.0),BasisStatus::IsFixed as i32);
        assert_eq!(basis_status(highs_sys::kHighsBasisStatusUpper,0.0,1.0),BasisStatus::AtUpper as i32);
    }

    #[test]
    fn invalid_method() {
        let mut b = Backend::new(None);
        assert_eq!(b.set_param(param::METHOD,ParamValue::Int(7)),0);
        assert_eq!(b.solve_prob(),ResultCode::AbortInvalidMethod.code());
    }
}
