//! Owned wrapper around a HiGHS instance.
//!
//! This is the only place where raw pointers are handled. Problem data is marshalled from a
//! [SparseStore] into owned buffers ([LpData]) and passed to HiGHS in compressed column form.
#![allow(unsafe_code)]

use std::ffi::{c_void, CString};
use std::os::raw::c_char;
use highs_sys::{
    HighsInt,
    Highs_create, Highs_destroy, Highs_run,
    Highs_passLp, Highs_passMip, Highs_passHessian, Highs_passColName, Highs_passRowName,
    Highs_getModelStatus, Highs_getSolution, Highs_getBasis, Highs_getObjectiveValue, Highs_getRunTime,
    Highs_getIntInfoValue, Highs_getDoubleInfoValue,
    Highs_setBoolOptionValue, Highs_setIntOptionValue, Highs_setDoubleOptionValue, Highs_setStringOptionValue,
    Highs_readModel, Highs_writeModel, Highs_writeSolutionPretty,
    Highs_getNumCol, Highs_getNumRow, Highs_getNumNz, Highs_getLp, Highs_getColName, Highs_getRowName,
    STATUS_OK, STATUS_ERROR, MATRIX_FORMAT_COLUMN_WISE, OBJECTIVE_SENSE_MINIMIZE, OBJECTIVE_SENSE_MAXIMIZE,
    kHighsMaximumStringLength, kHighsVarTypeContinuous, kHighsVarTypeInteger,
};
use tracing::{debug, trace, warn};

use mdomodel::matrix::SparseStore;
use mdomodel::{to_ieee_bound, ParamValue};

// Model status values of the HiGHS C API
pub const MODEL_STATUS_MODEL_ERROR     : HighsInt = 2;
pub const MODEL_STATUS_MODEL_EMPTY     : HighsInt = 6;
pub const MODEL_STATUS_OPTIMAL         : HighsInt = 7;
pub const MODEL_STATUS_INFEASIBLE      : HighsInt = 8;
pub const MODEL_STATUS_UNBOUNDED_OR_INFEASIBLE : HighsInt = 9;
pub const MODEL_STATUS_UNBOUNDED       : HighsInt = 10;
pub const MODEL_STATUS_TIME_LIMIT      : HighsInt = 13;
pub const MODEL_STATUS_ITERATION_LIMIT : HighsInt = 14;
pub const MODEL_STATUS_INTERRUPT       : HighsInt = 17;

const HESSIAN_FORMAT_TRIANGULAR : HighsInt = 1;
/// `primal_solution_status`/`dual_solution_status` value of a feasible point
const SOLUTION_STATUS_FEASIBLE  : HighsInt = 2;

fn hi(n : usize) -> HighsInt { n as HighsInt }

fn cstr(s : &str) -> Option<CString> { CString::new(s).ok() }

/// The problem in the layout expected by `Highs_passLp`/`Highs_passMip`.
#[derive(Clone,Debug,Default)]
pub struct LpData {
    pub min_sense   : bool,
    pub offset      : f64,
    pub col_cost    : Vec<f64>,
    pub col_lower   : Vec<f64>,
    pub col_upper   : Vec<f64>,
    pub row_lower   : Vec<f64>,
    pub row_upper   : Vec<f64>,
    pub a_start     : Vec<HighsInt>,
    pub a_index     : Vec<HighsInt>,
    pub a_value     : Vec<f64>,
    pub integrality : Option<Vec<HighsInt>>,
}

impl LpData {
    /// Build the linear part of the problem in `store`. Infinite bounds are converted to IEEE
    /// infinities.
    pub fn from_store(store : &SparseStore) -> LpData {
        let (start,index,value) = store.col_major();
        LpData{
            min_sense   : store.is_min_sense(),
            offset      : store.obj_const(),
            col_cost    : store.cols().iter().map(|c| c.obj).collect(),
            col_lower   : store.cols().iter().map(|c| to_ieee_bound(c.lb)).collect(),
            col_upper   : store.cols().iter().map(|c| to_ieee_bound(c.ub)).collect(),
            row_lower   : store.rows().iter().map(|r| to_ieee_bound(r.lhs)).collect(),
            row_upper   : store.rows().iter().map(|r| to_ieee_bound(r.rhs)).collect(),
            a_start     : start.iter().map(|&i| hi(i)).collect(),
            a_index     : index.iter().map(|&i| hi(i)).collect(),
            a_value     : value,
            integrality : if store.has_integers() {
                Some(store.cols().iter().map(|c| if c.is_integer { kHighsVarTypeInteger } else { kHighsVarTypeContinuous }).collect())
            } else {
                None
            },
        }
    }

    pub fn num_cols(&self) -> usize { self.col_cost.len() }
    pub fn num_rows(&self) -> usize { self.row_lower.len() }
}

/// Primal and dual values as returned by `Highs_getSolution`.
#[derive(Clone,Debug,Default)]
pub struct RawSolution {
    pub col_value : Vec<f64>,
    pub col_dual  : Vec<f64>,
    pub row_value : Vec<f64>,
    pub row_dual  : Vec<f64>,
}

/// An owned HiGHS instance, destroyed on drop.
pub struct Highs(*mut c_void);

impl Highs {
    /// Create a new instance. Returns `None` if HiGHS could not allocate one.
    pub fn new() -> Option<Highs> {
        let ptr = unsafe { Highs_create() };
        if ptr.is_null() {
            warn!(component = "highs", operation = "create", status = "error", "Highs_create returned null");
            None
        }
        else {
            trace!(component = "highs", operation = "create", "Created HiGHS instance");
            Some(Highs(ptr))
        }
    }

    fn ptr(&self) -> *mut c_void { self.0 }

    //
    // Options
    //

    pub fn set_bool_option(&mut self, name : &str, value : bool) -> bool {
        let Some(n) = cstr(name) else { return false; };
        let status = unsafe { Highs_setBoolOptionValue(self.ptr(), n.as_ptr(), value as HighsInt) };
        self.option_status(name,status)
    }

    pub fn set_int_option(&mut self, name : &str, value : i32) -> bool {
        let Some(n) = cstr(name) else { return false; };
        let status = unsafe { Highs_setIntOptionValue(self.ptr(), n.as_ptr(), value as HighsInt) };
        self.option_status(name,status)
    }

    pub fn set_double_option(&mut self, name : &str, value : f64) -> bool {
        let Some(n) = cstr(name) else { return false; };
        let status = unsafe { Highs_setDoubleOptionValue(self.ptr(), n.as_ptr(), value) };
        self.option_status(name,status)
    }

    pub fn set_string_option(&mut self, name : &str, value : &str) -> bool {
        let (Some(n),Some(v)) = (cstr(name),cstr(value)) else { return false; };
        let status = unsafe { Highs_setStringOptionValue(self.ptr(), n.as_ptr(), v.as_ptr()) };
        self.option_status(name,status)
    }

    fn option_status(&self, name : &str, status : HighsInt) -> bool {
        if status == STATUS_ERROR {
            warn!(component = "highs", operation = "set_option", status = "error", option = name, "Failed to set option");
            false
        }
        else {
            true
        }
    }

    /// Set an option from a generic value.
    pub fn set_option(&mut self, name : &str, value : &ParamValue) -> bool {
        match value {
            ParamValue::Int(v)  => self.set_int_option(name,*v),
            ParamValue::Real(v) => self.set_double_option(name,*v),
            ParamValue::Str(v)  => self.set_string_option(name,v),
        }
    }

    /// Silence all output from HiGHS.
    pub fn make_quiet(&mut self) {
        self.set_bool_option("output_flag",false);
        self.set_bool_option("log_to_console",false);
    }

    //
    // Problem input
    //

    pub fn pass_lp(&mut self, lp : &LpData) -> HighsInt {
        let sense = if lp.min_sense { OBJECTIVE_SENSE_MINIMIZE } else { OBJECTIVE_SENSE_MAXIMIZE };
        let (n,m,nz) = (hi(lp.num_cols()),hi(lp.num_rows()),hi(lp.a_value.len()));
        debug!(
            component = "highs",
            operation = "pass_model",
            num_cols = n,
            num_rows = m,
            num_nz = nz,
            mip = lp.integrality.is_some(),
            "Passing model to HiGHS"
        );
        unsafe {
            match &lp.integrality {
                Some(integrality) => Highs_passMip(
                    self.ptr(), n, m, nz,
                    MATRIX_FORMAT_COLUMN_WISE,
                    sense,
                    lp.offset,
                    lp.col_cost.as_ptr(),
                    lp.col_lower.as_ptr(),
                    lp.col_upper.as_ptr(),
                    lp.row_lower.as_ptr(),
                    lp.row_upper.as_ptr(),
                    lp.a_start.as_ptr(),
                    lp.a_index.as_ptr(),
                    lp.a_value.as_ptr(),
                    integrality.as_ptr()),
                None => Highs_passLp(
                    self.ptr(), n, m, nz,
                    MATRIX_FORMAT_COLUMN_WISE,
                    sense,
                    lp.offset,
                    lp.col_cost.as_ptr(),
                    lp.col_lower.as_ptr(),
                    lp.col_upper.as_ptr(),
                    lp.row_lower.as_ptr(),
                    lp.row_upper.as_ptr(),
                    lp.a_start.as_ptr(),
                    lp.a_index.as_ptr(),
                    lp.a_value.as_ptr()),
            }
        }
    }

    /// Pass the quadratic objective of `store` as lower triangular Hessian.
    pub fn pass_hessian(&mut self, store : &SparseStore) -> HighsInt {
        let (start,index,value) = store.quad_lower_col_major();
        let start : Vec<HighsInt> = start.iter().map(|&i| hi(i)).collect();
        let index : Vec<HighsInt> = index.iter().map(|&i| hi(i)).collect();
        trace!(component = "highs", operation = "pass_hessian", num_nz = value.len(), "Passing Hessian");
        unsafe {
            Highs_passHessian(
                self.ptr(),
                hi(store.num_cols()),
                hi(value.len()),
                HESSIAN_FORMAT_TRIANGULAR,
                start.as_ptr(),
                index.as_ptr(),
                value.as_ptr())
        }
    }

    /// Pass the column and row names of `store`. Unnamed entities keep the HiGHS default name.
    pub fn pass_names(&mut self, store : &SparseStore) {
        for (j,c) in store.cols().iter().enumerate() {
            if let Some(name) = c.name.as_deref().and_then(cstr) {
                unsafe { Highs_passColName(self.ptr(), hi(j), name.as_ptr()); }
            }
        }
        for (i,r) in store.rows().iter().enumerate() {
            if let Some(name) = r.name.as_deref().and_then(cstr) {
                unsafe { Highs_passRowName(self.ptr(), hi(i), name.as_ptr()); }
            }
        }
    }

    //
    // Solving
    //

    pub fn run(&mut self) -> HighsInt {
        unsafe { Highs_run(self.ptr()) }
    }

    pub fn model_status(&self) -> HighsInt {
        unsafe { Highs_getModelStatus(self.ptr()) }
    }

    pub fn objective_value(&self) -> f64 {
        unsafe { Highs_getObjectiveValue(self.ptr()) }
    }

    pub fn run_time(&self) -> f64 {
        unsafe { Highs_getRunTime(self.ptr()) }
    }

    pub fn int_info(&self, name : &str) -> Option<i32> {
        let n = cstr(name)?;
        let mut value : HighsInt = 0;
        let status = unsafe { Highs_getIntInfoValue(self.ptr(), n.as_ptr(), &mut value) };
        if status == STATUS_OK { Some(value as i32) } else { None }
    }

    pub fn double_info(&self, name : &str) -> Option<f64> {
        let n = cstr(name)?;
        let mut value = 0.0;
        let status = unsafe { Highs_getDoubleInfoValue(self.ptr(), n.as_ptr(), &mut value) };
        if status == STATUS_OK { Some(value) } else { None }
    }

    pub fn has_primal_solution(&self) -> bool {
        self.int_info("primal_solution_status") == Some(SOLUTION_STATUS_FEASIBLE)
    }

    pub fn has_dual_solution(&self) -> bool {
        self.int_info("dual_solution_status") == Some(SOLUTION_STATUS_FEASIBLE)
    }

    pub fn solution(&self, num_cols : usize, num_rows : usize) -> Option<RawSolution> {
        let mut sol = RawSolution{
            col_value : vec![0.0; num_cols],
            col_dual  : vec![0.0; num_cols],
            row_value : vec![0.0; num_rows],
            row_dual  : vec![0.0; num_rows],
        };
        let status = unsafe {
            Highs_getSolution(
                self.ptr(),
                sol.col_value.as_mut_ptr(),
                sol.col_dual.as_mut_ptr(),
                sol.row_value.as_mut_ptr(),
                sol.row_dual.as_mut_ptr())
        };
        if status == STATUS_ERROR { None } else { Some(sol) }
    }

    /// Column and row basis status, if HiGHS has a valid basis.
    pub fn basis(&self, num_cols : usize, num_rows : usize) -> Option<(Vec<HighsInt>,Vec<HighsInt>)> {
        if self.int_info("basis_validity") != Some(1) { return None; }
        let mut cols = vec![0 as HighsInt; num_cols];
        let mut rows = vec![0 as HighsInt; num_rows];
        let status = unsafe { Highs_getBasis(self.ptr(), cols.as_mut_ptr(), rows.as_mut_ptr()) };
        if status == STATUS_ERROR { None } else { Some((cols,rows)) }
    }

    //
    // Files
    //

    pub fn read_model(&mut self, filename : &str) -> HighsInt {
        match cstr(filename) {
            Some(f) => unsafe { Highs_readModel(self.ptr(), f.as_ptr()) },
            None => STATUS_ERROR,
        }
    }

    pub fn write_model(&mut self, filename : &str) -> HighsInt {
        match cstr(filename) {
            Some(f) => unsafe { Highs_writeModel(self.ptr(), f.as_ptr()) },
            None => STATUS_ERROR,
        }
    }

    pub fn write_solution(&self, filename : &str) -> HighsInt {
        match cstr(filename) {
            Some(f) => unsafe { Highs_writeSolutionPretty(self.ptr(), f.as_ptr()) },
            None => STATUS_ERROR,
        }
    }

    /// Fetch the linear part of the loaded model. Dimensions are queried first, then the data is
    /// fetched in compressed column form.
    pub fn lp(&self) -> Option<LpData> {
        let (mut n,mut m,mut nz) = unsafe { (Highs_getNumCol(self.ptr()),Highs_getNumRow(self.ptr()),Highs_getNumNz(self.ptr())) };
        if n < 0 || m < 0 || nz < 0 { return None; }
        let (nu,mu,nzu) = (n as usize,m as usize,nz as usize);

        let mut sense : HighsInt = OBJECTIVE_SENSE_MINIMIZE;
        let mut lp = LpData{
            min_sense   : true,
            offset      : 0.0,
            col_cost    : vec![0.0; nu],
            col_lower   : vec![0.0; nu],
            col_upper   : vec![0.0; nu],
            row_lower   : vec![0.0; mu],
            row_upper   : vec![0.0; mu],
            a_start     : vec![0; nu+1],
            a_index     : vec![0; nzu],
            a_value     : vec![0.0; nzu],
            integrality : None,
        };
        let mut integrality = vec![kHighsVarTypeContinuous; nu];
        let status = unsafe {
            Highs_getLp(
                self.ptr(),
                MATRIX_FORMAT_COLUMN_WISE,
                &mut n, &mut m, &mut nz,
                &mut sense,
                &mut lp.offset,
                lp.col_cost.as_mut_ptr(),
                lp.col_lower.as_mut_ptr(),
                lp.col_upper.as_mut_ptr(),
                lp.row_lower.as_mut_ptr(),
                lp.row_upper.as_mut_ptr(),
                lp.a_start.as_mut_ptr(),
                lp.a_index.as_mut_ptr(),
                lp.a_value.as_mut_ptr(),
                integrality.as_mut_ptr())
        };
        if status == STATUS_ERROR { return None; }
        lp.a_start[nu] = hi(nzu);
        lp.min_sense = sense != OBJECTIVE_SENSE_MAXIMIZE;
        if integrality.iter().any(|&t| t == kHighsVarTypeInteger) {
            lp.integrality = Some(integrality);
        }
        Some(lp)
    }

    fn name(&self, index : usize, col : bool) -> Option<String> {
        let mut buf = vec![0u8; kHighsMaximumStringLength as usize + 1];
        let status = unsafe {
            if col { Highs_getColName(self.ptr(), hi(index), buf.as_mut_ptr() as *mut c_char) }
            else   { Highs_getRowName(self.ptr(), hi(index), buf.as_mut_ptr() as *mut c_char) }
        };
        if status == STATUS_ERROR { return None; }
        let end = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        let name = String::from_utf8_lossy(&buf[..end]).into_owned();
        if name.is_empty() { None } else { Some(name) }
    }

    pub fn col_name(&self, j : usize) -> Option<String> { self.name(j,true) }
    pub fn row_name(&self, i : usize) -> Option<String> { self.name(i,false) }
}

impl Drop for Highs {
    fn drop(&mut self) {
        trace!(component = "highs", operation = "destroy", "Destroying HiGHS instance");
        unsafe { Highs_destroy(self.0) }
    }
}
