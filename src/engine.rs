//! The boundary between [ModelAPI](crate::ModelAPI) and a solver engine.
//!
//! The [Engine] trait mirrors a C-style solver API: every call returns an `i32` result code
//! (`0` is success, see [ResultCode](crate::ResultCode)), and variable length output is written
//! to caller supplied buffers. The model layer checks every code and converts it into an
//! [Error](crate::Error).
//!
//! Engines keep the authoritative problem data in a [SparseStore]. Most methods have default
//! implementations that operate on that store, so a backend only has to provide solving and
//! whatever file formats it supports natively.

use std::rc::Rc;
use crate::attr;
use crate::matrix::SparseStore;
use crate::param::ParamValue;
use crate::result::{ResultCode, Status};

/// Receives log lines from the engine.
pub type LogCallback = Rc<dyn Fn(&str)>;

/// Solver engine interface.
pub trait Engine {
    /// Create an empty engine with an optional problem name.
    fn new(name : Option<&str>) -> Self where Self : Sized;

    /// Create an independent copy of the engine and its problem data.
    fn duplicate(&self) -> Self where Self : Sized;

    fn store(&self) -> &SparseStore;
    fn store_mut(&mut self) -> &mut SparseStore;

    /// Optimize the problem and store the solution.
    fn solve_prob(&mut self) -> i32;

    /// Compute an irreducible infeasible subsystem and store it in the `RowIIS` and `ColIIS`
    /// attributes.
    fn compute_iis(&mut self) -> i32;

    /// Release native resources. Must be safe to call more than once.
    fn free(&mut self) {}

    //
    // Structure
    //

    fn num_cols(&self) -> usize { self.store().num_cols() }
    fn num_rows(&self) -> usize { self.store().num_rows() }

    /// Append a column.
    ///
    /// # Arguments
    /// - `lb`, `ub`, `obj` Bounds and objective coefficient.
    /// - `rows`, `vals` Nonzeros of the column.
    /// - `name` Optional column name.
    /// - `is_integer` Integrality flag.
    fn add_col(&mut self, lb : f64, ub : f64, obj : f64, rows : &[usize], vals : &[f64], name : Option<&str>, is_integer : bool) -> i32 {
        self.store_mut().add_col(lb,ub,obj,rows,vals,name,is_integer)
    }
    /// Append a row with bounds `lhs <= a x <= rhs`.
    fn add_row(&mut self, lhs : f64, rhs : f64, cols : &[usize], vals : &[f64], name : Option<&str>) -> i32 {
        self.store_mut().add_row(lhs,rhs,cols,vals,name)
    }
    fn delete_cols(&mut self, indices : &[usize]) -> i32 { self.store_mut().delete_cols(indices) }
    fn delete_rows(&mut self, indices : &[usize]) -> i32 { self.store_mut().delete_rows(indices) }

    /// Fetch columns in compressed form. When `bgn` is empty only the required number of
    /// nonzeros is written to `size`, otherwise `bgn` must hold `indices.len()+1` entries and
    /// `ind`, `val` at least `size` entries.
    fn get_cols(&self, indices : &[usize], bgn : &mut [usize], ind : &mut [usize], val : &mut [f64], size : &mut usize) -> i32 {
        self.store().get_cols(indices,bgn,ind,val,size)
    }
    /// Fetch rows in compressed form, see [Engine::get_cols].
    fn get_rows(&self, indices : &[usize], bgn : &mut [usize], ind : &mut [usize], val : &mut [f64], size : &mut usize) -> i32 {
        self.store().get_rows(indices,bgn,ind,val,size)
    }

    fn col_index(&self, name : &str) -> Option<usize> { self.store().col_index(name) }
    fn row_index(&self, name : &str) -> Option<usize> { self.store().row_index(name) }

    //
    // Matrix elements
    //

    fn get_elements(&self, rows : &[usize], cols : &[usize], vals : &mut [f64]) -> i32 { self.store().get_elements(rows,cols,vals) }
    fn set_elements(&mut self, rows : &[usize], cols : &[usize], vals : &[f64]) -> i32 { self.store_mut().set_elements(rows,cols,vals) }
    fn delete_elements(&mut self, rows : &[usize], cols : &[usize]) -> i32 { self.store_mut().delete_elements(rows,cols) }
    fn delete_all_elements(&mut self) -> i32 { self.store_mut().delete_all_elements() }

    fn get_quad_elements(&self, cols1 : &[usize], cols2 : &[usize], vals : &mut [f64]) -> i32 { self.store().get_quad_elements(cols1,cols2,vals) }
    fn set_quad_elements(&mut self, cols1 : &[usize], cols2 : &[usize], vals : &[f64]) -> i32 { self.store_mut().set_quad_elements(cols1,cols2,vals) }
    fn delete_quad_elements(&mut self, cols1 : &[usize], cols2 : &[usize]) -> i32 { self.store_mut().delete_quad_elements(cols1,cols2) }
    fn delete_all_quad_elements(&mut self) -> i32 { self.store_mut().delete_all_quad_elements() }

    //
    // Attributes
    //

    fn get_int_attr(&self, att : &str, val : &mut i32) -> i32 { self.store().get_int_attr(att,None,val) }
    fn set_int_attr(&mut self, att : &str, val : i32) -> i32 { self.store_mut().set_int_attr(att,None,val) }
    fn get_int_attr_index(&self, att : &str, index : usize, val : &mut i32) -> i32 { self.store().get_int_attr(att,Some(index),val) }
    fn set_int_attr_index(&mut self, att : &str, index : usize, val : i32) -> i32 { self.store_mut().set_int_attr(att,Some(index),val) }

    fn get_real_attr(&self, att : &str, val : &mut f64) -> i32 { self.store().get_real_attr(att,None,val) }
    fn set_real_attr(&mut self, att : &str, val : f64) -> i32 { self.store_mut().set_real_attr(att,None,val) }
    fn get_real_attr_index(&self, att : &str, index : usize, val : &mut f64) -> i32 { self.store().get_real_attr(att,Some(index),val) }
    fn set_real_attr_index(&mut self, att : &str, index : usize, val : f64) -> i32 { self.store_mut().set_real_attr(att,Some(index),val) }

    fn get_str_attr(&self, att : &str, val : &mut String) -> i32 { self.store().get_str_attr(att,None,val) }
    fn set_str_attr(&mut self, att : &str, val : &str) -> i32 { self.store_mut().set_str_attr(att,None,val) }
    fn get_str_attr_index(&self, att : &str, index : usize, val : &mut String) -> i32 { self.store().get_str_attr(att,Some(index),val) }
    fn set_str_attr_index(&mut self, att : &str, index : usize, val : &str) -> i32 { self.store_mut().set_str_attr(att,Some(index),val) }

    //
    // Parameters
    //

    fn get_param(&self, name : &str, val : &mut ParamValue) -> i32 { self.store().get_param(name,val) }
    fn set_param(&mut self, name : &str, val : ParamValue) -> i32 { self.store_mut().set_param(name,val) }

    //
    // Files
    //

    fn read_prob(&mut self, filename : &str) -> i32 { self.store_mut().read_task(filename,true,false,false) }
    fn write_prob(&self, filename : &str) -> i32 { self.store().write_task(filename,true,false,false) }
    fn write_soln(&self, filename : &str) -> i32 { self.store().write_soln(filename) }
    fn read_task(&mut self, filename : &str, model : bool, param : bool, soln : bool) -> i32 { self.store_mut().read_task(filename,model,param,soln) }
    fn write_task(&self, filename : &str, model : bool, param : bool, soln : bool) -> i32 { self.store().write_task(filename,model,param,soln) }

    //
    // Solution and status
    //

    fn status(&self) -> i32 { self.store().solution().status.code() }
    fn display_results(&self) -> i32 { self.store().display_results() }

    /// Submit the problem as a job and return its identifier in `job`.
    ///
    /// Jobs are executed in process by [Engine::solve_prob]; the job table records the outcome
    /// so it can be collected with [Engine::retrieve_task].
    fn submit_task(&mut self, job : &mut String) -> i32 {
        let r = self.solve_prob();
        *job = self.store_mut().record_job(r);
        ResultCode::Okay.code()
    }

    /// Look up a job submitted with [Engine::submit_task].
    fn retrieve_task(&mut self, job : &str, state : &mut String, model_status : &mut i32, result : &mut i32, has_soln : &mut bool) -> i32 {
        self.store().retrieve_job(job,state,model_status,result,has_soln)
    }

    //
    // Logging
    //

    fn set_log_to_console(&mut self, on : bool) { self.store_mut().log_mut().to_console = on; }
    fn set_log_file(&mut self, filename : Option<&str>) -> i32 { self.store_mut().log_mut().set_file(filename) }
    fn set_log_callback(&mut self, cb : Option<LogCallback>) { self.store_mut().log_mut().callback = cb; }

    //
    // Explanations
    //

    fn explain_result(&self, code : i32) -> String {
        ResultCode::from_code(code)
            .map(|r| r.description().to_string())
            .unwrap_or_else(|| format!("Unknown result code {}",code))
    }

    fn explain_status(&self, code : i32) -> String {
        Status::from_code(code)
            .map(|s| s.description().to_string())
            .unwrap_or_else(|| format!("Unknown status code {}",code))
    }
}

/// Returns `v` unless it is at or beyond the [attr::INFINITY] threshold, in which case the
/// matching IEEE infinity is returned.
pub fn to_ieee_bound(v : f64) -> f64 {
    if v >= attr::INFINITY { f64::INFINITY }
    else if v <= attr::NEGATIVE_INFINITY { f64::NEG_INFINITY }
    else { v }
}

/// Inverse of [to_ieee_bound].
pub fn from_ieee_bound(v : f64) -> f64 {
    if v >= attr::INFINITY { attr::INFINITY }
    else if v <= attr::NEGATIVE_INFINITY { attr::NEGATIVE_INFINITY }
    else { v }
}
