//! In-memory problem store shared by the engines.
//!
//! [SparseStore] holds the authoritative problem data: column and row bounds, the sparse
//! constraint matrix, the quadratic objective matrix, names, parameters, the last solution and the
//! last IIS. All methods return engine result codes so they can sit directly behind the
//! [Engine](crate::Engine) boundary.

use std::collections::{BTreeMap, HashMap};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use itertools::izip;

use crate::attr::{self, BasisStatus, INFINITY, NEGATIVE_INFINITY};
use crate::engine::LogCallback;
use crate::param::{self, ParamValue};
use crate::result::{RemoteTaskStatus, ResultCode, Status};

const OKAY : i32 = 0;

fn rc(r : ResultCode) -> i32 { r.code() }

/// Column data.
#[derive(Clone,Debug,PartialEq)]
pub struct ColData {
    pub lb         : f64,
    pub ub         : f64,
    pub obj        : f64,
    pub is_integer : bool,
    pub name       : Option<String>,
}

/// Row data, `lhs <= a x <= rhs`.
#[derive(Clone,Debug,PartialEq)]
pub struct RowData {
    pub lhs  : f64,
    pub rhs  : f64,
    pub name : Option<String>,
}

/// The result of the last solve.
#[derive(Clone,Debug,Default)]
pub struct SolutionData {
    pub status         : Status,
    pub has_solution   : bool,
    pub has_primal_ray : bool,
    pub has_dual_ray   : bool,
    /// Primal values per column
    pub primal         : Vec<f64>,
    /// Reduced costs per column
    pub reduced_cost   : Vec<f64>,
    /// Row activities
    pub activity       : Vec<f64>,
    /// Dual values per row
    pub dual           : Vec<f64>,
    pub col_basis      : Vec<i32>,
    pub row_basis      : Vec<i32>,
    pub primal_obj     : f64,
    pub dual_obj       : f64,
    pub mip_gap_abs    : f64,
    pub mip_gap_rel    : f64,
    /// Solver statistics, `None` if no solve has been attempted.
    pub stats          : Option<SolveStats>,
}

#[derive(Clone,Copy,Debug,Default)]
pub struct SolveStats {
    pub spx_iters      : i32,
    pub ipm_iters      : i32,
    pub solution_time  : f64,
    pub presolver_time : f64,
    pub solver_time    : f64,
}

/// Engine side log sink: console, file and user callback.
#[derive(Clone,Default)]
pub struct LogSink {
    pub to_console : bool,
    pub file       : Option<PathBuf>,
    pub callback   : Option<LogCallback>,
}

impl LogSink {
    pub fn set_file(&mut self, filename : Option<&str>) -> i32 {
        match filename {
            None => { self.file = None; OKAY },
            Some(f) => {
                match OpenOptions::new().create(true).append(true).open(f) {
                    Ok(_) => { self.file = Some(PathBuf::from(f)); OKAY },
                    Err(_) => rc(ResultCode::FileWriteError)
                }
            }
        }
    }

    /// Write a message to all enabled channels. Errors writing the log file are ignored.
    pub fn log(&self, msg : &str) {
        if self.to_console { print!("{}",msg); }
        if let Some(f) = &self.file {
            if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(f) {
                _ = f.write_all(msg.as_bytes());
            }
        }
        if let Some(cb) = &self.callback { cb(msg); }
    }
}

#[derive(Clone,Debug)]
struct Job {
    id           : String,
    state        : RemoteTaskStatus,
    model_status : Status,
    result       : i32,
    has_soln     : bool,
}

/// Which entity an index addresses.
#[derive(Clone,Copy,PartialEq)]
enum Target { Model, Col, Row }

fn int_attr_target(att : &str) -> Option<Target> {
    match att {
        attr::NUM_VARS | attr::NUM_CONSS | attr::NUM_ENTS | attr::MIN_SENSE |
        attr::HAS_SOLUTION | attr::HAS_PRIMAL_RAY | attr::HAS_DUAL_RAY |
        attr::SPX_NUM_ITERS | attr::IPM_NUM_ITERS => Some(Target::Model),
        attr::IS_INTEGER | attr::COL_BASIS | attr::COL_IIS => Some(Target::Col),
        attr::ROW_BASIS | attr::ROW_IIS => Some(Target::Row),
        _ => None
    }
}

fn real_attr_target(att : &str) -> Option<Target> {
    match att {
        attr::OBJ_CONST | attr::SOLUTION_TIME | attr::PRIMAL_OBJ_VAL | attr::DUAL_OBJ_VAL |
        attr::MIP_GAP_ABS | attr::MIP_GAP_REL | attr::PRESOLVER_TIME | attr::SOLVER_TIME => Some(Target::Model),
        attr::LB | attr::UB | attr::OBJ | attr::PRIMAL_SOLN | attr::REDUCED_COST => Some(Target::Col),
        attr::LHS | attr::RHS | attr::DUAL_SOLN | attr::ACTIVITY => Some(Target::Row),
        _ => None
    }
}

fn str_attr_target(att : &str) -> Option<Target> {
    match att {
        attr::PROB_NAME |
        attr::REMOTE_TOKEN | attr::REMOTE_DESC | attr::REMOTE_SERVER | attr::REMOTE_FILE_MODEL |
        attr::REMOTE_FILE_PARAM | attr::REMOTE_FILE_SOLN | attr::REMOTE_FILE_PATH => Some(Target::Model),
        attr::COL_NAME => Some(Target::Col),
        attr::ROW_NAME => Some(Target::Row),
        _ => None
    }
}

/// Authoritative sparse problem data.
#[derive(Clone)]
pub struct SparseStore {
    name      : String,
    min_sense : bool,
    obj_const : f64,

    cols      : Vec<ColData>,
    rows      : Vec<RowData>,
    /// Constraint matrix keyed by `(col,row)`
    a_cols    : BTreeMap<(usize,usize),f64>,
    /// Constraint matrix keyed by `(row,col)`
    a_rows    : BTreeMap<(usize,usize),f64>,
    /// Quadratic objective keyed by `(i,j)`, `i <= j`
    q         : BTreeMap<(usize,usize),f64>,

    params    : HashMap<String,ParamValue>,
    solution  : SolutionData,
    /// IIS flags per row and column, see [attr::IisBound]
    iis       : Option<(Vec<i32>,Vec<i32>)>,

    jobs      : Vec<Job>,
    log       : LogSink,
}

impl Default for SparseStore {
    fn default() -> Self { SparseStore::new(None) }
}

impl SparseStore {
    pub fn new(name : Option<&str>) -> SparseStore {
        SparseStore{
            name      : name.unwrap_or("").to_string(),
            min_sense : true,
            obj_const : 0.0,
            cols      : Vec::new(),
            rows      : Vec::new(),
            a_cols    : BTreeMap::new(),
            a_rows    : BTreeMap::new(),
            q         : BTreeMap::new(),
            params    : param::defaults().into_iter().map(|(k,v)| (k.to_string(),v)).collect(),
            solution  : SolutionData::default(),
            iis       : None,
            jobs      : Vec::new(),
            log       : LogSink::default(),
        }
    }

    pub fn num_cols(&self) -> usize { self.cols.len() }
    pub fn num_rows(&self) -> usize { self.rows.len() }
    pub fn cols(&self) -> &[ColData] { self.cols.as_slice() }
    pub fn rows(&self) -> &[RowData] { self.rows.as_slice() }
    pub fn name(&self) -> &str { self.name.as_str() }
    pub fn is_min_sense(&self) -> bool { self.min_sense }
    pub fn obj_const(&self) -> f64 { self.obj_const }
    pub fn has_integers(&self) -> bool { self.cols.iter().any(|c| c.is_integer) }
    pub fn has_quadratic(&self) -> bool { !self.q.is_empty() }

    pub fn log(&self) -> &LogSink { &self.log }
    pub fn log_mut(&mut self) -> &mut LogSink { &mut self.log }

    pub fn solution(&self) -> &SolutionData { &self.solution }

    /// Replace the current solution. Vectors are expected to match the current dimensions.
    pub fn set_solution(&mut self, sol : SolutionData) { self.solution = sol; }

    /// Mark the problem as modified: the solution and IIS are discarded.
    pub fn invalidate(&mut self) {
        self.solution = SolutionData::default();
        self.iis = None;
    }

    pub fn set_iis(&mut self, rows : Vec<i32>, cols : Vec<i32>) { self.iis = Some((rows,cols)); }

    pub fn param(&self, name : &str) -> Option<&ParamValue> { self.params.get(name) }
    pub fn int_param(&self, name : &str) -> Option<i32> {
        if let Some(ParamValue::Int(v)) = self.params.get(name) { Some(*v) } else { None }
    }
    pub fn real_param(&self, name : &str) -> Option<f64> {
        if let Some(ParamValue::Real(v)) = self.params.get(name) { Some(*v) } else { None }
    }

    /// Constraint matrix in compressed column form `(start,index,value)`, `start` has
    /// `num_cols+1` entries.
    pub fn col_major(&self) -> (Vec<usize>,Vec<usize>,Vec<f64>) {
        let mut start = vec![0usize; self.cols.len()+1];
        let mut index = Vec::with_capacity(self.a_cols.len());
        let mut value = Vec::with_capacity(self.a_cols.len());
        for (&(j,i),&v) in self.a_cols.iter() {
            start[j+1] += 1;
            index.push(i);
            value.push(v);
        }
        for j in 0..self.cols.len() { start[j+1] += start[j]; }
        (start,index,value)
    }

    /// Lower triangle of the symmetric quadratic objective matrix in compressed column form.
    /// Each stored entry `(i,j)` with `i <= j` appears as row `j` in column `i`.
    pub fn quad_lower_col_major(&self) -> (Vec<usize>,Vec<usize>,Vec<f64>) {
        let mut entries : Vec<(usize,usize,f64)> = self.q.iter().map(|(&(i,j),&v)| (i,j,v)).collect();
        entries.sort_by_key(|&(i,j,_)| (i,j));
        let mut start = vec![0usize; self.cols.len()+1];
        let mut index = Vec::with_capacity(entries.len());
        let mut value = Vec::with_capacity(entries.len());
        for (i,j,v) in entries {
            start[i+1] += 1;
            index.push(j);
            value.push(v);
        }
        for j in 0..self.cols.len() { start[j+1] += start[j]; }
        (start,index,value)
    }

    //
    // Structure
    //

    pub fn add_col(&mut self, lb : f64, ub : f64, obj : f64, rows : &[usize], vals : &[f64], name : Option<&str>, is_integer : bool) -> i32 {
        if rows.len() != vals.len() { return rc(ResultCode::ModelInputError); }
        if rows.iter().any(|&i| i >= self.rows.len()) { return rc(ResultCode::ModelInvalidRowIdx); }
        let j = self.cols.len();
        self.cols.push(ColData{ lb, ub, obj, is_integer, name : name.map(|s| s.to_string()) });
        for (&i,&v) in rows.iter().zip(vals.iter()) {
            *self.a_cols.entry((j,i)).or_insert(0.0) += v;
            *self.a_rows.entry((i,j)).or_insert(0.0) += v;
        }
        self.invalidate();
        OKAY
    }

    pub fn add_row(&mut self, lhs : f64, rhs : f64, cols : &[usize], vals : &[f64], name : Option<&str>) -> i32 {
        if cols.len() != vals.len() { return rc(ResultCode::ModelInputError); }
        if cols.iter().any(|&j| j >= self.cols.len()) { return rc(ResultCode::ModelInvalidColIdx); }
        let i = self.rows.len();
        self.rows.push(RowData{ lhs, rhs, name : name.map(|s| s.to_string()) });
        for (&j,&v) in cols.iter().zip(vals.iter()) {
            *self.a_cols.entry((j,i)).or_insert(0.0) += v;
            *self.a_rows.entry((i,j)).or_insert(0.0) += v;
        }
        self.invalidate();
        OKAY
    }

    /// Build a map from old to new index after removing `indices` from `0..n`.
    fn renumbering(n : usize, indices : &[usize]) -> Vec<Option<usize>> {
        let mut keep = vec![true; n];
        for &i in indices { keep[i] = false; }
        let mut next = 0;
        keep.iter().map(|&k| if k { next += 1; Some(next-1) } else { None }).collect()
    }

    pub fn delete_cols(&mut self, indices : &[usize]) -> i32 {
        if indices.iter().any(|&j| j >= self.cols.len()) { return rc(ResultCode::ModelInvalidColIdx); }
        let map = Self::renumbering(self.cols.len(), indices);

        let mut j = 0;
        self.cols.retain(|_| { j += 1; map[j-1].is_some() });
        self.a_cols = self.a_cols.iter().filter_map(|(&(j,i),&v)| map[j].map(|j| ((j,i),v))).collect();
        self.a_rows = self.a_cols.iter().map(|(&(j,i),&v)| ((i,j),v)).collect();
        self.q = self.q.iter()
            .filter_map(|(&(i,j),&v)| match (map[i],map[j]) { (Some(i),Some(j)) => Some(((i,j),v)), _ => None })
            .collect();
        self.invalidate();
        OKAY
    }

    pub fn delete_rows(&mut self, indices : &[usize]) -> i32 {
        if indices.iter().any(|&i| i >= self.rows.len()) { return rc(ResultCode::ModelInvalidRowIdx); }
        let map = Self::renumbering(self.rows.len(), indices);

        let mut i = 0;
        self.rows.retain(|_| { i += 1; map[i-1].is_some() });
        self.a_rows = self.a_rows.iter().filter_map(|(&(i,j),&v)| map[i].map(|i| ((i,j),v))).collect();
        self.a_cols = self.a_rows.iter().map(|(&(i,j),&v)| ((j,i),v)).collect();
        self.invalidate();
        OKAY
    }

    fn get_slices(m : &BTreeMap<(usize,usize),f64>, n : usize, err : ResultCode, indices : &[usize], bgn : &mut [usize], ind : &mut [usize], val : &mut [f64], size : &mut usize) -> i32 {
        if indices.iter().any(|&k| k >= n) { return rc(err); }
        let total : usize = indices.iter().map(|&k| m.range((k,0)..(k+1,0)).count()).sum();
        *size = total;
        if bgn.is_empty() { return OKAY; }
        if ind.len() < total || val.len() < total || bgn.len() < indices.len()+1 {
            return rc(ResultCode::ModelInputError);
        }

        let mut pos = 0;
        bgn[0] = 0;
        for (b,&k) in bgn[1..].iter_mut().zip(indices.iter()) {
            for (&(_,l),&v) in m.range((k,0)..(k+1,0)) {
                ind[pos] = l;
                val[pos] = v;
                pos += 1;
            }
            *b = pos;
        }
        OKAY
    }

    pub fn get_cols(&self, indices : &[usize], bgn : &mut [usize], ind : &mut [usize], val : &mut [f64], size : &mut usize) -> i32 {
        Self::get_slices(&self.a_cols, self.cols.len(), ResultCode::ModelInvalidColIdx, indices, bgn, ind, val, size)
    }

    pub fn get_rows(&self, indices : &[usize], bgn : &mut [usize], ind : &mut [usize], val : &mut [f64], size : &mut usize) -> i32 {
        Self::get_slices(&self.a_rows, self.rows.len(), ResultCode::ModelInvalidRowIdx, indices, bgn, ind, val, size)
    }

    pub fn col_index(&self, name : &str) -> Option<usize> { self.cols.iter().position(|c| c.name.as_deref() == Some(name)) }
    pub fn row_index(&self, name : &str) -> Option<usize> { self.rows.iter().position(|r| r.name.as_deref() == Some(name)) }

    //
    // Elements
    //

    fn check_pairs(&self, rows : &[usize], cols : &[usize]) -> i32 {
        if rows.len() != cols.len() { rc(ResultCode::ModelInputError) }
        else if rows.iter().any(|&i| i >= self.rows.len()) { rc(ResultCode::ModelInvalidRowIdx) }
        else if cols.iter().any(|&j| j >= self.cols.len()) { rc(ResultCode::ModelInvalidColIdx) }
        else { OKAY }
    }

    pub fn get_elements(&self, rows : &[usize], cols : &[usize], vals : &mut [f64]) -> i32 {
        let r = self.check_pairs(rows,cols);
        if r != OKAY { return r; }
        if vals.len() != rows.len() { return rc(ResultCode::ModelInputError); }
        for (&i,&j,v) in izip!(rows,cols,vals.iter_mut()) {
            *v = self.a_rows.get(&(i,j)).copied().unwrap_or(0.0);
        }
        OKAY
    }

    /// Set matrix entries. Setting an entry to zero removes it from the sparsity pattern.
    pub fn set_elements(&mut self, rows : &[usize], cols : &[usize], vals : &[f64]) -> i32 {
        let r = self.check_pairs(rows,cols);
        if r != OKAY { return r; }
        if vals.len() != rows.len() { return rc(ResultCode::ModelInputError); }
        for (&i,&j,&v) in izip!(rows,cols,vals) {
            if v == 0.0 {
                self.a_rows.remove(&(i,j));
                self.a_cols.remove(&(j,i));
            }
            else {
                self.a_rows.insert((i,j),v);
                self.a_cols.insert((j,i),v);
            }
        }
        self.invalidate();
        OKAY
    }

    pub fn delete_elements(&mut self, rows : &[usize], cols : &[usize]) -> i32 {
        let r = self.check_pairs(rows,cols);
        if r != OKAY { return r; }
        for (&i,&j) in rows.iter().zip(cols.iter()) {
            self.a_rows.remove(&(i,j));
            self.a_cols.remove(&(j,i));
        }
        self.invalidate();
        OKAY
    }

    pub fn delete_all_elements(&mut self) -> i32 {
        self.a_rows.clear();
        self.a_cols.clear();
        self.invalidate();
        OKAY
    }

    fn check_quad_pairs(&self, cols1 : &[usize], cols2 : &[usize]) -> i32 {
        if cols1.len() != cols2.len() { rc(ResultCode::ModelInputError) }
        else if cols1.iter().chain(cols2.iter()).any(|&j| j >= self.cols.len()) { rc(ResultCode::ModelInvalidColIdx) }
        else { OKAY }
    }

    fn quad_key(i : usize, j : usize) -> (usize,usize) { if i <= j { (i,j) } else { (j,i) } }

    pub fn get_quad_elements(&self, cols1 : &[usize], cols2 : &[usize], vals : &mut [f64]) -> i32 {
        let r = self.check_quad_pairs(cols1,cols2);
        if r != OKAY { return r; }
        if vals.len() != cols1.len() { return rc(ResultCode::ModelInputError); }
        for (&i,&j,v) in izip!(cols1,cols2,vals.iter_mut()) {
            *v = self.q.get(&Self::quad_key(i,j)).copied().unwrap_or(0.0);
        }
        OKAY
    }

    /// Set entries of the symmetric quadratic objective matrix. `(i,j)` and `(j,i)` address the
    /// same entry.
    pub fn set_quad_elements(&mut self, cols1 : &[usize], cols2 : &[usize], vals : &[f64]) -> i32 {
        let r = self.check_quad_pairs(cols1,cols2);
        if r != OKAY { return r; }
        if vals.len() != cols1.len() { return rc(ResultCode::ModelInputError); }
        for (&i,&j,&v) in izip!(cols1,cols2,vals) {
            if v == 0.0 { self.q.remove(&Self::quad_key(i,j)); }
            else { self.q.insert(Self::quad_key(i,j),v); }
        }
        self.invalidate();
        OKAY
    }

    pub fn delete_quad_elements(&mut self, cols1 : &[usize], cols2 : &[usize]) -> i32 {
        let r = self.check_quad_pairs(cols1,cols2);
        if r != OKAY { return r; }
        for (&i,&j) in cols1.iter().zip(cols2.iter()) {
            self.q.remove(&Self::quad_key(i,j));
        }
        self.invalidate();
        OKAY
    }

    pub fn delete_all_quad_elements(&mut self) -> i32 {
        self.q.clear();
        self.invalidate();
        OKAY
    }

    //
    // Attributes
    //

    fn check_target(&self, target : Target, index : Option<usize>, invalid : ResultCode) -> i32 {
        match (target,index) {
            (Target::Model,None) => OKAY,
            (Target::Col,Some(j)) => if j < self.cols.len() { OKAY } else { rc(ResultCode::ModelInvalidColIdx) },
            (Target::Row,Some(i)) => if i < self.rows.len() { OKAY } else { rc(ResultCode::ModelInvalidRowIdx) },
            _ => rc(invalid)
        }
    }

    fn stats(&self) -> Result<SolveStats,i32> {
        self.solution.stats.ok_or(rc(ResultCode::NoStatistics))
    }

    fn soln_value(&self, v : &[f64], k : usize) -> Result<f64,i32> {
        if self.solution.has_solution { v.get(k).copied().ok_or(rc(ResultCode::NoSoln)) }
        else { Err(rc(ResultCode::NoSoln)) }
    }

    pub fn get_int_attr(&self, att : &str, index : Option<usize>, val : &mut i32) -> i32 {
        let Some(target) = int_attr_target(att) else { return rc(ResultCode::ModelInvalidIntAttr) };
        let r = self.check_target(target,index,ResultCode::ModelInvalidIntAttr);
        if r != OKAY { return r; }
        let k = index.unwrap_or(0);
        let res : Result<i32,i32> = match att {
            attr::NUM_VARS       => Ok(self.cols.len() as i32),
            attr::NUM_CONSS      => Ok(self.rows.len() as i32),
            attr::NUM_ENTS       => Ok(self.a_cols.len() as i32),
            attr::MIN_SENSE      => Ok(self.min_sense as i32),
            attr::HAS_SOLUTION   => Ok(self.solution.has_solution as i32),
            attr::HAS_PRIMAL_RAY => Ok(self.solution.has_primal_ray as i32),
            attr::HAS_DUAL_RAY   => Ok(self.solution.has_dual_ray as i32),
            attr::SPX_NUM_ITERS  => self.stats().map(|s| s.spx_iters),
            attr::IPM_NUM_ITERS  => self.stats().map(|s| s.ipm_iters),
            attr::IS_INTEGER     => Ok(self.cols[k].is_integer as i32),
            attr::COL_BASIS      => self.solution.col_basis.get(k).copied().ok_or(rc(ResultCode::NoSoln)),
            attr::ROW_BASIS      => self.solution.row_basis.get(k).copied().ok_or(rc(ResultCode::NoSoln)),
            attr::COL_IIS        => self.iis.as_ref().and_then(|(_,c)| c.get(k).copied()).ok_or(rc(ResultCode::NoSoln)),
            attr::ROW_IIS        => self.iis.as_ref().and_then(|(r,_)| r.get(k).copied()).ok_or(rc(ResultCode::NoSoln)),
            _ => Err(rc(ResultCode::ModelInvalidIntAttr))
        };
        match res {
            Ok(v) => { *val = v; OKAY },
            Err(r) => r
        }
    }

    pub fn set_int_attr(&mut self, att : &str, index : Option<usize>, val : i32) -> i32 {
        let Some(target) = int_attr_target(att) else { return rc(ResultCode::ModelInvalidIntAttr) };
        let r = self.check_target(target,index,ResultCode::ModelInvalidIntAttr);
        if r != OKAY { return r; }
        let k = index.unwrap_or(0);
        match att {
            attr::MIN_SENSE  => { self.min_sense = val != 0; self.invalidate(); },
            attr::IS_INTEGER => { self.cols[k].is_integer = val != 0; self.invalidate(); },
            attr::COL_BASIS | attr::ROW_BASIS => {
                if BasisStatus::from_code(val).is_none() { return rc(ResultCode::InvalidBasisStatus); }
                let (basis,n) = if att == attr::COL_BASIS { (&mut self.solution.col_basis,self.cols.len()) } else { (&mut self.solution.row_basis,self.rows.len()) };
                basis.resize(n,BasisStatus::IsFree as i32);
                basis[k] = val;
            },
            _ => return rc(ResultCode::ModelInvalidIntAttr)
        }
        OKAY
    }

    pub fn get_real_attr(&self, att : &str, index : Option<usize>, val : &mut f64) -> i32 {
        let Some(target) = real_attr_target(att) else { return rc(ResultCode::ModelInvalidRealAttr) };
        let r = self.check_target(target,index,ResultCode::ModelInvalidRealAttr);
        if r != OKAY { return r; }
        let k = index.unwrap_or(0);
        let sol = &self.solution;
        let res : Result<f64,i32> = match att {
            attr::OBJ_CONST      => Ok(self.obj_const),
            attr::SOLUTION_TIME  => self.stats().map(|s| s.solution_time),
            attr::PRESOLVER_TIME => self.stats().map(|s| s.presolver_time),
            attr::SOLVER_TIME    => self.stats().map(|s| s.solver_time),
            attr::PRIMAL_OBJ_VAL => if sol.has_solution { Ok(sol.primal_obj) } else { Err(rc(ResultCode::NoSoln)) },
            attr::DUAL_OBJ_VAL   => if sol.has_solution { Ok(sol.dual_obj) } else { Err(rc(ResultCode::NoSoln)) },
            attr::MIP_GAP_ABS    => if sol.has_solution { Ok(sol.mip_gap_abs) } else { Err(rc(ResultCode::NoSoln)) },
            attr::MIP_GAP_REL    => if sol.has_solution { Ok(sol.mip_gap_rel) } else { Err(rc(ResultCode::NoSoln)) },
            attr::LB             => Ok(self.cols[k].lb),
            attr::UB             => Ok(self.cols[k].ub),
            attr::OBJ            => Ok(self.cols[k].obj),
            attr::LHS            => Ok(self.rows[k].lhs),
            attr::RHS            => Ok(self.rows[k].rhs),
            attr::PRIMAL_SOLN    => self.soln_value(&sol.primal,k),
            attr::REDUCED_COST   => self.soln_value(&sol.reduced_cost,k),
            attr::DUAL_SOLN      => self.soln_value(&sol.dual,k),
            attr::ACTIVITY       => self.soln_value(&sol.activity,k),
            _ => Err(rc(ResultCode::ModelInvalidRealAttr))
        };
        match res {
            Ok(v) => { *val = v; OKAY },
            Err(r) => r
        }
    }

    pub fn set_real_attr(&mut self, att : &str, index : Option<usize>, val : f64) -> i32 {
        let Some(target) = real_attr_target(att) else { return rc(ResultCode::ModelInvalidRealAttr) };
        let r = self.check_target(target,index,ResultCode::ModelInvalidRealAttr);
        if r != OKAY { return r; }
        let k = index.unwrap_or(0);
        match att {
            attr::OBJ_CONST => self.obj_const = val,
            attr::LB        => self.cols[k].lb = val,
            attr::UB        => self.cols[k].ub = val,
            attr::OBJ       => self.cols[k].obj = val,
            attr::LHS       => self.rows[k].lhs = val,
            attr::RHS       => self.rows[k].rhs = val,
            _ => return rc(ResultCode::ModelInvalidRealAttr)
        }
        self.invalidate();
        OKAY
    }

    pub fn get_str_attr(&self, att : &str, index : Option<usize>, val : &mut String) -> i32 {
        let Some(target) = str_attr_target(att) else { return rc(ResultCode::ModelInvalidStrAttr) };
        let r = self.check_target(target,index,ResultCode::ModelInvalidStrAttr);
        if r != OKAY { return r; }
        let k = index.unwrap_or(0);
        *val = match att {
            attr::PROB_NAME => self.name.clone(),
            attr::COL_NAME  => self.cols[k].name.clone().unwrap_or_default(),
            attr::ROW_NAME  => self.rows[k].name.clone().unwrap_or_default(),
            _ => match self.params.get(att) {
                Some(ParamValue::Str(s)) => s.clone(),
                _ => return rc(ResultCode::ModelInvalidStrAttr)
            }
        };
        OKAY
    }

    pub fn set_str_attr(&mut self, att : &str, index : Option<usize>, val : &str) -> i32 {
        let Some(target) = str_attr_target(att) else { return rc(ResultCode::ModelInvalidStrAttr) };
        let r = self.check_target(target,index,ResultCode::ModelInvalidStrAttr);
        if r != OKAY { return r; }
        let k = index.unwrap_or(0);
        match att {
            attr::PROB_NAME => self.name = val.to_string(),
            attr::COL_NAME  => self.cols[k].name = Some(val.to_string()),
            attr::ROW_NAME  => self.rows[k].name = Some(val.to_string()),
            _ => { self.params.insert(att.to_string(),ParamValue::Str(val.to_string())); }
        }
        OKAY
    }

    //
    // Parameters
    //

    pub fn get_param(&self, name : &str, val : &mut ParamValue) -> i32 {
        match self.params.get(name) {
            Some(cur) if std::mem::discriminant(cur) == std::mem::discriminant(val) => { *val = cur.clone(); OKAY },
            _ => rc(ResultCode::ParamGetError)
        }
    }

    /// Set a parameter. Integer values are accepted for real parameters.
    pub fn set_param(&mut self, name : &str, val : ParamValue) -> i32 {
        let Some(cur) = self.params.get_mut(name) else { return rc(ResultCode::ParamSetError) };
        let val = match (&*cur,val) {
            (ParamValue::Real(_),ParamValue::Int(v)) => ParamValue::Real(v as f64),
            (_,v) => v
        };
        if std::mem::discriminant(cur) != std::mem::discriminant(&val) {
            return rc(ResultCode::ParamSetError);
        }
        *cur = val;
        OKAY
    }

    pub fn params(&self) -> &HashMap<String,ParamValue> { &self.params }

    //
    // Objective and problem level data
    //

    pub fn set_name(&mut self, name : &str) { self.name = name.to_string(); }
    pub fn set_min_sense(&mut self, min : bool) { self.min_sense = min; }
    pub fn set_obj_const(&mut self, c : f64) { self.obj_const = c; }

    /// Replace the whole problem. Used when loading problems from files.
    pub fn replace_problem(&mut self, cols : Vec<ColData>, rows : Vec<RowData>, entries : &[(usize,usize,f64)], quad : &[(usize,usize,f64)]) -> i32 {
        let (n,m) = (cols.len(),rows.len());
        if entries.iter().any(|&(i,j,_)| i >= m || j >= n) || quad.iter().any(|&(i,j,_)| i >= n || j >= n) {
            return rc(ResultCode::ModelInputError);
        }
        self.cols = cols;
        self.rows = rows;
        self.a_cols.clear();
        self.a_rows.clear();
        self.q.clear();
        for &(i,j,v) in entries {
            *self.a_cols.entry((j,i)).or_insert(0.0) += v;
            *self.a_rows.entry((i,j)).or_insert(0.0) += v;
        }
        for &(i,j,v) in quad {
            *self.q.entry(Self::quad_key(i,j)).or_insert(0.0) += v;
        }
        self.invalidate();
        OKAY
    }

    /// All matrix entries as `(row,col,value)`.
    pub fn entries(&self) -> Vec<(usize,usize,f64)> {
        self.a_rows.iter().map(|(&(i,j),&v)| (i,j,v)).collect()
    }

    /// All quadratic objective entries `(i,j,value)` with `i <= j`.
    pub fn quad_entries(&self) -> Vec<(usize,usize,f64)> {
        self.q.iter().map(|(&(i,j),&v)| (i,j,v)).collect()
    }

    //
    // Jobs
    //

    /// Record the outcome of a job run with result code `result` and return its identifier.
    pub fn record_job(&mut self, result : i32) -> String {
        let id = format!("job-{:06}",self.jobs.len()+1);
        self.jobs.push(Job{
            id           : id.clone(),
            state        : if result == OKAY { RemoteTaskStatus::Finished } else { RemoteTaskStatus::Failed },
            model_status : self.solution.status,
            result,
            has_soln     : self.solution.has_solution,
        });
        id
    }

    pub fn retrieve_job(&self, job : &str, state : &mut String, model_status : &mut i32, result : &mut i32, has_soln : &mut bool) -> i32 {
        match self.jobs.iter().find(|j| j.id == job) {
            None => rc(ResultCode::RemoteInvalidToken),
            Some(j) => {
                *state = j.state.as_str().to_string();
                *model_status = j.model_status.code();
                *result = j.result;
                *has_soln = j.has_soln;
                OKAY
            }
        }
    }

    //
    // Reporting
    //

    /// Human readable summary of the last solve.
    pub fn format_results(&self) -> String {
        let sol = &self.solution;
        let mut s = String::new();
        s.push_str(&format!("Model status       : {}\n",sol.status.name()));
        if sol.has_solution {
            s.push_str(&format!("Primal objective   : {:e}\n",sol.primal_obj));
            s.push_str(&format!("Dual objective     : {:e}\n",sol.dual_obj));
            for (j,(c,x)) in self.cols.iter().zip(sol.primal.iter()).enumerate() {
                match &c.name {
                    Some(name) => s.push_str(&format!("  {} = {:e}\n",name,x)),
                    None => s.push_str(&format!("  x{} = {:e}\n",j,x)),
                }
            }
        }
        else {
            s.push_str("No solution available\n");
        }
        if let Some(st) = sol.stats {
            s.push_str(&format!("Solution time      : {:.3}s\n",st.solution_time));
        }
        s
    }

    pub fn display_results(&self) -> i32 {
        self.log.log(&self.format_results());
        OKAY
    }

    /// Write the primal solution as `name value` lines.
    pub fn write_soln(&self, filename : &str) -> i32 {
        if !self.solution.has_solution { return rc(ResultCode::NoSoln); }
        let mut s = String::new();
        s.push_str(&format!("# status {}\n",self.solution.status.name()));
        s.push_str(&format!("# objective {:e}\n",self.solution.primal_obj));
        for (j,(c,x)) in self.cols.iter().zip(self.solution.primal.iter()).enumerate() {
            match &c.name {
                Some(name) => s.push_str(&format!("{} {:e}\n",name,x)),
                None => s.push_str(&format!("C{} {:e}\n",j,x)),
            }
        }
        match std::fs::write(filename,s) {
            Ok(_) => OKAY,
            Err(_) => rc(ResultCode::FileWriteError)
        }
    }
}

/// Clamp a bound to the `[NEGATIVE_INFINITY,INFINITY]` range.
pub fn clamp_bound(v : f64) -> f64 { v.clamp(NEGATIVE_INFINITY,INFINITY) }

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SparseStore {
        // 2 rows, 3 columns
        //  [ 1 . 2 ]
        //  [ . 3 4 ]
        let mut s = SparseStore::new(Some("t"));
        assert_eq!(s.add_row(0.0,INFINITY,&[],&[],Some("r0")),0);
        assert_eq!(s.add_row(NEGATIVE_INFINITY,5.0,&[],&[],Some("r1")),0);
        assert_eq!(s.add_col(0.0,1.0,1.0,&[0],&[1.0],Some("x0"),false),0);
        assert_eq!(s.add_col(0.0,1.0,1.0,&[1],&[3.0],Some("x1"),false),0);
        assert_eq!(s.add_col(0.0,1.0,1.0,&[0,1],&[2.0,4.0],Some("x2"),true),0);
        s
    }

    #[test]
    fn two_phase_fetch() {
        let s = store();
        let mut size = 0;
        assert_eq!(s.get_cols(&[2,0],&mut [],&mut [],&mut [],&mut size),0);
        assert_eq!(size,3);
        let mut bgn = vec![0;3];
        let mut ind = vec![0;size];
        let mut val = vec![0.0;size];
        assert_eq!(s.get_cols(&[2,0],&mut bgn,&mut ind,&mut val,&mut size),0);
        assert_eq!(bgn,vec![0,2,3]);
        assert_eq!(ind,vec![0,1,0]);
        assert_eq!(val,vec![2.0,4.0,1.0]);

        assert_eq!(s.get_rows(&[1],&mut [],&mut [],&mut [],&mut size),0);
        assert_eq!(size,2);
        assert_eq!(s.get_rows(&[2],&mut [],&mut [],&mut [],&mut size),ResultCode::ModelInvalidRowIdx.code());
    }

    #[test]
    fn delete_renumbers() {
        let mut s = store();
        assert_eq!(s.set_quad_elements(&[2,1],&[0,2],&[1.0,2.0]),0);
        assert_eq!(s.delete_cols(&[1]),0);
        assert_eq!(s.num_cols(),2);
        assert_eq!(s.col_index("x2"),Some(1));
        assert_eq!(s.entries(),vec![(0,0,1.0),(0,1,2.0),(1,1,4.0)]);
        assert_eq!(s.quad_entries(),vec![(0,1,1.0)]);

        assert_eq!(s.delete_rows(&[0]),0);
        assert_eq!(s.entries(),vec![(0,1,4.0)]);
        assert_eq!(s.delete_rows(&[3]),ResultCode::ModelInvalidRowIdx.code());
    }

    #[test]
    fn attributes() {
        let mut s = store();
        let mut i = 0;
        let mut r = 0.0;
        let mut t = String::new();
        assert_eq!(s.get_int_attr(attr::NUM_ENTS,None,&mut i),0);
        assert_eq!(i,4);
        assert_eq!(s.get_int_attr(attr::IS_INTEGER,Some(2),&mut i),0);
        assert_eq!(i,1);
        assert_eq!(s.get_int_attr(attr::IS_INTEGER,None,&mut i),ResultCode::ModelInvalidIntAttr.code());
        assert_eq!(s.get_int_attr(attr::IS_INTEGER,Some(3),&mut i),ResultCode::ModelInvalidColIdx.code());
        assert_eq!(s.get_int_attr("Bogus",None,&mut i),ResultCode::ModelInvalidIntAttr.code());
        assert_eq!(s.get_int_attr(attr::SPX_NUM_ITERS,None,&mut i),ResultCode::NoStatistics.code());

        assert_eq!(s.set_real_attr(attr::RHS,Some(1),7.0),0);
        assert_eq!(s.get_real_attr(attr::RHS,Some(1),&mut r),0);
        assert_eq!(r,7.0);
        assert_eq!(s.get_real_attr(attr::PRIMAL_SOLN,Some(0),&mut r),ResultCode::NoSoln.code());
        assert_eq!(s.set_real_attr(attr::PRIMAL_OBJ_VAL,None,1.0),ResultCode::ModelInvalidRealAttr.code());

        assert_eq!(s.get_str_attr(attr::ROW_NAME,Some(1),&mut t),0);
        assert_eq!(t,"r1");
        assert_eq!(s.set_str_attr(attr::REMOTE_SERVER,None,"localhost"),0);
        assert_eq!(s.get_str_attr(attr::REMOTE_SERVER,None,&mut t),0);
        assert_eq!(t,"localhost");

        assert_eq!(s.set_int_attr(attr::COL_BASIS,Some(0),9),ResultCode::InvalidBasisStatus.code());
    }

    #[test]
    fn parameters() {
        let mut s = SparseStore::new(None);
        assert_eq!(s.set_param(param::MAX_TIME,ParamValue::Int(10)),0);
        let mut v = ParamValue::Real(0.0);
        assert_eq!(s.get_param(param::MAX_TIME,&mut v),0);
        assert_eq!(v,ParamValue::Real(10.0));
        assert_eq!(s.set_param(param::NUM_THREADS,ParamValue::Real(1.0)),ResultCode::ParamSetError.code());
        assert_eq!(s.set_param("NoSuchParam",ParamValue::Int(1)),ResultCode::ParamSetError.code());
        let mut v = ParamValue::Str(String::new());
        assert_eq!(s.get_param(param::NUM_THREADS,&mut v),ResultCode::ParamGetError.code());
    }
}
