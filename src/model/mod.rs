//! The model front end.
//!
//! [ModelAPI] owns an [Engine] and two mirrors, the list of [Var] handles for the engine's columns
//! and the list of [Cons] handles for its rows. Expressions are translated into sparse index
//! arrays, passed to the engine, and every result code is checked. After each successful
//! structural call the mirrors have the same lengths as the engine's matrix.
//!
//! A handle is valid in the mirror generation it was created in. Deleting variables or reading a
//! problem from file rebuilds the variable mirror from scratch (and likewise for constraints), so
//! all previously issued handles of that kind become stale and are rejected.

mod attrs;
mod io;

use std::cell::Cell;
use std::rc::Rc;
use itertools::izip;
use tracing::{debug, trace, warn};

use crate::attr::{self, is_finite, ConsSense, IisBound, INFINITY, NEGATIVE_INFINITY};
use crate::engine::Engine;
use crate::entity::{Cons, Entity, ModelId, Var};
use crate::error::{Error, Result};
use crate::expr::{Column, ExprLinear, ExprQuad};
use crate::result::{RemoteTask, RemoteTaskStatus, ResultCode, Status};

pub use attrs::{ConsAttrs, VarAttrs};

/// Lifecycle of a model.
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum ModelState {
    /// No entities have been added yet
    Created,
    /// The model has variables or constraints
    Populated,
    /// The last solve finished without error and the model was not modified since
    Solved,
    /// [ModelAPI::free] has been called; all further calls fail with [Error::Freed]
    Freed,
}

/// One side of a constraint passed to [ModelAPI::add_cons].
#[derive(Clone,Debug)]
pub enum ConsSide {
    Expr(ExprLinear),
    Var(Var),
    Const(f64),
}

impl ConsSide {
    fn into_expr(self) -> ExprLinear {
        match self {
            ConsSide::Expr(e) => e,
            ConsSide::Var(v) => ExprLinear::from(v),
            ConsSide::Const(c) => ExprLinear::with_constant(c),
        }
    }
}

impl From<Var> for ConsSide { fn from(v : Var) -> ConsSide { ConsSide::Var(v) } }
impl From<ExprLinear> for ConsSide { fn from(e : ExprLinear) -> ConsSide { ConsSide::Expr(e) } }
impl From<&ExprLinear> for ConsSide { fn from(e : &ExprLinear) -> ConsSide { ConsSide::Expr(e.clone()) } }
impl From<f64> for ConsSide { fn from(c : f64) -> ConsSide { ConsSide::Const(c) } }

/// An irreducible infeasible subsystem as computed by [ModelAPI::compute_iis]. Only members are
/// listed, together with the bounds that take part.
#[derive(Clone,Debug,Default,PartialEq)]
pub struct Iis {
    pub rows : Vec<(Cons,IisBound)>,
    pub cols : Vec<(Var,IisBound)>,
}

impl Iis {
    pub fn is_empty(&self) -> bool { self.rows.is_empty() && self.cols.is_empty() }
}

/// The model object.
///
/// # Example
/// ```
/// use mdomodel::*;
/// let mut m = dummy::Model::new(Some("example"));
/// let x = m.add_var(0.0, 10.0, 1.0, false, Some("x")).unwrap();
/// let y = m.add_var(0.0, INFINITY, 1.0, false, Some("y")).unwrap();
/// let c = m.add_cons(x + y, ConsSense::GreaterEqual, 1.0, Some("c")).unwrap();
/// assert_eq!(m.cons_attrs(c).unwrap().real_attr(attr::LHS).unwrap(), 1.0);
/// ```
pub struct ModelAPI<E> where E : Engine {
    id       : ModelId,
    engine   : E,

    /// Column mirror, `vars[j].index() == j`
    vars     : Vec<Var>,
    /// Row mirror, `conss[i].index() == i`
    conss    : Vec<Cons>,
    var_gen  : u32,
    cons_gen : u32,

    state    : ModelState,
    /// Live model counter of the [Env](crate::Env) this model was created from
    env      : Option<Rc<Cell<usize>>>,
}

impl<E> ModelAPI<E> where E : Engine {
    /// Create a model with a new, empty engine.
    pub fn new(name : Option<&str>) -> ModelAPI<E> {
        Self::from_engine(E::new(name))
    }

    /// Create a model around an existing engine. The mirrors are built from the engine's current
    /// dimensions.
    pub fn from_engine(engine : E) -> ModelAPI<E> {
        let mut m = ModelAPI{
            id       : ModelId::next(),
            engine,
            vars     : Vec::new(),
            conss    : Vec::new(),
            var_gen  : 0,
            cons_gen : 0,
            state    : ModelState::Created,
            env      : None,
        };
        m.rebuild_vars();
        m.rebuild_conss();
        m.state = if m.vars.is_empty() && m.conss.is_empty() { ModelState::Created } else { ModelState::Populated };
        debug!(
            component = "model",
            operation = "create",
            model = %m.id,
            num_vars = m.vars.len(),
            num_conss = m.conss.len(),
            "Created model"
        );
        m
    }

    pub(crate) fn attach_env(&mut self, live : Rc<Cell<usize>>) {
        live.set(live.get()+1);
        self.env = Some(live);
    }

    pub fn id(&self) -> ModelId { self.id }
    pub fn state(&self) -> ModelState { self.state }

    //
    // Internals
    //

    fn eng(&self) -> Result<&E> {
        if self.state == ModelState::Freed { Err(Error::Freed) } else { Ok(&self.engine) }
    }

    fn eng_mut(&mut self) -> Result<&mut E> {
        if self.state == ModelState::Freed { Err(Error::Freed) } else { Ok(&mut self.engine) }
    }

    /// Report a non-zero engine result code as an error.
    fn fail<T>(&self, operation : &'static str, code : i32) -> Result<T> {
        warn!(
            component = "model",
            operation,
            status = "error",
            code,
            "Engine call failed"
        );
        Err(Error::engine(code,self.engine.explain_result(code)))
    }

    /// Convert an engine result code into a `Result`.
    fn check(&self, operation : &'static str, code : i32) -> Result<()> {
        if code == ResultCode::Okay.code() { Ok(()) } else { self.fail(operation,code) }
    }

    fn touched(&mut self) {
        if self.state != ModelState::Freed { self.state = ModelState::Populated; }
    }

    fn rebuild_vars(&mut self) {
        self.var_gen = self.var_gen.wrapping_add(1);
        let (id,generation) = (self.id,self.var_gen);
        self.vars = (0..self.engine.num_cols()).map(|j| Var::new(id,j,generation)).collect();
    }

    fn rebuild_conss(&mut self) {
        self.cons_gen = self.cons_gen.wrapping_add(1);
        let (id,generation) = (self.id,self.cons_gen);
        self.conss = (0..self.engine.num_rows()).map(|i| Cons::new(id,i,generation)).collect();
    }

    fn check_entity<T>(&self, item : &T, generation : u32, len : usize) -> Result<usize> where T : Entity {
        if item.model() != self.id {
            Err(Error::ForeignHandle{ kind : T::KIND, index : item.index() })
        }
        else if item.generation() != generation || item.index() >= len {
            Err(Error::StaleHandle{ kind : T::KIND, index : item.index() })
        }
        else {
            Ok(item.index())
        }
    }

    fn var_index(&self, v : &Var) -> Result<usize> { self.check_entity(v,self.var_gen,self.vars.len()) }
    fn cons_index(&self, c : &Cons) -> Result<usize> { self.check_entity(c,self.cons_gen,self.conss.len()) }

    fn var_indexes(&self, vars : &[Var]) -> Result<Vec<usize>> {
        vars.iter().map(|v| self.var_index(v)).collect()
    }
    fn cons_indexes(&self, conss : &[Cons]) -> Result<Vec<usize>> {
        conss.iter().map(|c| self.cons_index(c)).collect()
    }

    /// Split an expression into column indexes and coefficients.
    fn linear_parts(&self, expr : &ExprLinear) -> Result<(Vec<usize>,Vec<f64>)> {
        let idxs = expr.vars().map(|v| self.var_index(&v)).collect::<Result<Vec<usize>>>()?;
        Ok((idxs,expr.coefs().collect()))
    }

    //
    // Variables
    //

    fn push_col(&mut self, lb : f64, ub : f64, obj : f64, rows : &[usize], vals : &[f64], name : Option<&str>, is_integer : bool) -> Result<Var> {
        let code = self.eng_mut()?.add_col(lb,ub,obj,rows,vals,name,is_integer);
        self.check("add_var",code)?;
        let v = Var::new(self.id,self.vars.len(),self.var_gen);
        self.vars.push(v);
        self.touched();
        trace!(
            component = "model",
            operation = "add_var",
            index = v.index(),
            nnz = rows.len(),
            "Added variable"
        );
        Ok(v)
    }

    /// Add a variable without constraint coefficients.
    ///
    /// # Arguments
    /// - `lb`, `ub` Bounds, values beyond [INFINITY] are infinite.
    /// - `obj` Objective coefficient.
    /// - `is_integer` Integrality flag.
    /// - `name` Optional name.
    ///
    /// # Returns
    /// The handle of the new variable. Its index is the number of variables before the call.
    pub fn add_var(&mut self, lb : f64, ub : f64, obj : f64, is_integer : bool, name : Option<&str>) -> Result<Var> {
        self.push_col(lb,ub,obj,&[],&[],name,is_integer)
    }

    /// Add a variable with the constraint coefficients given by `col`.
    pub fn add_var_with_col(&mut self, lb : f64, ub : f64, obj : f64, col : &Column, is_integer : bool, name : Option<&str>) -> Result<Var> {
        let rows = col.terms().iter().map(|(c,_)| self.cons_index(c)).collect::<Result<Vec<usize>>>()?;
        let vals : Vec<f64> = col.terms().iter().map(|t| t.1).collect();
        self.push_col(lb,ub,obj,&rows,&vals,name,is_integer)
    }

    /// Add a variable participating in the constraints `conss`.
    ///
    /// # Arguments
    /// - `coefs` Coefficients matching `conss`. If `None`, all coefficients are `1.0`.
    pub fn add_var_with_conss(&mut self, lb : f64, ub : f64, obj : f64, conss : &[Cons], coefs : Option<&[f64]>, is_integer : bool, name : Option<&str>) -> Result<Var> {
        let rows = self.cons_indexes(conss)?;
        let vals = match coefs {
            Some(c) if c.len() != conss.len() => return Err(Error::LengthMismatch{ what : "coefficients", expected : conss.len(), got : c.len() }),
            Some(c) => c.to_vec(),
            None => vec![1.0; conss.len()],
        };
        self.push_col(lb,ub,obj,&rows,&vals,name,is_integer)
    }

    /// Add `count` unnamed variables with bounds `[0,INFINITY]` and zero objective.
    pub fn add_vars(&mut self, count : usize, is_integer : bool) -> Result<Vec<Var>> {
        (0..count).map(|_| self.push_col(0.0,INFINITY,0.0,&[],&[],None,is_integer)).collect()
    }

    /// Add variables from parallel arrays. `ints` and `names` are optional; when given they must
    /// have the same length as `lbs`.
    pub fn add_vars_with(&mut self, lbs : &[f64], ubs : &[f64], objs : &[f64], ints : Option<&[bool]>, names : Option<&[&str]>) -> Result<Vec<Var>> {
        let n = lbs.len();
        check_len("upper bounds",n,ubs.len())?;
        check_len("objective coefficients",n,objs.len())?;
        if let Some(i) = ints { check_len("integrality flags",n,i.len())?; }
        if let Some(s) = names { check_len("names",n,s.len())?; }
        (0..n).map(|k| self.push_col(lbs[k],ubs[k],objs[k],&[],&[],names.map(|s| s[k]),ints.is_some_and(|i| i[k]))).collect()
    }

    /// Add variables with columns, see [ModelAPI::add_vars_with].
    pub fn add_vars_with_cols(&mut self, lbs : &[f64], ubs : &[f64], objs : &[f64], cols : &[Column], ints : Option<&[bool]>, names : Option<&[&str]>) -> Result<Vec<Var>> {
        let n = lbs.len();
        check_len("upper bounds",n,ubs.len())?;
        check_len("objective coefficients",n,objs.len())?;
        check_len("columns",n,cols.len())?;
        if let Some(i) = ints { check_len("integrality flags",n,i.len())?; }
        if let Some(s) = names { check_len("names",n,s.len())?; }
        (0..n).map(|k| self.add_var_with_col(lbs[k],ubs[k],objs[k],&cols[k],ints.is_some_and(|i| i[k]),names.map(|s| s[k]))).collect()
    }

    //
    // Constraints
    //

    fn push_row(&mut self, lhs : f64, rhs : f64, expr : &ExprLinear, name : Option<&str>) -> Result<Cons> {
        let mut expr = expr.clone();
        expr.purge();
        let (cols,vals) = self.linear_parts(&expr)?;
        let code = self.eng_mut()?.add_row(lhs,rhs,&cols,&vals,name);
        self.check("add_cons",code)?;
        let c = Cons::new(self.id,self.conss.len(),self.cons_gen);
        self.conss.push(c);
        self.touched();
        trace!(
            component = "model",
            operation = "add_cons",
            index = c.index(),
            nnz = cols.len(),
            lhs,
            rhs,
            "Added constraint"
        );
        Ok(c)
    }

    /// Add the constraint `expr <sense> rhs`. A finite `rhs` is adjusted by the constant of
    /// `expr`.
    fn add_cons_normalized(&mut self, expr : &ExprLinear, sense : ConsSense, rhs : f64, name : Option<&str>) -> Result<Cons> {
        let rhs = if is_finite(rhs) { rhs - expr.constant() } else { rhs };
        let (lhs,rhs) = sense.bounds(rhs);
        self.push_row(lhs,rhs,expr,name)
    }

    /// Add a constraint `lhs <sense> rhs`.
    ///
    /// Each side is an expression, a variable or a constant. If both sides are non-constant the
    /// constraint `lhs - rhs <sense> 0` is added. If the constant is on the left, or a variable is
    /// compared to an expression, the sides are swapped and the sense inverted. A finite constant side is adjusted by the expression's
    /// constant term.
    ///
    /// # Example
    /// ```
    /// use mdomodel::*;
    /// let mut m = dummy::Model::new(None);
    /// let x = m.add_var(0.0, 1.0, 0.0, false, None).unwrap();
    /// // 3 <= x + 1  is  x >= 2
    /// let c = m.add_cons(3.0, ConsSense::LessEqual, x + 1.0, None).unwrap();
    /// assert_eq!(m.cons_attrs(c).unwrap().real_attr(attr::LHS).unwrap(), 2.0);
    /// ```
    pub fn add_cons<L,R>(&mut self, lhs : L, sense : ConsSense, rhs : R, name : Option<&str>) -> Result<Cons> where L : Into<ConsSide>, R : Into<ConsSide> {
        match (lhs.into(),rhs.into()) {
            (ConsSide::Const(_),ConsSide::Const(_)) =>
                Err(Error::InvalidArgument("a constraint needs an expression on at least one side".to_string())),
            // A variable against an expression is stated with the expression on the left
            (ConsSide::Var(v),ConsSide::Expr(r)) => self.add_cons(r,sense.inverse(),v,name),
            (ConsSide::Const(b),r) => self.add_cons_normalized(&r.into_expr(),sense.inverse(),b,name),
            (l,ConsSide::Const(b)) => self.add_cons_normalized(&l.into_expr(),sense,b,name),
            (l,r) => {
                let mut e = l.into_expr();
                e.subtract(&r.into_expr());
                self.add_cons_normalized(&e,sense,0.0,name)
            },
        }
    }

    /// Add a range constraint `lower <= expr <= upper`. Finite bounds are adjusted by the
    /// constant of `expr`.
    pub fn add_range(&mut self, expr : &ExprLinear, lower : f64, upper : f64, name : Option<&str>) -> Result<Cons> {
        let c = expr.constant();
        let lhs = if is_finite(lower) { lower - c } else { lower };
        let rhs = if is_finite(upper) { upper - c } else { upper };
        self.push_row(lhs,rhs,expr,name)
    }

    /// Add `count` empty constraints with bounds `(NEGATIVE_INFINITY,0)`.
    pub fn add_conss(&mut self, count : usize) -> Result<Vec<Cons>> {
        let empty = ExprLinear::new();
        (0..count).map(|_| self.push_row(NEGATIVE_INFINITY,0.0,&empty,None)).collect()
    }

    /// Add constraints `exprs[k] <senses[k]> rhss[k]`.
    pub fn add_conss_with(&mut self, exprs : &[ExprLinear], senses : &[ConsSense], rhss : &[f64], names : Option<&[&str]>) -> Result<Vec<Cons>> {
        let n = exprs.len();
        check_len("senses",n,senses.len())?;
        check_len("right hand sides",n,rhss.len())?;
        if let Some(s) = names { check_len("names",n,s.len())?; }
        izip!(exprs,senses,rhss).enumerate()
            .map(|(k,(e,&s,&b))| self.add_cons_normalized(e,s,b,names.map(|s| s[k])))
            .collect()
    }

    /// Add range constraints `lowers[k] <= exprs[k] <= uppers[k]`.
    pub fn add_ranges(&mut self, exprs : &[ExprLinear], lowers : &[f64], uppers : &[f64], names : Option<&[&str]>) -> Result<Vec<Cons>> {
        let n = exprs.len();
        check_len("lower bounds",n,lowers.len())?;
        check_len("upper bounds",n,uppers.len())?;
        if let Some(s) = names { check_len("names",n,s.len())?; }
        izip!(exprs,lowers,uppers).enumerate()
            .map(|(k,(e,&l,&u))| self.add_range(e,l,u,names.map(|s| s[k])))
            .collect()
    }

    //
    // Lookup
    //

    pub fn num_vars(&self) -> Result<usize> { self.eng().map(|_| self.vars.len()) }
    pub fn num_conss(&self) -> Result<usize> { self.eng().map(|_| self.conss.len()) }

    /// Get the variable with index `j`.
    pub fn var(&self, j : usize) -> Result<Var> {
        self.eng()?;
        match self.vars.get(j) {
            Some(v) => Ok(*v),
            None => self.fail("var",ResultCode::ModelInvalidColIdx.code()),
        }
    }

    /// Get the constraint with index `i`.
    pub fn cons(&self, i : usize) -> Result<Cons> {
        self.eng()?;
        match self.conss.get(i) {
            Some(c) => Ok(*c),
            None => self.fail("cons",ResultCode::ModelInvalidRowIdx.code()),
        }
    }

    /// Find a variable by name.
    pub fn var_by_name(&self, name : &str) -> Result<Var> {
        match self.eng()?.col_index(name).and_then(|j| self.vars.get(j)) {
            Some(v) => Ok(*v),
            None => self.fail("var_by_name",ResultCode::ModelInvalidColName.code()),
        }
    }

    /// Find a constraint by name.
    pub fn cons_by_name(&self, name : &str) -> Result<Cons> {
        match self.eng()?.row_index(name).and_then(|i| self.conss.get(i)) {
            Some(c) => Ok(*c),
            None => self.fail("cons_by_name",ResultCode::ModelInvalidRowName.code()),
        }
    }

    /// All variables, in index order.
    pub fn vars(&self) -> Result<&[Var]> { self.eng().map(|_| self.vars.as_slice()) }
    /// All constraints, in index order.
    pub fn conss(&self) -> Result<&[Cons]> { self.eng().map(|_| self.conss.as_slice()) }

    //
    // Deletion and synchronization
    //

    /// Delete variables. Duplicates are ignored. All variable handles issued before the call
    /// become stale; fetch new ones with [ModelAPI::vars].
    pub fn delete_vars(&mut self, vars : &[Var]) -> Result<()> {
        if vars.is_empty() { return Ok(()); }
        let mut idxs = self.var_indexes(vars)?;
        idxs.sort_unstable();
        idxs.dedup();
        let code = self.eng_mut()?.delete_cols(&idxs);
        self.check("delete_vars",code)?;
        self.rebuild_vars();
        self.touched();
        debug!(
            component = "model",
            operation = "delete_vars",
            deleted = idxs.len(),
            num_vars = self.vars.len(),
            "Deleted variables"
        );
        Ok(())
    }

    /// Delete constraints. Duplicates are ignored. All constraint handles issued before the
    /// call become stale.
    pub fn delete_conss(&mut self, conss : &[Cons]) -> Result<()> {
        if conss.is_empty() { return Ok(()); }
        let mut idxs = self.cons_indexes(conss)?;
        idxs.sort_unstable();
        idxs.dedup();
        let code = self.eng_mut()?.delete_rows(&idxs);
        self.check("delete_conss",code)?;
        self.rebuild_conss();
        self.touched();
        debug!(
            component = "model",
            operation = "delete_conss",
            deleted = idxs.len(),
            num_conss = self.conss.len(),
            "Deleted constraints"
        );
        Ok(())
    }

    /// Rebuild both mirrors from the engine's dimensions. This is needed after a failed
    /// structural call or when the engine was modified directly; it invalidates all handles.
    pub fn sync(&mut self) -> Result<()> {
        self.eng()?;
        self.rebuild_vars();
        self.rebuild_conss();
        Ok(())
    }

    //
    // Sparse data
    //

    /// Get the constraint coefficients of a variable.
    pub fn col(&self, var : Var) -> Result<Column> {
        let j = self.var_index(&var)?;
        let eng = self.eng()?;
        let mut size = 0;
        self.check("col",eng.get_cols(&[j],&mut [],&mut [],&mut [],&mut size))?;
        let mut bgn = [0usize;2];
        let mut ind = vec![0usize; size];
        let mut val = vec![0.0; size];
        self.check("col",eng.get_cols(&[j],&mut bgn,&mut ind,&mut val,&mut size))?;
        let mut col = Column::new();
        for (&i,&v) in ind[bgn[0]..bgn[1]].iter().zip(val[bgn[0]..bgn[1]].iter()) {
            col.add_term(v,self.conss[i]);
        }
        Ok(col)
    }

    /// Get the left hand side expression of a constraint. The constant term is zero.
    pub fn expr_linear(&self, cons : Cons) -> Result<ExprLinear> {
        let i = self.cons_index(&cons)?;
        let eng = self.eng()?;
        let mut size = 0;
        self.check("expr_linear",eng.get_rows(&[i],&mut [],&mut [],&mut [],&mut size))?;
        let mut bgn = [0usize;2];
        let mut ind = vec![0usize; size];
        let mut val = vec![0.0; size];
        self.check("expr_linear",eng.get_rows(&[i],&mut bgn,&mut ind,&mut val,&mut size))?;
        let mut expr = ExprLinear::new();
        for (&j,&v) in ind[bgn[0]..bgn[1]].iter().zip(val[bgn[0]..bgn[1]].iter()) {
            expr.add_term(v,self.vars[j]);
        }
        Ok(expr)
    }

    fn element_indexes(&self, conss : &[Cons], vars : &[Var]) -> Result<(Vec<usize>,Vec<usize>)> {
        check_len("variables",conss.len(),vars.len())?;
        Ok((self.cons_indexes(conss)?,self.var_indexes(vars)?))
    }

    /// Get the matrix coefficients at `(conss[k],vars[k])`.
    pub fn elements(&self, conss : &[Cons], vars : &[Var]) -> Result<Vec<f64>> {
        let (rows,cols) = self.element_indexes(conss,vars)?;
        let mut vals = vec![0.0; rows.len()];
        self.check("elements",self.eng()?.get_elements(&rows,&cols,&mut vals))?;
        Ok(vals)
    }

    /// Set the matrix coefficients at `(conss[k],vars[k])`.
    pub fn set_elements(&mut self, conss : &[Cons], vars : &[Var], vals : &[f64]) -> Result<()> {
        let (rows,cols) = self.element_indexes(conss,vars)?;
        check_len("values",rows.len(),vals.len())?;
        let code = self.eng_mut()?.set_elements(&rows,&cols,vals);
        self.check("set_elements",code)?;
        self.touched();
        Ok(())
    }

    pub fn delete_elements(&mut self, conss : &[Cons], vars : &[Var]) -> Result<()> {
        let (rows,cols) = self.element_indexes(conss,vars)?;
        let code = self.eng_mut()?.delete_elements(&rows,&cols);
        self.check("delete_elements",code)?;
        self.touched();
        Ok(())
    }

    /// Remove all coefficients of the constraint matrix.
    pub fn delete_all_elements(&mut self) -> Result<()> {
        let code = self.eng_mut()?.delete_all_elements();
        self.check("delete_all_elements",code)?;
        self.touched();
        Ok(())
    }

    fn quad_indexes(&self, vars1 : &[Var], vars2 : &[Var]) -> Result<(Vec<usize>,Vec<usize>)> {
        check_len("second variables",vars1.len(),vars2.len())?;
        Ok((self.var_indexes(vars1)?,self.var_indexes(vars2)?))
    }

    /// Get entries of the quadratic objective matrix `Q`, where the objective is
    /// `c'x + 1/2 x'Qx`.
    pub fn quadratic_elements(&self, vars1 : &[Var], vars2 : &[Var]) -> Result<Vec<f64>> {
        let (c1,c2) = self.quad_indexes(vars1,vars2)?;
        let mut vals = vec![0.0; c1.len()];
        self.check("quadratic_elements",self.eng()?.get_quad_elements(&c1,&c2,&mut vals))?;
        Ok(vals)
    }

    /// Set entries of the quadratic objective matrix. The pairs are passed on as given; `Q` is
    /// symmetric, so `(x,y)` and `(y,x)` address the same entry.
    pub fn set_quadratic_elements(&mut self, vars1 : &[Var], vars2 : &[Var], vals : &[f64]) -> Result<()> {
        let (c1,c2) = self.quad_indexes(vars1,vars2)?;
        check_len("values",c1.len(),vals.len())?;
        let code = self.eng_mut()?.set_quad_elements(&c1,&c2,vals);
        self.check("set_quadratic_elements",code)?;
        self.touched();
        Ok(())
    }

    pub fn delete_quadratic_elements(&mut self, vars1 : &[Var], vars2 : &[Var]) -> Result<()> {
        let (c1,c2) = self.quad_indexes(vars1,vars2)?;
        let code = self.eng_mut()?.delete_quad_elements(&c1,&c2);
        self.check("delete_quadratic_elements",code)?;
        self.touched();
        Ok(())
    }

    pub fn delete_all_quadratic_elements(&mut self) -> Result<()> {
        let code = self.eng_mut()?.delete_all_quad_elements();
        self.check("delete_all_quadratic_elements",code)?;
        self.touched();
        Ok(())
    }

    /// Replace the objective by `obj`.
    ///
    /// The linear part sets the objective coefficients (all other variables get `0`) and the
    /// objective offset. The quadratic triples are passed to
    /// [ModelAPI::set_quadratic_elements] unchanged, so each coefficient is an entry of `Q` in
    /// `c'x + 1/2 x'Qx`.
    pub fn set_quadratic_objective(&mut self, obj : &ExprQuad) -> Result<()> {
        let mut lin = obj.linear().clone();
        lin.purge();
        let (cols,coefs) = self.linear_parts(&lin)?;
        let (c1,c2) = self.quad_indexes(&obj.vars1(),&obj.vars2())?;

        let mut objs = vec![0.0; self.eng()?.num_cols()];
        for (&j,&c) in cols.iter().zip(coefs.iter()) { objs[j] = c; }
        const OP : &str = "set_quadratic_objective";
        for (j,&c) in objs.iter().enumerate() {
            let code = self.eng_mut()?.set_real_attr_index(attr::OBJ,j,c);
            self.check(OP,code)?;
        }
        let code = self.eng_mut()?.set_real_attr(attr::OBJ_CONST,lin.constant());
        self.check(OP,code)?;
        let code = self.eng_mut()?.delete_all_quad_elements();
        self.check(OP,code)?;
        let code = self.eng_mut()?.set_quad_elements(&c1,&c2,&obj.coefs());
        self.check(OP,code)?;
        self.touched();
        debug!(
            component = "model",
            operation = "set_quadratic_objective",
            linear_terms = cols.len(),
            quadratic_terms = c1.len(),
            "Replaced objective"
        );
        Ok(())
    }

    //
    // Objective
    //

    pub fn is_min_obj_sense(&self) -> Result<bool> { Ok(self.int_attr(attr::MIN_SENSE)? != 0) }
    pub fn is_max_obj_sense(&self) -> Result<bool> { Ok(self.int_attr(attr::MIN_SENSE)? == 0) }
    pub fn set_min_obj_sense(&mut self) -> Result<()> { self.set_int_attr(attr::MIN_SENSE,1) }
    pub fn set_max_obj_sense(&mut self) -> Result<()> { self.set_int_attr(attr::MIN_SENSE,0) }

    pub fn obj_offset(&self) -> Result<f64> { self.real_attr(attr::OBJ_CONST) }
    pub fn set_obj_offset(&mut self, c : f64) -> Result<()> { self.set_real_attr(attr::OBJ_CONST,c) }

    /// Objective coefficients of `vars`.
    pub fn objs(&self, vars : &[Var]) -> Result<Vec<f64>> { self.real_attr_vars(attr::OBJ,vars) }
    pub fn set_objs(&mut self, vars : &[Var], vals : &[f64]) -> Result<()> { self.set_real_attr_vars(attr::OBJ,vars,vals) }

    //
    // Solving
    //

    /// Optimize the problem.
    ///
    /// This fails if the engine returns an error code, including the limit codes
    /// ([ResultCode::AbortTimeLimit] etc.). Finding that the problem is infeasible or unbounded is
    /// *not* an error; check [ModelAPI::status].
    pub fn solve_prob(&mut self) -> Result<()> {
        debug!(
            component = "model",
            operation = "solve",
            num_vars = self.vars.len(),
            num_conss = self.conss.len(),
            "Solving"
        );
        let code = self.eng_mut()?.solve_prob();
        self.check("solve",code)?;
        self.state = ModelState::Solved;
        debug!(
            component = "model",
            operation = "solve",
            status = "success",
            model_status = self.engine.status(),
            "Solve finished"
        );
        Ok(())
    }

    /// Status of the last solve.
    pub fn status(&self) -> Result<Status> {
        Ok(Status::from_code(self.eng()?.status()).unwrap_or_default())
    }

    pub fn explain_status(&self, status : Status) -> Result<String> {
        Ok(self.eng()?.explain_status(status.code()))
    }

    pub fn explain_result(&self, code : i32) -> Result<String> {
        Ok(self.eng()?.explain_result(code))
    }

    /// Write a summary of the last solve to the engine log.
    pub fn display_results(&self) -> Result<()> {
        self.check("display_results",self.eng()?.display_results())
    }

    /// Compute an irreducible infeasible subsystem of an infeasible problem.
    pub fn compute_iis(&mut self) -> Result<Iis> {
        let code = self.eng_mut()?.compute_iis();
        self.check("compute_iis",code)?;

        let mut iis = Iis::default();
        for &c in self.conss.iter() {
            let mut v = 0;
            self.check("compute_iis",self.engine.get_int_attr_index(attr::ROW_IIS,c.index(),&mut v))?;
            match IisBound::from_code(v) {
                Some(IisBound::None) => {},
                Some(b) => iis.rows.push((c,b)),
                None => return Err(Error::InvalidArgument(format!("invalid IIS flag {} for row {}",v,c.index()))),
            }
        }
        for &x in self.vars.iter() {
            let mut v = 0;
            self.check("compute_iis",self.engine.get_int_attr_index(attr::COL_IIS,x.index(),&mut v))?;
            match IisBound::from_code(v) {
                Some(IisBound::None) => {},
                Some(b) => iis.cols.push((x,b)),
                None => return Err(Error::InvalidArgument(format!("invalid IIS flag {} for column {}",v,x.index()))),
            }
        }
        debug!(
            component = "model",
            operation = "compute_iis",
            rows = iis.rows.len(),
            cols = iis.cols.len(),
            "Computed IIS"
        );
        Ok(iis)
    }

    //
    // Remote jobs
    //

    /// Submit the problem as a job. Returns the job identifier.
    pub fn submit_task(&mut self) -> Result<String> {
        let mut job = String::new();
        let code = self.eng_mut()?.submit_task(&mut job);
        self.check("submit_task",code)?;
        debug!(component = "model", operation = "submit_task", job = job.as_str(), "Submitted job");
        Ok(job)
    }

    /// Query the state of a submitted job.
    pub fn retrieve_task(&mut self, job : &str) -> Result<RemoteTask> {
        let mut state = String::new();
        let mut model_status = 0;
        let mut result = 0;
        let mut has_soln = false;
        let code = self.eng_mut()?.retrieve_task(job,&mut state,&mut model_status,&mut result,&mut has_soln);
        self.check("retrieve_task",code)?;
        let state = state.parse::<RemoteTaskStatus>().map_err(Error::InvalidArgument)?;
        if state == RemoteTaskStatus::Finished {
            self.state = ModelState::Solved;
        }
        Ok(RemoteTask{
            job          : job.to_string(),
            state,
            model_status : Status::from_code(model_status).unwrap_or_default(),
            result,
            has_soln,
        })
    }

    //
    // Engine log
    //

    pub fn set_log_to_console(&mut self, on : bool) -> Result<()> {
        self.eng_mut()?.set_log_to_console(on);
        Ok(())
    }

    /// Append the engine log to `filename`, or stop logging to file if `None`.
    pub fn set_log_file(&mut self, filename : Option<&str>) -> Result<()> {
        let code = self.eng_mut()?.set_log_file(filename);
        self.check("set_log_file",code)
    }

    /// Attach a log callback. It will receive messages from the engine while solving and
    /// during a few other calls. Lines may arrive in several chunks.
    pub fn set_log_callback<F>(&mut self, func : F) -> Result<()> where F : 'static+Fn(&str) {
        self.eng_mut()?.set_log_callback(Some(Rc::new(func)));
        Ok(())
    }

    pub fn clear_log_callback(&mut self) -> Result<()> {
        self.eng_mut()?.set_log_callback(None);
        Ok(())
    }

    //
    // Lifecycle
    //

    /// Release the engine. Calling this more than once has no effect. All other calls fail with
    /// [Error::Freed] afterwards.
    pub fn free(&mut self) {
        if self.state == ModelState::Freed { return; }
        self.engine.free();
        self.state = ModelState::Freed;
        if let Some(live) = self.env.take() {
            live.set(live.get().saturating_sub(1));
        }
        debug!(component = "model", operation = "free", model = %self.id, "Freed model");
    }

    /// Create an independent copy with the same problem data, solution and parameters. Handles of
    /// this model are not valid for the copy.
    pub(crate) fn duplicate(&self) -> Result<ModelAPI<E>> {
        Ok(ModelAPI::from_engine(self.eng()?.duplicate()))
    }
}

impl<E> Drop for ModelAPI<E> where E : Engine {
    fn drop(&mut self) { self.free(); }
}

fn check_len(what : &'static str, expected : usize, got : usize) -> Result<()> {
    if expected != got { Err(Error::LengthMismatch{ what, expected, got }) } else { Ok(()) }
}
