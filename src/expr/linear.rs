use std::ops::{Add, Mul, Neg, Sub};
use crate::entity::Var;
use crate::error::{Error, Result};
use super::{mult_add_terms, purge_terms, remove_entity, terms_equal};

/// A linear expression `sum_i c_i x_i + constant`.
///
/// Terms are stored in the order they were added, and the same variable may occur several
/// times until the expression is purged.
///
/// # Example
/// ```
/// use mdomodel::*;
/// use mdomodel::dummy::Model;
///
/// let mut m = Model::new(Some("example"));
/// let x = m.add_var(0.0, 10.0, 1.0, false, Some("x")).unwrap();
/// let y = m.add_var(0.0, 10.0, 1.0, false, Some("y")).unwrap();
///
/// let mut e = ExprLinear::with_constant(2.0);
/// e.add_term(1.0, y);
/// e.add_term(3.0, x);
/// e.add_term(-1.0, y);
/// e.purge();
/// assert_eq!(e.len(), 2);
/// assert_eq!(e.var(0), x);
/// assert_eq!(e.coef(1), 0.0);
/// ```
#[derive(Clone,Debug,Default,PartialEq)]
pub struct ExprLinear {
    terms    : Vec<(Var,f64)>,
    constant : f64,
}

impl ExprLinear {
    pub fn new() -> ExprLinear { Default::default() }

    /// Create an expression with no terms and the given constant.
    pub fn with_constant(constant : f64) -> ExprLinear { ExprLinear{ terms : Vec::new(), constant } }

    /// Append a single raw term.
    pub fn add_term(&mut self, coef : f64, var : Var) {
        self.terms.push((var,coef));
    }

    /// Append terms pairwise from `coefs` and `vars`.
    ///
    /// # Arguments
    /// - `coefs` Coefficients
    /// - `vars` Variables, must have the same length as `coefs`.
    pub fn add_terms(&mut self, coefs : &[f64], vars : &[Var]) -> Result<()> {
        if coefs.len() != vars.len() {
            return Err(Error::LengthMismatch{ what : "coefficients and variables", expected : coefs.len(), got : vars.len() });
        }
        self.terms.extend(vars.iter().copied().zip(coefs.iter().copied()));
        Ok(())
    }

    /// Append the terms `start..start+len` from `coefs` and `vars`.
    pub fn add_terms_range(&mut self, coefs : &[f64], vars : &[Var], start : usize, len : usize) -> Result<()> {
        let avail = coefs.len().min(vars.len());
        let end = start.checked_add(len)
            .ok_or_else(|| Error::InvalidArgument(format!("term range {}+{} overflows",start,len)))?;
        if end > avail {
            return Err(Error::LengthMismatch{ what : "term range", expected : end, got : avail });
        }
        self.add_terms(&coefs[start..end], &vars[start..end])
    }

    /// Add `k * other` to this expression, including the constant. Multiplying by zero does
    /// nothing.
    pub fn mult_add(&mut self, k : f64, other : &ExprLinear) {
        if k == 0.0 { return; }
        mult_add_terms(&mut self.terms, k, &other.terms);
        self.constant += k * other.constant;
    }

    pub fn add(&mut self, other : &ExprLinear) { self.mult_add(1.0, other) }
    pub fn subtract(&mut self, other : &ExprLinear) { self.mult_add(-1.0, other) }

    /// Sort terms by variable index and merge terms for the same variable.
    pub fn purge(&mut self) { purge_terms(&mut self.terms) }

    /// Remove all raw terms referring to `var`. Returns `true` if any were found.
    pub fn remove_term(&mut self, var : Var) -> bool { remove_entity(&mut self.terms, &var) }

    /// Remove the term at position `i`.
    pub fn remove_term_at(&mut self, i : usize) -> (Var,f64) { self.terms.remove(i) }

    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn var(&self, i : usize) -> Var { self.terms[i].0 }
    pub fn coef(&self, i : usize) -> f64 { self.terms[i].1 }
    pub fn terms(&self) -> &[(Var,f64)] { self.terms.as_slice() }
    pub fn vars(&self) -> impl Iterator<Item=Var> + '_ { self.terms.iter().map(|t| t.0) }
    pub fn coefs(&self) -> impl Iterator<Item=f64> + '_ { self.terms.iter().map(|t| t.1) }

    pub fn constant(&self) -> f64 { self.constant }
    pub fn set_constant(&mut self, c : f64) { self.constant = c; }
    pub fn add_constant(&mut self, c : f64) { self.constant += c; }

    /// Remove all terms and reset the constant.
    pub fn clear(&mut self) {
        self.terms.clear();
        self.constant = 0.0;
    }

    /// Compare two expressions.
    ///
    /// Both expressions are purged before the terms are compared, so the comparison mutates
    /// both operands. Coefficients are compared exactly.
    pub fn equals(&mut self, other : &mut ExprLinear) -> bool {
        if self.len() != other.len() || self.constant != other.constant {
            return false;
        }
        self.purge();
        other.purge();
        terms_equal(&self.terms, &other.terms)
    }
}

impl From<Var> for ExprLinear {
    fn from(v : Var) -> ExprLinear { ExprLinear{ terms : vec![(v,1.0)], constant : 0.0 } }
}

impl From<f64> for ExprLinear {
    fn from(c : f64) -> ExprLinear { ExprLinear::with_constant(c) }
}

impl FromIterator<(Var,f64)> for ExprLinear {
    fn from_iter<I: IntoIterator<Item = (Var,f64)>>(iter: I) -> Self {
        ExprLinear{ terms : iter.into_iter().collect(), constant : 0.0 }
    }
}

impl Add for ExprLinear {
    type Output = ExprLinear;
    fn add(mut self, rhs: ExprLinear) -> ExprLinear { self.mult_add(1.0,&rhs); self }
}

impl Add<Var> for ExprLinear {
    type Output = ExprLinear;
    fn add(mut self, rhs: Var) -> ExprLinear { self.add_term(1.0,rhs); self }
}

impl Add<f64> for ExprLinear {
    type Output = ExprLinear;
    fn add(mut self, rhs: f64) -> ExprLinear { self.constant += rhs; self }
}

impl Sub for ExprLinear {
    type Output = ExprLinear;
    fn sub(mut self, rhs: ExprLinear) -> ExprLinear { self.subtract(&rhs); self }
}

impl Sub<Var> for ExprLinear {
    type Output = ExprLinear;
    fn sub(mut self, rhs: Var) -> ExprLinear { self.add_term(-1.0,rhs); self }
}

impl Sub<f64> for ExprLinear {
    type Output = ExprLinear;
    fn sub(mut self, rhs: f64) -> ExprLinear { self.constant -= rhs; self }
}

impl Neg for ExprLinear {
    type Output = ExprLinear;
    fn neg(mut self) -> ExprLinear {
        self.terms.iter_mut().for_each(|t| t.1 = -t.1);
        self.constant = -self.constant;
        self
    }
}

impl Mul<f64> for ExprLinear {
    type Output = ExprLinear;
    fn mul(mut self, k: f64) -> ExprLinear {
        self.terms.iter_mut().for_each(|t| t.1 *= k);
        self.constant *= k;
        self
    }
}

impl Mul<f64> for Var {
    type Output = ExprLinear;
    fn mul(self, k: f64) -> ExprLinear { ExprLinear{ terms : vec![(self,k)], constant : 0.0 } }
}

impl Mul<Var> for f64 {
    type Output = ExprLinear;
    fn mul(self, v: Var) -> ExprLinear { v * self }
}

impl Add<Var> for Var {
    type Output = ExprLinear;
    fn add(self, rhs: Var) -> ExprLinear { ExprLinear{ terms : vec![(self,1.0),(rhs,1.0)], constant : 0.0 } }
}

impl Sub<Var> for Var {
    type Output = ExprLinear;
    fn sub(self, rhs: Var) -> ExprLinear { ExprLinear{ terms : vec![(self,1.0),(rhs,-1.0)], constant : 0.0 } }
}

impl Add<f64> for Var {
    type Output = ExprLinear;
    fn add(self, rhs: f64) -> ExprLinear { ExprLinear{ terms : vec![(self,1.0)], constant : rhs } }
}

impl Sub<f64> for Var {
    type Output = ExprLinear;
    fn sub(self, rhs: f64) -> ExprLinear { ExprLinear{ terms : vec![(self,1.0)], constant : -rhs } }
}

impl Add<ExprLinear> for Var {
    type Output = ExprLinear;
    fn add(self, rhs: ExprLinear) -> ExprLinear { rhs + self }
}

impl Sub<ExprLinear> for Var {
    type Output = ExprLinear;
    fn sub(self, rhs: ExprLinear) -> ExprLinear { -rhs + self }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ModelId;

    fn vars(n : usize) -> Vec<Var> {
        let m = ModelId::next();
        (0..n).map(|i| Var::new(m,i,0)).collect()
    }

    #[test]
    fn purge_merges_and_sorts() {
        let x = vars(4);
        let mut e = ExprLinear::new();
        e.add_term(1.0, x[3]);
        e.add_term(2.0, x[1]);
        e.add_term(3.0, x[3]);
        e.add_term(-2.0, x[1]);
        e.add_term(5.0, x[0]);
        e.purge();
        assert_eq!(e.terms(), &[(x[0],5.0),(x[1],0.0),(x[3],4.0)]);
    }

    #[test]
    fn mult_add_zero_is_noop() {
        let x = vars(2);
        let mut e = ExprLinear::with_constant(1.5);
        e.add_term(2.0,x[0]);
        let mut o = ExprLinear::with_constant(7.0);
        o.add_term(3.0,x[1]);

        let before = e.clone();
        e.mult_add(0.0,&o);
        assert_eq!(e,before);

        e.mult_add(2.0,&o);
        assert_eq!(e.len(),2);
        assert_eq!(e.coef(1),6.0);
        assert_eq!(e.constant(),15.5);
    }

    #[test]
    fn add_terms_length_mismatch() {
        let x = vars(2);
        let mut e = ExprLinear::new();
        assert!(matches!(e.add_terms(&[1.0], &x), Err(Error::LengthMismatch{..})));
        assert!(e.add_terms(&[1.0,2.0], &x).is_ok());
        assert!(e.add_terms_range(&[1.0,2.0], &x, 1, 2).is_err());
        assert!(e.add_terms_range(&[1.0,2.0], &x, 1, 1).is_ok());
        assert_eq!(e.len(),3);
        assert_eq!(e.var(2),x[1]);
    }

    #[test]
    fn remove_term_removes_all_raw() {
        let x = vars(2);
        let mut e = ExprLinear::new();
        e.add_term(1.0,x[0]);
        e.add_term(1.0,x[1]);
        e.add_term(1.0,x[0]);
        assert!(e.remove_term(x[0]));
        assert!(!e.remove_term(x[0]));
        assert_eq!(e.len(),1);
    }

    #[test]
    fn equals_purges_operands() {
        let x = vars(2);
        let mut a = ExprLinear::new();
        a.add_term(1.0,x[1]);
        a.add_term(2.0,x[0]);
        let mut b = ExprLinear::new();
        b.add_term(2.0,x[0]);
        b.add_term(1.0,x[1]);
        assert!(a.equals(&mut b));
        assert_eq!(a.var(0),x[0]);

        let mut c = ExprLinear::new();
        c.add_term(1.0,x[0]);
        c.add_term(1.0,x[0]);
        let mut d = ExprLinear::new();
        d.add_term(2.0,x[0]);
        d.add_term(0.0,x[1]);
        assert!(!c.equals(&mut d));
    }

    #[test]
    fn operators() {
        let x = vars(2);
        let e = (x[0] * 2.0 + x[1]) - 3.0;
        assert_eq!(e.terms(), &[(x[0],2.0),(x[1],1.0)]);
        assert_eq!(e.constant(),-3.0);
        let e = -e;
        assert_eq!(e.coef(0),-2.0);
        assert_eq!(e.constant(),3.0);
    }
}
