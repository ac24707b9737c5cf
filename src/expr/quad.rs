use itertools::Itertools;
use crate::entity::{Entity, Var};
use crate::error::{Error, Result};
use super::ExprLinear;

/// A quadratic expression `sum_k c_k x_{i_k} x_{j_k} + linear`.
///
/// The quadratic triples are kept in the order they were added. [ExprQuad::purge] brings them
/// into canonical form: each pair is ordered so that the first variable has the smaller index,
/// pairs are sorted and triples for the same pair are merged.
#[derive(Clone,Debug,Default,PartialEq)]
pub struct ExprQuad {
    linear : ExprLinear,
    quad   : Vec<((Var,Var),f64)>,
}

impl ExprQuad {
    pub fn new() -> ExprQuad { Default::default() }

    /// Append a linear term.
    pub fn add_term(&mut self, coef : f64, var : Var) { self.linear.add_term(coef,var) }
    /// Append linear terms pairwise from `coefs` and `vars`.
    pub fn add_terms(&mut self, coefs : &[f64], vars : &[Var]) -> Result<()> { self.linear.add_terms(coefs,vars) }

    /// Append a quadratic term `coef * var1 * var2`. No reordering of `var1` and `var2` is done.
    pub fn add_quad_term(&mut self, coef : f64, var1 : Var, var2 : Var) {
        self.quad.push(((var1,var2),coef));
    }

    /// Append quadratic terms from three parallel arrays.
    pub fn add_quad_terms(&mut self, coefs : &[f64], vars1 : &[Var], vars2 : &[Var]) -> Result<()> {
        if coefs.len() != vars1.len() {
            return Err(Error::LengthMismatch{ what : "coefficients and first variables", expected : coefs.len(), got : vars1.len() });
        }
        if coefs.len() != vars2.len() {
            return Err(Error::LengthMismatch{ what : "coefficients and second variables", expected : coefs.len(), got : vars2.len() });
        }
        for (&c,&v1,&v2) in itertools::izip!(coefs,vars1,vars2) {
            self.quad.push(((v1,v2),c));
        }
        Ok(())
    }

    /// Purge the linear part, then canonicalize, sort and merge the quadratic triples.
    pub fn purge(&mut self) {
        self.linear.purge();
        if self.quad.is_empty() { return; }

        for ((a,b),_) in self.quad.iter_mut() {
            if a.index() > b.index() {
                std::mem::swap(a,b);
            }
        }
        self.quad.sort_by_key(|((a,b),_)| (a.index(),b.index(),a.model(),b.model()));
        let merged : Vec<((Var,Var),f64)> = self.quad
            .drain(..)
            .coalesce(|x,y| if x.0 == y.0 { Ok((x.0,x.1+y.1)) } else { Err((x,y)) })
            .collect();
        self.quad = merged;
    }

    pub fn add_linear(&mut self, other : &ExprLinear) { self.linear.add(other) }
    pub fn subtract_linear(&mut self, other : &ExprLinear) { self.linear.subtract(other) }
    pub fn mult_add_linear(&mut self, k : f64, other : &ExprLinear) { self.linear.mult_add(k,other) }

    /// Add `k * other`, applied to both the linear and the quadratic part. Multiplying by zero
    /// does nothing.
    pub fn mult_add(&mut self, k : f64, other : &ExprQuad) {
        if k == 0.0 { return; }
        self.linear.mult_add(k,&other.linear);
        self.quad.extend(other.quad.iter().map(|&(p,c)| (p,k*c)));
    }
    pub fn add(&mut self, other : &ExprQuad) { self.mult_add(1.0,other) }
    pub fn subtract(&mut self, other : &ExprQuad) { self.mult_add(-1.0,other) }

    /// Remove all linear terms referring to `var`.
    pub fn remove_term(&mut self, var : Var) -> bool { self.linear.remove_term(var) }

    /// Remove the quadratic term at position `i`.
    pub fn remove_quad_term_at(&mut self, i : usize) -> ((Var,Var),f64) { self.quad.remove(i) }

    /// Remove all quadratic terms for the pair `(var1,var2)`, in either order.
    pub fn remove_quad_term(&mut self, var1 : Var, var2 : Var) -> bool {
        let n = self.quad.len();
        self.quad.retain(|&((a,b),_)| !((a == var1 && b == var2) || (a == var2 && b == var1)));
        self.quad.len() != n
    }

    /// Number of quadratic terms.
    pub fn len(&self) -> usize { self.quad.len() }
    pub fn is_empty(&self) -> bool { self.quad.is_empty() }
    pub fn var1(&self, i : usize) -> Var { self.quad[i].0.0 }
    pub fn var2(&self, i : usize) -> Var { self.quad[i].0.1 }
    pub fn coef(&self, i : usize) -> f64 { self.quad[i].1 }
    pub fn quad_term(&self, i : usize) -> (Var,Var) { self.quad[i].0 }
    pub fn quad_terms(&self) -> &[((Var,Var),f64)] { self.quad.as_slice() }
    pub fn vars1(&self) -> Vec<Var> { self.quad.iter().map(|t| t.0.0).collect() }
    pub fn vars2(&self) -> Vec<Var> { self.quad.iter().map(|t| t.0.1).collect() }
    pub fn coefs(&self) -> Vec<f64> { self.quad.iter().map(|t| t.1).collect() }

    pub fn linear(&self) -> &ExprLinear { &self.linear }
    pub fn linear_mut(&mut self) -> &mut ExprLinear { &mut self.linear }

    pub fn constant(&self) -> f64 { self.linear.constant() }
    pub fn set_constant(&mut self, c : f64) { self.linear.set_constant(c) }
    pub fn add_constant(&mut self, c : f64) { self.linear.add_constant(c) }

    /// Remove all linear and quadratic terms and reset the constant.
    pub fn clear(&mut self) {
        self.linear.clear();
        self.quad.clear();
    }

    /// Compare two quadratic expressions.
    ///
    /// The quadratic triples are compared position by position in their current order, without
    /// purging. The linear parts are then compared with [ExprLinear::equals], which purges both.
    pub fn equals(&mut self, other : &mut ExprQuad) -> bool {
        if self.quad.len() != other.quad.len() {
            return false;
        }
        if self.quad.iter().zip(other.quad.iter()).any(|(((a0,b0),c0),((a1,b1),c1))| a0 != a1 || b0 != b1 || c0 != c1) {
            return false;
        }
        self.linear.equals(&mut other.linear)
    }
}

impl From<ExprLinear> for ExprQuad {
    fn from(linear : ExprLinear) -> ExprQuad { ExprQuad{ linear, quad : Vec::new() } }
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
    fn canonicalize_single_term() {
        let x = vars(4);
        let mut q = ExprQuad::new();
        q.add_quad_term(5.0, x[3], x[1]);
        q.purge();
        assert_eq!(q.quad_terms(), &[((x[1],x[3]),5.0)]);
    }

    #[test]
    fn purge_merges_swapped_pairs() {
        let x = vars(3);
        let mut q = ExprQuad::new();
        q.add_quad_term(1.0, x[2], x[0]);
        q.add_quad_term(2.0, x[1], x[1]);
        q.add_quad_term(3.0, x[0], x[2]);
        q.add_term(1.0, x[2]);
        q.add_term(1.0, x[2]);
        q.purge();
        assert_eq!(q.quad_terms(), &[((x[0],x[2]),4.0),((x[1],x[1]),2.0)]);
        assert_eq!(q.linear().terms(), &[(x[2],2.0)]);
    }

    #[test]
    fn remove_either_order() {
        let x = vars(2);
        let mut q = ExprQuad::new();
        q.add_quad_term(1.0, x[0], x[1]);
        q.add_quad_term(1.0, x[1], x[0]);
        q.add_quad_term(1.0, x[1], x[1]);
        assert!(q.remove_quad_term(x[1], x[0]));
        assert_eq!(q.len(),1);
        assert!(!q.remove_quad_term(x[0], x[1]));
    }

    #[test]
    fn mult_add() {
        let x = vars(2);
        let mut q = ExprQuad::new();
        let mut o = ExprQuad::from(ExprLinear::with_constant(1.0));
        o.add_quad_term(2.0, x[0], x[1]);
        o.add_term(1.0, x[0]);

        q.mult_add(0.0, &o);
        assert!(q.is_empty());
        assert!(q.linear().is_empty());
        assert_eq!(q.constant(),0.0);

        q.subtract(&o);
        assert_eq!(q.coef(0),-2.0);
        assert_eq!(q.constant(),-1.0);
        assert_eq!(q.linear().coef(0),-1.0);
    }

    #[test]
    fn equals_compares_quad_unpurged() {
        let x = vars(2);
        let mut a = ExprQuad::new();
        a.add_quad_term(1.0, x[0], x[1]);
        a.add_term(1.0, x[1]);
        a.add_term(1.0, x[0]);
        let mut b = ExprQuad::new();
        b.add_quad_term(1.0, x[1], x[0]);
        b.add_term(1.0, x[0]);
        b.add_term(1.0, x[1]);

        // Same quadratic form, but triples differ in raw order
        assert!(!a.equals(&mut b));
        a.purge();
        b.purge();
        assert!(a.equals(&mut b));

        // Linear parts are purged by the comparison
        let mut c = ExprQuad::new();
        c.add_term(1.0, x[1]);
        c.add_term(1.0, x[0]);
        let mut d = ExprQuad::new();
        d.add_term(1.0, x[0]);
        d.add_term(1.0, x[1]);
        assert!(c.equals(&mut d));
        assert_eq!(c.linear().var(0), x[0]);
    }
}
