use crate::entity::Cons;
use crate::error::{Error, Result};
use super::{mult_add_terms, purge_terms, remove_entity, terms_equal};

/// A column of the constraint matrix: a list of `(constraint, coefficient)` terms. Used to add a
/// variable with its constraint participations in one call, and returned by
/// [ModelAPI::col](crate::ModelAPI::col).
#[derive(Clone,Debug,Default,PartialEq)]
pub struct Column {
    terms : Vec<(Cons,f64)>,
}

impl Column {
    pub fn new() -> Column { Default::default() }

    pub fn add_term(&mut self, coef : f64, cons : Cons) { self.terms.push((cons,coef)); }

    pub fn add_terms(&mut self, coefs : &[f64], conss : &[Cons]) -> Result<()> {
        if coefs.len() != conss.len() {
            return Err(Error::LengthMismatch{ what : "coefficients and constraints", expected : coefs.len(), got : conss.len() });
        }
        self.terms.extend(conss.iter().copied().zip(coefs.iter().copied()));
        Ok(())
    }

    pub fn mult_add(&mut self, k : f64, other : &Column) { mult_add_terms(&mut self.terms, k, &other.terms) }
    pub fn add(&mut self, other : &Column) { self.mult_add(1.0,other) }
    pub fn subtract(&mut self, other : &Column) { self.mult_add(-1.0,other) }

    /// Sort terms by constraint index and merge terms for the same constraint.
    pub fn purge(&mut self) { purge_terms(&mut self.terms) }

    pub fn remove_term(&mut self, cons : Cons) -> bool { remove_entity(&mut self.terms, &cons) }
    pub fn remove_term_at(&mut self, i : usize) -> (Cons,f64) { self.terms.remove(i) }

    pub fn len(&self) -> usize { self.terms.len() }
    pub fn is_empty(&self) -> bool { self.terms.is_empty() }
    pub fn cons(&self, i : usize) -> Cons { self.terms[i].0 }
    pub fn coef(&self, i : usize) -> f64 { self.terms[i].1 }
    pub fn terms(&self) -> &[(Cons,f64)] { self.terms.as_slice() }
    pub fn clear(&mut self) { self.terms.clear() }

    /// Compare two columns. Purges both operands.
    pub fn equals(&mut self, other : &mut Column) -> bool {
        if self.len() != other.len() { return false; }
        self.purge();
        other.purge();
        terms_equal(&self.terms, &other.terms)
    }
}

impl FromIterator<(Cons,f64)> for Column {
    fn from_iter<I: IntoIterator<Item = (Cons,f64)>>(iter: I) -> Self {
        Column{ terms : iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ModelId;

    #[test]
    fn purge_and_equals() {
        let m = ModelId::next();
        let c : Vec<Cons> = (0..3).map(|i| Cons::new(m,i,0)).collect();
        let mut a = Column::new();
        a.add_terms(&[1.0,2.0,3.0], &[c[2],c[0],c[2]]).unwrap();
        let mut b : Column = vec![(c[0],2.0),(c[2],4.0),(c[1],0.0)].into_iter().collect();
        assert!(!a.equals(&mut b));
        assert_eq!(a.terms(), &[(c[0],2.0),(c[2],4.0)]);
        assert!(b.remove_term(c[1]));
        assert!(a.equals(&mut b));

        let before = a.clone();
        a.mult_add(0.0,&b);
        assert_eq!(a,before);
    }
}
