//! Variable and constraint handles.
//!
//! A handle is an identity token `(model, index)` for a column or a row in the engine's sparse
//! matrix. It carries no value itself; all data is fetched through the owning
//! [ModelAPI](crate::ModelAPI). Handles are only created by the model, and only valid for the
//! model that created them.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODEL_ID : AtomicU64 = AtomicU64::new(1);

/// Process unique identity of a model instance.
#[derive(Clone,Copy,PartialEq,Eq,Hash,Debug,PartialOrd,Ord)]
pub struct ModelId(u64);

impl ModelId {
    pub(crate) fn next() -> ModelId {
        ModelId(NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"M{}",self.0)
    }
}

/// Common interface of [Var] and [Cons].
pub trait Entity : Copy {
    /// Human readable kind, used in error messages.
    const KIND : &'static str;
    /// Index of the entity in the engine's matrix.
    fn index(&self) -> usize;
    /// Identity of the model that created the handle.
    fn model(&self) -> ModelId;
    /// Mirror generation the handle was created in.
    fn generation(&self) -> u32;
}

macro_rules! define_handle {
    ($(#[$m:meta])* $name:ident, $kind:expr) => {
        $(#[$m])*
        ///
        /// Two handles compare equal if and only if they belong to the same model and have the
        /// same index. The mirror generation is not part of the identity; it is only used by
        /// the model to reject handles that were invalidated by a delete or a file read.
        #[derive(Clone,Copy)]
        pub struct $name {
            model      : ModelId,
            index      : usize,
            generation : u32,
        }

        impl $name {
            pub(crate) fn new(model : ModelId, index : usize, generation : u32) -> $name {
                $name{ model, index, generation }
            }
        }

        impl Entity for $name {
            const KIND : &'static str = $kind;
            fn index(&self) -> usize { self.index }
            fn model(&self) -> ModelId { self.model }
            fn generation(&self) -> u32 { self.generation }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.model == other.model && self.index == other.index
            }
        }
        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.model.hash(state);
                self.index.hash(state);
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f,"{}({}:{})",stringify!($name),self.model,self.index)
            }
        }
    }
}

define_handle!(
    /// Handle of a variable, i.e. a column in the constraint matrix.
    Var, "variable");
define_handle!(
    /// Handle of a constraint, i.e. a row in the constraint matrix.
    Cons, "constraint");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity() {
        let m1 = ModelId::next();
        let m2 = ModelId::next();
        assert_ne!(m1,m2);

        assert_eq!(Var::new(m1,3,0), Var::new(m1,3,0));
        assert_eq!(Var::new(m1,3,0), Var::new(m1,3,7));
        assert_ne!(Var::new(m1,3,0), Var::new(m1,4,0));
        assert_ne!(Var::new(m1,3,0), Var::new(m2,3,0));

        let mut s = std::collections::HashSet::new();
        s.insert(Cons::new(m1,1,0));
        s.insert(Cons::new(m1,1,2));
        s.insert(Cons::new(m1,2,0));
        assert_eq!(s.len(),2);
    }
}
