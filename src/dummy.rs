//! This module implements a dummy backend that allows inputting data, reading and writing task
//! files, but has no support for solving.
//!
use crate::engine::Engine;
use crate::matrix::SparseStore;
use crate::model::ModelAPI;
use crate::result::ResultCode;

pub type Model = ModelAPI<Backend>;

/// Simple engine that only stores data. Solving and IIS computation return
/// [ResultCode::AbortSolverNotAvailable].
#[derive(Clone,Default)]
pub struct Backend {
    store : SparseStore,
}

impl Engine for Backend {
    fn new(name : Option<&str>) -> Self { Backend{ store : SparseStore::new(name) } }
    fn duplicate(&self) -> Self { self.clone() }

    fn store(&self) -> &SparseStore { &self.store }
    fn store_mut(&mut self) -> &mut SparseStore { &mut self.store }

    fn solve_prob(&mut self) -> i32 {
        self.store.log().log("No solver available in dummy backend\n");
        ResultCode::AbortSolverNotAvailable.code()
    }

    fn compute_iis(&mut self) -> i32 { ResultCode::AbortSolverNotAvailable.code() }
}
