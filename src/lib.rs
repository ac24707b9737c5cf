//! # mdomodel
//!
//! A modeling layer for linear, mixed integer and quadratic optimization problems on top of a
//! solver engine.
//!
//! The problem is built through a [ModelAPI] using [Var] and [Cons] handles and the expression
//! types [ExprLinear], [ExprQuad] and [Column]. The model translates expressions into sparse
//! index arrays and keeps its handles consistent with the engine's matrix as variables and
//! constraints are added, deleted or read from file.
//!
//! The engine is anything implementing [Engine]. This crate contains only the data-only
//! [dummy] engine; solving is provided by separate backend crates.
//!
//! # Example
//! ```
//! use mdomodel::*;
//!
//! let mut m = dummy::Model::new(Some("lo"));
//! m.set_min_obj_sense().unwrap();
//! let x = m.add_var(0.0, 10.0, 1.0, false, Some("x")).unwrap();
//! let y = m.add_var(0.0, INFINITY, 1.0, false, Some("y")).unwrap();
//! let c = m.add_cons(x + y, ConsSense::GreaterEqual, 1.0, Some("c")).unwrap();
//!
//! let mut e = m.expr_linear(c).unwrap();
//! let mut f = x + y;
//! assert!(e.equals(&mut f));
//! ```

pub mod attr;
mod config;
pub mod dummy;
mod engine;
mod entity;
mod env;
mod error;
mod expr;
pub mod matrix;
mod model;
pub mod param;
mod result;
mod task;

pub use attr::{AttrAccessor, BasisStatus, ConsSense, IisBound, INFINITY, NEGATIVE_INFINITY};
pub use config::{Method, SolverConfig};
pub use engine::{from_ieee_bound, to_ieee_bound, Engine, LogCallback};
pub use entity::{Cons, Entity, ModelId, Var};
pub use env::Env;
pub use error::{Error, Result};
pub use expr::{Column, ExprLinear, ExprQuad};
pub use model::{ConsAttrs, ConsSide, Iis, ModelAPI, ModelState, VarAttrs};
pub use param::ParamValue;
pub use result::{RemoteTask, RemoteTaskStatus, ResultCode, Status};
