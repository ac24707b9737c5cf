//! Engine environments.
//!
//! An [Env] stands for a loaded engine: it owns the factory that creates engine instances and
//! counts the models created from it. The environment can only be freed once all of its models
//! have been freed or dropped.

use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::model::ModelAPI;

type Factory<E> = Box<dyn Fn(Option<&str>) -> E>;

pub struct Env<E> where E : Engine {
    factory : Factory<E>,
    live    : Rc<Cell<usize>>,
    freed   : bool,
}

impl<E> Default for Env<E> where E : Engine + 'static {
    fn default() -> Self { Env::new() }
}

impl<E> Env<E> where E : Engine {
    /// Create an environment using [Engine::new] as factory.
    pub fn new() -> Env<E> where E : 'static {
        Env::with_factory(|name| E::new(name))
    }

    /// Create an environment with a custom engine factory, e.g. one that applies default
    /// parameters.
    pub fn with_factory<F>(factory : F) -> Env<E> where F : 'static+Fn(Option<&str>) -> E {
        debug!(component = "env", operation = "create", "Created environment");
        Env{ factory : Box::new(factory), live : Rc::new(Cell::new(0)), freed : false }
    }

    fn check(&self) -> Result<()> {
        if self.freed { Err(Error::Freed) } else { Ok(()) }
    }

    /// Number of models created from this environment that have not been freed.
    pub fn live_models(&self) -> usize { self.live.get() }

    /// Create an empty model.
    pub fn create_model(&self, name : Option<&str>) -> Result<ModelAPI<E>> {
        self.check()?;
        let mut m = ModelAPI::from_engine((self.factory)(name));
        m.attach_env(self.live.clone());
        Ok(m)
    }

    /// Create an independent copy of `model` with the same problem, parameters and solution.
    /// The copy belongs to this environment.
    pub fn copy_model(&self, model : &ModelAPI<E>) -> Result<ModelAPI<E>> {
        self.check()?;
        let mut m = model.duplicate()?;
        m.attach_env(self.live.clone());
        Ok(m)
    }

    /// Free the environment. Fails with [Error::EnvInUse] while models created from it are
    /// alive. Calling this again after success has no effect.
    pub fn free(&mut self) -> Result<()> {
        if self.freed { return Ok(()); }
        let live = self.live.get();
        if live > 0 {
            return Err(Error::EnvInUse{ live });
        }
        self.freed = true;
        debug!(component = "env", operation = "free", "Freed environment");
        Ok(())
    }

    pub fn is_freed(&self) -> bool { self.freed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::Backend;

    #[test]
    fn free_protocol() {
        let mut env : Env<Backend> = Env::new();
        let mut m1 = env.create_model(Some("m1")).unwrap();
        let m2 = env.create_model(None).unwrap();
        assert_eq!(env.live_models(),2);

        assert_eq!(env.free(),Err(Error::EnvInUse{ live : 2 }));
        m1.free();
        m1.free();
        drop(m2);
        assert_eq!(env.live_models(),0);

        env.free().unwrap();
        env.free().unwrap();
        assert!(matches!(env.create_model(None),Err(Error::Freed)));
    }

    #[test]
    fn copy_is_independent() {
        let env : Env<Backend> = Env::new();
        let mut m = env.create_model(None).unwrap();
        let x = m.add_var(0.0,1.0,2.0,false,Some("x")).unwrap();

        let mut c = env.copy_model(&m).unwrap();
        assert_eq!(env.live_models(),2);
        assert_eq!(c.num_vars().unwrap(),1);
        assert_ne!(c.var(0).unwrap(),x);
        c.add_var(0.0,1.0,0.0,false,None).unwrap();
        assert_eq!(m.num_vars().unwrap(),1);
        assert_eq!(c.objs(&[c.var(0).unwrap()]).unwrap(),vec![2.0]);
    }
}
