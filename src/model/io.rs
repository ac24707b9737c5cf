use std::path::Path;
use tracing::debug;

use crate::engine::Engine;
use crate::error::{Error, Result};
use super::{ModelAPI, ModelState};

fn path_str(filename : &Path) -> Result<&str> {
    let s = filename.to_str().ok_or_else(|| Error::InvalidArgument(format!("file name is not valid UTF-8: {}",filename.display())))?;
    if s.contains('\0') { return Err(Error::Nul(s.to_string())); }
    Ok(s)
}

impl<E> ModelAPI<E> where E : Engine {
    /// Read a problem from file, replacing the current problem. Which formats are supported
    /// depends on the engine. All existing handles become stale.
    pub fn read_prob<P>(&mut self, filename : P) -> Result<()> where P : AsRef<Path> {
        let f = path_str(filename.as_ref())?;
        let code = self.eng_mut()?.read_prob(f);
        self.check("read_prob",code)?;
        self.rebuild_vars();
        self.rebuild_conss();
        self.state = ModelState::Populated;
        debug!(
            component = "model",
            operation = "read_prob",
            file = f,
            num_vars = self.vars.len(),
            num_conss = self.conss.len(),
            "Read problem"
        );
        Ok(())
    }

    /// Write the problem to file. The format is selected by the engine, usually from the
    /// file name extension.
    pub fn write_prob<P>(&self, filename : P) -> Result<()> where P : AsRef<Path> {
        let f = path_str(filename.as_ref())?;
        self.check("write_prob",self.eng()?.write_prob(f))
    }

    /// Write the solution of the last solve to file.
    pub fn write_soln<P>(&self, filename : P) -> Result<()> where P : AsRef<Path> {
        let f = path_str(filename.as_ref())?;
        self.check("write_soln",self.eng()?.write_soln(f))
    }

    /// Read a task file.
    ///
    /// # Arguments
    /// - `filename` The task file.
    /// - `model`, `param`, `soln` Select which parts to load. Loading the model replaces the
    ///   current problem and makes all existing handles stale.
    pub fn read_task<P>(&mut self, filename : P, model : bool, param : bool, soln : bool) -> Result<()> where P : AsRef<Path> {
        let f = path_str(filename.as_ref())?;
        let code = self.eng_mut()?.read_task(f,model,param,soln);
        self.check("read_task",code)?;
        if model {
            self.rebuild_vars();
            self.rebuild_conss();
            self.state = ModelState::Populated;
        }
        debug!(component = "model", operation = "read_task", file = f, model, param, soln, "Read task");
        Ok(())
    }

    /// Write a task file with the selected parts.
    pub fn write_task<P>(&self, filename : P, model : bool, param : bool, soln : bool) -> Result<()> where P : AsRef<Path> {
        let f = path_str(filename.as_ref())?;
        self.check("write_task",self.eng()?.write_task(f,model,param,soln))
    }
}
