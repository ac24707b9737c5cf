//! Solver configuration.

use crate::param::{self, ParamValue};

/// Optimization method selected through [SolverConfig::with_method].
#[derive(Clone,Copy,PartialEq,Eq,Debug)]
pub enum Method {
    Auto,
    PrimalSimplex,
    DualSimplex,
    InteriorPoint,
}

impl Method {
    /// Value of the `Method` parameter.
    pub fn code(self) -> i32 {
        match self {
            Method::Auto          => param::method::AUTO,
            Method::PrimalSimplex => param::method::PRIMAL_SIMPLEX,
            Method::DualSimplex   => param::method::DUAL_SIMPLEX,
            Method::InteriorPoint => param::method::INTERIOR_POINT,
        }
    }
}

/// Common solver options, independent of the engine.
///
/// Options left as `None` keep the engine's current value. A config is applied to a model with
/// [ModelAPI::apply_config](crate::ModelAPI::apply_config), which translates it into parameter
/// settings.
#[derive(Clone,Debug,Default)]
pub struct SolverConfig {
    /// Time limit in seconds.
    pub time_limit : Option<f64>,
    /// Relative MIP gap tolerance.
    pub mip_gap_rel : Option<f64>,
    /// Absolute MIP gap tolerance.
    pub mip_gap_abs : Option<f64>,
    /// Number of threads, 0 lets the engine decide.
    pub num_threads : Option<u32>,
    /// Enable/disable presolve.
    pub presolve : Option<bool>,
    pub method : Option<Method>,
    /// Echo the engine log on the console.
    pub log_to_console : Option<bool>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time limit in seconds.
    pub fn with_time_limit(mut self, seconds : f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_mip_gap_rel(mut self, gap : f64) -> Self {
        self.mip_gap_rel = Some(gap);
        self
    }

    pub fn with_mip_gap_abs(mut self, gap : f64) -> Self {
        self.mip_gap_abs = Some(gap);
        self
    }

    pub fn with_threads(mut self, count : u32) -> Self {
        self.num_threads = Some(count);
        self
    }

    pub fn with_presolve(mut self, enabled : bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_method(mut self, method : Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_log_to_console(mut self, enabled : bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Check if this configuration is completely empty.
    pub fn is_empty(&self) -> bool {
        self.time_limit.is_none()
            && self.mip_gap_rel.is_none()
            && self.mip_gap_abs.is_none()
            && self.num_threads.is_none()
            && self.presolve.is_none()
            && self.method.is_none()
            && self.log_to_console.is_none()
    }

    /// The parameter assignments this configuration stands for. Console logging is not a
    /// parameter and is not included.
    pub fn params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut res = Vec::new();
        if let Some(t) = self.time_limit {
            res.push((param::MAX_TIME, ParamValue::Real(t)));
        }
        if let Some(g) = self.mip_gap_rel {
            res.push((param::MIP_GAP_REL, ParamValue::Real(g)));
        }
        if let Some(g) = self.mip_gap_abs {
            res.push((param::MIP_GAP_ABS, ParamValue::Real(g)));
        }
        if let Some(n) = self.num_threads {
            res.push((param::NUM_THREADS, ParamValue::Int(n.min(i32::MAX as u32) as i32)));
        }
        if let Some(p) = self.presolve {
            res.push((param::PRESOLVE, ParamValue::Int(if p { -1 } else { 0 })));
        }
        if let Some(m) = self.method {
            res.push((param::METHOD, ParamValue::Int(m.code())));
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert!(config.is_empty());
        assert!(config.params().is_empty());
    }

    #[test]
    fn test_builder_pattern() {
        let config = SolverConfig::new()
            .with_time_limit(60.0)
            .with_mip_gap_rel(0.01)
            .with_presolve(false)
            .with_method(Method::DualSimplex)
            .with_log_to_console(true);

        assert!(!config.is_empty());
        let p = config.params();
        assert_eq!(p.len(), 4);
        assert!(p.contains(&(param::MAX_TIME, ParamValue::Real(60.0))));
        assert!(p.contains(&(param::PRESOLVE, ParamValue::Int(0))));
        assert!(p.contains(&(param::METHOD, ParamValue::Int(param::method::DUAL_SIMPLEX))));
    }
}
