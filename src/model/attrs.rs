//! Attribute and parameter access on [ModelAPI].
//!
//! Every attribute type (integer, real, string) comes with the same family of accessors: scalar,
//! by index, by index range, and by handle list. The list variants are plain loops over the
//! scalar engine calls and stop at the first error; values set before the failing entry stay
//! set.

use crate::attr::AttrAccessor;
use crate::config::SolverConfig;
use crate::engine::Engine;
use crate::entity::{Cons, Entity, Var};
use crate::error::{Error, Result};
use crate::param::ParamValue;
use super::{check_len, ModelAPI};

fn index_end(start : usize, len : usize) -> Result<usize> {
    start.checked_add(len).ok_or_else(|| Error::InvalidArgument(format!("index range {}+{} overflows",start,len)))
}

macro_rules! attr_family {
    ($t:ty, $init:expr, $arg:ty,
     $get:ident, $set:ident,
     $get_index:ident, $set_index:ident,
     $get_array:ident, $set_array:ident,
     $get_vars:ident, $set_vars:ident,
     $get_conss:ident, $set_conss:ident,
     $eng_get:ident, $eng_set:ident, $eng_get_index:ident, $eng_set_index:ident) => {

        /// Get a model attribute.
        pub fn $get(&self, att : &str) -> Result<$t> {
            let mut v : $t = $init;
            self.check(stringify!($get),self.eng()?.$eng_get(att,&mut v))?;
            Ok(v)
        }

        /// Set a model attribute.
        pub fn $set(&mut self, att : &str, val : $arg) -> Result<()> {
            let code = self.eng_mut()?.$eng_set(att,val);
            self.check(stringify!($set),code)?;
            self.touched();
            Ok(())
        }

        /// Get a variable or constraint attribute by index.
        pub fn $get_index(&self, att : &str, index : usize) -> Result<$t> {
            let mut v : $t = $init;
            self.check(stringify!($get_index),self.eng()?.$eng_get_index(att,index,&mut v))?;
            Ok(v)
        }

        /// Set a variable or constraint attribute by index.
        pub fn $set_index(&mut self, att : &str, index : usize, val : $arg) -> Result<()> {
            let code = self.eng_mut()?.$eng_set_index(att,index,val);
            self.check(stringify!($set_index),code)?;
            self.touched();
            Ok(())
        }

        /// Get an attribute for the indexes `start..start+len`.
        pub fn $get_array(&self, att : &str, start : usize, len : usize) -> Result<Vec<$t>> {
            let end = index_end(start,len)?;
            (start..end).map(|i| self.$get_index(att,i)).collect()
        }

        /// Set an attribute for the indexes `start..start+vals.len()`.
        pub fn $set_array(&mut self, att : &str, start : usize, vals : &[$arg]) -> Result<()> {
            index_end(start,vals.len())?;
            for (i,v) in vals.iter().enumerate() {
                self.$set_index(att,start+i,*v)?;
            }
            Ok(())
        }

        /// Get a variable attribute for each of `vars`.
        pub fn $get_vars(&self, att : &str, vars : &[Var]) -> Result<Vec<$t>> {
            let idxs = self.var_indexes(vars)?;
            idxs.into_iter().map(|j| self.$get_index(att,j)).collect()
        }

        /// Set a variable attribute for each of `vars`.
        pub fn $set_vars(&mut self, att : &str, vars : &[Var], vals : &[$arg]) -> Result<()> {
            check_len("values",vars.len(),vals.len())?;
            let idxs = self.var_indexes(vars)?;
            for (j,v) in idxs.into_iter().zip(vals.iter()) {
                self.$set_index(att,j,*v)?;
            }
            Ok(())
        }

        /// Get a constraint attribute for each of `conss`.
        pub fn $get_conss(&self, att : &str, conss : &[Cons]) -> Result<Vec<$t>> {
            let idxs = self.cons_indexes(conss)?;
            idxs.into_iter().map(|i| self.$get_index(att,i)).collect()
        }

        /// Set a constraint attribute for each of `conss`.
        pub fn $set_conss(&mut self, att : &str, conss : &[Cons], vals : &[$arg]) -> Result<()> {
            check_len("values",conss.len(),vals.len())?;
            let idxs = self.cons_indexes(conss)?;
            for (i,v) in idxs.into_iter().zip(vals.iter()) {
                self.$set_index(att,i,*v)?;
            }
            Ok(())
        }
    }
}

impl<E> ModelAPI<E> where E : Engine {
    attr_family!(i32, 0, i32,
                 int_attr, set_int_attr,
                 int_attr_index, set_int_attr_index,
                 int_attr_array, set_int_attr_array,
                 int_attr_vars, set_int_attr_vars,
                 int_attr_conss, set_int_attr_conss,
                 get_int_attr, set_int_attr, get_int_attr_index, set_int_attr_index);

    attr_family!(f64, 0.0, f64,
                 real_attr, set_real_attr,
                 real_attr_index, set_real_attr_index,
                 real_attr_array, set_real_attr_array,
                 real_attr_vars, set_real_attr_vars,
                 real_attr_conss, set_real_attr_conss,
                 get_real_attr, set_real_attr, get_real_attr_index, set_real_attr_index);

    attr_family!(String, String::new(), &str,
                 str_attr, set_str_attr,
                 str_attr_index, set_str_attr_index,
                 str_attr_array, set_str_attr_array,
                 str_attr_vars, set_str_attr_vars,
                 str_attr_conss, set_str_attr_conss,
                 get_str_attr, set_str_attr, get_str_attr_index, set_str_attr_index);

    /// Attribute access for a single variable.
    pub fn var_attrs(&mut self, var : Var) -> Result<VarAttrs<'_,E>> {
        self.eng()?;
        self.var_index(&var)?;
        Ok(VarAttrs{ model : self, var })
    }

    /// Attribute access for a single constraint.
    pub fn cons_attrs(&mut self, cons : Cons) -> Result<ConsAttrs<'_,E>> {
        self.eng()?;
        self.cons_index(&cons)?;
        Ok(ConsAttrs{ model : self, cons })
    }

    //
    // Parameters
    //

    fn get_param(&self, name : &str, mut v : ParamValue) -> Result<ParamValue> {
        self.check("get_param",self.eng()?.get_param(name,&mut v))?;
        Ok(v)
    }

    fn put_param(&mut self, name : &str, v : ParamValue) -> Result<()> {
        let code = self.eng_mut()?.set_param(name,v);
        self.check("set_param",code)
    }

    pub fn int_param(&self, name : &str) -> Result<i32> {
        match self.get_param(name,ParamValue::Int(0))? {
            ParamValue::Int(v) => Ok(v),
            _ => Err(Error::InvalidArgument(format!("parameter {} is not an integer parameter",name)))
        }
    }
    pub fn set_int_param(&mut self, name : &str, val : i32) -> Result<()> { self.put_param(name,ParamValue::Int(val)) }

    pub fn real_param(&self, name : &str) -> Result<f64> {
        match self.get_param(name,ParamValue::Real(0.0))? {
            ParamValue::Real(v) => Ok(v),
            _ => Err(Error::InvalidArgument(format!("parameter {} is not a real parameter",name)))
        }
    }
    pub fn set_real_param(&mut self, name : &str, val : f64) -> Result<()> { self.put_param(name,ParamValue::Real(val)) }

    pub fn str_param(&self, name : &str) -> Result<String> {
        match self.get_param(name,ParamValue::Str(String::new()))? {
            ParamValue::Str(v) => Ok(v),
            _ => Err(Error::InvalidArgument(format!("parameter {} is not a string parameter",name)))
        }
    }
    pub fn set_str_param(&mut self, name : &str, val : &str) -> Result<()> { self.put_param(name,ParamValue::Str(val.to_string())) }

    /// Apply all options set in `config`.
    pub fn apply_config(&mut self, config : &SolverConfig) -> Result<()> {
        for (name,v) in config.params() {
            self.put_param(name,v)?;
        }
        if let Some(on) = config.log_to_console {
            self.set_log_to_console(on)?;
        }
        Ok(())
    }
}

/// Attributes and matrix coefficients of one variable, see [ModelAPI::var_attrs].
pub struct VarAttrs<'a,E> where E : Engine {
    model : &'a mut ModelAPI<E>,
    var   : Var,
}

impl<E> VarAttrs<'_,E> where E : Engine {
    pub fn var(&self) -> Var { self.var }

    /// Coefficients of this variable in `conss`.
    pub fn elements(&self, conss : &[Cons]) -> Result<Vec<f64>> {
        self.model.elements(conss,&vec![self.var; conss.len()])
    }
    pub fn set_elements(&mut self, conss : &[Cons], vals : &[f64]) -> Result<()> {
        self.model.set_elements(conss,&vec![self.var; conss.len()],vals)
    }
    pub fn delete_elements(&mut self, conss : &[Cons]) -> Result<()> {
        self.model.delete_elements(conss,&vec![self.var; conss.len()])
    }
}

impl<E> AttrAccessor for VarAttrs<'_,E> where E : Engine {
    fn int_attr(&self, att : &str) -> Result<i32> { self.model.int_attr_index(att,self.var.index()) }
    fn set_int_attr(&mut self, att : &str, val : i32) -> Result<()> { self.model.set_int_attr_index(att,self.var.index(),val) }
    fn real_attr(&self, att : &str) -> Result<f64> { self.model.real_attr_index(att,self.var.index()) }
    fn set_real_attr(&mut self, att : &str, val : f64) -> Result<()> { self.model.set_real_attr_index(att,self.var.index(),val) }
    fn str_attr(&self, att : &str) -> Result<String> { self.model.str_attr_index(att,self.var.index()) }
    fn set_str_attr(&mut self, att : &str, val : &str) -> Result<()> { self.model.set_str_attr_index(att,self.var.index(),val) }
}

/// Attributes and matrix coefficients of one constraint, see [ModelAPI::cons_attrs].
pub struct ConsAttrs<'a,E> where E : Engine {
    model : &'a mut ModelAPI<E>,
    cons  : Cons,
}

impl<E> ConsAttrs<'_,E> where E : Engine {
    pub fn cons(&self) -> Cons { self.cons }

    /// Coefficients of `vars` in this constraint.
    pub fn elements(&self, vars : &[Var]) -> Result<Vec<f64>> {
        self.model.elements(&vec![self.cons; vars.len()],vars)
    }
    pub fn set_elements(&mut self, vars : &[Var], vals : &[f64]) -> Result<()> {
        self.model.set_elements(&vec![self.cons; vars.len()],vars,vals)
    }
    pub fn delete_elements(&mut self, vars : &[Var]) -> Result<()> {
        self.model.delete_elements(&vec![self.cons; vars.len()],vars)
    }
}

impl<E> AttrAccessor for ConsAttrs<'_,E> where E : Engine {
    fn int_attr(&self, att : &str) -> Result<i32> { self.model.int_attr_index(att,self.cons.index()) }
    fn set_int_attr(&mut self, att : &str, val : i32) -> Result<()> { self.model.set_int_attr_index(att,self.cons.index(),val) }
    fn real_attr(&self, att : &str) -> Result<f64> { self.model.real_attr_index(att,self.cons.index()) }
    fn set_real_attr(&mut self, att : &str, val : f64) -> Result<()> { self.model.set_real_attr_index(att,self.cons.index(),val) }
    fn str_attr(&self, att : &str) -> Result<String> { self.model.str_attr_index(att,self.cons.index()) }
    fn set_str_attr(&mut self, att : &str, val : &str) -> Result<()> { self.model.set_str_attr_index(att,self.cons.index(),val) }
}

#[cfg(test)]
mod tests {
    use crate::attr::{self, AttrAccessor, INFINITY};
    use crate::config::SolverConfig;
    use crate::dummy::Model;
    use crate::param;
    use crate::result::ResultCode;

    #[test]
    fn attribute_families() {
        let mut m = Model::new(Some("attrs"));
        let xs = m.add_vars_with(&[0.0,1.0,2.0],&[10.0,11.0,12.0],&[1.0,2.0,3.0],Some(&[false,true,false][..]),Some(&["a","b","c"][..])).unwrap();

        assert_eq!(m.str_attr(attr::PROB_NAME).unwrap(),"attrs");
        assert_eq!(m.int_attr(attr::NUM_VARS).unwrap(),3);
        assert_eq!(m.real_attr_array(attr::LB,1,2).unwrap(),vec![1.0,2.0]);
        assert_eq!(m.int_attr_vars(attr::IS_INTEGER,&xs).unwrap(),vec![0,1,0]);
        assert_eq!(m.str_attr_vars(attr::COL_NAME,&[xs[2],xs[0]]).unwrap(),vec!["c","a"]);

        m.set_real_attr_vars(attr::UB,&[xs[0],xs[2]],&[5.0,INFINITY]).unwrap();
        assert_eq!(m.real_attr_array(attr::UB,0,3).unwrap(),vec![5.0,11.0,INFINITY]);

        m.set_str_attr_array(attr::COL_NAME,1,&["y","z"]).unwrap();
        assert_eq!(m.var_by_name("z").unwrap(),xs[2]);

        let err = m.int_attr("NoSuchAttr").unwrap_err();
        assert_eq!(err.result_code(),Some(ResultCode::ModelInvalidIntAttr));
        assert!(m.real_attr_vars(attr::LB,&xs[..1]).is_ok());
        assert!(m.set_real_attr_vars(attr::LB,&xs,&[1.0]).is_err());
    }

    #[test]
    fn entity_accessors() {
        let mut m = Model::new(None);
        let x = m.add_var(0.0,1.0,0.0,false,None).unwrap();
        let y = m.add_var(0.0,1.0,0.0,false,None).unwrap();
        let c = m.add_cons(2.0*x + 3.0*y, attr::ConsSense::LessEqual, 4.0, Some("c")).unwrap();

        {
            let mut a = m.var_attrs(x).unwrap();
            a.set_real_attr(attr::OBJ,-1.0).unwrap();
            assert_eq!(a.elements(&[c]).unwrap(),vec![2.0]);
            a.set_elements(&[c],&[5.0]).unwrap();
        }
        assert_eq!(m.objs(&[x,y]).unwrap(),vec![-1.0,0.0]);

        let mut a = m.cons_attrs(c).unwrap();
        assert_eq!(a.str_attr(attr::ROW_NAME).unwrap(),"c");
        assert_eq!(a.elements(&[x,y]).unwrap(),vec![5.0,3.0]);
        a.delete_elements(&[y]).unwrap();
        assert_eq!(a.elements(&[y]).unwrap(),vec![0.0]);
    }

    #[test]
    fn parameters_and_config() {
        let mut m = Model::new(None);
        m.set_int_param(param::SPX_MAX_ITERATIONS,100).unwrap();
        assert_eq!(m.int_param(param::SPX_MAX_ITERATIONS).unwrap(),100);
        assert_eq!(m.set_real_param(param::NUM_THREADS,1.5).unwrap_err().result_code(),Some(ResultCode::ParamSetError));
        assert_eq!(m.str_param("Bogus").unwrap_err().result_code(),Some(ResultCode::ParamGetError));

        m.apply_config(&SolverConfig::new().with_time_limit(12.0).with_threads(2)).unwrap();
        assert_eq!(m.real_param(param::MAX_TIME).unwrap(),12.0);
        assert_eq!(m.int_param(param::NUM_THREADS).unwrap(),2);
    }
}
