//! Task files: the model, the parameters and the solution of a [SparseStore] in one Json
//! document.
//!
//! Layout:
//! ```text
//! { "format" : "mdotask", "version" : 1,
//!   "model"  : { "name", "minsense", "objconst",
//!                "cols" : [ {"lb","ub","obj","int","name"} ... ],
//!                "rows" : [ {"lhs","rhs","name"} ... ],
//!                "a"    : { "row" : [...], "col" : [...], "val" : [...] },
//!                "q"    : { "col1" : [...], "col2" : [...], "val" : [...] } },
//!   "param"  : { name : value ... },
//!   "soln"   : { "status", "primal", "reducedcost", "activity", "dual",
//!                "colbasis", "rowbasis", "primalobj", "dualobj" } }
//! ```
//! Each of `model`, `param` and `soln` is optional. Infinite bounds are written as the
//! [INFINITY](crate::attr::INFINITY) threshold.

mod json;

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};

use crate::matrix::{ColData, RowData, SolutionData, SparseStore};
use crate::param::ParamValue;
use crate::result::{ResultCode, Status};
use json::Json;

const FORMAT  : &str = "mdotask";
const VERSION : i64 = 1;

fn key(k : &str, v : Json) -> (String,Json) { (k.to_string(),v) }

fn opt_name(n : &Option<String>) -> Json {
    match n { Some(n) => Json::Text(n.clone()), None => Json::Null }
}

/// Read failure with the result code to report.
struct Bad(ResultCode);

fn format_error() -> Bad { Bad(ResultCode::FormatError) }

fn field<'a>(v : &'a Json, k : &str) -> Result<&'a Json,Bad> { v.member(k).ok_or_else(format_error) }
fn f64_field(v : &Json, k : &str) -> Result<f64,Bad> { field(v,k)?.num().ok_or_else(format_error) }
fn list_field<'a>(v : &'a Json, k : &str) -> Result<&'a [Json],Bad> { field(v,k)?.items().ok_or_else(format_error) }
fn name_field(v : &Json, k : &str) -> Result<Option<String>,Bad> {
    match v.member(k) {
        None | Some(Json::Null) => Ok(None),
        Some(Json::Text(s)) => Ok(Some(s.clone())),
        _ => Err(format_error())
    }
}
fn f64_list(v : &Json, k : &str) -> Result<Vec<f64>,Bad> {
    list_field(v,k)?.iter().map(|x| x.num().ok_or_else(format_error)).collect()
}
fn usize_list(v : &Json, k : &str) -> Result<Vec<usize>,Bad> {
    list_field(v,k)?.iter()
        .map(|x| x.int().and_then(|i| usize::try_from(i).ok()).ok_or_else(format_error))
        .collect()
}
fn i32_list(v : &Json, k : &str) -> Result<Vec<i32>,Bad> {
    list_field(v,k)?.iter()
        .map(|x| x.int().and_then(|i| i32::try_from(i).ok()).ok_or_else(format_error))
        .collect()
}

fn triplets(v : &Json, k1 : &str, k2 : &str) -> Result<Vec<(usize,usize,f64)>,Bad> {
    let i = usize_list(v,k1)?;
    let j = usize_list(v,k2)?;
    let x = f64_list(v,"val")?;
    if i.len() != j.len() || i.len() != x.len() { return Err(format_error()); }
    Ok(itertools::izip!(i,j,x).collect())
}

impl SparseStore {
    fn model_to_json(&self) -> Json {
        let cols = self.cols().iter().map(|c| Json::Obj(vec![
            key("lb",   Json::Num(crate::matrix::clamp_bound(c.lb))),
            key("ub",   Json::Num(crate::matrix::clamp_bound(c.ub))),
            key("obj",  Json::Num(c.obj)),
            key("int",  Json::Bool(c.is_integer)),
            key("name", opt_name(&c.name))])).collect();
        let rows = self.rows().iter().map(|r| Json::Obj(vec![
            key("lhs",  Json::Num(crate::matrix::clamp_bound(r.lhs))),
            key("rhs",  Json::Num(crate::matrix::clamp_bound(r.rhs))),
            key("name", opt_name(&r.name))])).collect();
        let a = self.entries();
        let q = self.quad_entries();
        Json::Obj(vec![
            key("name",     Json::Text(self.name().to_string())),
            key("minsense", Json::Bool(self.is_min_sense())),
            key("objconst", Json::Num(self.obj_const())),
            key("cols",     Json::Arr(cols)),
            key("rows",     Json::Arr(rows)),
            key("a", Json::Obj(vec![
                key("row", Json::ints(a.iter().map(|t| t.0 as i64))),
                key("col", Json::ints(a.iter().map(|t| t.1 as i64))),
                key("val", Json::Arr(a.iter().map(|t| Json::Num(t.2)).collect()))])),
            key("q", Json::Obj(vec![
                key("col1", Json::ints(q.iter().map(|t| t.0 as i64))),
                key("col2", Json::ints(q.iter().map(|t| t.1 as i64))),
                key("val",  Json::Arr(q.iter().map(|t| Json::Num(t.2)).collect()))])),
        ])
    }

    fn params_to_json(&self) -> Json {
        let mut items : Vec<(String,Json)> = self.params().iter()
            .map(|(k,v)| (k.clone(), match v {
                ParamValue::Int(i)  => Json::Int(*i as i64),
                ParamValue::Real(r) => Json::Num(*r),
                ParamValue::Str(s)  => Json::Text(s.clone()),
            }))
            .collect();
        items.sort_by(|a,b| a.0.cmp(&b.0));
        Json::Obj(items)
    }

    fn soln_to_json(&self) -> Json {
        let s = self.solution();
        Json::Obj(vec![
            key("status",      Json::Int(s.status.code() as i64)),
            key("primal",      if s.has_solution { Json::nums(&s.primal) } else { Json::Null }),
            key("reducedcost", Json::nums(&s.reduced_cost)),
            key("activity",    Json::nums(&s.activity)),
            key("dual",        Json::nums(&s.dual)),
            key("colbasis",    Json::ints(s.col_basis.iter().map(|&b| b as i64))),
            key("rowbasis",    Json::ints(s.row_basis.iter().map(|&b| b as i64))),
            key("primalobj",   Json::Num(s.primal_obj)),
            key("dualobj",     Json::Num(s.dual_obj)),
        ])
    }

    /// Write a task file with the selected sections.
    pub fn write_task(&self, filename : &str, model : bool, param : bool, soln : bool) -> i32 {
        let mut doc = vec![
            key("format",  Json::Text(FORMAT.to_string())),
            key("version", Json::Int(VERSION)),
        ];
        if model { doc.push(key("model",self.model_to_json())); }
        if param { doc.push(key("param",self.params_to_json())); }
        if soln  { doc.push(key("soln",self.soln_to_json())); }

        let Ok(f) = File::create(filename) else { return ResultCode::FileWriteError.code() };
        let mut w = BufWriter::new(f);
        match Json::Obj(doc).emit(&mut w).and_then(|_| w.flush()) {
            Ok(_) => ResultCode::Okay.code(),
            Err(_) => ResultCode::FileWriteError.code()
        }
    }

    /// Read the selected sections from a task file. Sections that are selected but absent in
    /// the file are left unchanged. Reading the model discards the current solution.
    pub fn read_task(&mut self, filename : &str, model : bool, param : bool, soln : bool) -> i32 {
        let Ok(f) = File::open(filename) else { return ResultCode::FileReadError.code() };
        let doc = match Json::parse(&mut BufReader::new(f)) {
            Ok(doc) => doc,
            Err(_) => return ResultCode::FormatError.code()
        };
        match self.load_json(&doc,model,param,soln) {
            Ok(()) => ResultCode::Okay.code(),
            Err(Bad(r)) => r.code()
        }
    }

    fn load_json(&mut self, doc : &Json, model : bool, param : bool, soln : bool) -> Result<(),Bad> {
        if doc.member("format").and_then(|v| v.text()) != Some(FORMAT) { return Err(format_error()); }
        if doc.member("version").and_then(|v| v.int()) != Some(VERSION) { return Err(Bad(ResultCode::VersionError)); }

        // Parse everything before touching the store
        let model_data = match (model,doc.member("model")) {
            (true,Some(m)) => Some(parse_model(m)?),
            _ => None
        };
        let param_data = match (param,doc.member("param")) {
            (true,Some(Json::Obj(items))) => Some(items.as_slice()),
            (true,Some(_)) => return Err(format_error()),
            _ => None
        };
        let soln_data = match (soln,doc.member("soln")) {
            (true,Some(s)) => Some(parse_soln(s)?),
            _ => None
        };

        if let Some(m) = model_data {
            let r = self.replace_problem(m.cols,m.rows,&m.a,&m.q);
            if r != ResultCode::Okay.code() { return Err(Bad(ResultCode::ModelInputError)); }
            self.set_name(&m.name);
            self.set_min_sense(m.min_sense);
            self.set_obj_const(m.obj_const);
        }
        if let Some(items) = param_data {
            for (k,v) in items {
                let v = match v {
                    Json::Int(i) => ParamValue::Int(i32::try_from(*i).map_err(|_| format_error())?),
                    Json::Num(r) => ParamValue::Real(*r),
                    Json::Text(s) => ParamValue::Str(s.clone()),
                    _ => return Err(format_error())
                };
                // Unknown parameters from newer writers are skipped
                _ = self.set_param(k,v);
            }
        }
        if let Some(s) = soln_data {
            if s.primal.as_ref().is_some_and(|p| p.len() != self.num_cols()) ||
               (!s.dual.is_empty() && s.dual.len() != self.num_rows()) {
                return Err(Bad(ResultCode::ModelInputError));
            }
            let has_solution = s.primal.is_some();
            self.set_solution(SolutionData{
                status       : s.status,
                has_solution,
                primal       : s.primal.unwrap_or_default(),
                reduced_cost : s.reduced_cost,
                activity     : s.activity,
                dual         : s.dual,
                col_basis    : s.col_basis,
                row_basis    : s.row_basis,
                primal_obj   : s.primal_obj,
                dual_obj     : s.dual_obj,
                ..Default::default()
            });
        }
        Ok(())
    }
}

struct ModelData {
    name      : String,
    min_sense : bool,
    obj_const : f64,
    cols      : Vec<ColData>,
    rows      : Vec<RowData>,
    a         : Vec<(usize,usize,f64)>,
    q         : Vec<(usize,usize,f64)>,
}

fn parse_model(m : &Json) -> Result<ModelData,Bad> {
    let cols = list_field(m,"cols")?.iter()
        .map(|c| -> Result<ColData,Bad> { Ok(ColData{
            lb         : f64_field(c,"lb")?,
            ub         : f64_field(c,"ub")?,
            obj        : f64_field(c,"obj")?,
            is_integer : matches!(c.member("int"),Some(Json::Bool(true))),
            name       : name_field(c,"name")?,
        }) })
        .collect::<Result<Vec<ColData>,Bad>>()?;
    let rows = list_field(m,"rows")?.iter()
        .map(|r| -> Result<RowData,Bad> { Ok(RowData{
            lhs  : f64_field(r,"lhs")?,
            rhs  : f64_field(r,"rhs")?,
            name : name_field(r,"name")?,
        }) })
        .collect::<Result<Vec<RowData>,Bad>>()?;
    Ok(ModelData{
        name      : m.member("name").and_then(|v| v.text()).unwrap_or("").to_string(),
        min_sense : !matches!(m.member("minsense"),Some(Json::Bool(false))),
        obj_const : m.member("objconst").and_then(|v| v.num()).unwrap_or(0.0),
        cols,
        rows,
        a         : match m.member("a") { Some(a) => triplets(a,"row","col")?, None => Vec::new() },
        q         : match m.member("q") { Some(q) => triplets(q,"col1","col2")?, None => Vec::new() },
    })
}

struct SolnData {
    status       : Status,
    primal       : Option<Vec<f64>>,
    reduced_cost : Vec<f64>,
    activity     : Vec<f64>,
    dual         : Vec<f64>,
    col_basis    : Vec<i32>,
    row_basis    : Vec<i32>,
    primal_obj   : f64,
    dual_obj     : f64,
}

fn parse_soln(s : &Json) -> Result<SolnData,Bad> {
    let status = field(s,"status")?.int()
        .and_then(|c| i32::try_from(c).ok())
        .and_then(Status::from_code)
        .ok_or_else(format_error)?;
    Ok(SolnData{
        status,
        primal       : match s.member("primal") { None | Some(Json::Null) => None, Some(_) => Some(f64_list(s,"primal")?) },
        reduced_cost : f64_list(s,"reducedcost")?,
        activity     : f64_list(s,"activity")?,
        dual         : f64_list(s,"dual")?,
        col_basis    : i32_list(s,"colbasis")?,
        row_basis    : i32_list(s,"rowbasis")?,
        primal_obj   : f64_field(s,"primalobj")?,
        dual_obj     : f64_field(s,"dualobj")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::INFINITY;
    use crate::param;

    fn tmpfile(name : &str) -> String {
        std::env::temp_dir().join(format!("mdomodel-task-{}-{}.json",std::process::id(),name)).to_string_lossy().into_owned()
    }

    #[test]
    fn model_roundtrip() {
        let mut s = SparseStore::new(Some("roundtrip"));
        assert_eq!(s.add_row(1.0,f64::INFINITY,&[],&[],Some("c0")),0);
        assert_eq!(s.add_col(0.0,10.0,1.0,&[0],&[2.0],Some("x"),true),0);
        assert_eq!(s.add_col(-1.0,INFINITY,-1.0,&[0],&[3.0],None,false),0);
        assert_eq!(s.set_quad_elements(&[1],&[0],&[0.5]),0);
        s.set_min_sense(false);
        assert_eq!(s.set_param(param::MAX_TIME,ParamValue::Real(30.0)),0);

        let f = tmpfile("model");
        assert_eq!(s.write_task(&f,true,true,false),0);

        let mut t = SparseStore::new(None);
        assert_eq!(t.read_task(&f,true,true,false),0);
        _ = std::fs::remove_file(&f);

        assert_eq!(t.name(),"roundtrip");
        assert!(!t.is_min_sense());
        assert_eq!(t.cols(),s.cols());
        assert_eq!(t.rows()[0].rhs,INFINITY);
        assert_eq!(t.entries(),s.entries());
        assert_eq!(t.quad_entries(),vec![(0,1,0.5)]);
        assert_eq!(t.real_param(param::MAX_TIME),Some(30.0));
    }

    #[test]
    fn read_errors() {
        let mut s = SparseStore::new(None);
        assert_eq!(s.read_task("/nonexistent/dir/task.json",true,false,false),ResultCode::FileReadError.code());

        let f = tmpfile("bad");
        std::fs::write(&f,"{\"format\":\"mdotask\",\"version\":").unwrap();
        assert_eq!(s.read_task(&f,true,false,false),ResultCode::FormatError.code());
        std::fs::write(&f,"{\"format\":\"mdotask\",\"version\":99}").unwrap();
        assert_eq!(s.read_task(&f,true,false,false),ResultCode::VersionError.code());
        std::fs::write(&f,"{\"format\":\"mdotask\",\"version\":1,\"model\":{\"cols\":[],\"rows\":[],\"a\":{\"row\":[0],\"col\":[0],\"val\":[1.0]}}}").unwrap();
        assert_eq!(s.read_task(&f,true,false,false),ResultCode::ModelInputError.code());
        _ = std::fs::remove_file(&f);
    }
}
