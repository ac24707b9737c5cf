use std::cell::RefCell;
use std::rc::Rc;
use mdomodel::*;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).try_init();
}

fn tmpfile(name : &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("mdomodel-{}-{}",std::process::id(),name))
}

#[test]
fn index_monotonicity() {
    init_logging();
    let mut m = dummy::Model::new(None);
    for j in 0..5 {
        let v = m.add_var(0.0,1.0,0.0,false,None).unwrap();
        assert_eq!(v.index(),j);
        assert_eq!(m.num_vars().unwrap(),j+1);
    }
    let cs = m.add_conss(3).unwrap();
    assert_eq!(cs.iter().map(|c| c.index()).collect::<Vec<usize>>(),vec![0,1,2]);
    assert_eq!(m.int_attr(attr::NUM_CONSS).unwrap(),3);
    // empty rows default to (-inf,0)
    assert_eq!(m.real_attr_conss(attr::LHS,&cs[..1]).unwrap(),vec![NEGATIVE_INFINITY]);
    assert_eq!(m.real_attr_conss(attr::RHS,&cs[..1]).unwrap(),vec![0.0]);
}

#[test]
fn delete_then_resync() {
    init_logging();
    let mut m = dummy::Model::new(None);
    let x = m.add_vars_with(&[0.0;5],&[1.0;5],&[0.0,10.0,20.0,30.0,40.0],None,Some(&["x0","x1","x2","x3","x4"][..])).unwrap();
    m.delete_vars(&[x[3],x[1],x[3]]).unwrap();

    assert_eq!(m.num_vars().unwrap(),3);
    assert_eq!(m.vars().unwrap().iter().map(|v| v.index()).collect::<Vec<usize>>(),vec![0,1,2]);
    // old handles are stale, even those that survived
    assert!(matches!(m.var_attrs(x[0]),Err(Error::StaleHandle{ .. })));

    let names = m.str_attr_array(attr::COL_NAME,0,3).unwrap();
    assert_eq!(names,vec!["x0","x2","x4"]);
    let objs = m.real_attr_array(attr::OBJ,0,3).unwrap();
    assert_eq!(objs,vec![0.0,20.0,40.0]);

    m.delete_vars(&[]).unwrap();
    assert_eq!(m.num_vars().unwrap(),3);
}

#[test]
fn delete_constraints_keeps_columns_consistent() {
    let mut m = dummy::Model::new(None);
    let x = m.add_var(0.0,1.0,0.0,false,None).unwrap();
    let c : Vec<Cons> = (0..4).map(|i| m.add_cons(x*(i as f64 + 1.0),ConsSense::LessEqual,1.0,None).unwrap()).collect();
    m.delete_conss(&[c[0],c[2]]).unwrap();
    let x = m.var(0).unwrap();
    let col = m.col(x).unwrap();
    let conss = m.conss().unwrap().to_vec();
    assert_eq!(col.terms(),&[(conss[0],2.0),(conss[1],4.0)]);
}

#[test]
fn range_normalization() {
    let mut m = dummy::Model::new(None);
    let x = m.add_var(0.0,INFINITY,0.0,false,None).unwrap();
    let mut e = ExprLinear::from(x);
    e.set_constant(2.0);
    let c = m.add_range(&e,5.0,10.0,Some("r")).unwrap();
    let a = m.cons_attrs(c).unwrap();
    assert_eq!(a.real_attr(attr::LHS).unwrap(),3.0);
    assert_eq!(a.real_attr(attr::RHS).unwrap(),8.0);

    let c = m.add_range(&e,NEGATIVE_INFINITY,10.0,None).unwrap();
    let a = m.cons_attrs(c).unwrap();
    assert_eq!(a.real_attr(attr::LHS).unwrap(),NEGATIVE_INFINITY);
    assert_eq!(a.real_attr(attr::RHS).unwrap(),8.0);
}

#[test]
fn engine_errors_carry_codes() {
    let mut m = dummy::Model::new(None);
    let err = m.var(0).unwrap_err();
    assert_eq!(err.code(),Some(-2003));
    assert_eq!(err.result_code(),Some(ResultCode::ModelInvalidColIdx));
    assert!(err.to_string().contains("MDO_MODEL_INVALID_COL_IDX"));

    let err = m.real_attr(attr::PRIMAL_OBJ_VAL).unwrap_err();
    assert_eq!(err.result_code(),Some(ResultCode::NoSoln));

    let x = m.add_var(0.0,1.0,0.0,false,None).unwrap();
    assert!(matches!(m.add_var_with_conss(0.0,1.0,0.0,&[],Some(&[1.0][..]),false,None),Err(Error::LengthMismatch{ .. })));
    assert!(matches!(m.elements(&[],&[x]),Err(Error::LengthMismatch{ .. })));
}

#[test]
fn quadratic_objective() {
    let mut m = dummy::Model::new(None);
    let x = m.add_vars(3,false).unwrap();
    let mut obj = ExprQuad::new();
    obj.add_term(1.0,x[0]);
    obj.add_term(2.0,x[0]);
    obj.add_constant(4.0);
    obj.add_quad_term(1.0,x[0],x[0]);
    obj.add_quad_term(0.5,x[1],x[0]);
    m.set_objs(&[x[2]],&[9.0]).unwrap();
    m.set_quadratic_objective(&obj).unwrap();

    assert_eq!(m.objs(&x).unwrap(),vec![3.0,0.0,0.0]);
    assert_eq!(m.obj_offset().unwrap(),4.0);
    assert_eq!(m.quadratic_elements(&[x[0],x[0]],&[x[0],x[1]]).unwrap(),vec![1.0,0.5]);
    m.delete_quadratic_elements(&[x[0]],&[x[1]]).unwrap();
    assert_eq!(m.int_attr(attr::NUM_VARS).unwrap(),3);
    assert_eq!(m.quadratic_elements(&[x[1]],&[x[0]]).unwrap(),vec![0.0]);
}

#[test]
fn task_file_roundtrip() {
    init_logging();
    let f = tmpfile("roundtrip.json");
    let mut m = dummy::Model::new(Some("task"));
    m.set_max_obj_sense().unwrap();
    let x = m.add_var(0.0,10.0,1.0,true,Some("x")).unwrap();
    let y = m.add_var(-1.0,INFINITY,2.0,false,Some("y")).unwrap();
    m.add_cons(x + 2.0*y,ConsSense::LessEqual,4.0,Some("c")).unwrap();
    m.set_real_param(param::MAX_TIME,5.0).unwrap();
    m.write_task(&f,true,true,false).unwrap();

    let mut n = dummy::Model::new(None);
    let stale = n.add_var(0.0,0.0,0.0,false,None).unwrap();
    n.read_task(&f,true,true,false).unwrap();
    _ = std::fs::remove_file(&f);

    assert!(matches!(n.var_attrs(stale),Err(Error::StaleHandle{ .. })));
    assert_eq!(n.num_vars().unwrap(),2);
    assert_eq!(n.num_conss().unwrap(),1);
    assert!(n.is_max_obj_sense().unwrap());
    assert_eq!(n.str_attr(attr::PROB_NAME).unwrap(),"task");
    assert_eq!(n.real_param(param::MAX_TIME).unwrap(),5.0);

    let c = n.cons_by_name("c").unwrap();
    let y = n.var_by_name("y").unwrap();
    let mut e = n.expr_linear(c).unwrap();
    let mut expected = n.var(0).unwrap() + 2.0*y;
    assert!(e.equals(&mut expected));
    assert_eq!(n.int_attr_index(attr::IS_INTEGER,0).unwrap(),1);

    assert_eq!(n.read_task(tmpfile("missing.json"),true,false,false).unwrap_err().result_code(),Some(ResultCode::FileReadError));
}

#[test]
fn remote_job_records_outcome() {
    let mut m = dummy::Model::new(None);
    m.add_var(0.0,1.0,1.0,false,None).unwrap();
    let job = m.submit_task().unwrap();
    let t = m.retrieve_task(&job).unwrap();
    assert_eq!(t.state,RemoteTaskStatus::Failed);
    assert_eq!(t.result,ResultCode::AbortSolverNotAvailable.code());
    assert!(!t.has_soln);
    assert_eq!(m.retrieve_task("no-such-job").unwrap_err().result_code(),Some(ResultCode::RemoteInvalidToken));
}

#[test]
fn log_channels() {
    let lines = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut m = dummy::Model::new(None);
    {
        let lines = lines.clone();
        m.set_log_callback(move |s| lines.borrow_mut().push(s.to_string())).unwrap();
    }
    let f = tmpfile("log.txt");
    m.set_log_file(Some(f.to_str().unwrap())).unwrap();
    m.display_results().unwrap();
    assert!(lines.borrow().iter().any(|l| l.contains("MDO_UNKNOWN")));
    assert!(std::fs::read_to_string(&f).unwrap().contains("No solution available"));
    m.set_log_file(None).unwrap();
    m.clear_log_callback().unwrap();
    _ = std::fs::remove_file(&f);
}

#[test]
fn environment_lifecycle() {
    let mut env : Env<dummy::Backend> = Env::new();
    let mut m = env.create_model(Some("a")).unwrap();
    m.add_var(0.0,1.0,0.0,false,Some("x")).unwrap();
    let mut copy = env.copy_model(&m).unwrap();
    assert_eq!(copy.var_by_name("x").unwrap().index(),0);
    assert!(matches!(env.free(),Err(Error::EnvInUse{ live : 2 })));
    m.free();
    copy.free();
    env.free().unwrap();
    assert_eq!(m.var(0),Err(Error::Freed));
}
