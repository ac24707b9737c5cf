use mdomodel::*;
use mdomodel_highs::Model;

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).try_init();
}

const EPS : f64 = 1e-6;

#[test]
fn lp_two_vars() {
    init_logging();
    let mut m = Model::new(Some("lp"));
    m.set_min_obj_sense().unwrap();
    let x = m.add_var(0.0,10.0,1.0,false,Some("x0")).unwrap();
    let y = m.add_var(0.0,INFINITY,1.0,false,Some("x1")).unwrap();
    let c = m.add_cons(x + y,ConsSense::GreaterEqual,1.0,Some("c0")).unwrap();
    m.solve_prob().unwrap();

    assert_eq!(m.status().unwrap(),Status::Optimal);
    assert_eq!(m.state(),ModelState::Solved);
    let xx = m.real_attr_vars(attr::PRIMAL_SOLN,&[x,y]).unwrap();
    assert!((xx[0]+xx[1]-1.0).abs() < EPS);
    assert!((m.real_attr(attr::PRIMAL_OBJ_VAL).unwrap()-1.0).abs() < EPS);
    assert_eq!(m.int_attr(attr::HAS_SOLUTION).unwrap(),1);
    let dual = m.real_attr_conss(attr::DUAL_SOLN,&[c]).unwrap();
    assert!((dual[0].abs()-1.0).abs() < EPS);
}

#[test]
fn mip_rounds() {
    let mut m = Model::new(None);
    m.set_max_obj_sense().unwrap();
    let x = m.add_var(0.0,10.0,1.0,true,None).unwrap();
    let y = m.add_var(0.0,10.0,1.0,false,None).unwrap();
    m.add_cons(2.0*x,ConsSense::LessEqual,5.0,None).unwrap();
    m.add_cons(y,ConsSense::LessEqual,0.5,None).unwrap();
    m.solve_prob().unwrap();
    assert_eq!(m.status().unwrap(),Status::Optimal);
    let xx = m.real_attr_vars(attr::PRIMAL_SOLN,&[x,y]).unwrap();
    assert!((xx[0]-2.0).abs() < EPS);
    assert!((xx[1]-0.5).abs() < EPS);
}

#[test]
fn convex_qp() {
    // min x^2 + y^2 - x   s.t.  x + y = 1
    let mut m = Model::new(None);
    let x = m.add_var(NEGATIVE_INFINITY,INFINITY,0.0,false,None).unwrap();
    let y = m.add_var(NEGATIVE_INFINITY,INFINITY,0.0,false,None).unwrap();
    let mut obj = ExprQuad::new();
    obj.add_term(-1.0,x);
    obj.add_quad_term(2.0,x,x);
    obj.add_quad_term(2.0,y,y);
    m.set_quadratic_objective(&obj).unwrap();
    m.add_cons(x + y,ConsSense::Equal,1.0,None).unwrap();
    m.solve_prob().unwrap();

    assert_eq!(m.status().unwrap(),Status::Optimal);
    let xx = m.real_attr_vars(attr::PRIMAL_SOLN,&[x,y]).unwrap();
    assert!((xx[0]-0.75).abs() < 1e-5);
    assert!((xx[1]-0.25).abs() < 1e-5);
}

#[test]
fn infeasible_and_iis() {
    init_logging();
    let mut m = Model::new(None);
    let x = m.add_var(0.0,1.0,1.0,false,Some("x")).unwrap();
    let y = m.add_var(0.0,1.0,1.0,false,Some("y")).unwrap();
    let c1 = m.add_cons(x + y,ConsSense::GreaterEqual,3.0,Some("c1")).unwrap();
    let _c2 = m.add_cons(x - y,ConsSense::LessEqual,10.0,Some("c2")).unwrap();
    m.solve_prob().unwrap();
    assert!(matches!(m.status().unwrap(),Status::Infeasible|Status::InfeasibleOrUnbounded));
    assert_eq!(m.int_attr(attr::HAS_SOLUTION).unwrap(),0);

    let iis = m.compute_iis().unwrap();
    assert_eq!(iis.rows,vec![(c1,IisBound::Lower)]);
    assert_eq!(iis.cols,vec![(x,IisBound::Upper),(y,IisBound::Upper)]);
}

#[test]
fn problem_file_roundtrip() {
    let f = std::env::temp_dir().join(format!("mdomodel-highs-{}.mps",std::process::id()));
    let mut m = Model::new(Some("rt"));
    let x = m.add_var(0.0,4.0,-1.0,true,Some("x")).unwrap();
    let y = m.add_var(1.0,INFINITY,2.0,false,Some("y")).unwrap();
    m.add_cons(x + 3.0*y,ConsSense::LessEqual,9.0,Some("r")).unwrap();
    m.write_prob(&f).unwrap();

    let mut n = Model::new(None);
    n.read_prob(&f).unwrap();
    _ = std::fs::remove_file(&f);
    assert_eq!(n.num_vars().unwrap(),2);
    assert_eq!(n.num_conss().unwrap(),1);
    let y = n.var_by_name("y").unwrap();
    assert_eq!(n.real_attr_vars(attr::LB,&[y]).unwrap(),vec![1.0]);
    assert_eq!(n.real_attr_vars(attr::UB,&[y]).unwrap(),vec![INFINITY]);
    assert_eq!(n.int_attr_index(attr::IS_INTEGER,0).unwrap(),1);
    let r = n.cons_by_name("r").unwrap();
    assert_eq!(n.elements(&[r],&[y]).unwrap(),vec![3.0]);
}

#[test]
fn remote_job() {
    let mut m = Model::new(None);
    let x = m.add_var(1.0,2.0,1.0,false,None).unwrap();
    let job = m.submit_task().unwrap();
    let t = m.retrieve_task(&job).unwrap();
    assert_eq!(t.state,RemoteTaskStatus::Finished);
    assert_eq!(t.model_status,Status::Optimal);
    assert!(t.has_soln);
    assert!((m.real_attr_vars(attr::PRIMAL_SOLN,&[x]).unwrap()[0]-1.0).abs() < EPS);
}

#[test]
fn config_applies() {
    let mut m = Model::new(None);
    m.apply_config(&SolverConfig::default().with_time_limit(10.0).with_method(Method::DualSimplex).with_presolve(false)).unwrap();
    m.add_var(0.0,1.0,-1.0,false,None).unwrap();
    m.solve_prob().unwrap();
    assert_eq!(m.status().unwrap(),Status::Optimal);
    assert!(m.real_attr(attr::SOLUTION_TIME).unwrap() >= 0.0);
}
