use mdomodel::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

fn model_with_vars(n : usize) -> (dummy::Model,Vec<Var>) {
    let mut m = dummy::Model::new(Some("expr"));
    let vars = m.add_vars(n,false).unwrap();
    (m,vars)
}

fn random_expr(rng : &mut StdRng, vars : &[Var], nterms : usize) -> ExprLinear {
    let mut e = ExprLinear::with_constant(rng.gen_range(-5.0..5.0));
    for _ in 0..nterms {
        // small integer coefficients so that sums are exact
        e.add_term(rng.gen_range(-4..=4) as f64, vars[rng.gen_range(0..vars.len())]);
    }
    e
}

#[test]
fn purge_is_idempotent() {
    let (_m,x) = model_with_vars(20);
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..50 {
        let mut e = random_expr(&mut rng,&x,40);
        e.purge();
        let once = e.clone();
        e.purge();
        assert_eq!(e,once);

        assert!(e.terms().windows(2).all(|w| w[0].0.index() < w[1].0.index()));
    }
}

#[test]
fn purge_preserves_sums() {
    let (_m,x) = model_with_vars(10);
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..20 {
        let mut e = random_expr(&mut rng,&x,30);
        let mut sums = vec![0.0; x.len()];
        for &(v,c) in e.terms() { sums[v.index()] += c; }
        let present : Vec<bool> = (0..x.len()).map(|j| e.vars().any(|v| v.index() == j)).collect();
        let constant = e.constant();

        e.purge();
        assert_eq!(e.constant(),constant);
        for j in 0..x.len() {
            let found : Vec<f64> = e.terms().iter().filter(|t| t.0.index() == j).map(|t| t.1).collect();
            if present[j] {
                // zero sums are kept
                assert_eq!(found,vec![sums[j]]);
            }
            else {
                assert!(found.is_empty());
            }
        }
    }
}

#[test]
fn merge_example() {
    let (_m,x) = model_with_vars(3);
    let mut e = ExprLinear::new();
    e.add_term(1.0,x[2]);
    e.add_term(2.0,x[0]);
    e.add_term(-1.0,x[2]);
    e.add_term(3.0,x[0]);
    e.purge();
    assert_eq!(e.terms(),&[(x[0],5.0),(x[2],0.0)]);
}

#[test]
fn quad_canonical_form() {
    let (_m,x) = model_with_vars(4);
    let mut q = ExprQuad::new();
    q.add_quad_term(5.0,x[3],x[1]);
    q.purge();
    assert_eq!(q.len(),1);
    assert_eq!((q.var1(0),q.var2(0),q.coef(0)),(x[1],x[3],5.0));

    let mut rng = StdRng::seed_from_u64(3);
    let mut q = ExprQuad::new();
    for _ in 0..100 {
        q.add_quad_term(1.0,x[rng.gen_range(0..4)],x[rng.gen_range(0..4)]);
    }
    q.purge();
    assert!(q.len() <= 10);
    assert_eq!(q.coefs().iter().sum::<f64>(),100.0);
    assert!((0..q.len()).all(|i| q.var1(i).index() <= q.var2(i).index()));
    let keys : Vec<(usize,usize)> = (0..q.len()).map(|i| (q.var1(i).index(),q.var2(i).index())).collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn zero_multiplier_is_noop() {
    let (_m,x) = model_with_vars(2);
    let mut e = x[0] + 1.0;
    let before = e.clone();
    e.mult_add(0.0,&(x[1]*3.0 + 7.0));
    assert_eq!(e,before);

    let mut q = ExprQuad::from(x[0] + 1.0);
    q.add_quad_term(2.0,x[0],x[1]);
    let before = q.clone();
    q.mult_add(0.0,&before.clone());
    assert_eq!(q,before);
}

#[test]
fn column_roundtrip() {
    let (mut m,x) = model_with_vars(3);
    let c = m.add_conss(3).unwrap();
    let mut col = Column::new();
    col.add_term(2.0,c[2]);
    col.add_term(1.0,c[0]);
    col.add_term(1.5,c[2]);
    let v = m.add_var_with_col(0.0,1.0,0.0,&col,false,None).unwrap();
    assert_eq!(v.index(),x.len());

    let mut fetched = m.col(v).unwrap();
    assert_eq!(fetched.terms(),&[(c[0],1.0),(c[2],3.5)]);
    // raw sizes differ until the input column is purged
    assert!(!fetched.equals(&mut col));
    col.purge();
    assert!(fetched.equals(&mut col));
}
