extern crate criterion;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use mdomodel::*;

// Expression building and purging

fn make_vars(n : usize) -> (dummy::Model,Vec<Var>) {
    let mut m = dummy::Model::new(None);
    let x = m.add_vars(n,false).unwrap_or_default();
    (m,x)
}

fn random_terms(x : &[Var], nterms : usize, seed : u64) -> ExprLinear {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..nterms).map(|_| (x[rng.gen_range(0..x.len())],rng.gen_range(-1.0..1.0))).collect()
}

fn purge_linear(x : &[Var], nterms : usize) {
    let mut e = random_terms(x,nterms,1);
    e.purge();
}

fn bench_purge_linear(c : &mut Criterion, nvars : usize, nterms : usize) {
    let (_m,x) = make_vars(nvars);
    c.bench_function(format!("purge-linear-{}-{}",nvars,nterms).as_str(), |b| b.iter(|| purge_linear(&x,nterms)));
}

fn purge_quad(x : &[Var], nterms : usize) {
    let mut rng = StdRng::seed_from_u64(2);
    let mut q = ExprQuad::new();
    for _ in 0..nterms {
        q.add_quad_term(1.0,x[rng.gen_range(0..x.len())],x[rng.gen_range(0..x.len())]);
    }
    q.purge();
}

fn bench_purge_quad(c : &mut Criterion, nvars : usize, nterms : usize) {
    let (_m,x) = make_vars(nvars);
    c.bench_function(format!("purge-quad-{}-{}",nvars,nterms).as_str(), |b| b.iter(|| purge_quad(&x,nterms)));
}

// Constraint input through the model

fn add_rows(nvars : usize, nrows : usize) {
    let (mut m,x) = make_vars(nvars);
    for i in 0..nrows {
        let e = random_terms(&x,16,i as u64);
        _ = m.add_cons(e,ConsSense::LessEqual,1.0,None);
    }
}

fn bench_add_rows(c : &mut Criterion, nvars : usize, nrows : usize) {
    c.bench_function(format!("add-rows-{}-{}",nvars,nrows).as_str(), |b| b.iter(|| add_rows(nvars,nrows)));
}

fn bench_purge_linear_100_1000(c : &mut Criterion) { bench_purge_linear(c,100,1000) }
fn bench_purge_linear_1000_100000(c : &mut Criterion) { bench_purge_linear(c,1000,100000) }
fn bench_purge_quad_100_10000(c : &mut Criterion) { bench_purge_quad(c,100,10000) }
fn bench_add_rows_1000_1000(c : &mut Criterion) { bench_add_rows(c,1000,1000) }

criterion_group!(benches,
    bench_purge_linear_100_1000,
    bench_purge_linear_1000_100000,
    bench_purge_quad_100_10000,
    bench_add_rows_1000_1000,
    );
criterion_main!(benches);
