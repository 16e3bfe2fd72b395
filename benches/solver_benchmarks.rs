use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use quandary::config::{Inference, SolverConfig, VariableOrder};
use quandary::csp::constraint::{all_different, Constraint, Predicate};
use quandary::csp::{Csp, Domain};
use quandary::problems::sudoku as sudoku_problem;
use quandary::solver;

fn n_queens_csp(n: usize) -> Csp<u32, u32> {
    let variables: Vec<u32> = (0..n as u32).collect();
    let mut domains = HashMap::new();
    for &v in &variables {
        domains.insert(v, Domain::new(0..n as u32));
    }

    let mut constraints: Vec<Box<dyn Constraint<u32, u32>>> = all_different(&variables);
    for i in 0..n {
        for j in (i + 1)..n {
            let a = variables[i];
            let b = variables[j];
            let row_diff = (j - i) as u32;
            constraints.push(Box::new(Predicate::new(
                "NotOnSameDiagonal",
                vec![a, b],
                move |assignment| match (assignment.get(&a), assignment.get(&b)) {
                    (Some(&ca), Some(&cb)) => ca.abs_diff(cb) != row_diff,
                    _ => true,
                },
            )));
        }
    }

    Csp::new(variables, domains, constraints).unwrap()
}

fn n_queens_heuristics(c: &mut Criterion) {
    let mut group = c.benchmark_group("N-Queens Heuristics");
    let csp = n_queens_csp(10);

    group.bench_function("N=10, default order, no inference", |b| {
        let config = SolverConfig {
            inference: Inference::None,
            variable_order: VariableOrder::Default,
            ..SolverConfig::default()
        };
        b.iter(|| {
            let (solution, _stats) = solver::solve(black_box(&csp), black_box(&config)).unwrap();
            assert!(solution.is_some());
        })
    });

    group.bench_function("N=10, MRV, forward checking", |b| {
        let config = SolverConfig {
            inference: Inference::Fc,
            variable_order: VariableOrder::Mrv,
            ..SolverConfig::default()
        };
        b.iter(|| {
            let (solution, _stats) = solver::solve(black_box(&csp), black_box(&config)).unwrap();
            assert!(solution.is_some());
        })
    });

    group.bench_function("N=10, dom/wdeg, MAC", |b| {
        let config = SolverConfig {
            inference: Inference::Mac,
            variable_order: VariableOrder::DomWdeg,
            use_cbj: true,
            ..SolverConfig::default()
        };
        b.iter(|| {
            let (solution, _stats) = solver::solve(black_box(&csp), black_box(&config)).unwrap();
            assert!(solution.is_some());
        })
    });

    group.finish();
}

fn n_queens_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("N-Queens Scaling");

    for n in [8, 10, 12].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let csp = n_queens_csp(n);
            let config = SolverConfig {
                inference: Inference::Fc,
                variable_order: VariableOrder::Mrv,
                ..SolverConfig::default()
            };
            b.iter(|| {
                let (solution, _stats) =
                    solver::solve(black_box(&csp), black_box(&config)).unwrap();
                assert!(solution.is_some());
            });
        });
    }
    group.finish();
}

fn sudoku_puzzles(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sudoku");

    let puzzles: Vec<String> = (0..3)
        .map(|_| sudoku::Sudoku::generate_unique().to_string())
        .collect();

    for (i, puzzle) in puzzles.iter().enumerate() {
        let csp = sudoku_problem::parse(puzzle).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(i), &csp, |b, csp| {
            let config = SolverConfig {
                inference: Inference::Mac,
                variable_order: VariableOrder::Mrv,
                ..SolverConfig::default()
            };
            b.iter(|| {
                let (solution, _stats) = solver::solve(black_box(csp), black_box(&config)).unwrap();
                assert!(solution.is_some());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, n_queens_heuristics, n_queens_scaling, sudoku_puzzles);
criterion_main!(benches);
