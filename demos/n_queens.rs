//! N-Queens via min-conflicts local search.

use std::collections::HashMap;

use clap::Parser;

use quandary::config::{Inference, SolverConfig};
use quandary::csp::constraint::{all_different, Constraint, Predicate};
use quandary::csp::{Csp, Domain};
use quandary::solver;

#[derive(Parser)]
struct Args {
    /// Board size / number of queens.
    n: usize,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = 10_000)]
    max_steps: u64,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let n = args.n;

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

    let csp = Csp::new(variables.clone(), domains, constraints).expect("well-formed N-queens CSP");

    let config = SolverConfig {
        inference: Inference::MinConflicts,
        max_steps: args.max_steps,
        seed: args.seed,
        ..SolverConfig::default()
    };

    println!("Solving {n}-queens with min-conflicts (seed={})", args.seed);
    let (solution, stats) = solver::solve(&csp, &config).expect("valid configuration");
    println!("\nSearch statistics:\n{stats:#?}");

    match solution {
        Some(assignment) if stats.status == quandary::stats::SolveStatus::Solved => {
            println!("\nFound a solution:");
            let mut board = vec![vec!['.'; n]; n];
            for &row in &variables {
                let col = *assignment.get(&row).expect("total assignment");
                board[row as usize][col as usize] = 'Q';
            }
            for line in board {
                println!("{}", line.into_iter().collect::<String>());
            }
        }
        Some(_) => println!("\nNo solution found within the step budget (best attempt discarded)."),
        None => println!("\nNo solution found within the step budget."),
    }
}
