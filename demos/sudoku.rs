//! Sudoku solving via MAC + MRV.

use clap::Parser;

use quandary::config::{Inference, SolverConfig, VariableOrder};
use quandary::problems::sudoku;
use quandary::solver;
use quandary::stats;

const DEFAULT_PUZZLE: &str =
    "530070000600195000098000060800060003400803001700020006060000280000419005000080079";

#[derive(Parser)]
struct Args {
    /// 81-character puzzle string ('0' or '.' for a blank cell).
    #[arg(default_value = DEFAULT_PUZZLE)]
    puzzle: String,

    #[arg(long, default_value_t = false)]
    cbj: bool,

    /// Print a per-constraint statistics table after solving.
    #[arg(long, default_value_t = false)]
    report: bool,
}

fn print_grid(puzzle: &str) {
    let chars: Vec<char> = puzzle.chars().collect();
    for row in 0..9 {
        let line: String = chars[row * 9..row * 9 + 9]
            .iter()
            .map(|&c| if c == '0' { '.' } else { c })
            .collect::<Vec<char>>()
            .chunks(3)
            .map(|chunk| chunk.iter().collect::<String>())
            .collect::<Vec<String>>()
            .join(" | ");
        println!("{line}");
        if row % 3 == 2 && row != 8 {
            println!("------+-------+------");
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let csp = sudoku::parse(&args.puzzle).expect("puzzle must be a valid 81-character grid");

    let config = SolverConfig {
        inference: Inference::Mac,
        variable_order: VariableOrder::Mrv,
        use_cbj: args.cbj,
        ..SolverConfig::default()
    };

    println!("Puzzle:");
    print_grid(&args.puzzle);

    let (solution, search_stats) = solver::solve(&csp, &config).expect("valid configuration");
    println!("\nSearch statistics:\n{search_stats:#?}");
    if args.report {
        println!("\n{}", stats::render_table(&search_stats, &csp));
    }

    match solution {
        Some(assignment) => {
            println!("\nSolution:");
            print_grid(&sudoku::format_solution(&assignment));
        }
        None => println!("\nNo solution exists for this puzzle."),
    }
}
