//! Graph/map coloring via backtracking with CBJ and dom/wdeg.

use clap::Parser;

use quandary::config::{Inference, SolverConfig, VariableOrder};
use quandary::problems::graph_coloring;
use quandary::solver;

#[derive(Parser)]
struct Args {
    /// Number of regions (vertices).
    n: usize,

    /// Number of colors available.
    k: u32,

    #[arg(long, default_value_t = 0.3)]
    edge_probability: f64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Build the complete graph K_n instead of a random graph.
    #[arg(long, default_value_t = false)]
    complete: bool,

    #[arg(long, default_value_t = true)]
    cbj: bool,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let csp = if args.complete {
        graph_coloring::complete_graph(args.n, args.k)
    } else {
        graph_coloring::random_graph(args.n, args.edge_probability, args.k, args.seed)
    }
    .expect("well-formed graph coloring CSP");

    let config = SolverConfig {
        inference: Inference::Mac,
        variable_order: VariableOrder::DomWdeg,
        use_cbj: args.cbj,
        ..SolverConfig::default()
    };

    println!(
        "Coloring {} regions with {} colors ({} edges)",
        args.n,
        args.k,
        csp.constraints().len()
    );

    let (solution, stats) = solver::solve(&csp, &config).expect("valid configuration");
    println!("\nSearch statistics:\n{stats:#?}");

    match solution {
        Some(assignment) => {
            println!("\nAssignment:");
            for region in csp.variables() {
                let color = assignment.get(region).expect("total assignment");
                println!("  region {region} -> color {color}");
            }
        }
        None => println!("\nNo valid coloring exists with {} colors.", args.k),
    }
}
