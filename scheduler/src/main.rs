use std::collections::HashMap;
use std::time::Instant;

use shared::{SolverOutput, SolverStats};
use tracing_subscriber::EnvFilter;

use scheduler::io;
use scheduler::model::Model;
use scheduler::search::{self, SearchConfig, SearchOutcome};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input = match io::read_input(std::io::stdin()) {
        Ok(input) => input,
        Err(err) => {
            tracing::error!(%err, "failed to read solver input");
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    };

    let model = match Model::build(&input) {
        Ok(model) => model,
        Err(err) => {
            tracing::error!(%err, "failed to build model from solver input");
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    };

    let config = SearchConfig::from_env();
    let start = Instant::now();
    let outcome = search::run(&model, &config);
    let output = to_solver_output(&model, outcome, start.elapsed().as_secs_f64());

    if let Err(err) = io::write_output(std::io::stdout(), &output) {
        tracing::error!(%err, "failed to write solver output");
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn to_solver_output(model: &Model, outcome: SearchOutcome, solve_time: f64) -> SolverOutput {
    match outcome {
        SearchOutcome::Feasible {
            schedule,
            objective,
            solutions_explored,
            optimal,
        } => {
            let stats = SolverStats {
                solve_time,
                status: if optimal { "OPTIMAL" } else { "FEASIBLE" }.to_string(),
                objective_value: objective,
                num_conflicts: 0,
                num_branches: 0,
                solutions_explored,
            };
            let mut flat: HashMap<String, HashMap<String, String>> = HashMap::new();
            for (idx, days) in &schedule {
                let employee_id = model.employees[*idx].employee.id.clone();
                let entry = flat.entry(employee_id).or_default();
                for (date, shift) in days {
                    entry.insert(date.format("%Y-%m-%d").to_string(), shift.id.clone());
                }
            }
            let mut output = SolverOutput::success(flat, stats);
            if !optimal {
                output
                    .violations
                    .push("Solution is feasible but not optimal".to_string());
            }
            output
        }
        SearchOutcome::Infeasible { reason } => {
            let stats = SolverStats {
                solve_time,
                status: "INFEASIBLE".to_string(),
                objective_value: 0,
                num_conflicts: 0,
                num_branches: 0,
                solutions_explored: 0,
            };
            SolverOutput::failed(reason, stats)
        }
    }
}
