use std::io::{Read, Write};

use serde::Serialize;
use shared::SolverInput;
use tracing_subscriber::EnvFilter;
use validator::model::ValidatorModel;
use validator::violations::{check, Violation};

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Status {
    Ok,
    Violations,
    Error,
}

#[derive(Debug, Serialize)]
struct Report {
    status: Status,
    violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let report = run();
    let is_error = matches!(report.status, Status::Error);

    let mut stdout = std::io::stdout();
    if serde_json::to_writer(&mut stdout, &report).is_ok() {
        let _ = writeln!(stdout);
    }

    if is_error {
        std::process::exit(1);
    }
}

fn run() -> Report {
    let mut buf = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut buf) {
        tracing::error!(%err, "failed to read stdin");
        return Report {
            status: Status::Error,
            violations: Vec::new(),
            error: Some(format!("reading stdin: {err}")),
        };
    }

    let input: SolverInput = match serde_json::from_str(&buf) {
        Ok(input) => input,
        Err(err) => {
            tracing::error!(%err, "failed to parse validator input");
            return Report {
                status: Status::Error,
                violations: Vec::new(),
                error: Some(format!("parsing input: {err}")),
            };
        }
    };

    let model = match ValidatorModel::build(&input) {
        Ok(model) => model,
        Err(err) => {
            tracing::error!(%err, "failed to build validator model");
            return Report {
                status: Status::Error,
                violations: Vec::new(),
                error: Some(err.to_string()),
            };
        }
    };

    let violations = check(&model);
    let status = if violations.is_empty() { Status::Ok } else { Status::Violations };
    Report {
        status,
        violations,
        error: None,
    }
}
