//! Stdin/stdout glue: parses a [`SolverInput`] from a reader and serializes
//! a [`SolverOutput`] to a writer. Kept thin per spec.md §1 ("out of scope:
//! JSON input parsing ... output serialization").

use std::io::{Read, Write};

use anyhow::{Context, Result};
use shared::{SolverInput, SolverOutput};

pub fn read_input(mut reader: impl Read) -> Result<SolverInput> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).context("reading stdin")?;
    serde_json::from_str(&buf).context("parsing solver input JSON")
}

pub fn write_output(mut writer: impl Write, output: &SolverOutput) -> Result<()> {
    serde_json::to_writer(&mut writer, output).context("serializing solver output")?;
    writeln!(writer).context("writing trailing newline")?;
    Ok(())
}
