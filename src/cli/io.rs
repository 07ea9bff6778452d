//! JSON I/O handling for CLI
//!
//! - Input: JSON object(s) via stdin
//! - Output: single JSON envelope via stdout
//! - UTF-8 only

use std::io::{self, BufRead, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a single JSON request body from stdin
pub fn read_request() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_request(&input)
}

/// Read newline-delimited JSON requests from stdin; blank lines are skipped
pub fn read_requests() -> impl Iterator<Item = CliResult<Value>> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
        .map(|line| parse_request(&line?))
}

fn parse_request(input: &str) -> CliResult<Value> {
    if input.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }
    Ok(serde_json::from_str(input)?)
}

/// Write a success envelope to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_envelope(&success_envelope(data))
}

/// Write an error envelope to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_envelope(&error_envelope(code, message))
}

fn success_envelope(data: Value) -> Value {
    serde_json::json!({
        "status": "ok",
        "data": data
    })
}

fn error_envelope(code: &str, message: &str) -> Value {
    serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

fn write_envelope(envelope: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, envelope)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
