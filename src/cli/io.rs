//! JSON output for one-shot commands
//!
//! One JSON object per line on stdout, UTF-8 only.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;

/// Write a JSON response line to stdout
pub fn write_response<T: Serialize>(response: &T) -> CliResult<()> {
    write_response_to(response, &mut io::stdout().lock())
}

/// Write a JSON response line to `out`
pub fn write_response_to<T: Serialize, W: Write>(response: &T, out: &mut W) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
