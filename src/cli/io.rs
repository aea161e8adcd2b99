//! Output handling for CLI
//!
//! stdout carries exactly one JSON object per run; logs go to stderr.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a run summary as a single JSON line
pub fn write_summary<W: Write>(out: &mut W, summary: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, summary)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write a run summary to stdout
pub fn write_stdout(summary: &Value) -> CliResult<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_summary(&mut lock, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_line() {
        let mut buf = Vec::new();
        write_summary(&mut buf, &json!({"status": "ok", "applied": 2})).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.ends_with('\n'));
        let parsed: Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed["applied"], 2);
    }
}
