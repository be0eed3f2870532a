use serde_json::Value;
use std::io::{self, Read};

/// Read piped JSON for `command` from stdin.
/// Returns None when stdin is a TTY or nothing was piped.
pub fn read_stdin(command: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer, command)
}

fn parse_piped(buffer: &str, command: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| format!("stdin is not a valid {command} input (expected JSON): {e}").into())
}
