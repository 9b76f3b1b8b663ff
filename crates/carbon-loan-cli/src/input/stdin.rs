use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

/// Read a piped JSON request from stdin.
///
/// Returns `None` when stdin is an interactive terminal or carries only
/// whitespace, so commands fall back to their flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    let bytes = io::stdin().read_to_string(&mut buffer)?;
    debug!(bytes, "read request from stdin");

    match buffer.trim() {
        "" => Ok(None),
        body => Ok(Some(serde_json::from_str(body)?)),
    }
}
