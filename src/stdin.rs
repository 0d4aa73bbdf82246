use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result};

/// Read all of standard input when it is piped or redirected.
///
/// Returns `None` for an interactive terminal.
pub fn read_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("reading from stdin")?;
    Ok(Some(buf))
}
