//! Shared helpers for command modules

use std::io::{self, IsTerminal, Read};

use serde::Serialize;

use cairn_core::error::{CairnError, Result};

/// Print any serializable value as pretty JSON on stdout
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Use the positional argument, or read all of stdin when it was omitted
pub fn content_or_stdin(content: Option<&str>) -> Result<String> {
    let text = match content {
        Some(c) => c.to_string(),
        None => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                return Err(CairnError::UsageError(
                    "no content given and stdin is a terminal".to_string(),
                ));
            }
            let mut buf = String::new();
            stdin
                .lock()
                .read_to_string(&mut buf)
                .map_err(|e| CairnError::io_operation("read", "stdin", e))?;
            buf
        }
    };

    let text = text.trim_end().to_string();
    if text.trim().is_empty() {
        return Err(CairnError::UsageError("content must not be empty".to_string()));
    }
    Ok(text)
}
