//! Command handlers that drive the `modelhub-core` controllers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, args) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Build a controller from the context's ports
//!   3. Format output for the terminal
//!
//! Handlers should NOT:
//! - Build HTTP requests or parse wire formats
//! - Contain state machine logic (it lives in the controllers)

pub mod browse;
pub mod chat;
pub mod model;
pub mod predict;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::CliError;

/// Line editor shared by the interactive loops.
pub(crate) struct Prompt {
    editor: DefaultEditor,
}

impl Prompt {
    pub(crate) fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| CliError::Io(e.to_string()))?;
        Ok(Self { editor })
    }

    /// Read one trimmed line. `None` on Ctrl-C or Ctrl-D.
    pub(crate) fn read(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if !line.is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(CliError::Io(e.to_string()).into()),
        }
    }
}
