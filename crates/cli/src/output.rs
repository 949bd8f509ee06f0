//! Command output on stdout. Logs go to stderr.

use serde::Serialize;

use crate::error::CommandError;

/// Writes command results as text or JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print `value` as pretty JSON, or through `render` as text.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::Snapshot` if `value` cannot be serialized.
    pub fn show<T: Serialize + ?Sized>(
        self,
        value: &T,
        render: impl FnOnce(&T) -> String,
    ) -> Result<(), CommandError> {
        if self.json {
            emit(&serde_json::to_string_pretty(value)?);
        } else {
            emit(&render(value));
        }
        Ok(())
    }

    /// Print a confirmation line. Suppressed in JSON mode.
    pub fn note(self, message: &str) {
        if !self.json {
            emit(message);
        }
    }
}

#[allow(clippy::print_stdout)]
fn emit(text: &str) {
    println!("{text}");
}
