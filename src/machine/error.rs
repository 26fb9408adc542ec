//! Machine and handler error types.

use crate::checkpoint::CheckpointError;
use std::fmt;
use thiserror::Error;

/// Boxed error produced by a command handler.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`Machine`](super::Machine) operations.
#[derive(Debug, Error)]
pub enum MachineError {
    /// A snapshot names a state the registry does not know.
    #[error("state '{name}' not found in registry")]
    StateNotFound { name: String },

    /// No state on the current ancestor chain binds the command.
    #[error("command '{command}' not available in state '{state}'")]
    CommandNotAvailable { command: String, state: String },

    /// The handler failed. `output` holds whatever text it produced first.
    #[error("{source}")]
    Handler {
        command: String,
        output: String,
        source: BoxError,
    },

    /// Loading a stored snapshot failed.
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

impl MachineError {
    /// Partial output produced before the failure, empty if none.
    pub fn output(&self) -> &str {
        match self {
            Self::Handler { output, .. } => output,
            _ => "",
        }
    }
}

/// Failure raised inside a command handler.
///
/// Any `std::error::Error` converts into a `HandlerError`, so `?` works in
/// handler bodies. Use [`HandlerError::msg`] for plain messages and
/// [`HandlerError::with_output`] to keep partial output.
#[derive(Debug)]
pub struct HandlerError {
    output: String,
    source: BoxError,
}

impl HandlerError {
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            output: String::new(),
            source: source.into(),
        }
    }

    /// An error carrying only a message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::new(message.to_string())
    }

    /// Attach output text to report alongside the error.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_parts(self) -> (String, BoxError) {
        (self.output, self.source)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.source, f)
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self::new(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_state_and_command() {
        let err = MachineError::CommandNotAvailable {
            command: "levelup".to_string(),
            state: "NoSheet".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "command 'levelup' not available in state 'NoSheet'"
        );

        let err = MachineError::StateNotFound {
            name: "Ghost".to_string(),
        };
        assert_eq!(err.to_string(), "state 'Ghost' not found in registry");
        assert_eq!(err.output(), "");
    }

    #[test]
    fn handler_error_converts_std_errors() {
        let parse = "x".parse::<i32>().unwrap_err();
        let err: HandlerError = parse.clone().into();
        assert_eq!(err.to_string(), parse.to_string());
        assert_eq!(err.output(), "");
    }

    #[test]
    fn handler_error_keeps_output() {
        let err = HandlerError::msg("usage: take-damage [amount]").with_output("partial");
        let (output, source) = err.into_parts();
        assert_eq!(output, "partial");
        assert_eq!(source.to_string(), "usage: take-damage [amount]");
    }

    #[test]
    fn handler_variant_displays_source_verbatim() {
        let err = MachineError::Handler {
            command: "create".to_string(),
            output: "half done".to_string(),
            source: "usage: create [name] [race] [class]".into(),
        };
        assert_eq!(err.to_string(), "usage: create [name] [race] [class]");
        assert_eq!(err.output(), "half done");
    }
}
