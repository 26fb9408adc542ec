//! Commands, command metadata and handler outcomes.

use super::state::State;
use std::fmt;

/// A named instruction with positional string arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    name: String,
    args: Vec<String>,
}

impl Command {
    /// Create a command from a name and its ordered arguments.
    ///
    /// ```rust
    /// use hsmkit::core::Command;
    ///
    /// let cmd = Command::new("create", ["Aria", "Elf", "Mage"]);
    /// assert_eq!(cmd.name(), "create");
    /// assert_eq!(cmd.args().len(), 3);
    /// assert_eq!(cmd.arg(1), Some("Elf"));
    /// ```
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A command without arguments.
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Descriptive metadata for a command, used for help output only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandDef {
    /// Lookup key
    pub name: String,
    /// Human-readable argument signature, e.g. `[name] [race] [class]`
    pub args: String,
    pub description: String,
}

impl CommandDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One help line: name, argument signature and description in columns.
impl fmt::Display for CommandDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<15} {:<20} {}",
            self.name, self.args, self.description
        )
    }
}

/// What a handler hands back to the machine: output text and an optional
/// state to move to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    pub output: String,
    pub next_state: Option<State>,
}

impl Outcome {
    /// Output text, no transition.
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            next_state: None,
        }
    }

    /// No output, no transition.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_transition(mut self, next: &State) -> Self {
        self.next_state = Some(next.clone());
        self
    }
}
