//! Command-line collaborators.
//!
//! Turning process arguments into a [`Command`] is purely positional: the
//! first token names the command and the rest are its arguments. Flags are
//! left to the caller's argument parser.

use crate::core::{Command, CommandDef};

/// Build a command from positional tokens. Returns `None` when there are no
/// tokens at all.
///
/// ```rust
/// use hsmkit::cli::parse_command;
///
/// let cmd = parse_command(["take-damage", "3"]).unwrap();
/// assert_eq!(cmd.name(), "take-damage");
/// assert_eq!(cmd.args(), &["3".to_string()]);
///
/// assert!(parse_command(Vec::<String>::new()).is_none());
/// ```
pub fn parse_command<I, S>(tokens: I) -> Option<Command>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = tokens.into_iter().map(Into::into);
    let name: String = tokens.next()?;
    Some(Command::new(name, tokens))
}

/// Render a help listing of commands, one per line.
pub fn render_available_commands(commands: &[CommandDef]) -> String {
    let mut out = String::from("Available Commands:\n");
    if commands.is_empty() {
        out.push_str("  (None)\n");
        return out;
    }
    for def in commands {
        out.push_str("  - ");
        out.push_str(def.to_string().trim_end());
        out.push('\n');
    }
    out
}
