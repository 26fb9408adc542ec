//! Counter
//!
//! The smallest useful hsmkit program: one state, one command, a number that
//! survives between runs.
//!
//! Key concepts:
//! - Restore from a snapshot file, or start fresh when none exists
//! - Run exactly one command per invocation
//! - Save the new snapshot before exiting
//!
//! Run with: cargo run --example counter -- inc

use clap::Parser;
use hsmkit::checkpoint::{FileStore, SnapshotFormat, SnapshotStore};
use hsmkit::cli::{parse_command, render_available_commands};
use hsmkit::core::{CommandDef, Outcome, State};
use hsmkit::machine::{HandlerError, Machine};
use hsmkit::registry::Registry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct CounterData {
    count: i64,
}

/// Increment a persistent counter.
#[derive(Parser)]
#[command(name = "counter", about = "Increment a persistent counter")]
struct Args {
    /// Snapshot file.
    #[arg(long, default_value = "counter.json")]
    snapshot: PathBuf,

    /// Snapshot encoding (json or binary).
    #[arg(long, default_value = "json")]
    format: SnapshotFormat,

    /// Command name followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn increment(
    _env: &(),
    machine: &mut Machine<'_, CounterData>,
    _cmd: &hsmkit::Command,
) -> Result<Outcome, HandlerError> {
    machine.data_mut().count += 1;
    Ok(Outcome::text(format!(
        "Count is now: {}",
        machine.data().count
    )))
}

fn main() -> ExitCode {
    hsmkit::logging::init();
    let args = Args::parse();

    let root = State::root("Root");
    let ready = root.child("Ready");

    let mut registry: Registry<CounterData> = Registry::new();
    registry.register_state(&ready);
    registry.register_command(
        &ready,
        CommandDef::new("inc").description("Increment the counter."),
        increment,
    );

    let store = FileStore::new(&args.snapshot, args.format);
    let mut machine =
        match Machine::restore_or_new(&registry, &store, &ready, CounterData::default) {
            Ok(machine) => machine,
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        };

    if let Some(command) = parse_command(args.command) {
        match machine.execute(&(), &command) {
            Ok(output) if !output.is_empty() => println!("> {output}"),
            Ok(_) => {}
            Err(err) => {
                eprintln!("Error: {err}");
                if !err.output().is_empty() {
                    println!("> {}", err.output());
                }
            }
        }
    }

    if let Err(err) = store.save(&machine.snapshot()) {
        eprintln!("Error saving snapshot: {err}");
        return ExitCode::FAILURE;
    }

    println!();
    println!("State: {}", machine.current_state());
    println!("Count: {}", machine.data().count);
    println!();
    print!("{}", render_available_commands(&machine.available_commands()));
    ExitCode::SUCCESS
}
