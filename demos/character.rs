//! Character Sheet
//!
//! This example keeps a role-playing character sheet across runs.
//!
//! Key concepts:
//! - States decide which commands exist (`create` only before a sheet exists)
//! - Handlers mutate the data and request transitions
//! - Handler errors leave the snapshot untouched apart from what the handler changed
//! - Views are chosen from the current state
//!
//! Run with:
//!   cargo run --example character -- create Aria Elf Mage
//!   cargo run --example character -- take-damage 4
//!   cargo run --example character -- levelup

#![cfg_attr(test, allow(dead_code))]

use clap::Parser;
use hsmkit::checkpoint::{FileStore, SnapshotFormat, SnapshotStore};
use hsmkit::cli::{parse_command, render_available_commands};
use hsmkit::core::{Command, CommandDef, Outcome, State};
use hsmkit::machine::{HandlerError, Machine};
use hsmkit::registry::Registry;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct Stats {
    str: i32,
    dex: i32,
    con: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct CharacterData {
    name: String,
    race: String,
    class: String,
    level: i32,
    hp: i32,
    max_hp: i32,
    base_stats: Stats,
    inventory: Vec<String>,
}

struct States {
    no_sheet: State,
    sheet_exists: State,
}

impl States {
    fn new() -> Self {
        let root = State::root("Root");
        Self {
            no_sheet: root.child("NoSheet"),
            sheet_exists: root.child("SheetExists"),
        }
    }
}

/// Keep a character sheet between runs.
#[derive(Parser)]
#[command(name = "character", about = "Keep a character sheet between runs")]
struct Args {
    /// Snapshot file.
    #[arg(long, default_value = "character_sheet.json")]
    snapshot: PathBuf,

    /// Snapshot encoding (json or binary).
    #[arg(long, default_value = "json")]
    format: SnapshotFormat,

    /// Command name followed by its arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn registry(states: &States) -> Registry<CharacterData> {
    let mut registry = Registry::new();
    registry.register_state(&states.no_sheet);
    registry.register_state(&states.sheet_exists);

    let sheet_exists = states.sheet_exists.clone();
    registry.register_command(
        &states.no_sheet,
        CommandDef::new("create")
            .args("[name] [race] [class]")
            .description("Create a new character."),
        move |_, m, cmd| create(m, cmd, &sheet_exists),
    );
    registry.register_command(
        &states.sheet_exists,
        CommandDef::new("take-damage")
            .args("[amount]")
            .description("Inflict damage to the character."),
        |_, m, cmd| take_damage(m, cmd),
    );
    registry.register_command(
        &states.sheet_exists,
        CommandDef::new("levelup").description("Level up the character."),
        |_, m, _| Ok(levelup(m)),
    );
    registry
}

fn create(
    machine: &mut Machine<'_, CharacterData>,
    cmd: &Command,
    sheet_exists: &State,
) -> Result<Outcome, HandlerError> {
    let [name, race, class] = cmd.args() else {
        return Err(HandlerError::msg("usage: create [name] [race] [class]"));
    };
    let data = machine.data_mut();
    *data = CharacterData {
        name: name.clone(),
        race: race.clone(),
        class: class.clone(),
        level: 1,
        hp: 10,
        max_hp: 10,
        base_stats: Stats {
            str: 10,
            dex: 10,
            con: 10,
        },
        inventory: Vec::new(),
    };
    Ok(Outcome::text(format!(
        "'{}' the {} {} has been created!",
        data.name, data.race, data.class
    ))
    .with_transition(sheet_exists))
}

fn take_damage(
    machine: &mut Machine<'_, CharacterData>,
    cmd: &Command,
) -> Result<Outcome, HandlerError> {
    let [amount] = cmd.args() else {
        return Err(HandlerError::msg("usage: take-damage [amount]"));
    };
    let amount: i32 = amount
        .parse()
        .map_err(|_| HandlerError::msg("invalid amount: must be a number"))?;

    let data = machine.data_mut();
    data.hp = data.hp.saturating_sub(amount).max(0);
    Ok(Outcome::text(format!("{} takes {amount} damage!", data.name)))
}

fn levelup(machine: &mut Machine<'_, CharacterData>) -> Outcome {
    let data = machine.data_mut();
    data.level += 1;
    let con_bonus = data.base_stats.con.saturating_sub(10).div_euclid(2);
    data.max_hp = data.max_hp.saturating_add((5 + con_bonus).max(1));
    data.hp = data.max_hp;
    Outcome::text(format!("{} reached level {}!", data.name, data.level))
}

fn display_current_state(machine: &Machine<'_, CharacterData>, states: &States) {
    println!();
    if machine.current_state() == &states.no_sheet {
        println!("No character sheet found. Create one to begin.");
    } else {
        display_character_sheet(machine.data());
    }
}

fn display_character_sheet(data: &CharacterData) {
    let bar = "-".repeat(50);
    println!("{bar}");
    println!("| {:<20} | Race: {:<19} |", format!("Name: {}", data.name), data.race);
    println!("| {:<20} | Level: {:<18} |", format!("Class: {}", data.class), data.level);
    println!("{bar}");

    let ratio = if data.max_hp > 0 {
        f64::from(data.hp) / f64::from(data.max_hp)
    } else {
        0.0
    };
    let blocks = ((ratio * 20.0) as usize).min(20);
    let hp_bar = format!("[{}{}]", "#".repeat(blocks), " ".repeat(20 - blocks));
    println!(
        "| HP: {:<17} {:<22} |",
        format!("{} / {}", data.hp, data.max_hp),
        hp_bar
    );
    let stats = format!(
        "STR: {}, DEX: {}, CON: {}",
        data.base_stats.str, data.base_stats.dex, data.base_stats.con
    );
    println!("| Stats: {stats:<41} |");
    println!("{bar}");

    println!("| Inventory:{:<39}|", "");
    if data.inventory.is_empty() {
        println!("|   - {:<42} |", "(Empty)");
    } else {
        for item in &data.inventory {
            println!("|   - {item:<42} |");
        }
    }
    println!("{bar}");
}

fn main() -> ExitCode {
    hsmkit::logging::init();
    let args = Args::parse();

    let states = States::new();
    let registry = registry(&states);

    let store = FileStore::new(&args.snapshot, args.format);
    let mut machine = match Machine::restore_or_new(
        &registry,
        &store,
        &states.no_sheet,
        CharacterData::default,
    ) {
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

    display_current_state(&machine, &states);
    println!();
    print!("{}", render_available_commands(&machine.available_commands()));
    ExitCode::SUCCESS
}
