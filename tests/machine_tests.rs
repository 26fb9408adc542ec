//! End-to-end scenarios: build a registry, run commands across simulated
//! invocations and persist snapshots in between.

use hsmkit::builder::RegistryBuilder;
use hsmkit::checkpoint::{CheckpointError, FileStore, MemoryStore, SnapshotFormat, SnapshotStore};
use hsmkit::cli::parse_command;
use hsmkit::core::{Command, CommandDef, Outcome, State};
use hsmkit::machine::{HandlerError, Machine, MachineError};
use hsmkit::registry::Registry;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::tempdir;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct CounterData {
    count: i64,
}

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

struct CharacterStates {
    no_sheet: State,
    sheet_exists: State,
}

fn character_registry() -> (CharacterStates, Registry<CharacterData>) {
    let root = State::root("Root");
    let states = CharacterStates {
        no_sheet: root.child("NoSheet"),
        sheet_exists: root.child("SheetExists"),
    };

    let target = states.sheet_exists.clone();
    let registry = RegistryBuilder::<CharacterData>::new()
        .states([&states.no_sheet, &states.sheet_exists])
        .command(
            &states.no_sheet,
            CommandDef::new("create").args("[name] [race] [class]"),
            move |_, m, cmd| {
                let [name, race, class] = cmd.args() else {
                    return Err(HandlerError::msg("usage: create [name] [race] [class]"));
                };
                *m.data_mut() = CharacterData {
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
                Ok(Outcome::text(format!("'{name}' the {race} {class} has been created!"))
                    .with_transition(&target))
            },
        )
        .command(
            &states.sheet_exists,
            CommandDef::new("take-damage").args("[amount]"),
            |_, m, cmd| {
                let amount: i32 = cmd
                    .arg(0)
                    .ok_or_else(|| HandlerError::msg("usage: take-damage [amount]"))?
                    .parse()?;
                let data = m.data_mut();
                data.hp = data.hp.saturating_sub(amount).max(0);
                Ok(Outcome::text(format!("{} takes {amount} damage!", data.name)))
            },
        )
        .command(&states.sheet_exists, CommandDef::new("levelup"), |_, m, _| {
            let data = m.data_mut();
            data.level += 1;
            let con_bonus = data.base_stats.con.saturating_sub(10).div_euclid(2);
            data.max_hp = data.max_hp.saturating_add((5 + con_bonus).max(1));
            data.hp = data.max_hp;
            Ok(Outcome::text(format!("{} reached level {}!", data.name, data.level)))
        })
        .build_checked()
        .expect("character registry is valid");

    (states, registry)
}

#[test]
fn inherited_command_runs_without_transition() {
    let r = State::root("R");
    let s = r.child("S");

    let mut registry: Registry<()> = Registry::new();
    registry.register_state(&s);
    registry.register_command(&r, CommandDef::new("hello"), |_, _, _| {
        Ok(Outcome::text("hello from R"))
    });

    let mut machine = Machine::new(&registry, &s, ());
    let output = machine.execute(&(), &Command::bare("hello")).unwrap();

    assert_eq!(output, "hello from R");
    assert_eq!(machine.current_state(), &s);
}

#[test]
fn counter_increments() {
    let root = State::root("Root");
    let ready = root.child("Ready");

    let mut registry: Registry<CounterData> = Registry::new();
    registry.register_state(&ready);
    registry.register_command(&ready, CommandDef::new("inc"), |_, m, _| {
        m.data_mut().count += 1;
        Ok(Outcome::text(format!("Count is now: {}", m.data().count)))
    });

    let mut machine = Machine::new(&registry, &ready, CounterData { count: 0 });
    let output = machine.execute(&(), &Command::bare("inc")).unwrap();

    assert_eq!(output, "Count is now: 1");
    assert_eq!(machine.data(), &CounterData { count: 1 });
    assert_eq!(machine.current_state(), &ready);
}

#[test]
fn counter_survives_invocations() {
    let root = State::root("Root");
    let ready = root.child("Ready");
    let mut registry: Registry<CounterData> = Registry::new();
    registry.register_state(&ready);
    registry.register_command(&ready, CommandDef::new("inc"), |_, m, _| {
        m.data_mut().count += 1;
        Ok(Outcome::text(format!("Count is now: {}", m.data().count)))
    });

    let store = MemoryStore::new(SnapshotFormat::Json);
    let mut last = String::new();
    for _ in 0..3 {
        let mut machine =
            Machine::restore_or_new(&registry, &store, &ready, CounterData::default).unwrap();
        last = machine.execute(&(), &Command::bare("inc")).unwrap();
        store.save(&machine.snapshot()).unwrap();
    }

    assert_eq!(last, "Count is now: 3");
    let text = String::from_utf8(store.bytes().unwrap()).unwrap();
    assert!(text.contains("\"currentStateName\": \"Ready\""));
    assert!(text.contains("\"count\": 3"));
}

#[test]
fn character_create_populates_sheet() {
    let (states, registry) = character_registry();
    let mut machine = Machine::new(&registry, &states.no_sheet, CharacterData::default());

    let command = parse_command(["create", "Aria", "Elf", "Mage"]).unwrap();
    let output = machine.execute(&(), &command).unwrap();

    assert_eq!(output, "'Aria' the Elf Mage has been created!");
    assert_eq!(machine.current_state(), &states.sheet_exists);
    assert_eq!(
        machine.data(),
        &CharacterData {
            name: "Aria".to_string(),
            race: "Elf".to_string(),
            class: "Mage".to_string(),
            level: 1,
            hp: 10,
            max_hp: 10,
            base_stats: Stats {
                str: 10,
                dex: 10,
                con: 10,
            },
            inventory: Vec::new(),
        }
    );
}

#[test]
fn character_commands_depend_on_state() {
    let (states, registry) = character_registry();
    let mut machine = Machine::new(&registry, &states.no_sheet, CharacterData::default());

    let err = machine.execute(&(), &Command::bare("levelup")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "command 'levelup' not available in state 'NoSheet'"
    );

    let names: Vec<String> = machine
        .available_commands()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["create"]);

    machine
        .execute(&(), &Command::new("create", ["Bo", "Dwarf", "Fighter"]))
        .unwrap();
    let names: Vec<String> = machine
        .available_commands()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["levelup", "take-damage"]);
}

#[test]
fn character_damage_and_levelup() {
    let (states, registry) = character_registry();
    let mut machine = Machine::new(&registry, &states.no_sheet, CharacterData::default());
    machine
        .execute(&(), &Command::new("create", ["Aria", "Elf", "Mage"]))
        .unwrap();

    let output = machine
        .execute(&(), &Command::new("take-damage", ["15"]))
        .unwrap();
    assert_eq!(output, "Aria takes 15 damage!");
    assert_eq!(machine.data().hp, 0);

    let output = machine.execute(&(), &Command::bare("levelup")).unwrap();
    assert_eq!(output, "Aria reached level 2!");
    assert_eq!(machine.data().max_hp, 15);
    assert_eq!(machine.data().hp, 15);
}

#[test]
fn extreme_damage_saturates_instead_of_overflowing() {
    let (states, registry) = character_registry();
    let mut machine = Machine::new(&registry, &states.no_sheet, CharacterData::default());
    machine
        .execute(&(), &Command::new("create", ["Aria", "Elf", "Mage"]))
        .unwrap();

    let command = parse_command(["take-damage", "-2147483648"]).unwrap();
    machine.execute(&(), &command).unwrap();

    assert_eq!(machine.data().hp, i32::MAX);
}

#[test]
fn handler_errors_leave_state_and_report_message() {
    let (states, registry) = character_registry();
    let mut machine = Machine::new(&registry, &states.no_sheet, CharacterData::default());

    let err = machine
        .execute(&(), &Command::new("create", ["OnlyName"]))
        .unwrap_err();
    assert_eq!(err.to_string(), "usage: create [name] [race] [class]");
    assert_eq!(machine.current_state(), &states.no_sheet);

    machine
        .execute(&(), &Command::new("create", ["Aria", "Elf", "Mage"]))
        .unwrap();
    let err = machine
        .execute(&(), &Command::new("take-damage", ["lots"]))
        .unwrap_err();
    let source = std::error::Error::source(&err).expect("handler error has a source");
    assert!(source.downcast_ref::<std::num::ParseIntError>().is_some());
    assert_eq!(machine.data().hp, 10);
}

#[test]
fn character_round_trips_through_file() {
    let (states, registry) = character_registry();
    let dir = tempdir().unwrap();
    let store = FileStore::json(dir.path().join("character_sheet.json"));

    {
        let mut machine =
            Machine::restore_or_new(&registry, &store, &states.no_sheet, CharacterData::default)
                .unwrap();
        machine
            .execute(&(), &Command::new("create", ["Aria", "Elf", "Mage"]))
            .unwrap();
        store.save(&machine.snapshot()).unwrap();
    }

    let machine =
        Machine::restore_or_new(&registry, &store, &states.no_sheet, CharacterData::default)
            .unwrap();
    assert_eq!(machine.current_state(), &states.sheet_exists);
    assert_eq!(machine.data().name, "Aria");
}

#[test]
fn restore_reports_malformed_and_unknown_snapshots() {
    let (states, registry) = character_registry();
    let dir = tempdir().unwrap();

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "not a snapshot").unwrap();
    let result = Machine::restore_or_new(
        &registry,
        &FileStore::json(&broken),
        &states.no_sheet,
        CharacterData::default,
    );
    assert!(matches!(
        result,
        Err(MachineError::Checkpoint(
            CheckpointError::DeserializationFailed(_)
        ))
    ));

    let unknown = dir.path().join("unknown.json");
    fs::write(
        &unknown,
        r#"{ "currentStateName": "Retired", "data": { "name": "", "race": "", "class": "",
            "level": 0, "hp": 0, "max_hp": 0,
            "base_stats": { "str": 0, "dex": 0, "con": 0 }, "inventory": [] } }"#,
    )
    .unwrap();
    let result = Machine::restore_or_new(
        &registry,
        &FileStore::json(&unknown),
        &states.no_sheet,
        CharacterData::default,
    );
    assert!(matches!(
        result,
        Err(MachineError::StateNotFound { ref name }) if name == "Retired"
    ));
}

#[test]
fn binary_store_round_trips_machine() {
    let (states, registry) = character_registry();
    let store = MemoryStore::new(SnapshotFormat::Binary);

    let mut machine = Machine::new(&registry, &states.no_sheet, CharacterData::default());
    machine
        .execute(&(), &Command::new("create", ["Aria", "Elf", "Mage"]))
        .unwrap();
    store.save(&machine.snapshot()).unwrap();

    let restored: Machine<'_, CharacterData> =
        Machine::from_snapshot(&registry, store.load().unwrap()).unwrap();
    assert_eq!(restored.snapshot(), machine.snapshot());
}
