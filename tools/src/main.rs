//! cave-runner: headless line-oriented driver for the cave kernel.
//!
//! Usage:
//!   cave-runner --seed 42
//!   cave-runner --seed hello --config data/game_config.json --script moves.txt
//!   cave-runner --seed 42 --json          (one JSON event per line)
//!   cave-runner --seed 42 --show-map      (print the first floor and exit)
//!
//! Reads command lines from stdin (or the script file), feeds each one to
//! the session and writes the session's output lines to stdout.

use anyhow::{Context, Result};
use hexcave_core::{
    config::GameConfig, event::GameEvent, session::SessionRegistry, types::SessionId,
};
use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

#[derive(serde::Serialize)]
struct JsonLine<'a> {
    session: SessionId,
    #[serde(flatten)]
    event: &'a GameEvent,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = flag_value(&args, "--seed").unwrap_or("42").to_string();
    let json = args.iter().any(|a| a == "--json");
    let show_map = args.iter().any(|a| a == "--show-map");

    let config = match flag_value(&args, "--config") {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let registry = SessionRegistry::new(config)?;
    let (id, handle) = registry.create(seed.as_str())?;
    log::info!("runner: session {id} seed={seed} json={json}");

    let mut stdout = io::stdout();

    if show_map {
        let engine = handle
            .lock()
            .map_err(|_| anyhow::anyhow!("session {id} lock poisoned"))?;
        writeln!(stdout, "seed {seed}  depth {}", engine.depth())?;
        write!(stdout, "{}", engine.level().render())?;
        return Ok(());
    }

    let opening = {
        let mut engine = handle
            .lock()
            .map_err(|_| anyhow::anyhow!("session {id} lock poisoned"))?;
        engine.look()
    };
    if !json {
        writeln!(stdout, "id {id}")?;
    }
    emit(&mut stdout, id, &opening, json)?;

    let input: Box<dyn BufRead> = match flag_value(&args, "--script") {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Cannot open script {path}"))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }
        let events = {
            let mut engine = handle
                .lock()
                .map_err(|_| anyhow::anyhow!("session {id} lock poisoned"))?;
            engine.input_events(line)?
        };
        emit(&mut stdout, id, &events, json)?;
        stdout.flush()?;
    }

    registry.remove(id);
    Ok(())
}

fn emit(out: &mut impl Write, session: SessionId, events: &[GameEvent], json: bool) -> Result<()> {
    for event in events {
        if json {
            writeln!(out, "{}", serde_json::to_string(&JsonLine { session, event })?)?;
        } else {
            writeln!(out, "{event}")?;
        }
    }
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
