//! Line-oriented console driver
use std::env;
use std::fs::File;
use std::io::{self, BufRead, Read, Write};
use std::process::ExitCode;

use log::info;

use zorkmid::config::Config;
use zorkmid::zmachine::{MachineState, ZMachine};

/// Initialize configuration.
///
/// If `config.yml` exists in the current working directory it is used;
/// otherwise the defaults apply.
fn initialize_config() -> Config {
    match File::open("config.yml") {
        Ok(f) => match Config::try_from(f) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error parsing config.yml: {}", e);
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}

/// Print any transcript lines past the already-printed mark
fn drain_transcript(zmachine: &ZMachine, printed: &mut usize) {
    let transcript = zmachine.transcript();
    for line in &transcript[*printed..] {
        println!("{}", line);
    }
    *printed = transcript.len();
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <story-file>", args[0]);
        return ExitCode::FAILURE;
    }

    let config = initialize_config();
    if config.logging() && log4rs::init_file("log4rs.yml", Default::default()).is_ok() {
        info!(target: "app::state", "Start log for '{}'", args[1]);
    }

    let mut story = Vec::new();
    match File::open(&args[1]) {
        Ok(mut f) => {
            if let Err(e) = f.read_to_end(&mut story) {
                eprintln!("Error reading '{}': {}", args[1], e);
                return ExitCode::FAILURE;
            }
        }
        Err(e) => {
            eprintln!("Error opening '{}': {}", args[1], e);
            return ExitCode::FAILURE;
        }
    }

    let mut zmachine = match ZMachine::new(story, config) {
        Ok(z) => z,
        Err(e) => {
            eprintln!("Error loading '{}': {}", args[1], e);
            return ExitCode::FAILURE;
        }
    };

    let mut printed = 0;
    let stdin = io::stdin();
    loop {
        let state = zmachine.update();
        drain_transcript(&zmachine, &mut printed);
        match state {
            MachineState::InputRequested => {
                print!("> ");
                if io::stdout().flush().is_err() {
                    return ExitCode::FAILURE;
                }
                let mut line = String::new();
                match stdin.lock().read_line(&mut line) {
                    Ok(0) | Err(_) => return ExitCode::SUCCESS,
                    Ok(_) => zmachine.input(line.trim_end_matches(['\r', '\n'])),
                }
            }
            MachineState::Halted => return ExitCode::SUCCESS,
            MachineState::Crashed => return ExitCode::FAILURE,
            MachineState::Running => unreachable!("update() returned while running"),
        }
    }
}
