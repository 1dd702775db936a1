use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use news_core::{update, AppState, Msg, QueryOptions, SessionConfig};
use news_engine::{ensure_output_dir, EngineConfig, SearchSettings};
use news_logging::{news_info, news_warn};

use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::render;
use super::{logging, persistence};
use crate::cli::Cli;

/// How long the loop waits for input before checking engine completions.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum Input {
    Line(String),
    Closed,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(cli.log, cli.log_level.into());

    ensure_output_dir(&cli.output_dir)
        .with_context(|| format!("preparing output directory {:?}", cli.output_dir))?;

    let query = if cli.legacy_ranges {
        QueryOptions::legacy()
    } else {
        QueryOptions::default()
    };
    let mut state = AppState::with_config(SessionConfig {
        query,
        ..SessionConfig::default()
    });

    let mut engine_config = EngineConfig::default_with_output(cli.output_dir.clone());
    engine_config.settings = SearchSettings::with_base_url(cli.api_base.clone());
    engine_config.export_format = cli.export_format.into();
    let runner = EffectRunner::new(engine_config);
    news_info!(
        "News tracker started api_base={} output_dir={:?}",
        cli.api_base,
        cli.output_dir
    );

    if !cli.no_restore {
        if let Some(saved) = persistence::load_query(&cli.output_dir) {
            // Restoring emits no effects; the initial render below covers it.
            let (restored, _) = update(state, Msg::QueryRestored(saved));
            state = restored;
        }
    }
    state.consume_dirty();
    println!("{}", render(&state.view()));
    println!("Type 'help' for commands.");

    let input_rx = spawn_input_reader();
    loop {
        for msg in runner.poll() {
            state = dispatch(state, msg, &runner);
        }

        let line = match input_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Input::Line(line)) => line,
            Ok(Input::Closed) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => continue,
        };

        match parse_command(&line) {
            Ok(Some(Command::Update(msg))) => state = dispatch(state, msg, &runner),
            Ok(Some(Command::Show)) => println!("{}", render(&state.view())),
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(Command::Quit)) => break,
            Ok(None) => {}
            Err(message) => println!("{message}"),
        }
    }

    news_info!("News tracker exiting");
    Ok(())
}

/// Applies one message, runs its effects and redraws if anything changed.
///
/// Effects the engine refuses come back as failed completions and are
/// applied before redrawing.
fn dispatch(mut state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let mut queue = VecDeque::from([msg]);
    while let Some(msg) = queue.pop_front() {
        let (next, effects) = update(state, msg);
        state = next;
        queue.extend(runner.run(effects));
    }
    if state.consume_dirty() {
        println!("{}", render(&state.view()));
    }
    state
}

fn spawn_input_reader() -> mpsc::Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Input::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    news_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Input::Closed);
    });
    rx
}
