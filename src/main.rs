use std::fs;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use celo2048::events::{Channel, EventEmitter};
use celo2048::game::settings::Settings;
use celo2048::game::score_ledger::InMemoryLedger;
use celo2048::game::tile_source::RngTileSource;
use celo2048::game::GameEngine;
use celo2048::input::InputTranslator;
use celo2048::model::{
    GameEngineCommand, GameEngineEvent, GameMode, GameStateSnapshot, GameStats, InputEvent, Key,
    Leaderboard, Point, SettingsChange, TimerState,
};
use celo2048::Destroyable;
use chrono::{DateTime, Local};
use log::{info, warn};

const HELP: &str = "commands: left right up down (or w a s d), swipe x1 y1 x2 y2, tick, \
undo, redo, restart, new [classic|time|large] [seed], pause, resume, player [id], submit, \
leaderboard, save [path], load <json|path>, \
set <mode|two_probability|swipe_threshold|time_limit> <value>, quit. \
The clock ticks once a second on its own.";

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One parsed line of terminal input.
#[derive(Debug, PartialEq)]
enum CliInput {
    Input(InputEvent),
    Command(GameEngineCommand),
    Save(Option<String>),
    Load(String),
    Help,
    Quit,
}

fn init_logging() {
    env_logger::init();
}

fn parse_line(line: &str) -> Result<CliInput, String> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };
    let rest: Vec<&str> = words.collect();

    let key = |key: Key| -> Result<CliInput, String> {
        Ok(CliInput::Input(InputEvent::KeyPressed(key)))
    };
    let command = |command: GameEngineCommand| -> Result<CliInput, String> {
        Ok(CliInput::Command(command))
    };
    match verb.to_lowercase().as_str() {
        "left" | "a" => key(Key::ArrowLeft),
        "right" | "d" => key(Key::ArrowRight),
        "up" | "w" => key(Key::ArrowUp),
        "down" | "s" => key(Key::ArrowDown),
        "undo" | "u" => key(Key::Char('u')),
        "restart" | "r" => key(Key::Char('r')),
        "tick" => Ok(CliInput::Input(InputEvent::TimerTick)),
        "swipe" => {
            let coords = rest
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|err| format!("bad swipe coordinate: {}", err))?;
            match coords.as_slice() {
                [x1, y1, x2, y2] => Ok(CliInput::Input(InputEvent::Swipe {
                    start: Point::new(*x1, *y1),
                    end: Point::new(*x2, *y2),
                })),
                _ => Err("swipe takes four numbers: x1 y1 x2 y2".to_string()),
            }
        }
        "redo" => command(GameEngineCommand::Redo),
        "pause" => command(GameEngineCommand::Pause),
        "resume" => command(GameEngineCommand::Resume),
        "new" => {
            let mode = match rest.first() {
                Some(name) => Some(
                    GameMode::from_name(name).ok_or_else(|| format!("unknown mode {}", name))?,
                ),
                None => None,
            };
            let seed = match rest.get(1) {
                Some(seed) => Some(
                    seed.parse::<u64>()
                        .map_err(|err| format!("bad seed {}: {}", seed, err))?,
                ),
                None => None,
            };
            command(GameEngineCommand::NewGame(mode, seed))
        }
        "player" => command(GameEngineCommand::SetPlayer(
            rest.first().map(|p| p.to_string()),
        )),
        "submit" => command(GameEngineCommand::SubmitScore),
        "leaderboard" => command(GameEngineCommand::RefreshLeaderboard),
        "set" => match rest.as_slice() {
            [name, value] => command(GameEngineCommand::ChangeSettings(parse_setting(
                name, value,
            )?)),
            _ => Err("set takes a setting name and a value".to_string()),
        },
        "save" => Ok(CliInput::Save(rest.first().map(|p| p.to_string()))),
        "load" => {
            // the argument may be inline json containing spaces
            let source = line[verb.len()..].trim();
            if source.is_empty() {
                return Err("load takes a snapshot json or a file path".to_string());
            }
            Ok(CliInput::Load(source.to_string()))
        }
        "help" | "?" => Ok(CliInput::Help),
        "quit" | "exit" | "q" => Ok(CliInput::Quit),
        other => Err(format!("unknown command {:?}", other)),
    }
}

fn parse_setting(name: &str, value: &str) -> Result<SettingsChange, String> {
    let bad_value = |err: &dyn std::fmt::Display| format!("bad value for {}: {}", name, err);
    let mut change = SettingsChange::default();
    match name {
        "mode" | "game_mode" => {
            change.game_mode =
                Some(GameMode::from_name(value).ok_or_else(|| format!("unknown mode {}", value))?)
        }
        "two_probability" => {
            change.two_probability = Some(value.parse::<f64>().map_err(|e| bad_value(&e))?)
        }
        "swipe_threshold" => {
            change.swipe_threshold = Some(value.parse::<f32>().map_err(|e| bad_value(&e))?)
        }
        "time_limit" | "time_limit_secs" => {
            change.time_limit_secs = Some(value.parse::<u32>().map_err(|e| bad_value(&e))?)
        }
        other => return Err(format!("unknown setting {:?}", other)),
    }
    Ok(change)
}

/// Inline snapshot json, or the path of a file holding one.
fn read_snapshot(source: &str) -> Result<GameStateSnapshot, String> {
    let contents = if source.starts_with('{') {
        source.to_string()
    } else {
        fs::read_to_string(source).map_err(|err| format!("could not read {}: {}", source, err))?
    };
    GameStateSnapshot::from_json(&contents).map_err(|err| err.to_string())
}

/// Running clocks report only at countdown milestones so ticks do not flood the prompt.
fn should_print_timer(timer: &TimerState) -> bool {
    !timer.is_active()
        || timer.remaining().is_some_and(|remaining| {
            let secs = remaining.as_secs();
            secs % 10 == 0 || secs <= 5
        })
}

fn print_leaderboard(leaderboard: &Leaderboard) {
    println!("Best scores:");
    for (rank, entry) in leaderboard.best_scores.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:>8}  ({}s)",
            rank + 1,
            entry.player,
            entry.score,
            entry.time_secs
        );
    }
    println!("Total scores:");
    for (rank, entry) in leaderboard.total_scores.iter().enumerate() {
        println!(
            "  {:>2}. {:<20} {:>8}  over {} games",
            rank + 1,
            entry.player,
            entry.score_total,
            entry.games_played
        );
    }
}

fn print_game_over(stats: &GameStats) {
    let finished_at = DateTime::from_timestamp(stats.timestamp, 0)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!(
        "Game over! {} mode, score {}, best tile {}, {} moves in {}s ({})",
        stats.mode,
        stats.score,
        stats.max_tile,
        stats.moves,
        stats.completion_time.as_secs(),
        finished_at
    );
}

fn print_event(event: &GameEngineEvent) {
    match event {
        GameEngineEvent::GridUpdated { grid, .. } => print!("{}", grid),
        GameEngineEvent::ScoreChanged {
            score,
            best_score,
            gained,
        } => {
            if *gained > 0 {
                println!("Score: {} (+{})  Best: {}", score, gained, best_score);
            } else {
                println!("Score: {}  Best: {}", score, best_score);
            }
        }
        GameEngineEvent::TimerStateChanged(timer) if should_print_timer(timer) => {
            let state = if timer.ended {
                " [ended]"
            } else if timer.is_paused() {
                " [paused]"
            } else {
                ""
            };
            println!("Time: {}{}", timer.display(), state);
        }
        GameEngineEvent::GameOver(stats) => print_game_over(stats),
        GameEngineEvent::ScoreSubmitted { player, score } => {
            println!("Saved score {} for {}", score, player)
        }
        GameEngineEvent::SubmitFailed(reason) => println!("Could not submit: {}", reason),
        GameEngineEvent::LeaderboardUpdated(leaderboard) => print_leaderboard(leaderboard),
        GameEngineEvent::TimerStateChanged(_)
        | GameEngineEvent::HistoryChanged { .. }
        | GameEngineEvent::SettingsChanged(_) => (),
    }
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Reads stdin on its own thread so the main loop can keep the clock ticking.
fn spawn_line_reader() -> mpsc::Receiver<io::Result<String>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Handles one line; returns false when the user asked to quit.
fn handle_line(
    line: &str,
    input_emitter: &EventEmitter<InputEvent>,
    command_emitter: &EventEmitter<GameEngineCommand>,
    engine: &std::rc::Rc<std::cell::RefCell<GameEngine>>,
) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    match parse_line(line) {
        Ok(CliInput::Input(event)) => input_emitter.emit(event),
        Ok(CliInput::Command(command)) => command_emitter.emit(command),
        Ok(CliInput::Save(path)) => {
            let snapshot = engine.borrow().get_game_save_state();
            match (snapshot.to_json(), path) {
                (Ok(json), Some(path)) => match fs::write(&path, json) {
                    Ok(()) => println!("Saved game to {}", path),
                    Err(err) => warn!("Could not write {}: {}", path, err),
                },
                (Ok(json), None) => println!("{}", json),
                (Err(err), _) => warn!("Could not encode game: {}", err),
            }
        }
        Ok(CliInput::Load(source)) => match read_snapshot(&source) {
            Ok(snapshot) => command_emitter.emit(GameEngineCommand::LoadState(snapshot)),
            Err(message) => println!("Could not load game: {}", message),
        },
        Ok(CliInput::Help) => println!("{}", HELP),
        Ok(CliInput::Quit) => return false,
        Err(message) => println!("{}", message),
    }
    true
}

fn run(
    input_emitter: &EventEmitter<InputEvent>,
    command_emitter: &EventEmitter<GameEngineCommand>,
    engine: &std::rc::Rc<std::cell::RefCell<GameEngine>>,
) -> io::Result<()> {
    let lines = spawn_line_reader();
    prompt()?;

    let mut next_tick = Instant::now() + TICK_INTERVAL;
    loop {
        match lines.recv_timeout(next_tick.saturating_duration_since(Instant::now())) {
            Ok(line) => {
                if !handle_line(&line?, input_emitter, command_emitter, engine) {
                    break;
                }
                prompt()?;
            }
            Err(RecvTimeoutError::Timeout) => {
                input_emitter.emit(InputEvent::TimerTick);
                next_tick += TICK_INTERVAL;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    init_logging();

    let settings = Settings::load();
    let (tile_source, seed) = RngTileSource::from_seed(Settings::seed_from_env());
    info!("Starting {} game; seed: {}", settings.game_mode, seed);

    let (command_emitter, command_observer) = Channel::<GameEngineCommand>::new();
    let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();
    let (input_emitter, input_observer) = Channel::<InputEvent>::new();

    let printer = event_observer.subscribe(|event| {
        print_event(event);
        if let GameEngineEvent::SettingsChanged(settings) = event {
            if let Err(err) = settings.save() {
                warn!("Could not save settings: {}", err);
            }
        }
    });

    let engine = GameEngine::new(
        command_observer,
        event_emitter,
        settings.clone(),
        Box::new(tile_source),
        Box::new(InMemoryLedger::new()),
    );
    let input_translator = InputTranslator::new(
        command_emitter.clone(),
        input_observer,
        event_observer.clone(),
        &settings,
    );

    println!("{}", HELP);
    command_emitter.emit(GameEngineCommand::InitDisplay);

    let result = run(&input_emitter, &command_emitter, &engine);

    input_translator.borrow_mut().destroy();
    engine.borrow_mut().destroy();
    printer.unsubscribe();
    result
}
