use log::{debug, error, info, trace, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use uuid::Uuid;

use super::game_state::{GameState, MoveOutcome};
use super::score_ledger::ScoreLedger;
use super::settings::Settings;
use super::tile_source::{RngTileSource, TileSource};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    Direction, GameEngineCommand, GameEngineEvent, GameMode, GameStateSnapshot, GameStats,
    SettingsChange,
};

pub struct GameEngine {
    history: Vec<Rc<GameState>>,
    history_index: usize,
    pub current_state: GameState,
    tile_source: Box<dyn TileSource>,
    ledger: Box<dyn ScoreLedger>,
    player: Option<String>,
    current_playthrough_id: Uuid,
    score_saved: bool,
    debug_mode: bool,
    subscription_id: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    settings: Settings,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription_id) = self.subscription_id.take() {
            subscription_id.unsubscribe();
        }
    }
}

impl GameEngine {
    pub fn new(
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
        settings: Settings,
        mut tile_source: Box<dyn TileSource>,
        ledger: Box<dyn ScoreLedger>,
    ) -> Rc<RefCell<Self>> {
        let state = GameState::new(
            settings.game_mode,
            settings.time_limit_secs,
            tile_source.as_mut(),
            settings.two_probability,
        );
        let mut game_engine = Self {
            history: vec![Rc::new(state.clone())],
            history_index: 0,
            current_state: state,
            tile_source,
            ledger,
            player: None,
            current_playthrough_id: Uuid::new_v4(),
            score_saved: false,
            debug_mode: Settings::is_debug_mode(),
            subscription_id: None,
            game_engine_event_emitter,
            settings,
        };
        game_engine.player = game_engine.settings.player.clone();
        game_engine.load_best_score();

        let refcell = Rc::new(RefCell::new(game_engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    fn wire_subscription(
        game_engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let game_engine_handler = game_engine.clone();
        let subscription_id = game_engine_command_observer.subscribe(move |event| {
            let mut game_engine = game_engine_handler.borrow_mut();
            game_engine.handle_command(event.clone());
        });
        game_engine.borrow_mut().subscription_id = Some(subscription_id);
    }

    fn handle_command(&mut self, event: GameEngineCommand) {
        trace!(target: "game_engine", "Handling event: {:?}", event);
        match event {
            GameEngineCommand::Move(direction) => self.handle_move(direction),
            GameEngineCommand::Tick => self.tick(),
            GameEngineCommand::NewGame(mode, seed) => self.new_game(mode, seed),
            GameEngineCommand::Restart => {
                let state = self.current_state.restarted(
                    self.settings.time_limit_secs,
                    self.tile_source.as_mut(),
                    self.settings.two_probability,
                );
                info!(target: "game_engine", "Restarting {} game", state.mode);
                self.set_game_state(state, false, Uuid::new_v4());
            }
            GameEngineCommand::Undo => self.undo(),
            GameEngineCommand::Redo => self.redo(),
            GameEngineCommand::Pause => self.pause_game(),
            GameEngineCommand::Resume => self.resume_game(),
            GameEngineCommand::TogglePause => {
                if self.current_state.timer.is_paused() {
                    self.resume_game()
                } else {
                    self.pause_game()
                }
            }
            GameEngineCommand::SetPlayer(player) => self.set_player(player),
            GameEngineCommand::SubmitScore => self.submit_score(),
            GameEngineCommand::RefreshLeaderboard => self.refresh_leaderboard(),
            GameEngineCommand::LoadState(snapshot) => {
                trace!(target: "game_engine", "Loading saved state {:?}", snapshot);
                self.load_snapshot(snapshot);
            }
            GameEngineCommand::InitDisplay => self.sync_display(),
            GameEngineCommand::ChangeSettings(change) => self.change_settings(&change),
        }
    }

    fn new_game(&mut self, mode: Option<GameMode>, seed: Option<u64>) {
        let mode = mode.unwrap_or(self.current_state.mode);
        if seed.is_some() || self.debug_mode {
            let (source, seed) = RngTileSource::from_seed(seed);
            info!(target: "game_engine", "New {} game; seed: {}", mode, seed);
            self.tile_source = Box::new(source);
        } else {
            info!(target: "game_engine", "New {} game", mode);
        }
        let mut state = GameState::new(
            mode,
            self.settings.time_limit_secs,
            self.tile_source.as_mut(),
            self.settings.two_probability,
        );
        state.set_best_score(self.current_state.best_score);
        self.set_game_state(state, false, Uuid::new_v4());
    }

    fn load_snapshot(&mut self, snapshot: GameStateSnapshot) {
        if let Err(err) = snapshot.state.validate() {
            error!(target: "game_engine", "Rejecting saved state: {}", err);
            return;
        }
        let best_score = self.current_state.best_score;
        let mut state = snapshot.state;
        state.set_best_score(best_score.max(state.best_score));
        self.set_game_state(state, snapshot.score_saved, snapshot.playthrough_id);
    }

    fn set_game_state(&mut self, state: GameState, score_saved: bool, playthrough_id: Uuid) {
        self.current_state = state;
        self.history.clear();
        self.history.push(Rc::new(self.current_state.clone()));
        self.history_index = 0;
        self.score_saved = score_saved;
        self.current_playthrough_id = playthrough_id;
        self.debug_mode = Settings::is_debug_mode();
        self.emit_history();
        self.sync_display();
    }

    fn handle_move(&mut self, direction: Direction) {
        let was_running = self.current_state.timer.running;
        let outcome = self.current_state.apply_move(
            direction,
            self.tile_source.as_mut(),
            self.settings.two_probability,
        );
        trace!(target: "game_engine", "Move {}: {:?}", direction, outcome);

        match outcome {
            MoveOutcome::Ignored => return,
            MoveOutcome::Unchanged => self.emit_grid(),
            MoveOutcome::Moved { gained } | MoveOutcome::GameOver { gained } => {
                self.push_state();
                self.emit_score(gained);
            }
        }

        if !was_running && self.current_state.timer.running {
            self.emit_timer();
        }
        if let MoveOutcome::GameOver { .. } = outcome {
            self.finish_game();
        }
    }

    fn tick(&mut self) {
        let elapsed = self.current_state.timer.elapsed;
        let expired = self.current_state.tick();
        if expired || self.current_state.timer.elapsed != elapsed {
            self.emit_timer();
        }
        if expired {
            self.finish_game();
        }
    }

    fn finish_game(&mut self) {
        let stats = self.get_game_stats();
        info!(
            target: "game_engine",
            "Game over: score {}, max tile {}, {} moves",
            stats.score, stats.max_tile, stats.moves
        );
        self.emit_timer();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::GameOver(stats));
    }

    /// Stores the current state as the newest history entry, dropping any redo branch.
    fn push_state(&mut self) {
        // if we're not at the end of the list, prune redo state
        if self.history_index < self.history.len() - 1 {
            self.history.truncate(self.history_index + 1);
        }
        self.history.push(Rc::new(self.current_state.clone()));
        self.history_index += 1;

        self.emit_history();
        self.emit_grid();
    }

    fn undo(&mut self) {
        if self.history_index > 0 {
            self.restore_history(self.history_index - 1);
        }
        self.emit_history();
    }

    fn redo(&mut self) {
        if self.history_index < self.history.len() - 1 {
            self.restore_history(self.history_index + 1);
        }
        self.emit_history();
    }

    /// Rewinds grid and score; the clock and best score keep running forward.
    fn restore_history(&mut self, index: usize) {
        if self.current_state.game_over {
            debug!(target: "game_engine", "Ignoring history change after game over");
            return;
        }
        let timer = self.current_state.timer.clone();
        let best_score = self.current_state.best_score;
        self.history_index = index;
        self.current_state = self.history[index].as_ref().clone();
        self.current_state.timer = timer;
        self.current_state.set_best_score(best_score);
        self.emit_grid();
        self.emit_score(0);
    }

    fn pause_game(&mut self) {
        if !self.current_state.timer.is_paused() && !self.current_state.game_over {
            self.current_state.pause();
            self.emit_timer();
        }
    }

    fn resume_game(&mut self) {
        if self.current_state.timer.is_paused() {
            self.current_state.resume();
            self.emit_timer();
        }
    }

    fn set_player(&mut self, player: Option<String>) {
        let player = player
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        debug!(target: "game_engine", "Player set to {:?}", player);
        self.player = player.clone();
        self.load_best_score();
        self.emit_score(0);

        self.settings.player = player;
        self.emit_settings();
    }

    /// Best score of the current player from the ledger, 0 when unknown or anonymous.
    fn load_best_score(&mut self) {
        let best = self
            .player
            .as_deref()
            .and_then(|player| self.ledger.best_score(player).ok())
            .map(|entry| entry.score)
            .unwrap_or(0);
        self.current_state.best_score = 0;
        self.current_state.set_best_score(best);
    }

    fn submit_score(&mut self) {
        let player = match self.player.clone() {
            Some(player) => player,
            None => return self.reject_submit("no player connected".to_string()),
        };
        if !self.current_state.game_over {
            return self.reject_submit("game is not over".to_string());
        }
        if self.score_saved {
            return self.reject_submit("score already saved".to_string());
        }

        let score = self.current_state.score;
        if let Err(err) = self
            .ledger
            .save_score(&player, score, self.current_state.elapsed_secs())
        {
            return self.reject_submit(err.to_string());
        }

        info!(target: "game_engine", "Saved score {} for {}", score, player);
        self.score_saved = true;
        self.game_engine_event_emitter
            .emit(GameEngineEvent::ScoreSubmitted { player, score });
        self.load_best_score();
        self.emit_score(0);
        self.refresh_leaderboard();
    }

    fn reject_submit(&self, reason: String) {
        warn!(target: "game_engine", "Score not submitted: {}", reason);
        self.game_engine_event_emitter
            .emit(GameEngineEvent::SubmitFailed(reason));
    }

    fn refresh_leaderboard(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::LeaderboardUpdated(self.ledger.leaderboard()));
    }

    fn change_settings(&mut self, change: &SettingsChange) {
        self.settings.apply(change);
        self.emit_settings();
    }

    fn sync_display(&self) {
        self.emit_grid();
        self.emit_score(0);
        self.emit_timer();
    }

    fn emit_grid(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::GridUpdated {
                grid: self.current_state.grid.clone(),
                merged: self.current_state.merged.clone(),
            });
    }

    fn emit_score(&self, gained: u32) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::ScoreChanged {
                score: self.current_state.score,
                best_score: self.current_state.best_score,
                gained,
            });
    }

    fn emit_timer(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::TimerStateChanged(
                self.current_state.timer.clone(),
            ));
    }

    fn emit_history(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::HistoryChanged {
                history_index: self.history_index,
                history_length: self.history.len(),
            });
    }

    fn emit_settings(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::SettingsChanged(self.settings.clone()));
    }

    pub fn get_game_stats(&self) -> GameStats {
        GameStats {
            score: self.current_state.score,
            max_tile: self.current_state.grid.max_tile(),
            completion_time: Duration::from_secs(self.current_state.elapsed_secs() as u64),
            moves: self.current_state.moves,
            mode: self.current_state.mode,
            timestamp: chrono::Utc::now().timestamp(),
            playthrough_id: self.current_playthrough_id,
        }
    }

    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn get_game_save_state(&self) -> GameStateSnapshot {
        self.current_state
            .snapshot(self.score_saved, self.current_playthrough_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Channel;
    use crate::game::score_ledger::InMemoryLedger;
    use crate::game::tile_source::ScriptedTileSource;
    use crate::model::{Grid, TIME_MODE_LIMIT_SECS};
    use crate::tests::UsingLogger;
    use test_context::test_context;

    struct Harness {
        engine: Rc<RefCell<GameEngine>>,
        commands: EventEmitter<GameEngineCommand>,
        events: Rc<RefCell<Vec<GameEngineEvent>>>,
    }

    impl Harness {
        fn send(&self, command: GameEngineCommand) {
            self.commands.emit(command);
        }

        fn take_events(&self) -> Vec<GameEngineEvent> {
            self.events.borrow_mut().drain(..).collect()
        }

        fn set_rows(&self, rows: Vec<Vec<u32>>) {
            let mut engine = self.engine.borrow_mut();
            engine.current_state.grid = Grid::from_rows(rows).unwrap();
            engine.history = vec![Rc::new(engine.current_state.clone())];
            engine.history_index = 0;
        }
    }

    fn harness_with(settings: Settings, ledger: InMemoryLedger) -> Harness {
        let (command_emitter, command_observer) = Channel::<GameEngineCommand>::new();
        let (event_emitter, event_observer) = Channel::<GameEngineEvent>::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        {
            let events = events.clone();
            event_observer.subscribe(move |event| events.borrow_mut().push(event.clone()));
        }
        let engine = GameEngine::new(
            command_observer,
            event_emitter,
            settings,
            Box::new(ScriptedTileSource::default()),
            Box::new(ledger),
        );
        Harness {
            engine,
            commands: command_emitter,
            events,
        }
    }

    fn harness() -> Harness {
        harness_with(Settings::default(), InMemoryLedger::new())
    }

    fn one_merge_from_over() -> Vec<Vec<u32>> {
        vec![
            vec![2, 2, 8, 16],
            vec![8, 16, 32, 64],
            vec![16, 32, 64, 128],
            vec![32, 64, 128, 256],
        ]
    }

    fn finish_game(harness: &Harness) {
        harness.set_rows(one_merge_from_over());
        // the scripted source spawns a 2 at the only empty cell
        harness.send(GameEngineCommand::Move(Direction::Left));
        assert!(harness.engine.borrow().current_state.game_over);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_accepted_move_updates_history_and_score(_: &mut UsingLogger) {
        let harness = harness();
        harness.set_rows(vec![
            vec![2, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        harness.send(GameEngineCommand::Move(Direction::Left));

        let events = harness.take_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEngineEvent::HistoryChanged {
                history_index: 1,
                history_length: 2
            }
        )));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEngineEvent::ScoreChanged {
                score: 4,
                best_score: 4,
                gained: 4
            }
        )));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEngineEvent::TimerStateChanged(t) if t.running)));

        // left again cannot move [4, 2, 0, 0]
        harness.send(GameEngineCommand::Move(Direction::Left));
        let events = harness.take_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEngineEvent::HistoryChanged { .. })));
        assert_eq!(harness.engine.borrow().history.len(), 2);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_undo_redo_and_branch_truncation(_: &mut UsingLogger) {
        let harness = harness();
        harness.set_rows(vec![
            vec![2, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![4, 0, 0, 0],
        ]);
        harness.send(GameEngineCommand::Move(Direction::Left));
        harness.send(GameEngineCommand::Move(Direction::Right));
        let after_two = harness.engine.borrow().current_state.clone();
        assert_eq!(after_two.moves, 2);

        harness.send(GameEngineCommand::Undo);
        harness.send(GameEngineCommand::Undo);
        {
            let engine = harness.engine.borrow();
            assert_eq!(engine.current_state.moves, 0);
            assert_eq!(engine.current_state.score, 0);
            assert_eq!(engine.current_state.best_score, 4);
            assert_eq!(engine.history_index, 0);
        }

        harness.send(GameEngineCommand::Redo);
        harness.send(GameEngineCommand::Redo);
        assert_eq!(harness.engine.borrow().current_state.grid, after_two.grid);

        harness.send(GameEngineCommand::Undo);
        harness.send(GameEngineCommand::Move(Direction::Down));
        let engine = harness.engine.borrow();
        assert_eq!(engine.history.len(), 3);
        assert_eq!(engine.history_index, 2);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_game_over_emits_stats(_: &mut UsingLogger) {
        let harness = harness();
        finish_game(&harness);

        let events = harness.take_events();
        let stats = events
            .iter()
            .find_map(|e| match e {
                GameEngineEvent::GameOver(stats) => Some(stats.clone()),
                _ => None,
            })
            .expect("game over event");
        assert_eq!(stats.score, 4);
        assert_eq!(stats.max_tile, 256);
        assert_eq!(stats.moves, 1);
        assert_eq!(stats.mode, GameMode::Classic);

        // no rewinding a finished game
        harness.send(GameEngineCommand::Undo);
        assert!(harness.engine.borrow().current_state.game_over);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_submit_requires_player_and_finished_game(_: &mut UsingLogger) {
        let harness = harness();
        harness.send(GameEngineCommand::SubmitScore);
        harness.send(GameEngineCommand::SetPlayer(Some("0xabc".to_string())));
        harness.send(GameEngineCommand::SubmitScore);

        let failures: Vec<String> = harness
            .take_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEngineEvent::SubmitFailed(reason) => Some(reason),
                _ => None,
            })
            .collect();
        assert_eq!(failures, vec!["no player connected", "game is not over"]);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_submit_only_once(_: &mut UsingLogger) {
        let harness = harness();
        harness.send(GameEngineCommand::SetPlayer(Some("0xabc".to_string())));
        finish_game(&harness);
        harness.take_events();

        harness.send(GameEngineCommand::SubmitScore);
        let events = harness.take_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEngineEvent::ScoreSubmitted { score: 4, .. }
        )));
        let leaderboard = events
            .iter()
            .find_map(|e| match e {
                GameEngineEvent::LeaderboardUpdated(board) => Some(board.clone()),
                _ => None,
            })
            .expect("leaderboard refresh");
        assert_eq!(leaderboard.best_scores.len(), 1);
        assert_eq!(leaderboard.total_scores[0].games_played, 1);

        harness.send(GameEngineCommand::SubmitScore);
        let events = harness.take_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEngineEvent::SubmitFailed(reason) if reason == "score already saved"
        )));
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEngineEvent::ScoreSubmitted { .. })));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_set_player_loads_best_score(_: &mut UsingLogger) {
        let mut ledger = InMemoryLedger::new();
        ledger.save_score("0xabc", 5000, 300).unwrap();
        let harness = harness_with(Settings::default(), ledger);

        harness.send(GameEngineCommand::SetPlayer(Some("0xabc".to_string())));
        assert_eq!(harness.engine.borrow().current_state.best_score, 5000);
        assert_eq!(harness.engine.borrow().player(), Some("0xabc"));

        harness.send(GameEngineCommand::SetPlayer(Some("0xdef".to_string())));
        assert_eq!(harness.engine.borrow().current_state.best_score, 0);

        harness.send(GameEngineCommand::SetPlayer(Some("0xabc".to_string())));
        harness.send(GameEngineCommand::SetPlayer(None));
        assert_eq!(harness.engine.borrow().current_state.best_score, 0);
        assert!(harness.take_events().iter().any(
            |e| matches!(e, GameEngineEvent::SettingsChanged(s) if s.player.is_none())
        ));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_time_mode_ends_on_ticks(_: &mut UsingLogger) {
        let mut settings = Settings::default();
        settings.game_mode = GameMode::Time;
        let harness = harness_with(settings, InMemoryLedger::new());
        harness.send(GameEngineCommand::Tick);
        assert_eq!(harness.engine.borrow().current_state.elapsed_secs(), 0);

        // two spawned tiles in the first row always slide right
        harness.send(GameEngineCommand::Move(Direction::Right));
        for _ in 0..TIME_MODE_LIMIT_SECS {
            harness.send(GameEngineCommand::Tick);
        }
        let events = harness.take_events();
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEngineEvent::GameOver(_)))
            .count();
        assert_eq!(game_overs, 1);
        assert!(harness.engine.borrow().current_state.game_over);

        harness.send(GameEngineCommand::Tick);
        assert!(harness.take_events().is_empty());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_toggle_pause(_: &mut UsingLogger) {
        let harness = harness();
        harness.send(GameEngineCommand::TogglePause);
        assert!(harness.engine.borrow().current_state.timer.is_paused());
        harness.send(GameEngineCommand::Move(Direction::Right));
        assert_eq!(harness.engine.borrow().current_state.moves, 0);

        harness.send(GameEngineCommand::TogglePause);
        assert!(!harness.engine.borrow().current_state.timer.is_paused());
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_restart_and_new_game(_: &mut UsingLogger) {
        let harness = harness();
        harness.set_rows(vec![
            vec![8, 8, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        harness.send(GameEngineCommand::Move(Direction::Left));
        let first_id = harness.engine.borrow().current_playthrough_id;

        harness.send(GameEngineCommand::Restart);
        {
            let engine = harness.engine.borrow();
            assert_eq!(engine.current_state.score, 0);
            assert_eq!(engine.current_state.best_score, 16);
            assert_eq!(engine.history.len(), 1);
            assert_ne!(engine.current_playthrough_id, first_id);
        }

        harness.send(GameEngineCommand::NewGame(Some(GameMode::Large), Some(7)));
        let engine = harness.engine.borrow();
        assert_eq!(engine.current_state.mode, GameMode::Large);
        assert_eq!(engine.current_state.grid.size(), 5);
        assert_eq!(engine.current_state.grid.empty_cells().len(), 23);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_load_state_round_trip(_: &mut UsingLogger) {
        let harness = harness();
        harness.set_rows(vec![
            vec![2, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        harness.send(GameEngineCommand::Move(Direction::Left));
        let saved = harness.engine.borrow().get_game_save_state();
        let json = saved.to_json().unwrap();

        harness.send(GameEngineCommand::NewGame(None, Some(1)));
        assert_eq!(harness.engine.borrow().current_state.score, 0);

        let snapshot = GameStateSnapshot::from_json(&json).unwrap();
        harness.send(GameEngineCommand::LoadState(snapshot));
        let engine = harness.engine.borrow();
        assert_eq!(engine.current_state.score, 4);
        assert_eq!(engine.current_state.grid, saved.state.grid);
        assert!(engine.current_state.timer.is_paused());
        assert_eq!(engine.current_playthrough_id, saved.playthrough_id);
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_change_settings_and_destroy(_: &mut UsingLogger) {
        let harness = harness();
        harness.send(GameEngineCommand::ChangeSettings(SettingsChange {
            time_limit_secs: Some(30),
            ..Default::default()
        }));
        assert_eq!(harness.engine.borrow().settings().time_limit_secs, 30);
        assert!(harness
            .take_events()
            .iter()
            .any(|e| matches!(e, GameEngineEvent::SettingsChanged(s) if s.time_limit_secs == 30)));

        harness.engine.borrow_mut().destroy();
        harness.send(GameEngineCommand::InitDisplay);
        assert!(harness.take_events().is_empty());
    }
}
