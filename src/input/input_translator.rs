use std::{cell::RefCell, rc::Rc};

use log::trace;

use super::classify_swipe;
use crate::{
    destroyable::Destroyable,
    events::{EventEmitter, EventHandler, EventObserver, Unsubscriber},
    game::settings::Settings,
    model::{Direction, GameEngineCommand, GameEngineEvent, InputEvent, Key},
};

/// Turns raw key presses, swipes and clock ticks into engine commands.
pub struct InputTranslator {
    game_engine_command_emitter: EventEmitter<GameEngineCommand>,
    settings: Settings,
    input_subscription: Option<Unsubscriber<InputEvent>>,
    game_engine_subscription: Option<Unsubscriber<GameEngineEvent>>,
}

impl Destroyable for InputTranslator {
    fn destroy(&mut self) {
        if let Some(subscription) = self.input_subscription.take() {
            subscription.unsubscribe();
        }
        if let Some(subscription) = self.game_engine_subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<GameEngineEvent> for InputTranslator {
    fn handle_event(&mut self, event: &GameEngineEvent) {
        if let GameEngineEvent::SettingsChanged(settings) = event {
            self.settings = settings.clone();
        }
    }
}

impl InputTranslator {
    pub fn new(
        game_engine_command_emitter: EventEmitter<GameEngineCommand>,
        input_event_observer: EventObserver<InputEvent>,
        game_engine_event_observer: EventObserver<GameEngineEvent>,
        settings: &Settings,
    ) -> Rc<RefCell<Self>> {
        let input_translator = Rc::new(RefCell::new(Self {
            game_engine_command_emitter,
            settings: settings.clone(),
            input_subscription: None,
            game_engine_subscription: None,
        }));

        InputTranslator::bind_input_observer(input_translator.clone(), input_event_observer);
        InputTranslator::bind_game_engine_observer(
            input_translator.clone(),
            game_engine_event_observer,
        );

        input_translator
    }

    fn bind_input_observer(
        input_translator: Rc<RefCell<Self>>,
        input_event_observer: EventObserver<InputEvent>,
    ) {
        let subscription = {
            let input_translator = input_translator.clone();
            input_event_observer.subscribe(move |event| {
                input_translator.borrow().handle_input_event(event);
            })
        };

        input_translator.borrow_mut().input_subscription = Some(subscription);
    }

    fn bind_game_engine_observer(
        input_translator: Rc<RefCell<Self>>,
        game_engine_event_observer: EventObserver<GameEngineEvent>,
    ) {
        let subscription = {
            let input_translator = input_translator.clone();
            game_engine_event_observer.subscribe(move |event| {
                // other events arrive while a translated input still holds the borrow
                if let GameEngineEvent::SettingsChanged(_) = event {
                    input_translator.borrow_mut().handle_event(event);
                }
            })
        };

        input_translator.borrow_mut().game_engine_subscription = Some(subscription);
    }

    fn handle_input_event(&self, event: &InputEvent) {
        match event {
            InputEvent::KeyPressed(key) => self.handle_key_press(*key),
            InputEvent::Swipe { start, end } => {
                match classify_swipe(*start, *end, self.settings.swipe_threshold) {
                    Some(direction) => self.emit_move(direction),
                    None => trace!(target: "input", "Swipe too short: {:?} -> {:?}", start, end),
                }
            }
            InputEvent::TimerTick => {
                self.game_engine_command_emitter
                    .emit(GameEngineCommand::Tick);
            }
        }
    }

    fn handle_key_press(&self, key: Key) {
        match key {
            Key::ArrowUp => self.emit_move(Direction::Up),
            Key::ArrowDown => self.emit_move(Direction::Down),
            Key::ArrowLeft => self.emit_move(Direction::Left),
            Key::ArrowRight => self.emit_move(Direction::Right),
            Key::Char('r') => {
                self.game_engine_command_emitter
                    .emit(GameEngineCommand::Restart);
            }
            Key::Char('u') => {
                self.game_engine_command_emitter
                    .emit(GameEngineCommand::Undo);
            }
            Key::Space => {
                self.game_engine_command_emitter
                    .emit(GameEngineCommand::TogglePause);
            }
            _ => trace!(target: "input", "Ignoring key {:?}", key),
        }
    }

    fn emit_move(&self, direction: Direction) {
        trace!(target: "input", "Move {}", direction);
        self.game_engine_command_emitter
            .emit(GameEngineCommand::Move(direction));
    }
}
