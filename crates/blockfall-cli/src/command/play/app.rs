use blockfall_engine::{Command, CommandOutcome, GameSession, SessionState, TickOutcome};
use crossterm::event::{Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use crate::{
    tui::{App, RenderMode, Runtime},
    view::widgets::{KeyBinding, KeyBindingDisplay, SessionDisplay},
};

const FPS: f64 = 60.0;

const PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["←", "h"], "Left"),
    (&["→", "l"], "Right"),
    (&["↓", "j"], "Soft Drop"),
    (&["↑", "k"], "Rotate"),
    (&["Space"], "Hard Drop"),
    (&["p"], "Pause"),
    (&["q", "Esc"], "Quit"),
];
const PAUSED_BINDINGS: &[KeyBinding] = &[(&["p"], "Resume"), (&["q", "Esc"], "Quit")];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["q", "Esc"], "Quit")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Command(Command),
    TogglePause,
    Quit,
}

impl Action {
    fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Left | KeyCode::Char('h') => Self::Command(Command::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Self::Command(Command::MoveRight),
            KeyCode::Down | KeyCode::Char('j') => Self::Command(Command::SoftDrop),
            KeyCode::Up | KeyCode::Char('k') => Self::Command(Command::Rotate),
            KeyCode::Char(' ') => Self::Command(Command::HardDrop),
            KeyCode::Char('p') => Self::TogglePause,
            KeyCode::Char('q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

/// Interactive game: keys become commands, the fall clock becomes ticks.
#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            is_exiting: false,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Points the tick clock at the session: the current fall interval while
    /// playing, no ticks while paused or after game over.
    fn sync_clock(&self, runtime: &mut Runtime) {
        let interval = self
            .session
            .session_state()
            .is_playing()
            .then(|| self.session.fall_interval());
        runtime.set_tick_interval(interval);
    }

    fn apply(&mut self, runtime: &mut Runtime, action: Action) {
        match action {
            Action::Command(command) => {
                if let CommandOutcome::Locked(report) = self.session.apply(command) {
                    log::debug!("{command:?} locked the piece: {report:?}");
                    runtime.restart_tick();
                }
            }
            Action::TogglePause => {
                self.session.toggle_pause();
                if self.session.session_state().is_playing() {
                    runtime.restart_tick();
                }
            }
            Action::Quit => self.is_exiting = true,
        }
        self.sync_clock(runtime);
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_render_mode(RenderMode::throttled_from_rate(FPS));
        self.sync_clock(runtime);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
            && let Some(action) = Action::from_key(key.code)
        {
            self.apply(runtime, action);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let bindings = match self.session.session_state() {
            SessionState::Playing => PLAYING_BINDINGS,
            SessionState::Paused => PAUSED_BINDINGS,
            SessionState::GameOver => GAME_OVER_BINDINGS,
        };
        let session_display = SessionDisplay::new(&self.session);
        let help = KeyBindingDisplay::new(bindings);

        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(session_display.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if let TickOutcome::Locked(report) = self.session.tick()
            && report.game_over
        {
            log::info!("top-out after {} piece(s)", self.session.stats().pieces_locked());
        }
        self.sync_clock(runtime);
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{PieceSeed, SessionConfig};
    use crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn app() -> PlayApp {
        let seed: PieceSeed = "ffeeddccbbaa99887766554433221100".parse().unwrap();
        PlayApp::new(GameSession::with_seed(SessionConfig::default(), seed).unwrap())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            Action::from_key(KeyCode::Char('h')),
            Some(Action::Command(Command::MoveLeft))
        );
        assert_eq!(
            Action::from_key(KeyCode::Right),
            Some(Action::Command(Command::MoveRight))
        );
        assert_eq!(
            Action::from_key(KeyCode::Char('j')),
            Some(Action::Command(Command::SoftDrop))
        );
        assert_eq!(
            Action::from_key(KeyCode::Up),
            Some(Action::Command(Command::Rotate))
        );
        assert_eq!(
            Action::from_key(KeyCode::Char(' ')),
            Some(Action::Command(Command::HardDrop))
        );
        assert_eq!(Action::from_key(KeyCode::Esc), Some(Action::Quit));
        assert_eq!(Action::from_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_pause_key_toggles_session() {
        let mut app = app();
        let mut runtime = Runtime::new();
        app.init(&mut runtime);

        app.handle_event(&mut runtime, key(KeyCode::Char('p')));
        assert!(app.session().session_state().is_paused());

        // Movement is ignored while paused.
        let before = *app.session().active_piece();
        app.handle_event(&mut runtime, key(KeyCode::Char(' ')));
        assert_eq!(*app.session().active_piece(), before);

        app.handle_event(&mut runtime, key(KeyCode::Char('p')));
        assert!(app.session().session_state().is_playing());
    }

    #[test]
    fn test_hard_drop_locks_piece() {
        let mut app = app();
        let mut runtime = Runtime::new();
        app.handle_event(&mut runtime, key(KeyCode::Char(' ')));
        assert_eq!(app.session().stats().pieces_locked(), 1);
    }

    #[test]
    fn test_quit_key_exits() {
        let mut app = app();
        let mut runtime = Runtime::new();
        assert!(!app.should_exit());
        app.handle_event(&mut runtime, key(KeyCode::Char('q')));
        assert!(app.should_exit());
    }
}
