//! Host application state and event loop.
//!
//! This module implements The Elm Architecture (TEA) pattern: events flow
//! through [`App::update`], and [`App::view`] draws the current state.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use tracing::{debug, info, trace};

use crate::engine::KeyOutcome;
use crate::error::{AppError, Result};
use crate::events::{Event, EventHandler, Key};
use crate::mount::Form;
use crate::ui::{render_form, HitMap, Theme};

/// Submitted field names and serialized values.
pub type Submission = Vec<(String, String)>;

/// The host application.
pub struct App {
    form: Form,
    theme: Theme,
    /// Regions of the last drawn frame.
    hits: HitMap,
    should_quit: bool,
    submitted: Option<Submission>,
}

impl App {
    /// Create a host over a mounted form.
    pub fn new(form: Form, theme: Theme) -> Self {
        Self {
            form,
            theme,
            hits: HitMap::new(),
            should_quit: false,
            submitted: None,
        }
    }

    /// The mounted form.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Whether the loop should stop.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The submission, once the form was submitted.
    pub fn submitted(&self) -> Option<&Submission> {
        self.submitted.as_ref()
    }

    /// Take the submission out of the app.
    pub fn take_submission(&mut self) -> Option<Submission> {
        self.submitted.take()
    }

    /// Update the state from one event.
    pub fn update(&mut self, event: Event, now: Instant) {
        match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event, now);
            }
            Event::Mouse(mouse_event) => self.handle_mouse_event(mouse_event, now),
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
            }
            Event::Tick => self.form.tick(now),
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent, now: Instant) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) {
            match key_event.code {
                KeyCode::Char('s') => {
                    self.submit();
                    return;
                }
                KeyCode::Char('c') => {
                    info!("Quit requested");
                    self.should_quit = true;
                    return;
                }
                _ => {}
            }
        }

        let key = Key::from(key_event);
        let outcome = self.form.handle_key(key, now);
        if outcome == KeyOutcome::Propagate && key == Key::Escape {
            info!("Quit requested");
            self.should_quit = true;
        }
    }

    fn handle_mouse_event(&mut self, mouse_event: MouseEvent, now: Instant) {
        if mouse_event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let target = self.hits.hit_test(mouse_event.column, mouse_event.row);
        debug!(?target, column = mouse_event.column, row = mouse_event.row, "Press");
        self.form.press(target, now);
    }

    /// Reconcile every control and record the submission.
    pub fn submit(&mut self) {
        self.form.flush();
        let submission = self.form.submission();
        info!(fields = submission.len(), "Form submitted");
        self.submitted = Some(submission);
        self.should_quit = true;
    }

    /// Render the form.
    pub fn view(&mut self, frame: &mut Frame) {
        self.hits = render_form(frame, &self.form, &self.theme);
    }
}

/// Run `app` in the terminal until it quits.
///
/// Returns the submission, or `None` if the user quit without submitting.
pub fn run(mut app: App, tick_rate: Duration) -> Result<Option<Submission>> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .and_then(|stdout| stdout.execute(EnableMouseCapture))
        .map_err(|e| AppError::terminal(e.to_string()))?;

    let result = event_loop(&mut app, tick_rate);
    restore_terminal().map_err(|e| AppError::terminal(e.to_string()))?;
    result?;

    Ok(app.take_submission())
}

fn event_loop(app: &mut App, tick_rate: Duration) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let events = EventHandler::with_tick_rate(tick_rate.as_millis() as u64);
    while !app.should_quit() {
        terminal.draw(|frame| app.view(frame))?;
        let event = events.next()?;
        app.update(event, Instant::now());
    }
    Ok(())
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout()
        .execute(DisableMouseCapture)?
        .execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceOption;
    use crate::config::{ControlSpec, FormSpec, Settings};
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let mut fruit = ControlSpec::new("fruit");
        fruit.options = vec![
            SourceOption::new("Apple", "1"),
            SourceOption::new("Banana", "2"),
        ];
        let spec = FormSpec {
            title: None,
            controls: vec![fruit],
        };
        App::new(Form::mount(&spec, &Settings::default()), Theme::default())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn draw(app: &mut App) {
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|frame| app.view(frame)).unwrap();
    }

    #[test]
    fn test_submit_flushes_typed_text() {
        let mut app = app();
        let now = Instant::now();
        for c in "banana".chars() {
            app.update(key(KeyCode::Char(c)), now);
        }
        app.update(ctrl('s'), now);

        assert!(app.should_quit());
        assert_eq!(
            app.submitted(),
            Some(&vec![("fruit".to_string(), "2".to_string())])
        );
    }

    #[test]
    fn test_escape_closes_list_then_quits() {
        let mut app = app();
        let now = Instant::now();
        app.update(key(KeyCode::Char('a')), now);

        app.update(key(KeyCode::Esc), now);
        assert!(!app.should_quit());
        assert!(app.form().controls()[0].control.suggestions().is_none());

        app.update(key(KeyCode::Esc), now);
        assert!(app.should_quit());
        assert!(app.submitted().is_none());
    }

    #[test]
    fn test_ctrl_c_quits_without_submission() {
        let mut app = app();
        app.update(ctrl('c'), Instant::now());
        assert!(app.should_quit());
        assert!(app.take_submission().is_none());
    }

    #[test]
    fn test_click_on_suggestion_commits() {
        let mut app = app();
        let now = Instant::now();
        app.update(key(KeyCode::Char('n')), now);
        draw(&mut app);

        // Title row, field rows 1..4, overlay border at 4, first item at 5
        app.update(click(3, 5), now);
        assert_eq!(app.form().controls()[0].control.serialized_value(), "2");
        assert!(app.form().controls()[0].control.suggestions().is_none());
    }

    #[test]
    fn test_click_elsewhere_reconciles_on_tick() {
        let mut app = app();
        let now = Instant::now();
        for c in "xyz".chars() {
            app.update(key(KeyCode::Char(c)), now);
        }
        draw(&mut app);

        app.update(click(3, 10), now);
        assert_eq!(app.form().focused(), None);

        app.update(Event::Tick, now + Duration::from_secs(1));
        let input = app.form().controls()[0].control.input().unwrap();
        assert_eq!(input.value(), "");
    }
}
