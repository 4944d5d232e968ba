//! Terminal rendering of a mounted form.
//!
//! Rendering is a pure function of the form state. Each frame also yields a
//! [`HitMap`] so pointer presses can be routed back to what was drawn.

mod hit;
mod picker;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub use hit::HitMap;
pub use picker::{chip_line, remove_mark_columns, suggestion_line, REMOVE_MARK, SELECTED_MARKER};
pub use theme::Theme;

use crate::mount::Form;

/// Height of one field, borders included.
const FIELD_HEIGHT: u16 = 3;

/// Draw `form` over the whole frame.
pub fn render_form(frame: &mut Frame, form: &Form, theme: &Theme) -> HitMap {
    let mut hits = HitMap::new();
    let area = frame.area();

    let mut constraints = vec![Constraint::Length(1)];
    constraints.extend(form.controls().iter().map(|_| Constraint::Length(FIELD_HEIGHT)));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_title(frame, chunks[0], form.title().unwrap_or("tagpick"), theme);

    let fields = &chunks[1..1 + form.controls().len()];
    for (index, (mounted, field)) in form.controls().iter().zip(fields.iter()).enumerate() {
        picker::render_control(
            frame,
            *field,
            index,
            mounted,
            form.focused() == Some(index),
            theme,
            &mut hits,
        );
    }

    render_help(frame, chunks[chunks.len() - 1], theme);

    // The overlay goes last so it draws, and hit-tests, on top
    for (index, (mounted, field)) in form.controls().iter().zip(fields.iter()).enumerate() {
        if let (Some(list), Some(tracker)) =
            (mounted.control.suggestions(), mounted.control.tracker())
        {
            picker::render_suggestions(frame, *field, index, list, tracker, theme, &mut hits);
        }
    }

    hits
}

fn render_title(frame: &mut Frame, area: Rect, title: &str, theme: &Theme) {
    let line = Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn render_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let key = Style::default().fg(theme.accent);
    let help_text = Line::from(vec![
        Span::styled("↑/↓", key),
        Span::raw(": navigate  "),
        Span::styled("Enter", key),
        Span::raw(": pick  "),
        Span::styled("Tab", key),
        Span::raw(": next field  "),
        Span::styled("Ctrl+S", key),
        Span::raw(": submit  "),
        Span::styled("Esc", key),
        Span::raw(": close/quit"),
    ]);
    frame.render_widget(Paragraph::new(help_text).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceOption;
    use crate::config::{ControlSpec, FormSpec, Settings};
    use crate::events::Key;
    use crate::mount::PressTarget;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn form() -> Form {
        let mut fruit = ControlSpec::new("fruit");
        fruit.label = Some("Fruit".to_string());
        fruit.options = vec![
            SourceOption::new("Apple", "1"),
            SourceOption::new("Pineapple", "2"),
        ];
        let mut tags = fruit.clone();
        tags.name = "tags".to_string();
        tags.label = Some("Tags".to_string());
        tags.multiple = true;
        tags.allow_new = true;
        tags.options[0].selected = true;
        let spec = FormSpec {
            title: Some("Order".to_string()),
            controls: vec![fruit, tags],
        };
        Form::mount(&spec, &Settings::default())
    }

    fn draw(form: &Form) -> (String, HitMap) {
        let mut terminal = Terminal::new(TestBackend::new(40, 16)).unwrap();
        let mut hits = HitMap::new();
        terminal
            .draw(|frame| hits = render_form(frame, form, &Theme::default()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        let screen = buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        (screen, hits)
    }

    #[test]
    fn test_renders_labels_and_chips() {
        let (screen, hits) = draw(&form());
        assert!(screen.contains("Order"));
        assert!(screen.contains("Fruit"));
        assert!(screen.contains("Apple ×"));
        // Field rows start after the title line
        assert_eq!(hits.hit_test(2, 2), PressTarget::Input(0));
    }

    #[test]
    fn test_overlay_rows_are_hit_targets() {
        let mut form = form();
        let now = Instant::now();
        form.handle_key(Key::Char('a'), now);
        form.handle_key(Key::Char('p'), now);

        let (screen, hits) = draw(&form);
        assert!(screen.contains("Apple"));
        assert!(screen.contains("Pineapple"));

        // Fruit occupies rows 1..4, the overlay border row 4, items from 5
        assert_eq!(hits.hit_test(3, 5), PressTarget::Item(0, 0));
        assert_eq!(hits.hit_test(3, 6), PressTarget::Item(0, 1));
    }

    #[test]
    fn test_tag_remove_mark_is_hit_target() {
        let (screen, hits) = draw(&form());
        let row = screen.lines().nth(5).unwrap();
        let column = row.chars().position(|c| c == '×').unwrap() as u16;
        assert_eq!(hits.hit_test(column, 5), PressTarget::TagRemove(1, 0));
    }

    #[test]
    fn test_selected_suggestion_marked() {
        let mut form = form();
        let now = Instant::now();
        form.press(PressTarget::Input(1), now);
        form.handle_key(Key::Char('p'), now);

        let (screen, _) = draw(&form);
        assert!(screen.contains("[+] Apple"));
        assert!(screen.contains("+ Create \"p\""));
    }
}
