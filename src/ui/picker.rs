//! Rendering of picker fields and their suggestion overlay.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::hit::HitMap;
use super::theme::Theme;
use crate::engine::Tag;
use crate::focus::ActiveItemTracker;
use crate::input::TextInput;
use crate::mount::{Control, MountedControl, PressTarget};
use crate::suggestions::{SuggestionItem, SuggestionList};

/// Mark drawn after a tag's label; pressing it removes the tag.
pub const REMOVE_MARK: &str = "×";

/// Marker in front of suggestions that are already tags.
pub const SELECTED_MARKER: &str = "[+] ";

/// Render one mounted control into `area`.
pub fn render_control(
    frame: &mut Frame,
    area: Rect,
    index: usize,
    mounted: &MountedControl,
    focused: bool,
    theme: &Theme,
    hits: &mut HitMap,
) {
    let border = if focused {
        theme.border_focused
    } else {
        theme.border
    };
    let title = match mounted.control {
        Control::Plain(_) => format!(" {} (read-only) ", mounted.label),
        _ => format!(" {} ", mounted.label),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &mounted.control {
        Control::Single(engine) => {
            hits.push(area, PressTarget::Input(index));
            let offset = render_input(frame, inner, engine.input(), 0, theme);
            if focused {
                set_cursor(frame, inner, offset);
            }
        }
        Control::Multi(engine) => {
            hits.push(area, PressTarget::Input(index));
            let (line, chips_width) = chip_line(engine.tags(), theme);
            let marks = remove_mark_columns(engine.tags());
            frame.render_widget(Paragraph::new(line), inner);
            for (tag, column) in marks.into_iter().enumerate() {
                if column < inner.width {
                    hits.push(
                        Rect::new(inner.x + column, inner.y, 1, 1),
                        PressTarget::TagRemove(index, tag),
                    );
                }
            }
            let offset = render_input(frame, inner, engine.input(), chips_width, theme);
            if focused {
                set_cursor(frame, inner, offset);
            }
        }
        Control::Plain(field) => {
            let text = if field.values().is_empty() {
                "(none)".to_string()
            } else {
                field.values().join(", ")
            };
            frame.render_widget(
                Paragraph::new(text).style(Style::default().fg(theme.dim)),
                inner,
            );
        }
    }
}

/// Draw the query text (or its placeholder) starting `indent` columns into
/// `area`. Returns the cursor column.
fn render_input(
    frame: &mut Frame,
    area: Rect,
    input: &TextInput,
    indent: u16,
    theme: &Theme,
) -> u16 {
    if indent >= area.width {
        return indent;
    }
    let target = Rect::new(area.x + indent, area.y, area.width - indent, 1.min(area.height));
    let span = if input.is_empty() {
        Span::styled(
            input.placeholder().to_string(),
            Style::default()
                .fg(theme.placeholder)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(input.value().to_string(), Style::default().fg(theme.fg))
    };
    frame.render_widget(Paragraph::new(Line::from(span)), target);
    indent + Span::raw(input.before_cursor()).width() as u16
}

fn set_cursor(frame: &mut Frame, area: Rect, column: u16) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let x = area.x + column.min(area.width - 1);
    frame.set_cursor_position(Position::new(x, area.y));
}

/// Build the chips for `tags`, returning the line and its width.
pub fn chip_line(tags: &[Tag], theme: &Theme) -> (Line<'static>, u16) {
    let mut spans = Vec::new();
    for tag in tags {
        let style = theme.chip_style(tag.is_new);
        spans.push(Span::styled(format!(" {} ", tag.text), style));
        spans.push(Span::styled(
            format!("{} ", REMOVE_MARK),
            style.add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));
    }
    let line = Line::from(spans);
    let width = line.width() as u16;
    (line, width)
}

/// Column of each tag's remove mark, relative to the start of the line.
pub fn remove_mark_columns(tags: &[Tag]) -> Vec<u16> {
    let mut column = 0u16;
    tags.iter()
        .map(|tag| {
            let label = Span::raw(format!(" {} ", tag.text)).width() as u16;
            let mark = column.saturating_add(label);
            // label, mark and its padding, gap
            column = mark.saturating_add(3);
            mark
        })
        .collect()
}

/// Render the open suggestion list of control `index` next to `anchor`.
pub fn render_suggestions(
    frame: &mut Frame,
    anchor: Rect,
    index: usize,
    list: &SuggestionList,
    tracker: &ActiveItemTracker,
    theme: &Theme,
    hits: &mut HitMap,
) {
    let screen = frame.area();
    let rows = list.len().min(tracker.max_visible()).max(1) as u16;
    let wanted = rows + 2;

    let below = screen.bottom().saturating_sub(anchor.bottom());
    let above = anchor.y.saturating_sub(screen.y);
    let (y, height) = if below >= wanted || below >= above {
        (anchor.bottom(), wanted.min(below))
    } else {
        let height = wanted.min(above);
        (anchor.y - height, height)
    };
    if height < 3 {
        return;
    }
    let area = Rect::new(anchor.x, y, anchor.width, height);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    hits.push(area, PressTarget::Input(index));

    if list.is_empty() {
        frame.render_widget(
            Paragraph::new("No matches").style(Style::default().fg(theme.dim)),
            inner,
        );
        return;
    }

    let active_row = tracker.focus().and_then(|position| list.row_of(position));
    let query_len = list.query().len();
    let first = tracker.scroll_offset();
    let visible = inner.height as usize;

    let items: Vec<ListItem> = list
        .items()
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
        .map(|(row, item)| {
            let style = if active_row == Some(row) {
                theme.active_style()
            } else {
                Style::default()
            };
            ListItem::new(suggestion_line(item, query_len, theme)).style(style)
        })
        .collect();

    for (offset, row) in (first..list.len()).take(visible).enumerate() {
        hits.push(
            Rect::new(inner.x, inner.y + offset as u16, inner.width, 1),
            PressTarget::Item(index, row),
        );
    }

    frame.render_widget(List::new(items), inner);
}

/// One suggestion row with its match emphasized.
pub fn suggestion_line(item: &SuggestionItem, query_len: usize, theme: &Theme) -> Line<'static> {
    match item {
        SuggestionItem::CreateNew { text } => Line::from(Span::styled(
            format!("+ Create \"{}\"", text),
            Style::default().fg(theme.accent),
        )),
        SuggestionItem::Existing {
            already_selected, ..
        } => {
            let (before, matched, after) = item.highlight(query_len);
            let base = if *already_selected {
                Style::default().fg(theme.dim)
            } else {
                Style::default().fg(theme.fg)
            };
            let marker = if *already_selected {
                SELECTED_MARKER
            } else {
                "    "
            };
            Line::from(vec![
                Span::styled(marker, base),
                Span::styled(before.to_string(), base),
                Span::styled(matched.to_string(), theme.match_style()),
                Span::styled(after.to_string(), base),
            ])
        }
    }
}
