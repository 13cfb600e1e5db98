//! Search field plus live result list, drawn from an immutable snapshot.

use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    model::{
        input_line::InputLine,
        result_store::{ResultSet, SearchHit},
        search_state::{Focus, SearchSnapshot},
    },
    view::{markup, theme},
};

/// Terminal rows per hit: breadcrumbs, title, content.
pub const ROW_HEIGHT: u16 = 3;

pub struct SearchOverlay;

impl Default for SearchOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOverlay {
    pub fn new() -> Self {
        Self
    }

    /// Draw into `area`; the screen rect of every visible hit is pushed to `rows`.
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        snap: &SearchSnapshot,
        input: &InputLine,
        area: Rect,
        rows: &mut Vec<(usize, Rect)>,
    ) {
        if snap.is_overlay {
            frame.render_widget(Clear, area);
        }

        let [input_area, results_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        self.render_input_field(frame, snap, input, input_area);

        match &snap.results {
            ResultSet::NoQuery => self.render_hints(frame, results_area),
            ResultSet::Empty => self.render_no_results(frame, snap, results_area),
            ResultSet::Hits(hits) => {
                self.render_hits(frame, hits, snap.active_index, results_area, rows);
            }
        }
    }

    fn render_input_field(
        &self,
        frame: &mut Frame<'_>,
        snap: &SearchSnapshot,
        input: &InputLine,
        area: Rect,
    ) {
        let focused = snap.focus == Focus::SearchField;
        let title = if snap.loading {
            " Search docs · searching… "
        } else {
            " Search docs "
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(theme::input_border_style(focused))
            .style(theme::panel_style());
        if focused && snap.active_index == 0 {
            block = block.title_bottom(Line::from(" ↑↓ select · Enter open · Esc clear ").right_aligned());
        }

        let text = if input.as_str().is_empty() && !focused {
            Line::from(Span::styled("Press / to search", theme::hint_style()))
        } else {
            Line::from(input.as_str().to_string())
        };
        frame.render_widget(Paragraph::new(text).block(block), area);

        if focused {
            let column = u16::try_from(input.cursor_column()).unwrap_or(u16::MAX);
            let x = area
                .x
                .saturating_add(1)
                .saturating_add(column)
                .min(area.right().saturating_sub(2));
            frame.set_cursor_position(Position::new(x, area.y + 1));
        }
    }

    fn render_hits(
        &self,
        frame: &mut Frame<'_>,
        hits: &[SearchHit],
        active_index: usize,
        area: Rect,
        rows: &mut Vec<(usize, Rect)>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} results ", hits.len()))
            .border_style(theme::results_border_style())
            .style(theme::panel_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let capacity = usize::from(inner.height / ROW_HEIGHT);
        if capacity == 0 {
            return;
        }
        let offset = scroll_offset(active_index, capacity);

        for (slot, (index, hit)) in hits.iter().enumerate().skip(offset).take(capacity).enumerate() {
            let rect = Rect {
                x: inner.x,
                y: inner.y + slot as u16 * ROW_HEIGHT,
                width: inner.width,
                height: ROW_HEIGHT,
            };
            let active = active_index == index + 1;
            frame.render_widget(hit_paragraph(hit, active), rect);
            rows.push((index, rect));
        }
    }

    fn render_no_results(&self, frame: &mut Frame<'_>, snap: &SearchSnapshot, area: Rect) {
        if area.height < 3 {
            return;
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::results_border_style())
            .style(theme::panel_style());
        let text = Line::from(vec![
            Span::raw("No results for "),
            Span::styled(format!("\"{}\"", snap.query), theme::highlight_style()),
        ]);
        frame.render_widget(Paragraph::new(text).block(block), area);
    }

    fn render_hints(&self, frame: &mut Frame<'_>, area: Rect) {
        if area.height < 3 {
            return;
        }

        let lines = vec![
            Line::from("Start typing to search the documentation..."),
            Line::from(""),
            Line::from("• / focuses the search field"),
            Line::from("• ↑/↓ move through results, Enter opens the selected one"),
            Line::from("• Esc clears the search, Ctrl+C quits"),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::hint_style())
            .style(theme::panel_style());
        frame.render_widget(
            Paragraph::new(lines).block(block).style(theme::hint_style()),
            area,
        );
    }
}

/// First hit index to draw so that the active row stays visible.
fn scroll_offset(active_index: usize, capacity: usize) -> usize {
    match active_index.checked_sub(1) {
        Some(row) if row >= capacity => row + 1 - capacity,
        _ => 0,
    }
}

fn hit_paragraph(hit: &SearchHit, active: bool) -> Paragraph<'static> {
    let base = if active {
        theme::active_row_style()
    } else {
        theme::panel_style()
    };

    let mut title = markup::to_spans(&hit.title, theme::title_style(), theme::highlight_style());
    if !hit.heading.is_empty() {
        title.push(Span::styled(" › ", theme::breadcrumb_style()));
        title.extend(markup::to_spans(
            &hit.heading,
            theme::title_style(),
            theme::highlight_style(),
        ));
    }

    let lines = vec![
        Line::from(Span::styled(
            markup::plain_text(&hit.breadcrumbs),
            theme::breadcrumb_style(),
        )),
        Line::from(title),
        Line::from(markup::to_spans(
            &hit.content,
            theme::hint_style(),
            theme::highlight_style(),
        )),
    ];

    Paragraph::new(lines).style(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_keeps_active_visible() {
        assert_eq!(scroll_offset(0, 4), 0);
        assert_eq!(scroll_offset(4, 4), 0);
        assert_eq!(scroll_offset(5, 4), 1);
        assert_eq!(scroll_offset(9, 4), 5);
    }
}
