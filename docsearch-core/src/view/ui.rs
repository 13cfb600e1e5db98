//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the search UI from an immutable
//! `SearchSnapshot` and remembers where each hit landed so pointer
//! events can be mapped back to result indices.

use std::time::{Duration, Instant};

use ratatui::{layout::Position, prelude::*};
use tracing::{instrument, trace};

use crate::{
    model::{input_line::InputLine, search_state::SearchSnapshot},
    view::components::search_overlay::SearchOverlay,
};

pub struct UIRenderer {
    overlay: SearchOverlay,
    /// (hit index, screen rect) from the last frame
    rows: Vec<(usize, Rect)>,
    stats: RenderStats,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl UIRenderer {
    pub fn new() -> Self {
        Self {
            overlay: SearchOverlay::new(),
            rows: Vec::new(),
            stats: RenderStats::default(),
        }
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, snap: &SearchSnapshot, input: &InputLine) {
        let start = Instant::now();
        self.rows.clear();

        let screen = f.area();
        let area = if snap.is_overlay {
            overlay_rect(screen)
        } else {
            screen
        };
        self.overlay.render(f, snap, input, area, &mut self.rows);

        let dur = start.elapsed();
        self.stats.total += dur;
        if dur.as_millis() > 16 {
            self.stats.slow += 1;
        }
        self.stats.frames += 1;
        trace!("frame {} drew {} rows", self.stats.frames, self.rows.len());
    }

    /// Hit index under a terminal cell, as of the last frame.
    #[must_use]
    pub fn hit_at(&self, column: u16, row: u16) -> Option<usize> {
        let cell = Position::new(column, row);
        self.rows
            .iter()
            .find(|(_, rect)| rect.contains(cell))
            .map(|(index, _)| *index)
    }

    #[must_use]
    pub const fn stats(&self) -> RenderStats {
        self.stats
    }
}

/// Centered box, 70% wide, from a quarter down to the bottom margin.
fn overlay_rect(screen: Rect) -> Rect {
    let width = (screen.width * 70 / 100).max(screen.width.min(40));
    let height = screen.height.saturating_sub(screen.height / 4 + 1).max(5).min(screen.height);
    Rect {
        x: screen.x + (screen.width - width) / 2,
        y: screen.y + (screen.height - height) / 2,
        width,
        height,
    }
}

impl RenderStats {
    pub fn fps(&self) -> f64 {
        if self.frames > 0 && !self.total.is_zero() {
            self.frames as f64 / self.total.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        result_store::{ResultSet, SearchHit},
        search_state::Focus,
    };
    use crate::view::components::search_overlay::ROW_HEIGHT;
    use ratatui::backend::TestBackend;

    fn snapshot(n: usize, active_index: usize) -> SearchSnapshot {
        let hits = (0..n)
            .map(|i| SearchHit {
                url: format!("/page/{i}"),
                breadcrumbs: "Guide".to_string(),
                heading: String::new(),
                title: format!("Page <mark>{i}</mark>"),
                content: String::new(),
            })
            .collect();
        SearchSnapshot {
            query: "page".into(),
            loading: false,
            results: ResultSet::from_hits(hits),
            active_index,
            focus: Focus::SearchField,
            is_overlay: false,
            href: None,
        }
    }

    #[test]
    fn test_rows_map_back_to_hits() {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut renderer = UIRenderer::new();
        let snap = snapshot(3, 1);
        let input = InputLine::default();

        terminal
            .draw(|f| renderer.render(f, &snap, &input))
            .unwrap();

        // input box is 3 rows, results border 1 row
        let first_row = 4;
        assert_eq!(renderer.hit_at(5, first_row), Some(0));
        assert_eq!(renderer.hit_at(5, first_row + ROW_HEIGHT), Some(1));
        assert_eq!(renderer.hit_at(5, 1), None);
        assert_eq!(renderer.stats().frames, 1);
    }

    #[test]
    fn test_overlay_rect_inside_screen() {
        let screen = Rect::new(0, 0, 100, 40);
        let r = overlay_rect(screen);
        assert!(r.x + r.width <= 100 && r.y + r.height <= 40);
        assert_eq!(r.width, 70);
    }
}
