// docsearch-core/src/controller/keyboard_router.rs
// Global key listener for the search controller

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, trace};

use crate::controller::actions::Action;
use crate::model::search_state::RouterView;

/// Routing decision for one key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutcome {
    pub action: Option<Action>,
    /// Suppress the key's default effect (scrolling, character insertion).
    pub prevent_default: bool,
}

impl KeyOutcome {
    #[must_use]
    pub const fn ignored() -> Self {
        Self {
            action: None,
            prevent_default: false,
        }
    }

    #[must_use]
    pub const fn handled(action: Action) -> Self {
        Self {
            action: Some(action),
            prevent_default: false,
        }
    }

    #[must_use]
    pub const fn prevent_default(mut self) -> Self {
        self.prevent_default = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    FocusSearch,
    Close,
    SelectNext,
    SelectPrev,
    ActivateSelected,
}

/// Maps keys to actions against the *current* state view.
///
/// Holds no copy of controller state; every call receives a fresh
/// `RouterView`, so a handler can never act on an outdated snapshot.
pub struct KeyboardRouter {
    bindings: HashMap<KeyEvent, Binding>,
    unhandled_count: u64,
}

impl Default for KeyboardRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardRouter {
    pub fn new() -> Self {
        let mut bindings = HashMap::with_capacity(5);

        bindings.insert(key('/'), Binding::FocusSearch);
        bindings.insert(plain(KeyCode::Esc), Binding::Close);
        bindings.insert(plain(KeyCode::Down), Binding::SelectNext);
        bindings.insert(plain(KeyCode::Up), Binding::SelectPrev);
        bindings.insert(plain(KeyCode::Enter), Binding::ActivateSelected);

        Self {
            bindings,
            unhandled_count: 0,
        }
    }

    pub fn route(&mut self, key_event: KeyEvent, view: RouterView) -> KeyOutcome {
        if key_event.kind == KeyEventKind::Release {
            return KeyOutcome::ignored();
        }

        let Some(binding) = self.bindings.get(&normalize(key_event)).copied() else {
            self.unhandled_count += 1;
            trace!("KeyboardRouter: unbound key {:?}", key_event.code);
            return KeyOutcome::ignored();
        };

        trace!("KeyboardRouter: {:?} -> {:?} with {:?}", key_event.code, binding, view);

        match binding {
            Binding::FocusSearch => {
                if view.focus.holds_text_input() {
                    // typed as a literal character
                    KeyOutcome::ignored()
                } else {
                    debug!("KeyboardRouter: focusing search field");
                    KeyOutcome::handled(Action::FocusSearch).prevent_default()
                }
            }
            Binding::Close => KeyOutcome::handled(Action::Close),
            // default suppression follows the selection transition
            Binding::SelectNext => KeyOutcome::handled(Action::MoveSelectionDown),
            Binding::SelectPrev => KeyOutcome::handled(Action::MoveSelectionUp),
            Binding::ActivateSelected => match view.active_index.checked_sub(1) {
                Some(index) if view.has_hits => KeyOutcome::handled(Action::ActivateResult(index)),
                _ => KeyOutcome::ignored(),
            },
        }
    }

    #[must_use]
    pub const fn unhandled_count(&self) -> u64 {
        self.unhandled_count
    }
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn plain(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Strip kind/state and the shift a layout may need to produce a char.
fn normalize(key_event: KeyEvent) -> KeyEvent {
    let modifiers = match key_event.code {
        KeyCode::Char(_) => key_event.modifiers.difference(KeyModifiers::SHIFT),
        _ => key_event.modifiers,
    };
    KeyEvent::new(key_event.code, modifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::search_state::Focus;

    fn view(focus: Focus, has_hits: bool, active_index: usize) -> RouterView {
        RouterView {
            focus,
            has_hits,
            active_index,
        }
    }

    #[test]
    fn test_slash_focuses_only_outside_text_inputs() {
        let mut router = KeyboardRouter::new();

        let outside = router.route(key('/'), view(Focus::Elsewhere, false, 0));
        assert_eq!(outside, KeyOutcome::handled(Action::FocusSearch).prevent_default());

        assert_eq!(
            router.route(key('/'), view(Focus::SearchField, false, 0)),
            KeyOutcome::ignored()
        );

        let shifted = KeyEvent::new(KeyCode::Char('/'), KeyModifiers::SHIFT);
        assert!(router.route(shifted, view(Focus::Elsewhere, false, 0)).prevent_default);
    }

    #[test]
    fn test_arrows_map_to_selection_moves() {
        let mut router = KeyboardRouter::new();

        let down = router.route(plain(KeyCode::Down), view(Focus::SearchField, true, 3));
        assert_eq!(down, KeyOutcome::handled(Action::MoveSelectionDown));

        let up = router.route(plain(KeyCode::Up), view(Focus::Elsewhere, false, 0));
        assert_eq!(up, KeyOutcome::handled(Action::MoveSelectionUp));
    }

    #[test]
    fn test_enter_needs_active_row() {
        let mut router = KeyboardRouter::new();

        let on_input = router.route(plain(KeyCode::Enter), view(Focus::SearchField, true, 0));
        assert_eq!(on_input, KeyOutcome::ignored());

        let on_row = router.route(plain(KeyCode::Enter), view(Focus::SearchField, true, 2));
        assert_eq!(on_row, KeyOutcome::handled(Action::ActivateResult(1)));

        let no_hits = router.route(plain(KeyCode::Enter), view(Focus::SearchField, false, 1));
        assert_eq!(no_hits, KeyOutcome::ignored());
    }

    #[test]
    fn test_escape_closes_and_release_is_ignored() {
        let mut router = KeyboardRouter::new();
        assert_eq!(
            router.route(plain(KeyCode::Esc), view(Focus::Elsewhere, false, 0)),
            KeyOutcome::handled(Action::Close)
        );

        let mut release = plain(KeyCode::Esc);
        release.kind = KeyEventKind::Release;
        assert_eq!(router.route(release, view(Focus::Elsewhere, false, 0)), KeyOutcome::ignored());

        router.route(key('x'), view(Focus::Elsewhere, false, 0));
        assert_eq!(router.unhandled_count(), 1);
    }
}
