//! src/controller/actions.rs
//! ============================================================================
//! # Actions: Search Controller Commands
//!
//! Everything the controller can be asked to do, independent of whether the
//! request came from a key or the pointer.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Move keyboard focus into the search field.
    FocusSearch,

    /// Clear the query and results (overlay close).
    Close,

    /// Move selection down.
    MoveSelectionDown,

    /// Move selection up.
    MoveSelectionUp,

    /// Pointer over hit `i` (zero-based).
    HoverResult(usize),

    /// Open hit `i` (zero-based), via click or Enter.
    ActivateResult(usize),
}
