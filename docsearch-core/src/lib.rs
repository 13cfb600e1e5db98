pub mod error;

pub mod config;

pub mod analytics;
pub use analytics::{AnalyticsEmitter, AnalyticsEvent, AnalyticsSink};

pub mod controller {
    pub mod actions;
    pub use actions::Action;

    pub mod dispatcher;

    pub mod event_loop;
    pub use event_loop::{ControllerParts, SearchController};

    pub mod keyboard_router;

    pub mod navigation;
}

pub mod model {
    pub mod input_line;

    pub mod query_state;

    pub mod result_store;
    pub use result_store::{ResultSet, SearchHit};

    pub mod search_state;
    pub use search_state::{Focus, SearchSnapshot, SearchState};

    pub mod selection;
}

pub mod tasks {
    pub mod search_task;
}

pub mod util {
    pub mod debounce;

    pub mod location;
}

pub mod view {
    pub mod markup;

    pub mod theme;

    pub mod ui;

    pub mod components {
        pub mod search_overlay;
        pub use search_overlay::SearchOverlay;
    }
}

pub mod logging;
pub use logging::Logger;

pub use error::AppError;
