mod app;
mod theme;

pub use app::run_tui;
pub use theme::styles;
