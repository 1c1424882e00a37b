pub mod config;
pub mod markup;
pub mod view;

// Launching
pub mod dispatch;
pub mod terminal;

// Dependency bootstrap
pub mod bootstrap;
