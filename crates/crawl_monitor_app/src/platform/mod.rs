mod app;
mod cli;
mod logging;
mod persistence;
mod render;

pub use app::run_app;
