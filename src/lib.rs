pub mod api;
pub mod catalog;
pub mod config;
pub mod output;
pub mod scoring;
pub mod search;
pub mod selection;
pub mod stderr_buffer;
pub mod submit;
pub mod telemetry;
pub mod tui;
