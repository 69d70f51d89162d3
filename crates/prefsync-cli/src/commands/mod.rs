pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod list;
pub mod pending;
pub mod save;
pub mod search;
pub mod sync;
