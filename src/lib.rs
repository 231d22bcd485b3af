//! TUI Pairs (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_pairs::{core,adapter,term,input,engine,types}`
//! and holds the start-up configuration shared by the binary and the tests.

pub mod config;

pub use tui_pairs_adapter as adapter;
pub use tui_pairs_core as core;
pub use tui_pairs_engine as engine;
pub use tui_pairs_input as input;
pub use tui_pairs_term as term;
pub use tui_pairs_types as types;

pub use config::AppConfig;
