//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It avoids widget
//! toolkits and renders into a plain framebuffer that is diffed and flushed to
//! the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Precise control over tile size and placement (for mouse hit-testing)
//! - Redraw only what changed

pub mod fb;
pub mod game_view;
pub mod render_throttle;
pub mod renderer;

pub use tui_pairs_core as core;
pub use tui_pairs_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{palette_rgb, AdapterStatusView, AnchorY, BoardLayout, GameView, Viewport};
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
