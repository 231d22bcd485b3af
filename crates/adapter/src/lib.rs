//! Adapter module - remote play over a TCP socket with a JSON protocol
//!
//! Lets external agents (bots, test harnesses, a second screen) watch and
//! drive the game. The game loop stays the only owner of the game state; the
//! adapter only exchanges messages with it over channels.
//!
//! # Protocol Overview
//!
//! Line-delimited JSON over TCP (default `127.0.0.1:7788`):
//!
//! 1. **Handshake**: client sends `hello`, server answers `welcome`
//! 2. **Controller**: the first client to hello controls the board; others
//!    observe. `control` messages claim or release the slot
//! 3. **Observations**: sent after every change to clients that asked for them
//! 4. **Commands**: the controller sends `select` / `newGame` actions; an
//!    `ack` follows once the game loop has applied them
//!
//! # Example Protocol Flow
//!
//! ```text
//! -> {"type":"hello","seq":1,"ts":0,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0"}
//! <- {"type":"welcome","seq":1,"ts":...,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! <- {"type":"observation","seq":1,...,"phase":"idle","tiles":[{"id":0,"face_up":false,"matched":false},...]}
//! -> {"type":"command","seq":2,"ts":0,"actions":[{"action":"select","tile":5}]}
//! <- {"type":"ack","seq":2,"ts":...,"status":"ok"}
//! ```
//!
//! # Environment Variables
//!
//! - `PAIRS_AI_HOST`: bind address (default `127.0.0.1`)
//! - `PAIRS_AI_PORT`: port (default `7788`)
//! - `PAIRS_AI_MAX_PENDING`: command queue bound (default `10`)
//! - `PAIRS_AI_DISABLED`: `1` or `true` disables the adapter

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_pairs_core as core;
pub use tui_pairs_types as types;

pub use protocol::*;
pub use runtime::{Adapter, AdapterStatus, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{build_observation, run_server, ClientHandle, ServerConfig};
