//! IGNITE lobby server
//!
//! Session state for the battle-royale lobby (character/weapon selection,
//! scavenge phase, store) plus the match playback sequencer, exposed over an
//! Axum HTTP API.
//!
//! Key pieces:
//! - Session commands: every tab switch, selection, loot claim and purchase
//! - Scavenge gate: 12 supply drops, 5 claims max, battle unlocks at 3
//! - Match playback: one request to the narrator, events revealed on a fixed cadence
//! - Per-session locking: DashMap registry of `RwLock<SessionState>`

pub mod domain;
pub mod handlers;
pub mod playback;
pub mod server;
pub mod state;
pub mod utils;
