//! Rejoins two sequentially captured recording segments into one container.
//!
//! ```text
//! segment 1 ──► track high-water marks ──► rebase ──┐
//!                                                   ├──► output (header .. trailer)
//! segment 2 ──► overlap filter (marks) ──► rebase ──┘
//! ```
//!
//! The reconstruction core talks to containers only through the traits in
//! [`media`]; [`ffmpeg`] binds them to libav via `ffmpeg_bus`.

pub mod error;
pub mod ffmpeg;
pub mod high_water;
pub mod media;
pub mod overlap;
pub mod schema;
pub mod session;
pub mod timestamp;

#[cfg(test)]
mod memory;
