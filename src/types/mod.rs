// Bookmark board shared type definitions
// Each submodule defines types used across the engine.

pub mod board;
pub mod bookmark;
pub mod errors;
pub mod notice;
pub mod order;
pub mod settings;
