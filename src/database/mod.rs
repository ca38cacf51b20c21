//! Local database layer.
//!
//! Provides SQLite connection management and schema migrations for the
//! synchronous fallback storage area.
//!
//! # Usage
//!
//! ```no_run
//! use bookmark_board::database::Database;
//!
//! let db = Database::open("board.db").expect("failed to open database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
