//! Core types for the Maestro agent: conversation state, image retention,
//! wire-format translation, the model transport contract, and session
//! configuration.

pub mod config;
pub mod conversation;
pub mod error;
pub mod retention;
pub mod transport;
pub mod wire;

pub use config::*;
pub use conversation::*;
pub use error::*;
pub use transport::*;
pub use wire::*;
