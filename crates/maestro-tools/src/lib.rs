//! Tool capability adapters and the dispatch layer that executes
//! model-issued tool calls against them.

pub mod adapter;
pub mod args;
pub mod dispatch;
pub mod local;
pub mod schema;

pub use adapter::*;
pub use args::*;
pub use dispatch::*;
pub use local::*;
pub use schema::*;
