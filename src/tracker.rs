//! Tracker protocol
//!
//! This module implements tracker selection with failover, the line protocol
//! codec, and the one-request-per-connection dispatcher.

mod blacklist;
mod codec;
mod dispatcher;
mod pool;

pub use blacklist::Blacklist;
pub use codec::{decode_reply, parse_query, Command, Request, Values};
pub use dispatcher::Dispatcher;
pub use pool::TrackerPool;
