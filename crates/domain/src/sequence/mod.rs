//! The one sequence abstraction every listing and lookup runs on
//!
//! Store scans, filtered listings and the single-result rule all operate on
//! [`EntityStream`]. A stream is finite and consumed once; "restartable"
//! means each `list*`/lookup call re-issues the underlying scan and builds
//! a fresh stream.

mod entity_stream;
mod single;

pub use entity_stream::EntityStream;
pub use single::{single_match_or, single_or};
