//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route, currently the
//! trace identifier and request log line.

pub mod trace;

pub use trace::Trace;
