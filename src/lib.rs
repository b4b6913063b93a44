//! Sheetlink — a manifest-driven HTTP gateway for Google Sheets and Drive.
//!
//! The gateway exposes a fixed catalog of spreadsheet and drive operations
//! as named tools so an external agent (an LLM tool-caller) can discover
//! them via `/manifest` and invoke them via `/invoke` without embedding
//! native Google SDKs. Callers present their own OAuth bearer token per
//! request; the gateway forwards it verbatim to the Google REST APIs.
//!
//! There is no shared mutable state, cache, or background task: every
//! request builds its own credentials and clients, performs its work, and
//! returns. The one piece of real logic is the A1 range resolver in
//! [`google::range`], which turns human range references like
//! `'My Sheet'!A1:B2` into the numeric grid ranges that coordinate-based
//! operations require.

pub mod config;
pub mod error;
pub mod google;
pub mod oauth;
pub mod server;
pub mod tools;
