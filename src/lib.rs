//! logvisor: turns pasted, mixed-format log text into structured entries.
//!
//! ```text
//! raw text ──► multiline ──► parser ──► extract / timestamp ──► Vec<LogEntry>
//! ```
//!
//! [`pipeline::Pipeline`] is the entry point. `filter`, `export` and
//! `display` consume its output.

pub mod config;
pub mod display;
pub mod export;
pub mod extract;
pub mod filter;
pub mod multiline;
pub mod parser;
pub mod pipeline;
pub mod sample;
pub mod source;
pub mod timestamp;

pub use parser::{LogEntry, LogFormat, LogLevel};
pub use pipeline::{ParseError, Pipeline, parse_logs};
