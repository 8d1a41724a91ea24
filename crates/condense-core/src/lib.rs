//! # condense-core
//!
//! Foundation types, errors, and utilities for condense.
//!
//! This crate provides the shared vocabulary that all other condense crates depend on:
//!
//! - **Messages**: [`Message`] (one conversation turn) and the extensible [`Role`]
//! - **Records**: line-delimited JSON validation into messages, with per-line errors
//! - **Errors**: [`RecordError`] for malformed records and rejected overrides
//! - **Logging**: `tracing` subscriber setup and a capture layer for tests

#![deny(unsafe_code)]

pub mod constants;
pub mod errors;
pub mod logging;
pub mod messages;
pub mod records;

pub use errors::{RecordError, RecordResult};
pub use messages::{Message, Role};
pub use records::{ParsedRecords, parse_jsonl, parse_record};
