//! askdb - A knowledge-base question-answering server for restaurant staff.
//!
//! Exposes the core modules for integration tests and the binary.

pub mod ask;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod llm;
pub mod logging;
pub mod state;
