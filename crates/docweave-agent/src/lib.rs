//! # Docweave Agent
//!
//! Request surface and wiring for the document workflow agent: accepts a
//! `{command}` request, plans it (catalog first, generative fallback), and
//! executes the plan against remote tool endpoints.
//!
//! This crate does NOT host the HTTP server or the interactive loop; those
//! mount `CommandService` however they like.

mod client;
mod dto;
mod service;

pub use client::HttpToolClient;
pub use dto::{CommandRequest, CommandResponse};
pub use service::{build_service, BuildError, CommandService, ConfiguredCommandService};
