//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, resolver and grouping calls into use-case APIs.
//! - Keep the CLI decoupled from storage details.

pub mod report_service;
