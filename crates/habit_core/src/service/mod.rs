//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep callers (CLI, web handlers) decoupled from storage details.

pub mod completion_service;
pub mod task_service;
