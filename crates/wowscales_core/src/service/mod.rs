//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, timestamps and repository calls.
//! - Translate repository outcomes into the verification error taxonomy.

pub mod verification_service;
