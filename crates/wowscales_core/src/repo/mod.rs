//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the store seam (`VerificationRepository`) used by services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept validated `VerificationSubmission`s.
//! - A missing verification is `Ok(None)`, never an error.

pub mod memory_repo;
pub mod verification_repo;
