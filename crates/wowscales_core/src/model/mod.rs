//! Verification domain model.
//!
//! # Responsibility
//! - `submission`: inbound payload shapes and required-section validation.
//! - `record`: stored rows and the composite read views built from them.
//!
//! # Invariants
//! - The verification row is the root; every child row references it.
//! - Records are create-once; there is no update or delete shape.

pub mod record;
pub mod submission;
