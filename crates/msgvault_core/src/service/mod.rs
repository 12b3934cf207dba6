//! Use-case services over repository contracts.
//!
//! # Responsibility
//! - Expose scheduling and sync entry points without SQL details.

pub mod scheduled_message_service;
