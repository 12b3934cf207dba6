//! Record model: schema contract, hydration and field encryption.
//!
//! # Responsibility
//! - Define the `RecordDefinition` contract every encrypted table follows.
//! - Define the external seams (`RowAccessor`, `FieldCipher`) the model uses.
//! - Hold concrete record types and their remote wire bodies.
//!
//! # Invariants
//! - Records are plain owned values; mutation happens only through `&mut self`.
//! - Model code performs no I/O of its own.

pub mod cipher;
pub mod record;
pub mod remote;
pub mod row;
pub mod scheduled_message;
