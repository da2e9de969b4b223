#![warn(missing_docs)]
//! Core types for warehouse gains analysis.
//!
//! A warehouse's ledger is a stream of transfer records ("exchanges") moving
//! commodities between storage locations. This crate defines the typed view of
//! those records, the report produced from them, the small filter language used
//! to query a record store, and the validator that turns untrusted rows into
//! [`models::Exchange`] values.
//!
//! Storage and computation live elsewhere: `gains-sqlite` implements
//! [`ports::RecordStore`] and `gains-engine` turns exchanges into a
//! [`models::GainReport`].

/// Domain models for exchanges and gain reports.
///
/// These are plain data structures. An [`models::Exchange`] can only be built
/// through validation, so every value in circulation satisfies its invariants.
pub mod models;

/// Interface traits between the domain and external record stores.
///
/// This module contains the "ports" in the hexagonal architecture pattern.
/// A store implements [`ports::RecordStore`]; the warehouse and exchange
/// repositories are layered on top of it for every implementation.
pub mod ports;

/// The filter language understood by every [`ports::RecordStore`].
pub mod filter;

/// Conversion of raw records into validated exchanges.
pub mod validate;
