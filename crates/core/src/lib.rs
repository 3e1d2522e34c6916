//! Storekeeper Core - Shared domain types.
//!
//! This crate provides the types shared between the API service and any
//! future tooling:
//!
//! - Newtype IDs for every entity, so a `UserId` can never be passed where
//!   an `OrderId` is expected
//! - The [`OrderStatus`] state machine that governs the order lifecycle
//! - The [`Role`] enum carried in authentication claims
//! - A validated [`Email`] wrapper
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Database encode/decode support is behind the `postgres` feature.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
