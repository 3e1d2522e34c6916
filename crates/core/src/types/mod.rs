//! Core types for Storekeeper.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod order_status;
pub mod role;

pub use email::{Email, EmailError};
pub use id::*;
pub use order_status::{InvalidOrderStatus, OrderStatus};
pub use role::Role;
