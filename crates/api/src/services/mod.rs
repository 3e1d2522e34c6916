//! Business logic services.
//!
//! Services own transaction boundaries and the domain rules; repositories
//! under [`crate::db`] only move rows.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod inventory;
pub mod orders;
pub mod payment;
