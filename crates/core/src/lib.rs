//! Core business logic for Saldo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - transaction domain types and the daily balance aggregation engine
//! - `auth` - password hashing

pub mod auth;
pub mod ledger;
