//! BVS Types - Shared domain types
//!
//! This crate contains domain types used across BVS services:
//! - User identity and the public user projection
//! - Tenant clients and membership summaries
//! - Global roles

pub mod client;
pub mod role;
pub mod user;

pub use client::*;
pub use role::*;
pub use user::*;
