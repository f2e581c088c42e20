//! # Route Modules
//!
//! Each module defines the handlers for one API surface area. The
//! router is assembled in the crate root.

pub mod health;
pub mod offers;
pub mod requests;
