//! Core types for Loomline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{IdError, ProductId};
pub use price::{Price, PriceError};
