//! Business logic: checkout initiation and order projection.

pub mod checkout;
pub mod orders;
