//! Domain models for the shop service.
//!
//! [`product`] holds the durable catalog entity; [`order`] holds the
//! ephemeral views re-derived from the payment processor on every read.

pub mod order;
pub mod product;

pub use order::{
    BuyerContact, CustomerSummary, LineItemView, OrderDetail, OrderSummary, PostalAddress,
    ProductLine, ProductSnapshot, UNRESOLVED,
};
pub use product::{NewProduct, Product, ProductUpdate};
