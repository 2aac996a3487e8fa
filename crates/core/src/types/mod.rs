//! Core types for Kaos EUY!.
//!
//! Type-safe wrappers for the catalog, money, identifiers and order status.

pub mod catalog;
pub mod contact;
pub mod id;
pub mod price;
pub mod status;

pub use catalog::{Product, ProductColor, Size};
pub use contact::{ContactError, CustomerContact, Email};
pub use id::*;
pub use price::Price;
pub use status::*;
