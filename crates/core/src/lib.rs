//! Kaos EUY! Core - customization, pricing and order snapshot engine.
//!
//! This crate holds everything the storefront needs between "buyer opens a
//! product" and "order row is written":
//! - designing print positions and placing art within bounds
//! - deriving the per-unit customization fee
//! - composing size/color variants into cart lines
//! - freezing the design into the persisted order payload, and reading it
//!   back safely
//! - guest checkout and payment gateway signing
//!
//! # Architecture
//!
//! The crate performs no I/O. Image storage, order persistence, settings
//! and the payment transport are collaborators expressed as traits in
//! [`collaborators`]; the `cli` crate and tests supply implementations.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, catalog and status
//! - [`customization`] - Design state, placement, pricing and snapshots
//! - [`composer`] - Multi-variant batches for one product
//! - [`cart`] - Cart lines across products
//! - [`order`] - Outbound order requests and lenient stored records
//! - [`collaborators`] - Upload, order and settings contracts
//! - [`checkout`] - Guest order placement
//! - [`payment`] - Payment gateway signatures and callbacks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod collaborators;
pub mod composer;
pub mod customization;
pub mod order;
pub mod payment;
pub mod types;

pub use types::*;
