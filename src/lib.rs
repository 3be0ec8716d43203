//! Fruteria
//!
//! Fruteria is the storefront core of a fresh-produce shop: a product
//! catalog, a shopping cart that publishes every change to its observers,
//! and a checkout that hands the order to a mobile-payment app.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod fixtures;
pub mod items;
pub mod observability;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod roles;
