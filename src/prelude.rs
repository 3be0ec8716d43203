//! Fruteria prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartObserver, CartSnapshot, SubscriptionKey},
    catalog::{CatalogError, InMemoryCatalog, ProductCatalog},
    checkout::{
        Checkout, CheckoutError, ClearPolicy, OrderLine, OrderSummary, PaymentProvider,
        PaymentRedirect,
    },
    fixtures::{Fixture, FixtureError},
    items::{LineItem, NewLineItem},
    prices::{Price, PriceError, format_price, parse_price, pesos, store_currency},
    products::{Category, NewProduct, Product, ProductError, ProductId},
    roles::{AccessError, InMemoryRoleStore, Role, RoleStore, UserId, require_admin, toggle_admin},
};
