//! Fruteria storefront demo
//!
//! Loads a catalog fixture, fills a cart with one product from every category
//! and walks it through checkout with the configured payment app.
//!
//! Run with: `cargo run -- --payment-provider daviplata`

use anyhow::{Result, anyhow};
use tracing::info;

use fruteria::{
    cart::{Cart, CartSnapshot},
    catalog::ProductCatalog,
    checkout::Checkout,
    config::StorefrontConfig,
    fixtures::Fixture,
    observability::init_subscriber,
    prices::{format_price, store_currency},
    products::Category,
};

/// Storefront demo entry point
#[expect(clippy::print_stdout, reason = "Demo output")]
pub fn main() -> Result<()> {
    let config = StorefrontConfig::load()?;

    init_subscriber(&config.logging)?;

    let catalog = Fixture::with_base_path(&config.catalog.fixtures)
        .load_catalog(&config.catalog.catalog)?;

    let mut cart = Cart::new(store_currency());

    cart.subscribe(|snapshot: &CartSnapshot| {
        info!(
            lines = snapshot.items().len(),
            items = snapshot.total_item_count(),
            total = %format_price(&snapshot.total_price()),
            "cart changed"
        );
    });

    for category in Category::ALL {
        let products = catalog.list_products(category)?;
        let product = products
            .first()
            .ok_or(anyhow!("no products listed under {}", category.label()))?;

        cart.add_item(product.to_line_item()?)?;

        println!("+ {} ({})", product.name, product.price);
    }

    // Double up on the first line
    let first = cart
        .iter()
        .next()
        .map(|item| item.id().clone())
        .ok_or(anyhow!("cart is empty"))?;

    cart.increment(first.as_str());

    println!(
        "\nCart: {} items, {}",
        cart.total_item_count(),
        format_price(&cart.total_price())
    );

    let mut checkout = Checkout::new(config.checkout.checkout_clear_policy);
    let redirect = checkout.initiate(&mut cart, config.checkout.payment_provider)?;

    println!(
        "\nPaying with {}: opening {} (web fallback {} after {:?})",
        redirect.provider, redirect.deep_link, redirect.web_fallback, redirect.fallback_after
    );

    let summary = checkout.confirm(&mut cart)?;

    println!("\n{summary}");
    println!("\nItems left in cart: {}", cart.total_item_count());

    Ok(())
}
