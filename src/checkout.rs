//! Checkout
//!
//! Payment happens in an external mobile-payment app. The storefront only
//! builds the order summary, hands the shopper a deep link (with a web page as
//! fallback), and decides when the cart is emptied. The payment apps never
//! call back, so "confirmation" is an explicit action taken by the shopper.

use std::{fmt, num::NonZeroU32, time::Duration};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::{Cart, CartSnapshot},
    prices::{Price, format_amount, format_price},
};

/// How long to wait for the payment app before opening its web page.
pub const WEB_FALLBACK_DELAY: Duration = Duration::from_secs(1);

/// Errors that can occur during checkout.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// Checkout was started with nothing in the cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Confirmation was requested without a checkout in progress.
    #[error("no checkout is in progress")]
    NothingPending,
}

/// Mobile-payment apps the shop accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    /// Nequi
    Nequi,

    /// Daviplata
    Daviplata,
}

impl PaymentProvider {
    /// Name shown to shoppers.
    pub fn name(self) -> &'static str {
        match self {
            PaymentProvider::Nequi => "Nequi",
            PaymentProvider::Daviplata => "Daviplata",
        }
    }

    /// URL that opens the provider's app.
    pub fn deep_link(self) -> &'static str {
        match self {
            PaymentProvider::Nequi => "nequi://",
            PaymentProvider::Daviplata => "daviplata://",
        }
    }

    /// Web page opened when the app is not installed.
    pub fn web_url(self) -> &'static str {
        match self {
            PaymentProvider::Nequi => "https://www.nequi.com.co/",
            PaymentProvider::Daviplata => "https://www.daviplata.com/",
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// When checkout empties the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ClearPolicy {
    /// As soon as the shopper is sent to the payment app.
    OnInitiate,

    /// Once the shopper confirms the payment went through.
    #[default]
    OnConfirm,

    /// Never; the shopper clears the cart by hand.
    Never,
}

/// One line of an order summary.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Product name
    pub name: String,

    /// Units ordered
    pub quantity: NonZeroU32,

    /// Unit price multiplied by quantity
    pub line_total: Price,
}

/// Human-readable summary of what is being paid for.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    lines: SmallVec<[OrderLine; 8]>,
    total_item_count: u64,
    total: Price,
}

impl OrderSummary {
    /// Summarise a cart snapshot.
    pub fn from_snapshot(snapshot: &CartSnapshot) -> Self {
        Self {
            lines: snapshot
                .items()
                .iter()
                .map(|item| OrderLine {
                    name: item.name().to_string(),
                    quantity: item.quantity(),
                    line_total: item.line_total(),
                })
                .collect(),
            total_item_count: snapshot.total_item_count(),
            total: snapshot.total_price(),
        }
    }

    /// Summary lines, in cart order.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Units across all lines.
    pub fn total_item_count(&self) -> u64 {
        self.total_item_count
    }

    /// Amount to pay.
    pub fn total(&self) -> Price {
        self.total
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(
                f,
                "{} x{}  {}",
                line.name,
                line.quantity,
                format_amount(&line.line_total)
            )?;
        }

        write!(f, "Total: {}", format_price(&self.total))
    }
}

/// Where to send the shopper to pay.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRedirect {
    /// Chosen provider
    pub provider: PaymentProvider,

    /// URL that opens the provider's app
    pub deep_link: &'static str,

    /// Web page to open if the app does not respond
    pub web_fallback: &'static str,

    /// Delay before opening the web page
    pub fallback_after: Duration,

    /// What the shopper is paying for
    pub summary: OrderSummary,
}

#[derive(Debug, Clone)]
struct PendingCheckout {
    provider: PaymentProvider,
    summary: OrderSummary,
    paid: CartSnapshot,
}

/// Checkout flow for one session.
#[derive(Debug, Default)]
pub struct Checkout {
    policy: ClearPolicy,
    pending: Option<PendingCheckout>,
}

impl Checkout {
    /// Create a checkout flow with the given clearing policy.
    pub fn new(policy: ClearPolicy) -> Self {
        Self {
            policy,
            pending: None,
        }
    }

    /// The clearing policy in effect.
    pub fn policy(&self) -> ClearPolicy {
        self.policy
    }

    /// Provider of the checkout in progress, if any.
    pub fn pending_provider(&self) -> Option<PaymentProvider> {
        self.pending.as_ref().map(|pending| pending.provider)
    }

    /// Start paying for the cart's current contents.
    ///
    /// Starting again replaces any checkout already in progress.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no items.
    pub fn initiate(
        &mut self,
        cart: &mut Cart,
        provider: PaymentProvider,
    ) -> Result<PaymentRedirect, CheckoutError> {
        let snapshot = cart.snapshot();

        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let summary = OrderSummary::from_snapshot(&snapshot);

        info!(
            provider = provider.name(),
            items = summary.total_item_count(),
            total = %format_price(&summary.total()),
            "initiated checkout"
        );

        if self.policy == ClearPolicy::OnInitiate {
            cart.clear();
        }

        self.pending = Some(PendingCheckout {
            provider,
            summary: summary.clone(),
            paid: snapshot,
        });

        Ok(PaymentRedirect {
            provider,
            deep_link: provider.deep_link(),
            web_fallback: provider.web_url(),
            fallback_after: WEB_FALLBACK_DELAY,
            summary,
        })
    }

    /// Record that the shopper completed payment.
    ///
    /// Under [`ClearPolicy::OnConfirm`] only what was summarised at
    /// [`Checkout::initiate`] leaves the cart. Lines added or quantities
    /// raised since then stay behind.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NothingPending`] if no checkout is in progress.
    pub fn confirm(&mut self, cart: &mut Cart) -> Result<OrderSummary, CheckoutError> {
        let pending = self.pending.take().ok_or(CheckoutError::NothingPending)?;

        info!(
            provider = pending.provider.name(),
            total = %format_price(&pending.summary.total()),
            "confirmed checkout"
        );

        if self.policy == ClearPolicy::OnConfirm {
            settle(cart, &pending.paid);
        }

        Ok(pending.summary)
    }

    /// Abandon the checkout in progress, leaving the cart as it is.
    ///
    /// Returns `false` if nothing was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}

/// Take the paid quantities out of the cart.
fn settle(cart: &mut Cart, paid: &CartSnapshot) {
    if cart.snapshot() == *paid {
        cart.clear();
        return;
    }

    for line in paid.items() {
        let Some(current) = cart.get(line.id().as_str()).map(|item| item.quantity().get()) else {
            continue;
        };

        let remaining = i64::from(current) - i64::from(line.quantity().get());

        debug!(product = %line.id(), remaining, "settled paid cart item");

        cart.update_quantity(line.id().as_str(), remaining);
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{items::NewLineItem, prices::pesos, products::Category};

    use super::*;

    fn cart_with_strawberries() -> Result<Cart, crate::cart::CartError> {
        let mut cart = Cart::default();
        let strawberries = NewLineItem::new("a", "Strawberries", pesos(5_000), Category::Fruit);

        cart.add_item(strawberries.clone())?;
        cart.add_item(strawberries)?;
        cart.add_item(NewLineItem::new("b", "Lulo", pesos(3_500), Category::Fruit))?;

        Ok(cart)
    }

    #[test]
    fn providers_expose_links() {
        assert_eq!(PaymentProvider::Nequi.deep_link(), "nequi://");
        assert_eq!(PaymentProvider::Nequi.web_url(), "https://www.nequi.com.co/");
        assert_eq!(PaymentProvider::Daviplata.deep_link(), "daviplata://");
        assert_eq!(
            PaymentProvider::Daviplata.web_url(),
            "https://www.daviplata.com/"
        );
    }

    #[test]
    fn default_policy_clears_on_confirm() {
        assert_eq!(Checkout::default().policy(), ClearPolicy::OnConfirm);
    }

    #[test]
    fn summary_renders_lines_and_total() -> TestResult {
        let cart = cart_with_strawberries()?;
        let summary = OrderSummary::from_snapshot(&cart.snapshot());

        assert_eq!(summary.lines().len(), 2);
        assert_eq!(summary.total_item_count(), 3);
        assert_eq!(summary.total(), pesos(13_500));
        assert_eq!(
            summary.to_string(),
            "Strawberries x2  $10.000\nLulo x1  $3.500\nTotal: $13.500 COP"
        );

        Ok(())
    }

    #[test]
    fn initiate_rejects_empty_cart() {
        let mut cart = Cart::default();
        let mut checkout = Checkout::default();

        let result = checkout.initiate(&mut cart, PaymentProvider::Nequi);

        assert_eq!(result, Err(CheckoutError::EmptyCart));
        assert_eq!(checkout.pending_provider(), None);
    }

    #[test]
    fn initiate_returns_redirect_with_fallback() -> TestResult {
        let mut cart = cart_with_strawberries()?;
        let mut checkout = Checkout::default();

        let redirect = checkout.initiate(&mut cart, PaymentProvider::Daviplata)?;

        assert_eq!(redirect.deep_link, "daviplata://");
        assert_eq!(redirect.web_fallback, "https://www.daviplata.com/");
        assert_eq!(redirect.fallback_after, WEB_FALLBACK_DELAY);
        assert_eq!(redirect.summary.total(), pesos(13_500));
        assert_eq!(
            checkout.pending_provider(),
            Some(PaymentProvider::Daviplata)
        );

        Ok(())
    }

    #[test]
    fn on_confirm_policy_clears_only_after_confirmation() -> TestResult {
        let mut cart = cart_with_strawberries()?;
        let mut checkout = Checkout::new(ClearPolicy::OnConfirm);

        checkout.initiate(&mut cart, PaymentProvider::Nequi)?;

        assert_eq!(cart.total_item_count(), 3);

        let summary = checkout.confirm(&mut cart)?;

        assert!(cart.is_empty());
        assert_eq!(summary.total(), pesos(13_500));

        Ok(())
    }

    #[test]
    fn on_initiate_policy_clears_immediately() -> TestResult {
        let mut cart = cart_with_strawberries()?;
        let mut checkout = Checkout::new(ClearPolicy::OnInitiate);

        let redirect = checkout.initiate(&mut cart, PaymentProvider::Nequi)?;

        assert!(cart.is_empty());
        assert_eq!(redirect.summary.total_item_count(), 3);

        checkout.confirm(&mut cart)?;

        Ok(())
    }

    #[test]
    fn never_policy_keeps_the_cart() -> TestResult {
        let mut cart = cart_with_strawberries()?;
        let mut checkout = Checkout::new(ClearPolicy::Never);

        checkout.initiate(&mut cart, PaymentProvider::Nequi)?;
        checkout.confirm(&mut cart)?;

        assert_eq!(cart.total_item_count(), 3);

        Ok(())
    }

    #[test]
    fn confirm_without_initiate_fails() {
        let mut cart = Cart::default();
        let mut checkout = Checkout::default();

        assert_eq!(
            checkout.confirm(&mut cart),
            Err(CheckoutError::NothingPending)
        );
    }

    #[test]
    fn cancel_leaves_cart_untouched() -> TestResult {
        let mut cart = cart_with_strawberries()?;
        let mut checkout = Checkout::default();

        checkout.initiate(&mut cart, PaymentProvider::Nequi)?;

        assert!(checkout.cancel());
        assert!(!checkout.cancel());
        assert_eq!(cart.total_item_count(), 3);
        assert_eq!(
            checkout.confirm(&mut cart),
            Err(CheckoutError::NothingPending)
        );

        Ok(())
    }

    #[test]
    fn confirm_keeps_items_added_after_initiate() -> TestResult {
        let mut cart = Cart::default();
        let mut checkout = Checkout::default();

        cart.add_item(NewLineItem::new("a", "Fresas", pesos(5_000), Category::Fruit))?;

        checkout.initiate(&mut cart, PaymentProvider::Nequi)?;

        cart.add_item(NewLineItem::new("b", "Lulo", pesos(3_500), Category::Fruit))?;

        let summary = checkout.confirm(&mut cart)?;

        assert_eq!(summary.lines().len(), 1);
        assert_eq!(summary.total(), pesos(5_000));
        assert!(cart.get("a").is_none());
        assert_eq!(cart.get("b").map(|item| item.quantity().get()), Some(1));
        assert_eq!(cart.total_price(), pesos(3_500));

        Ok(())
    }

    #[test]
    fn confirm_keeps_quantity_raised_after_initiate() -> TestResult {
        let mut cart = cart_with_strawberries()?;
        let mut checkout = Checkout::default();

        checkout.initiate(&mut cart, PaymentProvider::Daviplata)?;

        cart.update_quantity("a", 5);
        cart.remove_item("b");

        checkout.confirm(&mut cart)?;

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get("a").map(|item| item.quantity().get()), Some(3));
        assert_eq!(cart.total_price(), pesos(15_000));

        Ok(())
    }

    #[test]
    fn confirm_removes_line_lowered_after_initiate() -> TestResult {
        let mut cart = cart_with_strawberries()?;
        let mut checkout = Checkout::default();

        checkout.initiate(&mut cart, PaymentProvider::Nequi)?;

        cart.decrement("a");

        checkout.confirm(&mut cart)?;

        assert!(cart.is_empty());

        Ok(())
    }
}
