//! Cart synchronisation.
//!
//! The server owns the cart. Every mutation sends the target state and then
//! renders the totals and line subtotals from the response; no pricing is
//! computed here. Quantities below one become removals.

use crate::client::ShopClient;
use crate::error::{ClientError, ClientResult};
use crate::forms::parse_int_prefix;
use crate::host::{Host, Toast};
use crate::transport::ShopTransport;
use shop_api_types::{CartLine, CartResponse, CartSummary, ProductId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};

pub const REMOVE_TRANSITION_MS: u32 = 300;
pub const CLEAR_CART_PROMPT: &str = "Are you sure you want to clear your cart?";

pub trait CartView {
    /// Quantity currently shown in the line's input.
    fn quantity(&self, product_id: ProductId) -> Option<i64>;
    fn show_quantity(&self, product_id: ProductId, quantity: u32);
    fn render_line(&self, line: &CartLine);
    fn render_summary(&self, summary: &CartSummary);
    fn mark_removing(&self, product_id: ProductId, removing: bool);
    fn remove_line(&self, product_id: ProductId);
}

/// Header/sidebar cart counter shared by the cart and catalog pages.
pub trait CartBadge {
    fn set_count(&self, count: u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    Rendered,
    LineRemoved,
    Reloaded,
    Declined,
    Ignored,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingText {
    Free,
    Amount(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryText {
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub shipping: ShippingText,
}

pub fn summary_text(summary: &CartSummary) -> SummaryText {
    SummaryText {
        subtotal: summary.subtotal.to_string(),
        tax: summary.tax.to_string(),
        total: summary.total.to_string(),
        shipping: if summary.free_shipping {
            ShippingText::Free
        } else {
            ShippingText::Amount(summary.shipping.to_string())
        },
    }
}

pub struct CartSync<T> {
    client: ShopClient<T>,
    host: Rc<dyn Host>,
    view: Rc<dyn CartView>,
    badge: Rc<dyn CartBadge>,
    /// Last quantities the server confirmed, for rolling back the inputs.
    confirmed: RefCell<HashMap<ProductId, u32>>,
}

impl<T: ShopTransport> CartSync<T> {
    pub fn new(
        client: ShopClient<T>,
        host: Rc<dyn Host>,
        view: Rc<dyn CartView>,
        badge: Rc<dyn CartBadge>,
        lines: impl IntoIterator<Item = (ProductId, u32)>,
    ) -> Self {
        Self {
            client,
            host,
            view,
            badge,
            confirmed: RefCell::new(lines.into_iter().collect()),
        }
    }

    fn confirmed_quantity(&self, product_id: ProductId) -> Option<u32> {
        self.confirmed.borrow().get(&product_id).copied()
    }

    /// Minus / plus buttons.
    pub async fn step_quantity(&self, product_id: ProductId, delta: i64) -> CartOutcome {
        let current = self
            .view
            .quantity(product_id)
            .or_else(|| self.confirmed_quantity(product_id).map(i64::from));
        let Some(current) = current else {
            warn!(%product_id, "quantity step on a line with no known quantity");
            return CartOutcome::Ignored;
        };
        self.set_quantity(product_id, current.saturating_add(delta)).await
    }

    /// Quantity input `change` event.
    pub async fn set_quantity_input(&self, product_id: ProductId, raw: &str) -> CartOutcome {
        match parse_int_prefix(raw) {
            Some(requested) => self.set_quantity(product_id, requested).await,
            None => {
                self.rollback_quantity(product_id);
                self.host.notify(Toast::error("Please enter a valid quantity"));
                CartOutcome::Failed
            }
        }
    }

    /// Send the absolute target quantity; below one removes the line.
    pub async fn set_quantity(&self, product_id: ProductId, requested: i64) -> CartOutcome {
        if requested < 1 {
            debug!(%product_id, requested, "quantity below one, removing line");
            return self.remove_item(product_id).await;
        }

        let result = match u32::try_from(requested) {
            Ok(quantity) => self.client.update_cart(product_id, quantity).await,
            Err(_) => Err(ClientError::Validation("Quantity is too large".into())),
        };

        match result {
            Ok(resp) => {
                self.apply_snapshot(&resp);
                CartOutcome::Rendered
            }
            Err(err) => {
                warn!(%product_id, error = %err, "cart update failed");
                self.rollback_quantity(product_id);
                self.host.notify(Toast::error(err.user_message(
                    "Failed to update quantity",
                    "An error occurred while updating cart",
                )));
                CartOutcome::Failed
            }
        }
    }

    pub async fn remove_item(&self, product_id: ProductId) -> CartOutcome {
        self.view.mark_removing(product_id, true);

        let resp = match self.client.remove_from_cart(product_id).await {
            Ok(resp) => resp,
            Err(err) => {
                warn!(%product_id, error = %err, "cart remove failed");
                self.view.mark_removing(product_id, false);
                self.rollback_quantity(product_id);
                self.host.notify(Toast::error(
                    err.user_message("Failed to remove item", "An error occurred"),
                ));
                return CartOutcome::Failed;
            }
        };

        self.host.sleep(REMOVE_TRANSITION_MS).await;
        self.view.remove_line(product_id);
        self.confirmed.borrow_mut().remove(&product_id);

        // The empty cart page has a different layout; let the server render it.
        if resp.cart_count == 0 {
            self.host.reload();
            return CartOutcome::Reloaded;
        }
        self.apply_snapshot(&resp);
        CartOutcome::LineRemoved
    }

    pub async fn clear_cart(&self) -> CartOutcome {
        if !self.host.confirm(CLEAR_CART_PROMPT) {
            return CartOutcome::Declined;
        }
        match self.client.clear_cart().await {
            Ok(_) => {
                self.host.reload();
                CartOutcome::Reloaded
            }
            Err(err) => {
                warn!(error = %err, "cart clear failed");
                self.host.notify(Toast::error(
                    err.user_message("Failed to clear cart", "An error occurred"),
                ));
                CartOutcome::Failed
            }
        }
    }

    /// Render the server's cart state verbatim.
    pub fn apply_snapshot(&self, resp: &CartResponse) {
        self.badge.set_count(resp.cart_count);
        if let Some(summary) = resp.summary() {
            self.view.render_summary(&summary);
        }
        let mut confirmed = self.confirmed.borrow_mut();
        for line in &resp.items {
            confirmed.insert(line.product_id, line.quantity);
            self.view.render_line(line);
        }
    }

    fn rollback_quantity(&self, product_id: ProductId) {
        if let Some(quantity) = self.confirmed_quantity(product_id) {
            self.view.show_quantity(product_id, quantity);
        }
    }
}

/// Read the `(product, quantity)` pairs a server-rendered cart starts with.
/// A line whose product id does not parse is skipped so the rest of the
/// cart stays usable.
pub fn initial_lines<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<(ProductId, u32)> {
    pairs
        .into_iter()
        .filter_map(|(id, quantity)| {
            let product_id = match id.parse::<ProductId>() {
                Ok(product_id) => product_id,
                Err(err) => {
                    warn!(id, error = %err, "skipping cart line with unreadable product id");
                    return None;
                }
            };
            let quantity = parse_int_prefix(quantity)
                .and_then(|q| u32::try_from(q).ok())
                .unwrap_or(0);
            Some((product_id, quantity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeTransport, RecordingBadge, RecordingCartView, RecordingHost, config_with_all_endpoints,
    };
    use serde_json::json;
    use shop_api_types::Money;

    struct Fixture {
        transport: Rc<FakeTransport>,
        host: Rc<RecordingHost>,
        view: Rc<RecordingCartView>,
        badge: Rc<RecordingBadge>,
        cart: CartSync<Rc<FakeTransport>>,
    }

    fn fixture(lines: &[(i64, u32)]) -> Fixture {
        let transport = FakeTransport::new();
        let host = RecordingHost::new();
        let view = RecordingCartView::with_lines(lines);
        let badge = RecordingBadge::new();
        let cart = CartSync::new(
            ShopClient::new(transport.clone(), config_with_all_endpoints()),
            host.clone(),
            view.clone(),
            badge.clone(),
            lines.iter().map(|&(id, q)| (ProductId(id), q)),
        );
        Fixture {
            transport,
            host,
            view,
            badge,
            cart,
        }
    }

    #[tokio::test]
    async fn minus_sends_the_decremented_absolute_quantity() {
        let f = fixture(&[(5, 2)]);
        f.transport.respond(json!({
            "success": true, "cart_count": 1,
            "subtotal": 10.0, "tax": 0.8, "shipping": 5.0, "total": 15.8,
            "free_shipping": false,
            "items": [{"product_id": 5, "quantity": 1, "subtotal": 10.0}]
        }));

        assert_eq!(f.cart.step_quantity(ProductId(5), -1).await, CartOutcome::Rendered);

        let calls = f.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "/cart/update/");
        assert_eq!(calls[0].body, Some(json!({"product_id": 5, "quantity": 1})));

        assert_eq!(f.view.quantity(ProductId(5)), Some(1));
        assert_eq!(f.view.line_subtotal(ProductId(5)), Some(Money(10.0)));
        assert_eq!(f.badge.count(), Some(1));
    }

    #[tokio::test]
    async fn rendered_totals_are_exactly_the_server_values() {
        let f = fixture(&[(5, 1), (8, 1)]);
        f.transport.respond(json!({
            "success": true, "cart_count": 3,
            "subtotal": "33.33", "tax": 2.67, "shipping": 0, "total": 36.0,
            "free_shipping": true,
            "items": [{"product_id": 8, "quantity": 2, "subtotal": 22.22}]
        }));

        f.cart.set_quantity(ProductId(8), 2).await;

        let summary = f.view.summary().expect("summary rendered");
        assert_eq!(summary.subtotal, Money(33.33));
        assert_eq!(summary.tax, Money(2.67));
        assert_eq!(summary.total, Money(36.0));
        assert!(summary.free_shipping);
        assert_eq!(summary_text(&summary).shipping, ShippingText::Free);
    }

    #[tokio::test]
    async fn zero_from_the_input_issues_a_remove() {
        let f = fixture(&[(5, 2), (6, 1)]);
        f.transport.respond(json!({
            "success": true, "cart_count": 1,
            "subtotal": 4.0, "tax": 0.32, "shipping": 5.0, "total": 9.32, "items": []
        }));

        assert_eq!(
            f.cart.set_quantity_input(ProductId(5), "0").await,
            CartOutcome::LineRemoved
        );

        let calls = f.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "/cart/remove/");
        assert_eq!(calls[0].body, Some(json!({"product_id": 5})));
        assert!(f.view.is_removed(ProductId(5)));
        assert_eq!(f.host.sleeps(), vec![REMOVE_TRANSITION_MS]);
    }

    #[tokio::test]
    async fn negative_quantities_never_reach_the_update_endpoint() {
        let f = fixture(&[(5, 1)]);
        f.transport.respond(json!({"success": true, "cart_count": 0}));

        f.cart.set_quantity(ProductId(5), -3).await;

        assert!(f.transport.calls().iter().all(|c| c.url != "/cart/update/"));
    }

    #[tokio::test]
    async fn removing_the_last_line_reloads() {
        let f = fixture(&[(5, 1)]);
        f.transport.respond(json!({"success": true, "cart_count": 0}));

        assert_eq!(f.cart.step_quantity(ProductId(5), -1).await, CartOutcome::Reloaded);
        assert_eq!(f.host.reloads(), 1);
        assert!(f.view.summary().is_none());
    }

    #[tokio::test]
    async fn failed_remove_rolls_back_the_transition() {
        let f = fixture(&[(5, 1), (6, 1)]);
        f.transport
            .respond(json!({"success": false, "message": "Item is locked"}));

        assert_eq!(f.cart.remove_item(ProductId(5)).await, CartOutcome::Failed);

        assert!(!f.view.is_removing(ProductId(5)));
        assert!(!f.view.is_removed(ProductId(5)));
        assert_eq!(f.host.last_toast().map(|t| t.message), Some("Item is locked".into()));
    }

    #[tokio::test]
    async fn transport_failure_restores_the_confirmed_quantity() {
        let f = fixture(&[(5, 2)]);
        f.view.type_quantity(ProductId(5), 7);
        f.transport.fail(ClientError::Transport("offline".into()));

        assert_eq!(
            f.cart.set_quantity_input(ProductId(5), "7").await,
            CartOutcome::Failed
        );

        assert_eq!(f.view.quantity(ProductId(5)), Some(2));
        assert_eq!(
            f.host.last_toast().map(|t| t.message),
            Some("An error occurred while updating cart".into())
        );
    }

    #[tokio::test]
    async fn unparsable_input_sends_nothing() {
        let f = fixture(&[(5, 2)]);
        assert_eq!(
            f.cart.set_quantity_input(ProductId(5), "lots").await,
            CartOutcome::Failed
        );
        assert!(f.transport.calls().is_empty());
        assert_eq!(f.view.quantity(ProductId(5)), Some(2));
    }

    #[tokio::test]
    async fn clear_requires_confirmation() {
        let f = fixture(&[(5, 2)]);
        f.host.answer_confirm(false);
        assert_eq!(f.cart.clear_cart().await, CartOutcome::Declined);
        assert!(f.transport.calls().is_empty());
        assert_eq!(f.host.prompts(), vec![CLEAR_CART_PROMPT.to_owned()]);

        f.host.answer_confirm(true);
        f.transport.respond(json!({"success": true}));
        assert_eq!(f.cart.clear_cart().await, CartOutcome::Reloaded);
        assert_eq!(f.transport.calls()[0].url, "/cart/clear/");
        assert_eq!(f.host.reloads(), 1);
    }

    #[test]
    fn initial_lines_parse_dom_attributes() {
        let lines = initial_lines([("5", "2"), ("9", "x")]);
        assert_eq!(lines, vec![(ProductId(5), 2), (ProductId(9), 0)]);
    }

    #[test]
    fn unreadable_line_is_skipped_not_fatal() {
        let lines = initial_lines([("5", "2"), ("abc", "1"), ("7", "3")]);
        assert_eq!(lines, vec![(ProductId(5), 2), (ProductId(7), 3)]);
    }

    #[test]
    fn summary_text_formats_currency() {
        let text = summary_text(&CartSummary {
            subtotal: Money(20.0),
            tax: Money(1.6),
            shipping: Money(5.0),
            total: Money(26.6),
            free_shipping: false,
        });
        assert_eq!(text.subtotal, "$20.00");
        assert_eq!(text.tax, "$1.60");
        assert_eq!(text.total, "$26.60");
        assert_eq!(text.shipping, ShippingText::Amount("$5.00".into()));
    }
}
