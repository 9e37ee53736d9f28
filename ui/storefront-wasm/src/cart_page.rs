//! Cart page: quantity controls, removal, clear, and the checkout dialog.

use crate::events::{listen, listen_async};
use crate::modal::DomModal;
use crate::shell::DomButton;
use crate::{PageContext, Transport, dom};
use shop_client_core::cart::{CartBadge, CartSync, CartView, ShippingText, initial_lines, summary_text};
use shop_client_core::checkout::{CheckoutForm, CheckoutSubmitter};
use shop_client_core::forms::parse_int_prefix;
use shop_client_core::types::{CartLine, CartSummary, ProductId};
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlFormElement, HtmlInputElement};

/// Header and sidebar cart counters.
pub struct DomCartBadge;

/// Global badge updater from the base template.
const BADGE_FN: &str = "updateCartBadge";

impl CartBadge for DomCartBadge {
    fn set_count(&self, count: u32) {
        let global = js_sys::Reflect::get(&dom::window(), &JsValue::from_str(BADGE_FN))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
        match global {
            Some(func) => {
                if let Err(err) = func.call1(&JsValue::NULL, &JsValue::from(count)) {
                    warn!(error = ?err, "updateCartBadge failed");
                }
            }
            None => {
                for badge in dom::query_all(".cart-badge") {
                    dom::set_text(&badge, &count.to_string());
                    dom::show(&badge, count > 0, "flex");
                }
            }
        }
    }
}

struct DomCartView;

impl DomCartView {
    fn input(&self, product_id: ProductId) -> Option<HtmlInputElement> {
        dom::query(&format!(r#".quantity-input[data-product-id="{product_id}"]"#))?
            .dyn_into()
            .ok()
    }

    fn line(&self, product_id: ProductId) -> Option<Element> {
        dom::query(&format!(r#".cart-item[data-product-id="{product_id}"]"#))
    }
}

impl CartView for DomCartView {
    fn quantity(&self, product_id: ProductId) -> Option<i64> {
        parse_int_prefix(&self.input(product_id)?.value())
    }

    fn show_quantity(&self, product_id: ProductId, quantity: u32) {
        if let Some(input) = self.input(product_id) {
            input.set_value(&quantity.to_string());
        }
    }

    fn render_line(&self, line: &CartLine) {
        let Some(input) = self.input(line.product_id) else {
            return;
        };
        input.set_value(&line.quantity.to_string());
        let subtotal_el = dom::closest(&input, ".cart-item")
            .and_then(|item| dom::query_within(&item, ".item-subtotal"));
        if let (Some(el), Some(subtotal)) = (subtotal_el, line.subtotal) {
            dom::set_text(&el, &subtotal.plain());
        }
    }

    fn render_summary(&self, summary: &CartSummary) {
        let text = summary_text(summary);
        dom::set_text_by_id("cart-subtotal", &text.subtotal);
        dom::set_text_by_id("cart-tax", &text.tax);
        dom::set_text_by_id("cart-total", &text.total);
        if let Some(shipping) = dom::by_id("cart-shipping") {
            match text.shipping {
                ShippingText::Free => {
                    shipping.set_inner_html(r#"<span class="free-shipping">FREE</span>"#)
                }
                ShippingText::Amount(amount) => dom::set_text(&shipping, &amount),
            }
        }
    }

    fn mark_removing(&self, product_id: ProductId, removing: bool) {
        if let Some(line) = self.line(product_id) {
            dom::toggle_class(&line, "removing", removing);
        }
    }

    fn remove_line(&self, product_id: ProductId) {
        if let Some(line) = self.line(product_id) {
            line.remove();
        }
    }
}

struct DomCheckoutForm {
    form: HtmlFormElement,
}

impl CheckoutForm for DomCheckoutForm {
    fn check_validity(&self) -> bool {
        self.form.check_validity()
    }

    fn report_validity(&self) {
        self.form.report_validity();
    }

    fn payment_label(&self) -> Option<String> {
        let selected = dom::query_within(&self.form, r#"input[name="payment_method"]:checked"#)?;
        let label = selected.next_element_sibling()?;
        dom::query_within(&label, "span").map(|span| dom::text(&span))
    }

    fn fields(&self) -> Vec<(String, String)> {
        dom::form_fields(&self.form)
    }
}

pub fn mount(ctx: &PageContext) -> Result<(), JsValue> {
    mount_cart(ctx);
    mount_checkout(ctx)
}

fn mount_cart(ctx: &PageContext) {
    let inputs = dom::query_all(".quantity-input[data-product-id]");
    if inputs.is_empty() {
        return;
    }

    let pairs: Vec<(String, String)> = inputs
        .iter()
        .filter_map(|el| {
            let input = el.dyn_ref::<HtmlInputElement>()?;
            Some((dom::data(el, "product-id")?, input.value()))
        })
        .collect();
    let lines = initial_lines(pairs.iter().map(|(id, q)| (id.as_str(), q.as_str())));
    debug!(lines = lines.len(), "cart page bound");

    let sync: Rc<CartSync<Transport>> = Rc::new(CartSync::new(
        ctx.client.clone(),
        ctx.host.clone(),
        Rc::new(DomCartView),
        Rc::new(DomCartBadge),
        lines,
    ));

    for (selector, delta) in [(".quantity-btn.minus", -1), (".quantity-btn.plus", 1)] {
        for btn in dom::query_all(selector) {
            let Some(product_id) = dom::data_parsed::<ProductId>(&btn, "product-id") else {
                continue;
            };
            let sync = sync.clone();
            listen_async(&btn, "click", move |_| {
                let sync = sync.clone();
                async move {
                    sync.step_quantity(product_id, delta).await;
                }
            });
        }
    }

    for el in inputs {
        let Some(product_id) = dom::data_parsed::<ProductId>(&el, "product-id") else {
            continue;
        };
        let Ok(input) = el.dyn_into::<HtmlInputElement>() else {
            continue;
        };
        let sync = sync.clone();
        let target = input.clone();
        listen_async(&input, "change", move |_| {
            let (sync, raw) = (sync.clone(), target.value());
            async move {
                sync.set_quantity_input(product_id, &raw).await;
            }
        });
    }

    for btn in dom::query_all(".cart-item-remove") {
        let Some(product_id) = dom::data_parsed::<ProductId>(&btn, "product-id") else {
            continue;
        };
        let sync = sync.clone();
        listen_async(&btn, "click", move |_| {
            let sync = sync.clone();
            async move {
                sync.remove_item(product_id).await;
            }
        });
    }

    if let Some(clear) = dom::by_id("clear-cart-btn") {
        listen_async(&clear, "click", move |_| {
            let sync = sync.clone();
            async move {
                sync.clear_cart().await;
            }
        });
    }
}

fn mount_checkout(ctx: &PageContext) -> Result<(), JsValue> {
    let Some(place_order) = dom::by_id("place-order-btn") else {
        return Ok(());
    };
    let form = DomCheckoutForm {
        form: dom::require::<HtmlFormElement>("checkout-form")?,
    };
    let confirm_button = dom::require::<web_sys::HtmlButtonElement>("confirm-order-btn")?;
    let modal = Rc::new(DomModal::by_id("confirm-order-modal")?);

    let submitter: Rc<CheckoutSubmitter<Transport>> = Rc::new(CheckoutSubmitter::new(
        ctx.client.clone(),
        ctx.host.clone(),
        Rc::new(form),
        modal.clone(),
    ));

    let s = submitter.clone();
    listen(&place_order, "click", move |_| {
        s.request_confirmation();
    });

    let s = submitter.clone();
    modal.bind_dismiss(&["confirm-modal-close", "cancel-order-btn"], move || s.cancel());

    let button = confirm_button.clone();
    listen_async(&confirm_button, "click", move |event| {
        event.prevent_default();
        let (submitter, button) = (submitter.clone(), DomButton(button.clone()));
        async move {
            submitter.confirm(&button).await;
        }
    });
    Ok(())
}
