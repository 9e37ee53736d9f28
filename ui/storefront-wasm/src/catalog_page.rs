//! Product listing: infinite scroll and add-to-cart buttons.

use crate::cart_page::DomCartBadge;
use crate::events::listen;
use crate::shell::DomButton;
use crate::{PageContext, Transport, dom};
use shop_client_core::catalog::{CartAdder, CatalogLoader, CatalogView, PaginationCursor, ScrollMetrics};
use shop_client_core::render::render_product_card;
use shop_client_core::types::{ProductCard, ProductId};
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::prelude::*;
use web_sys::Element;

const GRID_ID: &str = "products-grid";
const STATUS_ID: &str = "infinite-scroll-status";
const END_ID: &str = "end-of-products";

struct DomCatalogView {
    grid: Element,
    status: Element,
}

impl CatalogView for DomCatalogView {
    fn show_loading(&self, on: bool) {
        dom::show(&self.status, on, "block");
    }

    fn append_cards(&self, cards: &[ProductCard]) {
        for card in cards {
            if let Err(err) = self
                .grid
                .insert_adjacent_html("beforeend", &render_product_card(card))
            {
                debug!(product = %card.id, error = ?err, "card insert failed");
            }
        }
    }

    fn set_cursor(&self, cursor: &PaginationCursor) {
        dom::set_data(&self.status, "has-more", cursor.has_more_attr());
        dom::set_data(&self.status, "next-page", cursor.next_page_attr());
    }

    fn show_end(&self) {
        dom::show_by_id(END_ID, true);
    }
}

fn scroll_metrics() -> Option<ScrollMetrics> {
    let window = dom::window();
    Some(ScrollMetrics {
        viewport_height: window.inner_height().ok()?.as_f64()?,
        scroll_y: window.scroll_y().ok()?,
        document_height: f64::from(dom::document().document_element()?.scroll_height()),
    })
}

pub fn mount(ctx: &PageContext) -> Result<(), JsValue> {
    mount_infinite_scroll(ctx);
    mount_add_to_cart(ctx);
    Ok(())
}

fn mount_infinite_scroll(ctx: &PageContext) {
    let (Some(grid), Some(status)) = (dom::by_id(GRID_ID), dom::by_id(STATUS_ID)) else {
        return;
    };
    let cursor = PaginationCursor::from_attrs(
        dom::data(&status, "has-more").as_deref(),
        dom::data(&status, "next-page").as_deref(),
    );
    let rendered: Vec<ProductId> = dom::query_all(".product-card[data-product-id]")
        .iter()
        .filter_map(|card| dom::data_parsed(card, "product-id"))
        .collect();
    debug!(cards = rendered.len(), has_more = cursor.has_more, "catalog bound");

    let loader: Rc<CatalogLoader<Transport>> = Rc::new(CatalogLoader::new(
        ctx.client.clone(),
        ctx.host.clone(),
        Rc::new(DomCatalogView { grid, status }),
        dom::location_search(),
        cursor,
        rendered,
    ));

    listen(&dom::window(), "scroll", move |_| {
        if loader.is_loading() {
            return;
        }
        let Some(metrics) = scroll_metrics() else {
            return;
        };
        let loader = loader.clone();
        wasm_bindgen_futures::spawn_local(async move {
            loader.on_scroll(metrics).await;
        });
    });
}

/// One delegated listener covers server-rendered cards and appended ones.
fn mount_add_to_cart(ctx: &PageContext) {
    if dom::by_id(GRID_ID).is_none() && dom::query(".add-to-cart-btn").is_none() {
        return;
    }
    let adder: Rc<CartAdder<Transport>> = Rc::new(CartAdder::new(
        ctx.client.clone(),
        ctx.host.clone(),
        Rc::new(DomCartBadge),
    ));

    listen(&dom::document(), "click", move |event| {
        let Some(el) = dom::event_element(&event).and_then(|el| dom::closest(&el, ".add-to-cart-btn"))
        else {
            return;
        };
        let (Some(product_id), Some(button)) = (
            dom::data_parsed::<ProductId>(&el, "product-id"),
            DomButton::from_element(&el),
        ) else {
            return;
        };
        if button.0.disabled() {
            return;
        }
        let name = dom::closest(&el, ".product-card")
            .and_then(|card| dom::query_within(&card, ".product-name"))
            .map(|name| dom::text(&name));

        let adder = adder.clone();
        wasm_bindgen_futures::spawn_local(async move {
            adder.add(product_id, name.as_deref(), &button).await;
        });
    });
}
