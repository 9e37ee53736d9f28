//! Catalog page: infinite scroll and add-to-cart.
//!
//! The pagination cursor (`has_more`, `next_page`) is replaced wholesale by
//! each successful response and mirrored to the page. At most one page
//! request is in flight; cards already on the page are never appended twice.

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::cart::CartBadge;
use crate::client::ShopClient;
use crate::error::ClientError;
use crate::host::{Host, Toast};
use crate::render::CHECK_ICON;
use crate::transport::ShopTransport;
use shop_api_types::{PageToken, ProductCard, ProductId};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, warn};

pub const SCROLL_THRESHOLD_PX: f64 = 200.0;
pub const ADDED_FEEDBACK_MS: u32 = 1500;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationCursor {
    pub has_more: bool,
    pub next_page: Option<PageToken>,
}

impl PaginationCursor {
    /// Read from the page's `data-has-more` / `data-next-page` attributes.
    pub fn from_attrs(has_more: Option<&str>, next_page: Option<&str>) -> Self {
        Self {
            has_more: has_more == Some("true"),
            next_page: next_page.and_then(PageToken::from_attr),
        }
    }

    pub fn has_more_attr(&self) -> &'static str {
        if self.has_more { "true" } else { "false" }
    }

    pub fn next_page_attr(&self) -> &str {
        self.next_page.as_ref().map_or("", PageToken::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub viewport_height: f64,
    pub scroll_y: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn near_bottom(&self, threshold: f64) -> bool {
        self.viewport_height + self.scroll_y >= self.document_height - threshold
    }
}

pub trait CatalogView {
    fn show_loading(&self, on: bool);
    fn append_cards(&self, cards: &[ProductCard]);
    /// Mirror the cursor to the page after every successful load.
    fn set_cursor(&self, cursor: &PaginationCursor);
    fn show_end(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    NotNearBottom,
    Busy,
    Exhausted,
    Appended(usize),
    Failed,
}

/// Clears the in-flight flag and the loading indicator on every exit path.
struct LoadingGuard<'a> {
    flag: &'a Cell<bool>,
    view: &'a dyn CatalogView,
}

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a Cell<bool>, view: &'a dyn CatalogView) -> Self {
        flag.set(true);
        view.show_loading(true);
        Self { flag, view }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.view.show_loading(false);
        self.flag.set(false);
    }
}

pub struct CatalogLoader<T> {
    client: ShopClient<T>,
    host: Rc<dyn Host>,
    view: Rc<dyn CatalogView>,
    query: String,
    loading: Cell<bool>,
    cursor: RefCell<PaginationCursor>,
    seen: RefCell<HashSet<ProductId>>,
}

impl<T: ShopTransport> CatalogLoader<T> {
    pub fn new(
        client: ShopClient<T>,
        host: Rc<dyn Host>,
        view: Rc<dyn CatalogView>,
        query: impl Into<String>,
        cursor: PaginationCursor,
        rendered: impl IntoIterator<Item = ProductId>,
    ) -> Self {
        let seen: HashSet<ProductId> = rendered.into_iter().collect();
        if !cursor.has_more && !seen.is_empty() {
            view.show_end();
        }
        Self {
            client,
            host,
            view,
            query: query.into(),
            loading: Cell::new(false),
            cursor: RefCell::new(cursor),
            seen: RefCell::new(seen),
        }
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.cursor.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> LoadOutcome {
        if self.loading.get() {
            return LoadOutcome::Busy;
        }
        if !metrics.near_bottom(SCROLL_THRESHOLD_PX) {
            return LoadOutcome::NotNearBottom;
        }
        self.load_next().await
    }

    pub async fn load_next(&self) -> LoadOutcome {
        if self.loading.get() {
            return LoadOutcome::Busy;
        }
        let page = {
            let cursor = self.cursor.borrow();
            match (&cursor.next_page, cursor.has_more) {
                (Some(page), true) => page.clone(),
                _ => return LoadOutcome::Exhausted,
            }
        };

        let _loading = LoadingGuard::engage(&self.loading, self.view.as_ref());
        debug!(page = page.as_str(), "loading next catalog page");

        match self.client.fetch_catalog_page(&self.query, &page).await {
            Ok(resp) => {
                let fresh: Vec<ProductCard> = {
                    let mut seen = self.seen.borrow_mut();
                    resp.products
                        .into_iter()
                        .filter(|card| seen.insert(card.id))
                        .collect()
                };
                if !fresh.is_empty() {
                    self.view.append_cards(&fresh);
                }

                let cursor = PaginationCursor {
                    has_more: resp.has_more,
                    next_page: resp.next_page,
                };
                self.view.set_cursor(&cursor);
                if !cursor.has_more {
                    self.view.show_end();
                }
                *self.cursor.borrow_mut() = cursor;
                LoadOutcome::Appended(fresh.len())
            }
            Err(err) => {
                warn!(page = page.as_str(), error = %err, "catalog page load failed");
                self.host.notify(Toast::error("Failed to load more products"));
                LoadOutcome::Failed
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Failed,
}

pub struct CartAdder<T> {
    client: ShopClient<T>,
    host: Rc<dyn Host>,
    badge: Rc<dyn CartBadge>,
}

impl<T: ShopTransport> CartAdder<T> {
    pub fn new(client: ShopClient<T>, host: Rc<dyn Host>, badge: Rc<dyn CartBadge>) -> Self {
        Self {
            client,
            host,
            badge,
        }
    }

    /// Add one unit; the button is busy until the request settles and shows
    /// a short success state afterwards.
    pub async fn add(
        &self,
        product_id: ProductId,
        product_name: Option<&str>,
        button: &dyn BusyControl,
    ) -> AddOutcome {
        let guard = BusyGuard::engage(button, &spinner_label("Adding..."));

        match self.client.add_to_cart(product_id).await {
            Ok(resp) => {
                self.badge.set_count(resp.cart_count);
                guard.show_success(&format!("{CHECK_ICON} Added!"));
                let name = product_name.unwrap_or("Product");
                self.host.notify(
                    Toast::success(format!("{name} added to cart!")).titled("Added to Cart"),
                );
                self.host.sleep(ADDED_FEEDBACK_MS).await;
                AddOutcome::Added
            }
            Err(err) => {
                warn!(%product_id, error = %err, "add to cart failed");
                let message = match &err {
                    ClientError::Validation(_) | ClientError::Rejected { .. } => {
                        err.user_message("Failed to add to cart", "")
                    }
                    other => format!("An error occurred: {other}"),
                };
                self.host.notify(Toast::error(message).titled("Error"));
                AddOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        FakeButton, FakeTransport, RecordingBadge, RecordingCatalogView, RecordingHost,
        config_with_all_endpoints,
    };
    use serde_json::json;

    fn loader(
        transport: &Rc<FakeTransport>,
        view: &Rc<RecordingCatalogView>,
        host: &Rc<RecordingHost>,
        cursor: PaginationCursor,
    ) -> CatalogLoader<Rc<FakeTransport>> {
        CatalogLoader::new(
            ShopClient::new(transport.clone(), config_with_all_endpoints()),
            host.clone(),
            view.clone(),
            "?category=Mugs",
            cursor,
            [ProductId(1), ProductId(2)],
        )
    }

    fn page_two() -> PaginationCursor {
        PaginationCursor {
            has_more: true,
            next_page: Some(PageToken("2".into())),
        }
    }

    const NEAR: ScrollMetrics = ScrollMetrics {
        viewport_height: 800.0,
        scroll_y: 1050.0,
        document_height: 2000.0,
    };

    #[test]
    fn threshold_is_two_hundred_pixels() {
        assert!(NEAR.near_bottom(SCROLL_THRESHOLD_PX));
        let far = ScrollMetrics {
            scroll_y: 900.0,
            ..NEAR
        };
        assert!(!far.near_bottom(SCROLL_THRESHOLD_PX));
    }

    #[test]
    fn cursor_attrs_treat_blank_as_absent() {
        let cursor = PaginationCursor::from_attrs(Some("true"), Some(""));
        assert!(cursor.has_more);
        assert_eq!(cursor.next_page, None);
        assert_eq!(cursor.next_page_attr(), "");
    }

    #[tokio::test]
    async fn appends_only_unseen_cards_and_replaces_cursor() {
        let (transport, view, host) = (
            FakeTransport::new(),
            RecordingCatalogView::new(),
            RecordingHost::new(),
        );
        let loader = loader(&transport, &view, &host, page_two());
        transport.respond(json!({
            "products": [
                {"id": 2, "name": "Mug", "price": "8.00", "stock": 4},
                {"id": 3, "name": "Cup", "price": 6.5, "stock": 10}
            ],
            "has_more": true,
            "next_page": 3
        }));

        assert_eq!(loader.on_scroll(NEAR).await, LoadOutcome::Appended(1));

        assert_eq!(view.appended_ids(), vec![ProductId(3)]);
        assert_eq!(
            loader.cursor(),
            PaginationCursor {
                has_more: true,
                next_page: Some(PageToken("3".into()))
            }
        );
        assert_eq!(view.last_cursor(), Some(loader.cursor()));
        assert!(!view.is_loading());
        assert!(!loader.is_loading());
        assert_eq!(
            transport.calls()[0].url,
            "/products/?category=Mugs&page=2&ajax=1"
        );
    }

    #[tokio::test]
    async fn last_page_shows_end_and_stops() {
        let (transport, view, host) = (
            FakeTransport::new(),
            RecordingCatalogView::new(),
            RecordingHost::new(),
        );
        let loader = loader(&transport, &view, &host, page_two());
        transport.respond(json!({"products": [], "has_more": false, "next_page": null}));

        assert_eq!(loader.load_next().await, LoadOutcome::Appended(0));
        assert!(view.end_shown());
        assert_eq!(loader.load_next().await, LoadOutcome::Exhausted);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_cursor_does_not_wedge_the_loader() {
        let (transport, view, host) = (
            FakeTransport::new(),
            RecordingCatalogView::new(),
            RecordingHost::new(),
        );
        let cursor = PaginationCursor {
            has_more: true,
            next_page: None,
        };
        let loader = loader(&transport, &view, &host, cursor);

        assert_eq!(loader.on_scroll(NEAR).await, LoadOutcome::Exhausted);
        assert!(!loader.is_loading());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn failure_keeps_the_cursor_for_a_retry() {
        let (transport, view, host) = (
            FakeTransport::new(),
            RecordingCatalogView::new(),
            RecordingHost::new(),
        );
        let loader = loader(&transport, &view, &host, page_two());
        transport.fail(ClientError::Http {
            status: 500,
            body: String::new(),
        });

        assert_eq!(loader.load_next().await, LoadOutcome::Failed);
        assert_eq!(loader.cursor(), page_two());
        assert!(!loader.is_loading());
        assert_eq!(
            host.last_toast().map(|t| t.message),
            Some("Failed to load more products".into())
        );
    }

    #[tokio::test]
    async fn concurrent_scrolls_issue_one_request() {
        let (transport, view, host) = (
            FakeTransport::gated(),
            RecordingCatalogView::new(),
            RecordingHost::new(),
        );
        let loader = loader(&transport, &view, &host, page_two());
        transport.respond(json!({"products": [], "has_more": false}));

        let release = async {
            tokio::task::yield_now().await;
            transport.release();
        };
        let (first, second, ()) =
            tokio::join!(loader.on_scroll(NEAR), loader.on_scroll(NEAR), release);

        assert_eq!(first, LoadOutcome::Appended(0));
        assert_eq!(second, LoadOutcome::Busy);
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn initial_last_page_shows_end_indicator() {
        let view = RecordingCatalogView::new();
        let _loader = CatalogLoader::new(
            ShopClient::new(FakeTransport::new(), config_with_all_endpoints()),
            RecordingHost::new(),
            view.clone(),
            "",
            PaginationCursor::default(),
            [ProductId(1)],
        );
        assert!(view.end_shown());
    }

    #[tokio::test]
    async fn add_to_cart_updates_badge_and_restores_button() {
        let (transport, host, badge) = (
            FakeTransport::new(),
            RecordingHost::new(),
            RecordingBadge::new(),
        );
        let adder = CartAdder::new(
            ShopClient::new(transport.clone(), config_with_all_endpoints()),
            host.clone(),
            badge.clone(),
        );
        let button = FakeButton::new("Add to Cart");
        transport.respond(json!({"success": true, "cart_count": 4}));

        let outcome = adder.add(ProductId(9), Some("Blue Mug"), &button).await;

        assert_eq!(outcome, AddOutcome::Added);
        assert_eq!(badge.count(), Some(4));
        let toast = host.last_toast().expect("toast");
        assert_eq!(toast.message, "Blue Mug added to cart!");
        assert_eq!(toast.title.as_deref(), Some("Added to Cart"));
        assert_eq!(host.sleeps(), vec![ADDED_FEEDBACK_MS]);
        assert_eq!(button.current_label(), "Add to Cart");
        assert!(!button.is_disabled());
        assert!(!button.is_highlighted());
    }

    #[tokio::test]
    async fn add_to_cart_errors_use_server_message_or_transport_text() {
        let (transport, host) = (FakeTransport::new(), RecordingHost::new());
        let adder = CartAdder::new(
            ShopClient::new(transport.clone(), config_with_all_endpoints()),
            host.clone(),
            RecordingBadge::new(),
        );
        let button = FakeButton::new("Add to Cart");

        transport.respond(json!({"success": false}));
        assert_eq!(adder.add(ProductId(9), None, &button).await, AddOutcome::Failed);
        assert_eq!(
            host.last_toast().map(|t| t.message),
            Some("Failed to add to cart".into())
        );

        transport.fail(ClientError::Http {
            status: 503,
            body: String::new(),
        });
        adder.add(ProductId(9), None, &button).await;
        assert_eq!(
            host.last_toast().map(|t| t.message),
            Some("An error occurred: HTTP error! status: 503".into())
        );
        assert!(!button.is_disabled());
    }
}
