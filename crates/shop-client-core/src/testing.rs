//! In-memory fakes for the ports, shared by the unit tests.

use crate::busy::BusyControl;
use crate::cart::{CartBadge, CartView};
use crate::catalog::{CatalogView, PaginationCursor};
use crate::config::{Endpoints, ShopConfig};
use crate::error::{ClientError, ClientResult};
use crate::forms::PostForm;
use crate::host::{Host, Toast};
use crate::modal::ModalView;
use crate::transport::{RequestContext, ShopTransport};
use async_trait::async_trait;
use serde_json::Value;
use shop_api_types::{CartLine, CartSummary, Money, ProductCard, ProductId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;
use tokio::sync::Notify;

pub fn config_with_all_endpoints() -> Rc<ShopConfig> {
    let endpoint = |path: &str| Some(path.to_owned());
    Rc::new(ShopConfig {
        csrf_token: "test-token".into(),
        endpoints: Endpoints {
            cart_update: endpoint("/cart/update/"),
            cart_remove: endpoint("/cart/remove/"),
            cart_clear: endpoint("/cart/clear/"),
            cart_add: endpoint("/api/cart/add/"),
            checkout: endpoint("/cart/checkout/"),
            orders_page: endpoint("/orders/"),
            products: endpoint("/products/"),
            order_status: endpoint("/orders/update-status/"),
            order_bulk_update: endpoint("/orders/bulk-update/"),
            order_cancel: endpoint("/orders/cancel/"),
            order_delete_base: endpoint("/orders/"),
        },
        ..ShopConfig::default()
    })
}

// ── Transport ──

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
    pub form: Option<Vec<(String, String)>>,
    pub csrf_token: String,
}

/// Scripted transport: answers calls from a queue, records every request.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<VecDeque<ClientResult<Value>>>,
    calls: RefCell<Vec<Call>>,
    gate: Option<Notify>,
}

impl FakeTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Every response waits for [`FakeTransport::release`].
    pub fn gated() -> Rc<Self> {
        Rc::new(Self {
            gate: Some(Notify::new()),
            ..Self::default()
        })
    }

    pub fn respond(&self, body: Value) {
        self.responses.borrow_mut().push_back(Ok(body));
    }

    pub fn fail(&self, err: ClientError) {
        self.responses.borrow_mut().push_back(Err(err));
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    async fn answer(&self, call: Call) -> ClientResult<Value> {
        self.calls.borrow_mut().push(call);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Transport("no scripted response".into())))
    }
}

#[async_trait(?Send)]
impl ShopTransport for FakeTransport {
    async fn get_json(&self, url: &str, ctx: &RequestContext) -> ClientResult<Value> {
        self.answer(Call {
            method: "GET",
            url: url.to_owned(),
            body: None,
            form: None,
            csrf_token: ctx.csrf_token.clone(),
        })
        .await
    }

    async fn post_json(&self, url: &str, body: Value, ctx: &RequestContext) -> ClientResult<Value> {
        self.answer(Call {
            method: "POST",
            url: url.to_owned(),
            body: Some(body),
            form: None,
            csrf_token: ctx.csrf_token.clone(),
        })
        .await
    }

    async fn post_form(
        &self,
        url: &str,
        fields: Vec<(String, String)>,
        ctx: &RequestContext,
    ) -> ClientResult<Value> {
        self.answer(Call {
            method: "POST",
            url: url.to_owned(),
            body: None,
            form: Some(fields),
            csrf_token: ctx.csrf_token.clone(),
        })
        .await
    }
}

// ── Host ──

pub struct RecordingHost {
    toasts: RefCell<Vec<Toast>>,
    confirm_answer: Cell<bool>,
    prompts: RefCell<Vec<String>>,
    reloads: Cell<u32>,
    navigations: RefCell<Vec<String>>,
    forms: RefCell<Vec<PostForm>>,
    sleeps: RefCell<Vec<u32>>,
}

impl RecordingHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            toasts: RefCell::new(Vec::new()),
            confirm_answer: Cell::new(true),
            prompts: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
            navigations: RefCell::new(Vec::new()),
            forms: RefCell::new(Vec::new()),
            sleeps: RefCell::new(Vec::new()),
        })
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    pub fn last_toast(&self) -> Option<Toast> {
        self.toasts.borrow().last().cloned()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }

    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn forms(&self) -> Vec<PostForm> {
        self.forms.borrow().clone()
    }

    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Host for RecordingHost {
    fn notify(&self, toast: Toast) {
        self.toasts.borrow_mut().push(toast);
    }

    fn confirm(&self, message: &str) -> bool {
        self.prompts.borrow_mut().push(message.to_owned());
        self.confirm_answer.get()
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn navigate(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_owned());
    }

    fn submit_form(&self, form: PostForm) {
        self.forms.borrow_mut().push(form);
    }

    async fn sleep(&self, ms: u32) {
        self.sleeps.borrow_mut().push(ms);
    }
}

// ── Controls and dialogs ──

pub struct FakeButton {
    label: RefCell<String>,
    disabled: Cell<bool>,
    highlighted: Cell<bool>,
}

impl FakeButton {
    pub fn new(label: &str) -> Self {
        Self {
            label: RefCell::new(label.to_owned()),
            disabled: Cell::new(false),
            highlighted: Cell::new(false),
        }
    }

    pub fn current_label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted.get()
    }
}

impl BusyControl for FakeButton {
    fn label(&self) -> String {
        self.current_label()
    }

    fn set_label(&self, markup: &str) {
        *self.label.borrow_mut() = markup.to_owned();
    }

    fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    fn set_highlight(&self, on: bool) {
        self.highlighted.set(on);
    }
}

#[derive(Default)]
pub struct RecordingModal {
    shown: Cell<bool>,
    texts: RefCell<HashMap<String, String>>,
    fields: RefCell<HashMap<String, String>>,
}

impl RecordingModal {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_shown(&self) -> bool {
        self.shown.get()
    }

    pub fn text(&self, slot: &str) -> Option<String> {
        self.texts.borrow().get(slot).cloned()
    }

    pub fn field(&self, slot: &str) -> Option<String> {
        self.fields.borrow().get(slot).cloned()
    }
}

impl ModalView for RecordingModal {
    fn show(&self) {
        self.shown.set(true);
    }

    fn hide(&self) {
        self.shown.set(false);
    }

    fn set_text(&self, slot: &str, text: &str) {
        self.texts
            .borrow_mut()
            .insert(slot.to_owned(), text.to_owned());
    }

    fn set_field(&self, slot: &str, value: &str) {
        self.fields
            .borrow_mut()
            .insert(slot.to_owned(), value.to_owned());
    }
}

// ── Cart ──

#[derive(Default)]
pub struct RecordingBadge {
    count: Cell<Option<u32>>,
}

impl RecordingBadge {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn count(&self) -> Option<u32> {
        self.count.get()
    }
}

impl CartBadge for RecordingBadge {
    fn set_count(&self, count: u32) {
        self.count.set(Some(count));
    }
}

#[derive(Default)]
pub struct RecordingCartView {
    quantities: RefCell<HashMap<ProductId, i64>>,
    subtotals: RefCell<HashMap<ProductId, Money>>,
    summary: RefCell<Option<CartSummary>>,
    removing: RefCell<HashSet<ProductId>>,
    removed: RefCell<HashSet<ProductId>>,
}

impl RecordingCartView {
    pub fn with_lines(lines: &[(i64, u32)]) -> Rc<Self> {
        let view = Self::default();
        for &(id, quantity) in lines {
            view.quantities
                .borrow_mut()
                .insert(ProductId(id), i64::from(quantity));
        }
        Rc::new(view)
    }

    /// The user edits the input before the change event fires.
    pub fn type_quantity(&self, product_id: ProductId, quantity: i64) {
        self.quantities.borrow_mut().insert(product_id, quantity);
    }

    pub fn line_subtotal(&self, product_id: ProductId) -> Option<Money> {
        self.subtotals.borrow().get(&product_id).copied()
    }

    pub fn summary(&self) -> Option<CartSummary> {
        *self.summary.borrow()
    }

    pub fn is_removing(&self, product_id: ProductId) -> bool {
        self.removing.borrow().contains(&product_id)
    }

    pub fn is_removed(&self, product_id: ProductId) -> bool {
        self.removed.borrow().contains(&product_id)
    }
}

impl CartView for RecordingCartView {
    fn quantity(&self, product_id: ProductId) -> Option<i64> {
        self.quantities.borrow().get(&product_id).copied()
    }

    fn show_quantity(&self, product_id: ProductId, quantity: u32) {
        self.quantities
            .borrow_mut()
            .insert(product_id, i64::from(quantity));
    }

    fn render_line(&self, line: &CartLine) {
        self.show_quantity(line.product_id, line.quantity);
        if let Some(subtotal) = line.subtotal {
            self.subtotals.borrow_mut().insert(line.product_id, subtotal);
        }
    }

    fn render_summary(&self, summary: &CartSummary) {
        *self.summary.borrow_mut() = Some(*summary);
    }

    fn mark_removing(&self, product_id: ProductId, removing: bool) {
        let mut set = self.removing.borrow_mut();
        if removing {
            set.insert(product_id);
        } else {
            set.remove(&product_id);
        }
    }

    fn remove_line(&self, product_id: ProductId) {
        self.removing.borrow_mut().remove(&product_id);
        self.quantities.borrow_mut().remove(&product_id);
        self.removed.borrow_mut().insert(product_id);
    }
}

// ── Catalog ──

#[derive(Default)]
pub struct RecordingCatalogView {
    loading: Cell<bool>,
    appended: RefCell<Vec<ProductId>>,
    cursor: RefCell<Option<PaginationCursor>>,
    end: Cell<bool>,
}

impl RecordingCatalogView {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn appended_ids(&self) -> Vec<ProductId> {
        self.appended.borrow().clone()
    }

    pub fn last_cursor(&self) -> Option<PaginationCursor> {
        self.cursor.borrow().clone()
    }

    pub fn end_shown(&self) -> bool {
        self.end.get()
    }
}

impl CatalogView for RecordingCatalogView {
    fn show_loading(&self, on: bool) {
        self.loading.set(on);
    }

    fn append_cards(&self, cards: &[ProductCard]) {
        self.appended
            .borrow_mut()
            .extend(cards.iter().map(|card| card.id));
    }

    fn set_cursor(&self, cursor: &PaginationCursor) {
        *self.cursor.borrow_mut() = Some(cursor.clone());
    }

    fn show_end(&self) {
        self.end.set(true);
    }
}
