//! Admin product pages: quick stock adjustment dialog and the add/edit
//! form helpers (category toggle, image preview rules).

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::error::ClientError;
use crate::forms::{PostForm, parse_int_prefix};
use crate::host::{Host, Toast};
use crate::modal::{Modal, ModalView};
use shop_api_types::{ProductId, StockAdjustment};
use std::rc::Rc;
use tracing::debug;

pub const NEW_CATEGORY_VALUE: &str = "__new__";
pub const LOW_STOCK_WARNING: i64 = 10;

pub const STOCK_NAME_SLOT: &str = "stock-product-name";
pub const CURRENT_STOCK_SLOT: &str = "current-stock-display";
pub const PREVIEW_SLOT: &str = "new-stock-preview";
pub const QUANTITY_FIELD: &str = "adjustment-quantity";

pub fn preview_stock(current: i64, adjustment: StockAdjustment, quantity: i64) -> i64 {
    match adjustment {
        StockAdjustment::Add => current.saturating_add(quantity),
        StockAdjustment::Remove => current.saturating_sub(quantity).max(0),
        StockAdjustment::Set => quantity,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockTone {
    Error,
    Warning,
    Success,
}

impl StockTone {
    pub fn for_stock(stock: i64) -> Self {
        if stock == 0 {
            StockTone::Error
        } else if stock <= LOW_STOCK_WARNING {
            StockTone::Warning
        } else {
            StockTone::Success
        }
    }

    pub fn css_color(&self) -> &'static str {
        match self {
            StockTone::Error => "var(--error)",
            StockTone::Warning => "var(--warning)",
            StockTone::Success => "var(--success)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockPreview {
    pub new_stock: i64,
    pub tone: StockTone,
}

impl StockPreview {
    pub fn text(&self) -> String {
        format!("New Stock: {}", self.new_stock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockTarget {
    pub product_id: ProductId,
    pub current_stock: i64,
}

/// Preview feedback the binding applies to the preview element.
pub trait StockPreviewView {
    fn show_preview(&self, preview: &StockPreview);
}

pub struct StockDesk {
    host: Rc<dyn Host>,
    modal: Modal<StockTarget>,
    preview_view: Rc<dyn StockPreviewView>,
    csrf_token: String,
}

impl StockDesk {
    pub fn new(
        host: Rc<dyn Host>,
        view: Rc<dyn ModalView>,
        preview_view: Rc<dyn StockPreviewView>,
        csrf_token: impl Into<String>,
    ) -> Self {
        Self {
            host,
            modal: Modal::new(view),
            preview_view,
            csrf_token: csrf_token.into(),
        }
    }

    pub fn modal(&self) -> &Modal<StockTarget> {
        &self.modal
    }

    pub fn open(&self, target: StockTarget, product_name: &str, adjustment: &str) {
        let view = self.modal.view();
        view.set_text(STOCK_NAME_SLOT, product_name);
        view.set_text(CURRENT_STOCK_SLOT, &target.current_stock.to_string());
        view.set_field(QUANTITY_FIELD, "0");
        self.modal.open(target);
        self.update_preview(adjustment, "0");
    }

    pub fn cancel(&self) {
        self.modal.cancel();
    }

    /// Recompute on adjustment type change or quantity input.
    pub fn update_preview(&self, adjustment: &str, raw_quantity: &str) -> Option<StockPreview> {
        let target = self.modal.pending()?;
        let adjustment = adjustment.parse::<StockAdjustment>().ok()?;
        let quantity = parse_int_prefix(raw_quantity).unwrap_or(0);
        let new_stock = preview_stock(target.current_stock, adjustment, quantity);
        let preview = StockPreview {
            new_stock,
            tone: StockTone::for_stock(new_stock),
        };
        self.modal.view().set_text(PREVIEW_SLOT, &preview.text());
        self.preview_view.show_preview(&preview);
        Some(preview)
    }

    /// Submit `/products/{id}/adjust-stock/`. Negative quantities are
    /// rejected and the dialog stays open.
    pub fn confirm(
        &self,
        adjustment: &str,
        raw_quantity: &str,
        button: &dyn BusyControl,
    ) -> Option<PostForm> {
        let target = self.modal.pending()?;
        let quantity = parse_int_prefix(raw_quantity).unwrap_or(0);
        let adjustment = match validate_adjustment(adjustment, quantity) {
            Ok(adjustment) => adjustment,
            Err(err) => {
                self.host.notify(Toast::error(err.user_message("", "")));
                return None;
            }
        };
        self.modal.begin_confirm()?;
        BusyGuard::engage(button, &spinner_label("Updating...")).hold();

        let form = PostForm::new(
            format!("/products/{}/adjust-stock/", target.product_id),
            &self.csrf_token,
        )
        .field("adjustment_type", adjustment.as_str())
        .field("quantity", quantity);
        debug!(action = form.action.as_str(), "submitting stock adjustment");
        self.host.submit_form(form.clone());
        self.modal.finish();
        Some(form)
    }
}

fn validate_adjustment(raw: &str, quantity: i64) -> Result<StockAdjustment, ClientError> {
    if quantity < 0 {
        return Err(ClientError::Validation("Quantity cannot be negative".into()));
    }
    raw.parse::<StockAdjustment>()
        .map_err(|_| ClientError::Validation("Please select an adjustment type".into()))
}

// ── Add / edit form ──

/// The "new category" input shows, and is required, iff this is selected.
pub fn new_category_visible(category_value: &str) -> bool {
    category_value == NEW_CATEGORY_VALUE
}

/// Quantity and reason groups show once an adjustment type is chosen.
pub fn adjustment_fields_visible(adjustment_value: &str) -> bool {
    !adjustment_value.is_empty()
}

/// Only image files dropped on the upload area are previewed.
pub fn accepts_dropped_file(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// A typed image URL replaces the preview when non-empty.
pub fn url_preview(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Hidden input telling the server to drop the stored image.
pub const REMOVE_IMAGE_FLAG: &str = "1";
