//! Admin products: list dialogs (delete, quick stock) and the add/edit form.

use crate::events::listen;
use crate::kebab::KebabBinding;
use crate::modal::{DomModal, bind_delete_dialog};
use crate::shell::DomButton;
use crate::{PageContext, dom};
use shop_client_core::admin_products::{
    PREVIEW_SLOT, QUANTITY_FIELD, REMOVE_IMAGE_FLAG, StockDesk, StockPreview, StockPreviewView,
    StockTarget, accepts_dropped_file, adjustment_fields_visible, new_category_visible,
    url_preview,
};
use shop_client_core::busy::{BusyGuard, spinner_label};
use shop_client_core::delete::{DeleteDesk, PRODUCTS_BASE};
use shop_client_core::forms::{SubmitGate, parse_int_prefix};
use shop_client_core::types::ProductId;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    DragEvent, Element, Event, File, FileReader, HtmlButtonElement, HtmlFormElement, HtmlImageElement,
    HtmlInputElement,
};

const ADJUSTMENT_TYPE_ID: &str = "adjustment-type";

pub fn mount(ctx: &PageContext, kebabs: &Rc<KebabBinding>) -> Result<(), JsValue> {
    if dom::query(".delete-product-btn").is_some() {
        mount_delete_dialog(ctx, kebabs)?;
    }
    if dom::by_id("stock-modal").is_some() {
        mount_stock_dialog(ctx, kebabs)?;
    }
    if let Some(form) = dom::by_id_typed::<HtmlFormElement>("product-form") {
        mount_product_form(form)?;
        mount_form_toggles();
        mount_image_upload();
    }
    Ok(())
}

fn mount_delete_dialog(ctx: &PageContext, kebabs: &Rc<KebabBinding>) -> Result<(), JsValue> {
    let modal = Rc::new(DomModal::by_id("delete-modal")?);
    let desk = DeleteDesk::<ProductId>::new(
        ctx.host.clone(),
        modal.clone(),
        PRODUCTS_BASE,
        ctx.config.csrf_token.as_str(),
    );
    let desk = bind_delete_dialog(&modal, desk, &["modal-close", "cancel-delete"], "confirm-delete")?;

    for btn in dom::query_all(".delete-product-btn") {
        let Some(product_id) = dom::data_parsed::<ProductId>(&btn, "product-id") else {
            continue;
        };
        let name = dom::data(&btn, "product-name").unwrap_or_default();
        let (desk, kebabs) = (desk.clone(), kebabs.clone());
        listen(&btn, "click", move |event| {
            event.prevent_default();
            kebabs.close_all();
            desk.open(product_id, &[("delete-product-name", name.as_str())]);
        });
    }
    Ok(())
}

/// Colors the "New Stock" line by the resulting level.
struct DomStockPreview;

impl StockPreviewView for DomStockPreview {
    fn show_preview(&self, preview: &StockPreview) {
        if let Some(el) = dom::by_id(PREVIEW_SLOT) {
            dom::set_style(&el, "color", preview.tone.css_color());
        }
    }
}

fn mount_stock_dialog(ctx: &PageContext, kebabs: &Rc<KebabBinding>) -> Result<(), JsValue> {
    let modal = Rc::new(DomModal::by_id("stock-modal")?);
    let confirm = dom::require::<HtmlButtonElement>("confirm-stock")?;
    let desk = Rc::new(StockDesk::new(
        ctx.host.clone(),
        modal.clone(),
        Rc::new(DomStockPreview),
        ctx.config.csrf_token.as_str(),
    ));

    for btn in dom::query_all(".quick-stock-btn") {
        let Some(product_id) = dom::data_parsed::<ProductId>(&btn, "product-id") else {
            continue;
        };
        let current_stock = dom::data(&btn, "current-stock")
            .and_then(|raw| parse_int_prefix(&raw))
            .unwrap_or(0);
        let name = dom::data(&btn, "product-name").unwrap_or_default();
        let (desk, kebabs) = (desk.clone(), kebabs.clone());
        listen(&btn, "click", move |event| {
            event.prevent_default();
            event.stop_propagation();
            kebabs.close_all();
            let target = StockTarget {
                product_id,
                current_stock,
            };
            desk.open(target, &name, &dom::control_value(ADJUSTMENT_TYPE_ID));
        });
    }

    let refresh = {
        let desk = desk.clone();
        move |_: Event| {
            desk.update_preview(
                &dom::control_value(ADJUSTMENT_TYPE_ID),
                &dom::control_value(QUANTITY_FIELD),
            );
        }
    };
    if let Some(select) = dom::by_id(ADJUSTMENT_TYPE_ID) {
        listen(&select, "change", refresh.clone());
    }
    if let Some(input) = dom::by_id(QUANTITY_FIELD) {
        listen(&input, "input", refresh);
    }

    let d = desk.clone();
    modal.bind_dismiss(&["stock-modal-close", "cancel-stock"], move || d.cancel());

    let button = DomButton(confirm.clone());
    listen(&confirm, "click", move |_| {
        desk.confirm(
            &dom::control_value(ADJUSTMENT_TYPE_ID),
            &dom::control_value(QUANTITY_FIELD),
            &button,
        );
    });
    Ok(())
}

/// Edit pages confirm in `update-modal` before the native submit; the add
/// page submits straight away with a busy button.
fn mount_product_form(form: HtmlFormElement) -> Result<(), JsValue> {
    if dom::by_id("update-modal").is_none() {
        let target = form.clone();
        listen(&form, "submit", move |_| {
            if let Some(button) = DomButton::submit_of(&target) {
                BusyGuard::engage(&button, &spinner_label("Adding...")).hold();
            }
        });
        return Ok(());
    }

    let modal = Rc::new(DomModal::by_id("update-modal")?);
    let confirm = dom::require::<HtmlButtonElement>("confirm-update")?;
    let gate = Rc::new(SubmitGate::new(modal.clone()));

    let g = gate.clone();
    listen(&form, "submit", move |event| {
        if !g.on_submit() {
            event.prevent_default();
        }
    });

    let g = gate.clone();
    modal.bind_dismiss(&["modal-close", "cancel-update"], move || g.modal().cancel());

    listen(&confirm, "click", move |_| {
        let Some(button) = DomButton::submit_of(&form) else {
            warn!("product form has no submit button");
            return;
        };
        if gate.confirm(&button, "Saving...") {
            if let Err(err) = form.submit() {
                warn!(error = ?err, "product form submit failed");
            }
        }
    });
    Ok(())
}

/// Category "new" input and the stock adjustment groups.
fn mount_form_toggles() {
    if let (Some(select), Some(group), Some(input)) = (
        dom::by_id("category"),
        dom::by_id("new-category-group"),
        dom::by_id_typed::<HtmlInputElement>("new_category"),
    ) {
        listen(&select, "change", move |_| {
            let visible = new_category_visible(&dom::control_value("category"));
            dom::show(&group, visible, "block");
            input.set_required(visible);
        });
    }

    if let Some(select) = dom::by_id("adjustment_type") {
        listen(&select, "change", move |_| {
            let visible = adjustment_fields_visible(&dom::control_value("adjustment_type"));
            for id in ["adjustment-quantity-group", "adjustment-reason-group"] {
                if let Some(group) = dom::by_id(id) {
                    dom::show(&group, visible, "block");
                }
            }
        });
    }
}

/// Swap the placeholder for the preview image.
fn show_image(preview: &HtmlImageElement, placeholder: &Element, src: &str) {
    preview.set_src(src);
    dom::show(preview, true, "block");
    dom::show(placeholder, false, "flex");
}

/// Read `file` as a data URL into the preview.
fn preview_file(file: &File, preview: &HtmlImageElement, placeholder: &Element) {
    let reader = match FileReader::new() {
        Ok(reader) => reader,
        Err(err) => {
            warn!(error = ?err, "FileReader unavailable");
            return;
        }
    };
    let onload = {
        let (reader, preview, placeholder) = (reader.clone(), preview.clone(), placeholder.clone());
        Closure::once_into_js(move || {
            if let Some(src) = reader.result().ok().and_then(|r| r.as_string()) {
                show_image(&preview, &placeholder, &src);
            }
        })
    };
    reader.set_onload(Some(onload.unchecked_ref()));
    if let Err(err) = reader.read_as_data_url(file) {
        warn!(error = ?err, "image read failed");
    }
}

fn mount_image_upload() {
    let (Some(area), Some(input), Some(preview), Some(placeholder)) = (
        dom::by_id("image-upload-area"),
        dom::by_id_typed::<HtmlInputElement>("image"),
        dom::by_id_typed::<HtmlImageElement>("image-preview"),
        dom::by_id("upload-placeholder"),
    ) else {
        return;
    };

    {
        let input = input.clone();
        listen(&area, "click", move |_| input.click());
    }

    {
        let (target, preview, placeholder) = (input.clone(), preview.clone(), placeholder.clone());
        listen(&input, "change", move |_| {
            if let Some(file) = target.files().and_then(|files| files.get(0)) {
                preview_file(&file, &preview, &placeholder);
            }
        });
    }

    if let Some(remove) = dom::by_id("remove-image") {
        let (preview, placeholder, target) = (preview.clone(), placeholder.clone(), remove.clone());
        listen(&remove, "click", move |_| {
            dom::show(&preview, false, "block");
            dom::show(&placeholder, true, "flex");
            dom::set_control_value("image_url", "");
            dom::set_control_value("remove_image_flag", REMOVE_IMAGE_FLAG);
            dom::show(&target, false, "block");
        });
    }

    if let Some(url_input) = dom::by_id("image_url") {
        let (preview, placeholder) = (preview.clone(), placeholder.clone());
        listen(&url_input, "change", move |_| {
            if let Some(src) = url_preview(&dom::control_value("image_url")) {
                show_image(&preview, &placeholder, src);
            }
        });
    }

    {
        let target = area.clone();
        listen(&area, "dragover", move |event| {
            event.prevent_default();
            dom::add_class(&target, "dragover");
        });
    }
    {
        let target = area.clone();
        listen(&area, "dragleave", move |_| dom::remove_class(&target, "dragover"));
    }

    let target = area.clone();
    listen(&area, "drop", move |event| {
        event.prevent_default();
        dom::remove_class(&target, "dragover");
        let Some(files) = event
            .dyn_ref::<DragEvent>()
            .and_then(DragEvent::data_transfer)
            .and_then(|transfer| transfer.files())
        else {
            return;
        };
        let Some(file) = files.get(0) else {
            return;
        };
        if !accepts_dropped_file(&file.type_()) {
            debug!(mime = %file.type_(), "ignored non-image drop");
            return;
        }
        input.set_files(Some(&files));
        preview_file(&file, &preview, &placeholder);
    });
}
