//! Admin orders: status and delete dialogs, bulk actions, order detail.

use crate::events::{listen, listen_async};
use crate::kebab::KebabBinding;
use crate::modal::{DomModal, bind_delete_dialog};
use crate::shell::DomButton;
use crate::{PageContext, Transport, dom};
use shop_client_core::admin_orders::{BulkDesk, BulkSelection, StatusDesk, update_detail_status};
use shop_client_core::delete::DeleteDesk;
use shop_client_core::types::{OrderId, OrderStatus};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlInputElement, HtmlSelectElement};

pub fn mount(ctx: &PageContext, kebabs: &Rc<KebabBinding>) -> Result<(), JsValue> {
    if dom::by_id("status-modal").is_some() {
        mount_status_dialog(ctx, kebabs)?;
    }
    if dom::by_id("delete-order-modal").is_some() {
        mount_delete_dialog(ctx, kebabs)?;
    }
    if dom::by_id("select-all").is_some() {
        mount_bulk_actions(ctx)?;
    }
    mount_detail(ctx);
    Ok(())
}

/// Order number shown in the second column of the row.
fn row_order_number(button: &Element) -> String {
    dom::closest(button, "tr")
        .and_then(|row| dom::query_within(&row, "td:nth-child(2)"))
        .map(|cell| dom::text(&cell))
        .unwrap_or_default()
}

fn mount_status_dialog(ctx: &PageContext, kebabs: &Rc<KebabBinding>) -> Result<(), JsValue> {
    let modal = Rc::new(DomModal::by_id("status-modal")?);
    let confirm = dom::require::<HtmlButtonElement>("status-confirm")?;
    let select = dom::require::<HtmlSelectElement>("new-status")?;
    let desk: Rc<StatusDesk<Transport>> = Rc::new(StatusDesk::new(
        ctx.client.clone(),
        ctx.host.clone(),
        modal.clone(),
    ));

    for btn in dom::query_all(".status-change-btn") {
        let Some(order_id) = dom::data_parsed::<OrderId>(&btn, "order-id") else {
            continue;
        };
        let (desk, kebabs, target) = (desk.clone(), kebabs.clone(), btn.clone());
        listen(&btn, "click", move |event| {
            event.prevent_default();
            let current = dom::data(&target, "current-status")
                .and_then(|raw| raw.parse::<OrderStatus>().ok());
            kebabs.close_all();
            desk.open(order_id, &row_order_number(&target), current);
        });
    }

    let d = desk.clone();
    modal.bind_dismiss(&["status-modal-close", "status-cancel"], move || d.cancel());

    let target = confirm.clone();
    listen_async(&confirm, "click", move |_| {
        let (desk, button, raw) = (desk.clone(), DomButton(target.clone()), select.value());
        async move {
            desk.confirm(&raw, &button).await;
        }
    });
    Ok(())
}

fn mount_delete_dialog(ctx: &PageContext, kebabs: &Rc<KebabBinding>) -> Result<(), JsValue> {
    let modal = Rc::new(DomModal::by_id("delete-order-modal")?);
    let desk = DeleteDesk::<OrderId>::new(
        ctx.host.clone(),
        modal.clone(),
        ctx.config.order_delete_base(),
        ctx.config.csrf_token.as_str(),
    );
    let desk = bind_delete_dialog(
        &modal,
        desk,
        &["delete-order-modal-close", "delete-order-cancel"],
        "delete-order-confirm",
    )?;

    for btn in dom::query_all(".delete-order-btn") {
        let Some(order_id) = dom::data_parsed::<OrderId>(&btn, "order-id") else {
            continue;
        };
        let number = dom::data(&btn, "order-number").unwrap_or_default();
        let (desk, kebabs) = (desk.clone(), kebabs.clone());
        listen(&btn, "click", move |event| {
            event.prevent_default();
            kebabs.close_all();
            desk.open(order_id, &[("delete-order-number", number.as_str())]);
        });
    }
    Ok(())
}

fn mount_bulk_actions(ctx: &PageContext) -> Result<(), JsValue> {
    let select_all = dom::require::<HtmlInputElement>("select-all")?;
    let bar = dom::require::<Element>("bulk-actions")?;
    let action = dom::require::<HtmlSelectElement>("bulk-action")?;
    let apply = dom::require::<HtmlButtonElement>("apply-bulk-action")?;

    let boxes: Vec<(OrderId, HtmlInputElement)> = dom::query_all(".order-checkbox")
        .into_iter()
        .filter_map(|el| {
            let input = el.dyn_into::<HtmlInputElement>().ok()?;
            let raw = input.value();
            match raw.parse::<OrderId>() {
                Ok(id) => Some((id, input)),
                Err(err) => {
                    warn!(value = %raw, error = %err, "order checkbox without a numeric id, skipped");
                    None
                }
            }
        })
        .collect();
    let selection = Rc::new(RefCell::new(BulkSelection::new(
        boxes.iter().map(|(id, _)| *id),
    )));
    let boxes = Rc::new(boxes);

    let render = {
        let (selection, select_all, bar) = (selection.clone(), select_all.clone(), bar.clone());
        move || {
            let selection = selection.borrow();
            dom::show(&bar, selection.bar_visible(), "flex");
            select_all.set_checked(selection.all_selected());
        }
    };

    {
        let (selection, boxes, render, target) =
            (selection.clone(), boxes.clone(), render.clone(), select_all.clone());
        listen(&select_all, "change", move |_| {
            let checked = target.checked();
            selection.borrow_mut().set_all(checked);
            for (_, input) in boxes.iter() {
                input.set_checked(checked);
            }
            render();
        });
    }

    for (id, input) in boxes.iter() {
        let (id, selection, render, target) = (*id, selection.clone(), render.clone(), input.clone());
        listen(input, "change", move |_| {
            selection.borrow_mut().set(id, target.checked());
            render();
        });
    }

    let desk: Rc<BulkDesk<Transport>> = Rc::new(BulkDesk::new(ctx.client.clone(), ctx.host.clone()));
    let target = apply.clone();
    listen_async(&apply, "click", move |_| {
        let desk = desk.clone();
        let button = DomButton(target.clone());
        let raw_action = action.value();
        let selected = selection.borrow().selected();
        async move {
            desk.apply(&raw_action, selected, &button).await;
        }
    });
    Ok(())
}

/// Admin order detail: status select and print button.
fn mount_detail(ctx: &PageContext) {
    if let Some(print) = dom::by_id("print-order") {
        let host = ctx.host.clone();
        listen(&print, "click", move |_| host.print());
    }

    let (Some(button), Some(select)) = (
        dom::by_id_typed::<HtmlButtonElement>("update-status-btn"),
        dom::by_id_typed::<HtmlSelectElement>("update-status"),
    ) else {
        return;
    };
    let ctx = ctx.clone();
    let target = button.clone();
    listen_async(&button, "click", move |_| {
        let (ctx, button, raw) = (ctx.clone(), DomButton(target.clone()), select.value());
        async move {
            update_detail_status(&ctx.client, ctx.host.as_ref(), &raw, &button).await;
        }
    });
}
