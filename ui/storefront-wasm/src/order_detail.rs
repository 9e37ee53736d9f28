//! Customer order detail: the cancel-order dialog.

use crate::events::{listen, listen_async};
use crate::modal::DomModal;
use crate::shell::DomButton;
use crate::{PageContext, Transport, dom};
use shop_client_core::order_cancel::OrderCanceller;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlButtonElement, KeyboardEvent};

pub fn mount(ctx: &PageContext) -> Result<(), JsValue> {
    let (Some(open_button), Some(root)) = (
        dom::by_id("cancel-order-btn"),
        dom::by_id("cancel-order-modal"),
    ) else {
        return Ok(());
    };
    let modal = Rc::new(DomModal::new(root).locking_scroll());
    let keep = dom::require::<HtmlButtonElement>("modal-cancel-btn")?;
    let confirm = dom::require::<HtmlButtonElement>("modal-confirm-btn")?;

    let canceller: Rc<OrderCanceller<Transport>> = Rc::new(OrderCanceller::new(
        ctx.client.clone(),
        ctx.host.clone(),
        modal.clone(),
    ));

    let c = canceller.clone();
    listen(&open_button, "click", move |_| {
        c.open();
    });

    let c = canceller.clone();
    let close = move || c.cancel();
    listen(&keep, "click", {
        let close = close.clone();
        move |_| close()
    });
    if let Some(backdrop) = modal.backdrop(".cancel-modal-backdrop") {
        listen(&backdrop, "click", move |_| close());
    }

    let c = canceller.clone();
    listen(&dom::document(), "keydown", move |event| {
        if let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) {
            c.on_key(&key);
        }
    });

    let target = confirm.clone();
    listen_async(&confirm, "click", move |_| {
        let canceller = canceller.clone();
        let (confirm, keep) = (DomButton(target.clone()), DomButton(keep.clone()));
        async move {
            canceller.confirm(&confirm, &keep).await;
        }
    });
    Ok(())
}
