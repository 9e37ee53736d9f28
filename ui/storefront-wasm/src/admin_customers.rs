//! Admin customers list: the delete dialog.

use crate::events::listen;
use crate::kebab::KebabBinding;
use crate::modal::{DomModal, bind_delete_dialog};
use crate::{PageContext, dom};
use shop_client_core::delete::{CUSTOMERS_BASE, DeleteDesk};
use shop_client_core::types::CustomerId;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

pub fn mount(ctx: &PageContext, kebabs: &Rc<KebabBinding>) -> Result<(), JsValue> {
    let buttons = dom::query_all(".delete-customer-btn");
    if buttons.is_empty() {
        return Ok(());
    }

    let modal = Rc::new(DomModal::by_id("delete-modal")?);
    let desk = DeleteDesk::<CustomerId>::new(
        ctx.host.clone(),
        modal.clone(),
        CUSTOMERS_BASE,
        ctx.config.csrf_token.as_str(),
    );
    let desk = bind_delete_dialog(&modal, desk, &["modal-close", "cancel-delete"], "confirm-delete")?;

    for btn in buttons {
        let Some(customer_id) = dom::data_parsed::<CustomerId>(&btn, "customer-id") else {
            continue;
        };
        let name = dom::data(&btn, "customer-name").unwrap_or_default();
        let email = dom::data(&btn, "customer-email").unwrap_or_default();
        let (desk, kebabs) = (desk.clone(), kebabs.clone());
        listen(&btn, "click", move |event| {
            event.prevent_default();
            kebabs.close_all();
            desk.open(
                customer_id,
                &[
                    ("delete-customer-name", name.as_str()),
                    ("delete-customer-email", email.as_str()),
                ],
            );
        });
    }
    Ok(())
}
