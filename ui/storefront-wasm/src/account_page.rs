//! Customer account page: password visibility toggles and the profile and
//! password forms, both confirmed in a dialog and saved over AJAX.

use crate::events::{listen, listen_async};
use crate::modal::DomModal;
use crate::shell::DomButton;
use crate::{PageContext, Transport, dom};
use shop_client_core::account::{AccountDesk, AccountFormKind, AccountFormView, toggled_input_type};
use std::rc::Rc;
use tracing::warn;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlButtonElement, HtmlFormElement, HtmlInputElement};

struct DomAccountForm {
    form: HtmlFormElement,
}

impl AccountFormView for DomAccountForm {
    fn action(&self) -> String {
        self.form.get_attribute("action").unwrap_or_default()
    }

    fn fields(&self) -> Vec<(String, String)> {
        dom::form_fields(&self.form)
    }

    fn reset(&self) {
        self.form.reset();
    }
}

/// Element ids of one confirm-before-save form.
struct AccountIds {
    form: &'static str,
    modal: &'static str,
    close: &'static str,
    cancel: &'static str,
    confirm: &'static str,
}

const PROFILE: AccountIds = AccountIds {
    form: "profile-form",
    modal: "profile-modal",
    close: "profile-modal-close",
    cancel: "profile-cancel",
    confirm: "profile-confirm",
};

const PASSWORD: AccountIds = AccountIds {
    form: "password-form",
    modal: "password-modal",
    close: "password-modal-close",
    cancel: "password-cancel",
    confirm: "password-confirm",
};

pub fn mount(ctx: &PageContext) -> Result<(), JsValue> {
    mount_password_toggles();
    mount_form(ctx, AccountFormKind::Profile, &PROFILE)?;
    mount_form(ctx, AccountFormKind::Password, &PASSWORD)
}

fn mount_password_toggles() {
    for btn in dom::query_all(".toggle-password") {
        let target = btn.clone();
        listen(&btn, "click", move |event| {
            event.prevent_default();
            let Some(input) = dom::data(&target, "target")
                .and_then(|id| dom::by_id_typed::<HtmlInputElement>(&id))
            else {
                return;
            };
            let next = toggled_input_type(&input.type_());
            input.set_type(next);
            let revealed = next == "text";
            if let Some(open) = dom::query_within(&target, ".eye-open") {
                dom::show(&open, !revealed, "block");
            }
            if let Some(closed) = dom::query_within(&target, ".eye-closed") {
                dom::show(&closed, revealed, "block");
            }
        });
    }
}

fn mount_form(ctx: &PageContext, kind: AccountFormKind, ids: &AccountIds) -> Result<(), JsValue> {
    let Some(form) = dom::by_id_typed::<HtmlFormElement>(ids.form) else {
        return Ok(());
    };
    let modal = Rc::new(DomModal::by_id(ids.modal)?);
    let confirm = dom::require::<HtmlButtonElement>(ids.confirm)?;

    let desk: Rc<AccountDesk<Transport>> = Rc::new(AccountDesk::new(
        kind,
        ctx.client.clone(),
        ctx.host.clone(),
        Rc::new(DomAccountForm { form: form.clone() }),
        modal.clone(),
    ));

    let d = desk.clone();
    listen(&form, "submit", move |event| {
        event.prevent_default();
        match kind {
            AccountFormKind::Password => {
                let new_password = dom::control_value("new_password");
                let confirmation = dom::control_value("confirm_password");
                d.on_submit(Some((new_password.as_str(), confirmation.as_str())));
            }
            AccountFormKind::Profile => {
                d.on_submit(None);
            }
        }
    });

    let d = desk.clone();
    modal.bind_dismiss(&[ids.close, ids.cancel], move || d.cancel());

    listen_async(&confirm, "click", move |_| {
        let desk = desk.clone();
        let button = DomButton::submit_of(&form);
        async move {
            match button {
                Some(button) => {
                    desk.confirm(&button).await;
                }
                None => warn!("account form has no submit button"),
            }
        }
    });
    Ok(())
}
