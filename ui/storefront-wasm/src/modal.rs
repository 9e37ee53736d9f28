//! Dialog elements as [`ModalView`]s.
//!
//! A dialog is shown by toggling `show` on its root. Text slots and fields are
//! resolved by element id at call time, so a slot missing from one template
//! is simply skipped.

use crate::dom;
use crate::events;
use crate::shell::DomButton;
use shop_client_core::ModalView;
use shop_client_core::delete::DeleteDesk;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement};

pub struct DomModal {
    root: Element,
    lock_scroll: bool,
}

impl DomModal {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            lock_scroll: false,
        }
    }

    pub fn by_id(id: &str) -> Result<Self, JsValue> {
        Ok(Self::new(dom::require::<Element>(id)?))
    }

    /// Freeze page scrolling while the dialog is open.
    pub fn locking_scroll(mut self) -> Self {
        self.lock_scroll = true;
        self
    }

    /// Backdrop element inside the dialog (`.modal-backdrop` by default).
    pub fn backdrop(&self, selector: &str) -> Option<Element> {
        dom::query_within(&self.root, selector)
    }

    /// Wire close button, cancel button and backdrop to `close`.
    pub fn bind_dismiss(&self, close_ids: &[&str], close: impl Fn() + Clone + 'static) {
        let mut triggers: Vec<Option<Element>> = close_ids.iter().map(|id| dom::by_id(id)).collect();
        triggers.push(self.backdrop(".modal-backdrop"));
        events::bind_dismiss(&triggers, close);
    }

    fn set_body_overflow(&self, value: &str) {
        if let Some(body) = dom::document().body() {
            let _ = body.style().set_property("overflow", value);
        }
    }
}

impl ModalView for DomModal {
    fn show(&self) {
        dom::add_class(&self.root, "show");
        if self.lock_scroll {
            self.set_body_overflow("hidden");
        }
    }

    fn hide(&self) {
        dom::remove_class(&self.root, "show");
        if self.lock_scroll {
            self.set_body_overflow("");
        }
    }

    fn set_text(&self, slot: &str, text: &str) {
        dom::set_text_by_id(slot, text);
    }

    fn set_field(&self, slot: &str, value: &str) {
        dom::set_control_value(slot, value);
    }
}

/// Dismiss and confirm wiring shared by the delete dialogs. Returns the desk
/// for the row buttons that open it.
pub fn bind_delete_dialog<I: Clone + Display + 'static>(
    modal: &DomModal,
    desk: DeleteDesk<I>,
    close_ids: &[&str],
    confirm_id: &str,
) -> Result<Rc<DeleteDesk<I>>, JsValue> {
    let desk = Rc::new(desk);
    let confirm = dom::require::<HtmlButtonElement>(confirm_id)?;

    let d = desk.clone();
    modal.bind_dismiss(close_ids, move || d.cancel());

    let d = desk.clone();
    let button = DomButton(confirm.clone());
    events::listen(&confirm, "click", move |_| {
        d.confirm(&button);
    });
    Ok(desk)
}
