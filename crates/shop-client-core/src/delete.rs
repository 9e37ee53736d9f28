//! Delete-confirmation dialogs that finish with a conventional form post
//! (orders, products, customers).

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::forms::PostForm;
use crate::host::Host;
use crate::modal::{Modal, ModalView};
use std::fmt::Display;
use std::rc::Rc;
use tracing::debug;

pub const PRODUCTS_BASE: &str = "/products/";
pub const CUSTOMERS_BASE: &str = "/customers/";

pub struct DeleteDesk<I> {
    host: Rc<dyn Host>,
    modal: Modal<I>,
    base: String,
    csrf_token: String,
}

impl<I: Clone + Display> DeleteDesk<I> {
    pub fn new(
        host: Rc<dyn Host>,
        view: Rc<dyn ModalView>,
        base: impl Into<String>,
        csrf_token: impl Into<String>,
    ) -> Self {
        Self {
            host,
            modal: Modal::new(view),
            base: base.into(),
            csrf_token: csrf_token.into(),
        }
    }

    pub fn modal(&self) -> &Modal<I> {
        &self.modal
    }

    /// Open for `id`, filling the dialog's text slots (name, email, number).
    pub fn open(&self, id: I, slots: &[(&str, &str)]) {
        for (slot, text) in slots {
            self.modal.view().set_text(slot, text);
        }
        self.modal.open(id);
    }

    pub fn cancel(&self) {
        self.modal.cancel();
    }

    /// Submit the delete form. The button stays busy; the page is leaving.
    pub fn confirm(&self, button: &dyn BusyControl) -> Option<PostForm> {
        let id = self.modal.begin_confirm()?;
        BusyGuard::engage(button, &spinner_label("Deleting...")).hold();

        let form = PostForm::delete(&self.base, &id, &self.csrf_token);
        debug!(action = form.action.as_str(), "submitting delete form");
        self.host.submit_form(form.clone());
        self.modal.finish();
        Some(form)
    }
}
