//! Checkout: validate, confirm in a dialog, submit the whole form once.

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::client::ShopClient;
use crate::host::{Host, Toast};
use crate::modal::{Modal, ModalView};
use crate::transport::ShopTransport;
use std::rc::Rc;
use tracing::{debug, warn};

pub const PAYMENT_SLOT: &str = "confirm-payment-method";
pub const DEFAULT_PAYMENT_LABEL: &str = "Credit Card";
pub const REDIRECT_DELAY_MS: u32 = 1000;

pub trait CheckoutForm {
    /// Native constraint validation.
    fn check_validity(&self) -> bool;
    /// Show the browser's validation messages.
    fn report_validity(&self);
    /// Visible label of the selected payment method.
    fn payment_label(&self) -> Option<String>;
    /// Every named control of the form, payment method included.
    fn fields(&self) -> Vec<(String, String)>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Placed { redirect: String },
    Failed,
    NotOpen,
}

pub struct CheckoutSubmitter<T> {
    client: ShopClient<T>,
    host: Rc<dyn Host>,
    form: Rc<dyn CheckoutForm>,
    modal: Modal<()>,
}

impl<T: ShopTransport> CheckoutSubmitter<T> {
    pub fn new(
        client: ShopClient<T>,
        host: Rc<dyn Host>,
        form: Rc<dyn CheckoutForm>,
        modal_view: Rc<dyn ModalView>,
    ) -> Self {
        Self {
            client,
            host,
            form,
            modal: Modal::new(modal_view),
        }
    }

    pub fn modal(&self) -> &Modal<()> {
        &self.modal
    }

    /// "Place order": an invalid form surfaces native validation and never
    /// opens the dialog.
    pub fn request_confirmation(&self) -> bool {
        if !self.form.check_validity() {
            self.form.report_validity();
            return false;
        }
        let label = self
            .form
            .payment_label()
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_LABEL.to_owned());
        self.modal.view().set_text(PAYMENT_SLOT, &label);
        self.modal.open(());
        true
    }

    pub fn cancel(&self) {
        self.modal.cancel();
    }

    pub async fn confirm(&self, button: &dyn BusyControl) -> CheckoutOutcome {
        if self.modal.begin_confirm().is_none() {
            return CheckoutOutcome::NotOpen;
        }
        let guard = BusyGuard::engage(button, &spinner_label("Processing..."));
        let fields = self.form.fields();
        debug!(fields = fields.len(), "submitting checkout");

        match self.client.checkout(fields).await {
            Ok(resp) => {
                self.modal.finish();
                self.host.notify(Toast::success("Order placed successfully!"));
                guard.hold();

                let redirect = resp
                    .redirect
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| self.client.config().orders_page().to_owned());
                self.host.sleep(REDIRECT_DELAY_MS).await;
                self.host.navigate(&redirect);
                CheckoutOutcome::Placed { redirect }
            }
            Err(err) => {
                warn!(error = %err, "checkout failed");
                drop(guard);
                self.modal.finish();
                self.host.notify(Toast::error(
                    err.user_message("Failed to place order", "An error occurred"),
                ));
                CheckoutOutcome::Failed
            }
        }
    }
}
