//! Customer order cancellation from the order detail page.

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::client::ShopClient;
use crate::error::ClientError;
use crate::host::{Host, Toast};
use crate::modal::{Modal, ModalState, ModalView};
use crate::transport::ShopTransport;
use shop_api_types::OrderId;
use std::rc::Rc;
use tracing::{info, warn};

pub const CANCEL_RELOAD_DELAY_MS: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    Failed,
    NotOpen,
}

pub struct OrderCanceller<T> {
    client: ShopClient<T>,
    host: Rc<dyn Host>,
    modal: Modal<OrderId>,
}

impl<T: ShopTransport> OrderCanceller<T> {
    pub fn new(client: ShopClient<T>, host: Rc<dyn Host>, view: Rc<dyn ModalView>) -> Self {
        Self {
            client,
            host,
            modal: Modal::new(view),
        }
    }

    pub fn modal(&self) -> &Modal<OrderId> {
        &self.modal
    }

    /// Opens for the page's order. Returns `false` when the page has none.
    pub fn open(&self) -> bool {
        match self.client.config().order_id {
            Some(order_id) => {
                self.modal.open(order_id);
                true
            }
            None => {
                warn!("cancel requested on a page without an order id");
                false
            }
        }
    }

    pub fn cancel(&self) {
        self.modal.cancel();
    }

    /// Escape closes the dialog while it is open and idle.
    pub fn on_key(&self, key: &str) -> bool {
        if key == "Escape" && self.modal.state() == ModalState::Open {
            self.modal.cancel();
            return true;
        }
        false
    }

    pub async fn confirm(
        &self,
        confirm_button: &dyn BusyControl,
        keep_button: &dyn BusyControl,
    ) -> CancelOutcome {
        let Some(order_id) = self.modal.begin_confirm() else {
            return CancelOutcome::NotOpen;
        };
        let confirm_busy = BusyGuard::engage(confirm_button, &spinner_label("Cancelling..."));
        let keep_busy = BusyGuard::disable(keep_button);

        match self.client.cancel_order(order_id).await {
            Ok(_) => {
                info!(%order_id, "order cancelled");
                confirm_busy.hold();
                keep_busy.hold();
                self.modal.finish();
                self.host
                    .notify(Toast::success("Order cancelled successfully").titled("Success"));
                self.host.sleep(CANCEL_RELOAD_DELAY_MS).await;
                self.host.reload();
                CancelOutcome::Cancelled
            }
            Err(err) => {
                warn!(%order_id, error = %err, "order cancel failed");
                self.modal.fail_confirm();
                let message = match &err {
                    ClientError::Http { .. } => err.to_string(),
                    _ => err.user_message(
                        "Failed to cancel order",
                        "An error occurred while cancelling the order",
                    ),
                };
                self.host.notify(Toast::error(message).titled("Error"));
                CancelOutcome::Failed
            }
        }
    }
}
