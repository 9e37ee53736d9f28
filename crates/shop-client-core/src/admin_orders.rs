//! Admin order management: status dialog, order detail status update, bulk
//! status changes over the selected rows.

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::client::ShopClient;
use crate::error::{ClientError, ClientResult};
use crate::host::{Host, Toast};
use crate::modal::{Modal, ModalView};
use crate::transport::ShopTransport;
use shop_api_types::{OrderId, OrderStatus};
use std::rc::Rc;
use tracing::{info, warn};

pub const ORDER_NUMBER_SLOT: &str = "status-order-number";
pub const STATUS_FIELD: &str = "new-status";
pub const STATUS_RELOAD_DELAY_MS: u32 = 500;
pub const BULK_CANCEL_PROMPT: &str = "Are you sure you want to cancel the selected orders?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Updated,
    Declined,
    Invalid,
    Failed,
    NotOpen,
}

fn parse_status(raw: &str, empty_message: &str) -> ClientResult<OrderStatus> {
    if raw.trim().is_empty() {
        return Err(ClientError::Validation(empty_message.to_owned()));
    }
    raw.parse::<OrderStatus>()
        .map_err(|_| ClientError::Validation(format!("Unknown order status: {raw}")))
}

// ── Status dialog ──

pub struct StatusDesk<T> {
    client: ShopClient<T>,
    host: Rc<dyn Host>,
    modal: Modal<OrderId>,
}

impl<T: ShopTransport> StatusDesk<T> {
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

    /// Open with the row's current status preselected.
    pub fn open(&self, order_id: OrderId, order_number: &str, current: Option<OrderStatus>) {
        let view = self.modal.view();
        view.set_text(ORDER_NUMBER_SLOT, order_number);
        if let Some(current) = current {
            view.set_field(STATUS_FIELD, current.as_str());
        }
        self.modal.open(order_id);
    }

    pub fn cancel(&self) {
        self.modal.cancel();
    }

    pub async fn confirm(&self, raw_status: &str, button: &dyn BusyControl) -> StatusOutcome {
        let Some(order_id) = self.modal.begin_confirm() else {
            return StatusOutcome::NotOpen;
        };
        let status = match parse_status(raw_status, "Please select a status") {
            Ok(status) => status,
            Err(err) => {
                self.modal.fail_confirm();
                self.host.notify(Toast::error(err.user_message("", "")));
                return StatusOutcome::Invalid;
            }
        };

        let guard = BusyGuard::engage(button, &spinner_label("Updating..."));
        match self.client.update_order_status(order_id, status).await {
            Ok(_) => {
                info!(%order_id, status = status.as_str(), "order status updated");
                guard.hold();
                self.host
                    .notify(Toast::success("Order status updated successfully"));
                self.host.sleep(STATUS_RELOAD_DELAY_MS).await;
                self.host.reload();
                StatusOutcome::Updated
            }
            Err(err) => {
                warn!(%order_id, error = %err, "order status update failed");
                self.modal.fail_confirm();
                self.host.notify(Toast::error(
                    err.user_message("Failed to update status", "An error occurred"),
                ));
                StatusOutcome::Failed
            }
        }
    }
}

/// Status select on the admin order detail page.
pub async fn update_detail_status<T: ShopTransport>(
    client: &ShopClient<T>,
    host: &dyn Host,
    raw_status: &str,
    button: &dyn BusyControl,
) -> StatusOutcome {
    let Some(order_id) = client.config().order_id else {
        warn!("order detail page without an order id");
        host.notify(Toast::error("Failed to update status"));
        return StatusOutcome::Invalid;
    };
    let status = match parse_status(raw_status, "Please select a status") {
        Ok(status) => status,
        Err(err) => {
            host.notify(Toast::error(err.user_message("", "")));
            return StatusOutcome::Invalid;
        }
    };

    let guard = BusyGuard::engage(button, &spinner_label("Updating..."));
    match client.update_order_status(order_id, status).await {
        Ok(_) => {
            guard.hold();
            host.reload();
            StatusOutcome::Updated
        }
        Err(err) => {
            warn!(%order_id, error = %err, "order status update failed");
            host.notify(Toast::error(
                err.user_message("Failed to update status", "An error occurred"),
            ));
            StatusOutcome::Failed
        }
    }
}

// ── Bulk actions ──

/// Row checkboxes of the orders table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkSelection {
    rows: Vec<(OrderId, bool)>,
}

impl BulkSelection {
    pub fn new(ids: impl IntoIterator<Item = OrderId>) -> Self {
        Self {
            rows: ids.into_iter().map(|id| (id, false)).collect(),
        }
    }

    pub fn set_all(&mut self, checked: bool) {
        for (_, row) in &mut self.rows {
            *row = checked;
        }
    }

    pub fn set(&mut self, id: OrderId, checked: bool) {
        if let Some((_, row)) = self.rows.iter_mut().find(|(row_id, _)| *row_id == id) {
            *row = checked;
        }
    }

    pub fn selected(&self) -> Vec<OrderId> {
        self.rows
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(id, _)| *id)
            .collect()
    }

    /// The bulk action bar shows while at least one row is checked.
    pub fn bar_visible(&self) -> bool {
        self.rows.iter().any(|(_, checked)| *checked)
    }

    pub fn all_selected(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|(_, checked)| *checked)
    }
}

pub struct BulkDesk<T> {
    client: ShopClient<T>,
    host: Rc<dyn Host>,
}

impl<T: ShopTransport> BulkDesk<T> {
    pub fn new(client: ShopClient<T>, host: Rc<dyn Host>) -> Self {
        Self { client, host }
    }

    pub async fn apply(
        &self,
        raw_action: &str,
        selected: Vec<OrderId>,
        button: &dyn BusyControl,
    ) -> StatusOutcome {
        let status = match self.validate(raw_action, &selected) {
            Ok(status) => status,
            Err(err) => {
                self.host.notify(Toast::error(err.user_message("", "")));
                return StatusOutcome::Invalid;
            }
        };
        if status == OrderStatus::Cancelled && !self.host.confirm(BULK_CANCEL_PROMPT) {
            return StatusOutcome::Declined;
        }

        let count = selected.len();
        let guard = BusyGuard::engage(button, &spinner_label(""));
        match self.client.bulk_update_status(selected, status).await {
            Ok(_) => {
                info!(count, status = status.as_str(), "bulk status update applied");
                guard.hold();
                self.host.reload();
                StatusOutcome::Updated
            }
            Err(err) => {
                warn!(count, error = %err, "bulk status update failed");
                self.host.notify(Toast::error(
                    err.user_message("Failed to update orders", "An error occurred"),
                ));
                StatusOutcome::Failed
            }
        }
    }

    fn validate(&self, raw_action: &str, selected: &[OrderId]) -> ClientResult<OrderStatus> {
        let status = parse_status(raw_action, "Please select an action")?;
        if selected.is_empty() {
            return Err(ClientError::Validation(
                "Please select at least one order".into(),
            ));
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShopConfig;
    use crate::modal::ModalState;
    use crate::testing::{
        FakeButton, FakeTransport, RecordingHost, RecordingModal, config_with_all_endpoints,
    };
    use serde_json::json;

    fn client(transport: &Rc<FakeTransport>) -> ShopClient<Rc<FakeTransport>> {
        ShopClient::new(transport.clone(), config_with_all_endpoints())
    }

    #[tokio::test]
    async fn status_dialog_updates_then_reloads() {
        let (transport, host, view) = (
            FakeTransport::new(),
            RecordingHost::new(),
            RecordingModal::new(),
        );
        let desk = StatusDesk::new(client(&transport), host.clone(), view.clone());
        let button = FakeButton::new("Update Status");
        transport.respond(json!({"success": true}));

        desk.open(OrderId(14), "ORD-0014", Some(OrderStatus::Pending));
        assert_eq!(view.text(ORDER_NUMBER_SLOT).as_deref(), Some("ORD-0014"));
        assert_eq!(view.field(STATUS_FIELD).as_deref(), Some("pending"));

        assert_eq!(desk.confirm("shipped", &button).await, StatusOutcome::Updated);
        assert_eq!(
            transport.calls()[0].body,
            Some(json!({"order_id": 14, "status": "shipped"}))
        );
        assert_eq!(host.sleeps(), vec![STATUS_RELOAD_DELAY_MS]);
        assert_eq!(host.reloads(), 1);
    }

    #[tokio::test]
    async fn failed_status_update_keeps_the_dialog_for_retry() {
        let (transport, host) = (FakeTransport::new(), RecordingHost::new());
        let desk = StatusDesk::new(client(&transport), host.clone(), RecordingModal::new());
        let button = FakeButton::new("Update Status");
        transport.respond(json!({"success": false}));

        desk.open(OrderId(14), "ORD-0014", None);
        assert_eq!(desk.confirm("delivered", &button).await, StatusOutcome::Failed);

        assert_eq!(desk.modal().state(), ModalState::Open);
        assert_eq!(desk.modal().pending(), Some(OrderId(14)));
        assert_eq!(button.current_label(), "Update Status");
        assert!(!button.is_disabled());
        assert_eq!(
            host.last_toast().map(|t| t.message),
            Some("Failed to update status".into())
        );
        assert_eq!(host.reloads(), 0);
    }

    #[tokio::test]
    async fn detail_page_uses_configured_order_id() {
        let transport = FakeTransport::new();
        let host = RecordingHost::new();
        let config = ShopConfig {
            order_id: Some(OrderId(3)),
            ..(*config_with_all_endpoints()).clone()
        };
        let client = ShopClient::new(transport.clone(), Rc::new(config));
        transport.respond(json!({"success": true}));

        let outcome =
            update_detail_status(&client, host.as_ref(), "processing", &FakeButton::new("Update"))
                .await;

        assert_eq!(outcome, StatusOutcome::Updated);
        assert_eq!(
            transport.calls()[0].body,
            Some(json!({"order_id": 3, "status": "processing"}))
        );
        assert_eq!(host.reloads(), 1);
    }

    #[test]
    fn selection_drives_the_bulk_bar() {
        let mut selection = BulkSelection::new([OrderId(1), OrderId(2), OrderId(3)]);
        assert!(!selection.bar_visible());

        selection.set_all(true);
        assert!(selection.all_selected());
        assert_eq!(selection.selected().len(), 3);

        selection.set(OrderId(2), false);
        assert_eq!(selection.selected(), vec![OrderId(1), OrderId(3)]);
        assert!(selection.bar_visible());

        selection.set_all(false);
        assert!(!selection.bar_visible());
    }

    #[tokio::test]
    async fn bulk_validation_blocks_the_request() {
        let (transport, host) = (FakeTransport::new(), RecordingHost::new());
        let desk = BulkDesk::new(client(&transport), host.clone());
        let button = FakeButton::new("Apply");

        assert_eq!(
            desk.apply("", vec![OrderId(1)], &button).await,
            StatusOutcome::Invalid
        );
        assert_eq!(
            host.last_toast().map(|t| t.message),
            Some("Please select an action".into())
        );

        assert_eq!(
            desk.apply("shipped", vec![], &button).await,
            StatusOutcome::Invalid
        );
        assert_eq!(
            host.last_toast().map(|t| t.message),
            Some("Please select at least one order".into())
        );
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn bulk_cancel_needs_explicit_confirmation() {
        let (transport, host) = (FakeTransport::new(), RecordingHost::new());
        let desk = BulkDesk::new(client(&transport), host.clone());
        let button = FakeButton::new("Apply");

        host.answer_confirm(false);
        assert_eq!(
            desk.apply("cancelled", vec![OrderId(1)], &button).await,
            StatusOutcome::Declined
        );
        assert_eq!(host.prompts(), vec![BULK_CANCEL_PROMPT.to_owned()]);
        assert!(transport.calls().is_empty());

        host.answer_confirm(true);
        transport.respond(json!({"success": true}));
        assert_eq!(
            desk.apply("cancelled", vec![OrderId(1), OrderId(4)], &button).await,
            StatusOutcome::Updated
        );
        assert_eq!(
            transport.calls()[0].body,
            Some(json!({"order_ids": [1, 4], "status": "cancelled"}))
        );
        assert_eq!(host.reloads(), 1);
    }

    #[tokio::test]
    async fn bulk_failure_restores_the_button() {
        let (transport, host) = (FakeTransport::new(), RecordingHost::new());
        let desk = BulkDesk::new(client(&transport), host.clone());
        let button = FakeButton::new("Apply");
        transport.fail(ClientError::Transport("offline".into()));

        assert_eq!(
            desk.apply("shipped", vec![OrderId(2)], &button).await,
            StatusOutcome::Failed
        );
        assert_eq!(button.current_label(), "Apply");
        assert!(!button.is_disabled());
        assert_eq!(
            host.last_toast().map(|t| t.message),
            Some("An error occurred".into())
        );
    }
}
