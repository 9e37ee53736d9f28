//! Customer account page: profile and password forms confirmed in a dialog
//! and posted in the background.

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::client::ShopClient;
use crate::error::{ClientError, ClientResult};
use crate::host::{Host, Toast};
use crate::modal::{Modal, ModalView};
use crate::transport::ShopTransport;
use std::rc::Rc;
use tracing::warn;

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_password_change(new_password: &str, confirmation: &str) -> ClientResult<()> {
    if new_password != confirmation {
        return Err(ClientError::Validation("Passwords do not match".into()));
    }
    if new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ClientError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }
    Ok(())
}

/// Input type after clicking a visibility toggle.
pub fn toggled_input_type(current: &str) -> &'static str {
    if current == "password" { "text" } else { "password" }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountFormKind {
    Profile,
    Password,
}

impl AccountFormKind {
    fn busy_text(&self) -> &'static str {
        match self {
            AccountFormKind::Profile => "Saving...",
            AccountFormKind::Password => "Updating...",
        }
    }

    fn success_message(&self) -> &'static str {
        match self {
            AccountFormKind::Profile => "Profile updated successfully!",
            AccountFormKind::Password => "Password updated successfully!",
        }
    }

    fn rejected_fallback(&self) -> &'static str {
        match self {
            AccountFormKind::Profile => "Failed to update profile",
            AccountFormKind::Password => "Failed to update password",
        }
    }

    fn transport_fallback(&self) -> &'static str {
        match self {
            AccountFormKind::Profile => "An error occurred while saving profile",
            AccountFormKind::Password => "An error occurred while updating password",
        }
    }
}

pub trait AccountFormView {
    /// The form's `action` attribute.
    fn action(&self) -> String;
    fn fields(&self) -> Vec<(String, String)>;
    fn reset(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountOutcome {
    Saved,
    Failed,
    NotOpen,
}

pub struct AccountDesk<T> {
    kind: AccountFormKind,
    client: ShopClient<T>,
    host: Rc<dyn Host>,
    form: Rc<dyn AccountFormView>,
    modal: Modal<()>,
}

impl<T: ShopTransport> AccountDesk<T> {
    pub fn new(
        kind: AccountFormKind,
        client: ShopClient<T>,
        host: Rc<dyn Host>,
        form: Rc<dyn AccountFormView>,
        view: Rc<dyn ModalView>,
    ) -> Self {
        Self {
            kind,
            client,
            host,
            form,
            modal: Modal::new(view),
        }
    }

    pub fn modal(&self) -> &Modal<()> {
        &self.modal
    }

    /// Form submit event; the native submit is always suppressed. The
    /// password form is checked before the dialog opens.
    pub fn on_submit(&self, passwords: Option<(&str, &str)>) -> bool {
        let checked = passwords
            .map_or(Ok(()), |(new_password, confirmation)| {
                validate_password_change(new_password, confirmation)
            });
        if let Err(err) = checked {
            self.host.notify(Toast::error(err.user_message("", "")));
            return false;
        }
        self.modal.open(());
        true
    }

    pub fn cancel(&self) {
        self.modal.cancel();
    }

    pub async fn confirm(&self, submit_button: &dyn BusyControl) -> AccountOutcome {
        if self.modal.begin_confirm().is_none() {
            return AccountOutcome::NotOpen;
        }
        let _busy = BusyGuard::engage(submit_button, &spinner_label(self.kind.busy_text()));
        self.modal.finish();

        let result = self
            .client
            .submit_account_form(&self.form.action(), self.form.fields())
            .await;
        match result {
            Ok(_) => {
                self.host.notify(Toast::success(self.kind.success_message()));
                if self.kind == AccountFormKind::Password {
                    self.form.reset();
                }
                AccountOutcome::Saved
            }
            Err(err) => {
                warn!(form = ?self.kind, error = %err, "account form failed");
                self.host.notify(Toast::error(err.user_message(
                    self.kind.rejected_fallback(),
                    self.kind.transport_fallback(),
                )));
                AccountOutcome::Failed
            }
        }
    }
}
