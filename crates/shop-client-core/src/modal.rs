//! Confirmation dialogs.
//!
//! States: `Closed` → `Open` → `Confirming` → `Closed`.
//! The target of the destructive action lives in a single
//! [`PendingAction`] slot: set on open, handed out once on confirm, cleared
//! on every close path. Nothing fires without passing through
//! [`Modal::begin_confirm`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction<T> {
    Idle,
    PendingConfirmation(T),
}

impl<T> PendingAction<T> {
    pub fn target(&self) -> Option<&T> {
        match self {
            PendingAction::Idle => None,
            PendingAction::PendingConfirmation(target) => Some(target),
        }
    }

    pub fn take(&mut self) -> Option<T> {
        match std::mem::replace(self, PendingAction::Idle) {
            PendingAction::Idle => None,
            PendingAction::PendingConfirmation(target) => Some(target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalState {
    Closed,
    Open,
    Confirming,
}

/// Rendering side of a dialog.
pub trait ModalView {
    fn show(&self);
    fn hide(&self);
    /// Fill a text slot (element id) inside the dialog.
    fn set_text(&self, slot: &str, text: &str);
    /// Set a form control value inside the dialog.
    fn set_field(&self, _slot: &str, _value: &str) {}
}

pub struct Modal<T> {
    view: Rc<dyn ModalView>,
    state: Cell<ModalState>,
    pending: RefCell<PendingAction<T>>,
}

impl<T: Clone> Modal<T> {
    pub fn new(view: Rc<dyn ModalView>) -> Self {
        Self {
            view,
            state: Cell::new(ModalState::Closed),
            pending: RefCell::new(PendingAction::Idle),
        }
    }

    pub fn view(&self) -> &dyn ModalView {
        self.view.as_ref()
    }

    pub fn state(&self) -> ModalState {
        self.state.get()
    }

    pub fn is_open(&self) -> bool {
        self.state.get() != ModalState::Closed
    }

    pub fn pending(&self) -> Option<T> {
        self.pending.borrow().target().cloned()
    }

    /// Ignored while a confirmation is running: its target stays in the slot.
    pub fn open(&self, target: T) {
        if self.state.get() == ModalState::Confirming {
            debug!("dialog busy, open ignored");
            return;
        }
        *self.pending.borrow_mut() = PendingAction::PendingConfirmation(target);
        self.state.set(ModalState::Open);
        self.view.show();
    }

    /// Cancel, close button, backdrop or Escape. No side effects, and
    /// ignored while a confirmation is running.
    pub fn cancel(&self) {
        if self.state.get() == ModalState::Confirming {
            debug!("dialog busy, cancel ignored");
            return;
        }
        self.close();
    }

    fn close(&self) {
        self.pending.borrow_mut().take();
        self.state.set(ModalState::Closed);
        self.view.hide();
    }

    /// Start the confirmed action. Returns `None` when there is nothing to
    /// confirm or a confirmation is already running.
    pub fn begin_confirm(&self) -> Option<T> {
        if self.state.get() != ModalState::Open {
            return None;
        }
        let target = self.pending.borrow().target().cloned()?;
        self.state.set(ModalState::Confirming);
        Some(target)
    }

    /// The action failed; the dialog stays open with its target for a retry.
    pub fn fail_confirm(&self) {
        if self.state.get() == ModalState::Confirming {
            self.state.set(ModalState::Open);
        }
    }

    /// The action settled and the dialog closes.
    pub fn finish(&self) {
        self.close();
    }
}
