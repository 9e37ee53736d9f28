//! Conventional form posts and form-input helpers.

use crate::busy::{BusyControl, BusyGuard, spinner_label};
use crate::modal::{Modal, ModalView};
use std::cell::Cell;
use std::fmt::Display;
use std::rc::Rc;

pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// A form the host builds and submits as a full page navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl PostForm {
    pub fn new(action: impl Into<String>, csrf_token: &str) -> Self {
        Self {
            action: action.into(),
            fields: vec![(CSRF_FIELD.to_owned(), csrf_token.to_owned())],
        }
    }

    /// `{base}{id}/delete/`, e.g. `/customers/12/delete/`.
    pub fn delete(base: &str, id: impl Display, csrf_token: &str) -> Self {
        Self::new(format!("{}{id}/delete/", with_trailing_slash(base)), csrf_token)
    }

    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        self.fields.push((name.to_owned(), value.to_string()));
        self
    }

    #[cfg(test)]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn with_trailing_slash(base: &str) -> String {
    if base.ends_with('/') {
        base.to_owned()
    } else {
        format!("{base}/")
    }
}

/// Leading-integer parse of a text input: `"12abc"` → 12, `""` → `None`.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(digits.len(), |(idx, _)| idx);
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

/// Holds back a native form submit until the user confirms it in a dialog.
pub struct SubmitGate {
    modal: Modal<()>,
    submitting: Cell<bool>,
}

impl SubmitGate {
    pub fn new(view: Rc<dyn ModalView>) -> Self {
        Self {
            modal: Modal::new(view),
            submitting: Cell::new(false),
        }
    }

    pub fn modal(&self) -> &Modal<()> {
        &self.modal
    }

    /// Called from the form's submit event. Returns `true` when the native
    /// submit may proceed.
    pub fn on_submit(&self) -> bool {
        if self.submitting.get() {
            return true;
        }
        self.modal.open(());
        false
    }

    /// Confirmed: lock the submit button and let the caller submit the form.
    pub fn confirm(&self, submit_button: &dyn BusyControl, busy_text: &str) -> bool {
        if self.modal.begin_confirm().is_none() {
            return false;
        }
        self.submitting.set(true);
        BusyGuard::engage(submit_button, &spinner_label(busy_text)).hold();
        self.modal.finish();
        true
    }
}
