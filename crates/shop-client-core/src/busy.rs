//! Scoped busy state for the control that started a request.
//!
//! `BusyGuard::engage` disables the control and swaps in a busy label; the
//! original label and enabled state come back when the guard drops, on every
//! exit path. `hold` keeps the control busy for flows that leave the page.

pub const SPINNER: &str = r#"<span class="spinner-small"></span>"#;

/// Busy label with the shared spinner, e.g. `spinner_label("Adding...")`.
pub fn spinner_label(text: &str) -> String {
    if text.is_empty() {
        SPINNER.to_owned()
    } else {
        format!("{SPINNER} {text}")
    }
}

pub trait BusyControl {
    /// Current label markup.
    fn label(&self) -> String;
    fn set_label(&self, markup: &str);
    fn set_disabled(&self, disabled: bool);
    /// Success highlight shown briefly after a completed action.
    fn set_highlight(&self, _on: bool) {}
}

pub struct BusyGuard<'a> {
    control: &'a dyn BusyControl,
    original: Option<String>,
    armed: bool,
}

impl<'a> BusyGuard<'a> {
    pub fn engage(control: &'a dyn BusyControl, busy_label: &str) -> Self {
        let original = control.label();
        control.set_disabled(true);
        control.set_label(busy_label);
        Self {
            control,
            original: Some(original),
            armed: true,
        }
    }

    /// Disable without touching the label (secondary buttons of a dialog).
    pub fn disable(control: &'a dyn BusyControl) -> Self {
        control.set_disabled(true);
        Self {
            control,
            original: None,
            armed: true,
        }
    }

    pub fn show_success(&self, markup: &str) {
        self.control.set_label(markup);
        self.control.set_highlight(true);
    }

    /// Leave the control busy; the page is about to be replaced.
    pub fn hold(mut self) {
        self.armed = false;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(original) = &self.original {
            self.control.set_label(original);
        }
        self.control.set_highlight(false);
        self.control.set_disabled(false);
    }
}
