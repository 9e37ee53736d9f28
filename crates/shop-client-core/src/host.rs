//! Host shell port: notifications, native dialogs, navigation, timers.

use crate::forms::PostForm;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Error => "error",
            ToastLevel::Warning => "warning",
            ToastLevel::Info => "info",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    pub title: Option<String>,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
            title: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
            title: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[async_trait(?Send)]
pub trait Host {
    fn notify(&self, toast: Toast);

    /// Blocking yes/no prompt.
    fn confirm(&self, message: &str) -> bool;

    fn reload(&self);

    fn navigate(&self, url: &str);

    /// Conventional (non-AJAX) form post; leaves the page.
    fn submit_form(&self, form: PostForm);

    async fn sleep(&self, ms: u32);
}
