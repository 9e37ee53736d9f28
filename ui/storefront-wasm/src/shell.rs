//! Browser implementations of the host shell and busy-control ports.

use crate::dom;
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use shop_client_core::forms::PostForm;
use shop_client_core::{BusyControl, Host, Toast};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlButtonElement, HtmlFormElement, HtmlInputElement};

/// Page-level toast helper provided by the base template.
const TOAST_FN: &str = "showToast";

#[derive(Debug, Default)]
pub struct BrowserHost;

impl BrowserHost {
    pub fn new() -> Self {
        Self
    }

    /// Print dialog (admin invoice).
    pub fn print(&self) {
        if let Err(err) = dom::window().print() {
            warn!(error = ?err, "print failed");
        }
    }

    fn show_toast(&self, toast: &Toast) -> Result<(), JsValue> {
        let func = js_sys::Reflect::get(&dom::window(), &JsValue::from_str(TOAST_FN))?
            .dyn_into::<js_sys::Function>()?;
        let title = toast
            .title
            .as_deref()
            .map_or(JsValue::UNDEFINED, JsValue::from_str);
        func.call3(
            &JsValue::NULL,
            &JsValue::from_str(&toast.message),
            &JsValue::from_str(toast.level.as_str()),
            &title,
        )?;
        Ok(())
    }

    fn build_form(&self, form: &PostForm) -> Result<HtmlFormElement, JsValue> {
        let el: HtmlFormElement = dom::create_element("form")?.dyn_into()?;
        el.set_method("POST");
        el.set_action(&form.action);
        for (name, value) in &form.fields {
            let input: HtmlInputElement = dom::create_element("input")?.dyn_into()?;
            input.set_type("hidden");
            input.set_name(name);
            input.set_value(value);
            el.append_child(&input)?;
        }
        dom::document()
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&el)?;
        Ok(el)
    }
}

#[async_trait(?Send)]
impl Host for BrowserHost {
    fn notify(&self, toast: Toast) {
        if let Err(err) = self.show_toast(&toast) {
            debug!(error = ?err, "showToast unavailable, falling back to alert");
            let _ = dom::window().alert_with_message(&toast.message);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        dom::window().confirm_with_message(message).unwrap_or(false)
    }

    fn reload(&self) {
        if let Err(err) = dom::window().location().reload() {
            warn!(error = ?err, "reload failed");
        }
    }

    fn navigate(&self, url: &str) {
        if let Err(err) = dom::window().location().set_href(url) {
            warn!(url, error = ?err, "navigation failed");
        }
    }

    fn submit_form(&self, form: PostForm) {
        match self.build_form(&form) {
            Ok(el) => {
                if let Err(err) = el.submit() {
                    warn!(action = form.action.as_str(), error = ?err, "form submit failed");
                }
            }
            Err(err) => warn!(action = form.action.as_str(), error = ?err, "form build failed"),
        }
    }

    async fn sleep(&self, ms: u32) {
        TimeoutFuture::new(ms).await;
    }
}

/// A button as a [`BusyControl`]: label is its inner HTML.
pub struct DomButton(pub HtmlButtonElement);

impl DomButton {
    pub fn from_element(el: &Element) -> Option<Self> {
        el.clone().dyn_into::<HtmlButtonElement>().ok().map(Self)
    }

    /// The form's `button[type="submit"]`.
    pub fn submit_of(form: &Element) -> Option<Self> {
        dom::query_within(form, r#"button[type="submit"]"#).and_then(|el| Self::from_element(&el))
    }
}

impl BusyControl for DomButton {
    fn label(&self) -> String {
        self.0.inner_html()
    }

    fn set_label(&self, markup: &str) {
        self.0.set_inner_html(markup);
    }

    fn set_disabled(&self, disabled: bool) {
        self.0.set_disabled(disabled);
    }

    fn set_highlight(&self, on: bool) {
        dom::toggle_class(&self.0, "btn-success", on);
    }
}
