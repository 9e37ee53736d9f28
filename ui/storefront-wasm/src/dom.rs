//! DOM helpers.
//!
//! Thin wrappers over `web_sys` lookups. Page modules resolve their elements
//! through these and treat a missing element as "feature not on this page".

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

// ── Lookup ──

pub fn document() -> Document {
    gloo_utils::document()
}

pub fn window() -> web_sys::Window {
    gloo_utils::window()
}

pub fn by_id(id: &str) -> Option<Element> {
    document().get_element_by_id(id)
}

pub fn by_id_typed<T: JsCast>(id: &str) -> Option<T> {
    by_id(id).and_then(|e| e.dyn_into::<T>().ok())
}

/// Required element: a bind-time error names the missing id.
pub fn require<T: JsCast>(id: &str) -> Result<T, JsValue> {
    by_id_typed::<T>(id).ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

pub fn query(selector: &str) -> Option<Element> {
    document().query_selector(selector).ok()?
}

pub fn query_within(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    collect(document().query_selector_all(selector).ok())
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    collect(parent.query_selector_all(selector).ok())
}

fn collect(list: Option<web_sys::NodeList>) -> Vec<Element> {
    let Some(nl) = list else {
        return Vec::new();
    };
    (0..nl.length())
        .filter_map(|i| nl.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn closest(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok()?
}

/// Element an event was dispatched on, if it is an `Element`.
pub fn event_element(event: &web_sys::Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

// ── Attributes and content ──

pub fn data(el: &Element, key: &str) -> Option<String> {
    el.get_attribute(&format!("data-{key}"))
}

pub fn set_data(el: &Element, key: &str, value: &str) {
    let _ = el.set_attribute(&format!("data-{key}"), value);
}

/// Parse a `data-*` attribute (`data-product-id="12"`).
pub fn data_parsed<T: std::str::FromStr>(el: &Element, key: &str) -> Option<T> {
    data(el, key)?.trim().parse().ok()
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn text(el: &Element) -> String {
    el.text_content().unwrap_or_default().trim().to_string()
}

pub fn set_text_by_id(id: &str, text: &str) {
    if let Some(el) = by_id(id) {
        set_text(&el, text);
    }
}

/// Set the value of an input or select by id.
pub fn set_control_value(id: &str, value: &str) {
    let Some(el) = by_id(id) else {
        return;
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    }
}

/// Current value of an input or select by id.
pub fn control_value(id: &str) -> String {
    let Some(el) = by_id(id) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

// ── Classes and style ──

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_style(el: &Element, property: &str, value: &str) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html.style().set_property(property, value);
    }
}

/// `display: <shown>` or `display: none`.
pub fn show(el: &Element, visible: bool, shown: &str) {
    set_style(el, "display", if visible { shown } else { "none" });
}

pub fn show_by_id(id: &str, visible: bool) {
    if let Some(el) = by_id(id) {
        show(&el, visible, "block");
    }
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document().create_element(tag)
}

// ── Forms ──

/// Name/value pairs the browser would submit for `form`: unchecked radios
/// and checkboxes, disabled controls, buttons and file inputs are skipped.
pub fn form_fields(form: &Element) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    for el in query_all_within(form, "input[name], select[name], textarea[name]") {
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            let kind = input.type_();
            let skipped = matches!(kind.as_str(), "submit" | "button" | "reset" | "file" | "image");
            let unchecked = matches!(kind.as_str(), "radio" | "checkbox") && !input.checked();
            if input.disabled() || skipped || unchecked {
                continue;
            }
            fields.push((input.name(), input.value()));
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            if !select.disabled() {
                fields.push((select.name(), select.value()));
            }
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            if !area.disabled() {
                fields.push((area.name(), area.value()));
            }
        }
    }
    fields
}

// ── Location ──

pub fn location_path() -> String {
    window().location().pathname().unwrap_or_default()
}

/// Current query string including the leading `?`, or empty.
pub fn location_search() -> String {
    window().location().search().unwrap_or_default()
}
