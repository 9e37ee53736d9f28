//! Event binding.
//!
//! Closures are leaked with `forget()`: listeners live as long as the page.
//! Async handlers are spawned via `wasm_bindgen_futures::spawn_local`.

use std::future::Future;
use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

/// Attach a sync handler for `kind` on `target`.
pub fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    if let Err(err) = target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref()) {
        warn!(kind, error = ?err, "failed to attach listener");
    }
    cb.forget();
}

/// Attach an async handler; each event spawns one task.
pub fn listen_async<F, Fut>(target: &EventTarget, kind: &str, handler: F)
where
    F: Fn(Event) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    listen(target, kind, move |event| {
        wasm_bindgen_futures::spawn_local(handler(event));
    });
}

/// Close handlers shared by every dialog: the close button, the cancel
/// button and a backdrop click all call `close`.
pub fn bind_dismiss(triggers: &[Option<web_sys::Element>], close: impl Fn() + Clone + 'static) {
    for trigger in triggers.iter().flatten() {
        let close = close.clone();
        listen(trigger, "click", move |_| close());
    }
}
