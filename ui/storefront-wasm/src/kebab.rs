//! Row action menus on the admin tables.

use crate::dom;
use crate::events::listen;
use shop_client_core::kebab::KebabMenus;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::Element;

pub struct KebabBinding {
    menus: Vec<Element>,
    state: RefCell<KebabMenus>,
}

impl KebabBinding {
    fn render(&self) {
        let state = self.state.borrow();
        for (index, menu) in self.menus.iter().enumerate() {
            dom::toggle_class(menu, "open", state.is_open(index));
        }
    }

    pub fn toggle(&self, index: usize) {
        self.state.borrow_mut().toggle(index);
        self.render();
    }

    pub fn click_outside(&self) {
        self.state.borrow_mut().click_outside();
        self.render();
    }

    /// Called before a row action opens its dialog.
    pub fn close_all(&self) {
        self.state.borrow_mut().close_all();
        self.render();
    }
}

/// Bind every `.kebab-menu` on the page. Pages without menus get an empty
/// binding, so callers can close menus unconditionally.
pub fn bind() -> Rc<KebabBinding> {
    let menus = dom::query_all(".kebab-menu");
    let binding = Rc::new(KebabBinding {
        state: RefCell::new(KebabMenus::new(menus.len())),
        menus,
    });
    if binding.menus.is_empty() {
        return binding;
    }

    for (index, menu) in binding.menus.iter().enumerate() {
        if let Some(button) = dom::query_within(menu, ".kebab-btn") {
            let b = binding.clone();
            listen(&button, "click", move |event| {
                event.stop_propagation();
                b.toggle(index);
            });
        }
        // Clicks inside the dropdown keep the menu open.
        if let Some(dropdown) = dom::query_within(menu, ".kebab-dropdown") {
            listen(&dropdown, "click", |event| event.stop_propagation());
        }
    }

    let b = binding.clone();
    listen(&dom::document(), "click", move |event| {
        let inside = dom::event_element(&event)
            .and_then(|el| dom::closest(&el, ".kebab-menu"))
            .is_some();
        if !inside {
            b.click_outside();
        }
    });

    binding
}
