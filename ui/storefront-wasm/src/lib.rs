//! Storefront WASM frontend.
//!
//! Browser binding for `shop-client-core`: implements its ports over the
//! DOM and `fetch`, then wires the components of whichever page is loaded.
//! Each page module checks for its own root element and stays inert when
//! the element is absent, so one bundle serves every template.

pub mod account_page;
pub mod admin_customers;
pub mod admin_orders;
pub mod admin_products;
pub mod api;
pub mod cart_page;
pub mod catalog_page;
pub mod charts;
pub mod dom;
pub mod events;
pub mod kebab;
pub mod logging;
pub mod modal;
pub mod order_detail;
pub mod shell;

use api::FetchTransport;
use shell::BrowserHost;
use shop_client_core::{ShopClient, ShopConfig};
use std::rc::Rc;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;

/// Global the server template assigns the page configuration to.
const CONFIG_GLOBAL: &str = "shopConfig";

/// Transport handle shared by every component on the page.
pub type Transport = Rc<FetchTransport>;

/// Shared handles every page module receives.
#[derive(Clone)]
pub struct PageContext {
    pub config: Rc<ShopConfig>,
    pub client: ShopClient<Transport>,
    pub host: Rc<BrowserHost>,
}

impl PageContext {
    fn new(config: ShopConfig) -> Self {
        let config = Rc::new(config);
        Self {
            client: ShopClient::new(Rc::new(FetchTransport::new()), config.clone()),
            host: Rc::new(BrowserHost::new()),
            config,
        }
    }
}

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = read_config()?;
    let defaulted = config.is_none();
    let config = config.unwrap_or_default();
    logging::init(&config.log_level);
    if defaulted {
        warn!("window.{CONFIG_GLOBAL} missing, using defaults");
    }
    info!(path = %dom::location_path(), "storefront script loaded");

    init(&PageContext::new(config))
}

/// Mount every page binding whose markup is present.
fn init(ctx: &PageContext) -> Result<(), JsValue> {
    let kebabs = kebab::bind();

    cart_page::mount(ctx)?;
    catalog_page::mount(ctx)?;
    order_detail::mount(ctx)?;
    account_page::mount(ctx)?;

    admin_orders::mount(ctx, &kebabs)?;
    admin_products::mount(ctx, &kebabs)?;
    admin_customers::mount(ctx, &kebabs)?;
    charts::mount(ctx)?;

    Ok(())
}

/// Read `window.shopConfig`. A page without one still gets the defaults so
/// purely visual helpers (kebab menus, image previews) keep working.
fn read_config() -> Result<Option<ShopConfig>, JsValue> {
    let raw = js_sys::Reflect::get(&gloo_utils::window(), &JsValue::from_str(CONFIG_GLOBAL))?;
    if raw.is_undefined() || raw.is_null() {
        return Ok(None);
    }
    let config: ShopConfig = serde_wasm_bindgen::from_value(raw)?;
    config
        .validate()
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(Some(config))
}
