//! Page configuration.
//!
//! The server renders one JSON object per page listing the endpoints the
//! scripts may call, the CSRF token and page data (order id, chart series).
//! Components receive it explicitly instead of reading globals.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use shop_api_types::{ChartData, OrderId};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_ORDERS_PAGE: &str = "/orders/";
pub const DEFAULT_ORDER_DELETE_BASE: &str = "/orders/";

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default)]
    pub cart_update: Option<String>,
    #[serde(default)]
    pub cart_remove: Option<String>,
    #[serde(default)]
    pub cart_clear: Option<String>,
    #[serde(default)]
    pub cart_add: Option<String>,
    #[serde(default)]
    pub checkout: Option<String>,
    #[serde(default)]
    pub orders_page: Option<String>,
    #[serde(default)]
    pub products: Option<String>,
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub order_bulk_update: Option<String>,
    #[serde(default)]
    pub order_cancel: Option<String>,
    #[serde(default)]
    pub order_delete_base: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    #[serde(default)]
    pub csrf_token: String,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub chart_data: Option<ChartData>,
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            csrf_token: String::new(),
            endpoints: Endpoints::default(),
            order_id: None,
            chart_data: None,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            log_level: default_log_level(),
        }
    }
}

impl ShopConfig {
    pub fn from_json(raw: &str) -> ClientResult<Self> {
        let config: ShopConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ClientResult<()> {
        if self.request_timeout_ms == 0 {
            return Err(ClientError::Validation(
                "request_timeout_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn orders_page(&self) -> &str {
        self.endpoints
            .orders_page
            .as_deref()
            .unwrap_or(DEFAULT_ORDERS_PAGE)
    }

    pub fn order_delete_base(&self) -> &str {
        self.endpoints
            .order_delete_base
            .as_deref()
            .unwrap_or(DEFAULT_ORDER_DELETE_BASE)
    }
}
