//! Typed API client.
//!
//! One method per server endpoint. `success: false` bodies become
//! [`ClientError::Rejected`] so callers only branch on `Result`.

use crate::config::ShopConfig;
use crate::error::{ClientError, ClientResult};
use crate::transport::{RequestContext, ShopTransport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shop_api_types::{
    AckResponse, ApiOutcome, BulkStatusRequest, CartQuantityRequest, CartRemoveRequest,
    CartResponse, CatalogPage, CheckoutResponse, OrderCancelRequest, OrderId, OrderStatus,
    OrderStatusRequest, PageToken, ProductId,
};
use std::rc::Rc;
use tracing::debug;
use url::form_urlencoded;

#[derive(Clone)]
pub struct ShopClient<T> {
    transport: T,
    config: Rc<ShopConfig>,
}

impl<T: ShopTransport> ShopClient<T> {
    pub fn new(transport: T, config: Rc<ShopConfig>) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    fn context(&self) -> RequestContext {
        RequestContext {
            csrf_token: self.config.csrf_token.clone(),
            timeout: self.config.request_timeout(),
        }
    }

    async fn post<Req, Resp>(
        &self,
        name: &'static str,
        url: Option<&str>,
        body: &Req,
    ) -> ClientResult<Resp>
    where
        Req: Serialize,
        Resp: DeserializeOwned + ApiOutcome,
    {
        let url = url.ok_or(ClientError::MissingEndpoint(name))?;
        debug!(endpoint = name, url, "POST");
        let raw = self
            .transport
            .post_json(url, serde_json::to_value(body)?, &self.context())
            .await?;
        accept(raw)
    }

    pub async fn update_cart(&self, product_id: ProductId, quantity: u32) -> ClientResult<CartResponse> {
        let body = CartQuantityRequest {
            product_id,
            quantity,
        };
        self.post("cart_update", self.config.endpoints.cart_update.as_deref(), &body)
            .await
    }

    pub async fn remove_from_cart(&self, product_id: ProductId) -> ClientResult<CartResponse> {
        let body = CartRemoveRequest { product_id };
        self.post("cart_remove", self.config.endpoints.cart_remove.as_deref(), &body)
            .await
    }

    pub async fn clear_cart(&self) -> ClientResult<AckResponse> {
        self.post(
            "cart_clear",
            self.config.endpoints.cart_clear.as_deref(),
            &serde_json::json!({}),
        )
        .await
    }

    /// Add a single unit of a product.
    pub async fn add_to_cart(&self, product_id: ProductId) -> ClientResult<CartResponse> {
        let body = CartQuantityRequest {
            product_id,
            quantity: 1,
        };
        self.post("cart_add", self.config.endpoints.cart_add.as_deref(), &body)
            .await
    }

    /// Submit the checkout form as-is.
    pub async fn checkout(&self, fields: Vec<(String, String)>) -> ClientResult<CheckoutResponse> {
        let url = self
            .config
            .endpoints
            .checkout
            .as_deref()
            .ok_or(ClientError::MissingEndpoint("checkout"))?;
        debug!(url, fields = fields.len(), "POST checkout form");
        let raw = self.transport.post_form(url, fields, &self.context()).await?;
        accept(raw)
    }

    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> ClientResult<AckResponse> {
        let body = OrderStatusRequest { order_id, status };
        self.post("order_status", self.config.endpoints.order_status.as_deref(), &body)
            .await
    }

    pub async fn bulk_update_status(
        &self,
        order_ids: Vec<OrderId>,
        status: OrderStatus,
    ) -> ClientResult<AckResponse> {
        let body = BulkStatusRequest { order_ids, status };
        self.post(
            "order_bulk_update",
            self.config.endpoints.order_bulk_update.as_deref(),
            &body,
        )
        .await
    }

    pub async fn cancel_order(&self, order_id: OrderId) -> ClientResult<AckResponse> {
        let body = OrderCancelRequest { order_id };
        self.post("order_cancel", self.config.endpoints.order_cancel.as_deref(), &body)
            .await
    }

    /// Fetch one catalog page as a JSON fragment, keeping the page's filters.
    pub async fn fetch_catalog_page(
        &self,
        current_query: &str,
        page: &PageToken,
    ) -> ClientResult<CatalogPage> {
        let base = self
            .config
            .endpoints
            .products
            .as_deref()
            .ok_or(ClientError::MissingEndpoint("products"))?;
        let url = catalog_page_url(base, current_query, page);
        debug!(url = url.as_str(), "GET catalog page");
        let raw = self.transport.get_json(&url, &self.context()).await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Post a server-rendered account form (profile, password) via AJAX.
    pub async fn submit_account_form(
        &self,
        action: &str,
        fields: Vec<(String, String)>,
    ) -> ClientResult<AckResponse> {
        if action.trim().is_empty() {
            return Err(ClientError::MissingEndpoint("form action"));
        }
        debug!(action, "POST account form");
        let raw = self.transport.post_form(action, fields, &self.context()).await?;
        accept(raw)
    }
}

fn accept<Resp>(raw: Value) -> ClientResult<Resp>
where
    Resp: DeserializeOwned + ApiOutcome,
{
    let resp: Resp = serde_json::from_value(raw)?;
    if resp.success() {
        Ok(resp)
    } else {
        Err(ClientError::Rejected {
            message: resp.message().map(str::to_owned),
        })
    }
}

/// Build the partial-page URL: current filters plus `page` and `ajax=1`,
/// replacing any previous values of those two keys.
pub fn catalog_page_url(base: &str, current_query: &str, page: &PageToken) -> String {
    let query = current_query.trim_start_matches('?');
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if key == "page" || key == "ajax" {
            continue;
        }
        serializer.append_pair(&key, &value);
    }
    serializer.append_pair("page", page.as_str());
    serializer.append_pair("ajax", "1");

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{}", serializer.finish())
}
