//! HTTP transport over `fetch`.
//!
//! Every request carries the CSRF and AJAX headers. The configured timeout
//! covers sending and reading the body; when it elapses the fetch is
//! aborted through an `AbortController`.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use shop_client_core::transport::{AJAX_HEADER, CSRF_HEADER, with_deadline};
use shop_client_core::{ClientError, ClientResult, RequestContext, ShopTransport};
use tracing::{debug, warn};
use url::form_urlencoded;
use web_sys::AbortController;

#[derive(Debug, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        body: Option<(&str, String)>,
        ctx: &RequestContext,
    ) -> ClientResult<Value> {
        let controller = AbortController::new().map_err(js_error)?;
        let builder = builder
            .header(CSRF_HEADER, &ctx.csrf_token)
            .header(AJAX_HEADER.0, AJAX_HEADER.1)
            .abort_signal(Some(&controller.signal()));

        let request = match body {
            Some((content_type, body)) => builder.header("Content-Type", content_type).body(body),
            None => builder.build(),
        }
        .map_err(gloo_error)?;

        let after_ms = ctx.timeout_ms();
        let deadline = TimeoutFuture::new(u32::try_from(after_ms).unwrap_or(u32::MAX));
        let exchange = async {
            let response = request.send().await.map_err(gloo_error)?;
            read_json(response).await
        };

        let result = with_deadline(exchange, deadline, after_ms).await;
        if let Err(ClientError::Timeout { .. }) = &result {
            warn!(after_ms, "request timed out, aborting fetch");
            controller.abort();
        }
        result
    }
}

async fn read_json(response: Response) -> ClientResult<Value> {
    let status = response.status();
    let text = response.text().await.map_err(gloo_error)?;
    if !response.ok() {
        warn!(status, url = %response.url(), "non-success response");
        return Err(ClientError::Http { status, body: text });
    }
    Ok(serde_json::from_str(&text)?)
}

fn gloo_error(err: gloo_net::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn js_error(err: wasm_bindgen::JsValue) -> ClientError {
    ClientError::Transport(format!("{err:?}"))
}

#[async_trait(?Send)]
impl ShopTransport for FetchTransport {
    async fn get_json(&self, url: &str, ctx: &RequestContext) -> ClientResult<Value> {
        debug!(url, "GET");
        self.execute(Request::get(url), None, ctx).await
    }

    async fn post_json(&self, url: &str, body: Value, ctx: &RequestContext) -> ClientResult<Value> {
        debug!(url, "POST json");
        let body = serde_json::to_string(&body)?;
        self.execute(Request::post(url), Some(("application/json", body)), ctx)
            .await
    }

    async fn post_form(
        &self,
        url: &str,
        fields: Vec<(String, String)>,
        ctx: &RequestContext,
    ) -> ClientResult<Value> {
        debug!(url, fields = fields.len(), "POST form");
        let body = encode_form(&fields);
        self.execute(
            Request::post(url),
            Some(("application/x-www-form-urlencoded", body)),
            ctx,
        )
        .await
    }
}

/// `application/x-www-form-urlencoded` body, `+` for spaces.
pub fn encode_form(fields: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields.iter())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_is_url_encoded() {
        let fields = vec![
            ("full_name".to_string(), "Ada Lovelace".to_string()),
            ("note".to_string(), "a&b=c/é".to_string()),
        ];
        assert_eq!(
            encode_form(&fields),
            "full_name=Ada+Lovelace&note=a%26b%3Dc%2F%C3%A9"
        );
    }

    #[test]
    fn empty_form_is_empty_body() {
        assert_eq!(encode_form(&[]), "");
    }
}
