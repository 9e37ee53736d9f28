//! HTTP transport port.
//!
//! Implemented by the browser `fetch` binding. Implementations must honour
//! `RequestContext::timeout` over the whole exchange, body included, and
//! report it as [`ClientError::Timeout`]; [`with_deadline`] does the racing.

use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use futures::future::{Either, select};
use serde_json::Value;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::time::Duration;

pub const CSRF_HEADER: &str = "X-CSRFToken";
pub const AJAX_HEADER: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub csrf_token: String,
    pub timeout: Duration,
}

impl RequestContext {
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

#[async_trait(?Send)]
pub trait ShopTransport {
    async fn get_json(&self, url: &str, ctx: &RequestContext) -> ClientResult<Value>;

    async fn post_json(&self, url: &str, body: Value, ctx: &RequestContext) -> ClientResult<Value>;

    async fn post_form(
        &self,
        url: &str,
        fields: Vec<(String, String)>,
        ctx: &RequestContext,
    ) -> ClientResult<Value>;
}

#[async_trait(?Send)]
impl<T: ShopTransport + ?Sized> ShopTransport for Rc<T> {
    async fn get_json(&self, url: &str, ctx: &RequestContext) -> ClientResult<Value> {
        (**self).get_json(url, ctx).await
    }

    async fn post_json(&self, url: &str, body: Value, ctx: &RequestContext) -> ClientResult<Value> {
        (**self).post_json(url, body, ctx).await
    }

    async fn post_form(
        &self,
        url: &str,
        fields: Vec<(String, String)>,
        ctx: &RequestContext,
    ) -> ClientResult<Value> {
        (**self).post_form(url, fields, ctx).await
    }
}

/// Race one request/response exchange against `deadline`. Whichever side
/// loses is dropped, so a stalled body read cannot outlive the timeout.
pub async fn with_deadline<R, D>(exchange: R, deadline: D, after_ms: u64) -> ClientResult<Value>
where
    R: Future<Output = ClientResult<Value>>,
    D: Future<Output = ()>,
{
    match select(pin!(exchange), pin!(deadline)).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(ClientError::Timeout { after_ms }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::future::pending;

    #[tokio::test]
    async fn stalled_body_read_times_out() {
        // Headers arrived; the body never does.
        let exchange = pending::<ClientResult<Value>>();
        let deadline = tokio::time::sleep(Duration::from_millis(20));

        let result = with_deadline(exchange, deadline, 20).await;
        assert!(matches!(result, Err(ClientError::Timeout { after_ms: 20 })));
    }

    #[tokio::test]
    async fn finished_exchange_beats_the_deadline() -> anyhow::Result<()> {
        let exchange = async { Ok(json!({ "success": true })) };
        let value = with_deadline(exchange, pending(), 15_000).await?;
        assert_eq!(value["success"], true);
        Ok(())
    }

    #[tokio::test]
    async fn exchange_errors_pass_through() {
        let exchange = async {
            Err(ClientError::Http {
                status: 502,
                body: String::new(),
            })
        };
        let result = with_deadline(exchange, pending(), 15_000).await;
        assert!(matches!(result, Err(ClientError::Http { status: 502, .. })));
    }
}
