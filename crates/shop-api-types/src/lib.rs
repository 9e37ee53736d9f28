use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Identifiers ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ProductId(pub i64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct OrderId(pub i64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidId(pub String);

impl fmt::Display for InvalidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid identifier: {:?}", self.0)
    }
}

impl std::error::Error for InvalidId {}

macro_rules! numeric_id {
    ($name:ident) => {
        impl FromStr for $name {
            type Err = InvalidId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map($name)
                    .map_err(|_| InvalidId(s.to_owned()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(ProductId);
numeric_id!(OrderId);
numeric_id!(CustomerId);

// ── Money ──

/// Currency amount as rendered by the server. Accepts JSON numbers and
/// decimal strings, since price columns arrive as strings on some endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Money(pub f64);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawNumber::deserialize(deserializer)? {
            RawNumber::Number(value) => Ok(Money(value)),
            RawNumber::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Money)
                .map_err(serde::de::Error::custom),
        }
    }
}

impl Money {
    /// Two-decimal amount without the currency sign (line subtotals).
    pub fn plain(&self) -> String {
        format!("{:.2}", self.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

// ── Pagination ──

/// Opaque next-page cursor. The server sends either a page number or a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PageToken(pub String);

impl<'de> Deserialize<'de> for PageToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawToken {
            Int(i64),
            Text(String),
        }

        Ok(match RawToken::deserialize(deserializer)? {
            RawToken::Int(page) => PageToken(page.to_string()),
            RawToken::Text(text) => PageToken(text),
        })
    }
}

impl PageToken {
    /// Parse a DOM attribute value; empty means "no cursor".
    pub fn from_attr(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "None" || trimmed == "null" {
            None
        } else {
            Some(PageToken(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ── Common response envelope ──

/// Every JSON endpoint answers with `success` and an optional message.
pub trait ApiOutcome {
    fn success(&self) -> bool;
    fn message(&self) -> Option<&str>;
}

macro_rules! api_outcome {
    ($name:ident) => {
        impl ApiOutcome for $name {
            fn success(&self) -> bool {
                self.success
            }

            fn message(&self) -> Option<&str> {
                self.message.as_deref().filter(|m| !m.trim().is_empty())
            }
        }
    };
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

api_outcome!(AckResponse);

// ── Cart ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartQuantityRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartRemoveRequest {
    pub product_id: ProductId,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub subtotal: Option<Money>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
    pub free_shipping: bool,
}

/// Response of every cart mutation. Summary fields are optional so an
/// add-to-cart acknowledgement (count only) decodes with the same type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cart_count: u32,
    #[serde(default)]
    pub subtotal: Option<Money>,
    #[serde(default)]
    pub tax: Option<Money>,
    #[serde(default)]
    pub shipping: Option<Money>,
    #[serde(default)]
    pub total: Option<Money>,
    #[serde(default)]
    pub free_shipping: bool,
    #[serde(default)]
    pub items: Vec<CartLine>,
}

api_outcome!(CartResponse);

impl CartResponse {
    /// Authoritative totals, present when the server recomputed the cart.
    pub fn summary(&self) -> Option<CartSummary> {
        Some(CartSummary {
            subtotal: self.subtotal?,
            tax: self.tax?,
            shipping: self.shipping.unwrap_or_default(),
            total: self.total?,
            free_shipping: self.free_shipping,
        })
    }
}

// ── Checkout ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect: Option<String>,
}

api_outcome!(CheckoutResponse);

// ── Orders ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InvalidId(s.to_owned()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStatusRequest {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BulkStatusRequest {
    pub order_ids: Vec<OrderId>,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderCancelRequest {
    pub order_id: OrderId,
}

// ── Catalog ──

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<ProductCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<PageToken>,
}

// ── Stock ──

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StockAdjustment {
    Add,
    Remove,
    Set,
}

impl StockAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockAdjustment::Add => "add",
            StockAdjustment::Remove => "remove",
            StockAdjustment::Set => "set",
        }
    }
}

impl FromStr for StockAdjustment {
    type Err = InvalidId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "add" => Ok(StockAdjustment::Add),
            "remove" => Ok(StockAdjustment::Remove),
            "set" => Ok(StockAdjustment::Set),
            other => Err(InvalidId(other.to_owned())),
        }
    }
}

// ── Dashboards ──

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    #[serde(default)]
    pub revenue_labels: Vec<String>,
    #[serde(default)]
    pub revenue_data: Vec<f64>,
    #[serde(default)]
    pub orders_by_status: Vec<u64>,
    #[serde(default)]
    pub category_labels: Vec<String>,
    #[serde(default)]
    pub category_data: Vec<f64>,
    #[serde(default)]
    pub status_data: Vec<u64>,
}
