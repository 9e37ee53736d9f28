//! Chart.js configurations for the dashboard and reports pages.
//!
//! Built as plain JSON; the browser binding converts them and attaches the
//! currency tick callback, which cannot be expressed in JSON.

use serde_json::{Value, json};
use shop_api_types::{ChartData, OrderStatus};

pub const REVENUE_CANVAS: &str = "revenue-chart";
pub const ORDERS_CANVAS: &str = "orders-chart";
pub const CATEGORY_CANVAS: &str = "category-chart";
pub const STATUS_CANVAS: &str = "status-chart";

/// Body of the y-axis tick callback: `(value) => '$' + value`.
pub const CURRENCY_TICK_BODY: &str = "return '$' + value;";

const ACCENT: &str = "rgb(99, 102, 241)";
const ACCENT_FILL: &str = "rgba(99, 102, 241, 0.1)";

/// Pending, processing, shipped, delivered, cancelled.
const STATUS_COLORS: [&str; 5] = [
    "rgb(245, 158, 11)",
    "rgb(59, 130, 246)",
    "rgb(139, 92, 246)",
    "rgb(34, 197, 94)",
    "rgb(239, 68, 68)",
];

const CATEGORY_COLORS: [&str; 6] = [
    "rgb(99, 102, 241)",
    "rgb(34, 197, 94)",
    "rgb(245, 158, 11)",
    "rgb(239, 68, 68)",
    "rgb(139, 92, 246)",
    "rgb(59, 130, 246)",
];

fn status_labels() -> Vec<&'static str> {
    OrderStatus::ALL.iter().map(OrderStatus::label).collect()
}

fn doughnut(labels: Value, data: Value, colors: &[&str]) -> Value {
    json!({
        "type": "doughnut",
        "data": {
            "labels": labels,
            "datasets": [{ "data": data, "backgroundColor": colors }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "position": "bottom" } }
        }
    })
}

pub fn revenue_line(data: &ChartData) -> Value {
    json!({
        "type": "line",
        "data": {
            "labels": data.revenue_labels,
            "datasets": [{
                "label": "Revenue",
                "data": data.revenue_data,
                "borderColor": ACCENT,
                "backgroundColor": ACCENT_FILL,
                "fill": true,
                "tension": 0.4
            }]
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": { "legend": { "display": false } },
            "scales": { "y": { "beginAtZero": true, "ticks": {} } }
        }
    })
}

pub fn orders_by_status(data: &ChartData) -> Value {
    doughnut(
        json!(status_labels()),
        json!(data.orders_by_status),
        &STATUS_COLORS,
    )
}

pub fn category_doughnut(data: &ChartData) -> Value {
    doughnut(
        json!(data.category_labels),
        json!(data.category_data),
        &CATEGORY_COLORS,
    )
}

pub fn status_doughnut(data: &ChartData) -> Value {
    doughnut(
        json!(status_labels()),
        json!(data.status_data),
        &STATUS_COLORS,
    )
}

/// Reports period selector: the date range inputs show only for `custom`.
pub fn show_custom_range(period: &str) -> bool {
    period == "custom"
}
