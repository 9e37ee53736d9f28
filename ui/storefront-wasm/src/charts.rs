//! Dashboard and reports: Chart.js canvases and the report period filter.

use crate::events::listen;
use crate::{PageContext, dom};
use serde::Serialize;
use serde_json::Value;
use shop_client_core::charts::{
    CATEGORY_CANVAS, CURRENCY_TICK_BODY, ORDERS_CANVAS, REVENUE_CANVAS, STATUS_CANVAS,
    category_doughnut, orders_by_status, revenue_line, show_custom_range, status_doughnut,
};
use shop_client_core::types::ChartData;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
    /// Global `Chart` from the Chart.js script tag.
    type Chart;

    #[wasm_bindgen(constructor, catch)]
    fn new(canvas: &HtmlCanvasElement, config: &JsValue) -> Result<Chart, JsValue>;
}

type Builder = fn(&ChartData) -> Value;

const CANVASES: [(&str, Builder, bool); 4] = [
    (REVENUE_CANVAS, revenue_line, true),
    (ORDERS_CANVAS, orders_by_status, false),
    (CATEGORY_CANVAS, category_doughnut, false),
    (STATUS_CANVAS, status_doughnut, false),
];

pub fn mount(ctx: &PageContext) -> Result<(), JsValue> {
    mount_period_filter();

    let Some(data) = ctx.config.chart_data.as_ref() else {
        return Ok(());
    };
    for (id, build, currency_ticks) in CANVASES {
        let Some(canvas) = dom::by_id_typed::<HtmlCanvasElement>(id) else {
            continue;
        };
        if let Err(err) = draw(&canvas, &build(data), currency_ticks) {
            warn!(canvas = id, error = ?err, "chart not drawn");
        } else {
            debug!(canvas = id, "chart drawn");
        }
    }
    Ok(())
}

fn draw(canvas: &HtmlCanvasElement, config: &Value, currency_ticks: bool) -> Result<(), JsValue> {
    let config = config.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;
    if currency_ticks {
        attach_currency_ticks(&config)?;
    }
    Chart::new(canvas, &config)?;
    Ok(())
}

/// `options.scales.y.ticks.callback`: a function cannot travel through JSON.
fn attach_currency_ticks(config: &JsValue) -> Result<(), JsValue> {
    let ticks = ["options", "scales", "y", "ticks"]
        .into_iter()
        .try_fold(config.clone(), |obj, key| js_sys::Reflect::get(&obj, &JsValue::from_str(key)))?;
    let callback = js_sys::Function::new_with_args("value", CURRENCY_TICK_BODY);
    js_sys::Reflect::set(&ticks, &JsValue::from_str("callback"), &callback)?;
    Ok(())
}

/// Reports: the date inputs show only for the custom period.
fn mount_period_filter() {
    let Some(select) = dom::by_id("period") else {
        return;
    };
    listen(&select, "change", move |_| {
        let visible = show_custom_range(&dom::control_value("period"));
        for id in ["date-from-group", "date-to-group"] {
            if let Some(group) = dom::by_id(id) {
                dom::show(&group, visible, "block");
            }
        }
    });
}
