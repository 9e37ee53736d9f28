//! Markup for product cards appended by infinite scroll.
//!
//! Must match the server-rendered cards so both bind the same handlers.

use shop_api_types::ProductCard;

pub const LOW_STOCK_LIMIT: i64 = 5;

const CART_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><circle cx="9" cy="21" r="1"></circle><circle cx="20" cy="21" r="1"></circle><path d="M1 1h4l2.68 13.39a2 2 0 0 0 2 1.61h9.72a2 2 0 0 0 2-1.61L23 6H6"></path></svg>"#;

const PLACEHOLDER: &str = r#"<div class="product-placeholder"><svg viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5"><rect x="3" y="3" width="18" height="18" rx="2" ry="2"></rect><circle cx="8.5" cy="8.5" r="1.5"></circle><polyline points="21 15 16 10 5 21"></polyline></svg></div>"#;

pub const CHECK_ICON: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><polyline points="20 6 9 17 4 12"></polyline></svg>"#;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn stock_badge(stock: i64) -> String {
    if stock <= 0 {
        r#"<span class="product-badge out-of-stock">Out of Stock</span>"#.to_owned()
    } else if stock <= LOW_STOCK_LIMIT {
        format!(r#"<span class="product-badge low-stock">Only {stock} left!</span>"#)
    } else {
        String::new()
    }
}

pub fn render_product_card(product: &ProductCard) -> String {
    let name = escape_html(&product.name);
    let id = product.id;

    let image = match product.image_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => format!(
            r#"<img src="{}" alt="{name}" loading="lazy">"#,
            escape_html(url)
        ),
        None => PLACEHOLDER.to_owned(),
    };

    let button = if product.stock > 0 {
        format!(
            r#"<button class="btn btn-sm btn-primary add-to-cart-btn" data-product-id="{id}">{CART_ICON} Add to Cart</button>"#
        )
    } else {
        r#"<button class="btn btn-sm" disabled>Out of Stock</button>"#.to_owned()
    };

    format!(
        r#"<div class="product-card" data-product-id="{id}"><div class="product-image">{image}{badge}</div><div class="product-info"><span class="product-category">{category}</span><h3 class="product-name">{name}</h3><p class="product-description">{description}</p><div class="product-footer"><span class="product-price">{price}</span>{button}</div></div></div>"#,
        badge = stock_badge(product.stock),
        category = escape_html(&product.category),
        description = escape_html(&product.description),
        price = product.price,
    )
}
