//! Storefront client core.
//!
//! Host-independent logic behind the admin dashboard and storefront pages:
//! cart synchronisation, checkout, infinite-scroll catalog loading, admin
//! confirmation flows. Every effect goes through an explicit port
//! ([`ShopTransport`], [`Host`], the view traits) so the browser binding and
//! the tests plug in their own implementations.

pub mod account;
pub mod admin_orders;
pub mod admin_products;
pub mod busy;
pub mod cart;
pub mod catalog;
pub mod charts;
pub mod checkout;
pub mod client;
pub mod config;
pub mod delete;
pub mod error;
pub mod forms;
pub mod host;
pub mod kebab;
pub mod modal;
pub mod order_cancel;
pub mod render;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use busy::{BusyControl, BusyGuard};
pub use client::ShopClient;
pub use config::{Endpoints, ShopConfig};
pub use error::{ClientError, ClientResult};
pub use host::{Host, Toast, ToastLevel};
pub use modal::{Modal, ModalState, ModalView, PendingAction};
pub use transport::{RequestContext, ShopTransport};

pub use shop_api_types as types;
