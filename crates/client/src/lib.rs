//! Client side of the checkout flow.
//!
//! [`CheckoutService`] records and lists checkout events through a
//! [`CheckoutStore`]. Two stores exist: [`RelayStore`] goes through the
//! relay server (service-account auth lives there), [`DirectStore`] calls
//! the Sheets API itself with an API key. Which one is used is decided once,
//! from [`ClientConfig`], when the service is built.

pub mod config;
pub mod direct;
pub mod error;
pub mod relay;
pub mod service;
pub mod store;

pub use config::{ClientConfig, StoreMode};
pub use direct::DirectStore;
pub use error::ClientError;
pub use relay::RelayStore;
pub use service::CheckoutService;
pub use store::{build_store, CheckoutStore};
