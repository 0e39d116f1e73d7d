//! Domain model shared by the checkout relay server and its clients.
//!
//! Holds the [`CheckoutRecord`](checkout::CheckoutRecord) entity, the
//! row mapping between records and spreadsheet columns A–E, and the JSON
//! wire types exchanged with the relay endpoint.

pub mod checkout;
pub mod error;
pub mod relay;
pub mod rows;
