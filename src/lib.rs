//! Client-side core of a bridal-wear storefront: search state and URL sync,
//! type-ahead search, the bid dialog, card payment form and transaction history.

pub mod api;
pub mod bid;
pub mod checkout;
pub mod config;
pub mod events;
pub mod format;
pub mod history;
pub mod logging;
pub mod overlay;
pub mod state;
