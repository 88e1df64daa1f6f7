//! External API integrations

pub mod square;

pub use square::{PurchaseOrders, SquareClient};
