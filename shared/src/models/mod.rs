//! Domain models for the bar reorder planner

mod category;
mod item;
mod log;
mod sales;
mod settings;

pub use category::*;
pub use item::*;
pub use log::*;
pub use sales::*;
pub use settings::*;
