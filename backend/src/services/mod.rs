//! Business logic services for the Bar Reorder Planner

pub mod items;
pub mod notes;
pub mod sales;
pub mod settings;
pub mod store;
pub mod wastage;

pub use items::ItemsService;
pub use notes::NotesService;
pub use sales::SalesService;
pub use settings::SettingsService;
pub use wastage::WastageService;
