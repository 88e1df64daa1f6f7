//! HTTP request handlers

mod health;
mod items;
mod notes;
mod purchase_orders;
mod sales;
mod settings;
mod wastage;

pub use health::*;
pub use items::*;
pub use notes::*;
pub use purchase_orders::*;
pub use sales::*;
pub use settings::*;
pub use wastage::*;

use serde::Serialize;

use crate::services::SettingsService;
use crate::AppState;

/// Body returned by endpoints with nothing else to say
#[derive(Serialize)]
pub struct Ack {
    pub ok: bool,
}

pub(crate) fn settings_service(state: &AppState) -> SettingsService {
    SettingsService::new(state.db.clone(), state.config.reorder.clone())
}
