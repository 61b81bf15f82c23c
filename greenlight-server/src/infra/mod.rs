pub mod app_state;
pub mod background;
pub mod database;
pub mod errors;
pub mod json;
