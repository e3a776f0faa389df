//! API endpoint modules.

pub mod converter;
pub mod file_items;
pub mod health;
pub mod openapi;

pub use converter::configure_routes as configure_converter_routes;
pub use file_items::configure_routes as configure_file_item_routes;
pub use file_items::FileItemController;
pub use health::configure_health_routes;
pub use openapi::configure_routes as configure_openapi_routes;
pub use openapi::ApiDoc;
