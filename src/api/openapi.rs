//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get, web};
use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "File Item Server",
        version = "0.1.0",
        description = "Upload items with an attachment and images, then fetch the stored files back"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        // File item endpoints
        api::file_items::new_item_form,
        api::file_items::save_item,
        api::file_items::get_item,
        api::file_items::download_image,
        api::file_items::download_attach,
        // Converter endpoints
        api::converter::converter_view,
        api::converter::converter_form,
        api::converter::converter_edit,
        api::converter::formatter_form,
        api::converter::formatter_edit,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            // File items
            api::file_items::FileItemUpload,
            models::UploadFile,
            models::FileItem,
            models::FileItemView,
            models::ImageView,
            models::AttachmentView,
            // Converter
            models::IpPortForm,
            models::FormatterForm,
            models::ConverterView,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Files", description = "Item upload and file download"),
        (name = "Converter", description = "Typed value conversion and formatting")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure OpenAPI routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
