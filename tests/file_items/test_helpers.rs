//! Shared test helpers for file item E2E tests.

use actix_web::http::header;
use actix_web::{App, dev::ServiceResponse, test, web};
use file_item_lib::api::{self, FileItemController};
use file_item_lib::db::MemoryFileItemRepository;
use file_item_lib::services::FileStore;
use std::path::Path;
use std::sync::Arc;

/// Upload limit used by the default test app.
pub const TEST_MAX_UPLOAD_SIZE: usize = 1024 * 1024;

const BOUNDARY: &str = "----file-item-test-boundary";

/// Create a test app storing files under `file_dir`.
pub async fn create_test_app(
    file_dir: &Path,
    max_upload_size: usize,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let controller = FileItemController::new(
        Arc::new(MemoryFileItemRepository::new()),
        FileStore::new(file_dir),
        max_upload_size,
    );

    test::init_service(
        App::new()
            .app_data(web::Data::new(controller))
            .configure(api::configure_file_item_routes),
    )
    .await
}

/// Builder for `multipart/form-data` request bodies.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Append a file field with an ASCII filename.
    pub fn file(self, name: &str, filename: &str, content: &[u8]) -> Self {
        let disposition = format!("form-data; name=\"{name}\"; filename=\"{filename}\"");
        self.part(&disposition, content)
    }

    /// Append a file field whose filename travels as an RFC 5987 extended value.
    pub fn file_utf8(self, name: &str, filename: &str, content: &[u8]) -> Self {
        let disposition = format!(
            "form-data; name=\"{name}\"; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        );
        self.part(&disposition, content)
    }

    fn part(mut self, disposition: &str, content: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Close the body and build the upload request.
    pub fn into_request(mut self) -> actix_http::Request {
        self.body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        test::TestRequest::post()
            .uri("/file/items/new")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(self.body)
            .to_request()
    }
}

/// Upload a form and return the status and `Location` header.
pub async fn upload<S>(app: &S, body: MultipartBody) -> (u16, Option<String>)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let resp = test::call_service(app, body.into_request()).await;
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (resp.status().as_u16(), location)
}

/// Fetch the JSON detail of an item.
pub async fn get_item_json<S>(app: &S, id: i64) -> serde_json::Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get()
        .uri(&format!("/file/items/{id}"))
        .to_request();
    test::call_and_read_body_json(app, req).await
}

/// Number of files in the storage directory.
pub fn stored_file_count(file_dir: &Path) -> usize {
    std::fs::read_dir(file_dir).unwrap().count()
}
