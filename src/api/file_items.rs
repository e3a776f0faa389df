//! Item upload and file download handlers.
//!
//! - `GET  /file/items/new`          empty upload form
//! - `POST /file/items/new`          multipart upload, redirects to the new item
//! - `GET  /file/items/{id}`         item detail
//! - `GET  /file/images/{filename}`  stored image bytes
//! - `GET  /file/attach/{item_id}`   attachment download under its original name

use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::http::header::{self, ContentType};
use actix_web::{CustomizeResponder, HttpResponse, Responder, get, post, web};
use futures_util::StreamExt;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::db::FileItemRepository;
use crate::error::{AppError, AppResult};
use crate::models::{FileItem, FileItemView, NewFileItem};
use crate::services::file_store::{FileStore, MultipartFile, extract_ext};

/// Multipart field carrying the item name.
const ITEM_NAME_FIELD: &str = "itemName";
/// Multipart field carrying the single attachment.
const ATTACH_FILE_FIELD: &str = "attachFile";
/// Multipart field carrying images; may repeat.
const IMAGE_FILES_FIELD: &str = "imageFiles";

const ITEM_FORM_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Item registration</title></head>
<body>
<h2>Item registration</h2>
<form action="/file/items/new" method="post" enctype="multipart/form-data">
  <ul>
    <li>Item name <input type="text" name="itemName"></li>
    <li>Attachment <input type="file" name="attachFile"></li>
    <li>Images <input type="file" multiple="multiple" name="imageFiles"></li>
  </ul>
  <input type="submit"/>
</form>
</body>
</html>
"#;

/// Upload form body after multipart parsing.
#[derive(Debug, Clone, Default)]
pub struct FileItemForm {
    pub item_name: String,
    pub attach_file: Option<MultipartFile>,
    pub image_files: Vec<MultipartFile>,
}

impl FileItemForm {
    /// Read the whole multipart body into a form.
    ///
    /// Unknown fields are drained and ignored. A repeated `attachFile` keeps
    /// the first part.
    pub async fn from_multipart(payload: &mut Multipart, max_size: usize) -> AppResult<Self> {
        let mut form = FileItemForm::default();
        let mut total_size: usize = 0;

        while let Some(item) = payload.next().await {
            let mut field = item?;

            let content_disposition = field
                .content_disposition()
                .ok_or_else(|| AppError::InvalidInput("Missing content disposition".to_string()))?;
            let field_name = content_disposition.get_name().unwrap_or_default().to_string();
            let filename = content_disposition
                .get_filename()
                .map(str::to_string)
                .or_else(|| {
                    content_disposition
                        .get_filename_ext()
                        .map(|ext| String::from_utf8_lossy(&ext.value).into_owned())
                })
                .unwrap_or_default();

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk?;
                total_size += chunk.len();
                if total_size > max_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "Upload exceeds the maximum size of {} bytes",
                        max_size
                    )));
                }
                data.extend_from_slice(&chunk);
            }

            match field_name.as_str() {
                ITEM_NAME_FIELD => {
                    form.item_name = String::from_utf8(data).map_err(|_| {
                        AppError::InvalidInput(format!("{} must be valid UTF-8", ITEM_NAME_FIELD))
                    })?;
                }
                ATTACH_FILE_FIELD => {
                    if form.attach_file.is_none() {
                        form.attach_file = Some(MultipartFile::new(filename, data));
                    }
                }
                IMAGE_FILES_FIELD => form.image_files.push(MultipartFile::new(filename, data)),
                other => debug!("Ignoring multipart field '{}'", other),
            }
        }

        Ok(form)
    }
}

/// Upload form schema for the OpenAPI document.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct FileItemUpload {
    item_name: String,
    #[schema(value_type = Option<String>, format = Binary)]
    attach_file: Option<Vec<u8>>,
    #[schema(value_type = Vec<String>, format = Binary)]
    image_files: Vec<Vec<u8>>,
}

/// Upload/download flow with its two collaborators.
pub struct FileItemController {
    repository: Arc<dyn FileItemRepository>,
    file_store: FileStore,
    max_upload_size: usize,
}

impl FileItemController {
    pub fn new(
        repository: Arc<dyn FileItemRepository>,
        file_store: FileStore,
        max_upload_size: usize,
    ) -> Self {
        FileItemController {
            repository,
            file_store,
            max_upload_size,
        }
    }

    /// Store the form's files and persist the resulting record.
    pub async fn save_item(&self, form: FileItemForm) -> AppResult<FileItem> {
        let attach_file = match &form.attach_file {
            Some(file) => self.file_store.store_file(file).await?,
            None => None,
        };
        let image_files = self.file_store.store_files(&form.image_files).await?;

        let item = self
            .repository
            .save(NewFileItem {
                item_name: form.item_name,
                attach_file,
                image_files,
            })
            .await?;

        info!(
            "Saved item {} '{}': attachment={}, images={}",
            item.id,
            item.item_name,
            item.attach_file.is_some(),
            item.image_files.len()
        );

        Ok(item)
    }

    pub async fn find_item(&self, id: i64) -> AppResult<FileItem> {
        self.repository.find_by_id(id).await
    }

    /// Resolve a stored image name to a path that exists on disk.
    pub async fn image_path(&self, filename: &str) -> AppResult<PathBuf> {
        validate_store_file_name(filename)?;
        self.stored_file(filename).await
    }

    /// Locate an item's attachment on disk together with its original filename.
    pub async fn attachment(&self, item_id: i64) -> AppResult<(String, PathBuf)> {
        let item = self.repository.find_by_id(item_id).await?;
        let attach_file = item
            .attach_file
            .ok_or_else(|| AppError::NotFound(format!("Attachment of item {}", item_id)))?;

        let path = self.stored_file(&attach_file.store_file_name).await?;
        Ok((attach_file.upload_file_name, path))
    }

    /// Path of a stored file that must be a readable regular file.
    ///
    /// A missing file is `NotFound`; anything else in its place is a
    /// storage failure.
    async fn stored_file(&self, store_file_name: &str) -> AppResult<PathBuf> {
        let path = self.file_store.full_path(store_file_name);
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("File {}", store_file_name)));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(AppError::FileSystem(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        Ok(path)
    }
}

/// Reject stored-name references that could escape the storage directory.
fn validate_store_file_name(filename: &str) -> AppResult<()> {
    if filename.is_empty()
        || filename.contains(['/', '\\'])
        || filename.contains("..")
        || filename.starts_with('.')
    {
        return Err(AppError::InvalidInput(format!(
            "Malformed file reference '{}'",
            filename
        )));
    }
    Ok(())
}

/// Build the Content-Disposition value for an attachment download.
///
/// The original filename is UTF-8 percent-encoded; only unreserved
/// characters pass through unchanged.
pub fn attachment_disposition(upload_file_name: &str) -> String {
    format!(
        "attachment; filename=\"{}\"",
        urlencoding::encode(upload_file_name)
    )
}

/// Empty upload form.
#[utoipa::path(
    get,
    path = "/file/items/new",
    tag = "Files",
    responses(
        (status = 200, description = "HTML upload form")
    )
)]
#[get("/items/new")]
pub async fn new_item_form() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(ITEM_FORM_HTML)
}

/// Upload a new item with its attachment and images.
#[utoipa::path(
    post,
    path = "/file/items/new",
    tag = "Files",
    request_body(content = FileItemUpload, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Item saved, redirect to its detail"),
        (status = 400, description = "Malformed multipart body", body = crate::error::ErrorResponse),
        (status = 413, description = "Upload too large", body = crate::error::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::error::ErrorResponse)
    )
)]
#[post("/items/new")]
pub async fn save_item(
    controller: web::Data<FileItemController>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = FileItemForm::from_multipart(&mut payload, controller.max_upload_size).await?;
    let item = controller.save_item(form).await?;

    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/file/items/{}", item.id)))
        .finish())
}

/// Item detail.
#[utoipa::path(
    get,
    path = "/file/items/{id}",
    tag = "Files",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item detail", body = FileItemView),
        (status = 404, description = "Unknown item", body = crate::error::ErrorResponse)
    )
)]
#[get("/items/{id}")]
pub async fn get_item(
    controller: web::Data<FileItemController>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let item = controller.find_item(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(FileItemView::from(&item)))
}

/// Stored image bytes, content type inferred from the extension.
#[utoipa::path(
    get,
    path = "/file/images/{filename}",
    tag = "Files",
    params(("filename" = String, Path, description = "Stored filename")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Malformed filename", body = crate::error::ErrorResponse),
        (status = 404, description = "No stored file", body = crate::error::ErrorResponse)
    )
)]
#[get("/images/{filename}")]
pub async fn download_image(
    controller: web::Data<FileItemController>,
    path: web::Path<String>,
) -> AppResult<NamedFile> {
    let filename = path.into_inner();
    let path = controller.image_path(&filename).await?;
    debug!("Serving image {}", path.display());
    Ok(NamedFile::open_async(path).await?)
}

/// Attachment download under its original filename.
#[utoipa::path(
    get,
    path = "/file/attach/{item_id}",
    tag = "Files",
    params(("item_id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 404, description = "Unknown item or attachment", body = crate::error::ErrorResponse),
        (status = 500, description = "Stored file unreadable", body = crate::error::ErrorResponse)
    )
)]
#[get("/attach/{item_id}")]
pub async fn download_attach(
    controller: web::Data<FileItemController>,
    path: web::Path<i64>,
) -> AppResult<CustomizeResponder<NamedFile>> {
    let (upload_file_name, path) = controller.attachment(path.into_inner()).await?;

    info!("uploadFileName={}", upload_file_name);

    let content_type = actix_files::file_extension_to_mime(extract_ext(&upload_file_name));
    let file = NamedFile::open_async(path).await?.set_content_type(content_type);

    Ok(file.customize().insert_header((
        header::CONTENT_DISPOSITION,
        attachment_disposition(&upload_file_name),
    )))
}

/// Configure file item routes under `/file`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/file")
            .service(new_item_form)
            .service(save_item)
            .service(get_item)
            .service(download_image)
            .service(download_attach),
    );
}
