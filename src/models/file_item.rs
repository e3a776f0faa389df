//! Item records with their stored attachment and images.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A file as uploaded by a client paired with the name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFile {
    /// Filename supplied by the client, kept for display and download only
    pub upload_file_name: String,
    /// Server-generated unique filename inside the storage directory
    pub store_file_name: String,
}

impl UploadFile {
    pub fn new(upload_file_name: impl Into<String>, store_file_name: impl Into<String>) -> Self {
        UploadFile {
            upload_file_name: upload_file_name.into(),
            store_file_name: store_file_name.into(),
        }
    }
}

/// An item record that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFileItem {
    pub item_name: String,
    pub attach_file: Option<UploadFile>,
    pub image_files: Vec<UploadFile>,
}

/// A persisted item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileItem {
    /// Identifier assigned by the repository on save
    pub id: i64,
    pub item_name: String,
    /// Single non-image attachment, if one was uploaded
    pub attach_file: Option<UploadFile>,
    /// Images in upload order
    pub image_files: Vec<UploadFile>,
}

impl FileItem {
    /// Attach a repository-assigned id to an unsaved record.
    pub fn from_new(id: i64, item: NewFileItem) -> Self {
        FileItem {
            id,
            item_name: item.item_name,
            attach_file: item.attach_file,
            image_files: item.image_files,
        }
    }
}

/// Image entry of an item detail response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub upload_file_name: String,
    pub store_file_name: String,
    /// Inline retrieval URL
    pub url: String,
}

/// Attachment entry of an item detail response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub upload_file_name: String,
    /// Download URL that preserves the original filename
    pub url: String,
}

/// Item detail response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileItemView {
    pub id: i64,
    pub item_name: String,
    pub attach_file: Option<AttachmentView>,
    pub image_files: Vec<ImageView>,
}

impl From<&FileItem> for FileItemView {
    fn from(item: &FileItem) -> Self {
        FileItemView {
            id: item.id,
            item_name: item.item_name.clone(),
            attach_file: item.attach_file.as_ref().map(|attach| AttachmentView {
                upload_file_name: attach.upload_file_name.clone(),
                url: format!("/file/attach/{}", item.id),
            }),
            image_files: item
                .image_files
                .iter()
                .map(|image| ImageView {
                    upload_file_name: image.upload_file_name.clone(),
                    store_file_name: image.store_file_name.clone(),
                    url: format!("/file/images/{}", image.store_file_name),
                })
                .collect(),
        }
    }
}
