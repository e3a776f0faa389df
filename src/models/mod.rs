//! Domain models for the file item server.

pub mod converter;
pub mod file_item;

// Re-export commonly used types
pub use converter::{
    ConversionError, ConverterView, FormattedDateTime, FormatterForm, GroupedNumber, IpPort,
    IpPortForm,
};
pub use file_item::{AttachmentView, FileItem, FileItemView, ImageView, NewFileItem, UploadFile};
