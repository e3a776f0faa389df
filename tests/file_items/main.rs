//! File item E2E test suite.
//!
//! Drives the upload and download routes through the actix test service,
//! storing files in a temporary directory.
//!
//! Run with: cargo test --test file_items

mod test_helpers;

mod test_upload;
