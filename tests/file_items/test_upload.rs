//! E2E tests: item upload and detail view.

use actix_web::http::header;
use actix_web::test;
use tempfile::tempdir;

use super::test_helpers::*;

/// Empty form is served as HTML with the expected multipart fields.
#[actix_rt::test]
async fn test_new_item_form() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), TEST_MAX_UPLOAD_SIZE).await;

    let req = test::TestRequest::get().uri("/file/items/new").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = test::read_body(resp).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("enctype=\"multipart/form-data\""));
    assert!(html.contains("name=\"itemName\""));
    assert!(html.contains("name=\"attachFile\""));
    assert!(html.contains("name=\"imageFiles\""));
}

/// Upload with attachment and two images redirects to the new item.
#[actix_rt::test]
async fn test_upload_redirects_to_item() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), TEST_MAX_UPLOAD_SIZE).await;

    let body = MultipartBody::new()
        .text("itemName", "desk")
        .file("attachFile", "manual.pdf", b"abc")
        .file("imageFiles", "a.png", b"1")
        .file("imageFiles", "b.png", b"2");
    let (status, location) = upload(&app, body).await;

    assert_eq!(status, 303);
    assert_eq!(location.as_deref(), Some("/file/items/1"));
    assert_eq!(stored_file_count(dir.path()), 3);

    let item = get_item_json(&app, 1).await;
    assert_eq!(item["id"], 1);
    assert_eq!(item["itemName"], "desk");
    assert_eq!(item["attachFile"]["uploadFileName"], "manual.pdf");
    assert_eq!(item["attachFile"]["url"], "/file/attach/1");

    let images = item["imageFiles"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["uploadFileName"], "a.png");
    assert_eq!(images[1]["uploadFileName"], "b.png");

    let store_name = images[0]["storeFileName"].as_str().unwrap();
    assert!(store_name.ends_with(".png"));
    assert_ne!(store_name, "a.png");
    assert_eq!(images[0]["url"], format!("/file/images/{store_name}"));
}

/// Each upload gets the next id.
#[actix_rt::test]
async fn test_upload_assigns_sequential_ids() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), TEST_MAX_UPLOAD_SIZE).await;

    let (_, first) = upload(&app, MultipartBody::new().text("itemName", "desk")).await;
    let (_, second) = upload(&app, MultipartBody::new().text("itemName", "chair")).await;

    assert_eq!(first.as_deref(), Some("/file/items/1"));
    assert_eq!(second.as_deref(), Some("/file/items/2"));
    assert_eq!(get_item_json(&app, 2).await["itemName"], "chair");
}

/// Empty file inputs are skipped and leave nothing on disk.
#[actix_rt::test]
async fn test_upload_with_empty_file_slots() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), TEST_MAX_UPLOAD_SIZE).await;

    let body = MultipartBody::new()
        .text("itemName", "lamp")
        .file("attachFile", "", b"")
        .file("imageFiles", "", b"")
        .file("imageFiles", "", b"");
    let (status, location) = upload(&app, body).await;

    assert_eq!(status, 303);
    assert_eq!(location.as_deref(), Some("/file/items/1"));
    assert_eq!(stored_file_count(dir.path()), 0);

    let item = get_item_json(&app, 1).await;
    assert_eq!(item["itemName"], "lamp");
    assert!(item["attachFile"].is_null());
    assert_eq!(item["imageFiles"].as_array().unwrap().len(), 0);
}

/// Mixed empty and filled image slots keep only the filled ones, in order.
#[actix_rt::test]
async fn test_upload_filters_empty_images_in_order() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), TEST_MAX_UPLOAD_SIZE).await;

    let body = MultipartBody::new()
        .text("itemName", "shelf")
        .file("imageFiles", "first.jpg", b"x")
        .file("imageFiles", "", b"")
        .file("imageFiles", "second.gif", b"y");
    upload(&app, body).await;

    let item = get_item_json(&app, 1).await;
    let names: Vec<_> = item["imageFiles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|image| image["uploadFileName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["first.jpg", "second.gif"]);
    assert_eq!(stored_file_count(dir.path()), 2);
}

/// Two files with the same original name are stored under different names.
#[actix_rt::test]
async fn test_same_original_name_stored_twice() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), TEST_MAX_UPLOAD_SIZE).await;

    let body = MultipartBody::new()
        .text("itemName", "twins")
        .file("imageFiles", "same.png", b"1")
        .file("imageFiles", "same.png", b"2");
    upload(&app, body).await;

    let item = get_item_json(&app, 1).await;
    let images = item["imageFiles"].as_array().unwrap();
    assert_ne!(images[0]["storeFileName"], images[1]["storeFileName"]);
    assert_eq!(stored_file_count(dir.path()), 2);
}

/// Unknown item id → 404.
#[actix_rt::test]
async fn test_unknown_item_not_found() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), TEST_MAX_UPLOAD_SIZE).await;

    let req = test::TestRequest::get().uri("/file/items/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

/// Body over the configured limit → 413 and no item.
#[actix_rt::test]
async fn test_upload_too_large_rejected() {
    let dir = tempdir().unwrap();
    let app = create_test_app(dir.path(), 16).await;

    let body = MultipartBody::new()
        .text("itemName", "big")
        .file("attachFile", "big.bin", &[7u8; 64]);
    let (status, _) = upload(&app, body).await;

    assert_eq!(status, 413);
    assert_eq!(stored_file_count(dir.path()), 0);

    let req = test::TestRequest::get().uri("/file/items/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
