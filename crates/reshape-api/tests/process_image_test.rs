mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use helpers::fixtures::create_test_png;
use helpers::{api_path, setup_server_with_engines, setup_test_app, test_config, SlowImageEngine};
use image::GenericImageView;
use reshape_processing::PdfCompressor;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

fn png_part(data: Vec<u8>) -> Part {
    Part::bytes(Bytes::from(data))
        .file_name("photo.png")
        .mime_type("image/png")
}

#[tokio::test]
async fn test_resize_by_width_returns_image_and_metadata() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", png_part(create_test_png(800, 600)))
        .add_text("requiredWidth", "400");

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"processed-image.png\""
    );

    let metadata: Value = serde_json::from_str(
        response
            .header("x-file-metadata")
            .to_str()
            .expect("metadata header is ascii"),
    )
    .expect("metadata header is json");
    assert_eq!(metadata["width"], "400 px");
    assert_eq!(metadata["height"], "300 px");
    assert_eq!(metadata["format"], "png");
    assert!(metadata["size"].as_str().unwrap().ends_with(" KB"));

    let decoded = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!(decoded.dimensions(), (400, 300));
    assert_eq!(app.image_engine_calls(), 1);
}

#[tokio::test]
async fn test_rotated_resize_metadata_matches_body() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", png_part(create_test_png(800, 600)))
        .add_text("requiredWidth", "400")
        .add_text("requiredRotation", "90");

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    response.assert_status_ok();
    let metadata: Value = serde_json::from_str(
        response
            .header("x-file-metadata")
            .to_str()
            .expect("metadata header is ascii"),
    )
    .expect("metadata header is json");

    let decoded = image::load_from_memory(response.as_bytes()).unwrap();
    let (width, height) = decoded.dimensions();
    assert_eq!((width, height), (400, 533));
    assert_eq!(metadata["width"], format!("{} px", width));
    assert_eq!(metadata["height"], format!("{} px", height));
}

#[tokio::test]
async fn test_oversized_derived_dimension_is_rejected() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", png_part(create_test_png(1, 5000)))
        .add_text("requiredWidth", "8192");

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn test_parameters_inside_data_field_are_applied() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", png_part(create_test_png(100, 50)))
        .add_text(
            "data",
            r#"{"requiredHeight": 25, "requiredFormat": "jpg", "requiredQuality": 500}"#,
        );

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"processed-image.jpg\""
    );
    let decoded = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!(decoded.dimensions(), (50, 25));
}

#[tokio::test]
async fn test_non_image_upload_is_rejected_before_processing() {
    let app = setup_test_app();
    let part = Part::bytes(Bytes::from_static(b"hello world"))
        .file_name("notes.txt")
        .mime_type("text/plain");
    let form = MultipartForm::new().add_part("file", part);

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["statusCode"], 400);
    assert_eq!(body["message"], "Only image files are allowed");
    assert_eq!(app.image_engine_calls(), 0);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_before_processing() {
    let app = setup_test_app();
    let form =
        MultipartForm::new().add_part("file", png_part(vec![0u8; 5 * 1024 * 1024 + 1024]));

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["statusCode"], 400);
    assert_eq!(app.image_engine_calls(), 0);
}

#[tokio::test]
async fn test_missing_file_is_rejected() {
    let app = setup_test_app();
    let form = MultipartForm::new().add_text("requiredWidth", "100");

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["message"], "Please provide valid image for processing");
    assert_eq!(app.image_engine_calls(), 0);
}

#[tokio::test]
async fn test_invalid_parameters_list_every_violation() {
    let app = setup_test_app();
    let form = MultipartForm::new()
        .add_part("file", png_part(create_test_png(10, 10)))
        .add_text("requiredWidth", "wide")
        .add_text("requiredHeight", "0");

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["statusCode"], 400);
    let violations = body["data"].as_array().expect("violations listed in data");
    assert_eq!(violations.len(), 2);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Validation failed: "));
    assert_eq!(app.image_engine_calls(), 0);
}

#[tokio::test]
async fn test_unrecognized_format_falls_back_to_binary_download() {
    let app = setup_test_app();
    let source = create_test_png(16, 16);
    let form = MultipartForm::new()
        .add_part("file", png_part(source.clone()))
        .add_text("requiredFormat", "tiff");

    let response = app
        .client()
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/octet-stream");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"processed-image.bin\""
    );
    assert_eq!(response.as_bytes().as_ref(), source.as_slice());
}

#[tokio::test]
async fn test_slow_engine_times_out_with_generic_message() {
    let config = reshape_core::Config {
        processing_timeout_secs: 1,
        ..test_config()
    };
    let server = setup_server_with_engines(
        config,
        Arc::new(SlowImageEngine(Duration::from_secs(2))),
        Arc::new(PdfCompressor::default()),
    );
    let form = MultipartForm::new().add_part("file", png_part(create_test_png(8, 8)));

    let response = server
        .post(&api_path("/process-image"))
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["message"], "Error while processing the request.");
}
