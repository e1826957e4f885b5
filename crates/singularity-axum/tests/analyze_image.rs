//! Integration tests for the multipart image analysis endpoint.

mod common;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use serde_json::json;
use singularity_axum::bootstrap::CorsConfig;
use singularity_axum::routes::create_router;
use singularity_core::{DEFAULT_VISION_PROMPT, GatewayError};
use tower::ServiceExt;

use common::{Part, ScriptedGateway, body_json, context_with, get, multipart_request, png_part};

fn app_with(gateway: Arc<ScriptedGateway>) -> axum::Router {
    create_router(context_with(gateway), &CorsConfig::AllowAll)
}

#[tokio::test]
async fn single_image_keeps_its_file_name() {
    let gateway = Arc::new(ScriptedGateway::replying("A red rectangle."));
    let app = app_with(Arc::clone(&gateway));

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/analyze-image/",
            &[
                Part::Text {
                    name: "prompt",
                    value: "What colour is this?",
                },
                png_part("file0", "red.png"),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"response": "A red rectangle.", "filename": "red.png"})
    );
    assert_eq!(gateway.vision_calls.load(Ordering::SeqCst), 1);

    let history = body_json(app.oneshot(get("/history")).await.unwrap()).await;
    assert_eq!(
        history["messages"],
        json!([
            {"role": "user", "content": "What colour is this?"},
            {"role": "assistant", "content": "A red rectangle."}
        ])
    );
}

#[tokio::test]
async fn several_images_are_combined_without_trailing_slash() {
    let gateway = Arc::new(ScriptedGateway::replying("Two red rectangles."));

    let response = app_with(gateway)
        .oneshot(multipart_request(
            "/analyze-image",
            &[png_part("file0", "a.png"), png_part("file1", "b.png")],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["filename"], "combined_2_images.png");
}

#[tokio::test]
async fn empty_prompt_uses_default_question() {
    let gateway = Arc::new(ScriptedGateway::replying("Something red."));
    let app = app_with(gateway);

    app.clone()
        .oneshot(multipart_request(
            "/analyze-image/",
            &[
                Part::Text {
                    name: "prompt",
                    value: "",
                },
                png_part("file0", "red.png"),
            ],
        ))
        .await
        .unwrap();

    let history = body_json(app.oneshot(get("/history")).await.unwrap()).await;
    assert_eq!(history["messages"][0]["content"], DEFAULT_VISION_PROMPT);
}

#[tokio::test]
async fn no_files_is_rejected_without_recording() {
    let gateway = Arc::new(ScriptedGateway::replying("unused"));
    let app = app_with(Arc::clone(&gateway));

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/analyze-image/",
            &[Part::Text {
                name: "prompt",
                value: "anything?",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["type"], "NO_IMAGES");
    assert_eq!(gateway.vision_calls.load(Ordering::SeqCst), 0);

    let history = body_json(app.oneshot(get("/history")).await.unwrap()).await;
    assert_eq!(history["messages"], json!([]));
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let response = app_with(Arc::new(ScriptedGateway::replying("unused")))
        .oneshot(multipart_request(
            "/analyze-image/",
            &[
                png_part("file0", "ok.png"),
                Part::File {
                    name: "file1",
                    file_name: "notes.txt",
                    content_type: "text/plain",
                    bytes: b"hello",
                },
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["type"], "INVALID_IMAGE_TYPE");
    assert!(body["error"].as_str().unwrap().contains("notes.txt"));
}

#[tokio::test]
async fn more_than_four_images_is_rejected() {
    let parts: Vec<Part<'_>> = ["file0", "file1", "file2", "file3", "file4"]
        .into_iter()
        .map(|name| png_part(name, "x.png"))
        .collect();

    let response = app_with(Arc::new(ScriptedGateway::replying("unused")))
        .oneshot(multipart_request("/analyze-image/", &parts))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["type"], "TOO_MANY_IMAGES");
    assert_eq!(body["metadata"], json!({"count": 5, "max": 4}));
}

#[tokio::test]
async fn corrupt_image_is_422_and_still_recorded() {
    let gateway = Arc::new(ScriptedGateway::replying("unused"));
    let app = app_with(Arc::clone(&gateway));

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/analyze-image/",
            &[Part::File {
                name: "file0",
                file_name: "broken.png",
                content_type: "image/png",
                bytes: b"this is not a png",
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["type"], "INVALID_IMAGE_DATA");
    assert_eq!(gateway.vision_calls.load(Ordering::SeqCst), 0);

    let history = body_json(app.oneshot(get("/history")).await.unwrap()).await;
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert!(
        messages[1]["content"]
            .as_str()
            .unwrap()
            .starts_with("[Vision Error]")
    );
}

#[tokio::test]
async fn vision_gateway_failure_is_recorded_in_history() {
    let gateway = Arc::new(ScriptedGateway::failing(GatewayError::Api {
        status: 500,
        message: "upstream exploded".into(),
    }));
    let app = app_with(gateway);

    let response = app
        .clone()
        .oneshot(multipart_request(
            "/analyze-image/",
            &[png_part("file0", "red.png")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let history = body_json(app.oneshot(get("/history")).await.unwrap()).await;
    let reply = history["messages"][1]["content"].as_str().unwrap();
    assert!(reply.starts_with("[Vision Error using gpt-4o for image]"));
    assert!(reply.contains("upstream exploded"));
}

#[tokio::test]
async fn unknown_fields_and_empty_file_inputs_are_ignored() {
    let gateway = Arc::new(ScriptedGateway::replying("Seen."));

    let response = app_with(gateway)
        .oneshot(multipart_request(
            "/analyze-image/",
            &[
                Part::Text {
                    name: "session",
                    value: "ignored",
                },
                png_part("file0", "red.png"),
                Part::File {
                    name: "file1",
                    file_name: "",
                    content_type: "application/octet-stream",
                    bytes: b"",
                },
            ],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["filename"], "red.png");
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let ctx = context_with(Arc::new(ScriptedGateway::replying("unused"))).with_max_upload_bytes(64);
    let app = create_router(ctx, &CorsConfig::AllowAll);

    let big = vec![0u8; 4096];
    let response = app
        .oneshot(multipart_request(
            "/analyze-image/",
            &[Part::File {
                name: "file0",
                file_name: "big.png",
                content_type: "image/png",
                bytes: &big,
            }],
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn missing_multipart_content_type_is_bad_request() {
    let response = app_with(Arc::new(ScriptedGateway::replying("unused")))
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/analyze-image/")
                .body(axum::body::Body::from("plain"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);
}
