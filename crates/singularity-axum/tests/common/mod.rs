//! Shared helpers for singularity-axum integration tests.

// Each test binary uses a different subset
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use singularity_axum::AxumContext;
use singularity_core::{
    ChatOrchestrator, Completion, GatewayError, ModelGateway, OrchestratorSettings,
    TextCompletionRequest, VisionCompletionRequest,
};
use singularity_imaging::VerticalCompositor;

pub const BOUNDARY: &str = "singularity-test-boundary";

/// A 2x1 red RGB PNG.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x01, 0x08, 0x02, 0x00, 0x00, 0x00, 0x7b,
    0x40, 0xe8, 0xdd, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8,
    0xcf, 0xc0, 0x00, 0x44, 0x00, 0x08, 0xfe, 0x01, 0xff, 0xc6, 0x9e, 0x79, 0xf7, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Gateway with a fixed answer for every call.
pub struct ScriptedGateway {
    result: Result<String, GatewayError>,
    pub text_calls: AtomicUsize,
    pub vision_calls: AtomicUsize,
}

impl ScriptedGateway {
    pub fn replying(reply: &str) -> Self {
        Self::with_result(Ok(reply.to_string()))
    }

    pub fn failing(err: GatewayError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<String, GatewayError>) -> Self {
        Self {
            result,
            text_calls: AtomicUsize::new(0),
            vision_calls: AtomicUsize::new(0),
        }
    }

    fn answer(&self) -> Result<Completion, GatewayError> {
        self.result.clone().map(|content| Completion {
            model: "gpt-4o".to_string(),
            content,
        })
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn complete_text(
        &self,
        _request: TextCompletionRequest,
    ) -> Result<Completion, GatewayError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.answer()
    }

    async fn complete_vision(
        &self,
        _request: VisionCompletionRequest,
    ) -> Result<Completion, GatewayError> {
        self.vision_calls.fetch_add(1, Ordering::SeqCst);
        self.answer()
    }
}

/// Context with the real compositor and the given gateway.
pub fn context_with(gateway: Arc<dyn ModelGateway>) -> AxumContext {
    AxumContext::new(ChatOrchestrator::new(
        gateway,
        Arc::new(VerticalCompositor::new()),
        OrchestratorSettings::with_defaults(),
    ))
}

pub fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// One part of a multipart body.
pub enum Part<'a> {
    Text {
        name: &'a str,
        value: &'a str,
    },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn png_part<'a>(name: &'a str, file_name: &'a str) -> Part<'a> {
    Part::File {
        name,
        file_name,
        content_type: "image/png",
        bytes: TINY_PNG,
    }
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
