use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, RgbImage};
use reqwest::StatusCode;
use std::path::Path;
use std::time::Duration;

use storyforge::Config;
use storyforge::gateway::run_gateway_with_listener;

/// Upstream path for the default text model.
pub const TEXT_MODEL_PATH: &str = "/models/gemini-2.5-flash-preview-05-20:generateContent";
/// Upstream path for the default image model.
pub const IMAGE_MODEL_PATH: &str = "/models/gemini-2.5-flash-image-preview:generateContent";
/// Upstream path for the default TTS model.
pub const TTS_MODEL_PATH: &str = "/models/gemini-2.5-flash-preview-tts:generateContent";

pub struct TestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Spin up the gateway against the given upstream base URL, serving the
    /// repository's real prompt templates.
    pub async fn start(upstream_url: &str, api_key: Option<&str>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("listener should expose a local address")
            .port();

        let mut config = Config::default();
        config.upstream_base_url = upstream_url.to_string();
        config.api_key = api_key.map(String::from);
        config.templates_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("prompts");

        let handle = tokio::spawn(async move { run_gateway_with_listener(listener, config).await });

        wait_until_ready(port).await;

        Self { port, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

/// Solid-color PNG for use as a mocked upstream image payload.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        image::Rgb([90, 120, 30]),
    ));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("png encoding should succeed");
    out.into_inner()
}

pub fn b64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

pub fn b64_decode(data: &str) -> Vec<u8> {
    BASE64.decode(data).expect("payload should be valid base64")
}

/// Upstream response carrying a single text part.
pub fn text_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}]}
        }]
    })
}

/// Upstream response carrying a single inline binary part.
pub fn inline_data_response(mime_type: &str, data: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"inlineData": {"mimeType": mime_type, "data": data}}]}
        }]
    })
}
