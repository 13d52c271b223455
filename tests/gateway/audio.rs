use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{TTS_MODEL_PATH, TestServer, b64, inline_data_response};

fn u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[tokio::test]
async fn blank_text_is_rejected_without_contacting_upstream() {
    let upstream = MockServer::start().await;

    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/generate-audio"))
        .json(&json!({"text": "   \n\t"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("Text is required"));

    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn pcm_payload_is_framed_as_a_wav_download() {
    let pcm: Vec<u8> = (0u16..256).flat_map(u16::to_le_bytes).collect();

    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TTS_MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(inline_data_response(
            "audio/L16;codec=pcm;rate=16000",
            &b64(&pcm),
        )))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/generate-audio"))
        .json(&json!({"text": "The harbor was silent at dawn."}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "audio/wav"
    );
    assert!(
        response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("attachment")
    );

    let wav = response.bytes().await.unwrap();
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    // The MIME rate parameter made it into the header.
    assert_eq!(u32_le(&wav, 24), 16_000);
    // Payload byte-for-byte after the 44-byte header.
    assert_eq!(&wav[44..], &pcm[..]);
}

#[tokio::test]
async fn missing_rate_parameter_defaults_to_24khz() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TTS_MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(inline_data_response("audio/L16", &b64(&[0u8; 32]))),
        )
        .mount(&upstream)
        .await;

    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/generate-audio"))
        .json(&json!({"text": "hello"}))
        .send()
        .await
        .unwrap();

    let wav = response.bytes().await.unwrap();
    assert_eq!(u32_le(&wav, 24), 24_000);
}

#[tokio::test]
async fn non_audio_payload_is_a_server_error() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(TTS_MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(inline_data_response("image/png", &b64(&[1, 2, 3]))),
        )
        .mount(&upstream)
        .await;

    let server = TestServer::start(&upstream.uri(), Some("test-key")).await;
    let response = reqwest::Client::new()
        .post(server.url("/api/generate-audio"))
        .json(&json!({"text": "hello"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("audio"));
}
