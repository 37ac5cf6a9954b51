use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use tower::ServiceExt;

use lookbook::server::{router, State};
use lookbook::{Classify, ClassifierError, ContentRegistry, Prediction};

/// Deterministic stand-in for the ONNX classifier: red-dominant images are
/// cats, everything else is dogs.
struct FixtureClassifier {
    labels: Vec<String>,
}

impl FixtureClassifier {
    fn new() -> Self {
        Self {
            labels: ["cat", "dog", "rabbit"].iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Classify for FixtureClassifier {
    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn predict_image(&self, image: &DynamicImage) -> Result<Prediction, ClassifierError> {
        let pixel = *image.to_rgb8().get_pixel(0, 0);
        let probabilities = if pixel[0] >= pixel[2] {
            vec![0.7, 0.2, 0.1]
        } else {
            vec![0.1, 0.8, 0.1]
        };
        let label_index = probabilities
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        Ok(Prediction {
            label: self.labels[label_index].clone(),
            label_index,
            probabilities,
        })
    }
}

fn sample_registry() -> ContentRegistry {
    ContentRegistry::from_json(
        r#"{
            "cat": {
                "texts": ["one", "two", "three", "four"],
                "images": ["https://example.com/cat.jpg"],
                "videos": [
                    "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
                    "https://example.com/not-a-youtube-link"
                ]
            }
        }"#,
    )
    .unwrap()
}

fn app() -> Router {
    let state = Arc::new(State::new(
        Arc::new(FixtureClassifier::new()) as Arc<dyn Classify>,
        Arc::new(sample_registry()),
    ));
    router(state)
}

fn red_jpeg() -> Vec<u8> {
    let img = ImageBuffer::from_pixel(32, 32, Rgb([220u8, 40u8, 40u8]));
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut bytes, ImageFormat::Jpeg)
        .unwrap();
    bytes.into_inner()
}

const BOUNDARY: &str = "lookbook-test-boundary";

fn multipart_request(field_name: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field_name}\"; filename=\"photo.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/classify")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_landing_page_before_any_submission() {
    let response = app()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains("multipart/form-data"));
    assert!(html.contains("Take a snapshot or upload"));
    assert!(!html.contains(r#"class="prediction-box""#));
}

#[tokio::test]
async fn test_preview_is_missing_before_any_submission() {
    let response = app()
        .oneshot(Request::get("/preview").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_classify_end_to_end() {
    let app = app();

    // Submit a valid JPEG of a known class
    let response = app
        .clone()
        .oneshot(multipart_request("image", &red_jpeg()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // The page now shows the prediction
    let response = app
        .clone()
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;

    // Predicted label is a member of the vocabulary
    assert!(html.contains(r#"class="prediction-box""#));
    assert!(html.contains("<h2>cat</h2>"));

    // One probability bar per label
    assert_eq!(html.matches(r#"class="prob-card""#).count(), 3);
    assert_eq!(html.matches(r#"class="bar-track""#).count(), 3);
    assert!(html.contains("70.00%"));

    // Content panel matches the registry entry, truncated to three per type
    assert!(html.contains(">one<"));
    assert!(html.contains(">three<"));
    assert!(!html.contains(">four<"));
    assert!(html.contains("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"));
    // The non-YouTube link falls back to plain text
    assert!(html.contains(r#"<a href="https://example.com/not-a-youtube-link""#));

    // The preview endpoint serves the stored image back
    let response = app
        .oneshot(Request::get("/preview").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/jpeg"
    );
}

#[tokio::test]
async fn test_label_reselection_defaults_and_overrides() {
    let app = app();
    app.clone()
        .oneshot(multipart_request("image", &red_jpeg()))
        .await
        .unwrap();

    // dog has no registry entry: supported state, neutral message
    let response = app
        .clone()
        .oneshot(Request::get("/?label=dog").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains("No curated content"));
    assert!(html.contains(r#"<option value="dog" selected>"#));

    // Unknown labels fall back to the predicted one
    let response = app
        .oneshot(Request::get("/?label=unicorn").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_string(response).await;
    assert!(html.contains(r#"<option value="cat" selected>"#));
}

#[tokio::test]
async fn test_undecodable_upload_is_rejected_with_a_message() {
    let response = app()
        .oneshot(multipart_request("image", b"this is not an image"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(response).await;
    assert!(html.contains("error-banner"));
    assert!(html.contains("Could not decode the image"));
}

#[tokio::test]
async fn test_upload_without_image_field_is_rejected() {
    let response = app()
        .oneshot(multipart_request("attachment", &red_jpeg()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
