//! Dispatch tests against an in-process multipart backend.
//!
//! A small axum server records every multipart field it receives and answers
//! the way the real backend does: PDFs and ZIPs for document endpoints, image
//! bytes for image endpoints. The real `HttpTransport` is used throughout.
//!
//! Run with:
//!   cargo test --test dispatch

use axum::extract::{Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use fileconv_client::operation::{IMAGE_FAILURE_MESSAGE, MERGE_FAILURE_MESSAGE};
use fileconv_client::{
    Artifact, Client, ClientConfig, ImageOperationKind, ImageWorkflow, PdfOperationKind,
    PdfWorkflow, SplitMode, UploadFile,
};
use std::io::Cursor;
use std::path::Path;
use std::sync::{Arc, Mutex};

// ── Test backend ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl ReceivedField {
    fn text(&self) -> &str {
        std::str::from_utf8(&self.data).unwrap_or("")
    }
}

#[derive(Debug, Clone)]
struct ReceivedRequest {
    path: String,
    fields: Vec<ReceivedField>,
}

impl ReceivedRequest {
    fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(ReceivedField::text)
    }
}

type RequestLog = Arc<Mutex<Vec<ReceivedRequest>>>;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::new(width, height);
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

async fn handle(State(log): State<RequestLog>, uri: Uri, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        };
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let data = match field.bytes().await {
            Ok(b) => b.to_vec(),
            Err(_) => return StatusCode::BAD_REQUEST.into_response(),
        };
        fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            data,
        });
    }

    let path = uri.path().trim_start_matches('/').to_string();
    log.lock().unwrap().push(ReceivedRequest {
        path: path.clone(),
        fields,
    });

    match path.as_str() {
        "merge-pdfs" => ([(CONTENT_TYPE, "application/pdf")], b"%PDF-1.7 merged".to_vec()).into_response(),
        "split-pdf" => ([(CONTENT_TYPE, "application/zip")], b"PK\x03\x04split".to_vec()).into_response(),
        "compress" => (
            [
                (CONTENT_TYPE, "image/png"),
                (CONTENT_DISPOSITION, "attachment; filename=\"small.png\""),
            ],
            png_bytes(2, 2),
        )
            .into_response(),
        "transparent" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => ([(CONTENT_TYPE, "image/png")], png_bytes(4, 3)).into_response(),
    }
}

/// Start the backend on an ephemeral port; returns its base URL.
async fn spawn_backend() -> (String, RequestLog) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("fileconv_client=debug")
        .with_test_writer()
        .try_init();
    let log = RequestLog::default();
    let app = Router::new().fallback(handle).with_state(log.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (format!("http://{addr}/"), log)
}

fn client_for(base_url: &str, output_dir: &Path) -> Client {
    let config = ClientConfig::builder()
        .base_url(base_url)
        .output_dir(output_dir)
        .request_timeout_secs(10)
        .build()
        .expect("valid config");
    Client::new(config).expect("client")
}

fn pdf(name: &str) -> UploadFile {
    UploadFile::from_bytes(name, format!("%PDF-1.4 {name}").into_bytes())
}

// ── Image workflow ───────────────────────────────────────────────────────────

#[tokio::test]
async fn compress_sends_image_then_quality() {
    let (base, log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut wf = ImageWorkflow::new();
    wf.select_file(UploadFile::from_bytes("photo.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0]));
    wf.set_quality_input("40");
    let outcome = wf.submit(&client).await.clone();

    let requests = log.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    assert_eq!(req.path, "compress");
    assert_eq!(req.names(), vec!["image", "quality"]);
    assert_eq!(req.value("quality"), Some("40"));
    assert_eq!(req.fields[0].file_name.as_deref(), Some("photo.jpg"));
    assert_eq!(req.fields[0].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(req.fields[0].data, vec![0xFF, 0xD8, 0xFF, 0xE0]);

    let img = outcome
        .result()
        .and_then(Artifact::as_inline)
        .expect("inline image");
    assert_eq!(img.suggested_name(), "small.png");
    assert_eq!(img.content_type(), Some("image/png"));
}

#[tokio::test]
async fn resize_result_can_be_previewed_and_saved() {
    let (base, log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut wf = ImageWorkflow::new();
    wf.set_operation(ImageOperationKind::Resize);
    wf.select_file(UploadFile::from_bytes("scan.png", png_bytes(8, 6)));
    wf.set_width("4");
    wf.set_height("3");
    let outcome = wf.submit(&client).await.clone();

    let req = log.lock().unwrap()[0].clone();
    assert_eq!(req.path, "resize");
    assert_eq!(req.names(), vec!["image", "width", "height"]);
    assert_eq!(req.value("width"), Some("4"));
    assert_eq!(req.value("height"), Some("3"));

    let img = outcome.result().and_then(Artifact::as_inline).expect("inline");
    let preview = img.preview().expect("decodable png");
    assert_eq!((preview.width, preview.height), (4, 3));
    assert_eq!(preview.format, image::ImageFormat::Png);

    let saved = img.save_to(dir.path()).await.expect("save");
    assert_eq!(saved, dir.path().join("resized.png"));
    assert_eq!(std::fs::read(saved).unwrap(), img.data());
}

#[tokio::test]
async fn backend_error_shows_generic_message() {
    let (base, _log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut wf = ImageWorkflow::new();
    wf.set_operation(ImageOperationKind::TransparentBackground);
    wf.select_file(UploadFile::from_bytes("logo.png", png_bytes(2, 2)));
    let outcome = wf.submit(&client).await;

    assert_eq!(outcome.error(), Some(IMAGE_FAILURE_MESSAGE));
    assert!(outcome.result().is_none());
    assert!(!outcome.is_loading());
}

#[tokio::test]
async fn image_to_pdf_endpoint_is_nested() {
    let (base, log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut wf = ImageWorkflow::new();
    wf.set_operation(ImageOperationKind::ImageToPdf);
    wf.select_file(UploadFile::from_bytes("scan.png", png_bytes(2, 2)));
    let outcome = wf.submit(&client).await;

    assert_eq!(
        outcome.result().and_then(Artifact::downloaded_path),
        Some(dir.path().join("converted.pdf").as_path())
    );
    assert_eq!(log.lock().unwrap()[0].path, "convert/to-pdf");
}

// ── PDF workflow ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn merge_sends_pdfs_in_collection_order() {
    let (base, log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut wf = PdfWorkflow::new();
    wf.add_files([pdf("a.pdf"), pdf("b.pdf")]);
    wf.add_files([pdf("c.pdf")]);
    let outcome = wf.submit(&client).await.clone();

    let req = log.lock().unwrap()[0].clone();
    assert_eq!(req.path, "merge-pdfs");
    assert_eq!(req.names(), vec!["pdfs", "pdfs", "pdfs"]);
    let order: Vec<_> = req
        .fields
        .iter()
        .filter_map(|f| f.file_name.as_deref())
        .collect();
    assert_eq!(order, vec!["a.pdf", "b.pdf", "c.pdf"]);
    assert!(req
        .fields
        .iter()
        .all(|f| f.content_type.as_deref() == Some("application/pdf")));

    let path = outcome
        .result()
        .and_then(Artifact::downloaded_path)
        .expect("downloaded");
    assert_eq!(path, dir.path().join("merged.pdf"));
    assert_eq!(std::fs::read(path).unwrap(), b"%PDF-1.7 merged");
}

#[tokio::test]
async fn split_by_count_sends_mode_and_count() {
    let (base, log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut wf = PdfWorkflow::new();
    wf.set_operation(PdfOperationKind::Split);
    wf.add_files([pdf("book.pdf")]);
    wf.set_split_mode(SplitMode::Count);
    wf.set_pages("1-3");
    wf.set_count("10");
    let outcome = wf.submit(&client).await.clone();

    let req = log.lock().unwrap()[0].clone();
    assert_eq!(req.path, "split-pdf");
    assert_eq!(req.names(), vec!["pdf", "mode", "count"]);
    assert_eq!(req.value("mode"), Some("count"));
    assert_eq!(req.value("count"), Some("10"));

    let path = outcome
        .result()
        .and_then(Artifact::downloaded_path)
        .expect("downloaded");
    assert_eq!(path, dir.path().join("split_pdfs.zip"));
}

#[tokio::test]
async fn split_by_pages_sends_ranges_verbatim() {
    let (base, log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut wf = PdfWorkflow::new();
    wf.set_operation(PdfOperationKind::Split);
    wf.add_files([pdf("book.pdf")]);
    wf.set_pages("1-3,5,7-9");
    wf.submit(&client).await;

    let req = log.lock().unwrap()[0].clone();
    assert_eq!(req.names(), vec!["pdf", "mode", "pages"]);
    assert_eq!(req.value("mode"), Some("pages"));
    assert_eq!(req.value("pages"), Some("1-3,5,7-9"));
    assert_eq!(req.fields[0].file_name.as_deref(), Some("book.pdf"));
}

#[tokio::test]
async fn invalid_selection_never_reaches_the_backend() {
    let (base, log) = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&base, dir.path());

    let mut merge = PdfWorkflow::new();
    merge.add_files([pdf("only.pdf")]);
    assert_eq!(
        merge.submit(&client).await.error(),
        Some("Please select at least two PDF files to merge")
    );

    let mut split = PdfWorkflow::new();
    split.set_operation(PdfOperationKind::Split);
    split.add_files([pdf("book.pdf")]);
    split.set_split_mode(SplitMode::Count);
    split.set_count("ten");
    assert_eq!(
        split.submit(&client).await.error(),
        Some("Please enter a valid page count")
    );

    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_backend_shows_generic_message() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&format!("http://{addr}/"), dir.path());

    let mut wf = PdfWorkflow::new();
    wf.add_files([pdf("a.pdf"), pdf("b.pdf")]);
    let outcome = wf.submit(&client).await;

    assert_eq!(outcome.error(), Some(MERGE_FAILURE_MESSAGE));
    assert!(!dir.path().join("merged.pdf").exists());
}
