use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Batch, Student};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "batchvault-test-boundary";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn multipart_request(uri: &str, field: &str, file_name: &str, content: &str) -> Request<String> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: application/pdf\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}

// --- root ---

#[tokio::test]
async fn root_returns_welcome() {
    let resp = app().oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("Batch-Vault"));
}

// --- batches ---

#[tokio::test]
async fn list_batches_empty() {
    let resp = app().oneshot(get("/api/batches/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let batches: Vec<Batch> = body_json(resp).await;
    assert!(batches.is_empty());
}

#[tokio::test]
async fn create_batch_assigns_first_id() {
    let resp = app()
        .oneshot(json_request("POST", "/api/batches/", r#"{"name":"Physics"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let batch: Batch = body_json(resp).await;
    assert_eq!(batch.id, 1);
    assert_eq!(batch.name, "Physics");
    assert!(batch.students.is_empty());
}

#[tokio::test]
async fn create_batch_missing_name_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/batches/", r#"{"title":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_batch_not_found() {
    let resp = app().oneshot(get("/api/batches/99")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Batch not found");
}

#[tokio::test]
async fn get_batch_bad_id_returns_400() {
    let resp = app().oneshot(get("/api/batches/abc")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- students ---

#[tokio::test]
async fn add_student_to_missing_batch() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/batches/5/students/",
            r#"{"name":"Jane","phone":"555"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- upload ---

#[tokio::test]
async fn upload_to_missing_batch() {
    let resp = app()
        .oneshot(multipart_request(
            "/api/batches/1/upload_pdf",
            "file",
            "notes.pdf",
            "%PDF",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- full lifecycle ---

#[tokio::test]
async fn batch_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create batch
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/batches/", r#"{"name":"Chemistry"}"#))
        .await
        .unwrap();
    let batch: Batch = body_json(resp).await;
    let id = batch.id;

    // upload with no students is rejected with a message
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(
            &format!("/api/batches/{id}/upload_pdf"),
            "file",
            "notes.pdf",
            "%PDF",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(
        body["message"],
        "No students in this batch to generate PDFs for."
    );

    // add two students
    for (name, phone) in [("Jane Doe", "+1 (555) 123-4567"), ("Ali", "555 0000")] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                &format!("/api/batches/{id}/students/"),
                &serde_json::json!({ "name": name, "phone": phone }).to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let student: Student = body_json(resp).await;
        assert_eq!(student.phone, phone);
        assert!(student.pdf_url.is_none());
    }

    // upload without a file field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(
            &format!("/api/batches/{id}/upload_pdf"),
            "document",
            "notes.pdf",
            "%PDF",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["message"], "Missing file field");

    // upload
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_request(
            &format!("/api/batches/{id}/upload_pdf"),
            "file",
            "Week 1.pdf",
            "%PDF-1.4 body",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["message"], "Successfully generated 2 PDFs");

    // get batch now carries per-student file references
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/batches/{id}")))
        .await
        .unwrap();
    let batch: Batch = body_json(resp).await;
    assert_eq!(batch.students.len(), 2);
    assert_eq!(
        batch.students[0].pdf_url.as_deref(),
        Some("/pdfs/Week 1 (Jane Doe).pdf")
    );
    assert_eq!(
        batch.students[1].pdf_url.as_deref(),
        Some("/pdfs/Week 1 (Ali).pdf")
    );

    // the stored copy is downloadable
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/pdfs/Week%201%20(Ali).pdf"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/pdf"
    );
    assert_eq!(&body_bytes(resp).await[..], b"%PDF-1.4 body");

    // list shows the one batch
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/batches/"))
        .await
        .unwrap();
    let batches: Vec<Batch> = body_json(resp).await;
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].id, id);
}

#[tokio::test]
async fn download_unknown_pdf() {
    let resp = app().oneshot(get("/pdfs/missing.pdf")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
