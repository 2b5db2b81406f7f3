use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Batch {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub students: Vec<Student>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub pdf_url: Option<String>,
}

#[derive(Deserialize)]
pub struct NewBatch {
    pub name: String,
}

#[derive(Deserialize)]
pub struct NewStudent {
    pub name: String,
    pub phone: String,
}

#[derive(Default)]
pub struct Store {
    next_batch_id: i64,
    next_student_id: i64,
    batches: BTreeMap<i64, Batch>,
    pdfs: HashMap<String, Vec<u8>>,
}

pub type Db = Arc<RwLock<Store>>;

type Failure = (StatusCode, Json<Value>);

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/", get(root))
        .route("/api/batches/", get(list_batches).post(create_batch))
        .route("/api/batches/{id}", get(get_batch))
        .route("/api/batches/{id}/students/", post(add_student))
        .route("/api/batches/{id}/upload_pdf", post(upload_pdf))
        .route("/pdfs/{file}", get(download_pdf))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Keep alphanumerics, spaces, `_` and `-`, then trim.
pub fn safe_file_component(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '_' | '-'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// `"<stem> (<student>).pdf"` for an uploaded file name.
pub fn student_pdf_name(upload_name: &str, student_name: &str) -> String {
    let stem = match upload_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => upload_name,
    };
    format!(
        "{} ({}).pdf",
        safe_file_component(stem),
        safe_file_component(student_name)
    )
}

fn batch_not_found() -> Failure {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Batch not found" })),
    )
}

fn bad_upload(message: &str) -> Failure {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message })))
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to Teacher's Batch-Vault API" }))
}

async fn list_batches(State(db): State<Db>) -> Json<Vec<Batch>> {
    let store = db.read().await;
    Json(store.batches.values().cloned().collect())
}

async fn create_batch(State(db): State<Db>, Json(input): Json<NewBatch>) -> Json<Batch> {
    let mut store = db.write().await;
    store.next_batch_id += 1;
    let batch = Batch {
        id: store.next_batch_id,
        name: input.name,
        created_at: Utc::now(),
        students: Vec::new(),
    };
    store.batches.insert(batch.id, batch.clone());
    info!(batch_id = batch.id, name = %batch.name, "batch created");
    Json(batch)
}

async fn get_batch(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Batch>, Failure> {
    let store = db.read().await;
    store
        .batches
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(batch_not_found)
}

async fn add_student(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<NewStudent>,
) -> Result<Json<Student>, Failure> {
    let mut store = db.write().await;
    if !store.batches.contains_key(&id) {
        return Err(batch_not_found());
    }
    store.next_student_id += 1;
    let student = Student {
        id: store.next_student_id,
        name: input.name,
        phone: input.phone,
        pdf_url: None,
    };
    if let Some(batch) = store.batches.get_mut(&id) {
        batch.students.push(student.clone());
    }
    info!(batch_id = id, student_id = student.id, "student added");
    Ok(Json(student))
}

async fn upload_pdf(
    State(db): State<Db>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<Value>, Failure> {
    {
        let store = db.read().await;
        let batch = store.batches.get(&id).ok_or_else(batch_not_found)?;
        if batch.students.is_empty() {
            return Err(bad_upload(
                "No students in this batch to generate PDFs for.",
            ));
        }
    }

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_upload(&e.body_text()))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| bad_upload(&e.body_text()))?;
            upload = Some((file_name, bytes));
            break;
        }
    }
    let (file_name, bytes) = upload.ok_or_else(|| bad_upload("Missing file field"))?;

    let mut store = db.write().await;
    let Store { batches, pdfs, .. } = &mut *store;
    let batch = batches.get_mut(&id).ok_or_else(batch_not_found)?;
    let mut count = 0;
    for student in &mut batch.students {
        let name = student_pdf_name(&file_name, &student.name);
        student.pdf_url = Some(format!("/pdfs/{name}"));
        pdfs.insert(name, bytes.to_vec());
        count += 1;
    }
    info!(batch_id = id, count, file = %file_name, "pdfs generated");

    Ok(Json(json!({
        "message": format!("Successfully generated {count} PDFs"),
        "count": count,
    })))
}

async fn download_pdf(
    State(db): State<Db>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let store = db.read().await;
    let bytes = store.pdfs.get(&file).cloned().ok_or(StatusCode::NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, "application/pdf")], bytes))
}
