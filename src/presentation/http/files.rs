use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path as AxumPath, Query, State},
    http::StatusCode,
    routing::get,
};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::use_cases::files::list_files::{ListFiles, ListFilesError};
use crate::application::use_cases::files::upload_file::{IncomingFile, UploadFile, UploadFileError};
use crate::bootstrap::app_context::AppContext;
use crate::domain::files::restaurant_file::RestaurantFile;
use crate::domain::files::usage::StorageUsage;
use crate::presentation::http::auth::Session;

// Uses AppContext as router state

const NOT_FOUND_MESSAGE: &str = "Restaurante não encontrado";
const MISSING_FILE_MESSAGE: &str = "Nenhum arquivo enviado";
const UPLOAD_FAILED_MESSAGE: &str = "Erro ao fazer upload do arquivo";
const SAVE_FAILED_MESSAGE: &str = "Erro ao salvar arquivo";
const INTERNAL_MESSAGE: &str = "Erro interno do servidor";

type HttpError = (StatusCode, String);

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantFileResponse {
    pub id: String,
    pub name: String,
    pub size: i64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
    pub restaurant_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<RestaurantFile> for RestaurantFileResponse {
    fn from(f: RestaurantFile) -> Self {
        Self {
            id: f.id,
            name: f.name,
            size: f.size,
            content_type: f.content_type,
            url: f.url,
            restaurant_id: f.restaurant_id,
            created_at: f.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsageResponse {
    pub files: Vec<RestaurantFileResponse>,
    /// Bytes
    pub total_size: i64,
    /// Megabytes
    pub used_storage: f64,
    /// Quota ceiling in megabytes
    pub available_storage: f64,
    pub percentage_used: f64,
}

impl From<StorageUsage> for StorageUsageResponse {
    fn from(u: StorageUsage) -> Self {
        Self {
            files: u.files.into_iter().map(Into::into).collect(),
            total_size: u.total_size,
            used_storage: u.used_storage,
            available_storage: u.available_storage,
            percentage_used: u.percentage_used,
        }
    }
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadRestaurantFileMultipart {
    /// File to upload
    #[schema(value_type = String, format = Binary)]
    file: String,
}

#[derive(Debug, Deserialize)]
pub struct ListFilesQuery {
    pub limit: Option<String>,
}

/// Non-numeric, zero and negative limits mean "no limit".
fn parse_limit(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
}

/// GET /api/restaurants/{id}/files?limit=n
#[utoipa::path(
    get,
    path = "/api/restaurants/{id}/files",
    tag = "Files",
    params(
        ("id" = String, Path, description = "Restaurant ID"),
        ("limit" = Option<i64>, Query, description = "Maximum number of files, newest first")
    ),
    responses(
        (status = 200, description = "Files and storage usage", body = StorageUsageResponse),
        (status = 401, description = "No session"),
        (status = 404, description = "Restaurant not found or not owned")
    )
)]
pub async fn list_files(
    State(ctx): State<AppContext>,
    session: Session,
    AxumPath(id): AxumPath<String>,
    Query(q): Query<ListFilesQuery>,
) -> Result<Json<StorageUsageResponse>, HttpError> {
    let restaurants = ctx.restaurant_repo();
    let files = ctx.files_repo();
    let uc = ListFiles {
        restaurants: restaurants.as_ref(),
        files: files.as_ref(),
    };
    match uc
        .execute(&session.user_id, &id, parse_limit(q.limit.as_deref()))
        .await
    {
        Ok(usage) => Ok(Json(usage.into())),
        Err(ListFilesError::RestaurantNotFound) => {
            Err((StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.into()))
        }
        Err(ListFilesError::Internal(err)) => {
            tracing::error!(error = ?err, restaurant_id = %id, "list_restaurant_files_failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{INTERNAL_MESSAGE}: {err}"),
            ))
        }
    }
}

/// Last path segment of a client-supplied filename, the way browsers send it.
fn client_file_name(raw: &str) -> Option<String> {
    let name = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw).trim();
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}

/// First `file` field carrying a filename; other fields are ignored.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<IncomingFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().and_then(client_file_name) else {
            continue;
        };
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| {
                mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });
        let bytes = field.bytes().await?;
        return Ok(Some(IncomingFile {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// POST /api/restaurants/{id}/files (multipart/form-data)
/// Fields:
/// - file: binary file (required)
#[utoipa::path(
    post,
    path = "/api/restaurants/{id}/files",
    tag = "Files",
    params(("id" = String, Path, description = "Restaurant ID")),
    request_body(
        content = UploadRestaurantFileMultipart,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "File stored", body = RestaurantFileResponse),
        (status = 400, description = "No file or storage quota exceeded"),
        (status = 401, description = "No session"),
        (status = 404, description = "Restaurant not found or not owned")
    )
)]
pub async fn upload_file(
    State(ctx): State<AppContext>,
    session: Session,
    AxumPath(id): AxumPath<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RestaurantFileResponse>, HttpError> {
    let restaurants = ctx.restaurant_repo();
    let files = ctx.files_repo();
    let storage = ctx.object_storage();
    let uc = UploadFile {
        restaurants: restaurants.as_ref(),
        files: files.as_ref(),
        storage: storage.as_ref(),
    };

    // The body is only read once the restaurant is known to be the caller's.
    let target = uc
        .authorize(&session.user_id, &id)
        .await
        .map_err(|err| upload_error(&id, err))?;

    let mut multipart = multipart.map_err(|rejection| {
        tracing::warn!(error = %rejection, restaurant_id = %id, "multipart_rejected");
        (rejection.status(), rejection.body_text())
    })?;
    let file = read_file_field(&mut multipart).await.map_err(|err| {
        tracing::warn!(error = %err, restaurant_id = %id, "multipart_read_failed");
        (err.status(), err.body_text())
    })?;

    let saved = uc
        .store(target, file)
        .await
        .map_err(|err| upload_error(&id, err))?;
    Ok(Json(saved.into()))
}

fn upload_error(restaurant_id: &str, err: UploadFileError) -> HttpError {
    match err {
        UploadFileError::RestaurantNotFound => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.into()),
        UploadFileError::MissingFile => (StatusCode::BAD_REQUEST, MISSING_FILE_MESSAGE.into()),
        UploadFileError::QuotaExceeded { available_mb } => (
            StatusCode::BAD_REQUEST,
            format!(
                "Limite de armazenamento excedido. Você tem {}MB disponíveis.",
                available_mb
            ),
        ),
        // Storage and save faults are logged inside the use case.
        UploadFileError::Upload(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            UPLOAD_FAILED_MESSAGE.into(),
        ),
        UploadFileError::Save(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            SAVE_FAILED_MESSAGE.into(),
        ),
        UploadFileError::Internal(err) => {
            tracing::error!(error = ?err, restaurant_id = %restaurant_id, "upload_restaurant_file_failed");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.into())
        }
    }
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/restaurants/:id/files",
            get(list_files).post(upload_file),
        )
        .layer(DefaultBodyLimit::max(ctx.cfg.upload_max_bytes))
        .with_state(ctx)
}
