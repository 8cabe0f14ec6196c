//! Upload correction endpoint
//!
//! POST /api/correct takes a multipart form with parts `file`, `volume`,
//! `issue`, `year` and `date`, and answers with the corrected document as
//! an attachment. Checks run in this order: file present, `.xml` name,
//! UTF-8 content, field formats, anchor tag.

use axum::{
    extract::{
        multipart::{Field, MultipartRejection},
        Multipart,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::{debug, info, warn};
use xmlup_common::{correct_document, decode_upload, has_xml_extension, CorrectedDocument, RawFields};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Uploaded file part
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Parsed multipart submission
///
/// Text parts that were not sent stay empty and fail validation like an
/// empty form field would.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: RawFields,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Drain every part of the multipart body
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => form.file = read_file(field).await?,
                "volume" => form.fields.volume = field.text().await?,
                "issue" => form.fields.issue = field.text().await?,
                "year" => form.fields.year = field.text().await?,
                "date" => form.fields.date = field.text().await?,
                other => debug!("Ignoring unknown form part '{}'", other),
            }
        }

        Ok(form)
    }
}

/// A file input left blank arrives as an empty part with an empty file name
async fn read_file(field: Field<'_>) -> ApiResult<Option<UploadedFile>> {
    let file_name = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.is_empty());
    let bytes = field.bytes().await?.to_vec();

    if file_name.is_none() && bytes.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile { file_name, bytes }))
}

/// POST /api/correct
pub async fn correct_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Response> {
    let form = UploadForm::read(multipart?).await?;

    let upload = form.file.ok_or_else(|| {
        warn!("Submission rejected: no file uploaded");
        ApiError::MissingFile
    })?;

    if let Some(name) = &upload.file_name {
        if !has_xml_extension(name) {
            warn!("Submission rejected: '{}' is not an .xml file", name);
            return Err(ApiError::BadRequest(format!(
                "Uploaded file must have an .xml extension: {}",
                name
            )));
        }
    }

    let source_len = upload.bytes.len();
    let document = decode_upload(upload.bytes)?;

    let corrected = correct_document(&form.fields, &document).map_err(|e| {
        warn!("Submission rejected: {}", e.messages().join(" "));
        ApiError::from(e)
    })?;

    info!(
        "Success! Missing lines added. {} ({} -> {} bytes)",
        corrected.file_name,
        source_len,
        corrected.content.len()
    );

    Ok(download_response(corrected))
}

/// Corrected document as a `text/xml` attachment
pub fn download_response(corrected: CorrectedDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", corrected.file_name);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, corrected.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        corrected.content,
    )
        .into_response()
}

pub fn correct_routes() -> Router<AppState> {
    Router::new().route("/api/correct", post(correct_upload))
}
