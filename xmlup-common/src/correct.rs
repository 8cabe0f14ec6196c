//! Validate-then-splice correction
//!
//! The whole job of xmlup as one pure function. Callers (HTTP upload
//! handler, command-line tool) decode the uploaded bytes first and deliver
//! the result however they like.

use thiserror::Error;

use crate::error::{Error, Result};
use crate::fields::{validate, RawFields, ValidationErrors};
use crate::splice::{splice, MissingAnchorError};

/// Content type handed to the download side
pub const CORRECTED_CONTENT_TYPE: &str = "text/xml";

/// A corrected document ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectedDocument {
    pub content: String,
    pub file_name: String,
}

impl CorrectedDocument {
    pub fn content_type(&self) -> &'static str {
        CORRECTED_CONTENT_TYPE
    }
}

/// Why a submission produced no document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrectionError {
    /// One or more fields failed their format check
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Fields were fine but the document has no anchor tag
    #[error(transparent)]
    MissingAnchor(#[from] MissingAnchorError),
}

impl CorrectionError {
    /// User-facing messages, one per problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            CorrectionError::Validation(errors) => errors.messages(),
            CorrectionError::MissingAnchor(err) => vec![err.to_string()],
        }
    }
}

/// Validate the fields, then splice the metadata block into the document
///
/// The document is only searched once every field check has passed.
pub fn correct_document(raw: &RawFields, document: &str) -> std::result::Result<CorrectedDocument, CorrectionError> {
    let fields = validate(raw)?;
    let spliced = splice(document, &fields)?;

    Ok(CorrectedDocument {
        content: spliced.content,
        file_name: spliced.file_name,
    })
}

/// Decode uploaded bytes as UTF-8
///
/// Runs at the boundary, before [`correct_document`].
pub fn decode_upload(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidInput(format!("Uploaded file is not valid UTF-8: {}", e)))
}

/// Uploads are expected to be `.xml` files (extension matched case-insensitively)
pub fn has_xml_extension(file_name: &str) -> bool {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}
