//! # xmlup Common Library
//!
//! Shared code for the xmlup tools:
//! - Issue field validation (volume, issue, year, date)
//! - Fragment splicing after the first `</lpage>` tag
//! - The combined validate-then-splice correction
//! - Bootstrap configuration loading

pub mod config;
pub mod correct;
pub mod error;
pub mod fields;
pub mod splice;

pub use correct::{
    correct_document, decode_upload, has_xml_extension, CorrectedDocument, CorrectionError, CORRECTED_CONTENT_TYPE,
};
pub use error::{Error, Result};
pub use fields::{validate, FieldError, RawFields, ValidatedFields, ValidationErrors};
pub use splice::{splice, MissingAnchorError, SplicedDocument, ANCHOR_TAG};
