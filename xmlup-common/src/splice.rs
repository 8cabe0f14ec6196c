//! Fragment splicing
//!
//! Inserts the issue metadata block right after the first `</lpage>` in the
//! document. This is a plain substring search: the document is never parsed
//! as XML, so an anchor inside a comment or attribute value matches too.

use thiserror::Error;
use tracing::debug;

use crate::fields::ValidatedFields;

/// Text the fragment is inserted after
pub const ANCHOR_TAG: &str = "</lpage>";

/// Journal named in every generated `issue-title`
pub const JOURNAL_TITLE: &str = "Veterinarija ir Zootechnika";

/// The document contained no anchor tag
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Could not find the tag '{tag}' in the uploaded file.")]
pub struct MissingAnchorError {
    pub tag: &'static str,
}

/// Result of a successful splice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplicedDocument {
    pub content: String,
    pub file_name: String,
}

/// Render the metadata block for the given fields
///
/// Values go in verbatim, without XML escaping. Validated fields only ever
/// hold digits and hyphens.
pub fn render_fragment(fields: &ValidatedFields) -> String {
    format!(
        "\n        <issue-title content-type=\"ISSUE\">Volumes {volume}, Issues {issue}, ({year}): {journal}</issue-title>\
         \n        <volume>{volume}</volume>\
         \n        <issue>{issue}</issue>\
         \n        <pub-date iso-8601-date=\"{date}\"/>\
         \n        <pub-date pub-type=\"ppub\">\
         \n            <year>{year}</year>\
         \n        </pub-date>",
        volume = fields.volume(),
        issue = fields.issue(),
        year = fields.year(),
        date = fields.date(),
        journal = JOURNAL_TITLE,
    )
}

/// Download name for a corrected document
pub fn corrected_file_name(fields: &ValidatedFields) -> String {
    format!("corrected_vol{}_iss{}.xml", fields.volume(), fields.issue())
}

/// Insert the metadata block after the first anchor tag
///
/// Later anchors and the rest of the document are left alone. Splicing the
/// same document twice inserts the block twice.
pub fn splice(document: &str, fields: &ValidatedFields) -> Result<SplicedDocument, MissingAnchorError> {
    let anchor_start = document
        .find(ANCHOR_TAG)
        .ok_or(MissingAnchorError { tag: ANCHOR_TAG })?;
    let insert_at = anchor_start + ANCHOR_TAG.len();
    debug!("Anchor {} found at byte offset {}", ANCHOR_TAG, anchor_start);

    let fragment = render_fragment(fields);
    let mut content = String::with_capacity(document.len() + fragment.len());
    content.push_str(&document[..insert_at]);
    content.push_str(&fragment);
    content.push_str(&document[insert_at..]);

    Ok(SplicedDocument {
        content,
        file_name: corrected_file_name(fields),
    })
}
