//! Multipart bodies for uploads.

use std::path::Path;

use bytes::Bytes;
use serde_json::Value;

use crate::{Result, TransportError};

/// A file to send under the `file` multipart field.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
    /// Base name sent as the part's file name.
    pub file_name: String,
    /// File content.
    pub content: Bytes,
    /// MIME type, guessed from the file name when not given.
    pub content_type: Option<String>,
}

impl FileAttachment {
    /// Create an attachment from in-memory content.
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first()
            .map(|m| m.essence_str().to_string());
        Self {
            file_name,
            content: content.into(),
            content_type,
        }
    }

    /// Read a file from disk. The part is named after the path's base name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self::new(file_name, content))
    }

    /// Override the guessed MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Size of the content in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One multipart field.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartField {
    pub name: String,
    pub value: FieldValue,
}

/// Content of a multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(FileAttachment),
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, attachment: FileAttachment) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::File(attachment),
        }
    }

    /// Text value, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    /// Attachment, if this is a file field.
    pub fn as_file(&self) -> Option<&FileAttachment> {
        match &self.value {
            FieldValue::File(file) => Some(file),
            FieldValue::Text(_) => None,
        }
    }
}

/// Render a JSON value as form text. Strings are sent verbatim, objects and
/// arrays JSON-encoded, `null` is skipped.
pub(crate) fn form_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Convert fields into a reqwest form.
pub(crate) fn to_form(
    fields: &[MultipartField],
) -> std::result::Result<reqwest::multipart::Form, TransportError> {
    let mut form = reqwest::multipart::Form::new();

    for field in fields {
        form = match &field.value {
            FieldValue::Text(text) => form.text(field.name.clone(), text.clone()),
            FieldValue::File(file) => {
                let mut part = reqwest::multipart::Part::bytes(file.content.to_vec())
                    .file_name(file.file_name.clone());
                if let Some(content_type) = &file.content_type {
                    part = part
                        .mime_str(content_type)
                        .map_err(|e| TransportError::Request(e.to_string()))?;
                }
                form.part(field.name.clone(), part)
            }
        };
    }

    Ok(form)
}
