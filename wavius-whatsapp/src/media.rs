//! Upload limits for media files.

use std::path::Path;

use wavius_config::MediaSettings;

use crate::{Result, ServiceError};

/// Size and type restrictions applied before a file is uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaPolicy {
    max_file_size: u64,
    allowed_types: Vec<String>,
}

impl MediaPolicy {
    /// Create a policy. An empty type list allows every type.
    pub fn new(max_file_size: u64, allowed_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_types: allowed_types
                .into_iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn allowed_types(&self) -> &[String] {
        &self.allowed_types
    }

    /// MIME type guessed from the file name.
    pub fn guess_type(path: impl AsRef<Path>) -> String {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    /// Check a file of `size` bytes, returning its guessed MIME type.
    pub fn check(&self, path: impl AsRef<Path>, size: u64) -> Result<String> {
        let path = path.as_ref();

        if size > self.max_file_size {
            return Err(ServiceError::MediaRejected(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                self.max_file_size
            )));
        }

        let mime = Self::guess_type(path);
        if !self.allowed_types.is_empty() && !self.allowed_types.iter().any(|t| *t == mime) {
            return Err(ServiceError::MediaRejected(format!(
                "{} has type {}, which is not allowed",
                path.display(),
                mime
            )));
        }

        Ok(mime)
    }
}

impl Default for MediaPolicy {
    fn default() -> Self {
        Self::from(&MediaSettings::default())
    }
}

impl From<&MediaSettings> for MediaPolicy {
    fn from(settings: &MediaSettings) -> Self {
        Self::new(settings.max_file_size, settings.allowed_types.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_type_within_limit() {
        let policy = MediaPolicy::default();
        assert_eq!(policy.check("photo.jpg", 1024).unwrap(), "image/jpeg");
        assert_eq!(policy.check("/tmp/report.pdf", 0).unwrap(), "application/pdf");
    }

    #[test]
    fn test_rejects_oversized_file() {
        let policy = MediaPolicy::new(10, vec!["image/png".into()]);
        assert!(policy.check("a.png", 10).is_ok());
        assert!(matches!(
            policy.check("a.png", 11),
            Err(ServiceError::MediaRejected(_))
        ));
    }

    #[test]
    fn test_rejects_disallowed_type() {
        let policy = MediaPolicy::default();
        let err = policy.check("script.sh", 10).unwrap_err();
        assert!(err.to_string().contains("not allowed"));

        assert!(policy.check("no-extension", 10).is_err());
    }

    #[test]
    fn test_empty_list_allows_everything() {
        let policy = MediaPolicy::new(100, Vec::new());
        assert_eq!(
            policy.check("blob.bin", 5).unwrap(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_types_are_normalized() {
        let policy = MediaPolicy::new(100, vec![" Image/PNG ".into()]);
        assert_eq!(policy.allowed_types(), ["image/png".to_string()]);
        assert!(policy.check("x.png", 1).is_ok());
    }
}
