//! Allow-listed upload types and the upload size limit.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum accepted upload size (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// File types accepted for upload, keyed by MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Png,
    Jpg,
}

impl FileType {
    /// Every allow-listed type, in declaration order.
    pub const ALL: [FileType; 3] = [FileType::Pdf, FileType::Png, FileType::Jpg];

    /// Resolve a declared MIME type against the allow-list.
    ///
    /// Parameters such as `; charset=...` are ignored and matching is
    /// case-insensitive.
    pub fn from_mime(content_type: &str) -> Result<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|ft| ft.mime() == essence)
            .ok_or_else(|| {
                Error::UnsupportedType(format!(
                    "'{}' is not allowed; use PDF, PNG or JPG",
                    content_type
                ))
            })
    }

    /// Parse a stored extension tag (`pdf`, `png`, `jpg`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ft| ft.extension() == ext)
    }

    pub fn mime(&self) -> &'static str {
        match self {
            FileType::Pdf => "application/pdf",
            FileType::Png => "image/png",
            FileType::Jpg => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Png => "png",
            FileType::Jpg => "jpg",
        }
    }

    /// Resource class used for both upload and deletion on the remote store.
    ///
    /// PDFs are stored as images so the store can render page previews; the
    /// same class must be used when destroying them.
    pub fn resource_kind(&self) -> ResourceKind {
        ResourceKind::Image
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for FileType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
            .ok_or_else(|| Error::Serialization(format!("unknown file type tag '{}'", s)))
    }
}

/// Remote-store resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Raw,
    Video,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Raw => "raw",
            ResourceKind::Video => "video",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list_mapping() {
        assert_eq!(FileType::from_mime("application/pdf").unwrap(), FileType::Pdf);
        assert_eq!(FileType::from_mime("image/png").unwrap(), FileType::Png);
        assert_eq!(FileType::from_mime("image/jpeg").unwrap(), FileType::Jpg);
    }

    #[test]
    fn test_mime_parameters_and_case_ignored() {
        assert_eq!(
            FileType::from_mime("Application/PDF; name=report.pdf").unwrap(),
            FileType::Pdf
        );
    }

    #[test]
    fn test_disallowed_types_rejected() {
        for mime in ["image/gif", "text/plain", "application/zip", ""] {
            let err = FileType::from_mime(mime).unwrap_err();
            assert!(matches!(err, Error::UnsupportedType(_)), "{mime}");
        }
    }

    #[test]
    fn test_extension_round_trip() {
        for ft in FileType::ALL {
            assert_eq!(ft.extension().parse::<FileType>().unwrap(), ft);
        }
        assert!("gif".parse::<FileType>().is_err());
    }

    #[test]
    fn test_all_types_use_image_resource_kind() {
        for ft in FileType::ALL {
            assert_eq!(ft.resource_kind(), ResourceKind::Image);
        }
    }

    #[test]
    fn test_max_upload_bytes() {
        assert_eq!(MAX_UPLOAD_BYTES, 10_485_760);
    }
}
