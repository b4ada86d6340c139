//! Image uploads.

use std::{ffi::OsStr, path::Path};

use salvo::{
    oapi::ToSchema,
    prelude::{Request, StatusError},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extensions::*;

const UPLOAD_FIELD: &str = "file";
const DEFAULT_EXTENSION: &str = "jpg";

/// Public URL prefix uploads are served under.
pub(crate) const UPLOADS_PATH: &str = "/uploads";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct StoredUpload {
    /// Path the image is served at
    pub image_url: String,

    /// Generated file name
    pub filename: String,
}

/// Copy the multipart `file` field into the upload directory under a random
/// name, keeping the original extension.
pub(crate) async fn store_upload(
    req: &mut Request,
    upload_dir: &Path,
) -> Result<StoredUpload, StatusError> {
    let file = req
        .file(UPLOAD_FIELD)
        .await
        .ok_or_else(|| StatusError::bad_request().brief("Missing image file"))?;

    let filename = upload_file_name(file.name());

    tokio::fs::create_dir_all(upload_dir)
        .await
        .or_500("failed to create upload directory")?;

    tokio::fs::copy(file.path(), upload_dir.join(&filename))
        .await
        .or_500("failed to store upload")?;

    tracing::info!(filename = %filename, "stored upload");

    Ok(StoredUpload {
        image_url: format!("{UPLOADS_PATH}/{filename}"),
        filename,
    })
}

pub(crate) fn upload_file_name(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(OsStr::to_str)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| DEFAULT_EXTENSION.to_owned(), str::to_ascii_lowercase);

    format!("{}.{extension}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_preserved() {
        let name = upload_file_name(Some("Foto Produk.PNG"));

        assert!(name.ends_with(".png"), "got {name}");
        assert_eq!(name.len(), 32 + ".png".len());
    }

    #[test]
    fn test_missing_extension_defaults_to_jpg() {
        assert!(upload_file_name(None).ends_with(".jpg"));
        assert!(upload_file_name(Some("image")).ends_with(".jpg"));
    }

    #[test]
    fn test_suspicious_extension_is_replaced() {
        let name = upload_file_name(Some("x.p/hp"));

        assert!(name.ends_with(".jpg"), "got {name}");
    }

    #[test]
    fn test_names_are_unique() {
        assert_ne!(upload_file_name(Some("a.jpg")), upload_file_name(Some("a.jpg")));
    }
}
