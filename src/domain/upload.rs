//! File upload entity and storage-key helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{DRAFT_KEY_PREFIX, JOB_KEY_PREFIX};

/// Uploaded file record. The bytes live in object storage under
/// `file_key`; this row only tracks ownership and association.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpload {
    pub id: Uuid,
    /// None while the file belongs to an unsubmitted draft
    pub job_id: Option<Uuid>,
    pub uploader_id: Uuid,
    pub file_key: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upload response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    pub id: Uuid,
    pub job_id: Option<Uuid>,
    #[schema(example = "drafts/3f2a9c/logo.png")]
    pub file_key: String,
    #[schema(example = "logo.png")]
    pub file_name: String,
    #[schema(example = "image/png")]
    pub content_type: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<FileUpload> for UploadResponse {
    fn from(upload: FileUpload) -> Self {
        Self {
            id: upload.id,
            job_id: upload.job_id,
            file_key: upload.file_key,
            file_name: upload.file_name,
            content_type: upload.content_type,
            size_bytes: upload.size_bytes,
            created_at: upload.created_at,
        }
    }
}

/// Strip path components and control characters from a client-supplied
/// file name so it is safe to embed in a storage key.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim();

    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// Storage key for a pre-submission draft upload.
pub fn draft_file_key(draft_token: &str, file_name: &str) -> String {
    format!(
        "{}{}/{}",
        DRAFT_KEY_PREFIX,
        draft_token,
        sanitize_file_name(file_name)
    )
}

/// Storage key for an upload attached to a submitted job.
pub fn job_file_key(job_id: Uuid, file_name: &str) -> String {
    format!("{}{}/{}", JOB_KEY_PREFIX, job_id, sanitize_file_name(file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\art\\final.pdf"), "final.pdf");
    }

    #[test]
    fn sanitize_replaces_spaces_and_empty() {
        assert_eq!(sanitize_file_name("my logo.png"), "my_logo.png");
        assert_eq!(sanitize_file_name("   "), "file");
    }

    #[test]
    fn keys_use_expected_prefixes() {
        let key = draft_file_key("3f2a9c", "logo.png");
        assert_eq!(key, "drafts/3f2a9c/logo.png");

        let job_id = Uuid::new_v4();
        let key = job_file_key(job_id, "final.pdf");
        assert_eq!(key, format!("jobs/{}/final.pdf", job_id));
    }
}
