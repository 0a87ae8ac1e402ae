//! Image upload boundary.
//!
//! Accepts a single image of at most [`MAX_UPLOAD_BYTES`] from a signed-in
//! caller, stores it through a [`FileStore`] and returns the public URL to be
//! used as a post's `fileUrl`.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::messages::{UPLOAD_FAILED, UPLOAD_INVALID};
use super::resolve_caller_id;
use crate::domain::Session;
use crate::error::{ActionError, ActionResult};
use crate::validation::{push_error, FieldErrors};

/// 4 MiB
pub const MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Raster formats accepted for post images
const ALLOWED_IMAGE_SUBTYPES: [&str; 4] = ["png", "jpeg", "gif", "webp"];

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `body` under `key` and return its public URL
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> anyhow::Result<String>;
}

/// S3-backed file store
#[derive(Clone)]
pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> anyhow::Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await?;

        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}

/// Keeps uploaded objects in memory
pub struct MemoryFileStore {
    base_url: String,
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
}

impl MemoryFileStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub async fn object(&self, key: &str) -> Option<(String, Vec<u8>)> {
        self.objects.lock().await.get(key).cloned()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> anyhow::Result<String> {
        self.objects
            .lock()
            .await
            .insert(key.to_string(), (content_type.to_string(), body));
        Ok(format!("{}/{}", self.base_url, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub url: String,
    pub uploaded_by: Uuid,
}

#[derive(Clone)]
pub struct UploadService {
    store: Arc<dyn FileStore>,
    max_bytes: usize,
}

impl UploadService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            max_bytes: MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Store an image for the signed-in caller
    pub async fn upload_image(
        &self,
        session: Option<&Session>,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> ActionResult<UploadReceipt> {
        let caller_id = resolve_caller_id(session)?;

        let mut errors = FieldErrors::new();
        let mime = content_type
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
            .filter(is_allowed_image);
        if mime.is_none() {
            push_error(
                &mut errors,
                "file",
                "File must be a PNG, JPEG, GIF or WebP image",
            );
        }
        if body.is_empty() {
            push_error(&mut errors, "file", "File is empty");
        } else if body.len() > self.max_bytes {
            let message = format!("File exceeds the {} limit", size_label(self.max_bytes));
            push_error(&mut errors, "file", &message);
        }
        let mime = match mime {
            Some(mime) if errors.is_empty() => mime,
            _ => return Err(ActionError::validation(errors, UPLOAD_INVALID)),
        };

        let key = format!(
            "uploads/{}/{}.{}",
            caller_id,
            Uuid::new_v4(),
            extension_for(&mime)
        );
        let size = body.len();
        let url = self
            .store
            .put(&key, body, mime.essence_str())
            .await
            .map_err(|e| ActionError::persistence(UPLOAD_FAILED, e))?;

        tracing::info!(user_id = %caller_id, %url, size, "upload complete");

        Ok(UploadReceipt {
            url,
            uploaded_by: caller_id,
        })
    }
}

fn is_allowed_image(mime: &mime::Mime) -> bool {
    mime.type_() == mime::IMAGE && ALLOWED_IMAGE_SUBTYPES.contains(&mime.subtype().as_str())
}

/// Human-readable size for limit messages
fn size_label(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    const KIB: usize = 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else if bytes == 1 {
        "1 byte".to_string()
    } else {
        format!("{} bytes", bytes)
    }
}

fn extension_for(mime: &mime::Mime) -> &str {
    match mime.subtype().as_str() {
        "jpeg" => "jpg",
        other => other,
    }
}
