use bytes::Bytes;

/// A single uploaded file, owned by one request and never persisted.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    pub content_type: String,
    pub original_filename: String,
}

impl UploadedFile {
    pub fn new(
        data: impl Into<Bytes>,
        content_type: impl Into<String>,
        original_filename: impl Into<String>,
    ) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
            original_filename: original_filename.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
