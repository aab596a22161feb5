use axum::body::Bytes;

/// One file part of a multipart request, as handed over by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub contents: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, contents: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }
}
