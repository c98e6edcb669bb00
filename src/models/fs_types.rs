use crate::models::session_types::UploadId;
use std::path::PathBuf;

/// An image handed in by the user, read fully into memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub path: Option<PathBuf>,
    pub bytes: Vec<u8>,
    pub id: UploadId,
}

impl Upload {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let id = UploadId::new(&name, &bytes);
        Self {
            name,
            path: None,
            bytes,
            id,
        }
    }
}
