use crate::error::AppError;
use crate::models::fs_types::Upload;
use std::path::{Path, PathBuf};

const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub fn is_upload_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| UPLOAD_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Reads one upload. Only the extension is checked here; content is validated by decoding.
pub fn read_upload(path: &Path) -> Result<Upload, AppError> {
    if !is_upload_file(path) {
        return Err(AppError::UnsupportedUpload(path.to_path_buf()));
    }

    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let mut upload = Upload::from_bytes(name, bytes);
    upload.path = Some(path.to_path_buf());
    Ok(upload)
}

/// Accepted upload files directly inside `dir`, sorted by name, hidden files skipped.
pub fn list_upload_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !dir.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Path does not exist: {}", dir.display()),
        )
        .into());
    }

    let mut uploads = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let ft = match entry.file_type() {
            Ok(ft) => ft,
            Err(_) => continue,
        };

        if !ft.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if is_upload_file(&path) {
            uploads.push(path);
        }
    }

    uploads.sort_by_key(|p| {
        p.file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_lowercase()
    });

    Ok(uploads)
}

/// Expands the given inputs into upload paths. Directories contribute their
/// accepted files; plain files are passed through so unsupported ones get
/// reported instead of silently dropped.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, AppError> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            paths.extend(list_upload_files(input)?);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}
