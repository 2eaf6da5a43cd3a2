use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{DiffError, Result};
use crate::types::ComparisonRequest;

/// Read a whole file into memory. The handle is closed when this returns, on
/// success or failure.
pub fn read_image_file(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| DiffError::file_access(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| DiffError::file_access(path, e))?;
    log::debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Load both inputs, reference first. Both must succeed before anything else runs.
pub fn load_pair(request: &ComparisonRequest) -> Result<(Vec<u8>, Vec<u8>)> {
    let a = read_image_file(&request.path_a)?;
    let b = read_image_file(&request.path_b)?;
    Ok((a, b))
}
