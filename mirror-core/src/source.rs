/// Text sources for the OBJ loader
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::error;

use crate::error::ObjError;

/// Open `path` for buffered, line-by-line reading
pub fn open(path: &Path) -> Result<BufReader<File>, ObjError> {
    File::open(path).map(BufReader::new).map_err(|source| {
        error!("Error reading text file: {}", path.display());
        ObjError::SourceUnavailable {
            origin: path.display().to_string(),
            source,
        }
    })
}
