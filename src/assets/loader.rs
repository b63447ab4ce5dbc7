//! Uncached image loading strategies.
//!
//! The cache in [`crate::ImageCache`] decides *whether* to load; this module only knows *how*.

use std::{fs::File, io::Read, path::Path};

use crate::{
    assets::{PreparedImage, decode},
    foundation::error::{DrawError, DrawResult},
};

/// How an image file is turned into a decoded image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// Hand the path to the decoder and let it read the file.
    Filesystem,
    /// Read the whole file into an owned buffer first, then decode from the buffer.
    ///
    /// The file is closed before decoding starts, so nothing keeps it open afterwards.
    #[default]
    Memory,
}

impl LoadStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::Memory => "memory",
        }
    }

    pub fn parse(s: &str) -> DrawResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filesystem" | "file" => Ok(Self::Filesystem),
            "memory" | "stream" => Ok(Self::Memory),
            other => Err(DrawError::config(format!("unknown load strategy '{other}'"))),
        }
    }

    pub(crate) fn load(self, path: &Path) -> DrawResult<PreparedImage> {
        match self {
            Self::Filesystem => load_from_filesystem(path),
            Self::Memory => load_from_memory(path),
        }
    }
}

/// Largest file [`load_from_memory`] reads into a buffer; matches the default allocation limit the
/// decoder applies to [`load_from_filesystem`].
pub const MAX_BUFFERED_FILE_BYTES: u64 = 512 * 1024 * 1024;

/// `true` if `path` is non-empty and names an existing regular file.
pub fn check_file_exists(path: &Path) -> bool {
    !path.as_os_str().is_empty() && path.is_file()
}

pub fn load_from_filesystem(path: &Path) -> DrawResult<PreparedImage> {
    ensure_file_exists(path)?;
    decode::decode_file(path)
}

pub fn load_from_memory(path: &Path) -> DrawResult<PreparedImage> {
    ensure_file_exists(path)?;
    let bytes = read_whole_file(path)?;
    decode::decode_image(&bytes)
}

fn ensure_file_exists(path: &Path) -> DrawResult<()> {
    if !check_file_exists(path) {
        return Err(DrawError::invalid_path(format!(
            "'{}' is not an existing file",
            path.display()
        )));
    }
    Ok(())
}

fn read_whole_file(path: &Path) -> DrawResult<Vec<u8>> {
    let mut file =
        File::open(path).map_err(|e| DrawError::io(format!("open '{}': {e}", path.display())))?;
    let len = file
        .metadata()
        .map_err(|e| DrawError::io(format!("query size of '{}': {e}", path.display())))?
        .len();
    if len > MAX_BUFFERED_FILE_BYTES {
        return Err(DrawError::io(format!(
            "'{}' is {len} bytes, over the {MAX_BUFFERED_FILE_BYTES} byte buffering limit",
            path.display()
        )));
    }
    let len = usize::try_from(len)
        .map_err(|_| DrawError::io(format!("'{}' is too large to buffer", path.display())))?;

    let mut bytes = vec![0u8; len];
    file.read_exact(&mut bytes)
        .map_err(|e| DrawError::io(format!("read {len} bytes from '{}': {e}", path.display())))?;
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
