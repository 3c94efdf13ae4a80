//! The on-disk object database.
//!
//! Loose objects live at `<git-dir>/objects/xx/<38 hex chars>`, zlib
//! compressed, prefixed with a `"<type> <length>\0"` header. The header's
//! length claim is validated against the actual payload.

use flate2::read::ZlibDecoder;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use ziptree_core::{ObjectId, ObjectKind, ObjectStore, RawObject, Result, ZipTreeError};

/// A git object database rooted at a git directory.
#[derive(Debug, Clone)]
pub struct ObjectDb {
    git_dir: PathBuf,
}

impl ObjectDb {
    /// Open the database under `path`.
    ///
    /// `path` may be a worktree root (its `.git` subdirectory is used), a
    /// git directory, or a bare repository.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let dotgit = path.join(".git");
        let git_dir = if dotgit.is_dir() { dotgit } else { path.to_path_buf() };
        if !git_dir.join("objects").is_dir() {
            return Err(ZipTreeError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no git object database under {}", path.display()),
            )));
        }
        Ok(Self { git_dir })
    }

    /// The git directory this database lives in.
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn loose_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.git_dir
            .join("objects")
            .join(&hex[..2])
            .join(&hex[2..])
    }
}

impl ObjectStore for ObjectDb {
    fn read(&self, id: &ObjectId) -> Result<RawObject> {
        let compressed = match fs::read(self.loose_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ZipTreeError::object_missing(*id));
            }
            Err(e) => return Err(e.into()),
        };

        let mut raw = Vec::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut raw)
            .map_err(|e| ZipTreeError::object_corrupt(*id, format!("zlib: {e}")))?;

        parse_loose(id, raw)
    }
}

/// Split a decompressed loose object into its validated header and payload.
fn parse_loose(id: &ObjectId, raw: Vec<u8>) -> Result<RawObject> {
    let nul = raw
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| ZipTreeError::object_corrupt(*id, "missing header terminator"))?;
    let header = &raw[..nul];

    let space = header
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| ZipTreeError::object_corrupt(*id, "malformed header"))?;
    let kind = ObjectKind::from_name(&header[..space]).ok_or_else(|| {
        ZipTreeError::object_corrupt(
            *id,
            format!(
                "unknown object type {:?}",
                String::from_utf8_lossy(&header[..space])
            ),
        )
    })?;

    let size: usize = std::str::from_utf8(&header[space + 1..])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| ZipTreeError::object_corrupt(*id, "bad length in header"))?;

    let data = raw[nul + 1..].to_vec();
    if data.len() != size {
        return Err(ZipTreeError::object_corrupt(
            *id,
            format!("header claims {size} bytes, found {}", data.len()),
        ));
    }

    Ok(RawObject { kind, data })
}
