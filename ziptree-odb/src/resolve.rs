//! Tree-ish resolution.
//!
//! Turns a command-line name into the tree to archive. Accepted names:
//! a full 40-hex object id, `HEAD`, a qualified ref (`refs/heads/main`) or
//! a bare one searched in git's order (`<name>`, `refs/<name>`,
//! `refs/tags/<name>`, `refs/heads/<name>`). Loose ref files are read
//! first, then `packed-refs`. Symbolic refs are followed to a bounded
//! depth.
//!
//! The resolved id is peeled to a tree: annotated tags through their
//! `object` header, commits through their `tree` header. When a commit was
//! on the peel path it is remembered, because its id becomes the archive
//! comment and its committer date the shared timestamp.

use crate::db::ObjectDb;
use crate::parse::{parse_commit, parse_tag_target};
use std::fs;
use std::io;
use ziptree_core::{ObjectId, ObjectKind, ObjectStore, Result, ZipTreeError};

/// Symbolic-ref chains longer than this are treated as broken.
const MAX_SYMREF_DEPTH: u32 = 5;

/// Search order for bare ref names, mirroring git's rev-parse rules.
const REF_PATTERNS: [&str; 4] = ["{}", "refs/{}", "refs/tags/{}", "refs/heads/{}"];

/// The outcome of resolving a tree-ish.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTree {
    /// The tree to archive.
    pub tree: ObjectId,
    /// The commit the name peeled through, if any.
    pub commit: Option<ObjectId>,
    /// That commit's committer timestamp, if it was parseable.
    pub commit_time: Option<i64>,
}

/// Resolve `name` to a tree, peeling tags and commits.
pub fn resolve_treeish(db: &ObjectDb, name: &str) -> Result<ResolvedTree> {
    let id = resolve_name(db, name)?;
    peel_to_tree(db, id)
}

/// Resolve a name to an object id without peeling.
fn resolve_name(db: &ObjectDb, name: &str) -> Result<ObjectId> {
    if name.len() == ObjectId::HEX_LEN
        && let Ok(id) = ObjectId::from_hex(name)
    {
        return Ok(id);
    }

    for pattern in REF_PATTERNS {
        let refname = pattern.replace("{}", name);
        if let Some(id) = read_ref(db, &refname, 0)? {
            return Ok(id);
        }
    }

    Err(ZipTreeError::bad_object_name(name))
}

/// Read one ref, following symbolic refs, falling back to packed-refs.
fn read_ref(db: &ObjectDb, refname: &str, depth: u32) -> Result<Option<ObjectId>> {
    if depth > MAX_SYMREF_DEPTH {
        return Err(ZipTreeError::bad_object_name(refname));
    }

    match fs::read_to_string(db.git_dir().join(refname)) {
        Ok(content) => {
            let content = content.trim();
            if let Some(target) = content.strip_prefix("ref: ") {
                return read_ref(db, target.trim(), depth + 1);
            }
            return Ok(Some(
                ObjectId::from_hex(content)
                    .map_err(|_| ZipTreeError::bad_object_name(refname))?,
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    packed_ref(db, refname)
}

/// Look a ref up in `packed-refs`.
fn packed_ref(db: &ObjectDb, refname: &str) -> Result<Option<ObjectId>> {
    let content = match fs::read_to_string(db.git_dir().join("packed-refs")) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    for line in content.lines() {
        // Comments and peel lines ("^<hex>") carry no ref names.
        if line.starts_with('#') || line.starts_with('^') {
            continue;
        }
        if let Some((hex, packed_name)) = line.split_once(' ')
            && packed_name.trim() == refname
        {
            return Ok(Some(
                ObjectId::from_hex(hex).map_err(|_| ZipTreeError::bad_object_name(refname))?,
            ));
        }
    }
    Ok(None)
}

/// Peel an id down to a tree, remembering a commit met on the way.
fn peel_to_tree(db: &ObjectDb, mut id: ObjectId) -> Result<ResolvedTree> {
    let mut commit = None;
    let mut commit_time = None;

    // A tag chain plus one commit is short; bound it like the symref walk.
    for _ in 0..=MAX_SYMREF_DEPTH {
        let obj = db.read(&id)?;
        match obj.kind {
            ObjectKind::Tree => {
                return Ok(ResolvedTree {
                    tree: id,
                    commit,
                    commit_time,
                });
            }
            ObjectKind::Commit => {
                let info = parse_commit(&id, &obj.data)?;
                commit = Some(id);
                commit_time = info.committer_time;
                id = info.tree;
            }
            ObjectKind::Tag => {
                id = parse_tag_target(&id, &obj.data)?;
            }
            ObjectKind::Blob => return Err(ZipTreeError::not_a_tree(id)),
        }
    }
    Err(ZipTreeError::not_a_tree(id))
}
