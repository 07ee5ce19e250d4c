//! Content-addressable object store
//!
//! Objects live at `.vcs/objects/<2-hex>/<38-hex>`, zlib-compressed. The
//! file name is the SHA-1 of the uncompressed `<kind> <len>\0<payload>`
//! frame, so writing the same content twice is a no-op.

use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::VcsError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// A decoded object frame: kind, declared size and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    pub object_type: ObjectType,
    pub size: usize,
    pub payload: Bytes,
}

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Store an object unless it is already present, returning its id.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).map_err(|source| {
            VcsError::runtime(
                format!("unable to create object directory {}", object_dir.display()),
                source,
            )
        })?;

        self.write_object(&object_path, object.serialize()?)?;
        debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    /// Whether a stored object answers to `hash`. Never fails.
    pub fn exists(&self, hash: &str) -> bool {
        ObjectId::try_parse(hash)
            .map(|oid| self.path.join(oid.to_path()).is_file())
            .unwrap_or(false)
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Read an object named by user input, validating the hash first.
    pub fn read(&self, hash: &str) -> anyhow::Result<RawObject> {
        let object_id = ObjectId::try_parse(hash)?;
        self.load(&object_id)
    }

    /// Read and unframe a stored object.
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<RawObject> {
        let object_path = self.path.join(object_id.to_path());

        let compressed = match std::fs::read(&object_path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(VcsError::NotFound(object_id.to_string()).into());
            }
            Err(source) => {
                return Err(VcsError::runtime(
                    format!("unable to read object file {}", object_path.display()),
                    source,
                )
                .into());
            }
        };

        let framed = decompress(compressed.into())
            .map_err(|_| VcsError::corrupt(object_id.as_ref(), "cannot inflate object"))?;

        Ok(Self::unframe(object_id, framed)?)
    }

    fn unframe(object_id: &ObjectId, framed: Bytes) -> Result<RawObject, VcsError> {
        let corrupt = |reason: &str| VcsError::corrupt(object_id.as_ref(), reason);

        let nul = framed
            .iter()
            .position(|byte| *byte == 0)
            .ok_or_else(|| corrupt("missing NUL separator"))?;
        let header =
            std::str::from_utf8(&framed[..nul]).map_err(|_| corrupt("header is not text"))?;

        let (kind, size) = header
            .split_once(' ')
            .ok_or_else(|| corrupt("malformed header"))?;
        let object_type = ObjectType::try_from(kind).map_err(|_| corrupt("unknown kind"))?;
        let size = size
            .trim()
            .parse::<usize>()
            .map_err(|_| corrupt("malformed size"))?;

        Ok(RawObject {
            object_type,
            size,
            payload: framed.slice(nul + 1..),
        })
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let raw = self.load(object_id)?;
        let reader = Cursor::new(raw.payload);

        let object = match raw.object_type {
            ObjectType::Blob => Blob::deserialize(reader).map(|blob| ObjectBox::Blob(Box::new(blob))),
            ObjectType::Tree => Tree::deserialize(reader).map(|tree| ObjectBox::Tree(Box::new(tree))),
            ObjectType::Commit => {
                Commit::deserialize(reader).map(|commit| ObjectBox::Commit(Box::new(commit)))
            }
        };

        object.map_err(|error| decoding_failed(object_id, error))
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        match self.parse_object(object_id)? {
            ObjectBox::Blob(blob) => Ok(Some(*blob)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> anyhow::Result<Option<Tree>> {
        match self.parse_object(object_id)? {
            ObjectBox::Tree(tree) => Ok(Some(*tree)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        match self.parse_object(object_id)? {
            ObjectBox::Commit(commit) => Ok(Some(*commit)),
            _ => Ok(None),
        }
    }

    /// Load a commit, failing with a validation error for other kinds.
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?.ok_or_else(|| {
            VcsError::validation(format!("{} is not a commit", object_id)).into()
        })
    }

    /// Flatten the tree of a commit into index entries keyed by path.
    ///
    /// The zero sentinel stands for "no commit yet" and flattens to nothing.
    pub fn commit_files(
        &self,
        commit_id: &ObjectId,
    ) -> anyhow::Result<BTreeMap<PathBuf, IndexEntry>> {
        if commit_id.is_zero() {
            return Ok(BTreeMap::new());
        }

        let commit = self.load_commit(commit_id)?;
        self.flatten_tree(commit.tree_oid())
    }

    /// Walk a stored tree and collect every blob below it with its full path.
    pub fn flatten_tree(&self, tree_id: &ObjectId) -> anyhow::Result<BTreeMap<PathBuf, IndexEntry>> {
        let mut files = BTreeMap::new();
        self.collect_tree(tree_id, Path::new(""), &mut files)?;

        Ok(files)
    }

    fn collect_tree(
        &self,
        tree_id: &ObjectId,
        prefix: &Path,
        files: &mut BTreeMap<PathBuf, IndexEntry>,
    ) -> anyhow::Result<()> {
        let tree = self
            .parse_object_as_tree(tree_id)?
            .ok_or_else(|| VcsError::corrupt(tree_id.as_ref(), "expected a tree"))?;

        for (name, entry) in tree.into_entries() {
            let path = prefix.join(&name);

            if entry.is_tree() {
                self.collect_tree(&entry.oid, &path, files)?;
            } else {
                let metadata = EntryMetadata::new(entry.size, entry.mode, entry.mtime);
                files.insert(path.clone(), IndexEntry::new(path, entry.oid, metadata));
            }
        }

        Ok(())
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .with_context(|| format!("invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .map_err(|source| {
                VcsError::runtime(
                    format!("unable to open object file {}", temp_object_path.display()),
                    source,
                )
            })?;

        file.write_all(&object_content).map_err(|source| {
            VcsError::runtime(
                format!("unable to write object file {}", temp_object_path.display()),
                source,
            )
        })?;

        // rename so readers never see a half-written object
        std::fs::rename(&temp_object_path, object_path).map_err(|source| {
            VcsError::runtime(
                format!("unable to rename object file to {}", object_path.display()),
                source,
            )
        })?;

        Ok(())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

fn decoding_failed(object_id: &ObjectId, error: anyhow::Error) -> anyhow::Error {
    match error.downcast::<VcsError>() {
        Ok(VcsError::Corrupt { reason, .. }) => VcsError::corrupt(object_id.as_ref(), reason).into(),
        Ok(other) => VcsError::corrupt(object_id.as_ref(), other.to_string()).into(),
        Err(error) => VcsError::corrupt(object_id.as_ref(), format!("{:#}", error)).into(),
    }
}

pub(crate) fn compress(data: Bytes) -> anyhow::Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&data)
        .context("unable to compress content")?;

    encoder
        .finish()
        .map(Bytes::from)
        .context("unable to finish compressing content")
}

pub(crate) fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(&*data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .context("unable to decompress content")?;

    Ok(decompressed.into())
}
