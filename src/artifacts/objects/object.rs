use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;
use std::path::PathBuf;

pub trait Packable {
    /// Encode the object body, without the `<kind> <len>\0` header.
    fn payload(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    /// Decode an object body; the header has already been consumed.
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn display(&self) -> String;

    /// The full wire form: `<kind> <len>\0<payload>`.
    fn serialize(&self) -> Result<Bytes> {
        Ok(frame(self.object_type(), &self.payload()?))
    }

    fn object_id(&self) -> Result<ObjectId> {
        Ok(hash_frame(&self.serialize()?))
    }

    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

/// Prefix a payload with its object header.
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let mut framed = format!("{} {}\0", object_type.as_str(), payload.len()).into_bytes();
    framed.extend_from_slice(payload);
    Bytes::from(framed)
}

pub fn hash_frame(framed: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(framed);

    // a SHA-1 digest always renders as 40 hex characters
    ObjectId::try_parse(format!("{:x}", hasher.finalize())).unwrap_or_default()
}

pub enum ObjectBox {
    Blob(Box<Blob>),
    Tree(Box<Tree>),
    Commit(Box<Commit>),
}

impl ObjectBox {
    pub fn display(&self) -> String {
        match self {
            ObjectBox::Blob(blob) => blob.display(),
            ObjectBox::Tree(tree) => tree.display(),
            ObjectBox::Commit(commit) => commit.display(),
        }
    }
}
