use crate::errors::VcsError;

#[derive(Debug, Clone, Copy, Eq, Ord, Default, PartialEq, PartialOrd, Hash)]
pub enum FileMode {
    #[default]
    Regular,
    Executable,
    Symlink,
}

#[derive(Debug, Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub enum EntryMode {
    File(FileMode),
    Directory,
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::File(FileMode::Regular)
    }
}

impl EntryMode {
    pub fn as_str(&self) -> &str {
        match self {
            EntryMode::File(FileMode::Regular) => "100644",
            EntryMode::File(FileMode::Executable) => "100755",
            EntryMode::File(FileMode::Symlink) => "120000",
            EntryMode::Directory => "040000",
        }
    }

    /// Permission bits applied when the entry is written to disk.
    pub fn permissions(&self) -> u32 {
        match self {
            EntryMode::File(FileMode::Executable) | EntryMode::Directory => 0o755,
            EntryMode::File(FileMode::Regular) | EntryMode::File(FileMode::Symlink) => 0o644,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, EntryMode::File(FileMode::Symlink))
    }

    /// Classify a file the way it will be recorded in the index.
    pub fn from_metadata(path: &std::path::Path, metadata: &std::fs::Metadata) -> Self {
        use is_executable::IsExecutable;

        if metadata.file_type().is_symlink() {
            EntryMode::File(FileMode::Symlink)
        } else if metadata.is_dir() {
            EntryMode::Directory
        } else if path.is_executable() {
            EntryMode::File(FileMode::Executable)
        } else {
            EntryMode::File(FileMode::Regular)
        }
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = VcsError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "100644" => Ok(EntryMode::File(FileMode::Regular)),
            "100755" => Ok(EntryMode::File(FileMode::Executable)),
            "120000" => Ok(EntryMode::File(FileMode::Symlink)),
            "040000" | "40000" => Ok(EntryMode::Directory),
            _ => Err(VcsError::validation(format!("invalid entry mode: {}", value))),
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
