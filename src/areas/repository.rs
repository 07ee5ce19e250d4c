use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::core::ignore::IgnoreList;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::status::status_info::Status;
use crate::errors::VcsError;
use std::cell::{RefCell, RefMut};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Name of the repository marker directory.
pub const REPOSITORY_DIR: &str = ".vcs";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn Write>>,
    input: RefCell<Box<dyn BufRead>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &Path, writer: Box<dyn Write>) -> anyhow::Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(path).map_err(|source| {
                VcsError::runtime(format!("unable to create {}", path.display()), source)
            })?;
        }
        let path = path.canonicalize()?;
        let vcs_path = path.join(REPOSITORY_DIR);

        let index = Index::new(vcs_path.join("index").into_boxed_path());
        let database = Database::new(vcs_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(vcs_path.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            input: RefCell::new(Box::new(std::io::BufReader::new(std::io::stdin()))),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vcs_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn is_initialized(&self) -> bool {
        self.vcs_path().join("HEAD").is_file()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn status(&'_ self) -> Status<'_> {
        Status::new(self)
    }

    /// The ignore list, read fresh from `.vcsignore`.
    pub fn ignore_list(&self) -> anyhow::Result<IgnoreList> {
        IgnoreList::load(&self.path)
    }

    /// Ask a yes/no question; only `y` or `Y` counts as yes.
    pub fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        {
            let mut writer = self.writer();
            write!(writer, "{} [y/N] ", question)?;
            writer.flush()?;
        }

        let mut answer = String::new();
        self.input.borrow_mut().read_line(&mut answer)?;
        writeln!(self.writer())?;

        Ok(matches!(answer.trim(), "y" | "Y"))
    }

    /// Make the index and the working tree match `files` exactly.
    ///
    /// Every non-ignored path is deleted before the files are written back,
    /// so anything not in `files` is gone afterwards.
    pub(crate) fn materialize(
        &self,
        index: &mut Index,
        files: impl IntoIterator<Item = IndexEntry>,
    ) -> anyhow::Result<()> {
        let files = files.into_iter().collect::<Vec<_>>();

        index.replace_all(files.iter().cloned());
        index.write_updates()?;

        self.workspace.clean(&self.ignore_list()?)?;
        for entry in &files {
            let blob = self.load_blob(entry)?;
            self.workspace.write_entry(entry, blob.content())?;
        }
        debug!(files = files.len(), "working tree materialized");

        Ok(())
    }
}
