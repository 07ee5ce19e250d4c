use clap::{Args, CommandFactory, Parser, Subcommand};
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use vcs::areas::repository::Repository;
use vcs::artifacts::core::pager::PagerWriter;
use vcs::commands::plumbing::cat_file::CatFileMode;
use vcs::commands::porcelain::diff::DiffMode;
use vcs::commands::porcelain::log::LogOptions;
use vcs::commands::porcelain::reset::ResetMode;
use vcs::commands::porcelain::stash::StashAction;
use vcs::errors::{ErrorKind, VcsError, classify};

/// Overrides the log filter, e.g. `VCS_LOG=vcs=trace`.
const LOG_ENV: &str = "VCS_LOG";

#[derive(Parser)]
#[command(
    name = "vcs",
    version,
    about = "A local, single-user version control system",
    long_about = "A local version control system keeping content-addressed objects, \
    a staging index, branches and a stash under the .vcs directory of the working tree.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Log repository operations to stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Create an empty repository")]
    Init {
        #[arg(index = 1, help = "The working tree root (default: current directory)")]
        path: Option<PathBuf>,
    },
    #[command(name = "hash-object", about = "Compute the blob id of a file")]
    HashObject {
        #[arg(short, long, help = "Also store the blob in the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
    #[command(name = "cat-file", about = "Inspect a stored object")]
    CatFile {
        #[command(flatten)]
        mode: CatFileFlags,
        #[arg(index = 1)]
        hash: String,
    },
    #[command(name = "ls-tree", about = "List the rows of a tree object")]
    LsTree {
        #[arg(index = 1)]
        hash: String,
    },
    #[command(name = "write-tree", about = "Store the index as trees and print the root id")]
    WriteTree {
        #[arg(short = 's', help = "Print every stored tree")]
        status: bool,
    },
    #[command(name = "add", about = "Stage files at or below a path")]
    Add {
        #[arg(short = 's', help = "Print every newly stored blob")]
        status: bool,
        #[arg(index = 1)]
        path: PathBuf,
    },
    #[command(name = "status", about = "Show the working tree status")]
    Status,
    #[command(name = "commit", about = "Record the index on the current branch")]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(name = "log", about = "Show the history of HEAD")]
    Log {
        #[arg(long, help = "One line per commit")]
        oneline: bool,
    },
    #[command(name = "diff", about = "Show line changes")]
    Diff {
        #[arg(long, visible_alias = "cached", help = "Compare the HEAD commit with the index")]
        staged: bool,
        #[arg(num_args = 0..=2, conflicts_with = "staged", help = "Branches or commit hashes")]
        commits: Vec<String>,
    },
    #[command(name = "branch", about = "List or create branches")]
    Branch {
        #[arg(index = 1)]
        name: Option<String>,
        #[arg(index = 2, help = "Branch or commit hash to start from (default: HEAD)")]
        source: Option<String>,
    },
    #[command(name = "checkout", about = "Switch to a branch or a commit")]
    Checkout {
        #[arg(short = 'b', help = "Create the branch first")]
        create: bool,
        #[arg(index = 1)]
        target: String,
        #[arg(index = 2, requires = "create", help = "Start point of the new branch")]
        start_point: Option<String>,
    },
    #[command(name = "merge", about = "Bring another branch's files into the working tree")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "reset", about = "Move the current branch to an earlier commit")]
    Reset {
        #[command(flatten)]
        mode: ResetFlags,
        #[arg(index = 1)]
        hash: String,
    },
    #[command(
        name = "stash",
        about = "Shelve local changes",
        args_conflicts_with_subcommands = true
    )]
    Stash {
        #[arg(short, long, help = "Save the working tree under this message")]
        message: Option<String>,
        #[command(subcommand)]
        action: Option<StashCommand>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct CatFileFlags {
    #[arg(short = 'e', help = "Report whether the object exists")]
    exists: bool,
    #[arg(short = 'p', help = "Print the object content")]
    pretty: bool,
    #[arg(short = 't', help = "Print the object kind")]
    kind: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct ResetFlags {
    #[arg(long, help = "Move the branch only")]
    soft: bool,
    #[arg(long, help = "Also replace the index")]
    mixed: bool,
    #[arg(long, help = "Also replace the index and the working tree")]
    hard: bool,
}

#[derive(Subcommand)]
enum StashCommand {
    #[command(about = "List stash entries, newest first")]
    List,
    #[command(about = "Reapply an entry and keep it")]
    Apply { tag: String },
    #[command(about = "Reapply an entry and remove it")]
    Pop { tag: String },
    #[command(about = "Remove an entry")]
    Drop { tag: String },
    #[command(about = "Show the changes recorded in an entry")]
    Show { tag: String },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::HashObject { .. } => "hash-object",
            Commands::CatFile { .. } => "cat-file",
            Commands::LsTree { .. } => "ls-tree",
            Commands::WriteTree { .. } => "write-tree",
            Commands::Add { .. } => "add",
            Commands::Status => "status",
            Commands::Commit { .. } => "commit",
            Commands::Log { .. } => "log",
            Commands::Diff { .. } => "diff",
            Commands::Branch { .. } => "branch",
            Commands::Checkout { .. } => "checkout",
            Commands::Merge { .. } => "merge",
            Commands::Reset { .. } => "reset",
            Commands::Stash { .. } => "stash",
        }
    }

    /// Long listings go through the pager.
    fn is_paged(&self) -> bool {
        matches!(
            self,
            Commands::Log { .. }
                | Commands::Diff { .. }
                | Commands::Stash {
                    action: Some(StashCommand::List | StashCommand::Show { .. }),
                    ..
                }
        )
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let kind = classify(&error);
            eprintln!("error: {:#}", error);

            if kind == ErrorKind::Validation {
                print_usage(cli.command.name());
            }

            ExitCode::from(kind.exit_code() as u8)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage(subcommand: &str) {
    let mut command = Cli::command();
    command.build();

    if let Some(subcommand) = command.find_subcommand_mut(subcommand) {
        eprintln!("{}", subcommand.render_usage());
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let root = match &cli.command {
        Commands::Init { path: Some(path) } => path.clone(),
        _ => std::env::current_dir()?,
    };

    let pager = Pager::new();
    let paged = cli.command.is_paged()
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_PAGER").is_none();
    let writer: Box<dyn Write> = if paged {
        Box::new(PagerWriter::new(pager.clone()))
    } else {
        Box::new(std::io::stdout())
    };

    let mut repository = Repository::new(&root, writer)?;
    if !matches!(cli.command, Commands::Init { .. }) && !repository.is_initialized() {
        return Err(VcsError::validation(format!(
            "not a vcs repository (no .vcs directory in {})",
            repository.path().display()
        ))
        .into());
    }

    match &cli.command {
        Commands::Init { .. } => repository.init().await?,
        Commands::HashObject { write, file } => repository.hash_object(file, *write).await?,
        Commands::CatFile { mode, hash } => {
            let mode = if mode.exists {
                CatFileMode::Exists
            } else if mode.kind {
                CatFileMode::Type
            } else {
                CatFileMode::Pretty
            };
            repository.cat_file(hash, mode).await?
        }
        Commands::LsTree { hash } => repository.ls_tree(hash).await?,
        Commands::WriteTree { status } => repository.write_tree(*status).await?,
        Commands::Add { status, path } => repository.add(path, *status).await?,
        Commands::Status => repository.show_status().await?,
        Commands::Commit { message } => repository.commit(message).await?,
        Commands::Log { oneline } => repository.log(&LogOptions { oneline: *oneline }).await?,
        Commands::Diff { staged, commits } => {
            let mode = match (staged, commits.as_slice()) {
                (true, _) => DiffMode::Staged,
                (false, []) => DiffMode::Workspace,
                (false, [commit]) => DiffMode::CommitWorkspace(commit.clone()),
                (false, [old, new, ..]) => DiffMode::Commits(old.clone(), new.clone()),
            };
            repository.diff(&mode).await?
        }
        Commands::Branch { name, source } => {
            repository
                .branch(name.as_deref(), source.as_deref())
                .await?
        }
        Commands::Checkout {
            create,
            target,
            start_point,
        } => {
            repository
                .checkout(target, *create, start_point.as_deref())
                .await?
        }
        Commands::Merge { branch } => repository.merge(branch).await?,
        Commands::Reset { mode, hash } => {
            let mode = if mode.soft {
                ResetMode::Soft
            } else if mode.hard {
                ResetMode::Hard
            } else {
                ResetMode::Mixed
            };
            repository.reset(mode, hash).await?
        }
        Commands::Stash { message, action } => {
            let action = match (message, action) {
                (_, Some(StashCommand::List)) => StashAction::List,
                (_, Some(StashCommand::Apply { tag })) => StashAction::Apply(tag.clone()),
                (_, Some(StashCommand::Pop { tag })) => StashAction::Pop(tag.clone()),
                (_, Some(StashCommand::Drop { tag })) => StashAction::Drop(tag.clone()),
                (_, Some(StashCommand::Show { tag })) => StashAction::Show(tag.clone()),
                (Some(message), None) => StashAction::Save(message.clone()),
                (None, None) => {
                    return Err(VcsError::validation(
                        "stash needs -m <message> or one of list, apply, pop, drop, show",
                    )
                    .into());
                }
            };
            repository.stash(&action).await?
        }
    }

    repository.writer().flush()?;
    drop(repository);

    if paged {
        minus::page_all(pager)?;
    }

    Ok(())
}
