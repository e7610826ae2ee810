use crate::areas::repository::Repository;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod areas;
mod artifacts;
mod commands;

#[derive(Parser)]
#[command(
    name = "gitlet",
    version = "0.1.0",
    about = "A minimal content-addressed version control engine",
    long_about = "gitlet manages a working directory, a staging area, an immutable \
    object store and named references. It is not meant to be a full replacement for \
    git, but rather a small engine that mirrors its core semantics.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(name = "init", about = "Initialize a new repository")]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Add files or directories to the index")]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(name = "rm", about = "Remove files from the working tree and the index")]
    Rm {
        #[arg(short = 'r', help = "Remove directories recursively")]
        recursive: bool,
        #[arg(index = 1, required = true, help = "The files or directories to remove")]
        paths: Vec<String>,
    },
    #[command(name = "commit", about = "Record the staged tree as a new commit")]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "branch",
        about = "List branches, create a branch, or set an upstream"
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
        #[arg(
            short = 'u',
            value_name = "REMOTE/BRANCH",
            help = "Record the upstream of the current branch"
        )]
        upstream: Option<String>,
    },
    #[command(name = "checkout", about = "Switch to a branch or commit")]
    Checkout {
        #[arg(index = 1, help = "The branch name or commit hash to check out")]
        target: String,
    },
    #[command(name = "merge", about = "Join another line of development into HEAD")]
    Merge {
        #[arg(index = 1, help = "The ref to merge into the current branch")]
        target: String,
    },
    #[command(
        name = "fetch",
        about = "Copy objects and branch heads from a peer repository"
    )]
    Fetch {
        #[arg(index = 1, help = "The name of the remote to fetch from")]
        remote: String,
    },
    #[command(name = "pull", about = "Fetch from a peer repository and merge FETCH_HEAD")]
    Pull {
        #[arg(index = 1, help = "The name of the remote to pull from")]
        remote: String,
    },
    #[command(name = "remote", about = "Manage the set of peer repositories")]
    Remote {
        #[command(subcommand)]
        command: RemoteCommands,
    },
    #[command(name = "diff", about = "Show changed paths between two trees")]
    Diff {
        #[arg(long, help = "Show only the names and statuses of changed files")]
        name_status: bool,
        #[arg(index = 1, help = "The first commit to compare")]
        first: Option<String>,
        #[arg(index = 2, help = "The second commit to compare")]
        second: Option<String>,
    },
    #[command(name = "update-index", about = "Register file contents in the index")]
    UpdateIndex {
        #[arg(long, help = "Stage the file at the given path")]
        add: bool,
        #[arg(long, help = "Drop the entry for the given path")]
        remove: bool,
        #[arg(index = 1, help = "The path to operate on")]
        path: String,
    },
    #[command(name = "write-tree", about = "Write the index out as a tree object")]
    WriteTree,
    #[command(name = "update-ref", about = "Point a ref at a commit")]
    UpdateRef {
        #[arg(index = 1, help = "The ref to update")]
        name: String,
        #[arg(index = 2, help = "The ref or hash to point it at")]
        value: String,
    },
}

#[derive(Subcommand)]
enum RemoteCommands {
    #[command(name = "add", about = "Record a new remote")]
    Add {
        #[arg(index = 1, help = "The name of the remote")]
        name: String,
        #[arg(index = 2, help = "The filesystem path of the peer repository")]
        url: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("fatal: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let stdout = || Box::new(std::io::stdout()) as Box<dyn std::io::Write>;

    match &cli.command {
        Commands::Init { path } => {
            let path = match path {
                Some(path) => PathBuf::from(path),
                None => std::env::current_dir()?,
            };
            Repository::init_at(&path, stdout())?;
        }
        command => {
            let pwd = std::env::current_dir()?;
            let mut repository = Repository::open(&pwd, stdout())?;

            match command {
                Commands::Init { .. } => unreachable!("handled above"),
                Commands::Add { paths } => repository.add(paths)?,
                Commands::Rm { recursive, paths } => repository.rm(paths, *recursive)?,
                Commands::Commit { message } => repository.commit(message)?,
                Commands::Branch { name, upstream } => {
                    repository.branch(name.as_deref(), upstream.as_deref())?
                }
                Commands::Checkout { target } => repository.checkout(target)?,
                Commands::Merge { target } => repository.merge(target)?,
                Commands::Fetch { remote } => repository.fetch(remote)?,
                Commands::Pull { remote } => repository.pull(remote)?,
                Commands::Remote { command } => match command {
                    RemoteCommands::Add { name, url } => repository.remote_add(name, url)?,
                },
                Commands::Diff {
                    name_status,
                    first,
                    second,
                } => repository.diff(*name_status, first.as_deref(), second.as_deref())?,
                Commands::UpdateIndex { add, remove, path } => {
                    repository.update_index(*add, *remove, path)?
                }
                Commands::WriteTree => repository.write_tree()?,
                Commands::UpdateRef { name, value } => repository.update_ref(name, value)?,
            }
        }
    }

    Ok(())
}
