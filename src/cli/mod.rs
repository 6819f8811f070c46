pub mod check;
pub mod completions;
pub mod init;
pub mod list;
pub mod show;

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::discovery::{discover, LoadOptions};
use crate::error::Result;

/// scriptmap - Named SQL scripts from pragma-annotated files
#[derive(Parser, Debug)]
#[command(name = "scriptmap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log lookup details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the scripts a file or pattern resolves to
    List(list::ListArgs),

    /// Print the SQL text of one script
    Show(show::ShowArgs),

    /// Fail unless the scripts are at least a given version
    Check(check::CheckArgs),

    /// Initialize a scriptmap project (generates scriptmap.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Build load options from the project manifest and a command-line file.
///
/// A relative file name or pattern is taken relative to the working
/// directory.
pub(crate) fn load_options(root: &Path, file: Option<&str>) -> Result<LoadOptions> {
    let project = discover(root)?;
    let mut options = project.load_options();

    if let Some(file) = file {
        let path = Path::new(file);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };
        options.file_name = Some(path.display().to_string());
    }

    Ok(options)
}
