//! Show command implementation.

use std::path::PathBuf;

use clap::Args;

use crate::discovery::load;
use crate::error::{Result, ScriptError};
use crate::index::ScriptIndex;
use crate::output::Printer;

/// Print the SQL text of one script
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Script file, path or wildcard pattern
    pub file: String,

    /// Script name (case-insensitive)
    pub name: String,

    /// Project directory holding scriptmap.yaml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
}

pub fn run(args: ShowArgs, printer: &Printer) -> Result<()> {
    let options = super::load_options(&args.root, Some(&args.file))?;
    let index = load(&options)?;

    let script = index.find(&args.name).ok_or_else(|| {
        let similar = similar_names(&index, &args.name);
        ScriptError::NotFound {
            message: format!("no script named '{}' in {}", args.name, args.file),
            help: Some(if similar.is_empty() {
                "Run `scriptmap list` to see the loaded scripts".to_string()
            } else {
                format!("Did you mean: {}", similar.join(", "))
            }),
        }
    })?;

    printer.script(script);
    println!("{}", script.text);
    Ok(())
}

/// Loaded names containing `name`, ignoring case, sorted.
fn similar_names<'a>(index: &'a ScriptIndex, name: &str) -> Vec<&'a str> {
    let needle = name.to_lowercase();
    let mut names: Vec<&str> = index
        .names()
        .filter(|candidate| candidate.to_lowercase().contains(&needle))
        .collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_show_existing_script() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Scripts.sql");
        fs::write(&file, "--@query GetUsers\nselect * from Users;").unwrap();

        let args = ShowArgs {
            file: file.display().to_string(),
            name: "getusers".to_string(),
            root: dir.path().to_path_buf(),
        };

        run(args, &Printer::new()).unwrap();
    }

    #[test]
    fn test_show_missing_script() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Scripts.sql");
        fs::write(&file, "--@query GetUsers\nselect * from Users;").unwrap();

        let args = ShowArgs {
            file: file.display().to_string(),
            name: "Nope".to_string(),
            root: dir.path().to_path_buf(),
        };

        let err = run(args, &Printer::new()).unwrap_err();
        assert!(matches!(err, ScriptError::NotFound { .. }));
    }

    #[test]
    fn test_show_suggests_similar_names() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Scripts.sql");
        fs::write(
            &file,
            "--@query GetUsers\nselect 1;\n--@execute DeleteUser\ndelete from Users;\n--@query GetOrders\nselect 2;",
        )
        .unwrap();

        let args = ShowArgs {
            file: file.display().to_string(),
            name: "user".to_string(),
            root: dir.path().to_path_buf(),
        };

        match run(args, &Printer::new()) {
            Err(ScriptError::NotFound { help, .. }) => {
                assert_eq!(help.as_deref(), Some("Did you mean: DeleteUser, GetUsers"));
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
