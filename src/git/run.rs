//! Thin wrapper around the git binary
//!
//! All repository assembly happens by shelling out to git with explicit
//! argument vectors. Nothing here goes through a shell, so URLs, paths,
//! and branch names are never interpolated into a command line.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use log::debug;

use crate::error::GitError;

pub type GitResult<T> = std::result::Result<T, GitError>;

/// Run git in a directory, failing on a non-zero exit status
pub(crate) fn git<I, S>(dir: &Path, args: I) -> GitResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
    run(Some(dir), &argv)
}

/// Run git in a directory, returning trimmed stdout
pub(crate) fn git_stdout<I, S>(dir: &Path, args: I) -> GitResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let output = git(dir, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run git in a directory where failure is expected and tolerable
pub(crate) fn git_ok<I, S>(dir: &Path, args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    git(dir, args).is_ok()
}

/// Run git without a working directory, for global config and remote probes
pub(crate) fn git_global<I, S>(args: I) -> GitResult<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|a| a.as_ref().to_string()).collect();
    run(None, &argv)
}

fn run(dir: Option<&Path>, argv: &[String]) -> GitResult<Output> {
    let logged: Vec<String> = argv.iter().map(|a| mask_credentials(a)).collect();
    match dir {
        Some(dir) => debug!("git {} (in {})", logged.join(" "), dir.display()),
        None => debug!("git {}", logged.join(" ")),
    }

    let mut command = Command::new("git");
    command
        .args(argv)
        .stdin(Stdio::null())
        // A missing or private remote must fail, not prompt for credentials
        .env("GIT_TERMINAL_PROMPT", "0");
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    let output = command
        .output()
        .map_err(|e| GitError::Launch(e.to_string()))?;

    if !output.status.success() {
        return Err(command_error(argv, &output));
    }
    Ok(output)
}

fn command_error(argv: &[String], output: &Output) -> GitError {
    let context = argv
        .iter()
        .take(2)
        .map(|a| mask_credentials(a))
        .collect::<Vec<_>>()
        .join(" ");
    let stderr = mask_credentials(String::from_utf8_lossy(&output.stderr).trim());
    GitError::Command { context, stderr }
}

/// Strip userinfo from https URLs so tokens never reach logs or errors.
///
/// Git echoes fetch URLs back in its error output, which would otherwise
/// leak the token embedded for authentication.
pub(crate) fn mask_credentials(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("https://") {
        let scheme_end = start + "https://".len();
        out.push_str(&rest[..scheme_end]);
        let tail = &rest[scheme_end..];
        let boundary = tail
            .find(|c: char| matches!(c, '/' | ' ' | '\'' | '"' | '\n'))
            .unwrap_or(tail.len());
        match tail[..boundary].find('@') {
            Some(at) => {
                out.push_str("***");
                rest = &tail[at..];
            }
            None => rest = tail,
        }
    }
    out.push_str(rest);
    out
}
