//! Score composition and hand-off to an external ABC renderer.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Placeholder in a render command replaced with the score file path.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Concatenate the header and both staves, right hand first.
///
/// The result is not validated; malformed ABC is the renderer's concern.
pub fn compose_score(header: &str, right: &str, left: &str) -> String {
    let mut abc = String::with_capacity(header.len() + right.len() + left.len());
    abc.push_str(header);
    abc.push_str(right);
    abc.push_str(left);
    abc
}

/// What a render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub path: PathBuf,
    /// Exit status of the render command, if one ran.
    pub command_status: Option<i32>,
}

/// External notation renderer: receives a complete ABC string.
pub trait ScoreRenderer {
    fn render(&mut self, abc: &str) -> Result<RenderOutcome, String>;
}

/// Writes the score to a file and optionally runs a command on it
/// (e.g. `abcm2ps -O score.ps {file}`).
pub struct FileRenderer {
    path: PathBuf,
    command: Option<String>,
}

impl FileRenderer {
    pub fn new(path: impl Into<PathBuf>, command: Option<String>) -> Self {
        Self {
            path: path.into(),
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn run_command(&self, template: &str) -> Result<i32, String> {
        let file = self.path.to_string_lossy();
        let args: Vec<String> = template
            .split_whitespace()
            .map(|arg| arg.replace(FILE_PLACEHOLDER, &file))
            .collect();
        let (program, rest) = args
            .split_first()
            .ok_or_else(|| "Empty render command".to_string())?;

        log::info!(target: "render", "running {} {:?}", program, rest);
        let output = Command::new(program)
            .args(rest)
            .output()
            .map_err(|e| format!("Failed to run {}: {}", program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!(target: "render", "{} exited with {}: {}", program, output.status, stderr.trim());
        }
        Ok(output.status.code().unwrap_or(-1))
    }
}

impl ScoreRenderer for FileRenderer {
    fn render(&mut self, abc: &str) -> Result<RenderOutcome, String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }
        std::fs::write(&self.path, abc)
            .map_err(|e| format!("Failed to write {}: {}", self.path.display(), e))?;

        let command_status = match self.command.as_deref() {
            Some(template) => Some(self.run_command(template)?),
            None => None,
        };

        Ok(RenderOutcome {
            path: self.path.clone(),
            command_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_orders_header_right_left() {
        let abc = compose_score("X:1\nK:C\n", "CDE", "C,,");
        assert_eq!(abc, "X:1\nK:C\nCDEC,,");
    }

    #[test]
    fn compose_does_not_validate() {
        assert_eq!(compose_score("", "[[", ""), "[[");
    }

    #[test]
    fn file_renderer_writes_score() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("score.abc");
        let mut renderer = FileRenderer::new(&path, None);
        let outcome = renderer.render("X:1\nK:C\nC").unwrap();
        assert_eq!(outcome.path, path);
        assert_eq!(outcome.command_status, None);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "X:1\nK:C\nC");
    }

    #[test]
    fn blank_command_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = FileRenderer::new(dir.path().join("s.abc"), Some("  ".to_string()));
        assert_eq!(renderer.render("C").unwrap().command_status, None);
    }

    #[test]
    fn missing_command_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = FileRenderer::new(
            dir.path().join("s.abc"),
            Some("keyscribe-no-such-renderer {file}".to_string()),
        );
        assert!(renderer.render("C").is_err());
        // the score file is still written before the command runs
        assert!(dir.path().join("s.abc").exists());
    }

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        format!("sh {} {}", path.display(), FILE_PLACEHOLDER)
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_reports_exit_status() {
        let dir = tempfile::tempdir().unwrap();
        let command = script(dir.path(), "fail.sh", "exit 3\n");
        let mut renderer = FileRenderer::new(dir.path().join("s.abc"), Some(command));
        let outcome = renderer.render("C").unwrap();
        assert_eq!(outcome.command_status, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn command_receives_score_path() {
        let dir = tempfile::tempdir().unwrap();
        let command = script(dir.path(), "copy.sh", "cp \"$1\" \"$1.copy\"\n");
        let path = dir.path().join("s.abc");
        let mut renderer = FileRenderer::new(&path, Some(command));
        let outcome = renderer.render("X:1\nK:C\n[CE]").unwrap();
        assert_eq!(outcome.command_status, Some(0));
        let copy = dir.path().join("s.abc.copy");
        assert_eq!(std::fs::read_to_string(copy).unwrap(), "X:1\nK:C\n[CE]");
    }
}
