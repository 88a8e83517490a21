//! Local adapter implementations for the bash and edit capabilities.
//!
//! The computer capability has no local implementation here; screen capture
//! and input injection stay with the hosting application.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use maestro_core::ToolError;
use tokio::process::Command;
use tracing::{debug, info};

use crate::adapter::{BashAdapter, DirEntry, EditAdapter};

/// Runs commands through the platform shell.
#[derive(Clone, Debug, Default)]
pub struct LocalBashAdapter;

impl LocalBashAdapter {
	pub fn new() -> Self {
		Self
	}

	fn shell_command(command: &str) -> Command {
		if cfg!(windows) {
			let mut cmd = Command::new("cmd");
			cmd.args(["/C", command]);
			cmd
		} else {
			let mut cmd = Command::new("sh");
			cmd.args(["-c", command]);
			cmd
		}
	}
}

#[async_trait]
impl BashAdapter for LocalBashAdapter {
	async fn run(&self, command: &str, timeout_ms: Option<u64>) -> Result<String, ToolError> {
		debug!(command = command, timeout_ms = ?timeout_ms, "running command");
		let future = Self::shell_command(command).output();
		let output = match timeout_ms {
			Some(ms) => tokio::time::timeout(Duration::from_millis(ms), future)
				.await
				.map_err(|_| ToolError::Timeout)??,
			None => future.await?,
		};

		let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
		let stderr = String::from_utf8_lossy(&output.stderr);
		if !stderr.is_empty() {
			if !text.is_empty() && !text.ends_with('\n') {
				text.push('\n');
			}
			text.push_str(&stderr);
		}
		info!(
			command = command,
			exit_code = output.status.code().unwrap_or(-1),
			output_len = text.len(),
			"command finished"
		);
		Ok(text)
	}

	async fn run_background(&self, command: &str) -> Result<String, ToolError> {
		let child = Self::shell_command(command)
			.stdout(std::process::Stdio::null())
			.stderr(std::process::Stdio::null())
			.spawn()?;
		let pid = child
			.id()
			.ok_or_else(|| ToolError::Adapter("background process exited immediately".to_string()))?;
		info!(command = command, pid = pid, "started background command");
		// The child handle is dropped without kill-on-drop; the process
		// outlives this call and the pid is the handle the model gets back.
		Ok(pid.to_string())
	}
}

/// File operations on the local filesystem.
#[derive(Clone, Debug, Default)]
pub struct LocalEditAdapter;

impl LocalEditAdapter {
	pub fn new() -> Self {
		Self
	}

	async fn ensure_parent(path: &Path) -> Result<(), ToolError> {
		if let Some(parent) = path.parent() {
			if !parent.as_os_str().is_empty() {
				tokio::fs::create_dir_all(parent).await?;
			}
		}
		Ok(())
	}

	fn search_dir<'a>(
		dir: PathBuf,
		pattern: &'a str,
		matches: &'a mut Vec<String>,
	) -> BoxFuture<'a, Result<(), ToolError>> {
		Box::pin(async move {
			let mut entries = tokio::fs::read_dir(&dir).await?;
			while let Some(entry) = entries.next_entry().await? {
				let path = entry.path();
				let file_type = entry.file_type().await?;
				if file_type.is_dir() {
					Self::search_dir(path, pattern, matches).await?;
				} else if entry.file_name().to_string_lossy().contains(pattern) {
					matches.push(path.to_string_lossy().into_owned());
				}
			}
			Ok(())
		})
	}
}

#[async_trait]
impl EditAdapter for LocalEditAdapter {
	async fn read(&self, path: &str) -> Result<String, ToolError> {
		let content = tokio::fs::read_to_string(path).await?;
		debug!(path = path, bytes = content.len(), "read file");
		Ok(content)
	}

	async fn write(&self, path: &str, content: &str) -> Result<(), ToolError> {
		let path_ref = Path::new(path);
		Self::ensure_parent(path_ref).await?;
		tokio::fs::write(path_ref, content).await?;
		info!(path = path, bytes = content.len(), "wrote file");
		Ok(())
	}

	async fn append(&self, path: &str, content: &str) -> Result<(), ToolError> {
		let path_ref = Path::new(path);
		Self::ensure_parent(path_ref).await?;
		let existing = if path_ref.exists() {
			tokio::fs::read_to_string(path_ref).await?
		} else {
			String::new()
		};
		tokio::fs::write(path_ref, format!("{existing}{content}")).await?;
		info!(path = path, bytes = content.len(), "appended to file");
		Ok(())
	}

	async fn list(&self, path: &str) -> Result<Vec<DirEntry>, ToolError> {
		let mut entries = tokio::fs::read_dir(path).await?;
		let mut result = Vec::new();
		while let Some(entry) = entries.next_entry().await? {
			let metadata = entry.metadata().await?;
			result.push(DirEntry {
				name: entry.file_name().to_string_lossy().into_owned(),
				is_directory: metadata.is_dir(),
				size: metadata.len(),
			});
		}
		result.sort_by(|a, b| a.name.cmp(&b.name));
		Ok(result)
	}

	async fn search(&self, dir: &str, pattern: &str) -> Result<Vec<String>, ToolError> {
		let mut matches = Vec::new();
		Self::search_dir(PathBuf::from(dir), pattern, &mut matches).await?;
		matches.sort();
		debug!(dir = dir, pattern = pattern, matches = matches.len(), "search finished");
		Ok(matches)
	}

	async fn replace(&self, path: &str, pattern: &str, replacement: &str) -> Result<(), ToolError> {
		let content = tokio::fs::read_to_string(path).await?;
		let occurrences = content.matches(pattern).count();
		if occurrences == 0 {
			return Err(ToolError::Adapter(format!(
				"pattern '{pattern}' not found in {path}"
			)));
		}
		// Refuse ambiguous replacements; the caller must make the pattern
		// unique before any edit happens.
		if occurrences > 1 {
			let lines: Vec<usize> = content
				.lines()
				.enumerate()
				.filter(|(_, line)| line.contains(pattern))
				.map(|(idx, _)| idx + 1)
				.collect();
			return Err(ToolError::Adapter(format!(
				"pattern '{pattern}' matches {occurrences} times in {path} (lines {lines:?}); \
				no replacement performed, make the pattern unique"
			)));
		}
		let updated = content.replace(pattern, replacement);
		tokio::fs::write(path, updated).await?;
		info!(path = path, "replaced pattern");
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::TempDir;

	#[tokio::test]
	async fn bash_run_captures_stdout() {
		let adapter = LocalBashAdapter::new();
		let output = adapter.run("echo hello", None).await.unwrap();
		assert_eq!(output.trim(), "hello");
	}

	#[tokio::test]
	async fn bash_run_times_out() {
		let adapter = LocalBashAdapter::new();
		let result = adapter.run("sleep 5", Some(50)).await;
		assert!(matches!(result, Err(ToolError::Timeout)));
	}

	#[tokio::test]
	async fn bash_background_returns_pid() {
		let adapter = LocalBashAdapter::new();
		let pid = adapter.run_background("sleep 0.1").await.unwrap();
		assert!(pid.parse::<u32>().is_ok());
	}

	#[tokio::test]
	async fn write_creates_parent_directories() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("nested/deep/file.txt");
		let adapter = LocalEditAdapter::new();

		adapter
			.write(path.to_str().unwrap(), "content")
			.await
			.unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
	}

	#[tokio::test]
	async fn append_creates_then_extends() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("log.txt");
		let adapter = LocalEditAdapter::new();
		let path_str = path.to_str().unwrap();

		adapter.append(path_str, "one\n").await.unwrap();
		adapter.append(path_str, "two\n").await.unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
	}

	#[tokio::test]
	async fn list_reports_directories_and_sizes() {
		let dir = TempDir::new().unwrap();
		std::fs::create_dir(dir.path().join("sub")).unwrap();
		std::fs::write(dir.path().join("a.txt"), "12345").unwrap();
		let adapter = LocalEditAdapter::new();

		let entries = adapter.list(dir.path().to_str().unwrap()).await.unwrap();
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[0].name, "a.txt");
		assert!(!entries[0].is_directory);
		assert_eq!(entries[0].size, 5);
		assert_eq!(entries[1].name, "sub");
		assert!(entries[1].is_directory);
	}

	#[tokio::test]
	async fn search_finds_matching_names_recursively() {
		let dir = TempDir::new().unwrap();
		std::fs::create_dir(dir.path().join("sub")).unwrap();
		std::fs::write(dir.path().join("match_a.log"), "").unwrap();
		std::fs::write(dir.path().join("sub/match_b.log"), "").unwrap();
		std::fs::write(dir.path().join("other.txt"), "").unwrap();
		let adapter = LocalEditAdapter::new();

		let matches = adapter
			.search(dir.path().to_str().unwrap(), "match")
			.await
			.unwrap();
		assert_eq!(matches.len(), 2);
		assert!(matches[0].ends_with("match_a.log"));
		assert!(matches[1].ends_with("match_b.log"));
	}

	#[tokio::test]
	async fn replace_substitutes_a_unique_match() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("file.txt");
		std::fs::write(&path, "foo bar qux").unwrap();
		let adapter = LocalEditAdapter::new();

		adapter
			.replace(path.to_str().unwrap(), "foo", "baz")
			.await
			.unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "baz bar qux");
	}

	#[tokio::test]
	async fn replace_refuses_an_ambiguous_pattern() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("file.txt");
		std::fs::write(&path, "foo bar\nfoo baz").unwrap();
		let adapter = LocalEditAdapter::new();

		let result = adapter.replace(path.to_str().unwrap(), "foo", "qux").await;
		match result {
			Err(ToolError::Adapter(message)) => {
				assert!(message.contains("2 times"));
				assert!(message.contains("[1, 2]"), "lists the matching lines");
			}
			other => panic!("expected adapter error, got {other:?}"),
		}
		assert_eq!(
			std::fs::read_to_string(&path).unwrap(),
			"foo bar\nfoo baz",
			"file untouched"
		);
	}

	#[tokio::test]
	async fn replace_errors_when_pattern_missing() {
		let dir = TempDir::new().unwrap();
		let path = dir.path().join("file.txt");
		std::fs::write(&path, "content").unwrap();
		let adapter = LocalEditAdapter::new();

		let result = adapter.replace(path.to_str().unwrap(), "absent", "x").await;
		assert!(matches!(result, Err(ToolError::Adapter(_))));
	}
}
