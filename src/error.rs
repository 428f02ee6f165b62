use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

/// Everything that can go wrong while running a pipeline or a builtin.
///
/// None of these are fatal to the shell loop: parent-side errors are
/// reported and the loop continues, child-side errors terminate only the
/// affected child with a non-zero status.
#[derive(Debug, Error)]
pub enum Error {
	#[error("cannot create pipe: {0}")]
	PipeCreation(#[source] Errno),
	#[error("cannot fork: {0}")]
	Fork(#[source] Errno),
	#[error("{path}: {source}")]
	Redirection { path: String, source: io::Error },
	#[error("{name}: {source}")]
	Exec { name: String, source: Errno },
	#[error("cd: HOME is not set")]
	NoHome,
	#[error("cd: {}: {source}", .path.display())]
	ChangeDir { path: PathBuf, source: io::Error },
	#[error("{0}")]
	Sys(#[from] Errno),
}

impl Error {
	/// Exit status for a child that failed before reaching its program
	/// image. 127 for a missing program, 1 for a failed redirection, 126
	/// for anything else on the launch path.
	pub fn child_exit_code(&self) -> i32 {
		match self {
			Error::Exec { source: Errno::ENOENT, .. } => 127,
			Error::Redirection { .. } => 1,
			_ => 126,
		}
	}
}
