use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

use nix::fcntl::OFlag;
use nix::unistd;

use crate::error::Error;

/// The pipes connecting consecutive commands of one pipeline.
///
/// For N commands there are exactly N-1 pairs; pair i carries data from
/// command i to command i+1. The fabric owns every endpoint: children take
/// their role via dup2 (the originals are O_CLOEXEC, so they vanish at
/// exec), and the shell releases its copies by dropping the fabric once
/// every command has been launched. Holding them any longer would keep the
/// downstream ends from ever seeing end-of-stream.
pub struct PipeFabric {
	pairs: Vec<(OwnedFd, OwnedFd)>,
}

impl PipeFabric {
	pub fn new(commands: usize) -> Result<PipeFabric, Error> {
		let mut pairs = Vec::with_capacity(commands.saturating_sub(1));
		for _ in 1 .. commands {
			let pair = unistd::pipe2(OFlag::O_CLOEXEC).map_err(Error::PipeCreation)?;
			pairs.push(pair);
		}
		Ok(PipeFabric { pairs })
	}

	/// Read end feeding command `idx`'s stdin; None for the first command.
	pub fn stdin_for(&self, idx: usize) -> Option<BorrowedFd<'_>> {
		if idx == 0 {
			None
		} else {
			self.pairs.get(idx - 1).map(|p| p.0.as_fd())
		}
	}

	/// Write end receiving command `idx`'s stdout; None for the last command.
	pub fn stdout_for(&self, idx: usize) -> Option<BorrowedFd<'_>> {
		self.pairs.get(idx).map(|p| p.1.as_fd())
	}

	pub fn len(&self) -> usize {
		self.pairs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pairs.is_empty()
	}
}
