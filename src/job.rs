use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

/// Block until every handle of a foreground pipeline has terminated.
/// Order does not matter; EINTR is retried.
pub fn wait_foreground(pids: &[Pid]) {
	for &pid in pids {
		loop {
			match waitpid(pid, None) {
				Ok(WaitStatus::Exited(..)) | Ok(WaitStatus::Signaled(..)) => break,
				Ok(_) => {},
				Err(Errno::EINTR) => {},
				Err(_) => break,
			}
		}
	}
}

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Fire-and-forget reaper for background pipelines.
///
/// The shell loop hands over the handles and immediately returns to the
/// prompt; a collector thread polls them with WNOHANG so zombies never
/// accumulate. Foreground waits target specific pids, so the collector
/// can never steal their statuses.
pub struct Reaper {
	tx: Sender<Pid>,
}

impl Reaper {
	pub fn spawn() -> Reaper {
		let (tx, rx) = mpsc::channel();
		thread::Builder::new()
			.name("reaper".to_string())
			.spawn(move || collect(rx))
			.expect("cannot spawn reaper thread");
		Reaper { tx }
	}

	pub fn adopt(&self, pids: Vec<Pid>) {
		for pid in pids {
			let _ = self.tx.send(pid);
		}
	}
}

fn collect(rx: Receiver<Pid>) {
	let mut pending: Vec<Pid> = Vec::new();
	loop {
		if pending.is_empty() {
			match rx.recv() {
				Ok(pid) => pending.push(pid),
				Err(_) => return,
			}
		} else {
			match rx.recv_timeout(POLL_INTERVAL) {
				Ok(pid) => pending.push(pid),
				Err(RecvTimeoutError::Timeout) => {},
				// shell is gone; orphans get reparented anyway
				Err(RecvTimeoutError::Disconnected) => return,
			}
		}
		pending.retain(|&pid| still_running(pid));
	}
}

fn still_running(pid: Pid) -> bool {
	matches!(waitpid(pid, Some(WaitPidFlag::WNOHANG)), Ok(WaitStatus::StillAlive))
}
