use std::convert::Infallible;
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;

use nix::errno::Errno;
use nix::unistd::{self, ForkResult, Pid};

use crate::error::Error;
use crate::pipes::PipeFabric;
use crate::types::{Command, Pipeline};

/// Fork one process per command, wired through the pipe fabric, and return
/// the handles of every child that was actually created.
///
/// Pipe creation failure abandons the whole pipeline before any fork. A
/// failed fork only skips its own slot: the neighbours keep their pipe ends
/// and simply see end-of-stream (or a closed reader) on that side. Commands
/// with an empty argv are skipped as no-ops.
pub fn run_pipeline(pipeline: &Pipeline) -> Result<Vec<Pid>, Error> {
	let fabric = PipeFabric::new(pipeline.commands.len())?;
	let mut pids = Vec::with_capacity(pipeline.commands.len());
	for (idx, command) in pipeline.commands.iter().enumerate() {
		if command.args.is_empty() {
			continue;
		}
		// argv CStrings are prepared on the parent side of the fork
		let argv = match build_argv(&command.args) {
			Ok(argv) => argv,
			Err(e) => {
				eprintln!("psh: {}", e);
				continue;
			},
		};
		match unsafe { unistd::fork() } {
			Ok(ForkResult::Parent { child }) => pids.push(child),
			Ok(ForkResult::Child) => exec_child(command, &fabric, idx, argv),
			Err(errno) => eprintln!("psh: {}", Error::Fork(errno)),
		}
	}
	// dropping the fabric closes every endpoint the shell still holds
	Ok(pids)
}

fn build_argv(args: &[String]) -> Result<Vec<CString>, Error> {
	args.iter()
		.map(|arg| CString::new(arg.as_str()))
		.collect::<Result<Vec<_>, _>>()
		.map_err(|_| Error::Exec { name: args[0].clone(), source: Errno::EINVAL })
}

/// Child side of the launch. Never returns; any failure terminates the
/// child (and only the child) with a status the parent can distinguish.
fn exec_child(command: &Command, fabric: &PipeFabric, idx: usize, argv: Vec<CString>) -> ! {
	let err = match do_exec(command, fabric, idx, &argv) {
		Err(e) => e,
		Ok(never) => match never {},
	};
	eprintln!("psh: {}", err);
	unsafe { libc::_exit(err.child_exit_code()) }
}

fn do_exec(command: &Command, fabric: &PipeFabric, idx: usize, argv: &[CString]) -> Result<Infallible, Error> {
	if let Some(fd) = fabric.stdin_for(idx) {
		unistd::dup2(fd.as_raw_fd(), libc::STDIN_FILENO)?;
	}
	if let Some(fd) = fabric.stdout_for(idx) {
		unistd::dup2(fd.as_raw_fd(), libc::STDOUT_FILENO)?;
	}
	// file redirections come after the pipe roles: on the same stream the
	// explicit file wins
	if let Some(path) = &command.in_file {
		let file = File::open(path)
			.map_err(|source| Error::Redirection { path: path.clone(), source })?;
		unistd::dup2(file.as_raw_fd(), libc::STDIN_FILENO)?;
	}
	if let Some(path) = &command.out_file {
		let file = OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.mode(0o644)
			.open(path)
			.map_err(|source| Error::Redirection { path: path.clone(), source })?;
		unistd::dup2(file.as_raw_fd(), libc::STDOUT_FILENO)?;
	}
	// fabric endpoints and redirect fds are O_CLOEXEC (dup2 cleared the
	// flag on the stdio copies), so exec releases every original
	unistd::execvp(argv[0].as_c_str(), argv)
		.map_err(|source| Error::Exec { name: command.args[0].clone(), source })?;
	unreachable!()
}
