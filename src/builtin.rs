use std::env;
use std::path::PathBuf;

use crate::error::Error;
use crate::types::{Command, Pipeline};

/// State the builtins carry across loop iterations. Owned by the shell
/// loop and passed in explicitly, so the dispatcher stays testable.
#[derive(Debug, Default)]
pub struct Session {
	prev_dir: Option<PathBuf>,
}

impl Session {
	pub fn new() -> Session {
		Session::default()
	}
}

/// A builtin only intercepts a single-command pipeline.
pub fn matches(pipeline: &Pipeline) -> bool {
	pipeline.commands.len() == 1
		&& pipeline.commands[0].args.first().map(String::as_str) == Some("cd")
}

/// The `cd` builtin. Runs in-process, never spawns, never sees a pipe.
///
/// `cd -` returns to the recorded previous directory and prints it (a
/// silent no-op when nothing is recorded yet). `cd` alone goes to $HOME.
/// Every successful change records the directory that was current before
/// it, so consecutive `cd -` invocations toggle between two places. On
/// failure the session state is left untouched.
pub fn cd(session: &mut Session, command: &Command) -> Result<(), Error> {
	let current = env::current_dir()
		.map_err(|source| Error::ChangeDir { path: PathBuf::from("."), source })?;
	match command.args.get(1).map(String::as_str) {
		Some("-") => {
			let Some(prev) = session.prev_dir.clone() else {
				return Ok(());
			};
			change_to(&prev)?;
			println!("{}", prev.display());
		},
		Some(path) => change_to(&PathBuf::from(path))?,
		None => {
			let home = env::var_os("HOME").ok_or(Error::NoHome)?;
			change_to(&PathBuf::from(home))?;
		},
	}
	session.prev_dir = Some(current);
	Ok(())
}

fn change_to(path: &PathBuf) -> Result<(), Error> {
	env::set_current_dir(path)
		.map_err(|source| Error::ChangeDir { path: path.clone(), source })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::parser;

	#[test]
	fn matches_only_single_cd() {
		assert!(matches(&parser::parse("cd /tmp").unwrap()));
		assert!(matches(&parser::parse("cd").unwrap()));
		assert!(!matches(&parser::parse("echo cd").unwrap()));
		assert!(!matches(&parser::parse("cd /tmp | cat").unwrap()));
	}
}
