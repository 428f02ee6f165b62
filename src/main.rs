mod builtin;
mod error;
mod exec;
mod job;
mod parser;
mod pipes;
mod types;

use std::env;
use std::io::{self, BufRead, Write};

use chrono::Local;

fn prompt() -> String {
	let user = env::var("USER").unwrap_or_else(|_| "root".to_string());
	let cwd = env::current_dir()
		.map(|p| p.display().to_string())
		.unwrap_or_else(|_| "?".to_string());
	format!("{} {}:{}$ ", Local::now().format("%b %d %H:%M:%S"), user, cwd)
}

fn main() {
	let reaper = job::Reaper::spawn();
	let mut session = builtin::Session::new();
	let stdin = io::stdin();
	let mut stdin = stdin.lock();
	let mut stdout = io::stdout();
	loop {
		let _ = write!(stdout, "{}", prompt());
		let _ = stdout.flush();

		let mut line = String::new();
		match stdin.read_line(&mut line) {
			Ok(0) => {
				println!();
				break;
			},
			Ok(_) => {},
			Err(e) => {
				eprintln!("psh: {}", e);
				break;
			},
		}
		let line = line.trim();
		if line.is_empty() {
			continue;
		}
		if line == "exit" {
			println!("Now exiting shell...");
			println!("Goodbye");
			break;
		}

		let pipeline = match parser::parse(line) {
			Ok(pipeline) => pipeline,
			Err(e) => {
				eprintln!("psh: {}", e);
				continue;
			},
		};

		if builtin::matches(&pipeline) {
			if let Err(e) = builtin::cd(&mut session, &pipeline.commands[0]) {
				eprintln!("psh: {}", e);
			}
			continue;
		}

		match exec::run_pipeline(&pipeline) {
			Ok(pids) => {
				if pipeline.background() {
					reaper.adopt(pids);
				} else {
					job::wait_foreground(&pids);
				}
			},
			Err(e) => eprintln!("psh: {}", e),
		}
	}
}
