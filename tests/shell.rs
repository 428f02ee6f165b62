use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

fn shell() -> Command {
	Command::new(env!("CARGO_BIN_EXE_psh"))
}

fn run_with(mut cmd: Command, input: &str) -> Output {
	let mut child = cmd
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("spawn shell");
	child
		.stdin
		.take()
		.unwrap()
		.write_all(input.as_bytes())
		.unwrap();
	child.wait_with_output().expect("collect shell output")
}

fn run(input: &str) -> Output {
	run_with(shell(), input)
}

fn stdout(out: &Output) -> String {
	String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
	String::from_utf8_lossy(&out.stderr).into_owned()
}

fn temp_dir(tag: &str) -> PathBuf {
	let dir = env::temp_dir().join(format!("psh-{}-{}", tag, std::process::id()));
	fs::create_dir_all(&dir).unwrap();
	fs::canonicalize(&dir).unwrap()
}

#[test]
fn exit_prints_farewell() {
	let out = run("exit\n");
	assert!(out.status.success());
	assert!(stdout(&out).contains("Goodbye"));
}

#[test]
fn eof_terminates_cleanly() {
	let out = run("");
	assert!(out.status.success());
}

#[test]
fn empty_lines_are_ignored() {
	let out = run("\n   \nexit\n");
	assert!(out.status.success());
	assert!(stdout(&out).contains("Goodbye"));
}

#[test]
fn pipeline_connects_producer_to_consumer() {
	let out = run("echo qzv-pipeline-token | grep qzv\nexit\n");
	assert!(out.status.success());
	assert!(stdout(&out).contains("qzv-pipeline-token"));
}

#[test]
fn output_redirection_creates_and_truncates() {
	let dir = temp_dir("redir-out");
	let target = dir.join("out.txt");
	fs::write(&target, "stale contents that must vanish").unwrap();
	let out = run(&format!("echo redirected > {}\nexit\n", target.display()));
	assert!(out.status.success());
	assert_eq!(fs::read_to_string(&target).unwrap(), "redirected\n");
	fs::remove_dir_all(&dir).ok();
}

#[test]
fn input_redirection_feeds_the_pipe_consumer() {
	let dir = temp_dir("redir-in");
	let source = dir.join("words.txt");
	fs::write(&source, "qzv-first\nqzv-second\n").unwrap();
	let out = run(&format!("cat < {} | grep qzv-second\nexit\n", source.display()));
	assert!(out.status.success());
	let text = stdout(&out);
	assert!(text.contains("qzv-second"));
	assert!(!text.contains("qzv-first"));
	fs::remove_dir_all(&dir).ok();
}

#[test]
fn redirection_failure_only_kills_the_child() {
	let out = run("cat < /definitely-missing-psh-file\necho qzv-still-alive\nexit\n");
	assert!(out.status.success());
	assert!(stderr(&out).contains("definitely-missing-psh-file"));
	let text = stdout(&out);
	assert!(text.contains("qzv-still-alive"));
	assert!(text.contains("Goodbye"));
}

#[test]
fn unknown_command_does_not_kill_the_shell() {
	let out = run("definitely-not-a-real-command-qzv\necho qzv-after\nexit\n");
	assert!(out.status.success());
	assert!(stderr(&out).contains("definitely-not-a-real-command-qzv"));
	assert!(stdout(&out).contains("qzv-after"));
}

#[test]
fn cd_dash_toggles_between_directories() {
	let a = temp_dir("cd-a");
	let b = temp_dir("cd-b");
	let mut cmd = shell();
	cmd.current_dir(&a);
	// cd b; cd - (back to a, prints a); cd - (back to b, prints b); pwd
	let out = run_with(cmd, &format!("cd {}\ncd -\ncd -\npwd\nexit\n", b.display()));
	assert!(out.status.success());
	let text = stdout(&out);
	assert!(text.contains(&format!("$ {}\n", a.display())));
	assert!(text.contains(&format!("$ {}\n", b.display())));
	fs::remove_dir_all(&a).ok();
	fs::remove_dir_all(&b).ok();
}

#[test]
fn cd_dash_without_history_is_silent() {
	let out = run("cd -\nexit\n");
	assert!(out.status.success());
	assert_eq!(stderr(&out), "");
}

#[test]
fn cd_to_missing_directory_reports_and_continues() {
	let out = run("cd /definitely/not/here-qzv\necho qzv-after\nexit\n");
	assert!(out.status.success());
	assert!(stderr(&out).contains("cd"));
	assert!(stdout(&out).contains("qzv-after"));
}

#[test]
fn cd_without_home_is_reported() {
	let mut cmd = shell();
	cmd.env_remove("HOME");
	let out = run_with(cmd, "cd\necho qzv-after\nexit\n");
	assert!(out.status.success());
	assert!(stderr(&out).contains("HOME"));
	assert!(stdout(&out).contains("qzv-after"));
}

#[test]
fn background_pipeline_returns_to_prompt() {
	// wait() only reaps the shell itself; reading output to EOF would
	// block on the sleep child holding the inherited stdout pipe
	let mut child = shell()
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("spawn shell");
	child
		.stdin
		.take()
		.unwrap()
		.write_all(b"sleep 2 &\nexit\n")
		.unwrap();
	let start = Instant::now();
	let status = child.wait().expect("wait for shell");
	assert!(status.success());
	assert!(
		start.elapsed() < Duration::from_millis(1500),
		"shell blocked on a background pipeline"
	);
}

#[test]
fn background_exit_leaves_no_zombie() {
	let mut child = shell()
		.stdin(Stdio::piped())
		.stdout(Stdio::piped())
		.stderr(Stdio::piped())
		.spawn()
		.expect("spawn shell");
	let mut stdin = child.stdin.take().unwrap();
	stdin.write_all(b"sleep 0.2 &\n").unwrap();
	stdin.flush().unwrap();

	// past the sleep's exit and several reaper polls
	thread::sleep(Duration::from_secs(1));

	// a zombie would still be listed among the shell's children
	let mut kids = String::new();
	for task in fs::read_dir(format!("/proc/{}/task", child.id())).unwrap() {
		let children = task.unwrap().path().join("children");
		if let Ok(list) = fs::read_to_string(children) {
			kids.push_str(list.trim());
		}
	}
	assert_eq!(kids, "", "unreaped children remain: {kids}");

	stdin.write_all(b"exit\n").unwrap();
	drop(stdin);
	assert!(child.wait().unwrap().success());
}

#[test]
fn parse_error_discards_the_line() {
	let out = run("cat <\necho qzv-after\nexit\n");
	assert!(out.status.success());
	assert!(stderr(&out).contains("redirect"));
	assert!(stdout(&out).contains("qzv-after"));
}
