/// One parsed command: argv plus its redirections and background marker.
///
/// `args` is never empty for commands produced by the parser; the first
/// element is the program name. `background` is only meaningful on the
/// last command of a pipeline.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Command {
	pub args: Vec<String>,
	pub in_file: Option<String>,
	pub out_file: Option<String>,
	pub background: bool,
}

/// A non-empty sequence of commands, command[i] piped into command[i+1].
#[derive(Debug, PartialEq, Eq)]
pub struct Pipeline {
	pub commands: Vec<Command>,
}

impl Pipeline {
	pub fn background(&self) -> bool {
		// the marker only counts on the last command
		self.commands.last().map_or(false, |c| c.background)
	}
}
