use thiserror::Error;

use crate::types::{Command, Pipeline};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
	#[error("empty command")]
	EmptyCommand,
	#[error("missing redirect target")]
	MissingRedirectTarget,
	#[error("unterminated quote")]
	UnterminatedQuote,
	#[error("unexpected characters after '&'")]
	TrailingAfterBackground,
	#[error("unexpected character: '{0}'")]
	UnexpectedChar(char),
}

struct Parser<'a> {
	line: &'a str,
	i: usize,
}

impl<'a> Parser<'a> {
	fn peek(&self) -> Option<u8> {
		self.line.as_bytes().get(self.i).copied()
	}

	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.peek() {
			if !f(c) { break; }
			self.i += 1;
		}
	}

	fn is_whitespace(c: u8) -> bool {
		matches!(c, b' ' | b'\t' | b'\n')
	}

	fn is_letter(c: u8) -> bool {
		match c {
			b'>' | b'<' | b'&' | b'|' | b'"' | b'\'' => false,
			_ => !Parser::is_whitespace(c),
		}
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(Parser::is_whitespace);
	}

	// A word is a run of plain letters and quoted spans, e.g. abc"d e"f.
	// Quotes are stripped; delimiters are all ASCII so slicing is safe.
	fn read_word(&mut self) -> Result<Option<String>, ParseError> {
		let mut word = String::new();
		let mut seen = false;
		loop {
			match self.peek() {
				Some(q @ (b'"' | b'\'')) => {
					seen = true;
					self.i += 1;
					let orig = self.i;
					self.proceed_while(|c| c != q);
					if self.peek().is_none() {
						return Err(ParseError::UnterminatedQuote);
					}
					word.push_str(&self.line[orig .. self.i]);
					self.i += 1;
				},
				Some(c) if Parser::is_letter(c) => {
					seen = true;
					let orig = self.i;
					self.proceed_while(Parser::is_letter);
					word.push_str(&self.line[orig .. self.i]);
				},
				_ => break,
			}
		}
		Ok(if seen { Some(word) } else { None })
	}

	fn read_redirect_target(&mut self) -> Result<String, ParseError> {
		self.skip_whitespaces();
		self.read_word()?.ok_or(ParseError::MissingRedirectTarget)
	}

	fn parse_command(&mut self) -> Result<Command, ParseError> {
		let mut command = Command::default();
		loop {
			self.skip_whitespaces();
			match self.peek() {
				Some(b'<') => {
					self.i += 1;
					command.in_file = Some(self.read_redirect_target()?);
				},
				Some(b'>') => {
					self.i += 1;
					command.out_file = Some(self.read_redirect_target()?);
				},
				_ => match self.read_word()? {
					Some(word) => command.args.push(word),
					None => break,
				},
			}
		}
		if command.args.is_empty() {
			return Err(ParseError::EmptyCommand);
		}
		Ok(command)
	}

	fn parse_pipeline(&mut self) -> Result<Pipeline, ParseError> {
		let mut commands: Vec<Command> = vec![];
		loop {
			commands.push(self.parse_command()?);
			match self.peek() {
				Some(b'|') => { self.i += 1; },
				Some(b'&') => {
					self.i += 1;
					self.skip_whitespaces();
					if self.peek().is_some() {
						return Err(ParseError::TrailingAfterBackground);
					}
					if let Some(last) = commands.last_mut() {
						last.background = true;
					}
					break;
				},
				Some(c) => { return Err(ParseError::UnexpectedChar(c as char)); },
				None => { break; },
			}
		}
		Ok(Pipeline { commands })
	}
}

pub fn parse(line: &str) -> Result<Pipeline, ParseError> {
	let mut parser = Parser { line, i: 0 };
	parser.parse_pipeline()
}
