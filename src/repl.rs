//! Interactive loop with readline support
//!
//! - Command history, persisted to `~/.sledge_history`
//! - Multi-line input: a line with unclosed lists keeps reading
//! - Every complete expression is compiled and run in one session

use crate::error::{Error, ReadError};
use crate::reader::Reader;
use crate::session::Session;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RustylineResult};
use std::path::PathBuf;

const HISTORY_FILE: &str = ".sledge_history";
const PROMPT: &str = "> ";
const CONTINUE_PROMPT: &str = ". ";

pub struct Repl {
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> RustylineResult<Self> {
        let mut editor = DefaultEditor::new()?;
        let _ = editor.load_history(&Self::history_file_path());
        Ok(Self { editor })
    }

    fn history_file_path() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(HISTORY_FILE),
            None => PathBuf::from(HISTORY_FILE),
        }
    }

    /// Read one complete chunk of input, possibly spanning several lines.
    /// `None` at end of input.
    fn read_chunk(&mut self) -> RustylineResult<Option<String>> {
        let mut chunk = String::new();
        loop {
            let prompt = if chunk.is_empty() { PROMPT } else { CONTINUE_PROMPT };
            match self.editor.readline(prompt) {
                Ok(line) => {
                    chunk.push_str(&line);
                    chunk.push('\n');
                    if !needs_more_input(&chunk) {
                        let _ = self.editor.add_history_entry(chunk.trim_end());
                        return Ok(Some(chunk));
                    }
                }
                Err(ReadlineError::Interrupted) => chunk.clear(),
                Err(ReadlineError::Eof) => return Ok(None),
                Err(err) => return Err(err),
            }
        }
    }

    /// Run until end of input, printing the value of every expression.
    pub fn run(&mut self, session: &Session) -> RustylineResult<()> {
        while let Some(chunk) = self.read_chunk()? {
            let trimmed = chunk.trim();
            if trimmed == "(exit)" || trimmed == "exit" {
                break;
            }
            match session.eval_str(&chunk) {
                Ok(Some(value)) => println!("{}", value),
                Ok(None) => {}
                Err(Error::Read(err)) => eprintln!("read error: {}", err),
                Err(Error::Compile(err)) => eprintln!("compile error: {}", err),
            }
        }
        let _ = self.editor.save_history(&Self::history_file_path());
        Ok(())
    }
}

/// Whether `input` stops inside an unfinished list or string.
fn needs_more_input(input: &str) -> bool {
    let mut reader = Reader::new(input);
    loop {
        match reader.try_read() {
            Ok(Some(_)) => continue,
            Ok(None) => return false,
            Err(ReadError::UnterminatedList { .. } | ReadError::UnterminatedString { .. }) => {
                return true
            }
            Err(_) => return false,
        }
    }
}
