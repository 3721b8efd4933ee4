// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Line-oriented command interpreter driving a [`ChainedHashSet`].
//!
//! Each script line holds a command followed by space-separated arguments. The command is
//! applied to every argument in turn:
//!
//! | command           | effect                                                         |
//! |-------------------|----------------------------------------------------------------|
//! | `resize N...`     | resize the table to `N` buckets                                |
//! | `load FILE...`    | insert every line of `FILE`                                    |
//! | `put W...`        | insert `W`                                                     |
//! | `find W...`       | print `W: found I` or `W: not found`                           |
//! | `erase W...`      | remove `W`                                                     |
//! | `check W...`      | print `misspelled:` followed by every absent `W`               |
//! | `hash_code NAME`  | switch the hash code strategy                                  |
//! | `print`           | dump every bucket                                              |
//! | `stats`           | print collision statistics                                     |
//! | `rehash`          | re-place all keys without changing the bucket count            |
//!
//! Unknown commands are skipped. Failures of a single command are logged and the script
//! continues; only failures to write output abort a run.
//!
//! # Usage
//!
//! ```rust
//! # use chainset::interpreter::{Interpreter, InterpreterConfig};
//! let config = InterpreterConfig::default().with_echo(false);
//! let mut interpreter = Interpreter::new(Vec::new(), config);
//! interpreter.run_script("resize 7\nput Cat\nfind cat\n".as_bytes()).unwrap();
//!
//! let output = String::from_utf8(interpreter.into_output()).unwrap();
//! assert_eq!(output, "cat: found 5\n");
//! ```

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::PathBuf;

use log::debug;
use log::warn;

use crate::error::Error;
use crate::error::ErrorKind;
use crate::error::Result;
use crate::table::ChainedHashSet;

/// Characters trimmed from the end of every token.
const TRAILING_WHITESPACE: [char; 4] = [' ', '\n', '\r', '\t'];

/// Commands understood by the [`Interpreter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `resize N...`
    Resize,
    /// `load FILE...`
    Load,
    /// `put W...`
    Put,
    /// `find W...`
    Find,
    /// `erase W...`
    Erase,
    /// `check W...`
    Check,
    /// `hash_code NAME`
    HashCode,
    /// `print`
    Print,
    /// `stats`
    Stats,
    /// `rehash`
    Rehash,
}

impl Command {
    /// Parses an already lowercased command token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "resize" => Some(Command::Resize),
            "load" => Some(Command::Load),
            "put" => Some(Command::Put),
            "find" => Some(Command::Find),
            "erase" => Some(Command::Erase),
            "check" => Some(Command::Check),
            "hash_code" => Some(Command::HashCode),
            "print" => Some(Command::Print),
            "stats" => Some(Command::Stats),
            "rehash" => Some(Command::Rehash),
            _ => None,
        }
    }
}

/// Settings of an [`Interpreter`].
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    base_dir: PathBuf,
    echo: bool,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            echo: true,
        }
    }
}

impl InterpreterConfig {
    /// Directory that relative `load` paths are resolved against.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Whether every script line is written to the output before it runs.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

/// Runs command scripts against a table, writing results to `out`.
pub struct Interpreter<W: Write> {
    table: ChainedHashSet,
    config: InterpreterConfig,
    out: W,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter over a fresh, unsized table.
    pub fn new(out: W, config: InterpreterConfig) -> Self {
        Self::with_table(ChainedHashSet::new(), out, config)
    }

    /// Creates an interpreter over an existing table.
    pub fn with_table(table: ChainedHashSet, out: W, config: InterpreterConfig) -> Self {
        Self { table, config, out }
    }

    /// The table the script operates on.
    pub fn table(&self) -> &ChainedHashSet {
        &self.table
    }

    /// The output sink.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes the interpreter, returning the output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Executes every `\n`-separated line of `script` in order.
    ///
    /// Lines are not required to be UTF-8; invalid sequences become U+FFFD.
    pub fn run_script<R: BufRead>(&mut self, script: R) -> Result<()> {
        for line in script.split(b'\n') {
            let line = line.map_err(|err| {
                Error::new(ErrorKind::Io, "failed to read script line").set_source(err)
            })?;
            let line = String::from_utf8_lossy(&line);
            self.execute_line(line.strip_suffix('\r').unwrap_or(&line))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Executes a single script line.
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        if self.config.echo {
            writeln!(self.out, "{line}")?;
        }

        let mut tokens = line
            .split(' ')
            .map(|token| token.trim_end_matches(TRAILING_WHITESPACE))
            .filter(|token| !token.is_empty());

        let Some(name) = tokens.next() else {
            return Ok(());
        };
        let name = name.to_ascii_lowercase();
        let Some(command) = Command::from_token(&name) else {
            debug!("skipping unknown command {name:?}");
            return Ok(());
        };

        if command == Command::Check {
            write!(self.out, "misspelled:")?;
        }

        for token in tokens {
            self.apply(command, token)?;
        }

        match command {
            Command::Print => write!(self.out, "{}", self.table)?,
            Command::Stats => {
                if let Some(stats) = report(command, self.table.statistics()) {
                    write!(self.out, "{stats}")?;
                }
            }
            Command::Rehash => {
                report(command, self.table.rehash());
            }
            Command::Check => writeln!(self.out)?,
            _ => {}
        }
        Ok(())
    }

    fn apply(&mut self, command: Command, token: &str) -> Result<()> {
        match command {
            Command::Resize => match token.parse::<usize>() {
                Ok(size) => {
                    report(command, self.table.resize(size));
                }
                Err(err) => warn!("resize: ignoring malformed bucket count {token:?}: {err}"),
            },
            Command::Load => self.load_file(token)?,
            Command::Put => {
                report(command, self.table.put(&token.to_ascii_lowercase()));
            }
            Command::Find => {
                let word = token.to_ascii_lowercase();
                match report(command, self.table.find(&word)) {
                    Some(Some(index)) => writeln!(self.out, "{word}: found {index}")?,
                    Some(None) => writeln!(self.out, "{word}: not found")?,
                    None => {}
                }
            }
            Command::Erase => {
                report(command, self.table.erase(&token.to_ascii_lowercase()));
            }
            Command::Check => {
                let word = token.to_ascii_lowercase();
                if let Some(false) = report(command, self.table.contains(&word)) {
                    write!(self.out, "\t{word}")?;
                }
            }
            Command::HashCode => {
                self.table.set_strategy_by_name(&token.to_ascii_lowercase());
            }
            // these take no arguments
            Command::Print | Command::Stats | Command::Rehash => {}
        }
        Ok(())
    }

    fn load_file(&mut self, name: &str) -> Result<()> {
        let path = self.config.base_dir.join(name);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                warn!("cannot open {}: {err}", path.display());
                writeln!(self.out, "Cannot open file {name}")?;
                return Ok(());
            }
        };
        debug!("loading words from {}", path.display());
        report(Command::Load, self.table.load_reader(BufReader::new(file)));
        Ok(())
    }
}

/// Logs a failed table operation and turns it into `None`.
fn report<T>(command: Command, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{command:?} failed: {err}");
            None
        }
    }
}
