//! Piping entry content through an external command.
//!
//! [`CommandLine`] tokenizes a configured command string once per invocation;
//! [`CommandLine::pipe`] then runs the command for one entry, feeding the
//! entry's bytes to its standard input and capturing its standard output as
//! the replacement content.
//!
//! The input copy runs on its own thread, concurrently with draining the
//! command's output. Both the entry content and the command's output may
//! exceed the OS pipe buffer; copying input and reading output on one
//! sequential path can deadlock with the writer blocked on a full pipe while
//! nothing drains the other end.
//!
//! Standard error is inherited from the invoking process so command
//! diagnostics stay visible to the operator.

use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread;

use crate::{Error, Result};

/// A tokenized external command.
///
/// Built once from the configured command string and reused for every
/// matching entry of every archive in a run.
#[derive(Debug, Clone)]
pub struct CommandLine {
    display: String,
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Parses a command string into an argument vector.
    ///
    /// Uses shell-word tokenization, so quoting is supported:
    /// `sed 's/foo bar/baz/'` yields two arguments. An empty or untokenizable
    /// string is a configuration-time [`Error::CommandSyntax`].
    pub fn parse(command: &str) -> Result<Self> {
        let words =
            shlex::split(command).ok_or_else(|| Error::CommandSyntax(command.to_string()))?;
        let mut words = words.into_iter();
        let program = words
            .next()
            .ok_or_else(|| Error::CommandSyntax(command.to_string()))?;

        Ok(Self {
            display: command.to_string(),
            program,
            args: words.collect(),
        })
    }

    /// Returns the original command string, for diagnostics.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Returns the program name (the first token).
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments following the program name.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Runs the command, feeding it `input` and returning its captured
    /// standard output.
    ///
    /// A non-zero exit status or a spawn failure is an error; the caller
    /// discards the whole in-memory mutation for the affected file.
    pub fn pipe(&self, input: Vec<u8>) -> Result<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| Error::CommandSpawn {
                command: self.display.clone(),
                source,
            })?;

        // Both handles exist: we just asked for piped stdio.
        let mut stdin = child.stdin.take().expect("child stdin is piped");
        let mut stdout = child.stdout.take().expect("child stdout is piped");

        // Feed input on a separate thread while this one drains stdout.
        // Dropping stdin at the end of the closure signals end-of-input.
        let writer = thread::spawn(move || -> io::Result<()> {
            match stdin.write_all(&input) {
                // The command may legitimately exit without consuming all of
                // its input; its exit status decides success.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        });

        let mut output = Vec::new();
        let read_result = stdout.read_to_end(&mut output);
        let status = child.wait();

        match writer.join() {
            Ok(result) => result?,
            Err(panic) => std::panic::resume_unwind(panic),
        }
        read_result?;

        let status = status?;
        if !status.success() {
            return Err(Error::CommandFailed {
                command: self.display.clone(),
                status,
            });
        }

        Ok(output)
    }
}
