//! An external compiler that lives in another process.
//!
//! Each call spawns the configured program, writes one JSON request to its
//! stdin and reads one JSON reply from its stdout:
//!
//! ```text
//! -> {"source": "x = 1", "options": {"filename": "a.coffee", "bare": true}}
//! <- {"output": "var x = 1;"}
//! <- {"error": {"message": "unexpected end of input", "line": 1, "column": 5}}
//! ```
//!
//! Keys other than `output` and `error` are ignored. A child that exits
//! non-zero without a usable reply is reported with its stderr as the message.

use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::{ExternalCompileError, Location};
use crate::external::{ExternalCompiler, ExternalOptions};

#[derive(Debug, Serialize)]
struct Request<'a> {
    source: &'a str,
    options: &'a ExternalOptions<'a>,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    error: Option<ReplyError>,
}

#[derive(Debug, Deserialize)]
struct ReplyError {
    message: String,
    line: Option<u32>,
    column: Option<u32>,
}

impl From<ReplyError> for ExternalCompileError {
    fn from(e: ReplyError) -> Self {
        let location = match (e.line, e.column) {
            (Some(line), column) => Some(Location {
                line,
                column: column.unwrap_or(0),
            }),
            _ => None,
        };
        ExternalCompileError {
            message: e.message,
            location,
        }
    }
}

/// Program plus arguments used to run an out-of-process compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Runs a compiler program per call using the JSON stdio contract.
///
/// Every call gets its own child process, so one `ProcessCompiler` can be
/// used from many threads at once.
#[derive(Debug, Clone)]
pub struct ProcessCompiler {
    command: CommandSpec,
}

impl ProcessCompiler {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            command: CommandSpec {
                program: program.into(),
                args: Vec::new(),
            },
        }
    }

    /// Append an argument passed to the program on every call.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.command.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn command(&self) -> &CommandSpec {
        &self.command
    }

    fn run(&self, request: &[u8]) -> std::io::Result<std::process::Output> {
        let mut child = Command::new(&self.command.program)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin from another thread so a chatty child cannot fill its
        // stdout pipe while we are still writing.
        let stdin = child.stdin.take();
        std::thread::scope(|scope| -> std::io::Result<std::process::Output> {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => match stdin.write_all(request) {
                    // The child may exit without reading everything; its
                    // reply and status are still inspected.
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                    other => other,
                },
                None => Ok(()),
            });
            let output = child.wait_with_output()?;
            writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")))?;
            Ok(output)
        })
    }
}

impl From<CommandSpec> for ProcessCompiler {
    fn from(command: CommandSpec) -> Self {
        Self { command }
    }
}

impl ExternalCompiler for ProcessCompiler {
    fn compile(
        &self,
        source: &str,
        options: &ExternalOptions<'_>,
    ) -> Result<String, ExternalCompileError> {
        let program = self.command.program.display().to_string();
        let request = serde_json::to_vec(&Request { source, options })
            .map_err(|e| ExternalCompileError::new(format!("failed to encode request: {}", e)))?;

        tracing::debug!(program = %program, filename = options.filename, bare = options.bare, "spawning compiler");

        let output = self.run(&request).map_err(|e| {
            ExternalCompileError::new(format!("failed to run `{}`: {}", program, e))
        })?;

        let reason = match serde_json::from_slice::<Reply>(&output.stdout) {
            Ok(Reply { error: Some(e), .. }) => return Err(e.into()),
            Ok(Reply { output: Some(text), .. }) => return Ok(text),
            Ok(_) => "reply has neither output nor error".to_string(),
            Err(e) => e.to_string(),
        };

        if !output.status.success() {
            tracing::debug!(program = %program, status = %output.status, "compiler exited unsuccessfully");
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", program, output.status)
            } else {
                stderr.to_string()
            };
            return Err(ExternalCompileError::new(message));
        }

        Err(ExternalCompileError::new(format!(
            "invalid reply from `{}`: {}",
            program, reason
        )))
    }
}
