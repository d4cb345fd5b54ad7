//! Builder for executing external tool commands.
//!
//! Commands run synchronously; callers on an async runtime run them on the
//! blocking pool. [`ToolCommand::stream`] connects a reader to the child's
//! stdin and the child's stdout to a writer without buffering whole files.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use crate::error::{Error, Result};

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use vv_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # fn example() -> vv_av::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffmpeg"))
///     .arg("-i").arg("in.mkv")
///     .args(["-vcodec", "h264", "out.mp4"])
///     .execute()?;
/// println!("{}", output.stderr);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ToolFailed`] if spawning fails or the process exits
    /// with a non-zero status (message includes stderr).
    pub fn execute(&self) -> Result<ToolOutput> {
        let name = self.program_name();
        tracing::debug!(tool = %name, args = ?self.args, "running tool");

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::tool_failed(&name, format!("failed to spawn: {e}")))?;

        let tool_output = ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            return Err(Error::tool_failed(
                name,
                format!(
                    "exited with status {}: {}",
                    output.status,
                    tool_output.stderr.trim()
                ),
            ));
        }

        Ok(tool_output)
    }

    /// Run the command with `input` fed to its stdin and its stdout copied
    /// into `output`. Returns the number of bytes written to `output`.
    ///
    /// The child closing its stdin early is not an error; only the exit
    /// status decides success.
    pub fn stream(&self, input: &mut (dyn Read + Send), output: &mut dyn Write) -> Result<u64> {
        let name = self.program_name();
        tracing::debug!(tool = %name, args = ?self.args, "streaming through tool");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::tool_failed(&name, format!("failed to spawn: {e}")))?;

        let (Some(mut stdin), Some(stdout), Some(mut stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::tool_failed(&name, "child pipes unavailable"));
        };

        let (copied, fed, stderr_text) = thread::scope(|s| {
            let feeder = s.spawn(move || {
                let result = io::copy(input, &mut stdin);
                drop(stdin);
                result
            });
            let drain = s.spawn(move || {
                let mut buf = Vec::new();
                let _ = stderr.read_to_end(&mut buf);
                String::from_utf8_lossy(&buf).to_string()
            });

            // Dropping stdout on a failed copy lets a blocked child exit.
            let copied = {
                let mut stdout = stdout;
                io::copy(&mut stdout, output)
            };

            let fed = feeder
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin feeder panicked")));
            let stderr_text = drain.join().unwrap_or_default();
            (copied, fed, stderr_text)
        });

        let status = child
            .wait()
            .map_err(|e| Error::tool_failed(&name, format!("I/O error waiting for process: {e}")))?;

        if !status.success() {
            return Err(Error::tool_failed(
                name,
                format!("exited with status {status}: {}", stderr_text.trim()),
            ));
        }

        let copied = copied
            .map_err(|e| Error::tool_failed(&name, format!("failed to copy stdout: {e}")))?;

        match fed {
            Err(e) if e.kind() != io::ErrorKind::BrokenPipe => Err(Error::tool_failed(
                name,
                format!("failed to feed stdin: {e}"),
            )),
            _ => Ok(copied),
        }
    }
}
