//! Execution strategies for the linker tool.
//!
//! Two transports, one contract: stdout/stderr are captured separately, the
//! run blocks until the tool finishes, and both strategies funnel through
//! the same completion path so failures always carry the exit code, stderr,
//! and the attempted command line.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::LinkError;
use crate::provider::{LinkerTool, ToolProviderRegistry};
use crate::toolchain::{locate_jlink, Toolchain, JLINK_TOOL};

/// Captured result of one tool run.
#[derive(Debug)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// One linker invocation seam; strategies differ in transport only.
pub trait ImageLinker {
    /// Identity for logs and failure messages.
    fn describe(&self) -> String;

    /// Where this strategy expects the JDK's jmods folder, if anywhere.
    fn jmods_folder(&self, source_jdk_modules: Option<&Path>) -> Option<PathBuf>;

    /// Run the tool to completion under the shared success contract.
    fn run(&self, args: &[String]) -> Result<ToolOutput, LinkError>;
}

/// Strategy selection, resolved once at startup: a registered in-process
/// tool wins, otherwise the toolchain's executable is forked.
pub fn select_linker<'a>(
    registry: &'a ToolProviderRegistry,
    toolchain: &Toolchain,
) -> Result<Box<dyn ImageLinker + 'a>, LinkError> {
    if let Some(tool) = registry.find_first(JLINK_TOOL) {
        return Ok(Box::new(InProcessJlink::new(tool)));
    }
    let executable = locate_jlink(toolchain)?;
    Ok(Box::new(ForkedJlink::new(executable)))
}

/// Out-of-process strategy: hand the quoted invocation to the platform
/// shell as one opaque string.
pub struct ForkedJlink {
    executable: PathBuf,
}

impl ForkedJlink {
    pub fn new(executable: PathBuf) -> Self {
        Self { executable }
    }
}

impl ImageLinker for ForkedJlink {
    fn describe(&self) -> String {
        self.executable.display().to_string()
    }

    fn jmods_folder(&self, source_jdk_modules: Option<&Path>) -> Option<PathBuf> {
        if let Some(source) = source_jdk_modules {
            if source.is_dir() {
                return Some(source.join("jmods"));
            }
        }
        // Conventional JDK layout: <jdk>/bin/jlink next to <jdk>/jmods.
        self.executable
            .parent()
            .and_then(Path::parent)
            .map(|jdk| jdk.join("jmods"))
    }

    fn run(&self, args: &[String]) -> Result<ToolOutput, LinkError> {
        let command_line = shell_command_line(&self.executable, args);
        let output = shell(&command_line)
            .output()
            .map_err(LinkError::ToolInvocationError)?;
        complete(
            &command_line,
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout).into_owned(),
            String::from_utf8_lossy(&output.stderr).into_owned(),
        )
    }
}

/// In-process strategy: drive a registered tool with the true argument
/// array, capturing through in-memory sinks.
pub struct InProcessJlink<'a> {
    tool: &'a dyn LinkerTool,
}

impl<'a> InProcessJlink<'a> {
    pub fn new(tool: &'a dyn LinkerTool) -> Self {
        Self { tool }
    }
}

impl ImageLinker for InProcessJlink<'_> {
    fn describe(&self) -> String {
        format!("in-process {}", self.tool.name())
    }

    fn jmods_folder(&self, source_jdk_modules: Option<&Path>) -> Option<PathBuf> {
        // An in-process tool gives no handle on its own JDK installation;
        // only an explicit source JDK helps here.
        let source = source_jdk_modules?;
        source.is_dir().then(|| source.join("jmods"))
    }

    fn run(&self, args: &[String]) -> Result<ToolOutput, LinkError> {
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();
        let exit_code = self.tool.run(&mut out, &mut err, args);

        let command_line = format!("{} {}", self.tool.name(), args.join(" "));
        complete(
            &command_line,
            exit_code,
            String::from_utf8_lossy(&out).into_owned(),
            String::from_utf8_lossy(&err).into_owned(),
        )
    }
}

/// Quote every argument and join into a single shell string. jlink
/// historically mis-parses argv arrays with embedded separators, so the
/// forked strategy always goes through this form.
pub fn shell_command_line(executable: &Path, args: &[String]) -> String {
    let mut line = executable.display().to_string();
    for arg in args {
        line.push(' ');
        line.push('"');
        line.push_str(arg);
        line.push('"');
    }
    line
}

#[cfg(not(windows))]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command_line);
    cmd
}

#[cfg(windows)]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd.exe");
    cmd.arg("/c").arg(command_line);
    cmd
}

/// Shared completion contract. Exit 0: replay stdout at info level and hand
/// the output back. Anything else: replay stdout at error level and fail
/// with a message carrying exit code, stderr, and the command line.
fn complete(
    command_line: &str,
    exit_code: i32,
    stdout: String,
    stderr: String,
) -> Result<ToolOutput, LinkError> {
    if exit_code == 0 {
        for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
            println!("  {line}");
        }
        return Ok(ToolOutput {
            exit_code,
            stdout,
            stderr,
        });
    }

    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        eprintln!("[ERROR] {line}");
    }
    let mut message = format!("\nExit code: {exit_code}");
    let stderr_trimmed = stderr.trim();
    if !stderr_trimmed.is_empty() {
        message.push_str(" - ");
        message.push_str(stderr_trimmed);
    }
    message.push('\n');
    message.push_str(&format!("Command line was: {command_line}\n\n"));

    Err(LinkError::ToolExecutionFailed { exit_code, message })
}
