use std::process::{Command, Output};

use anyhow::{anyhow, Context, Error};
use log::trace;

use crate::crate_private::Sealed;

/// Builds a readable report of everything a process wrote.
fn output_report(output: &Output) -> String {
    let mut report = String::new();
    for (name, stream) in [("stdout", &output.stdout), ("stderr", &output.stderr)] {
        if stream.is_empty() {
            continue;
        }
        if !report.is_empty() {
            report.push('\n');
        }
        report += &format!("{name}:\n{}\n", String::from_utf8_lossy(stream));
    }
    report
}

/// Explains how a process ended.
fn explain_exit(output: &Output) -> String {
    match output.status.code() {
        Some(code) => format!("process exited with status: {code}"),
        None => "process was terminated by a signal".into(),
    }
}

/// Extension for `std::process::Command` to run a process and turn a failure
/// into an error carrying its output.
///
/// This is a sealed trait, so it cannot be implemented outside of this crate.
pub trait RunAndCheck: Sealed {
    /// Runs the command and fails if it did not exit successfully.
    fn run_and_check(&mut self) -> Result<(), Error>;

    /// Runs the command and returns its stdout, failing if it did not exit
    /// successfully.
    fn output_and_check(&mut self) -> Result<String, Error>;

    /// Runs the command and returns whether it exited successfully. Only a
    /// failure to spawn the process is an error.
    fn succeeds(&mut self) -> Result<bool, Error>;

    /// Renders the command line for logging.
    fn render_command(&self) -> String;
}

impl Sealed for Command {}

impl RunAndCheck for Command {
    fn run_and_check(&mut self) -> Result<(), Error> {
        self.output_and_check().map(|_| ())
    }

    fn output_and_check(&mut self) -> Result<String, Error> {
        let rendered_command = self.render_command();
        let output = execute(self)?;
        if !output.status.success() {
            let report = match output_report(&output) {
                r if r.is_empty() => "(No output was captured)".into(),
                r => format!("Process output:\n{r}"),
            };
            return Err(anyhow!(report)
                .context(explain_exit(&output))
                .context(format!("Error when running: {rendered_command}")));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into())
    }

    fn succeeds(&mut self) -> Result<bool, Error> {
        Ok(execute(self)?.status.success())
    }

    fn render_command(&self) -> String {
        std::iter::once(self.get_program().to_string_lossy())
            .chain(self.get_args().map(|arg| arg.to_string_lossy()))
            .map(|arg| {
                if arg.contains(' ') {
                    format!("'{arg}'")
                } else {
                    arg.into()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn execute(command: &mut Command) -> Result<Output, Error> {
    let rendered_command = command.render_command();
    trace!("Executing '{rendered_command}'");
    let output = command
        .output()
        .with_context(|| format!("Failed to execute: {rendered_command}"))?;
    trace!(
        "Executed '{rendered_command}': {}. Report:\n{}",
        explain_exit(&output),
        output_report(&output)
    );
    Ok(output)
}
