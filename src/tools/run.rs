//! Build/test command steps that stream into the report.

use crate::config::CommandSpec;
use crate::error::Result;
use crate::report::ReportSink;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;

/// Run `command` with `args` in place of its configured arguments, echoing
/// the command line and its output to `report`.
///
/// Returns `Ok(false)` when the command could not be started or exited
/// unsuccessfully; the reason is written to the report. Errors are report
/// write failures.
pub fn run_command(report: &ReportSink, command: &CommandSpec, args: &[String]) -> Result<bool> {
    let line = command.display_with(args);
    report.write_str(&format!("$ {}\n", line))?;

    let mut process = Command::new(&command.program);
    process.args(args);
    execute(report, process, &line)
}

/// Run `cmd` through `<shell> -c`, echoing it and its output to `report`.
pub fn run_shell(report: &ReportSink, shell: &str, cmd: &str) -> Result<bool> {
    report.write_str(&format!("$ {}\n", cmd))?;

    let mut command = Command::new(shell);
    command.arg("-c").arg(cmd);
    execute(report, command, cmd)
}

fn execute(report: &ReportSink, mut command: Command, label: &str) -> Result<bool> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let status = match command.spawn() {
        Ok(mut child) => {
            pump_output(report, &mut child)?;
            child.wait()
        }
        Err(e) => Err(e),
    };

    match status {
        Ok(status) if status.success() => Ok(true),
        Ok(status) => {
            report.write_str(&format!("{}: {}\n", label, status))?;
            Ok(false)
        }
        Err(e) => {
            report.write_str(&format!("{}: {}\n", label, e))?;
            Ok(false)
        }
    }
}

/// Copy the child's stdout and stderr into the report as they arrive.
fn pump_output(report: &ReportSink, child: &mut Child) -> Result<()> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    thread::scope(|scope| {
        let out = scope.spawn(move || stdout.map_or(Ok(()), |s| pump(report, s)));
        let err = scope.spawn(move || stderr.map_or(Ok(()), |s| pump(report, s)));
        let out = out.join().unwrap_or(Ok(()));
        let err = err.join().unwrap_or(Ok(()));
        out.and(err)
    })
}

fn pump(report: &ReportSink, mut source: impl Read) -> Result<()> {
    let mut buf = [0u8; 8192];
    loop {
        match source.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => {
                report.write_bytes(&buf[..n])?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("lost command output: {}", e);
                return Ok(());
            }
        }
    }
}
