//! fmtsplice CLI binary
//!
//! Wires the report window, event source and control task together and
//! hands them to a [`fmtsplice::Session`]. Logic lives in the library.

use fmtsplice::buffer::FileBufferHost;
use fmtsplice::cli::EventMode;
use fmtsplice::report::{ConsoleWindow, FileWindow, ReportSink};
use fmtsplice::watch::{run_control, ControlExit, DigestLedger, FsEventSource, LogEventSource};
use fmtsplice::{FmtspliceError, Session};
use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

fn main() -> ExitCode {
    let cli = fmtsplice::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: &fmtsplice::cli::Cli) -> Result<(), FmtspliceError> {
    let config = cli.to_config()?;
    let config = match std::fs::canonicalize(&config.root) {
        Ok(root) => fmtsplice::config::WatchConfig { root, ..config },
        Err(e) => return Err(FmtspliceError::io(&config.root, e)),
    };

    let mut tools = vec![&config.formatter, &config.diff, &config.install];
    if let Some(test) = &config.test {
        tools.push(test);
    }
    fmtsplice::tools::probe_tools(&tools);

    let report = Arc::new(match &cli.report {
        Some(path) => {
            ReportSink::new(FileWindow::create(path).map_err(|e| FmtspliceError::io(path, e))?)
        }
        None => ReportSink::new(ConsoleWindow),
    });
    report.mark_clean()?;

    let ledger = DigestLedger::new();
    let host = Box::new(FileBufferHost::with_ledger(ledger.clone()));
    let root = config.root.clone();
    let session = Session::new(config, Arc::clone(&report), host);

    match cli.events {
        EventMode::Log => {
            let mut source = LogEventSource::new(io::stdin().lock());
            session.run(&mut source)
        }
        EventMode::Watch => {
            let control_report = Arc::clone(&report);
            thread::spawn(move || {
                let commands = io::stdin().lock().lines().map_while(Result::ok);
                match run_control(commands, &control_report) {
                    Ok(ControlExit::Deleted) => std::process::exit(0),
                    Ok(ControlExit::Closed) => {}
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            });
            let mut source = FsEventSource::new(&root, ledger)?;
            session.run(&mut source)
        }
    }
}
