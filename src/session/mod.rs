//! The per-save cycle.
//!
//! For every qualifying save: clear the report, reformat and replay, then run
//! the tests for the file's package, optionally install, optionally run the
//! user's command, and finish with a `$` prompt line. The first failing step
//! ends the cycle; only process-fatal errors leave [`Session::run`].

use crate::buffer::BufferHost;
use crate::config::WatchConfig;
use crate::error::Result;
use crate::replay::{ReplayOutcome, Replayer};
use crate::report::ReportSink;
use crate::tools::{run_command, run_shell};
use crate::watch::{EventSource, SaveEvent};
use std::sync::Arc;

/// Everything one watcher needs, fixed at construction.
pub struct Session {
    config: WatchConfig,
    report: Arc<ReportSink>,
    host: Box<dyn BufferHost>,
    replayer: Replayer,
}

impl Session {
    /// Create a session that runs the tools named in `config`.
    pub fn new(config: WatchConfig, report: Arc<ReportSink>, host: Box<dyn BufferHost>) -> Self {
        let replayer = Replayer::from_config(&config);
        Self::with_replayer(config, report, host, replayer)
    }

    /// Create a session with an explicit replayer.
    pub fn with_replayer(
        config: WatchConfig,
        report: Arc<ReportSink>,
        host: Box<dyn BufferHost>,
        replayer: Replayer,
    ) -> Self {
        Self {
            config,
            report,
            host,
            replayer,
        }
    }

    /// The session's configuration.
    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Returns true when `event` should start a cycle.
    pub fn qualifies(&self, event: &SaveEvent) -> bool {
        event.is_put() && !event.path.as_os_str().is_empty() && self.config.watches(&event.path)
    }

    /// Handle events until the source ends.
    pub fn run(&self, source: &mut dyn EventSource) -> Result<()> {
        while let Some(event) = source.next_event()? {
            if !self.qualifies(&event) {
                continue;
            }
            log::debug!("save in window {}: {}", event.window, event.path.display());
            self.handle_save(&event)?;
        }
        Ok(())
    }

    /// Run one full cycle for a save.
    pub fn handle_save(&self, event: &SaveEvent) -> Result<()> {
        self.report.clear()?;
        let result = self.cycle(event);
        self.report.write_str("$\n")?;
        result
    }

    fn cycle(&self, event: &SaveEvent) -> Result<()> {
        let outcome =
            self.replayer
                .reformat(&self.report, self.host.as_ref(), event.window, &event.path)?;
        if let ReplayOutcome::Aborted(reason) = outcome {
            log::debug!("{}: {}", event.path.display(), reason);
            return Ok(());
        }

        let Some(package) = self.config.relative_package(&event.path) else {
            return Ok(());
        };
        let Some(test) = &self.config.test else {
            return Ok(());
        };
        if !run_command(&self.report, test, &test.args_for_package(&package))? {
            return Ok(());
        }
        if self.config.install_after {
            let install = &self.config.install;
            if !run_command(&self.report, install, &install.args)? {
                return Ok(());
            }
        }
        if let Some(cmd) = &self.config.run_after {
            run_shell(&self.report, &self.config.shell, cmd)?;
        }
        Ok(())
    }
}
