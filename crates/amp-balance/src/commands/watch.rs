//! `watch` command: keep the status fresh until told to stop.
//!
//! Renders every state change to stdout. The token is re-read from the
//! configuration file on every cycle, so `amp-balance setup` takes effect on
//! the next tick. Signals:
//! - SIGINT / SIGTERM: stop
//! - SIGHUP: reload the configuration file and restart the timer
//! - SIGUSR1: refresh now

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use amp_balance::config::xdg;
use amp_balance::refresh::{load_settings, HttpSource, RefreshCommand, Refresher};
use amp_balance::render::{render_updates, renderer_for, OutputFormat};
use amp_balance::{Notifier, StderrNotifier};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};

/// Runs the refresh loop in the foreground.
pub(crate) fn run_watch_command(
    config_path: Option<&Path>,
    format: OutputFormat,
    details: bool,
) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config_path = config_path.map(Path::to_path_buf);
    let result = runtime.block_on(async move {
        // Installed before the first refresh so no early signal is missed.
        let signals = Signals::install()?;

        let notifier: Arc<dyn Notifier> = Arc::new(StderrNotifier);
        let mut refresher = Refresher::new(settings, Arc::new(HttpSource), Arc::clone(&notifier))
            .with_config_file(xdg::resolve_config_path(config_path.as_deref()));
        let updates = refresher.subscribe();
        let cell = refresher.state();

        let (command_tx, command_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let loop_handle = tokio::spawn(async move {
            refresher.run(command_rx, shutdown_rx).await;
        });

        let mut renderer = renderer_for(format, io::stdout(), details);
        let rendered = tokio::select! {
            // Only returns early when stdout goes away.
            rendered = render_updates(updates, cell, renderer.as_mut()) => rendered,
            () = signals.dispatch(config_path.as_deref(), &command_tx, notifier.as_ref()) => Ok(()),
        };

        // The loop may already be gone; nothing to stop then.
        let _ = shutdown_tx.send(());
        if let Err(e) = loop_handle.await {
            warn!(error = %e, "refresh loop task failed");
        }
        rendered
    });

    match result {
        Ok(()) => {
            info!("watch stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Signal streams the watch loop reacts to.
struct Signals {
    terminate: Signal,
    interrupt: Signal,
    hangup: Signal,
    user1: Signal,
}

impl Signals {
    fn install() -> io::Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
            hangup: signal(SignalKind::hangup())?,
            user1: signal(SignalKind::user_defined1())?,
        })
    }

    /// Translates signals into refresh commands until a stop signal arrives
    /// or the refresh loop goes away.
    async fn dispatch(
        mut self,
        config_path: Option<&Path>,
        commands: &mpsc::Sender<RefreshCommand>,
        notifier: &dyn Notifier,
    ) {
        loop {
            let command = tokio::select! {
                _ = self.interrupt.recv() => {
                    info!("received SIGINT, shutting down");
                    return;
                }
                _ = self.terminate.recv() => {
                    info!("received SIGTERM, shutting down");
                    return;
                }
                _ = self.hangup.recv() => {
                    info!("received SIGHUP, reloading configuration");
                    match load_settings(config_path) {
                        Ok(settings) => {
                            notifier.info("Configuration reloaded");
                            RefreshCommand::Reconfigure(settings)
                        }
                        Err(e) => {
                            notifier.warn(&format!("Configuration not reloaded: {e}"));
                            continue;
                        }
                    }
                }
                _ = self.user1.recv() => {
                    info!("received SIGUSR1, refreshing");
                    RefreshCommand::RefreshNow
                }
            };

            if commands.send(command).await.is_err() {
                return;
            }
        }
    }
}
