//! Refresh loop driving the balance presentation state.
//!
//! [`Refresher`] runs one cycle (fetch, parse, calculate) per trigger and
//! publishes each resulting [`PresentationState`] to a shared cell and a
//! broadcast channel. Triggers are the periodic ticker, an explicit
//! [`RefreshCommand::RefreshNow`], and [`RefreshCommand::Reconfigure`] after
//! the configuration changed. All of them go through one `select!` loop, so
//! cycles never overlap.
//!
//! With [`Refresher::with_config_file`], every cycle first re-reads the
//! endpoint, token and threshold from that file, so a token saved by
//! `amp-balance setup` is used on the next tick. The interval only changes
//! through [`RefreshCommand::Reconfigure`].

pub mod settings;
pub mod source;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use amp_usage::{Tier, UsageRecord};
use chrono::Utc;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError, ConfigLoader};
use crate::notify::Notifier;
use crate::view;

pub use settings::{load_settings, RefreshInterval, Settings};
pub use source::{HttpSource, UsageSource};
pub use state::PresentationState;

/// Capacity of the state broadcast channel.
const UPDATE_CHANNEL_CAPACITY: usize = 16;

/// Out-of-band triggers for a running [`Refresher`].
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshCommand {
    /// Run a cycle now (manual trigger).
    RefreshNow,
    /// Swap in new settings, restart the ticker and refresh immediately.
    Reconfigure(Settings),
}

/// Owns the presentation state and produces a new one per cycle.
pub struct Refresher {
    /// Current state, shared with readers.
    state: Arc<RwLock<PresentationState>>,
    /// Broadcast sender for state changes.
    update_tx: broadcast::Sender<PresentationState>,
    source: Arc<dyn UsageSource>,
    notifier: Arc<dyn Notifier>,
    settings: Settings,
    /// Replaces the configured period when set.
    period_override: Option<Duration>,
    /// Re-read before every cycle when set.
    config_file: Option<PathBuf>,
    /// Whether the low-balance warning already fired for the current Low run.
    low_warned: bool,
}

impl Refresher {
    /// Creates a refresher; announces an interval adjustment if `settings`
    /// carries one.
    pub fn new(
        settings: Settings,
        source: Arc<dyn UsageSource>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (update_tx, _rx) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let initial = if settings.token.is_some() {
            PresentationState::Loading
        } else {
            PresentationState::Unconfigured
        };
        let refresher = Self {
            state: Arc::new(RwLock::new(initial)),
            update_tx,
            source,
            notifier,
            settings,
            period_override: None,
            config_file: None,
            low_warned: false,
        };
        refresher.announce_interval_adjustment();
        refresher
    }

    /// Uses `period` for the ticker instead of the configured interval.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period_override = Some(period);
        self
    }

    /// Re-reads `[api]` and `[display]` from `path` before every cycle.
    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    /// Returns a reference to the shared state.
    pub fn state(&self) -> Arc<RwLock<PresentationState>> {
        Arc::clone(&self.state)
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> broadcast::Receiver<PresentationState> {
        self.update_tx.subscribe()
    }

    /// Settings currently in force.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs the refresh loop until the shutdown receiver fires.
    ///
    /// The first tick completes immediately, so the loop starts with a
    /// refresh. A closed command channel is not an error; the ticker keeps
    /// running.
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<RefreshCommand>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) {
        let mut ticker = self.new_ticker();
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.refresh_once().await;
                }
                command = commands.recv(), if commands_open => match command {
                    Some(RefreshCommand::RefreshNow) => {
                        debug!("manual refresh requested");
                        self.refresh_once().await;
                    }
                    Some(RefreshCommand::Reconfigure(settings)) => {
                        self.apply_settings(settings);
                        // The new ticker's first tick refreshes right away.
                        ticker = self.new_ticker();
                    }
                    None => {
                        debug!("refresh command channel closed");
                        commands_open = false;
                    }
                },
                _ = shutdown_rx.recv() => {
                    info!("refresh loop shutting down");
                    break;
                }
            }
        }
    }

    /// Performs a single cycle and publishes every state it passes through.
    ///
    /// Without a token the state becomes `Unconfigured` and nothing is
    /// fetched. Otherwise `Loading` is published first, then `Ready` or
    /// `Error` depending on the first failing step.
    pub async fn refresh_once(&mut self) {
        self.reload_credentials().await;

        let Some(token) = self.settings.token.clone() else {
            self.low_warned = false;
            self.publish(PresentationState::Unconfigured).await;
            return;
        };

        self.publish(PresentationState::Loading).await;

        let source = Arc::clone(&self.source);
        let url = self.settings.url.clone();
        let threshold_cents = self.settings.threshold_cents;
        let outcome = tokio::task::spawn_blocking(
            move || -> Result<(UsageRecord, Tier), amp_usage::Error> {
                let raw = source.fetch(&url, &token)?;
                Ok(amp_usage::interpret(&raw, threshold_cents)?)
            },
        )
        .await;

        let next = match outcome {
            Ok(Ok((record, tier))) => {
                debug!(remaining = record.remaining, tier = %tier, "balance refreshed");
                PresentationState::Ready {
                    record,
                    tier,
                    updated_at: Utc::now(),
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "balance refresh failed");
                PresentationState::Error {
                    message: e.to_string(),
                }
            }
            Err(e) => {
                warn!(error = %e, "balance refresh task panicked");
                PresentationState::Error {
                    message: format!("Refresh failed: {e}"),
                }
            }
        };

        let low_record = match &next {
            PresentationState::Ready {
                record,
                tier: Tier::Low,
                ..
            } => Some(*record),
            _ => None,
        };
        self.publish(next).await;
        self.track_low_balance(low_record);
    }

    /// Picks up credential changes from the config file, if one is set.
    ///
    /// A missing file means no token. A file that cannot be read or parsed
    /// keeps the current settings.
    async fn reload_credentials(&mut self) {
        let Some(path) = self.config_file.clone() else {
            return;
        };
        let loaded = tokio::task::spawn_blocking(move || ConfigLoader::load_from_path(&path)).await;
        let config = match loaded {
            Ok(Ok(config)) => config,
            Ok(Err(ConfigError::NotFound { .. })) => Config::default(),
            Ok(Err(e)) => {
                warn!(error = %e, "configuration not re-read, keeping current credentials");
                return;
            }
            Err(e) => {
                warn!(error = %e, "configuration re-read task failed");
                return;
            }
        };
        if self.settings.update_credentials(&config) {
            info!(configured = self.settings.token.is_some(), "session token changed");
        }
    }

    /// Writes `next` to the cell and broadcasts it.
    async fn publish(&self, next: PresentationState) {
        debug!(state = next.name(), "presentation state changed");
        *self.state.write().await = next.clone();
        // No subscribers is not an error.
        let _ = self.update_tx.send(next);
    }

    /// Warns once when the balance enters `Low`; re-arms when it leaves.
    fn track_low_balance(&mut self, low_record: Option<UsageRecord>) {
        match low_record {
            Some(record) if !self.low_warned => {
                self.low_warned = true;
                self.notifier.warn(&view::low_balance_warning(
                    &record,
                    self.settings.threshold_cents,
                ));
            }
            Some(_) => {}
            None => self.low_warned = false,
        }
    }

    fn apply_settings(&mut self, settings: Settings) {
        info!(
            interval_minutes = settings.interval.minutes(),
            configured = settings.token.is_some(),
            "refresh settings changed"
        );
        self.settings = settings;
        self.announce_interval_adjustment();
    }

    fn announce_interval_adjustment(&self) {
        if let Some(message) = self.settings.interval_adjustment_message() {
            self.notifier.warn(&message);
        }
    }

    fn new_ticker(&self) -> Interval {
        let period = self
            .period_override
            .unwrap_or_else(|| self.settings.period());
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}
