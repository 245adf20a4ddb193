//! Configuration file watcher for hot reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use tokio::sync::mpsc;
use crate::config::loader::parse_config;
use crate::config::schema::AppConfig;
use crate::observability::metrics;

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    poll_interval: Duration,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path, poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            poll_interval,
            update_tx,
        }, update_rx)
    }

    /// Start watching the file in a background thread.
    ///
    /// The returned watcher must be kept alive for events to keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        let content = match fs::read_to_string(&path) {
                            Ok(content) => content,
                            Err(e) => {
                                metrics::record_config_reload(false);
                                tracing::error!(error = %e, "Failed to read config, keeping current rules");
                                return;
                            }
                        };
                        // A truncate-then-write shows up as a change to an empty file first.
                        if content.trim().is_empty() {
                            tracing::debug!(path = ?path, "Config file empty, waiting for the write to finish");
                            return;
                        }
                        tracing::info!(path = ?path, "Config file change detected, reloading");
                        match parse_config(&content) {
                            Ok(new_config) => {
                                metrics::record_config_reload(true);
                                let _ = tx.send(new_config);
                            }
                            Err(e) => {
                                metrics::record_config_reload(false);
                                tracing::error!(error = %e, "Failed to reload config, keeping current rules");
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(self.poll_interval))?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
