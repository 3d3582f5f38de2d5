//! Config file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself so that
//! editors which save by rename still trigger a reload. A reload is only
//! forwarded when the file content actually changed and passes validation.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ServiceConfig;

/// Sections that take effect on reload without a restart.
pub const HOT_SECTIONS: &[&str] = &["explorer", "retries", "tracer", "security.strict_validation"];

/// Watches one config file and forwards validated reloads.
pub struct ConfigWatcher {
    reload: Reload,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end of its update channel.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ServiceConfig>) {
        let (updates, rx) = mpsc::unbounded_channel();
        (
            Self {
                reload: Reload::new(path, updates),
            },
            rx,
        )
    }

    /// Start watching. Dropping the returned handle stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = self.reload.watch_dir();
        let mut reload = self.reload;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if reload.is_relevant(&event) => reload.reload(),
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        tracing::info!(dir = %dir.display(), hot = ?HOT_SECTIONS, "Watching config for changes");
        Ok(watcher)
    }
}

/// Reload state owned by the watch callback.
struct Reload {
    path: PathBuf,
    file_name: Option<OsString>,
    last_content: Option<String>,
    updates: mpsc::UnboundedSender<ServiceConfig>,
}

impl Reload {
    fn new(path: &Path, updates: mpsc::UnboundedSender<ServiceConfig>) -> Self {
        Self {
            path: path.to_path_buf(),
            file_name: path.file_name().map(OsString::from),
            // The running config was loaded from this content already.
            last_content: std::fs::read_to_string(path).ok(),
            updates,
        }
    }

    fn watch_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// A create or modify event that names the config file.
    fn is_relevant(&self, event: &Event) -> bool {
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return false;
        }
        event
            .paths
            .iter()
            .any(|p| p.file_name().map(OsString::from) == self.file_name)
    }

    fn reload(&mut self) {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Config file unreadable, keeping current");
                return;
            }
        };
        if self.last_content.as_deref() == Some(content.as_str()) {
            tracing::debug!("Config content unchanged, skipping reload");
            return;
        }

        match load_config(&self.path) {
            Ok(config) => {
                self.last_content = Some(content);
                tracing::info!(
                    path = %self.path.display(),
                    applied = ?HOT_SECTIONS,
                    "Config changed, reloading"
                );
                if self.updates.send(config).is_err() {
                    tracing::warn!("Server no longer accepts config updates");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Rejected config change, keeping current");
            }
        }
    }
}
