#![allow(dead_code)]

use styledag::config::{ConfigFile, RawConfigFile};
use styledag::types::{OutputStyle, TriggerWhileRunningBehaviour};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Replace the source globs.
    pub fn sources(mut self, patterns: &[&str]) -> Self {
        self.config.styles.sources = patterns.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn output_style(mut self, style: OutputStyle) -> Self {
        self.config.styles.output_style = style;
        self
    }

    pub fn indent_width(mut self, width: usize) -> Self {
        self.config.styles.indent_width = width;
        self
    }

    pub fn browsers(mut self, queries: &[&str]) -> Self {
        self.config.styles.browsers = queries.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn source_maps(mut self, enabled: bool) -> Self {
        self.config.styles.source_maps = enabled;
        self
    }

    pub fn force_clean(mut self, force: bool) -> Self {
        self.config.clean.force = force;
        self
    }

    pub fn watch_exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.watch.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn queue_length(mut self, len: usize) -> Self {
        self.config.watch.queue_length = len;
        self
    }

    pub fn notify_on_last(mut self, on_last: bool) -> Self {
        self.config.notify.on_last = on_last;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
