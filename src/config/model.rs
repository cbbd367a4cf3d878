// src/config/model.rs

use serde::Deserialize;

use crate::types::{OutputStyle, TriggerWhileRunningBehaviour};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [styles]
/// sources = ["*.scss", "badexample/*.scss"]
/// output_style = "expanded"
/// indent_width = 4
/// browsers = ["last 2 versions"]
///
/// [clean]
/// patterns = ["**/*.map"]
///
/// [watch]
/// patterns = ["**/*.scss"]
///
/// [notify]
/// success_message = "Styles compiled"
/// ```
///
/// All sections are optional; an empty file yields the same settings as
/// having no file at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub styles: StylesSection,

    #[serde(default)]
    pub clean: CleanSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub notify: NotifySection,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`
/// (or `Default`, whose values are known to be valid).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    styles: StylesSection,
    clean: CleanSection,
    watch: WatchSection,
    notify: NotifySection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            styles: raw.styles,
            clean: raw.clean,
            watch: raw.watch,
            notify: raw.notify,
        }
    }

    pub fn styles(&self) -> &StylesSection {
        &self.styles
    }

    pub fn clean(&self) -> &CleanSection {
        &self.clean
    }

    pub fn watch(&self) -> &WatchSection {
        &self.watch
    }

    pub fn notify(&self) -> &NotifySection {
        &self.notify
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default())
    }
}

/// `[styles]` section: what to compile and how.
#[derive(Debug, Clone, Deserialize)]
pub struct StylesSection {
    /// Globs (relative to the project root) selecting the files to compile.
    /// `*` does not cross directory separators; `**` does.
    #[serde(default = "default_sources")]
    pub sources: Vec<String>,

    #[serde(default)]
    pub output_style: OutputStyle,

    /// Spaces per nesting level in expanded output.
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Browserslist queries used for vendor prefixing.
    #[serde(default = "default_browsers")]
    pub browsers: Vec<String>,

    /// Write `<name>.css.map` next to each output.
    #[serde(default = "default_true")]
    pub source_maps: bool,
}

impl Default for StylesSection {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            output_style: OutputStyle::default(),
            indent_width: default_indent_width(),
            browsers: default_browsers(),
            source_maps: true,
        }
    }
}

/// `[clean]` section: which generated files `css:clean` removes.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanSection {
    #[serde(default = "default_clean_patterns")]
    pub patterns: Vec<String>,

    /// Clear read-only flags before removing.
    #[serde(default = "default_true")]
    pub force: bool,
}

impl Default for CleanSection {
    fn default() -> Self {
        Self {
            patterns: default_clean_patterns(),
            force: true,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    #[serde(default = "default_watch_patterns")]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,

    /// `"queue"` (default) or `"overlap"`.
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Maximum number of queued compile runs to remember in queue mode.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            patterns: default_watch_patterns(),
            exclude: Vec::new(),
            triggered_while_running_behaviour: TriggerWhileRunningBehaviour::default(),
            queue_length: default_queue_length(),
        }
    }
}

/// `[notify]` section: the desktop notification side channel.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifySection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_success_message")]
    pub success_message: String,

    #[serde(default = "default_error_subtitle")]
    pub error_subtitle: String,

    /// Only notify once per compile run instead of once per written file.
    #[serde(default)]
    pub on_last: bool,
}

impl Default for NotifySection {
    fn default() -> Self {
        Self {
            enabled: true,
            title: default_title(),
            success_message: default_success_message(),
            error_subtitle: default_error_subtitle(),
            on_last: false,
        }
    }
}

fn default_sources() -> Vec<String> {
    vec!["*.scss".to_string(), "badexample/*.scss".to_string()]
}

fn default_indent_width() -> usize {
    4
}

fn default_browsers() -> Vec<String> {
    vec!["last 2 versions".to_string()]
}

fn default_clean_patterns() -> Vec<String> {
    vec!["**/*.map".to_string()]
}

fn default_watch_patterns() -> Vec<String> {
    vec!["**/*.scss".to_string()]
}

fn default_queue_length() -> usize {
    1
}

fn default_title() -> String {
    "styledag".to_string()
}

fn default_success_message() -> String {
    "Styles compiled".to_string()
}

fn default_error_subtitle() -> String {
    "Error in CSS File".to_string()
}

fn default_true() -> bool {
    true
}
