// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, StyledagError};
use crate::watch::patterns::build_globset;

/// Sass refuses indentation wider than this.
const MAX_INDENT_WIDTH: usize = 10;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = StyledagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_styles(cfg)?;
    validate_clean(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

fn validate_styles(cfg: &RawConfigFile) -> Result<()> {
    let styles = &cfg.styles;

    if styles.sources.is_empty() {
        return Err(StyledagError::ConfigError(
            "[styles].sources must list at least one pattern".to_string(),
        ));
    }
    validate_globs("[styles].sources", &styles.sources)?;

    if styles.indent_width == 0 || styles.indent_width > MAX_INDENT_WIDTH {
        return Err(StyledagError::ConfigError(format!(
            "[styles].indent_width must be between 1 and {MAX_INDENT_WIDTH} (got {})",
            styles.indent_width
        )));
    }

    if styles.browsers.iter().all(|q| q.trim().is_empty()) {
        return Err(StyledagError::ConfigError(
            "[styles].browsers must contain at least one query".to_string(),
        ));
    }

    Ok(())
}

fn validate_clean(cfg: &RawConfigFile) -> Result<()> {
    if cfg.clean.patterns.is_empty() {
        return Err(StyledagError::ConfigError(
            "[clean].patterns must list at least one pattern".to_string(),
        ));
    }
    validate_globs("[clean].patterns", &cfg.clean.patterns)
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.queue_length == 0 {
        return Err(StyledagError::ConfigError(
            "[watch].queue_length must be >= 1 (got 0)".to_string(),
        ));
    }
    validate_globs("[watch].patterns", &cfg.watch.patterns)?;
    validate_globs("[watch].exclude", &cfg.watch.exclude)
}

fn validate_globs(field: &str, patterns: &[String]) -> Result<()> {
    build_globset(patterns)
        .map(|_| ())
        .map_err(|e| StyledagError::ConfigError(format!("{field}: {e:#}")))
}
