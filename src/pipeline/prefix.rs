// src/pipeline/prefix.rs

//! Vendor prefixing and printing through `lightningcss`.

use std::sync::{Arc, RwLock};

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;
use tracing::warn;

/// Adds the vendor prefixes required by a set of browserslist queries.
#[derive(Debug, Clone)]
pub struct Prefixer {
    browsers: Option<Browsers>,
    minify: bool,
}

impl Prefixer {
    /// Resolve `queries` (e.g. `["last 2 versions"]`) once up front.
    ///
    /// A query that matches no browser yields a prefixer that leaves
    /// declarations untouched.
    pub fn new(queries: &[String], minify: bool) -> Result<Self, String> {
        let browsers = Browsers::from_browserslist(queries.iter().map(String::as_str))
            .map_err(|e| format!("invalid browsers query {queries:?}: {e}"))?;
        Ok(Self { browsers, minify })
    }

    fn targets(&self) -> Targets {
        Targets {
            browsers: self.browsers,
            ..Targets::default()
        }
    }

    /// Parse `css`, add prefixes and print it again.
    ///
    /// Declarations and rules lightningcss does not understand (old IE hacks
    /// such as `*zoom: 1`) are dropped with a warning instead of failing the
    /// file.
    ///
    /// When `source_map` is given, mappings for source index 0 are recorded
    /// into it; the caller registers that source beforehand.
    pub fn process(
        &self,
        css: &str,
        filename: &str,
        source_map: Option<&mut SourceMap>,
    ) -> Result<String, String> {
        let warnings = Arc::new(RwLock::new(Vec::new()));
        let mut stylesheet = StyleSheet::parse(
            css,
            ParserOptions {
                filename: filename.to_string(),
                error_recovery: true,
                warnings: Some(Arc::clone(&warnings)),
                ..ParserOptions::default()
            },
        )
        .map_err(|e| e.to_string())?;

        if let Ok(warnings) = warnings.read() {
            for warning in warnings.iter() {
                warn!(file = filename, %warning, "ignored unsupported CSS");
            }
        }

        stylesheet
            .minify(MinifyOptions {
                targets: self.targets(),
                ..MinifyOptions::default()
            })
            .map_err(|e| e.to_string())?;

        let printed = stylesheet
            .to_css(PrinterOptions {
                minify: self.minify,
                source_map,
                targets: self.targets(),
                ..PrinterOptions::default()
            })
            .map_err(|e| e.to_string())?;

        Ok(printed.code)
    }
}
