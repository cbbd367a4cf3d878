// src/pipeline/mod.rs

//! The stylesheet pipeline behind the `css` task.
//!
//! Per input file: read → compile SCSS ([`compile`]) → vendor-prefix and
//! print ([`prefix`]) → re-indent and finish the source map ([`sourcemap`])
//! → write `<name>.css` and `<name>.css.map` next to the input.
//!
//! Each stage reports failure as a [`StyleError`]; nothing in here panics or
//! notifies. Deciding what a failure means is left to the caller.

pub mod compile;
pub mod prefix;
pub mod sourcemap;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use parcel_sourcemap::SourceMap;
use thiserror::Error;
use tracing::debug;

use crate::config::StylesSection;
use crate::errors::{Result, StyledagError};
use crate::fs::FileSystem;
use crate::types::OutputStyle;
use crate::watch::patterns::{collect_matching_files, WatchProfile};

pub use prefix::Prefixer;

/// Why a single stylesheet could not be compiled.
#[derive(Error, Debug)]
pub enum StyleError {
    #[error("{}: could not read source: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("{}: {message}", path.display())]
    Sass { path: PathBuf, message: String },

    #[error("{}: invalid CSS after compilation: {message}", path.display())]
    Css { path: PathBuf, message: String },

    #[error("{}: could not build source map: {message}", path.display())]
    SourceMap { path: PathBuf, message: String },
}

impl StyleError {
    /// The input file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            StyleError::Read { path, .. }
            | StyleError::Sass { path, .. }
            | StyleError::Css { path, .. }
            | StyleError::SourceMap { path, .. } => path,
        }
    }
}

/// Output of one successfully compiled stylesheet.
#[derive(Debug, Clone)]
pub struct CompiledStyle {
    pub source_path: PathBuf,
    pub css_path: PathBuf,
    pub css: String,
    /// `None` when source maps are disabled.
    pub map_path: Option<PathBuf>,
    pub map: Option<String>,
}

/// Compiles the configured stylesheet sources.
#[derive(Debug, Clone)]
pub struct StylePipeline {
    root: PathBuf,
    fs: Arc<dyn FileSystem>,
    sources: WatchProfile,
    style: OutputStyle,
    indent_width: usize,
    source_maps: bool,
    prefixer: Prefixer,
}

impl StylePipeline {
    pub fn new(
        root: impl Into<PathBuf>,
        fs: Arc<dyn FileSystem>,
        section: &StylesSection,
    ) -> Result<Self> {
        let sources = WatchProfile::new(&section.sources, &[])
            .map_err(|e| StyledagError::ConfigError(format!("[styles].sources: {e:#}")))?;
        let prefixer = Prefixer::new(
            &section.browsers,
            section.output_style == OutputStyle::Compressed,
        )
        .map_err(StyledagError::ConfigError)?;

        Ok(Self {
            root: root.into(),
            fs,
            sources,
            style: section.output_style,
            indent_width: section.indent_width,
            source_maps: section.source_maps,
            prefixer,
        })
    }

    /// List the files to compile for this run.
    ///
    /// Partials (file names starting with `_`) are only compiled through the
    /// files that import them.
    pub fn list_sources(&self) -> anyhow::Result<Vec<PathBuf>> {
        let files = collect_matching_files(self.fs.as_ref(), &self.root, &self.sources)
            .with_context(|| format!("listing stylesheet sources under {:?}", self.root))?;

        Ok(files.into_iter().filter(|p| !is_partial(p)).collect())
    }

    /// Compile one stylesheet without writing anything.
    pub fn compile_file(&self, path: &Path) -> std::result::Result<CompiledStyle, StyleError> {
        let source = self.fs.read_to_string(path).map_err(|e| StyleError::Read {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        })?;

        let compiled = compile::compile_scss(&source, path.parent(), self.style).map_err(
            |message| StyleError::Sass {
                path: path.to_path_buf(),
                message,
            },
        )?;

        let css_path = css_path_for(path);
        let file_name = file_name_of(path);

        if !self.source_maps {
            let css = self.print(&compiled, &file_name, None, path)?;
            return Ok(CompiledStyle {
                source_path: path.to_path_buf(),
                css_path,
                css,
                map_path: None,
                map: None,
            });
        }

        let map_path = map_path_for(&css_path);
        let mut printed = SourceMap::new("/");
        printed.add_source(&file_name);

        let mut css = self.print(&compiled, &file_name, Some(&mut printed), path)?;
        css.push_str(&sourcemap::mapping_url_comment(&file_name_of(&map_path)));

        let source_map_error = |message| StyleError::SourceMap {
            path: path.to_path_buf(),
            message,
        };
        let mut map = sourcemap::retarget(&printed, &compiled, &file_name, &source)
            .map_err(source_map_error)?;
        let map_json = sourcemap::to_json(&mut map).map_err(source_map_error)?;

        Ok(CompiledStyle {
            source_path: path.to_path_buf(),
            css_path,
            css,
            map_path: Some(map_path),
            map: Some(map_json),
        })
    }

    fn print(
        &self,
        compiled: &str,
        file_name: &str,
        mut map: Option<&mut SourceMap>,
        path: &Path,
    ) -> std::result::Result<String, StyleError> {
        let printed = self
            .prefixer
            .process(compiled, file_name, map.as_deref_mut())
            .map_err(|message| StyleError::Css {
                path: path.to_path_buf(),
                message,
            })?;

        let mut code = match self.style {
            OutputStyle::Expanded => sourcemap::reindent(&printed, self.indent_width, map)
                .map_err(|message| StyleError::SourceMap {
                    path: path.to_path_buf(),
                    message,
                })?,
            OutputStyle::Compressed => printed,
        };

        if !code.ends_with('\n') {
            code.push('\n');
        }
        Ok(code)
    }

    /// Write the CSS (and map, if any) of `compiled` to disk.
    pub fn write(&self, compiled: &CompiledStyle) -> anyhow::Result<()> {
        self.fs.write(&compiled.css_path, compiled.css.as_bytes())?;
        if let (Some(map_path), Some(map)) = (&compiled.map_path, &compiled.map) {
            self.fs.write(map_path, map.as_bytes())?;
        }
        debug!(
            source = %compiled.source_path.display(),
            css = %compiled.css_path.display(),
            "wrote compiled stylesheet"
        );
        Ok(())
    }
}

/// `dir/a.scss` → `dir/a.css`
pub fn css_path_for(source: &Path) -> PathBuf {
    source.with_extension("css")
}

/// `dir/a.css` → `dir/a.css.map`
pub fn map_path_for(css_path: &Path) -> PathBuf {
    let mut s = OsString::from(css_path.as_os_str());
    s.push(".map");
    PathBuf::from(s)
}

fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('_'))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
