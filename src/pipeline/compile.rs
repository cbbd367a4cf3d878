// src/pipeline/compile.rs

//! SCSS → CSS through `grass`.

use std::path::Path;

use crate::types::OutputStyle;

/// Compile SCSS source text.
///
/// `load_dir` is added to the import search path so relative `@use` /
/// `@import` rules resolve against the directory of the source file.
/// Returns grass' own error message on failure.
pub fn compile_scss(
    source: &str,
    load_dir: Option<&Path>,
    style: OutputStyle,
) -> Result<String, String> {
    let grass_style = match style {
        OutputStyle::Expanded => grass::OutputStyle::Expanded,
        OutputStyle::Compressed => grass::OutputStyle::Compressed,
    };

    let mut options = grass::Options::default().style(grass_style);
    if let Some(dir) = load_dir {
        options = options.load_path(dir);
    }

    grass::from_string(source.to_owned(), &options).map_err(|e| e.to_string())
}
