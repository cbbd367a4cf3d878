// src/pipeline/sourcemap.rs

//! Output indentation and source map bookkeeping.
//!
//! The printer's map points into grass output; [`retarget`] turns it into a
//! map back to the SCSS file.

use std::collections::BTreeSet;

use parcel_sourcemap::{OriginalLocation, SourceMap};

/// Indentation step of the lightningcss printer.
const PRINTER_INDENT: usize = 2;

/// Rewrite printer indentation (two spaces per level) to `indent_width`
/// spaces per level.
///
/// Generated columns in `map` are shifted by the same amount on every line
/// whose indentation changed, so mappings keep pointing at the first
/// character of each declaration.
pub fn reindent(
    code: &str,
    indent_width: usize,
    mut map: Option<&mut SourceMap>,
) -> Result<String, String> {
    if indent_width == PRINTER_INDENT {
        return Ok(code.to_string());
    }

    let mapped_lines: BTreeSet<u32> = map
        .as_deref()
        .map(|m| m.get_mappings().iter().map(|m| m.generated_line).collect())
        .unwrap_or_default();

    let mut out = String::with_capacity(code.len() + code.len() / 4);

    for (idx, line) in code.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }

        let old = line.len() - line.trim_start_matches(' ').len();
        let new = old / PRINTER_INDENT * indent_width + old % PRINTER_INDENT;

        out.extend(std::iter::repeat_n(' ', new));
        out.push_str(&line[old..]);

        let line_no = u32::try_from(idx).map_err(|e| e.to_string())?;
        if new != old && mapped_lines.contains(&line_no) {
            if let Some(map) = map.as_deref_mut() {
                let delta = new as i64 - old as i64;
                map.offset_columns(line_no, old as u32, delta)
                    .map_err(|e| format!("{e:?}"))?;
            }
        }
    }

    Ok(out)
}

/// Comment linking a CSS file to its map, as the last line of the output.
pub fn mapping_url_comment(map_file_name: &str) -> String {
    format!("/*# sourceMappingURL={map_file_name} */\n")
}

/// Serialise `map` to its JSON form.
pub fn to_json(map: &mut SourceMap) -> Result<String, String> {
    map.to_json(None).map_err(|e| format!("{e:?}"))
}

/// Finds where a piece of compiled CSS was written in the SCSS source.
///
/// grass emits no source map, so positions are recovered by looking up the
/// rule selector or declaration property at a compiled position in the SCSS
/// text. Lookups that find nothing (rules from `@use`d files, selectors built
/// with `&` or interpolation) return `None` rather than a guess.
#[derive(Debug)]
pub struct SourceLocator<'a> {
    scss: Vec<&'a str>,
    compiled: Vec<&'a str>,
    cursor: usize,
}

impl<'a> SourceLocator<'a> {
    pub fn new(scss: &'a str, compiled: &'a str) -> Self {
        Self {
            scss: scss.lines().collect(),
            compiled: compiled.lines().collect(),
            cursor: 0,
        }
    }

    /// SCSS `(line, column)` of the compiled position `(line, column)`.
    ///
    /// Matches are searched from the previous match onwards first, so
    /// repeated selectors and properties resolve in source order.
    pub fn locate(&mut self, line: u32, column: u32) -> Option<(u32, u32)> {
        let compiled_line: &'a str = self.compiled.get(line as usize).copied()?;
        let fragment = compiled_line.get(column as usize..)?;

        let end = fragment.find(['{', ';', '}']).unwrap_or(fragment.len());
        let (head, terminator) = (&fragment[..end], fragment[end..].chars().next());

        let token = if terminator == Some('{') {
            Token::Selector(last_compound(head)?)
        } else {
            let (property, _) = head.split_once(':')?;
            Token::Property(property.trim())
        };
        if token.text().is_empty() {
            return None;
        }

        let order = (self.cursor..self.scss.len()).chain(0..self.cursor);
        for idx in order {
            if let Some(col) = token.find_in(self.scss[idx]) {
                self.cursor = idx;
                return Some((u32::try_from(idx).ok()?, u32::try_from(col).ok()?));
            }
        }
        None
    }
}

#[derive(Debug, Clone, Copy)]
enum Token<'a> {
    Selector(&'a str),
    Property(&'a str),
}

impl<'a> Token<'a> {
    fn text(&self) -> &'a str {
        match self {
            Token::Selector(s) | Token::Property(s) => s,
        }
    }

    /// Byte column of the token in `line`, if `line` declares it.
    fn find_in(&self, line: &str) -> Option<usize> {
        let text = self.text();
        let mut from = 0;
        while let Some(pos) = line[from..].find(text) {
            let start = from + pos;
            let before = line[..start].chars().next_back();
            let after = line[start + text.len()..].trim_start().chars().next();

            let bounded_before =
                before.is_none_or(|c| c.is_whitespace() || "{};,>+~".contains(c));
            let bounded_after = match self {
                Token::Selector(_) => matches!(after, Some('{') | Some(',')),
                Token::Property(_) => after == Some(':'),
            };
            if bounded_before && bounded_after {
                return Some(start);
            }
            from = start + text.len();
        }
        None
    }
}

/// `.nav a, .x > b` → `b`
fn last_compound(selector: &str) -> Option<&str> {
    selector
        .rsplit(',')
        .next()?
        .split(|c: char| c.is_whitespace() || "+>~".contains(c))
        .rfind(|s| !s.is_empty())
}

/// Rebuild `printed` (positions in grass output) as a map into the SCSS file
/// `file_name` with content `scss`.
///
/// Mappings whose origin cannot be located are left out.
pub fn retarget(
    printed: &SourceMap,
    compiled: &str,
    file_name: &str,
    scss: &str,
) -> Result<SourceMap, String> {
    let mut map = SourceMap::new("/");
    let source = map.add_source(file_name);
    map.set_source_content(source as usize, scss)
        .map_err(|e| format!("{e:?}"))?;

    let mut locator = SourceLocator::new(scss, compiled);
    for mapping in printed.get_mappings() {
        let Some(original) = mapping.original else {
            continue;
        };
        let located = locator.locate(original.original_line, original.original_column);
        if let Some((line, column)) = located {
            map.add_mapping(
                mapping.generated_line,
                mapping.generated_column,
                Some(OriginalLocation::new(line, column, source, None)),
            );
        }
    }

    Ok(map)
}
