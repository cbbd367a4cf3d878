use std::fmt;

use serde::Deserialize;

/// Behaviour when a file change arrives while a compile is already running.
///
/// - `Queue`: remember the trigger and start one new compile when the current
///   one finishes. Triggers beyond `queue_length` coalesce into the last
///   queued batch (default behaviour).
/// - `Overlap`: start a new compile immediately, alongside the running one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TriggerWhileRunningBehaviour {
    #[default]
    Queue,
    Overlap,
}

/// Formatting of the compiled CSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// One declaration per line, nested blocks indented.
    #[default]
    Expanded,
    /// Everything on as few bytes as possible.
    Compressed,
}


impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStyle::Expanded => f.write_str("expanded"),
            OutputStyle::Compressed => f.write_str("compressed"),
        }
    }
}
