//! JSON output for perft runs.
//!
//! Used by `perft --json` so results can be diffed against other move
//! generators by script.

use serde::Serialize;
use std::io::Write;

/// Node count below one root move.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct DivideEntry {
    /// Root move in UCI notation.
    pub uci: String,
    pub nodes: u64,
}

/// JSON representation of a perft run.
#[derive(Debug, Serialize)]
pub struct PerftReport<'a> {
    /// Normalized FEN of the root position.
    pub fen: &'a str,
    pub depth: u32,
    /// Total leaf nodes.
    pub nodes: u64,
    pub elapsed_ms: u128,
    /// Per-move counts, sorted by UCI text. Empty unless divide was asked for.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub divide: Vec<DivideEntry>,
}

/// Writes `report` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, report: &PerftReport<'_>) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)
}
