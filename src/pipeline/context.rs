// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Context assembly from ranked retrieval results.

use crate::index::ScoredPassage;

/// Placeholder title for passages whose metadata carries none
pub const UNTITLED: &str = "untitled";

/// Formats the first `top_n` ranked results into a single prompt-ready
/// block, or `None` when there is nothing usable.
///
/// Each passage renders as its title (or [`UNTITLED`]) followed by its
/// full text; blocks are joined by a blank line in ranked order. `top_n`
/// is clamped to at least 1 and is intentionally smaller than the
/// retrieval k: the candidate set is wide, the injected context narrow.
pub fn build_context(results: &[ScoredPassage], top_n: usize) -> Option<String> {
    if results.is_empty() {
        return None;
    }

    let blocks: Vec<String> = results
        .iter()
        .take(top_n.max(1))
        .map(|scored| {
            let title = scored
                .passage
                .metadata
                .title
                .as_deref()
                .unwrap_or(UNTITLED);
            format!("{}\n{}", title, scored.passage.text)
        })
        .collect();

    Some(blocks.join("\n\n"))
}
