//! Aggregate chunk statistics for quality reporting.
//!
//! The counts here are what operators watch after a batch run: a statute
//! whose chunk count suddenly halves, or whose change-event counts drop to
//! zero, usually means an upstream extraction regression rather than a real
//! change in the law.

use crate::chunk::{ChangeKind, Chunk};
use serde::Serialize;
use std::collections::BTreeSet;

/// Counts aggregated over one document's chunk list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChunkStats {
    /// Total chunks (= articles detected).
    pub chunks: usize,
    /// Distinct chapter labels seen across chunks.
    pub chapters: usize,
    /// Distinct section labels seen across chunks.
    pub sections: usize,
    /// Deletion events across all change logs.
    pub deleted_events: usize,
    /// Creation events across all change logs.
    pub created_events: usize,
    /// Amendment events across all change logs.
    pub amended_events: usize,
    /// Chunks carrying at least one amendment date.
    pub chunks_with_amendments: usize,
}

impl ChunkStats {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let chapters: BTreeSet<&str> = chunks.iter().filter_map(|c| c.chapter.as_deref()).collect();
        let sections: BTreeSet<&str> = chunks.iter().filter_map(|c| c.section.as_deref()).collect();

        let mut stats = Self {
            chunks: chunks.len(),
            chapters: chapters.len(),
            sections: sections.len(),
            ..Self::default()
        };
        for chunk in chunks {
            for entry in &chunk.metadata.change_log {
                match entry.kind {
                    ChangeKind::Deleted => stats.deleted_events += 1,
                    ChangeKind::Created => stats.created_events += 1,
                    ChangeKind::Amended => stats.amended_events += 1,
                }
            }
            if !chunk.metadata.amended_dates.is_empty() {
                stats.chunks_with_amendments += 1;
            }
        }
        stats
    }
}
