//! Run summary for a load-and-extract pass.

use crate::algo::components::ExtractionSummary;
use crate::formats::LoadStats;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Diagnostics from one full run over an input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Input file name as given by the caller.
    pub input: String,
    /// Smallest external node ID.
    pub min_id: Option<i64>,
    /// Largest external node ID.
    pub max_id: Option<i64>,
    /// Distinct edges stored.
    pub distinct_edges: usize,
    /// Duplicate submissions merged.
    pub duplicate_edges: usize,
    /// Components found.
    pub component_count: usize,
    /// Vertices in the largest component.
    pub largest_component_size: usize,
    /// Singleton components.
    pub singleton_count: usize,
    /// Wall-clock seconds for the run.
    pub elapsed_secs: f64,
}

impl RunSummary {
    /// Combine load and extraction counters.
    pub fn new(
        input: impl Into<String>,
        load: &LoadStats,
        extraction: &ExtractionSummary,
        elapsed_secs: f64,
    ) -> Self {
        Self {
            input: input.into(),
            min_id: load.min_id,
            max_id: load.max_id,
            distinct_edges: load.distinct_edges,
            duplicate_edges: load.duplicate_edges,
            component_count: extraction.component_count,
            largest_component_size: extraction.largest_component_size,
            singleton_count: extraction.singleton_count,
            elapsed_secs,
        }
    }

    /// Write the plain-text summary file.
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", self.input)?;
        match (self.min_id, self.max_id) {
            (Some(min), Some(max)) => {
                writeln!(writer, "Node numbers range from {min} to {max}\n")?;
            }
            _ => writeln!(writer, "No nodes declared\n")?,
        }
        writeln!(writer, "{} edges explored", self.distinct_edges)?;
        writeln!(
            writer,
            "{} duplicate edges not counted in edge count",
            self.duplicate_edges
        )?;
        writeln!(writer, "{} components found", self.component_count)?;
        writeln!(
            writer,
            "{} nodes in largest component",
            self.largest_component_size
        )?;
        writeln!(writer, "{} singleton components", self.singleton_count)?;
        writeln!(writer, "{:.6}", self.elapsed_secs)?;
        Ok(())
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
