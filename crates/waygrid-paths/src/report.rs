//! Plain-text diagnostics for a finished search.
//!
//! The layout is meant for people reading it while debugging:
//!
//! ```text
//! Path from (0,0) to (4,4)
//! Total nodes expanded: 4.
//! Final path size: 2 nodes.
//! Path cost: 56.
//!
//! [Position]  [Cell]  [Total Cost]  [Special]
//! 1.          (0,0)   56            start
//! 2.          (4,4)   56            goal
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use waygrid_core::Cell;

/// One waypoint of a finished route with its total cost `f`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportEntry {
    pub cell: Cell,
    pub total_cost: i32,
}

/// Summary of a successful search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchReport {
    pub start: Cell,
    pub goal: Cell,
    pub expanded: usize,
    pub path_cost: i32,
    pub route: Vec<ReportEntry>,
}

impl SearchReport {
    /// File name used for entity `number`.
    pub fn file_name(number: u32) -> String {
        format!("entity-path-{number}.txt")
    }

    /// Write the report to `dir/entity-path-<number>.txt`, creating `dir`
    /// if needed. Returns the path written.
    pub fn write_to_dir(&self, dir: &Path, number: u32) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(Self::file_name(number));
        let mut out = BufWriter::new(File::create(&path)?);
        write!(out, "{self}")?;
        out.flush()?;
        Ok(path)
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Path from {} to {}", self.start, self.goal)?;
        writeln!(f, "Total nodes expanded: {}.", self.expanded)?;
        writeln!(f, "Final path size: {} nodes.", self.route.len())?;
        writeln!(f, "Path cost: {}.", self.path_cost)?;
        writeln!(f)?;
        writeln!(f, "{:<12}{:<10}{:<14}[Special]", "[Position]", "[Cell]", "[Total Cost]")?;
        for (i, entry) in self.route.iter().enumerate() {
            let mut special = Vec::new();
            if entry.cell == self.start {
                special.push("start");
            }
            if entry.cell == self.goal {
                special.push("goal");
            }
            writeln!(
                f,
                "{:<12}{:<10}{:<14}{}",
                format!("{}.", i + 1),
                entry.cell.to_string(),
                entry.total_cost,
                special.join(" ")
            )?;
        }
        Ok(())
    }
}
