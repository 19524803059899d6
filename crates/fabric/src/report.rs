//! Overview rendering.
//!
//! A read-only, human-readable view of the built fabric. It provides:
//! 1. **Connectivity Matrix:** One row per master, an `X` for every slave it
//!    may address.
//! 2. **Address Map:** The decoded ranges in address order, interleaved with
//!    `reservedN` rows for the gaps between them.
//!
//! Rendering never touches decode or arbitration state; it reads the same
//! immutable table the router uses.

use std::fmt;

use crate::common::addr::Bytes;
use crate::common::ids::{MasterId, SlaveId};
use crate::fabric::addrmap::AddressTable;
use crate::fabric::router::Reachability;

/// Borrowing view over a built fabric, rendered through [`fmt::Display`].
#[derive(Clone, Copy, Debug)]
pub struct OverviewReport<'a> {
    masters: &'a [String],
    slaves: &'a [String],
    table: &'a AddressTable,
    reach: &'a Reachability,
    width_bits: u32,
}

impl<'a> OverviewReport<'a> {
    pub(crate) fn new(
        masters: &'a [String],
        slaves: &'a [String],
        table: &'a AddressTable,
        reach: &'a Reachability,
        width_bits: u32,
    ) -> Self {
        Self {
            masters,
            slaves,
            table,
            reach,
            width_bits,
        }
    }

    fn matrix(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const CORNER: &str = "Master > Slave";
        let first_width = self
            .masters
            .iter()
            .map(String::len)
            .chain([CORNER.len()])
            .max()
            .unwrap_or(0)
            + 2;

        let mut header = format!("{CORNER:<first_width$}");
        for slave in self.slaves {
            header.push_str(&format!("{slave:<width$}", width = slave.len() + 2));
        }
        writeln!(f, "{}", header.trim_end())?;

        for (m, master) in self.masters.iter().enumerate() {
            let mut row = format!("{master:<first_width$}");
            for (s, slave) in self.slaves.iter().enumerate() {
                let mark = if self.reach.permits(MasterId(m), SlaveId(s)) {
                    "X"
                } else {
                    ""
                };
                row.push_str(&format!("{mark:<width$}", width = slave.len() + 2));
            }
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }

    fn size_cell(&self, bytes: u64) -> String {
        let words = bytes / u64::from(self.width_bits / 8);
        format!("{}x{} ({})", words, self.width_bits, Bytes(bytes))
    }

    fn addrspace_rows(&self) -> Vec<[String; 5]> {
        let mut rows = Vec::new();
        let mut reserved = 0usize;
        let mut prev_end: Option<u64> = None;
        for range in self.table.ranges() {
            if let Some(end) = prev_end {
                if end < u64::from(range.start) {
                    rows.push([
                        format!("reserved{reserved}"),
                        "Reserved".to_owned(),
                        format!("{end:#010X}"),
                        self.size_cell(u64::from(range.start) - end),
                        "-".to_owned(),
                    ]);
                    reserved += 1;
                }
            }
            let name = self
                .slaves
                .get(range.slave.index())
                .cloned()
                .unwrap_or_else(|| range.slave.to_string());
            rows.push([
                name,
                "Slave".to_owned(),
                format!("{:#010X}", range.start),
                self.size_cell(range.size()),
                "-".to_owned(),
            ]);
            prev_end = Some(range.end);
        }
        rows
    }

    fn addrspace(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const HEADER: [&str; 5] = ["Addrspace", "Type", "Base", "Size", "Attributes"];
        let rows = self.addrspace_rows();

        let mut widths = HEADER.map(str::len);
        for row in &rows {
            for (w, cell) in widths.iter_mut().zip(row.iter()) {
                *w = (*w).max(cell.len());
            }
        }

        let render = |cells: [&str; 5]| {
            let mut line = String::from("|");
            for (cell, w) in cells.iter().zip(widths.iter()) {
                line.push_str(&format!(" {cell:<w$} |"));
            }
            line
        };

        writeln!(f, "{}", render(HEADER))?;
        let dashes = widths.map(|w| "-".repeat(w));
        writeln!(
            f,
            "{}",
            render([&dashes[0], &dashes[1], &dashes[2], &dashes[3], &dashes[4]])
        )?;
        for row in &rows {
            writeln!(
                f,
                "{}",
                render([&row[0], &row[1], &row[2], &row[3], &row[4]])
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for OverviewReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Size: {}", Bytes(self.table.span()))?;
        writeln!(f)?;
        self.matrix(f)?;
        writeln!(f)?;
        self.addrspace(f)
    }
}
