// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Legacy ASCII unstructured-grid writer
//!
//! Emits the fixed section order: header, `DATASET UNSTRUCTURED_GRID`,
//! `POINTS`, `CELLS`, `CELL_TYPES`, `POINT_DATA`, `CELL_DATA`.
//!
//! The `POINT_DATA` scalar block carries the original external node id for
//! every dense index. The `CELL_DATA` block does NOT carry original
//! element ids; it emits sequential 1-based positions. The asymmetry is
//! long-standing output behavior that downstream tooling relies on, so it
//! is kept rather than fixed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::sink::MeshSink;

/// Write the accumulated mesh as a legacy ASCII unstructured grid
pub fn write_legacy<W: Write>(sink: &MeshSink, w: &mut W) -> io::Result<()> {
    writeln!(w, "# vtk DataFile Version 2.0")?;
    writeln!(w, "Keyword deck mesh")?;
    writeln!(w, "ASCII")?;
    writeln!(w)?;

    writeln!(w, "DATASET UNSTRUCTURED_GRID")?;
    writeln!(w, "POINTS {} float", sink.node_count())?;
    for point in sink.points() {
        writeln!(
            w,
            "{} {} {}",
            scientific(point[0]),
            scientific(point[1]),
            scientific(point[2])
        )?;
    }
    writeln!(w)?;

    // Each cell contributes one count token plus its connectivity
    let total_size: usize = sink.cells().iter().map(|c| 1 + c.connectivity.len()).sum();
    writeln!(w, "CELLS {} {}", sink.element_count(), total_size)?;
    for cell in sink.cells() {
        write!(w, "{}", cell.connectivity.len())?;
        for index in &cell.connectivity {
            write!(w, " {}", index)?;
        }
        writeln!(w)?;
    }
    writeln!(w)?;

    writeln!(w, "CELL_TYPES {}", sink.element_count())?;
    for cell in sink.cells() {
        writeln!(w, "{}", cell.code)?;
    }
    writeln!(w)?;

    writeln!(w, "POINT_DATA {}", sink.node_count())?;
    writeln!(w, "SCALARS OriginalNodeID int 1")?;
    writeln!(w, "LOOKUP_TABLE default")?;
    for id in sink.external_node_ids() {
        writeln!(w, "{}", id)?;
    }
    writeln!(w)?;

    writeln!(w, "CELL_DATA {}", sink.element_count())?;
    writeln!(w, "SCALARS OriginalElementID int 1")?;
    writeln!(w, "LOOKUP_TABLE default")?;
    for position in 1..=sink.element_count() {
        writeln!(w, "{}", position)?;
    }

    Ok(())
}

/// Flush the accumulated mesh to a file in one bulk write
pub fn write_legacy_file(sink: &MeshSink, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    let mut writer = BufWriter::new(file);
    write_legacy(sink, &mut writer).map_err(|e| Error::io(path.display().to_string(), e))?;
    writer
        .flush()
        .map_err(|e| Error::io(path.display().to_string(), e))
}

/// C-style `%.6e` formatting: 6 fractional digits, sign and two-digit
/// exponent. Rust's `{:e}` pads neither, so the exponent is rebuilt.
fn scientific(value: f64) -> String {
    let formatted = format!("{:.6e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            if exponent < 0 {
                format!("{}e-{:02}", mantissa, -exponent)
            } else {
                format!("{}e+{:02}", mantissa, exponent)
            }
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(sink: &MeshSink) -> String {
        let mut buffer = Vec::new();
        write_legacy(sink, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn scientific_matches_c_formatting() {
        assert_eq!(scientific(0.0), "0.000000e+00");
        assert_eq!(scientific(1.0), "1.000000e+00");
        assert_eq!(scientific(-2.5), "-2.500000e+00");
        assert_eq!(scientific(0.001), "1.000000e-03");
        assert_eq!(scientific(123456.789), "1.234568e+05");
    }

    #[test]
    fn empty_mesh_still_emits_all_sections() {
        let output = written(&MeshSink::new());
        assert!(output.contains("POINTS 0 float"));
        assert!(output.contains("CELLS 0 0"));
        assert!(output.contains("CELL_TYPES 0"));
        assert!(output.contains("POINT_DATA 0"));
        assert!(output.contains("CELL_DATA 0"));
    }

    #[test]
    fn sections_in_fixed_order_with_payload() {
        let mut sink = MeshSink::new();
        sink.add_node(10, 0.0, 0.0, 0.0);
        sink.add_node(20, 1.0, 0.0, 0.0);
        sink.add_node(30, 0.0, 1.0, 0.0);
        sink.set_element_type("S3");
        sink.add_element(1, &[10, 20, 30]);

        let output = written(&sink);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "# vtk DataFile Version 2.0");
        assert_eq!(lines[2], "ASCII");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "DATASET UNSTRUCTURED_GRID");
        assert_eq!(lines[5], "POINTS 3 float");
        assert_eq!(lines[6], "0.000000e+00 0.000000e+00 0.000000e+00");
        assert!(output.contains("CELLS 1 4\n3 0 1 2\n"));
        assert!(output.contains("CELL_TYPES 1\n5\n"));
        // point scalars keep original external ids, in dense order
        assert!(output.contains("POINT_DATA 3\nSCALARS OriginalNodeID int 1\nLOOKUP_TABLE default\n10\n20\n30\n"));
        // cell scalars are positional, not the original element ids
        assert!(output.contains("CELL_DATA 1\nSCALARS OriginalElementID int 1\nLOOKUP_TABLE default\n1\n"));
    }

    #[test]
    fn total_cell_size_counts_count_token() {
        let mut sink = MeshSink::new();
        for id in 1..=4 {
            sink.add_node(id, id as f64, 0.0, 0.0);
        }
        sink.add_element(1, &[1, 2, 3]);
        sink.add_element(2, &[1, 2, 3, 4]);

        let output = written(&sink);
        assert!(output.contains("CELLS 2 9"));
    }
}
