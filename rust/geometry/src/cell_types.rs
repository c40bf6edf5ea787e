// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cell topology codes for the legacy unstructured-grid format
//!
//! An element's code is resolved once, at insertion time: exact match of
//! the active type label first, then the node-count fallback, then the
//! quad code as last resort.

/// Fallback code for an unrecognized connectivity length
pub const FALLBACK_QUAD: u8 = 9;

/// Topology code for an element-type label
#[inline]
pub fn code_for_label(label: &str) -> Option<u8> {
    match label {
        "C3D4" => Some(10),  // Tetrahedron
        "C3D8" => Some(12),  // Hexahedron
        "C3D6" => Some(13),  // Wedge
        "C3D10" => Some(24), // Quadratic tetrahedron
        "C3D20" => Some(25), // Quadratic hexahedron
        "S4" => Some(9),     // Quad
        "S3" => Some(5),     // Triangle
        "S8" => Some(23),    // Quadratic quad
        "S6" => Some(22),    // Quadratic triangle
        "T3D2" => Some(3),   // Line
        "T3D3" => Some(21),  // Quadratic line
        _ => None,
    }
}

/// Topology code inferred from connectivity length
#[inline]
pub fn code_for_node_count(count: usize) -> Option<u8> {
    match count {
        2 => Some(3),   // Line
        3 => Some(5),   // Triangle
        4 => Some(9),   // Quad
        6 => Some(13),  // Wedge
        8 => Some(12),  // Hexahedron
        10 => Some(24), // Quadratic tetrahedron
        20 => Some(25), // Quadratic hexahedron
        _ => None,
    }
}

/// Resolve an element's topology code from its type label and connectivity
#[inline]
pub fn resolve_code(label: Option<&str>, node_count: usize) -> u8 {
    label
        .and_then(code_for_label)
        .or_else(|| code_for_node_count(node_count))
        .unwrap_or(FALLBACK_QUAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_table_wins_over_node_count() {
        // C3D4 has 4 nodes; the count table would say quad (9)
        assert_eq!(resolve_code(Some("C3D4"), 4), 10);
    }

    #[test]
    fn unknown_label_falls_back_to_node_count() {
        assert_eq!(resolve_code(Some("B31"), 2), 3);
        assert_eq!(resolve_code(None, 8), 12);
    }

    #[test]
    fn unrecognized_count_defaults_to_quad() {
        assert_eq!(resolve_code(None, 7), FALLBACK_QUAD);
        assert_eq!(resolve_code(Some("B31"), 5), FALLBACK_QUAD);
    }
}
