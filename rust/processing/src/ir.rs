// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intermediate representation for streamed geometry sections
//!
//! Once a `NODE`/`ELEMENT` section's rows have been streamed to the mesh
//! sink, its entry in the structured dictionary is replaced by a compact
//! placeholder carrying only a type tag and a has-data marker. The
//! placeholder is a presence indicator, never a geometry data source.

use serde::{Serialize, Serializer};

/// Placeholder replacing a streamed node/element payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryIr {
    /// Element-type label for element-like sections (`None` for node-like);
    /// `UNKNOWN` when the keyword line carries no `TYPE=` parameter
    pub element_type: Option<String>,
    /// Whether the streamed section had any data rows
    pub has_data: bool,
}

impl GeometryIr {
    /// Build the placeholder for a streamed section. `element_like`
    /// decides whether a type entry is included.
    pub fn new(identifier: &str, element_like: bool, has_data: bool) -> Self {
        let element_type = element_like.then(|| {
            extract_type_label(identifier)
                .unwrap_or("UNKNOWN")
                .to_string()
        });
        GeometryIr {
            element_type,
            has_data,
        }
    }

    /// Legacy nested-list rendering: `[["type = S3"], ["data"]]` for an
    /// element section with rows, `[["data"]]` for a node section, a
    /// trailing empty list when the section had no rows.
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut rows = Vec::with_capacity(2);
        if let Some(label) = &self.element_type {
            rows.push(vec![format!("type = {}", label)]);
        }
        if self.has_data {
            rows.push(vec!["data".to_string()]);
        } else {
            rows.push(Vec::new());
        }
        rows
    }
}

// Serializes as the legacy nested-list placeholder shape
impl Serialize for GeometryIr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_rows().serialize(serializer)
    }
}

/// Extract the element-type label following a `TYPE=` marker in the raw
/// keyword-line text. Case-insensitive; the label ends at the next comma.
pub fn extract_type_label(identifier: &str) -> Option<&str> {
    let upper = identifier.to_ascii_uppercase();
    let start = upper.find("TYPE=")? + "TYPE=".len();
    let rest = &identifier[start..];
    let end = rest.find(',').unwrap_or(rest.len());
    let label = rest[..end].trim();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_placeholder_with_rows() {
        let ir = GeometryIr::new("ELEMENT, TYPE=S3", true, true);
        assert_eq!(
            ir.to_rows(),
            vec![vec!["type = S3".to_string()], vec!["data".to_string()]]
        );
    }

    #[test]
    fn element_placeholder_without_type() {
        let ir = GeometryIr::new("ELEMENT", true, true);
        assert_eq!(ir.to_rows()[0], vec!["type = UNKNOWN".to_string()]);
    }

    #[test]
    fn node_placeholder_omits_type_entry() {
        let ir = GeometryIr::new("NODE", false, true);
        assert_eq!(ir.to_rows(), vec![vec!["data".to_string()]]);
    }

    #[test]
    fn empty_section_gets_empty_marker() {
        let ir = GeometryIr::new("NODE, NSET=Empty", false, false);
        assert_eq!(ir.to_rows(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn type_extraction_is_case_insensitive() {
        assert_eq!(extract_type_label("ELEMENT, type=c3d4"), Some("c3d4"));
        assert_eq!(
            extract_type_label("ELEMENT, TYPE=C3D4, ELSET=Solid"),
            Some("C3D4")
        );
        assert_eq!(extract_type_label("ELEMENT"), None);
    }

    #[test]
    fn serializes_as_nested_lists() {
        let ir = GeometryIr::new("ELEMENT, TYPE=S3", true, true);
        let json = serde_json::to_value(&ir).unwrap();
        assert_eq!(json, serde_json::json!([["type = S3"], ["data"]]));
    }
}
