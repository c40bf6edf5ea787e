// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Query surface
//!
//! Read-only projections over a parsed [`Deck`] for external consumers
//! (report generators, exporters). No re-parsing happens here; bulk mesh
//! data stays in the artifact and is only visible through counts.

use serde::Serialize;

use inp_lite_core::{CellValue, ReducedSection, Row};

use crate::pipeline::{Deck, MeshStats, MetadataEntry};

/// One material definition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: String,
    pub identifier: String,
    pub data: Vec<Row>,
}

/// One boundary-condition row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryCondition {
    /// Node set name or node id the condition applies to
    pub target: String,
    pub data: Vec<CellValue>,
}

/// One load row, tagged with the keyword kind it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Load {
    pub kind: String,
    pub data: Row,
}

/// A node or element set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdSet {
    pub name: String,
    pub ids: Vec<i64>,
}

/// A named geometry-metadata record (surface or instance)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedRecord {
    pub name: String,
    pub identifier: String,
    pub data: Vec<Row>,
}

/// A section-assignment record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionAssignment {
    pub command: String,
    pub data: Vec<Row>,
}

/// All discovered section identifiers, partitioned by category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionIndex {
    /// Streamed mesh-payload sections (nodes/elements)
    pub geometry: Vec<String>,
    /// All geometry-adjacent sections, placeholders included
    pub geometry_metadata: Vec<String>,
    pub non_geometry: Vec<String>,
}

/// Counts-only structural summary of a parsed deck
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckSummary {
    pub mesh: MeshStats,
    pub node_sets: usize,
    pub element_sets: usize,
    pub surfaces: usize,
    pub instances: usize,
    pub section_assignments: usize,
    pub materials: usize,
    pub boundary_conditions: usize,
    pub loads: usize,
    pub sections: SectionIndex,
}

const LOAD_KEYWORDS: [&str; 3] = ["CLOAD", "DLOAD", "DSLOAD"];

impl Deck {
    /// Non-geometry sections in first-seen source order
    fn ordered_non_geometry(&self) -> impl Iterator<Item = &ReducedSection> {
        self.section_order
            .iter()
            .filter_map(|id| self.non_geometry.get(id))
    }

    /// Geometry-metadata entries in first-seen source order
    fn ordered_metadata(&self) -> impl Iterator<Item = (&str, &MetadataEntry)> {
        self.section_order
            .iter()
            .filter_map(|id| self.geometry_metadata.get(id).map(|e| (id.as_str(), e)))
    }

    /// Material definitions. Named from the `NAME` parameter when present.
    pub fn materials(&self) -> Vec<Material> {
        let mut materials = Vec::new();
        for section in self.ordered_non_geometry() {
            if !contains_ignore_case(&section.identifier, "MATERIAL") {
                continue;
            }
            let name = param_text(section, "NAME")
                .unwrap_or_else(|| format!("Material_{}", materials.len() + 1));
            materials.push(Material {
                name,
                identifier: section.identifier.clone(),
                data: section.rows.clone(),
            });
        }
        materials
    }

    /// Boundary-condition rows across all `BOUNDARY` sections
    pub fn boundary_conditions(&self) -> Vec<BoundaryCondition> {
        let mut conditions = Vec::new();
        for section in self.ordered_non_geometry() {
            if !contains_ignore_case(&section.identifier, "BOUNDARY") {
                continue;
            }
            for row in &section.rows {
                let target = match row.first() {
                    Some(cell) => cell.to_string(),
                    None => continue,
                };
                conditions.push(BoundaryCondition {
                    target,
                    data: row[1..].to_vec(),
                });
            }
        }
        conditions
    }

    /// Load rows across all `CLOAD`/`DLOAD`/`DSLOAD` sections
    pub fn loads(&self) -> Vec<Load> {
        let mut loads = Vec::new();
        for kind in LOAD_KEYWORDS {
            for section in self.ordered_non_geometry() {
                if !contains_ignore_case(&section.identifier, kind) {
                    continue;
                }
                for row in &section.rows {
                    if row.is_empty() {
                        continue;
                    }
                    loads.push(Load {
                        kind: kind.to_string(),
                        data: row.clone(),
                    });
                }
            }
        }
        loads
    }

    /// Node sets from the geometry metadata
    pub fn node_sets(&self) -> Vec<IdSet> {
        self.id_sets("NSET")
    }

    /// Element sets from the geometry metadata
    pub fn element_sets(&self) -> Vec<IdSet> {
        self.id_sets("ELSET")
    }

    fn id_sets(&self, keyword: &str) -> Vec<IdSet> {
        let mut sets = Vec::new();
        for (identifier, entry) in self.ordered_metadata() {
            let section = match entry {
                MetadataEntry::Whole(section) => section,
                _ => continue,
            };
            if !contains_ignore_case(identifier, keyword) {
                continue;
            }
            let name = param_text(section, keyword)
                .unwrap_or_else(|| format!("{}_{}", keyword, sets.len() + 1));
            let ids = section
                .rows
                .iter()
                .flatten()
                .filter_map(CellValue::as_id)
                .collect();
            sets.push(IdSet { name, ids });
        }
        sets
    }

    /// Surface definitions from the geometry metadata
    pub fn surfaces(&self) -> Vec<NamedRecord> {
        self.named_records("SURFACE")
    }

    /// Instance definitions from the geometry metadata
    pub fn instances(&self) -> Vec<NamedRecord> {
        self.named_records("INSTANCE")
    }

    fn named_records(&self, keyword: &str) -> Vec<NamedRecord> {
        let mut records = Vec::new();
        for (identifier, entry) in self.ordered_metadata() {
            let section = match entry {
                MetadataEntry::Whole(section) => section,
                _ => continue,
            };
            if !contains_ignore_case(identifier, keyword) {
                continue;
            }
            let name = param_text(section, "NAME")
                .unwrap_or_else(|| format!("{}_{}", keyword, records.len() + 1));
            records.push(NamedRecord {
                name,
                identifier: identifier.to_string(),
                data: section.rows.clone(),
            });
        }
        records
    }

    /// Section-assignment records (solid sections, shell sections, ...)
    pub fn section_assignments(&self) -> Vec<SectionAssignment> {
        let mut assignments = Vec::new();
        for (_, entry) in self.ordered_metadata() {
            if let MetadataEntry::Assignment { command, data } = entry {
                assignments.push(SectionAssignment {
                    command: command.clone(),
                    data: data.clone(),
                });
            }
        }
        assignments
    }

    /// Non-geometry sections whose identifier contains the keyword,
    /// case-insensitively, in first-seen order
    pub fn section_data(&self, keyword: &str) -> Vec<&ReducedSection> {
        self.ordered_non_geometry()
            .filter(|section| contains_ignore_case(&section.identifier, keyword))
            .collect()
    }

    /// Mesh counts and artifact location. Coordinates and connectivity
    /// live in the artifact, not in memory.
    pub fn mesh_info(&self) -> &MeshStats {
        &self.mesh
    }

    /// All discovered section identifiers, partitioned by category
    pub fn all_sections(&self) -> SectionIndex {
        let mut geometry = Vec::new();
        let mut geometry_metadata = Vec::new();
        for (identifier, entry) in self.ordered_metadata() {
            if matches!(entry, MetadataEntry::Placeholder(_)) {
                geometry.push(identifier.to_string());
            }
            geometry_metadata.push(identifier.to_string());
        }
        let non_geometry = self
            .ordered_non_geometry()
            .map(|section| section.identifier.clone())
            .collect();
        SectionIndex {
            geometry,
            geometry_metadata,
            non_geometry,
        }
    }

    /// Counts-only structural summary
    pub fn summary(&self) -> DeckSummary {
        DeckSummary {
            mesh: self.mesh.clone(),
            node_sets: self.node_sets().len(),
            element_sets: self.element_sets().len(),
            surfaces: self.surfaces().len(),
            instances: self.instances().len(),
            section_assignments: self.section_assignments().len(),
            materials: self.materials().len(),
            boundary_conditions: self.boundary_conditions().len(),
            loads: self.loads().len(),
            sections: self.all_sections(),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_uppercase()
        .contains(&needle.to_ascii_uppercase())
}

fn param_text(section: &ReducedSection, key: &str) -> Option<String> {
    section
        .params
        .get(key)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}
