// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deck pipeline
//!
//! Runs the full three-stage pipeline over one input: grammar engine →
//! tree reducer → geometry partitioning. Node/element payloads are
//! streamed into the mesh sink and replaced in the structured dictionary
//! by IR placeholders; everything else is kept whole. The mesh artifact
//! is flushed once, in full, after all sections are processed.
//!
//! Parsing one deck is atomic: any grammar or I/O failure aborts the
//! pipeline with no deck returned. Unresolved element references and
//! repeated node ids are recovered locally and surfaced only through the
//! dropped-element counter.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use inp_lite_core::{parse_document, reduce, CellValue, ReducedSection, Row};
use inp_lite_geometry::{write_legacy_file, MeshSink};

use crate::classify::{classify, Category};
use crate::error::Result;
use crate::ir::{extract_type_label, GeometryIr};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Where the mesh artifact is flushed. Geometry payloads always go to
    /// the artifact to keep them out of the in-memory dictionary.
    pub artifact_path: PathBuf,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from("geometry.vtk"),
        }
    }
}

/// One entry of the geometry-metadata map
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataEntry {
    /// Set/surface/instance definition, kept whole
    Whole(ReducedSection),
    /// Section-assignment record: full command line plus data rows
    Assignment { command: String, data: Vec<Row> },
    /// Placeholder left behind by a streamed node/element section
    Placeholder(GeometryIr),
}

/// Counts-only view of the flushed mesh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshStats {
    pub artifact_path: PathBuf,
    pub node_count: usize,
    pub element_count: usize,
    /// Elements discarded because they referenced unknown node ids
    pub dropped_elements: usize,
}

/// The structured dictionary produced by one pipeline run.
///
/// Bulk mesh data lives in the artifact, never here: streamed sections
/// are represented by [`GeometryIr`] placeholders only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deck {
    /// Materials, boundary conditions, loads, analysis setup and any
    /// unrecognized keywords
    pub non_geometry: FxHashMap<String, ReducedSection>,
    /// Sets, surfaces, instances, section assignments and the placeholders
    /// of streamed node/element sections
    pub geometry_metadata: FxHashMap<String, MetadataEntry>,
    /// All section identifiers in first-seen source order
    pub section_order: Vec<String>,
    pub mesh: MeshStats,
}

/// Three-stage deck parser
#[derive(Debug, Clone, Default)]
pub struct DeckParser {
    config: ParserConfig,
}

impl DeckParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a deck file. Malformed bytes are tolerated (lossy UTF-8);
    /// read failures are wrapped with the file path.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Deck> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).map_err(|e| crate::Error::io(path.display().to_string(), e))?;
        let content = String::from_utf8_lossy(&bytes);
        self.parse_str(&content)
    }

    /// Parse deck content and flush the mesh artifact.
    pub fn parse_str(&self, content: &str) -> Result<Deck> {
        let doc = parse_document(content)?;
        debug!(sections = doc.sections.len(), "parsed keyword document");

        let reduced = reduce(&doc);
        debug!(sections = reduced.len(), "reduced section map");

        let mut sink = MeshSink::new();
        let mut non_geometry = FxHashMap::default();
        let mut geometry_metadata = FxHashMap::default();
        let mut section_order = Vec::with_capacity(reduced.len());

        for section in reduced.into_ordered() {
            section_order.push(section.identifier.clone());
            match classify(&section.identifier) {
                Category::Geometry(keyword) => match keyword {
                    "NODE" | "ELEMENT" => {
                        let element_like = keyword == "ELEMENT";
                        if element_like {
                            stream_elements(&mut sink, &section);
                        } else {
                            stream_nodes(&mut sink, &section);
                        }
                        let ir = GeometryIr::new(
                            &section.identifier,
                            element_like,
                            !section.rows.is_empty(),
                        );
                        geometry_metadata
                            .insert(section.identifier, MetadataEntry::Placeholder(ir));
                    }
                    "SECTION" => {
                        geometry_metadata.insert(
                            section.identifier.clone(),
                            MetadataEntry::Assignment {
                                command: section.identifier,
                                data: section.rows,
                            },
                        );
                    }
                    _ => {
                        geometry_metadata
                            .insert(section.identifier.clone(), MetadataEntry::Whole(section));
                    }
                },
                Category::NonGeometry(_) | Category::Unclassified => {
                    non_geometry.insert(section.identifier.clone(), section);
                }
            }
        }

        if sink.dropped_element_count() > 0 {
            warn!(
                dropped = sink.dropped_element_count(),
                "elements dropped due to unresolved node references"
            );
        }

        write_legacy_file(&sink, &self.config.artifact_path)?;
        info!(
            nodes = sink.node_count(),
            elements = sink.element_count(),
            artifact = %self.config.artifact_path.display(),
            "flushed mesh artifact"
        );

        Ok(Deck {
            non_geometry,
            geometry_metadata,
            section_order,
            mesh: MeshStats {
                artifact_path: self.config.artifact_path.clone(),
                node_count: sink.node_count(),
                element_count: sink.element_count(),
                dropped_elements: sink.dropped_element_count(),
            },
        })
    }
}

/// Stream a node section's rows into the sink. A row needs an id and at
/// least x/y; z defaults to 0. Rows that do not fit are skipped.
fn stream_nodes(sink: &mut MeshSink, section: &ReducedSection) {
    for row in &section.rows {
        if row.len() < 3 {
            continue;
        }
        let id = match row[0].as_id() {
            Some(id) => id,
            None => continue,
        };
        let x = match row[1].as_f64() {
            Some(v) => v,
            None => continue,
        };
        let y = match row[2].as_f64() {
            Some(v) => v,
            None => continue,
        };
        let z = row.get(3).and_then(CellValue::as_f64).unwrap_or(0.0);
        sink.add_node(id, x, y, z);
    }
}

/// Stream an element section's rows into the sink. The active type label
/// is taken from the keyword line when present and persists across
/// sections otherwise. Cells that cannot be coerced to ids are skipped.
fn stream_elements(sink: &mut MeshSink, section: &ReducedSection) {
    if let Some(label) = extract_type_label(&section.identifier) {
        sink.set_element_type(label);
    }
    for row in &section.rows {
        if row.len() < 2 {
            continue;
        }
        let id = match row[0].as_id() {
            Some(id) => id,
            None => continue,
        };
        let node_ids: Vec<i64> = row[1..].iter().filter_map(CellValue::as_id).collect();
        if node_ids.is_empty() {
            continue;
        }
        sink.add_element(id, &node_ids);
    }
}
