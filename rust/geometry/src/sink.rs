// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh sink
//!
//! Accumulates nodes and elements during the parse (ingest phase) and
//! exclusively owns the buffers until the single bulk write (emit phase).
//! External node ids map to dense 0-based indices in first-seen order;
//! cell connectivity is stored against those indices, so points must be
//! fully known before cells are written.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cell_types::resolve_code;

/// One accumulated cell: resolved topology code plus dense connectivity
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub code: u8,
    pub connectivity: SmallVec<[u32; 8]>,
}

/// Accumulating mesh writer
///
/// `add_node`/`add_element` are called in parse order; duplicate node ids
/// are silent no-ops and elements referencing unknown node ids are dropped
/// whole, counted but never surfaced as errors.
#[derive(Debug, Default)]
pub struct MeshSink {
    /// Point coordinates, indexed by dense node index
    points: Vec<[f64; 3]>,
    /// Dense index -> original external id (inverse of `node_index`)
    external_ids: Vec<i64>,
    /// External id -> dense index, first occurrence wins
    node_index: FxHashMap<i64, u32>,
    cells: Vec<Cell>,
    /// Active element-type label, upper-cased; applies to all subsequent
    /// elements until changed
    active_type: Option<String>,
    dropped_elements: usize,
}

impl MeshSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node. The first occurrence of an external id is assigned
    /// the next dense index; repeats neither update coordinates nor error.
    pub fn add_node(&mut self, id: i64, x: f64, y: f64, z: f64) {
        if self.node_index.contains_key(&id) {
            return;
        }
        self.node_index.insert(id, self.points.len() as u32);
        self.points.push([x, y, z]);
        self.external_ids.push(id);
    }

    /// Set the active element-type label. Accepts either a bare label or a
    /// `TYPE=LABEL` fragment; stored upper-cased.
    pub fn set_element_type(&mut self, label: &str) {
        let label = match label.rsplit_once('=') {
            Some((_, value)) => value,
            None => label,
        };
        self.active_type = Some(label.trim().to_ascii_uppercase());
    }

    /// Add an element with external-id connectivity. Every id must already
    /// be known to the sink; otherwise the whole element is discarded and
    /// the dropped counter incremented. Returns whether a cell was stored.
    /// The external element id is accepted for interface symmetry but not
    /// carried into the output, which identifies cells by position.
    pub fn add_element(&mut self, _id: i64, node_ids: &[i64]) -> bool {
        let mut connectivity: SmallVec<[u32; 8]> = SmallVec::with_capacity(node_ids.len());
        for node_id in node_ids {
            match self.node_index.get(node_id) {
                Some(index) => connectivity.push(*index),
                None => {
                    self.dropped_elements += 1;
                    return false;
                }
            }
        }

        let code = resolve_code(self.active_type.as_deref(), connectivity.len());
        self.cells.push(Cell { code, connectivity });
        true
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.cells.len()
    }

    /// Elements discarded because of unresolved node references
    #[inline]
    pub fn dropped_element_count(&self) -> usize {
        self.dropped_elements
    }

    #[inline]
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Original external node ids, indexed by dense index
    #[inline]
    pub fn external_node_ids(&self) -> &[i64] {
        &self.external_ids
    }

    /// Dense index assigned to an external node id
    #[inline]
    pub fn index_of(&self, id: i64) -> Option<u32> {
        self.node_index.get(&id).copied()
    }

    #[inline]
    pub fn active_element_type(&self) -> Option<&str> {
        self.active_type.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_indices_follow_first_seen_order() {
        let mut sink = MeshSink::new();
        sink.add_node(40, 0.0, 0.0, 0.0);
        sink.add_node(7, 1.0, 0.0, 0.0);
        sink.add_node(1003, 0.0, 1.0, 0.0);

        assert_eq!(sink.index_of(40), Some(0));
        assert_eq!(sink.index_of(7), Some(1));
        assert_eq!(sink.index_of(1003), Some(2));
        assert_eq!(sink.external_node_ids(), [40, 7, 1003]);
    }

    #[test]
    fn duplicate_node_is_a_silent_no_op() {
        let mut sink = MeshSink::new();
        sink.add_node(1, 0.0, 0.0, 0.0);
        sink.add_node(1, 9.0, 9.0, 9.0);

        assert_eq!(sink.node_count(), 1);
        assert_eq!(sink.points()[0], [0.0, 0.0, 0.0]);
    }

    #[test]
    fn element_with_unknown_node_is_dropped_whole() {
        let mut sink = MeshSink::new();
        sink.add_node(1, 0.0, 0.0, 0.0);
        sink.add_node(2, 1.0, 0.0, 0.0);

        assert!(!sink.add_element(1, &[1, 2, 99]));
        assert_eq!(sink.element_count(), 0);
        assert_eq!(sink.dropped_element_count(), 1);
    }

    #[test]
    fn element_connectivity_translated_to_dense_indices() {
        let mut sink = MeshSink::new();
        sink.add_node(10, 0.0, 0.0, 0.0);
        sink.add_node(20, 1.0, 0.0, 0.0);
        sink.add_node(30, 0.0, 1.0, 0.0);

        assert!(sink.add_element(1, &[10, 20, 30]));
        assert_eq!(sink.cells()[0].connectivity.as_slice(), [0, 1, 2]);
        assert_eq!(sink.cells()[0].code, 5); // three nodes, no label: triangle
    }

    #[test]
    fn type_label_resolved_at_insertion_time() {
        let mut sink = MeshSink::new();
        for id in 1..=4 {
            sink.add_node(id, 0.0, 0.0, 0.0);
        }
        sink.set_element_type("TYPE=C3D4");
        assert_eq!(sink.active_element_type(), Some("C3D4"));
        sink.add_element(1, &[1, 2, 3, 4]);

        sink.set_element_type("s4");
        sink.add_element(2, &[1, 2, 3, 4]);

        // same connectivity length, different codes: resolved per element
        assert_eq!(sink.cells()[0].code, 10);
        assert_eq!(sink.cells()[1].code, 9);
    }
}
