// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # INP-Lite Geometry
//!
//! Mesh accumulation and legacy unstructured-grid output.
//!
//! The [`MeshSink`] owns all node and element buffers between ingest and
//! the single bulk write: external node ids are mapped to dense 0-based
//! indices in first-seen order, element connectivity is translated through
//! that map at insertion time, and [`write_legacy`] serializes the result
//! as a legacy ASCII unstructured grid once all points are known.
//!
//! ```rust,ignore
//! use inp_lite_geometry::{MeshSink, write_legacy_file};
//!
//! let mut sink = MeshSink::new();
//! sink.add_node(10, 0.0, 0.0, 0.0);
//! sink.set_element_type("TYPE=C3D4");
//! write_legacy_file(&sink, "geometry.vtk")?;
//! ```

pub mod cell_types;
pub mod error;
pub mod sink;
pub mod vtk;

pub use cell_types::{code_for_label, code_for_node_count, resolve_code, FALLBACK_QUAD};
pub use error::{Error, Result};
pub use sink::{Cell, MeshSink};
pub use vtk::{write_legacy, write_legacy_file};
