// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # INP-Lite Processing
//!
//! The full keyword-deck pipeline: grammar engine → tree reducer →
//! geometry partitioning, plus the read-only query surface over the
//! result.
//!
//! Node and element payloads are streamed into the mesh sink and written
//! to the mesh artifact; their entries in the structured dictionary are
//! replaced by compact placeholders so bulk geometry never stays in
//! memory. Everything else — materials, boundary conditions, loads, sets,
//! surfaces, instances, section assignments — is kept whole and queryable.
//!
//! ```rust,ignore
//! use inp_lite_processing::DeckParser;
//!
//! let deck = DeckParser::new().parse_file("model.inp")?;
//! println!("{} nodes, {} elements", deck.mesh.node_count, deck.mesh.element_count);
//! for material in deck.materials() {
//!     println!("material {}", material.name);
//! }
//! ```

pub mod classify;
pub mod error;
pub mod ir;
pub mod pipeline;
pub mod query;

pub use classify::{classify, Category, GEOMETRY_KEYWORDS, NON_GEOMETRY_KEYWORDS};
pub use error::{Error, Result};
pub use ir::{extract_type_label, GeometryIr};
pub use pipeline::{Deck, DeckParser, MeshStats, MetadataEntry, ParserConfig};
pub use query::{
    BoundaryCondition, DeckSummary, IdSet, Load, Material, NamedRecord, SectionAssignment,
    SectionIndex,
};
