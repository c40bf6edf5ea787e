// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry classifier
//!
//! Routes every reduced section by matching its identifier against two
//! fixed vocabularies with case-insensitive substring containment. The
//! geometry vocabulary is checked first and in declared order, so a
//! keyword containing both a geometry-like and a material-like substring
//! always resolves to geometry, deterministically.

/// Mesh payload and geometry-adjacent keywords
pub const GEOMETRY_KEYWORDS: [&str; 7] = [
    "NODE", "ELEMENT", "NSET", "ELSET", "SURFACE", "INSTANCE", "SECTION",
];

/// Material, load and analysis-setup keywords
pub const NON_GEOMETRY_KEYWORDS: [&str; 16] = [
    "MATERIAL",
    "ELASTIC",
    "PLASTIC",
    "DENSITY",
    "EXPANSION",
    "BOUNDARY",
    "CLOAD",
    "DLOAD",
    "DSLOAD",
    "STEP",
    "STATIC",
    "DYNAMIC",
    "ASSEMBLY",
    "PART",
    "INTERACTION",
    "CONTACT",
];

/// Destination of one reduced section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Matched the geometry vocabulary; carries the winning keyword
    Geometry(&'static str),
    /// Matched the non-geometry vocabulary; carries the winning keyword
    NonGeometry(&'static str),
    /// Matched neither vocabulary: preserved as non-geometry by default
    Unclassified,
}

impl Category {
    pub fn is_geometry(&self) -> bool {
        matches!(self, Category::Geometry(_))
    }
}

/// Classify a section identifier
pub fn classify(identifier: &str) -> Category {
    let upper = identifier.to_ascii_uppercase();
    for keyword in GEOMETRY_KEYWORDS {
        if upper.contains(keyword) {
            return Category::Geometry(keyword);
        }
    }
    for keyword in NON_GEOMETRY_KEYWORDS {
        if upper.contains(keyword) {
            return Category::NonGeometry(keyword);
        }
    }
    Category::Unclassified
}
