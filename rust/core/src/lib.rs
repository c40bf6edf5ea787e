// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # INP-Lite Core Parser
//!
//! Grammar engine for keyword-structured engineering mesh decks, built
//! with [nom](https://docs.rs/nom).
//!
//! ## Overview
//!
//! This crate provides the text stages of the INP-Lite pipeline:
//!
//! - **Grammar Engine**: single-pass, zero-copy parsing of keyword lines,
//!   parameter lists and comma-separated data rows, with
//!   [memchr](https://docs.rs/memchr)-accelerated line scanning
//! - **Tree Reducer**: pure reduction of the parse tree to a map from
//!   section identifier to typed payload
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use inp_lite_core::{parse_document, reduce};
//!
//! let content = "*NODE\n1, 0.0, 0.0, 0.0\n*ELEMENT, TYPE=S3\n1, 1, 2, 3\n";
//! let doc = parse_document(content)?;
//! let deck = reduce(&doc);
//!
//! for section in deck.iter() {
//!     println!("{} ({} rows)", section.identifier, section.rows.len());
//! }
//! ```
//!
//! ## Error Reporting
//!
//! Rejections carry the 1-based line number of the offending line and the
//! surrounding raw source lines; well-formed trees never fail reduction.

pub mod error;
pub mod parser;
pub mod reducer;

pub use error::{Error, Result};
pub use parser::{parse_document, Document, KeywordLine, RawParam, RawSection, Token};
pub use reducer::{reduce, CellValue, ParamValue, ReducedDeck, ReducedSection, Row};
