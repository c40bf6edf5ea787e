// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tree reducer
//!
//! Reduces the generic parse tree to a map from section identifier to its
//! typed payload. Pure, no I/O; malformed trees cannot reach this stage
//! because the grammar rejects them upstream.
//!
//! The map key is the reconstructed literal keyword-line text: the
//! normalized keyword plus the raw parameter string. Two sections with the
//! same keyword but different parameters are distinct entries; sections
//! with byte-identical keyword lines collide and the later payload
//! replaces the earlier one, keeping the first-seen position.

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::parser::{Document, KeywordLine, Token};

/// A typed cell of a data row
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// Marker for an explicitly empty data line (a single bare comma)
    Comma,
}

impl CellValue {
    /// Numeric view of the cell; text is parsed tolerantly
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Text(s) => fast_float::parse(s).ok(),
            CellValue::Comma => None,
        }
    }

    /// Integer-id view of the cell. Floats and numeric text are truncated,
    /// mirroring the tolerant id coercion of deck consumers.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            CellValue::Float(v) => Some(*v as i64),
            CellValue::Text(s) => fast_float::parse::<f64, _>(s).ok().map(|v| v as i64),
            CellValue::Comma => None,
        }
    }

    /// Borrow the cell as text, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_comma(&self) -> bool {
        matches!(self, CellValue::Comma)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Comma => f.write_str(","),
        }
    }
}

// The comma marker serializes as the literal string "," so an explicitly
// empty row round-trips through serialized dictionaries.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CellValue::Int(v) => serializer.serialize_i64(*v),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Comma => serializer.serialize_str(","),
        }
    }
}

/// One reduced data row
pub type Row = Vec<CellValue>;

/// A typed keyword-line parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
    /// Bare flag parameter, present without a value
    Flag,
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, ParamValue::Flag)
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ParamValue::Int(v) => serializer.serialize_i64(*v),
            ParamValue::Float(v) => serializer.serialize_f64(*v),
            ParamValue::Text(s) => serializer.serialize_str(s),
            ParamValue::Flag => serializer.serialize_bool(true),
        }
    }
}

/// One reduced section: normalized keyword, lookup identifier, typed
/// parameters and typed data rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReducedSection {
    /// Normalized keyword: upper-cased, multi-word joined with one space
    pub keyword: String,
    /// Lookup identifier: normalized keyword + raw parameter text
    pub identifier: String,
    /// Parameter map; names upper-cased, later duplicates within the line win
    pub params: FxHashMap<String, ParamValue>,
    pub rows: Vec<Row>,
}

/// The reduced deck: identifier-keyed sections plus their first-seen order.
///
/// Replacement on collision keeps the original position, so iteration is
/// deterministic and matches source order for non-colliding decks.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReducedDeck {
    sections: FxHashMap<String, ReducedSection>,
    order: Vec<String>,
}

impl ReducedDeck {
    pub fn get(&self, identifier: &str) -> Option<&ReducedSection> {
        self.sections.get(identifier)
    }

    /// Section identifiers in first-seen order
    pub fn identifiers(&self) -> &[String] {
        &self.order
    }

    /// Iterate sections in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &ReducedSection> {
        self.order.iter().filter_map(|id| self.sections.get(id))
    }

    /// Consume the deck, yielding sections in first-seen order
    pub fn into_ordered(mut self) -> Vec<ReducedSection> {
        let mut out = Vec::with_capacity(self.order.len());
        for identifier in &self.order {
            if let Some(section) = self.sections.remove(identifier) {
                out.push(section);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn insert(&mut self, section: ReducedSection) {
        if !self.sections.contains_key(&section.identifier) {
            self.order.push(section.identifier.clone());
        }
        self.sections.insert(section.identifier.clone(), section);
    }
}

/// Reduce a parse tree to the identifier-keyed section map
pub fn reduce(doc: &Document) -> ReducedDeck {
    let mut deck = ReducedDeck::default();
    for section in &doc.sections {
        deck.insert(reduce_section(&section.header, &section.rows));
    }
    deck
}

fn reduce_section(header: &KeywordLine, rows: &[Vec<Token>]) -> ReducedSection {
    let keyword = normalize_keyword(&header.words);
    let identifier = format!("{}{}", keyword, header.raw_params);

    let mut params = FxHashMap::default();
    for param in &header.params {
        params.insert(param.name.to_ascii_uppercase(), reduce_param(&param.value));
    }

    let rows = rows
        .iter()
        .map(|row| row.iter().map(reduce_cell).collect())
        .collect();

    ReducedSection {
        keyword,
        identifier,
        params,
        rows,
    }
}

fn normalize_keyword(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

fn reduce_param(value: &Option<Token>) -> ParamValue {
    match value {
        None => ParamValue::Flag,
        Some(Token::Int(v)) => ParamValue::Int(*v),
        Some(Token::Float(v)) => ParamValue::Float(*v),
        Some(Token::Word(s)) => ParamValue::Text((*s).to_string()),
        // Quoted values lose their delimiters, inner text kept verbatim
        Some(Token::Quoted(s)) => ParamValue::Text((*s).to_string()),
        Some(Token::Comma) => ParamValue::Flag,
    }
}

fn reduce_cell(token: &Token) -> CellValue {
    match token {
        Token::Int(v) => CellValue::Int(*v),
        Token::Float(v) => CellValue::Float(*v),
        Token::Word(s) => CellValue::Text((*s).to_string()),
        Token::Quoted(s) => CellValue::Text((*s).to_string()),
        Token::Comma => CellValue::Comma,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;

    fn reduce_str(content: &str) -> ReducedDeck {
        reduce(&parse_document(content).unwrap())
    }

    #[test]
    fn keyword_normalized_upper_space_joined() {
        let deck = reduce_str("*Solid Section, elset=Part-1\n,\n");
        let section = deck.iter().next().unwrap();
        assert_eq!(section.keyword, "SOLID SECTION");
        assert_eq!(section.identifier, "SOLID SECTION, elset=Part-1");
    }

    #[test]
    fn identifier_distinguishes_parameters() {
        let deck = reduce_str("*ELEMENT, TYPE=S3\n1, 1, 2, 3\n*ELEMENT, TYPE=C3D4\n2, 1, 2, 3, 4\n");
        assert_eq!(deck.len(), 2);
        assert!(deck.get("ELEMENT, TYPE=S3").is_some());
        assert!(deck.get("ELEMENT, TYPE=C3D4").is_some());
    }

    #[test]
    fn identical_keyword_lines_collide_later_wins() {
        let deck = reduce_str("*BOUNDARY\n1, 1, 1\n*BOUNDARY\n2, 2, 2\n");
        assert_eq!(deck.len(), 1);
        let section = deck.get("BOUNDARY").unwrap();
        assert_eq!(section.rows, vec![vec![
            CellValue::Int(2),
            CellValue::Int(2),
            CellValue::Int(2),
        ]]);
    }

    #[test]
    fn params_typed_and_upper_cased() {
        let deck = reduce_str("*MATERIAL, NAME=\"Steel-1\"\n*STATIC, DIRECT\n*DENSITY, scale=2.5, count=3\n");
        let material = deck.get("MATERIAL, NAME=\"Steel-1\"").unwrap();
        assert_eq!(
            material.params.get("NAME"),
            Some(&ParamValue::Text("Steel-1".to_string()))
        );
        let static_section = deck.get("STATIC, DIRECT").unwrap();
        assert!(static_section.params.get("DIRECT").unwrap().is_flag());
        let density = deck.get("DENSITY, scale=2.5, count=3").unwrap();
        assert_eq!(density.params.get("SCALE"), Some(&ParamValue::Float(2.5)));
        assert_eq!(density.params.get("COUNT"), Some(&ParamValue::Int(3)));
    }

    #[test]
    fn duplicate_param_on_one_line_later_wins() {
        let deck = reduce_str("*BOUNDARY, OP=NEW, OP=MOD\n");
        let section = deck.get("BOUNDARY, OP=NEW, OP=MOD").unwrap();
        assert_eq!(
            section.params.get("OP"),
            Some(&ParamValue::Text("MOD".to_string()))
        );
    }

    #[test]
    fn rows_typed_in_place() {
        let deck = reduce_str("*NODE\n1, 0.5, -2, edge-a\n");
        let section = deck.get("NODE").unwrap();
        assert_eq!(
            section.rows[0],
            vec![
                CellValue::Int(1),
                CellValue::Float(0.5),
                CellValue::Int(-2),
                CellValue::Text("edge-a".to_string()),
            ]
        );
    }

    #[test]
    fn lone_comma_row_is_never_empty() {
        let deck = reduce_str("*Solid Section, elset=Part-1, material=Steel\n,\n");
        let section = deck.iter().next().unwrap();
        assert_eq!(section.rows, vec![vec![CellValue::Comma]]);
    }

    #[test]
    fn first_seen_order_survives_collision() {
        let deck = reduce_str("*NODE\n1, 0.0, 0.0\n*BOUNDARY\n1, 1\n*NODE\n2, 1.0, 1.0\n");
        let order: Vec<&str> = deck.identifiers().iter().map(String::as_str).collect();
        assert_eq!(order, ["NODE", "BOUNDARY"]);
        // the colliding NODE keeps its first position but the later payload
        assert_eq!(deck.get("NODE").unwrap().rows[0][0], CellValue::Int(2));
    }

    #[test]
    fn id_coercion_is_tolerant() {
        assert_eq!(CellValue::Int(7).as_id(), Some(7));
        assert_eq!(CellValue::Float(7.9).as_id(), Some(7));
        assert_eq!(CellValue::Text("12".to_string()).as_id(), Some(12));
        assert_eq!(CellValue::Text("12.0".to_string()).as_id(), Some(12));
        assert_eq!(CellValue::Text("abc".to_string()).as_id(), None);
        assert_eq!(CellValue::Comma.as_id(), None);
    }
}
