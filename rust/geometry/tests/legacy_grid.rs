// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full-document output checks for the legacy unstructured-grid writer.

use inp_lite_geometry::{write_legacy, MeshSink};

fn build_two_element_mesh() -> MeshSink {
    let mut sink = MeshSink::new();
    sink.add_node(5, 0.0, 0.0, 0.0);
    sink.add_node(6, 1.0, 0.0, 0.0);
    sink.add_node(7, 0.0, 1.0, 0.0);
    sink.add_node(8, 0.0, 0.0, 1.0);

    sink.set_element_type("TYPE=S3");
    sink.add_element(1, &[5, 6, 7]);
    sink.set_element_type("TYPE=C3D4");
    sink.add_element(2, &[5, 6, 7, 8]);
    sink
}

#[test]
fn golden_document() {
    let sink = build_two_element_mesh();
    let mut buffer = Vec::new();
    write_legacy(&sink, &mut buffer).unwrap();
    let output = String::from_utf8(buffer).unwrap();

    let expected = "\
# vtk DataFile Version 2.0
Keyword deck mesh
ASCII

DATASET UNSTRUCTURED_GRID
POINTS 4 float
0.000000e+00 0.000000e+00 0.000000e+00
1.000000e+00 0.000000e+00 0.000000e+00
0.000000e+00 1.000000e+00 0.000000e+00
0.000000e+00 0.000000e+00 1.000000e+00

CELLS 2 9
3 0 1 2
4 0 1 2 3

CELL_TYPES 2
5
10

POINT_DATA 4
SCALARS OriginalNodeID int 1
LOOKUP_TABLE default
5
6
7
8

CELL_DATA 2
SCALARS OriginalElementID int 1
LOOKUP_TABLE default
1
2
";
    assert_eq!(output, expected);
}

#[test]
fn output_is_deterministic() {
    let mut first = Vec::new();
    let mut second = Vec::new();
    write_legacy(&build_two_element_mesh(), &mut first).unwrap();
    write_legacy(&build_two_element_mesh(), &mut second).unwrap();
    assert_eq!(first, second);
}
