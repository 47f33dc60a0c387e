use su2fmt::{combine_meshes, parse_su2, to_su2_string, ElementType};

const SINGLE_ZONE_2D: &str = "\
NDIME= 2
NPOIN= 4
0.0000000000 0.0000000000 0
1.0000000000 0.0000000000 1
1.0000000000 1.0000000000 2
0.0000000000 1.0000000000 3
NELEM= 2
5 0 1 2 0
5 0 2 3 1
NMARK= 2
MARKER_TAG= wall
MARKER_ELEMS= 2
3 0 1
3 2 3
MARKER_TAG= inlet
MARKER_ELEMS= 1
3 1 2
";

#[test]
fn single_zone_scenario_counts() {
    let mesh = parse_su2(SINGLE_ZONE_2D.as_bytes()).unwrap();

    assert_eq!(mesh.nzone(), 1);
    let zone = &mesh.zones()[0];
    assert_eq!(zone.ndime(), 2);
    assert_eq!(zone.npoin(), 4);
    assert_eq!(zone.nelem(), 2);
    assert_eq!(zone.nmark(), 2);

    assert_eq!(zone.marker("wall").unwrap().nelem(), 2);
    assert_eq!(zone.marker("inlet").unwrap().nelem(), 1);
    assert!(zone
        .element_types()
        .iter()
        .all(|ty| *ty == ElementType::Triangle));
}

#[test]
fn round_trip_preserves_structure() {
    let mesh = parse_su2(SINGLE_ZONE_2D.as_bytes()).unwrap();

    let text = to_su2_string(&mesh).unwrap();
    let again = parse_su2(text.as_bytes()).unwrap();

    // no orphan points, so the normalizing round trip is the identity
    assert_eq!(mesh, again);
}

#[test]
fn export_is_idempotent_after_one_normalization() {
    let mesh = parse_su2(SINGLE_ZONE_2D.as_bytes()).unwrap();

    let once = to_su2_string(&mesh).unwrap();
    let normalized = parse_su2(once.as_bytes()).unwrap();
    let twice = to_su2_string(&normalized).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn two_dimensional_round_trip_re_emits_two_coordinates() {
    let mesh = parse_su2(SINGLE_ZONE_2D.as_bytes()).unwrap();

    // in memory: always 3 components, z structurally zero
    let points = mesh.zones()[0].points();
    assert_eq!(points.ncols(), 3);
    assert!(points.column(2).iter().all(|z| *z == 0.0));

    // on the wire: 2 coordinates plus the trailing index
    let text = to_su2_string(&mesh).unwrap();
    let point_row = text.lines().nth(2).unwrap();
    assert_eq!(point_row.split_whitespace().count(), 3);
}

#[test]
fn orphan_points_removed_by_round_trip() {
    // points 4 and 5 are referenced by nothing
    let input = "\
NDIME= 2
NPOIN= 6
0.0 0.0 0
1.0 0.0 1
1.0 1.0 2
0.0 1.0 3
5.0 5.0 4
6.0 6.0 5
NELEM= 2
5 0 1 2 0
5 0 2 3 1
NMARK= 1
MARKER_TAG= wall
MARKER_ELEMS= 1
3 0 1
";
    let mesh = parse_su2(input.as_bytes()).unwrap();
    assert_eq!(mesh.zones()[0].npoin(), 6);

    let text = to_su2_string(&mesh).unwrap();
    let pruned = parse_su2(text.as_bytes()).unwrap();
    let zone = &pruned.zones()[0];

    assert_eq!(zone.npoin(), 4);
    assert_eq!(zone.nelem(), 2);
    assert!(zone
        .indices()
        .iter()
        .all(|index| (*index as usize) < zone.npoin()));
    assert!(zone
        .marker("wall")
        .unwrap()
        .indices()
        .iter()
        .all(|index| (*index as usize) < zone.npoin()));

    // pruning is stable once applied
    assert_eq!(to_su2_string(&pruned).unwrap(), text);
}

#[test]
fn multizone_parse_and_round_trip() {
    let input = "\
NZONE= 2
IZONE= 1
NDIME= 2
NPOIN= 3
0.0 0.0 0
1.0 0.0 1
0.0 1.0 2
NELEM= 1
5 0 1 2 0
NMARK= 0
IZONE= 2
NDIME= 3
NPOIN= 4
0.0 0.0 0.0 0
1.0 0.0 0.0 1
0.0 1.0 0.0 2
0.0 0.0 1.0 3
NELEM= 1
10 0 1 2 3 0
NMARK= 1
MARKER_TAG= boundary
MARKER_ELEMS= 1
5 0 1 2
";
    let mesh = parse_su2(input.as_bytes()).unwrap();

    assert_eq!(mesh.nzone(), 2);
    assert_eq!(mesh.zones()[0].izone(), 1);
    assert_eq!(mesh.zones()[1].izone(), 2);
    assert_eq!(mesh.zones()[0].ndime(), 2);
    assert_eq!(mesh.zones()[1].ndime(), 3);
    assert_eq!(mesh.zones()[1].marker("boundary").unwrap().nelem(), 1);

    let text = to_su2_string(&mesh).unwrap();
    assert!(text.starts_with("NZONE= 2\n"));

    let again = parse_su2(text.as_bytes()).unwrap();
    assert_eq!(mesh, again);
}

#[test]
fn combined_meshes_round_trip_as_multizone() {
    let a = parse_su2(SINGLE_ZONE_2D.as_bytes()).unwrap();
    let b = parse_su2(SINGLE_ZONE_2D.as_bytes()).unwrap();

    let combined = combine_meshes([a, b]);
    assert_eq!(combined.nzone(), 2);

    let text = to_su2_string(&combined).unwrap();
    let again = parse_su2(text.as_bytes()).unwrap();

    assert_eq!(again.nzone(), 2);
    assert_eq!(again.zones()[0].izone(), 1);
    assert_eq!(again.zones()[1].izone(), 2);
    assert_eq!(combined, again);
}

#[test]
fn mixed_element_types_survive_round_trip() {
    let input = "\
NDIME= 3
NPOIN= 9
0.0 0.0 0.0 0
1.0 0.0 0.0 1
1.0 1.0 0.0 2
0.0 1.0 0.0 3
0.0 0.0 1.0 4
1.0 0.0 1.0 5
1.0 1.0 1.0 6
0.0 1.0 1.0 7
0.5 0.5 2.0 8
NELEM= 2
12 0 1 2 3 4 5 6 7 0
14 4 5 6 7 8 1
NMARK= 0
";
    let mesh = parse_su2(input.as_bytes()).unwrap();
    let zone = &mesh.zones()[0];
    assert_eq!(
        zone.element_types(),
        &[ElementType::Hexahedron, ElementType::Pyramid]
    );

    let again = parse_su2(to_su2_string(&mesh).unwrap().as_bytes()).unwrap();
    assert_eq!(mesh, again);
}
