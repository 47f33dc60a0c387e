//! The closed catalog of SU2 element shapes and the optional bridge to a
//! foreign cell-type numbering.

use std::collections::HashMap;

/// Error returned when a type code falls outside the closed SU2 catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown SU2 element type code `{0}`")]
pub struct UnknownElementType(pub u32);

/// One of the cell shapes the SU2 format can describe.
///
/// Each shape is bound to a fixed vertex count, which is what makes
/// element and marker rows self-describing: the leading type code of a
/// row determines how many vertex fields follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Line,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Hexahedron,
    Prism,
    Pyramid,
}

impl ElementType {
    /// Every supported shape, in ascending code order.
    pub const ALL: [ElementType; 7] = [
        ElementType::Line,
        ElementType::Triangle,
        ElementType::Quadrilateral,
        ElementType::Tetrahedron,
        ElementType::Hexahedron,
        ElementType::Prism,
        ElementType::Pyramid,
    ];

    /// Resolve an on-disk type code to its shape.
    pub fn from_code(code: u32) -> Result<ElementType, UnknownElementType> {
        let ty = match code {
            3 => ElementType::Line,
            5 => ElementType::Triangle,
            9 => ElementType::Quadrilateral,
            10 => ElementType::Tetrahedron,
            12 => ElementType::Hexahedron,
            13 => ElementType::Prism,
            14 => ElementType::Pyramid,
            _ => return Err(UnknownElementType(code)),
        };

        Ok(ty)
    }

    /// The type code written to / read from `.su2` files. Inverse of
    /// [`from_code`](`ElementType::from_code`).
    pub fn code(self) -> u32 {
        match self {
            ElementType::Line => 3,
            ElementType::Triangle => 5,
            ElementType::Quadrilateral => 9,
            ElementType::Tetrahedron => 10,
            ElementType::Hexahedron => 12,
            ElementType::Prism => 13,
            ElementType::Pyramid => 14,
        }
    }

    /// Number of vertex indices an element of this shape carries.
    pub fn vertex_count(self) -> usize {
        match self {
            ElementType::Line => 2,
            ElementType::Triangle => 3,
            ElementType::Quadrilateral => 4,
            ElementType::Tetrahedron => 4,
            ElementType::Hexahedron => 8,
            ElementType::Prism => 6,
            ElementType::Pyramid => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ElementType::Line => "line",
            ElementType::Triangle => "triangle",
            ElementType::Quadrilateral => "quadrilateral",
            ElementType::Tetrahedron => "tetrahedron",
            ElementType::Hexahedron => "hexahedron",
            ElementType::Prism => "prism",
            ElementType::Pyramid => "pyramid",
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertex count for a raw type code.
///
/// Both the parser and the exporter consult this before slicing the rest
/// of a row, so the row width is dictated by the leading code and never
/// inferred from surrounding whitespace.
pub fn vertex_count(code: u32) -> Result<usize, UnknownElementType> {
    ElementType::from_code(code).map(ElementType::vertex_count)
}

/// Bidirectional lookup table between [`ElementType`] and a foreign
/// generic cell-type numbering (for example VTK's).
///
/// The table is supplied by the caller; nothing in the parser or
/// exporter requires one. The reverse direction is derived from the
/// forward pairs so the two can never disagree.
#[derive(Debug, Clone, Default)]
pub struct CellTypeBridge {
    forward: HashMap<ElementType, u32>,
    reverse: HashMap<u32, ElementType>,
}

impl CellTypeBridge {
    /// Build a bridge from `(shape, foreign code)` pairs. A shape listed
    /// twice keeps its last pairing.
    pub fn from_pairs<I>(pairs: I) -> CellTypeBridge
    where
        I: IntoIterator<Item = (ElementType, u32)>,
    {
        let forward: HashMap<ElementType, u32> = pairs.into_iter().collect();
        let reverse = forward.iter().map(|(ty, code)| (*code, *ty)).collect();

        CellTypeBridge { forward, reverse }
    }

    pub fn to_foreign(&self, ty: ElementType) -> Option<u32> {
        self.forward.get(&ty).copied()
    }

    pub fn from_foreign(&self, code: u32) -> Option<ElementType> {
        self.reverse.get(&code).copied()
    }
}
