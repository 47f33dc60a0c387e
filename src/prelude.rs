//! Common traits and types that are useful for working with `su2fmt`
#![allow(unused_imports)]

pub use crate::combine::combine_meshes;
pub use crate::element::{CellTypeBridge, ElementType, UnknownElementType};
pub use crate::mesh::{Marker, Mesh, MeshError, Zone};
pub use crate::parse::{parse_su2, read_su2, ParseError};
pub use crate::write_su2::{export_su2, to_su2_string, write_su2, ExportError, InconsistentMarker};

pub(crate) use crate::Error;
pub(crate) use std::io::{BufRead, Write};

pub(crate) use derive_more::{Constructor, Display, From};

pub(crate) use indexmap::IndexMap;
pub(crate) use ndarray::Array2;
