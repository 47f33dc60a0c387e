#![doc = include_str!("../README.md")]

pub mod combine;
pub mod element;
pub mod mesh;
pub mod parse;
pub mod prelude;
mod write_su2;

pub use element::CellTypeBridge;
pub use element::ElementType;
pub use element::UnknownElementType;

pub use mesh::{Marker, Mesh, MeshError, Zone};

pub use combine::combine_meshes;

pub use parse::parse_su2;
pub use parse::read_su2;

pub use write_su2::export_su2;
pub use write_su2::to_su2_string;
pub use write_su2::write_su2;
pub use write_su2::{ExportError, InconsistentMarker};

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while parsing SU2 mesh: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Error while exporting SU2 mesh: {0}")]
    Export(#[from] write_su2::ExportError),
    #[error("Invalid mesh structure: `{0}`")]
    Mesh(#[from] mesh::MeshError),
}
