use crate::prelude::*;

/// Any fatal condition encountered while parsing an `.su2` stream. A
/// failed parse never yields a partial [`Mesh`](`crate::Mesh`).
#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("{0}")]
    MissingHeader(MissingHeader),
    #[error("{0}")]
    UnknownElementType(UnknownElementType),
    #[error("{0}")]
    MalformedRow(MalformedRow),
    #[error("{0}")]
    IncompleteZone(IncompleteZone),
    #[error("{0}")]
    ZoneCountMismatch(ZoneCountMismatch),
    #[error("invalid zone assembled from input: {0}")]
    Mesh(MeshError),
    #[error("io error while reading mesh: {0}")]
    Io(std::io::Error),
}

/// What kind of row the parser was handling when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RowKind {
    #[display(fmt = "point")]
    Point,
    #[display(fmt = "element")]
    Element,
    #[display(fmt = "marker")]
    Marker,
    #[display(fmt = "header")]
    Header,
    #[display(fmt = "data")]
    Data,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "line {line}: {row} data in zone {izone} requires a prior `{key}` header")]
pub struct MissingHeader {
    pub(crate) line: usize,
    pub(crate) izone: u32,
    pub(crate) row: RowKind,
    pub(crate) key: &'static str,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "line {line}: {row} row in zone {izone} uses unknown element type code `{code}`")]
pub struct UnknownElementType {
    pub(crate) line: usize,
    pub(crate) izone: u32,
    pub(crate) row: RowKind,
    pub(crate) code: u32,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "line {line}: malformed {row} row in zone {izone}: {detail}")]
pub struct MalformedRow {
    pub(crate) line: usize,
    pub(crate) izone: u32,
    pub(crate) row: RowKind,
    pub(crate) detail: MalformedDetail,
}

#[derive(Display, Debug)]
pub enum MalformedDetail {
    #[display(fmt = "{actual} fields where at least {expected} were expected")]
    FieldCount { expected: usize, actual: usize },
    #[display(fmt = "field `{_0}` is not a valid integer")]
    Integer(String),
    #[display(fmt = "field `{_0}` is not a valid real number")]
    Real(String),
}

#[derive(From, Display, Debug, Constructor)]
#[display(
    fmt = "line {line}: input ended while zone {izone} was still expecting \
           {row} rows ({seen} of {declared} read)"
)]
pub struct IncompleteZone {
    pub(crate) line: usize,
    pub(crate) izone: u32,
    pub(crate) row: RowKind,
    pub(crate) seen: usize,
    pub(crate) declared: usize,
}

#[derive(From, Display, Debug, Constructor)]
#[display(fmt = "file declares NZONE= {declared} but contains {actual} zones")]
pub struct ZoneCountMismatch {
    pub(crate) declared: usize,
    pub(crate) actual: usize,
}
