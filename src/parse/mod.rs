//! reading and parsing SU2 mesh files
//!
//! The grammar is line oriented and self-describing: element and marker
//! rows open with a type code whose registry arity dictates how many
//! vertex fields follow, so stray tabs or repeated spaces never change
//! the meaning of a row.

mod error;

pub use error::ParseError;
pub use error::RowKind;

use error::{
    IncompleteZone, MalformedDetail, MalformedRow, MissingHeader, UnknownElementType,
    ZoneCountMismatch,
};

use crate::prelude::*;

/// read in and parse an entire mesh for a given path
pub fn read_su2<P: AsRef<std::path::Path>>(path: P) -> Result<Mesh, Error> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);

    parse_su2(reader).map_err(Into::into)
}

/// Parse an `.su2` text stream into a [`Mesh`].
///
/// Single forward pass. Any failure is fatal and carries the 1-based
/// line number, the zone under construction, and the kind of row the
/// parser was expecting.
pub fn parse_su2<R: BufRead>(reader: R) -> Result<Mesh, ParseError> {
    let mut ctx = ParserContext::default();
    let mut lineno = 0;

    for line in reader.lines() {
        let line = line?;
        lineno += 1;

        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        dispatch_line(&mut ctx, line, lineno)?;
    }

    // the final in-progress zone is flushed exactly like one terminated
    // by a following NDIME= key; forgetting this drops the last zone
    if ctx.zone.ndime.is_some() || ctx.zones.is_empty() {
        flush_zone(&mut ctx, lineno)?;
    }

    if let Some(declared) = ctx.declared_nzone {
        if declared != ctx.zones.len() {
            return Err(ZoneCountMismatch::new(declared, ctx.zones.len()).into());
        }
    }

    Ok(Mesh::new(ctx.zones))
}

/// All scan state for one pass over the input. The per-zone accumulator
/// is taken and reset whenever an `NDIME=` key flushes the zone under
/// construction.
#[derive(Default)]
struct ParserContext {
    declared_nzone: Option<usize>,
    zones: Vec<Zone>,
    zone: ZoneAccumulator,
}

impl ParserContext {
    /// 1-based index of the zone currently being accumulated.
    fn izone(&self) -> u32 {
        self.zones.len() as u32 + 1
    }
}

/// Accumulators for the zone currently being read. The `*_read` fields
/// are the armed row counters: `Some(n)` means n rows of that kind have
/// been read and more are expected; reaching the declared count disarms
/// the counter back to `None`.
#[derive(Default)]
struct ZoneAccumulator {
    ndime: Option<u32>,
    npoin: Option<usize>,
    nelem: Option<usize>,
    coords: Vec<f64>,
    points_read: Option<usize>,
    element_types: Vec<ElementType>,
    indices: Vec<u32>,
    elements_read: Option<usize>,
    markers: IndexMap<String, MarkerAccumulator>,
    marker_tag: Option<String>,
    marker_declared: Option<usize>,
    marker_read: Option<usize>,
}

#[derive(Default)]
struct MarkerAccumulator {
    types: Vec<ElementType>,
    indices: Vec<u32>,
}

fn dispatch_line(ctx: &mut ParserContext, line: &str, lineno: usize) -> Result<(), ParseError> {
    let izone = ctx.izone();

    if let Some(value) = line.strip_prefix("NZONE=") {
        ctx.declared_nzone = Some(header_usize(value, lineno, izone)?);
    } else if let Some(value) = line.strip_prefix("IZONE=") {
        // accepted for compatibility; zones are renumbered in file order
        let declared = header_usize(value, lineno, izone)?;
        log::trace!("line {lineno}: IZONE= {declared} noted, zone will be numbered {izone}");
    } else if let Some(value) = line.strip_prefix("NDIME=") {
        let ndime = header_u32(value, lineno, izone)?;
        if ctx.zone.ndime.is_some() {
            flush_zone(ctx, lineno)?;
        }
        ctx.zone.ndime = Some(ndime);
    } else if let Some(value) = line.strip_prefix("NPOIN=") {
        if ctx.zone.ndime.is_none() {
            return Err(MissingHeader::new(lineno, izone, RowKind::Point, "NDIME=").into());
        }
        let npoin = header_usize(value, lineno, izone)?;
        ctx.zone.npoin = Some(npoin);
        ctx.zone.coords = Vec::with_capacity(npoin * 3);
        ctx.zone.points_read = if npoin > 0 { Some(0) } else { None };
    } else if let Some(value) = line.strip_prefix("NELEM=") {
        let nelem = header_usize(value, lineno, izone)?;
        ctx.zone.nelem = Some(nelem);
        ctx.zone.elements_read = if nelem > 0 { Some(0) } else { None };
    } else if let Some(value) = line.strip_prefix("NMARK=") {
        // redundant with the number of MARKER_TAG= sections that follow
        let _ = header_usize(value, lineno, izone)?;
    } else if let Some(value) = line.strip_prefix("MARKER_TAG=") {
        let tag = first_token(value, lineno, izone)?.to_string();
        ctx.zone.markers.entry(tag.clone()).or_default();
        ctx.zone.marker_tag = Some(tag);
    } else if let Some(value) = line.strip_prefix("MARKER_ELEMS=") {
        if ctx.zone.marker_tag.is_none() {
            return Err(MissingHeader::new(lineno, izone, RowKind::Marker, "MARKER_TAG=").into());
        }
        let count = header_usize(value, lineno, izone)?;
        ctx.zone.marker_declared = Some(count);
        ctx.zone.marker_read = if count > 0 { Some(0) } else { None };
    } else {
        data_row(ctx, line, lineno)?;
    }

    Ok(())
}

fn data_row(ctx: &mut ParserContext, line: &str, lineno: usize) -> Result<(), ParseError> {
    let izone = ctx.izone();
    let zone = &mut ctx.zone;

    if zone.points_read.is_some() {
        point_row(zone, line, lineno, izone)
    } else if zone.elements_read.is_some() {
        element_row(zone, line, lineno, izone)
    } else if zone.marker_read.is_some() {
        marker_row(zone, line, lineno, izone)
    } else {
        Err(MissingHeader::new(lineno, izone, RowKind::Data, "NPOIN=/NELEM=/MARKER_ELEMS=").into())
    }
}

fn point_row(
    zone: &mut ZoneAccumulator,
    line: &str,
    lineno: usize,
    izone: u32,
) -> Result<(), ParseError> {
    let ndime = match zone.ndime {
        Some(n) => n,
        None => return Err(MissingHeader::new(lineno, izone, RowKind::Point, "NDIME=").into()),
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let ncoord = if ndime == 2 { 2 } else { 3 };

    // the row carries ndime coordinates plus a redundant trailing index
    if tokens.len() < ncoord + 1 {
        let detail = MalformedDetail::FieldCount {
            expected: ncoord + 1,
            actual: tokens.len(),
        };
        return Err(MalformedRow::new(lineno, izone, RowKind::Point, detail).into());
    }

    for token in &tokens[..ncoord] {
        let coord: f64 = token.parse().map_err(|_| {
            MalformedRow::new(
                lineno,
                izone,
                RowKind::Point,
                MalformedDetail::Real(token.to_string()),
            )
        })?;
        zone.coords.push(coord);
    }

    if ndime == 2 {
        // structural zero, not a physical coordinate
        zone.coords.push(0.0);
    }

    bump_counter(&mut zone.points_read, zone.npoin);

    Ok(())
}

fn element_row(
    zone: &mut ZoneAccumulator,
    line: &str,
    lineno: usize,
    izone: u32,
) -> Result<(), ParseError> {
    let (ty, vertices) = typed_row(line, lineno, izone, RowKind::Element)?;

    zone.element_types.push(ty);
    zone.indices.extend_from_slice(&vertices);

    bump_counter(&mut zone.elements_read, zone.nelem);

    Ok(())
}

fn marker_row(
    zone: &mut ZoneAccumulator,
    line: &str,
    lineno: usize,
    izone: u32,
) -> Result<(), ParseError> {
    let tag = match &zone.marker_tag {
        Some(tag) => tag.clone(),
        None => {
            return Err(MissingHeader::new(lineno, izone, RowKind::Marker, "MARKER_TAG=").into())
        }
    };

    let (ty, vertices) = typed_row(line, lineno, izone, RowKind::Marker)?;

    let marker = zone.markers.entry(tag).or_default();
    marker.types.push(ty);
    marker.indices.extend_from_slice(&vertices);

    bump_counter(&mut zone.marker_read, zone.marker_declared);

    Ok(())
}

/// Parse a row whose width is dictated by its leading type code: resolve
/// the code through the registry first, then slice exactly that many
/// vertex fields. Anything after them (the redundant element index on
/// interior rows) is discarded.
fn typed_row(
    line: &str,
    lineno: usize,
    izone: u32,
    row: RowKind,
) -> Result<(ElementType, Vec<u32>), ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let code: u32 = tokens[0].parse().map_err(|_| {
        MalformedRow::new(
            lineno,
            izone,
            row,
            MalformedDetail::Integer(tokens[0].to_string()),
        )
    })?;

    let ty = ElementType::from_code(code)
        .map_err(|e| UnknownElementType::new(lineno, izone, row, e.0))?;

    let arity = ty.vertex_count();
    if tokens.len() < arity + 1 {
        let detail = MalformedDetail::FieldCount {
            expected: arity + 1,
            actual: tokens.len(),
        };
        return Err(MalformedRow::new(lineno, izone, row, detail).into());
    }

    let mut vertices = Vec::with_capacity(arity);
    for token in &tokens[1..=arity] {
        let index: u32 = token.parse().map_err(|_| {
            MalformedRow::new(lineno, izone, row, MalformedDetail::Integer(token.to_string()))
        })?;
        vertices.push(index);
    }

    Ok((ty, vertices))
}

/// Advance an armed row counter, disarming it once the declared count is
/// reached.
fn bump_counter(counter: &mut Option<usize>, declared: Option<usize>) {
    if let Some(read) = *counter {
        let read = read + 1;
        *counter = match declared {
            Some(declared) if read >= declared => None,
            _ => Some(read),
        };
    }
}

/// Finalize the accumulated zone and append it to the mesh, resetting
/// every per-zone accumulator for the next one.
fn flush_zone(ctx: &mut ParserContext, lineno: usize) -> Result<(), ParseError> {
    let izone = ctx.izone();
    let zone = std::mem::take(&mut ctx.zone);

    if let Some(read) = zone.points_read {
        let declared = zone.npoin.unwrap_or(read);
        return Err(IncompleteZone::new(lineno, izone, RowKind::Point, read, declared).into());
    }
    if let Some(read) = zone.elements_read {
        let declared = zone.nelem.unwrap_or(read);
        return Err(IncompleteZone::new(lineno, izone, RowKind::Element, read, declared).into());
    }
    if let Some(read) = zone.marker_read {
        let declared = zone.marker_declared.unwrap_or(read);
        return Err(IncompleteZone::new(lineno, izone, RowKind::Marker, read, declared).into());
    }

    let ndime = match zone.ndime {
        Some(n) => n,
        None => return Err(MissingHeader::new(lineno, izone, RowKind::Data, "NDIME=").into()),
    };
    let npoin = match zone.npoin {
        Some(n) => n,
        None => return Err(MissingHeader::new(lineno, izone, RowKind::Point, "NPOIN=").into()),
    };
    if zone.nelem.is_none() {
        return Err(MissingHeader::new(lineno, izone, RowKind::Element, "NELEM=").into());
    }

    let points = Array2::from_shape_vec((npoin, 3), zone.coords).map_err(|_| {
        ParseError::Mesh(MeshError::BadPointShape {
            izone,
            columns: 3,
        })
    })?;

    let markers = zone
        .markers
        .into_iter()
        .map(|(tag, acc)| (tag, Marker::with_types(acc.types, acc.indices)))
        .collect();

    let built = Zone::new(
        izone,
        ndime,
        points,
        zone.element_types,
        zone.indices,
        markers,
    )?;

    log::debug!(
        "finalized zone {izone}: ndime={ndime} npoin={} nelem={} nmark={}",
        built.npoin(),
        built.nelem(),
        built.nmark()
    );

    ctx.zones.push(built);

    Ok(())
}

fn first_token<'a>(value: &'a str, lineno: usize, izone: u32) -> Result<&'a str, ParseError> {
    value.split_whitespace().next().ok_or_else(|| {
        MalformedRow::new(
            lineno,
            izone,
            RowKind::Header,
            MalformedDetail::FieldCount {
                expected: 2,
                actual: 1,
            },
        )
        .into()
    })
}

fn header_usize(value: &str, lineno: usize, izone: u32) -> Result<usize, ParseError> {
    let token = first_token(value, lineno, izone)?;
    token.parse().map_err(|_| {
        MalformedRow::new(
            lineno,
            izone,
            RowKind::Header,
            MalformedDetail::Integer(token.to_string()),
        )
        .into()
    })
}

fn header_u32(value: &str, lineno: usize, izone: u32) -> Result<u32, ParseError> {
    let token = first_token(value, lineno, izone)?;
    token.parse().map_err(|_| {
        MalformedRow::new(
            lineno,
            izone,
            RowKind::Header,
            MalformedDetail::Integer(token.to_string()),
        )
        .into()
    })
}
