//! serializing a [`Mesh`] back to the SU2 text grammar
//!
//! Export is normalizing, not an identity transform: points referenced
//! by no element or marker element are dropped and the surviving points
//! are renumbered densely in their original relative order, with every
//! element and marker vertex index remapped to match. `parse(export(m))`
//! therefore yields the minimal mesh containing exactly the reachable
//! points, with all connectivity preserved.

use crate::prelude::*;

/// Any fatal condition encountered while rendering a mesh. The whole
/// mesh is rendered to memory before a single byte is written, so a
/// failed export never leaves a truncated file behind.
#[derive(Debug, thiserror::Error, From)]
pub enum ExportError {
    #[error("{0}")]
    InconsistentMarker(InconsistentMarker),
    #[error("io error while writing mesh: {0}")]
    Io(std::io::Error),
}

/// A marker element without an explicit boundary type that cannot fall
/// back to the 2-vertex `LINE` assumption.
#[derive(From, Display, Debug, Constructor)]
#[display(
    fmt = "zone {izone}: marker `{tag}` element {element} has {vertices} vertices \
           and no explicit boundary type; only 2-vertex elements default to LINE"
)]
pub struct InconsistentMarker {
    pub(crate) izone: u32,
    pub(crate) tag: String,
    pub(crate) element: usize,
    pub(crate) vertices: usize,
}

/// Write a mesh to a `Write` in SU2 text form. The output is fully
/// rendered and validated in memory first.
pub fn write_su2<W: Write>(mut writer: W, mesh: &Mesh) -> Result<(), ExportError> {
    let text = to_su2_string(mesh)?;
    writer.write_all(text.as_bytes())?;

    Ok(())
}

/// Write a mesh to a file path. The file is only created once the whole
/// mesh has rendered successfully.
pub fn export_su2<P: AsRef<std::path::Path>>(path: P, mesh: &Mesh) -> Result<(), Error> {
    let text = to_su2_string(mesh)?;
    std::fs::write(path, text)?;

    Ok(())
}

/// Render a mesh to SU2 text.
///
/// `NZONE=` and the per-zone `IZONE=` lines appear only for multi-zone
/// meshes, mirroring the parser's acceptance of headerless single-zone
/// files. Markers serialize in insertion order.
pub fn to_su2_string(mesh: &Mesh) -> Result<String, ExportError> {
    let mut out = String::new();

    if mesh.nzone() > 1 {
        out.push_str(&format!("NZONE= {}\n", mesh.nzone()));
    }

    for zone in mesh.zones() {
        if mesh.nzone() > 1 {
            out.push_str(&format!("IZONE= {}\n", zone.izone()));
        }
        write_zone(&mut out, zone)?;
    }

    Ok(out)
}

fn write_zone(out: &mut String, zone: &Zone) -> Result<(), ExportError> {
    let (kept, remap) = prune_points(zone);

    out.push_str(&format!("NDIME= {}\n", zone.ndime()));

    out.push_str(&format!("NPOIN= {}\n", kept.len()));
    let points = zone.points();
    let mut buffer = ryu::Buffer::new();
    for (position, original) in kept.iter().enumerate() {
        let row = points.row(*original);
        out.push_str(buffer.format(row[0]));
        out.push(' ');
        out.push_str(buffer.format(row[1]));
        if zone.ndime() == 3 {
            out.push(' ');
            out.push_str(buffer.format(row[2]));
        }
        out.push_str(&format!(" {position}\n"));
    }

    out.push_str(&format!("NELEM= {}\n", zone.nelem()));
    for (position, (ty, vertices)) in zone.elements().enumerate() {
        out.push_str(&ty.code().to_string());
        for vertex in vertices {
            out.push_str(&format!(" {}", remap[*vertex as usize]));
        }
        out.push_str(&format!(" {position}\n"));
    }

    out.push_str(&format!("NMARK= {}\n", zone.nmark()));
    for (tag, marker) in zone.markers() {
        out.push_str(&format!("MARKER_TAG= {tag}\n"));
        out.push_str(&format!("MARKER_ELEMS= {}\n", marker.nelem()));

        for (element, (ty, vertices)) in marker.elements().enumerate() {
            let code = match ty {
                Some(ty) => ty.code(),
                None if vertices.len() == 2 => ElementType::Line.code(),
                None => {
                    return Err(InconsistentMarker::new(
                        zone.izone(),
                        tag.clone(),
                        element,
                        vertices.len(),
                    )
                    .into())
                }
            };

            out.push_str(&code.to_string());
            for vertex in vertices {
                out.push_str(&format!(" {}", remap[*vertex as usize]));
            }
            out.push('\n');
        }
    }

    Ok(())
}

/// Determine which points survive export: anything referenced by an
/// interior element or a marker element. Returns the kept original
/// indices (in original relative order) and the old index → new index
/// remap table. Entries for dropped points are never read back because
/// the zone invariants guarantee all connectivity stays within the
/// referenced set.
fn prune_points(zone: &Zone) -> (Vec<usize>, Vec<u32>) {
    let npoin = zone.npoin();
    let mut referenced = vec![false; npoin];

    for index in zone.indices() {
        referenced[*index as usize] = true;
    }
    for marker in zone.markers().values() {
        for index in marker.indices() {
            referenced[*index as usize] = true;
        }
    }

    let mut kept = Vec::with_capacity(npoin);
    let mut remap = vec![0_u32; npoin];
    for (original, flag) in referenced.iter().enumerate() {
        if *flag {
            remap[original] = kept.len() as u32;
            kept.push(original);
        }
    }

    if kept.len() < npoin {
        log::debug!(
            "zone {}: dropping {} point(s) referenced by no element",
            zone.izone(),
            npoin - kept.len()
        );
    }

    (kept, remap)
}
