//! In-memory mesh representation: [`Mesh`], [`Zone`], [`Marker`].
//!
//! Connectivity is stored flat: one index buffer per zone with a parallel
//! element-type list. Per-element vertex counts are always derived from
//! the types, never stored, and [`Zone::elements`] hands out per-element
//! slices lazily so callers needing nested arrays never force a second
//! storage representation.

use crate::prelude::*;

/// Structural violations caught when assembling a mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("zone {izone}: unsupported dimensionality {ndime}, expected 2 or 3")]
    BadDimension { izone: u32, ndime: u32 },
    #[error("zone {izone}: point array must have 3 columns, found {columns}")]
    BadPointShape { izone: u32, columns: usize },
    #[error(
        "zone {izone}: element connectivity holds {actual} indices but the \
         element types require {expected}"
    )]
    ConnectivityLength {
        izone: u32,
        expected: usize,
        actual: usize,
    },
    #[error("zone {izone}: {site} references point {index} but the zone has {npoin} points")]
    IndexOutOfBounds {
        izone: u32,
        site: String,
        index: u32,
        npoin: usize,
    },
    #[error(
        "zone {izone}: marker `{tag}` stores {actual} indices but its \
         element sizes require {expected}"
    )]
    MarkerShape {
        izone: u32,
        tag: String,
        expected: usize,
        actual: usize,
    },
    #[error("zone {izone}: marker `{tag}` carries {types} types for {elements} elements")]
    MarkerTypes {
        izone: u32,
        tag: String,
        types: usize,
        elements: usize,
    },
    #[error("mesh declares {declared} zones but contains {actual}")]
    ZoneCountMismatch { declared: usize, actual: usize },
}

/// A named group of boundary elements within one zone.
///
/// Boundary connectivity uses the same flat layout as interior elements.
/// `types` is either empty (marker assembled without explicit boundary
/// shapes, a legacy construction path) or holds exactly one
/// [`ElementType`] per element; `sizes` always holds the per-element
/// vertex counts so untyped markers remain sliceable.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    indices: Vec<u32>,
    sizes: Vec<usize>,
    types: Vec<ElementType>,
}

impl Marker {
    /// Marker with an explicit shape per boundary element. Vertex counts
    /// are derived from the types.
    pub fn with_types(types: Vec<ElementType>, indices: Vec<u32>) -> Marker {
        let sizes = types.iter().map(|ty| ty.vertex_count()).collect();

        Marker {
            indices,
            sizes,
            types,
        }
    }

    /// Marker without per-element shapes, only per-element vertex counts.
    ///
    /// On export such a marker is only writable when every element has
    /// exactly 2 vertices (assumed to be `LINE`); anything else fails
    /// with [`InconsistentMarker`](`crate::InconsistentMarker`).
    pub fn untyped(sizes: Vec<usize>, indices: Vec<u32>) -> Marker {
        Marker {
            indices,
            sizes,
            types: Vec::new(),
        }
    }

    /// Number of boundary elements in this marker.
    pub fn nelem(&self) -> usize {
        self.sizes.len()
    }

    /// The flat vertex index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Per-element vertex counts.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Per-element shapes; empty for a marker built via
    /// [`Marker::untyped`].
    pub fn types(&self) -> &[ElementType] {
        &self.types
    }

    /// Lazily iterate the boundary elements as
    /// `(type if known, vertex indices)`.
    pub fn elements(&self) -> MarkerElements<'_> {
        MarkerElements {
            indices: &self.indices,
            sizes: self.sizes.iter(),
            types: &self.types,
            at: 0,
            offset: 0,
        }
    }

}

/// Iterator over the boundary elements of a [`Marker`].
pub struct MarkerElements<'a> {
    indices: &'a [u32],
    sizes: std::slice::Iter<'a, usize>,
    types: &'a [ElementType],
    at: usize,
    offset: usize,
}

impl<'a> Iterator for MarkerElements<'a> {
    type Item = (Option<ElementType>, &'a [u32]);

    fn next(&mut self) -> Option<Self::Item> {
        let size = *self.sizes.next()?;
        let vertices = &self.indices[self.offset..self.offset + size];
        let ty = self.types.get(self.at).copied();

        self.at += 1;
        self.offset += size;

        Some((ty, vertices))
    }
}

/// One contiguous mesh partition: its own points, elements, and boundary
/// markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    izone: u32,
    ndime: u32,
    points: Array2<f64>,
    element_types: Vec<ElementType>,
    indices: Vec<u32>,
    markers: IndexMap<String, Marker>,
}

impl Zone {
    /// Assemble a zone, enforcing the structural invariants up front:
    /// `ndime` is 2 or 3, points have 3 components (2D zones carry a
    /// structural zero z), the flat index buffer length matches the
    /// element types, and every element or marker vertex index is in
    /// bounds.
    pub fn new(
        izone: u32,
        ndime: u32,
        points: Array2<f64>,
        element_types: Vec<ElementType>,
        indices: Vec<u32>,
        markers: IndexMap<String, Marker>,
    ) -> Result<Zone, MeshError> {
        if !(ndime == 2 || ndime == 3) {
            return Err(MeshError::BadDimension { izone, ndime });
        }

        if points.ncols() != 3 {
            return Err(MeshError::BadPointShape {
                izone,
                columns: points.ncols(),
            });
        }

        let npoin = points.nrows();

        let expected: usize = element_types.iter().map(|ty| ty.vertex_count()).sum();
        if expected != indices.len() {
            return Err(MeshError::ConnectivityLength {
                izone,
                expected,
                actual: indices.len(),
            });
        }

        let mut offset = 0;
        for (element, ty) in element_types.iter().enumerate() {
            for index in &indices[offset..offset + ty.vertex_count()] {
                if *index as usize >= npoin {
                    return Err(MeshError::IndexOutOfBounds {
                        izone,
                        site: format!("element {element}"),
                        index: *index,
                        npoin,
                    });
                }
            }
            offset += ty.vertex_count();
        }

        for (tag, marker) in &markers {
            let flat: usize = marker.sizes().iter().sum();
            if flat != marker.indices().len() {
                return Err(MeshError::MarkerShape {
                    izone,
                    tag: tag.clone(),
                    expected: flat,
                    actual: marker.indices().len(),
                });
            }

            if !marker.types().is_empty() {
                if marker.types().len() != marker.sizes().len() {
                    return Err(MeshError::MarkerTypes {
                        izone,
                        tag: tag.clone(),
                        types: marker.types().len(),
                        elements: marker.sizes().len(),
                    });
                }

                let agree = marker
                    .types()
                    .iter()
                    .zip(marker.sizes())
                    .all(|(ty, size)| ty.vertex_count() == *size);
                if !agree {
                    return Err(MeshError::MarkerTypes {
                        izone,
                        tag: tag.clone(),
                        types: marker.types().len(),
                        elements: marker.sizes().len(),
                    });
                }
            }

            for (element, (_, vertices)) in marker.elements().enumerate() {
                for index in vertices {
                    if *index as usize >= npoin {
                        return Err(MeshError::IndexOutOfBounds {
                            izone,
                            site: format!("marker `{tag}` element {element}"),
                            index: *index,
                            npoin,
                        });
                    }
                }
            }
        }

        Ok(Zone {
            izone,
            ndime,
            points,
            element_types,
            indices,
            markers,
        })
    }

    /// 1-based zone index within the owning [`Mesh`].
    pub fn izone(&self) -> u32 {
        self.izone
    }

    /// Spatial dimensionality, 2 or 3.
    pub fn ndime(&self) -> u32 {
        self.ndime
    }

    /// Point coordinates, shape `(npoin, 3)`. For 2D zones the third
    /// column is a structural zero.
    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    /// The flat element index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Per-element shapes, parallel to [`Zone::elements`].
    pub fn element_types(&self) -> &[ElementType] {
        &self.element_types
    }

    /// Boundary markers in file order, keyed by tag.
    pub fn markers(&self) -> &IndexMap<String, Marker> {
        &self.markers
    }

    /// Look up one marker by tag.
    pub fn marker(&self, tag: &str) -> Option<&Marker> {
        self.markers.get(tag)
    }

    pub fn npoin(&self) -> usize {
        self.points.nrows()
    }

    pub fn nelem(&self) -> usize {
        self.element_types.len()
    }

    pub fn nmark(&self) -> usize {
        self.markers.len()
    }

    /// Lazily iterate the interior elements as `(type, vertex indices)`.
    /// Restartable: each call yields a fresh pass over the same buffers.
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            indices: &self.indices,
            types: self.element_types.iter(),
            offset: 0,
        }
    }

    /// Same zone under a different index. Used when zones are renumbered
    /// during combination.
    pub fn with_izone(mut self, izone: u32) -> Zone {
        self.izone = izone;
        self
    }
}

/// Iterator over the interior elements of a [`Zone`].
pub struct Elements<'a> {
    indices: &'a [u32],
    types: std::slice::Iter<'a, ElementType>,
    offset: usize,
}

impl<'a> Iterator for Elements<'a> {
    type Item = (ElementType, &'a [u32]);

    fn next(&mut self) -> Option<Self::Item> {
        let ty = *self.types.next()?;
        let vertices = &self.indices[self.offset..self.offset + ty.vertex_count()];
        self.offset += ty.vertex_count();

        Some((ty, vertices))
    }
}

/// A whole mesh: one or more zones plus the redundant zone count the
/// wire format declares up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    nzone: usize,
    zones: Vec<Zone>,
}

impl Mesh {
    /// Build a mesh from zones; the zone count is derived.
    pub fn new(zones: Vec<Zone>) -> Mesh {
        Mesh {
            nzone: zones.len(),
            zones,
        }
    }

    /// Build a mesh from a declared zone count and the zones themselves,
    /// validating that the redundant count is truthful.
    pub fn from_parts(nzone: usize, zones: Vec<Zone>) -> Result<Mesh, MeshError> {
        if nzone != zones.len() {
            return Err(MeshError::ZoneCountMismatch {
                declared: nzone,
                actual: zones.len(),
            });
        }

        Ok(Mesh { nzone, zones })
    }

    pub fn nzone(&self) -> usize {
        self.nzone
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn into_zones(self) -> Vec<Zone> {
        self.zones
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn unit_triangle() -> Array2<f64> {
        array![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    #[test]
    fn zone_derived_counts() {
        let zone = Zone::new(
            1,
            2,
            unit_triangle(),
            vec![ElementType::Triangle],
            vec![0, 1, 2],
            IndexMap::new(),
        )
        .unwrap();

        assert_eq!(zone.npoin(), 3);
        assert_eq!(zone.nelem(), 1);
        assert_eq!(zone.nmark(), 0);
    }

    #[test]
    fn element_slices_follow_types() {
        let points = array![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.5, 0.5, 1.0],
        ];
        let zone = Zone::new(
            1,
            3,
            points,
            vec![ElementType::Triangle, ElementType::Tetrahedron],
            vec![0, 1, 2, 0, 1, 2, 4],
            IndexMap::new(),
        )
        .unwrap();

        let elements: Vec<_> = zone.elements().collect();
        assert_eq!(
            elements,
            vec![
                (ElementType::Triangle, &[0, 1, 2][..]),
                (ElementType::Tetrahedron, &[0, 1, 2, 4][..]),
            ]
        );

        // restartable: a second pass sees the same slices
        assert_eq!(zone.elements().count(), 2);
    }

    #[test]
    fn connectivity_length_enforced() {
        let err = Zone::new(
            1,
            2,
            unit_triangle(),
            vec![ElementType::Triangle],
            vec![0, 1],
            IndexMap::new(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            MeshError::ConnectivityLength {
                izone: 1,
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn out_of_bounds_index_rejected() {
        let err = Zone::new(
            1,
            2,
            unit_triangle(),
            vec![ElementType::Triangle],
            vec![0, 1, 7],
            IndexMap::new(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            MeshError::IndexOutOfBounds {
                index: 7,
                npoin: 3,
                ..
            }
        ));
    }

    #[test]
    fn marker_indices_validated() {
        let mut markers = IndexMap::new();
        markers.insert(
            "wall".to_string(),
            Marker::with_types(vec![ElementType::Line], vec![0, 9]),
        );

        let err = Zone::new(
            1,
            2,
            unit_triangle(),
            vec![ElementType::Triangle],
            vec![0, 1, 2],
            markers,
        )
        .unwrap_err();

        assert!(matches!(err, MeshError::IndexOutOfBounds { index: 9, .. }));
    }

    #[test]
    fn bad_dimension_rejected() {
        let err = Zone::new(
            1,
            4,
            unit_triangle(),
            vec![ElementType::Triangle],
            vec![0, 1, 2],
            IndexMap::new(),
        )
        .unwrap_err();

        assert_eq!(err, MeshError::BadDimension { izone: 1, ndime: 4 });
    }

    #[test]
    fn untyped_marker_shape_validated() {
        let mut markers = IndexMap::new();
        // declares a 2-vertex and a 3-vertex element but only 4 indices
        markers.insert("wall".to_string(), Marker::untyped(vec![2, 3], vec![0, 1, 1, 2]));

        let err = Zone::new(
            1,
            2,
            unit_triangle(),
            vec![ElementType::Triangle],
            vec![0, 1, 2],
            markers,
        )
        .unwrap_err();

        assert!(matches!(err, MeshError::MarkerShape { expected: 5, actual: 4, .. }));
    }

    #[test]
    fn mesh_zone_count_validated() {
        let zone = Zone::new(
            1,
            2,
            unit_triangle(),
            vec![ElementType::Triangle],
            vec![0, 1, 2],
            IndexMap::new(),
        )
        .unwrap();

        assert!(Mesh::from_parts(1, vec![zone.clone()]).is_ok());
        let err = Mesh::from_parts(2, vec![zone]).unwrap_err();
        assert_eq!(
            err,
            MeshError::ZoneCountMismatch {
                declared: 2,
                actual: 1
            }
        );
    }
}
