use crate::prelude::*;

/// utility function for merging several meshes into one multi-zone mesh.
///
/// Zones are concatenated in input order and renumbered to the dense
/// 1-based range the [`Mesh`] invariants require. Purely structural:
/// no geometry is recomputed and coincident points across zones are
/// not deduplicated.
pub fn combine_meshes<I>(meshes: I) -> Mesh
where
    I: IntoIterator<Item = Mesh>,
{
    let zones: Vec<Zone> = meshes
        .into_iter()
        .flat_map(Mesh::into_zones)
        .enumerate()
        .map(|(at, zone)| zone.with_izone(at as u32 + 1))
        .collect();

    Mesh::new(zones)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn triangle_zone(izone: u32, scale: f64) -> Zone {
        let points = array![
            [0.0, 0.0, 0.0],
            [scale, 0.0, 0.0],
            [0.0, scale, 0.0],
        ];

        Zone::new(
            izone,
            2,
            points,
            vec![ElementType::Triangle],
            vec![0, 1, 2],
            IndexMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn zones_concatenate_in_input_order() {
        let a = Mesh::new(vec![triangle_zone(1, 1.0)]);
        let b = Mesh::new(vec![triangle_zone(1, 2.0), triangle_zone(2, 3.0)]);

        let combined = combine_meshes([a, b]);

        assert_eq!(combined.nzone(), 3);
        let indices: Vec<u32> = combined.zones().iter().map(Zone::izone).collect();
        assert_eq!(indices, vec![1, 2, 3]);

        // input order preserved
        assert_eq!(combined.zones()[1].points()[[1, 0]], 2.0);
        assert_eq!(combined.zones()[2].points()[[1, 0]], 3.0);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let a = Mesh::new(vec![triangle_zone(1, 1.0)]);
        let b = Mesh::new(vec![triangle_zone(1, 2.0)]);

        let combined = combine_meshes([a.clone(), b.clone()]);

        assert_eq!(a.nzone(), 1);
        assert_eq!(b.zones()[0].izone(), 1);
        assert_eq!(combined.nzone(), 2);
    }
}
