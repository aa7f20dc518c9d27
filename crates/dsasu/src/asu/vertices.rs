//! Vertex enumeration by intersecting facet triples.

use nalgebra::{Matrix3, Vector3};

use super::plane::HalfSpace;
use crate::cfg::{DET_EPS, RAY_EPS};

/// Index triples `i < j < k` below `n`, lexicographic.
pub(crate) fn facet_triples(n: usize) -> impl Iterator<Item = [usize; 3]> {
    (0..n).flat_map(move |i| {
        (i + 1..n).flat_map(move |j| (j + 1..n).map(move |k| [i, j, k]))
    })
}

/// Common point of three planes, or `None` when the normals are (nearly) coplanar.
pub(crate) fn intersect3(planes: [&HalfSpace; 3]) -> Option<Vector3<f64>> {
    let m = Matrix3::from_rows(&[
        planes[0].normal().transpose(),
        planes[1].normal().transpose(),
        planes[2].normal().transpose(),
    ]);
    let scale = planes.iter().map(|p| p.normal().norm()).product::<f64>();
    if m.determinant().abs() <= DET_EPS * scale {
        return None;
    }
    let b = Vector3::new(-planes[0].offset(), -planes[1].offset(), -planes[2].offset());
    m.try_inverse().map(|inv| inv * b)
}

/// Fractional vertices in facet-triple order; duplicates are kept.
///
/// A candidate is kept when every facet outside its defining triple accepts it
/// at `eps`. The defining facets are satisfied by construction.
pub(crate) fn fractional_vertices(facets: &[HalfSpace], eps: f64) -> Vec<Vector3<f64>> {
    let mut out = Vec::new();
    for triple in facet_triples(facets.len()) {
        let Some(x) = intersect3([&facets[triple[0]], &facets[triple[1]], &facets[triple[2]]])
        else {
            continue;
        };
        let inside = facets
            .iter()
            .enumerate()
            .filter(|(i, _)| !triple.contains(i))
            .all(|(_, f)| f.is_inside_eps(&x, eps));
        if inside {
            out.push(x);
        }
    }
    out
}

/// True when no direction `d != 0` has `n·d >= 0` for every facet.
///
/// A nontrivial recession cone either contains a direction orthogonal to all
/// normals or has an extreme ray on the line where two facets meet, so it is
/// enough to test `±(n_i × n_j)` for every pair.
pub(crate) fn is_bounded(facets: &[HalfSpace]) -> bool {
    let mut independent_pair = false;
    for (i, a) in facets.iter().enumerate() {
        for b in &facets[i + 1..] {
            let d = a.normal().cross(b.normal());
            let scale = a.normal().norm() * b.normal().norm();
            if d.norm() <= DET_EPS * scale {
                continue;
            }
            independent_pair = true;
            let d = d.normalize();
            for dir in [d, -d] {
                let escapes = facets
                    .iter()
                    .all(|f| f.normal().dot(&dir) >= -RAY_EPS * f.normal().norm());
                if escapes {
                    return false;
                }
            }
        }
    }
    independent_pair
}
