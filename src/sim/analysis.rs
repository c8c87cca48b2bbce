use std::collections::BTreeMap;

use super::run::ChromaticityPoint;

/// Centroid and spread of one object's readings on the chromaticity plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSummary {
    pub object: usize,
    pub count: usize,
    pub centroid: [f64; 2],
    /// RMS distance of the readings from the centroid.
    pub spread: f64,
}

/// One summary per object, ordered by object index.
pub fn cluster_summaries<'a>(
    points: impl IntoIterator<Item = &'a ChromaticityPoint>,
) -> Vec<ClusterSummary> {
    let mut groups: BTreeMap<usize, Vec<[f64; 2]>> = BTreeMap::new();
    for p in points {
        groups.entry(p.object).or_default().push([p.r, p.g]);
    }

    groups
        .into_iter()
        .map(|(object, rg)| {
            let n = rg.len() as f64;
            let cr = rg.iter().map(|p| p[0]).sum::<f64>() / n;
            let cg = rg.iter().map(|p| p[1]).sum::<f64>() / n;
            let mean_sq = rg
                .iter()
                .map(|p| (p[0] - cr).powi(2) + (p[1] - cg).powi(2))
                .sum::<f64>()
                / n;
            ClusterSummary {
                object,
                count: rg.len(),
                centroid: [cr, cg],
                spread: mean_sq.sqrt(),
            }
        })
        .collect()
}

/// Smallest distance between two cluster centroids divided by the largest
/// cluster spread. Values well above 1 mean every object stays
/// distinguishable. `None` with fewer than two clusters. Coincident centroids
/// score 0 whatever the spread.
pub fn separability(summaries: &[ClusterSummary]) -> Option<f64> {
    if summaries.len() < 2 {
        return None;
    }
    let mut min_distance = f64::INFINITY;
    for (i, a) in summaries.iter().enumerate() {
        for b in &summaries[i + 1..] {
            let d = ((a.centroid[0] - b.centroid[0]).powi(2)
                + (a.centroid[1] - b.centroid[1]).powi(2))
            .sqrt();
            min_distance = min_distance.min(d);
        }
    }
    if min_distance == 0.0 {
        return Some(0.0);
    }
    let max_spread = summaries.iter().map(|s| s.spread).fold(0.0, f64::max);
    if max_spread == 0.0 {
        return Some(f64::INFINITY);
    }
    Some(min_distance / max_spread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point(object: usize, r: f64, g: f64) -> ChromaticityPoint {
        ChromaticityPoint {
            machine: 0,
            led: 0,
            draw: 0,
            object,
            object_height: 0.5,
            red_flux: r,
            green_flux: g,
            blue_flux: 1.0 - r - g,
            r,
            g,
        }
    }

    #[test]
    fn centroid_and_spread() {
        let pts = [point(0, 0.2, 0.3), point(0, 0.4, 0.3), point(1, 0.6, 0.1)];
        let s = cluster_summaries(&pts);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].count, 2);
        assert_relative_eq!(s[0].centroid[0], 0.3, epsilon = 1e-12);
        assert_relative_eq!(s[0].spread, 0.1, epsilon = 1e-12);
        assert_eq!(s[1].spread, 0.0);
    }

    #[test]
    fn separability_ratio() {
        let pts = [
            point(0, 0.2, 0.3),
            point(0, 0.4, 0.3),
            point(1, 0.8, 0.3),
            point(1, 0.8, 0.3),
        ];
        let s = cluster_summaries(&pts);
        // centroids 0.5 apart, largest spread 0.1
        assert_relative_eq!(separability(&s).unwrap(), 5.0, epsilon = 1e-9);
        assert_eq!(separability(&s[..1]), None);
    }

    #[test]
    fn coincident_clusters_are_not_separable() {
        let pts = [point(0, 0.3, 0.3), point(1, 0.3, 0.3)];
        assert_eq!(separability(&cluster_summaries(&pts)), Some(0.0));

        let apart = [point(0, 0.3, 0.3), point(1, 0.5, 0.3)];
        assert_eq!(separability(&cluster_summaries(&apart)), Some(f64::INFINITY));
    }
}
