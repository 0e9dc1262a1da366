#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::cluster::{
        build_canopies, export, update_centroids, CanopyBuilder, CanopyConfig, ClusterHistory,
        ClusteringJob, LocalCanopyJob, Refinement, SignificanceFilter,
    };
    use crate::distance::{DistanceMeasure, Euclidean, Manhattan};
    use crate::Result;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    fn gaussian_blobs(seed: u64) -> Vec<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut points = Vec::new();
        let blobs = [
            (1.0f32, 1.0f32, 0.3f32, 60),
            (8.0, 0.0, 0.3, 40),
            (0.0, 9.0, 0.1, 30),
        ];
        for (cx, cy, sd, n) in blobs {
            let nx = Normal::new(cx, sd).unwrap();
            let ny = Normal::new(cy, sd).unwrap();
            for _ in 0..n {
                points.push(vec![nx.sample(&mut rng), ny.sample(&mut rng)]);
            }
        }
        points.shuffle(&mut rng);
        points
    }

    fn pairwise_max<D: DistanceMeasure>(points: &[Vec<f32>], measure: &D) -> f32 {
        let mut max = 0.0f32;
        for a in points {
            for b in points {
                max = max.max(measure.distance(a, b));
            }
        }
        max
    }

    fn pairwise_min<D: DistanceMeasure>(points: &[Vec<f32>], measure: &D) -> f32 {
        let mut min = f32::INFINITY;
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                min = min.min(measure.distance(a, b));
            }
        }
        min
    }

    #[test]
    fn test_gaussian_blobs_end_to_end() -> Result<()> {
        let points = gaussian_blobs(42);
        let job = LocalCanopyJob::from_config(&CanopyConfig {
            t1: 3.0,
            t2: 2.0,
            significance: 0.1,
            metric: crate::Metric::Euclidean,
            refine: Some(Refinement::new(10)),
            ..Default::default()
        })?;

        let mut history = ClusterHistory::new();
        let clusters = job.run(&points, &mut history)?;

        assert_eq!(clusters.len(), 3, "{clusters:?}");
        let mut centers: Vec<(f32, f32)> =
            clusters.iter().map(|c| (c.center[0], c.center[1])).collect();
        centers.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected = [(0.0, 9.0), (1.0, 1.0), (8.0, 0.0)];
        for ((x, y), (ex, ey)) in centers.iter().zip(expected.iter()) {
            assert!((x - ex).abs() < 0.5 && (y - ey).abs() < 0.5, "({x}, {y})");
        }
        assert!(history.len() >= 2);
        Ok(())
    }

    #[test]
    fn test_sharded_and_plain_find_same_blobs() -> Result<()> {
        let points = gaussian_blobs(7);
        let plain = CanopyBuilder::new(3.0, 2.5).build(&points)?;
        let sharded = CanopyBuilder::new(3.0, 2.5)
            .with_shard_size(16)
            .build_sharded(&points)?;

        let filter = SignificanceFilter::new(0.1)?;
        let big_plain = filter.filter(&update_centroids(&plain, &points)?, points.len());
        let big_sharded = filter.filter(&update_centroids(&sharded, &points)?, points.len());
        assert_eq!(big_plain.len(), 3);
        assert_eq!(big_sharded.len(), 3);
        Ok(())
    }

    #[test]
    fn test_full_significance_on_spread_points() -> Result<()> {
        let points = vec![vec![0.0, 0.0], vec![5.0, 0.0], vec![0.0, 5.0]];
        let canopies = build_canopies(&points, Euclidean, 4.0, 1.0)?;
        // Every pair is at least 5 apart: no canopy holds everything.
        let filter = SignificanceFilter::new(1.0)?;
        assert!(filter.filter(&canopies, points.len()).is_empty());
        Ok(())
    }

    fn points_strategy() -> impl Strategy<Value = Vec<Vec<f32>>> {
        (1usize..4).prop_flat_map(|dim| {
            proptest::collection::vec(proptest::collection::vec(-50.0f32..50.0, dim), 0..40)
        })
    }

    proptest! {
        #[test]
        fn every_canopy_contains_its_seed(
            points in points_strategy(),
            t2 in 0.1f32..20.0,
            extra in 0.0f32..20.0,
        ) {
            let canopies = build_canopies(&points, Euclidean, t2 + extra, t2).unwrap();
            for c in &canopies {
                prop_assert!(!c.is_empty());
                let seed = points.iter().position(|p| p.as_slice() == c.center()).unwrap();
                prop_assert!(c.members().iter().any(|&m| points[m] == points[seed]));
            }
        }

        #[test]
        fn membership_is_exactly_t1_ball_of_seed(
            points in points_strategy(),
            t2 in 0.1f32..20.0,
            extra in 0.0f32..20.0,
        ) {
            let t1 = t2 + extra;
            let canopies = build_canopies(&points, Manhattan, t1, t2).unwrap();
            for c in &canopies {
                let expected: Vec<usize> = (0..points.len())
                    .filter(|&q| Manhattan.distance(c.center(), &points[q]) <= t1)
                    .collect();
                prop_assert_eq!(c.members(), expected.as_slice());
            }
        }

        #[test]
        fn every_point_is_covered_and_seeds_are_apart(
            points in points_strategy(),
            t2 in 0.1f32..20.0,
        ) {
            let canopies = build_canopies(&points, Euclidean, t2, t2).unwrap();
            for i in 0..points.len() {
                prop_assert!(canopies.iter().any(|c| c.contains(i)));
            }
            // Later seeds were never within t2 of an earlier seed.
            for (i, a) in canopies.iter().enumerate() {
                for b in &canopies[i + 1..] {
                    prop_assert!(Euclidean.distance(a.center(), b.center()) > t2);
                }
            }
        }

        #[test]
        fn deterministic_for_same_order(points in points_strategy(), t2 in 0.1f32..20.0) {
            let a = build_canopies(&points, Euclidean, t2 * 2.0, t2).unwrap();
            let b = build_canopies(&points, Euclidean, t2 * 2.0, t2).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn huge_thresholds_give_single_canopy(points in points_strategy()) {
            prop_assume!(!points.is_empty());
            let t = pairwise_max(&points, &Euclidean) + 1.0;
            let canopies = build_canopies(&points, Euclidean, t, t).unwrap();
            prop_assert_eq!(canopies.len(), 1);
            prop_assert_eq!(canopies[0].len(), points.len());
        }

        #[test]
        fn tiny_t2_gives_canopy_per_point(points in points_strategy()) {
            prop_assume!(points.len() >= 2);
            let min = pairwise_min(&points, &Euclidean);
            prop_assume!(min > 1e-3);
            let canopies = build_canopies(&points, Euclidean, min, min / 2.0).unwrap();
            prop_assert_eq!(canopies.len(), points.len());
        }

        #[test]
        fn population_fractions_are_fractions(points in points_strategy(), t2 in 0.1f32..20.0) {
            let canopies = build_canopies(&points, Euclidean, t2 * 1.5, t2).unwrap();
            for c in &canopies {
                let cluster = export(c, points.len()).unwrap();
                prop_assert!(cluster.population_fraction > 0.0);
                prop_assert!(cluster.population_fraction <= 1.0);
                prop_assert_eq!(cluster.radius.len(), c.center().len());
            }
        }
    }
}
