use canopy::plot::{plot_history, EllipseKind, PlotPolicy};
use canopy::{CanopyConfig, ClusterHistory, ClusteringJob, LocalCanopyJob, Refinement};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Three overlapping 2D Gaussians: a wide one and two tight ones.
    //
    // The clustering itself does not care where points come from; generating
    // them here just gives the plot something to show.
    let mut rng = StdRng::seed_from_u64(42);
    let mut points: Vec<Vec<f32>> = Vec::new();
    for (n, (mx, my), sd) in [
        (500, (1.0f32, 1.0f32), 3.0f32),
        (300, (1.0, 0.0), 0.5),
        (300, (0.0, 2.0), 0.1),
    ] {
        let nx = Normal::new(mx, sd)?;
        let ny = Normal::new(my, sd)?;
        for _ in 0..n {
            points.push(vec![nx.sample(&mut rng), ny.sample(&mut rng)]);
        }
    }

    let config = CanopyConfig {
        refine: Some(Refinement::new(5)),
        ..Default::default()
    };
    let job = LocalCanopyJob::from_config(&config)?;

    let mut history = ClusterHistory::new();
    let clusters = job.run(&points, &mut history)?;

    println!(
        "Canopy clusters (>{}% of population): {}",
        (config.significance * 100.0) as u32,
        clusters.len()
    );
    for c in &clusters {
        println!(
            "  cluster {}: center=({:.2}, {:.2}) radius={:.2} population={:.1}%",
            c.id,
            c.center[0],
            c.center[1],
            c.radius[0],
            c.population_fraction * 100.0
        );
    }

    // What a renderer would draw.
    let ellipses = plot_history(&history, job.thresholds()?, &PlotPolicy::default());
    let extents = ellipses
        .iter()
        .filter(|e| e.kind == EllipseKind::Extent)
        .count();
    println!(
        "snapshots={} ellipses={} (extent={})",
        history.len(),
        ellipses.len(),
        extents
    );

    Ok(())
}
