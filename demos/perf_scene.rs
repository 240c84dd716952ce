use polyplace::exchange::write_table;
use polyplace::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

fn main() {
    env_logger::init();

    let mut scene = Scene::new(SceneConfig {
        cell_size: 1.0,
        enable_timing: true,
        ..Default::default()
    });

    let n = 5_000usize; // number of objects
    let half = 60.0;
    let mut rng = StdRng::seed_from_u64(1);
    let poses: Vec<Pose> = (0..n)
        .map(|_| {
            Pose::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(0.0..360.0),
            )
        })
        .collect();

    // One bulk load, so the scene runs a single pass instead of one per insert.
    let t0 = Instant::now();
    scene.import_table(&write_table(&poses));
    let t_load = t0.elapsed();

    let t1 = Instant::now();
    let n_pairs = scene.detect_all().len();
    let t_detect = t1.elapsed();

    if let Some(r) = scene.last_report() {
        let t = r.timing.unwrap_or_default();
        println!(
            "N={} cell_size={} load={:?} detect={:?} (index={:.3}ms narrow={:.3}ms fallback={:.3}ms) cells={} candidates={} pairs={}",
            n,
            scene.cfg.cell_size,
            t_load,
            t_detect,
            t.index_ms,
            t.narrowphase_ms,
            t.fallback_ms,
            r.index.cells,
            r.index.unique_pairs,
            n_pairs
        );
    }

    let t2 = Instant::now();
    let mut moved = 0usize;
    let ids: Vec<ObjectId> = scene.objects().iter().take(5).map(|o| o.id()).collect();
    for id in ids {
        for dir in Direction::ALL {
            match scene.move_to_farthest(id, dir) {
                Ok(out) if out.moved => moved += 1,
                Ok(_) => {}
                Err(e) => eprintln!("move failed: {e}"),
            }
        }
    }
    println!(
        "compaction: {} moves in {:?}, score={:.4}",
        moved,
        t2.elapsed(),
        scene.score().unwrap_or(0.0)
    );
}
