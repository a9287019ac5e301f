//! Space Flyby entry point
//!
//! Natively this runs a headless flyby: the camera auto-flies through the
//! pool at 60 fps for a fixed number of frames and logs what it hits. The
//! browser build drives the library through `platform::web` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use space_flyby::{FlybyCamera, ObjectPool, PoolConfig};

    env_logger::init();
    log::info!("Space flyby (native) starting...");

    const FRAMES: u32 = 3600;
    const FRAME_SECONDS: f32 = 1.0 / 60.0;

    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| PoolConfig::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {path}: {e}");
                std::process::exit(1);
            }
        },
        None => PoolConfig::default(),
    };

    let mut pool = match ObjectPool::new(config, &mut ()) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    let mut camera = FlybyCamera::default().with_rear_view(true);
    let start = camera.position;

    for frame in 0..FRAMES {
        let delta = camera.frame(FRAME_SECONDS);
        let report = pool.tick(delta, camera.viewpoints());
        for hit in &report.hits {
            log::info!(
                "Frame {frame}: hit {:?} #{} from viewpoint {} at {:?}",
                hit.body.kind(),
                hit.body.index(),
                hit.viewpoint,
                camera.position
            );
        }
    }

    let stats = pool.stats();
    println!(
        "Flew {:.0} units in {} ticks: {} recycles, {} field recycles, {} hits, {} deflections",
        start.distance(camera.position),
        stats.ticks,
        stats.body_recycles,
        stats.field_recycles,
        stats.hits,
        stats.deflections
    );
    println!(
        "Motion mix: {} linear, {} parabolic, {} corkscrew",
        stats.linear, stats.parabolic, stats.corkscrew
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
