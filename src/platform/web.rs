//! wasm-bindgen surface for the browser render loop

use wasm_bindgen::prelude::*;

use crate::config::PoolConfig;
use crate::render::{body_instances, star_vertices};
use crate::sim::{FlybyCamera, ObjectPool, Renderable};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Space flyby starting...");
}

/// Pool plus camera, ticked once per animation frame from JS
#[wasm_bindgen]
pub struct Flyby {
    pool: ObjectPool,
    camera: FlybyCamera,
    renderables: Vec<Renderable>,
    last_hits: Vec<u32>,
}

#[wasm_bindgen]
impl Flyby {
    /// `config_json` falls back to the default demo configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>, seed: Option<u64>) -> Result<Flyby, JsError> {
        let mut config = match config_json {
            Some(json) => PoolConfig::from_json(&json).map_err(|e| JsError::new(&e.to_string()))?,
            None => PoolConfig::default(),
        };
        if seed.is_some() {
            config.seed = seed;
        }
        let mut renderables = Vec::new();
        let pool =
            ObjectPool::new(config, &mut renderables).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Flyby {
            pool,
            camera: FlybyCamera::default(),
            renderables,
            last_hits: Vec::new(),
        })
    }

    /// Advance one animation frame; returns the number of hits
    pub fn frame(&mut self, frame_seconds: f32) -> usize {
        let delta = self.camera.frame(frame_seconds);
        let report = self.pool.tick(delta, self.camera.viewpoints());
        self.last_hits.clear();
        for hit in &report.hits {
            log::info!("You hit {:?} (viewpoint {})", hit.body.kind(), hit.viewpoint);
            self.last_hits.extend(hit.body.to_pair());
        }
        report.len()
    }

    /// Bodies hit during the last frame as flat `[kind, index]` pairs
    /// (kind 0 = asteroid, 1 = torus knot)
    pub fn last_hits(&self) -> Vec<u32> {
        self.last_hits.clone()
    }

    pub fn set_rear_view(&mut self, enabled: bool) {
        self.camera.rear_view = enabled;
    }

    pub fn accelerate(&mut self) {
        self.camera.accelerate();
    }

    pub fn decelerate(&mut self) {
        self.camera.decelerate();
    }

    pub fn camera_position(&self) -> Vec<f32> {
        self.camera.position.to_array().to_vec()
    }

    /// Number of bodies and star fields published at construction
    pub fn renderable_count(&self) -> usize {
        self.renderables.len()
    }

    /// Packed `InstanceRaw` records as bytes
    pub fn instances(&self) -> Vec<u8> {
        bytemuck::cast_slice(&body_instances(&self.pool)).to_vec()
    }

    pub fn star_field_count(&self) -> usize {
        self.pool.star_fields().len()
    }

    /// Local-space points of one star field (x, y, z triples)
    pub fn star_points(&self, index: usize) -> Vec<f32> {
        self.pool
            .star_fields()
            .get(index)
            .map(|field| bytemuck::cast_slice(&star_vertices(field)).to_vec())
            .unwrap_or_default()
    }

    pub fn star_field_origin(&self, index: usize) -> Vec<f32> {
        self.pool
            .star_fields()
            .get(index)
            .map(|field| field.origin().to_array().to_vec())
            .unwrap_or_default()
    }
}
