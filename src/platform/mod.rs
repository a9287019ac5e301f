//! Platform abstraction layer
//!
//! The browser render loop drives the pool through `web::Flyby`; native
//! builds use the library directly (see `main.rs`).

#[cfg(target_arch = "wasm32")]
pub mod web;
