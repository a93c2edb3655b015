//! Browser viewer and controller for a remotely computed lighting scene.
//!
//! The backend owns the geometry and the light, computes how much of the
//! floor is lit, and serves the result over HTTP. This crate is compiled to
//! WebAssembly and runs in the browser: it fetches the scene, draws it on a
//! canvas with the Y axis flipped into screen space, and lets the user drag
//! the light. While a drag is active the new light position is pushed to the
//! backend on a fixed interval and the recomputed scene is pulled back.
//!
//! Everything except `app` is plain Rust with no browser runtime
//! requirement, so the state machine and sync protocol are tested natively.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] context object and host [`engine::Action`]s |
//! | [`scene`] | Wire types and the scene store |
//! | [`transform`] | Points and the Y-flip between simulation and screen space |
//! | [`input`] | Drag state machine |
//! | [`hit`] | Light icon hit-testing |
//! | [`sync`] | Drag sessions and the push-then-pull cycle |
//! | [`render`] | Frame drawing through the [`render::Painter`] seam |
//! | [`api`] | HTTP backend (`gloo-net`, `browser` feature) |
//! | [`config`] | Host-supplied configuration |
//! | [`error`] | Error types |
//! | [`consts`] | Palette, label geometry, defaults |
//! | `app` | `#[wasm_bindgen]` entry point (`browser` feature) |

pub mod api;
#[cfg(feature = "browser")]
pub mod app;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod render;
pub mod scene;
pub mod sync;
pub mod transform;

#[cfg(test)]
#[path = "fixtures_test.rs"]
mod fixtures;
