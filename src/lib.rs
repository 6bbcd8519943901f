//! Page-curl geometry and gesture engine for a book-style page turner.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and also
//! builds natively so the geometry can be tested without one. Given touch
//! input and frame ticks, it solves the fold of a curling page, builds the
//! fill outlines, shadow shapes and a texture-warping mesh for each frame,
//! and reports page turns back to the host as [`engine::Action`]s. The host
//! JavaScript layer only wires DOM events to the engine and draws page
//! content into the surfaces the engine asks for.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`geom`] | Points, lines, float ranges and the quadratic solver |
//! | [`viewport`] | Screen, Cartesian and surface coordinate systems |
//! | [`points`] | The fifteen-point curl polygon |
//! | [`drag`] | Drag steps and their compass classification |
//! | [`solver`] | Closed-form polygon solvers for each regime |
//! | [`regime`] | Regime switching and the per-frame simulation |
//! | [`tight`] | θ steering while the tight regime is dragged |
//! | [`flow`] | Gesture flow states and animation tweens |
//! | [`book`] | Page index, turn reporting and the page slot plan |
//! | [`behavior`] | Host-overridable tap and drag policies |
//! | [`mesh`] | Distortion mesh and its boundary lists |
//! | [`scene`] | Fill outlines, shadows and gradient controls |
//! | [`synth`] | RGB565 lower-page composition |
//! | [`render`] | Canvas replay of a frame |
//! | [`config`] | Host configuration |
//! | [`consts`] | Shared numeric constants (thresholds, durations, colours) |

pub mod behavior;
pub mod book;
pub mod config;
pub mod consts;
pub mod drag;
pub mod engine;
pub mod flow;
pub mod geom;
pub mod mesh;
pub mod points;
pub mod regime;
pub mod render;
pub mod scene;
pub mod solver;
pub mod synth;
pub mod tight;
pub mod viewport;
