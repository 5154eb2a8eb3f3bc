//! Hex grid renderer and interaction engine for the browser.
//!
//! This crate is compiled to WebAssembly. It draws an offset-row hex map onto a
//! `<canvas>` under a pan/zoom/tilt/rotate camera, resolves pointer positions
//! back to hexes, and reports clicks, double clicks, hover, and zoom changes to
//! the embedding page through [`engine::Callbacks`]. Map data is fetched as JSON
//! and swapped in wholesale.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`host`] | DOM listeners, resize observation, timers, and [`host::mount`] |
//! | [`grid`] | Cells, coordinates, and the map payload |
//! | [`terrain`] | Terrain styles and district overrides |
//! | [`layout`] | Offset-row hex geometry |
//! | [`camera`] | Camera state and world/screen transforms |
//! | [`hit`] | Screen point to hex resolution |
//! | [`render`] | Frame pipeline: cells, edges, roads, glyphs, highlight |
//! | [`roads`] | Road segment extraction from cell flags |
//! | [`surface`] | Drawing surface trait, canvas and recording backends |
//! | [`viewport`] | CSS size, device pixel ratio, and resize planning |
//! | [`input`] | Drag, click, and touch state machines |
//! | [`hud`] | Hover/selection summaries for the page |
//! | [`loader`] | Map and hex-detail fetching |
//! | [`config`] | Engine and grid configuration |
//! | [`consts`] | Shared numeric constants |
//! | [`error`] | [`error::GridError`] |

pub mod camera;
pub mod config;
pub mod consts;
pub mod engine;
pub mod error;
pub mod grid;
pub mod hit;
pub mod host;
pub mod hud;
pub mod input;
pub mod layout;
pub mod loader;
pub mod render;
pub mod roads;
pub mod surface;
pub mod terrain;
pub mod viewport;
