//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: timing, cameras, renderers, asset
//! stores and the draw backend seam.
//!
//! Overview
//! - `animationstore` – sprite animation definitions shared across entities
//! - `batcher` – the draw command sink every render pass writes to
//! - `camera2d` – shared 2D camera used for culling and world/screen transforms
//! - `debugmode` – presence enables the debug render pass
//! - `fontstore` – bitmap fonts keyed by name
//! - `gameconfig` – INI-backed engine settings
//! - `renderers` – ordered render passes and their layer filters
//! - `tilemap` – tile map data, layer queries and collision rectangles
//! - `worldtime` – simulation time and delta
pub mod animationstore;
pub mod batcher;
pub mod camera2d;
pub mod debugmode;
pub mod fontstore;
pub mod gameconfig;
pub mod renderers;
pub mod tilemap;
pub mod worldtime;
