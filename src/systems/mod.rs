//! Engine systems.
//!
//! This module groups all ECS systems that advance simulation and drive
//! rendering.
//!
//! Submodules overview
//! - [`animation`] – advance sprite animators and emit their messages
//! - [`bounds`] – invalidate and refresh cached renderable bounds
//! - [`gameconfig`] – push engine configuration to the running world
//! - [`render`] – cull, sort and draw renderables through each renderer
//! - [`tiledmap`] – keep tile map collider entities in sync with their map
//! - [`time`] – update simulation time and delta
//! - [`tween`] – animate renderable colors over time

pub mod animation;
pub mod bounds;
pub mod gameconfig;
pub mod render;
pub mod tiledmap;
pub mod time;
pub mod tween;
