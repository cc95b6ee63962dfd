//! Lumen2D library.
//!
//! A 2D rendering core on top of `bevy_ecs`: renderable components, sprite
//! animation, tile maps, lights and a backend-agnostic render pass that
//! writes draw commands to a [`resources::batcher::Batcher`].

pub mod components;
pub mod errors;
pub mod events;
pub mod geometry;
pub mod resources;
pub mod systems;
