//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the scene. Every drawable entity carries a [`renderable::Renderable`] plus
//! exactly one kind component that decides what it draws.
//!
//! Submodules overview:
//! - [`animation`] – sprite animator playback state and its message queue
//! - [`boxcollider`] – axis-aligned rectangular collider, also an occluder for lights
//! - [`lights`] – point and area lights (deferred lighting inputs)
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`nineslicesprite`] – stretchable sprite with fixed-size borders
//! - [`polylight`] – shadow-casting light built from a visibility polygon
//! - [`prototypesprite`] – flat colored rectangle for placeholders
//! - [`renderable`] – shared render state: layer, depth, color, material, bounds cache
//! - [`rotation`] – rotation angle in degrees
//! - [`scale`] – 2D scale factor
//! - [`sprite`] – subtexture drawing with origin and flips
//! - [`spritemime`] – draws another entity's sprite at its own position
//! - [`textsprite`] – text drawn with a bitmap font
//! - [`tiledmap`] – tile map drawing, queries and collision layer
//! - [`tween`] – color interpolation over time

pub mod animation;
pub mod boxcollider;
pub mod lights;
pub mod mapposition;
pub mod nineslicesprite;
pub mod polylight;
pub mod prototypesprite;
pub mod renderable;
pub mod rotation;
pub mod scale;
pub mod sprite;
pub mod spritemime;
pub mod textsprite;
pub mod tiledmap;
pub mod tween;
