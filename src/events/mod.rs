//! Event and message types exchanged across systems.
//!
//! Submodules:
//! - [`animation`] – completion and frame-change messages from sprite animators
//! - [`switchdebug`] – toggle the debug overlay on/off
pub mod animation;
pub mod switchdebug;
