//! Animation clips and the shared clip registry.
//!
//! An [`AnimationClip`] is an immutable-once-shared list of frames plus timing
//! and loop policy. Clips are reference counted so that many
//! [`SpriteAnimator`](crate::components::animation::SpriteAnimator)s can play
//! the same clip. Derived timing is computed once by [`AnimationClip::prepare`]
//! and memoised; any `&mut` edit to a clip drops the memoised value so the next
//! preparation sees the new data.
//!
//! [`AnimationStore`] is a string-keyed registry that can be filled from JSON:
//!
//! ```json
//! {
//!   "animations": {
//!     "walk": {
//!       "tex_key": "hero",
//!       "strip": { "x": 0, "y": 0, "width": 16, "height": 16, "frame_count": 6 },
//!       "fps": 12,
//!       "looped": true
//!     },
//!     "die": {
//!       "tex_key": "hero",
//!       "frames": [
//!         { "x": 0, "y": 16, "width": 16, "height": 16 },
//!         { "x": 16, "y": 16, "width": 16, "height": 16, "origin": [8, 12] }
//!       ],
//!       "looped": false,
//!       "completion": "HideSprite"
//!     }
//!   }
//! }
//! ```

use std::path::Path;
use std::sync::{Arc, OnceLock};

use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::sprite::Subtexture;
use crate::errors::{AnimationError, AssetError};
use crate::geometry::Rect;

const DEFAULT_FPS: f32 = 10.0;
/// Largest `frame_count` a JSON strip may ask for.
pub const MAX_STRIP_FRAMES: usize = 4096;

/// What a sprite shows once a non-looping clip has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompletionBehavior {
    /// Keep the last displayed frame.
    #[default]
    RemainOnFinalFrame,
    /// Go back to the first frame.
    RevertToFirstFrame,
    /// Clear the sprite's subtexture and drop the active clip.
    HideSprite,
}

/// One frame of a clip. `origin`, when set, overrides the subtexture origin
/// while this frame is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub subtexture: Subtexture,
    pub origin: Option<Vec2>,
}

impl AnimationFrame {
    pub fn new(subtexture: Subtexture) -> Self {
        Self {
            subtexture,
            origin: None,
        }
    }

    /// Origin applied to the sprite when this frame is selected.
    pub fn effective_origin(&self) -> Vec2 {
        self.origin.unwrap_or(self.subtexture.origin)
    }
}

impl From<Subtexture> for AnimationFrame {
    fn from(subtexture: Subtexture) -> Self {
        Self::new(subtexture)
    }
}

/// Timing derived from a clip's frame count, fps and loop policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTiming {
    pub seconds_per_frame: f32,
    /// Time to play every frame once, forward only.
    pub iteration_duration: f32,
    /// `+inf` for looping clips, two iterations for ping-pong, else one.
    pub total_duration: f32,
}

/// Keyed animation definition: ordered frames plus timing and loop policy.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    frames: Vec<AnimationFrame>,
    fps: f32,
    looped: bool,
    ping_pong: bool,
    delay: f32,
    completion_behavior: CompletionBehavior,
    timing: OnceLock<ClipTiming>,
}

impl Default for AnimationClip {
    fn default() -> Self {
        Self {
            frames: Vec::new(),
            fps: DEFAULT_FPS,
            looped: true,
            ping_pong: false,
            delay: 0.0,
            completion_behavior: CompletionBehavior::default(),
            timing: OnceLock::new(),
        }
    }
}

impl AnimationClip {
    /// A looping 10 fps clip over `frames`.
    pub fn new(frames: impl IntoIterator<Item = impl Into<AnimationFrame>>) -> Self {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_fps(mut self, fps: f32) -> Self {
        self.set_fps(fps);
        self
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.set_looped(looped);
        self
    }

    pub fn with_ping_pong(mut self, ping_pong: bool) -> Self {
        self.set_ping_pong(ping_pong);
        self
    }

    pub fn with_delay(mut self, seconds: f32) -> Self {
        self.set_delay(seconds);
        self
    }

    pub fn with_completion_behavior(mut self, behavior: CompletionBehavior) -> Self {
        self.set_completion_behavior(behavior);
        self
    }

    pub fn frames(&self) -> &[AnimationFrame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&AnimationFrame> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn looped(&self) -> bool {
        self.looped
    }

    pub fn ping_pong(&self) -> bool {
        self.ping_pong
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn completion_behavior(&self) -> CompletionBehavior {
        self.completion_behavior
    }

    pub fn is_prepared(&self) -> bool {
        self.timing.get().is_some()
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
        self.timing.take();
    }

    pub fn set_looped(&mut self, looped: bool) {
        self.looped = looped;
        self.timing.take();
    }

    pub fn set_ping_pong(&mut self, ping_pong: bool) {
        self.ping_pong = ping_pong;
        self.timing.take();
    }

    pub fn set_delay(&mut self, seconds: f32) {
        self.delay = seconds.max(0.0);
    }

    pub fn set_completion_behavior(&mut self, behavior: CompletionBehavior) {
        self.completion_behavior = behavior;
    }

    pub fn add_frame(&mut self, frame: impl Into<AnimationFrame>) {
        self.frames.push(frame.into());
        self.timing.take();
    }

    pub fn add_frames(&mut self, frames: impl IntoIterator<Item = impl Into<AnimationFrame>>) {
        self.frames.extend(frames.into_iter().map(Into::into));
        self.timing.take();
    }

    /// Sets the origin override for every frame.
    pub fn set_origin(&mut self, origin: Vec2) {
        for frame in &mut self.frames {
            frame.origin = Some(origin);
        }
    }

    /// Computes and caches the derived timing. Later calls return the cached
    /// value; concurrent callers compute identical values.
    pub fn prepare(&self) -> Result<ClipTiming, AnimationError> {
        if let Some(timing) = self.timing.get() {
            return Ok(*timing);
        }

        if self.frames.is_empty() {
            return Err(AnimationError::InvalidClip {
                reason: "clip has no frames".to_string(),
            });
        }
        if !(self.fps > 0.0 && self.fps.is_finite()) {
            return Err(AnimationError::InvalidClip {
                reason: format!("fps must be positive, got {}", self.fps),
            });
        }

        let seconds_per_frame = 1.0 / self.fps;
        let iteration_duration = seconds_per_frame * self.frames.len() as f32;
        let total_duration = if self.looped {
            f32::INFINITY
        } else if self.ping_pong {
            iteration_duration * 2.0
        } else {
            iteration_duration
        };

        let timing = ClipTiming {
            seconds_per_frame,
            iteration_duration,
            total_duration,
        };
        Ok(*self.timing.get_or_init(|| timing))
    }
}

/// Central registry of reusable clips keyed by string IDs.
#[derive(Resource, Default, Debug)]
pub struct AnimationStore {
    pub animations: FxHashMap<String, Arc<AnimationClip>>,
}

impl AnimationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a clip, preparing it so every holder shares the timing.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        clip: AnimationClip,
    ) -> Result<Arc<AnimationClip>, AnimationError> {
        clip.prepare()?;
        let clip = Arc::new(clip);
        self.animations.insert(key.into(), Arc::clone(&clip));
        Ok(clip)
    }

    pub fn get(&self, key: &str) -> Option<&Arc<AnimationClip>> {
        self.animations.get(key)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Adds every clip described by `json`. Returns how many were loaded.
    /// Nothing is inserted if any clip is invalid.
    pub fn load_from_json_str(&mut self, json: &str) -> Result<usize, AssetError> {
        let def: StoreDef = serde_json::from_str(json)?;

        let mut loaded = Vec::with_capacity(def.animations.len());
        for (key, clip_def) in def.animations {
            let clip = match clip_def.into_clip() {
                Ok(clip) => clip,
                Err(source) => return Err(AssetError::Clip { key, source }),
            };
            if let Err(source) = clip.prepare() {
                return Err(AssetError::Clip { key, source });
            }
            debug!(
                "Loaded animation '{}' ({} frames @ {} fps)",
                key,
                clip.frame_count(),
                clip.fps()
            );
            loaded.push((key, Arc::new(clip)));
        }

        let count = loaded.len();
        self.animations.extend(loaded);
        Ok(count)
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, AssetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let count = self.load_from_json_str(&json)?;
        info!("Loaded {} animations from {}", count, path.display());
        Ok(count)
    }
}

#[derive(Deserialize)]
struct StoreDef {
    animations: FxHashMap<String, ClipDef>,
}

#[derive(Deserialize)]
struct ClipDef {
    tex_key: String,
    #[serde(default)]
    frames: Vec<FrameDef>,
    #[serde(default)]
    strip: Option<StripDef>,
    #[serde(default = "default_fps")]
    fps: f32,
    #[serde(default = "default_looped")]
    looped: bool,
    #[serde(default)]
    ping_pong: bool,
    #[serde(default)]
    delay: f32,
    #[serde(default)]
    completion: CompletionBehavior,
    #[serde(default)]
    origin: Option<[f32; 2]>,
}

#[derive(Deserialize)]
struct FrameDef {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    #[serde(default)]
    origin: Option<[f32; 2]>,
}

/// Horizontal sprite-sheet strip: `frame_count` frames starting at `x, y`,
/// each `displacement` pixels apart (defaults to `width`).
#[derive(Deserialize)]
struct StripDef {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    frame_count: usize,
    #[serde(default)]
    displacement: Option<f32>,
}

fn default_fps() -> f32 {
    DEFAULT_FPS
}

fn default_looped() -> bool {
    true
}

impl ClipDef {
    fn into_clip(self) -> Result<AnimationClip, AnimationError> {
        let tex_key: Arc<str> = Arc::from(self.tex_key.as_str());

        let mut clip = AnimationClip::default()
            .with_fps(self.fps)
            .with_loop(self.looped)
            .with_ping_pong(self.ping_pong)
            .with_delay(self.delay)
            .with_completion_behavior(self.completion);

        if let Some(strip) = self.strip {
            if strip.frame_count > MAX_STRIP_FRAMES {
                return Err(AnimationError::InvalidClip {
                    reason: format!(
                        "strip frame_count {} exceeds {}",
                        strip.frame_count, MAX_STRIP_FRAMES
                    ),
                });
            }
            let step = strip.displacement.unwrap_or(strip.width);
            clip.add_frames((0..strip.frame_count).map(|i| {
                Subtexture::new(
                    Arc::clone(&tex_key),
                    Rect::new(strip.x + i as f32 * step, strip.y, strip.width, strip.height),
                )
            }));
        }

        clip.add_frames(self.frames.into_iter().map(|f| AnimationFrame {
            subtexture: Subtexture::new(
                Arc::clone(&tex_key),
                Rect::new(f.x, f.y, f.width, f.height),
            ),
            origin: f.origin.map(Vec2::from),
        }));

        if let Some(origin) = self.origin {
            clip.set_origin(Vec2::from(origin));
        }
        Ok(clip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: usize) -> Vec<Subtexture> {
        (0..n)
            .map(|i| Subtexture::new("sheet", Rect::new(i as f32 * 8.0, 0.0, 8.0, 8.0)))
            .collect()
    }

    #[test]
    fn test_non_looping_timing() {
        let clip = AnimationClip::new(frames(5)).with_fps(10.0).with_loop(false);
        let t = clip.prepare().unwrap();
        assert!((t.seconds_per_frame - 0.1).abs() < 1e-6);
        assert!((t.iteration_duration - 0.5).abs() < 1e-6);
        assert!((t.total_duration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_looping_total_is_infinite() {
        for n in [1, 3, 12] {
            let clip = AnimationClip::new(frames(n)).with_loop(true);
            assert_eq!(clip.prepare().unwrap().total_duration, f32::INFINITY);
        }
    }

    #[test]
    fn test_looping_ping_pong_total_is_infinite() {
        let clip = AnimationClip::new(frames(3)).with_ping_pong(true);
        assert_eq!(clip.prepare().unwrap().total_duration, f32::INFINITY);
    }

    #[test]
    fn test_ping_pong_total_is_two_iterations() {
        let clip = AnimationClip::new(frames(4))
            .with_fps(8.0)
            .with_loop(false)
            .with_ping_pong(true);
        let t = clip.prepare().unwrap();
        assert_eq!(t.total_duration, t.iteration_duration * 2.0);
        assert_eq!(t.iteration_duration, 0.5);
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let clip = AnimationClip::new(frames(2));
        assert!(!clip.is_prepared());
        let a = clip.prepare().unwrap();
        assert!(clip.is_prepared());
        let b = clip.prepare().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_editing_invalidates_timing() {
        let mut clip = AnimationClip::new(frames(2)).with_fps(2.0);
        assert_eq!(clip.prepare().unwrap().iteration_duration, 1.0);
        clip.add_frame(Subtexture::new("sheet", Rect::new(0.0, 8.0, 8.0, 8.0)));
        assert!(!clip.is_prepared());
        assert_eq!(clip.prepare().unwrap().iteration_duration, 1.5);
    }

    #[test]
    fn test_empty_clip_is_invalid() {
        let clip = AnimationClip::new(Vec::<Subtexture>::new());
        assert!(matches!(
            clip.prepare(),
            Err(AnimationError::InvalidClip { .. })
        ));
    }

    #[test]
    fn test_non_positive_fps_is_invalid() {
        for fps in [0.0, -5.0, f32::NAN] {
            let clip = AnimationClip::new(frames(2)).with_fps(fps);
            assert!(matches!(
                clip.prepare(),
                Err(AnimationError::InvalidClip { .. })
            ));
            assert!(!clip.is_prepared());
        }
    }

    #[test]
    fn test_set_origin_overrides_every_frame() {
        let mut clip = AnimationClip::new(frames(3));
        clip.set_origin(Vec2::new(1.0, 7.0));
        assert!(
            clip.frames()
                .iter()
                .all(|f| f.effective_origin() == Vec2::new(1.0, 7.0))
        );
    }

    #[test]
    fn test_store_loads_strip_and_frames() {
        let json = r#"{
            "animations": {
                "walk": {
                    "tex_key": "hero",
                    "strip": { "x": 0, "y": 32, "width": 16, "height": 16, "frame_count": 4, "displacement": 20 },
                    "fps": 8
                },
                "die": {
                    "tex_key": "hero",
                    "frames": [
                        { "x": 0, "y": 0, "width": 16, "height": 16 },
                        { "x": 16, "y": 0, "width": 16, "height": 16, "origin": [8, 12] }
                    ],
                    "looped": false,
                    "completion": "HideSprite"
                }
            }
        }"#;
        let mut store = AnimationStore::new();
        assert_eq!(store.load_from_json_str(json).unwrap(), 2);

        let walk = store.get("walk").unwrap();
        assert_eq!(walk.frame_count(), 4);
        assert_eq!(walk.frames()[3].subtexture.source_rect.x, 60.0);
        assert!(walk.looped());
        assert!(walk.is_prepared());

        let die = store.get("die").unwrap();
        assert_eq!(die.completion_behavior(), CompletionBehavior::HideSprite);
        assert_eq!(die.fps(), DEFAULT_FPS);
        assert_eq!(die.frames()[1].effective_origin(), Vec2::new(8.0, 12.0));
        assert_eq!(die.frames()[0].effective_origin(), Vec2::new(8.0, 8.0));
    }

    #[test]
    fn test_store_rejects_invalid_clip_without_partial_insert() {
        let json = r#"{
            "animations": {
                "ok": { "tex_key": "a", "frames": [{ "x": 0, "y": 0, "width": 1, "height": 1 }] },
                "broken": { "tex_key": "a" }
            }
        }"#;
        let mut store = AnimationStore::new();
        let err = store.load_from_json_str(json).unwrap_err();
        assert!(matches!(err, AssetError::Clip { ref key, .. } if key == "broken"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_rejects_oversized_strip() {
        let json = r#"{
            "animations": {
                "huge": {
                    "tex_key": "a",
                    "strip": { "x": 0, "y": 0, "width": 1, "height": 1, "frame_count": 10000000000 }
                }
            }
        }"#;
        let mut store = AnimationStore::new();
        let err = store.load_from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            AssetError::Clip { ref key, source: AnimationError::InvalidClip { .. } } if key == "huge"
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_rejects_malformed_json() {
        let mut store = AnimationStore::new();
        assert!(matches!(
            store.load_from_json_str("{ not json"),
            Err(AssetError::Json(_))
        ));
    }
}
