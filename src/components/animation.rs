//! Sprite animation playback.
//!
//! [`SpriteAnimator`] holds a keyed set of [`AnimationClip`]s and the playback
//! state of the one currently active. It lives next to a
//! [`Sprite`](crate::components::sprite::Sprite) on the same entity and swaps
//! the sprite's displayed frame as time advances.
//!
//! States: *stopped* (no active clip), *playing*, *paused* (active clip, not
//! playing). A non-looping clip ends in the state chosen by its
//! [`CompletionBehavior`].
//!
//! Keys are any `Clone + Eq + Hash + Debug` type: strings, integers or a
//! game-defined enum.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use bevy_ecs::prelude::Component;
use crossbeam_channel::{Receiver, unbounded};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::components::sprite::Sprite;
use crate::errors::AnimationError;
use crate::resources::animationstore::{
    AnimationClip, AnimationStore, ClipTiming, CompletionBehavior,
};

/// Bounds required of an animation key.
pub trait AnimationKey: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> AnimationKey for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

type CompletionCallback<K> = Box<dyn FnMut(&K) + Send + Sync>;
type FrameChangedCallback<K> = Box<dyn FnMut(&K, usize) + Send + Sync>;

/// Something that happened during playback, buffered until drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimatorEvent<K> {
    FrameChanged { key: K, frame: usize },
    Completed { key: K },
}

/// Playback state of the active clip.
#[derive(Debug, Clone)]
struct Playback<K> {
    key: K,
    clip: Arc<AnimationClip>,
    timing: ClipTiming,
    total_elapsed: f32,
    elapsed_delay: f32,
    delay_complete: bool,
    is_reversed: bool,
    is_looping_back_on_ping_pong: bool,
    completed_iterations: u32,
}

/// Keyed clip collection plus the playback state machine for one sprite.
#[derive(Component)]
pub struct SpriteAnimator<K: AnimationKey> {
    animations: FxHashMap<K, Arc<AnimationClip>>,
    playback: Option<Playback<K>>,
    is_playing: bool,
    current_frame: usize,
    completion_subscribers: Vec<CompletionCallback<K>>,
    frame_changed_subscribers: Vec<FrameChangedCallback<K>>,
    events: SmallVec<[AnimatorEvent<K>; 2]>,
}

/// Animator keyed by strings, the common case for data-driven clips.
pub type NamedSpriteAnimator = SpriteAnimator<String>;

impl<K: AnimationKey> Default for SpriteAnimator<K> {
    fn default() -> Self {
        Self {
            animations: FxHashMap::default(),
            playback: None,
            is_playing: false,
            current_frame: 0,
            completion_subscribers: Vec::new(),
            frame_changed_subscribers: Vec::new(),
            events: SmallVec::new(),
        }
    }
}

impl<K: AnimationKey> fmt::Debug for SpriteAnimator<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpriteAnimator")
            .field("animations", &self.animations.len())
            .field("current_animation", &self.current_animation())
            .field("is_playing", &self.is_playing)
            .field("current_frame", &self.current_frame)
            .finish()
    }
}

impl<K: AnimationKey> SpriteAnimator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a clip under `key`, replacing any previous one. If the sprite
    /// has nothing to display yet, the clip's first frame is shown.
    pub fn add_animation(&mut self, key: K, clip: Arc<AnimationClip>, sprite: &mut Sprite) {
        if sprite.subtexture().is_none() {
            if let Some(first) = clip.frame(0) {
                sprite.set_subtexture(Some(first.subtexture.clone()));
                if let Some(origin) = first.origin {
                    sprite.set_origin(origin);
                }
            }
        }
        self.animations.insert(key, clip);
    }

    /// Registers a clip without touching any sprite.
    pub fn with_animation(mut self, key: K, clip: Arc<AnimationClip>) -> Self {
        self.animations.insert(key, clip);
        self
    }

    pub fn animation(&self, key: &K) -> Result<&Arc<AnimationClip>, AnimationError> {
        self.animations
            .get(key)
            .ok_or_else(|| AnimationError::UnknownAnimationKey {
                key: format!("{key:?}"),
            })
    }

    pub fn animation_keys(&self) -> impl Iterator<Item = &K> {
        self.animations.keys()
    }

    /// Starts `key` at `start_frame`. The frame is shown on `sprite` right
    /// away. On error nothing changes.
    pub fn play(
        &mut self,
        key: K,
        start_frame: usize,
        sprite: &mut Sprite,
    ) -> Result<Arc<AnimationClip>, AnimationError> {
        let clip = Arc::clone(self.animation(&key)?);
        let timing = clip.prepare()?;
        if start_frame >= clip.frame_count() {
            return Err(AnimationError::IndexOutOfRange {
                index: start_frame,
                len: clip.frame_count(),
            });
        }

        debug!("Playing animation {:?} from frame {}", key, start_frame);
        self.is_playing = true;
        self.current_frame = start_frame;
        select_frame(&clip, start_frame, sprite);
        self.playback = Some(Playback {
            key,
            clip: Arc::clone(&clip),
            timing,
            total_elapsed: start_frame as f32 * timing.seconds_per_frame,
            elapsed_delay: 0.0,
            delay_complete: false,
            is_reversed: false,
            is_looping_back_on_ping_pong: false,
            completed_iterations: 0,
        });
        Ok(clip)
    }

    /// True iff a clip is active and it was started under `key`.
    pub fn is_animation_playing(&self, key: &K) -> bool {
        self.playback.as_ref().is_some_and(|p| &p.key == key)
    }

    pub fn current_animation(&self) -> Option<&K> {
        self.playback.as_ref().map(|p| &p.key)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_reversed(&self) -> bool {
        self.playback.as_ref().is_some_and(|p| p.is_reversed)
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    pub fn unpause(&mut self) {
        self.is_playing = true;
    }

    /// Flips playback direction without touching elapsed time.
    pub fn reverse_direction(&mut self) {
        if let Some(p) = self.playback.as_mut() {
            p.is_reversed = !p.is_reversed;
        }
    }

    pub fn stop(&mut self) {
        if let Some(p) = self.playback.take() {
            debug!("Stopped animation {:?}", p.key);
        }
        self.is_playing = false;
    }

    /// Registers a completion subscriber. Subscribers run in registration
    /// order with the key of the clip that finished.
    pub fn on_completed(&mut self, callback: impl FnMut(&K) + Send + Sync + 'static) {
        self.completion_subscribers.push(Box::new(callback));
    }

    /// Registers a frame-changed subscriber, called with the active key and
    /// the new frame index.
    pub fn on_frame_changed(&mut self, callback: impl FnMut(&K, usize) + Send + Sync + 'static) {
        self.frame_changed_subscribers.push(Box::new(callback));
    }

    /// Returns a receiver that gets the key of every completed clip, for hosts
    /// that prefer polling over callbacks.
    pub fn completion_channel(&mut self) -> Receiver<K> {
        let (tx, rx) = unbounded();
        self.on_completed(move |key| {
            // receiver may have been dropped
            let _ = tx.send(key.clone());
        });
        rx
    }

    /// Takes the events buffered by the last [`update`](Self::update). Each
    /// update starts from an empty buffer, so undrained events are dropped.
    pub fn drain_events(&mut self) -> impl Iterator<Item = AnimatorEvent<K>> + '_ {
        self.events.drain(..)
    }

    /// Advances playback by `dt` seconds.
    pub fn update(&mut self, dt: f32, sprite: &mut Sprite) {
        self.events.clear();
        if !self.is_playing {
            return;
        }
        let Some(p) = self.playback.as_mut() else {
            return;
        };
        let clip = Arc::clone(&p.clip);
        let timing = p.timing;

        // the delay eats the first `delay` seconds before any frame advances
        if !p.delay_complete && p.elapsed_delay < clip.delay() {
            p.elapsed_delay += dt;
            if p.elapsed_delay >= clip.delay() {
                p.delay_complete = true;
            }
            return;
        }

        if p.is_reversed {
            p.total_elapsed -= dt;
        } else {
            p.total_elapsed += dt;
        }
        p.total_elapsed = p.total_elapsed.clamp(0.0, timing.total_duration);
        p.completed_iterations = (p.total_elapsed / timing.iteration_duration).floor() as u32;

        // a non-looping ping-pong clip gets exactly one forward-then-back pass
        p.is_looping_back_on_ping_pong = clip.ping_pong()
            && (clip.looped() || p.completed_iterations < 2)
            && p.completed_iterations % 2 != 0;

        let mut elapsed = p.total_elapsed;
        if p.total_elapsed >= timing.iteration_duration {
            elapsed = p.total_elapsed % timing.iteration_duration;

            if !clip.looped() && elapsed == 0.0 {
                let key = p.key.clone();
                self.is_playing = false;
                self.complete(&key);

                match clip.completion_behavior() {
                    CompletionBehavior::RemainOnFinalFrame => {}
                    CompletionBehavior::RevertToFirstFrame => {
                        self.current_frame = 0;
                        select_frame(&clip, 0, sprite);
                    }
                    CompletionBehavior::HideSprite => {
                        sprite.set_subtexture(None);
                        self.playback = None;
                    }
                }
                return;
            }
        }

        if p.is_reversed && p.total_elapsed <= 0.0 {
            p.is_reversed = false;

            if clip.looped() {
                p.total_elapsed = 0.0;
            } else {
                let key = p.key.clone();
                self.is_playing = false;
                self.complete(&key);
                return;
            }
        }

        if p.is_looping_back_on_ping_pong {
            elapsed = timing.iteration_duration - elapsed;
        }

        let last_frame = clip.frame_count() - 1;
        let desired = ((elapsed / timing.seconds_per_frame).floor().max(0.0) as usize).min(last_frame);
        if desired == self.current_frame {
            return;
        }

        self.current_frame = desired;
        select_frame(&clip, desired, sprite);

        // don't let the turning-point frame play for two frame durations
        if clip.ping_pong() && (desired == 0 || desired == last_frame) {
            if p.is_reversed {
                p.total_elapsed -= timing.seconds_per_frame;
            } else {
                p.total_elapsed += timing.seconds_per_frame;
            }
        }

        let key = p.key.clone();
        trace!("Animation {:?} -> frame {}", key, desired);
        for subscriber in &mut self.frame_changed_subscribers {
            subscriber(&key, desired);
        }
        self.events.push(AnimatorEvent::FrameChanged {
            key,
            frame: desired,
        });
    }

    fn complete(&mut self, key: &K) {
        debug!("Animation {:?} completed", key);
        for subscriber in &mut self.completion_subscribers {
            subscriber(key);
        }
        self.events
            .push(AnimatorEvent::Completed { key: key.clone() });
    }
}

impl SpriteAnimator<String> {
    /// Animator holding every clip of `store` under its store key.
    pub fn from_store(store: &AnimationStore, sprite: &mut Sprite) -> Self {
        let mut animator = Self::new();
        let mut keys: Vec<&String> = store.animations.keys().collect();
        keys.sort();
        for key in keys {
            if let Some(clip) = store.get(key) {
                animator.add_animation(key.clone(), Arc::clone(clip), sprite);
            }
        }
        animator
    }
}

/// Shows frame `index` of `clip` on `sprite`.
fn select_frame(clip: &AnimationClip, index: usize, sprite: &mut Sprite) {
    if let Some(frame) = clip.frame(index) {
        sprite.set_subtexture(Some(frame.subtexture.clone()));
        sprite.set_origin(frame.effective_origin());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use glam::Vec2;

    use super::*;
    use crate::components::sprite::Subtexture;
    use crate::geometry::Rect;

    fn strip(n: usize) -> Vec<Subtexture> {
        (0..n)
            .map(|i| Subtexture::new("sheet", Rect::new(i as f32 * 10.0, 0.0, 10.0, 10.0)))
            .collect()
    }

    fn shown_x(sprite: &Sprite) -> Option<f32> {
        sprite.subtexture().map(|s| s.source_rect.x)
    }

    fn animator_with(key: &str, clip: AnimationClip) -> (NamedSpriteAnimator, Sprite) {
        let mut sprite = Sprite::empty();
        let mut animator = NamedSpriteAnimator::new();
        animator.add_animation(key.to_string(), Arc::new(clip), &mut sprite);
        (animator, sprite)
    }

    #[test]
    fn test_add_animation_shows_first_frame_on_empty_sprite() {
        let (_, sprite) = animator_with("idle", AnimationClip::new(strip(3)));
        assert_eq!(shown_x(&sprite), Some(0.0));
    }

    #[test]
    fn test_play_selects_start_frame_immediately() {
        let (mut animator, mut sprite) = animator_with("walk", AnimationClip::new(strip(4)));
        animator.play("walk".into(), 2, &mut sprite).unwrap();
        assert_eq!(animator.current_frame(), 2);
        assert!(animator.is_playing());
        assert_eq!(shown_x(&sprite), Some(20.0));
    }

    #[test]
    fn test_play_unknown_key_changes_nothing() {
        let (mut animator, mut sprite) = animator_with("walk", AnimationClip::new(strip(4)));
        let err = animator.play("run".into(), 0, &mut sprite).unwrap_err();
        assert!(matches!(err, AnimationError::UnknownAnimationKey { .. }));
        assert!(!animator.is_playing());
        assert!(animator.current_animation().is_none());
    }

    #[test]
    fn test_play_out_of_range_start_frame() {
        let (mut animator, mut sprite) = animator_with("walk", AnimationClip::new(strip(4)));
        let err = animator.play("walk".into(), 4, &mut sprite).unwrap_err();
        assert_eq!(err, AnimationError::IndexOutOfRange { index: 4, len: 4 });
        assert!(!animator.is_playing());
    }

    #[test]
    fn test_play_invalid_clip() {
        let (mut animator, mut sprite) =
            animator_with("bad", AnimationClip::new(strip(2)).with_fps(0.0));
        assert!(matches!(
            animator.play("bad".into(), 0, &mut sprite),
            Err(AnimationError::InvalidClip { .. })
        ));
    }

    #[test]
    fn test_non_looping_completes_once_on_boundary() {
        let clip = AnimationClip::new(strip(4)).with_fps(4.0).with_loop(false);
        let (mut animator, mut sprite) = animator_with("attack", clip);
        let completions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&completions);
        animator.on_completed(move |key| sink.lock().unwrap().push(key.clone()));

        animator.play("attack".into(), 0, &mut sprite).unwrap();
        for expected in 1..=3 {
            animator.update(0.25, &mut sprite);
            assert_eq!(animator.current_frame(), expected);
            assert!(animator.is_playing());
        }
        assert!(completions.lock().unwrap().is_empty());

        animator.update(0.25, &mut sprite);
        assert!(!animator.is_playing());
        assert_eq!(animator.current_frame(), 3);
        assert_eq!(shown_x(&sprite), Some(30.0));

        animator.update(0.25, &mut sprite);
        animator.update(0.25, &mut sprite);
        assert_eq!(*completions.lock().unwrap(), vec!["attack".to_string()]);
    }

    #[test]
    fn test_revert_to_first_frame_on_completion() {
        let clip = AnimationClip::new(strip(2))
            .with_fps(2.0)
            .with_loop(false)
            .with_completion_behavior(CompletionBehavior::RevertToFirstFrame);
        let (mut animator, mut sprite) = animator_with("blink", clip);
        animator.play("blink".into(), 0, &mut sprite).unwrap();
        animator.update(0.5, &mut sprite);
        assert_eq!(animator.current_frame(), 1);
        animator.update(0.5, &mut sprite);
        assert!(!animator.is_playing());
        assert_eq!(animator.current_frame(), 0);
        assert_eq!(shown_x(&sprite), Some(0.0));
        assert!(animator.is_animation_playing(&"blink".to_string()));
    }

    #[test]
    fn test_hide_sprite_on_completion() {
        let clip = AnimationClip::new(strip(2))
            .with_fps(2.0)
            .with_loop(false)
            .with_completion_behavior(CompletionBehavior::HideSprite);
        let (mut animator, mut sprite) = animator_with("poof", clip);
        animator.play("poof".into(), 0, &mut sprite).unwrap();
        animator.update(0.5, &mut sprite);
        animator.update(0.5, &mut sprite);
        assert!(sprite.subtexture().is_none());
        assert!(animator.current_animation().is_none());
        assert!(!animator.is_playing());
    }

    #[test]
    fn test_looping_wraps_around() {
        let clip = AnimationClip::new(strip(3)).with_fps(4.0);
        let (mut animator, mut sprite) = animator_with("spin", clip);
        animator.play("spin".into(), 0, &mut sprite).unwrap();
        let mut seen = Vec::new();
        for _ in 0..7 {
            animator.update(0.25, &mut sprite);
            seen.push(animator.current_frame());
        }
        assert_eq!(seen, vec![1, 2, 0, 1, 2, 0, 1]);
        assert!(animator.is_playing());
    }

    #[test]
    fn test_ping_pong_mirrors_frame_order() {
        let clip = AnimationClip::new(strip(3)).with_fps(3.0).with_ping_pong(true);
        let (mut animator, mut sprite) = animator_with("bob", clip);
        let frames = Arc::new(Mutex::new(vec![0usize]));
        let sink = Arc::clone(&frames);
        animator.on_frame_changed(move |_, frame| sink.lock().unwrap().push(frame));

        animator.play("bob".into(), 0, &mut sprite).unwrap();
        for _ in 0..44 {
            animator.update(0.05, &mut sprite);
        }
        assert_eq!(*frames.lock().unwrap(), vec![0, 1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_ping_pong_without_loop_runs_one_round_trip() {
        let clip = AnimationClip::new(strip(3))
            .with_fps(3.0)
            .with_loop(false)
            .with_ping_pong(true);
        let (mut animator, mut sprite) = animator_with("wave", clip);
        let done = animator.completion_channel();

        animator.play("wave".into(), 0, &mut sprite).unwrap();
        let mut frames = vec![0usize];
        for _ in 0..80 {
            animator.update(0.05, &mut sprite);
            if *frames.last().unwrap() != animator.current_frame() {
                frames.push(animator.current_frame());
            }
        }
        assert_eq!(frames, vec![0, 1, 2, 1, 0]);
        assert!(!animator.is_playing());
        assert_eq!(done.try_iter().collect::<Vec<_>>(), vec!["wave".to_string()]);
    }

    #[test]
    fn test_delay_holds_first_frame() {
        let clip = AnimationClip::new(strip(4)).with_fps(10.0).with_delay(0.2);
        let (mut animator, mut sprite) = animator_with("idle", clip);
        animator.play("idle".into(), 0, &mut sprite).unwrap();

        for _ in 0..2 {
            animator.update(0.1, &mut sprite);
            assert_eq!(animator.current_frame(), 0);
        }
        // delay spent; the next tick advances normally
        animator.update(0.1, &mut sprite);
        assert_eq!(animator.current_frame(), 1);
    }

    #[test]
    fn test_delay_with_one_large_tick() {
        let clip = AnimationClip::new(strip(4)).with_fps(10.0).with_delay(0.2);
        let (mut animator, mut sprite) = animator_with("idle", clip);
        animator.play("idle".into(), 0, &mut sprite).unwrap();
        animator.update(1.0, &mut sprite);
        assert_eq!(animator.current_frame(), 0);
        animator.update(0.1, &mut sprite);
        assert_eq!(animator.current_frame(), 1);
    }

    #[test]
    fn test_replay_resets_delay() {
        let clip = AnimationClip::new(strip(4)).with_fps(10.0).with_delay(0.2);
        let (mut animator, mut sprite) = animator_with("idle", clip);
        animator.play("idle".into(), 0, &mut sprite).unwrap();
        animator.update(0.3, &mut sprite);
        animator.play("idle".into(), 0, &mut sprite).unwrap();
        animator.update(0.1, &mut sprite);
        assert_eq!(animator.current_frame(), 0);
    }

    #[test]
    fn test_pause_and_unpause() {
        let (mut animator, mut sprite) =
            animator_with("walk", AnimationClip::new(strip(4)).with_fps(4.0));
        animator.play("walk".into(), 0, &mut sprite).unwrap();
        animator.pause();
        animator.update(0.25, &mut sprite);
        assert_eq!(animator.current_frame(), 0);
        assert!(animator.is_animation_playing(&"walk".to_string()));
        animator.unpause();
        animator.update(0.25, &mut sprite);
        assert_eq!(animator.current_frame(), 1);
    }

    #[test]
    fn test_stop_then_tick_is_noop() {
        let (mut animator, mut sprite) =
            animator_with("walk", AnimationClip::new(strip(4)).with_fps(4.0));
        animator.play("walk".into(), 1, &mut sprite).unwrap();
        animator.stop();
        animator.update(0.25, &mut sprite);
        animator.unpause();
        animator.update(0.25, &mut sprite);
        assert_eq!(animator.current_frame(), 1);
        assert_eq!(shown_x(&sprite), Some(10.0));
        assert!(!animator.is_animation_playing(&"walk".to_string()));
        assert_eq!(animator.drain_events().count(), 0);
    }

    #[test]
    fn test_reverse_on_looping_clip_wraps_at_zero() {
        let (mut animator, mut sprite) =
            animator_with("walk", AnimationClip::new(strip(4)).with_fps(4.0));
        animator.play("walk".into(), 2, &mut sprite).unwrap();
        animator.reverse_direction();
        assert!(animator.is_reversed());

        animator.update(0.25, &mut sprite);
        assert_eq!(animator.current_frame(), 1);
        animator.update(0.25, &mut sprite);
        assert_eq!(animator.current_frame(), 0);
        // reaching zero while reversed on a looping clip un-reverses
        assert!(!animator.is_reversed());
        assert!(animator.is_playing());
        animator.update(0.25, &mut sprite);
        assert_eq!(animator.current_frame(), 1);
    }

    #[test]
    fn test_reverse_to_zero_on_non_looping_clip_completes_without_behavior() {
        let clip = AnimationClip::new(strip(4))
            .with_fps(4.0)
            .with_loop(false)
            .with_completion_behavior(CompletionBehavior::HideSprite);
        let (mut animator, mut sprite) = animator_with("door", clip);
        let done = animator.completion_channel();
        animator.play("door".into(), 1, &mut sprite).unwrap();
        animator.reverse_direction();

        animator.update(0.25, &mut sprite);
        assert!(!animator.is_playing());
        assert_eq!(done.try_recv().ok(), Some("door".to_string()));
        // HideSprite is not applied on this path
        assert!(sprite.subtexture().is_some());
        assert!(animator.current_animation().is_some());
    }

    #[test]
    fn test_completion_subscribers_run_in_registration_order() {
        let clip = AnimationClip::new(strip(1)).with_fps(1.0).with_loop(false);
        let (mut animator, mut sprite) = animator_with("once", clip);
        let order = Arc::new(Mutex::new(Vec::new()));
        for id in 0..3 {
            let sink = Arc::clone(&order);
            animator.on_completed(move |_| sink.lock().unwrap().push(id));
        }
        animator.play("once".into(), 0, &mut sprite).unwrap();
        animator.update(1.0, &mut sprite);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_drain_events_reports_frames_and_completion() {
        let clip = AnimationClip::new(strip(2)).with_fps(2.0).with_loop(false);
        let (mut animator, mut sprite) = animator_with("hit", clip);
        animator.play("hit".into(), 0, &mut sprite).unwrap();
        animator.update(0.5, &mut sprite);
        let events: Vec<_> = animator.drain_events().collect();
        assert_eq!(
            events,
            vec![AnimatorEvent::FrameChanged {
                key: "hit".to_string(),
                frame: 1
            }]
        );
        animator.update(0.5, &mut sprite);
        let events: Vec<_> = animator.drain_events().collect();
        assert_eq!(
            events,
            vec![AnimatorEvent::Completed {
                key: "hit".to_string()
            }]
        );
        assert_eq!(animator.drain_events().count(), 0);
    }

    #[test]
    fn test_undrained_events_do_not_accumulate() {
        let (mut animator, mut sprite) =
            animator_with("walk", AnimationClip::new(strip(4)).with_fps(4.0));
        let frames = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&frames);
        animator.on_frame_changed(move |_, _| *sink.lock().unwrap() += 1);
        animator.play("walk".into(), 0, &mut sprite).unwrap();

        for _ in 0..10_000 {
            animator.update(0.25, &mut sprite);
        }
        assert_eq!(*frames.lock().unwrap(), 10_000);
        assert_eq!(animator.drain_events().count(), 1);
    }

    #[test]
    fn test_frame_origin_override_is_applied() {
        let mut clip = AnimationClip::new(strip(2)).with_fps(2.0);
        clip.set_origin(Vec2::new(3.0, 9.0));
        let (mut animator, mut sprite) = animator_with("walk", clip);
        animator.play("walk".into(), 1, &mut sprite).unwrap();
        assert_eq!(sprite.origin(), Vec2::new(3.0, 9.0));
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Anim {
        Idle,
        Run,
    }

    #[test]
    fn test_enum_keys() {
        let mut sprite = Sprite::empty();
        let mut animator = SpriteAnimator::<Anim>::new();
        animator.add_animation(Anim::Idle, Arc::new(AnimationClip::new(strip(2))), &mut sprite);
        animator.add_animation(Anim::Run, Arc::new(AnimationClip::new(strip(3))), &mut sprite);
        animator.play(Anim::Run, 0, &mut sprite).unwrap();
        assert!(animator.is_animation_playing(&Anim::Run));
        assert!(!animator.is_animation_playing(&Anim::Idle));
        assert_eq!(animator.animation_keys().count(), 2);
    }

    #[test]
    fn test_shared_clip_plays_independently() {
        let clip = Arc::new(AnimationClip::new(strip(4)).with_fps(4.0));
        let mut a_sprite = Sprite::empty();
        let mut b_sprite = Sprite::empty();
        let mut a = NamedSpriteAnimator::new();
        let mut b = NamedSpriteAnimator::new();
        a.add_animation("walk".into(), Arc::clone(&clip), &mut a_sprite);
        b.add_animation("walk".into(), Arc::clone(&clip), &mut b_sprite);
        a.play("walk".into(), 0, &mut a_sprite).unwrap();
        b.play("walk".into(), 2, &mut b_sprite).unwrap();
        a.update(0.25, &mut a_sprite);
        b.update(0.25, &mut b_sprite);
        assert_eq!(a.current_frame(), 1);
        assert_eq!(b.current_frame(), 3);
    }

    #[test]
    fn test_from_store_registers_every_clip() {
        let mut store = AnimationStore::new();
        store.insert("a", AnimationClip::new(strip(2))).unwrap();
        store.insert("b", AnimationClip::new(strip(3))).unwrap();
        let mut sprite = Sprite::empty();
        let animator = NamedSpriteAnimator::from_store(&store, &mut sprite);
        assert_eq!(animator.animation_keys().count(), 2);
        assert_eq!(animator.animation(&"b".to_string()).unwrap().frame_count(), 3);
        assert!(sprite.subtexture().is_some());
    }
}
