//! Renderer list resource.
//!
//! A [`Renderer`] decides which renderables a render pass draws and through
//! which camera. The [`Renderers`] resource keeps them sorted by
//! `render_order`; [`systems::render::render_all`](crate::systems::render::render_all)
//! runs them in that order, leaving the ones flagged
//! `wants_to_render_after_post_processors` for a second batch.

use bevy_ecs::prelude::Resource;
use log::debug;

use crate::resources::camera2d::Camera2D;

/// Which render layers a renderer draws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererKind {
    /// Every renderable.
    Default,
    /// Every renderable except those on the listed layers.
    RenderLayerExclude(Vec<i32>),
    /// Only the listed layers, drawn layer by layer in descending order.
    ScreenSpace(Vec<i32>),
}

impl RendererKind {
    pub fn includes_layer(&self, layer: i32) -> bool {
        match self {
            RendererKind::Default => true,
            RendererKind::RenderLayerExclude(excluded) => !excluded.contains(&layer),
            RendererKind::ScreenSpace(layers) => layers.contains(&layer),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    pub render_order: i32,
    pub kind: RendererKind,
    /// Own camera; `None` uses the shared [`Camera2D`] resource.
    pub camera: Option<Camera2D>,
    pub should_debug_render: bool,
    pub wants_to_render_after_post_processors: bool,
}

impl Renderer {
    pub fn new(render_order: i32, kind: RendererKind) -> Self {
        Self {
            render_order,
            kind,
            camera: None,
            should_debug_render: true,
            wants_to_render_after_post_processors: false,
        }
    }

    pub fn default_renderer() -> Self {
        Self::new(0, RendererKind::Default)
    }

    pub fn render_layer_exclude(render_order: i32, layers: impl Into<Vec<i32>>) -> Self {
        Self::new(render_order, RendererKind::RenderLayerExclude(layers.into()))
    }

    /// Fixed camera sized to the back buffer; renders after post processing.
    pub fn screen_space(
        render_order: i32,
        layers: impl Into<Vec<i32>>,
        width: f32,
        height: f32,
    ) -> Self {
        let mut layers = layers.into();
        layers.sort_unstable_by(|a, b| b.cmp(a));
        Self {
            camera: Some(Camera2D::screen_space(width, height)),
            wants_to_render_after_post_processors: true,
            ..Self::new(render_order, RendererKind::ScreenSpace(layers))
        }
    }

    pub fn with_camera(mut self, camera: Camera2D) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_debug_render(mut self, enabled: bool) -> Self {
        self.should_debug_render = enabled;
        self
    }

    /// Screen-space renderers rebuild their camera for the new size.
    pub fn on_back_buffer_resized(&mut self, width: f32, height: f32) {
        if matches!(self.kind, RendererKind::ScreenSpace(_)) {
            self.camera = Some(Camera2D::screen_space(width, height));
        }
    }
}

/// Renderers of the scene, sorted by `render_order`.
#[derive(Resource, Debug, Clone, Default)]
pub struct Renderers {
    renderers: Vec<Renderer>,
}

impl Renderers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts keeping the list sorted; equal orders keep insertion order.
    pub fn add(&mut self, renderer: Renderer) {
        let at = self
            .renderers
            .partition_point(|r| r.render_order <= renderer.render_order);
        debug!(
            "Adding renderer {:?} with order {}",
            renderer.kind, renderer.render_order
        );
        self.renderers.insert(at, renderer);
    }

    pub fn with(mut self, renderer: Renderer) -> Self {
        self.add(renderer);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Renderer> {
        self.renderers.iter()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    pub fn clear(&mut self) {
        self.renderers.clear();
    }

    pub fn on_back_buffer_resized(&mut self, width: f32, height: f32) {
        for renderer in &mut self.renderers {
            renderer.on_back_buffer_resized(width, height);
        }
    }
}
