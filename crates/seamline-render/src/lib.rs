//! Seamline Render Library
//!
//! Renderer abstraction and implementations for the Seamline drafting
//! canvas. The default implementation uses Vello for GPU-accelerated
//! rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, Renderer, RendererError, Theme, visible_world_rect};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;
