//! Tactics Board Render Library
//!
//! Surface abstraction and frame renderer for the tactics board.
//! The optional `vello-renderer` feature adds a Vello-backed surface.

mod recording;
mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{
    RenderContext, RenderResult, RendererError, StrokeStyle, Surface, render_frame,
    render_frame_or_skip, render_shape,
};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloSurface;
