//! # Tessera Draw
//!
//! Turns declarative draw calls into batched, anti-aliased triangle lists.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       DRAW LIST                            │
//! ├────────────────────────────────────────────────────────────┤
//! │  path_*  →  path_stroke / path_fill_convex  →  prim_*      │
//! │     ↓                  ↓                          ↓        │
//! │  points          tessellation             vtx/idx buffers  │
//! │                                                   ↓        │
//! │  clip/texture stacks  →  DrawCmd batching  →  DrawData     │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! A [`DrawList`] owns its buffers exclusively. [`DrawData`] borrows a set of
//! lists for the duration of one render pass.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod channels;
pub mod cmd;
pub mod data;
pub mod error;
pub mod font;
pub mod list;
mod path;
pub mod shared;
mod shapes;
mod tessellate;
pub mod vertex;

pub use cmd::{DrawCallback, DrawCmd};
pub use data::DrawData;
pub use error::{AtlasError, AtlasResult};
pub use font::{Font, FontAtlas, FontConfig, FontIndex, Glyph, GlyphBitmap, SharedFontAtlas};
pub use list::{Corners, DrawList, DrawListFlags};
pub use shared::DrawListSharedData;
pub use vertex::{DrawIdx, DrawVert, TextureId};
