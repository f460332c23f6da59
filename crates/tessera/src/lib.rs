//! # Tessera
//!
//! Immediate-mode GUI core: the application describes its interface every
//! frame, Tessera keeps the little state that must survive (windows, the
//! hovered and active item, open popups) and produces triangle lists.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                              TESSERA                                │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐     │
//! │  │ tessera_core │────>│ tessera_draw │<────│   tessera_ui     │     │
//! │  │  Vec2 Rect   │     │  DrawList    │     │  Context         │     │
//! │  │  Color Stack │     │  FontAtlas   │     │  windows, ids    │     │
//! │  └──────────────┘     │  DrawData    │     │  popups, columns │     │
//! │                       └──────────────┘     └──────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `core`, `draw`, `ui`: the member crates
//! - `frame_loop`: delta-time clock and frame statistics for hosts
//! - `prelude`: the names almost every caller needs

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod frame_loop;

pub use tessera_core as core;
pub use tessera_draw as draw;
pub use tessera_ui as ui;

pub use frame_loop::{FrameClock, FrameStats};
pub use tessera_core::{Color, Rect, Vec2};
pub use tessera_draw::{DrawData, DrawList};
pub use tessera_ui::{Context, IoConfig, Style, UiError, UiResult};

/// Glob-import for application code.
pub mod prelude {
    pub use tessera_core::{Color, Rect, Vec2};
    pub use tessera_draw::{DrawCmd, DrawData, DrawList, DrawVert, TextureId};
    pub use tessera_ui::{
        ButtonFlags, ColumnsFlags, Cond, Context, Dir, DragDropFlags, FocusedFlags, HoveredFlags, Id, IoConfig,
        MouseButton, NavInput, Style, StyleColor, UiResult, WindowFlags,
    };

    pub use crate::frame_loop::FrameClock;
}
