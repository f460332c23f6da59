//! # Tessera UI
//!
//! Immediate-mode window manager and interaction state machine.
//!
//! ## Frame Protocol
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          ONE FRAME                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  host fills input  →  new_frame()                            │
//! │        ↓                                                     │
//! │  begin(window) … widgets … end()       (any number, nested)  │
//! │        ↓                                                     │
//! │  render()  →  DrawData  →  host backend                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Widgets are plain calls on [`Context`] that return their interaction
//! result immediately. Nothing survives between frames except what is keyed
//! by an [`Id`]: windows, the hovered/active item, open popups and
//! persisted window settings.
//!
//! Misuse of begin/end or push/pop pairs panics where it happens.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

mod columns;
pub mod config;
mod context;
pub mod drag_drop;
pub mod error;
pub mod flags;
mod frame;
pub mod id;
pub mod input;
mod interaction;
mod layout;
mod popup;
pub mod settings;
mod token;
pub mod value;
mod widgets;
mod window;

#[cfg(test)]
mod test_support;

pub use config::{IoConfig, Style, StyleColor, StyleColors};
pub use context::{Context, InputSource, DEFAULT_FONT_SIZE};
pub use drag_drop::{Payload, PAYLOAD_TYPE_MAX_LEN};
pub use error::{UiError, UiResult};
pub use flags::{
    ButtonFlags, ColumnsFlags, Cond, DragDropFlags, FocusedFlags, HoveredFlags, ItemFlags, WindowFlags,
};
pub use frame::IMPLICIT_WINDOW_NAME;
pub use id::{Id, IdKey};
pub use input::{InputState, Key, Modifiers, MouseButton, NavInput};
pub use settings::{SettingsStore, WindowSettings};
pub use token::{ChildToken, ClipRectToken, GroupToken, IdToken, PopupToken, TooltipToken, WindowToken};
pub use value::{DataOp, DataValue};
pub use window::{Axis, Dir, SizeCallback, SizeCallbackData, Window};
