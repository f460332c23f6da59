//! # Tessera Core
//!
//! Value types shared by every layer of the immediate-mode pipeline:
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │  Vec2 / Rect │   │    Color     │   │   Stack<T>   │
//! │  geometry    │   │  RGBA + u32  │   │  push / pop  │
//! └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!        └──────────────────┼──────────────────┘
//!                 draw lists, windows, ids
//! ```
//!
//! Nothing in here knows about windows or draw commands. Stacks panic on
//! misuse because an unbalanced push/pop corrupts every widget submitted
//! after it in the same frame.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod color;
pub mod math;
pub mod stack;

pub use color::{Color, PackedColor};
pub use math::{Rect, Vec2};
pub use stack::Stack;
