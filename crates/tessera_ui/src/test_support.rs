//! Shared fixtures for unit tests.

use tessera_core::Vec2;

use crate::config::{IoConfig, Style};
use crate::context::Context;

/// Context with an 800x600 display running at 60 Hz, no settings file.
pub(crate) fn test_context() -> Context {
    let mut ctx = Context::new(IoConfig::default(), Style::default()).expect("default font atlas builds");
    let input = ctx.input_mut();
    input.display_size = Vec2::new(800.0, 600.0);
    input.delta_time = 1.0 / 60.0;
    ctx
}

/// Runs one full frame around `f` and returns its result.
pub(crate) fn frame<R>(ctx: &mut Context, f: impl FnOnce(&mut Context) -> R) -> R {
    ctx.new_frame();
    let out = f(ctx);
    let _ = ctx.render();
    out
}
