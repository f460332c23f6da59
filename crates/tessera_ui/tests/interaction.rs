//! Press/hold/release timelines for clickable items, driven through whole
//! frames the way a host would.

use tessera_core::{Rect, Vec2};
use tessera_ui::{Cond, Context, HoveredFlags, InputSource, IoConfig, MouseButton, NavInput, Style, WindowFlags};

#[derive(Debug, Default, Clone, Copy)]
struct ButtonState {
    rect: Rect,
    hovered: bool,
    active: bool,
    pressed: bool,
}

fn context() -> Context {
    let mut ctx = Context::new(IoConfig::default(), Style::default()).unwrap();
    ctx.input_mut().display_size = Vec2::new(800.0, 600.0);
    ctx.input_mut().delta_time = 1.0 / 60.0;
    ctx
}

fn button_frame(ctx: &mut Context) -> ButtonState {
    ctx.new_frame();
    ctx.set_next_window_pos(Vec2::new(50.0, 50.0), Cond::FIRST_USE_EVER, Vec2::ZERO);
    ctx.set_next_window_size(Vec2::new(300.0, 200.0), Cond::FIRST_USE_EVER);
    ctx.begin("Panel", WindowFlags::empty());
    let pressed = ctx.button("Go", Vec2::new(80.0, 20.0));
    let state = ButtonState {
        rect: ctx.item_rect(),
        hovered: ctx.is_item_hovered(HoveredFlags::empty()),
        active: ctx.is_item_active(),
        pressed,
    };
    ctx.end();
    let _ = ctx.render();
    state
}

/// Context with the panel submitted once and the mouse over the button.
fn hovering_button() -> (Context, Vec2) {
    let mut ctx = context();
    let first = button_frame(&mut ctx);
    let center = first.rect.center();
    ctx.input_mut().mouse_pos = center;
    let state = button_frame(&mut ctx);
    assert!(state.hovered);
    assert!(!state.pressed);
    (ctx, center)
}

#[test]
fn test_press_fires_once_on_release() {
    let (mut ctx, _) = hovering_button();

    ctx.input_mut().set_mouse_button(MouseButton::Left, true);
    let down = button_frame(&mut ctx);
    assert!(!down.pressed, "click-release buttons do not fire on click");
    assert!(down.active);

    let held = button_frame(&mut ctx);
    assert!(!held.pressed);
    assert!(held.active);
    assert_eq!(ctx.active_id_source(), InputSource::Mouse);

    ctx.input_mut().set_mouse_button(MouseButton::Left, false);
    let released = button_frame(&mut ctx);
    assert!(released.pressed);
    assert!(!released.active);

    let after = button_frame(&mut ctx);
    assert!(!after.pressed);
    assert!(ctx.active_id().is_none());
}

#[test]
fn test_release_outside_cancels_press() {
    let (mut ctx, _) = hovering_button();

    ctx.input_mut().set_mouse_button(MouseButton::Left, true);
    button_frame(&mut ctx);

    ctx.input_mut().mouse_pos = Vec2::new(700.0, 500.0);
    let dragged = button_frame(&mut ctx);
    assert!(dragged.active, "holding keeps the item active off its rect");
    assert!(!dragged.hovered);

    ctx.input_mut().set_mouse_button(MouseButton::Left, false);
    let released = button_frame(&mut ctx);
    assert!(!released.pressed);
    assert!(ctx.active_id().is_none());
}

#[test]
fn test_active_item_blocks_hover_elsewhere() {
    let mut ctx = context();
    let submit = |ctx: &mut Context| {
        ctx.new_frame();
        ctx.set_next_window_pos(Vec2::new(10.0, 10.0), Cond::FIRST_USE_EVER, Vec2::ZERO);
        ctx.set_next_window_size(Vec2::new(300.0, 200.0), Cond::FIRST_USE_EVER);
        ctx.begin("Pair", WindowFlags::empty());
        ctx.button("A", Vec2::new(60.0, 20.0));
        let a = ctx.item_rect();
        ctx.button("B", Vec2::new(60.0, 20.0));
        let b = ctx.item_rect();
        let b_hovered = ctx.is_item_hovered(HoveredFlags::empty());
        ctx.end();
        let _ = ctx.render();
        (a, b, b_hovered)
    };

    let (a, b, _) = submit(&mut ctx);
    ctx.input_mut().mouse_pos = a.center();
    submit(&mut ctx);
    ctx.input_mut().set_mouse_button(MouseButton::Left, true);
    submit(&mut ctx);
    let a_id = ctx.active_id();
    assert!(a_id.is_some());

    ctx.input_mut().mouse_pos = b.center();
    let (_, _, b_hovered) = submit(&mut ctx);
    assert!(!b_hovered);
    assert_eq!(ctx.active_id(), a_id);
    assert!(ctx.hovered_id().is_none() || ctx.hovered_id() == a_id);
}

#[test]
fn test_activate_nav_input_presses_focused_item() {
    let (mut ctx, _) = hovering_button();

    // A click moves nav focus onto the button.
    ctx.input_mut().set_mouse_button(MouseButton::Left, true);
    button_frame(&mut ctx);
    ctx.input_mut().set_mouse_button(MouseButton::Left, false);
    button_frame(&mut ctx);
    assert!(ctx.nav_id().is_some());

    ctx.input_mut().mouse_pos = Vec2::new(-f32::MAX, -f32::MAX);
    button_frame(&mut ctx);

    ctx.input_mut().set_nav_input(NavInput::Activate, true);
    let pressed = button_frame(&mut ctx);
    assert!(pressed.pressed);
    assert_eq!(ctx.active_id_source(), InputSource::Nav);

    let held = button_frame(&mut ctx);
    assert!(!held.pressed);
    assert!(held.active);

    ctx.input_mut().set_nav_input(NavInput::Activate, false);
    let released = button_frame(&mut ctx);
    assert!(!released.pressed);
    assert!(ctx.active_id().is_none());
}

#[test]
fn test_cancel_releases_active_item() {
    let (mut ctx, _) = hovering_button();
    ctx.input_mut().set_mouse_button(MouseButton::Left, true);
    button_frame(&mut ctx);
    assert!(ctx.active_id().is_some());

    ctx.input_mut().set_nav_input(NavInput::Cancel, true);
    ctx.input_mut().set_mouse_button(MouseButton::Left, false);
    let state = button_frame(&mut ctx);
    assert!(!state.pressed);
    assert!(ctx.active_id().is_none());
}
