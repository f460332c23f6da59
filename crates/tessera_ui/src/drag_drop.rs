//! # Drag and Drop
//!
//! ```text
//! source item held + mouse dragged ──► begin_drag_drop_source ──► payload set
//!                                                                   │
//!        target item hovered ──► begin_drag_drop_target ──► accept_drag_drop_payload
//!                                                                   │
//!                           mouse released over accepted target ──► delivery
//! ```
//!
//! The payload is a typed byte buffer. With the mouse up it stays alive for
//! exactly one frame after its source last submitted it, and a delivered
//! payload is gone by the next frame.

use tessera_core::Rect;
use tracing::debug;

use crate::config::StyleColor;
use crate::context::Context;
use crate::flags::{Cond, DragDropFlags, ItemStatusFlags};
use crate::id::Id;
use crate::input::MouseButton;

/// Longest accepted payload type tag, in bytes.
pub const PAYLOAD_TYPE_MAX_LEN: usize = 32;

/// Data carried from a drag source to a drop target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    /// User-chosen tag; targets only accept matching tags.
    pub data_type: String,
    /// Raw bytes copied from the source.
    pub data: Vec<u8>,
    /// Item that started the drag.
    pub source_id: Id,
    /// Top of the source window's id stack.
    pub source_parent_id: Id,
    /// Frame the source last set the data, `None` before it does.
    pub data_frame_count: Option<u64>,
    /// A target accepted the payload last frame and is previewing it.
    pub preview: bool,
    /// The mouse was released over the accepting target this frame.
    pub delivery: bool,
}

impl Payload {
    /// Returns true if the payload carries `data_type`.
    #[must_use]
    pub fn is_data_type(&self, data_type: &str) -> bool {
        self.data_frame_count.is_some() && self.data_type == data_type
    }
}

/// Drag and drop state on the context.
#[derive(Debug, Clone)]
pub(crate) struct DragDropState {
    pub active: bool,
    pub within_source_or_target: bool,
    pub source_flags: DragDropFlags,
    pub source_frame_count: u64,
    pub mouse_button: MouseButton,
    pub payload: Payload,
    pub target_rect: Rect,
    pub target_id: Id,
    pub accept_flags: DragDropFlags,
    pub accept_id_curr: Id,
    pub accept_id_curr_rect_surface: f32,
    pub accept_id_prev: Id,
    pub accept_frame_count: Option<u64>,
}

impl Default for DragDropState {
    fn default() -> Self {
        Self {
            active: false,
            within_source_or_target: false,
            source_flags: DragDropFlags::empty(),
            source_frame_count: 0,
            mouse_button: MouseButton::Left,
            payload: Payload::default(),
            target_rect: Rect::ZERO,
            target_id: Id::NONE,
            accept_flags: DragDropFlags::empty(),
            accept_id_curr: Id::NONE,
            accept_id_curr_rect_surface: f32::MAX,
            accept_id_prev: Id::NONE,
            accept_frame_count: None,
        }
    }
}

impl DragDropState {
    fn clear(&mut self) {
        self.active = false;
        self.payload = Payload::default();
        self.accept_id_curr = Id::NONE;
        self.accept_id_prev = Id::NONE;
        self.accept_id_curr_rect_surface = f32::MAX;
        self.accept_frame_count = None;
    }

    /// Rolls the accepted target over to the previous frame.
    pub(crate) fn new_frame(&mut self) {
        self.accept_id_prev = self.accept_id_curr;
        self.accept_id_curr = Id::NONE;
        self.accept_id_curr_rect_surface = f32::MAX;
    }
}

impl Context {
    /// Call after a draggable item. Returns true while that item is being
    /// dragged; then set a payload and call
    /// [`Context::end_drag_drop_source`]. Content submitted in between
    /// goes into the preview tooltip.
    pub fn begin_drag_drop_source(&mut self, flags: DragDropFlags) -> bool {
        let button = MouseButton::Left;
        let (source_window, source_id, source_parent_id, drag_active) = if flags.contains(DragDropFlags::SOURCE_EXTERN) {
            (None, Id::from_name("#SourceExtern"), Id::NONE, true)
        } else {
            let idx = self.cur();
            let mut source_id = self.windows[idx].dc.last_item_id;
            if source_id.is_some() && self.active_id != source_id {
                return false;
            }
            if !self.input.is_mouse_down(button) {
                return false;
            }
            if source_id.is_none() {
                assert!(
                    flags.contains(DragDropFlags::SOURCE_ALLOW_NULL_ID),
                    "drag source on an item without id needs SOURCE_ALLOW_NULL_ID"
                );
                // Throwaway id from the item's rect; it is lost if the item
                // moves during the drag.
                let w = &self.windows[idx];
                let hovered = w.dc.last_item_status_flags.contains(ItemStatusFlags::HOVERED_RECT);
                if !hovered && (self.active_id.is_none() || self.active_id_window != Some(idx)) {
                    return false;
                }
                source_id = w.id_from_rect(&w.dc.last_item_rect);
                self.windows[idx].dc.last_item_id = source_id;
                if hovered {
                    self.set_hovered_id(source_id);
                }
                if hovered && self.input.is_mouse_clicked(button, false, &self.io) {
                    self.set_active_id(source_id, Some(idx));
                    self.focus_window(Some(idx));
                }
                if self.active_id == source_id {
                    self.active_id_allow_overlap = hovered;
                }
            }
            if self.active_id != source_id {
                return false;
            }
            let parent = self.windows[idx].id_stack.top_or(Id::NONE);
            (Some(idx), source_id, parent, self.input.is_mouse_dragging(button, -1.0, &self.io))
        };
        if !drag_active {
            return false;
        }

        if !self.drag_drop.active {
            self.drag_drop.clear();
            self.drag_drop.payload.source_id = source_id;
            self.drag_drop.payload.source_parent_id = source_parent_id;
            self.drag_drop.active = true;
            self.drag_drop.source_flags = flags;
            self.drag_drop.mouse_button = button;
            debug!(source = %source_id, "drag started");
        }
        self.drag_drop.source_frame_count = self.frame_count;
        self.drag_drop.within_source_or_target = true;

        if !flags.contains(DragDropFlags::SOURCE_NO_PREVIEW_TOOLTIP) {
            self.begin_tooltip();
        }
        if let Some(idx) = source_window {
            if !flags.contains(DragDropFlags::SOURCE_NO_DISABLE_HOVER) {
                self.windows[idx].dc.last_item_status_flags.remove(ItemStatusFlags::HOVERED_RECT);
            }
        }
        true
    }

    /// Closes a drag source. A drag that never received a payload is
    /// cancelled.
    ///
    /// # Panics
    ///
    /// Panics if not paired with a successful `begin_drag_drop_source`.
    pub fn end_drag_drop_source(&mut self) {
        assert!(
            self.drag_drop.active && self.drag_drop.within_source_or_target,
            "end_drag_drop_source() without begin_drag_drop_source()"
        );
        if !self.drag_drop.source_flags.contains(DragDropFlags::SOURCE_NO_PREVIEW_TOOLTIP) {
            self.end_tooltip();
        }
        if self.drag_drop.payload.data_frame_count.is_none() {
            self.drag_drop.clear();
        }
        self.drag_drop.within_source_or_target = false;
    }

    /// Sets the payload of the active drag. `cond` is `ALWAYS` (copy every
    /// frame) or `ONCE` (copy on the first call only). Returns true if a
    /// target accepted the payload this frame or the last.
    ///
    /// # Panics
    ///
    /// Panics outside a drag source or if `data_type` is too long.
    pub fn set_drag_drop_payload(&mut self, data_type: &str, data: &[u8], cond: Cond) -> bool {
        assert!(
            data_type.len() <= PAYLOAD_TYPE_MAX_LEN,
            "payload type '{data_type}' exceeds {PAYLOAD_TYPE_MAX_LEN} bytes"
        );
        let cond = if cond.is_empty() { Cond::ALWAYS } else { cond };
        assert!(
            cond == Cond::ALWAYS || cond == Cond::ONCE,
            "set_drag_drop_payload() accepts only ALWAYS or ONCE"
        );
        let frame = self.frame_count;
        let payload = &mut self.drag_drop.payload;
        assert!(payload.source_id.is_some(), "set_drag_drop_payload() outside a drag source");
        if cond == Cond::ALWAYS || payload.data_frame_count.is_none() {
            payload.data_type.clear();
            payload.data_type.push_str(data_type);
            payload.data.clear();
            payload.data.extend_from_slice(data);
        }
        payload.data_frame_count = Some(frame);
        self.drag_drop
            .accept_frame_count
            .is_some_and(|f| f == frame || f + 1 == frame)
    }

    /// Call after an item that can receive drops. Returns true while a
    /// drag hovers it; then call `accept_drag_drop_payload` and
    /// [`Context::end_drag_drop_target`].
    pub fn begin_drag_drop_target(&mut self) -> bool {
        if !self.drag_drop.active {
            return false;
        }
        let idx = self.cur();
        let w = &self.windows[idx];
        if !w.dc.last_item_status_flags.contains(ItemStatusFlags::HOVERED_RECT) {
            return false;
        }
        match self.hovered_window {
            Some(h) if self.windows[h].root == w.root => {}
            _ => return false,
        }
        let rect = w.dc.last_item_rect;
        let mut id = w.dc.last_item_id;
        if id.is_none() {
            id = w.id_from_rect(&rect);
        }
        if self.drag_drop.payload.source_id == id {
            return false;
        }
        self.drag_drop.target_rect = rect;
        self.drag_drop.target_id = id;
        self.drag_drop.within_source_or_target = true;
        true
    }

    /// Accepts the payload if it carries `data_type` (`None`: any). Returns
    /// it on delivery, or every frame while hovering with
    /// `ACCEPT_BEFORE_DELIVERY`. Nested targets resolve to the smallest.
    ///
    /// # Panics
    ///
    /// Panics outside `begin_drag_drop_target`/`end_drag_drop_target`.
    pub fn accept_drag_drop_payload(&mut self, data_type: Option<&str>, flags: DragDropFlags) -> Option<&Payload> {
        assert!(
            self.drag_drop.active,
            "accept_drag_drop_payload() outside begin_drag_drop_target()"
        );
        let dd = &self.drag_drop;
        if dd.payload.data_frame_count.is_none() {
            return None;
        }
        if data_type.is_some_and(|t| !dd.payload.is_data_type(t)) {
            return None;
        }

        let was_accepted_previously = dd.accept_id_prev == dd.target_id;
        let mut r = dd.target_rect;
        let surface = r.width() * r.height();
        let flags = flags | (dd.source_flags & DragDropFlags::ACCEPT_NO_DRAW_DEFAULT_RECT);
        let mouse_down = self.input.is_mouse_down(dd.mouse_button);

        let dd = &mut self.drag_drop;
        if surface < dd.accept_id_curr_rect_surface {
            dd.accept_flags = flags;
            dd.accept_id_curr = dd.target_id;
            dd.accept_id_curr_rect_surface = surface;
        }
        dd.payload.preview = was_accepted_previously;
        if !flags.contains(DragDropFlags::ACCEPT_NO_DRAW_DEFAULT_RECT) && was_accepted_previously {
            r = r.expand(3.5);
            let col = self.col(StyleColor::DragDropTarget);
            let w = self.cw_mut();
            let push = !w.clip_rect.contains_rect(&r);
            if push {
                w.draw_list.push_clip_rect_full_screen();
            }
            w.draw_list.add_rect(r.min, r.max, col, 0.0, tessera_draw::Corners::ALL, 2.0);
            if push {
                w.draw_list.pop_clip_rect();
            }
        }

        let dd = &mut self.drag_drop;
        dd.accept_frame_count = Some(self.frame_count);
        dd.payload.delivery = was_accepted_previously && !mouse_down;
        if dd.payload.delivery {
            debug!(source = %dd.payload.source_id, target = %dd.target_id, "payload delivered");
        }
        if !dd.payload.delivery && !flags.contains(DragDropFlags::ACCEPT_BEFORE_DELIVERY) {
            return None;
        }
        Some(&self.drag_drop.payload)
    }

    /// Closes a drop target.
    ///
    /// # Panics
    ///
    /// Panics if not paired with a successful `begin_drag_drop_target`.
    pub fn end_drag_drop_target(&mut self) {
        assert!(
            self.drag_drop.active && self.drag_drop.within_source_or_target,
            "end_drag_drop_target() without begin_drag_drop_target()"
        );
        self.drag_drop.within_source_or_target = false;
    }

    /// Returns true while a drag is in progress.
    #[must_use]
    pub fn is_drag_drop_active(&self) -> bool {
        self.drag_drop.active
    }

    /// The payload being dragged, if any.
    #[must_use]
    pub fn drag_drop_payload(&self) -> Option<&Payload> {
        self.drag_drop.active.then_some(&self.drag_drop.payload)
    }

    /// Drops a payload delivered last frame, or one whose source stopped
    /// submitting it before last frame with the mouse up. Runs at the start
    /// of a frame so no widget sees an expired payload.
    pub(crate) fn drag_drop_expire(&mut self) {
        let dd = &self.drag_drop;
        if !dd.active {
            return;
        }
        let delivered = dd.payload.delivery;
        let elapsed = dd.payload.data_frame_count.map_or(true, |f| f + 1 < self.frame_count)
            && (dd.source_flags.contains(DragDropFlags::SOURCE_AUTO_EXPIRE_PAYLOAD)
                || !self.input.is_mouse_down(dd.mouse_button));
        if delivered || elapsed {
            debug!(delivered, "drag ended");
            self.drag_drop.clear();
        }
    }

    /// Shows a fallback tooltip for a drag whose source skipped this frame.
    pub(crate) fn drag_drop_end_frame(&mut self) {
        if self.drag_drop.active && self.drag_drop.source_frame_count < self.frame_count {
            self.drag_drop.within_source_or_target = true;
            self.set_tooltip("...");
            self.drag_drop.within_source_or_target = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::Vec2;

    use super::*;
    use crate::flags::WindowFlags;
    use crate::test_support::{frame, test_context};

    /// What one frame of the source/target panel observed.
    #[derive(Debug, Default)]
    struct DndFrame {
        source: Rect,
        target: Rect,
        active_at_start: bool,
        dragging: bool,
        over_target: bool,
        delivered: Option<Vec<u8>>,
    }

    /// A source button stacked above a target button in one window.
    fn panel(ctx: &mut Context, accept: &str, data: &[u8], cond: Cond) -> DndFrame {
        frame(ctx, |ctx| {
            let mut out = DndFrame {
                active_at_start: ctx.is_drag_drop_active(),
                ..DndFrame::default()
            };
            ctx.set_next_window_pos(Vec2::ZERO, Cond::FIRST_USE_EVER, Vec2::ZERO);
            ctx.set_next_window_size(Vec2::new(400.0, 300.0), Cond::FIRST_USE_EVER);
            ctx.begin("Dnd", WindowFlags::NO_TITLE_BAR);
            ctx.invisible_button("source", Vec2::new(100.0, 40.0));
            out.source = ctx.item_rect();
            if ctx.begin_drag_drop_source(DragDropFlags::empty()) {
                out.dragging = true;
                ctx.set_drag_drop_payload("T", data, cond);
                ctx.end_drag_drop_source();
            }
            ctx.invisible_button("target", Vec2::new(100.0, 40.0));
            out.target = ctx.item_rect();
            if ctx.begin_drag_drop_target() {
                out.over_target = true;
                out.delivered = ctx
                    .accept_drag_drop_payload(Some(accept), DragDropFlags::empty())
                    .map(|p| p.data.clone());
                ctx.end_drag_drop_target();
            }
            ctx.end();
            out
        })
    }

    /// Lays the panel out, presses on the source and drags to `to`
    /// (`None`: the target). Returns the layout frame and the first drag
    /// frame; the mouse stays down.
    fn start_drag(ctx: &mut Context, accept: &str, to: Option<Vec2>) -> (DndFrame, DndFrame) {
        let layout = panel(ctx, accept, &[7], Cond::ALWAYS);
        ctx.input_mut().mouse_pos = layout.source.center();
        panel(ctx, accept, &[7], Cond::ALWAYS);
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        let pressed = panel(ctx, accept, &[7], Cond::ALWAYS);
        assert!(!pressed.dragging, "no drag below the threshold");
        ctx.input_mut().mouse_pos = to.unwrap_or_else(|| layout.target.center());
        let first = panel(ctx, accept, &[7], Cond::ALWAYS);
        (layout, first)
    }

    #[test]
    fn test_payload_delivered_on_release_over_target() {
        let mut ctx = test_context();
        let (_, first) = start_drag(&mut ctx, "T", None);
        assert!(first.dragging);
        assert!(first.over_target);
        assert_eq!(first.delivered, None, "not accepted the frame before");

        let held = panel(&mut ctx, "T", &[7], Cond::ALWAYS);
        assert_eq!(held.delivered, None, "preview only while held");
        assert!(ctx.drag_drop.payload.preview);

        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        let released = panel(&mut ctx, "T", &[7], Cond::ALWAYS);
        assert!(!released.dragging);
        assert_eq!(released.delivered, Some(vec![7]));

        let after = panel(&mut ctx, "T", &[7], Cond::ALWAYS);
        assert!(!after.active_at_start, "delivered payload is dropped");
        assert!(!ctx.is_drag_drop_active());
    }

    #[test]
    fn test_payload_lives_one_frame_past_last_submit() {
        let mut ctx = test_context();
        let (_, first) = start_drag(&mut ctx, "T", Some(Vec2::new(300.0, 250.0)));
        assert!(first.dragging);
        let last_submit = panel(&mut ctx, "T", &[7], Cond::ALWAYS);
        assert!(last_submit.dragging);

        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        let one_after = panel(&mut ctx, "T", &[7], Cond::ALWAYS);
        assert!(one_after.active_at_start);
        assert!(!one_after.dragging);
        assert!(ctx.is_drag_drop_active());

        let two_after = panel(&mut ctx, "T", &[7], Cond::ALWAYS);
        assert!(!two_after.active_at_start);
        assert!(ctx.drag_drop_payload().is_none());
    }

    #[test]
    fn test_mismatched_type_is_never_delivered() {
        let mut ctx = test_context();
        let (_, first) = start_drag(&mut ctx, "U", None);
        assert!(first.over_target);
        assert_eq!(first.delivered, None);
        assert_eq!(panel(&mut ctx, "U", &[7], Cond::ALWAYS).delivered, None);

        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        let released = panel(&mut ctx, "U", &[7], Cond::ALWAYS);
        assert!(released.over_target);
        assert_eq!(released.delivered, None);
        assert!(ctx.drag_drop.accept_frame_count.is_none());
    }

    #[test]
    fn test_once_payload_keeps_first_copy() {
        let mut ctx = test_context();
        let layout = panel(&mut ctx, "T", &[1], Cond::ONCE);
        ctx.input_mut().mouse_pos = layout.source.center();
        panel(&mut ctx, "T", &[1], Cond::ONCE);
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        panel(&mut ctx, "T", &[1], Cond::ONCE);
        ctx.input_mut().mouse_pos = Vec2::new(300.0, 250.0);
        for n in 1..=4u8 {
            assert!(panel(&mut ctx, "T", &[n], Cond::ONCE).dragging);
        }
        let payload = ctx.drag_drop_payload().expect("drag in progress");
        assert_eq!(payload.data, vec![1]);
        assert!(payload.is_data_type("T"));

        panel(&mut ctx, "T", &[9], Cond::ALWAYS);
        assert_eq!(ctx.drag_drop_payload().map(|p| p.data.clone()), Some(vec![9]));
    }

    #[test]
    fn test_source_is_not_its_own_target() {
        let mut ctx = test_context();
        let run = |ctx: &mut Context| {
            frame(ctx, |ctx| {
                ctx.set_next_window_pos(Vec2::ZERO, Cond::FIRST_USE_EVER, Vec2::ZERO);
                ctx.set_next_window_size(Vec2::new(400.0, 300.0), Cond::FIRST_USE_EVER);
                ctx.begin("Dnd", WindowFlags::NO_TITLE_BAR);
                ctx.invisible_button("both", Vec2::new(100.0, 40.0));
                let rect = ctx.item_rect();
                let dragging = ctx.begin_drag_drop_source(DragDropFlags::SOURCE_NO_DISABLE_HOVER);
                if dragging {
                    ctx.set_drag_drop_payload("T", &[7], Cond::ALWAYS);
                    ctx.end_drag_drop_source();
                }
                let hovered = ctx.is_mouse_hovering_rect(rect.min, rect.max);
                let target = ctx.begin_drag_drop_target();
                if target {
                    ctx.end_drag_drop_target();
                }
                ctx.end();
                (rect, dragging, hovered, target)
            })
        };
        let (rect, ..) = run(&mut ctx);
        ctx.input_mut().mouse_pos = rect.min + Vec2::new(10.0, 20.0);
        run(&mut ctx);
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        run(&mut ctx);
        ctx.input_mut().mouse_pos = rect.min + Vec2::new(60.0, 20.0);
        let (_, dragging, hovered, target) = run(&mut ctx);
        assert!(dragging);
        assert!(hovered);
        assert!(!target, "the source item refuses its own payload");
    }

    #[test]
    fn test_target_needs_hovered_window_root() {
        let mut ctx = test_context();
        let run = |ctx: &mut Context| {
            frame(ctx, |ctx| {
                let mut out = DndFrame::default();
                ctx.set_next_window_pos(Vec2::ZERO, Cond::FIRST_USE_EVER, Vec2::ZERO);
                ctx.set_next_window_size(Vec2::new(300.0, 300.0), Cond::FIRST_USE_EVER);
                ctx.begin("Lower", WindowFlags::NO_TITLE_BAR);
                ctx.invisible_button("target", Vec2::new(200.0, 100.0));
                out.target = ctx.item_rect();
                if ctx.begin_drag_drop_target() {
                    out.over_target = true;
                    ctx.end_drag_drop_target();
                }
                ctx.end();

                ctx.set_next_window_pos(Vec2::ZERO, Cond::FIRST_USE_EVER, Vec2::ZERO);
                ctx.set_next_window_size(Vec2::new(300.0, 300.0), Cond::FIRST_USE_EVER);
                ctx.begin("Upper", WindowFlags::NO_TITLE_BAR);
                ctx.invisible_button("source", Vec2::new(100.0, 40.0));
                out.source = ctx.item_rect();
                if ctx.begin_drag_drop_source(DragDropFlags::empty()) {
                    out.dragging = true;
                    ctx.set_drag_drop_payload("T", &[7], Cond::ALWAYS);
                    ctx.end_drag_drop_source();
                }
                ctx.end();
                out
            })
        };
        let layout = run(&mut ctx);
        ctx.input_mut().mouse_pos = layout.source.center();
        run(&mut ctx);
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        run(&mut ctx);
        let over = Vec2::new(150.0, 60.0);
        assert!(layout.target.contains(over));
        ctx.input_mut().mouse_pos = over;
        for _ in 0..2 {
            let f = run(&mut ctx);
            assert!(f.dragging);
            assert!(!f.over_target, "target window is covered by the source window");
        }
    }

    #[test]
    fn test_smallest_nested_target_wins() {
        let mut ctx = test_context();
        let run = |ctx: &mut Context| {
            frame(ctx, |ctx| {
                ctx.set_next_window_pos(Vec2::ZERO, Cond::FIRST_USE_EVER, Vec2::ZERO);
                ctx.set_next_window_size(Vec2::new(400.0, 300.0), Cond::FIRST_USE_EVER);
                ctx.begin("Dnd", WindowFlags::NO_TITLE_BAR);
                ctx.invisible_button("source", Vec2::new(100.0, 40.0));
                let source = ctx.item_rect();
                if ctx.begin_drag_drop_source(DragDropFlags::empty()) {
                    ctx.set_drag_drop_payload("T", &[7], Cond::ALWAYS);
                    ctx.end_drag_drop_source();
                }
                let mut delivered = [false; 2];
                ctx.invisible_button("outer", Vec2::new(200.0, 100.0));
                let outer = ctx.item_rect();
                if ctx.begin_drag_drop_target() {
                    delivered[0] = ctx.accept_drag_drop_payload(Some("T"), DragDropFlags::empty()).is_some();
                    ctx.end_drag_drop_target();
                }
                ctx.set_cursor_screen_pos(outer.min + Vec2::new(50.0, 30.0));
                ctx.invisible_button("inner", Vec2::new(60.0, 30.0));
                let inner = ctx.item_rect();
                if ctx.begin_drag_drop_target() {
                    delivered[1] = ctx.accept_drag_drop_payload(Some("T"), DragDropFlags::empty()).is_some();
                    ctx.end_drag_drop_target();
                }
                ctx.end();
                (source, inner, delivered)
            })
        };
        let (source, inner, _) = run(&mut ctx);
        ctx.input_mut().mouse_pos = source.center();
        run(&mut ctx);
        ctx.input_mut().set_mouse_button(MouseButton::Left, true);
        run(&mut ctx);
        ctx.input_mut().mouse_pos = inner.center();
        run(&mut ctx);
        run(&mut ctx);
        ctx.input_mut().set_mouse_button(MouseButton::Left, false);
        let (_, _, delivered) = run(&mut ctx);
        assert_eq!(delivered, [false, true]);
    }
}
