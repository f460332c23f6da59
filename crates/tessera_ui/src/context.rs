//! # UI Context
//!
//! The [`Context`] owns every piece of cross-frame state: the window
//! registry, the hovered/active/nav identities, the popup stacks, the
//! persisted settings and the shared font atlas handle.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         CONTEXT                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  windows (stable indices) ── window_order (back→front)   │
//! │  hovered_id / active_id / nav_id                         │
//! │  open_popup_stack / begin_popup_stack                    │
//! │  next_window_data ── consumed by the next begin()        │
//! │  settings ── debounced TOML writes                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no global context. Everything takes `&mut Context`.

use std::collections::HashMap;
use std::sync::Arc;

use tessera_core::{Color, Rect, Stack, Vec2};
use tessera_draw::{
    DrawList, DrawListFlags, DrawListSharedData, FontAtlas, FontConfig, FontIndex, SharedFontAtlas, TextureId,
};
use tracing::{debug, warn};

use crate::config::{IoConfig, Style, StyleColor};
use crate::drag_drop::DragDropState;
use crate::error::{UiError, UiResult};
use crate::flags::{Cond, WindowFlags};
use crate::id::{label_display, Id, IdKey};
use crate::input::{InputState, Key, MouseButton};
use crate::popup::PopupRef;
use crate::settings::SettingsStore;
use crate::window::{NextWindowData, SizeCallback, Window, WindowIdx};

/// Pixel size of the built-in box-glyph font.
pub const DEFAULT_FONT_SIZE: f32 = 13.0;

/// Where the context is in the frame protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FramePhase {
    Idle,
    InFrame,
    Ended,
}

/// What made an item active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputSource {
    /// Nothing is active.
    #[default]
    None,
    /// A mouse click.
    Mouse,
    /// The `Activate` nav input.
    Nav,
}

/// One `begin` on the window stack, with the depths `end` must find.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowStackEntry {
    pub window: WindowIdx,
    pub id_mark: usize,
    pub clip_mark: usize,
}

/// The immediate-mode UI state.
pub struct Context {
    pub(crate) io: IoConfig,
    pub(crate) style: Style,
    pub(crate) input: InputState,
    pub(crate) font_atlas: SharedFontAtlas,
    pub(crate) font: FontIndex,
    pub(crate) font_base_size: f32,
    pub(crate) font_size: f32,
    pub(crate) font_texture: TextureId,
    pub(crate) shared_data: Arc<DrawListSharedData>,

    pub(crate) time: f64,
    pub(crate) frame_count: u64,
    pub(crate) phase: FramePhase,

    pub(crate) windows: Vec<Window>,
    pub(crate) windows_by_id: HashMap<Id, WindowIdx>,
    pub(crate) window_order: Vec<WindowIdx>,
    pub(crate) window_stack: Stack<WindowStackEntry>,
    pub(crate) current_window: Option<WindowIdx>,
    pub(crate) hovered_window: Option<WindowIdx>,
    pub(crate) hovered_root_window: Option<WindowIdx>,
    pub(crate) moving_window: Option<WindowIdx>,
    pub(crate) nav_window: Option<WindowIdx>,

    pub(crate) hovered_id: Id,
    pub(crate) hovered_id_allow_overlap: bool,
    pub(crate) hovered_id_previous_frame: Id,
    pub(crate) active_id: Id,
    pub(crate) active_id_previous_frame: Id,
    pub(crate) active_id_is_alive: Id,
    pub(crate) active_id_timer: f32,
    pub(crate) active_id_is_just_activated: bool,
    pub(crate) active_id_allow_overlap: bool,
    pub(crate) active_id_source: InputSource,
    pub(crate) active_id_window: Option<WindowIdx>,
    pub(crate) active_id_click_offset: Vec2,

    pub(crate) nav_id: Id,
    pub(crate) nav_activate_id: Id,
    pub(crate) nav_activate_down_id: Id,
    pub(crate) nav_activate_pressed_id: Id,

    pub(crate) next_window_data: NextWindowData,
    pub(crate) color_modifiers: Stack<(StyleColor, Color)>,
    pub(crate) open_popup_stack: Stack<PopupRef>,
    pub(crate) begin_popup_stack: Stack<PopupRef>,
    pub(crate) tooltip_override_count: u32,
    pub(crate) drag_drop: DragDropState,
    pub(crate) scrollbar_click_delta_to_grab_center: Vec2,
    pub(crate) overlay_draw_list: DrawList,

    pub(crate) settings: SettingsStore,
    pub(crate) settings_dirty_timer: f32,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("frame_count", &self.frame_count)
            .field("windows", &self.windows.len())
            .field("hovered_id", &self.hovered_id)
            .field("active_id", &self.active_id)
            .field("nav_id", &self.nav_id)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a context with the built-in box-glyph font.
    ///
    /// # Errors
    ///
    /// Returns an error if the built-in atlas fails to build.
    pub fn new(io: IoConfig, style: Style) -> UiResult<Self> {
        let mut atlas = FontAtlas::new();
        atlas.add_font(FontConfig::box_glyphs(DEFAULT_FONT_SIZE));
        Self::with_font_atlas(atlas.into_shared(), io, style)
    }

    /// Creates a context drawing with font 0 of `atlas`. The atlas is built
    /// here if the host has not built it yet.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::Atlas`] if the build fails and
    /// [`UiError::MissingFont`] if the atlas holds no font.
    pub fn with_font_atlas(atlas: SharedFontAtlas, io: IoConfig, style: Style) -> UiResult<Self> {
        let font = FontIndex(0);
        let (font_base_size, font_texture, white_uv) = {
            let mut guard = atlas.write();
            if !guard.is_built() {
                guard.build()?;
            }
            let f = guard.font(font).ok_or(UiError::MissingFont(font.0))?;
            (f.font_size(), f.texture_id(), guard.tex_uv_white_pixel())
        };

        let settings = match &io.settings_path {
            Some(path) if path.exists() => SettingsStore::load(path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "ignoring unreadable window settings");
                SettingsStore::new()
            }),
            _ => SettingsStore::new(),
        };

        let mut shared = DrawListSharedData::new();
        shared.tex_uv_white_pixel = white_uv;
        let shared_data = Arc::new(shared);
        let font_size = font_base_size * io.font_global_scale;

        debug!(font_size, saved_windows = settings.len(), "context created");
        Ok(Self {
            io,
            style,
            input: InputState::new(),
            font_atlas: atlas,
            font,
            font_base_size,
            font_size,
            font_texture,
            overlay_draw_list: DrawList::with_owner(Arc::clone(&shared_data), "##Overlay"),
            shared_data,
            time: 0.0,
            frame_count: 0,
            phase: FramePhase::Idle,
            windows: Vec::new(),
            windows_by_id: HashMap::new(),
            window_order: Vec::new(),
            window_stack: Stack::with_capacity("window", 16),
            current_window: None,
            hovered_window: None,
            hovered_root_window: None,
            moving_window: None,
            nav_window: None,
            hovered_id: Id::NONE,
            hovered_id_allow_overlap: false,
            hovered_id_previous_frame: Id::NONE,
            active_id: Id::NONE,
            active_id_previous_frame: Id::NONE,
            active_id_is_alive: Id::NONE,
            active_id_timer: 0.0,
            active_id_is_just_activated: false,
            active_id_allow_overlap: false,
            active_id_source: InputSource::None,
            active_id_window: None,
            active_id_click_offset: Vec2::new(-1.0, -1.0),
            nav_id: Id::NONE,
            nav_activate_id: Id::NONE,
            nav_activate_down_id: Id::NONE,
            nav_activate_pressed_id: Id::NONE,
            next_window_data: NextWindowData::default(),
            color_modifiers: Stack::new("style color"),
            open_popup_stack: Stack::new("open popup"),
            begin_popup_stack: Stack::new("begin popup"),
            tooltip_override_count: 0,
            drag_drop: DragDropState::default(),
            scrollbar_click_delta_to_grab_center: Vec2::ZERO,
            settings,
            settings_dirty_timer: 0.0,
        })
    }

    /// Flushes settings and drops the context.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be written.
    pub fn shutdown(mut self) -> UiResult<()> {
        debug!(frames = self.frame_count, "context shutdown");
        self.save_settings()
    }

    // ---------------------------------------------------------------------
    // Settings
    // ---------------------------------------------------------------------

    /// Copies every window's layout into the store and writes it to
    /// `io.settings_path`, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_settings(&mut self) -> UiResult<()> {
        self.settings_dirty_timer = 0.0;
        for window in &self.windows {
            if window.flags.contains(WindowFlags::NO_SAVED_SETTINGS) {
                continue;
            }
            let entry = self.settings.find_or_insert(&window.name);
            entry.pos = window.pos;
            entry.size = window.size_full;
            entry.collapsed = window.collapsed;
        }
        match &self.io.settings_path {
            Some(path) => self.settings.save(path),
            None => Ok(()),
        }
    }

    /// Schedules a settings write after `io.ini_saving_rate` seconds.
    pub fn mark_settings_dirty(&mut self) {
        if self.settings_dirty_timer <= 0.0 {
            self.settings_dirty_timer = self.io.ini_saving_rate;
        }
    }

    /// Window layouts loaded at startup or captured by the last save.
    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub(crate) fn update_settings_timer(&mut self) {
        if self.settings_dirty_timer <= 0.0 {
            return;
        }
        self.settings_dirty_timer -= self.input.delta_time;
        if self.settings_dirty_timer <= 0.0 {
            if let Err(e) = self.save_settings() {
                warn!(error = %e, "failed to save window settings");
            }
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Input snapshot for the host to fill before `new_frame`.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Input state as aged by the last `new_frame`.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// IO configuration.
    #[must_use]
    pub fn io(&self) -> &IoConfig {
        &self.io
    }

    /// Mutable IO configuration.
    pub fn io_mut(&mut self) -> &mut IoConfig {
        &mut self.io
    }

    /// Style.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Mutable style.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Shared font atlas.
    #[must_use]
    pub fn font_atlas(&self) -> &SharedFontAtlas {
        &self.font_atlas
    }

    /// Current font size in pixels, after `font_global_scale`.
    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Seconds since the first frame.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Frames started so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Item under the mouse this frame.
    #[must_use]
    pub fn hovered_id(&self) -> Id {
        self.hovered_id
    }

    /// Item being interacted with.
    #[must_use]
    pub fn active_id(&self) -> Id {
        self.active_id
    }

    /// What made the active item active.
    #[must_use]
    pub fn active_id_source(&self) -> InputSource {
        self.active_id_source
    }

    /// Item with keyboard/gamepad focus.
    #[must_use]
    pub fn nav_id(&self) -> Id {
        self.nav_id
    }

    /// Looks up a window by name.
    #[must_use]
    pub fn window(&self, name: &str) -> Option<&Window> {
        self.find_window_by_name(name).map(|idx| &self.windows[idx])
    }

    /// Windows in back-to-front order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.window_order.iter().map(|&idx| &self.windows[idx])
    }

    /// Name of the focused window.
    #[must_use]
    pub fn focused_window_name(&self) -> Option<&str> {
        self.nav_window.map(|idx| self.windows[idx].name.as_str())
    }

    /// Name of the hovered window.
    #[must_use]
    pub fn hovered_window_name(&self) -> Option<&str> {
        self.hovered_window.map(|idx| self.windows[idx].name.as_str())
    }

    pub(crate) fn find_window_by_name(&self, name: &str) -> Option<WindowIdx> {
        self.windows_by_id.get(&Id::from_name(name)).copied()
    }

    /// Index of the window between `begin` and `end`.
    ///
    /// # Panics
    ///
    /// Panics outside a `begin`/`end` pair.
    #[track_caller]
    pub(crate) fn cur(&self) -> WindowIdx {
        match self.current_window {
            Some(idx) => idx,
            None => panic!("no current window: call begin() first"),
        }
    }

    #[track_caller]
    pub(crate) fn cw(&self) -> &Window {
        &self.windows[self.cur()]
    }

    #[track_caller]
    pub(crate) fn cw_mut(&mut self) -> &mut Window {
        let idx = self.cur();
        &mut self.windows[idx]
    }

    /// The current window, marked as written to.
    #[track_caller]
    pub(crate) fn cw_write(&mut self) -> &mut Window {
        let w = self.cw_mut();
        w.write_accessed = true;
        w
    }

    /// Draw list of the current window.
    ///
    /// # Panics
    ///
    /// Panics outside a `begin`/`end` pair.
    pub fn window_draw_list(&mut self) -> &mut DrawList {
        &mut self.cw_write().draw_list
    }

    /// Draw list rendered after every window.
    pub fn overlay_draw_list(&mut self) -> &mut DrawList {
        &mut self.overlay_draw_list
    }

    // ---------------------------------------------------------------------
    // Style stack
    // ---------------------------------------------------------------------

    /// Overrides a palette entry until the matching pop.
    pub fn push_style_color(&mut self, idx: StyleColor, color: Color) {
        let slot = self.style.colors.get_mut(idx);
        self.color_modifiers.push((idx, *slot));
        *slot = color;
    }

    /// Restores the last `count` overridden palette entries.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `count` colors are pushed.
    pub fn pop_style_color(&mut self, count: usize) {
        for _ in 0..count {
            let (idx, backup) = self.color_modifiers.pop();
            *self.style.colors.get_mut(idx) = backup;
        }
    }

    pub(crate) fn col(&self, idx: StyleColor) -> u32 {
        self.style.color_u32(idx, 1.0)
    }

    // ---------------------------------------------------------------------
    // Id stack
    // ---------------------------------------------------------------------

    /// Pushes `key` onto the current window's id stack.
    pub fn push_id<'a>(&mut self, key: impl Into<IdKey<'a>>) {
        let w = self.cw_mut();
        let id = w.get_id(key);
        w.id_stack.push(id);
    }

    /// Pops the last pushed id.
    ///
    /// # Panics
    ///
    /// Panics if only the window's own id is left.
    pub fn pop_id(&mut self) {
        let w = self.cw_mut();
        assert!(w.id_stack.len() > 1, "id stack underflow in window '{}'", w.name);
        w.id_stack.pop();
    }

    /// Id of `key` under the current id stack.
    #[must_use]
    pub fn get_id<'a>(&self, key: impl Into<IdKey<'a>>) -> Id {
        self.cw().get_id(key)
    }

    // ---------------------------------------------------------------------
    // Clip rect stack
    // ---------------------------------------------------------------------

    /// Pushes a clip rectangle onto the current window's draw list.
    pub fn push_clip_rect(&mut self, min: Vec2, max: Vec2, intersect_with_current: bool) {
        let w = self.cw_mut();
        w.draw_list.push_clip_rect(min, max, intersect_with_current);
        w.clip_rect = w.draw_list.current_clip_rect();
    }

    /// Pops the current window's clip rectangle.
    ///
    /// # Panics
    ///
    /// Panics if nothing is pushed.
    pub fn pop_clip_rect(&mut self) {
        let w = self.cw_mut();
        w.draw_list.pop_clip_rect();
        w.clip_rect = w.draw_list.current_clip_rect();
    }

    // ---------------------------------------------------------------------
    // Next-window overrides
    // ---------------------------------------------------------------------

    /// Positions the next window. `pivot` (0,0) is top-left, (0.5,0.5)
    /// centered.
    pub fn set_next_window_pos(&mut self, pos: Vec2, cond: Cond, pivot: Vec2) {
        let nd = &mut self.next_window_data;
        nd.pos_val = pos;
        nd.pos_pivot_val = pivot;
        nd.pos_cond = or_always(cond);
    }

    /// Sizes the next window. A zero axis auto-fits.
    pub fn set_next_window_size(&mut self, size: Vec2, cond: Cond) {
        let nd = &mut self.next_window_data;
        nd.size_val = size;
        nd.size_cond = or_always(cond);
    }

    /// Sets the next window's content size, excluding padding.
    pub fn set_next_window_content_size(&mut self, size: Vec2) {
        let nd = &mut self.next_window_data;
        nd.content_size_val = size;
        nd.content_size_cond = Cond::ALWAYS;
    }

    /// Collapses or expands the next window.
    pub fn set_next_window_collapsed(&mut self, collapsed: bool, cond: Cond) {
        let nd = &mut self.next_window_data;
        nd.collapsed_val = collapsed;
        nd.collapsed_cond = or_always(cond);
    }

    /// Focuses the next window.
    pub fn set_next_window_focus(&mut self) {
        self.next_window_data.focus_cond = Cond::ALWAYS;
    }

    /// Constrains the next window's size to `[min, max]`; a negative axis
    /// keeps the current size on that axis. The callback runs afterwards.
    pub fn set_next_window_size_constraints(&mut self, min: Vec2, max: Vec2, callback: Option<SizeCallback>) {
        let nd = &mut self.next_window_data;
        nd.size_constraint_cond = Cond::ALWAYS;
        nd.size_constraint_rect = Rect::new(min, max);
        nd.size_callback = callback;
    }

    // ---------------------------------------------------------------------
    // Focus
    // ---------------------------------------------------------------------

    /// Gives focus to `window` (or nobody) and raises its root to the front.
    pub(crate) fn focus_window(&mut self, window: Option<WindowIdx>) {
        if self.nav_window != window {
            self.nav_id = window.map_or(Id::NONE, |idx| self.windows[idx].nav_last_id);
        }
        self.nav_window = window;
        let Some(idx) = window else { return };

        // An item active in another root loses its activation.
        if self.active_id.is_some()
            && self.active_id_window.is_some_and(|a| self.windows[a].root != self.windows[idx].root)
        {
            self.clear_active_id();
        }

        let root = self.windows[idx].root;
        let raise = if self.windows[root].flags.contains(WindowFlags::NO_BRING_TO_FRONT_ON_FOCUS) {
            None
        } else {
            Some(root)
        };
        if let Some(front) = raise {
            self.bring_to_front(front);
        }
    }

    fn bring_to_front(&mut self, idx: WindowIdx) {
        if self.window_order.last() == Some(&idx) {
            return;
        }
        if let Some(pos) = self.window_order.iter().position(|&w| w == idx) {
            self.window_order.remove(pos);
            self.window_order.push(idx);
        }
    }

    /// Focuses the front-most active window that accepts focus, skipping
    /// `ignore`.
    pub(crate) fn focus_front_most_active_window(&mut self, ignore: Option<WindowIdx>) {
        let candidate = self.window_order.iter().rev().copied().find(|&idx| {
            let w = &self.windows[idx];
            Some(idx) != ignore && w.was_active && !w.flags.contains(WindowFlags::CHILD_WINDOW)
        });
        self.focus_window(candidate);
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    /// Size of `text` in the current font. With `hide_text_after_double_hash`
    /// the `"##"` suffix is ignored. Width is rounded up to whole pixels.
    #[must_use]
    pub fn calc_text_size(&self, text: &str, hide_text_after_double_hash: bool) -> Vec2 {
        let display = if hide_text_after_double_hash {
            label_display(text)
        } else {
            text
        };
        if display.is_empty() {
            return Vec2::new(0.0, self.font_size);
        }
        let atlas = self.font_atlas.read();
        let size = atlas
            .font(self.font)
            .map_or(Vec2::ZERO, |f| f.calc_text_size(self.font_size, display));
        Vec2::new((size.x + 0.95).trunc(), size.y)
    }

    /// Draws text into the current window, clipped to `clip` if given.
    pub(crate) fn render_text(&mut self, pos: Vec2, text: &str, hide_text_after_double_hash: bool, clip: Option<&Rect>) {
        let display = if hide_text_after_double_hash {
            label_display(text)
        } else {
            text
        };
        if display.is_empty() {
            return;
        }
        let col = self.col(StyleColor::Text);
        let size = self.font_size;
        let idx = self.cur();
        let atlas = self.font_atlas.read();
        let Some(font) = atlas.font(self.font) else { return };
        let list = &mut self.windows[idx].draw_list;
        match clip {
            Some(clip) => {
                let mut r = *clip;
                r.clip_with(&list.current_clip_rect());
                list.add_text_clipped(font, size, pos, col, display, &r);
            }
            None => list.add_text(font, size, pos, col, display),
        }
        self.windows[idx].write_accessed = true;
    }

    /// Rebuilds the per-frame tessellation data from style and display.
    pub(crate) fn rebuild_shared_data(&mut self) {
        let white = self.font_atlas.read().tex_uv_white_pixel();
        let mut flags = DrawListFlags::empty();
        flags.set(DrawListFlags::ANTI_ALIASED_LINES, self.style.anti_aliased_lines);
        flags.set(DrawListFlags::ANTI_ALIASED_FILL, self.style.anti_aliased_fill);
        let mut shared = (*self.shared_data).clone();
        shared.tex_uv_white_pixel = white;
        shared.clip_rect_fullscreen = Rect::new(Vec2::ZERO, self.input.display_size);
        shared.curve_tessellation_tol = self.style.curve_tessellation_tol;
        shared.initial_flags = flags;
        self.shared_data = Arc::new(shared);
        self.font_size = self.font_base_size * self.io.font_global_scale;
    }

    // ---------------------------------------------------------------------
    // Input shortcuts
    // ---------------------------------------------------------------------

    /// Returns true while `button` is held.
    #[must_use]
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.input.is_mouse_down(button)
    }

    /// Returns true on the frame `button` went down.
    #[must_use]
    pub fn is_mouse_clicked(&self, button: MouseButton, repeat: bool) -> bool {
        self.input.is_mouse_clicked(button, repeat, &self.io)
    }

    /// Returns true on the frame `button` went up.
    #[must_use]
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.input.is_mouse_released(button)
    }

    /// Returns true on the second click of a double-click.
    #[must_use]
    pub fn is_mouse_double_clicked(&self, button: MouseButton) -> bool {
        self.input.is_mouse_double_clicked(button)
    }

    /// Returns true once `button` has moved past the drag threshold while
    /// held. A negative threshold uses `io.mouse_drag_threshold`.
    #[must_use]
    pub fn is_mouse_dragging(&self, button: MouseButton, threshold: f32) -> bool {
        self.input.is_mouse_dragging(button, threshold, &self.io)
    }

    /// Mouse position.
    #[must_use]
    pub fn mouse_pos(&self) -> Vec2 {
        self.input.mouse_pos
    }

    /// Returns true while `key` is held.
    #[must_use]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.input.is_key_down(key)
    }

    /// Returns true when `key` went down, or repeats if `repeat`.
    #[must_use]
    pub fn is_key_pressed(&self, key: Key, repeat: bool) -> bool {
        self.input.is_key_pressed(key, repeat, &self.io)
    }
}

fn or_always(cond: Cond) -> Cond {
    if cond.is_empty() {
        Cond::ALWAYS
    } else {
        cond
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::new(IoConfig::default(), Style::default()).unwrap()
    }

    #[test]
    fn test_new_builds_default_font() {
        let ctx = ctx();
        assert!(ctx.font_atlas().read().is_built());
        assert!((ctx.font_size() - DEFAULT_FONT_SIZE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_empty_atlas_is_missing_font() {
        let atlas = FontAtlas::new().into_shared();
        let err = Context::with_font_atlas(atlas, IoConfig::default(), Style::default()).unwrap_err();
        assert!(matches!(err, UiError::MissingFont(0)));
    }

    #[test]
    fn test_style_color_stack_restores() {
        let mut ctx = ctx();
        let before = ctx.style().colors.get(StyleColor::Button);
        ctx.push_style_color(StyleColor::Button, Color::WHITE);
        ctx.push_style_color(StyleColor::Text, Color::BLACK);
        assert_eq!(ctx.style().colors.get(StyleColor::Button), Color::WHITE);
        ctx.pop_style_color(2);
        assert_eq!(ctx.style().colors.get(StyleColor::Button), before);
    }

    #[test]
    fn test_text_size_hides_suffix() {
        let ctx = ctx();
        let full = ctx.calc_text_size("OK##button", false);
        let shown = ctx.calc_text_size("OK##button", true);
        assert!(shown.x < full.x);
        assert_eq!(ctx.calc_text_size("##only", true), Vec2::new(0.0, ctx.font_size()));
    }

    #[test]
    fn test_unreadable_settings_fall_back_to_empty() {
        let dir = std::env::temp_dir().join(format!("tessera_bad_settings_{}", std::process::id()));
        std::fs::write(&dir, "[[window]]\nname = 3").unwrap();
        let io = IoConfig {
            settings_path: Some(dir.clone()),
            ..IoConfig::default()
        };
        let ctx = Context::new(io, Style::default()).unwrap();
        assert!(ctx.settings().is_empty());
        std::fs::remove_file(dir).unwrap();
    }
}
