//! Input snapshot.
//!
//! The host writes raw state (mouse position, button and key levels, wheel,
//! text) into [`InputState`] before each `new_frame`. The context then ages
//! it with [`InputState::update`], deriving clicks, releases, double-clicks,
//! hold durations and drag distances. Nothing here polls the OS.

use tessera_core::Vec2;

use crate::config::IoConfig;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left = 0,
    /// Right mouse button.
    Right = 1,
    /// Middle mouse button (scroll wheel click).
    Middle = 2,
}

impl MouseButton {
    /// Number of tracked buttons.
    pub const COUNT: usize = 3;

    /// Slot in the per-button arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Keyboard key the core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab key.
    Tab = 0,
    /// Arrow left.
    LeftArrow,
    /// Arrow right.
    RightArrow,
    /// Arrow up.
    UpArrow,
    /// Arrow down.
    DownArrow,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Delete key.
    Delete,
    /// Backspace key.
    Backspace,
    /// Space bar.
    Space,
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// `A`, for select-all.
    A,
    /// `C`, for copy.
    C,
    /// `V`, for paste.
    V,
    /// `X`, for cut.
    X,
    /// `Y`, for redo.
    Y,
    /// `Z`, for undo.
    Z,
}

impl Key {
    /// Number of tracked keys.
    pub const COUNT: usize = 20;
}

/// Navigation input (keyboard or gamepad mapped by the host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavInput {
    /// Activate the focused item (space, gamepad A).
    Activate = 0,
    /// Cancel or leave (escape, gamepad B).
    Cancel,
}

impl NavInput {
    /// Number of nav inputs.
    pub const COUNT: usize = 2;
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
    /// Alt key is held.
    pub alt: bool,
    /// Super/Command key is held.
    pub super_key: bool,
}

impl Modifiers {
    /// Returns true if any modifier is held.
    #[must_use]
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.super_key
    }
}

/// Per-frame input, written by the host and aged by the context.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Display size in pixels.
    pub display_size: Vec2,
    /// Framebuffer pixels per display unit (2.0 on retina screens).
    pub display_framebuffer_scale: Vec2,
    /// Seconds since the last frame.
    pub delta_time: f32,
    /// Mouse position, or [`Vec2::INVALID`] when unavailable.
    pub mouse_pos: Vec2,
    /// Mouse buttons currently held.
    pub mouse_down: [bool; MouseButton::COUNT],
    /// Vertical wheel delta; one unit scrolls about five lines.
    pub mouse_wheel: f32,
    /// Horizontal wheel delta.
    pub mouse_wheel_h: f32,
    /// Modifier keys state.
    pub modifiers: Modifiers,
    /// Keys currently held.
    pub keys_down: [bool; Key::COUNT],
    /// Nav inputs currently held.
    pub nav_inputs: [bool; NavInput::COUNT],
    /// Text typed since the last frame.
    pub input_characters: Vec<char>,

    // Derived by `update`.
    pub(crate) mouse_pos_prev: Vec2,
    pub(crate) mouse_delta: Vec2,
    pub(crate) mouse_clicked: [bool; MouseButton::COUNT],
    pub(crate) mouse_clicked_pos: [Vec2; MouseButton::COUNT],
    pub(crate) mouse_clicked_time: [f64; MouseButton::COUNT],
    pub(crate) mouse_double_clicked: [bool; MouseButton::COUNT],
    pub(crate) mouse_released: [bool; MouseButton::COUNT],
    pub(crate) mouse_down_duration: [f32; MouseButton::COUNT],
    pub(crate) mouse_down_duration_prev: [f32; MouseButton::COUNT],
    pub(crate) mouse_drag_max_distance_sqr: [f32; MouseButton::COUNT],
    pub(crate) keys_down_duration: [f32; Key::COUNT],
    pub(crate) keys_down_duration_prev: [f32; Key::COUNT],
    pub(crate) nav_inputs_down_duration: [f32; NavInput::COUNT],
    pub(crate) nav_inputs_down_duration_prev: [f32; NavInput::COUNT],
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            display_size: Vec2::new(-1.0, -1.0),
            display_framebuffer_scale: Vec2::ONE,
            delta_time: 1.0 / 60.0,
            mouse_pos: Vec2::INVALID,
            mouse_down: [false; MouseButton::COUNT],
            mouse_wheel: 0.0,
            mouse_wheel_h: 0.0,
            modifiers: Modifiers::default(),
            keys_down: [false; Key::COUNT],
            nav_inputs: [false; NavInput::COUNT],
            input_characters: Vec::new(),
            mouse_pos_prev: Vec2::INVALID,
            mouse_delta: Vec2::ZERO,
            mouse_clicked: [false; MouseButton::COUNT],
            mouse_clicked_pos: [Vec2::ZERO; MouseButton::COUNT],
            mouse_clicked_time: [f64::MIN; MouseButton::COUNT],
            mouse_double_clicked: [false; MouseButton::COUNT],
            mouse_released: [false; MouseButton::COUNT],
            mouse_down_duration: [-1.0; MouseButton::COUNT],
            mouse_down_duration_prev: [-1.0; MouseButton::COUNT],
            mouse_drag_max_distance_sqr: [0.0; MouseButton::COUNT],
            keys_down_duration: [-1.0; Key::COUNT],
            keys_down_duration_prev: [-1.0; Key::COUNT],
            nav_inputs_down_duration: [-1.0; NavInput::COUNT],
            nav_inputs_down_duration_prev: [-1.0; NavInput::COUNT],
        }
    }
}

/// How many repeats fire between `t_prev` and `t` for a held input.
fn typematic_repeat_amount(t: f32, t_prev: f32, delay: f32, rate: f32) -> u32 {
    if t == 0.0 {
        return 1;
    }
    if t <= delay || rate <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation)]
    let count = ((t - delay) / rate) as i64 - ((t_prev - delay) / rate) as i64;
    u32::try_from(count.max(0)).unwrap_or(0)
}

fn age(duration: &mut f32, prev: &mut f32, down: bool, dt: f32) {
    *prev = *duration;
    *duration = if down {
        if *duration < 0.0 {
            0.0
        } else {
            *duration + dt
        }
    } else {
        -1.0
    };
}

impl InputState {
    /// Creates an input state with no display and the mouse unavailable.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates mouse position.
    pub fn set_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse_pos = Vec2::new(x, y);
    }

    /// Records a mouse button level.
    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        self.mouse_down[button.index()] = down;
    }

    /// Accumulates wheel input.
    pub fn scroll(&mut self, dx: f32, dy: f32) {
        self.mouse_wheel_h += dx;
        self.mouse_wheel += dy;
    }

    /// Records a key level.
    pub fn set_key(&mut self, key: Key, down: bool) {
        self.keys_down[key as usize] = down;
    }

    /// Records a nav input level.
    pub fn set_nav_input(&mut self, input: NavInput, down: bool) {
        self.nav_inputs[input as usize] = down;
    }

    /// Queues typed text.
    pub fn text(&mut self, text: &str) {
        self.input_characters.extend(text.chars().filter(|c| !c.is_control()));
    }

    /// Derives the per-frame edges from the raw levels. Called by the
    /// context at the start of every frame with the already-advanced time.
    pub fn update(&mut self, config: &IoConfig, time: f64) {
        let dt = self.delta_time;

        self.mouse_delta = if self.mouse_pos.is_valid() && self.mouse_pos_prev.is_valid() {
            self.mouse_pos - self.mouse_pos_prev
        } else {
            Vec2::ZERO
        };
        self.mouse_pos_prev = self.mouse_pos;

        let dbl_dist_sq = config.mouse_double_click_max_dist * config.mouse_double_click_max_dist;
        for i in 0..MouseButton::COUNT {
            let down = self.mouse_down[i];
            self.mouse_clicked[i] = down && self.mouse_down_duration[i] < 0.0;
            self.mouse_released[i] = !down && self.mouse_down_duration[i] >= 0.0;
            age(&mut self.mouse_down_duration[i], &mut self.mouse_down_duration_prev[i], down, dt);
            self.mouse_double_clicked[i] = false;

            if self.mouse_clicked[i] {
                if time - self.mouse_clicked_time[i] < f64::from(config.mouse_double_click_time) {
                    if (self.mouse_pos - self.mouse_clicked_pos[i]).length_sq() < dbl_dist_sq {
                        self.mouse_double_clicked[i] = true;
                    }
                    // A third click starts a new pair.
                    self.mouse_clicked_time[i] = f64::MIN;
                } else {
                    self.mouse_clicked_time[i] = time;
                }
                self.mouse_clicked_pos[i] = self.mouse_pos;
                self.mouse_drag_max_distance_sqr[i] = 0.0;
            } else if down && self.mouse_pos.is_valid() {
                let d = (self.mouse_pos - self.mouse_clicked_pos[i]).length_sq();
                self.mouse_drag_max_distance_sqr[i] = self.mouse_drag_max_distance_sqr[i].max(d);
            }
        }

        for i in 0..Key::COUNT {
            age(&mut self.keys_down_duration[i], &mut self.keys_down_duration_prev[i], self.keys_down[i], dt);
        }
        for i in 0..NavInput::COUNT {
            age(
                &mut self.nav_inputs_down_duration[i],
                &mut self.nav_inputs_down_duration_prev[i],
                self.nav_inputs[i],
                dt,
            );
        }
    }

    /// Clears per-frame accumulators once the frame has consumed them.
    pub(crate) fn end_frame(&mut self) {
        self.mouse_wheel = 0.0;
        self.mouse_wheel_h = 0.0;
        self.input_characters.clear();
    }

    /// Mouse movement since last frame.
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Returns true if the button is held.
    #[must_use]
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down[button.index()]
    }

    /// Returns true on the frame the button went down, and on typematic
    /// repeats when `repeat` is set.
    #[must_use]
    pub fn is_mouse_clicked(&self, button: MouseButton, repeat: bool, config: &IoConfig) -> bool {
        let i = button.index();
        let t = self.mouse_down_duration[i];
        if t == 0.0 {
            return true;
        }
        repeat
            && t > config.key_repeat_delay
            && typematic_repeat_amount(t, t - self.delta_time, config.key_repeat_delay, config.key_repeat_rate) > 0
    }

    /// Returns true on the frame the button went up.
    #[must_use]
    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released[button.index()]
    }

    /// Returns true on the frame of a double-click.
    #[must_use]
    pub fn is_mouse_double_clicked(&self, button: MouseButton) -> bool {
        self.mouse_double_clicked[button.index()]
    }

    /// Returns true while the button is held and the mouse has moved past
    /// `threshold` pixels (negative: the configured drag threshold).
    #[must_use]
    pub fn is_mouse_dragging(&self, button: MouseButton, threshold: f32, config: &IoConfig) -> bool {
        let i = button.index();
        if !self.mouse_down[i] {
            return false;
        }
        let threshold = if threshold < 0.0 { config.mouse_drag_threshold } else { threshold };
        self.mouse_drag_max_distance_sqr[i] >= threshold * threshold
    }

    /// Seconds the button has been held, or a negative value.
    #[must_use]
    pub fn mouse_down_duration(&self, button: MouseButton) -> f32 {
        self.mouse_down_duration[button.index()]
    }

    /// Returns true if the key is held.
    #[must_use]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down[key as usize]
    }

    /// Returns true on the frame the key went down, and on repeats.
    #[must_use]
    pub fn is_key_pressed(&self, key: Key, repeat: bool, config: &IoConfig) -> bool {
        let i = key as usize;
        let t = self.keys_down_duration[i];
        if t == 0.0 {
            return true;
        }
        repeat
            && typematic_repeat_amount(t, self.keys_down_duration_prev[i], config.key_repeat_delay, config.key_repeat_rate)
                > 0
    }

    /// Returns true on the frame the key went up.
    #[must_use]
    pub fn is_key_released(&self, key: Key) -> bool {
        let i = key as usize;
        self.keys_down_duration_prev[i] >= 0.0 && !self.keys_down[i]
    }

    /// Returns true while the nav input is held.
    #[must_use]
    pub fn is_nav_input_down(&self, input: NavInput) -> bool {
        self.nav_inputs[input as usize]
    }

    /// Returns true on the frame the nav input went down, and on repeats.
    #[must_use]
    pub fn is_nav_input_pressed(&self, input: NavInput, repeat: bool, config: &IoConfig) -> bool {
        let i = input as usize;
        let t = self.nav_inputs_down_duration[i];
        if t == 0.0 {
            return true;
        }
        repeat
            && typematic_repeat_amount(
                t,
                self.nav_inputs_down_duration_prev[i],
                config.key_repeat_delay,
                config.key_repeat_rate,
            ) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(input: &mut InputState, time: &mut f64) {
        *time += f64::from(input.delta_time);
        input.update(&IoConfig::default(), *time);
    }

    #[test]
    fn test_mouse_click() {
        let mut input = InputState::new();
        let mut time = 0.0;
        input.set_mouse_pos(5.0, 5.0);

        input.set_mouse_button(MouseButton::Left, true);
        frame(&mut input, &mut time);
        assert!(input.is_mouse_clicked(MouseButton::Left, false, &IoConfig::default()));
        assert!(input.is_mouse_down(MouseButton::Left));

        frame(&mut input, &mut time);
        assert!(!input.is_mouse_clicked(MouseButton::Left, false, &IoConfig::default()));
        assert!(input.is_mouse_down(MouseButton::Left));

        input.set_mouse_button(MouseButton::Left, false);
        frame(&mut input, &mut time);
        assert!(input.is_mouse_released(MouseButton::Left));
        assert!(!input.is_mouse_down(MouseButton::Left));

        frame(&mut input, &mut time);
        assert!(!input.is_mouse_released(MouseButton::Left));
    }

    #[test]
    fn test_double_click() {
        let mut input = InputState::new();
        let mut time = 0.0;
        input.set_mouse_pos(5.0, 5.0);

        input.set_mouse_button(MouseButton::Left, true);
        frame(&mut input, &mut time);
        input.set_mouse_button(MouseButton::Left, false);
        frame(&mut input, &mut time);
        input.set_mouse_button(MouseButton::Left, true);
        frame(&mut input, &mut time);

        assert!(input.is_mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn test_slow_second_click_is_not_double() {
        let mut input = InputState::new();
        let mut time = 0.0;
        input.set_mouse_pos(5.0, 5.0);

        input.set_mouse_button(MouseButton::Left, true);
        frame(&mut input, &mut time);
        input.set_mouse_button(MouseButton::Left, false);
        input.delta_time = 1.0;
        frame(&mut input, &mut time);
        input.set_mouse_button(MouseButton::Left, true);
        frame(&mut input, &mut time);

        assert!(!input.is_mouse_double_clicked(MouseButton::Left));
    }

    #[test]
    fn test_drag_distance() {
        let cfg = IoConfig::default();
        let mut input = InputState::new();
        let mut time = 0.0;
        input.set_mouse_pos(0.0, 0.0);
        input.set_mouse_button(MouseButton::Left, true);
        frame(&mut input, &mut time);
        assert!(!input.is_mouse_dragging(MouseButton::Left, -1.0, &cfg));

        input.set_mouse_pos(20.0, 0.0);
        frame(&mut input, &mut time);
        assert!(input.is_mouse_dragging(MouseButton::Left, -1.0, &cfg));
        assert_eq!(input.mouse_delta(), Vec2::new(20.0, 0.0));
    }

    #[test]
    fn test_key_repeat_after_delay() {
        let cfg = IoConfig::default();
        let mut input = InputState::new();
        let mut time = 0.0;
        input.delta_time = 0.1;
        input.set_key(Key::Backspace, true);
        frame(&mut input, &mut time);
        assert!(input.is_key_pressed(Key::Backspace, true, &cfg));

        // Held below the repeat delay.
        frame(&mut input, &mut time);
        assert!(!input.is_key_pressed(Key::Backspace, true, &cfg));

        let mut repeats = 0;
        for _ in 0..10 {
            frame(&mut input, &mut time);
            if input.is_key_pressed(Key::Backspace, true, &cfg) {
                repeats += 1;
            }
        }
        assert!(repeats > 0);
        assert!(!input.is_key_pressed(Key::Backspace, false, &cfg));
    }

    #[test]
    fn test_typematic_amount() {
        assert_eq!(typematic_repeat_amount(0.0, -1.0, 0.25, 0.05), 1);
        assert_eq!(typematic_repeat_amount(0.2, 0.1, 0.25, 0.05), 0);
        assert_eq!(typematic_repeat_amount(0.36, 0.29, 0.25, 0.05), 1);
    }
}
