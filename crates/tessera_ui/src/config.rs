//! # Style and IO Configuration
//!
//! Both structs load from TOML with every field optional; missing fields
//! keep their defaults.
//!
//! ```toml
//! window_rounding = 0.0
//! item_spacing = { x = 6.0, y = 3.0 }
//!
//! [colors]
//! window_bg = { r = 0.1, g = 0.1, b = 0.1, a = 1.0 }
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tessera_core::color::PackedColor;
use tessera_core::{Color, Vec2};

use crate::error::UiResult;

macro_rules! style_colors {
    ($($variant:ident => $field:ident = ($r:expr, $g:expr, $b:expr, $a:expr)),+ $(,)?) => {
        /// Index into [`StyleColors`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum StyleColor {
            $(
                #[allow(missing_docs)]
                $variant,
            )+
        }

        /// The color palette.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct StyleColors {
            $(
                #[allow(missing_docs)]
                pub $field: Color,
            )+
        }

        impl Default for StyleColors {
            fn default() -> Self {
                Self {
                    $($field: Color::rgba($r, $g, $b, $a),)+
                }
            }
        }

        impl StyleColors {
            /// Returns one entry.
            #[must_use]
            pub fn get(&self, idx: StyleColor) -> Color {
                match idx {
                    $(StyleColor::$variant => self.$field,)+
                }
            }

            /// Returns one entry mutably.
            pub fn get_mut(&mut self, idx: StyleColor) -> &mut Color {
                match idx {
                    $(StyleColor::$variant => &mut self.$field,)+
                }
            }
        }
    };
}

style_colors! {
    Text => text = (1.00, 1.00, 1.00, 1.00),
    TextDisabled => text_disabled = (0.50, 0.50, 0.50, 1.00),
    WindowBg => window_bg = (0.06, 0.06, 0.06, 0.94),
    ChildBg => child_bg = (1.00, 1.00, 1.00, 0.00),
    PopupBg => popup_bg = (0.08, 0.08, 0.08, 0.94),
    Border => border = (0.43, 0.43, 0.50, 0.50),
    BorderShadow => border_shadow = (0.00, 0.00, 0.00, 0.00),
    FrameBg => frame_bg = (0.16, 0.29, 0.48, 0.54),
    FrameBgHovered => frame_bg_hovered = (0.26, 0.59, 0.98, 0.40),
    FrameBgActive => frame_bg_active = (0.26, 0.59, 0.98, 0.67),
    TitleBg => title_bg = (0.04, 0.04, 0.04, 1.00),
    TitleBgActive => title_bg_active = (0.16, 0.29, 0.48, 1.00),
    TitleBgCollapsed => title_bg_collapsed = (0.00, 0.00, 0.00, 0.51),
    ScrollbarBg => scrollbar_bg = (0.02, 0.02, 0.02, 0.53),
    ScrollbarGrab => scrollbar_grab = (0.31, 0.31, 0.31, 1.00),
    ScrollbarGrabHovered => scrollbar_grab_hovered = (0.41, 0.41, 0.41, 1.00),
    ScrollbarGrabActive => scrollbar_grab_active = (0.51, 0.51, 0.51, 1.00),
    Button => button = (0.26, 0.59, 0.98, 0.40),
    ButtonHovered => button_hovered = (0.26, 0.59, 0.98, 1.00),
    ButtonActive => button_active = (0.06, 0.53, 0.98, 1.00),
    Separator => separator = (0.43, 0.43, 0.50, 0.50),
    SeparatorHovered => separator_hovered = (0.10, 0.40, 0.75, 0.78),
    SeparatorActive => separator_active = (0.10, 0.40, 0.75, 1.00),
    ResizeGrip => resize_grip = (0.26, 0.59, 0.98, 0.25),
    ResizeGripHovered => resize_grip_hovered = (0.26, 0.59, 0.98, 0.67),
    ResizeGripActive => resize_grip_active = (0.26, 0.59, 0.98, 0.95),
    DragDropTarget => drag_drop_target = (1.00, 1.00, 0.00, 0.90),
    ModalWindowDarkening => modal_window_darkening = (0.80, 0.80, 0.80, 0.35),
}

/// Sizes, spacing and colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Global alpha applied to every color.
    pub alpha: f32,
    /// Padding between a window's border and its content.
    pub window_padding: Vec2,
    /// Corner radius of top-level windows.
    pub window_rounding: f32,
    /// Border thickness of top-level windows (0 or 1).
    pub window_border_size: f32,
    /// Smallest size a window can be resized or auto-fit to.
    pub window_min_size: Vec2,
    /// Title text alignment, 0..1 per axis.
    pub window_title_align: Vec2,
    /// Corner radius of child windows.
    pub child_rounding: f32,
    /// Border thickness of child windows.
    pub child_border_size: f32,
    /// Corner radius of popups and tooltips.
    pub popup_rounding: f32,
    /// Border thickness of popups and tooltips.
    pub popup_border_size: f32,
    /// Padding inside framed widgets.
    pub frame_padding: Vec2,
    /// Corner radius of framed widgets.
    pub frame_rounding: f32,
    /// Border thickness of framed widgets.
    pub frame_border_size: f32,
    /// Spacing between items.
    pub item_spacing: Vec2,
    /// Spacing between the parts of a composite item.
    pub item_inner_spacing: Vec2,
    /// Extra hit-test padding for touch screens.
    pub touch_extra_padding: Vec2,
    /// Horizontal offset of one `indent`.
    pub indent_spacing: f32,
    /// Minimum width of a column.
    pub columns_min_spacing: f32,
    /// Width of vertical and height of horizontal scrollbars.
    pub scrollbar_size: f32,
    /// Corner radius of scrollbar grabs.
    pub scrollbar_rounding: f32,
    /// Minimum length of a scrollbar grab.
    pub grab_min_size: f32,
    /// Alignment of button labels, 0..1 per axis.
    pub button_text_align: Vec2,
    /// Windows are kept at least this far inside the display.
    pub display_window_padding: Vec2,
    /// Popups and tooltips avoid this margin at the display edges.
    pub display_safe_area_padding: Vec2,
    /// Anti-alias stroked paths.
    pub anti_aliased_lines: bool,
    /// Anti-alias filled shapes.
    pub anti_aliased_fill: bool,
    /// Max pixel error when flattening curves.
    pub curve_tessellation_tol: f32,
    /// The palette.
    pub colors: StyleColors,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            window_padding: Vec2::new(8.0, 8.0),
            window_rounding: 7.0,
            window_border_size: 1.0,
            window_min_size: Vec2::new(32.0, 32.0),
            window_title_align: Vec2::new(0.0, 0.5),
            child_rounding: 0.0,
            child_border_size: 1.0,
            popup_rounding: 0.0,
            popup_border_size: 1.0,
            frame_padding: Vec2::new(4.0, 3.0),
            frame_rounding: 0.0,
            frame_border_size: 0.0,
            item_spacing: Vec2::new(8.0, 4.0),
            item_inner_spacing: Vec2::new(4.0, 4.0),
            touch_extra_padding: Vec2::ZERO,
            indent_spacing: 21.0,
            columns_min_spacing: 6.0,
            scrollbar_size: 16.0,
            scrollbar_rounding: 9.0,
            grab_min_size: 10.0,
            button_text_align: Vec2::new(0.5, 0.5),
            display_window_padding: Vec2::new(22.0, 22.0),
            display_safe_area_padding: Vec2::new(4.0, 4.0),
            anti_aliased_lines: true,
            anti_aliased_fill: true,
            curve_tessellation_tol: 1.25,
            colors: StyleColors::default(),
        }
    }
}

impl Style {
    /// Parses a style; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::SettingsParse`] on malformed TOML.
    pub fn from_toml_str(s: &str) -> UiResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Serializes the full style.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::SettingsSerialize`] if serialization fails.
    pub fn to_toml_string(&self) -> UiResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Multiplies every size by `factor`.
    pub fn scale_all_sizes(&mut self, factor: f32) {
        self.window_padding = (self.window_padding * factor).floor();
        self.window_rounding = (self.window_rounding * factor).floor();
        self.window_min_size = (self.window_min_size * factor).floor();
        self.child_rounding = (self.child_rounding * factor).floor();
        self.popup_rounding = (self.popup_rounding * factor).floor();
        self.frame_padding = (self.frame_padding * factor).floor();
        self.frame_rounding = (self.frame_rounding * factor).floor();
        self.item_spacing = (self.item_spacing * factor).floor();
        self.item_inner_spacing = (self.item_inner_spacing * factor).floor();
        self.touch_extra_padding = (self.touch_extra_padding * factor).floor();
        self.indent_spacing = (self.indent_spacing * factor).floor();
        self.columns_min_spacing = (self.columns_min_spacing * factor).floor();
        self.scrollbar_size = (self.scrollbar_size * factor).floor();
        self.scrollbar_rounding = (self.scrollbar_rounding * factor).floor();
        self.grab_min_size = (self.grab_min_size * factor).floor();
        self.display_window_padding = (self.display_window_padding * factor).floor();
        self.display_safe_area_padding = (self.display_safe_area_padding * factor).floor();
    }

    /// Packed palette entry with the global alpha applied.
    #[must_use]
    pub fn color_u32(&self, idx: StyleColor, alpha_mul: f32) -> PackedColor {
        let c = self.colors.get(idx);
        c.with_alpha(c.a * self.alpha * alpha_mul).to_packed()
    }

    /// Packs an arbitrary color with the global alpha applied.
    #[must_use]
    pub fn color_u32_from(&self, c: Color) -> PackedColor {
        c.with_alpha(c.a * self.alpha).to_packed()
    }
}

/// Timing thresholds and behavior switches for input handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IoConfig {
    /// Max seconds between two clicks of a double-click.
    pub mouse_double_click_time: f32,
    /// Max pixels the mouse may move between two clicks of a double-click.
    pub mouse_double_click_max_dist: f32,
    /// Pixels the mouse must move before a press counts as a drag.
    pub mouse_drag_threshold: f32,
    /// Seconds a key is held before it starts repeating.
    pub key_repeat_delay: f32,
    /// Seconds between repeats.
    pub key_repeat_rate: f32,
    /// Minimum seconds between settings writes.
    pub ini_saving_rate: f32,
    /// Where window settings persist; `None` disables persistence.
    pub settings_path: Option<PathBuf>,
    /// Scale applied to every font size.
    pub font_global_scale: f32,
    /// Windows resize from their edges as well as the corner grips.
    pub config_windows_resize_from_edges: bool,
    /// Dragging moves windows only from the title bar.
    pub config_windows_move_from_title_bar_only: bool,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            mouse_double_click_time: 0.30,
            mouse_double_click_max_dist: 6.0,
            mouse_drag_threshold: 6.0,
            key_repeat_delay: 0.25,
            key_repeat_rate: 0.05,
            ini_saving_rate: 5.0,
            settings_path: None,
            font_global_scale: 1.0,
            config_windows_resize_from_edges: true,
            config_windows_move_from_title_bar_only: false,
        }
    }
}

impl IoConfig {
    /// Parses a config; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UiError::SettingsParse`] on malformed TOML.
    pub fn from_toml_str(s: &str) -> UiResult<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_style_keeps_defaults() {
        let style = Style::from_toml_str(
            r"
            window_rounding = 0.0
            item_spacing = { x = 6.0, y = 3.0 }

            [colors]
            window_bg = { r = 0.1, g = 0.2, b = 0.3, a = 1.0 }
            ",
        )
        .unwrap();

        assert_eq!(style.window_rounding, 0.0);
        assert_eq!(style.item_spacing, Vec2::new(6.0, 3.0));
        assert_eq!(style.window_padding, Vec2::new(8.0, 8.0));
        assert_eq!(style.colors.get(StyleColor::WindowBg), Color::rgba(0.1, 0.2, 0.3, 1.0));
        assert_eq!(style.colors.text, Color::WHITE);
    }

    #[test]
    fn test_style_round_trips_through_toml() {
        let mut style = Style::default();
        style.scrollbar_size = 12.0;
        let text = style.to_toml_string().unwrap();
        assert_eq!(Style::from_toml_str(&text).unwrap(), style);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(IoConfig::from_toml_str("mouse_drag_threshold = \"far\"").is_err());
    }

    #[test]
    fn test_io_config_defaults() {
        let io = IoConfig::from_toml_str("key_repeat_rate = 0.1").unwrap();
        assert_eq!(io.key_repeat_rate, 0.1);
        assert_eq!(io.mouse_double_click_time, 0.30);
        assert!(io.settings_path.is_none());
    }

    #[test]
    fn test_alpha_applies_to_packed_color() {
        let mut style = Style::default();
        style.alpha = 0.5;
        let col = style.color_u32(StyleColor::Text, 1.0);
        assert_eq!(col >> 24, 128);
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut colors = StyleColors::default();
        *colors.get_mut(StyleColor::Button) = Color::BLACK;
        assert_eq!(colors.button, Color::BLACK);
    }
}
