//! Flag sets for windows, items and interaction queries.

use bitflags::bitflags;

bitflags! {
    /// Window behavior switches passed to `begin`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u32 {
        /// No title bar.
        const NO_TITLE_BAR = 1 << 0;
        /// No resize grips or borders.
        const NO_RESIZE = 1 << 1;
        /// Cannot be dragged around.
        const NO_MOVE = 1 << 2;
        /// No scrollbars (scrolling through the API still works).
        const NO_SCROLLBAR = 1 << 3;
        /// The mouse wheel scrolls the parent instead.
        const NO_SCROLL_WITH_MOUSE = 1 << 4;
        /// Double-clicking the title bar does not collapse.
        const NO_COLLAPSE = 1 << 5;
        /// Resize to fit contents every frame.
        const ALWAYS_AUTO_RESIZE = 1 << 6;
        /// Never read or write persisted settings.
        const NO_SAVED_SETTINGS = 1 << 8;
        /// Mouse passes through; never hovered.
        const NO_INPUTS = 1 << 9;
        /// Allow a horizontal scrollbar.
        const HORIZONTAL_SCROLLBAR = 1 << 11;
        /// Do not take focus when first shown.
        const NO_FOCUS_ON_APPEARING = 1 << 12;
        /// Focusing does not raise the window.
        const NO_BRING_TO_FRONT_ON_FOCUS = 1 << 13;
        /// Vertical scrollbar even when contents fit.
        const ALWAYS_VERTICAL_SCROLLBAR = 1 << 14;
        /// Horizontal scrollbar even when contents fit.
        const ALWAYS_HORIZONTAL_SCROLLBAR = 1 << 15;
        /// Child windows without a border still get padding.
        const ALWAYS_USE_WINDOW_PADDING = 1 << 16;

        /// Set by `begin_child`.
        const CHILD_WINDOW = 1 << 24;
        /// Set by `begin_tooltip`.
        const TOOLTIP = 1 << 25;
        /// Set by `begin_popup`.
        const POPUP = 1 << 26;
        /// Set by `begin_popup_modal`.
        const MODAL = 1 << 27;
        /// Popup window shared by every menu at one nesting level.
        const CHILD_MENU = 1 << 28;
    }
}

bitflags! {
    /// Selects when `button_behavior` reports a press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonFlags: u32 {
        /// Keep pressing while held, after the key repeat delay.
        const REPEAT = 1 << 0;
        /// Press on click then release inside (default).
        const PRESS_ON_CLICK_RELEASE = 1 << 1;
        /// Press on the click itself.
        const PRESS_ON_CLICK = 1 << 2;
        /// Press on release, without needing the click on the item.
        const PRESS_ON_RELEASE = 1 << 3;
        /// Press on double-click.
        const PRESS_ON_DOUBLE_CLICK = 1 << 4;
        /// Hovering counts through child windows of the same root.
        const FLATTEN_CHILDREN = 1 << 5;
        /// Can be overlapped by later items.
        const ALLOW_ITEM_OVERLAP = 1 << 6;
        /// Press without becoming active.
        const NO_HOLDING = 1 << 7;
        /// Never hovered or pressed.
        const DISABLED = 1 << 8;
        /// Ignore clicks with modifier keys held.
        const NO_KEY_MODIFIERS = 1 << 9;
        /// Clicking does not move the nav id here.
        const NO_NAV_FOCUS = 1 << 10;
        /// Vertically align with the text baseline.
        const ALIGN_TEXT_BASE_LINE = 1 << 11;
    }
}

bitflags! {
    /// Condition gating `set_next_window_*` calls.
    ///
    /// The empty set behaves like [`Cond::ALWAYS`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Cond: u8 {
        /// Every call.
        const ALWAYS = 1 << 0;
        /// Once per runtime session.
        const ONCE = 1 << 1;
        /// Only if the window has no persisted settings.
        const FIRST_USE_EVER = 1 << 2;
        /// Whenever the window reappears after being hidden.
        const APPEARING = 1 << 3;
    }
}

bitflags! {
    /// Options for `is_window_hovered` and `is_item_hovered`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HoveredFlags: u16 {
        /// Also true when a child of the window is hovered.
        const CHILD_WINDOWS = 1 << 0;
        /// Test the root window of the current window.
        const ROOT_WINDOW = 1 << 1;
        /// Any window.
        const ANY_WINDOW = 1 << 2;
        /// True even if a popup blocks access.
        const ALLOW_WHEN_BLOCKED_BY_POPUP = 1 << 3;
        /// True even if another item is active.
        const ALLOW_WHEN_BLOCKED_BY_ACTIVE_ITEM = 1 << 5;
        /// True even if the item is covered by another window.
        const ALLOW_WHEN_OVERLAPPED = 1 << 6;
        /// Root window and its children.
        const ROOT_AND_CHILD_WINDOWS = Self::ROOT_WINDOW.bits() | Self::CHILD_WINDOWS.bits();
    }
}

bitflags! {
    /// Options for `is_window_focused`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FocusedFlags: u8 {
        /// Also true when a child of the window is focused.
        const CHILD_WINDOWS = 1 << 0;
        /// Test the root window of the current window.
        const ROOT_WINDOW = 1 << 1;
        /// Any window.
        const ANY_WINDOW = 1 << 2;
        /// Root window and its children.
        const ROOT_AND_CHILD_WINDOWS = Self::ROOT_WINDOW.bits() | Self::CHILD_WINDOWS.bits();
    }
}

bitflags! {
    /// Per-item switches pushed with `push_item_flag`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemFlags: u8 {
        /// Buttons repeat while held.
        const BUTTON_REPEAT = 1 << 1;
        /// Items are drawn but do not react.
        const DISABLED = 1 << 2;
    }
}

bitflags! {
    /// What the layout recorded about the last submitted item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ItemStatusFlags: u8 {
        /// The mouse was inside the item rect, ignoring occlusion.
        const HOVERED_RECT = 1 << 0;
    }
}

bitflags! {
    /// Drag and drop options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DragDropFlags: u16 {
        /// Do not open the preview tooltip.
        const SOURCE_NO_PREVIEW_TOOLTIP = 1 << 0;
        /// Keep reporting the source item as hovered while dragging.
        const SOURCE_NO_DISABLE_HOVER = 1 << 1;
        /// Allow items without an id (text, images) to be sources.
        const SOURCE_ALLOW_NULL_ID = 1 << 3;
        /// The source lives outside the UI (file drop); always dragging.
        const SOURCE_EXTERN = 1 << 4;
        /// Drop the payload one frame after the source stops submitting it,
        /// even if the mouse is still down.
        const SOURCE_AUTO_EXPIRE_PAYLOAD = 1 << 5;
        /// Return the payload while hovering, before the drop.
        const ACCEPT_BEFORE_DELIVERY = 1 << 10;
        /// Skip the highlight rectangle around the target.
        const ACCEPT_NO_DRAW_DEFAULT_RECT = 1 << 11;
        /// Peek without the visuals.
        const ACCEPT_PEEK_ONLY = Self::ACCEPT_BEFORE_DELIVERY.bits() | Self::ACCEPT_NO_DRAW_DEFAULT_RECT.bits();
    }
}

bitflags! {
    /// Column set options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ColumnsFlags: u8 {
        /// No column borders.
        const NO_BORDER = 1 << 0;
        /// Borders cannot be dragged.
        const NO_RESIZE = 1 << 1;
        /// Dragging a border resizes only the column to its left.
        const NO_PRESERVE_WIDTHS = 1 << 2;
        /// Borders may be dragged past the window edge.
        const NO_FORCE_WITHIN_WINDOW = 1 << 3;
        /// Columns extend the parent's content size.
        const GROW_PARENT_CONTENTS_SIZE = 1 << 4;
    }
}

impl Cond {
    /// Every condition; the initial allow-mask of a new window.
    pub const ALL: Self = Self::ALWAYS.union(Self::ONCE).union(Self::FIRST_USE_EVER).union(Self::APPEARING);
}
