//! # Scope Tokens
//!
//! Guards that close a begin/push scope when dropped. Each token borrows the
//! [`Context`] mutably and derefs to it, so widgets are submitted through
//! the token:
//!
//! ```ignore
//! let mut win = ctx.window_scope("Tools", WindowFlags::empty());
//! if win.visible() {
//!     win.button("Run", Vec2::ZERO);
//! }
//! // end() runs here
//! ```
//!
//! Popups and tooltips only yield a token when their `begin` succeeded,
//! matching the rule that `end_popup` is only called after a true `begin`.

use std::ops::{Deref, DerefMut};

use tessera_core::Vec2;

use crate::context::Context;
use crate::flags::WindowFlags;
use crate::id::IdKey;
use crate::input::MouseButton;

macro_rules! scope_token {
    ($(#[$meta:meta])* $name:ident => $close:ident) => {
        $(#[$meta])*
        #[must_use = "the scope closes as soon as the token is dropped"]
        pub struct $name<'a> {
            ctx: &'a mut Context,
            visible: bool,
        }

        impl $name<'_> {
            /// Returns the value the opening call returned.
            #[must_use]
            pub fn visible(&self) -> bool {
                self.visible
            }
        }

        impl Deref for $name<'_> {
            type Target = Context;

            fn deref(&self) -> &Context {
                &*self.ctx
            }
        }

        impl DerefMut for $name<'_> {
            fn deref_mut(&mut self) -> &mut Context {
                &mut *self.ctx
            }
        }

        impl Drop for $name<'_> {
            fn drop(&mut self) {
                self.ctx.$close();
            }
        }
    };
}

scope_token!(
    /// Open window; calls `end` on drop.
    WindowToken => end
);
scope_token!(
    /// Open child window; calls `end_child` on drop.
    ChildToken => end_child
);
scope_token!(
    /// Open popup or modal; calls `end_popup` on drop.
    PopupToken => end_popup
);
scope_token!(
    /// Open tooltip; calls `end_tooltip` on drop.
    TooltipToken => end_tooltip
);
scope_token!(
    /// Open group; calls `end_group` on drop.
    GroupToken => end_group
);
scope_token!(
    /// Pushed id; calls `pop_id` on drop.
    IdToken => pop_id
);
scope_token!(
    /// Pushed clip rectangle; calls `pop_clip_rect` on drop.
    ClipRectToken => pop_clip_rect
);

impl Context {
    /// [`Context::begin`] returning a guard that ends the window.
    pub fn window_scope(&mut self, name: &str, flags: WindowFlags) -> WindowToken<'_> {
        let visible = self.begin(name, flags);
        WindowToken { ctx: self, visible }
    }

    /// [`Context::begin_child`] returning a guard that ends the child.
    pub fn child_scope(&mut self, str_id: &str, size: Vec2, border: bool, flags: WindowFlags) -> ChildToken<'_> {
        let visible = self.begin_child(str_id, size, border, flags);
        ChildToken { ctx: self, visible }
    }

    /// [`Context::begin_popup`]; `None` if the popup is closed.
    pub fn popup_scope(&mut self, str_id: &str, flags: WindowFlags) -> Option<PopupToken<'_>> {
        self.begin_popup(str_id, flags)
            .then(|| PopupToken { ctx: self, visible: true })
    }

    /// [`Context::begin_popup_modal`]; `None` if the modal is closed.
    pub fn popup_modal_scope(&mut self, name: &str, flags: WindowFlags) -> Option<PopupToken<'_>> {
        self.begin_popup_modal(name, flags)
            .then(|| PopupToken { ctx: self, visible: true })
    }

    /// [`Context::begin_popup_context_item`]; `None` if the popup is closed.
    pub fn popup_context_item_scope(&mut self, str_id: Option<&str>, button: MouseButton) -> Option<PopupToken<'_>> {
        self.begin_popup_context_item(str_id, button)
            .then(|| PopupToken { ctx: self, visible: true })
    }

    /// [`Context::begin_tooltip`] returning a guard that ends the tooltip.
    pub fn tooltip_scope(&mut self) -> TooltipToken<'_> {
        self.begin_tooltip();
        TooltipToken { ctx: self, visible: true }
    }

    /// [`Context::begin_group`] returning a guard that ends the group.
    pub fn group_scope(&mut self) -> GroupToken<'_> {
        self.begin_group();
        GroupToken { ctx: self, visible: true }
    }

    /// [`Context::push_id`] returning a guard that pops it.
    pub fn id_scope<'k>(&mut self, key: impl Into<IdKey<'k>>) -> IdToken<'_> {
        self.push_id(key);
        IdToken { ctx: self, visible: true }
    }

    /// [`Context::push_clip_rect`] returning a guard that pops it.
    pub fn clip_rect_scope(&mut self, min: Vec2, max: Vec2, intersect_with_current: bool) -> ClipRectToken<'_> {
        self.push_clip_rect(min, max, intersect_with_current);
        ClipRectToken { ctx: self, visible: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{frame, test_context};

    #[test]
    fn test_tokens_balance_stacks() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| {
            let mut win = ctx.window_scope("Scoped", WindowFlags::empty());
            assert!(win.visible());
            {
                let mut id = win.id_scope("row");
                let mut group = id.group_scope();
                group.text_unformatted("inside");
            }
            let _child = win.child_scope("kid", Vec2::new(50.0, 50.0), false, WindowFlags::empty());
        });
        assert!(ctx.window("Scoped").is_some_and(|w| w.is_active()));
    }

    #[test]
    fn test_closed_popup_yields_no_token() {
        let mut ctx = test_context();
        frame(&mut ctx, |ctx| {
            let _win = ctx.window_scope("Host", WindowFlags::empty());
        });
        frame(&mut ctx, |ctx| {
            let mut win = ctx.window_scope("Host", WindowFlags::empty());
            assert!(win.popup_scope("menu", WindowFlags::empty()).is_none());
        });
    }
}
