//! Menu and toolbar generation
//!
//! Builders query the [`CommandRegistry`](crate::command::CommandRegistry)
//! and produce plain data handles (menus, toolbars) that a rendering backend
//! draws. Every clickable entry carries an [`Activation`] that dispatches by
//! command id through the registry.

mod activation;
mod icons;
mod layout;
mod menu;
mod toolbar;

pub use activation::Activation;
pub use icons::{find_icon, resolve_icon, DirectoryIconProvider, IconProvider};
pub use layout::{
    register_toolbar_toggles, toolbar_toggle_id, LayoutError, ToolbarConfig, ToolbarItem,
    ToolbarLayout, DEFAULT_TOOLBAR_CATEGORIES, MAIN_TOOLBAR, TOOLBAR_TOGGLE_CATEGORY,
};
pub use menu::{Menu, MenuBar, MenuBuilder, MenuEntry, MenuItem, DEFAULT_MENU_STRUCTURE};
pub use toolbar::{LiveToolbar, ToolItem, Toolbar, ToolbarBuilder, ToolbarEntry};
