pub mod hotkey;
pub mod hotkey_view;
pub mod top_bar_view;
