pub mod channel_list;
pub mod pane_chrome;
pub mod status_bar;
pub mod volume_bar;
