//! Concrete screens.  Frames fill the terminal and let unclaimed keys fall
//! through; dialogs overlay the frames and claim every key.

mod alarm_dialog;
mod alarm_frame;
mod exit_dialog;
mod main_frame;
mod radio_frame;
mod snooze_dialog;
mod time_dialog;

pub use alarm_dialog::AlarmDialog;
pub use alarm_frame::AlarmFrame;
pub use exit_dialog::ExitDialog;
pub use main_frame::MainFrame;
pub use radio_frame::RadioFrame;
pub use snooze_dialog::SnoozeDialog;
pub use time_dialog::AlarmTimeDialog;
