//! Navigation vocabulary shared by every screen and the stack resolver.

use std::fmt;

/// Identifier for each registered screen.  The stack stores ids; the screen
/// instances live in the stack's registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    MainFrame,
    RadioFrame,
    AlarmFrame,
    ExitDialog,
    AlarmDialog,
    SnoozeDialog,
    AlarmTimeDialog,
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MainFrame => "main-frame",
            Self::RadioFrame => "radio-frame",
            Self::AlarmFrame => "alarm-frame",
            Self::ExitDialog => "exit-dialog",
            Self::AlarmDialog => "alarm-dialog",
            Self::SnoozeDialog => "snooze-dialog",
            Self::AlarmTimeDialog => "alarm-time-dialog",
        };
        f.write_str(name)
    }
}

/// Frames fall through unclaimed input to the layers below; dialogs never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Frame,
    Dialog,
}

/// What a screen asks the stack to do at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    NoOp,
    /// Push a screen above everything.
    PushTop(ScreenId),
    /// Pop the current top, then push a screen.
    SwitchTop(ScreenId),
    /// Pop down to and including the proposing screen.
    PopSelf,
    /// Pop down to and including the proposing screen, then push a replacement.
    SwitchSelf(ScreenId),
    /// Pop down to and including the named screen.
    Pop(ScreenId),
}
