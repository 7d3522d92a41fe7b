pub mod commands;
pub mod context;
pub mod controller;
pub mod keymap;
pub mod logging;
pub mod options;
pub mod snapshot;

pub use commands::{Command, CommandId, CommandTable, HostRequest};
pub use context::EditorContext;
pub use controller::ShellController;
pub use keymap::{relabel_shortcut, resolve_accelerator, KeyStrokePayload};
pub use options::{OptionOverrides, PrimaryModifier, ShellOptions};
pub use snapshot::{SessionSnapshot, ShellSnapshot};

