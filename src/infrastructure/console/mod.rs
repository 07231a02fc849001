//! Console Layer - 终端交互
//!
//! ConfirmationPort 的终端实现

mod confirmation;

pub use confirmation::TerminalConfirmation;
