//! Domain model for queued tool jobs and user-facing events.

mod event;
mod job;

pub use event::{AiResponse, Notice, NoticeKind, UserEvent};
pub use job::ToolJob;
