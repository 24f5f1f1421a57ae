// Public API
pub use announcements::AnnouncementJob;
pub use task::{ScheduledJob, Scheduler, TaskHandle, TokioScheduler};

// Internal modules
mod announcements;
mod task;
