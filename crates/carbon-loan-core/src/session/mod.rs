//! Session-scoped state for the dashboard: an activity log and an uploaded
//! file registry. Both are plain values constructed at session start and
//! dropped at teardown; callers that share them across threads wrap them in a
//! lock themselves.

pub mod activity_log;
pub mod file_registry;
