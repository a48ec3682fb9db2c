/// Data models for Taskboard
///
/// - `user`: User accounts, write inputs, and the password-free `UserView`
/// - `task`: Tasks assigned to users (only their user reference matters here)
///
/// Persistence lives in [`crate::repository`]; these are plain records.

pub mod task;
pub mod user;
