/// Export configuration and its enumerated choices.
pub mod config;
/// Milestone/stat payloads and the subject profile.
pub mod payload;
