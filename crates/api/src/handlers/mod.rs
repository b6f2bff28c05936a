pub mod auth;
pub mod comment;
pub mod export;
pub mod feedback;
pub mod project;
pub mod revision;
pub mod section;
