pub mod comment;
pub mod feedback;
pub mod project;
pub mod revision;
pub mod section;
pub mod session;
pub mod user;
