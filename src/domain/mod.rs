pub mod narration;
pub mod segment;
pub mod session;
pub mod speech;
