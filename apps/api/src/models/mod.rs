pub mod assessment;
pub mod chat;
