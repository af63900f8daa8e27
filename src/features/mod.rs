pub mod auth;
pub mod search;
pub mod verify;
