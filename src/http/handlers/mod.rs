pub mod auth;
pub mod comments;
pub mod hn;
pub mod ratings;
