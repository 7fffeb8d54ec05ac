//! Database models.

pub mod comment;
pub mod news;
pub mod user;

pub use comment::{Comment, CommentEntry, CreateComment};
pub use news::{CreateNews, News, NewsSummary};
pub use user::{CreateUser, User};
