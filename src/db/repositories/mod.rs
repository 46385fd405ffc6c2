pub mod admin;
pub mod article;
pub mod article_like;
pub mod user;
