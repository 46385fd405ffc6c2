pub mod prelude;

pub mod administrators;
pub mod article_likes;
pub mod articles;
pub mod users;

/// Default profile photo assigned on registration.
pub const DEFAULT_PHOTO_PROFILE: &str = "/images/default-profile.jpg";
