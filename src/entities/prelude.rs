pub use super::administrators::Entity as Administrators;
pub use super::article_likes::Entity as ArticleLikes;
pub use super::articles::Entity as Articles;
pub use super::users::Entity as Users;
