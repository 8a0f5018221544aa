pub use super::category::Entity as Category;
pub use super::comment::Entity as Comment;
pub use super::location::Entity as Location;
pub use super::post::Entity as Post;
pub use super::users::Entity as Users;
