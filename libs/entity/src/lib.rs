pub mod category;
pub mod comment;
pub mod location;
pub mod paginated;
pub mod post;
pub mod user;

pub mod prelude {
    pub use crate::category::Category as CategoryEntity;
    pub use crate::comment::Comment as CommentEntity;
    pub use crate::comment::CommentWithAuthor as CommentWithAuthorEntity;
    pub use crate::location::Location as LocationEntity;
    pub use crate::paginated::Paginated;
    pub use crate::post::FeedPost as FeedPostEntity;
    pub use crate::post::Post as PostEntity;
    pub use crate::user::User as UserEntity;
}
