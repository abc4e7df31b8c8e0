pub mod post;
pub mod user;

pub use post::PostSummary;
pub use user::UserView;
