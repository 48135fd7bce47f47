pub use comment::*;
pub use user::*;
pub use video::*;

mod comment;
mod user;
mod video;
