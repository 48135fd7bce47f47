//! Operations behind the HTTP routes. Each one checks its own preconditions and
//! performs its store work through the model relations.

pub mod comments;
pub mod feedback;
pub mod users;
pub mod videos;
