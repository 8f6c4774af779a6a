pub mod category;
pub mod comment;
pub mod thread;
pub mod user;

pub use category::Category;
pub use comment::{Comment, CommentChanges, NewComment};
pub use thread::{NewThread, Thread, ThreadChanges};
pub use user::{CredentialRecord, NewUser, User};
