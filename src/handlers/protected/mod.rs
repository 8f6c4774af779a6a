// Protected handlers: every route here sits behind the auth gate and can
// extract the caller's `Principal`.
//
// Mutations of threads and comments follow the same order: load the target
// (404), check ownership (403), then write.

pub mod comments;
pub mod threads;
pub mod users;
