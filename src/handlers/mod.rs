// handlers/mod.rs - one module per collection, plus the session and root endpoints.
//
// Every data handler performs exactly one record store call and returns its
// raw result as JSON. Whether a route needs a session is decided by the
// session gate from configuration, not by where the handler lives.

pub mod blogs;
pub mod comments;
pub mod root;
pub mod session;
pub mod users;
pub mod wishlist;
