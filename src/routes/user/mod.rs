mod handler;
mod model;

pub use handler::{login, me, register};
