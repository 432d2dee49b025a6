mod handler;
mod model;

pub use handler::{create, delete, list};
