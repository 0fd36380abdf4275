pub mod movie;
pub mod shared;
