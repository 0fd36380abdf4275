pub mod movie;

pub use movie::MovieService;
