pub mod movie;

pub use movie::{MovieFields, MovieRepository, SeaOrmMovieRepository};
