pub mod movies;
