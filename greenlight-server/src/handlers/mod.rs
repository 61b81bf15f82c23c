//! HTTP request handlers organized by resource

pub mod fallback;
pub mod healthcheck;
pub mod movies;

pub use fallback::{method_not_allowed_handler, not_found_handler};
pub use healthcheck::healthcheck_handler;
pub use movies::{
    create_movie_handler, delete_movie_handler, list_movies_handler,
    show_movie_handler, update_movie_handler,
};
