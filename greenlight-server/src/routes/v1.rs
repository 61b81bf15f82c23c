use axum::{Router, routing::get};

use crate::{
    AppState,
    handlers::{
        create_movie_handler, delete_movie_handler, healthcheck_handler,
        list_movies_handler, method_not_allowed_handler, show_movie_handler,
        update_movie_handler,
    },
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(healthcheck_handler))
        .route(
            "/movies",
            get(list_movies_handler).post(create_movie_handler),
        )
        .route(
            "/movies/{id}",
            get(show_movie_handler)
                .patch(update_movie_handler)
                .delete(delete_movie_handler),
        )
        // Must follow the routes it applies to.
        .method_not_allowed_fallback(method_not_allowed_handler)
}
