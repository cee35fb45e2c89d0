//! OpenAPI document for the song API, served alongside a Swagger UI.

use utoipa::OpenApi;

use super::handlers;

#[derive(OpenApi)]
#[openapi(
    info(title = "Song Library API", description = "Store, search and page through song lyrics"),
    paths(
        handlers::health,
        handlers::list_songs,
        handlers::get_text,
        handlers::create_song,
        handlers::update_song,
        handlers::delete_song,
    ),
    tags(
        (name = "songs", description = "Song catalog"),
        (name = "health", description = "Service liveness"),
    )
)]
pub struct ApiDoc;

/// Where the JSON document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Where the Swagger UI is mounted.
pub const SWAGGER_PATH: &str = "/swagger";
