// API layer - HTTP endpoints
pub mod health;
pub mod session;

use std::sync::Arc;

pub use health::HealthApi;
pub use session::SessionApi;

use poem::error::NotFoundError;
use poem::http::StatusCode;
use poem::{Endpoint, EndpointExt, IntoResponse, Request, Route};
use poem_openapi::error::{ContentTypeError, ParseRequestPayloadError};
use poem_openapi::OpenApiService;

use crate::app_data::AppData;
use crate::coordinators::SessionCoordinator;
use crate::errors::api::auth::NOT_FOUND_MESSAGE;
use crate::types::internal::IdentitySlot;

/// Assemble the HTTP application
///
/// The OpenAPI service is mounted under `/api` and its Swagger UI under
/// `/swagger`. Every request gets a fresh [`IdentitySlot`] before routing.
/// Sign-in is the only route with a body; one that does not parse as JSON
/// is answered with the field errors for empty credentials.
pub fn build_app(app_data: Arc<AppData>, server_url: &str) -> impl Endpoint + 'static {
    let session_coordinator = Arc::new(SessionCoordinator::new(app_data));
    let on_parse_error = Arc::clone(&session_coordinator);
    let on_content_type_error = Arc::clone(&session_coordinator);

    let api_service = OpenApiService::new(
        (HealthApi, SessionApi::new(session_coordinator)),
        "Gatehouse API",
        env!("CARGO_PKG_VERSION"),
    )
    .server(server_url);

    let ui = api_service.swagger_ui();

    Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui)
        .before(|mut req: Request| async move {
            req.extensions_mut().insert(IdentitySlot::default());
            Ok(req)
        })
        .catch_error(move |_: ParseRequestPayloadError| {
            let response = on_parse_error.reject_unparsable_sign_in();
            async move { response }
        })
        .catch_error(move |_: ContentTypeError| {
            let response = on_content_type_error.reject_unparsable_sign_in();
            async move { response }
        })
        .catch_error(|_: NotFoundError| async move {
            poem::web::Json(serde_json::json!({ "Message": NOT_FOUND_MESSAGE }))
                .with_status(StatusCode::NOT_FOUND)
        })
}
