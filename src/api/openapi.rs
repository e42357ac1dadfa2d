//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, reservations, summary};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Courtbook API",
        version = "1.0.0",
        description = "Court reservation booking REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Reservations
        reservations::create_reservation,
        reservations::get_reservation,
        reservations::cancel_reservation,
        reservations::update_status,
        reservations::delete_reservation,
        reservations::check_conflict,
        // Summary
        summary::get_summary,
        summary::get_weekly_summary,
        summary::get_monthly_summary,
    ),
    components(
        schemas(
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservationRequest,
            crate::models::reservation::UpdateReservationStatus,
            crate::models::reservation::ConflictQuery,
            crate::models::reservation::ConflictResponse,
            crate::models::ReservationStatus,
            crate::models::PaymentStatus,
            crate::models::ReservationKind,
            crate::models::TariffSource,
            // Summary
            crate::models::summary::Summary,
            crate::models::summary::DaySummary,
            crate::models::summary::SummaryTotals,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "reservations", description = "Court reservations"),
        (name = "summary", description = "Club dashboard summaries")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/reservations"));
        assert!(paths.iter().any(|p| p.as_str() == "/clubs/{id}/summary/monthly"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
