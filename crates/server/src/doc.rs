use crate::routes::{auth, health, schedule};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::me,
        schedule::get_schedules,
        schedule::get_schedule_by_id,
        schedule::get_schedule_history,
        schedule::create_schedule,
        schedule::update_schedule,
        schedule::delete_schedule
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Authentication related endpoints"),
        (name = "Schedules", description = "Class schedule entries"),
    ),
    info(
        title = "Schedule API",
        version = "1.0.0",
        description = "Course schedule management API",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
