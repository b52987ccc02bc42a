//! OpenAPI documentation for the HTTP API.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::api;

/// Registers the bearer API key scheme referenced by metered endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .description(Some(
                            "API key issued by `POST /signup`. Include it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer sk_live_...\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "dsctl",
        description = "Dataset curation API: API keys with per-plan quotas, deterministic quality and dialect scoring, \
                       and a sentence store with a two-stage validation ladder."
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::service::root,
        api::handlers::accounts::signup,
        api::handlers::accounts::get_account,
        api::handlers::analyze::analyze,
        api::handlers::sentences::create_sentence,
        api::handlers::sentences::list_sentences,
        api::handlers::sentences::get_sentence,
        api::handlers::sentences::validate_sentence,
        api::handlers::sentences::delete_sentence,
        api::handlers::sentences::get_stats,
    ),
    components(schemas(crate::errors::ErrorBody)),
    tags(
        (name = "service", description = "Service metadata"),
        (name = "accounts", description = "Signup and account details"),
        (name = "analysis", description = "Metered text analysis"),
        (name = "sentences", description = "Dataset submission and curation"),
    )
)]
pub struct ApiDoc;
