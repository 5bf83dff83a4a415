//! OpenAPI documentation configuration

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for the shop API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shop API",
        version = "0.1.0",
        description = "Chemical catalog, accounts and orders",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/product", api = domain_products::ApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/auth", api = domain_users::AuthApiDoc),
        (path = "/api/orders", api = domain_orders::ApiDoc)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Products", description = "Chemical catalog endpoints"),
        (name = "Users", description = "Account management"),
        (name = "Auth", description = "Login"),
        (name = "Orders", description = "Order placement and fulfilment")
    )
)]
pub struct ApiDoc;

/// Registers `bearer_auth`, referenced by every protected route, plus the
/// `x-auth-token` header alternative.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "auth_token",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(
                axum_helpers::AUTH_TOKEN_HEADER,
            ))),
        );
    }
}
