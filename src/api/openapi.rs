use super::handlers::{auth, customer, health};
use axum::middleware;
use utoipa::openapi::{Contact, InfoBuilder, License, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// JSON endpoints are registered here via `.routes(routes!(...))` so they are both served
/// and documented. HTML pages, `OPTIONS /health` and the static fallback are added in
/// [`super::app`] and stay out of the document.
pub(crate) fn api_router() -> OpenApiRouter {
    let protected = OpenApiRouter::new()
        .routes(routes!(customer::customer_data))
        .route_layer(middleware::from_fn(auth::require_auth));

    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(auth::login::login))
        .routes(routes!(auth::session::logout))
        .merge(protected);

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Liveness".to_string());

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Login and logout".to_string());

    let mut customer_tag = Tag::new("customer");
    customer_tag.description = Some("Data for the signed-in customer".to_string());

    router.get_openapi_mut().tags = Some(vec![health_tag, auth_tag, customer_tag]);

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    let mut info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(optional_str(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    info.contact = cargo_contact();
    info.license = cargo_license();

    OpenApiBuilder::new().info(info).build()
}

fn cargo_contact() -> Option<Contact> {
    // Cargo authors are `;` separated and may include "Name <email>".
    let authors = env!("CARGO_PKG_AUTHORS");
    let primary = authors.split(';').next().map(str::trim)?;
    if primary.is_empty() {
        return None;
    }

    let (name, email) = parse_author(primary);
    if name.is_none() && email.is_none() {
        return None;
    }

    let mut contact = Contact::new();
    contact.name = name.map(str::to_string);
    contact.email = email.map(str::to_string);
    Some(contact)
}

fn cargo_license() -> Option<License> {
    let identifier = optional_str(env!("CARGO_PKG_LICENSE"))?;
    let mut license = License::new(identifier);
    license.identifier = Some(identifier.to_string());
    Some(license)
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn parse_author(author: &str) -> (Option<&str>, Option<&str>) {
    match author.split_once('<') {
        Some((name, email)) => {
            let name = name.trim();
            let email = email.trim_end_matches('>').trim();
            (
                (!name.is_empty()).then_some(name),
                (!email.is_empty()).then_some(email),
            )
        }
        None => {
            let name = author.trim();
            ((!name.is_empty()).then_some(name), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_info_from_cargo() {
        let spec = openapi();
        assert_eq!(spec.info.title, env!("CARGO_PKG_NAME"));
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));

        let contact = spec.info.contact;
        assert!(contact.is_some());
        if let Some(contact) = contact {
            assert_eq!(contact.name.as_deref(), Some("Team Bank Portal"));
            assert_eq!(contact.email.as_deref(), Some("team@bank-portal.dev"));
        }

        let license = spec.info.license;
        assert_eq!(license.map(|l| l.name), Some("BSD-3-Clause".to_string()));
    }

    #[test]
    fn openapi_documents_json_routes_only() {
        let spec = openapi();
        let paths = &spec.paths.paths;
        for path in ["/health", "/login", "/logout", "/api/customer-data"] {
            assert!(paths.contains_key(path), "missing {path}");
        }
        assert!(!paths.contains_key("/"));
        assert!(!paths.contains_key("/home"));

        let tags = spec.tags.unwrap_or_default();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
    }

    #[test]
    fn parse_author_variants() {
        assert_eq!(
            parse_author("Jane <jane@example.com>"),
            (Some("Jane"), Some("jane@example.com"))
        );
        assert_eq!(parse_author("Jane"), (Some("Jane"), None));
        assert_eq!(parse_author("<ops@example.com>"), (None, Some("ops@example.com")));
    }
}
