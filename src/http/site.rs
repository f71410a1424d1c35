//! Site-level routes: robots.txt, health, outbound product links.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::affiliate::LinkKind;
use crate::config::SiteConfig;
use crate::http::state::AppState;

/// Render robots.txt for the deployment.
pub fn render_robots(site: &SiteConfig) -> String {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    for prefix in &site.disallow {
        body.push_str("Disallow: ");
        body.push_str(prefix);
        body.push('\n');
    }
    body.push_str(&format!(
        "\nSitemap: {}/sitemap.xml\n",
        site.base_url.trim_end_matches('/')
    ));
    body
}

/// `GET /robots.txt`
pub async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&state.config.site),
    )
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct OutboundQuery {
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Whether a tagged product link may be served as a redirect: plain
/// http(s) with "amazon." in the host, not just anywhere in the URL.
pub fn is_redirectable(link: &str) -> bool {
    match Url::parse(link) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|host| host.contains("amazon."))
        }
        Err(_) => false,
    }
}

/// `GET /go?url=…&title=…`: redirect to the affiliate link.
///
/// Product links that fail [`is_redirectable`] are replaced by the search
/// link for the title, so the route always redirects somewhere on Amazon.
pub async fn outbound_link(
    State(state): State<AppState>,
    Query(query): Query<OutboundQuery>,
) -> Redirect {
    let (link, kind) = state
        .affiliate
        .rewrite_with_kind(query.url.as_deref(), query.title.as_deref());

    let target = if kind == LinkKind::Search || is_redirectable(&link) {
        link
    } else {
        tracing::warn!(url = %link, "Refusing outbound redirect, using search link");
        state.affiliate.search_link(query.title.as_deref())
    };
    Redirect::temporary(&target)
}
