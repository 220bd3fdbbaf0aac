use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

/// Paths crawlers should stay out of
const DISALLOWED_PATHS: &[&str] = &["/api/", "/admin/", "/login/", "/signup/"];

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "site",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub fn render_robots(site_url: &str) -> String {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    for path in DISALLOWED_PATHS {
        body.push_str("Disallow: ");
        body.push_str(path);
        body.push('\n');
    }
    body.push_str(&format!("\nSitemap: {}/sitemap.xml\n", site_url));
    body
}

/// Crawler rules
#[utoipa::path(
    get,
    path = "/robots.txt",
    tag = "site",
    responses(
        (status = 200, description = "robots.txt", content_type = "text/plain", body = String)
    )
)]
pub async fn robots_txt(State(site_url): State<Arc<String>>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        render_robots(&site_url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::site::routes;
    use axum_test::TestServer;

    #[test]
    fn test_robots_points_at_sitemap() {
        let robots = render_robots("https://crc-electrical.com");
        assert!(robots.starts_with("User-agent: *\nAllow: /\n"));
        assert!(robots.contains("Disallow: /api/\n"));
        assert!(robots.contains("Disallow: /signup/\n"));
        assert!(robots.ends_with("Sitemap: https://crc-electrical.com/sitemap.xml\n"));
    }

    #[tokio::test]
    async fn test_site_endpoints() {
        let server = TestServer::new(routes("https://crc-electrical.com".to_string())).unwrap();

        server.get("/health").await.assert_status_ok();

        let response = server.get("/robots.txt").await;
        response.assert_status_ok();
        assert_eq!(
            response.header("content-type"),
            "text/plain; charset=utf-8"
        );
        assert!(response.text().contains("Disallow: /admin/"));
    }
}
