//! HTTP surface of the site
//!
//! # Routes
//!
//! - `GET /api/health` - JSON liveness and post count
//! - `POST /comments` - comment submission
//! - `POST /post-password` - unlock a protected post
//! - `GET` anything else - resolved to a listing, single post or not-found
//!
//! # Module Organization
//!
//! - `resolver` - Pure path/query to route mapping
//! - `handlers` - Page rendering and form handlers
//! - `access` - Cookie jars, signed author cookie and post password tokens
//! - `api` - Health endpoint
//! - `error` - `SiteError` and its HTTP mapping
//! - `state` - Shared handler state
//! - `server` - Listener and graceful shutdown

mod access;
mod api;
mod error;
mod handlers;
mod resolver;
mod server;
mod state;

pub use server::start_server;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the router with all site routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/comments", post(handlers::submit_comment))
        .route("/post-password", post(handlers::unlock_post))
        // Everything else goes through the template resolver
        .fallback(get(handlers::page))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::content::{ContentRepository, NewItem, SqliteRepository};

    fn post(slug: &str, day: u32) -> NewItem {
        NewItem {
            slug: slug.to_string(),
            title: format!("{} 리뷰", slug),
            published_at: Utc.with_ymd_and_hms(2025, 3, day, 3, 0, 0).unwrap(),
            body: format!("<p>{} 본문</p>", slug),
            comments_open: true,
            tags: vec![("sf".to_string(), "SF".to_string())],
            ..NewItem::default()
        }
    }

    fn app() -> (Router, Arc<SqliteRepository>) {
        let repo = Arc::new(SqliteRepository::in_memory().unwrap());
        repo.insert_item(&post("dune", 1)).unwrap();
        repo.insert_item(&post("arrival", 2)).unwrap();
        repo.insert_item(&NewItem {
            password: Some("open-sesame".to_string()),
            ..post("secret", 3)
        })
        .unwrap();

        let state = AppState::new(&Config::default(), repo.clone());
        (router(state), repo)
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        app.clone().oneshot(req).await.unwrap()
    }

    async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
        let mut req = Request::builder().uri(uri);
        if let Some(c) = cookie {
            req = req.header(header::COOKIE, c);
        }
        send(app, req.body(Body::empty()).unwrap()).await
    }

    async fn post_form(app: &Router, uri: &str, form: &str) -> Response {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        send(app, req).await
    }

    async fn body(res: Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header_str<'a>(res: &'a Response, name: header::HeaderName) -> Option<&'a str> {
        res.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_home_lists_posts() {
        let (app, _) = app();
        let res = get(&app, "/", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let html = body(res).await;
        assert!(html.contains("최신 포스트"));
        assert!(html.contains(r#"href="/posts/dune""#));
        assert!(html.contains(r#"href="/posts/arrival""#));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_index() {
        let (app, _) = app();
        for uri in ["/about", "/page/0", "/posts/missing", "/tag/nope"] {
            let res = get(&app, uri, None).await;
            assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", uri);
            let html = body(res).await;
            assert!(html.contains("아직 게시물이 없습니다."), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_empty_search_is_200() {
        let (app, _) = app();
        let res = get(&app, "/?s=%EC%9D%B8%ED%84%B0%EC%8A%A4%ED%85%94%EB%9D%BC", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let html = body(res).await;
        assert!(html.contains("검색 결과가 없습니다."));
        assert!(html.contains(r#"value="인터스텔라""#));
    }

    #[tokio::test]
    async fn test_archive_beyond_last_page_is_empty() {
        let (app, _) = app();
        let res = get(&app, "/tag/sf", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(body(res).await.contains("태그: SF"));

        let res = get(&app, "/tag/sf/page/9", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let html = body(res).await;
        assert!(html.contains("조건에 맞는 게시물이 없습니다."));
        assert!(!html.contains("nav-links"));
    }

    #[tokio::test]
    async fn test_comment_submission_flow() {
        let (app, repo) = app();
        let form = "author=%EB%AF%BC%EC%A7%80&email=min%40example.com&url=&comment=%EC%A2%8B%EC%95%84%EC%9A%94&comment_post_ID=1&comment_parent=0";
        let res = post_form(&app, "/comments", form).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = header_str(&res, header::LOCATION).unwrap().to_string();
        assert!(location.starts_with("/posts/dune#comment-"));
        let cookie = header_str(&res, header::SET_COOKIE).unwrap();
        assert!(cookie.starts_with("comment_author_email="));
        assert!(cookie.contains("Max-Age=31536000"));
        let pair = cookie.split(';').next().unwrap().to_string();

        // Pending: hidden from strangers, shown to its author
        let html = body(get(&app, "/posts/dune", None).await).await;
        assert!(!html.contains("좋아요"));
        let html = body(get(&app, "/posts/dune", Some(&pair)).await).await;
        assert!(html.contains("좋아요"));
        assert!(html.contains("승인 대기중"));
        // The heading counts approved comments only
        assert!(html.contains("댓글 0개"));

        // Knowing the email is not enough
        let forged = "comment_author_email=min%40example.com";
        let html = body(get(&app, "/posts/dune", Some(forged)).await).await;
        assert!(!html.contains("좋아요"));

        assert_eq!(repo.get_comments(1, None).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_comment_rerenders_with_errors() {
        let (app, repo) = app();
        let form = "author=&email=bad&url=&comment=hello&comment_post_ID=1&comment_parent=";
        let res = post_form(&app, "/comments", form).await;

        assert_eq!(res.status(), StatusCode::OK);
        let html = body(res).await;
        assert!(html.contains("필수 항목입니다."));
        assert!(html.contains("올바른 이메일 주소를 입력하세요."));
        assert!(html.contains(">hello</textarea>"));
        assert!(repo.get_comments(1, Some("bad")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_with_bad_post_id() {
        let (app, _) = app();
        let res = post_form(&app, "/comments", "author=a&comment_post_ID=abc").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = post_form(&app, "/comments", "author=a&comment_post_ID=999").await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_protected_post_flow() {
        let (app, repo) = app();

        let html = body(get(&app, "/posts/secret", None).await).await;
        assert!(html.contains("비밀번호로 보호되어 있습니다."));
        assert!(!html.contains("secret 본문"));
        assert!(!html.contains("comments-area"));

        // Comments on a locked post bounce back without being stored
        let form = "author=a&email=a%40b.co&comment=hi&comment_post_ID=3&comment_parent=0";
        let res = post_form(&app, "/comments", form).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(header_str(&res, header::LOCATION), Some("/posts/secret"));
        assert!(repo.get_comments(3, Some("a@b.co")).unwrap().is_empty());

        let res = post_form(&app, "/post-password", "post_password=wrong&redirect_to=%2Fposts%2Fsecret").await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert!(res.headers().get(header::SET_COOKIE).is_none());

        let res = post_form(&app, "/post-password", "post_password=open-sesame&redirect_to=%2Fposts%2Fsecret").await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let cookie = header_str(&res, header::SET_COOKIE).unwrap();
        let pair = cookie.split(';').next().unwrap().to_string();
        assert!(pair.starts_with("post_pass_3="));

        let html = body(get(&app, "/posts/secret", Some(&pair)).await).await;
        assert!(html.contains("secret 본문"));
        assert!(html.contains("comments-area"));
    }

    #[tokio::test]
    async fn test_password_form_needs_post_target() {
        let (app, _) = app();
        let res = post_form(&app, "/post-password", "post_password=x&redirect_to=%2Fabout").await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let res = get(&app, "/api/health", None).await;
        assert_eq!(res.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body(res).await).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["items"], 3);
    }
}
