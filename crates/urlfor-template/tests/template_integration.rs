//! Integration tests for rendering URL helpers through Tera.
//!
//! Tests cover:
//! 1. A layout rendered against the URI of an incoming `http::Request`
//! 2. Rebinding the base reference between renders
//! 3. Errors surfaced through `UrlExtension::render`
//! 4. An extension configured from TOML settings

use std::sync::Arc;

use tera::{Context, Tera};

use urlfor_core::{settings_loader, UrlError};
use urlfor_http::{RouteTable, Uri};
use urlfor_template::{UrlComposer, UrlExtension};

const LAYOUT: &str = r#"<a href="{{ path_for(name="index") }}">Home</a>
<a href="{{ full_url_for(name="post", data=post) }}">Permalink</a>
{% set on_post = is_current_path(name="post", data=post) %}{% if on_post %}<span>current</span>{% endif %}
<base href="{{ base_url() }}">
<link rel="canonical" href="{{ current_path(with_query_string=true) }}">"#;

fn blog_routes() -> Arc<RouteTable> {
    let routes = RouteTable::new()
        .with_base_path("/blog")
        .with_route("index", "/")
        .and_then(|t| t.with_route("post", "/{year:[0-9]{4}}/{slug}"))
        .and_then(|t| t.with_route("tag", "/tags/{tag}[/{page:[0-9]+}]"))
        .unwrap();
    Arc::new(routes)
}

fn request(path: &str) -> http::Request<()> {
    http::Request::builder()
        .uri(path)
        .header(http::header::HOST, "example.com")
        .header("x-forwarded-proto", "https")
        .body(())
        .unwrap()
}

fn setup() -> (Tera, UrlExtension) {
    let extension = UrlExtension::new(UrlComposer::new(blog_routes(), Uri::default(), "/blog"));
    let mut tera = Tera::default();
    extension.register(&mut tera);
    tera.add_raw_template("layout", LAYOUT).unwrap();
    tera.add_raw_template("tag_link", r#"{{ path_for(name="tag", data=tag) }}"#)
        .unwrap();
    (tera, extension)
}

fn post_context(year: u32, slug: &str) -> Context {
    let mut context = Context::new();
    context.insert("post", &serde_json::json!({"year": year, "slug": slug}));
    context
}

// ============================================================================
// 1. Rendering against a request
// ============================================================================

#[test]
fn test_layout_for_request() {
    let (tera, extension) = setup();
    extension.set_base_url(Uri::from_request(&request("/2024/hello?ref=feed")));

    let html = extension
        .render(&tera, "layout", &post_context(2024, "hello"))
        .unwrap();

    assert_eq!(
        html,
        r#"<a href="/blog/">Home</a>
<a href="https://example.com/blog/2024/hello">Permalink</a>
<span>current</span>
<base href="https://example.com/blog">
<link rel="canonical" href="/blog/2024/hello?ref=feed">"#
    );
}

#[test]
fn test_layout_for_other_page() {
    let (tera, extension) = setup();
    extension.set_base_url(Uri::from_request(&request("/")));

    let html = extension
        .render(&tera, "layout", &post_context(2023, "older"))
        .unwrap();

    assert!(html.contains(r#"href="https://example.com/blog/2023/older""#));
    assert!(!html.contains("<span>current</span>"));
    assert!(html.contains(r#"<link rel="canonical" href="/blog/">"#));
}

#[test]
fn test_optional_segments_from_template_data() {
    let (tera, extension) = setup();

    let mut context = Context::new();
    context.insert("tag", &serde_json::json!({"tag": "rust"}));
    assert_eq!(
        extension.render(&tera, "tag_link", &context).unwrap(),
        "/blog/tags/rust"
    );

    context.insert("tag", &serde_json::json!({"tag": "rust", "page": 3}));
    assert_eq!(
        extension.render(&tera, "tag_link", &context).unwrap(),
        "/blog/tags/rust/3"
    );
}

// ============================================================================
// 2. Rebinding the base reference
// ============================================================================

#[test]
fn test_rebinding_between_renders() {
    let (mut tera, extension) = setup();
    let source = "{{ base_url() }} {{ current_path() }}";
    tera.add_raw_template("bases", source).unwrap();

    extension.set_base_url(Uri::from_request(&request("/first")));
    assert_eq!(
        extension.render(&tera, "bases", &Context::new()).unwrap(),
        "https://example.com/blog /blog/first"
    );

    extension.set_base_url(
        Uri::new("http", "localhost")
            .with_port(Some(8080))
            .with_path("/second"),
    );
    assert_eq!(
        extension.render(&tera, "bases", &Context::new()).unwrap(),
        "http://localhost:8080/blog /blog/second"
    );

    extension.set_base_url("https://cdn.example.com");
    assert_eq!(
        extension.render(&tera, "bases", &Context::new()).unwrap(),
        "https://cdn.example.com https://cdn.example.com"
    );
}

#[test]
fn test_composer_handle_shares_state() {
    let (tera, extension) = setup();
    let composer = extension.composer();
    composer
        .write()
        .unwrap()
        .set_base_url(Uri::from_request(&request("/2024/hello")));

    let html = extension
        .render(&tera, "layout", &post_context(2024, "hello"))
        .unwrap();
    assert!(html.contains("<span>current</span>"));
}

// ============================================================================
// 3. Errors
// ============================================================================

#[test]
fn test_missing_route_data() {
    let (tera, extension) = setup();
    let mut context = Context::new();
    context.insert("post", &serde_json::json!({"year": 2024}));

    let err = extension.render(&tera, "layout", &context).unwrap_err();
    assert!(matches!(err, UrlError::TemplateError(_)));
    assert!(err
        .to_string()
        .contains("Missing data for URL segment: slug"));
}

#[test]
fn test_is_current_path_with_literal_base() {
    let (tera, extension) = setup();
    extension.set_base_url("https://example.com");

    let err = extension
        .render(&tera, "layout", &post_context(2024, "hello"))
        .unwrap_err();
    assert!(err.to_string().contains("is_current_path requires a structured URI"));
}

// ============================================================================
// 4. Settings
// ============================================================================

#[test]
fn test_extension_from_toml_settings() {
    let settings = settings_loader::from_toml_str(
        r#"
        base_path = "/blog"
        base_url = "https://example.com"
        app_name = "blog"
        "#,
    )
    .unwrap();

    let extension = UrlExtension::from_settings(blog_routes(), &settings);
    assert_eq!(extension.app_name(), "blog");

    let mut context = Context::new();
    context.insert("post", &serde_json::json!({"year": 2024, "slug": "hello"}));
    let html = extension
        .render_str(
            r#"{{ base_url() }}|{{ full_url_for(name="post", data=post, app_name="other") }}"#,
            &context,
        )
        .unwrap();
    assert_eq!(html, "https://example.com|https://example.com/blog/2024/hello");
}
