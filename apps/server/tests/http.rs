use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use vhub_kernel::config::AppConfig;
use vhub_registry::PackageRegistry;
use vhub_server::router;
use vhub_server::state::AppState;

const LIST: &str = "/lib1 git ssh://git@bitbucket.org/user1/lib1\n\
                    /lib2 hg ssh://hg@bitbucket.org/user2/lib2\n\
                    \n\
                    /lib3 git ssh://git@go.mydomain.com/lib3 http://godoc.mydomain.com/lib3\n";

fn test_router(dir: &TempDir) -> Router {
    let path = dir.path().join("packages.txt");
    fs::write(&path, LIST).unwrap();
    let registry = Arc::new(PackageRegistry::load(&path).unwrap());
    router::init(AppState::new(AppConfig::default(), registry))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .uri(uri)
        .header(header::HOST, "example.com")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, location, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn index_lists_all_packages_with_host() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(test_router(&dir), "/").await;

    assert_eq!(status, StatusCode::OK);
    for path in ["/lib1", "/lib2", "/lib3"] {
        assert!(
            body.contains(&format!("<a href=\"{path}\">example.com{path}</a>")),
            "index is missing {path}: {body}"
        );
    }
}

#[tokio::test]
async fn tool_fetch_returns_import_metadata() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(test_router(&dir), "/lib1?go-get=1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(
        "<meta name=\"go-import\" content=\"example.com/lib1 git ssh://git@bitbucket.org/user1/lib1\">"
    ));
}

#[tokio::test]
async fn subpath_resolves_to_registered_prefix() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(test_router(&dir), "/lib1/subdir?go-get=1").await;

    assert_eq!(status, StatusCode::OK);
    // The displayed path is the registered prefix, not the request path.
    assert!(body.contains(
        "<meta name=\"go-import\" content=\"example.com/lib1 git ssh://git@bitbucket.org/user1/lib1\">"
    ));
    assert!(!body.contains("subdir"));
}

#[tokio::test]
async fn deep_subpath_resolves_like_the_root() {
    let dir = TempDir::new().unwrap();
    let (status, _, body) = get(test_router(&dir), "/lib2/sub/dir/deeper?go-get=1").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(
        "<meta name=\"go-import\" content=\"example.com/lib2 hg ssh://hg@bitbucket.org/user2/lib2\">"
    ));
}

#[tokio::test]
async fn plain_navigation_redirects_to_doc() {
    let dir = TempDir::new().unwrap();
    let (status, location, _) = get(test_router(&dir), "/lib3").await;

    assert_eq!(status, StatusCode::FOUND);
    assert_eq!(location.as_deref(), Some("http://godoc.mydomain.com/lib3"));
}

#[tokio::test]
async fn tool_fetch_wins_over_doc_redirect() {
    let dir = TempDir::new().unwrap();
    let (status, location, body) = get(test_router(&dir), "/lib3?go-get=1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(location, None);
    assert!(body.contains(
        "<meta name=\"go-import\" content=\"example.com/lib3 git ssh://git@go.mydomain.com/lib3\">"
    ));
}

#[tokio::test]
async fn record_without_doc_always_renders_metadata() {
    let dir = TempDir::new().unwrap();
    let (status, location, body) = get(test_router(&dir), "/lib1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(location, None);
    assert!(body.contains("go-import"));
}

#[tokio::test]
async fn unregistered_path_is_not_found() {
    let dir = TempDir::new().unwrap();
    let (status, _, _) = get(test_router(&dir), "/unregistered").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let dir = TempDir::new().unwrap();
    let (status, _, _) = get(test_router(&dir), "/unregistered/sub/dir").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
