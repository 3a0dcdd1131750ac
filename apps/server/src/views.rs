//! Request handlers and the HTML they render.
//!
//! The metadata page carries the machine-readable `go-import` meta tag;
//! everything else is a human-facing convenience.

use crate::state::AppState;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Response};
use vhub_registry::PackageRecord;

/// `go get` appends this to mark a tool-driven metadata fetch.
const TOOL_FETCH_PARAM: &str = "go-get=1";

/// `GET /`: lists every registered package path from one registry
/// snapshot.
pub(crate) async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let snapshot = state.registry.snapshot();

    // Sort for a stable listing; map order is arbitrary.
    let mut paths: Vec<&str> = snapshot.keys().map(String::as_str).collect();
    paths.sort_unstable();

    Html(index_page(request_host(&headers), &paths))
}

/// Any other path: longest-prefix lookup, then metadata page or doc
/// redirect.
pub(crate) async fn resolve(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let Some(record) = state.registry.lookup(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    // Browsers get sent to the documentation when the record names some;
    // tool fetches always receive the metadata page.
    if let Some(doc) = record.doc.as_deref()
        && !is_tool_fetch(&uri)
    {
        return (StatusCode::FOUND, [(header::LOCATION, doc.to_owned())]).into_response();
    }

    Html(package_page(request_host(&headers), &record)).into_response()
}

fn is_tool_fetch(uri: &Uri) -> bool {
    uri.query().is_some_and(|query| query.split('&').any(|param| param == TOOL_FETCH_PARAM))
}

fn request_host(headers: &HeaderMap) -> &str {
    headers.get(header::HOST).and_then(|value| value.to_str().ok()).unwrap_or("")
}

fn index_page(host: &str, paths: &[&str]) -> String {
    let mut items = String::new();
    for path in paths {
        items.push_str(&format!("\t\t\t<li><a href=\"{path}\">{host}{path}</a></li>\n"));
    }

    format!(
        "<html>\n\
         \t<head>\n\
         \t\t<title>VanityHub - Packages</title>\n\
         \t</head>\n\
         \t<body>\n\
         \t\t<h1>Available Packages</h1>\n\
         \t\t<ul>\n\
         {items}\
         \t\t</ul>\n\
         \t</body>\n\
         </html>\n"
    )
}

/// Renders the metadata page for the *registered* path, which may be a
/// prefix of what was requested.
fn package_page(host: &str, record: &PackageRecord) -> String {
    format!(
        "<html>\n\
         \t<head>\n\
         \t\t<meta name=\"go-import\" content=\"{host}{path} {vcs} {repo}\">\n\
         \t\t<title>VanityHub - {host}{path}</title>\n\
         \t</head>\n\
         \t<body>\n\
         \t\t<h1>{host}{path}</h1>\n\
         \t\t<span style=\"font-weight: bold\">VCS:</span> {vcs}<br>\n\
         \t\t<span style=\"font-weight: bold\">Repo-Root:</span> {repo}\n\
         \t</body>\n\
         </html>\n",
        path = record.path,
        vcs = record.vcs,
        repo = record.repo,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_fetch_flag_detection() {
        assert!(is_tool_fetch(&"/lib1?go-get=1".parse().unwrap()));
        assert!(is_tool_fetch(&"/lib1?foo=bar&go-get=1".parse().unwrap()));
        assert!(!is_tool_fetch(&"/lib1".parse().unwrap()));
        assert!(!is_tool_fetch(&"/lib1?go-get=0".parse().unwrap()));
    }

    #[test]
    fn package_page_displays_registered_prefix() {
        let record = PackageRecord {
            path: "/lib1".to_owned(),
            vcs: "git".to_owned(),
            repo: "ssh://git@bitbucket.org/user1/lib1".to_owned(),
            doc: None,
        };

        let page = package_page("example.com", &record);
        assert!(page.contains(
            "<meta name=\"go-import\" content=\"example.com/lib1 git ssh://git@bitbucket.org/user1/lib1\">"
        ));
        assert!(page.contains("<h1>example.com/lib1</h1>"));
    }

    #[test]
    fn index_page_links_every_path() {
        let page = index_page("example.com", &["/lib1", "/lib2"]);
        assert!(page.contains("<a href=\"/lib1\">example.com/lib1</a>"));
        assert!(page.contains("<a href=\"/lib2\">example.com/lib2</a>"));
    }
}
