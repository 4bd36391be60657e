//! Where to send a client before and after logging in.

use axum::{extract::Request, http::Uri};

use crate::{endpoints, user::User};

/// A redirect target must be a local path that does not loop back to the log-in page.
fn is_local_path(target: &str) -> bool {
    if !target.starts_with('/') || target.starts_with("//") {
        return false;
    }

    let path = target.split_once('?').map_or(target, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && !path.starts_with("/api")
}

/// Accept `raw_url` as a post log-in redirect target only if it is a local page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let target = uri.path_and_query()?.as_str();

    is_local_path(target).then(|| target.to_owned())
}

/// The page a user lands on after logging in when no redirect was requested.
pub fn home_page(user: &User) -> &'static str {
    if user.is_master() {
        endpoints::MASTER_VIEW
    } else {
        endpoints::DASHBOARD_VIEW
    }
}

/// The log-in page URL, remembering the page the client was trying to reach.
///
/// Page requests return to their own URL. HTMX requests to the API return to
/// the page they were sent from, taken from the `HX-Current-URL` header.
pub fn log_in_redirect_url(request: &Request) -> String {
    let target = if request.uri().path().starts_with("/api") {
        request
            .headers()
            .get("hx-current-url")
            .and_then(|header| header.to_str().ok())
            .and_then(|current_url| current_url.parse::<Uri>().ok())
            .and_then(|uri| uri.path_and_query().map(|target| target.as_str().to_owned()))
            .filter(|target| is_local_path(target))
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|target| normalize_redirect_url(target.as_str()))
    };

    match target {
        Some(target) => log_in_url_with_target(&target),
        None => {
            tracing::debug!(
                "no redirect target for {}, sending client to the log-in page",
                request.uri()
            );
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

fn log_in_url_with_target(target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", target)]) {
        Ok(query) => format!("{}?{}", endpoints::LOG_IN_VIEW, query),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}
