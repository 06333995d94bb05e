//! # Reference Host
//!
//! [`ColemanApp`] is the smallest host that satisfies [`ColemanHost`]: it keeps
//! settings, registered plugins, static directories and GET routes, rejects
//! duplicates of each, and turns everything mounted into an `axum::Router`.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::Request;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use super::{ColemanHost, RequestHandler, SettingValue, SettingsRegistry};
use crate::errors::{HostError, HostResult, PluginResult};
use crate::plugin::{ColemanPlugin, PluginStage};

/// axum-backed Coleman host application.
#[derive(Debug, Default)]
pub struct ColemanApp {
    settings: SettingsRegistry,
    plugins: Mutex<Vec<Arc<dyn ColemanPlugin>>>,
    static_paths: Mutex<Vec<PathBuf>>,
    routes: Mutex<Vec<(String, RequestHandler)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validate `route` against the path syntax `axum::Router::route` accepts and
/// return its shape, with parameter names erased.
///
/// Captures must fill a whole segment (`{id}`), a wildcard (`{*rest}`) must be
/// the last segment, and names must be unique. Two routes with the same shape
/// conflict even when their parameter names differ.
fn route_shape(route: &str) -> HostResult<String> {
    let Some(path) = route.strip_prefix('/') else {
        return Err(HostError::invalid_route(route, "must start with '/'"));
    };

    let segments: Vec<&str> = path.split('/').collect();
    let mut names: Vec<&str> = Vec::new();
    let mut shape = String::new();

    for (index, segment) in segments.iter().enumerate() {
        shape.push('/');
        if segment.starts_with(':') || segment.starts_with('*') {
            return Err(HostError::invalid_route(
                route,
                "segments must not start with ':' or '*', use '{name}' captures",
            ));
        }

        if !segment.contains(|c: char| c == '{' || c == '}') {
            shape.push_str(segment);
            continue;
        }

        let Some(inner) = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            return Err(HostError::invalid_route(
                route,
                "a capture must fill the whole segment",
            ));
        };

        let (wildcard, name) = match inner.strip_prefix('*') {
            Some(name) => (true, name),
            None => (false, inner),
        };
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(HostError::invalid_route(
                route,
                format!("invalid capture name '{inner}'"),
            ));
        }
        if wildcard && index + 1 != segments.len() {
            return Err(HostError::invalid_route(
                route,
                "a wildcard capture must be the last segment",
            ));
        }
        if names.contains(&name) {
            return Err(HostError::invalid_route(
                route,
                format!("capture '{name}' appears twice"),
            ));
        }
        names.push(name);
        shape.push_str(if wildcard { "{*}" } else { "{}" });
    }

    Ok(shape)
}

impl ColemanApp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &SettingsRegistry {
        &self.settings
    }

    /// Drive a plugin through `init`, `static` and `router`, in that order.
    ///
    /// Stops at the first stage that fails.
    pub fn install(&self, plugin: Arc<dyn ColemanPlugin>) -> PluginResult<()> {
        let id = plugin.id().to_string();
        info!(plugin = %id, "Installing plugin");

        for stage in PluginStage::ORDER {
            debug!(plugin = %id, %stage, "Running plugin stage");
            match stage {
                PluginStage::Init => Arc::clone(&plugin).init()?,
                PluginStage::Static => plugin.mount_static()?,
                PluginStage::Router => plugin.router()?,
            }
        }

        info!(plugin = %id, "Plugin installed");
        Ok(())
    }

    /// Look up a registered plugin by id.
    pub fn plugin(&self, id: &str) -> Option<Arc<dyn ColemanPlugin>> {
        lock(&self.plugins)
            .iter()
            .find(|p| p.id() == id)
            .map(Arc::clone)
    }

    /// Ids of registered plugins, in registration order.
    pub fn plugin_ids(&self) -> Vec<String> {
        lock(&self.plugins)
            .iter()
            .map(|p| p.id().to_string())
            .collect()
    }

    /// Static directories, in mount order.
    pub fn static_paths(&self) -> Vec<PathBuf> {
        lock(&self.static_paths).clone()
    }

    /// Mounted GET route paths, in mount order.
    pub fn routes(&self) -> Vec<String> {
        lock(&self.routes)
            .iter()
            .map(|(route, _)| route.clone())
            .collect()
    }

    /// Build the HTTP router for everything mounted so far.
    ///
    /// Routes take precedence; any other request falls through the static
    /// directories in mount order and finally to a 404.
    pub fn router(&self) -> Router {
        let mut router = Router::new();
        for (route, handler) in lock(&self.routes).iter().cloned() {
            router = router.route(&route, get(move |request: Request| handler.call(request)));
        }

        let mut assets = Router::new();
        for dir in self.static_paths().iter().rev() {
            assets = Router::new().fallback_service(ServeDir::new(dir).fallback(assets));
        }

        router
            .fallback_service(assets)
            .layer(TraceLayer::new_for_http())
    }
}

impl ColemanHost for ColemanApp {
    fn set_setting(&self, key: &str, value: SettingValue) {
        self.settings.set(key, value);
    }

    fn setting(&self, key: &str) -> Option<SettingValue> {
        self.settings.get(key)
    }

    fn register(&self, plugin: Arc<dyn ColemanPlugin>) -> HostResult<()> {
        let mut plugins = lock(&self.plugins);
        let id = plugin.id();
        if plugins.iter().any(|p| p.id() == id) {
            return Err(HostError::DuplicatePlugin { id: id.to_string() });
        }

        info!(plugin = %id, "Registered plugin");
        plugins.push(plugin);
        Ok(())
    }

    fn add_static_path(&self, path: &Path) -> HostResult<()> {
        if !path.is_absolute() {
            return Err(HostError::RelativeStaticPath {
                path: path.to_path_buf(),
            });
        }

        let mut paths = lock(&self.static_paths);
        if paths.iter().any(|p| p == path) {
            return Err(HostError::DuplicateStaticPath {
                path: path.to_path_buf(),
            });
        }

        if !path.is_dir() {
            warn!(?path, "Static path is not a directory, requests will fall through");
        }
        info!(?path, "Mounted static path");
        paths.push(path.to_path_buf());
        Ok(())
    }

    fn get(&self, route: &str, handler: RequestHandler) -> HostResult<()> {
        let shape = route_shape(route)?;

        let mut routes = lock(&self.routes);
        if routes
            .iter()
            .any(|(r, _)| r == route || route_shape(r).is_ok_and(|s| s == shape))
        {
            return Err(HostError::DuplicateRoute {
                route: route.to_string(),
            });
        }

        info!(route, "Mounted GET route");
        routes.push((route.to_string(), handler));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PluginError;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request as HttpRequest, StatusCode};
    use std::fs;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct Named(&'static str);

    impl ColemanPlugin for Named {
        fn init(self: Arc<Self>) -> PluginResult<()> {
            Ok(())
        }
        fn mount_static(&self) -> PluginResult<()> {
            Ok(())
        }
        fn router(&self) -> PluginResult<()> {
            Ok(())
        }
        fn id(&self) -> &str {
            self.0
        }
    }

    /// Plugin that mounts a fixed route and directory on its host.
    #[derive(Debug)]
    struct Mounting {
        host: Arc<ColemanApp>,
        dir: PathBuf,
    }

    impl ColemanPlugin for Mounting {
        fn init(self: Arc<Self>) -> PluginResult<()> {
            let host = Arc::clone(&self.host);
            host.register(self)?;
            Ok(())
        }
        fn mount_static(&self) -> PluginResult<()> {
            Ok(self.host.add_static_path(&self.dir)?)
        }
        fn router(&self) -> PluginResult<()> {
            let handler = RequestHandler::new(|_request: Request| async { "pong" });
            Ok(self.host.get("/ping", handler)?)
        }
        fn id(&self) -> &str {
            "mounting"
        }
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let app = ColemanApp::new();
        app.register(Arc::new(Named("a"))).unwrap();
        app.register(Arc::new(Named("b"))).unwrap();

        let err = app.register(Arc::new(Named("a"))).unwrap_err();
        assert!(matches!(err, HostError::DuplicatePlugin { ref id } if id == "a"));
        assert_eq!(app.plugin_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_plugin_lookup() {
        let app = ColemanApp::new();
        app.register(Arc::new(Named("face"))).unwrap();
        assert_eq!(app.plugin("face").unwrap().id(), "face");
        assert!(app.plugin("missing").is_none());
    }

    #[test]
    fn test_static_path_must_be_absolute() {
        let app = ColemanApp::new();
        let err = app.add_static_path(Path::new("public")).unwrap_err();
        assert!(matches!(err, HostError::RelativeStaticPath { .. }));
        assert!(app.static_paths().is_empty());
    }

    #[test]
    fn test_static_path_rejects_duplicate() {
        let dir = tempfile::tempdir().unwrap();
        let app = ColemanApp::new();
        app.add_static_path(dir.path()).unwrap();

        let err = app.add_static_path(dir.path()).unwrap_err();
        assert!(matches!(err, HostError::DuplicateStaticPath { .. }));
        assert_eq!(app.static_paths(), vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_get_rejects_duplicate_and_invalid_routes() {
        let app = ColemanApp::new();
        let handler = RequestHandler::new(|_request: Request| async { "" });
        app.get("/ws", handler.clone()).unwrap();

        assert!(matches!(
            app.get("/ws", handler.clone()).unwrap_err(),
            HostError::DuplicateRoute { .. }
        ));
        assert!(matches!(
            app.get("ws", handler).unwrap_err(),
            HostError::InvalidRoute { .. }
        ));
        assert_eq!(app.routes(), vec!["/ws"]);
    }

    #[test]
    fn test_get_rejects_paths_the_router_cannot_mount() {
        let app = ColemanApp::new();
        let handler = RequestHandler::new(|_request: Request| async { "" });

        for route in [
            "/a/{",
            "/a/}",
            "/a/{}",
            "/a/x{id}",
            "/a/{*rest}/b",
            "/a/{id}/{id}",
            "/a/:id",
            "/a/*rest",
            "/a/{bad-name}",
        ] {
            let err = app.get(route, handler.clone()).unwrap_err();
            assert!(
                matches!(err, HostError::InvalidRoute { .. }),
                "{route} should be rejected, got {err:?}"
            );
        }
        assert!(app.routes().is_empty());
        // Every accepted route must still build a router
        let _router = app.router();
    }

    #[test]
    fn test_get_accepts_captures() {
        let app = ColemanApp::new();
        let handler = RequestHandler::new(|_request: Request| async { "" });

        app.get("/", handler.clone()).unwrap();
        app.get("/users/{id}", handler.clone()).unwrap();
        app.get("/files/{*path}", handler.clone()).unwrap();
        assert_eq!(app.routes(), vec!["/", "/users/{id}", "/files/{*path}"]);

        let _router = app.router();
    }

    #[test]
    fn test_get_rejects_conflicting_capture_names() {
        let app = ColemanApp::new();
        let handler = RequestHandler::new(|_request: Request| async { "" });
        app.get("/users/{id}", handler.clone()).unwrap();

        let err = app.get("/users/{name}", handler).unwrap_err();
        assert!(matches!(err, HostError::DuplicateRoute { .. }));
        assert_eq!(app.routes(), vec!["/users/{id}"]);
    }

    #[test]
    fn test_install_runs_every_stage() {
        let dir = tempfile::tempdir().unwrap();
        let app = Arc::new(ColemanApp::new());
        let plugin = Arc::new(Mounting {
            host: Arc::clone(&app),
            dir: dir.path().to_path_buf(),
        });

        app.install(plugin).unwrap();

        assert_eq!(app.plugin_ids(), vec!["mounting"]);
        assert_eq!(app.static_paths(), vec![dir.path().to_path_buf()]);
        assert_eq!(app.routes(), vec!["/ping"]);
    }

    #[test]
    fn test_install_twice_is_rejected_by_host() {
        let dir = tempfile::tempdir().unwrap();
        let app = Arc::new(ColemanApp::new());
        let plugin = Arc::new(Mounting {
            host: Arc::clone(&app),
            dir: dir.path().to_path_buf(),
        });

        app.install(plugin.clone()).unwrap();
        let err = app.install(plugin).unwrap_err();
        assert!(matches!(
            err,
            PluginError::Host(HostError::DuplicatePlugin { .. })
        ));
    }

    #[tokio::test]
    async fn test_router_serves_routes_and_static_files() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(first.path().join("a.txt"), "from first").unwrap();
        fs::write(second.path().join("a.txt"), "shadowed").unwrap();
        fs::write(second.path().join("b.txt"), "from second").unwrap();

        let app = ColemanApp::new();
        app.get(
            "/ping",
            RequestHandler::new(|_request: Request| async { "pong" }),
        )
        .unwrap();
        app.add_static_path(first.path()).unwrap();
        app.add_static_path(second.path()).unwrap();
        let router = app.router();

        let response = router
            .clone()
            .oneshot(HttpRequest::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "pong");

        let response = router
            .clone()
            .oneshot(HttpRequest::get("/a.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "from first");

        let response = router
            .clone()
            .oneshot(HttpRequest::get("/b.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_text(response).await, "from second");

        let response = router
            .oneshot(HttpRequest::get("/missing.txt").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
