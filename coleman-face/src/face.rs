//! # The Face Plugin
//!
//! [`ColemanFace`] is the facade the host drives through the
//! [`ColemanPlugin`] lifecycle:
//!
//! | stage | effect on the host |
//! |---|---|
//! | construction | page template compiled and published under `"sockets-tmpl"` |
//! | `init` | `register(face)` |
//! | `mount_static` | `add_static_path(<asset root>/public)` |
//! | `router` | `get("/ws", route_factory(host))` |
//! | `id` | none, returns `"coleman-face"` |
//!
//! Stages are not deduplicated here: calling one twice repeats the call on the
//! host, which is expected to reject the duplicate.
//!
//! A face may be built without a host. Construction still compiles the template,
//! and every stage that needs the host fails with
//! [`PluginError::HostUnavailable`] when it is called.
//!
//! A registered face is owned by its host, so the face only refers to the host
//! weakly. Once the host is dropped the face behaves as if no host were bound.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use coleman_shared::{
    ColemanHost, ColemanPlugin, PluginError, PluginResult, PluginStage, RequestHandler,
};
use tracing::{debug, info, warn};

use crate::error::{FaceError, FaceResult};
use crate::routes;
use crate::template::{self, CompiledTemplate, SOCKETS_TEMPLATE};

/// Identifier of this plugin among the host's plugins.
pub const FACE_ID: &str = "coleman-face";

/// Route the face page is served on.
pub const WS_ROUTE: &str = "/ws";

const TEMPLATE_FILE: &str = "views/index.html.tera";
const PUBLIC_DIR: &str = "public";

/// Produces the handler mounted on [`WS_ROUTE`], given the host.
pub type RouteFactory = Arc<dyn Fn(Arc<dyn ColemanHost>) -> RequestHandler + Send + Sync>;

/// Where the face finds its template and static assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceAssets {
    root: PathBuf,
}

impl FaceAssets {
    /// Assets shipped alongside this crate.
    pub fn bundled() -> Self {
        Self::at(env!("CARGO_MANIFEST_DIR"))
    }

    /// Assets under `root`, laid out as `views/index.html.tera` and `public/`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn template_path(&self) -> PathBuf {
        self.root.join(TEMPLATE_FILE)
    }

    /// Absolute path of the static asset directory.
    pub fn public_dir(&self) -> FaceResult<PathBuf> {
        let dir = self.root.join(PUBLIC_DIR);
        std::path::absolute(&dir).map_err(|e| FaceError::AssetPath {
            path: dir,
            source: e,
        })
    }
}

impl Default for FaceAssets {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Construction options for [`ColemanFace`].
#[derive(Clone)]
pub struct FaceOptions {
    assets: FaceAssets,
    route_factory: RouteFactory,
}

impl FaceOptions {
    pub fn with_assets(mut self, assets: FaceAssets) -> Self {
        self.assets = assets;
        self
    }

    /// Replace the collaborator producing the `/ws` handler.
    pub fn with_route_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(Arc<dyn ColemanHost>) -> RequestHandler + Send + Sync + 'static,
    {
        self.route_factory = Arc::new(factory);
        self
    }

    pub fn assets(&self) -> &FaceAssets {
        &self.assets
    }
}

impl Default for FaceOptions {
    fn default() -> Self {
        Self {
            assets: FaceAssets::bundled(),
            route_factory: Arc::new(routes::sockets_page),
        }
    }
}

impl fmt::Debug for FaceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceOptions")
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}

/// Build the face with bundled assets and the default `/ws` page handler.
pub fn face(host: Option<Arc<dyn ColemanHost>>) -> FaceResult<Arc<ColemanFace>> {
    ColemanFace::with_options(host, FaceOptions::default())
}

/// The face plugin.
pub struct ColemanFace {
    host: Option<Weak<dyn ColemanHost>>,
    template: Arc<CompiledTemplate>,
    public_dir: PathBuf,
    route_factory: RouteFactory,
}

impl ColemanFace {
    /// Compile the page template, publish it on the host and build the facade.
    ///
    /// Fails without touching the host when the template cannot be read or
    /// compiled. Every call compiles the template again.
    pub fn with_options(
        host: Option<Arc<dyn ColemanHost>>,
        options: FaceOptions,
    ) -> FaceResult<Arc<Self>> {
        let template = Arc::new(template::load_and_compile(&options.assets.template_path())?);
        let public_dir = options.assets.public_dir()?;

        match &host {
            Some(host) => {
                SOCKETS_TEMPLATE.publish(&**host, Arc::clone(&template));
                debug!(
                    plugin = FACE_ID,
                    key = SOCKETS_TEMPLATE.name(),
                    "Published page template"
                );
            }
            None => warn!(
                plugin = FACE_ID,
                "No host bound, page template kept on the plugin only"
            ),
        }

        Ok(Arc::new(Self {
            host: host.as_ref().map(Arc::downgrade),
            template,
            public_dir,
            route_factory: options.route_factory,
        }))
    }

    /// The compiled page template.
    pub fn template(&self) -> &Arc<CompiledTemplate> {
        &self.template
    }

    /// Absolute static asset directory handed to the host.
    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Whether the face is bound to a host that is still alive.
    pub fn has_host(&self) -> bool {
        self.host.as_ref().is_some_and(|host| host.strong_count() > 0)
    }

    fn host(&self, stage: PluginStage) -> PluginResult<Arc<dyn ColemanHost>> {
        self.host
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| PluginError::host_unavailable(FACE_ID, stage))
    }
}

impl ColemanPlugin for ColemanFace {
    fn init(self: Arc<Self>) -> PluginResult<()> {
        let host = self.host(PluginStage::Init)?;
        host.register(self)?;
        Ok(())
    }

    fn mount_static(&self) -> PluginResult<()> {
        let host = self.host(PluginStage::Static)?;
        host.add_static_path(&self.public_dir)?;
        info!(plugin = FACE_ID, path = ?self.public_dir, "Serving static assets");
        Ok(())
    }

    fn router(&self) -> PluginResult<()> {
        let host = self.host(PluginStage::Router)?;
        let handler = (self.route_factory)(Arc::clone(&host));
        host.get(WS_ROUTE, handler)?;
        info!(plugin = FACE_ID, route = WS_ROUTE, "Mounted page route");
        Ok(())
    }

    fn id(&self) -> &str {
        FACE_ID
    }
}

impl fmt::Debug for ColemanFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColemanFace")
            .field("id", &FACE_ID)
            .field("has_host", &self.has_host())
            .field("template", &self.template.name())
            .field("public_dir", &self.public_dir)
            .finish_non_exhaustive()
    }
}
