//! # coleman-face
//!
//! The public face of Coleman. A plugin that gives the Coleman host one page
//! template, one GET route (`/ws`) and one static asset directory.
//!
//! Construct it with [`face`] (bundled assets, default route) or
//! [`ColemanFace::with_options`], then hand it to the host, which drives the
//! [`ColemanPlugin`](coleman_shared::ColemanPlugin) lifecycle:
//!
//! ```no_run
//! use std::sync::Arc;
//! use coleman_shared::{ColemanApp, ColemanHost};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let app = Arc::new(ColemanApp::new());
//! let host: Arc<dyn ColemanHost> = app.clone();
//! let face = coleman_face::face(Some(host))?;
//! app.install(face)?;
//! let router = app.router();
//! # drop(router);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod face;
pub mod routes;
pub mod template;

pub use error::{FaceError, FaceResult};
pub use face::{face, ColemanFace, FaceAssets, FaceOptions, RouteFactory, FACE_ID, WS_ROUTE};
pub use template::{load_and_compile, CompiledTemplate, TemplateError, SOCKETS_TEMPLATE};
