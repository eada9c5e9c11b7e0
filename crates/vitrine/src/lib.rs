//! Vitrine
//!
//! Browser-side engine for a server-templated storefront.
//!
//! - [`binder`] resolves declarative element maps into node references
//! - [`page`] gives every page a bind/show/hide lifecycle
//! - [`app`] intercepts links and swaps the content root without a reload
//! - [`preload`] counts asset loads and signals completion once
//! - [`text`] splits rich text into animatable word spans
//!
//! # Example
//! ```rust,ignore
//! use std::{cell::RefCell, rc::Rc};
//! use vitrine::{App, Config, ImmediateAnimator};
//!
//! vitrine::logging::init();
//! let document = Rc::new(RefCell::new(vitrine_html::parse_with_url(html, url)));
//! let mut app = App::over_http(Config::default(), document, Rc::new(ImmediateAnimator))?;
//! smol::block_on(async {
//!     app.start(&assets).await?;
//!     app.run().await;
//! });
//! ```

pub mod animation;
pub mod app;
pub mod binder;
pub mod component;
pub mod config;
pub mod emitter;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod page;
pub mod preload;
pub mod preloader;
pub mod text;

use std::cell::RefCell;
use std::rc::Rc;

pub use animation::{deferred, Animator, Deferred, ImmediateAnimator, Resolver, TimedAnimator, Tween, TweenKind};
pub use app::{App, AppEvent};
pub use binder::{Binding, ElementBinder, ElementMap, ElementSelector, Resolved, ResolvedElements};
pub use component::Component;
pub use config::{Config, PreloaderConfig};
pub use emitter::{Emitter, ListenerId};
pub use error::EngineError;
pub use navigation::{NavState, NavigationHandle, NavigationRequest, Outcome};
pub use page::{Page, PageController, PageRegistry, PageState};
pub use preload::{PreloadTracker, Progress};
pub use preloader::{AssetLoader, Preloader, PreloaderEvent, SpawnAssetLoader};
pub use text::{group_by_line, segment, split, Delimiter, LineMetrics, SplitOptions, TextToken};

pub use vitrine_dom as dom;
pub use vitrine_html as html;
pub use vitrine_net as net;

/// The live document, shared between the orchestrator, pages and callbacks
pub type SharedDocument = Rc<RefCell<vitrine_dom::Document>>;

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
