//! Navigation orchestrator
//!
//! Owns the live document, the page registry and the navigation state.
//! Link activations are queued by listeners and processed one at a time:
//!
//! ```text
//! Idle -> Hiding -> Fetching -> Swapping -> Binding -> Showing -> Idle
//! ```
//!
//! A fetch or parse failure before the swap restores the current page and
//! returns to `Idle`.

use std::rc::Rc;

use smol::channel::{self, Receiver};
use smol::Timer;
use vitrine_dom::NodeId;
use vitrine_net::{Fetcher, HttpFetcher, NetError, Response};

use crate::animation::Animator;
use crate::config::Config;
use crate::emitter::Emitter;
use crate::error::EngineError;
use crate::navigation::{self, Fragment, NavState, NavigationHandle, NavigationRequest, Outcome};
use crate::page::{PageController, PageRegistry};
use crate::preloader::{AssetLoader, Preloader};
use crate::SharedDocument;

/// Lifecycle notifications, in the order they happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Preloader finished and was removed
    Preloaded,
    /// The outgoing page finished hiding
    Hidden { template: String },
    Fetched { url: String, status: u16 },
    /// Content root now holds the new page
    Swapped { template: String },
    Bound { template: String },
    Showing { template: String },
    Shown { template: String },
    /// Navigation aborted; the previous page is visible again
    Failed { url: String, reason: String },
}

/// Storefront application
pub struct App<F> {
    config: Config,
    document: SharedDocument,
    fetcher: F,
    animator: Rc<dyn Animator>,
    pages: PageRegistry,
    content: NodeId,
    template: String,
    preloader: Option<Preloader>,
    handle: NavigationHandle,
    requests: Receiver<NavigationRequest>,
    events: Rc<Emitter<AppEvent>>,
}

impl App<HttpFetcher> {
    /// Create the application over HTTP, using `config.user_agent`
    pub fn over_http(config: Config, document: SharedDocument, animator: Rc<dyn Animator>) -> Result<Self, EngineError> {
        let fetcher = HttpFetcher::with_user_agent(&config.user_agent)?;
        Self::new(config, document, fetcher, animator)
    }
}

impl<F: Fetcher> App<F> {
    /// Create the application with the storefront page variants
    pub fn new(
        config: Config,
        document: SharedDocument,
        fetcher: F,
        animator: Rc<dyn Animator>,
    ) -> Result<Self, EngineError> {
        let pages = PageRegistry::storefront(&document.borrow(), &config);
        Self::with_pages(config, document, fetcher, animator, pages)
    }

    /// Create the application with a custom page registry.
    ///
    /// Fails when the document has no content root, the root carries no
    /// template, or no page is registered for that template.
    pub fn with_pages(
        config: Config,
        document: SharedDocument,
        fetcher: F,
        animator: Rc<dyn Animator>,
        pages: PageRegistry,
    ) -> Result<Self, EngineError> {
        let (content, template) = {
            let doc = document.borrow();
            let content = doc.query_selector(doc.root(), &config.content_selector)
                .ok_or_else(|| EngineError::MissingContentRoot(config.content_selector.clone()))?;
            let template = doc.get_attribute(content, &config.template_attribute)
                .map(str::to_string)
                .ok_or_else(|| EngineError::MissingTemplate(config.template_attribute.clone()))?;
            (content, template)
        };

        if !pages.contains(&template) {
            return Err(EngineError::UnknownTemplate(template));
        }

        let (tx, rx) = channel::unbounded();
        Ok(Self {
            config,
            document,
            fetcher,
            animator,
            pages,
            content,
            template,
            preloader: None,
            handle: NavigationHandle::new(tx),
            requests: rx,
            events: Rc::new(Emitter::new()),
        })
    }

    /// Bootstrap: start the preloader, bind and show the initial page, then
    /// intercept links.
    pub async fn start(&mut self, assets: &dyn AssetLoader) -> Result<(), EngineError> {
        tracing::info!(template = %self.template, "starting");
        self.create_preloader(assets);

        let page = self.pages.get_mut(&self.template)
            .ok_or_else(|| EngineError::UnknownTemplate(self.template.clone()))?;
        page.bind(&self.document);
        self.events.emit(&AppEvent::Bound { template: self.template.clone() });

        page.show(&*self.animator).wait().await;
        self.events.emit(&AppEvent::Shown { template: self.template.clone() });

        self.add_link_listeners();
        Ok(())
    }

    fn create_preloader(&mut self, assets: &dyn AssetLoader) {
        let preloader = Preloader::new(self.document.clone(), self.animator.clone(), &self.config.preloader);
        let events = self.events.clone();
        preloader.on_completed(move |preloader| {
            preloader.destroy();
            events.emit(&AppEvent::Preloaded);
        });
        preloader.create_loader(assets);
        self.preloader = Some(preloader);
    }

    fn add_link_listeners(&self) {
        navigation::arm_links(&self.document, &self.handle, &self.config.link_selector);
    }

    /// Navigate to `href` directly. Ignored while another navigation runs.
    pub async fn navigate(&mut self, href: &str) -> NavigationRequest {
        let url = navigation::resolve_href(self.document.borrow().url(), href);
        match self.handle.issue(&url) {
            Some(request) => self.execute(request).await,
            None => NavigationRequest::ignored(&url),
        }
    }

    /// Process requests queued by link clicks.
    ///
    /// Only the latest queued request runs; earlier ones are returned as
    /// superseded.
    pub async fn process_pending(&mut self) -> Vec<NavigationRequest> {
        let (mut handled, latest) = self.drain(None);
        if let Some(request) = latest {
            handled.push(self.execute(request).await);
        }
        handled
    }

    /// Process queued requests until [`NavigationHandle::close`] is called.
    ///
    /// Requests still queued at close are drained first, so this returns
    /// once the closed queue is empty.
    pub async fn run(&mut self) {
        while let Ok(first) = self.requests.recv().await {
            let (_, latest) = self.drain(Some(first));
            if let Some(request) = latest {
                self.execute(request).await;
            }
        }
    }

    fn drain(&self, first: Option<NavigationRequest>) -> (Vec<NavigationRequest>, Option<NavigationRequest>) {
        let mut superseded = Vec::new();
        let mut latest = first;
        while let Ok(next) = self.requests.try_recv() {
            if let Some(mut previous) = latest.replace(next) {
                tracing::debug!(url = %previous.url, order = previous.order, "request superseded");
                previous.outcome = Outcome::Superseded;
                superseded.push(previous);
            }
        }
        (superseded, latest)
    }

    async fn execute(&mut self, mut request: NavigationRequest) -> NavigationRequest {
        let url = request.url.clone();
        tracing::info!(%url, order = request.order, from = %self.template, "navigating");

        self.handle.set_state(NavState::Hiding);
        if let Some(page) = self.pages.get(&self.template) {
            page.hide(&*self.animator).wait().await;
        }
        self.events.emit(&AppEvent::Hidden { template: self.template.clone() });

        self.handle.set_state(NavState::Fetching);
        let fragment = match self.load(&url).await {
            Ok(fragment) => fragment,
            Err(error) => return self.recover(request, error).await,
        };

        {
            let mut doc = self.document.borrow_mut();
            navigation::swap_content(&mut doc, self.content, &fragment, &self.config.template_attribute);
        }
        self.template = fragment.template;
        self.events.emit(&AppEvent::Swapped { template: self.template.clone() });

        self.handle.set_state(NavState::Binding);
        if let Some(page) = self.pages.get_mut(&self.template) {
            page.bind(&self.document);
        }
        self.events.emit(&AppEvent::Bound { template: self.template.clone() });

        self.handle.set_state(NavState::Showing);
        self.events.emit(&AppEvent::Showing { template: self.template.clone() });
        if let Some(page) = self.pages.get(&self.template) {
            page.show(&*self.animator).wait().await;
        }
        self.events.emit(&AppEvent::Shown { template: self.template.clone() });

        self.add_link_listeners();
        self.handle.set_state(NavState::Idle);

        tracing::info!(%url, template = %self.template, "navigation complete");
        request.outcome = Outcome::Completed { template: self.template.clone() };
        request
    }

    /// Fetch and validate the next page without touching the live document
    async fn load(&self, url: &str) -> Result<Fragment, EngineError> {
        let response = self.fetch(url).await?;
        self.events.emit(&AppEvent::Fetched { url: url.to_string(), status: response.status });
        if !response.is_success() {
            return Err(EngineError::Status { url: url.to_string(), status: response.status });
        }
        let html = response.text()?;

        self.handle.set_state(NavState::Swapping);
        let fragment = navigation::extract_fragment(url, &html, &self.config)?;
        if !self.pages.contains(&fragment.template) {
            return Err(EngineError::UnknownTemplate(fragment.template));
        }
        Ok(fragment)
    }

    async fn fetch(&self, url: &str) -> Result<Response, NetError> {
        match self.config.fetch_timeout {
            None => self.fetcher.fetch(url).await,
            Some(limit) => {
                let timeout = async move {
                    Timer::after(limit).await;
                    Err(NetError::Timeout(limit))
                };
                smol::future::or(self.fetcher.fetch(url), timeout).await
            }
        }
    }

    async fn recover(&mut self, mut request: NavigationRequest, error: EngineError) -> NavigationRequest {
        tracing::warn!(url = %request.url, %error, "navigation failed; restoring current page");

        self.handle.set_state(NavState::Showing);
        if let Some(page) = self.pages.get(&self.template) {
            page.show(&*self.animator).wait().await;
        }
        self.handle.set_state(NavState::Idle);

        let reason = error.to_string();
        self.events.emit(&AppEvent::Failed { url: request.url.clone(), reason: reason.clone() });
        request.outcome = Outcome::Failed { reason };
        request
    }

    /// Dispatch a click on `target` through the live document
    pub fn click(&self, target: NodeId) -> bool {
        navigation::click(&self.document, target)
    }

    pub fn handle(&self) -> NavigationHandle {
        self.handle.clone()
    }

    pub fn events(&self) -> &Emitter<AppEvent> {
        &self.events
    }

    pub fn state(&self) -> NavState {
        self.handle.state()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn current_page(&self) -> Option<&dyn PageController> {
        self.pages.get(&self.template)
    }

    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn content(&self) -> NodeId {
        self.content
    }

    pub fn preloader(&self) -> Option<&Preloader> {
        self.preloader.as_ref()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
