//! Navigation state, link interception and content swapping

use std::cell::Cell;
use std::rc::Rc;

use smol::channel::Sender;
use url::Url;
use vitrine_dom::{dispatch, Document, DomEvent, EventType, NodeId};

use crate::config::Config;
use crate::error::EngineError;
use crate::SharedDocument;

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Idle,
    Hiding,
    Fetching,
    Swapping,
    Binding,
    Showing,
}

/// What became of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pending,
    /// The page for `template` is now visible
    Completed { template: String },
    /// The previous page was restored
    Failed { reason: String },
    /// Arrived while another navigation was running
    Ignored,
    /// A later request was processed instead
    Superseded,
}

/// A link activation turned into a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    /// Absolute target URL
    pub url: String,
    /// Issuance order, starting at 1
    pub order: u64,
    pub outcome: Outcome,
}

impl NavigationRequest {
    pub fn ignored(url: &str) -> Self {
        Self {
            url: url.to_string(),
            order: 0,
            outcome: Outcome::Ignored,
        }
    }
}

/// Cloneable handle shared by link listeners and the orchestrator.
///
/// Holds no reference to the document, so listeners stored in the
/// document never keep it alive.
#[derive(Debug, Clone)]
pub struct NavigationHandle {
    state: Rc<Cell<NavState>>,
    issued: Rc<Cell<u64>>,
    queue: Sender<NavigationRequest>,
}

impl NavigationHandle {
    pub(crate) fn new(queue: Sender<NavigationRequest>) -> Self {
        Self {
            state: Rc::new(Cell::new(NavState::Idle)),
            issued: Rc::new(Cell::new(0)),
            queue,
        }
    }

    pub fn state(&self) -> NavState {
        self.state.get()
    }

    pub fn is_idle(&self) -> bool {
        self.state.get() == NavState::Idle
    }

    pub(crate) fn set_state(&self, state: NavState) {
        let previous = self.state.replace(state);
        tracing::trace!(?previous, ?state, "navigation state");
    }

    /// Number a new request, unless a navigation is already running
    pub fn issue(&self, url: &str) -> Option<NavigationRequest> {
        if !self.is_idle() {
            tracing::debug!(%url, state = ?self.state(), "navigation busy; request ignored");
            return None;
        }
        let order = self.issued.get() + 1;
        self.issued.set(order);
        Some(NavigationRequest {
            url: url.to_string(),
            order,
            outcome: Outcome::Pending,
        })
    }

    /// Issue a request and queue it for the orchestrator
    pub fn request(&self, url: &str) -> Option<NavigationRequest> {
        let request = self.issue(url)?;
        if self.queue.try_send(request.clone()).is_err() {
            tracing::warn!(%url, "navigation queue closed");
            return None;
        }
        Some(request)
    }

    /// Close the request queue. Requests already queued stay readable and
    /// later ones are dropped.
    pub fn close(&self) {
        if self.queue.close() {
            tracing::debug!("navigation queue closed");
        }
    }
}

/// Resolve `href` against the document URL; unparseable input is kept as-is
pub fn resolve_href(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

/// Route activation of every matching link with an `href` through `handle`.
///
/// Uses the `onclick` slot, so re-arming after a swap replaces rather than
/// stacks. Returns the number of armed links.
pub fn arm_links(document: &SharedDocument, handle: &NavigationHandle, selector: &str) -> usize {
    let mut doc = document.borrow_mut();
    let base = doc.url().to_string();
    let links = doc.query_selector_all(doc.root(), selector);

    let mut armed = 0;
    for link in links {
        let Some(href) = doc.get_attribute(link, "href") else {
            continue;
        };
        let url = resolve_href(&base, href);
        let handle = handle.clone();
        doc.set_event_handler(
            link,
            EventType::Click,
            Rc::new(move |event: &mut DomEvent| {
                event.prevent_default();
                handle.request(&url);
            }),
        );
        armed += 1;
    }

    tracing::debug!(links = armed, "links armed");
    armed
}

/// Dispatch a click on `target`. Returns `true` when the default action
/// would still run.
pub fn click(document: &SharedDocument, target: NodeId) -> bool {
    let path = document.borrow().event_path(EventType::Click, target);
    let mut event = DomEvent::click(target);
    dispatch(path, &mut event)
}

/// Content root and template extracted from a fetched page
#[derive(Debug)]
pub struct Fragment {
    pub document: Document,
    pub content: NodeId,
    pub template: String,
}

/// Parse a fetched page and locate its content root and template
pub fn extract_fragment(url: &str, html: &str, config: &Config) -> Result<Fragment, EngineError> {
    let document = vitrine_html::parse_with_url(html, url);
    let content = document.query_selector(document.root(), &config.content_selector)
        .ok_or_else(|| EngineError::MissingContentRoot(config.content_selector.clone()))?;
    let template = document.get_attribute(content, &config.template_attribute)
        .map(str::to_string)
        .ok_or_else(|| EngineError::MissingTemplate(config.template_attribute.clone()))?;

    Ok(Fragment {
        document,
        content,
        template,
    })
}

/// Replace the live content root's children and template attribute
pub fn swap_content(live: &mut Document, content: NodeId, fragment: &Fragment, template_attribute: &str) {
    live.clear_children(content);
    live.import_children(content, &fragment.document, fragment.content);
    live.set_attribute(content, template_attribute, &fragment.template);
}
