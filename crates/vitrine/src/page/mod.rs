//! Page lifecycle
//!
//! Every page variant wraps a [`Page`]: a bound root element plus a small
//! state machine for its show/hide transitions.

mod about;
mod collections;
mod detail;
mod home;

pub use about::About;
pub use collections::Collections;
pub use detail::Detail;
pub use home::Home;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use vitrine_dom::{Document, NodeId};

use crate::animation::{deferred, Animator, Deferred, Resolver, Tween};
use crate::binder::{ElementBinder, ElementMap, ResolvedElements};
use crate::config::Config;
use crate::SharedDocument;

/// Page lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    /// Never bound to the document
    #[default]
    Unbound,
    /// Bound, not shown yet
    Bound,
    Visible,
    /// Hide requested or finished
    Hiding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Show,
    Hide,
}

struct Transition {
    direction: Direction,
    generation: u64,
    waiters: Vec<Resolver>,
}

#[derive(Default)]
struct Lifecycle {
    state: Cell<PageState>,
    generation: Cell<u64>,
    transition: RefCell<Option<Transition>>,
}

impl Lifecycle {
    /// Join an in-flight transition going the same way
    fn join(&self, direction: Direction) -> Option<Deferred> {
        let mut transition = self.transition.borrow_mut();
        let transition = transition.as_mut().filter(|t| t.direction == direction)?;
        let (resolver, deferred) = deferred();
        transition.waiters.push(resolver);
        Some(deferred)
    }

    /// Start a transition, resolving any superseded waiters
    fn begin(&self, direction: Direction) -> (u64, Deferred) {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);

        let (resolver, deferred) = deferred();
        let superseded = self.transition.replace(Some(Transition {
            direction,
            generation,
            waiters: vec![resolver],
        }));
        resolve_all(superseded);
        (generation, deferred)
    }

    /// Complete the transition started as `generation`, if still current
    fn finish(&self, generation: u64, state: PageState) {
        let finished = {
            let mut transition = self.transition.borrow_mut();
            if transition.as_ref().is_none_or(|t| t.generation != generation) {
                return;
            }
            transition.take()
        };
        self.state.set(state);
        resolve_all(finished);
    }

    /// Drop any in-flight transition
    fn reset(&self, state: PageState) {
        self.generation.set(self.generation.get() + 1);
        let pending = self.transition.take();
        self.state.set(state);
        resolve_all(pending);
    }
}

fn resolve_all(transition: Option<Transition>) {
    for waiter in transition.into_iter().flat_map(|t| t.waiters) {
        waiter.resolve();
    }
}

/// Base page: binding plus the show/hide state machine
pub struct Page {
    id: &'static str,
    binder: ElementBinder,
    element: Option<NodeId>,
    elements: ResolvedElements,
    lifecycle: Rc<Lifecycle>,
    show_tween: Tween,
    hide_tween: Tween,
}

impl Page {
    pub fn new(id: &'static str, root_selector: &str, elements: ElementMap, config: &Config) -> Self {
        Self {
            id,
            binder: ElementBinder::new(root_selector, elements),
            element: None,
            elements: ResolvedElements::default(),
            lifecycle: Rc::new(Lifecycle::default()),
            show_tween: Tween::from().set("autoAlpha", "0").duration(config.page_transition),
            hide_tween: Tween::to().set("autoAlpha", "0").duration(config.page_transition),
        }
    }

    /// Resolve the root and element map against the current content.
    ///
    /// Any transition still running against the old content is dropped.
    pub fn bind(&mut self, doc: &Document) {
        let binding = self.binder.bind(doc);
        if binding.root.is_none() {
            tracing::warn!(page = self.id, selector = self.binder.root_selector(), "page root not found");
        }
        self.element = binding.root;
        self.elements = binding.elements;
        self.lifecycle.reset(PageState::Bound);
    }

    /// Fade the page in. Resolves immediately when already visible or never
    /// bound; joins a show that is still running.
    pub fn show(&self, animator: &dyn Animator) -> Deferred {
        if let Some(joined) = self.lifecycle.join(Direction::Show) {
            return joined;
        }
        if self.in_rest(PageState::Visible) || self.in_rest(PageState::Unbound) {
            return Deferred::resolved();
        }
        tracing::debug!(page = self.id, "show");
        self.run(Direction::Show, animator, &self.show_tween, PageState::Visible)
    }

    /// Fade the page out. Resolves immediately when already hidden or never
    /// bound; joins a hide that is still running.
    pub fn hide(&self, animator: &dyn Animator) -> Deferred {
        if let Some(joined) = self.lifecycle.join(Direction::Hide) {
            return joined;
        }
        if self.in_rest(PageState::Hiding) || self.in_rest(PageState::Unbound) {
            return Deferred::resolved();
        }
        tracing::debug!(page = self.id, "hide");
        self.lifecycle.state.set(PageState::Hiding);
        self.run(Direction::Hide, animator, &self.hide_tween, PageState::Hiding)
    }

    fn in_rest(&self, state: PageState) -> bool {
        self.lifecycle.transition.borrow().is_none() && self.lifecycle.state.get() == state
    }

    fn run(&self, direction: Direction, animator: &dyn Animator, tween: &Tween, done: PageState) -> Deferred {
        let (generation, deferred) = self.lifecycle.begin(direction);
        let Some(element) = self.element else {
            self.lifecycle.finish(generation, done);
            return deferred;
        };

        let lifecycle = self.lifecycle.clone();
        animator.animate(&[element], tween, Box::new(move || lifecycle.finish(generation, done)));
        deferred
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn state(&self) -> PageState {
        self.lifecycle.state.get()
    }

    pub fn element(&self) -> Option<NodeId> {
        self.element
    }

    pub fn elements(&self) -> &ResolvedElements {
        &self.elements
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("element", &self.element)
            .finish()
    }
}

/// A page variant managed by the navigation orchestrator
pub trait PageController {
    fn page(&self) -> &Page;
    fn page_mut(&mut self) -> &mut Page;

    /// Bind to the current content root
    fn bind(&mut self, document: &SharedDocument) {
        self.page_mut().bind(&document.borrow());
    }

    fn show(&self, animator: &dyn Animator) -> Deferred {
        self.page().show(animator)
    }

    fn hide(&self, animator: &dyn Animator) -> Deferred {
        self.page().hide(animator)
    }

    fn id(&self) -> &str {
        self.page().id()
    }

    fn state(&self) -> PageState {
        self.page().state()
    }
}

/// Page variants keyed by template name
#[derive(Default)]
pub struct PageRegistry {
    pages: HashMap<String, Box<dyn PageController>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The storefront's four variants
    pub fn storefront(document: &Document, config: &Config) -> Self {
        Self::new()
            .with("home", Home::new(document, config))
            .with("about", About::new(config))
            .with("collections", Collections::new(config))
            .with("detail", Detail::new(config))
    }

    pub fn with(mut self, template: &str, page: impl PageController + 'static) -> Self {
        self.register(template, Box::new(page));
        self
    }

    pub fn register(&mut self, template: &str, page: Box<dyn PageController>) {
        self.pages.insert(template.to_string(), page);
    }

    pub fn get(&self, template: &str) -> Option<&dyn PageController> {
        self.pages.get(template).map(|page| &**page)
    }

    pub fn get_mut(&mut self, template: &str) -> Option<&mut (dyn PageController + 'static)> {
        self.pages.get_mut(template).map(|page| &mut **page)
    }

    pub fn contains(&self, template: &str) -> bool {
        self.pages.contains_key(template)
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl std::fmt::Debug for PageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.pages.keys()).finish()
    }
}
