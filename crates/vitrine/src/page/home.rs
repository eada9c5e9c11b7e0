use std::rc::Rc;

use vitrine_dom::{Document, DomEvent, EventType};

use crate::binder::{ElementMap, ElementSelector};
use crate::config::Config;
use crate::page::{Page, PageController};
use crate::SharedDocument;

/// Landing page. The site navigation sits outside the content root, so it
/// is resolved once against the whole document.
#[derive(Debug)]
pub struct Home {
    page: Page,
}

impl Home {
    pub fn new(document: &Document, config: &Config) -> Self {
        let navigation = match document.query_selector(document.root(), ".navigation") {
            Some(node) => ElementSelector::Single(node),
            None => ElementSelector::Many(Vec::new()),
        };

        let elements = ElementMap::new()
            .with("button", ".home__link")
            .with("navigation", navigation);

        Self {
            page: Page::new("home", ".home", elements, config),
        }
    }
}

impl PageController for Home {
    fn page(&self) -> &Page {
        &self.page
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    fn bind(&mut self, document: &SharedDocument) {
        self.page.bind(&document.borrow());

        let mut doc = document.borrow_mut();
        for button in self.page.elements().all("button") {
            doc.add_event_listener(
                button,
                EventType::Click,
                Rc::new(|_: &mut DomEvent| tracing::info!(page = "home", "home link clicked")),
            );
        }
    }
}
