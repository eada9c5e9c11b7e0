use crate::binder::ElementMap;
use crate::config::Config;
use crate::page::{Page, PageController};

/// Collection listing
#[derive(Debug)]
pub struct Collections {
    page: Page,
}

impl Collections {
    pub fn new(config: &Config) -> Self {
        let elements = ElementMap::new()
            .with("titles", ".collections__titles")
            .with("gallery", ".collections__gallery")
            .with("items", ".collections__gallery__link");

        Self {
            page: Page::new("collections", ".collections", elements, config),
        }
    }
}

impl PageController for Collections {
    fn page(&self) -> &Page {
        &self.page
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }
}
