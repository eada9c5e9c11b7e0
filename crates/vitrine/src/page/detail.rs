use crate::binder::ElementMap;
use crate::config::Config;
use crate::page::{Page, PageController};

/// Single product page
#[derive(Debug)]
pub struct Detail {
    page: Page,
}

impl Detail {
    pub fn new(config: &Config) -> Self {
        let elements = ElementMap::new()
            .with("title", ".detail__title")
            .with("media", ".detail__media")
            .with("button", ".detail__button");

        Self {
            page: Page::new("detail", ".detail", elements, config),
        }
    }
}

impl PageController for Detail {
    fn page(&self) -> &Page {
        &self.page
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }
}
