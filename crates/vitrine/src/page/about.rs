use crate::binder::ElementMap;
use crate::config::Config;
use crate::page::{Page, PageController};

/// Brand story page
#[derive(Debug)]
pub struct About {
    page: Page,
}

impl About {
    pub fn new(config: &Config) -> Self {
        let elements = ElementMap::new()
            .with("title", ".about__title")
            .with("media", ".about__media");

        Self {
            page: Page::new("about", ".about", elements, config),
        }
    }
}

impl PageController for About {
    fn page(&self) -> &Page {
        &self.page
    }

    fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }
}
