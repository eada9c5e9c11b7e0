//! Engine Configuration

use std::time::Duration;

/// Engine configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Selector of the swapped content root
    pub content_selector: String,

    /// Attribute on the content root naming the page variant
    pub template_attribute: String,

    /// Elements whose activation is intercepted
    pub link_selector: String,

    /// Duration of the page show/hide fades
    pub page_transition: Duration,

    /// Upper bound on a navigation fetch; `None` waits indefinitely
    pub fetch_timeout: Option<Duration>,

    /// User agent for the HTTP fetcher
    pub user_agent: String,

    /// Bootstrap preloader
    pub preloader: PreloaderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_selector: ".content".to_string(),
            template_attribute: "data-template".to_string(),
            link_selector: "a".to_string(),
            page_transition: Duration::from_millis(500),
            fetch_timeout: None,
            user_agent: vitrine_net::DEFAULT_USER_AGENT.to_string(),
            preloader: PreloaderConfig::default(),
        }
    }
}

/// Preloader selectors and exit animation
#[derive(Debug, Clone)]
pub struct PreloaderConfig {
    pub selector: String,
    pub title: String,
    pub number: String,
    /// Preloadable images, queried across the whole document
    pub images: String,
    /// Delimiter used to split the title into animated lines
    pub title_delimiter: String,
    pub exit_delay: Duration,
    pub exit_duration: Duration,
    pub exit_stagger: Duration,
    pub exit_ease: String,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            selector: ".preloader".to_string(),
            title: ".preloader__text".to_string(),
            number: ".preloader__number".to_string(),
            images: "img".to_string(),
            title_delimiter: crate::text::LINE_BREAK.to_string(),
            exit_delay: Duration::from_secs(2),
            exit_duration: Duration::from_millis(1500),
            exit_stagger: Duration::from_millis(100),
            exit_ease: "expo.out".to_string(),
        }
    }
}
