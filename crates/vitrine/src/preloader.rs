//! Bootstrap preloader
//!
//! Shows load progress for every image in the document, then plays an exit
//! animation on the split title and signals [`PreloaderEvent::Completed`].

use std::cell::Cell;
use std::rc::{Rc, Weak};

use smol::LocalExecutor;
use vitrine_dom::NodeId;
use vitrine_net::Fetcher;

use crate::animation::{Animator, Tween};
use crate::binder::ElementMap;
use crate::component::Component;
use crate::config::PreloaderConfig;
use crate::preload::{PreloadTracker, Progress};
use crate::text::{self, Delimiter, SplitOptions};
use crate::SharedDocument;

/// Starts an asset load and reports when it is over.
///
/// `on_load` is called once whether the load succeeded or not, so a broken
/// asset cannot stall the preloader.
pub trait AssetLoader {
    fn load(&self, src: &str, on_load: Box<dyn FnOnce()>);
}

/// Loads assets through a [`Fetcher`] on a local executor
pub struct SpawnAssetLoader<F> {
    fetcher: Rc<F>,
    executor: Rc<LocalExecutor<'static>>,
}

impl<F> SpawnAssetLoader<F> {
    pub fn new(fetcher: Rc<F>, executor: Rc<LocalExecutor<'static>>) -> Self {
        Self { fetcher, executor }
    }
}

impl<F: Fetcher + 'static> AssetLoader for SpawnAssetLoader<F> {
    fn load(&self, src: &str, on_load: Box<dyn FnOnce()>) {
        let fetcher = self.fetcher.clone();
        let src = src.to_string();
        self.executor
            .spawn(async move {
                match fetcher.fetch(&src).await {
                    Ok(response) if response.is_success() => tracing::trace!(%src, "asset loaded"),
                    Ok(response) => tracing::warn!(%src, status = response.status, "asset failed to load"),
                    Err(e) => tracing::warn!(%src, error = %e, "asset failed to load"),
                }
                on_load();
            })
            .detach();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloaderEvent {
    /// Every asset loaded and the exit animation finished
    Completed,
}

/// Preloader handle
#[derive(Clone)]
pub struct Preloader {
    inner: Rc<Inner>,
}

struct Inner {
    document: SharedDocument,
    component: Component<PreloaderEvent>,
    title_spans: Vec<NodeId>,
    tracker: PreloadTracker,
    animator: Rc<dyn Animator>,
    exit: Tween,
    destroyed: Cell<bool>,
}

impl Preloader {
    /// Bind the preloader, split its title and count the document's images
    pub fn new(document: SharedDocument, animator: Rc<dyn Animator>, config: &PreloaderConfig) -> Self {
        let (component, title_spans) = {
            let mut doc = document.borrow_mut();
            let images = doc.query_selector_all(doc.root(), &config.images);
            let component = Component::new(
                &doc,
                &config.selector,
                ElementMap::new()
                    .with("title", config.title.as_str())
                    .with("number", config.number.as_str())
                    .with("images", images),
            );

            let title_spans = match component.elements().single("title") {
                Some(title) => {
                    let options = SplitOptions {
                        delimiter: Delimiter::Literal(config.title_delimiter.clone()),
                        append_spacer: true,
                    };
                    text::split(&mut doc, title, &options)
                }
                None => Vec::new(),
            };
            (component, title_spans)
        };

        let exit = Tween::to()
            .set("autoAlpha", "0")
            .set("y", "100%")
            .delay(config.exit_delay)
            .duration(config.exit_duration)
            .stagger(config.exit_stagger)
            .ease(&config.exit_ease);

        let total = component.elements().all("images").len();
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let tracker = PreloadTracker::register(total);

            let this = weak.clone();
            tracker.on_progress(move |progress| {
                if let Some(inner) = this.upgrade() {
                    inner.show_progress(progress);
                }
            });

            let this = weak.clone();
            tracker.on_complete(move |_| {
                if let Some(inner) = this.upgrade() {
                    Inner::on_loaded(&inner);
                }
            });

            Inner {
                document,
                component,
                title_spans,
                tracker,
                animator,
                exit,
                destroyed: Cell::new(false),
            }
        });

        Self { inner }
    }

    /// Start loading every image: `data-src` is copied to `src` and handed
    /// to `loader`. With no images, completion fires right away.
    pub fn create_loader(&self, loader: &dyn AssetLoader) {
        let sources: Vec<Option<String>> = {
            let mut doc = self.inner.document.borrow_mut();
            self.inner.component.elements().all("images")
                .into_iter()
                .map(|image| {
                    let src = doc.get_attribute(image, "data-src")
                        .or_else(|| doc.get_attribute(image, "src"))
                        .map(str::to_string);
                    if let Some(src) = &src {
                        doc.set_attribute(image, "src", src);
                    }
                    src
                })
                .collect()
        };

        tracing::info!(assets = sources.len(), "preloading");

        for source in sources {
            let this = Rc::downgrade(&self.inner);
            let on_load: Box<dyn FnOnce()> = Box::new(move || {
                if let Some(inner) = this.upgrade() {
                    inner.tracker.record_completion();
                }
            });
            match source {
                Some(src) => loader.load(&src, on_load),
                None => {
                    tracing::debug!("image without a source counted as loaded");
                    on_load();
                }
            }
        }

        self.inner.tracker.complete_if_empty();
    }

    /// Run `callback` once the preloader completes
    pub fn on_completed(&self, callback: impl Fn(&Preloader) + 'static) {
        let this = Rc::downgrade(&self.inner);
        self.inner.component.events().once(move |_| {
            if let Some(inner) = this.upgrade() {
                callback(&Preloader { inner });
            }
        });
    }

    /// Remove the preloader element from the document
    pub fn destroy(&self) {
        if self.inner.destroyed.replace(true) {
            return;
        }
        if let Some(element) = self.inner.component.element() {
            self.inner.document.borrow_mut().remove(element);
        }
        tracing::debug!("preloader destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn progress(&self) -> Progress {
        self.inner.tracker.progress()
    }

    pub fn element(&self) -> Option<NodeId> {
        self.inner.component.element()
    }

    pub fn title_spans(&self) -> &[NodeId] {
        &self.inner.title_spans
    }
}

impl std::fmt::Debug for Preloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("tracker", &self.inner.tracker)
            .field("destroyed", &self.inner.destroyed.get())
            .finish()
    }
}

impl Inner {
    fn show_progress(&self, progress: &Progress) {
        if let Some(number) = self.component.elements().single("number") {
            let label = format!("{}%", progress.percent());
            self.document.borrow_mut().set_text_content(number, &label);
        }
    }

    fn on_loaded(inner: &Rc<Inner>) {
        tracing::info!("assets loaded");
        let this = Rc::downgrade(inner);
        inner.animator.animate(
            &inner.title_spans,
            &inner.exit,
            Box::new(move || {
                if let Some(inner) = this.upgrade() {
                    inner.component.events().emit(&PreloaderEvent::Completed);
                }
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::animation::ImmediateAnimator;

    /// Holds load callbacks until the test releases them
    #[derive(Default)]
    struct ManualLoader {
        pending: RefCell<Vec<(String, Box<dyn FnOnce()>)>>,
    }

    impl AssetLoader for ManualLoader {
        fn load(&self, src: &str, on_load: Box<dyn FnOnce()>) {
            self.pending.borrow_mut().push((src.to_string(), on_load));
        }
    }

    impl ManualLoader {
        fn finish_next(&self) {
            let (_, on_load) = self.pending.borrow_mut().remove(0);
            on_load();
        }
    }

    const PAGE: &str = r#"<div class="preloader">
        <p class="preloader__text">Fresh<br>Arrivals</p>
        <span class="preloader__number">0%</span>
    </div>
    <img data-src="/a.jpg"><img data-src="/b.jpg"><img data-src="/c.jpg">"#;

    fn shared(html: &str) -> SharedDocument {
        Rc::new(std::cell::RefCell::new(vitrine_html::parse(html)))
    }

    #[test]
    fn test_progress_and_completion() {
        let document = shared(PAGE);
        let preloader = Preloader::new(document.clone(), Rc::new(ImmediateAnimator), &PreloaderConfig::default());
        assert_eq!(preloader.title_spans().len(), 2);

        let completed = Rc::new(Cell::new(0));
        let counter = completed.clone();
        preloader.on_completed(move |p| {
            counter.set(counter.get() + 1);
            p.destroy();
        });

        let loader = ManualLoader::default();
        preloader.create_loader(&loader);
        let sources: Vec<String> = loader.pending.borrow().iter().map(|(s, _)| s.clone()).collect();
        assert_eq!(sources, vec!["/a.jpg", "/b.jpg", "/c.jpg"]);

        let number = document.borrow().query_selector(document.borrow().root(), ".preloader__number").unwrap();
        let mut labels = Vec::new();
        for _ in 0..3 {
            loader.finish_next();
            labels.push(document.borrow().text_content(number));
        }
        assert_eq!(labels, vec!["33%", "67%", "100%"]);
        assert_eq!(completed.get(), 1);
        assert!(preloader.is_destroyed());

        let doc = document.borrow();
        assert!(doc.query_selector(doc.root(), ".preloader").is_none());
        let img = doc.query_selector(doc.root(), "img").unwrap();
        assert_eq!(doc.get_attribute(img, "src"), Some("/a.jpg"));
    }

    #[test]
    fn test_no_images_completes_immediately() {
        let document = shared(r#"<div class="preloader"><p class="preloader__text">Hi</p></div>"#);
        let preloader = Preloader::new(document, Rc::new(ImmediateAnimator), &PreloaderConfig::default());
        let completed = Rc::new(Cell::new(false));
        let flag = completed.clone();
        preloader.on_completed(move |_| flag.set(true));

        preloader.create_loader(&ManualLoader::default());
        assert!(completed.get());
    }

    #[test]
    fn test_spawn_loader_reports_failures_too() {
        let executor = Rc::new(LocalExecutor::new());
        let fetcher = Rc::new(vitrine_net::StaticFetcher::new().route("https://shop.test/a.jpg", "jpeg"));
        let loader = SpawnAssetLoader::new(fetcher.clone(), executor.clone());

        let done = Rc::new(Cell::new(0));
        for src in ["https://shop.test/a.jpg", "https://shop.test/missing.jpg"] {
            let counter = done.clone();
            loader.load(src, Box::new(move || counter.set(counter.get() + 1)));
        }

        smol::block_on(executor.run(async {
            while done.get() < 2 {
                smol::future::yield_now().await;
            }
        }));
        assert_eq!(fetcher.requests().len(), 2);
    }
}
