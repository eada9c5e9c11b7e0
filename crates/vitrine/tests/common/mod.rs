//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;

use vitrine::dom::NodeId;
use vitrine::{Animator, AssetLoader, SharedDocument, Tween, TweenKind};

pub const BASE: &str = "https://shop.test/";

/// A full storefront page with `body` inside the content root
pub fn storefront(template: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Vitrine</title></head>
<body>
  <nav class="navigation">
    <a id="nav-home" href="/">Home</a>
    <a id="nav-about" href="/about">About</a>
    <a id="nav-collections" href="/collections">Collections</a>
  </nav>
  <div class="content" data-template="{template}">{body}</div>
</body>
</html>"#
    )
}

pub fn home() -> String {
    storefront(
        "home",
        r#"<div class="home"><a class="home__link" href="/collections">Shop now</a></div>"#,
    )
}

pub fn about() -> String {
    storefront(
        "about",
        r#"<div class="about"><h1 class="about__title">Our story</h1><a id="about-detail" href="/detail/1">Product</a></div>"#,
    )
}

pub fn shared(html: &str) -> SharedDocument {
    Rc::new(RefCell::new(vitrine::html::parse_with_url(html, BASE)))
}

pub fn by_id(document: &SharedDocument, id: &str) -> NodeId {
    document.borrow().get_element_by_id(id).expect("element with id")
}

/// Reports every asset as loaded right away
pub struct InstantAssets;

impl AssetLoader for InstantAssets {
    fn load(&self, _: &str, on_load: Box<dyn FnOnce()>) {
        on_load();
    }
}

/// Holds load callbacks until released
#[derive(Default)]
pub struct ManualAssets {
    pending: RefCell<Vec<(String, Box<dyn FnOnce()>)>>,
}

impl AssetLoader for ManualAssets {
    fn load(&self, src: &str, on_load: Box<dyn FnOnce()>) {
        self.pending.borrow_mut().push((src.to_string(), on_load));
    }
}

impl ManualAssets {
    pub fn sources(&self) -> Vec<String> {
        self.pending.borrow().iter().map(|(src, _)| src.clone()).collect()
    }

    pub fn finish_next(&self) {
        let (_, on_load) = self.pending.borrow_mut().remove(0);
        on_load();
    }
}

/// Records tweens and holds their completions until released
#[derive(Default)]
pub struct HeldAnimator {
    pending: RefCell<Vec<Box<dyn FnOnce()>>>,
    log: RefCell<Vec<(TweenKind, Vec<NodeId>)>>,
}

impl Animator for HeldAnimator {
    fn animate(&self, targets: &[NodeId], tween: &Tween, on_complete: Box<dyn FnOnce()>) {
        self.log.borrow_mut().push((tween.kind, targets.to_vec()));
        self.pending.borrow_mut().push(on_complete);
    }
}

impl HeldAnimator {
    pub fn release(&self) -> usize {
        let pending: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let released = pending.len();
        for on_complete in pending {
            on_complete();
        }
        released
    }

    pub fn calls(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn log(&self) -> Vec<(TweenKind, Vec<NodeId>)> {
        self.log.borrow().clone()
    }
}

/// Drive `future` to completion, releasing held animations whenever it
/// stalls on them.
pub fn drive<T>(future: impl Future<Output = T>, animator: &HeldAnimator) -> T {
    smol::block_on(async {
        let mut future = pin!(future);
        loop {
            if let Some(value) = smol::future::poll_once(&mut future).await {
                return value;
            }
            if animator.release() == 0 {
                smol::future::yield_now().await;
            }
        }
    })
}
