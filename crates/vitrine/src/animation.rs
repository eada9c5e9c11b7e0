//! Animation primitives
//!
//! The engine never animates anything itself. It describes tweens and hands
//! them to an [`Animator`], then waits on a [`Deferred`] that resolves when
//! the animator reports completion.

use std::rc::Rc;
use std::time::Duration;

use smol::channel::{self, Receiver, Sender};
use smol::{LocalExecutor, Timer};
use vitrine_dom::NodeId;

/// Direction of a tween
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// Animate from the given values to the current ones
    From,
    /// Animate from the current values to the given ones
    To,
}

/// Declarative tween. Property names and values are opaque to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub kind: TweenKind,
    pub properties: Vec<(String, String)>,
    pub duration: Duration,
    pub delay: Duration,
    /// Offset between successive targets
    pub stagger: Duration,
    pub ease: Option<String>,
}

impl Tween {
    pub fn from() -> Self {
        Self::new(TweenKind::From)
    }

    pub fn to() -> Self {
        Self::new(TweenKind::To)
    }

    fn new(kind: TweenKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            duration: Duration::from_millis(500),
            delay: Duration::ZERO,
            stagger: Duration::ZERO,
            ease: None,
        }
    }

    pub fn set(mut self, property: &str, value: &str) -> Self {
        self.properties.push((property.to_string(), value.to_string()));
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn ease(mut self, ease: &str) -> Self {
        self.ease = Some(ease.to_string());
        self
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Wall time until the last of `targets` finishes
    pub fn total_time(&self, targets: usize) -> Duration {
        let staggered = self.stagger * targets.saturating_sub(1) as u32;
        self.delay + self.duration + staggered
    }
}

/// Runs tweens and reports completion.
///
/// `on_complete` must be called exactly once, possibly before `animate`
/// returns.
pub trait Animator {
    fn animate(&self, targets: &[NodeId], tween: &Tween, on_complete: Box<dyn FnOnce()>);
}

impl<A: Animator + ?Sized> Animator for Rc<A> {
    fn animate(&self, targets: &[NodeId], tween: &Tween, on_complete: Box<dyn FnOnce()>) {
        (**self).animate(targets, tween, on_complete)
    }
}

/// Completes every tween synchronously
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateAnimator;

impl Animator for ImmediateAnimator {
    fn animate(&self, targets: &[NodeId], tween: &Tween, on_complete: Box<dyn FnOnce()>) {
        tracing::trace!(targets = targets.len(), kind = ?tween.kind, "tween skipped");
        on_complete();
    }
}

/// Completes each tween after its real duration on a local executor
#[derive(Debug, Clone)]
pub struct TimedAnimator {
    executor: Rc<LocalExecutor<'static>>,
}

impl TimedAnimator {
    pub fn new(executor: Rc<LocalExecutor<'static>>) -> Self {
        Self { executor }
    }
}

impl Animator for TimedAnimator {
    fn animate(&self, targets: &[NodeId], tween: &Tween, on_complete: Box<dyn FnOnce()>) {
        let wait = tween.total_time(targets.len());
        tracing::trace!(targets = targets.len(), ?wait, "tween started");
        self.executor
            .spawn(async move {
                Timer::after(wait).await;
                on_complete();
            })
            .detach();
    }
}

/// Create a linked one-shot completion pair
pub fn deferred() -> (Resolver, Deferred) {
    let (tx, rx) = channel::bounded(1);
    (Resolver { tx }, Deferred { rx })
}

/// Resolving half of a [`Deferred`]
#[derive(Debug)]
pub struct Resolver {
    tx: Sender<()>,
}

impl Resolver {
    pub fn resolve(self) {
        let _ = self.tx.try_send(());
    }
}

/// One-shot completion signal
#[derive(Debug)]
pub struct Deferred {
    rx: Receiver<()>,
}

impl Deferred {
    /// Already-resolved signal
    pub fn resolved() -> Self {
        let (resolver, deferred) = deferred();
        resolver.resolve();
        deferred
    }

    pub fn is_resolved(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Wait for resolution. A resolver dropped unresolved also ends the wait.
    pub async fn wait(self) {
        if self.rx.recv().await.is_err() {
            tracing::debug!("completion signal dropped before resolving");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_total_time() {
        let tween = Tween::to()
            .duration(Duration::from_millis(1500))
            .delay(Duration::from_secs(2))
            .stagger(Duration::from_millis(100));
        assert_eq!(tween.total_time(3), Duration::from_millis(3700));
        assert_eq!(tween.total_time(0), Duration::from_millis(3500));
    }

    #[test]
    fn test_immediate_animator_completes_synchronously() {
        let done = Rc::new(Cell::new(false));
        let flag = done.clone();
        ImmediateAnimator.animate(&[], &Tween::from(), Box::new(move || flag.set(true)));
        assert!(done.get());
    }

    #[test]
    fn test_deferred() {
        let (resolver, deferred) = deferred();
        assert!(!deferred.is_resolved());
        resolver.resolve();
        assert!(deferred.is_resolved());
        smol::block_on(deferred.wait());

        assert!(Deferred::resolved().is_resolved());
    }

    #[test]
    fn test_dropped_resolver_ends_wait() {
        let (resolver, deferred) = deferred();
        drop(resolver);
        smol::block_on(deferred.wait());
    }

    #[test]
    fn test_timed_animator() {
        let executor = Rc::new(LocalExecutor::new());
        let animator = TimedAnimator::new(executor.clone());
        let (resolver, deferred) = deferred();
        let tween = Tween::to().duration(Duration::from_millis(5));
        animator.animate(&[NodeId::ROOT], &tween, Box::new(move || resolver.resolve()));

        smol::block_on(executor.run(deferred.wait()));
    }
}
