//! Utilities: debouncing and outside-click detection

use std::fmt;
use std::time::{Duration, Instant};

use genma_dom::{Event, EventListener, NodeId};

use crate::{Dom, WeakDom};

/// Trailing-edge debouncer.
///
/// Each call restarts the quiet period and replaces the pending arguments;
/// the callback runs once with the last arguments when a tick finds the
/// quiet period elapsed. The `_at` variants take the current instant
/// explicitly.
pub struct Debounce<A> {
    wait: Duration,
    pending: Option<(Instant, A)>,
    callback: Box<dyn FnMut(A)>,
}

impl<A> Debounce<A> {
    pub fn new(wait: Duration, callback: impl FnMut(A) + 'static) -> Self {
        Self {
            wait,
            pending: None,
            callback: Box::new(callback),
        }
    }

    pub fn call(&mut self, args: A) {
        self.call_at(Instant::now(), args);
    }

    pub fn call_at(&mut self, now: Instant, args: A) {
        self.pending = Some((now, args));
    }

    /// Fire if the quiet period has elapsed. Returns whether it fired.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let Some((last, _)) = &self.pending else {
            return false;
        };
        if now.saturating_duration_since(*last) < self.wait {
            return false;
        }
        self.flush()
    }

    /// Fire the pending call now
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some((_, args)) => {
                (self.callback)(args);
                true
            }
            None => false,
        }
    }

    /// Drop the pending call. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before a pending call may fire
    pub fn time_until_fire(&self, now: Instant) -> Option<Duration> {
        let (last, _) = self.pending.as_ref()?;
        Some(self.wait.saturating_sub(now.saturating_duration_since(*last)))
    }
}

impl<A> fmt::Debug for Debounce<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounce")
            .field("wait", &self.wait)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

/// A registered listener, removed on [`unsubscribe`](Self::unsubscribe)
/// or drop. The target node stays allocated while the subscription lives.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    dom: WeakDom,
    target: NodeId,
    event: String,
    listener: EventListener,
    held: Vec<NodeId>,
}

impl Subscription {
    pub fn new(dom: &Dom, target: NodeId, event: &str, listener: EventListener) -> Self {
        dom.borrow_mut().listeners.add(target, event, listener.clone());
        let held = vec![target];
        dom.hold(&held);
        Self {
            dom: dom.downgrade(),
            target,
            event: event.to_string(),
            listener,
            held,
        }
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dom.unhold(&self.held);
        let Some(dom) = self.dom.upgrade() else {
            return;
        };
        match dom.cell().try_borrow_mut() {
            Ok(mut doc) => {
                doc.listeners.remove(self.target, &self.event, &self.listener);
            }
            Err(_) => tracing::warn!("Document busy, '{}' listener left attached", self.event),
        }
        dom.release_detached();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("target", &self.target)
            .field("event", &self.event)
            .finish()
    }
}

/// Call `callback` for every click whose target lies outside the first
/// element matching `selector`. Returns `None` when nothing matches.
pub fn click_outside(dom: &Dom, selector: &str, callback: impl Fn(&Event) + 'static) -> Option<Subscription> {
    let Some(element) = dom.select(selector).get().first().copied() else {
        tracing::warn!("click_outside: no element matches '{}'", selector);
        return None;
    };

    let weak = dom.downgrade();
    let listener = EventListener::new(move |event| {
        let Some(dom) = weak.upgrade() else {
            return;
        };
        let inside = dom.borrow().tree().contains(element, event.target());
        if !inside {
            callback(event);
        }
    });

    let mut subscription = Subscription::new(dom, NodeId::ROOT, "click", listener);
    dom.hold(&[element]);
    subscription.held.push(element);
    Some(subscription)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_debounce_burst_fires_once() {
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = fired.clone();
        let mut debounce = Debounce::new(Duration::from_millis(100), move |v: u32| sink.borrow_mut().push(v));

        let start = Instant::now();
        debounce.call_at(start, 1);
        debounce.call_at(start + Duration::from_millis(50), 2);
        assert!(!debounce.tick_at(start + Duration::from_millis(120)));
        assert!(debounce.tick_at(start + Duration::from_millis(150)));
        assert!(!debounce.tick_at(start + Duration::from_millis(300)));

        assert_eq!(*fired.borrow(), vec![2]);
    }

    #[test]
    fn test_debounce_cancel_and_flush() {
        let fired = Rc::new(RefCell::new(0));
        let sink = fired.clone();
        let mut debounce = Debounce::new(Duration::from_secs(10), move |()| *sink.borrow_mut() += 1);

        debounce.call(());
        assert!(debounce.cancel());
        assert!(!debounce.flush());
        debounce.call(());
        assert!(debounce.flush());
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_time_until_fire() {
        let mut debounce = Debounce::new(Duration::from_millis(100), |_: ()| {});
        let start = Instant::now();
        assert_eq!(debounce.time_until_fire(start), None);
        debounce.call_at(start, ());
        assert_eq!(debounce.time_until_fire(start + Duration::from_millis(40)), Some(Duration::from_millis(60)));
    }

    #[test]
    fn test_click_outside_keeps_watched_element() {
        let dom = Dom::parse("<div id='menu'><b>x</b></div><p id='away'>y</p>");
        let id = dom.select("#menu").get()[0];
        let subscription = click_outside(&dom, "#menu", |_| {}).unwrap();

        dom.select("#menu").remove();
        assert!(dom.borrow().tree().get(id).is_some());

        drop(subscription);
        assert!(dom.borrow().tree().get(id).is_none());
        assert_eq!(dom.borrow().listeners.count(NodeId::ROOT, "click"), 0);
    }
}
