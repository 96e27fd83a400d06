//! Global attribute broadcast to live widgets
//!
//! Widgets that react to theme, icon size, locale or font scale changes hold
//! a [`Subscription`]. The broadcaster keeps only a weak link to each
//! observer and never extends its lifetime; dropping the subscription (or the
//! observer) removes it.
//!
//! ```text
//! settings change ─▶ ReactiveBroadcast::broadcast(attr) ─▶ snapshot ─▶ on_*_changed() per live observer
//! ```
//!
//! Broadcast iterates a snapshot of the observer list. A handler may create
//! or destroy other observers; destroyed ones are skipped, new ones are not
//! notified until the next broadcast.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::command::IconSize;

/// A global attribute change
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Theme(String),
    IconSize(IconSize),
    Locale(String),
    FontScale(f32),
}

impl Attribute {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Attribute::Theme(_) => "theme",
            Attribute::IconSize(_) => "icon_size",
            Attribute::Locale(_) => "locale",
            Attribute::FontScale(_) => "font_scale",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Theme(theme) => write!(f, "theme={}", theme),
            Attribute::IconSize(size) => write!(f, "icon_size={}", size),
            Attribute::Locale(locale) => write!(f, "locale={}", locale),
            Attribute::FontScale(scale) => write!(f, "font_scale={}", scale),
        }
    }
}

/// Receiver of attribute changes; implement only the handlers you need
pub trait ReactiveObserver {
    fn on_theme_changed(&self, _theme: &str) {}
    fn on_icon_size_changed(&self, _size: IconSize) {}
    fn on_locale_changed(&self, _locale: &str) {}
    fn on_font_scale_changed(&self, _scale: f32) {}
}

struct ObserverEntry {
    id: u64,
    observer: Weak<dyn ReactiveObserver>,
    /// Cleared by the owning [`Subscription`] on drop
    live: Rc<Cell<bool>>,
}

thread_local! {
    static OBSERVERS: RefCell<Vec<ObserverEntry>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(1) };
}

/// The process-wide (per UI thread) observer list
pub struct ReactiveBroadcast;

impl ReactiveBroadcast {
    /// Register an observer; it stays registered while the returned handle lives
    #[must_use = "dropping the subscription unregisters the observer immediately"]
    pub fn subscribe<O: ReactiveObserver + 'static>(observer: &Rc<O>) -> Subscription {
        let weak: Weak<O> = Rc::downgrade(observer);
        let weak: Weak<dyn ReactiveObserver> = weak;
        let live = Rc::new(Cell::new(true));
        let id = NEXT_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        OBSERVERS.with(|list| {
            list.borrow_mut().push(ObserverEntry {
                id,
                observer: weak,
                live: Rc::clone(&live),
            })
        });
        tracing::trace!(observer = id, "Reactive observer registered");
        Subscription { id, live }
    }

    /// Deliver an attribute change to every live observer
    ///
    /// Returns how many handlers were invoked.
    pub fn broadcast(attribute: &Attribute) -> usize {
        let snapshot: Vec<ObserverEntry> = OBSERVERS.with(|list| {
            let mut list = list.borrow_mut();
            list.retain(|entry| entry.observer.strong_count() > 0);
            list.iter()
                .map(|entry| ObserverEntry {
                    id: entry.id,
                    observer: entry.observer.clone(),
                    live: Rc::clone(&entry.live),
                })
                .collect()
        });

        let mut notified = 0;
        for ObserverEntry { id, observer: weak, live } in snapshot {
            // Unsubscribed by an earlier handler in this broadcast
            if !live.get() {
                continue;
            }
            let Some(observer) = weak.upgrade() else {
                continue;
            };

            let delivered = panic::catch_unwind(AssertUnwindSafe(|| {
                deliver(observer.as_ref(), attribute)
            }));
            match delivered {
                Ok(()) => notified += 1,
                Err(_) => tracing::warn!(
                    observer = id,
                    attribute = attribute.kind(),
                    "Reactive handler panicked"
                ),
            }
        }

        tracing::debug!("Broadcast {} to {} observers", attribute, notified);
        notified
    }

    /// Number of registered observers that are still alive
    pub fn observer_count() -> usize {
        OBSERVERS.with(|list| {
            list.borrow()
                .iter()
                .filter(|entry| entry.observer.strong_count() > 0)
                .count()
        })
    }
}

fn deliver(observer: &dyn ReactiveObserver, attribute: &Attribute) {
    match attribute {
        Attribute::Theme(theme) => observer.on_theme_changed(theme),
        Attribute::IconSize(size) => observer.on_icon_size_changed(*size),
        Attribute::Locale(locale) => observer.on_locale_changed(locale),
        Attribute::FontScale(scale) => observer.on_font_scale_changed(*scale),
    }
}

/// RAII registration handle; dropping it unregisters the observer
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    live: Rc<Cell<bool>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.live.set(false);
        let id = self.id;
        // The list may already be gone during thread teardown
        let _ = OBSERVERS.try_with(|list| {
            if let Ok(mut list) = list.try_borrow_mut() {
                list.retain(|entry| entry.id != id);
            }
        });
    }
}

/// A widget together with its broadcast subscription
///
/// Construction subscribes, drop unsubscribes. Derefs to the widget.
pub struct Managed<W: ReactiveObserver + 'static> {
    subscription: Subscription,
    widget: Rc<W>,
}

impl<W: ReactiveObserver + 'static> Managed<W> {
    pub fn new(widget: W) -> Self {
        let widget = Rc::new(widget);
        let subscription = ReactiveBroadcast::subscribe(&widget);
        Self {
            subscription,
            widget,
        }
    }

    /// Shared handle to the widget (does not keep the subscription alive)
    pub fn widget(&self) -> &Rc<W> {
        &self.widget
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

impl<W: ReactiveObserver + 'static> Deref for Managed<W> {
    type Target = W;

    fn deref(&self) -> &W {
        &self.widget
    }
}

impl<W: ReactiveObserver + fmt::Debug + 'static> fmt::Debug for Managed<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Managed")
            .field("widget", &self.widget)
            .field("subscription", &self.subscription)
            .finish()
    }
}
