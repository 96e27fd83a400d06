//! Reactive broadcast tests
//!
//! The observer list is thread-local and every test runs on its own thread,
//! so counts are not shared between tests.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{register_all, test_registry, tool};
use switchboard::command::IconSize;
use switchboard::ui::{LiveToolbar, ToolbarBuilder, ToolbarConfig};
use switchboard::{AppConfig, Attribute, Managed, ReactiveBroadcast, ReactiveObserver};

#[derive(Default)]
struct Counter {
    themes: Cell<usize>,
}

impl ReactiveObserver for Counter {
    fn on_theme_changed(&self, _theme: &str) {
        self.themes.set(self.themes.get() + 1);
    }
}

/// Destroys whatever widget it holds when the theme changes
#[derive(Default)]
struct Closer {
    victim: RefCell<Option<Managed<Counter>>>,
    fired: Cell<bool>,
}

impl ReactiveObserver for Closer {
    fn on_theme_changed(&self, _theme: &str) {
        self.fired.set(true);
        self.victim.borrow_mut().take();
    }
}

fn theme(name: &str) -> Attribute {
    Attribute::Theme(name.to_string())
}

#[test]
fn test_handler_destroys_later_sibling() {
    let closer = Managed::new(Closer::default());
    let victim = Managed::new(Counter::default());
    let victim_widget = Rc::downgrade(victim.widget());
    *closer.victim.borrow_mut() = Some(victim);

    assert_eq!(ReactiveBroadcast::observer_count(), 2);
    let notified = ReactiveBroadcast::broadcast(&theme("light"));

    assert!(closer.fired.get());
    assert_eq!(notified, 1);
    assert!(victim_widget.upgrade().is_none());
    assert_eq!(ReactiveBroadcast::observer_count(), 1);
}

#[test]
fn test_handler_destroys_earlier_sibling() {
    let victim = Managed::new(Counter::default());
    let closer = Managed::new(Closer::default());
    *closer.victim.borrow_mut() = Some(victim);

    // The victim already ran before being destroyed
    assert_eq!(ReactiveBroadcast::broadcast(&theme("light")), 2);
    assert_eq!(ReactiveBroadcast::observer_count(), 1);
    assert_eq!(ReactiveBroadcast::broadcast(&theme("dark")), 1);
}

#[test]
fn test_observer_created_during_broadcast_waits_for_next() {
    struct Spawner {
        spawned: RefCell<Vec<Managed<Counter>>>,
    }
    impl ReactiveObserver for Spawner {
        fn on_theme_changed(&self, _theme: &str) {
            self.spawned.borrow_mut().push(Managed::new(Counter::default()));
        }
    }

    let spawner = Managed::new(Spawner {
        spawned: RefCell::new(Vec::new()),
    });

    assert_eq!(ReactiveBroadcast::broadcast(&theme("a")), 1);
    assert_eq!(spawner.spawned.borrow()[0].themes.get(), 0);

    assert_eq!(ReactiveBroadcast::broadcast(&theme("b")), 2);
    assert_eq!(spawner.spawned.borrow()[0].themes.get(), 1);
}

#[test]
fn test_panicking_handler_is_contained() {
    struct Faulty;
    impl ReactiveObserver for Faulty {
        fn on_theme_changed(&self, _theme: &str) {
            panic!("theme handler failed");
        }
    }

    let faulty = Managed::new(Faulty);
    let counter = Managed::new(Counter::default());

    assert_eq!(ReactiveBroadcast::broadcast(&theme("x")), 1);
    assert_eq!(counter.themes.get(), 1);
    drop(faulty);
}

#[test]
fn test_config_change_resizes_live_toolbar() {
    let registry = test_registry();
    register_all(&registry, [tool("file.new"), tool("file.save")]);

    let builder = ToolbarBuilder::new(&registry);
    let config = ToolbarConfig::from_registry(&registry, "main", &["file"]);
    let live = Managed::new(LiveToolbar::new(builder, config));
    assert_eq!(live.toolbar().icon_size, IconSize::Medium);

    let mut settings = AppConfig::default();
    let changed = settings.apply(AppConfig {
        icon_size: IconSize::Large,
        ..AppConfig::default()
    });

    assert_eq!(changed, [Attribute::IconSize(IconSize::Large)]);
    let toolbar = live.toolbar();
    assert_eq!(toolbar.icon_size, IconSize::Large);
    assert!(toolbar.tools().all(|t| t.icon.width() == 32));
}

#[test]
fn test_unchanged_config_broadcasts_nothing() {
    let counter = Managed::new(Counter::default());
    let mut settings = AppConfig::default();

    assert!(settings.apply(AppConfig::default()).is_empty());
    assert_eq!(counter.themes.get(), 0);
}
