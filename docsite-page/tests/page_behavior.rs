use std::rc::Rc;

use docsite_page::mutation::{ClipboardDone, Task};
use docsite_page::testing::RecordingHost;
use docsite_page::{
    BlockId, BlockSnapshot, Host, IntersectionEntry, MemoryStore, Mutation, Node, PageConfig,
    PageController, PageSnapshot, SidebarEvent, SidebarState, Theme, ThemeSource,
    WiringRegistry,
};

type Controller = PageController<RecordingHost, MemoryStore>;

fn controller_with(store: MemoryStore) -> Rc<Controller> {
    let host = Rc::new(RecordingHost::new());
    Rc::new(PageController::new(host, store, PageConfig::default()).unwrap())
}

fn block(key: &str, class: &str, button: Option<&str>) -> BlockSnapshot<String> {
    BlockSnapshot {
        key: key.to_string(),
        code_class: class.to_string(),
        button_text: button.map(String::from),
    }
}

fn stored(ctrl: &Controller) -> Option<String> {
    ctrl.preferences().store().value("theme")
}

fn marker_dark(ctrl: &Controller) -> bool {
    ctrl.host().has_class(Node::Root, "dark")
}

#[test]
fn initial_theme_follows_system_when_unset() {
    let ctrl = controller_with(MemoryStore::new());
    let theme = ctrl.init(PageSnapshot {
        prefers_dark: true,
        ..PageSnapshot::default()
    });
    assert_eq!(theme, Theme::Dark);
    assert!(marker_dark(&ctrl));
    assert_eq!(
        ctrl.host().attribute(Node::Root, "data-theme").as_deref(),
        Some("dark")
    );

    let ctrl = controller_with(MemoryStore::new());
    assert_eq!(ctrl.init(PageSnapshot::default()), Theme::Light);
    assert!(!marker_dark(&ctrl));
}

#[test]
fn stored_preference_overrides_stale_marker() {
    let ctrl = controller_with(MemoryStore::with("theme", "light"));
    let theme = ctrl.init(PageSnapshot {
        prefers_dark: true,
        marker_dark: true,
        ..PageSnapshot::default()
    });
    assert_eq!(theme, Theme::Light);
    assert!(!marker_dark(&ctrl));
    assert_eq!(
        ctrl.host().attribute(Node::ThemeToggle, "aria-label").as_deref(),
        Some("Switch to dark theme")
    );
}

#[test]
fn toggle_keeps_marker_and_slot_in_sync() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.init(PageSnapshot::default());

    assert_eq!(ctrl.on_theme_toggle(), Theme::Dark);
    assert!(marker_dark(&ctrl));
    assert_eq!(stored(&ctrl).as_deref(), Some("dark"));
    assert_eq!(
        ctrl.host().attribute(Node::ThemeToggle, "aria-label").as_deref(),
        Some("Switch to light theme")
    );

    assert_eq!(ctrl.on_theme_toggle(), Theme::Light);
    assert!(!marker_dark(&ctrl));
    assert_eq!(stored(&ctrl).as_deref(), Some("light"));
}

#[test]
fn double_toggle_restores_original_state() {
    let ctrl = controller_with(MemoryStore::with("theme", "dark"));
    ctrl.init(PageSnapshot::default());
    ctrl.on_theme_toggle();
    ctrl.on_theme_toggle();
    assert_eq!(ctrl.theme(), Theme::Dark);
    assert!(marker_dark(&ctrl));
    assert_eq!(stored(&ctrl).as_deref(), Some("dark"));
}

#[test]
fn theme_change_rehighlights_after_delay() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.init(PageSnapshot::default());
    ctrl.host().advance(50);
    let after_init = ctrl.host().highlight_calls();
    assert_eq!(after_init, 1);

    ctrl.on_theme_toggle();
    ctrl.host().advance(49);
    assert_eq!(ctrl.host().highlight_calls(), after_init);
    ctrl.host().advance(1);
    assert_eq!(ctrl.host().highlight_calls(), after_init + 1);

    let sources: Vec<_> = ctrl
        .host()
        .theme_events()
        .iter()
        .map(|c| c.source)
        .collect();
    assert_eq!(sources, vec![ThemeSource::Initial, ThemeSource::Manual]);
}

#[test]
fn system_preference_only_applies_without_stored_value() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.init(PageSnapshot::default());
    assert_eq!(ctrl.on_system_preference(true), Some(Theme::Dark));
    assert!(marker_dark(&ctrl));
    assert_eq!(stored(&ctrl), None);

    ctrl.on_theme_toggle();
    assert_eq!(ctrl.on_system_preference(true), None);
    assert_eq!(ctrl.theme(), Theme::Light);
}

#[test]
fn overlay_click_closes_open_sidebar() {
    let host = Rc::new(RecordingHost::new());
    let ctrl = PageController::new(Rc::clone(&host), MemoryStore::new(), PageConfig::default())
        .unwrap();

    let open = ctrl.on_sidebar(SidebarState::Closed, SidebarEvent::Toggle);
    assert_eq!(open, SidebarState::Open);
    assert!(!host.has_class(Node::Sidebar, "-translate-x-full"));
    assert!(!host.has_class(Node::SidebarOverlay, "hidden"));

    let closed = ctrl.on_sidebar(open, SidebarEvent::Dismiss);
    assert_eq!(closed, SidebarState::Closed);
    assert!(host.has_class(Node::Sidebar, "-translate-x-full"));
    assert!(host.has_class(Node::SidebarOverlay, "hidden"));
}

#[test]
fn dismiss_closes_sidebar_opened_outside_controller() {
    // Panel opened by some other script: hidden classes already gone.
    let host = Rc::new(RecordingHost::new());
    let ctrl = PageController::new(Rc::clone(&host), MemoryStore::new(), PageConfig::default())
        .unwrap();
    ctrl.on_sidebar(SidebarState::from_hidden(false), SidebarEvent::Dismiss);
    assert!(host.has_class(Node::Sidebar, "-translate-x-full"));
    assert!(host.has_class(Node::SidebarOverlay, "hidden"));
}

#[test]
fn copy_delivers_text_and_reverts_after_window() {
    let ctrl = controller_with(MemoryStore::new());
    let wired = ctrl.setup_code_blocks(vec![block("b0", "language-python", Some("Copy"))]);
    assert_eq!(wired, vec![BlockId(0)]);
    let button = Node::CopyButton(BlockId(0));

    ctrl.on_copy(BlockId(0), "print(1)".into());
    assert_eq!(ctrl.host().clipboard_writes(), vec!["print(1)".to_string()]);
    assert!(ctrl.host().has_class(button, "copied"));
    assert_eq!(
        ctrl.host().attribute(button, "title").as_deref(),
        Some("Copied!")
    );

    ctrl.host().advance(1999);
    assert!(ctrl.host().has_class(button, "copied"));
    ctrl.host().advance(1);
    assert!(!ctrl.host().has_class(button, "copied"));
    assert_eq!(
        ctrl.host().attribute(button, "title").as_deref(),
        Some("Copy to clipboard")
    );
}

#[test]
fn rejected_copy_shows_failure_then_reverts() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.setup_code_blocks(vec![block("b0", "", None)]);
    let button = Node::CopyButton(BlockId(0));

    ctrl.host().reject_clipboard(true);
    ctrl.on_copy(BlockId(0), "let x = 1;".into());
    assert!(ctrl.host().has_class(button, "copy-failed"));
    assert!(!ctrl.host().has_class(button, "copied"));
    assert_eq!(
        ctrl.host().attribute(button, "title").as_deref(),
        Some("Copy failed")
    );

    ctrl.host().advance(2000);
    assert!(!ctrl.host().has_class(button, "copy-failed"));
    assert_eq!(
        ctrl.host().attribute(button, "title").as_deref(),
        Some("Copy to clipboard")
    );
}

#[test]
fn overlapping_reverts_each_fire() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.setup_code_blocks(vec![block("b0", "", Some("Copy"))]);
    let button = Node::CopyButton(BlockId(0));

    ctrl.on_copy(BlockId(0), "a".into());
    ctrl.host().advance(1500);
    ctrl.on_copy(BlockId(0), "a".into());
    // First timer reverts early; the second is independent.
    ctrl.host().advance(500);
    assert!(!ctrl.host().has_class(button, "copied"));
    assert_eq!(ctrl.host().pending_timers(), 1);
    ctrl.host().advance(1500);
    assert_eq!(ctrl.host().pending_timers(), 0);
}

#[test]
fn failure_after_success_replaces_copied_state() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.setup_code_blocks(vec![block("b0", "", Some("Copy"))]);
    let button = Node::CopyButton(BlockId(0));

    ctrl.on_copy(BlockId(0), "a".into());
    ctrl.host().advance(500);
    ctrl.host().reject_clipboard(true);
    ctrl.on_copy(BlockId(0), "a".into());

    assert!(ctrl.host().has_class(button, "copy-failed"));
    assert!(!ctrl.host().has_class(button, "copied"));
    assert_eq!(
        ctrl.host().attribute(button, "title").as_deref(),
        Some("Copy failed")
    );
}

#[test]
fn success_after_failure_replaces_failed_state() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.setup_code_blocks(vec![block("b0", "", Some("Copy"))]);
    let button = Node::CopyButton(BlockId(0));

    ctrl.host().reject_clipboard(true);
    ctrl.on_copy(BlockId(0), "a".into());
    ctrl.host().advance(500);
    ctrl.host().reject_clipboard(false);
    ctrl.on_copy(BlockId(0), "a".into());

    assert!(ctrl.host().has_class(button, "copied"));
    assert!(!ctrl.host().has_class(button, "copy-failed"));
    assert_eq!(
        ctrl.host().attribute(button, "title").as_deref(),
        Some("Copied!")
    );
}

#[test]
fn repeated_setup_wires_each_block_once() {
    let ctrl = controller_with(MemoryStore::new());
    let blocks = || {
        vec![
            block("b0", "language-rust", None),
            block("b1", "plain", Some("Copy")),
        ]
    };
    let first = ctrl.setup_code_blocks(blocks());
    let second = ctrl.setup_code_blocks(blocks());
    assert_eq!(first, vec![BlockId(0), BlockId(1)]);
    assert!(second.is_empty());
    assert_eq!(ctrl.wired_blocks(), 2);
    assert_eq!(ctrl.host().inserted_buttons(), 1);
    assert_eq!(ctrl.block(BlockId(1)).as_deref().map(String::as_str), Some("b1"));

    assert_eq!(
        ctrl.host()
            .attribute(Node::Block(BlockId(0)), "data-language")
            .as_deref(),
        Some("rust")
    );
    assert_eq!(
        ctrl.host().attribute(Node::Block(BlockId(1)), "data-language"),
        None
    );
}

#[test]
fn replaced_block_is_released_and_rewired() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.setup_code_blocks(vec![block("b0", "", None), block("b1", "", None)]);

    assert_eq!(ctrl.release_blocks(|key| key != "b0"), 1);
    assert_eq!(ctrl.wired_blocks(), 1);
    assert!(ctrl.block(BlockId(0)).is_none());

    let wired = ctrl.setup_code_blocks(vec![block("b0", "", None), block("b1", "", None)]);
    assert_eq!(wired, vec![BlockId(2)]);
    assert_eq!(ctrl.wired_blocks(), 2);
    assert_eq!(ctrl.host().inserted_buttons(), 3);
}

#[test]
fn intersecting_heading_marks_only_its_link() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.init(PageSnapshot {
        link_hrefs: vec!["#a".into(), "#b".into(), "#c".into()],
        ..PageSnapshot::default()
    });
    ctrl.on_intersections(&[IntersectionEntry::entering("a")]);
    let active = ctrl.on_intersections(&[IntersectionEntry::entering("b")]);
    assert_eq!(active, Some(1));

    let classes = &ctrl.config().active_link_classes;
    for (idx, expected) in [(0, false), (1, true), (2, false)] {
        for class in classes {
            assert_eq!(
                ctrl.host().has_class(Node::Link(idx), class),
                expected,
                "link {idx} class {class}"
            );
        }
    }
}

#[test]
fn batch_order_decides_simultaneous_intersections() {
    let ctrl = controller_with(MemoryStore::new());
    ctrl.init(PageSnapshot {
        link_hrefs: vec!["#a".into(), "#b".into(), "#c".into()],
        ..PageSnapshot::default()
    });
    let active = ctrl.on_intersections(&[
        IntersectionEntry::entering("c"),
        IntersectionEntry::entering("a"),
    ]);
    assert_eq!(active, Some(0));
    assert!(ctrl.host().has_class(Node::Link(0), "font-medium"));
    assert!(!ctrl.host().has_class(Node::Link(2), "font-medium"));
}

#[test]
fn missing_toggle_is_tolerated() {
    let host = Rc::new(RecordingHost::new().without(Node::ThemeToggle));
    let ctrl = Rc::new(
        PageController::new(Rc::clone(&host), MemoryStore::new(), PageConfig::default()).unwrap(),
    );
    ctrl.init(PageSnapshot::default());
    ctrl.on_theme_toggle();
    assert_eq!(host.attribute(Node::ThemeToggle, "aria-label"), None);
    assert!(host.has_class(Node::Root, "dark"));
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = PageConfig {
        storage_key: String::new(),
        ..PageConfig::default()
    };
    let err = PageController::new(Rc::new(RecordingHost::new()), MemoryStore::new(), cfg)
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "storage_key must not be empty");
}

/// Host relying on every provided default.
struct SilentHost;

impl Host for SilentHost {
    type BlockKey = String;

    fn apply(&self, _mutations: &[Mutation], _blocks: &WiringRegistry<String>) {}

    fn write_clipboard(&self, _text: String, done: ClipboardDone) {
        done(Ok(()));
    }

    fn schedule(&self, _delay_ms: u32, task: Task) {
        task();
    }

    fn highlight_all(&self) {}
}

#[test]
fn host_without_theme_listener_still_toggles() {
    let ctrl = PageController::new(Rc::new(SilentHost), MemoryStore::new(), PageConfig::default())
        .unwrap();
    ctrl.init(PageSnapshot::default());
    assert_eq!(ctrl.on_theme_toggle(), Theme::Dark);
    assert_eq!(ctrl.preferences().store().value("theme").as_deref(), Some("dark"));
}
