//! The page behavior controller.
//!
//! Owns the theme state and the persistence slot, the code block wiring
//! registry and the table-of-contents link list. Everything else is read
//! from the page at event time and handed in as snapshots.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use crate::active_section::{ActiveSections, IntersectionEntry};
use crate::code_block::{self, ClipboardError, CopyState, LanguageMatcher};
use crate::config::{ConfigError, PageConfig};
use crate::mutation::{BlockId, Host, Mutation};
use crate::prefs::{PreferenceStore, ThemePreferences};
use crate::registry::{Registration, WiringRegistry};
use crate::sidebar::{self, SidebarEvent, SidebarState};
use crate::theme::{self, Theme, ThemeAsset, ThemeChange, ThemeSource};

/// Page state read once at page-ready.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    /// Platform reports a dark color-scheme preference.
    pub prefers_dark: bool,
    /// Document element already carries the dark marker.
    pub marker_dark: bool,
    pub theme_assets: Vec<ThemeAsset>,
    /// `href` of every sidebar link, in document order.
    pub link_hrefs: Vec<String>,
}

/// A code block as found on one setup pass.
#[derive(Debug, Clone)]
pub struct BlockSnapshot<K> {
    pub key: K,
    /// Class attribute of the block's `code` element.
    pub code_class: String,
    /// Text of the existing copy button, `None` when there is none.
    pub button_text: Option<String>,
}

pub struct PageController<H: Host, S> {
    host: Rc<H>,
    prefs: ThemePreferences<S>,
    config: PageConfig,
    matcher: LanguageMatcher,
    theme: Cell<Theme>,
    assets: RefCell<Vec<ThemeAsset>>,
    sections: RefCell<ActiveSections>,
    blocks: RefCell<WiringRegistry<H::BlockKey>>,
}

impl<H: Host, S: PreferenceStore + 'static> PageController<H, S> {
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(host: Rc<H>, store: S, config: PageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let matcher = LanguageMatcher::new(&config.language_prefix)?;
        Ok(Self {
            host,
            prefs: ThemePreferences::new(store, config.storage_key.clone()),
            config,
            matcher,
            theme: Cell::new(Theme::Light),
            assets: RefCell::new(Vec::new()),
            sections: RefCell::new(ActiveSections::default()),
            blocks: RefCell::new(WiringRegistry::new()),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub const fn preferences(&self) -> &ThemePreferences<S> {
        &self.prefs
    }

    /// Establish the initial theme and capture page structure.
    ///
    /// The document marker may already be set by an early inline script;
    /// the persisted preference wins when the two disagree.
    pub fn init(&self, snapshot: PageSnapshot) -> Theme {
        let theme = self.prefs.load(snapshot.prefers_dark);
        if Theme::from_dark(snapshot.marker_dark) != theme {
            log::debug!("Document marker disagrees with resolved theme {theme}; re-applying");
        }
        *self.assets.borrow_mut() = snapshot.theme_assets;
        *self.sections.borrow_mut() = ActiveSections::new(snapshot.link_hrefs);
        self.theme.set(theme);
        self.present(theme, ThemeSource::Initial);
        theme
    }

    /// Flip the theme, persist it and refresh everything that depends on it.
    pub fn on_theme_toggle(&self) -> Theme {
        let next = self.theme.get().opposite();
        self.theme.set(next);
        self.prefs.persist(next);
        self.present(next, ThemeSource::Manual);
        next
    }

    /// Follow a platform preference change while nothing is persisted.
    pub fn on_system_preference(&self, prefers_dark: bool) -> Option<Theme> {
        if self.prefs.stored().is_some() {
            return None;
        }
        let next = Theme::from_dark(prefers_dark);
        if next == self.theme.get() {
            return None;
        }
        self.theme.set(next);
        self.present(next, ThemeSource::System);
        Some(next)
    }

    fn present(&self, theme: Theme, source: ThemeSource) {
        let mutations = theme::render(theme, &self.config, &self.assets.borrow());
        self.apply(&mutations);
        self.host.theme_changed(ThemeChange { theme, source });
        let host = Rc::clone(&self.host);
        self.host.schedule(
            self.config.highlight_delay_ms,
            Box::new(move || host.highlight_all()),
        );
    }

    pub fn on_sidebar(&self, observed: SidebarState, event: SidebarEvent) -> SidebarState {
        let next = sidebar::transition(observed, event, &self.config);
        if next != observed || event == SidebarEvent::Dismiss {
            self.apply(&sidebar::render(next, &self.config));
        }
        next
    }

    /// Tag languages on every block and wire copy buttons on blocks seen
    /// for the first time. Returns the newly wired blocks, which are the
    /// only ones that need a click listener.
    pub fn setup_code_blocks(&self, blocks: Vec<BlockSnapshot<H::BlockKey>>) -> Vec<BlockId> {
        let mut mutations = Vec::new();
        let mut wired = Vec::new();
        {
            let mut registry = self.blocks.borrow_mut();
            for BlockSnapshot {
                key,
                code_class,
                button_text,
            } in blocks
            {
                let registration = registry.register(key);
                let id = registration.id();
                mutations.extend(code_block::enhance(id, &code_class, &self.matcher));
                if let Registration::New(id) = registration {
                    mutations.extend(code_block::prepare_button(
                        id,
                        button_text.as_deref(),
                        &self.config,
                    ));
                    wired.push(id);
                }
            }
        }
        self.apply(&mutations);
        if !wired.is_empty() {
            log::debug!(
                "Wired {} new code block(s), {} total",
                wired.len(),
                self.blocks.borrow().len()
            );
        }
        wired
    }

    /// Registered key for a wired block.
    pub fn block(&self, id: BlockId) -> Option<Ref<'_, H::BlockKey>> {
        Ref::filter_map(self.blocks.borrow(), |reg| reg.get(id)).ok()
    }

    #[must_use]
    pub fn wired_blocks(&self) -> usize {
        self.blocks.borrow().len()
    }

    /// Forget blocks that are no longer on the page, e.g. containers the
    /// highlighter replaced. Returns how many were released.
    pub fn release_blocks<F>(&self, still_present: F) -> usize
    where
        F: FnMut(&H::BlockKey) -> bool,
    {
        let released = self.blocks.borrow_mut().release_unless(still_present);
        if released > 0 {
            log::debug!("Released {released} detached code block(s)");
        }
        released
    }

    /// Copy a block's rendered text and show the outcome on its button.
    pub fn on_copy(self: &Rc<Self>, block: BlockId, text: String) {
        let this = Rc::clone(self);
        self.host.write_clipboard(
            text,
            Box::new(move |outcome| this.copy_settled(block, outcome)),
        );
    }

    fn copy_settled(self: &Rc<Self>, block: BlockId, outcome: Result<(), ClipboardError>) {
        if let Err(err) = &outcome {
            log::error!("Failed to copy text: {err}");
        }
        let state = CopyState::from_outcome(&outcome);
        self.apply(&code_block::render_copy(block, state, &self.config));
        let this = Rc::clone(self);
        self.host.schedule(
            self.config.copy_revert_ms,
            Box::new(move || {
                this.apply(&code_block::render_copy(
                    block,
                    CopyState::Resting,
                    &this.config,
                ));
            }),
        );
    }

    /// Mark the sidebar link for the current section. Returns the link left
    /// active by this batch, if any.
    pub fn on_intersections(&self, entries: &[IntersectionEntry]) -> Option<usize> {
        let sections = self.sections.borrow();
        let mutations = sections.react(entries, &self.config);
        if !mutations.is_empty() {
            self.apply(&mutations);
        }
        sections.active_link(entries)
    }

    fn apply(&self, mutations: &[Mutation]) {
        self.host.apply(mutations, &self.blocks.borrow());
    }
}
