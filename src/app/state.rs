//! Application state: tabs, their view modes and the shared UI slots.
//!
//! [`Tab`] owns the mode exclusivity invariant. Every mode or translation
//! change bumps the tab's generation, which is what makes responses to older
//! requests recognisable as stale.
//!
//! # State Components
//!
//! - **Tabs**: One [`Tab`] per open verse list, plus the selected index
//! - **Catalog**: Book registry and verse-count table of the active translation
//! - **Popover**: The single open menu slot
//! - **Tag menu**: Global tag checkbox list with its filter
//!
//! # Example
//!
//! ```rust
//! use versenav::app::AppState;
//! use versenav::domain::SelectedBook;
//! use versenav::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! state.add_tab("tab-1", "KJV");
//!
//! let tab = state.current_tab_mut().unwrap();
//! let before = tab.generation();
//! tab.set_book(SelectedBook::new("Gen", "Genesis"));
//! assert!(tab.generation() > before);
//! ```

use super::modes::{ActivePopover, ViewMode};
use crate::domain::{BookRegistry, Result, SelectedBook};
use crate::navigation::{self, NavigationContext, NavigationPane, VerseCountTable};
use crate::overlay::OverlayPositioner;
use crate::tags::{TagMenu, TagSelection};
use crate::worker::RequestOrigin;
use crate::Config;

/// One verse list tab.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    id: String,
    translation_id: String,
    view: ViewMode,
    generation: u64,
    navigation: NavigationPane,
    /// Book ids of the rendered verse collection, in presentation order.
    rendered_book_ids: Vec<i64>,
    /// Most recently picked book still waiting for its catalog check.
    pending_book: Option<SelectedBook>,
}

impl Tab {
    #[must_use]
    pub fn new(id: impl Into<String>, translation_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            translation_id: translation_id.into(),
            view: ViewMode::Empty,
            generation: 0,
            navigation: NavigationPane::new(),
            rendered_book_ids: Vec::new(),
            pending_book: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn translation_id(&self) -> &str {
        &self.translation_id
    }

    #[must_use]
    pub const fn view(&self) -> &ViewMode {
        &self.view
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn navigation(&self) -> &NavigationPane {
        &self.navigation
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationPane {
        &mut self.navigation
    }

    #[must_use]
    pub fn rendered_book_ids(&self) -> &[i64] {
        &self.rendered_book_ids
    }

    /// Identity of a request issued for the tab's current state.
    #[must_use]
    pub fn origin(&self) -> RequestOrigin {
        RequestOrigin::new(self.id.clone(), self.generation)
    }

    /// Whether a response for `origin` still applies to this tab.
    #[must_use]
    pub fn accepts(&self, origin: &RequestOrigin) -> bool {
        origin.tab_id == self.id && origin.generation == self.generation
    }

    /// Records `book` as the outstanding pick and returns the origin its
    /// catalog check is issued for. An earlier pick still in flight is
    /// superseded.
    pub fn request_book_check(&mut self, book: SelectedBook) -> RequestOrigin {
        if let Some(previous) = self.pending_book.replace(book) {
            tracing::debug!(tab_id = %self.id, book = %previous.code, "book check superseded");
        }
        self.origin()
    }

    /// Whether a catalog check for `book` answers the tab's latest pick.
    #[must_use]
    pub fn awaits_book(&self, origin: &RequestOrigin, book: &SelectedBook) -> bool {
        self.accepts(origin) && self.pending_book.as_ref() == Some(book)
    }

    /// Drops the outstanding pick after its check was answered.
    pub fn finish_book_check(&mut self) {
        self.pending_book = None;
    }

    fn transition(&mut self, view: ViewMode) {
        self.generation += 1;
        self.pending_book = None;
        self.rendered_book_ids.clear();
        tracing::debug!(
            tab_id = %self.id,
            from = self.view.name(),
            to = view.name(),
            generation = self.generation,
            "tab mode changed"
        );
        self.view = view;
    }

    /// Switches to book mode. Any tag selection is dropped.
    ///
    /// Callers confirm the book exists in the translation first.
    pub fn set_book(&mut self, book: SelectedBook) {
        self.transition(ViewMode::Book(book));
    }

    /// Switches to tag-collection mode. Any selected book is dropped.
    pub fn select_tags(&mut self, selection: TagSelection) {
        self.transition(ViewMode::TagCollection(selection));
    }

    /// Switches to tag-collection mode from parallel id and title lists.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BrowserError::InconsistentSelection`] when the lists
    /// differ in length; the tab is left unchanged.
    pub fn set_tag_selection(&mut self, ids: &[i64], titles: &[String]) -> Result<()> {
        let selection = TagSelection::from_lists(ids, titles)?;
        self.select_tags(selection);
        Ok(())
    }

    /// Switches to the empty mode.
    pub fn clear(&mut self) {
        self.transition(ViewMode::Empty);
    }

    /// Renames a tag inside the current selection without changing the mode.
    pub fn rename_tag(&mut self, old_title: &str, new_title: &str) -> bool {
        match &mut self.view {
            ViewMode::TagCollection(selection) => selection.rename_tag(old_title, new_title),
            _ => false,
        }
    }

    /// Changes the translation. Outstanding requests become stale.
    pub fn change_translation(&mut self, translation_id: impl Into<String>) {
        self.translation_id = translation_id.into();
        self.generation += 1;
        tracing::debug!(
            tab_id = %self.id,
            translation_id = %self.translation_id,
            generation = self.generation,
            "tab translation changed"
        );
    }

    /// Records the rendered book order reported by the text loader.
    pub fn set_rendered_book_ids(&mut self, book_ids: Vec<i64>) {
        self.rendered_book_ids = book_ids;
    }

    /// Rebuilds the navigation index from the tab's mode.
    pub fn rebuild_navigation(&mut self, verse_counts: &VerseCountTable, registry: &BookRegistry) {
        let context = NavigationContext::new(verse_counts, registry, &self.rendered_book_ids);
        let items = navigation::build(&self.view, &context);
        self.navigation.rebuild(items);
    }
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub tabs: Vec<Tab>,

    /// Index of the selected tab within `tabs`.
    pub selected: usize,

    pub registry: BookRegistry,

    pub verse_counts: VerseCountTable,

    /// The single open popover menu.
    pub popover: ActivePopover,

    pub tag_menu: TagMenu,

    /// Whether the book tag statistics button is enabled.
    pub book_statistics_enabled: bool,

    /// Width of the tag list panel restored from settings.
    pub tag_list_width: Option<u32>,

    pub positioner: OverlayPositioner,

    pub reference_separator: char,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            tabs: Vec::new(),
            selected: 0,
            registry: BookRegistry::default(),
            verse_counts: VerseCountTable::default(),
            popover: ActivePopover::default(),
            tag_menu: TagMenu::new(config.tag_filter_debounce_ms),
            book_statistics_enabled: false,
            tag_list_width: None,
            positioner: config.positioner(),
            reference_separator: config.reference_separator,
        }
    }

    /// Adds a tab and selects it.
    pub fn add_tab(&mut self, id: impl Into<String>, translation_id: impl Into<String>) {
        self.tabs.push(Tab::new(id, translation_id));
        self.selected = self.tabs.len() - 1;
    }

    /// Selects the tab at `index`. Returns `false` for an unknown index.
    pub fn select_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.selected = index;
        true
    }

    /// Removes the tab at `index`, keeping a valid selection.
    pub fn remove_tab(&mut self, index: usize) -> Option<Tab> {
        if index >= self.tabs.len() {
            return None;
        }
        let tab = self.tabs.remove(index);
        if self.selected > index || self.selected >= self.tabs.len() {
            self.selected = self.selected.saturating_sub(1);
        }
        Some(tab)
    }

    #[must_use]
    pub fn current_tab(&self) -> Option<&Tab> {
        self.tabs.get(self.selected)
    }

    pub fn current_tab_mut(&mut self) -> Option<&mut Tab> {
        self.tabs.get_mut(self.selected)
    }

    /// The tab a response for `origin` must be applied to, or `None` when the
    /// tab is gone or has moved on to a newer generation.
    pub fn tab_for_origin(&mut self, origin: &RequestOrigin) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.accepts(origin))
    }

    /// Rebuilds the navigation index of the tab with id `tab_id`.
    pub fn rebuild_navigation(&mut self, tab_id: &str) {
        let Self {
            tabs,
            verse_counts,
            registry,
            ..
        } = self;
        if let Some(tab) = tabs.iter_mut().find(|tab| tab.id == tab_id) {
            tab.rebuild_navigation(verse_counts, registry);
        }
    }

    /// Tag selection of the current tab, if it is in tag-collection mode.
    #[must_use]
    pub fn current_tag_selection(&self) -> Option<&TagSelection> {
        self.current_tab().and_then(|tab| tab.view().tag_selection())
    }

    /// Re-derives the checked rows of the tag menu from the current tab.
    pub fn sync_tag_menu(&mut self) {
        let selection = self.tabs.get(self.selected).and_then(|tab| tab.view.tag_selection());
        self.tag_menu.sync_checked(selection);
    }
}
