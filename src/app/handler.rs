//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single synchronous entry point for UI events and
//! worker responses. It mutates [`AppState`] and returns the side effects the
//! host has to execute, together with a flag telling whether a re-render is
//! needed.
//!
//! # Event Types
//!
//! - **Tabs**: `TabAdded`, `TabSelected`, `TabRemoved`, `TranslationChanged`
//! - **Mode**: `BookSelected`, `TagSelectionChanged`, `TagSelectionRestored`,
//!   `ClearSelection`
//! - **Navigation**: `NavigateToChapter`, `NavigateToBook`, `JumpToReference`,
//!   `VerseHovered`, `SearchResults`, `SearchReset`
//! - **Popovers**: `ToggleBookMenu`, `ToggleTagMenu`, `ToggleDisplayMenu`, `BodyClick`
//! - **Tag menu**: `TagFilterInput`, `Tick`, `TagAssignmentCountChanged`, `TagRenamed`
//! - **Overlays and export**: `TagReferenceClicked`, `ExportRequested`
//! - **Worker**: `WorkerResponse` with typed response variants
//!
//! Responses to tab-scoped requests are only applied while the tab's
//! generation still matches the one the request was issued for. Anything else
//! is a stale response: traced at debug level and otherwise ignored.

use crate::app::modes::PopoverKind;
use crate::app::{Action, AppState, ViewMode};
use crate::domain::{
    parse_reference, BibleBook, BookRegistry, BrowserError, Result, SelectedBook, TagEntry,
    TagInfo, VerseLocation, VerseRecord,
};
use crate::export::DocumentExporter;
use crate::navigation::VerseCountTable;
use crate::overlay::BoxRect;
use crate::tags::TagSelection;
use crate::worker::{RequestOrigin, WorkerMessage, WorkerResponse};
use serde_json::json;

/// Title prefix of the tag reference box.
pub const TAG_REFERENCE_TITLE: &str = "Tagged verses for";

/// Events triggered by user input, the host, or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Books and chapter verse counts of the active translation are available.
    CatalogLoaded {
        books: Vec<BibleBook>,
        verse_counts: VerseCountTable,
    },

    /// A tab was opened; it becomes the selected tab.
    TabAdded { id: String, translation_id: String },
    TabSelected { index: usize },
    TabRemoved { index: usize },

    /// The current tab switched to another translation.
    TranslationChanged { translation_id: String },

    /// A book was picked in the book menu. Applied once the catalog confirms it.
    BookSelected { code: String, title: String },

    /// The checked tag checkboxes changed; entries are in rendering order.
    TagSelectionChanged(Vec<TagEntry>),

    /// A persisted tag selection is re-applied to the current tab.
    TagSelectionRestored {
        id_list: Vec<i64>,
        title_list: Vec<String>,
    },

    /// The current tab goes back to showing nothing.
    ClearSelection,

    /// A chapter link of the navigation index was clicked.
    NavigateToChapter(u32),

    /// A book link of the navigation index was clicked.
    NavigateToBook {
        code: String,
        /// 1-based position of the link.
        number: usize,
    },

    /// Jump to a `chapter:verse` reference in the current book.
    JumpToReference(String),

    VerseHovered(VerseLocation),
    SearchResults(Vec<VerseLocation>),
    SearchReset,

    /// Menu buttons; each carries the button's bounding box.
    ToggleBookMenu(BoxRect),
    ToggleTagMenu(BoxRect),
    ToggleDisplayMenu(BoxRect),

    /// A click outside any popover.
    BodyClick,

    /// A keystroke in the tag search field.
    TagFilterInput { query: String, at_ms: u64 },

    /// Clock tick driving the coalesced tag filter.
    Tick { now_ms: u64 },

    TagAssignmentCountChanged { title: String, count: u32 },

    TagRenamed { old_title: String, new_title: String },

    /// A tag label inside a verse box was clicked.
    TagReferenceClicked {
        tag_title: String,
        /// Global tags of the verse the label belongs to.
        verse_tags: Vec<TagEntry>,
        reference_box: BoxRect,
        /// Box of the following verse, `None` for the last verse.
        next_box: Option<BoxRect>,
        list_viewport: BoxRect,
        window_width: f64,
    },

    /// The tag list panel was resized.
    TagListResized { width: u32 },

    ExportRequested,

    /// Wraps a response from the worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Errors
///
/// - [`BrowserError::InvalidBook`] when a selected book is missing from the
///   tab's translation; the tab is left unchanged.
/// - [`BrowserError::InconsistentSelection`] when a restored tag selection has
///   id and title lists of different lengths; the tab is left unchanged.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::CatalogLoaded {
            books,
            verse_counts,
        } => {
            tracing::debug!(book_count = books.len(), "catalog loaded");
            state.registry = BookRegistry::new(books.clone());
            state.verse_counts = verse_counts.clone();

            let tab_ids: Vec<String> = state.tabs.iter().map(|t| t.id().to_string()).collect();
            for tab_id in &tab_ids {
                state.rebuild_navigation(tab_id);
            }
            Ok((true, vec![]))
        }
        Event::TabAdded { id, translation_id } => {
            state.add_tab(id.clone(), translation_id.clone());
            state.sync_tag_menu();
            Ok((true, vec![]))
        }
        Event::TabSelected { index } => handle_tab_selected(state, *index),
        Event::TabRemoved { index } => {
            if state.remove_tab(*index).is_none() {
                tracing::debug!(index, "no tab to remove");
                return Ok((false, vec![]));
            }
            state.sync_tag_menu();
            Ok((true, vec![]))
        }
        Event::TranslationChanged { translation_id } => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            tab.change_translation(translation_id.clone());

            if tab.view().is_empty() {
                tracing::debug!("empty tab, skipping text update");
                return Ok((true, vec![]));
            }

            let actions = load_text_for(tab.origin(), tab.view(), false)
                .into_iter()
                .collect();
            Ok((true, actions))
        }
        Event::BookSelected { code, title } => {
            let Some(tab) = state.current_tab_mut() else {
                tracing::debug!("no tab to select a book in");
                return Ok((false, vec![]));
            };

            let book = SelectedBook::new(code.clone(), title.clone());
            let origin = tab.request_book_check(book.clone());
            Ok((
                false,
                vec![Action::PostToWorker(WorkerMessage::check_book(
                    origin,
                    tab.translation_id().to_string(),
                    book,
                ))],
            ))
        }
        Event::TagSelectionChanged(checked) => handle_tag_selection_changed(state, checked),
        Event::TagSelectionRestored {
            id_list,
            title_list,
        } => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            tab.set_tag_selection(id_list, title_list)?;

            let mut actions: Vec<Action> = load_text_for(tab.origin(), tab.view(), true)
                .into_iter()
                .collect();
            let tab_id = tab.id().to_string();

            state.rebuild_navigation(&tab_id);
            state.sync_tag_menu();
            disable_book_statistics(state, &mut actions);
            Ok((true, actions))
        }
        Event::ClearSelection => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            tab.clear();
            let tab_id = tab.id().to_string();

            state.rebuild_navigation(&tab_id);
            state.sync_tag_menu();

            let mut actions = vec![
                persist("selected_book", serde_json::Value::Null),
                persist("selected_tags", serde_json::Value::Null),
            ];
            disable_book_statistics(state, &mut actions);
            Ok((true, actions))
        }
        Event::NavigateToChapter(chapter) => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            tab.navigation_mut().highlight(*chapter as usize);

            let action = if *chapter > 1 {
                Action::ScrollTo {
                    anchor: format!("{} {chapter}:1", tab.id()),
                }
            } else {
                Action::ScrollToTop {
                    tab_id: tab.id().to_string(),
                }
            };
            Ok((true, vec![action]))
        }
        Event::NavigateToBook { code, number } => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            tab.navigation_mut().highlight(*number);

            Ok((
                true,
                vec![Action::ScrollTo {
                    anchor: format!("{} {code}", tab.id()),
                }],
            ))
        }
        Event::JumpToReference(reference) => {
            let separator = state.reference_separator;
            let Some((chapter, verse)) = parse_reference(reference, separator) else {
                tracing::debug!(reference = %reference, "unparseable reference, skipping jump");
                return Ok((false, vec![]));
            };
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };

            let action = if chapter == 1 && verse < 5 {
                Action::ScrollToTop {
                    tab_id: tab.id().to_string(),
                }
            } else {
                Action::ScrollTo {
                    anchor: format!("{} {chapter}:{verse}", tab.id()),
                }
            };
            tab.navigation_mut().highlight(chapter as usize);
            Ok((true, vec![action]))
        }
        Event::VerseHovered(location) => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            let Some(index) = navigation_index_for(tab.view(), tab.navigation(), location) else {
                tracing::trace!(book = %location.book_code, "hovered verse has no navigation item");
                return Ok((false, vec![]));
            };
            let changed = tab.navigation_mut().highlight(index);
            Ok((changed, vec![]))
        }
        Event::SearchResults(locations) => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            let indices: Vec<usize> = locations
                .iter()
                .filter_map(|location| navigation_index_for(tab.view(), tab.navigation(), location))
                .collect();

            let mut changed = false;
            for index in indices {
                changed |= tab.navigation_mut().highlight_search_result(index);
            }
            tracing::debug!(hits = locations.len(), "search results highlighted");
            Ok((changed, vec![]))
        }
        Event::SearchReset => {
            let Some(tab) = state.current_tab_mut() else {
                return Ok((false, vec![]));
            };
            tab.navigation_mut().clear_search_results();
            Ok((true, vec![]))
        }
        Event::ToggleBookMenu(button) => Ok(toggle_popover(state, PopoverKind::BookMenu, button)),
        Event::ToggleTagMenu(button) => Ok(toggle_popover(state, PopoverKind::TagMenu, button)),
        Event::ToggleDisplayMenu(button) => {
            Ok(toggle_popover(state, PopoverKind::DisplayMenu, button))
        }
        Event::BodyClick => Ok((state.popover.close(), vec![])),
        Event::TagFilterInput { query, at_ms } => {
            tracing::trace!(query = %query, at_ms, "tag filter scheduled");
            state.tag_menu.schedule_filter(query, *at_ms);
            Ok((false, vec![]))
        }
        Event::Tick { now_ms } => Ok((state.tag_menu.tick(*now_ms), vec![])),
        Event::TagAssignmentCountChanged { title, count } => {
            let changed = state.tag_menu.update_assignment_count(title, *count);
            if !changed {
                tracing::debug!(title = %title, "no menu entry for tag");
            }
            Ok((changed, vec![]))
        }
        Event::TagRenamed {
            old_title,
            new_title,
        } => {
            state.tag_menu.rename(old_title, new_title);

            let mut actions = vec![];
            if let Some(tab) = state.current_tab_mut() {
                if tab.rename_tag(old_title, new_title) {
                    if let Some(selection) = tab.view().tag_selection() {
                        actions.push(persist_tag_selection(selection));
                    }
                }
            }
            Ok((true, actions))
        }
        Event::TagReferenceClicked {
            tag_title,
            verse_tags,
            reference_box,
            next_box,
            list_viewport,
            window_width,
        } => {
            let Some(tag_id) = verse_tags
                .iter()
                .find(|tag| &tag.title == tag_title)
                .map(|tag| tag.id)
            else {
                tracing::debug!(tag_title = %tag_title, "clicked tag not found on verse, skipping");
                return Ok((false, vec![]));
            };
            let Some(tab) = state.current_tab() else {
                return Ok((false, vec![]));
            };

            let position = state.positioner.place(
                reference_box,
                next_box.as_ref(),
                list_viewport,
                *window_width,
            );

            Ok((
                true,
                vec![
                    Action::PostToWorker(WorkerMessage::load_tag_reference_verses(
                        tab.id().to_string(),
                        tag_id,
                    )),
                    Action::OpenTagReferenceBox {
                        title: format!("{TAG_REFERENCE_TITLE} \"{tag_title}\""),
                        position,
                    },
                ],
            ))
        }
        Event::TagListResized { width } => {
            state.tag_list_width = Some(*width);
            Ok((false, vec![persist("tag_list_width", json!(width))]))
        }
        Event::ExportRequested => {
            let Some(tab) = state.current_tab() else {
                return Ok((false, vec![]));
            };
            match tab.view().tag_selection() {
                Some(selection) if !selection.is_empty() => Ok((
                    false,
                    vec![Action::PostToWorker(WorkerMessage::load_export_data(
                        tab.origin(),
                        selection.id_list(),
                    ))],
                )),
                _ => {
                    tracing::debug!(mode = tab.view().name(), "nothing to export");
                    Ok((false, vec![]))
                }
            }
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn handle_tab_selected(state: &mut AppState, index: usize) -> Result<(bool, Vec<Action>)> {
    if !state.select_tab(index) {
        tracing::debug!(index, "unknown tab selected");
        return Ok((false, vec![]));
    }
    state.sync_tag_menu();

    let mut actions = vec![];
    let Some(tab) = state.current_tab() else {
        return Ok((true, actions));
    };

    match tab.view() {
        ViewMode::TagCollection(selection) if !selection.is_empty() => {
            actions.push(Action::PostToWorker(WorkerMessage::list_tags_for_menu()));
        }
        _ => {}
    }

    if tab.view().selected_book().is_some() {
        actions.push(Action::PostToWorker(WorkerMessage::count_tags(tab.origin())));
    } else {
        disable_book_statistics(state, &mut actions);
    }

    Ok((true, actions))
}

fn handle_tag_selection_changed(
    state: &mut AppState,
    checked: &[TagEntry],
) -> Result<(bool, Vec<Action>)> {
    let Some(tab) = state.current_tab_mut() else {
        tracing::debug!("no tab to show tags in");
        return Ok((false, vec![]));
    };

    let selection = TagSelection::from_checked(checked);
    let mut actions = vec![
        persist_tag_selection(&selection),
        persist("selected_book", serde_json::Value::Null),
    ];

    tab.select_tags(selection);
    actions.extend(load_text_for(tab.origin(), tab.view(), true));
    let tab_id = tab.id().to_string();

    state.rebuild_navigation(&tab_id);
    state.sync_tag_menu();
    disable_book_statistics(state, &mut actions);

    Ok((true, actions))
}

#[allow(clippy::too_many_lines)]
fn handle_worker_response(
    state: &mut AppState,
    response: &WorkerResponse,
) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::BookChecked {
            origin,
            book,
            available,
        } => {
            let is_current = state.current_tab().is_some_and(|tab| tab.id() == origin.tab_id);
            let Some(tab) = state
                .tab_for_origin(origin)
                .filter(|tab| tab.awaits_book(origin, book))
            else {
                return Ok(stale_response(origin));
            };
            tab.finish_book_check();
            if !available {
                tracing::debug!(book = %book.code, translation_id = %tab.translation_id(), "book not in translation");
                return Err(BrowserError::InvalidBook {
                    code: book.code.clone(),
                });
            }

            tab.set_book(book.clone());
            let new_origin = tab.origin();
            let load = load_text_for(new_origin.clone(), tab.view(), true);

            state.rebuild_navigation(&new_origin.tab_id);
            let mut actions = Vec::new();
            if is_current {
                state.popover.close();
                state.sync_tag_menu();
                actions.push(persist(
                    "selected_book",
                    json!({ "code": book.code, "name": book.title }),
                ));
                actions.push(persist("selected_tags", serde_json::Value::Null));
            } else {
                tracing::debug!(tab_id = %new_origin.tab_id, "book applied to background tab");
            }
            actions.extend(load);
            actions.push(Action::PostToWorker(WorkerMessage::count_tags(new_origin)));
            Ok((true, actions))
        }
        WorkerResponse::TextLoaded {
            origin,
            rendered_book_ids,
            ..
        } => {
            let Some(tab) = state.tab_for_origin(origin) else {
                return Ok(stale_response(origin));
            };
            tab.set_rendered_book_ids(rendered_book_ids.clone());
            state.rebuild_navigation(&origin.tab_id);
            Ok((true, vec![]))
        }
        WorkerResponse::TagCount { origin, count } => {
            let is_current = state.current_tab().is_some_and(|tab| tab.accepts(origin));
            if !is_current {
                return Ok(stale_response(origin));
            }

            let enabled = *count > 0;
            state.book_statistics_enabled = enabled;
            Ok((true, vec![Action::SetBookStatisticsButton { enabled }]))
        }
        WorkerResponse::TagsForMenuLoaded { tags } => {
            load_tag_menu(state, tags);
            Ok((true, vec![]))
        }
        WorkerResponse::TagReferenceVersesLoaded { markup } => Ok((
            true,
            vec![Action::ShowTagReferenceVerses {
                markup: markup.clone(),
            }],
        )),
        WorkerResponse::ExportDataLoaded {
            origin,
            books,
            verses,
        } => {
            let separator = state.reference_separator;
            let Some(tab) = state.tab_for_origin(origin) else {
                return Ok(stale_response(origin));
            };
            let Some(selection) = tab.view().tag_selection() else {
                return Ok(stale_response(origin));
            };

            let document = render_export(separator, &selection.display_titles(), books, verses);
            Ok((false, vec![Action::WriteExport(document)]))
        }
        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            Ok((false, vec![]))
        }
    }
}

fn render_export(
    separator: char,
    tag_titles: &str,
    books: &[BibleBook],
    verses: &[VerseRecord],
) -> crate::export::ExportDocument {
    let mut books = books.to_vec();
    books.sort_by_key(|book| book.position);
    let mut verses = verses.to_vec();
    verses.sort_by_key(|verse| verse.absolute_verse_nr);

    DocumentExporter::new(separator).render(tag_titles, &books, &verses)
}

fn load_tag_menu(state: &mut AppState, tags: &[TagInfo]) {
    let selection = state
        .tabs
        .get(state.selected)
        .and_then(|tab| tab.view().tag_selection());
    state.tag_menu.load(tags, selection);
}

/// Maps a verse to the 1-based navigation item it belongs to.
fn navigation_index_for(
    view: &ViewMode,
    navigation: &crate::navigation::NavigationPane,
    location: &VerseLocation,
) -> Option<usize> {
    match view {
        ViewMode::Book(_) => Some(location.chapter as usize),
        ViewMode::TagCollection(_) => navigation.book_position(&location.book_code),
        ViewMode::Empty => None,
    }
}

/// Text request for the tab's current mode; `None` when there is nothing to load.
fn load_text_for(origin: RequestOrigin, view: &ViewMode, reset_view: bool) -> Option<Action> {
    let message = match view {
        ViewMode::Empty => return None,
        ViewMode::Book(book) => {
            WorkerMessage::load_text(origin, Some(book.code.clone()), None, reset_view)
        }
        ViewMode::TagCollection(selection) => {
            if selection.is_empty() {
                tracing::debug!("empty tag selection, skipping text request");
                return None;
            }
            WorkerMessage::load_text(origin, None, Some(selection.id_list()), reset_view)
        }
    };
    Some(Action::PostToWorker(message))
}

fn toggle_popover(state: &mut AppState, kind: PopoverKind, button: &BoxRect) -> (bool, Vec<Action>) {
    let position = state.positioner.menu_position(button);
    let opened = state.popover.toggle(kind, position);
    tracing::debug!(popover = ?kind, opened, "popover toggled");

    let mut actions = vec![];
    if opened && kind == PopoverKind::TagMenu && state.tag_menu.begin_population() {
        actions.push(Action::PostToWorker(WorkerMessage::list_tags_for_menu()));
    }
    (true, actions)
}

fn disable_book_statistics(state: &mut AppState, actions: &mut Vec<Action>) {
    if state.book_statistics_enabled {
        state.book_statistics_enabled = false;
        actions.push(Action::SetBookStatisticsButton { enabled: false });
    }
}

fn stale_response(origin: &RequestOrigin) -> (bool, Vec<Action>) {
    tracing::debug!(
        tab_id = %origin.tab_id,
        generation = origin.generation,
        "stale response ignored"
    );
    (false, vec![])
}

fn persist(path: &str, value: serde_json::Value) -> Action {
    Action::PersistSetting {
        path: path.to_string(),
        value,
    }
}

fn persist_tag_selection(selection: &TagSelection) -> Action {
    persist(
        "selected_tags",
        json!({
            "id_list": selection.id_list(),
            "title_list": selection.title_list(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::OverlayPosition;
    use crate::Config;
    use rstest::rstest;

    fn state() -> AppState {
        let mut state = AppState::new(&Config::default());
        handle_event(
            &mut state,
            &Event::CatalogLoaded {
                books: vec![
                    BibleBook::new(1, "Gen", "Genesis", 1),
                    BibleBook::new(19, "Psa", "Psalms", 19),
                    BibleBook::new(43, "John", "John", 43),
                ],
                verse_counts: VerseCountTable::from_chapters("Gen", &[31, 25, 24, 26]),
            },
        )
        .unwrap();
        handle_event(
            &mut state,
            &Event::TabAdded {
                id: "tab-1".into(),
                translation_id: "KJV".into(),
            },
        )
        .unwrap();
        state
    }

    fn origin(state: &AppState) -> RequestOrigin {
        state.current_tab().unwrap().origin()
    }

    fn pick_book(state: &mut AppState, code: &str, title: &str) -> RequestOrigin {
        handle_event(
            state,
            &Event::BookSelected {
                code: code.into(),
                title: title.into(),
            },
        )
        .unwrap();
        origin(state)
    }

    fn select_genesis(state: &mut AppState) -> Vec<Action> {
        let origin = pick_book(state, "Gen", "Genesis");
        let (_, actions) = handle_event(
            state,
            &Event::WorkerResponse(WorkerResponse::BookChecked {
                origin,
                book: SelectedBook::new("Gen", "Genesis"),
                available: true,
            }),
        )
        .unwrap();
        actions
    }

    fn select_tags(state: &mut AppState, entries: &[(i64, &str)]) -> Vec<Action> {
        let checked = entries
            .iter()
            .map(|(id, title)| TagEntry::new(*id, *title))
            .collect();
        handle_event(state, &Event::TagSelectionChanged(checked)).unwrap().1
    }

    fn posted(actions: &[Action]) -> Vec<WorkerMessage> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::PostToWorker(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_book_selection_is_checked_first() {
        let mut state = state();

        let (render, actions) = handle_event(
            &mut state,
            &Event::BookSelected {
                code: "Gen".into(),
                title: "Genesis".into(),
            },
        )
        .unwrap();

        assert!(!render);
        assert!(matches!(
            posted(&actions).as_slice(),
            [WorkerMessage::CheckBook { translation_id, .. }] if translation_id == "KJV"
        ));
        assert!(state.current_tab().unwrap().view().is_empty());
    }

    #[test]
    fn test_confirmed_book_switches_mode_and_requests_text() {
        let mut state = state();
        state.popover.toggle(PopoverKind::BookMenu, OverlayPosition::default());

        let actions = select_genesis(&mut state);

        let tab = state.current_tab().unwrap();
        assert_eq!(tab.view().selected_book().map(|b| b.code.as_str()), Some("Gen"));
        assert_eq!(tab.navigation().items().len(), 4);
        assert_eq!(state.popover.current(), None);
        assert!(actions.contains(&Action::PersistSetting {
            path: "selected_book".into(),
            value: json!({"code": "Gen", "name": "Genesis"}),
        }));
        assert!(actions.contains(&Action::PersistSetting {
            path: "selected_tags".into(),
            value: serde_json::Value::Null,
        }));
        assert!(posted(&actions).iter().any(|m| matches!(
            m,
            WorkerMessage::LoadText { book: Some(code), reset_view: true, .. } if code == "Gen"
        )));
    }

    #[test]
    fn test_unavailable_book_is_invalid_and_leaves_state() {
        let mut state = state();
        select_tags(&mut state, &[(1, "grace")]);
        let before = state.current_tab().cloned();
        let origin = pick_book(&mut state, "Tob", "Tobit");

        let err = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::BookChecked {
                origin,
                book: SelectedBook::new("Tob", "Tobit"),
                available: false,
            }),
        )
        .unwrap_err();

        assert!(matches!(err, BrowserError::InvalidBook { ref code } if code == "Tob"));
        assert_eq!(state.current_tab().cloned(), before);
    }

    fn book_checked(
        state: &mut AppState,
        origin: RequestOrigin,
        code: &str,
        title: &str,
    ) -> (bool, Vec<Action>) {
        handle_event(
            state,
            &Event::WorkerResponse(WorkerResponse::BookChecked {
                origin,
                book: SelectedBook::new(code, title),
                available: true,
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_last_of_two_quick_book_picks_wins() {
        let mut state = state();
        let first = pick_book(&mut state, "Gen", "Genesis");
        let second = pick_book(&mut state, "Psa", "Psalms");

        let (render, actions) = book_checked(&mut state, first, "Gen", "Genesis");
        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.current_tab().unwrap().view().is_empty());

        let (render, actions) = book_checked(&mut state, second, "Psa", "Psalms");
        assert!(render);
        assert_eq!(
            state.current_tab().unwrap().view().selected_book().map(|b| b.code.as_str()),
            Some("Psa")
        );
        assert!(actions.contains(&Action::PersistSetting {
            path: "selected_book".into(),
            value: json!({"code": "Psa", "name": "Psalms"}),
        }));
    }

    #[test]
    fn test_book_check_for_background_tab_does_not_touch_current_tab() {
        let mut state = state();
        let origin = pick_book(&mut state, "Gen", "Genesis");
        handle_event(
            &mut state,
            &Event::TabAdded {
                id: "tab-2".into(),
                translation_id: "KJV".into(),
            },
        )
        .unwrap();
        state.popover.toggle(PopoverKind::TagMenu, OverlayPosition::default());

        let (_, actions) = book_checked(&mut state, origin, "Gen", "Genesis");

        assert_eq!(
            state.tabs[0].view().selected_book().map(|b| b.code.as_str()),
            Some("Gen")
        );
        assert!(state.current_tab().unwrap().view().is_empty());
        assert!(state.popover.is_open(PopoverKind::TagMenu));
        assert!(!actions.iter().any(|a| matches!(a, Action::PersistSetting { .. })));
        assert!(posted(&actions).iter().any(|m| matches!(
            m,
            WorkerMessage::LoadText { origin, .. } if origin.tab_id == "tab-1"
        )));
    }

    #[test]
    fn test_stale_book_check_is_ignored() {
        let mut state = state();
        let stale = origin(&state);
        select_tags(&mut state, &[(1, "grace")]);

        let (render, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::BookChecked {
                origin: stale,
                book: SelectedBook::new("Gen", "Genesis"),
                available: true,
            }),
        )
        .unwrap();

        assert!(!render);
        assert!(actions.is_empty());
        assert!(state.current_tab().unwrap().view().tag_selection().is_some());
    }

    #[test]
    fn test_tag_selection_persists_and_requests_text() {
        let mut state = state();
        select_genesis(&mut state);

        let actions = select_tags(&mut state, &[(4, "hope"), (2, "grace")]);

        let tab = state.current_tab().unwrap();
        assert!(tab.view().selected_book().is_none());
        assert_eq!(tab.view().tag_selection().map(TagSelection::id_list), Some(vec![4, 2]));
        assert!(actions.contains(&Action::PersistSetting {
            path: "selected_tags".into(),
            value: json!({"id_list": [4, 2], "title_list": ["hope", "grace"]}),
        }));
        assert!(posted(&actions).iter().any(|m| matches!(
            m,
            WorkerMessage::LoadText { tag_ids: Some(ids), book: None, .. } if ids == &vec![4, 2]
        )));
    }

    #[test]
    fn test_empty_tag_selection_requests_no_text() {
        let mut state = state();

        let actions = select_tags(&mut state, &[]);

        assert!(posted(&actions).is_empty());
        assert!(state.current_tab().unwrap().view().tag_selection().is_some());
    }

    #[test]
    fn test_restored_selection_requests_text_without_persisting() {
        let mut state = state();

        let (_, actions) = handle_event(
            &mut state,
            &Event::TagSelectionRestored {
                id_list: vec![5],
                title_list: vec!["faith".into()],
            },
        )
        .unwrap();

        assert!(state.current_tag_selection().unwrap().is_selected("faith"));
        assert!(actions.iter().all(|a| !matches!(a, Action::PersistSetting { .. })));
        assert_eq!(posted(&actions).len(), 1);
    }

    #[test]
    fn test_inconsistent_restored_selection_leaves_tab() {
        let mut state = state();
        select_genesis(&mut state);
        let before = state.current_tab().cloned();

        let err = handle_event(
            &mut state,
            &Event::TagSelectionRestored {
                id_list: vec![1, 2],
                title_list: vec!["grace".into()],
            },
        )
        .unwrap_err();

        assert!(matches!(err, BrowserError::InconsistentSelection { ids: 2, titles: 1 }));
        assert_eq!(state.current_tab().cloned(), before);
    }

    #[test]
    fn test_text_loaded_rebuilds_book_navigation() {
        let mut state = state();
        select_tags(&mut state, &[(1, "grace")]);

        let event = Event::WorkerResponse(WorkerResponse::TextLoaded {
                origin: origin(&state),
                rendered_book_ids: vec![43, 43, 19],
                reset_view: true,
            });

        handle_event(&mut state, &event)
        .unwrap();

        let labels: Vec<String> = state
            .current_tab()
            .unwrap()
            .navigation()
            .items()
            .iter()
            .map(|i| i.label.clone())
            .collect();
        assert_eq!(labels, vec!["John", "Psalms"]);
    }

    #[test]
    fn test_stale_text_is_not_applied() {
        let mut state = state();
        select_tags(&mut state, &[(1, "grace")]);
        let stale = origin(&state);
        select_tags(&mut state, &[(2, "hope")]);

        let (render, _) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::TextLoaded {
                origin: stale,
                rendered_book_ids: vec![43],
                reset_view: true,
            }),
        )
        .unwrap();

        assert!(!render);
        assert!(state.current_tab().unwrap().navigation().items().is_empty());
    }

    #[rstest]
    #[case(1, Action::ScrollToTop { tab_id: "tab-1".into() })]
    #[case(3, Action::ScrollTo { anchor: "tab-1 3:1".into() })]
    fn test_navigate_to_chapter(#[case] chapter: u32, #[case] expected: Action) {
        let mut state = state();
        select_genesis(&mut state);

        let (_, actions) = handle_event(&mut state, &Event::NavigateToChapter(chapter)).unwrap();

        assert_eq!(actions, vec![expected]);
        let highlighted = state.current_tab().unwrap().navigation().highlighted().map(|i| i.index);
        assert_eq!(highlighted, Some(chapter as usize));
    }

    #[rstest]
    #[case("1:4", Action::ScrollToTop { tab_id: "tab-1".into() }, Some(1))]
    #[case("1:5", Action::ScrollTo { anchor: "tab-1 1:5".into() }, Some(1))]
    #[case("3:16", Action::ScrollTo { anchor: "tab-1 3:16".into() }, Some(3))]
    #[case("9:1", Action::ScrollTo { anchor: "tab-1 9:1".into() }, None)]
    fn test_jump_to_reference(
        #[case] reference: &str,
        #[case] expected: Action,
        #[case] highlighted: Option<usize>,
    ) {
        let mut state = state();
        select_genesis(&mut state);

        let (_, actions) =
            handle_event(&mut state, &Event::JumpToReference(reference.into())).unwrap();

        assert_eq!(actions, vec![expected]);
        let current = state.current_tab().unwrap().navigation().highlighted().map(|i| i.index);
        assert_eq!(current, highlighted);
    }

    #[test]
    fn test_navigate_to_book() {
        let mut state = state();
        select_tags(&mut state, &[(1, "grace")]);

        let (_, actions) = handle_event(
            &mut state,
            &Event::NavigateToBook {
                code: "John".into(),
                number: 2,
            },
        )
        .unwrap();

        assert_eq!(actions, vec![Action::ScrollTo { anchor: "tab-1 John".into() }]);
    }

    #[test]
    fn test_hover_in_tag_mode_uses_navigation_items() {
        let mut state = state();
        select_tags(&mut state, &[(1, "grace")]);
        let event = Event::WorkerResponse(WorkerResponse::TextLoaded {
                origin: origin(&state),
                rendered_book_ids: vec![19, 43],
                reset_view: false,
            });
        handle_event(&mut state, &event)
        .unwrap();

        let (render, _) = handle_event(
            &mut state,
            &Event::VerseHovered(VerseLocation::new("John", 3, 16)),
        )
        .unwrap();
        assert!(render);
        let highlighted = state.current_tab().unwrap().navigation().highlighted().map(|i| i.index);
        assert_eq!(highlighted, Some(2));

        let (render, _) = handle_event(
            &mut state,
            &Event::VerseHovered(VerseLocation::new("Gen", 1, 1)),
        )
        .unwrap();
        assert!(!render);
    }

    #[test]
    fn test_search_results_mark_chapters() {
        let mut state = state();
        select_genesis(&mut state);

        handle_event(
            &mut state,
            &Event::SearchResults(vec![
                VerseLocation::new("Gen", 2, 3),
                VerseLocation::new("Gen", 4, 1),
                VerseLocation::new("Gen", 40, 1),
            ]),
        )
        .unwrap();

        let hits: Vec<usize> = state
            .current_tab()
            .unwrap()
            .navigation()
            .items()
            .iter()
            .filter(|i| i.search_hit)
            .map(|i| i.index)
            .collect();
        assert_eq!(hits, vec![2, 4]);

        handle_event(&mut state, &Event::SearchReset).unwrap();
        assert!(state
            .current_tab()
            .unwrap()
            .navigation()
            .items()
            .iter()
            .all(|i| !i.search_hit));
    }

    #[test]
    fn test_popovers_share_one_slot_and_tag_menu_populates_once() {
        let mut state = state();
        let button = BoxRect::new(10.0, 100.0, 80.0, 20.0);

        let (_, actions) = handle_event(&mut state, &Event::ToggleTagMenu(button)).unwrap();
        assert_eq!(posted(&actions), vec![WorkerMessage::list_tags_for_menu()]);
        assert_eq!(
            state.popover.current(),
            Some((PopoverKind::TagMenu, OverlayPosition { top: 42.0, left: 100.0 }))
        );

        handle_event(&mut state, &Event::ToggleBookMenu(button)).unwrap();
        assert!(state.popover.is_open(PopoverKind::BookMenu));
        assert!(!state.popover.is_open(PopoverKind::TagMenu));

        let (_, actions) = handle_event(&mut state, &Event::ToggleTagMenu(button)).unwrap();
        assert!(actions.is_empty());

        let (render, _) = handle_event(&mut state, &Event::BodyClick).unwrap();
        assert!(render);
        assert_eq!(state.popover.current(), None);
    }

    #[test]
    fn test_tag_filter_coalesces_keystrokes() {
        let mut state = state();
        let tags = vec![
            TagInfo { id: 1, title: "Grace".into(), bible_book_id: None, global_assignment_count: 2 },
            TagInfo { id: 2, title: "Hope".into(), bible_book_id: Some(1), global_assignment_count: 1 },
        ];
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::TagsForMenuLoaded { tags })).unwrap();

        handle_event(&mut state, &Event::TagFilterInput { query: "h".into(), at_ms: 1_000 }).unwrap();
        handle_event(&mut state, &Event::TagFilterInput { query: "gr".into(), at_ms: 1_100 }).unwrap();

        let (render, _) = handle_event(&mut state, &Event::Tick { now_ms: 1_300 }).unwrap();
        assert!(!render);
        let (render, _) = handle_event(&mut state, &Event::Tick { now_ms: 1_400 }).unwrap();
        assert!(render);

        let visible: Vec<i64> = state.tag_menu.visible_entries().map(|e| e.tag.id).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn test_tag_rename_updates_selection_and_persists() {
        let mut state = state();
        select_tags(&mut state, &[(1, "grace"), (2, "hope")]);

        let (_, actions) = handle_event(
            &mut state,
            &Event::TagRenamed {
                old_title: "hope".into(),
                new_title: "expectation".into(),
            },
        )
        .unwrap();

        let selection = state.current_tag_selection().unwrap();
        assert!(selection.is_selected("expectation"));
        assert!(!selection.is_selected("hope"));
        assert_eq!(
            actions,
            vec![Action::PersistSetting {
                path: "selected_tags".into(),
                value: json!({"id_list": [1, 2], "title_list": ["grace", "expectation"]}),
            }]
        );
    }

    #[test]
    fn test_tag_reference_click_places_box() {
        let mut state = state();

        let (_, actions) = handle_event(
            &mut state,
            &Event::TagReferenceClicked {
                tag_title: "grace".into(),
                verse_tags: vec![TagEntry::new(7, "love"), TagEntry::new(9, "grace")],
                reference_box: BoxRect::new(480.0, 0.0, 400.0, 20.0),
                next_box: Some(BoxRect::new(500.0, 0.0, 400.0, 20.0)),
                list_viewport: BoxRect::new(0.0, 0.0, 1200.0, 700.0),
                window_width: 1200.0,
            },
        )
        .unwrap();

        assert_eq!(
            actions,
            vec![
                Action::PostToWorker(WorkerMessage::load_tag_reference_verses("tab-1".into(), 9)),
                Action::OpenTagReferenceBox {
                    title: "Tagged verses for \"grace\"".into(),
                    position: OverlayPosition { top: 240.0, left: 500.0 },
                },
            ]
        );
    }

    #[test]
    fn test_tag_reference_click_without_matching_tag_is_skipped() {
        let mut state = state();

        let (render, actions) = handle_event(
            &mut state,
            &Event::TagReferenceClicked {
                tag_title: "peace".into(),
                verse_tags: vec![TagEntry::new(7, "love")],
                reference_box: BoxRect::default(),
                next_box: None,
                list_viewport: BoxRect::default(),
                window_width: 800.0,
            },
        )
        .unwrap();

        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_export_flow() {
        let mut state = state();
        select_tags(&mut state, &[(1, "grace"), (2, "love")]);

        let (_, actions) = handle_event(&mut state, &Event::ExportRequested).unwrap();
        let messages = posted(&actions);
        let [WorkerMessage::LoadExportData { origin, tag_ids }] = messages.as_slice() else {
            panic!("expected export request, got {actions:?}");
        };
        assert_eq!(tag_ids, &vec![1, 2]);

        let verse = |book, abs, chapter, nr| VerseRecord {
            id: abs,
            bible_book_id: book,
            chapter,
            verse_nr: nr,
            absolute_verse_nr: u64::try_from(abs).unwrap(),
            content: "text".into(),
        };
        let (_, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::ExportDataLoaded {
                origin: origin.clone(),
                books: vec![
                    BibleBook::new(43, "John", "John", 43),
                    BibleBook::new(1, "Gen", "Genesis", 1),
                ],
                verses: vec![verse(1, 1, 1, 1), verse(1, 2, 1, 2), verse(43, 26_046, 3, 16)],
            }),
        )
        .unwrap();

        let [Action::WriteExport(document)] = &actions[..] else {
            panic!("expected export document, got {actions:?}");
        };
        let text = document.to_text();
        assert!(text.starts_with("Bible verses tagged with: grace, love\n"));
        assert!(text.find("Genesis 1:1-2").unwrap() < text.find("John 3:16").unwrap());
    }

    #[test]
    fn test_export_outside_tag_mode_is_noop() {
        let mut state = state();
        select_genesis(&mut state);

        let (_, actions) = handle_event(&mut state, &Event::ExportRequested).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn test_tab_selection_drives_statistics_button() {
        let mut state = state();
        select_genesis(&mut state);

        let event = Event::WorkerResponse(WorkerResponse::TagCount {
                origin: origin(&state),
                count: 3,
            });

        handle_event(&mut state, &event)
        .unwrap();
        assert!(state.book_statistics_enabled);

        handle_event(
            &mut state,
            &Event::TabAdded {
                id: "tab-2".into(),
                translation_id: "KJV".into(),
            },
        )
        .unwrap();
        let (_, actions) = handle_event(&mut state, &Event::TabSelected { index: 1 }).unwrap();
        assert_eq!(actions, vec![Action::SetBookStatisticsButton { enabled: false }]);

        let (_, actions) = handle_event(&mut state, &Event::TabSelected { index: 0 }).unwrap();
        assert!(matches!(posted(&actions).as_slice(), [WorkerMessage::CountTags { .. }]));

        let event = Event::WorkerResponse(WorkerResponse::TagCount {
                origin: origin(&state),
                count: 0,
            });

        handle_event(&mut state, &event)
        .unwrap();
        assert!(!state.book_statistics_enabled);
    }

    #[test]
    fn test_translation_change_reloads_without_reset() {
        let mut state = state();
        select_genesis(&mut state);
        let before = origin(&state);

        let (_, actions) = handle_event(
            &mut state,
            &Event::TranslationChanged {
                translation_id: "ASV".into(),
            },
        )
        .unwrap();

        let messages = posted(&actions);
        let [WorkerMessage::LoadText { origin, reset_view, .. }] = messages.as_slice() else {
            panic!("expected a text request, got {actions:?}");
        };
        assert!(!*reset_view);
        assert!(origin.generation > before.generation);
        assert_eq!(state.current_tab().unwrap().translation_id(), "ASV");
    }

    #[test]
    fn test_worker_error_changes_nothing() {
        let mut state = state();
        let (render, actions) = handle_event(
            &mut state,
            &Event::WorkerResponse(WorkerResponse::Error {
                message: "db locked".into(),
            }),
        )
        .unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }
}
