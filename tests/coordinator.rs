use serde_json::json;
use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use versenav::app::{AppState, Event};
use versenav::domain::{BibleBook, Result, TagEntry, TagInfo, VerseLocation, VerseRecord};
use versenav::export::FileSink;
use versenav::navigation::{NavigationAnchor, VerseCountTable};
use versenav::overlay::{BoxRect, OverlayPosition};
use versenav::storage::{JsonSettings, SettingsStore};
use versenav::worker::{
    BookCatalog, BrowserWorker, CommunicationController, RenderFormat, TagCatalog, TextLoader,
    VerseDataset,
};
use versenav::{BrowserError, Config, Coordinator, ViewHost};

fn catalog_books() -> Vec<BibleBook> {
    vec![
        BibleBook::new(1, "Gen", "Genesis", 1),
        BibleBook::new(19, "Psa", "Psalms", 19),
        BibleBook::new(43, "John", "John", 43),
    ]
}

struct Books;

impl BookCatalog for Books {
    fn book_list(&self, _translation_id: &str) -> Result<HashSet<String>> {
        Ok(HashSet::from(["Gen".to_string(), "Psa".to_string(), "John".to_string()]))
    }
}

struct Tags {
    fail: bool,
}

impl TagCatalog for Tags {
    fn tag_count(&self) -> Result<u32> {
        if self.fail {
            return Err(BrowserError::Storage("tag database locked".into()));
        }
        Ok(2)
    }

    fn list_tags(&self) -> Result<Vec<TagInfo>> {
        if self.fail {
            return Err(BrowserError::Storage("tag database locked".into()));
        }
        Ok(vec![
            TagInfo { id: 1, title: "grace".into(), bible_book_id: None, global_assignment_count: 4 },
            TagInfo { id: 2, title: "love".into(), bible_book_id: None, global_assignment_count: 7 },
        ])
    }
}

struct Text;

impl TextLoader for Text {
    fn request_text_update(
        &mut self,
        _tab_id: &str,
        book: Option<&str>,
        _tag_ids: Option<&[i64]>,
        _reset_view: bool,
    ) -> Result<Vec<i64>> {
        Ok(match book {
            Some(_) => vec![1],
            None => vec![43, 43, 19],
        })
    }
}

struct Verses;

impl CommunicationController for Verses {
    fn request_verses_for_selected_tags(
        &mut self,
        _tab_id: Option<&str>,
        _tag_ids: &[i64],
        format: RenderFormat,
        _include_meta_info: bool,
    ) -> Result<VerseDataset> {
        let verse = |book: i64, abs: u64, chapter: u32, nr: u32, content: &str| VerseRecord {
            id: i64::try_from(abs).unwrap(),
            bible_book_id: book,
            chapter,
            verse_nr: nr,
            absolute_verse_nr: abs,
            content: content.into(),
        };

        Ok(match format {
            RenderFormat::Html => VerseDataset::Markup("<div>Genesis 1:1</div>".into()),
            RenderFormat::DocExport => VerseDataset::Structured {
                books: vec![
                    BibleBook::new(19, "Psa", "Psalms", 19),
                    BibleBook::new(43, "John", "John", 43),
                ],
                verses: vec![
                    verse(19, 14_000, 23, 1, "The LORD is my shepherd"),
                    verse(19, 14_001, 23, 2, "He maketh me to lie down"),
                    verse(43, 26_137, 3, 16, "For God so loved the world"),
                ],
            },
        })
    }
}

#[derive(Clone, Default)]
struct RecordingView(Rc<RefCell<Vec<String>>>);

impl RecordingView {
    fn calls(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    fn record(&self, call: String) {
        self.0.borrow_mut().push(call);
    }
}

impl ViewHost for RecordingView {
    fn scroll_to(&mut self, anchor: &str) {
        self.record(format!("scroll_to {anchor}"));
    }

    fn scroll_to_top(&mut self, tab_id: &str) {
        self.record(format!("scroll_to_top {tab_id}"));
    }

    fn open_tag_reference_box(&mut self, title: &str, position: OverlayPosition) {
        self.record(format!("open_box {title} @ {},{}", position.top, position.left));
    }

    fn show_tag_reference_verses(&mut self, markup: &str) {
        self.record(format!("show_verses {markup}"));
    }

    fn set_book_statistics_button(&mut self, enabled: bool) {
        self.record(format!("statistics {enabled}"));
    }

    fn render(&mut self, _state: &AppState) {
        self.record("render".into());
    }
}

struct Harness {
    dir: TempDir,
    view: RecordingView,
    coordinator: Coordinator,
}

impl Harness {
    fn new() -> Self {
        Self::with_tags(Tags { fail: false }, |_| {})
    }

    fn with_tags(tags: Tags, seed: impl FnOnce(&mut JsonSettings)) -> Self {
        let dir = TempDir::new().unwrap();
        let config = Config {
            data_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..Config::default()
        };

        let mut settings = JsonSettings::new(config.settings_path()).unwrap();
        seed(&mut settings);

        let view = RecordingView::default();
        let worker = BrowserWorker::new(
            Box::new(Books),
            Box::new(tags),
            Box::new(Text),
            Box::new(Verses),
        );
        let mut coordinator = Coordinator::new(
            &config,
            worker,
            Box::new(settings),
            Box::new(view.clone()),
            Box::new(FileSink::new(config.export_path())),
        );

        coordinator
            .dispatch(&Event::CatalogLoaded {
                books: catalog_books(),
                verse_counts: VerseCountTable::from_chapters("Gen", &[31, 25, 24]),
            })
            .unwrap();
        coordinator
            .dispatch(&Event::TabAdded {
                id: "tab-1".into(),
                translation_id: "KJV".into(),
            })
            .unwrap();

        Self { dir, view, coordinator }
    }

    fn state(&self) -> &AppState {
        self.coordinator.state()
    }

    fn settings_json(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.path("settings.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn select_tags(&mut self, tags: &[(i64, &str)]) {
        let entries = tags.iter().map(|(id, title)| TagEntry::new(*id, *title)).collect();
        self.coordinator
            .dispatch(&Event::TagSelectionChanged(entries))
            .unwrap();
    }
}

fn book_labels(state: &AppState) -> Vec<String> {
    state
        .current_tab()
        .unwrap()
        .navigation()
        .items()
        .iter()
        .map(|item| item.label.clone())
        .collect()
}

#[test]
fn test_book_selection_round_trip() {
    let mut h = Harness::new();

    h.coordinator
        .dispatch(&Event::BookSelected {
            code: "Gen".into(),
            title: "Genesis".into(),
        })
        .unwrap();
    assert_eq!(h.coordinator.pending_requests(), 1);
    assert!(h.state().current_tab().unwrap().view().is_empty());

    h.coordinator.pump().unwrap();

    let tab = h.state().current_tab().unwrap();
    assert_eq!(tab.view().selected_book().map(|b| b.title.as_str()), Some("Genesis"));
    assert_eq!(book_labels(h.state()), vec!["1", "2", "3"]);
    assert_eq!(tab.rendered_book_ids(), &[1]);
    assert!(h.state().book_statistics_enabled);
    assert!(h.view.calls().contains(&"statistics true".to_string()));
    assert_eq!(h.coordinator.pending_requests(), 0);

    let settings = h.settings_json();
    assert_eq!(settings["values"]["selected_book"], json!({"code": "Gen", "name": "Genesis"}));
    assert!(settings["values"].get("selected_tags").is_none());
}

#[test]
fn test_book_missing_from_translation_is_rejected() {
    let mut h = Harness::new();

    h.coordinator
        .dispatch(&Event::BookSelected {
            code: "Tob".into(),
            title: "Tobit".into(),
        })
        .unwrap();
    let err = h.coordinator.pump().unwrap_err();

    assert!(matches!(err, BrowserError::InvalidBook { ref code } if code == "Tob"));
    assert!(h.state().current_tab().unwrap().view().is_empty());
    assert!(!h.path("settings.json").exists());
}

#[test]
fn test_superseded_book_check_is_dropped() {
    let mut h = Harness::new();

    h.coordinator
        .dispatch(&Event::BookSelected {
            code: "Gen".into(),
            title: "Genesis".into(),
        })
        .unwrap();
    h.select_tags(&[(2, "love"), (1, "grace")]);
    h.coordinator.pump().unwrap();

    let state = h.state();
    let selection = state.current_tag_selection().unwrap();
    assert_eq!(selection.display_titles(), "love, grace");
    assert!(state.current_tab().unwrap().view().selected_book().is_none());
    assert_eq!(book_labels(state), vec!["John", "Psalms"]);

    let anchors: Vec<NavigationAnchor> = state
        .current_tab()
        .unwrap()
        .navigation()
        .items()
        .iter()
        .map(|item| item.anchor.clone())
        .collect();
    assert_eq!(
        anchors,
        vec![
            NavigationAnchor::Book { code: "John".into(), position: 1 },
            NavigationAnchor::Book { code: "Psa".into(), position: 2 },
        ]
    );

    let settings = h.settings_json();
    assert_eq!(
        settings["values"]["selected_tags"],
        json!({"id_list": [2, 1], "title_list": ["love", "grace"]})
    );
}

#[test]
fn test_second_quick_book_pick_wins() {
    let mut h = Harness::new();

    for (code, title) in [("Gen", "Genesis"), ("Psa", "Psalms")] {
        h.coordinator
            .dispatch(&Event::BookSelected {
                code: code.into(),
                title: title.into(),
            })
            .unwrap();
    }
    assert_eq!(h.coordinator.pending_requests(), 2);
    h.coordinator.pump().unwrap();

    let tab = h.state().current_tab().unwrap();
    assert_eq!(tab.view().selected_book().map(|b| b.title.as_str()), Some("Psalms"));
    assert_eq!(
        h.settings_json()["values"]["selected_book"],
        json!({"code": "Psa", "name": "Psalms"})
    );
}

#[test]
fn test_book_check_for_left_tab_stays_in_that_tab() {
    let mut h = Harness::new();

    h.coordinator
        .dispatch(&Event::BookSelected {
            code: "Gen".into(),
            title: "Genesis".into(),
        })
        .unwrap();
    h.coordinator
        .dispatch(&Event::TabAdded {
            id: "tab-2".into(),
            translation_id: "KJV".into(),
        })
        .unwrap();
    h.coordinator
        .dispatch(&Event::ToggleTagMenu(BoxRect::new(10.0, 40.0, 80.0, 20.0)))
        .unwrap();
    h.coordinator.pump().unwrap();

    let state = h.state();
    assert_eq!(
        state.tabs[0].view().selected_book().map(|b| b.code.as_str()),
        Some("Gen")
    );
    assert_eq!(state.tabs[0].rendered_book_ids(), &[1]);
    assert!(state.current_tab().unwrap().view().is_empty());
    assert!(state.popover.current().is_some());
    assert!(!state.book_statistics_enabled);
    assert!(!h.path("settings.json").exists());
}

#[test]
fn test_navigation_and_hover_in_tag_mode() {
    let mut h = Harness::new();
    h.select_tags(&[(1, "grace")]);
    h.coordinator.pump().unwrap();

    h.coordinator
        .dispatch(&Event::NavigateToBook {
            code: "Psa".into(),
            number: 2,
        })
        .unwrap();
    h.coordinator
        .dispatch(&Event::VerseHovered(VerseLocation::new("John", 3, 16)))
        .unwrap();

    assert!(h.view.calls().contains(&"scroll_to tab-1 Psa".to_string()));
    let highlighted = h.state().current_tab().unwrap().navigation().highlighted().map(|i| i.index);
    assert_eq!(highlighted, Some(1));
}

#[test]
fn test_tag_menu_opens_once_and_reflects_selection() {
    let mut h = Harness::new();
    h.select_tags(&[(2, "love")]);
    let button = BoxRect::new(0.0, 40.0, 90.0, 24.0);

    h.coordinator.dispatch(&Event::ToggleTagMenu(button)).unwrap();
    h.coordinator.pump().unwrap();

    let checked: Vec<(String, bool)> = h
        .state()
        .tag_menu
        .entries()
        .iter()
        .map(|e| (e.tag.title.clone(), e.checked))
        .collect();
    assert_eq!(checked, vec![("grace".to_string(), false), ("love".to_string(), true)]);

    h.coordinator.dispatch(&Event::BodyClick).unwrap();
    h.coordinator.dispatch(&Event::ToggleTagMenu(button)).unwrap();
    assert_eq!(h.coordinator.pending_requests(), 0);
}

#[test]
fn test_tag_reference_box_is_filled_after_pump() {
    let mut h = Harness::new();

    h.coordinator
        .dispatch(&Event::TagReferenceClicked {
            tag_title: "grace".into(),
            verse_tags: vec![TagEntry::new(1, "grace")],
            reference_box: BoxRect::new(100.0, 0.0, 500.0, 30.0),
            next_box: Some(BoxRect::new(130.0, 0.0, 500.0, 30.0)),
            list_viewport: BoxRect::new(0.0, 0.0, 1400.0, 900.0),
            window_width: 1400.0,
        })
        .unwrap();
    h.coordinator.pump().unwrap();

    let calls = h.view.calls();
    assert!(calls.contains(&"open_box Tagged verses for \"grace\" @ 137,700".to_string()));
    assert!(calls.contains(&"show_verses <div>Genesis 1:1</div>".to_string()));
}

#[test]
fn test_export_writes_grouped_document() {
    let mut h = Harness::new();
    h.select_tags(&[(1, "grace"), (2, "love")]);
    h.coordinator.pump().unwrap();

    h.coordinator.dispatch(&Event::ExportRequested).unwrap();
    h.coordinator.pump().unwrap();

    let text = std::fs::read_to_string(h.path("tagged_verses.txt")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Bible verses tagged with: grace, love");
    assert_eq!(lines[1], "");
    assert_eq!(lines[2], "Psalms");
    assert_eq!(lines[3], "Psalms 23:1-2");
    assert!(lines.contains(&"John 3:16"));
}

#[test]
fn test_restore_skips_inconsistent_tag_lists() {
    let mut h = Harness::with_tags(Tags { fail: false }, |settings| {
        settings
            .set("selected_tags", json!({"id_list": [1, 2], "title_list": ["grace"]}))
            .unwrap();
        settings.set("tag_list_width", json!(280)).unwrap();
    });

    h.coordinator.restore_settings().unwrap();

    assert!(h.state().current_tab().unwrap().view().is_empty());
    assert_eq!(h.state().tag_list_width, Some(280));
}

#[test]
fn test_restore_reselects_book_through_catalog() {
    let mut h = Harness::with_tags(Tags { fail: false }, |settings| {
        settings
            .set("selected_book", json!({"code": "John", "name": "John"}))
            .unwrap();
    });

    h.coordinator.restore_settings().unwrap();
    assert!(h.state().current_tab().unwrap().view().is_empty());

    h.coordinator.pump().unwrap();
    let book = h.state().current_tab().unwrap().view().selected_book().cloned();
    assert_eq!(book.map(|b| b.code), Some("John".to_string()));
}

#[test]
fn test_restore_tag_selection() {
    let mut h = Harness::with_tags(Tags { fail: false }, |settings| {
        settings
            .set("selected_tags", json!({"id_list": [2], "title_list": ["love"]}))
            .unwrap();
    });

    h.coordinator.restore_settings().unwrap();
    h.coordinator.pump().unwrap();

    assert!(h.state().current_tag_selection().unwrap().is_selected("love"));
    assert_eq!(book_labels(h.state()), vec!["John", "Psalms"]);
}

#[test]
fn test_collaborator_failure_changes_nothing() {
    let mut h = Harness::with_tags(Tags { fail: true }, |_| {});
    h.coordinator
        .dispatch(&Event::BookSelected {
            code: "Gen".into(),
            title: "Genesis".into(),
        })
        .unwrap();
    h.coordinator.pump().unwrap();

    assert!(!h.state().book_statistics_enabled);
    assert!(h.state().current_tab().unwrap().view().selected_book().is_some());
    assert!(!h.view.calls().iter().any(|c| c.starts_with("statistics")));
}

#[test]
fn test_settings_survive_restart() {
    let dir = TempDir::new().unwrap();
    let path: &Path = &dir.path().join("settings.json");
    {
        let mut settings = JsonSettings::new(path.to_path_buf()).unwrap();
        settings.set("tag_list_width", json!(310)).unwrap();
    }

    let settings = JsonSettings::new(path.to_path_buf()).unwrap();
    assert_eq!(settings.get("tag_list_width").unwrap(), Some(json!(310)));
}
