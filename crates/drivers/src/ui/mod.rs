mod canvas;
mod keymap;
mod page;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use cbzz_adapters::present_page_view;
use cbzz_application::{
    ApplicationError, ApplicationService, ContinueReadingQuery, ListComicsCommand,
    OpenComicCommand, RandomComicQuery, ReaderController, ReaderOutcome,
};
use cbzz_domain::{
    Comic, ComicId, DisplayPreferences, FitMode, LibraryStats, PageView, ReadingDirection,
    ReadingFilter, SortCriterion,
};
use log::warn;
use minifb::{KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::config::AppConfig;
use canvas::{darken_color, text_width, Canvas, GLYPH_SIZE};
use keymap::{
    library_action, reader_input, search_edit, tap_input, LibraryAction, SearchEdit, READER_HELP,
};
use page::{apply_filter, decode_bitmap, fitted_size, scale_bitmap, PageBitmap};

const HEADER_HEIGHT: usize = 40;
const STATUS_HEIGHT: usize = 24;
const ROW_HEIGHT: usize = 64;
const COVER_WIDTH: usize = 40;
const COVER_HEIGHT: usize = 56;
const LIST_MARGIN: usize = 24;

const BACKGROUND: u32 = 0x141414;
const PANEL: u32 = 0x1F1F1F;
const TEXT: u32 = 0xECE7DE;
const MUTED: u32 = 0x9A948A;
const ACCENT: u32 = 0xE8A33D;
const SELECTED: u32 = 0x2E3A48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Library,
    Reader,
}

/// Page area as `(left, top, width, height)`.
type Area = (usize, usize, usize, usize);

/// Title filter typed into the library view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SearchBox {
    term: String,
    typing: bool,
}

impl SearchBox {
    /// Returns true when the term changed.
    fn apply(&mut self, edit: SearchEdit) -> bool {
        match edit {
            SearchEdit::Push(ch) => {
                self.term.push(ch);
                true
            }
            SearchEdit::Pop => self.term.pop().is_some(),
            SearchEdit::Commit => {
                self.typing = false;
                false
            }
            SearchEdit::Cancel => {
                self.typing = false;
                self.clear()
            }
        }
    }

    fn clear(&mut self) -> bool {
        let changed = !self.term.is_empty();
        self.term.clear();
        changed
    }
}

/// Library rows hold no page data; the reader loads the full record on open.
struct LibraryState {
    comics: Vec<Comic>,
    stats: LibraryStats,
    selected: usize,
    sort: SortCriterion,
    search: SearchBox,
    status: Option<String>,
    covers: HashMap<ComicId, Option<PageBitmap>>,
}

impl LibraryState {
    fn load(service: &ApplicationService) -> Result<Self, String> {
        let mut state = Self {
            comics: Vec::new(),
            stats: LibraryStats::default(),
            selected: 0,
            sort: SortCriterion::default(),
            search: SearchBox::default(),
            status: None,
            covers: HashMap::new(),
        };
        state.reload(service)?;
        Ok(state)
    }

    fn reload(&mut self, service: &ApplicationService) -> Result<(), String> {
        let listing = service
            .browse_library(ListComicsCommand {
                search: self.search.term.clone(),
                sort: self.sort,
            })
            .map_err(|error| format!("failed to load library: {error}"))?;
        self.comics = listing.comics;
        self.stats = listing.stats;
        self.covers
            .retain(|id, _| self.comics.iter().any(|comic| &comic.id == id));
        self.selected = self.selected.min(self.comics.len().saturating_sub(1));
        Ok(())
    }

    /// Reloads in place; a store error stays on the status line.
    fn refresh(&mut self, service: &ApplicationService) {
        if let Err(error) = self.reload(service) {
            warn!("{error}");
            self.status = Some(error);
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.comics.len() {
            self.selected += 1;
        }
    }

    fn selected_comic(&self) -> Option<&Comic> {
        self.comics.get(self.selected)
    }
}

/// Decodes each cover once; unreadable covers are remembered as `None`.
fn cached_cover<'a>(
    covers: &'a mut HashMap<ComicId, Option<PageBitmap>>,
    comic: &Comic,
) -> Option<&'a PageBitmap> {
    covers
        .entry(comic.id.clone())
        .or_insert_with(|| match decode_bitmap(&comic.cover) {
            Ok(bitmap) => {
                let (width, height) = fitted_size(
                    bitmap.width,
                    bitmap.height,
                    COVER_WIDTH,
                    COVER_HEIGHT,
                    FitMode::Contain,
                    1.0,
                );
                Some(scale_bitmap(&bitmap, width, height))
            }
            Err(error) => {
                warn!("cover of {} is unreadable: {error}", comic.id);
                None
            }
        })
        .as_ref()
}

enum LibraryStep {
    Stay,
    Open(Comic),
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
struct StageKey {
    comic_id: ComicId,
    view: PageView,
    prefs: DisplayPreferences,
    area: Area,
}

struct Placed {
    bitmap: PageBitmap,
    left: isize,
    top: isize,
}

/// Scaled and filtered pages for the current view, rebuilt only when the view changes.
#[derive(Default)]
struct PageStage {
    key: Option<StageKey>,
    placed: Vec<Placed>,
    decoded_for: Option<ComicId>,
    decoded: HashMap<usize, PageBitmap>,
}

impl PageStage {
    fn prepare(&mut self, comic: &Comic, view: PageView, prefs: DisplayPreferences, area: Area) {
        let key = StageKey {
            comic_id: comic.id.clone(),
            view,
            prefs,
            area,
        };
        if self.key.as_ref() == Some(&key) {
            return;
        }
        if self.decoded_for.as_ref() != Some(&comic.id) {
            self.decoded.clear();
            self.decoded_for = Some(comic.id.clone());
        }

        let mut indices = vec![view.primary];
        indices.extend(view.secondary);
        if prefs.direction == ReadingDirection::Rtl {
            indices.reverse();
        }

        let (area_left, area_top, area_width, area_height) = area;
        let slot_width = area_width / indices.len();
        let mut scaled = Vec::with_capacity(indices.len());
        for index in indices {
            let Some(bitmap) = self.decoded_page(comic, index) else {
                continue;
            };
            let (width, height) = fitted_size(
                bitmap.width,
                bitmap.height,
                slot_width,
                area_height,
                prefs.fit,
                prefs.zoom_factor(),
            );
            let mut page = scale_bitmap(bitmap, width, height);
            apply_filter(&mut page.pixels, prefs.filter);
            scaled.push(page);
        }

        let total_width: usize = scaled.iter().map(|page| page.width).sum();
        let mut left = area_left as isize + centered_offset(area_width, total_width);
        self.placed = scaled
            .into_iter()
            .map(|bitmap| {
                let top = area_top as isize + centered_offset(area_height, bitmap.height);
                let placed = Placed { left, top, bitmap };
                left += placed.bitmap.width as isize;
                placed
            })
            .collect();
        self.key = Some(key);
    }

    fn decoded_page(&mut self, comic: &Comic, index: usize) -> Option<&PageBitmap> {
        if !self.decoded.contains_key(&index) {
            let page = comic.pages.get(index)?;
            match decode_bitmap(page) {
                Ok(bitmap) => {
                    self.decoded.insert(index, bitmap);
                }
                Err(error) => {
                    warn!("page {} of {} is unreadable: {error}", index + 1, comic.id);
                    return None;
                }
            }
        }
        self.decoded.get(&index)
    }
}

/// Centers content in a slot; content larger than the slot is pinned to its start.
fn centered_offset(slot: usize, content: usize) -> isize {
    (slot.saturating_sub(content) / 2) as isize
}

pub fn launch_window(
    service: &ApplicationService,
    config: &AppConfig,
    initial: Option<Comic>,
) -> Result<(), String> {
    let width = config.window_width;
    let height = config.window_height;

    let mut window = Window::new("cbzz", width, height, WindowOptions::default())
        .map_err(|error| format!("failed to start UI window: {error}"))?;
    window.limit_update_rate(Some(Duration::from_micros(16_000)));

    let mut canvas = Canvas::new(width, height, BACKGROUND);
    let start = Instant::now();
    let mut library = LibraryState::load(service)?;
    let mut reader = service.reader(config.autoplay_interval_ms);
    let mut stage = PageStage::default();
    let mut reader_status: Option<String> = None;
    let mut was_mouse_down = false;
    let mut view = View::Library;

    if let Some(comic) = initial {
        reader.open(comic);
        view = View::Reader;
    }

    while window.is_open() {
        let now_ms = start.elapsed().as_millis() as u64;
        let keys = window.get_keys_pressed(KeyRepeat::Yes);

        match view {
            View::Library if library.search.typing => {
                let mut changed = false;
                for edit in keys.into_iter().filter_map(search_edit) {
                    changed |= library.search.apply(edit);
                }
                if changed {
                    library.selected = 0;
                    library.refresh(service);
                }
            }
            View::Library => {
                for action in keys.into_iter().filter_map(library_action) {
                    match handle_library_action(action, service, &mut library) {
                        LibraryStep::Stay => {}
                        LibraryStep::Open(comic) => {
                            reader.open(comic);
                            reader_status = None;
                            view = View::Reader;
                            break;
                        }
                        LibraryStep::Quit => return Ok(()),
                    }
                }
            }
            View::Reader => {
                let area = page_area(&reader, width, height);
                let mut inputs: Vec<_> = keys.into_iter().filter_map(reader_input).collect();

                let mouse_down = window.get_mouse_down(MouseButton::Left);
                if mouse_down && !was_mouse_down && !reader.is_help_visible() {
                    if let Some((mouse_x, mouse_y)) = window.get_mouse_pos(MouseMode::Discard) {
                        if (mouse_y as usize) >= area.1 && (mouse_y as usize) < area.1 + area.3 {
                            inputs.push(tap_input(mouse_x, area.0, area.2));
                        }
                    }
                }
                was_mouse_down = mouse_down;

                for input in inputs {
                    match reader.dispatch(input, now_ms) {
                        Ok(ReaderOutcome::Stay) => {}
                        Ok(ReaderOutcome::ExitToLibrary) => {
                            view = View::Library;
                            break;
                        }
                        Err(error) => {
                            warn!("reader action {input:?} failed: {error}");
                            reader_status = Some(error.to_string());
                        }
                    }
                }

                if view == View::Library {
                    library.refresh(service);
                } else {
                    reader.tick(now_ms);
                }
            }
        }

        match view {
            View::Library => {
                draw_library(&mut canvas, &mut library);
                window.set_title(&format!("cbzz | {} comics", library.comics.len()));
            }
            View::Reader => {
                let area = page_area(&reader, width, height);
                if let (Some(comic), Some(page_view)) =
                    (reader.session().comic(), reader.current_view())
                {
                    stage.prepare(comic, page_view, *reader.session().preferences(), area);
                    window.set_title(&format!("cbzz | {}", present_page_view(comic, &page_view)));
                }
                draw_reader(&mut canvas, &reader, &stage, area, reader_status.as_deref());
            }
        }

        window
            .update_with_buffer(&canvas.pixels, width, height)
            .map_err(|error| format!("failed to update UI window: {error}"))?;
    }

    reader.close();
    Ok(())
}

fn handle_library_action(
    action: LibraryAction,
    service: &ApplicationService,
    library: &mut LibraryState,
) -> LibraryStep {
    library.status = None;
    match action {
        LibraryAction::SelectPrev => library.select_prev(),
        LibraryAction::SelectNext => library.select_next(),
        LibraryAction::Open => {
            let Some(comic_id) = library.selected_comic().map(|comic| comic.id.clone()) else {
                return LibraryStep::Stay;
            };
            match service.open_comic(OpenComicCommand { comic_id }) {
                Ok(comic) => return LibraryStep::Open(comic),
                Err(error) => library.status = Some(error.to_string()),
            }
        }
        LibraryAction::CycleSort => {
            library.sort = library.sort.next();
            library.refresh(service);
        }
        LibraryAction::StartSearch => library.search.typing = true,
        LibraryAction::RandomComic => match service.random_comic(RandomComicQuery) {
            Ok(comic) => return LibraryStep::Open(comic),
            Err(ApplicationError::EmptyLibrary) => {
                library.status = Some("Library is empty".to_string());
            }
            Err(error) => library.status = Some(error.to_string()),
        },
        LibraryAction::ContinueReading => match service.continue_reading(ContinueReadingQuery) {
            Ok(Some(comic)) => return LibraryStep::Open(comic),
            Ok(None) => library.status = Some("Nothing in progress".to_string()),
            Err(error) => library.status = Some(error.to_string()),
        },
        LibraryAction::Quit => {
            if !library.search.clear() {
                return LibraryStep::Quit;
            }
            library.selected = 0;
            library.refresh(service);
        }
    }
    LibraryStep::Stay
}

fn page_area(reader: &ReaderController<'_>, width: usize, height: usize) -> Area {
    if reader.is_fullscreen() {
        return (0, 0, width, height);
    }
    (
        0,
        HEADER_HEIGHT,
        width,
        height.saturating_sub(HEADER_HEIGHT + STATUS_HEIGHT),
    )
}

fn draw_library(canvas: &mut Canvas, library: &mut LibraryState) {
    let width = canvas.width;
    let height = canvas.height;
    canvas.clear(BACKGROUND);
    canvas.fill_rect(0, 0, width, HEADER_HEIGHT, PANEL);
    canvas.draw_text(LIST_MARGIN, 16, "CBZZ LIBRARY", ACCENT);

    let stats = library.stats;
    let summary = format!(
        "sort: {}   {} comics   {} pages   {} reading   {} done",
        library.sort.as_str(),
        stats.total_comics,
        stats.total_pages,
        stats.in_progress,
        stats.completed
    );
    canvas.draw_text(
        width.saturating_sub(text_width(&summary) + LIST_MARGIN),
        16,
        &summary,
        MUTED,
    );

    let footer_top = height.saturating_sub(STATUS_HEIGHT);
    canvas.fill_rect(0, footer_top, width, STATUS_HEIGHT, PANEL);
    let footer = library
        .status
        .clone()
        .unwrap_or_else(|| library_footer(&library.search));
    let footer_color = if library.search.typing { TEXT } else { MUTED };
    canvas.draw_text(LIST_MARGIN, footer_top + 8, &footer, footer_color);

    if library.comics.is_empty() && !library.search.term.is_empty() {
        canvas.draw_text(
            LIST_MARGIN,
            HEADER_HEIGHT + 32,
            &format!("No comics match \"{}\"", library.search.term),
            TEXT,
        );
        return;
    }
    if library.comics.is_empty() {
        canvas.draw_text(
            LIST_MARGIN,
            HEADER_HEIGHT + 32,
            "No comics yet. Import some with: cbzz import <file-or-folder>",
            TEXT,
        );
        return;
    }

    let list_top = HEADER_HEIGHT + 12;
    let visible = (footer_top.saturating_sub(list_top) / ROW_HEIGHT).max(1);
    let first = library.selected.saturating_sub(visible - 1);
    let LibraryState {
        comics,
        covers,
        selected,
        ..
    } = library;
    for (offset, comic) in comics.iter().skip(first).take(visible).enumerate() {
        let top = list_top + offset * ROW_HEIGHT;
        let is_selected = first + offset == *selected;
        if is_selected {
            canvas.fill_rect(
                LIST_MARGIN / 2,
                top,
                width.saturating_sub(LIST_MARGIN),
                ROW_HEIGHT - 4,
                SELECTED,
            );
        }
        if let Some(cover) = cached_cover(covers, comic) {
            canvas.blit(
                &cover.pixels,
                cover.width,
                (LIST_MARGIN + COVER_WIDTH.saturating_sub(cover.width) / 2) as isize,
                (top + 2) as isize,
                (LIST_MARGIN, top, COVER_WIDTH, COVER_HEIGHT + 4),
            );
        }
        draw_comic_row(canvas, comic, top, is_selected);
    }
}

fn library_footer(search: &SearchBox) -> String {
    if search.typing {
        return format!("search: {}_   ENTER keep   ESC clear", search.term);
    }
    if search.term.is_empty() {
        return "ENTER open   / search   O sort   N random   C continue   ESC quit".to_string();
    }
    format!(
        "search: {}   ENTER open   / edit   ESC clear search",
        search.term
    )
}

fn draw_comic_row(canvas: &mut Canvas, comic: &Comic, top: usize, selected: bool) {
    let text_left = LIST_MARGIN + COVER_WIDTH + 16;
    let text_width_max = canvas.width.saturating_sub(text_left + LIST_MARGIN + 160);
    let title_color = if selected { ACCENT } else { TEXT };
    canvas.draw_text_clipped(text_left, top + 10, &comic.title, text_width_max, title_color);
    if comic.favorite {
        canvas.draw_text(canvas.width - LIST_MARGIN - GLYPH_SIZE * 2, top + 10, "*", ACCENT);
    }

    let detail = format!(
        "page {} / {}   {}%",
        comic.last_read + 1,
        comic.total_pages,
        comic.progress_percent()
    );
    canvas.draw_text(text_left, top + 28, &detail, MUTED);

    let bar_width = canvas.width.saturating_sub(text_left + LIST_MARGIN * 2);
    let filled = (bar_width as f64 * comic.progress_ratio()).round() as usize;
    canvas.fill_rect(text_left, top + 46, bar_width, 3, darken_color(MUTED, 0x50));
    canvas.fill_rect(text_left, top + 46, filled, 3, ACCENT);
}

fn draw_reader(
    canvas: &mut Canvas,
    reader: &ReaderController<'_>,
    stage: &PageStage,
    area: Area,
    status: Option<&str>,
) {
    let width = canvas.width;
    let height = canvas.height;
    canvas.clear(BACKGROUND);

    for placed in &stage.placed {
        canvas.blit(
            &placed.bitmap.pixels,
            placed.bitmap.width,
            placed.left,
            placed.top,
            area,
        );
    }

    let session = reader.session();
    let (Some(comic), Some(view)) = (session.comic(), reader.current_view()) else {
        return;
    };

    if !reader.is_fullscreen() {
        canvas.fill_rect(0, 0, width, HEADER_HEIGHT, PANEL);
        let indicator = view.indicator();
        let indicator_left = width.saturating_sub(text_width(&indicator) + LIST_MARGIN);
        canvas.draw_text_clipped(
            LIST_MARGIN,
            14,
            &comic.title,
            indicator_left.saturating_sub(LIST_MARGIN * 3),
            TEXT,
        );
        if comic.favorite {
            canvas.draw_text(indicator_left.saturating_sub(LIST_MARGIN), 14, "*", ACCENT);
        }
        canvas.draw_text(indicator_left, 14, &indicator, TEXT);
        let filled = (width as f32 * view.progress_percent() / 100.0).round() as usize;
        canvas.fill_rect(0, HEADER_HEIGHT - 3, filled, 3, ACCENT);
    }

    let delete_pending = reader.is_delete_pending();
    if !reader.is_fullscreen() || delete_pending {
        let status_top = height.saturating_sub(STATUS_HEIGHT);
        canvas.fill_rect(0, status_top, width, STATUS_HEIGHT, PANEL);
        let (line, color) = if delete_pending {
            (delete_prompt(&comic.title), ACCENT)
        } else {
            let line = status.map(str::to_string).unwrap_or_else(|| {
                preferences_line(session.preferences(), session.autoplay().is_active())
            });
            (line, MUTED)
        };
        canvas.draw_text(LIST_MARGIN, status_top + 8, &line, color);
    }

    if reader.is_help_visible() {
        draw_help(canvas);
    }
}

fn delete_prompt(title: &str) -> String {
    format!("Delete \"{title}\"? Press DELETE again to confirm, ESC to cancel")
}

fn preferences_line(prefs: &DisplayPreferences, autoplay: bool) -> String {
    let mut parts = vec![
        prefs.fit.label().to_string(),
        prefs.direction.label().to_string(),
        prefs.filter.label().to_string(),
        format!("{}%", prefs.zoom),
    ];
    if prefs.spread {
        parts.push("Spread".to_string());
    }
    if autoplay {
        parts.push("Autoplay".to_string());
    }
    if prefs.filter == ReadingFilter::Normal && !prefs.spread && !autoplay {
        parts.push("H for help".to_string());
    }
    parts.join("  |  ")
}

fn draw_help(canvas: &mut Canvas) {
    let line_height = GLYPH_SIZE + 8;
    let box_width = READER_HELP
        .iter()
        .map(|line| text_width(line))
        .max()
        .unwrap_or_default()
        + 48;
    let box_height = READER_HELP.len() * line_height + 56;
    let left = canvas.width.saturating_sub(box_width) / 2;
    let top = canvas.height.saturating_sub(box_height) / 2;

    canvas.fill_rect(left, top, box_width, box_height, PANEL);
    canvas.draw_rect(left, top, box_width, box_height, ACCENT);
    canvas.draw_text(left + 24, top + 20, "KEYBOARD SHORTCUTS", ACCENT);
    for (index, line) in READER_HELP.iter().enumerate() {
        canvas.draw_text(left + 24, top + 44 + index * line_height, line, TEXT);
    }
}
