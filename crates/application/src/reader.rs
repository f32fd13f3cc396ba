use cbzz_domain::{Comic, PageView, ReaderInput, ReadingSession, ZOOM_STEP};
use log::{debug, info, warn};

use crate::{ApplicationError, ComicRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderOutcome {
    Stay,
    ExitToLibrary,
}

/// Reading session bound to the store that keeps its progress.
pub struct ReaderController<'a> {
    repository: &'a dyn ComicRepository,
    session: ReadingSession,
    fullscreen: bool,
    help_visible: bool,
    delete_pending: bool,
}

impl<'a> ReaderController<'a> {
    pub fn new(repository: &'a dyn ComicRepository, autoplay_interval_ms: u64) -> Self {
        Self {
            repository,
            session: ReadingSession::new(autoplay_interval_ms),
            fullscreen: false,
            help_visible: false,
            delete_pending: false,
        }
    }

    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_help_visible(&self) -> bool {
        self.help_visible
    }

    /// True after a first delete request, until it is confirmed or cancelled.
    pub fn is_delete_pending(&self) -> bool {
        self.delete_pending
    }

    pub fn current_view(&self) -> Option<PageView> {
        self.session.current_view()
    }

    pub fn open(&mut self, comic: Comic) -> PageView {
        info!("opening comic {} ({} pages)", comic.id, comic.page_count());
        let view = self.session.open(comic);
        self.save_progress_best_effort();
        view
    }

    pub fn close(&mut self) -> Option<Comic> {
        self.help_visible = false;
        self.delete_pending = false;
        self.session.close()
    }

    pub fn dispatch(
        &mut self,
        input: ReaderInput,
        now_ms: u64,
    ) -> Result<ReaderOutcome, ApplicationError> {
        if !self.session.is_open() {
            return Ok(ReaderOutcome::ExitToLibrary);
        }
        debug!("reader input {input:?}");

        // Deleting takes a second DeleteComic; any other input cancels it.
        if std::mem::take(&mut self.delete_pending) {
            if input == ReaderInput::DeleteComic {
                self.delete_current()?;
                return Ok(ReaderOutcome::ExitToLibrary);
            }
            if input == ReaderInput::Escape {
                return Ok(ReaderOutcome::Stay);
            }
        }

        match input {
            ReaderInput::NextPage | ReaderInput::TapRight => {
                let view = self.session.next_page();
                self.after_navigation(view);
            }
            ReaderInput::PrevPage | ReaderInput::TapLeft => {
                let view = self.session.prev_page();
                self.after_navigation(view);
            }
            ReaderInput::FirstPage => {
                let view = self.session.show_page(0);
                self.after_navigation(view);
            }
            ReaderInput::LastPage => {
                let view = self.session.show_page(usize::MAX);
                self.after_navigation(view);
            }
            ReaderInput::GoToPage(page_number) => {
                let view = self.session.go_to_page(page_number);
                self.after_navigation(view);
            }
            ReaderInput::ToggleSpread => {
                let view = self.session.toggle_spread();
                self.after_navigation(view);
            }
            ReaderInput::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            ReaderInput::ZoomIn => {
                self.session.update_zoom(ZOOM_STEP);
            }
            ReaderInput::ZoomOut => {
                self.session.update_zoom(-ZOOM_STEP);
            }
            ReaderInput::ResetZoom => self.session.reset_zoom(),
            ReaderInput::ToggleAutoplay => {
                self.session.toggle_autoplay(now_ms);
            }
            ReaderInput::CycleFit => {
                self.session.cycle_fit();
            }
            ReaderInput::ToggleDirection => {
                self.session.toggle_direction();
            }
            ReaderInput::CycleFilter => {
                self.session.cycle_filter();
            }
            ReaderInput::ToggleFavorite => self.toggle_favorite()?,
            ReaderInput::ToggleHelp => self.help_visible = !self.help_visible,
            ReaderInput::Escape => {
                if self.help_visible {
                    self.help_visible = false;
                } else if self.fullscreen {
                    self.fullscreen = false;
                } else {
                    self.close();
                    return Ok(ReaderOutcome::ExitToLibrary);
                }
            }
            ReaderInput::Back => {
                self.close();
                return Ok(ReaderOutcome::ExitToLibrary);
            }
            ReaderInput::DeleteComic => self.delete_pending = true,
        }

        Ok(ReaderOutcome::Stay)
    }

    /// Fires the due autoplay tick; returns the page it turned to.
    pub fn tick(&mut self, now_ms: u64) -> Option<PageView> {
        let turned = self.session.tick_autoplay(now_ms);
        if turned.is_some() {
            self.save_progress_best_effort();
        }
        turned
    }

    fn after_navigation(&mut self, view: Option<PageView>) {
        if view.is_some() {
            self.save_progress_best_effort();
        }
    }

    /// Progress saves run behind navigation; a failure is logged and dropped.
    fn save_progress_best_effort(&self) {
        let Some(comic) = self.session.comic() else {
            return;
        };
        if let Err(error) =
            self.repository
                .update_reading_state(&comic.id, comic.last_read, comic.favorite)
        {
            warn!("failed to save reading progress for {}: {error}", comic.id);
        }
    }

    fn toggle_favorite(&mut self) -> Result<(), ApplicationError> {
        let Some(favorite) = self.session.toggle_favorite() else {
            return Ok(());
        };
        if let Some(comic) = self.session.comic() {
            self.repository
                .update_reading_state(&comic.id, comic.last_read, favorite)?;
        }
        Ok(())
    }

    fn delete_current(&mut self) -> Result<(), ApplicationError> {
        if let Some(comic) = self.session.comic() {
            self.repository.delete_comic(&comic.id)?;
            info!("deleted comic {}", comic.id);
        }
        self.close();
        Ok(())
    }
}
