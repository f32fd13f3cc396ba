use crate::{
    Autoplay, Comic, DisplayPreferences, FitMode, ReadingDirection, ReadingFilter, ZOOM_DEFAULT,
};

/// Which pages are on screen after a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageView {
    pub primary: usize,
    pub secondary: Option<usize>,
    pub total: usize,
}

impl PageView {
    pub fn indicator(&self) -> String {
        match self.secondary {
            Some(second) => format!("{}-{} / {}", self.primary + 1, second + 1, self.total),
            None => format!("{} / {}", self.primary + 1, self.total),
        }
    }

    /// Position of the primary page as a percentage; single-page comics are complete.
    pub fn progress_percent(&self) -> f32 {
        if self.total <= 1 {
            return 100.0;
        }
        self.primary as f32 / (self.total - 1) as f32 * 100.0
    }
}

/// Reader state machine: `Closed` while `comic` is `None`, `Open` otherwise.
#[derive(Debug, Clone, Default)]
pub struct ReadingSession {
    comic: Option<Comic>,
    page_index: usize,
    prefs: DisplayPreferences,
    autoplay: Autoplay,
}

impl ReadingSession {
    pub fn new(autoplay_interval_ms: u64) -> Self {
        Self {
            autoplay: Autoplay::new(autoplay_interval_ms),
            ..Self::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.comic.is_some()
    }

    pub fn comic(&self) -> Option<&Comic> {
        self.comic.as_ref()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn preferences(&self) -> &DisplayPreferences {
        &self.prefs
    }

    pub fn autoplay(&self) -> &Autoplay {
        &self.autoplay
    }

    pub fn open(&mut self, comic: Comic) -> PageView {
        self.autoplay.stop();
        self.prefs.zoom = ZOOM_DEFAULT;
        self.prefs.fit = FitMode::Contain;
        self.prefs.spread = false;
        self.page_index = comic.clamp_page(comic.last_read);
        let start = self.page_index;
        self.comic = Some(comic);
        self.show_page(start).unwrap_or(PageView {
            primary: 0,
            secondary: None,
            total: 0,
        })
    }

    /// Leaves the reader and hands the comic back.
    pub fn close(&mut self) -> Option<Comic> {
        self.autoplay.stop();
        self.prefs.reset_zoom();
        self.prefs.filter = ReadingFilter::Normal;
        self.page_index = 0;
        self.comic.take()
    }

    pub fn show_page(&mut self, index: usize) -> Option<PageView> {
        let comic = self.comic.as_mut()?;
        let index = comic.clamp_page(index);
        self.page_index = index;
        comic.last_read = index;
        self.current_view()
    }

    pub fn go_to_page(&mut self, page_number: usize) -> Option<PageView> {
        self.show_page(page_number.saturating_sub(1))
    }

    pub fn current_view(&self) -> Option<PageView> {
        let comic = self.comic.as_ref()?;
        let total = comic.page_count();
        let secondary = if self.prefs.spread && self.page_index + 1 < total {
            Some(self.page_index + 1)
        } else {
            None
        };
        Some(PageView {
            primary: self.page_index,
            secondary,
            total,
        })
    }

    pub fn next_page(&mut self) -> Option<PageView> {
        match self.prefs.direction {
            ReadingDirection::Ltr => self.step_forward(),
            ReadingDirection::Rtl => self.step_backward(),
        }
    }

    pub fn prev_page(&mut self) -> Option<PageView> {
        match self.prefs.direction {
            ReadingDirection::Ltr => self.step_backward(),
            ReadingDirection::Rtl => self.step_forward(),
        }
    }

    fn step_forward(&mut self) -> Option<PageView> {
        let last = self.comic.as_ref()?.last_page_index();
        if self.page_index >= last {
            return None;
        }
        self.show_page(self.page_index + 1)
    }

    fn step_backward(&mut self) -> Option<PageView> {
        self.comic.as_ref()?;
        if self.page_index == 0 {
            return None;
        }
        self.show_page(self.page_index - 1)
    }

    pub fn toggle_spread(&mut self) -> Option<PageView> {
        self.prefs.spread = !self.prefs.spread;
        self.show_page(self.page_index)
    }

    pub fn cycle_fit(&mut self) -> FitMode {
        self.prefs.fit = self.prefs.fit.next();
        self.prefs.fit
    }

    pub fn toggle_direction(&mut self) -> ReadingDirection {
        self.prefs.direction = self.prefs.direction.toggled();
        self.prefs.direction
    }

    pub fn cycle_filter(&mut self) -> ReadingFilter {
        self.prefs.filter = self.prefs.filter.next();
        self.prefs.filter
    }

    pub fn update_zoom(&mut self, delta: i32) -> u16 {
        self.prefs.update_zoom(delta)
    }

    pub fn reset_zoom(&mut self) {
        self.prefs.reset_zoom();
    }

    pub fn toggle_favorite(&mut self) -> Option<bool> {
        let comic = self.comic.as_mut()?;
        comic.favorite = !comic.favorite;
        Some(comic.favorite)
    }

    /// Returns whether autoplay is running afterwards.
    pub fn toggle_autoplay(&mut self, now_ms: u64) -> bool {
        if self.autoplay.stop() {
            return false;
        }
        if self.comic.is_none() {
            return false;
        }
        self.autoplay.start(now_ms)
    }

    pub fn stop_autoplay(&mut self) -> bool {
        self.autoplay.stop()
    }

    /// Fires the autoplay tick due by `now_ms`, at most one per call. A tick
    /// turns the page while the index is below the last page (forward index,
    /// whatever the reading direction) and stops autoplay once the last page
    /// is reached.
    pub fn tick_autoplay(&mut self, now_ms: u64) -> Option<PageView> {
        if !self.autoplay.take_due_tick(now_ms) {
            return None;
        }
        let Some(last) = self.comic.as_ref().map(Comic::last_page_index) else {
            self.autoplay.stop();
            return None;
        };
        if self.page_index >= last {
            self.autoplay.stop();
            return None;
        }
        let view = self.next_page();
        if self.page_index >= last {
            self.autoplay.stop();
        }
        view
    }
}
