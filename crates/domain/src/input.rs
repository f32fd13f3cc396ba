/// Everything the reader view can be asked to do, independent of the toolkit
/// that produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderInput {
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    /// One-based page number, as shown by the page slider.
    GoToPage(usize),
    TapLeft,
    TapRight,
    ToggleFullscreen,
    Escape,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleSpread,
    ToggleAutoplay,
    CycleFit,
    ToggleDirection,
    CycleFilter,
    ToggleFavorite,
    ToggleHelp,
    DeleteComic,
    Back,
}
