use serde::{Deserialize, Serialize};

pub const ZOOM_MIN: u16 = 25;
pub const ZOOM_MAX: u16 = 300;
pub const ZOOM_DEFAULT: u16 = 100;
pub const ZOOM_STEP: i32 = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    #[default]
    Contain,
    Width,
    Height,
}

impl FitMode {
    pub fn next(self) -> Self {
        match self {
            Self::Contain => Self::Width,
            Self::Width => Self::Height,
            Self::Height => Self::Contain,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Contain => "Fit",
            Self::Width => "Width",
            Self::Height => "Height",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDirection {
    #[default]
    Ltr,
    Rtl,
}

impl ReadingDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ltr => Self::Rtl,
            Self::Rtl => Self::Ltr,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ltr => "LTR",
            Self::Rtl => "RTL",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingFilter {
    #[default]
    Normal,
    Sepia,
    Night,
    Warm,
}

impl ReadingFilter {
    pub fn next(self) -> Self {
        match self {
            Self::Normal => Self::Sepia,
            Self::Sepia => Self::Night,
            Self::Night => Self::Warm,
            Self::Warm => Self::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Sepia => "Sepia",
            Self::Night => "Night",
            Self::Warm => "Warm",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayPreferences {
    pub zoom: u16,
    pub fit: FitMode,
    pub direction: ReadingDirection,
    pub filter: ReadingFilter,
    pub spread: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            zoom: ZOOM_DEFAULT,
            fit: FitMode::default(),
            direction: ReadingDirection::default(),
            filter: ReadingFilter::default(),
            spread: false,
        }
    }
}

impl DisplayPreferences {
    pub fn update_zoom(&mut self, delta: i32) -> u16 {
        let next = (i32::from(self.zoom) + delta).clamp(i32::from(ZOOM_MIN), i32::from(ZOOM_MAX));
        self.zoom = next as u16;
        self.zoom
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = ZOOM_DEFAULT;
    }

    pub fn zoom_factor(&self) -> f32 {
        f32::from(self.zoom) / 100.0
    }
}
