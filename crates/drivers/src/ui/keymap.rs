use cbzz_domain::ReaderInput;
use minifb::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryAction {
    SelectPrev,
    SelectNext,
    Open,
    CycleSort,
    RandomComic,
    ContinueReading,
    StartSearch,
    Quit,
}

/// Edits to the library search term while it is being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEdit {
    Push(char),
    Pop,
    Commit,
    Cancel,
}

/// Shortcut table for the reader view. `?` arrives as shift + slash.
pub fn reader_input(key: Key) -> Option<ReaderInput> {
    let input = match key {
        Key::Right | Key::Space | Key::PageDown => ReaderInput::NextPage,
        Key::Left | Key::PageUp => ReaderInput::PrevPage,
        Key::Home => ReaderInput::FirstPage,
        Key::End => ReaderInput::LastPage,
        Key::Escape => ReaderInput::Escape,
        Key::Backspace => ReaderInput::Back,
        Key::F => ReaderInput::ToggleFullscreen,
        Key::Equal | Key::NumPadPlus => ReaderInput::ZoomIn,
        Key::Minus | Key::NumPadMinus => ReaderInput::ZoomOut,
        Key::Key0 | Key::NumPad0 => ReaderInput::ResetZoom,
        Key::D => ReaderInput::ToggleSpread,
        Key::P => ReaderInput::ToggleAutoplay,
        Key::W => ReaderInput::CycleFit,
        Key::R => ReaderInput::ToggleDirection,
        Key::C => ReaderInput::CycleFilter,
        Key::S => ReaderInput::ToggleFavorite,
        Key::H | Key::Slash => ReaderInput::ToggleHelp,
        Key::Delete => ReaderInput::DeleteComic,
        _ => return None,
    };
    Some(input)
}

pub fn library_action(key: Key) -> Option<LibraryAction> {
    let action = match key {
        Key::Up | Key::K => LibraryAction::SelectPrev,
        Key::Down | Key::J => LibraryAction::SelectNext,
        Key::Enter | Key::NumPadEnter => LibraryAction::Open,
        Key::O => LibraryAction::CycleSort,
        Key::N => LibraryAction::RandomComic,
        Key::C => LibraryAction::ContinueReading,
        Key::Slash => LibraryAction::StartSearch,
        Key::Escape | Key::Q => LibraryAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Typing keys while searching. Letters come out lowercase; matching ignores case.
pub fn search_edit(key: Key) -> Option<SearchEdit> {
    let edit = match key {
        Key::Enter | Key::NumPadEnter => SearchEdit::Commit,
        Key::Escape => SearchEdit::Cancel,
        Key::Backspace => SearchEdit::Pop,
        Key::Space => SearchEdit::Push(' '),
        Key::Minus => SearchEdit::Push('-'),
        Key::Period => SearchEdit::Push('.'),
        Key::Apostrophe => SearchEdit::Push('\''),
        _ => SearchEdit::Push(key_char(key)?),
    };
    Some(edit)
}

fn key_char(key: Key) -> Option<char> {
    const LETTERS: [Key; 26] = [
        Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
        Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
        Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
    ];
    const DIGITS: [Key; 10] = [
        Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4,
        Key::Key5, Key::Key6, Key::Key7, Key::Key8, Key::Key9,
    ];
    if let Some(index) = LETTERS.iter().position(|letter| *letter == key) {
        return char::from_u32('a' as u32 + index as u32);
    }
    DIGITS
        .iter()
        .position(|digit| *digit == key)
        .and_then(|index| char::from_digit(index as u32, 10))
}

/// A click on the left half of the page area goes back, the right half forward.
pub fn tap_input(mouse_x: f32, area_left: usize, area_width: usize) -> ReaderInput {
    let middle = area_left as f32 + area_width as f32 / 2.0;
    if mouse_x < middle {
        ReaderInput::TapLeft
    } else {
        ReaderInput::TapRight
    }
}

pub const READER_HELP: &[&str] = &[
    "LEFT / RIGHT   previous / next page",
    "SPACE          next page",
    "HOME / END     first / last page",
    "+ / - / 0      zoom in / out / reset",
    "F              fullscreen",
    "D              two-page spread",
    "P              autoplay",
    "W              fit mode",
    "R              reading direction",
    "C              reading filter",
    "S              favorite",
    "DELETE twice   delete comic",
    "H / ?          this help",
    "ESC            close help / fullscreen / reader",
];
