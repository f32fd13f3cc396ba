use std::cmp::Ordering;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Unsupported,
}

impl PageKind {
    pub fn mime(self) -> Option<&'static str> {
        match self {
            Self::Jpeg => Some("image/jpeg"),
            Self::Png => Some("image/png"),
            Self::Gif => Some("image/gif"),
            Self::Webp => Some("image/webp"),
            Self::Bmp => Some("image/bmp"),
            Self::Unsupported => None,
        }
    }
}

pub fn detect_page_kind(entry_name: &str) -> PageKind {
    let Some(ext) = Path::new(entry_name)
        .extension()
        .and_then(|ext| ext.to_str())
    else {
        return PageKind::Unsupported;
    };

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => PageKind::Jpeg,
        "png" => PageKind::Png,
        "gif" => PageKind::Gif,
        "webp" => PageKind::Webp,
        "bmp" => PageKind::Bmp,
        _ => PageKind::Unsupported,
    }
}

/// Keeps page image entries and orders them the way a reader expects:
/// digit runs compare by value, so `page2` comes before `page10`.
pub fn select_page_entries<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut pages: Vec<String> = names
        .into_iter()
        .filter(|name| detect_page_kind(name) != PageKind::Unsupported)
        .map(str::to_string)
        .collect();
    pages.sort_by(|a, b| natural_cmp(a, b));
    pages
}

pub fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut a = left.chars().peekable();
    let mut b = right.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return left.cmp(right),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a = take_digits(&mut a);
                let run_b = take_digits(&mut b);
                let ordering = compare_digit_runs(&run_a, &run_b);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x
                    .to_lowercase()
                    .cmp(y.to_lowercase())
                    .then_with(|| x.cmp(&y));
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(ch) = chars.peek().copied() {
        if !ch.is_ascii_digit() {
            break;
        }
        run.push(ch);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let trimmed_a = a.trim_start_matches('0');
    let trimmed_b = b.trim_start_matches('0');
    trimmed_a
        .len()
        .cmp(&trimmed_b.len())
        .then_with(|| trimmed_a.cmp(trimmed_b))
}

/// Display title for an imported archive: the file name minus `.cbz`.
pub fn title_from_file_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name);
    let lower = base.to_ascii_lowercase();
    if lower.ends_with(".cbz") && base.len() > 4 {
        base[..base.len() - 4].to_string()
    } else {
        base.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_kind_detection_is_case_insensitive() {
        assert_eq!(detect_page_kind("001.JPG"), PageKind::Jpeg);
        assert_eq!(detect_page_kind("dir/p.webp"), PageKind::Webp);
        assert_eq!(detect_page_kind("ComicInfo.xml"), PageKind::Unsupported);
        assert_eq!(detect_page_kind("noext"), PageKind::Unsupported);
    }

    #[test]
    fn numeric_runs_sort_by_value() {
        let pages = select_page_entries(["page10.jpg", "page2.jpg", "page1.jpg", "notes.txt"]);
        assert_eq!(pages, vec!["page1.jpg", "page2.jpg", "page10.jpg"]);
    }

    #[test]
    fn natural_order_handles_nested_folders_and_padding() {
        let pages = select_page_entries([
            "ch2/010.png",
            "ch1/2.png",
            "ch10/1.png",
            "ch1/002b.png",
            "ch1/1.png",
        ]);
        assert_eq!(
            pages,
            vec!["ch1/1.png", "ch1/2.png", "ch1/002b.png", "ch2/010.png", "ch10/1.png"]
        );
    }

    #[test]
    fn title_strips_cbz_extension_only() {
        assert_eq!(title_from_file_name("Saga 01.cbz"), "Saga 01");
        assert_eq!(title_from_file_name("/tmp/Shout.CBZ"), "Shout");
        assert_eq!(title_from_file_name("archive.zip"), "archive.zip");
    }
}
