use std::cmp::Ordering;
use std::str::FromStr;

use crate::{Comic, DomainError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortCriterion {
    #[default]
    Recent,
    Title,
    Progress,
    Favorites,
}

impl SortCriterion {
    pub const ALL: [SortCriterion; 4] = [
        SortCriterion::Recent,
        SortCriterion::Title,
        SortCriterion::Progress,
        SortCriterion::Favorites,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Title => "title",
            Self::Progress => "progress",
            Self::Favorites => "favorites",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Recent => Self::Title,
            Self::Title => Self::Progress,
            Self::Progress => Self::Favorites,
            Self::Favorites => Self::Recent,
        }
    }
}

impl FromStr for SortCriterion {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|criterion| criterion.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| DomainError::UnknownSortCriterion(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LibraryStats {
    pub total_comics: usize,
    pub total_pages: usize,
    pub in_progress: usize,
    pub completed: usize,
}

/// Case-insensitive substring match on titles; an empty term keeps everything.
pub fn filter_comics<'a>(comics: &'a [Comic], search: &str) -> Vec<&'a Comic> {
    let needle = search.to_lowercase();
    comics
        .iter()
        .filter(|comic| needle.is_empty() || comic.title.to_lowercase().contains(&needle))
        .collect()
}

pub fn sort_comics(comics: &mut [&Comic], criterion: SortCriterion) {
    match criterion {
        SortCriterion::Recent => comics.sort_by(|a, b| by_recency(a, b)),
        SortCriterion::Title => comics.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortCriterion::Progress => comics.sort_by(|a, b| {
            b.progress_ratio()
                .partial_cmp(&a.progress_ratio())
                .unwrap_or(Ordering::Equal)
        }),
        SortCriterion::Favorites => comics.sort_by(|a, b| {
            b.favorite
                .cmp(&a.favorite)
                .then_with(|| by_recency(a, b))
        }),
    }
}

/// Filter then sort, the way the library grid is built.
pub fn query_library<'a>(
    comics: &'a [Comic],
    search: &str,
    criterion: SortCriterion,
) -> Vec<&'a Comic> {
    let mut selected = filter_comics(comics, search);
    sort_comics(&mut selected, criterion);
    selected
}

pub fn continue_reading(comics: &[Comic]) -> Option<&Comic> {
    comics
        .iter()
        .filter(|comic| comic.is_in_progress())
        .max_by(|a, b| a.added_at.cmp(&b.added_at))
}

pub fn library_stats(comics: &[Comic]) -> LibraryStats {
    LibraryStats {
        total_comics: comics.len(),
        total_pages: comics.iter().map(|comic| comic.total_pages).sum(),
        in_progress: comics.iter().filter(|comic| comic.is_in_progress()).count(),
        completed: comics.iter().filter(|comic| comic.is_completed()).count(),
    }
}

fn by_recency(a: &Comic, b: &Comic) -> Ordering {
    b.added_at.cmp(&a.added_at)
}

/// Orders by the lowercase title with Latin accents folded, so "Émile" sits
/// next to "Emile". Scripts outside Latin compare by code point.
fn compare_titles(a: &str, b: &str) -> Ordering {
    title_key(a)
        .cmp(&title_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

fn title_key(title: &str) -> String {
    let mut key = String::with_capacity(title.len());
    for ch in title.chars().flat_map(char::to_lowercase) {
        match ch {
            'ß' => key.push_str("ss"),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            _ => key.push(fold_accent(ch)),
        }
    }
    key
}

fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' | 'ħ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' | 'ŧ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::{ComicId, PageImage};

    fn comic(id: &str, title: &str, total: usize, last_read: usize, age_days: i64) -> Comic {
        let pages = (0..total)
            .map(|index| PageImage::new("image/png", vec![index as u8]))
            .collect();
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let mut comic = Comic::new(
            ComicId::new(id).expect("id"),
            title,
            pages,
            base - Duration::days(age_days),
        )
        .expect("comic");
        comic.last_read = last_read;
        comic
    }

    fn ids(comics: &[&Comic]) -> Vec<String> {
        comics.iter().map(|comic| comic.id.to_string()).collect()
    }

    #[test]
    fn search_is_case_insensitive_and_empty_matches_all() {
        let comics = vec![
            comic("a", "Saga Vol 1", 3, 0, 0),
            comic("b", "Monstress", 3, 0, 1),
        ];
        assert_eq!(filter_comics(&comics, "").len(), 2);
        assert_eq!(ids(&filter_comics(&comics, "sAgA")), vec!["a"]);
        assert!(filter_comics(&comics, "zzz").is_empty());
    }

    #[test]
    fn recent_sort_puts_newest_first() {
        let comics = vec![
            comic("old", "A", 2, 0, 10),
            comic("new", "B", 2, 0, 0),
            comic("mid", "C", 2, 0, 5),
        ];
        let sorted = query_library(&comics, "", SortCriterion::Recent);
        assert_eq!(ids(&sorted), vec!["new", "mid", "old"]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let comics = vec![
            comic("1", "zeta", 2, 0, 0),
            comic("2", "Alpha", 2, 0, 0),
            comic("3", "beta", 2, 0, 0),
        ];
        let sorted = query_library(&comics, "", SortCriterion::Title);
        assert_eq!(ids(&sorted), vec!["2", "3", "1"]);
    }

    #[test]
    fn title_sort_folds_accents() {
        let comics = vec![
            comic("z", "Zorro", 2, 0, 0),
            comic("e-acute", "Émile et les images", 2, 0, 0),
            comic("e", "Emile", 2, 0, 0),
            comic("a", "Astérix", 2, 0, 0),
        ];
        let sorted = query_library(&comics, "", SortCriterion::Title);
        assert_eq!(ids(&sorted), vec!["a", "e", "e-acute", "z"]);
    }

    #[test]
    fn progress_sort_ranks_further_reads_higher() {
        let comics = vec![
            comic("low", "L", 10, 1, 0),
            comic("single", "S", 1, 0, 0),
            comic("high", "H", 10, 5, 0),
        ];
        let sorted = query_library(&comics, "", SortCriterion::Progress);
        assert_eq!(ids(&sorted), vec!["high", "low", "single"]);
    }

    #[test]
    fn single_page_comic_counts_as_zero_progress() {
        let mut single = comic("single", "S", 1, 0, 0);
        single.last_read = 7;
        assert_eq!(single.progress_ratio(), 0.0);
        let comics = vec![single, comic("some", "X", 10, 1, 0)];
        let sorted = query_library(&comics, "", SortCriterion::Progress);
        assert_eq!(ids(&sorted), vec!["some", "single"]);
    }

    #[test]
    fn favorites_first_then_recency() {
        let mut fav_old = comic("fav_old", "A", 2, 0, 9);
        fav_old.favorite = true;
        let mut fav_new = comic("fav_new", "B", 2, 0, 1);
        fav_new.favorite = true;
        let comics = vec![comic("plain_new", "C", 2, 0, 0), fav_old, fav_new];
        let sorted = query_library(&comics, "", SortCriterion::Favorites);
        assert_eq!(ids(&sorted), vec!["fav_new", "fav_old", "plain_new"]);
    }

    #[test]
    fn continue_reading_picks_most_recent_in_progress() {
        let comics = vec![
            comic("unread", "U", 10, 0, 0),
            comic("done", "D", 10, 9, 0),
            comic("older", "O", 10, 3, 5),
            comic("newer", "N", 10, 2, 1),
        ];
        assert_eq!(
            continue_reading(&comics).map(|comic| comic.id.as_str()),
            Some("newer")
        );
        assert!(continue_reading(&comics[..2]).is_none());
    }

    #[test]
    fn stats_count_progress_buckets() {
        let comics = vec![
            comic("a", "A", 10, 0, 0),
            comic("b", "B", 10, 4, 0),
            comic("c", "C", 5, 4, 0),
            comic("d", "D", 1, 0, 0),
        ];
        assert_eq!(
            library_stats(&comics),
            LibraryStats {
                total_comics: 4,
                total_pages: 26,
                in_progress: 1,
                completed: 1,
            }
        );
    }

    #[test]
    fn sort_criterion_parses_names() {
        assert_eq!("Progress".parse::<SortCriterion>(), Ok(SortCriterion::Progress));
        assert!(matches!(
            "size".parse::<SortCriterion>(),
            Err(DomainError::UnknownSortCriterion(_))
        ));
        assert_eq!(SortCriterion::Favorites.next(), SortCriterion::Recent);
    }
}
