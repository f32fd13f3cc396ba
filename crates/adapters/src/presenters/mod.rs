use cbzz_application::{BatchImportReport, RestoreReport};
use cbzz_domain::{Comic, LibraryStats, PageView};

pub fn present_comic_row(comic: &Comic) -> String {
    format!(
        "{}\t{}\tpage {}/{}\t{}%{}",
        comic.id,
        comic.title,
        comic.last_read + 1,
        comic.total_pages,
        comic.progress_percent(),
        if comic.favorite { "\t*" } else { "" }
    )
}

pub fn present_stats(stats: &LibraryStats) -> String {
    format!(
        "comics={} pages={} in_progress={} completed={}",
        stats.total_comics, stats.total_pages, stats.in_progress, stats.completed
    )
}

pub fn present_import_report(report: &BatchImportReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(comic) => format!(
                "imported {} as {} ({} pages)",
                outcome.file_name, comic.id, comic.total_pages
            ),
            Err(error) => format!("failed {}: {error}", outcome.file_name),
        })
        .collect();
    lines.push(format!(
        "import summary: imported={} failed={}",
        report.imported(),
        report.failed()
    ));
    lines
}

pub fn present_restore_report(report: &RestoreReport) -> String {
    format!(
        "restored {} comics, skipped {}",
        report.imported, report.skipped
    )
}

pub fn present_page_view(comic: &Comic, view: &PageView) -> String {
    format!("{}  {}  {:.0}%", comic.title, view.indicator(), view.progress_percent())
}
