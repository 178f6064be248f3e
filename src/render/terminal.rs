use std::io::{self, Write};

use crate::pipeline::{CityReport, GuidePage};

use super::{
    EXPLORE_TITLE, LINK_CAPTION, UNRECOGNIZED_FORMAT_NOTE, about_heading, explore_caption,
    recommendation_error_line,
};

/// Write a page as plain text
pub fn write_page<W: Write>(out: &mut W, page: &GuidePage) -> io::Result<()> {
    match page {
        GuidePage::Prompt { warning } => writeln!(out, "⚠️ {warning}"),
        GuidePage::Report(report) => write_report(out, report),
    }
}

fn write_report<W: Write>(out: &mut W, report: &CityReport) -> io::Result<()> {
    let display_name = report.display_name();

    writeln!(out, "{}", about_heading(&display_name))?;
    writeln!(out, "{}", report.description)?;
    writeln!(out)?;

    match &report.recommendations {
        Ok(recommendations) => {
            for (category, items) in recommendations.sections() {
                writeln!(out, "▸ {} {}", category.icon(), category.title())?;
                for item in items {
                    writeln!(out, "    - {item}  {LINK_CAPTION}: {}", report.item_link(item))?;
                }
                writeln!(out)?;
            }
            if report.has_unrecognized_format() {
                writeln!(out, "ℹ️ {UNRECOGNIZED_FORMAT_NOTE}")?;
                writeln!(out)?;
            }
        }
        Err(e) => {
            writeln!(out, "{}", recommendation_error_line(e))?;
            writeln!(out)?;
        }
    }

    writeln!(out, "▸ {EXPLORE_TITLE}")?;
    writeln!(
        out,
        "    {}: {}",
        explore_caption(&display_name),
        report.explore_link()
    )
}

/// Render a page into a `String`
#[must_use]
pub fn render_to_string(page: &GuidePage) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_page(&mut buffer, page);
    String::from_utf8_lossy(&buffer).into_owned()
}
