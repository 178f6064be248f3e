use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::models::Category;
use crate::pipeline::{CityReport, GuidePage};

use super::{
    APP_TITLE, EXPLORE_TITLE, INTRO, LINK_CAPTION, UNRECOGNIZED_FORMAT_NOTE, about_heading,
    explore_caption, recommendation_error_line,
};

const STYLE: &str = "
body { font-family: sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 18rem; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; padding: 1.5rem 3rem; overflow-y: auto; }
details { border: 1px solid #ddd; border-radius: 0.5rem; margin: 0.75rem 0; padding: 0.5rem 1rem; }
summary { cursor: pointer; font-weight: 600; }
.warning { background: #fffbe6; padding: 0.75rem 1rem; border-radius: 0.5rem; }
.error { background: #ffecec; padding: 0.75rem 1rem; border-radius: 0.5rem; }
.note { color: #666; }
";

/// Full page; `page` is `None` before the first submission
#[must_use]
pub fn page(city_input: &str, page: Option<&GuidePage>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { "Destina -- AI Travel Chat App" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                aside {
                    h2 { "City Information" }
                    form method="get" action="/" {
                        label for="city" { "Enter City Name" }
                        br;
                        input type="text" id="city" name="city" value=(city_input) placeholder="e.g., Paris" autofocus;
                    }
                }
                main {
                    h1 { (APP_TITLE) }
                    p { (INTRO) }
                    @if let Some(page) = page {
                        (content(page))
                    }
                }
            }
        }
    }
}

/// The lookup result without the surrounding layout
#[must_use]
pub fn content(page: &GuidePage) -> Markup {
    match page {
        GuidePage::Prompt { warning } => html! { div.warning { "⚠️ " (warning) } },
        GuidePage::Report(report) => report_markup(report),
    }
}

fn report_markup(report: &CityReport) -> Markup {
    let display_name = report.display_name();
    html! {
        h2 { (about_heading(&display_name)) }
        p { (report.description) }
        @match &report.recommendations {
            Ok(recommendations) => {
                @for (category, items) in recommendations.sections() {
                    (section(report, category, items))
                }
                @if report.has_unrecognized_format() {
                    p.note { "ℹ️ " (UNRECOGNIZED_FORMAT_NOTE) }
                }
            }
            Err(e) => {
                div.error { (recommendation_error_line(e)) }
            }
        }
        details {
            summary { (EXPLORE_TITLE) }
            p {
                a href=(report.explore_link()) target="_blank" { (explore_caption(&display_name)) }
            }
        }
    }
}

fn section(report: &CityReport, category: Category, items: &[String]) -> Markup {
    html! {
        details {
            summary { (category.icon()) " " (category.title()) }
            ul {
                @for item in items {
                    li {
                        (item) " "
                        a href=(report.item_link(item)) target="_blank" { (LINK_CAPTION) }
                    }
                }
            }
        }
    }
}
