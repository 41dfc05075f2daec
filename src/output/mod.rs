pub mod report;

use colored::Colorize;
use serde::Serialize;

use crate::detail::DetailView;
use crate::page::{Card, Page};
use crate::utils;

/// Width, in cells, of a full stat bar in the terminal.
const STAT_BAR_CELLS: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

pub fn resolve_format(explicit: Option<&str>, path: &str) -> OutputFormat {
    explicit
        .and_then(OutputFormat::parse)
        .or_else(|| infer_format_from_path(path))
        .unwrap_or(OutputFormat::Text)
}

pub fn render(page: &Page, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(page).into_bytes(),
        OutputFormat::Json => render_json(page),
        OutputFormat::Html => report::render_html(page),
    }
}

fn card_line(card: &Card) -> String {
    format!(
        "{}  {}  {}  {}",
        format!("{:<6}", card.number_label).bold().cyan(),
        format!("{:<14}", utils::truncate_chars(&card.name, 14)).bold().white(),
        format!("{:<20}", card.types_label).yellow(),
        card.species.dimmed(),
    )
}

fn header_line(page: &Page) -> String {
    let mut parts: Vec<String> = Vec::new();
    let shown = page.container.visible().count();
    parts.push(format!("{}/{} cards", shown, page.container.len()));
    if let Some(active) = page.sidebar.active() {
        parts.push(format!("category={active}"));
    }
    if !page.search.is_empty() {
        parts.push(format!("search={}", page.search));
    }
    if page.sidebar.hidden {
        parts.push("sidebar=hidden".to_string());
    }
    format!(":: {}", parts.join(" "))
}

/// Terminal rendering of the page: a header, the sidebar (unless hidden),
/// one line per visible card and the overlay when it is open.
pub fn render_text(page: &Page) -> String {
    let mut out = String::new();
    out.push_str(&header_line(page));
    out.push('\n');

    if !page.sidebar.hidden {
        let labels: Vec<String> = page
            .sidebar
            .categories
            .iter()
            .map(|label| {
                if page.sidebar.active() == Some(label.as_str()) {
                    format!("[{label}]").bold().green().to_string()
                } else {
                    label.to_string()
                }
            })
            .collect();
        out.push_str(&format!(":: {}\n", labels.join(" ")));
    }
    out.push('\n');

    for card in page.container.visible() {
        out.push_str(&card_line(card));
        out.push('\n');
    }

    if page.overlay.is_open() {
        if let Some(view) = page.overlay.content() {
            out.push('\n');
            out.push_str(&render_detail_text(view));
        }
    }
    out
}

fn stat_bar_cells(fill_percent: f64) -> usize {
    let cells = (fill_percent / 100.0 * STAT_BAR_CELLS as f64).round();
    (cells.max(0.0) as usize).min(STAT_BAR_CELLS)
}

pub fn render_detail_text(view: &DetailView) -> String {
    let rule = "-".repeat(58);
    let mut out = String::new();
    out.push_str(&format!("{}\n", rule.bold().white()));
    out.push_str(&format!(
        "{} {}\n",
        view.title.bold().white(),
        view.number_label.bold().cyan()
    ));
    if let Some(image) = view.image.as_deref() {
        out.push_str(&format!("{}\n", image.dimmed()));
    }
    out.push_str(&format!("{}\n", view.types_label));
    out.push_str(&format!("{}\n", view.species.italic()));
    out.push_str(&format!("{}\n", view.height_label));
    out.push_str(&format!("{}\n", view.weight_label));
    out.push_str(&format!("{}\n\n", view.abilities_label));

    out.push_str(&format!("{}\n", "Base Stats".bold().white()));
    for stat in &view.stats {
        let filled = stat_bar_cells(stat.fill_percent);
        out.push_str(&format!(
            "  {:<22} {}{}\n",
            stat.label,
            "█".repeat(filled).green(),
            "░".repeat(STAT_BAR_CELLS - filled).dimmed()
        ));
    }
    out.push('\n');
    out.push_str(&format!("{}\n", "Moves".bold().white()));
    out.push_str(&format!("  {}\n", view.moves_label));
    out.push_str(&format!("{}\n", rule.bold().white()));
    out
}

#[derive(Serialize)]
struct JsonExport<'a> {
    category: Option<&'a str>,
    search: &'a str,
    cards: Vec<&'a Card>,
    detail: Option<&'a DetailView>,
}

/// Visible cards plus the open detail view, if any.
pub fn render_json(page: &Page) -> Vec<u8> {
    let export = JsonExport {
        category: page.sidebar.active(),
        search: &page.search,
        cards: page.container.visible().collect(),
        detail: if page.overlay.is_open() {
            page.overlay.content()
        } else {
            None
        },
    };
    serde_json::to_vec_pretty(&export).unwrap_or_else(|_| b"{}\n".to_vec())
}
