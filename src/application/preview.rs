//! Social-preview card rendered as a fixed-size SVG document.

use askama::Template;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::application::metadata::{PREVIEW_HEIGHT, PREVIEW_WIDTH};
use crate::application::site::SiteProfile;
use crate::presentation::views::{CardLine, PreviewCardTemplate, PreviewCardView};

pub const METRIC_PREVIEW_RENDER: &str = "quire_preview_render_total";
pub const METRIC_PREVIEW_FAILURE: &str = "quire_preview_failure_total";

pub const SUMMARY_LIMIT: usize = 150;
const SUMMARY_ELLIPSIS: &str = "...";
const LONG_TITLE_THRESHOLD: usize = 50;
const TITLE_FONT_SIZE: u32 = 52;
const LONG_TITLE_FONT_SIZE: u32 = 42;
const SUMMARY_FONT_SIZE: u32 = 24;
const TITLE_MAX_LINES: usize = 3;
const SUMMARY_MAX_LINES: usize = 4;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewParams {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("image reference `{reference}` rejected: {reason}")]
    InvalidImage { reference: String, reason: String },
    #[error("preview card rendering failed")]
    Render(#[from] askama::Error),
}

#[derive(Clone)]
pub struct PreviewService {
    site: SiteProfile,
}

impl PreviewService {
    pub fn new(site: SiteProfile) -> Self {
        Self { site }
    }

    /// Lay out the card for the given parameters without rendering it.
    pub fn card(&self, params: &PreviewParams) -> Result<PreviewCardView, PreviewError> {
        let title = non_blank(params.title.as_deref()).unwrap_or(&self.site.title);
        let summary = non_blank(params.summary.as_deref()).unwrap_or(&self.site.description);
        let image = non_blank(params.image.as_deref())
            .map(|reference| resolve_image(&self.site, reference))
            .transpose()?;

        let title_font_size = title_font_size(title);
        let summary = truncate_summary(summary);

        let mut y = if image.is_some() { 380 } else { 280 };
        let title_step = title_font_size * 6 / 5;
        let title_lines = wrap_text(title, title_chars_per_line(title_font_size), TITLE_MAX_LINES)
            .into_iter()
            .map(|text| {
                let line = CardLine { y, text };
                y += title_step;
                line
            })
            .collect::<Vec<_>>();

        y += 8;
        let summary_step = SUMMARY_FONT_SIZE * 7 / 5;
        let summary_lines = wrap_text(&summary, 64, SUMMARY_MAX_LINES)
            .into_iter()
            .map(|text| {
                let line = CardLine { y, text };
                y += summary_step;
                line
            })
            .collect();

        Ok(PreviewCardView {
            width: PREVIEW_WIDTH,
            height: PREVIEW_HEIGHT,
            brand: self.site.title.clone(),
            tagline: self.site.tagline.clone(),
            title_font_size,
            title_lines,
            summary_lines,
            image,
        })
    }

    /// Render the complete SVG document. Nothing partial is ever returned.
    pub fn render(&self, params: &PreviewParams) -> Result<String, PreviewError> {
        let card = self.card(params)?;
        Ok(PreviewCardTemplate { card }.render()?)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Cut `summary` to [`SUMMARY_LIMIT`] characters, marking the cut with `...`.
pub fn truncate_summary(summary: &str) -> String {
    if summary.chars().count() <= SUMMARY_LIMIT {
        return summary.to_string();
    }
    let mut truncated: String = summary.chars().take(SUMMARY_LIMIT).collect();
    truncated.push_str(SUMMARY_ELLIPSIS);
    truncated
}

pub fn title_font_size(title: &str) -> u32 {
    if title.chars().count() > LONG_TITLE_THRESHOLD {
        LONG_TITLE_FONT_SIZE
    } else {
        TITLE_FONT_SIZE
    }
}

fn title_chars_per_line(font_size: u32) -> usize {
    if font_size == LONG_TITLE_FONT_SIZE { 38 } else { 31 }
}

/// Accept absolute http(s) URLs and site-relative paths.
pub fn resolve_image(site: &SiteProfile, reference: &str) -> Result<String, PreviewError> {
    let reference = reference.trim();
    let rejected = |reason: &str| PreviewError::InvalidImage {
        reference: reference.to_string(),
        reason: reason.to_string(),
    };

    if reference.starts_with('/') && !reference.starts_with("//") {
        return Ok(site.absolute_url(reference));
    }

    let url = Url::parse(reference).map_err(|err| rejected(&err.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url.to_string()),
        "http" | "https" => Err(rejected("missing host")),
        scheme => Err(rejected(&format!("unsupported scheme `{scheme}`"))),
    }
}

/// Greedy word wrap. Words longer than a line are split; text beyond
/// `max_lines` is dropped and the last line ends with an ellipsis.
fn wrap_text(text: &str, max_chars: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        let word_len = chars.len();
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }
    if current_len > 0 {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            last.push('…');
        }
    }
    lines
}
