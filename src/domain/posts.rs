use time::{Date, format_description::FormatItem, macros::format_description};

use super::slug::tag_slug;

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// A published article as handed over by content ingestion.
///
/// Posts are immutable while a list is rendered; the list engine only ever
/// borrows them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub date: Date,
    pub images: Vec<String>,
    pub reading_time: Option<String>,
}

impl Post {
    /// Whether any of the post's tags slugifies to `slug`.
    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|tag| tag_slug(tag) == slug)
    }

    /// Display label of the tag whose slug is `slug`.
    pub fn tag_label(&self, slug: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag_slug(tag) == slug)
            .map(String::as_str)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

pub fn format_human_date(date: Date) -> String {
    date.format(HUMAN_DATE_FORMAT)
        .unwrap_or_else(|_| format_iso_date(date))
}

pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_iso_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value.trim(), ISO_DATE_FORMAT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn post(tags: &[&str]) -> Post {
        Post {
            slug: "oracle-basics".to_string(),
            title: "Oracle basics".to_string(),
            summary: "How optimistic oracles settle disputes.".to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            date: date!(2024 - 03 - 09),
            images: Vec::new(),
            reading_time: None,
        }
    }

    #[test]
    fn tags_match_by_slug() {
        let post = post(&["Prediction Markets", "Solana"]);
        assert!(post.has_tag("prediction-markets"));
        assert!(post.has_tag("solana"));
        assert!(!post.has_tag("Solana"));
        assert_eq!(post.tag_label("prediction-markets"), Some("Prediction Markets"));
    }

    #[test]
    fn dates_format_for_humans_and_machines() {
        let date = date!(2024 - 03 - 09);
        assert_eq!(format_human_date(date), "March 9, 2024");
        assert_eq!(format_iso_date(date), "2024-03-09");
        assert_eq!(parse_iso_date(" 2024-03-09 ").expect("parse"), date);
        assert!(parse_iso_date("09/03/2024").is_err());
    }
}
