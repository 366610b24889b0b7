//! Front-matter parsing
//!
//! Posts may open with a block of flat `key: value` lines fenced by `---`
//! marker lines. Values are plain strings; there is no nesting and no type
//! coercion.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref FRONTMATTER_RE: Regex = Regex::new(r"(?s)\A---\n(.*?)\n---\n(.*)\z").unwrap();
    static ref QUOTES_RE: Regex = Regex::new(r#"^["']|["']$"#).unwrap();
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    fields: IndexMap<String, String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let Some(caps) = FRONTMATTER_RE.captures(content) else {
            return (FrontMatter::default(), content);
        };

        let (Some(block), Some(body)) = (caps.get(1), caps.get(2)) else {
            return (FrontMatter::default(), content);
        };

        // An empty block or an empty body does not count as front-matter
        if block.as_str().is_empty() || body.as_str().is_empty() {
            return (FrontMatter::default(), content);
        }

        (Self::parse_block(block.as_str()), body.as_str())
    }

    fn parse_block(block: &str) -> Self {
        let mut fields = IndexMap::new();

        for line in block.split('\n') {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            let value = QUOTES_RE.replace_all(value.trim(), "");
            fields.insert(key.to_string(), value.into_owned());
        }

        Self { fields }
    }

    /// Look up a raw value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Look up a value, treating an empty string as absent
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        self.non_empty("title")
    }

    pub fn description(&self) -> Option<&str> {
        self.non_empty("description")
    }

    /// Parse the `date` field into a DateTime
    pub fn parse_date(&self) -> Option<DateTime<Local>> {
        self.non_empty("date").and_then(parse_date_string)
    }

    /// Iterate over fields in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize the fields back into `key: value` lines
    pub fn to_block(&self) -> String {
        self.iter()
            .map(|(k, v)| format!("{}: {}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&dt).earliest();
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Local.from_local_datetime(&d.and_hms_opt(0, 0, 0)?).earliest();
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }

    None
}
