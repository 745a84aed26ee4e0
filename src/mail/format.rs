use serde::{Deserialize, Serialize};

use crate::mail::body::resolve_body;
use crate::mail::date::normalize;
use crate::mail::message::ParsedMessage;

pub const NO_SUBJECT: &str = "(No Subject)";

const SEPARATOR_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetailLayout {
    /// Every header, a separator, then the body.
    #[default]
    Rich,
    /// From, To and Subject only.
    Minimal,
}

impl DetailLayout {
    pub fn toggled(self) -> Self {
        match self {
            DetailLayout::Rich => DetailLayout::Minimal,
            DetailLayout::Minimal => DetailLayout::Rich,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DetailLayout::Rich => "rich",
            DetailLayout::Minimal => "minimal",
        }
    }
}

/// One-line list entry: `[date] subject`.
pub fn summary(msg: &ParsedMessage) -> String {
    let subject = match msg.subject.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => NO_SUBJECT,
    };
    format!("[{}] {}", normalize(msg.date.as_ref()), subject)
}

pub fn detail(msg: &ParsedMessage, layout: DetailLayout) -> String {
    let body = resolve_body(msg);

    match layout {
        DetailLayout::Rich => {
            let mut out = String::new();
            for h in msg.headers.iter().filter(|h| !h.value.is_empty()) {
                out.push_str(&h.name);
                out.push_str(": ");
                out.push_str(&h.value);
                out.push('\n');
            }
            out.push_str(&"-".repeat(SEPARATOR_WIDTH));
            out.push_str("\n\n");
            out.push_str(&body);
            out
        }
        DetailLayout::Minimal => format!(
            "From: {}\nTo: {}\nSubject: {}\n\n{}",
            msg.from.as_deref().unwrap_or_default(),
            msg.to.as_deref().unwrap_or_default(),
            msg.subject.as_deref().unwrap_or_default(),
            body
        ),
    }
}
