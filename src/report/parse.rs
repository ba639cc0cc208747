//! Line-based parser for the analyst's markdown report.

use serde::Serialize;

/// Headings in the order reports are rendered.
pub const SECTION_ORDER: [&str; 6] = [
    "Summary of Findings",
    "Cross-Verification",
    "Contextual Background",
    "Conclusion",
    "Verdict",
    "References",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "True")]
    True,
    #[serde(rename = "False")]
    False,
    #[serde(rename = "Partly True")]
    PartlyTrue,
    #[serde(rename = "Partly False")]
    PartlyFalse,
    #[serde(rename = "Not Enough Information")]
    NotEnoughInformation,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::True => "True",
            Self::False => "False",
            Self::PartlyTrue => "Partly True",
            Self::PartlyFalse => "Partly False",
            Self::NotEnoughInformation => "Not Enough Information",
        }
    }

    /// Finds the earliest verdict label in free text, matching whole words only. When two
    /// labels start at the same word the longer one wins, so "Partly True" is not read as
    /// "True".
    pub fn from_text(text: &str) -> Self {
        const LONGEST_FIRST: [Verdict; 5] = [
            Verdict::NotEnoughInformation,
            Verdict::PartlyFalse,
            Verdict::PartlyTrue,
            Verdict::False,
            Verdict::True,
        ];

        let lowered = text.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let labels: Vec<(Verdict, Vec<String>)> = LONGEST_FIRST
            .into_iter()
            .map(|v| {
                let label_words = v
                    .label()
                    .split_whitespace()
                    .map(str::to_lowercase)
                    .collect();
                (v, label_words)
            })
            .collect();

        (0..words.len())
            .find_map(|start| {
                labels.iter().find_map(|(verdict, label_words)| {
                    let rest = &words[start..];
                    let matches = rest.len() >= label_words.len()
                        && label_words.iter().zip(rest).all(|(l, w)| l == w);
                    matches.then_some(*verdict)
                })
            })
            .unwrap_or(Self::NotEnoughInformation)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCheckReport {
    pub sections: Vec<ReportSection>,
    pub verdict: Verdict,
    pub references: Vec<String>,
}

impl FactCheckReport {
    pub fn section(&self, title: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.title.eq_ignore_ascii_case(title))
            .map(|s| s.body.as_str())
    }

    /// Renders known sections in canonical order, then any others as they appeared.
    pub fn to_markdown(&self) -> String {
        let known = SECTION_ORDER
            .iter()
            .filter_map(|title| self.sections.iter().find(|s| s.title.eq_ignore_ascii_case(title)));
        let extra = self.sections.iter().filter(|s| {
            !SECTION_ORDER
                .iter()
                .any(|title| s.title.eq_ignore_ascii_case(title))
        });

        known
            .chain(extra)
            .map(|s| format!("**{}:**\n{}\n", s.title, s.body))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Returns the heading name and any text following it on the same line.
fn parse_heading(line: &str) -> Option<(String, Option<String>)> {
    let rest = line.strip_prefix("**")?;
    let close = rest.find("**")?;
    let name = rest[..close].trim().trim_end_matches(':').trim();
    if name.is_empty() {
        return None;
    }

    let trailing = rest[close + 2..].trim_start_matches(':').trim();
    let trailing = (!trailing.is_empty()).then(|| trailing.to_string());
    Some((name.to_string(), trailing))
}

/// Splits a report into sections.
///
/// A line wrapped in `**` opens a section; `**Verdict:** True` style lines open one and
/// contribute their remainder as content. Text before the first heading and sections
/// without content are dropped. References become one entry per non-empty line.
pub fn parse_report(text: &str) -> FactCheckReport {
    let mut sections: Vec<ReportSection> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((name, trailing)) = parse_heading(line) {
            if let Some((title, lines)) = current.take()
                && !lines.is_empty()
            {
                sections.push(ReportSection {
                    title,
                    body: lines.join("\n"),
                });
            }
            current = Some((name, trailing.into_iter().collect()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line.to_string());
        }
    }

    if let Some((title, lines)) = current
        && !lines.is_empty()
    {
        sections.push(ReportSection {
            title,
            body: lines.join("\n"),
        });
    }

    let verdict = sections
        .iter()
        .find(|s| s.title.eq_ignore_ascii_case("Verdict"))
        .map(|s| Verdict::from_text(&s.body))
        .unwrap_or(Verdict::NotEnoughInformation);

    let references = sections
        .iter()
        .find(|s| s.title.eq_ignore_ascii_case("References"))
        .map(|s| {
            s.body
                .lines()
                .map(|l| l.trim_start_matches(['-', '*']).trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        })
        .unwrap_or_default();

    FactCheckReport {
        sections,
        verdict,
        references,
    }
}
