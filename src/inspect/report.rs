//! Inspect report types and terminal formatting.

use serde::Serialize;
use std::fmt;

use crate::codec::SchemaEpoch;

/// Inner width of the report boxes, in characters.
const BOX_WIDTH: usize = 59;

/// The result of inspecting a document.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    pub summary: SummarySection,
    /// One row per attribute, in name order.
    pub attributes: Vec<AttributeRow>,
    /// Entity type distribution.
    pub entity_types: LabelsSection,
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Summary counts for the document.
#[derive(Clone, Debug, Serialize)]
pub struct SummarySection {
    /// The schema the document was written with.
    pub schema: SchemaEpoch,
    /// Length of the text in characters.
    pub characters: usize,
    pub attributes: usize,
    pub metadata_keys: usize,
    pub entities: usize,
    pub mentions: usize,
    /// Entities linked to a knowledge-base id.
    pub linked_entities: usize,
}

/// One named attribute.
#[derive(Clone, Debug, Serialize)]
pub struct AttributeRow {
    pub name: String,
    /// The tag the attribute is written under.
    pub tag: String,
    /// For collections, the element tag.
    pub item_tag: Option<String>,
    /// For collections, the number of elements.
    pub items: Option<usize>,
    pub extensions: usize,
}

/// Entity type histogram.
#[derive(Clone, Debug, Serialize)]
pub struct LabelsSection {
    pub top_n: usize,
    pub total_distinct: usize,
    pub total_entities: usize,
    /// Sorted by count descending, then by name.
    pub entries: Vec<LabelCount>,
    /// Sum of counts for types not in the top N.
    pub other_count: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│                 Document Inspection Report                  │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;
        self.fmt_attributes(f)?;
        writeln!(f)?;
        self.fmt_entity_types(f)?;

        Ok(())
    }
}

impl InspectReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        open_box(f, "Summary")?;
        row(f, format!("Schema:        {:>8}", s.schema.to_string()))?;
        row(f, format!("Characters:    {:>8}", format_number(s.characters)))?;
        row(f, format!("Attributes:    {:>8}", format_number(s.attributes)))?;
        if s.metadata_keys > 0 {
            row(f, format!("Metadata keys: {:>8}", format_number(s.metadata_keys)))?;
        }
        if s.entities > 0 {
            blank(f)?;
            row(f, format!("Entities:      {:>8}", format_number(s.entities)))?;
            row(f, format!("Mentions:      {:>8}", format_number(s.mentions)))?;
            row(
                f,
                format!(
                    "Linked:        {:>8} of {} ({})",
                    format_number(s.linked_entities),
                    format_number(s.entities),
                    fmt_percent(s.linked_entities, s.entities)
                ),
            )?;
        }
        close_box(f)
    }

    fn fmt_attributes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        open_box(f, &format!("Attributes ({})", self.attributes.len()))?;
        if self.attributes.is_empty() {
            row(f, "No attributes.".to_string())?;
        }
        for attribute in &self.attributes {
            let tag = match &attribute.item_tag {
                Some(item_tag) => format!("{}<{}>", attribute.tag, item_tag),
                None => attribute.tag.clone(),
            };
            let items = attribute
                .items
                .map(format_number)
                .unwrap_or_else(|| "-".to_string());
            row(
                f,
                format!(
                    "{:<20} {:<24} {:>7}",
                    truncate_label(&attribute.name, 20),
                    truncate_label(&tag, 24),
                    items
                ),
            )?;
        }
        close_box(f)
    }

    fn fmt_entity_types(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l = &self.entity_types;

        let header = if l.total_distinct > l.top_n {
            format!("Entity types (top {} of {})", l.top_n, l.total_distinct)
        } else {
            format!("Entity types ({})", l.total_distinct)
        };
        open_box(f, &header)?;

        if l.entries.is_empty() {
            row(f, "No entities found.".to_string())?;
        } else {
            let max_count = l.entries.iter().map(|e| e.count).max().unwrap_or(1);
            let lines = l
                .entries
                .iter()
                .map(|e| (e.label.as_str(), e.count))
                .chain((l.other_count > 0).then_some(("(other)", l.other_count)));
            for (label, count) in lines {
                row(
                    f,
                    format!(
                        "{:<16} {:>7} {:>6}  {}",
                        truncate_label(label, 16),
                        format_number(count),
                        fmt_percent(count, l.total_entities),
                        render_bar(count, max_count, self.bar_width)
                    ),
                )?;
            }
        }
        close_box(f)
    }
}

fn open_box(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let rule = BOX_WIDTH.saturating_sub(title.chars().count() + 3);
    writeln!(f, "┌─ {} {}┐", title, "─".repeat(rule))?;
    blank(f)
}

fn close_box(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    blank(f)?;
    writeln!(f, "└{}┘", "─".repeat(BOX_WIDTH))
}

fn blank(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "│{}│", " ".repeat(BOX_WIDTH))
}

fn row(f: &mut fmt::Formatter<'_>, content: String) -> fmt::Result {
    writeln!(f, "│   {:<width$}│", content, width = BOX_WIDTH - 3)
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = ((count * width) / max_count).min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Truncate a label to fit in the display column.
fn truncate_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        label.to_string()
    } else {
        let kept: String = label.chars().take(max_len - 1).collect();
        format!("{}…", kept)
    }
}
