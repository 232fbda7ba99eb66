//! Plain-text share rendering
//!
//! Each composition renders as fixed lines in this order:
//! `Name`, `Base`, `Mixer`, `Liqueur`, `Rim`, `Garnish`, `Notes`.
//! An empty section renders as the literal `None`.

use std::collections::BTreeMap;

use crate::composition::SavedDrink;
use crate::model::Category;

pub const SHARE_HEADER: &str = "Check out my creations from SipBook!";
pub const SEPARATOR: &str = "----------------------------------";

/// Render every composition behind the share header, each followed by a rule
pub fn render_all(records: &[SavedDrink]) -> String {
    let mut out = String::from(SHARE_HEADER);
    out.push('\n');
    for record in records {
        out.push('\n');
        out.push_str(&render_one(record));
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}

/// Render a single composition, one line per section
pub fn render_one(record: &SavedDrink) -> String {
    let base_category = record.kind.base_category();
    let lines = [
        ("Name", or_none(record.name.trim().to_string())),
        ("Base", quantified(record, base_category)),
        ("Mixer", quantified(record, Category::Mixer)),
        ("Liqueur", quantified(record, Category::Liqueur)),
        ("Rim", record.rim.label().to_string()),
        ("Garnish", or_none(record.garnishes.join(", "))),
        ("Notes", or_none(record.notes.trim().to_string())),
    ];

    lines
        .iter()
        .map(|(label, value)| format!("{label}: {value}\n"))
        .collect()
}

fn quantified(record: &SavedDrink, category: Category) -> String {
    let empty = BTreeMap::new();
    let quantities = record.quantities(category).unwrap_or(&empty);
    let items: Vec<String> = record
        .names(category)
        .iter()
        .map(|name| match (category.unit(), quantities.get(name)) {
            (Some(unit), Some(&n)) => format!("{name} ({})", unit.format(n)),
            _ => name.clone(),
        })
        .collect();
    or_none(items.join(", "))
}

fn or_none(text: String) -> String {
    if text.is_empty() {
        "None".to_string()
    } else {
        text
    }
}
