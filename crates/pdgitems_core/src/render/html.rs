//! HTML printout pages.
//!
//! # Invariants
//! - All database text is escaped before it reaches the page.
//! - Each member is rendered at most once per group.
//! - Mapped targets are listed by target charge, descending, targets
//!   without charge last.

use crate::group::{CategoryBucket, ItemGroup};
use crate::model::item::{ItemId, ItemKind, ItemRow, KindClass};
use crate::store::{ItemStore, NotFoundExt, StoreResult};
use std::collections::HashSet;

const PRINTOUT_CSS: &str = include_str!("printout.css");

const COLUMNS: [&str; 11] = [
    "Name",
    "Item type",
    "PDGID",
    "MCID",
    "Q",
    "I",
    "G",
    "J",
    "P",
    "C",
    "Mapped targets",
];

/// Target item of an aliasing edge, as shown in the last column.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedTarget {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    pub charge: Option<f64>,
}

/// Lists the existing targets of `item`, ordered by charge descending.
pub fn mapped_targets<S: ItemStore + ?Sized>(store: &S, item: ItemId) -> StoreResult<Vec<MappedTarget>> {
    let mut targets = Vec::new();
    for edge in store.targets(item)? {
        let Some(row) = store.item_row(edge.target).not_found_as_none()? else {
            continue;
        };
        targets.push(MappedTarget {
            id: row.id(),
            charge: row.charge(),
            name: row.item.name,
            kind: row.item.kind,
        });
    }
    targets.sort_by(|a, b| match (a.charge, b.charge) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    Ok(targets)
}

/// Renders the complete page of one category.
pub fn render_page<S: ItemStore + ?Sized>(store: &S, bucket: &CategoryBucket) -> StoreResult<String> {
    let title = escape(&bucket.category);
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n  <head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <style>\n");
    html.push_str(PRINTOUT_CSS);
    html.push_str("    </style>\n");
    html.push_str(&format!("    <title>{title}</title>\n"));
    html.push_str("  </head>\n  <body>\n");
    html.push_str(&format!("    <div class=\"title\">{title}</div>\n"));
    html.push_str(&legend());
    html.push_str("    <table>\n      <thead>\n        <tr>\n");
    for column in COLUMNS {
        html.push_str(&format!("          <th>{column}</th>\n"));
    }
    html.push_str("        </tr>\n      </thead>\n");
    for categorized in &bucket.groups {
        html.push_str(&render_group(store, &categorized.group)?);
    }
    html.push_str("    </table>\n  </body>\n</html>\n");
    Ok(html)
}

fn legend() -> String {
    format!(
        "    <div class=\"legend\">Item type colors:\
<span class=\"first-legend-label {}\">Specific, </span>\
<span class=\"legend-label {}\">alias, </span>\
<span class=\"legend-label {}\">generic, </span>\
<span class=\"legend-label {}\">other</span></div>\n",
        KindClass::Specific.css_class(),
        KindClass::Alias.css_class(),
        KindClass::Generic.css_class(),
        KindClass::Other.css_class(),
    )
}

/// Renders one group as its own `tbody`, members in display order.
pub fn render_group<S: ItemStore + ?Sized>(store: &S, group: &ItemGroup) -> StoreResult<String> {
    let mut html = String::from("      <tbody class=\"group\">\n");
    let mut rendered = HashSet::new();
    for row in group.arranged_members() {
        if !rendered.insert(row.id()) {
            continue;
        }
        let targets = mapped_targets(store, row.id())?;
        html.push_str(&render_row(row, &targets));
    }
    html.push_str("      </tbody>\n");
    Ok(html)
}

fn render_row(row: &ItemRow, targets: &[MappedTarget]) -> String {
    let kind = row.item.kind;
    let particle = row.particle.as_ref();
    let cells = [
        cell(&row.item.name),
        format!(
            "<td class=\"{}\">{}<span class=\"extra\"> ({})</span></td>",
            kind.class().css_class(),
            kind.code(),
            escape(kind.label())
        ),
        cell(&maybe(particle.map(|p| p.pdgid.to_string()))),
        cell(&maybe(particle.and_then(|p| p.mcid).map(|mcid| mcid.to_string()))),
        cell(&maybe(row.charge().map(format_charge))),
        cell(&maybe(particle.and_then(|p| p.quantum_i.clone()))),
        cell(&maybe(particle.and_then(|p| p.quantum_g.clone()))),
        cell(&maybe(particle.and_then(|p| p.quantum_j.clone()))),
        cell(&maybe(particle.and_then(|p| p.quantum_p.clone()))),
        cell(&maybe(particle.and_then(|p| p.quantum_c.clone()))),
        targets_cell(targets),
    ];

    let mut html = String::from("        <tr>\n");
    for cell in cells {
        html.push_str(&format!("          {cell}\n"));
    }
    html.push_str("        </tr>\n");
    html
}

fn targets_cell(targets: &[MappedTarget]) -> String {
    let spans: Vec<String> = targets
        .iter()
        .map(|target| {
            format!(
                "<span class=\"{}\">{}</span>",
                target.kind.class().css_class(),
                escape(&target.name)
            )
        })
        .collect();
    format!("<td>{}</td>", spans.join("<br>"))
}

fn cell(text: &str) -> String {
    format!("<td>{}</td>", escape(text))
}

fn maybe(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Charges keep one decimal at least, e.g. `1.0` and `-0.3333333333333333`.
pub fn format_charge(charge: f64) -> String {
    format!("{charge:?}")
}

/// Escapes text for HTML element and attribute content.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::{escape, format_charge};

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape("eta'(958) <&>"), "eta&#x27;(958) &lt;&amp;&gt;");
        assert_eq!(escape("\"q\""), "&quot;q&quot;");
    }

    #[test]
    fn charges_always_show_a_decimal() {
        assert_eq!(format_charge(1.0), "1.0");
        assert_eq!(format_charge(-1.0), "-1.0");
        assert_eq!(format_charge(0.5), "0.5");
    }
}
