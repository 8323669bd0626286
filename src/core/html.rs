// src/core/html.rs
use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid selector")
}

pub static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
pub static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
pub static ANY_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
pub static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));

/// A hyperlink as found in a cell: visible text plus target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

/// Raw text of an element, text nodes joined with spaces so adjacent
/// inline elements don't fuse ("Batting" + "R" must stay two words).
pub fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ")
}

/// Body rows of a table. Tables without `<tbody>` fall back to every `<tr>`.
pub fn body_rows<'a>(table: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let rows: Vec<_> = table.select(&BODY_ROW).collect();
    if rows.is_empty() {
        table.select(&ANY_ROW).collect()
    } else {
        rows
    }
}

/// Direct `<td>` children of a row. Header `<th>` cells are not data.
pub fn cells<'a>(row: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "td")
        .collect()
}

/// Every `<a href>` under the element, in document order.
pub fn links(el: ElementRef<'_>) -> Vec<Link> {
    el.select(&LINK)
        .filter_map(|a| {
            let href = a.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(Link { text: text_of(a), href: href.to_string() })
        })
        .collect()
}

/// Target of the first link under the element, if any.
pub fn first_href(el: ElementRef<'_>) -> Option<String> {
    links(el).into_iter().next().map(|l| l.href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn rows_without_explicit_tbody() {
        let doc = Html::parse_fragment("<table><tr><td>a</td><td>b</td></tr></table>");
        let table = doc.select(&TABLE).next().unwrap();
        let rows = body_rows(table);
        assert_eq!(rows.len(), 1);
        assert_eq!(cells(rows[0]).len(), 2);
    }

    #[test]
    fn header_cells_are_not_counted() {
        let doc = Html::parse_fragment(
            "<table><tbody><tr><th>Batting</th><td>x</td></tr></tbody></table>",
        );
        let table = doc.select(&TABLE).next().unwrap();
        assert_eq!(cells(body_rows(table)[0]).len(), 1);
    }

    #[test]
    fn links_keep_text_and_href() {
        let doc = Html::parse_fragment(
            r#"<div>c <a href="/cricketers/steve-smith-267192">Smith</a> b <a href="">Jones</a></div>"#,
        );
        let div = doc.root_element();
        let got = links(div);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].text, "Smith");
        assert_eq!(got[0].href, "/cricketers/steve-smith-267192");
    }
}
