//! Shared DOM helpers for the extraction functions
//!
//! The scraped site has no stable markup contract, so everything here is an
//! explicit, ordered heuristic that can be adjusted when the markup drifts.

use scraper::{ElementRef, Html, Selector};

/// Collapsed visible text of an element
pub(crate) fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of each `<td>` cell in a row, in document order
pub(crate) fn cell_texts(row: ElementRef) -> Vec<String> {
    let Ok(selector) = Selector::parse("td") else {
        return Vec::new();
    };
    row.select(&selector).map(element_text).collect()
}

/// Picks the anchor with the longest visible text among a row's anchors
/// whose href contains `href_fragment`
///
/// Listing rows often carry two links to the same album: an abbreviation
/// and the full title. The longest text is taken as canonical.
///
/// Returns `(text, href)` of the winner, or `None` when the row has no
/// matching anchor with visible text.
pub(crate) fn longest_anchor(
    row: ElementRef,
    href_fragment: &str,
) -> Option<(String, String)> {
    let selector = Selector::parse("a[href]").ok()?;
    let mut best: Option<(String, String)> = None;

    for anchor in row.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.contains(href_fragment) {
            continue;
        }

        let text = element_text(anchor);
        if text.is_empty() {
            continue;
        }

        let longer = best
            .as_ref()
            .map_or(true, |(current, _)| text.chars().count() > current.chars().count());
        if longer {
            best = Some((text, href.to_string()));
        }
    }

    best
}

/// Whether the page links to `next_page`
///
/// Ordered fallback chain, any hit continues the crawl:
/// 1. an anchor whose query string carries an exact `page=<next>` pair
///    (a trailing slash before the `?` makes no difference)
/// 2. a pagination anchor whose text is the next page number
/// 3. an anchor labelled "Next"
/// 4. an anchor labelled ">"
pub(crate) fn has_next_page(document: &Html, next_page: u32) -> bool {
    let Ok(selector) = Selector::parse("a[href]") else {
        return false;
    };
    let anchors: Vec<ElementRef> = document.select(&selector).collect();

    if anchors.iter().any(|a| {
        a.value()
            .attr("href")
            .is_some_and(|href| href_has_page_param(href, next_page))
    }) {
        return true;
    }

    let next_label = next_page.to_string();
    if anchors.iter().any(|a| element_text(*a) == next_label) {
        return true;
    }

    if anchors.iter().any(|a| element_text(*a) == "Next") {
        return true;
    }

    anchors.iter().any(|a| element_text(*a) == ">")
}

/// Whether a href's query string contains an exact `page=<page>` pair
fn href_has_page_param(href: &str, page: u32) -> bool {
    let Some(query) = href.split('?').nth(1) else {
        return false;
    };
    let query = query.split('#').next().unwrap_or(query);
    let wanted = page.to_string();

    query
        .split('&')
        .any(|pair| matches!(pair.split_once('='), Some(("page", value)) if value == wanted))
}
