use scraper::{Html, Selector};

/// Flattens an HTML fragment to plain text. Paragraphs are separated by a
/// blank line; everything else is concatenated as rendered text.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);

    let paragraphs: Vec<String> = Selector::parse("p")
        .map(|selector| {
            fragment
                .select(&selector)
                .map(|p| collapse(&p.text().collect::<String>()))
                .filter(|text| !text.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if paragraphs.is_empty() {
        collapse(&fragment.root_element().text().collect::<String>())
    } else {
        paragraphs.join("\n\n")
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
