use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    let body = response.into_body();
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Could not get response body");
    let text = String::from_utf8_lossy(&body).to_string();

    Html::parse_document(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}

/// Get the text of every cell in the table rows matching `row_selector`.
#[track_caller]
pub(crate) fn table_rows(html: &Html, row_selector: &str) -> Vec<Vec<String>> {
    let row_selector = Selector::parse(row_selector).expect("invalid row selector");
    let cell_selector = Selector::parse("td").unwrap();

    html.select(&row_selector)
        .map(|row| row.select(&cell_selector).map(element_text).collect())
        .collect()
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}
