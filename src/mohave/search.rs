//! Search submitter: fills the Affidavit of Value search form for one book
//! number and triggers the search.
//!
//! The date range and property type are non-essential to a minimally valid
//! search, so their locator misses degrade with a warning. The book field
//! and the submit control are mandatory; missing either fails the book.

use std::time::Duration;

use chromiumoxide::Page;
use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ScrapeError;

use super::locate::{locate, locate_required, FieldDescriptor, Strategy};
use super::types::{property_type_code, SearchParameters};

const SEARCH_FRAME: FieldDescriptor = FieldDescriptor {
    logical_name: "search frame",
    strategies: &[Strategy::Id("iframe1"), Strategy::Css("iframe")],
};

const DATE_FROM: FieldDescriptor = FieldDescriptor {
    logical_name: "date from",
    strategies: &[Strategy::Name("date_from")],
};

const DATE_TO: FieldDescriptor = FieldDescriptor {
    logical_name: "date to",
    strategies: &[Strategy::Name("date_to")],
};

const PROPERTY_TYPE: FieldDescriptor = FieldDescriptor {
    logical_name: "property type",
    strategies: &[Strategy::Name("property_type_code")],
};

const BOOK_FIELD: FieldDescriptor = FieldDescriptor {
    logical_name: "book number",
    strategies: &[
        Strategy::Name("book"),
        Strategy::Id("book"),
        Strategy::Css("input[type='text']"),
    ],
};

const SUBMIT: FieldDescriptor = FieldDescriptor {
    logical_name: "submit",
    strategies: &[
        Strategy::Css("input[type='submit']"),
        Strategy::Css("button[type='submit']"),
        Strategy::ButtonText("Search"),
    ],
};

/// What the portal showed after submitting: a results container, or an
/// explicit (or assumed, on timeout) empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Results,
    NoResults,
}

/// Convert the canonical `MM/DD/YYYY` parameter format to the `YYYY-MM-DD`
/// form the portal's native date inputs expect.
fn to_portal_date(canonical: &str) -> Option<String> {
    NaiveDate::parse_from_str(canonical, "%m/%d/%Y")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Absolute URL for a frame `src` attribute; relative values resolve
/// against the document that embeds the frame.
fn resolve_frame_src(base: &str, src: &str) -> Option<String> {
    if src.starts_with("http") {
        return Some(src.to_string());
    }
    Url::parse(base)
        .and_then(|base| base.join(src))
        .ok()
        .map(|url| url.to_string())
}

fn set_value_script(selector: &str, value: &str) -> String {
    format!(
        r#"
        (function() {{
            var el = document.querySelector("{}");
            if (!el) return false;
            el.value = '{}';
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()
        "#,
        selector, value
    )
}

/// Fill the search form and submit it. All subsequent lookups for this book
/// run inside the search frame once it has been entered.
pub async fn submit_search(page: &Page, params: &SearchParameters) -> Result<(), ScrapeError> {
    enter_search_frame(page).await;
    select_book_search_mode(page).await;

    fill_date(page, &DATE_FROM, &params.date_from).await?;
    fill_date(page, &DATE_TO, &params.date_to).await?;
    select_property_type(page, &params.property_type).await?;

    fill_book_number(page, params.book_number).await?;

    let submit = locate_required(page, &SUBMIT).await?;
    submit
        .element
        .click()
        .await
        .map_err(|e| ScrapeError::JavaScript(format!("submit click: {}", e)))?;
    info!("submitted search for book {}", params.book_number);

    Ok(())
}

/// The search form is served inside an iframe. Navigating into the frame
/// document keeps every later lookup inside it. Missing frame is soft: some
/// deployments embed the form directly.
async fn enter_search_frame(page: &Page) {
    let located = match locate(page, &SEARCH_FRAME).await {
        Ok(Some(located)) => located,
        _ => {
            warn!("search form iframe not found, continuing on main page");
            return;
        }
    };

    let src = located
        .element
        .attribute("src")
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    if src.is_empty() {
        warn!("search frame has no src, continuing on main page");
        return;
    }

    let base = page.url().await.ok().flatten().unwrap_or_default();
    let Some(target) = resolve_frame_src(&base, &src) else {
        warn!(
            "could not resolve frame src '{}' against '{}', continuing on main page",
            src, base
        );
        return;
    };

    match page.goto(target.as_str()).await {
        Ok(_) => {
            let _ = page.wait_for_navigation().await;
            sleep(Duration::from_secs(1)).await;
            info!("entered search frame");
        }
        Err(e) => warn!("could not enter search frame: {}", e),
    }
}

/// Activate the "Book Search" mode radio with a programmatic click; the
/// control is styled hidden-but-functional, so a normal interaction check
/// would refuse it.
async fn select_book_search_mode(page: &Page) {
    let clicked: bool = page
        .evaluate(
            r#"
            (function() {
                var radio = document.querySelector(
                    'input[type="radio"][value="Book Search"]');
                if (radio) {
                    radio.click();
                    return true;
                }
                return false;
            })()
            "#,
        )
        .await
        .map(|v| v.into_value().unwrap_or(false))
        .unwrap_or(false);

    if clicked {
        debug!("selected Book Search mode");
        sleep(Duration::from_millis(500)).await;
    } else {
        warn!("Book Search radio not found, using portal default mode");
    }
}

/// Fill a date input via script; native date inputs reject keystroke entry.
async fn fill_date(
    page: &Page,
    field: &FieldDescriptor,
    canonical: &str,
) -> Result<(), ScrapeError> {
    let Some(located) = locate(page, field).await? else {
        warn!("'{}' field not found, searching without it", field.logical_name);
        return Ok(());
    };

    let Some(portal_date) = to_portal_date(canonical) else {
        warn!(
            "'{}' value '{}' is not MM/DD/YYYY, leaving field unset",
            field.logical_name, canonical
        );
        return Ok(());
    };

    let set: bool = page
        .evaluate(set_value_script(&located.selector, &portal_date).as_str())
        .await
        .map(|v| v.into_value().unwrap_or(false))
        .unwrap_or(false);

    if set {
        debug!("entered {}: {} ({})", field.logical_name, canonical, portal_date);
    } else {
        warn!("could not set '{}' value", field.logical_name);
    }
    Ok(())
}

/// Select the property type by portal code, falling back to the label text
/// when no mapping entry exists.
async fn select_property_type(page: &Page, property_type: &str) -> Result<(), ScrapeError> {
    let Some(located) = locate(page, &PROPERTY_TYPE).await? else {
        warn!("property type dropdown not found, searching all types");
        return Ok(());
    };

    let code = property_type_code(property_type);
    let set: bool = page
        .evaluate(set_value_script(&located.selector, code).as_str())
        .await
        .map(|v| v.into_value().unwrap_or(false))
        .unwrap_or(false);

    if set {
        debug!("selected property type '{}' (value: {})", property_type, code);
    } else {
        warn!("could not select property type '{}'", property_type);
    }
    Ok(())
}

/// Clear and type the book number. A miss here is fatal for the book.
async fn fill_book_number(page: &Page, book_number: u32) -> Result<(), ScrapeError> {
    let located = locate_required(page, &BOOK_FIELD).await?;

    let _ = page
        .evaluate(set_value_script(&located.selector, "").as_str())
        .await;

    located
        .element
        .click()
        .await
        .map_err(|e| ScrapeError::JavaScript(format!("book field focus: {}", e)))?
        .type_str(&book_number.to_string())
        .await
        .map_err(|e| ScrapeError::JavaScript(format!("book field input: {}", e)))?;

    debug!("entered book number: {}", book_number);
    Ok(())
}

/// Poll until the results container or a no-results indicator appears.
/// Exceeding the timeout is treated the same as an explicit empty result.
pub async fn wait_for_search_outcome(
    page: &Page,
    timeout: Duration,
) -> Result<SearchOutcome, ScrapeError> {
    let poll_interval = Duration::from_millis(500);
    let start = std::time::Instant::now();

    loop {
        let state: String = page
            .evaluate(
                r#"
                (function() {
                    if (document.getElementById('results-table')) return 'results';
                    var body = document.body ? document.body.innerText : '';
                    if (body.indexOf('No Results Found') >= 0) return 'empty';
                    return 'pending';
                })()
                "#,
            )
            .await
            .map(|v| v.into_value().unwrap_or_default())
            .unwrap_or_default();

        match state.as_str() {
            "results" => return Ok(SearchOutcome::Results),
            "empty" => {
                info!("portal reported no results");
                return Ok(SearchOutcome::NoResults);
            }
            _ => {}
        }

        if start.elapsed() > timeout {
            warn!(
                "neither results nor a no-results indicator within {:?}, treating as empty",
                timeout
            );
            return Ok(SearchOutcome::NoResults);
        }

        sleep(poll_interval).await;
    }
}
