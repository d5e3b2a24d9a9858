//! Result paginator: walks a multi-page result set until the "next" control
//! is absent, disabled, or the page ceiling is hit.

use std::time::Duration;

use chromiumoxide::Page;
use scraper::{Html, Selector};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;

use super::extract;
use super::types::SaleRow;

/// State of the page-advance control as read from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Absent,
    Disabled,
    Enabled,
}

/// Classify the "Next" control. The portal expresses "no further pages"
/// either as a bare `disabled` attribute or as `disabled="true"` /
/// `aria-disabled="true"` depending on how it rendered; any of these is
/// authoritative.
pub fn next_control_state(html: &str) -> NextState {
    let document = Html::parse_document(html);
    let button_selector = Selector::parse("button").unwrap();

    let next = document.select(&button_selector).find(|el| {
        el.text().collect::<String>().contains("Next")
    });

    let Some(next) = next else {
        return NextState::Absent;
    };

    let disabled = next.value().attr("disabled").is_some()
        || next.value().attr("aria-disabled") == Some("true");
    if disabled {
        NextState::Disabled
    } else {
        NextState::Enabled
    }
}

/// Click the first button whose visible text contains `needle`.
fn click_button_script(needle: &str) -> String {
    format!(
        r#"
        (function() {{
            var buttons = document.querySelectorAll('button');
            for (var i = 0; i < buttons.length; i++) {{
                if (buttons[i].textContent.indexOf('{}') >= 0) {{
                    buttons[i].click();
                    return true;
                }}
            }}
            return false;
        }})()
        "#,
        needle
    )
}

async fn click_button(page: &Page, needle: &str) -> bool {
    page.evaluate(click_button_script(needle).as_str())
        .await
        .map(|v| v.into_value().unwrap_or(false))
        .unwrap_or(false)
}

/// Best-effort attempt to raise the per-page size so fewer pages need
/// walking. Degrades silently when the control or the larger options are
/// not offered; never fails the run.
async fn maximize_page_size(page: &Page) {
    if !click_button(page, "Per Page").await {
        debug!("no per-page control found, using portal default page size");
        return;
    }
    sleep(Duration::from_secs(1)).await;

    for size in ["100", "50"] {
        if click_button(page, size).await {
            info!("set results to {} per page", size);
            sleep(Duration::from_secs(3)).await;
            return;
        }
    }
    debug!("per-page options not offered, using portal default page size");
}

/// Walk every result page, handing each snapshot to the extractor. A failed
/// "Next" activation stops the walk and keeps what was gathered so far.
pub async fn collect_all_pages(
    page: &Page,
    config: &ScrapeConfig,
) -> Result<Vec<SaleRow>, ScrapeError> {
    maximize_page_size(page).await;

    let mut all_rows = Vec::new();
    let mut page_num: u32 = 1;

    loop {
        let html = page
            .content()
            .await
            .map_err(|e| ScrapeError::Navigation(e.to_string()))?;

        let rows = extract::extract_rows(&html);
        if rows.is_empty() {
            // May legitimately be the last page.
            warn!("no result rows on page {}", page_num);
        } else {
            info!("extracted {} rows from page {}", rows.len(), page_num);
        }
        all_rows.extend(rows);

        match next_control_state(&html) {
            NextState::Absent => {
                info!("no Next control, finished after {} page(s)", page_num);
                break;
            }
            NextState::Disabled => {
                info!("Next control disabled, finished after {} page(s)", page_num);
                break;
            }
            NextState::Enabled => {
                if page_num >= config.max_pages {
                    warn!(
                        "page ceiling of {} reached with Next still enabled, stopping",
                        config.max_pages
                    );
                    break;
                }
                if !click_button(page, "Next").await {
                    warn!(
                        "Next activation failed on page {}, keeping {} rows gathered so far",
                        page_num,
                        all_rows.len()
                    );
                    break;
                }
                sleep(config.settle_delay).await;
                page_num += 1;
            }
        }
    }

    Ok(all_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_absent() {
        let html = "<html><body><div id='results-table'></div></body></html>";
        assert_eq!(next_control_state(html), NextState::Absent);
    }

    #[test]
    fn test_next_enabled() {
        let html = "<html><body><button>Next</button></body></html>";
        assert_eq!(next_control_state(html), NextState::Enabled);
    }

    #[test]
    fn test_next_disabled_bare_attribute() {
        let html = "<html><body><button disabled>Next</button></body></html>";
        assert_eq!(next_control_state(html), NextState::Disabled);
    }

    #[test]
    fn test_next_disabled_attribute_value() {
        let html = r#"<html><body><button disabled="true">Next</button></body></html>"#;
        assert_eq!(next_control_state(html), NextState::Disabled);
    }

    #[test]
    fn test_next_disabled_aria_marker() {
        let html = r#"<html><body><button aria-disabled="true">Next</button></body></html>"#;
        assert_eq!(next_control_state(html), NextState::Disabled);
    }

    #[test]
    fn test_next_text_outside_button_is_absent() {
        let html = "<html><body><p>Next page coming soon</p></body></html>";
        assert_eq!(next_control_state(html), NextState::Absent);
    }

    #[test]
    fn test_record_count_sums_across_pages() {
        // Two rows on page one, one row on page two with Next disabled:
        // extraction plus the next-state walk yields exactly three rows.
        let row = |parcel: &str| {
            format!(
                r#"<div class="py-1 p-3 flex">
                    <div class="font-bold"><span>Sale Parcel:</span> {}</div>
                </div>"#,
                parcel
            )
        };
        let page_one = format!(
            r#"<html><body><div id="results-table">{}{}</div>
               <button>Next</button></body></html>"#,
            row("100-00-001"),
            row("100-00-002")
        );
        let page_two = format!(
            r#"<html><body><div id="results-table">{}</div>
               <button disabled>Next</button></body></html>"#,
            row("100-00-003")
        );

        let mut all_rows = Vec::new();
        let mut pages = 0;
        for html in [page_one, page_two] {
            all_rows.extend(extract::extract_rows(&html));
            pages += 1;
            match next_control_state(&html) {
                NextState::Enabled => continue,
                NextState::Absent | NextState::Disabled => break,
            }
        }

        assert_eq!(pages, 2);
        assert_eq!(all_rows.len(), 3);
        let parcels: Vec<_> = all_rows.iter().map(|r| r.parcel_id.as_str()).collect();
        assert_eq!(parcels, ["100-00-001", "100-00-002", "100-00-003"]);
    }
}
