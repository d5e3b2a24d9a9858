//! Field locator: resolves a logical form field to a concrete control by
//! walking an ordered list of fallback lookup strategies.
//!
//! The portal's markup is not under our control and has shifted between
//! deployments, so each field carries heterogeneous strategies (name
//! attribute, id, raw CSS, button text). The first strategy that finds an
//! element wins; new fallbacks are added by extending the list, not the
//! control flow.

use chromiumoxide::{Element, Page};
use tracing::debug;

use crate::error::ScrapeError;

/// A single lookup strategy, interpreted in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Match on the `name` attribute.
    Name(&'static str),
    /// Match on the `id` attribute.
    Id(&'static str),
    /// Raw CSS selector.
    Css(&'static str),
    /// Button or submit input whose visible text contains the needle. No
    /// stable attribute exists for these controls on the portal.
    ButtonText(&'static str),
}

/// A logical form field with its fallback chain. Static configuration.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub logical_name: &'static str,
    pub strategies: &'static [Strategy],
}

/// A resolved control, with the selector it was found under so callers can
/// address it again from script.
pub struct Located {
    pub element: Element,
    pub selector: String,
}

/// CSS selector for a strategy, if it is expressible as one.
fn strategy_selector(strategy: &Strategy) -> Option<String> {
    match strategy {
        Strategy::Name(name) => Some(format!("[name='{}']", name)),
        Strategy::Id(id) => Some(format!("#{}", id)),
        Strategy::Css(css) => Some((*css).to_string()),
        Strategy::ButtonText(_) => None,
    }
}

/// Tag the first button-like control containing `needle` with a
/// `data-locator` attribute so it can be fetched as an element.
fn tag_button_script(needle: &str, tag: &str) -> String {
    format!(
        r#"
        (function() {{
            var nodes = document.querySelectorAll(
                'button, input[type="submit"], input[type="button"]');
            for (var i = 0; i < nodes.length; i++) {{
                var text = nodes[i].textContent || nodes[i].value || '';
                if (text.indexOf('{}') >= 0) {{
                    nodes[i].setAttribute('data-locator', '{}');
                    return true;
                }}
            }}
            return false;
        }})()
        "#,
        needle, tag
    )
}

/// Try each strategy in order; return the first control found, or `None`
/// once all strategies are exhausted. The caller decides whether a miss is
/// soft (degrade and continue) or hard (fail the book).
pub async fn locate(
    page: &Page,
    field: &FieldDescriptor,
) -> Result<Option<Located>, ScrapeError> {
    for strategy in field.strategies {
        let selector = match strategy_selector(strategy) {
            Some(selector) => selector,
            None => {
                let Strategy::ButtonText(needle) = *strategy else {
                    continue;
                };
                let tagged: bool = page
                    .evaluate(tag_button_script(needle, field.logical_name).as_str())
                    .await
                    .map(|v| v.into_value().unwrap_or(false))
                    .unwrap_or(false);
                if !tagged {
                    continue;
                }
                format!("[data-locator='{}']", field.logical_name)
            }
        };

        if let Ok(element) = page.find_element(&selector).await {
            debug!(
                "located '{}' via {:?} ({})",
                field.logical_name, strategy, selector
            );
            return Ok(Some(Located { element, selector }));
        }
    }

    Ok(None)
}

/// Like [`locate`], but a miss is fatal for the current book.
pub async fn locate_required(
    page: &Page,
    field: &FieldDescriptor,
) -> Result<Located, ScrapeError> {
    locate(page, field).await?.ok_or_else(|| {
        ScrapeError::ElementNotFound(format!(
            "'{}' not found after {} strategies",
            field.logical_name,
            field.strategies.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_selectors() {
        assert_eq!(
            strategy_selector(&Strategy::Name("book")).as_deref(),
            Some("[name='book']")
        );
        assert_eq!(
            strategy_selector(&Strategy::Id("iframe1")).as_deref(),
            Some("#iframe1")
        );
        assert_eq!(
            strategy_selector(&Strategy::Css("input[type='text']")).as_deref(),
            Some("input[type='text']")
        );
        assert!(strategy_selector(&Strategy::ButtonText("Search")).is_none());
    }

    #[test]
    fn test_tag_button_script_embeds_needle_and_tag() {
        let script = tag_button_script("Search", "submit");
        assert!(script.contains("indexOf('Search')"));
        assert!(script.contains("'data-locator', 'submit'"));
    }
}
