//! Record extractor: parses one page of rendered result markup into
//! [`SaleRow`]s.
//!
//! The portal renders results as styled generic containers, not a table.
//! Rows share a recurring layout class signature; fields are keyed by label
//! text inside marker spans. Extraction is pure over the snapshot string so
//! it can be tested without a browser.

use scraper::{ElementRef, Html, Selector};

use super::types::SaleRow;

/// Class substring shared by every result row container.
const ROW_CLASS_SIGNATURE: &str = "py-1 p-3 flex";

/// Label prefix of the associated-parcels line.
const ASSOCIATED_LABEL: &str = "Associated Parcels:";

/// The portal's known field labels. Anything else is ignored by design; the
/// label set has varied between deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LabelField {
    PropertyType,
    ReceptionNumber,
    SalePrice,
    SaleDate,
}

fn classify_label(label: &str) -> Option<LabelField> {
    if label.contains("Sale Property Type:") {
        Some(LabelField::PropertyType)
    } else if label.contains("Reception Number:") {
        Some(LabelField::ReceptionNumber)
    } else if label.contains("Sale Price:") {
        Some(LabelField::SalePrice)
    } else if label.contains("Sale Date:") {
        Some(LabelField::SaleDate)
    } else {
        None
    }
}

/// Extract all result rows from one page snapshot. Returns an empty vec when
/// the results container is absent; the caller decides what that means.
pub fn extract_rows(html: &str) -> Vec<SaleRow> {
    let document = Html::parse_document(html);
    let container_selector = Selector::parse("#results-table").unwrap();
    let div_selector = Selector::parse("div").unwrap();

    let Some(container) = document.select(&container_selector).next() else {
        return Vec::new();
    };

    container
        .select(&div_selector)
        .filter(|el| {
            el.value()
                .attr("class")
                .is_some_and(|c| c.contains(ROW_CLASS_SIGNATURE))
        })
        .map(extract_row)
        .collect()
}

fn extract_row(row: ElementRef) -> SaleRow {
    let bold_selector = Selector::parse("div.font-bold").unwrap();
    let compact_selector = Selector::parse("div.leading-4").unwrap();
    let label_selector = Selector::parse("span.opacity-70").unwrap();

    // Primary identifier sits in the emphasized div, with its label embedded
    // as a span that must not leak into the value.
    let parcel_id = row
        .select(&bold_selector)
        .next()
        .map(text_excluding_spans)
        .unwrap_or_default();

    let associated_parcels = row
        .select(&compact_selector)
        .next()
        .map(associated_parcels_text)
        .unwrap_or_default();

    let mut out = SaleRow {
        parcel_id,
        associated_parcels,
        ..Default::default()
    };

    // The remaining fields are routed by the label marker spans: read only
    // the direct text of each marker's parent, never text from nested
    // elements.
    for span in row.select(&label_selector) {
        let label: String = span.text().collect::<String>().trim().to_string();
        let Some(field) = classify_label(&label) else {
            continue;
        };
        let Some(parent) = span.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        let value = direct_text(parent);
        match field {
            LabelField::PropertyType => out.property_type = value,
            LabelField::ReceptionNumber => out.reception_number = value,
            LabelField::SalePrice => out.sale_price = value,
            LabelField::SaleDate => out.sale_date = value,
        }
    }

    out
}

/// Text of an element, skipping any `<span>` children (label markers).
fn text_excluding_spans(el: ElementRef) -> String {
    let mut out = String::new();
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if child_el.value().name() != "span" {
                out.extend(child_el.text());
            }
        }
    }
    out.trim().to_string()
}

/// Concatenation of only the direct text node children of an element.
fn direct_text(el: ElementRef) -> String {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .collect::<Vec<_>>()
        .concat()
        .trim()
        .to_string()
}

/// The associated-parcels line carries its label inline; keep only what
/// follows it, dropping separator residue.
fn associated_parcels_text(el: ElementRef) -> String {
    let joined = el
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    joined
        .split(ASSOCIATED_LABEL)
        .nth(1)
        .map(|rest| rest.trim_start_matches([',', ' ']).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(rows: &str) -> String {
        format!(r#"<html><body><div id="results-table">{}</div></body></html>"#, rows)
    }

    const FULL_ROW: &str = r#"
        <div class="py-1 p-3 flex flex-col border-b">
            <div class="font-bold"><span>Sale Parcel:</span> 123-45-678</div>
            <div class="leading-4"><span>Associated Parcels:</span> 200-10-001, 200-10-002</div>
            <div><span class="opacity-70">Sale Property Type:</span> Vacant Land <span>(code VL)</span></div>
            <div><span class="opacity-70">Reception Number:</span> 2010-123456</div>
            <div><span class="opacity-70">Sale Price:</span> $15,000</div>
            <div><span class="opacity-70">Sale Date:</span> 03/15/2010</div>
        </div>"#;

    #[test]
    fn test_full_row_extraction() {
        let rows = extract_rows(&page(FULL_ROW));
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.parcel_id, "123-45-678");
        assert_eq!(row.associated_parcels, "200-10-001, 200-10-002");
        assert_eq!(row.property_type, "Vacant Land");
        assert_eq!(row.reception_number, "2010-123456");
        assert_eq!(row.sale_price, "$15,000");
        assert_eq!(row.sale_date, "03/15/2010");
    }

    #[test]
    fn test_nested_elements_excluded_from_labeled_values() {
        // "(code VL)" lives in a nested span and must not leak into the
        // property type value.
        let rows = extract_rows(&page(FULL_ROW));
        assert!(!rows[0].property_type.contains("code VL"));
    }

    #[test]
    fn test_missing_parcel_yields_empty_string_row_kept() {
        let html = page(
            r#"<div class="py-1 p-3 flex">
                <div><span class="opacity-70">Sale Price:</span> $1,000</div>
            </div>"#,
        );
        let rows = extract_rows(&html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parcel_id, "");
        assert_eq!(rows[0].sale_price, "$1,000");
    }

    #[test]
    fn test_unknown_label_leaves_fields_empty() {
        let html = page(
            r#"<div class="py-1 p-3 flex">
                <div class="font-bold"><span>Sale Parcel:</span> 111-11-111</div>
                <div><span class="opacity-70">Recording District:</span> Northern</div>
            </div>"#,
        );
        let rows = extract_rows(&html);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].parcel_id, "111-11-111");
        assert_eq!(rows[0].property_type, "");
        assert_eq!(rows[0].reception_number, "");
        assert_eq!(rows[0].sale_price, "");
        assert_eq!(rows[0].sale_date, "");
    }

    #[test]
    fn test_no_container_yields_no_rows() {
        let rows = extract_rows("<html><body><p>No Results Found</p></body></html>");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_container_without_rows_yields_no_rows() {
        let rows = extract_rows(&page("<div class=\"pagination\"></div>"));
        assert!(rows.is_empty());
    }

    #[test]
    fn test_multiple_rows_counted_once_each() {
        let two = format!("{}{}", FULL_ROW, FULL_ROW.replace("123-45-678", "999-99-999"));
        let rows = extract_rows(&page(&two));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].parcel_id, "123-45-678");
        assert_eq!(rows[1].parcel_id, "999-99-999");
    }

    #[test]
    fn test_associated_parcels_absent_is_empty() {
        let html = page(
            r#"<div class="py-1 p-3 flex">
                <div class="font-bold"><span>Sale Parcel:</span> 123-45-678</div>
            </div>"#,
        );
        let rows = extract_rows(&html);
        assert_eq!(rows[0].associated_parcels, "");
    }
}
