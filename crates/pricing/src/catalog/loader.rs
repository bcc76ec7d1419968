//! Parsing of the flat catalog price list.
//!
//! Layout (15 columns, header row first):
//!
//! | col | field            | col | field          |
//! |-----|------------------|-----|----------------|
//! | 0   | product group    | 8   | tax rate (`%`) |
//! | 1   | product category | 9   | unit price     |
//! | 2   | printing sides   | 10  | unit           |
//! | 3   | variables        | 11  | ink cost       |
//! | 4   | size             | 12  | sheet cost     |
//! | 5   | material         | 13  | lamination cost|
//! | 6   | finish           | 14  | other cost     |
//! | 7   | (unused)         |     |                |

use tracing::warn;

use forgeprice_core::CatalogRowId;

use super::row::CatalogRow;

pub const CATALOG_COLUMNS: usize = 15;

/// Outcome of parsing a catalog source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCatalog {
    pub rows: Vec<CatalogRow>,
    /// Data lines dropped as malformed.
    pub skipped: usize,
}

/// Parse catalog text. Malformed records are skipped, never fatal.
///
/// Row ids come from the 1-based data record position, so skipped records
/// still consume a number and ids stay stable for an unchanged file.
pub fn parse_catalog(text: &str) -> ParsedCatalog {
    let mut parsed = ParsedCatalog::default();

    for (position, cols) in split_records(text).into_iter().skip(1).enumerate().map(|(i, r)| (i + 1, r)) {
        if cols.len() < CATALOG_COLUMNS {
            parsed.skipped += 1;
            continue;
        }
        match parse_row(position, &cols) {
            Some(row) => parsed.rows.push(row),
            None => {
                warn!(position, "skipping catalog row with unparseable numbers");
                parsed.skipped += 1;
            }
        }
    }

    parsed
}

fn parse_row(position: usize, cols: &[String]) -> Option<CatalogRow> {
    Some(CatalogRow {
        id: CatalogRowId::from_position(position),
        product_group: cols[0].clone(),
        product_category: cols[1].clone(),
        printing_sides: cols[2].clone(),
        variables: cols[3].clone(),
        size: cols[4].clone(),
        material: cols[5].clone(),
        finish: cols[6].clone(),
        tax_rate: parse_percentage(&cols[8])?,
        unit_price: parse_currency(&cols[9])?,
        unit: cols[10].clone(),
        ink_cost: parse_currency(&cols[11])?,
        sheet_cost: parse_currency(&cols[12])?,
        lamination_cost: parse_currency(&cols[13])?,
        or_cost: parse_currency(&cols[14])?,
    })
}

/// `"£1,234.50"` -> `1234.5`; blank -> `0.0`.
pub fn parse_currency(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, '£' | '$' | '€' | ','))
        .collect();
    parse_number(cleaned.trim())
}

/// `"20%"` -> `0.2`; blank -> `0.0`.
pub fn parse_percentage(value: &str) -> Option<f64> {
    let cleaned = value.trim().trim_end_matches('%').trim();
    parse_number(cleaned).map(|v| v / 100.0)
}

fn parse_number(value: &str) -> Option<f64> {
    if value.is_empty() {
        return Some(0.0);
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split comma-separated text into records, honouring double-quoted fields,
/// `""` escapes and line breaks inside quotes. A blank line is an empty record.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    // Whether the record being built has any content yet.
    let mut started = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('\r', false) if matches!(chars.peek(), Some('\n') | None) => {}
            ('\n', false) => {
                if started {
                    fields.push(std::mem::take(&mut current));
                }
                records.push(std::mem::take(&mut fields));
                started = false;
            }
            ('"', false) if current.is_empty() => {
                in_quotes = true;
                started = true;
            }
            (',', false) => {
                fields.push(std::mem::take(&mut current));
                started = true;
            }
            _ => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        fields.push(current);
        records.push(fields);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Group,Category,Sides,Variables,Size,Material,Finish,Notes,VAT,Price,Unit,Ink,Sheet,Lamination,Other";

    fn catalog(lines: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        text
    }

    #[test]
    fn parses_rows_and_skips_header() {
        let text = catalog(&[
            "Signs,Banner,Single,None,1000x500,PVC,Gloss,,20%,£10.00,sq/m,£1.00,£2.00,£0.50,",
            "Print,Flyer,Double,None,A5,Silk,Matt,,20%,\"£1,250.00\",each,,,,",
        ]);
        let parsed = parse_catalog(&text);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.rows.len(), 2);

        let banner = &parsed.rows[0];
        assert_eq!(banner.id.as_str(), "row-1");
        assert_eq!(banner.product_group, "Signs");
        assert_eq!(banner.tax_rate, 0.2);
        assert_eq!(banner.unit_price, 10.0);
        assert_eq!(banner.ink_cost, 1.0);
        assert_eq!(banner.lamination_cost, 0.5);
        assert_eq!(banner.or_cost, 0.0);
        assert!(banner.is_area_priced());

        let flyer = &parsed.rows[1];
        assert_eq!(flyer.id.as_str(), "row-2");
        assert_eq!(flyer.unit_price, 1250.0);
        assert!(!flyer.is_area_priced());
    }

    #[test]
    fn short_rows_are_skipped_but_keep_their_position() {
        let text = catalog(&[
            "Signs,Banner,Single",
            "",
            "Print,Flyer,Double,None,A5,Silk,Matt,,20%,£1.00,each,,,,",
        ]);
        let parsed = parse_catalog(&text);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].id.as_str(), "row-3");
    }

    #[test]
    fn garbage_numbers_skip_the_row() {
        let text = catalog(&["Print,Flyer,Double,None,A5,Silk,Matt,,abc,£1.00,each,,,,"]);
        let parsed = parse_catalog(&text);
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn empty_source_yields_no_rows() {
        assert_eq!(parse_catalog(""), ParsedCatalog::default());
        assert_eq!(parse_catalog(HEADER), ParsedCatalog::default());
    }

    #[test]
    fn number_helpers() {
        assert_eq!(parse_currency("£2,000.25"), Some(2000.25));
        assert_eq!(parse_currency("  "), Some(0.0));
        assert_eq!(parse_percentage("17.5%"), Some(0.175));
        assert_eq!(parse_percentage(""), Some(0.0));
        assert_eq!(parse_currency("n/a"), None);
    }

    #[test]
    fn quoted_fields_keep_commas_and_escaped_quotes() {
        let records = split_records("a,\"b, c\",\"say \"\"hi\"\"\",\r\nnext");
        assert_eq!(records, vec![vec!["a", "b, c", "say \"hi\"", ""], vec!["next"]]);
    }

    #[test]
    fn quoted_line_breaks_stay_inside_the_field() {
        let text = catalog(&[
            "Signs,Banner,Single,\"Eyelets\nevery 50cm\",1000x500,PVC,Gloss,,20%,£10.00,sq/m,,,,",
            "Print,Flyer,Double,None,A5,Silk,Matt,,20%,£1.00,each,,,,",
        ]);
        let parsed = parse_catalog(&text);
        assert_eq!(parsed.skipped, 0);
        let ids: Vec<(&str, &str)> = parsed
            .rows
            .iter()
            .map(|row| (row.id.as_str(), row.product_category.as_str()))
            .collect();
        assert_eq!(ids, vec![("row-1", "Banner"), ("row-2", "Flyer")]);
        assert_eq!(parsed.rows[0].variables, "Eyelets\nevery 50cm");
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let text = format!(
            "{HEADER}\r\nPrint,Flyer,Double,None,A5,Silk,Matt,,20%,£1.00,each,,,,\r\n"
        );
        let parsed = parse_catalog(&text);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].or_cost, 0.0);
        assert_eq!(parsed.rows[0].unit, "each");
    }
}
