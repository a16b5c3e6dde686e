//! End-to-end pipeline tests: CSV bytes in, HTML document out.

use bestsellers::{generate_report, rank, ReportConfig, ReportError};
use bestsellers::{OrderLines, SalesTotals};
use pretty_assertions::assert_eq;

fn config(top_k: usize) -> ReportConfig {
    ReportConfig {
        top_k,
        ..ReportConfig::default()
    }
}

#[test]
fn test_round_trip_report() {
    let input = "StockCode,Description,Quantity\n\
                 A,Widget,5\n\
                 B,Gadget,10\n\
                 A,Widget,3\n";

    let html = generate_report(input.as_bytes(), &config(2)).unwrap();

    // Gadget (10) outranks Widget (8); exactly those two body rows.
    let gadget = html.find("<td>Gadget</td>").unwrap();
    let widget = html.find("<td>Widget</td>").unwrap();
    assert!(gadget < widget);
    assert_eq!(html.matches(r#"<th scope="row">"#).count(), 2);
    assert!(html.contains("<td>10</td>"));
    assert!(html.contains("<td>8</td>"));
}

#[test]
fn test_aggregation_matches_row_sums() {
    let input = "StockCode,Description,Quantity\n\
                 A,Widget,5\n\
                 B,Gadget,10\n\
                 A,Widget,3\n";

    let lines = OrderLines::from_bytes(input.as_bytes(), encoding_rs::UTF_8).unwrap();
    let totals = SalesTotals::from_lines(lines).unwrap();

    assert_eq!(totals.get("A").unwrap().quantity, 8);
    assert_eq!(totals.get("B").unwrap().quantity, 10);

    let ranked = rank::top(&totals, 2);
    assert_eq!(ranked[0].product_name, "Gadget");
    assert_eq!(ranked[0].total_quantity, 10);
    assert_eq!(ranked[1].product_name, "Widget");
    assert_eq!(ranked[1].total_quantity, 8);
}

#[test]
fn test_equal_totals_rank_by_first_appearance() {
    let input = "StockCode,Description,Quantity\n\
                 A,X,5\n\
                 B,Y,5\n";

    let lines = OrderLines::from_bytes(input.as_bytes(), encoding_rs::UTF_8).unwrap();
    let totals = SalesTotals::from_lines(lines).unwrap();
    let ranked = rank::top(&totals, 2);

    assert_eq!(ranked[0].rank, 1);
    assert_eq!(ranked[0].product_name, "X");
    assert_eq!(ranked[1].rank, 2);
    assert_eq!(ranked[1].product_name, "Y");
}

#[test]
fn test_invalid_quantity_fails_the_invocation() {
    let input = "StockCode,Description,Quantity\n\
                 A,Widget,5\n\
                 B,Gadget,abc\n";

    let err = generate_report(input.as_bytes(), &config(10)).err().unwrap();

    assert!(matches!(
        err,
        ReportError::InvalidQuantity { line: 3, ref value } if value == "abc"
    ));
}

#[test]
fn test_missing_quantity_column_fails_first() {
    let input = "StockCode,Description\n\
                 A,Widget\n";

    let err = generate_report(input.as_bytes(), &config(10)).err().unwrap();

    assert!(matches!(err, ReportError::MissingColumn("Quantity")));
}

#[test]
fn test_header_only_input_renders_empty_report() {
    let input = "StockCode,Description,Quantity\n";

    let html = generate_report(input.as_bytes(), &config(10)).unwrap();

    assert!(html.contains(r#"<th scope="col">Sold Items</th>"#));
    assert!(!html.contains(r#"<th scope="row">"#));
}

#[test]
fn test_top_k_zero_renders_empty_report() {
    let input = "StockCode,Description,Quantity\n\
                 A,Widget,5\n";

    let html = generate_report(input.as_bytes(), &config(0)).unwrap();

    assert!(!html.contains(r#"<th scope="row">"#));
}

#[test]
fn test_default_encoding_accepts_legacy_bytes() {
    // windows-1252 é in the description, as the legacy exports contain.
    let input = b"StockCode,Description,Quantity\nA,Caf\xe9 set,4\n";

    let html = generate_report(input, &ReportConfig::default()).unwrap();

    assert!(html.contains("<td>Café set</td>"));
}

#[test]
fn test_report_generation_is_deterministic() {
    let input = "StockCode,Description,Quantity\n\
                 A,Widget,5\n\
                 B,Gadget,10\n";

    let first = generate_report(input.as_bytes(), &config(10)).unwrap();
    let second = generate_report(input.as_bytes(), &config(10)).unwrap();

    assert_eq!(first, second);
}
