use crate::rank::RankedEntry;

/// Render the ranked entries as a complete, self-contained HTML document.
///
/// One table, three columns, one body row per entry in the given order; an
/// empty ranking renders the header over an empty body. Identical input
/// produces identical bytes.
pub fn render_html(entries: &[RankedEntry]) -> String {
    let rows: String = entries.iter().map(render_row).collect();

    format!(
        r#"<!doctype html>
<html>
<head>
    <title>Bestsellers</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.1.3/dist/css/bootstrap.min.css" rel="stylesheet"
          integrity="sha384-1BmE4kWBq78iYhFldvKuhfTAU6auU8tT94WrHftjDbrCEXSU1oBoqyl2QvZ6jIW3" crossorigin="anonymous">
</head>
<body>
<div class="container">
    <table class="table mt-3">
        <thead>
            <tr>
                <th scope="col">#</th>
                <th scope="col">Name</th>
                <th scope="col">Sold Items</th>
            </tr>
        </thead>
        <tbody>
{rows}        </tbody>
    </table>
</div>
</body>
</html>
"#,
        rows = rows
    )
}

fn render_row(entry: &RankedEntry) -> String {
    format!(
        r#"            <tr>
                <th scope="row">{rank}</th>
                <td>{name}</td>
                <td>{quantity}</td>
            </tr>
"#,
        rank = entry.rank,
        name = html_escape(&entry.product_name),
        quantity = entry.total_quantity,
    )
}

/// Escape a string for embedding in HTML element content, so descriptions
/// containing markup-significant characters cannot alter the document.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
