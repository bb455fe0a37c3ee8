use crate::data::model::Table;

/// Rows shown in the dataset preview.
pub const PREVIEW_ROWS: usize = 8;

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the first `rows` rows of `table` as a striped HTML table.
pub fn preview_html(table: &Table, rows: usize) -> String {
    let mut html = String::from("<table border=\"1\" class=\"dataframe table table-striped\">\n");

    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for name in table.column_names() {
        html.push_str(&format!("      <th>{}</th>\n", escape_html(&name)));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for idx in 0..table.len().min(rows) {
        html.push_str("    <tr>\n");
        for value in table.row(idx) {
            html.push_str(&format!("      <td>{}</td>\n", escape_html(&value.to_string())));
        }
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>");
    html
}
