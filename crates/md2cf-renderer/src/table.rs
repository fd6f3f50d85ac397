//! GFM table rendering.

use md2cf_adf::AdfNode;

use crate::inline::render_inline;

/// Render a `table` node as a GFM pipe table.
///
/// The first row is the header. Short rows are padded to the widest row.
/// Pipes in cell text are escaped and line breaks become spaces.
pub(crate) fn render_table(node: &AdfNode) -> String {
    let rows: Vec<Vec<String>> = node
        .children()
        .iter()
        .filter(|row| row.is("tableRow"))
        .map(|row| row.children().iter().map(render_cell).collect())
        .collect();

    let Some(columns) = rows.iter().map(Vec::len).max().filter(|&n| n > 0) else {
        return String::new();
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (i, row) in rows.iter().enumerate() {
        let mut cells = row.clone();
        cells.resize(columns, String::new());
        lines.push(format_row(&cells));
        if i == 0 {
            lines.push(format_row(&vec!["---".to_owned(); columns]));
        }
    }
    lines.join("\n")
}

fn render_cell(cell: &AdfNode) -> String {
    cell.children()
        .iter()
        .map(|block| render_inline(block.children()))
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
        .replace('\n', " ")
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cell(kind: &str, text: &str) -> AdfNode {
        AdfNode::new(kind).with_content(vec![AdfNode::paragraph(vec![AdfNode::text(text)])])
    }

    fn row(cells: Vec<AdfNode>) -> AdfNode {
        AdfNode::new("tableRow").with_content(cells)
    }

    #[test]
    fn test_header_and_body() {
        let table = AdfNode::new("table").with_content(vec![
            row(vec![cell("tableHeader", "A"), cell("tableHeader", "B")]),
            row(vec![cell("tableCell", "1"), cell("tableCell", "2")]),
        ]);
        assert_eq!(render_table(&table), "| A | B |\n| --- | --- |\n| 1 | 2 |");
    }

    #[test]
    fn test_short_rows_padded() {
        let table = AdfNode::new("table").with_content(vec![
            row(vec![cell("tableHeader", "A")]),
            row(vec![cell("tableCell", "1"), cell("tableCell", "2"), cell("tableCell", "3")]),
        ]);
        assert_eq!(
            render_table(&table),
            "| A |  |  |\n| --- | --- | --- |\n| 1 | 2 | 3 |"
        );
    }

    #[test]
    fn test_pipes_escaped() {
        let table = AdfNode::new("table").with_content(vec![row(vec![cell("tableHeader", "a|b")])]);
        assert_eq!(render_table(&table), "| a\\|b |\n| --- |");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_table(&AdfNode::new("table")), "");
        let table = AdfNode::new("table").with_content(vec![AdfNode::new("tableRow")]);
        assert_eq!(render_table(&table), "");
    }
}
