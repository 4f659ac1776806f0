//! HTML and Markdown output for checked tables.

use html_escape::encode_double_quoted_attribute;

use super::data::{ColAlign, TableBlockData};
use crate::handler::RenderContext;

fn align_css(align: ColAlign) -> &'static str {
    match align {
        ColAlign::Left => "left",
        ColAlign::Center => "center",
        ColAlign::Right => "right",
    }
}

fn format_width(width: f64) -> String {
    if width.fract() == 0.0 {
        format!("{}px", width as u64)
    } else {
        format!("{width}px")
    }
}

pub(super) fn to_html(table: &TableBlockData, ctx: &RenderContext<'_>) -> String {
    let header_rows = table.header_rows.unwrap_or(0) as usize;
    let anchors = table.anchors();
    let (rows, _) = table.dimensions();

    let mut out = String::from("<table>");

    if let Some(widths) = &table.col_widths {
        out.push_str("<colgroup>");
        for width in widths {
            let style = format!("width: {}", format_width(*width));
            out.push_str(&format!(
                "<col style=\"{}\">",
                encode_double_quoted_attribute(&style)
            ));
        }
        out.push_str("</colgroup>");
    }

    for r in 0..rows {
        let in_header = r < header_rows;
        if r == 0 && in_header {
            out.push_str("<thead>");
        }
        if r == header_rows {
            out.push_str("<tbody>");
        }

        out.push_str("<tr>");
        let tag = if in_header { "th" } else { "td" };
        for ((_, c), cell) in anchors.iter().filter(|((row, _), _)| *row == r) {
            out.push('<');
            out.push_str(tag);
            if cell.colspan() > 1 {
                out.push_str(&format!(" colspan=\"{}\"", cell.colspan()));
            }
            if cell.rowspan() > 1 {
                out.push_str(&format!(" rowspan=\"{}\"", cell.rowspan()));
            }
            if let Some(align) = table.align_of(*c) {
                out.push_str(&format!(" style=\"text-align: {}\"", align_css(align)));
            }
            out.push('>');
            out.push_str(&ctx.render_delta(&cell.ops));
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        out.push_str("</tr>");

        if in_header && r + 1 == header_rows {
            out.push_str("</thead>");
        }
    }
    if header_rows < rows {
        out.push_str("</tbody>");
    }

    out.push_str("</table>");
    out
}

/// Cell text safe for a single pipe-table cell.
fn markdown_cell(rendered: &str) -> String {
    rendered
        .trim_end_matches('\n')
        .trim()
        .replace('|', "\\|")
        .replace('\n', "<br>")
}

fn markdown_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

/// Caller guarantees the table is checked and has no merged cells, so every
/// grid position holds exactly one anchor.
pub(super) fn to_markdown(table: &TableBlockData, ctx: &RenderContext<'_>) -> String {
    let (rows, cols) = table.dimensions();
    let mut grid: Vec<Vec<String>> = vec![vec![String::new(); cols]; rows];
    for ((r, c), cell) in table.anchors() {
        grid[r][c] = markdown_cell(&ctx.render_delta(&cell.ops));
    }

    let mut lines = Vec::with_capacity(rows + 2);
    let body_start = if table.header_rows.unwrap_or(0) >= 1 {
        lines.push(markdown_row(&grid[0]));
        1
    } else {
        // Pipe tables require a header row.
        lines.push(markdown_row(&vec![String::new(); cols]));
        0
    };

    let separator: Vec<String> = (0..cols)
        .map(|c| {
            match table.align_of(c) {
                Some(ColAlign::Left) => ":---",
                Some(ColAlign::Center) => ":---:",
                Some(ColAlign::Right) => "---:",
                None => "---",
            }
            .to_string()
        })
        .collect();
    lines.push(markdown_row(&separator));

    for row in &grid[body_start..] {
        lines.push(markdown_row(row));
    }

    lines.join("\n")
}
