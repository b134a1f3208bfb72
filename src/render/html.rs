//! Standalone HTML rendering.

use std::fmt::Write as _;

use crate::model::{
    CanvasModel, CanvasObject, DocumentStructure, Insert, RichTextModel, Table, TextSpan,
};

const HEAD: &str = "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>Document</title>\n<style>body { font-family: Arial, sans-serif; padding: 20px; }</style>\n</head>\n<body>";
const TAIL: &str = "</body>\n</html>";

/// Render an extracted document as HTML.
pub fn to_html(doc: &DocumentStructure) -> String {
    let mut parts = vec![HEAD.to_string()];

    for page in &doc.pages {
        parts.push(format!("<div class=\"page\" data-page=\"{}\">", page.page_number));
        parts.push(format!("<h2>Page {}</h2>", page.page_number));

        for block in &page.text_blocks {
            parts.push("<div class=\"text-block\">".to_string());
            for line in &block.lines {
                for span in &line.spans {
                    parts.push(span_html(span));
                }
                parts.push("<br>".to_string());
            }
            parts.push("</div>".to_string());
        }

        for image in &page.images {
            parts.push(format!(
                "<img src=\"{}\" width=\"{}\" height=\"{}\" />",
                escape_html(&image.data),
                image.width,
                image.height
            ));
        }

        for table in &page.tables {
            parts.push(table_html(table));
        }

        parts.push("</div>".to_string());
    }

    parts.push(TAIL.to_string());
    parts.join("\n")
}

/// Render a rich-text model as HTML, one paragraph per text insert.
pub fn rich_text_to_html(model: &RichTextModel) -> String {
    let mut parts = vec![HEAD.to_string()];

    for op in &model.ops {
        match &op.insert {
            Insert::Text(text) => {
                let attrs = &op.attributes;
                let mut html = escape_html(text).replace('\n', "<br>");
                if attrs.is_bold() {
                    html = format!("<strong>{}</strong>", html);
                }
                if attrs.is_italic() {
                    html = format!("<em>{}</em>", html);
                }

                let mut styles = Vec::new();
                if let Some(color) = &attrs.color {
                    styles.push(format!("color: {}", escape_html(color)));
                }
                if let Some(size) = &attrs.size {
                    styles.push(format!("font-size: {}", escape_html(size)));
                }
                if !styles.is_empty() {
                    html = format!("<span style=\"{}\">{}</span>", styles.join("; "), html);
                }
                parts.push(format!("<p>{}</p>", html));
            }
            Insert::Image { image } => {
                parts.push(format!("<img src=\"{}\" />", escape_html(image)));
            }
        }
    }

    parts.push(TAIL.to_string());
    parts.join("\n")
}

/// Render a canvas model as HTML in top-to-bottom order.
pub fn canvas_to_html(model: &CanvasModel) -> String {
    let mut parts = vec![HEAD.to_string()];

    let mut objects: Vec<&CanvasObject> = model.objects.iter().collect();
    objects.sort_by(|a, b| a.top().total_cmp(&b.top()));

    for object in objects {
        match object {
            CanvasObject::Text(t) => {
                let mut styles = vec![format!("font-size: {}px", t.font_size)];
                if t.is_bold() {
                    styles.push("font-weight: bold".to_string());
                }
                if t.is_italic() {
                    styles.push("font-style: italic".to_string());
                }
                if !t.fill.is_empty() {
                    styles.push(format!("color: {}", escape_html(&t.fill)));
                }
                parts.push(format!(
                    "<p style=\"{}\">{}</p>",
                    styles.join("; "),
                    escape_html(&t.text).replace('\n', "<br>")
                ));
            }
            CanvasObject::Image(i) => {
                parts.push(format!(
                    "<img src=\"{}\" width=\"{}\" height=\"{}\" />",
                    escape_html(&i.src),
                    i.width,
                    i.height
                ));
            }
            CanvasObject::Rect(_) | CanvasObject::Line(_) => {}
        }
    }

    parts.push(TAIL.to_string());
    parts.join("\n")
}

fn span_html(span: &TextSpan) -> String {
    let mut html = escape_html(&span.text);

    let mut styles = Vec::new();
    if span.size > 0.0 {
        styles.push(format!("font-size: {}px", span.size));
    }
    if !span.color.is_black() {
        styles.push(format!("color: {}", span.color.to_hex()));
    }

    if span.bold {
        html = format!("<strong>{}</strong>", html);
    }
    if span.italic {
        html = format!("<em>{}</em>", html);
    }
    if !styles.is_empty() {
        html = format!("<span style=\"{}\">{}</span>", styles.join("; "), html);
    }
    html
}

fn table_html(table: &Table) -> String {
    let mut out = String::from("<table border=\"1\">\n");
    for row in &table.normalized_rows(table.column_count()) {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(cell).replace('\n', "<br>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>");
    out
}

/// Escape text content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{BoundingBox, Color};
    use crate::model::{Attributes, PageStructure, RichTextOp, TableKind, TextBlock, TextLine};

    #[test]
    fn test_document_html() {
        let mut page = PageStructure::new(1, 595.0, 842.0);
        let span = TextSpan::new("a < b", "Helvetica-Bold", 12.0, BoundingBox::new(0.0, 0.0, 10.0, 10.0))
            .with_color(Color::from_packed(0xff0000));
        page.text_blocks
            .push(TextBlock::from_lines(vec![TextLine::from_spans(vec![span])]));
        page.tables.push(Table::new(
            vec![vec!["x".into(), "y".into()], vec!["z".into()]],
            BoundingBox::new(0.0, 50.0, 10.0, 60.0),
            TableKind::Aligned,
        ));
        let doc = DocumentStructure {
            pages: vec![page],
            total_pages: 1,
            ..Default::default()
        };

        let html = to_html(&doc);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>Page 1</h2>"));
        assert!(html.contains("<span style=\"font-size: 12px; color: #ff0000\"><strong>a &lt; b</strong></span>"));
        assert!(html.contains("<td>z</td><td></td>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_rich_text_html() {
        let mut model = RichTextModel::new();
        model.push(RichTextOp::styled("Hi\n", Attributes::default().bold().with_color("#667eea")));
        model.push(RichTextOp::image("data:image/png;base64,AA==", Attributes::default()));

        let html = rich_text_to_html(&model);
        assert!(html.contains("<p><span style=\"color: #667eea\"><strong>Hi<br></strong></span></p>"));
        assert!(html.contains("<img src=\"data:image/png;base64,AA==\" />"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
