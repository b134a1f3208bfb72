//! Reading-order composition of a page's elements.

use crate::geometry::CONTAINMENT_TOLERANCE;
use crate::model::{Element, PageStructure};

/// Build the page's `elements` list from its blocks, images and tables.
///
/// Elements are stably sorted top to bottom. Text blocks lying inside a
/// detected table are dropped from the list (they stay in `text_blocks`).
pub fn compose_page(page: &mut PageStructure) {
    page.elements = compose_elements(page);
}

/// Reading-order elements of a page without mutating it.
pub fn compose_elements(page: &PageStructure) -> Vec<Element> {
    let mut elements: Vec<Element> = page
        .text_blocks
        .iter()
        .cloned()
        .map(Element::text)
        .chain(page.images.iter().cloned().map(Element::image))
        .chain(page.tables.iter().cloned().map(Element::table))
        .collect();

    // Stable: equal y keeps insertion order.
    elements.sort_by(|a, b| a.y().total_cmp(&b.y()));

    let table_boxes: Vec<_> = elements
        .iter()
        .filter(|e| matches!(e, Element::Table { .. }))
        .map(|e| *e.bbox())
        .collect();

    if table_boxes.is_empty() {
        return elements;
    }

    let before = elements.len();
    elements.retain(|e| match e {
        Element::Text { bbox, .. } => !table_boxes
            .iter()
            .any(|t| t.contains_with_tolerance(bbox, CONTAINMENT_TOLERANCE)),
        _ => true,
    });
    if elements.len() != before {
        log::debug!(
            "Page {}: dropped {} text blocks inside tables",
            page.page_number,
            before - elements.len()
        );
    }

    elements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use crate::model::{ImageElement, Table, TableKind, TextBlock, TextLine, TextSpan};

    fn block(text: &str, bbox: BoundingBox) -> TextBlock {
        TextBlock::from_lines(vec![TextLine::from_spans(vec![TextSpan::new(
            text,
            "Helvetica",
            12.0,
            bbox,
        )])])
    }

    fn image(y: f32) -> ImageElement {
        ImageElement::from_bytes(b"img", "png", (10, 10), BoundingBox::new(300.0, y, 400.0, y + 10.0), 1)
    }

    fn table(bbox: BoundingBox) -> Table {
        Table::new(
            vec![vec!["a".into(), "b".into()], vec!["c".into(), "d".into()]],
            bbox,
            TableKind::Grid,
        )
    }

    #[test]
    fn test_reading_order_image_table_text() {
        let mut page = PageStructure::new(1, 595.0, 842.0);
        page.text_blocks.push(block("body", BoundingBox::new(72.0, 100.0, 200.0, 112.0)));
        page.images.push(image(50.0));
        page.tables.push(table(BoundingBox::new(300.0, 75.0, 500.0, 95.0)));

        compose_page(&mut page);
        let kinds: Vec<&str> = page.elements.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["image", "table", "text"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut page = PageStructure::new(1, 595.0, 842.0);
        page.text_blocks.push(block("first", BoundingBox::new(10.0, 60.0, 50.0, 70.0)));
        page.images.push(image(60.0));

        let elements = compose_elements(&page);
        assert_eq!(elements[0].kind(), "text");
        assert_eq!(elements[1].kind(), "image");
    }

    #[test]
    fn test_text_inside_table_is_dropped() {
        let mut page = PageStructure::new(1, 595.0, 842.0);
        page.text_blocks.push(block("A1", BoundingBox::new(52.0, 102.0, 70.0, 114.0)));
        page.text_blocks.push(block("outside", BoundingBox::new(52.0, 300.0, 120.0, 312.0)));
        page.tables.push(table(BoundingBox::new(50.0, 100.0, 250.0, 140.0)));

        compose_page(&mut page);
        let texts: Vec<String> = page
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { data, .. } => Some(data.text()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["outside".to_string()]);
        assert_eq!(page.text_blocks.len(), 2);
    }

    #[test]
    fn test_containment_allows_slack() {
        let mut page = PageStructure::new(1, 595.0, 842.0);
        // Pokes 4pt past the table's left edge.
        page.text_blocks.push(block("edge", BoundingBox::new(46.0, 104.0, 80.0, 116.0)));
        page.tables.push(table(BoundingBox::new(50.0, 100.0, 250.0, 140.0)));

        assert_eq!(compose_elements(&page).len(), 1);
    }
}
