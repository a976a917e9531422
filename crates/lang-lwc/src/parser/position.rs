use tagscope_api::Range;
use tree_sitter::{Node, Point};

/// Converts tree-sitter byte columns into UTF-16 columns.
pub(crate) struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { source, starts }
    }

    fn utf16_column(&self, point: Point) -> usize {
        let Some(&start) = self.starts.get(point.row) else {
            return point.column;
        };
        self.source
            .get(start..start + point.column)
            .map(|prefix| prefix.encode_utf16().count())
            .unwrap_or(point.column)
    }

    pub fn span(&self, start: Point, end: Point) -> Range {
        Range::new(
            start.row,
            self.utf16_column(start),
            end.row,
            self.utf16_column(end),
        )
    }

    pub fn range(&self, node: Node<'_>) -> Range {
        self.span(node.start_position(), node.end_position())
    }
}
