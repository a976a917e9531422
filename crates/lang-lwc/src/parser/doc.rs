use tree_sitter::Node;

pub(crate) fn is_doc_comment(node: Node<'_>, source: &str) -> bool {
    node.kind() == "comment"
        && node
            .utf8_text(source.as_bytes())
            .is_ok_and(|text| text.starts_with("/**") && text != "/**/")
}

/// Doc comment ending on the line right before `start_row`.
pub(crate) fn adjacent_doc(comment: Node<'_>, start_row: usize, source: &str) -> Option<String> {
    if !is_doc_comment(comment, source) || comment.end_position().row + 1 < start_row {
        return None;
    }
    comment.utf8_text(source.as_bytes()).ok().and_then(clean)
}

/// Doc comment directly preceding `node` among its siblings.
pub(crate) fn leading_doc(node: Node<'_>, source: &str) -> Option<String> {
    let comment = node.prev_named_sibling()?;
    adjacent_doc(comment, node.start_position().row, source)
}

/// Strip the comment delimiters and leading `*` gutters.
pub(crate) fn clean(raw: &str) -> Option<String> {
    let body = raw.strip_prefix("/**")?.strip_suffix("*/")?;
    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .collect();
    let text = lines.join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
