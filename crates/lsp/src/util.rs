use std::path::PathBuf;
use tagscope_api::Language;
use tower_lsp::lsp_types::{
    Location, Position, Range, TextDocumentContentChangeEvent, Url,
};

pub fn uri_to_path(uri: &Url) -> Option<PathBuf> {
    uri.to_file_path().ok()
}

/// Lightweight container for document state
pub struct Document {
    pub content: String,
    pub language: Language,
    pub version: i32,
}

impl Document {
    pub fn new(content: String, language: Language, version: i32) -> Self {
        Self {
            content,
            language,
            version,
        }
    }

    pub fn for_uri(uri: &Url, content: String, version: i32) -> Self {
        let language = uri_to_path(uri)
            .map(|p| Language::from_path(&p))
            .unwrap_or(Language::UNKNOWN);
        Self::new(content, language, version)
    }
}

/// Byte offset of an editor position. Columns are UTF-16 units.
pub fn offset_at(text: &str, position: Position) -> usize {
    let mut line = 0;
    let mut offset = 0;
    let mut chars = text.chars().peekable();

    while line < position.line as usize {
        let Some(c) = chars.next() else {
            return offset;
        };
        offset += c.len_utf8();
        if c == '\n' {
            line += 1;
        } else if c == '\r' {
            if let Some(next) = chars.next_if_eq(&'\n') {
                offset += next.len_utf8();
            }
            line += 1;
        }
    }

    let mut utf16_count = 0;
    while utf16_count < position.character as usize {
        match chars.next() {
            Some('\n' | '\r') | None => break,
            Some(c) => {
                utf16_count += c.len_utf16();
                offset += c.len_utf8();
            }
        }
    }
    offset
}

/// Apply incremental or full-text changes in order.
pub fn apply_changes(content: &str, changes: &[TextDocumentContentChangeEvent]) -> String {
    let mut content = content.to_string();
    for change in changes {
        match change.range {
            Some(range) => {
                let start = offset_at(&content, range.start);
                let end = offset_at(&content, range.end).max(start);
                content.replace_range(start..end, &change.text);
            }
            None => content = change.text.clone(),
        }
    }
    content
}

/// The tag reference under the cursor: `c-todo-item`, `c:todoItem` or `c/todoItem`.
pub fn tag_at(content: &str, position: Position) -> Option<String> {
    let line = content.lines().nth(position.line as usize)?;
    let is_tag_char = |c: char| c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '/');

    let line_start = offset_at(content, Position::new(position.line, 0));
    let col = offset_at(content, position)
        .saturating_sub(line_start)
        .min(line.len());

    let start = line[..col]
        .rfind(|c| !is_tag_char(c))
        .map(|i| i + 1)
        .unwrap_or(0);
    let end = line[col..]
        .find(|c| !is_tag_char(c))
        .map(|i| i + col)
        .unwrap_or(line.len());

    let word = line.get(start..end)?.trim_matches(|c| matches!(c, '-' | ':' | '/'));
    (!word.is_empty()).then(|| word.to_string())
}

/// Script imports name components as `c/todoItem`; the index wants the key.
pub fn strip_module_namespace(word: &str) -> &str {
    word.split_once('/').map(|(_, name)| name).unwrap_or(word)
}

pub fn to_lsp_range(range: tagscope_api::Range) -> Range {
    Range::new(
        Position::new(range.start_line as u32, range.start_col as u32),
        Position::new(range.end_line as u32, range.end_col as u32),
    )
}

pub fn to_lsp_location(location: &tagscope_api::Location) -> Option<Location> {
    let uri = Url::from_file_path(&location.path).ok()?;
    Some(Location::new(uri, to_lsp_range(location.range)))
}
