//! Conversions between the naming conventions used to reference a component.
//!
//! The canonical key of a component is its module file stem (`todo_item`,
//! `todoItem`). Markup references it as `c-todo_item` / `c-todo-item`, aura
//! markup as `c:todoItem`, and script imports as `c/todo_item`.

use heck::{ToKebabCase, ToLowerCamelCase, ToSnakeCase};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static TAG_REF_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(?P<namespace>c|lightning|interop)?(?P<delimiter>:|-?)(?P<name>[A-Za-z0-9_-]+)$")
        .ok()
});

pub const AURA_DELIMITER: &str = ":";
pub const MARKUP_DELIMITER: &str = "-";
pub const DEFAULT_NAMESPACE: &str = "c";

/// A parsed tag reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagRef<'a> {
    /// No delimiter: the whole query is the key.
    Bare(&'a str),
    /// `c:todoItem`
    Aura {
        namespace: Option<&'a str>,
        name: &'a str,
    },
    /// `c-todo_item`, `c-todo-item`
    Markup {
        namespace: Option<&'a str>,
        name: &'a str,
    },
}

impl<'a> TagRef<'a> {
    /// Returns `None` when the query cannot name a component at all.
    pub fn parse(query: &'a str) -> Option<Self> {
        let caps = TAG_REF_PATTERN.as_ref()?.captures(query)?;
        let namespace = caps.name("namespace").map(|m| m.as_str());
        let name = caps.name("name")?.as_str();
        let delimiter = caps.name("delimiter").map(|m| m.as_str()).unwrap_or("");

        Some(match delimiter {
            AURA_DELIMITER => TagRef::Aura { namespace, name },
            MARKUP_DELIMITER => TagRef::Markup { namespace, name },
            _ => TagRef::Bare(query),
        })
    }

    /// Keys to try, in order, against the index.
    pub fn lookup_keys(&self, query: &'a str) -> Vec<Cow<'a, str>> {
        match *self {
            TagRef::Aura { name, .. } if !name.contains(['-', '_']) => {
                vec![Cow::Borrowed(name), Cow::Owned(name.to_snake_case())]
            }
            TagRef::Markup { name, .. } => {
                vec![Cow::Borrowed(name), Cow::Owned(name.to_lower_camel_case())]
            }
            TagRef::Aura { .. } | TagRef::Bare(_) => vec![Cow::Borrowed(query)],
        }
    }
}

/// Resolve `query` to the first key accepted by `contains`.
///
/// Total over all inputs: anything that does not parse yields `None`.
pub fn resolve(query: &str, contains: impl Fn(&str) -> bool) -> Option<String> {
    let tag_ref = TagRef::parse(query)?;
    tag_ref
        .lookup_keys(query)
        .into_iter()
        .find(|key| contains(key))
        .map(Cow::into_owned)
}

/// Markup-dialect tag for a component key (`todoItem` -> `c-todo-item`).
pub fn lwc_tag_name(tag_name: &str) -> String {
    if tag_name.contains('_') {
        format!("{DEFAULT_NAMESPACE}-{tag_name}")
    } else {
        format!("{DEFAULT_NAMESPACE}-{}", tag_name.to_kebab_case())
    }
}

/// Aura-dialect tag for a component key (`todo_item` -> `c:todoItem`).
pub fn aura_tag_name(tag_name: &str) -> String {
    format!("{DEFAULT_NAMESPACE}:{}", tag_name.to_lower_camel_case())
}

/// Module specifier used by script imports (`c/todo_item`).
pub fn module_specifier(tag_name: &str) -> String {
    format!("{DEFAULT_NAMESPACE}/{tag_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn index(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn lookup(names: &HashSet<String>, query: &str) -> Option<String> {
        resolve(query, |k| names.contains(k))
    }

    #[test]
    fn parses_each_dialect() {
        assert_eq!(
            TagRef::parse("c:todoItem"),
            Some(TagRef::Aura {
                namespace: Some("c"),
                name: "todoItem"
            })
        );
        assert_eq!(
            TagRef::parse("lightning-button"),
            Some(TagRef::Markup {
                namespace: Some("lightning"),
                name: "button"
            })
        );
        assert_eq!(TagRef::parse("todo_item"), Some(TagRef::Bare("todo_item")));
        assert_eq!(TagRef::parse("foo.bar"), None);
    }

    #[test]
    fn snake_case_component_resolves_from_all_forms() {
        let names = index(&["todo_item"]);
        for query in ["todo_item", "c-todo_item", "c:todoItem"] {
            assert_eq!(lookup(&names, query).as_deref(), Some("todo_item"), "{query}");
        }
    }

    #[test]
    fn mixed_delimiter_and_casing_do_not_resolve() {
        let names = index(&["todo_item", "todo_foo", "hello_world"]);
        assert_eq!(lookup(&names, "c:todo-foo"), None);
        assert_eq!(lookup(&names, "c-helloWorld"), None);
    }

    #[test]
    fn camel_case_component_resolves_from_hyphenated_markup() {
        let names = index(&["todoItem"]);
        assert_eq!(lookup(&names, "c-todo-item").as_deref(), Some("todoItem"));
        assert_eq!(lookup(&names, "c:todoItem").as_deref(), Some("todoItem"));
    }

    #[test]
    fn resolution_never_panics_on_garbage() {
        let names = index(&["todo_item"]);
        for query in [
            "",
            ":",
            "c:",
            "-",
            "a:b:c",
            "{!v.record.Name}",
            "this.foo.bar",
            "   ",
            "c:todo:item",
            "çà-€",
        ] {
            assert_eq!(lookup(&names, query), None, "{query:?}");
        }
    }

    #[test]
    fn renders_dialect_names() {
        assert_eq!(lwc_tag_name("todo_item"), "c-todo_item");
        assert_eq!(lwc_tag_name("todoItem"), "c-todo-item");
        assert_eq!(aura_tag_name("todo_item"), "c:todoItem");
        assert_eq!(module_specifier("todoItem"), "c/todoItem");
    }
}
