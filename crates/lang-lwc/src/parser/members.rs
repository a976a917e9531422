use super::doc;
use super::position::LineIndex;
use tagscope_api::{ClassMember, Decorator, MemberKind};
use tree_sitter::Node;

const FIELD_KINDS: &[&str] = &["field_definition", "public_field_definition"];

/// Members of a class body in declaration order. Accessor pairs collapse into
/// one property; the constructor and `#private` names are skipped.
pub(crate) fn collect(body: Node<'_>, source: &str, lines: &LineIndex<'_>) -> Vec<ClassMember> {
    let mut members: Vec<ClassMember> = Vec::new();
    // TypeScript places method decorators next to the method, not inside it
    let mut pending: Vec<Node<'_>> = Vec::new();
    let mut last_comment: Option<Node<'_>> = None;

    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {
                last_comment = Some(child);
                continue;
            }
            "decorator" => {
                pending.push(child);
                continue;
            }
            _ => {}
        }

        let kind = if FIELD_KINDS.contains(&child.kind()) {
            MemberKind::Property
        } else if child.kind() == "method_definition" {
            if is_accessor(child) {
                MemberKind::Property
            } else {
                MemberKind::Method
            }
        } else {
            pending.clear();
            last_comment = None;
            continue;
        };

        let mut decorators = std::mem::take(&mut pending);
        decorators.extend(inner_decorators(child));
        let comment = last_comment.take();

        let Some(name) = member_name(child, source) else {
            continue;
        };
        if name == "constructor" {
            continue;
        }

        let start = decorators
            .iter()
            .map(|d| d.start_position())
            .chain(std::iter::once(child.start_position()))
            .min()
            .unwrap_or_else(|| child.start_position());
        let decorator = decorators
            .iter()
            .find_map(|d| decorator_name(*d, source).and_then(Decorator::from_name));
        let doc = comment.and_then(|c| doc::adjacent_doc(c, start.row, source));

        if kind == MemberKind::Property {
            if let Some(existing) = members
                .iter_mut()
                .find(|m| m.name == name && m.kind == MemberKind::Property)
            {
                // Second half of a getter/setter pair
                existing.decorator = existing.decorator.or(decorator);
                existing.doc = existing.doc.take().or(doc);
                continue;
            }
        }

        members.push(ClassMember {
            name,
            kind,
            decorator,
            doc,
            loc: Some(lines.span(start, child.end_position())),
        });
    }
    members
}

fn is_accessor(method: Node<'_>) -> bool {
    let mut cursor = method.walk();
    let mut children = method.children(&mut cursor);
    children.any(|c| matches!(c.kind(), "get" | "set"))
}

fn inner_decorators(member: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = member.walk();
    member
        .children(&mut cursor)
        .filter(|c| c.kind() == "decorator")
        .collect()
}

fn member_name(member: Node<'_>, source: &str) -> Option<String> {
    let name = member
        .child_by_field_name("property")
        .or_else(|| member.child_by_field_name("name"))?;
    if !matches!(name.kind(), "property_identifier" | "identifier") {
        return None;
    }
    name.utf8_text(source.as_bytes()).ok().map(str::to_string)
}

/// `@api`, `@wire(getRecord, {...})` and `@lwc.track` all resolve to the last
/// identifier before any call arguments.
fn decorator_name<'s>(decorator: Node<'_>, source: &'s str) -> Option<&'s str> {
    let mut expr = decorator.named_child(0)?;
    if expr.kind() == "call_expression" {
        expr = expr.child_by_field_name("function")?;
    }
    if expr.kind() == "member_expression" {
        expr = expr.child_by_field_name("property")?;
    }
    match expr.kind() {
        "identifier" | "property_identifier" => expr.utf8_text(source.as_bytes()).ok(),
        _ => None,
    }
}
