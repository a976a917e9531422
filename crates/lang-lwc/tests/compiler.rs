use tagscope_api::{Decorator, MemberKind, MetadataCompiler};
use tagscope_lwc::LwcCompiler;

const TODO_ITEM: &str = r#"import { LightningElement, api, track, wire } from 'lwc';
import getRecord from '@salesforce/apex/Todo.getRecord';

/**
 * Renders a single todo entry.
 */
export default class TodoItem extends LightningElement {
    /** Text shown for the entry. */
    @api label;

    @api
    get done() {
        return this._done;
    }
    set done(value) {
        this._done = value;
    }

    @track state = { open: false };

    @wire(getRecord, { recordId: '$recordId' })
    record;

    _done = false;

    constructor() {
        super();
    }

    /** Moves focus to the checkbox. */
    @api focus() {
        this.template.querySelector('input').focus();
    }

    handleClick() {}
}
"#;

#[test]
fn extracts_members_with_decorators_and_docs() {
    let out = LwcCompiler::new().compile(TODO_ITEM, "todoItem.js");
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
    let meta = out.metadata.unwrap();

    assert_eq!(meta.doc.as_deref(), Some("Renders a single todo entry."));
    assert_eq!(
        meta.decorators,
        vec![Decorator::Api, Decorator::Track, Decorator::Wire]
    );

    let names: Vec<_> = meta.class_members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["label", "done", "state", "record", "_done", "focus", "handleClick"]
    );

    let label = &meta.class_members[0];
    assert_eq!(label.kind, MemberKind::Property);
    assert_eq!(label.decorator, Some(Decorator::Api));
    assert_eq!(label.doc.as_deref(), Some("Text shown for the entry."));

    let done = &meta.class_members[1];
    assert_eq!(done.kind, MemberKind::Property);
    assert_eq!(done.decorator, Some(Decorator::Api));
    assert_eq!(done.loc.unwrap().start_line, 10);

    assert_eq!(meta.class_members[3].decorator, Some(Decorator::Wire));
    assert_eq!(meta.class_members[4].decorator, None);

    let focus = &meta.class_members[5];
    assert_eq!(focus.kind, MemberKind::Method);
    assert_eq!(focus.decorator, Some(Decorator::Api));
    assert_eq!(focus.doc.as_deref(), Some("Moves focus to the checkbox."));

    assert_eq!(meta.class_members[6].kind, MemberKind::Method);
    assert_eq!(meta.declaration_loc.unwrap().start_line, 6);
}

#[test]
fn doc_separated_by_blank_line_is_not_attached() {
    let source = "import { LightningElement, api } from 'lwc';\n\
                  export default class Foo extends LightningElement {\n\
                  /** Orphan. */\n\
                  \n\
                  @api value;\n\
                  }\n";
    let meta = LwcCompiler::new().compile(source, "foo.js").into_metadata().unwrap();
    assert_eq!(meta.class_members.len(), 1);
    assert!(meta.class_members[0].doc.is_none());
    assert!(meta.doc.is_none());
}

#[test]
fn typescript_modules_are_supported() {
    let source = r#"import { LightningElement, api } from 'lwc';

export default class Counter extends LightningElement {
    @api count: number = 0;

    @api
    increment(): void {
        this.count++;
    }
}
"#;
    let meta = LwcCompiler::new()
        .compile(source, "counter.ts")
        .into_metadata()
        .unwrap();
    assert_eq!(meta.class_members.len(), 2);
    assert_eq!(meta.class_members[0].name, "count");
    assert_eq!(meta.class_members[0].decorator, Some(Decorator::Api));
    assert_eq!(meta.class_members[1].kind, MemberKind::Method);
    assert_eq!(meta.class_members[1].decorator, Some(Decorator::Api));
    assert_eq!(meta.class_members[1].loc.unwrap().start_line, 5);
}

#[test]
fn syntax_errors_produce_diagnostics() {
    let source = "import { LightningElement } from 'lwc';\nexport default class Broken extends LightningElement {\n  @api label\n  handle( {\n}\n";
    let out = LwcCompiler::new().compile(source, "broken.js");
    assert!(!out.diagnostics.is_empty());
    assert!(out.into_metadata().is_none());
}

#[test]
fn module_without_default_class_is_rejected() {
    let out = LwcCompiler::new().compile("export const answer = 42;\n", "util.js");
    assert_eq!(out.diagnostics.len(), 1);
    assert!(out.metadata.is_none());
}

#[test]
fn ranges_use_utf16_columns() {
    let source = "export default class Foo {\n  /* \u{1F600} */ @api label;\n}\n";
    let meta = LwcCompiler::new().compile(source, "foo.js").into_metadata().unwrap();
    let loc = meta.class_members[0].loc.unwrap();
    // "  /* " is 5 units, the emoji 2 and " */ " another 4
    assert_eq!((loc.start_line, loc.start_col), (1, 11));
    assert!(loc.end_col > loc.start_col);
}

#[test]
fn metadata_serializes_in_client_shape() {
    let meta = LwcCompiler::new()
        .compile(TODO_ITEM, "todoItem.js")
        .into_metadata()
        .unwrap();
    let json = serde_json::to_value(&meta).unwrap();
    assert_eq!(json["classMembers"][0]["type"], "property");
    assert_eq!(json["classMembers"][0]["decorator"], "api");
    assert_eq!(json["decorators"][2], "wire");
}
