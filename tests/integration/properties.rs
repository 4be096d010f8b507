//! Property-based round-trip tests
//!
//! Generates random valid surveys as rows and checks that both emitters
//! build back to a structurally equal document.

use proptest::prelude::*;
use proptest::sample::Index;

use surveyform::document::SurveyDocument;
use surveyform::{
    Row, Workbook, build_from_rows, build_from_xform, emit_rows, emit_xform, structural_equals,
};

// =============================================================================
// Generators
// =============================================================================

/// Question types with a body control.
const CONTROLLED: &[&str] = &[
    "text",
    "integer",
    "decimal",
    "date",
    "time",
    "dateTime",
    "geopoint",
    "geoshape",
    "image",
    "audio",
    "file",
    "barcode",
    "acknowledge",
    "note",
    "select_one opts",
    "select_multiple opts",
];

/// Question types with no body control.
const CONTROL_LESS: &[&str] = &["calculate", "hidden", "start", "end", "today", "deviceid", "username"];

#[derive(Clone, Debug)]
struct QuestionShape {
    kind: Index,
    controlled: bool,
    label: Option<String>,
    translation: Option<String>,
    hint: Option<String>,
    required: bool,
    relevant: Option<Index>,
    constraint: Option<String>,
    appearance: bool,
}

#[derive(Clone, Debug)]
enum Shape {
    Question(QuestionShape),
    Container {
        repeat: bool,
        label: Option<String>,
        hint: Option<String>,
        appearance: bool,
        relevant: Option<Index>,
        children: Vec<Shape>,
    },
}

fn label() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 àéîõü¿?ñ中文🙂]{1,16}"
}

fn question() -> impl Strategy<Value = Shape> {
    (
        (
            any::<Index>(),
            prop::bool::weighted(0.7),
            prop::option::weighted(0.8, label()),
            prop::option::weighted(0.3, label()),
            prop::option::weighted(0.3, label()),
        ),
        (
            any::<bool>(),
            prop::option::weighted(0.3, any::<Index>()),
            prop::option::weighted(0.2, label()),
            prop::bool::weighted(0.2),
        ),
    )
        .prop_map(
            |((kind, controlled, label, translation, hint), (required, relevant, constraint, appearance))| {
                Shape::Question(QuestionShape {
                    kind,
                    controlled,
                    label,
                    translation,
                    hint,
                    required,
                    relevant,
                    constraint,
                    appearance,
                })
            },
        )
}

fn shape() -> impl Strategy<Value = Shape> {
    question().prop_recursive(3, 32, 5, |inner| {
        (
            any::<bool>(),
            prop::option::of(label()),
            prop::option::weighted(0.2, label()),
            prop::bool::weighted(0.2),
            prop::option::weighted(0.2, any::<Index>()),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(repeat, label, hint, appearance, relevant, children)| Shape::Container {
                repeat,
                label,
                hint,
                appearance,
                relevant,
                children,
            })
    })
}

/// A choice's label and optional values for the extra columns.
type ChoiceShape = (String, Option<String>, Option<String>);

fn choice_shapes() -> impl Strategy<Value = Vec<ChoiceShape>> {
    prop::collection::vec(
        (
            label(),
            prop::option::weighted(0.3, "[a-z]{1,8}\\.png"),
            prop::option::weighted(0.3, "[a-z0-9]{1,6}"),
        ),
        1..5,
    )
}

// =============================================================================
// Rows From Shapes
// =============================================================================

/// Numbers every question so expressions can refer to them by index.
fn count_questions(shapes: &[Shape]) -> usize {
    shapes
        .iter()
        .map(|shape| match shape {
            Shape::Question(_) => 1,
            Shape::Container { children, .. } => count_questions(children),
        })
        .sum()
}

struct RowBuilder {
    questions: usize,
    next_question: usize,
    next_container: usize,
    rows: Vec<Row>,
}

impl RowBuilder {
    fn relevant(&self, index: Option<&Index>) -> Option<String> {
        if self.questions == 0 {
            return None;
        }
        index.map(|i| format!("${{q{}}} != ''", i.index(self.questions)))
    }

    fn add(&mut self, shape: &Shape) {
        match shape {
            Shape::Question(q) => {
                let name = format!("q{}", self.next_question);
                self.next_question += 1;
                let table = if q.controlled { CONTROLLED } else { CONTROL_LESS };
                let kind = table[q.kind.index(table.len())];

                let mut row = Row::new().with("type", kind).with("name", &name);
                if let Some(label) = &q.label {
                    row.set("label", label);
                }
                if let Some(translation) = &q.translation {
                    row.set("label::fr", translation);
                }
                if let Some(hint) = &q.hint {
                    row.set("hint", hint);
                }
                if q.required {
                    row.set("required", "yes");
                }
                if let Some(relevant) = self.relevant(q.relevant.as_ref()) {
                    row.set("relevant", relevant);
                }
                if let Some(message) = &q.constraint {
                    row.set("constraint", ". != ''");
                    row.set("constraint_message", message);
                }
                // Only questions with a control can carry an appearance.
                if q.appearance && q.controlled {
                    row.set("appearance", "minimal");
                }
                if kind == "calculate" {
                    row.set("calculation", "1 + 1");
                }
                if kind == "text" {
                    row.set("default", "none");
                }
                self.rows.push(row);
            }
            Shape::Container {
                repeat,
                label,
                hint,
                appearance,
                relevant,
                children,
            } => {
                let kind = if *repeat { "repeat" } else { "group" };
                // The first container is always top level; give it the name
                // clients use for their own metadata block.
                let name = if self.next_container == 0 {
                    "meta".to_string()
                } else {
                    format!("g{}", self.next_container)
                };
                self.next_container += 1;
                let mut begin = Row::new()
                    .with("type", format!("begin {kind}"))
                    .with("name", name);
                if let Some(label) = label {
                    begin.set("label", label);
                }
                if let Some(hint) = hint {
                    begin.set("hint", hint);
                }
                if *appearance {
                    begin.set("appearance", "field-list");
                }
                if let Some(relevant) = self.relevant(relevant.as_ref()) {
                    begin.set("relevant", relevant);
                }
                self.rows.push(begin);
                for child in children {
                    self.add(child);
                }
                self.rows.push(Row::new().with("type", format!("end {kind}")));
            }
        }
    }
}

fn workbook(shapes: &[Shape], choices: &[ChoiceShape], title: Option<&String>) -> Workbook {
    let questions = count_questions(shapes);
    let mut builder = RowBuilder {
        questions,
        next_question: 0,
        next_container: 0,
        rows: Vec::new(),
    };
    for shape in shapes {
        builder.add(shape);
    }

    let choices = choices
        .iter()
        .enumerate()
        .map(|(i, (label, image, filter))| {
            let mut row = Row::new()
                .with("list_name", "opts")
                .with("name", format!("c{i}"))
                .with("label", label);
            if let Some(image) = image {
                row.set("media::image", image);
            }
            if let Some(filter) = filter {
                row.set("filter", filter);
            }
            row
        })
        .collect();
    let mut settings = Row::new().with("form_id", "generated");
    if let Some(title) = title {
        settings.set("form_title", title);
    }
    Workbook::new(builder.rows)
        .with_choices(choices)
        .with_settings(settings)
}

fn document() -> impl Strategy<Value = SurveyDocument> {
    (
        prop::collection::vec(shape(), 1..6),
        choice_shapes(),
        prop::option::of(label()),
    )
        .prop_map(|(shapes, choices, title)| {
            let workbook = workbook(&shapes, &choices, title.as_ref());
            build_from_rows(&workbook)
                .unwrap_or_else(|err| panic!("generated workbook failed to build: {err}"))
                .document
        })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rows_round_trip(doc in document()) {
        let rebuilt = build_from_rows(&emit_rows(&doc).unwrap()).unwrap().document;
        prop_assert!(structural_equals(&doc, &rebuilt));
    }

    #[test]
    fn xform_round_trip(doc in document()) {
        let rebuilt = build_from_xform(&emit_xform(&doc)).unwrap().document;
        prop_assert!(structural_equals(&doc, &rebuilt));
    }

    #[test]
    fn emitting_is_deterministic(doc in document()) {
        prop_assert_eq!(emit_rows(&doc).unwrap(), emit_rows(&doc).unwrap());
        prop_assert_eq!(emit_xform(&doc), emit_xform(&doc));
    }
}
