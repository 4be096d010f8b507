//! Flattening a document back into authoring rows.
//!
//! A depth-first walk writes one row per question and a begin/end pair per
//! container. Expressions are re-expanded from their canonical paths into
//! `${name}` syntax, so the rows build back into the same document.

use surveyform_document::{Choice, Container, Node, NodeKind, Question, SurveyDocument};
use surveyform_expression::{Expression, NodePath, Translator};
use surveyform_foundation::row::LANGUAGE_SEPARATOR;
use surveyform_foundation::{DEFAULT_LANGUAGE, Result, Row, Text, Workbook};
use tracing::debug;

use crate::config::EmitConfig;

/// Writes survey, choices and settings rows for one document.
pub struct RowWriter<'a> {
    translator: Translator<'a>,
    config: &'a EmitConfig,
    survey: Vec<Row>,
}

impl<'a> RowWriter<'a> {
    /// Creates a writer resolving names through `translator`.
    #[must_use]
    pub fn new(translator: Translator<'a>, config: &'a EmitConfig) -> Self {
        Self {
            translator,
            config,
            survey: Vec::new(),
        }
    }

    /// Writes the whole workbook.
    ///
    /// # Errors
    /// Returns `UnresolvedReference` if an expression names a path the
    /// document does not contain.
    pub fn write(mut self, doc: &SurveyDocument) -> Result<Workbook> {
        let root = NodePath::root();
        for node in doc.children() {
            self.node(node, &root)?;
        }

        let choices: Vec<Row> = doc
            .referenced_lists()
            .into_iter()
            .flat_map(|list| list.choices.iter().map(|c| choice_row(&list.name, c)))
            .collect();

        Ok(Workbook {
            survey: self.survey,
            choices,
            settings: Some(settings_row(doc)),
        })
    }

    fn node(&mut self, node: &Node, parent: &NodePath) -> Result<()> {
        let path = parent.child(node.name());
        match node {
            Node::Question(question) => self.question(question, &path),
            Node::Group(container) | Node::Repeat(container) | Node::Survey(container) => {
                self.container(node.kind(), container, &path)
            }
        }
    }

    fn container(&mut self, kind: NodeKind, container: &Container, path: &NodePath) -> Result<()> {
        let separator = self.config.marker_style.separator();
        let mut begin = Row::new()
            .with("type", format!("begin{separator}{kind}"))
            .with("name", &container.name);
        text_cells(&mut begin, "label", &container.label);
        text_cells(&mut begin, "hint", &container.hint);
        self.expression_cell(&mut begin, "relevant", container.relevant.as_ref(), path)?;
        if let Some(appearance) = &container.appearance {
            begin.set("appearance", appearance);
        }
        self.survey.push(begin);

        for child in &container.children {
            self.node(child, path)?;
        }

        self.survey
            .push(Row::new().with("type", format!("end{separator}{kind}")));
        Ok(())
    }

    fn question(&mut self, question: &Question, path: &NodePath) -> Result<()> {
        let qtype = match &question.list_name {
            Some(list) if question.qtype.is_select() => format!("{} {list}", question.qtype),
            _ => question.qtype.to_string(),
        };
        let mut row = Row::new()
            .with("type", qtype)
            .with("name", &question.name);
        text_cells(&mut row, "label", &question.label);
        text_cells(&mut row, "hint", &question.hint);
        if question.required {
            row.set("required", "yes");
        }
        self.expression_cell(&mut row, "relevant", question.relevant.as_ref(), path)?;
        self.expression_cell(&mut row, "constraint", question.constraint.as_ref(), path)?;
        text_cells(&mut row, "constraint_message", &question.constraint_message);
        self.expression_cell(&mut row, "calculation", question.calculation.as_ref(), path)?;
        if let Some(default) = &question.default {
            row.set("default", default);
        }
        if let Some(appearance) = &question.appearance {
            row.set("appearance", appearance);
        }
        self.survey.push(row);
        Ok(())
    }

    fn expression_cell(
        &self,
        row: &mut Row,
        column: &str,
        expression: Option<&Expression>,
        path: &NodePath,
    ) -> Result<()> {
        if let Some(expression) = expression {
            row.set(column, self.translator.to_flat(expression.canonical(), path)?);
        }
        Ok(())
    }
}

/// Writes one column per language: `label` for the default, `label::fr` otherwise.
fn text_cells(row: &mut Row, base: &str, text: &Text) {
    for (language, value) in text.iter() {
        if language == DEFAULT_LANGUAGE {
            row.set(base, value);
        } else {
            row.set(format!("{base}{LANGUAGE_SEPARATOR}{language}"), value);
        }
    }
}

fn choice_row(list: &str, choice: &Choice) -> Row {
    let mut row = Row::new().with("list_name", list).with("name", &choice.name);
    text_cells(&mut row, "label", &choice.label);
    for (column, value) in &choice.extras {
        row.set(column, value);
    }
    row
}

fn settings_row(doc: &SurveyDocument) -> Row {
    let settings = doc.settings();
    let mut row = Row::new();
    let cells = [
        ("form_title", &settings.title),
        ("form_id", &settings.form_id),
        ("version", &settings.version),
        ("default_language", &settings.default_language),
        ("submission_url", &settings.submission_url),
    ];
    for (column, value) in cells {
        if let Some(value) = value {
            row.set(column, value);
        }
    }
    row.set("name", doc.root_name());
    row
}

/// Flattens a document into a workbook.
///
/// # Errors
/// Returns an error only for a document whose expressions or names are
/// inconsistent, which a built document never is.
pub fn write(doc: &SurveyDocument, config: &EmitConfig) -> Result<Workbook> {
    let symbols = doc.symbols()?;
    let workbook = RowWriter::new(Translator::new(&symbols), config).write(doc)?;
    debug!(
        survey = workbook.survey.len(),
        choices = workbook.choices.len(),
        "emitted rows"
    );
    Ok(workbook)
}
