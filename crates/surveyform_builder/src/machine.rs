//! The row-stream state machine.
//!
//! Rows are consumed in order. `begin group`/`begin repeat` push a frame,
//! the matching `end` pops it, and every other row appends a question to
//! the frame on top. The machine is in [`BuilderState::TopLevel`] when no
//! frame is open.

use surveyform_document::{Container, NodeKind, Question};
use surveyform_expression::{NodePath, SymbolKind, SymbolTable};
use surveyform_foundation::{CanonicalType, Error, ErrorContext, Result, TypeToken};
use tracing::trace;

use crate::draft::{ContainerDraft, DraftNode, Logic, QuestionDraft};
use crate::schema::{SURVEY_SHEET, SurveyRow};

/// Where the machine is in the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderState {
    /// No container is open.
    TopLevel,
    /// The innermost open container is a group; `depth` frames are open.
    InsideGroup(usize),
    /// The innermost open container is a repeat; `depth` frames are open.
    InsideRepeat(usize),
}

/// Consumes survey rows and collects the draft hierarchy.
#[derive(Debug)]
pub struct SurveyMachine {
    root: ContainerDraft,
    stack: Vec<ContainerDraft>,
    symbols: SymbolTable,
}

impl SurveyMachine {
    /// Creates a machine for a survey whose root element is `root_name`.
    #[must_use]
    pub fn new(root_name: &str) -> Self {
        let root = ContainerDraft::new(
            NodeKind::Survey,
            NodePath::root(),
            Container::new(root_name),
            ErrorContext::new().with_sheet(SURVEY_SHEET),
        );
        Self {
            root,
            stack: Vec::new(),
            symbols: SymbolTable::new(root_name),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> BuilderState {
        match self.stack.last().map(|frame| frame.kind) {
            None => BuilderState::TopLevel,
            Some(NodeKind::Repeat) => BuilderState::InsideRepeat(self.stack.len()),
            Some(_) => BuilderState::InsideGroup(self.stack.len()),
        }
    }

    /// Consumes one checked row from spreadsheet row `line`.
    ///
    /// # Errors
    /// Returns `Structure` for a closer that does not match the open
    /// container, `DuplicateName` for a reused name, and `MalformedRow` for
    /// a missing name or a calculate row without a calculation.
    pub fn accept(&mut self, row: SurveyRow, line: usize) -> Result<()> {
        let context = ErrorContext::new().with_sheet(SURVEY_SHEET).with_row(line);
        let context = match &row.name {
            Some(name) => context.with_node(name),
            None => context,
        };

        match row.token.clone() {
            TypeToken::Begin(kind) => self.begin(kind, row, context),
            TypeToken::End(kind) => self.end(kind, context),
            TypeToken::Question { qtype, list_name } => {
                self.question(qtype, list_name, row, context)
            }
        }
    }

    /// Ends the row stream.
    ///
    /// # Errors
    /// Returns `UnterminatedGroup` if any container is still open.
    pub fn finish(self) -> Result<(ContainerDraft, SymbolTable)> {
        if let Some(open) = self.stack.last() {
            return Err(Error::unterminated_group(open.name(), open.kind.name())
                .with_context(open.context.clone()));
        }
        Ok((self.root, self.symbols))
    }

    fn begin(&mut self, kind: CanonicalType, row: SurveyRow, context: ErrorContext) -> Result<()> {
        let name = required_name(row.name, context.clone())?;
        let path = self.current_path().child(&name);
        let (node_kind, symbol_kind) = if kind == CanonicalType::Repeat {
            (NodeKind::Repeat, SymbolKind::Repeat)
        } else {
            (NodeKind::Group, SymbolKind::Group)
        };
        self.symbols
            .declare(path.clone(), symbol_kind)
            .map_err(|e| e.with_context(context.clone()))?;

        let container = Container {
            name,
            label: row.label,
            hint: row.hint,
            appearance: row.appearance,
            ..Container::default()
        };
        let mut frame = ContainerDraft::new(node_kind, path, container, context);
        frame.relevant = row.relevant;
        self.stack.push(frame);
        trace!(state = ?self.state(), "opened container");
        Ok(())
    }

    fn end(&mut self, kind: CanonicalType, context: ErrorContext) -> Result<()> {
        let closer = if kind == CanonicalType::Repeat {
            NodeKind::Repeat
        } else {
            NodeKind::Group
        };
        let Some(frame) = self.stack.pop() else {
            return Err(Error::structure(format!("`end {closer}` with no open {closer}"))
                .with_context(context));
        };
        if frame.kind != closer {
            return Err(Error::structure(format!(
                "`end {closer}` closes {} \"{}\"",
                frame.kind,
                frame.name()
            ))
            .with_context(context));
        }
        self.top().children.push(DraftNode::Container(frame));
        trace!(state = ?self.state(), "closed container");
        Ok(())
    }

    fn question(
        &mut self,
        qtype: CanonicalType,
        list_name: Option<String>,
        row: SurveyRow,
        context: ErrorContext,
    ) -> Result<()> {
        if qtype.is_container() {
            return Err(Error::structure(format!(
                "`{qtype}` must be written as `begin {qtype}`"
            ))
            .with_context(context));
        }
        let name = required_name(row.name, context.clone())?;
        if qtype == CanonicalType::Calculate && row.calculation.is_none() {
            return Err(Error::malformed_row("calculate row has no calculation")
                .with_context(context));
        }
        if qtype == CanonicalType::Hidden && row.calculation.is_some() {
            return Err(Error::malformed_row(
                "hidden row has a calculation; use calculate",
            )
            .with_context(context));
        }
        if qtype.is_hidden() && row.appearance.is_some() {
            return Err(Error::malformed_row(format!(
                "`{qtype}` has no control to take an appearance"
            ))
            .with_context(context));
        }
        let path = self.current_path().child(&name);
        self.symbols
            .declare(path.clone(), SymbolKind::Question)
            .map_err(|e| e.with_context(context.clone()))?;

        let question = Question {
            label: row.label,
            hint: row.hint,
            required: row.required,
            constraint_message: row.constraint_message,
            default: row.default,
            appearance: row.appearance,
            list_name,
            ..Question::new(name, qtype)
        };
        let logic = Logic {
            relevant: row.relevant,
            constraint: row.constraint,
            calculation: row.calculation,
        };
        self.top().children.push(DraftNode::Question(QuestionDraft {
            path,
            context,
            question,
            logic,
        }));
        trace!(state = ?self.state(), %qtype, "added question");
        Ok(())
    }

    fn top(&mut self) -> &mut ContainerDraft {
        self.stack.last_mut().unwrap_or(&mut self.root)
    }

    fn current_path(&self) -> NodePath {
        self.stack
            .last()
            .map_or_else(NodePath::root, |frame| frame.path.clone())
    }
}

fn required_name(name: Option<String>, context: ErrorContext) -> Result<String> {
    name.ok_or_else(|| Error::malformed_row("row has no name").with_context(context))
}
