//! Unfinished nodes and document assembly.
//!
//! Both build directions first collect the whole hierarchy as drafts while
//! declaring every name, then compile expressions in a second step. Forward
//! references (`relevant` pointing at a later question) therefore resolve
//! the same way backward ones do.

use surveyform_document::{
    ChoiceLists, Container, Node, NodeKind, Question, Settings, SurveyDocument,
};
use surveyform_expression::{Expression, NodePath, SymbolTable, Translator};
use surveyform_foundation::{ErrorContext, Result, Warning};
use tracing::{debug, warn};

use crate::Build;
use crate::config::BuildConfig;
use crate::linker;

/// Which syntax raw expression text is written in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Syntax {
    /// `${name}` references, as authored in rows.
    Flat,
    /// Paths into the instance tree.
    Tree,
}

/// Raw expression text of one node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Logic {
    /// Visibility condition.
    pub relevant: Option<String>,
    /// Validity condition.
    pub constraint: Option<String>,
    /// Computed value.
    pub calculation: Option<String>,
}

/// A question whose expressions are not compiled yet.
#[derive(Clone, Debug)]
pub struct QuestionDraft {
    /// Where the question lives.
    pub path: NodePath,
    /// Where the question came from, for errors.
    pub context: ErrorContext,
    /// The question without expressions.
    pub question: Question,
    /// Its raw expressions.
    pub logic: Logic,
}

/// A group or repeat whose children are drafts.
#[derive(Clone, Debug)]
pub struct ContainerDraft {
    /// Group, repeat, or the survey root.
    pub kind: NodeKind,
    /// Where the container lives.
    pub path: NodePath,
    /// Where the container came from, for errors.
    pub context: ErrorContext,
    /// The container without children or relevance.
    pub container: Container,
    /// Raw relevance condition.
    pub relevant: Option<String>,
    /// Children in author order.
    pub children: Vec<DraftNode>,
}

impl ContainerDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new(kind: NodeKind, path: NodePath, container: Container, context: ErrorContext) -> Self {
        Self {
            kind,
            path,
            context,
            container,
            relevant: None,
            children: Vec::new(),
        }
    }

    /// Returns the container name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.container.name
    }
}

/// A draft node.
#[derive(Clone, Debug)]
pub enum DraftNode {
    /// A question draft.
    Question(QuestionDraft),
    /// A group or repeat draft.
    Container(ContainerDraft),
}

/// Compiles drafts into a finished document.
pub struct Assembler<'a> {
    translator: Translator<'a>,
    syntax: Syntax,
    lists: &'a ChoiceLists,
}

impl<'a> Assembler<'a> {
    /// Creates an assembler over a complete symbol table and choice lists.
    #[must_use]
    pub fn new(symbols: &'a SymbolTable, lists: &'a ChoiceLists, syntax: Syntax) -> Self {
        Self {
            translator: Translator::new(symbols),
            syntax,
            lists,
        }
    }

    /// Compiles a draft tree into a node tree.
    ///
    /// # Errors
    /// Returns the first expression or choice-list error, with the offending
    /// node's context attached.
    pub fn node(&self, draft: DraftNode) -> Result<Node> {
        match draft {
            DraftNode::Question(draft) => self.question(draft).map(Node::Question),
            DraftNode::Container(draft) => {
                let kind = draft.kind;
                let container = self.container(draft)?;
                Ok(match kind {
                    NodeKind::Repeat => Node::Repeat(container),
                    NodeKind::Survey => Node::Survey(container),
                    NodeKind::Group | NodeKind::Question => Node::Group(container),
                })
            }
        }
    }

    /// Compiles a container draft and its children.
    ///
    /// # Errors
    /// See [`Assembler::node`].
    pub fn container(&self, draft: ContainerDraft) -> Result<Container> {
        let ContainerDraft {
            path,
            context,
            mut container,
            relevant,
            children,
            ..
        } = draft;

        container.relevant = self
            .compile(relevant.as_deref(), &path)
            .map_err(|e| e.or_context(context))?;
        for child in children {
            container.children.push_back(self.node(child)?);
        }
        Ok(container)
    }

    fn question(&self, draft: QuestionDraft) -> Result<Question> {
        let QuestionDraft {
            path,
            context,
            mut question,
            logic,
        } = draft;

        self.fill_question(&mut question, logic, &path)
            .map_err(|e| e.or_context(context))?;
        Ok(question)
    }

    fn fill_question(&self, question: &mut Question, logic: Logic, path: &NodePath) -> Result<()> {
        if question.qtype.is_select() {
            linker::link(self.lists, &question.name, question.list_name.as_deref())?;
        }
        question.relevant = self.compile(logic.relevant.as_deref(), path)?;
        question.constraint = self.compile(logic.constraint.as_deref(), path)?;
        question.calculation = self.compile(logic.calculation.as_deref(), path)?;
        Ok(())
    }

    fn compile(&self, text: Option<&str>, path: &NodePath) -> Result<Option<Expression>> {
        let Some(text) = text else {
            return Ok(None);
        };
        let expression = match self.syntax {
            Syntax::Flat => self.translator.translate(text, path)?,
            Syntax::Tree => self.translator.translate_tree(text, path)?,
        };
        Ok(Some(expression))
    }
}

/// Finishes a build: compiles the draft tree, checks lists and reports
/// unreferenced ones.
///
/// # Errors
/// Returns the first expression, choice-list or naming error.
pub fn assemble(
    root: ContainerDraft,
    symbols: &SymbolTable,
    lists: ChoiceLists,
    settings: Settings,
    mut warnings: Vec<Warning>,
    syntax: Syntax,
    config: &BuildConfig,
) -> Result<Build> {
    let container = Assembler::new(symbols, &lists, syntax).container(root)?;
    let document = SurveyDocument::new(container, lists, settings)?;

    if config.warn_unreferenced_lists {
        for list in document.unreferenced_list_names() {
            let warning = Warning::UnreferencedChoiceList {
                list: list.to_string(),
            };
            warn!(%warning, "unreferenced choice list");
            warnings.push(warning);
        }
    }

    debug!(
        nodes = document.walk().len(),
        lists = document.choices().len(),
        warnings = warnings.len(),
        "survey assembled"
    );
    Ok(Build { document, warnings })
}
