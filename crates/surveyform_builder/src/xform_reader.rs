//! Building a document from an already-parsed XForm tree.
//!
//! The primary instance is authoritative for hierarchy and order. Binds,
//! body controls and itext are indexed by absolute path first and consulted
//! per instance element. Everything found wrong with the tree is reported as
//! `MalformedXForm`, except unknown bind types which stay `UnknownType`.

use std::collections::HashMap;

use surveyform_document::{Choice, Container, NodeKind, Question, Settings};
use surveyform_expression::{NodePath, SymbolKind, SymbolTable};
use surveyform_foundation::xform::{
    self, CONSTRAINT_MSG_ATTR, HINT_SUFFIX, LABEL_SUFFIX, PRELOAD_ATTR, PRELOAD_PARAMS_ATTR, TEMPLATE_ATTR, XPATH_TRUE,
};
use surveyform_foundation::{
    CanonicalType, DEFAULT_LANGUAGE, Error, ErrorContext, ErrorKind, Result, Text, XmlNode,
};
use tracing::{debug, trace};

use crate::Build;
use crate::config::BuildConfig;
use crate::draft::{self, ContainerDraft, DraftNode, Logic, QuestionDraft, Syntax};
use crate::linker::ChoiceLinker;

/// Builds a document from an XForm tree.
///
/// # Errors
/// Returns `MalformedXForm` for any structural problem and `UnknownType` for
/// an unrecognized bind type or preload.
pub fn read(tree: &XmlNode, config: &BuildConfig) -> Result<Build> {
    read_inner(tree, config).map_err(malformed)
}

fn read_inner(tree: &XmlNode, config: &BuildConfig) -> Result<Build> {
    let index = XFormIndex::new(tree)?;
    debug!(
        root = %index.root.tag,
        binds = index.binds.len(),
        controls = index.controls.len(),
        "building survey from xform"
    );

    let mut walker = TreeWalker {
        index: &index,
        symbols: SymbolTable::new(&index.root.tag),
        linker: ChoiceLinker::new(),
    };
    for instance in &index.secondary {
        walker.secondary_instance(instance)?;
    }

    let root = ContainerDraft::new(
        NodeKind::Survey,
        NodePath::root(),
        Container::new(&index.root.tag),
        ErrorContext::new(),
    );
    let root = walker.fill(root, index.root)?;
    let TreeWalker {
        symbols, linker, ..
    } = walker;
    let (lists, warnings) = linker.finish();

    draft::assemble(
        root,
        &symbols,
        lists,
        index.settings(),
        warnings,
        Syntax::Tree,
        config,
    )
}

/// Rewrites any error other than an unknown type as `MalformedXForm`.
fn malformed(err: Error) -> Error {
    match err.kind {
        ErrorKind::UnknownType(_) | ErrorKind::MalformedXForm(_) => err,
        ref kind => {
            let rewritten = Error::malformed_xform(kind.to_string());
            match err.context {
                Some(context) => rewritten.with_context(context),
                None => rewritten,
            }
        }
    }
}

fn find<'a>(parent: &'a XmlNode, local: &str) -> Option<&'a XmlNode> {
    parent.children.iter().find(|c| c.local_name() == local)
}

fn require<'a>(parent: &'a XmlNode, local: &str) -> Result<&'a XmlNode> {
    find(parent, local).ok_or_else(|| {
        Error::malformed_xform(format!("<{}> has no <{local}>", parent.tag))
    })
}

/// Path-keyed lookups over one XForm tree.
struct XFormIndex<'a> {
    head: &'a XmlNode,
    model: &'a XmlNode,
    /// Root element of the primary instance.
    root: &'a XmlNode,
    /// Secondary instances, in model order.
    secondary: Vec<&'a XmlNode>,
    binds: HashMap<&'a str, &'a XmlNode>,
    /// Body elements keyed by `ref`.
    controls: HashMap<&'a str, &'a XmlNode>,
    /// Body `repeat` elements keyed by `nodeset`.
    repeats: HashMap<&'a str, &'a XmlNode>,
    itext: HashMap<String, Text>,
    default_language: Option<String>,
}

impl<'a> XFormIndex<'a> {
    fn new(tree: &'a XmlNode) -> Result<Self> {
        if tree.local_name() != "html" {
            return Err(Error::malformed_xform(format!(
                "expected <h:html>, found <{}>",
                tree.tag
            )));
        }
        let head = require(tree, "head")?;
        let body = require(tree, "body")?;
        let model = require(head, "model")?;

        let mut primary = None;
        let mut secondary = Vec::new();
        for instance in model.children.iter().filter(|c| c.local_name() == "instance") {
            if instance.attr("id").is_some() {
                secondary.push(instance);
            } else if primary.is_none() {
                primary = Some(instance);
            }
        }
        let root = primary
            .and_then(|instance| instance.children.first())
            .ok_or_else(|| Error::malformed_xform("model has no primary instance"))?;

        let binds = model
            .children
            .iter()
            .filter(|c| c.local_name() == "bind")
            .filter_map(|bind| Some((bind.attr("nodeset")?, bind)))
            .collect();

        let mut index = Self {
            head,
            model,
            root,
            secondary,
            binds,
            controls: HashMap::new(),
            repeats: HashMap::new(),
            itext: HashMap::new(),
            default_language: None,
        };
        index.index_body(body);
        if let Some(itext) = find(model, "itext") {
            index.index_itext(itext);
        }
        Ok(index)
    }

    fn index_body(&mut self, element: &'a XmlNode) {
        for child in &element.children {
            if child.local_name() == "repeat" {
                if let Some(nodeset) = child.attr("nodeset") {
                    self.repeats.insert(nodeset, child);
                }
            } else if let Some(reference) = child.attr("ref") {
                if matches!(child.local_name(), "label" | "hint" | "value") {
                    continue;
                }
                self.controls.insert(reference, child);
            }
            if matches!(child.local_name(), "group" | "repeat") {
                self.index_body(child);
            }
        }
    }

    fn index_itext(&mut self, itext: &XmlNode) {
        for translation in itext.children.iter().filter(|c| c.local_name() == "translation") {
            let language = translation.attr("lang").unwrap_or(DEFAULT_LANGUAGE);
            if translation.attr("default") == Some(XPATH_TRUE) {
                self.default_language = Some(language.to_string());
            }
            for text in translation.children.iter().filter(|c| c.local_name() == "text") {
                let Some(id) = text.attr("id") else {
                    continue;
                };
                let value = text
                    .children
                    .iter()
                    .find(|v| v.local_name() == "value" && v.attr("form").is_none())
                    .and_then(XmlNode::text);
                if let Some(value) = value {
                    self.itext
                        .entry(id.to_string())
                        .or_default()
                        .insert(language, value);
                }
            }
        }
    }

    /// Resolves a `<label>`/`<hint>` element: inline text or an itext reference.
    fn text_of(&self, element: Option<&XmlNode>) -> Result<Text> {
        let Some(element) = element else {
            return Ok(Text::new());
        };
        match element.attr("ref") {
            Some(reference) => self.text_value(reference),
            None => Ok(element.text().map(Text::plain).unwrap_or_default()),
        }
    }

    /// Resolves an attribute value that is either plain text or an itext reference.
    fn text_value(&self, value: &str) -> Result<Text> {
        let Some(id) = xform::parse_itext_ref(value) else {
            return Ok(Text::plain(value.trim()));
        };
        self.itext
            .get(id)
            .cloned()
            .ok_or_else(|| Error::malformed_xform(format!("no itext entry `{id}`")))
    }

    /// Returns the itext entry for `id`, empty when there is none.
    fn itext_entry(&self, id: &str) -> Text {
        self.itext.get(id).cloned().unwrap_or_default()
    }

    /// Resolves a question's label and hint. Questions without a control
    /// keep theirs in itext under the usual ids.
    fn question_texts(&self, control: Option<&XmlNode>, absolute: &str) -> Result<(Text, Text)> {
        match control {
            Some(control) => Ok((
                self.text_of(find(control, "label"))?,
                self.text_of(find(control, "hint"))?,
            )),
            None => Ok((
                self.itext_entry(&format!("{absolute}:{LABEL_SUFFIX}")),
                self.itext_entry(&format!("{absolute}:{HINT_SUFFIX}")),
            )),
        }
    }

    fn settings(&self) -> Settings {
        Settings {
            title: find(self.head, "title")
                .and_then(XmlNode::text)
                .map(String::from),
            form_id: self.root.attr("id").map(String::from),
            version: self.root.attr("version").map(String::from),
            default_language: self.default_language.clone(),
            submission_url: find(self.model, "submission")
                .and_then(|s| s.attr("action"))
                .map(String::from),
        }
    }
}

/// Walks the primary instance, declaring names and collecting drafts.
struct TreeWalker<'i, 'a> {
    index: &'i XFormIndex<'a>,
    symbols: SymbolTable,
    linker: ChoiceLinker,
}

impl TreeWalker<'_, '_> {
    fn secondary_instance(&mut self, instance: &XmlNode) -> Result<()> {
        let Some(list) = instance.attr("id") else {
            return Ok(());
        };
        let items = instance
            .children
            .first()
            .into_iter()
            .flat_map(|root| root.children.iter())
            .filter(|c| c.local_name() == "item");

        for item in items {
            let mut name = None;
            let mut label = Text::new();
            let mut extras = indexmap::IndexMap::new();
            for field in &item.children {
                let value = field.text().unwrap_or_default();
                // Extra columns keep their full tag, `media::image` included.
                match field.tag.as_str() {
                    "name" => name = Some(value.to_string()),
                    "label" => label = Text::plain(value),
                    "itextId" => label = self.index.text_value(&xform::itext_ref(value))?,
                    tag => {
                        extras.insert(tag.to_string(), value.to_string());
                    }
                }
            }
            let name = name.ok_or_else(|| {
                Error::malformed_xform(format!("item in instance `{list}` has no <name>"))
            })?;
            self.linker.add(list, Choice { name, label, extras });
        }
        Ok(())
    }

    fn fill(&mut self, mut draft: ContainerDraft, element: &XmlNode) -> Result<ContainerDraft> {
        let mut repeats_seen: Vec<&str> = Vec::new();
        for child in &element.children {
            let name = child.local_name();
            if repeats_seen.contains(&name) {
                // Filled repeat instances after the template.
                continue;
            }

            let path = draft.path.child(name);
            let absolute = path.absolute(&self.index.root.tag);
            let context = ErrorContext::new().with_node(name);
            let kind = self.classify(child, &absolute);
            trace!(%absolute, %kind, "reading instance element");

            let symbol = match kind {
                NodeKind::Repeat => SymbolKind::Repeat,
                NodeKind::Group => SymbolKind::Group,
                NodeKind::Question | NodeKind::Survey => SymbolKind::Question,
            };
            self.symbols
                .declare(path.clone(), symbol)
                .map_err(|e| e.with_context(context.clone()))?;

            let node = match kind {
                NodeKind::Question => {
                    DraftNode::Question(self.question(child, path, &absolute, context)?)
                }
                _ => {
                    if kind == NodeKind::Repeat {
                        repeats_seen.push(name);
                    }
                    let container = self.container(kind, path, &absolute, context)?;
                    DraftNode::Container(self.fill(container, child)?)
                }
            };
            draft.children.push(node);
        }
        Ok(draft)
    }

    fn classify(&self, element: &XmlNode, absolute: &str) -> NodeKind {
        if element.attr(TEMPLATE_ATTR).is_some() || self.index.repeats.contains_key(absolute) {
            NodeKind::Repeat
        } else if !element.children.is_empty()
            || self
                .index
                .controls
                .get(absolute)
                .is_some_and(|c| c.local_name() == "group")
        {
            NodeKind::Group
        } else {
            NodeKind::Question
        }
    }

    fn container(
        &self,
        kind: NodeKind,
        path: NodePath,
        absolute: &str,
        context: ErrorContext,
    ) -> Result<ContainerDraft> {
        let index = self.index;
        let group = index.controls.get(absolute).copied();
        let appearance = if kind == NodeKind::Repeat {
            index.repeats.get(absolute).and_then(|r| r.attr("appearance"))
        } else {
            group.and_then(|g| g.attr("appearance"))
        };

        let container = Container {
            name: path.name().unwrap_or_default().to_string(),
            label: index
                .text_of(group.and_then(|g| find(g, "label")))
                .map_err(|e| e.with_context(context.clone()))?,
            hint: index
                .text_of(group.and_then(|g| find(g, "hint")))
                .map_err(|e| e.with_context(context.clone()))?,
            appearance: appearance.map(String::from),
            ..Container::default()
        };
        let relevant = index
            .binds
            .get(absolute)
            .and_then(|b| b.attr("relevant"))
            .map(String::from);

        let mut draft = ContainerDraft::new(kind, path, container, context);
        draft.relevant = relevant;
        Ok(draft)
    }

    fn question(
        &mut self,
        element: &XmlNode,
        path: NodePath,
        absolute: &str,
        context: ErrorContext,
    ) -> Result<QuestionDraft> {
        let index = self.index;
        let bind = index.binds.get(absolute).copied();
        let control = index.controls.get(absolute).copied();
        let name = path.name().unwrap_or_default().to_string();

        let fill = |this: &mut Self| -> Result<(Question, Logic)> {
            let qtype = infer_type(bind, control)?;
            let bind_attr = |attr: &str| bind.and_then(|b| b.attr(attr));

            let list_name = if qtype.is_select() {
                this.list_for(&name, control)?
            } else {
                None
            };
            let (label, hint) = index.question_texts(control, absolute)?;
            let question = Question {
                label,
                hint,
                required: bind_attr("required") == Some(XPATH_TRUE),
                constraint_message: bind_attr(CONSTRAINT_MSG_ATTR)
                    .map(|m| index.text_value(m))
                    .transpose()?
                    .unwrap_or_default(),
                default: element.text().map(String::from),
                appearance: control.and_then(|c| c.attr("appearance")).map(String::from),
                list_name,
                ..Question::new(name.clone(), qtype)
            };
            let logic = Logic {
                relevant: bind_attr("relevant").map(String::from),
                constraint: bind_attr("constraint").map(String::from),
                calculation: bind_attr("calculate").map(String::from),
            };
            Ok((question, logic))
        };
        let (question, logic) = fill(self).map_err(|e| e.with_context(context.clone()))?;

        Ok(QuestionDraft {
            path,
            context,
            question,
            logic,
        })
    }

    /// Finds a select question's list: an itemset, or inline `<item>`s which
    /// become a list named after the question.
    fn list_for(&mut self, question: &str, control: Option<&XmlNode>) -> Result<Option<String>> {
        let Some(control) = control else {
            return Ok(None);
        };
        if let Some(itemset) = find(control, "itemset") {
            let nodeset = itemset.attr("nodeset").unwrap_or_default();
            return xform::parse_itemset_nodeset(nodeset)
                .map(|list| Some(list.to_string()))
                .ok_or_else(|| Error::malformed_xform(format!("unreadable itemset `{nodeset}`")));
        }

        let items: Vec<&XmlNode> = control
            .children
            .iter()
            .filter(|c| c.local_name() == "item")
            .collect();
        if items.is_empty() {
            return Ok(None);
        }
        if self.linker.contains_list(question) {
            return Err(Error::malformed_xform(format!(
                "inline choices of `{question}` collide with list `{question}`"
            )));
        }
        for item in items {
            let value = find(item, "value")
                .and_then(XmlNode::text)
                .ok_or_else(|| Error::malformed_xform("inline item has no <value>"))?;
            let label = self.index.text_of(find(item, "label"))?;
            self.linker.add(question, Choice::new(value, label));
        }
        Ok(Some(question.to_string()))
    }
}

/// Infers a question's canonical type from its bind and body control.
fn infer_type(bind: Option<&XmlNode>, control: Option<&XmlNode>) -> Result<CanonicalType> {
    let bind_attr = |attr: &str| bind.and_then(|b| b.attr(attr));

    if let Some(preload) = bind_attr(PRELOAD_ATTR) {
        let params = bind_attr(PRELOAD_PARAMS_ATTR).unwrap_or_default();
        return xform::from_preload(preload, params)
            .ok_or_else(|| Error::unknown_type(format!("{preload} {params}")));
    }
    let bind_type = bind_attr("type").unwrap_or("string");

    let Some(control) = control else {
        return Ok(if bind_attr("calculate").is_some() {
            CanonicalType::Calculate
        } else {
            CanonicalType::Hidden
        });
    };
    match control.local_name() {
        "select1" => Ok(CanonicalType::SelectOne),
        "select" => Ok(CanonicalType::SelectMultiple),
        "upload" => Ok(xform::from_mediatype(
            control.attr("mediatype").unwrap_or_default(),
        )),
        "trigger" => Ok(CanonicalType::Acknowledge),
        "input" if bind_attr("readonly") == Some(XPATH_TRUE) => Ok(CanonicalType::Note),
        "input" => xform::input_type(bind_type).ok_or_else(|| Error::unknown_type(bind_type)),
        other => Err(Error::malformed_xform(format!("unsupported control <{other}>"))),
    }
}
