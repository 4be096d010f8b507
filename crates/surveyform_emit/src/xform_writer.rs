//! Serializing a document as an XForm tree.
//!
//! One walk fills three parallel structures keyed by the same absolute
//! paths: the primary instance skeleton, the bind list and the body
//! controls. Localized text is collected on the way and written as `itext`
//! once the walk is done.

use std::collections::BTreeSet;

use surveyform_document::{Choice, ChoiceList, Container, Node, Question, SurveyDocument};
use surveyform_expression::{Expression, NodePath};
use surveyform_foundation::xform::{
    self, CONSTRAINT_MSG_ATTR, CONSTRAINT_MSG_SUFFIX, HINT_SUFFIX, JAVAROSA_NS, LABEL_SUFFIX,
    ODK_NS, PRELOAD_ATTR, PRELOAD_PARAMS_ATTR, TEMPLATE_ATTR, XFORMS_NS, XHTML_NS, XPATH_TRUE,
};
use surveyform_foundation::{CanonicalType, Text, XmlNode};
use tracing::debug;

/// Collects the parts of an XForm while walking a document.
pub struct XFormWriter<'a> {
    doc: &'a SurveyDocument,
    /// Localized text by itext id, or `None` when labels are inline.
    itext: Option<Vec<(String, &'a Text)>>,
    binds: Vec<XmlNode>,
}

impl<'a> XFormWriter<'a> {
    /// Creates a writer for one document.
    #[must_use]
    pub fn new(doc: &'a SurveyDocument) -> Self {
        let localized = doc.is_translated()
            || doc.settings().default_language.is_some()
            || has_control_less_text(doc);
        Self {
            doc,
            itext: localized.then(Vec::new),
            binds: Vec::new(),
        }
    }

    /// Writes the whole tree.
    #[must_use]
    pub fn write(mut self) -> XmlNode {
        let doc = self.doc;
        let settings = doc.settings();
        let root = NodePath::root();

        let mut instance_root = XmlNode::new(doc.root_name());
        if let Some(id) = &settings.form_id {
            instance_root.set_attr("id", id);
        }
        if let Some(version) = &settings.version {
            instance_root.set_attr("version", version);
        }
        let mut body = XmlNode::new("h:body");
        for node in doc.children() {
            let (element, control) = self.node(node, &root);
            instance_root.children.push(element);
            body.children.extend(control);
        }

        let lists: Vec<XmlNode> = doc
            .referenced_lists()
            .into_iter()
            .map(|list| self.secondary_instance(list))
            .collect();

        let mut model = XmlNode::new("model");
        if let Some(itext) = self.itext_element() {
            model.children.push(itext);
        }
        model
            .children
            .push(XmlNode::new("instance").with_child(instance_root));
        model.children.extend(lists);
        model.children.append(&mut self.binds);
        if let Some(url) = &settings.submission_url {
            model.children.push(
                XmlNode::new("submission")
                    .with_attr("action", url)
                    .with_attr("method", "post"),
            );
        }

        let mut head = XmlNode::new("h:head");
        if let Some(title) = &settings.title {
            head.children.push(XmlNode::new("h:title").with_text(title));
        }
        head.children.push(model);

        XmlNode::new("h:html")
            .with_attr("xmlns", XFORMS_NS)
            .with_attr("xmlns:h", XHTML_NS)
            .with_attr("xmlns:jr", JAVAROSA_NS)
            .with_attr("xmlns:odk", ODK_NS)
            .with_child(head)
            .with_child(body)
    }

    /// Returns the instance element and body control of one node, adding
    /// its bind along the way.
    fn node(&mut self, node: &'a Node, parent: &NodePath) -> (XmlNode, Option<XmlNode>) {
        let path = parent.child(node.name());
        let absolute = path.absolute(self.doc.root_name());
        match node {
            Node::Question(question) => self.question(question, &absolute),
            Node::Repeat(container) => {
                let (mut element, inner) = self.container(container, &path, &absolute);
                element.set_attr(TEMPLATE_ATTR, "");
                let mut repeat = XmlNode::new("repeat").with_attr("nodeset", &absolute);
                if let Some(appearance) = &container.appearance {
                    repeat.set_attr("appearance", appearance);
                }
                repeat.children = inner;
                let mut group = self.labelled("group", &absolute, &container.label, &container.hint);
                group.children.push(repeat);
                (element, Some(group))
            }
            Node::Group(container) | Node::Survey(container) => {
                let (element, inner) = self.container(container, &path, &absolute);
                let mut group = self.labelled("group", &absolute, &container.label, &container.hint);
                if let Some(appearance) = &container.appearance {
                    group.set_attr("appearance", appearance);
                }
                group.children.extend(inner);
                (element, Some(group))
            }
        }
    }

    /// Returns a container's instance element and its children's controls.
    fn container(
        &mut self,
        container: &'a Container,
        path: &NodePath,
        absolute: &str,
    ) -> (XmlNode, Vec<XmlNode>) {
        if let Some(relevant) = &container.relevant {
            self.binds.push(
                XmlNode::new("bind")
                    .with_attr("nodeset", absolute)
                    .with_attr("relevant", relevant.canonical()),
            );
        }
        let mut element = XmlNode::new(&container.name);
        let mut controls = Vec::new();
        for child in &container.children {
            let (child_element, control) = self.node(child, path);
            element.children.push(child_element);
            controls.extend(control);
        }
        (element, controls)
    }

    fn question(&mut self, question: &'a Question, absolute: &str) -> (XmlNode, Option<XmlNode>) {
        let mut element = XmlNode::new(&question.name);
        if let Some(default) = &question.default {
            element.text = Some(default.clone());
        }
        let bind = self.bind(question, absolute);
        self.binds.push(bind);

        let qtype = question.qtype;
        let tag = match qtype {
            CanonicalType::SelectOne => "select1",
            CanonicalType::SelectMultiple => "select",
            CanonicalType::Acknowledge => "trigger",
            _ if qtype.is_media() => "upload",
            _ if qtype.is_hidden() => {
                self.control_less_texts(question, absolute);
                return (element, None);
            }
            _ => "input",
        };
        let mut control = self.labelled(tag, absolute, &question.label, &question.hint);
        if let Some(mediatype) = xform::mediatype(qtype) {
            control.set_attr("mediatype", mediatype);
        }
        if let Some(appearance) = &question.appearance {
            control.set_attr("appearance", appearance);
        }
        if let Some(list) = question.list_name.as_deref().filter(|_| qtype.is_select()) {
            control.children.push(self.itemset(list));
        }
        (element, Some(control))
    }

    fn bind(&mut self, question: &'a Question, absolute: &str) -> XmlNode {
        let qtype = question.qtype;
        let mut bind = XmlNode::new("bind")
            .with_attr("nodeset", absolute)
            .with_attr("type", xform::bind_type(qtype));

        let mut expression = |attr: &str, value: Option<&Expression>| {
            if let Some(value) = value {
                bind.set_attr(attr, value.canonical());
            }
        };
        expression("relevant", question.relevant.as_ref());
        expression("constraint", question.constraint.as_ref());
        expression("calculate", question.calculation.as_ref());

        if let Some(message) = self.text_value(
            &question.constraint_message,
            format!("{absolute}:{CONSTRAINT_MSG_SUFFIX}"),
        ) {
            bind.set_attr(CONSTRAINT_MSG_ATTR, message);
        }
        if question.required {
            bind.set_attr("required", XPATH_TRUE);
        }
        if qtype == CanonicalType::Note {
            bind.set_attr("readonly", XPATH_TRUE);
        }
        if let Some((preload, params)) = xform::preload(qtype) {
            bind.set_attr(PRELOAD_ATTR, preload);
            bind.set_attr(PRELOAD_PARAMS_ATTR, params);
        }
        bind
    }

    /// Creates a body element with its `label` and `hint` children.
    fn labelled(&mut self, tag: &str, absolute: &str, label: &'a Text, hint: &'a Text) -> XmlNode {
        let mut element = XmlNode::new(tag).with_attr("ref", absolute);
        for (child, text, suffix) in [("label", label, LABEL_SUFFIX), ("hint", hint, HINT_SUFFIX)] {
            if let Some(child) = self.text_element(child, text, format!("{absolute}:{suffix}")) {
                element.children.push(child);
            }
        }
        element
    }

    /// Files the label and hint of a question with no control under the
    /// ids a control would use, so they survive without a body element.
    fn control_less_texts(&mut self, question: &'a Question, absolute: &str) {
        let Some(entries) = &mut self.itext else {
            return;
        };
        for (text, suffix) in [(&question.label, LABEL_SUFFIX), (&question.hint, HINT_SUFFIX)] {
            if !text.is_empty() {
                entries.push((format!("{absolute}:{suffix}"), text));
            }
        }
    }

    fn itemset(&self, list: &str) -> XmlNode {
        let label = if self.itext.is_some() {
            XmlNode::new("label").with_attr("ref", "jr:itext(itextId)")
        } else {
            XmlNode::new("label").with_attr("ref", "label")
        };
        XmlNode::new("itemset")
            .with_attr("nodeset", xform::itemset_nodeset(list))
            .with_child(XmlNode::new("value").with_attr("ref", "name"))
            .with_child(label)
    }

    fn secondary_instance(&mut self, list: &'a ChoiceList) -> XmlNode {
        let mut root = XmlNode::new("root");
        for (index, choice) in list.choices.iter().enumerate() {
            root.children.push(self.item(list, index, choice));
        }
        XmlNode::new("instance")
            .with_attr("id", &list.name)
            .with_child(root)
    }

    fn item(&mut self, list: &ChoiceList, index: usize, choice: &'a Choice) -> XmlNode {
        let mut item = XmlNode::new("item").with_child(XmlNode::new("name").with_text(&choice.name));
        if !choice.label.is_empty() {
            match &mut self.itext {
                Some(entries) => {
                    let id = format!("{}-{index}", list.name);
                    item.children
                        .push(XmlNode::new("itextId").with_text(&id));
                    entries.push((id, &choice.label));
                }
                None => {
                    if let Some(label) = choice.label.default_text() {
                        item.children.push(XmlNode::new("label").with_text(label));
                    }
                }
            }
        }
        for (column, value) in &choice.extras {
            item.children.push(XmlNode::new(column).with_text(value));
        }
        item
    }

    /// Returns a `label`/`hint` element, inline or pointing at itext.
    fn text_element(&mut self, tag: &str, text: &'a Text, id: String) -> Option<XmlNode> {
        if text.is_empty() {
            return None;
        }
        Some(match &mut self.itext {
            Some(entries) => {
                let element = XmlNode::new(tag).with_attr("ref", xform::itext_ref(&id));
                entries.push((id, text));
                element
            }
            None => XmlNode::new(tag).with_text(text.default_text().unwrap_or_default()),
        })
    }

    /// Returns an attribute value: inline text or an itext reference.
    fn text_value(&mut self, text: &'a Text, id: String) -> Option<String> {
        if text.is_empty() {
            return None;
        }
        match &mut self.itext {
            Some(entries) => {
                let reference = xform::itext_ref(&id);
                entries.push((id, text));
                Some(reference)
            }
            None => text.default_text().map(String::from),
        }
    }

    /// Builds the `itext` block: one translation per language, the default
    /// language first-class even when no text uses it.
    fn itext_element(&self) -> Option<XmlNode> {
        let entries = self.itext.as_ref()?;
        let default_language = self.doc.settings().default_language.as_deref();

        let mut languages: BTreeSet<&str> = entries
            .iter()
            .flat_map(|(_, text)| text.languages())
            .collect();
        languages.extend(default_language);

        let mut itext = XmlNode::new("itext");
        for language in languages {
            let mut translation = XmlNode::new("translation").with_attr("lang", language);
            if default_language == Some(language) {
                translation.set_attr("default", XPATH_TRUE);
            }
            for (id, text) in entries {
                if let Some(value) = text.get(language) {
                    translation.children.push(
                        XmlNode::new("text")
                            .with_attr("id", id)
                            .with_child(XmlNode::new("value").with_text(value)),
                    );
                }
            }
            itext.children.push(translation);
        }
        Some(itext)
    }
}

fn has_control_less_text(doc: &SurveyDocument) -> bool {
    doc.walk().iter().any(|visit| {
        visit.node.as_question().is_some_and(|q| {
            q.qtype.is_hidden() && !(q.label.is_empty() && q.hint.is_empty())
        })
    })
}

/// Serializes a document as an XForm tree.
#[must_use]
pub fn write(doc: &SurveyDocument) -> XmlNode {
    let tree = XFormWriter::new(doc).write();
    debug!(root = doc.root_name(), "emitted xform");
    tree
}
