use std::collections::{HashMap, HashSet};

use crate::selector::{
    SelectorCombinator, SelectorPart, SelectorPseudoClass, SelectorStep, parse_selector_groups,
};
use crate::{Error, Result};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// Handle to a node stored in a [`Dom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
}

impl Element {
    fn new(tag_name: String, attrs: HashMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let checked = attrs.contains_key("checked");
        let disabled = attrs.contains_key("disabled");
        Self {
            tag_name,
            attrs,
            value,
            checked,
            disabled,
        }
    }

    fn has_class(&self, class_name: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }
}

/// Arena-backed document tree.
///
/// Nodes are never freed; removing a node detaches it from its parent, after
/// which document-wide queries no longer see it.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<Node>,
    root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        self.create_node(Some(parent), NodeType::Element(Element::new(tag_name, attrs)))
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_or_err(&self, node_id: NodeId, what: &str) -> Result<&Element> {
        self.element(node_id)
            .ok_or_else(|| Error::Dom(format!("{what} target is not an element")))
    }

    fn element_mut_or_err(&mut self, node_id: NodeId, what: &str) -> Result<&mut Element> {
        self.element_mut(node_id)
            .ok_or_else(|| Error::Dom(format!("{what} target is not an element")))
    }

    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some()
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0)?.parent
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn element_children(&self, node_id: NodeId) -> Vec<NodeId> {
        self.children(node_id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub fn is_connected(&self, node_id: NodeId) -> bool {
        node_id == self.root || self.is_descendant_of(node_id, self.root)
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<&str> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    pub fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.attr(node_id, name).is_some()
    }

    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let is_option = {
            let element = self.element_mut_or_err(node_id, "setAttribute")?;
            element.attrs.insert(lowered.clone(), value.to_string());
            match lowered.as_str() {
                "value" => element.value = value.to_string(),
                "checked" => element.checked = true,
                "disabled" => element.disabled = true,
                _ => {}
            }
            element.is_tag("option")
        };

        if lowered == "id" && self.is_connected(node_id) {
            self.rebuild_id_index();
        }
        if is_option && (lowered == "selected" || lowered == "value") {
            self.sync_select_value_for_option(node_id)?;
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let (removed, is_option) = {
            let element = self.element_mut_or_err(node_id, "removeAttribute")?;
            let removed = element.attrs.remove(&lowered).is_some();
            match lowered.as_str() {
                "value" => element.value.clear(),
                "checked" => element.checked = false,
                "disabled" => element.disabled = false,
                _ => {}
            }
            (removed, element.is_tag("option"))
        };

        if removed && lowered == "id" && self.is_connected(node_id) {
            self.rebuild_id_index();
        }
        if is_option && lowered == "selected" {
            self.sync_select_value_for_option(node_id)?;
        }
        Ok(())
    }

    pub fn has_class(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .is_some_and(|element| element.has_class(class_name))
    }

    pub fn add_class(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub fn remove_class(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self.element_mut_or_err(node_id, "classList")?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub fn value(&self, node_id: NodeId) -> Result<String> {
        Ok(self.element_or_err(node_id, "value")?.value.clone())
    }

    pub fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.element_or_err(node_id, "value")?.is_tag("select") {
            return self.set_select_value(node_id, value);
        }
        self.element_mut_or_err(node_id, "value")?.value = value.to_string();
        Ok(())
    }

    pub fn checked(&self, node_id: NodeId) -> Result<bool> {
        Ok(self.element_or_err(node_id, "checked")?.checked)
    }

    pub fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        self.element_mut_or_err(node_id, "checked")?.checked = checked;
        Ok(())
    }

    pub fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some_and(|e| e.disabled)
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        let mut out = String::new();
        if node_id.0 >= self.nodes.len() {
            return out;
        }
        let mut stack = vec![node_id];
        while let Some(node) = stack.pop() {
            let node = &self.nodes[node.0];
            if let NodeType::Text(text) = &node.node_type {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            let Some(element) = self.element(node) else {
                continue;
            };
            if element.is_tag("textarea") {
                let text = self.text_content(node);
                self.element_mut_or_err(node, "textarea")?.value = text;
            } else if element.is_tag("select") {
                self.sync_select_value(node)?;
            }
        }
        Ok(())
    }

    fn sync_select_value_for_option(&mut self, option_node: NodeId) -> Result<()> {
        let mut cursor = self.parent(option_node);
        while let Some(current) = cursor {
            if self.element(current).is_some_and(|e| e.is_tag("select")) {
                return self.sync_select_value(current);
            }
            cursor = self.parent(current);
        }
        Ok(())
    }

    fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let options = self.select_options(select_node);
        let value = match options
            .iter()
            .copied()
            .find(|option| self.has_attr(*option, "selected"))
            .or_else(|| options.first().copied())
        {
            Some(selected) => self.option_effective_value(selected),
            None => String::new(),
        };
        self.element_mut_or_err(select_node, "select")?.value = value;
        Ok(())
    }

    fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        let options = self.select_options(select_node);
        let matched = options
            .iter()
            .copied()
            .find(|option| self.option_effective_value(*option) == requested);

        for option in &options {
            let element = self.element_mut_or_err(*option, "option")?;
            if Some(*option) == matched {
                element.attrs.insert("selected".to_string(), String::new());
            } else {
                element.attrs.remove("selected");
            }
        }

        let value = matched
            .map(|option| self.option_effective_value(option))
            .unwrap_or_default();
        self.element_mut_or_err(select_node, "select")?.value = value;
        Ok(())
    }

    fn select_options(&self, select_node: NodeId) -> Vec<NodeId> {
        self.descendant_elements(select_node)
            .into_iter()
            .filter(|node| self.element(*node).is_some_and(|e| e.is_tag("option")))
            .collect()
    }

    fn option_effective_value(&self, option_node: NodeId) -> String {
        match self.attr(option_node, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(option_node).trim().to_string(),
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !matches!(
            self.nodes.get(parent.0).map(|n| &n.node_type),
            Some(NodeType::Document | NodeType::Element(_))
        ) {
            return Err(Error::Dom("appendChild target cannot have children".into()));
        }
        if child == self.root || child == parent || child.0 >= self.nodes.len() {
            return Err(Error::Dom("invalid appendChild node".into()));
        }
        // Parent must not be inside child's subtree.
        if self.is_descendant_of(parent, child) {
            return Err(Error::Dom("appendChild would create a cycle".into()));
        }

        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.rebuild_id_index();
        Ok(())
    }

    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::Dom("cannot remove document root".into()));
        }
        let Some(parent) = self.parent(node) else {
            return Ok(());
        };
        self.nodes[parent.0].children.retain(|id| *id != node);
        self.nodes[node.0].parent = None;
        self.rebuild_id_index();
        Ok(())
    }

    /// Detaches every child of `node`.
    pub fn clear_children(&mut self, node: NodeId) -> Result<()> {
        self.element_or_err(node, "clear children")?;
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.rebuild_id_index();
        Ok(())
    }

    /// Deep-copies `source` into a new detached subtree.
    ///
    /// Returns the clone's root and the `(source, clone)` pairs of every
    /// copied node in document order, so callers can carry per-node state
    /// across.
    pub fn clone_subtree(&mut self, source: NodeId) -> Result<(NodeId, Vec<(NodeId, NodeId)>)> {
        if source == self.root {
            return Err(Error::Dom("cannot clone the document node".into()));
        }
        if source.0 >= self.nodes.len() {
            return Err(Error::Dom("clone source is invalid".into()));
        }
        let mut mapping = Vec::new();
        let clone = self.clone_node_into(source, None, &mut mapping);
        Ok((clone, mapping))
    }

    fn clone_node_into(
        &mut self,
        source: NodeId,
        parent: Option<NodeId>,
        mapping: &mut Vec<(NodeId, NodeId)>,
    ) -> NodeId {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            let node_type = self.nodes[source.0].node_type.clone();
            let clone = self.create_node(parent, node_type);
            mapping.push((source, clone));
            let children = self.nodes[source.0].children.clone();
            for child in children {
                self.clone_node_into(child, Some(clone), mapping);
            }
            clone
        })
    }

    /// Copies the top-level nodes of `source` (a separately parsed
    /// fragment) under `parent`, returning the copied roots.
    pub(crate) fn adopt_fragment(&mut self, source: &Dom, parent: NodeId) -> Result<Vec<NodeId>> {
        self.element_or_err(parent, "fragment")?;
        let mut roots = Vec::new();
        for child in source.children(source.root) {
            roots.push(self.adopt_node(source, *child, parent));
        }
        self.rebuild_id_index();
        Ok(roots)
    }

    fn adopt_node(&mut self, source: &Dom, source_node: NodeId, parent: NodeId) -> NodeId {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            let node_type = source.nodes[source_node.0].node_type.clone();
            let node = self.create_node(Some(parent), node_type);
            for child in source.children(source_node) {
                self.adopt_node(source, *child, node);
            }
            node
        })
    }

    /// Re-derives the id index from the connected tree. The first element in
    /// document order wins.
    pub(crate) fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attrs.get("id") {
                    if !id.is_empty() {
                        next.entry(id.clone()).or_insert(node);
                    }
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        let mut stack = vec![node_id];
        while let Some(node) = stack.pop() {
            if matches!(self.nodes[node.0].node_type, NodeType::Element(_)) {
                out.push(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev());
        }
    }

    /// Elements below `node_id` in document order, excluding `node_id`.
    pub fn descendant_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in self.children(node_id) {
            self.collect_elements_dfs(*child, &mut out);
        }
        out
    }

    /// `node_id` itself (when it is an element) followed by its descendants.
    pub fn subtree_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if node_id.0 < self.nodes.len() {
            self.collect_elements_dfs(node_id, &mut out);
        }
        out
    }

    fn all_element_nodes(&self) -> Vec<NodeId> {
        self.subtree_elements(self.root)
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        Ok(self.filter_matching(self.all_element_nodes(), &groups))
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Matching descendants of `root`, like `Element.querySelectorAll`.
    pub fn query_selector_all_within(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        Ok(self.filter_matching(self.descendant_elements(root), &groups))
    }

    pub fn query_selector_within(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        Ok(self
            .query_selector_all_within(root, selector)?
            .into_iter()
            .next())
    }

    /// Matching elements of the subtree rooted at `root`, `root` included.
    pub fn select_inclusive(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        Ok(self.filter_matching(self.subtree_elements(root), &groups))
    }

    fn filter_matching(&self, candidates: Vec<NodeId>, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|candidate| {
                groups
                    .iter()
                    .any(|steps| self.matches_selector_chain(*candidate, steps))
                    && seen.insert(*candidate)
            })
            .collect()
    }

    pub fn matches(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        if self.element(node_id).is_none() {
            return Ok(false);
        }
        let groups = parse_selector_groups(selector)?;
        Ok(groups
            .iter()
            .any(|steps| self.matches_selector_chain(node_id, steps)))
    }

    pub fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }

        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some(last) = steps.last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }

        let mut current = node_id;
        for idx in (1..steps.len()).rev() {
            let prev_step = &steps[idx - 1].step;
            let combinator = steps[idx]
                .combinator
                .unwrap_or(SelectorCombinator::Descendant);

            let matched = match combinator {
                SelectorCombinator::Child => self
                    .parent(current)
                    .filter(|parent| self.matches_step(*parent, prev_step)),
                SelectorCombinator::Descendant => {
                    let mut cursor = self.parent(current);
                    let mut found = None;
                    while let Some(parent) = cursor {
                        if self.matches_step(parent, prev_step) {
                            found = Some(parent);
                            break;
                        }
                        cursor = self.parent(parent);
                    }
                    found
                }
                SelectorCombinator::AdjacentSibling => self
                    .previous_element_sibling(current)
                    .filter(|sibling| self.matches_step(*sibling, prev_step)),
                SelectorCombinator::GeneralSibling => {
                    let mut cursor = self.previous_element_sibling(current);
                    let mut found = None;
                    while let Some(sibling) = cursor {
                        if self.matches_step(sibling, prev_step) {
                            found = Some(sibling);
                            break;
                        }
                        cursor = self.previous_element_sibling(sibling);
                    }
                    found
                }
            };

            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }

        true
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.is_tag(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !element.has_class(class_name))
        {
            return false;
        }

        if !step
            .attrs
            .iter()
            .all(|cond| cond.matches(element.attrs.get(cond.key()).map(String::as_str)))
        {
            return false;
        }

        step.pseudo_classes.iter().all(|pseudo| match pseudo {
            SelectorPseudoClass::FirstChild => self.previous_element_sibling(node_id).is_none(),
            SelectorPseudoClass::LastChild => self.next_element_sibling(node_id).is_none(),
            SelectorPseudoClass::Checked => element.checked,
            SelectorPseudoClass::Disabled => element.disabled,
            SelectorPseudoClass::Enabled => !element.disabled,
            SelectorPseudoClass::Not(inners) => !inners
                .iter()
                .any(|steps| self.matches_selector_chain(node_id, steps)),
        })
    }

    fn sibling_elements(&self, node_id: NodeId) -> Option<(Vec<NodeId>, usize)> {
        let parent = self.parent(node_id)?;
        let siblings = self.element_children(parent);
        let pos = siblings.iter().position(|id| *id == node_id)?;
        Some((siblings, pos))
    }

    pub fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (siblings, pos) = self.sibling_elements(node_id)?;
        siblings.get(pos + 1).copied()
    }

    pub fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let (siblings, pos) = self.sibling_elements(node_id)?;
        pos.checked_sub(1).and_then(|prev| siblings.get(prev).copied())
    }

    /// Serialises a node for diagnostics. Attributes are emitted in sorted
    /// order so dumps are stable.
    pub fn dump_node(&self, node_id: NodeId) -> String {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.dump_node_inner(node_id))
    }

    fn dump_node_inner(&self, node_id: NodeId) -> String {
        let Some(node) = self.nodes.get(node_id.0) else {
            return String::new();
        };
        match &node.node_type {
            NodeType::Document => node
                .children
                .iter()
                .map(|child| self.dump_node(*child))
                .collect(),
            NodeType::Text(text) => text.clone(),
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attrs = element.attrs.iter().collect::<Vec<_>>();
                attrs.sort();
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(v);
                    out.push('"');
                }
                out.push('>');
                if crate::html::is_void_tag(&element.tag_name) {
                    return out;
                }
                for child in &node.children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| value.split_whitespace().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}
