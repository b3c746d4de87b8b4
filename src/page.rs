use std::collections::HashSet;

use crate::dom::{Dom, NodeId};
use crate::events::{EventState, Listener, ListenerStore};
use crate::handlers::HandlerSet;
use crate::html::parse_html;
use crate::selector::name_selector;
use crate::{Error, Result, truncate_chars};

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 2 * 1024 * 1024;

/// A loaded document together with the behavior bound to it.
///
/// `Page` is the single entry point for activation: handlers are passed in
/// explicitly as a [`HandlerSet`] and bound to a subtree, after which user
/// input is simulated through [`Page::click`], [`Page::set_checked`] and
/// friends. All event processing is synchronous.
#[derive(Debug)]
pub struct Page {
    dom: Dom,
    listeners: ListenerStore,
    bound: HashSet<(&'static str, NodeId)>,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self {
            dom: parse_html(html)?,
            listeners: ListenerStore::default(),
            bound: HashSet::new(),
        })
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// Binds every handler of `handlers` to the widgets found in the subtree
    /// rooted at `root` (inclusive) and returns how many widgets were newly
    /// bound.
    ///
    /// Widgets that are already bound, including clones of bound widgets, are
    /// skipped, so activating overlapping subtrees is safe. The first bind
    /// error stops activation; the failing widget is left unbound.
    pub fn activate(&mut self, handlers: &HandlerSet, root: NodeId) -> Result<usize> {
        let mut newly_bound = 0;
        for handler in handlers.iter() {
            let widgets = self.dom.select_inclusive(root, handler.widget_selector())?;
            log::debug!(
                "activate: handler={} widgets={}",
                handler.name(),
                widgets.len()
            );
            for widget in widgets {
                let mark = (handler.name(), widget);
                if self.bound.contains(&mark) {
                    log::trace!("activate: handler={} already bound", handler.name());
                    continue;
                }
                handler.bind(self, widget)?;
                self.bound.insert(mark);
                newly_bound += 1;
            }
        }
        Ok(newly_bound)
    }

    pub fn activate_document(&mut self, handlers: &HandlerSet) -> Result<usize> {
        let root = self.dom.root();
        self.activate(handlers, root)
    }

    /// Replaces the content of the element matched by `selector` with
    /// `html` and activates the new content.
    pub fn swap_fragment(
        &mut self,
        selector: &str,
        html: &str,
        handlers: &HandlerSet,
    ) -> Result<usize> {
        let target = self.select_one(selector)?;
        let fragment = parse_html(html)?;
        let previous = self.dom.children(target).to_vec();
        self.dom.clear_children(target)?;
        for node in previous {
            self.release_subtree(node);
        }
        let roots = self.dom.adopt_fragment(&fragment, target)?;
        log::debug!("swap_fragment: selector={selector} roots={}", roots.len());
        self.activate(handlers, target)
    }

    /// Detaches `node` and drops the listeners and bound marks of its
    /// subtree.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        self.dom.remove_node(node)?;
        self.release_subtree(node);
        Ok(())
    }

    fn release_subtree(&mut self, node: NodeId) {
        let released = self
            .dom
            .subtree_elements(node)
            .into_iter()
            .collect::<HashSet<_>>();
        for node in &released {
            self.listeners.remove_all(*node);
        }
        self.bound.retain(|(_, node)| !released.contains(node));
        log::trace!("release: {} elements", released.len());
    }

    pub fn is_bound(&self, handler_name: &str, widget: NodeId) -> bool {
        self.bound
            .iter()
            .any(|(name, node)| *name == handler_name && *node == widget)
    }

    pub fn add_listener<F>(&mut self, node: NodeId, event: &str, callback: F)
    where
        F: Fn(&mut Page, &mut EventState) -> Result<()> + 'static,
    {
        self.listeners.add(node, event, Listener::new(callback));
    }

    pub fn listener_count(&self, node: NodeId, event: &str) -> usize {
        self.listeners.count(node, event)
    }

    /// Deep-clones `source` together with its listeners and bound marks.
    /// The clone is detached; the caller decides where it goes.
    pub fn clone_with_behavior(&mut self, source: NodeId) -> Result<NodeId> {
        let (clone, mapping) = self.dom.clone_subtree(source)?;
        let marks = self
            .bound
            .iter()
            .filter_map(|(name, node)| {
                mapping
                    .iter()
                    .find(|(from, _)| from == node)
                    .map(|(_, to)| (*name, *to))
            })
            .collect::<Vec<_>>();
        self.bound.extend(marks);
        for (from, to) in mapping {
            self.listeners.copy_all(from, to);
        }
        Ok(clone)
    }

    /// Dispatches `event_type` at `target` and bubbles it to the document.
    ///
    /// The propagation path is fixed before the first listener runs, so a
    /// listener that detaches its own node does not cut the path short.
    pub fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || {
            self.dispatch_event_inner(target, event_type)
        })
    }

    fn dispatch_event_inner(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = vec![target];
        let mut cursor = self.dom.parent(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        for node in path {
            let listeners = self.listeners.get(node, event_type);
            if listeners.is_empty() {
                continue;
            }
            event.current_target = node;
            log::trace!(
                "dispatch: event={event_type} current={} listeners={}",
                self.trace_node_label(node),
                listeners.len()
            );
            for listener in listeners {
                listener.invoke(self, &mut event)?;
            }
            if event.propagation_stopped {
                break;
            }
        }

        Ok(event)
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event)?;
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub fn click_node(&mut self, target: NodeId) -> Result<()> {
        if self.dom.disabled(target) {
            return Ok(());
        }

        let outcome = self.dispatch_event(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }

        match self.input_kind(target).as_deref() {
            Some("checkbox") => {
                let current = self.dom.checked(target)?;
                self.dom.set_checked(target, !current)?;
                self.dispatch_input_and_change(target)?;
            }
            Some("radio") if !self.dom.checked(target)? => {
                self.uncheck_other_radios(target)?;
                self.dom.set_checked(target, true)?;
                self.dispatch_input_and_change(target)?;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let kind = self.input_kind(target);
        if !matches!(kind.as_deref(), Some("checkbox" | "radio")) {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: self.describe_node(target),
            });
        }

        if self.dom.checked(target)? != checked {
            if kind.as_deref() == Some("radio") && checked {
                self.uncheck_other_radios(target)?;
            }
            self.dom.set_checked(target, checked)?;
            self.dispatch_input_and_change(target)?;
        }
        Ok(())
    }

    /// Sets the value of a `select` or `input` and fires `input` and
    /// `change`, as a user picking a value would.
    pub fn select_value(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self.dom.tag_name(target).unwrap_or_default();
        if tag != "select" && tag != "input" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select or input".into(),
                actual: self.describe_node(target),
            });
        }
        self.dom.set_value(target, value)?;
        self.dispatch_input_and_change(target)
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }
        let tag = self.dom.tag_name(target).unwrap_or_default();
        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: self.describe_node(target),
            });
        }
        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    fn dispatch_input_and_change(&mut self, target: NodeId) -> Result<()> {
        self.dispatch_event(target, "input")?;
        self.dispatch_event(target, "change")?;
        Ok(())
    }

    fn input_kind(&self, node: NodeId) -> Option<String> {
        if self.dom.tag_name(node)? != "input" {
            return None;
        }
        Some(
            self.dom
                .attr(node, "type")
                .unwrap_or("text")
                .to_ascii_lowercase(),
        )
    }

    fn uncheck_other_radios(&mut self, target: NodeId) -> Result<()> {
        let Some(name) = self.dom.attr(target, "name").map(str::to_string) else {
            return Ok(());
        };
        let group = self
            .dom
            .query_selector_all(&format!("input[type=radio]{}", name_selector(&name)))?;
        for radio in group.into_iter().filter(|radio| *radio != target) {
            self.dom.set_checked(radio, false)?;
        }
        Ok(())
    }

    pub fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_count(&self, selector: &str, expected: usize) -> Result<()> {
        let matched = self.select_all(selector)?;
        if matched.len() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: matched.len().to_string(),
                dom_snippet: matched
                    .first()
                    .map(|node| self.node_snippet(*node))
                    .unwrap_or_default(),
            });
        }
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.check(selector, target, expected, &actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.check(selector, target, expected, &actual)
    }

    pub fn assert_checked(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.checked(target)?;
        self.check(selector, target, &expected.to_string(), &actual.to_string())
    }

    /// Checks an attribute value; `None` asserts that the attribute is absent.
    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.attr(target, name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{name}={expected:?}"),
                actual: format!("{name}={actual:?}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.has_class(target, class_name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("has_class({class_name})={expected}"),
                actual: format!("has_class({class_name})={actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    fn check(&self, selector: &str, target: NodeId, expected: &str, actual: &str) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn describe_node(&self, node_id: NodeId) -> String {
        match self.input_kind(node_id) {
            Some(kind) => format!("input[type={kind}]"),
            None => self.dom.tag_name(node_id).unwrap_or("non-element").to_string(),
        }
    }

    fn trace_node_label(&self, node_id: NodeId) -> String {
        if node_id == self.dom.root() {
            return "#document".into();
        }
        let tag = self.dom.tag_name(node_id).unwrap_or("#text");
        match self.dom.attr(node_id, "id") {
            Some(id) if !id.is_empty() => format!("{tag}#{id}"),
            _ => tag.to_string(),
        }
    }
}
