use fancy_regex::Regex;

use super::{PageHandler, first_owned_within, owned_within, owner_of};
use crate::config::WidgetConventions;
use crate::dom::NodeId;
use crate::page::Page;
use crate::{Error, Result};

/// Rows added from a prototype and removed again.
///
/// Clicking the widget's add button bumps its counter, deep-clones the
/// prototype row with its listeners, enables the clone, rewrites the index
/// placeholder in its indexed attributes and appends it to the holder.
/// Clicking a remove button drops the enclosing row. Remaining rows are
/// never renumbered.
#[derive(Debug, Clone)]
pub struct RepeatingGroupHandler {
    conventions: WidgetConventions,
    widget_selector: String,
    placeholder: Regex,
}

impl RepeatingGroupHandler {
    pub fn new(conventions: &WidgetConventions) -> Result<Self> {
        let pattern = format!(
            "(?<={}){}$",
            fancy_regex::escape(&conventions.index_separator),
            fancy_regex::escape(&conventions.index_placeholder)
        );
        let placeholder = Regex::new(&pattern).map_err(|err| Error::Pattern(err.to_string()))?;
        Ok(Self {
            widget_selector: conventions
                .widget_suffix_selector(&conventions.repeating_group_suffix),
            conventions: conventions.clone(),
            placeholder,
        })
    }

    /// Appends a new live row to `widget` and returns it.
    ///
    /// Returns `Ok(None)` when the widget has no prototype or no holder.
    pub fn add_row(&self, page: &mut Page, widget: NodeId) -> Result<Option<NodeId>> {
        let c = &self.conventions;
        let prototype = first_owned_within(
            page.dom(),
            widget,
            &self.widget_selector,
            &c.tag_selector(&c.prototype_tag),
        )?;
        let holder = first_owned_within(
            page.dom(),
            widget,
            &self.widget_selector,
            &c.tag_selector(&c.holder_tag),
        )?;
        let (Some(prototype), Some(holder)) = (prototype, holder) else {
            log::warn!(
                "repeating group: widget {widget:?} lacks a prototype or holder, nothing added"
            );
            return Ok(None);
        };

        let counter = self.read_counter(page, widget).saturating_add(1);
        let index = counter.to_string();
        page.dom_mut().set_attr(widget, &c.counter_attr, &index)?;

        let row = page.clone_with_behavior(prototype)?;
        for node in page.dom().subtree_elements(row) {
            self.prepare_node(page, node, &index)?;
        }
        page.dom_mut().set_attr(row, &c.tag_attr, &c.item_tag)?;
        page.dom_mut().append_child(holder, row)?;

        log::debug!("repeating group: added row {index} to widget {widget:?}");
        Ok(Some(row))
    }

    fn read_counter(&self, page: &Page, widget: NodeId) -> u64 {
        let raw = page.dom().attr(widget, &self.conventions.counter_attr);
        match raw.map(|value| value.trim().parse::<u64>()) {
            Some(Ok(counter)) => counter,
            Some(Err(_)) => {
                log::warn!("repeating group: malformed counter {raw:?}, starting from 0");
                0
            }
            None => {
                log::warn!("repeating group: widget {widget:?} has no counter, starting from 0");
                0
            }
        }
    }

    fn prepare_node(&self, page: &mut Page, node: NodeId, index: &str) -> Result<()> {
        if page.dom().has_attr(node, "disabled") {
            page.dom_mut().remove_attr(node, "disabled")?;
        }
        let indexed: [&str; 4] = ["id", "name", "for", &self.conventions.name_attr];
        for attr in indexed {
            let Some(value) = page.dom().attr(node, attr).map(str::to_string) else {
                continue;
            };
            if let Some(rewritten) = self.rewrite_index(&value, index)? {
                page.dom_mut().set_attr(node, attr, &rewritten)?;
            }
        }
        Ok(())
    }

    /// Replaces a trailing index placeholder, `None` when `value` has none.
    pub(crate) fn rewrite_index(&self, value: &str, index: &str) -> Result<Option<String>> {
        let found = self
            .placeholder
            .find(value)
            .map_err(|err| Error::Pattern(err.to_string()))?;
        Ok(found.map(|m| format!("{}{index}", &value[..m.start()])))
    }

    fn remove_row(&self, page: &mut Page, button: NodeId) -> Result<()> {
        let Some(widget) = owner_of(page.dom(), button, &self.widget_selector)? else {
            return Ok(());
        };
        let row_selector = format!(".{}", self.conventions.row_class);
        match page.dom().closest(button, &row_selector)? {
            Some(row) if page.dom().is_descendant_of(row, widget) => {
                log::debug!("repeating group: removing row {row:?}");
                page.remove_node(row)
            }
            _ => {
                log::warn!("repeating group: remove button outside of a row");
                Ok(())
            }
        }
    }
}

impl PageHandler for RepeatingGroupHandler {
    fn name(&self) -> &'static str {
        "repeating-group"
    }

    fn widget_selector(&self) -> &str {
        &self.widget_selector
    }

    fn bind(&self, page: &mut Page, widget: NodeId) -> Result<()> {
        let c = &self.conventions;
        let adders = owned_within(
            page.dom(),
            widget,
            &self.widget_selector,
            &c.action_selector(&c.add_action),
        )?;
        let removers = owned_within(
            page.dom(),
            widget,
            &self.widget_selector,
            &c.action_selector(&c.remove_action),
        )?;
        log::debug!(
            "repeating group: binding widget {widget:?} adders={} removers={}",
            adders.len(),
            removers.len()
        );

        for button in adders {
            let handler = self.clone();
            page.add_listener(button, "click", move |page, event| {
                if let Some(widget) =
                    owner_of(page.dom(), event.current_target, &handler.widget_selector)?
                {
                    handler.add_row(page, widget)?;
                }
                Ok(())
            });
        }
        for button in removers {
            let handler = self.clone();
            page.add_listener(button, "click", move |page, event| {
                handler.remove_row(page, event.current_target)
            });
        }
        Ok(())
    }
}
