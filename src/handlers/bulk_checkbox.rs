use super::{PageHandler, owned_within, owner_of};
use crate::config::WidgetConventions;
use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;

const NAMED_CHECKBOX: &str = "input[type=checkbox][name]";

/// "Toggle all" checkbox driving the named checkboxes of its field group.
#[derive(Debug, Clone)]
pub struct BulkCheckboxHandler {
    conventions: WidgetConventions,
    widget_selector: String,
}

impl BulkCheckboxHandler {
    pub fn new(conventions: &WidgetConventions) -> Self {
        Self {
            widget_selector: conventions.widget_suffix_selector(&conventions.bulk_checkbox_suffix),
            conventions: conventions.clone(),
        }
    }

    fn toggle_all(&self, page: &mut Page, toggler: NodeId) -> Result<()> {
        let Some(widget) = owner_of(page.dom(), toggler, &self.widget_selector)? else {
            return Ok(());
        };
        let group = match page.dom().parent(toggler) {
            Some(parent) => page
                .dom()
                .closest(parent, &self.conventions.field_group_selector)?,
            None => None,
        }
        .unwrap_or(widget);

        let checked = page.dom().checked(toggler)?;
        let targets = page
            .dom()
            .query_selector_all_within(group, NAMED_CHECKBOX)?
            .into_iter()
            .filter(|node| *node != toggler)
            .collect::<Vec<_>>();
        log::debug!(
            "bulk checkbox: setting {} checkboxes to {checked}",
            targets.len()
        );

        for node in &targets {
            page.dom_mut().set_checked(*node, checked)?;
        }
        for node in targets {
            page.dispatch_event(node, "change")?;
        }
        Ok(())
    }
}

impl PageHandler for BulkCheckboxHandler {
    fn name(&self) -> &'static str {
        "bulk-checkbox"
    }

    fn widget_selector(&self) -> &str {
        &self.widget_selector
    }

    fn bind(&self, page: &mut Page, widget: NodeId) -> Result<()> {
        let togglers = owned_within(
            page.dom(),
            widget,
            &self.widget_selector,
            &self.conventions.tag_selector(&self.conventions.toggler_tag),
        )?;
        if togglers.is_empty() {
            log::warn!("bulk checkbox: widget {widget:?} has no toggler");
        }
        for toggler in togglers {
            let handler = self.clone();
            page.add_listener(toggler, "change", move |page, event| {
                handler.toggle_all(page, event.current_target)
            });
        }
        Ok(())
    }
}
