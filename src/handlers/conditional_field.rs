use super::{PageHandler, first_owned_within, owned_within, owner_of};
use crate::config::WidgetConventions;
use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;
use crate::selector::{name_selector, quote_attr_value};

/// Filter widget showing the query field picked by its command control.
///
/// The command field carries a logical name `{prefix}.command`; query
/// fields carry `{prefix}.{value}`. Selecting `value` in the command control
/// shows the matching query field and hides every other one.
#[derive(Debug, Clone)]
pub struct ConditionalFieldHandler {
    conventions: WidgetConventions,
    widget_selector: String,
    command_selector: String,
    query_selector: String,
}

impl ConditionalFieldHandler {
    pub fn new(conventions: &WidgetConventions) -> Self {
        let name_attr = &conventions.name_attr;
        let command_suffix = quote_attr_value(&format!(".{}", conventions.command_suffix));
        Self {
            widget_selector: conventions
                .widget_prefix_selector(&conventions.conditional_field_prefix),
            command_selector: format!("[{name_attr}$={command_suffix}]"),
            query_selector: format!("[{name_attr}]:not([{name_attr}$={command_suffix}])"),
            conventions: conventions.clone(),
        }
    }

    /// Key of the query field selected by `value`: the command name with its
    /// last segment replaced.
    pub(crate) fn target_key(command_name: &str, value: &str) -> String {
        match command_name.rsplit_once('.') {
            Some((prefix, _)) => format!("{prefix}.{value}"),
            None => value.to_string(),
        }
    }

    fn render(&self, page: &mut Page, widget: NodeId) -> Result<()> {
        let c = &self.conventions;
        let Some(command) =
            first_owned_within(page.dom(), widget, &self.widget_selector, &self.command_selector)?
        else {
            log::warn!("conditional field: widget {widget:?} has no command field");
            return Ok(());
        };
        let command_name = page
            .dom()
            .attr(command, &c.name_attr)
            .unwrap_or_default()
            .to_string();
        let Some(control) = page
            .dom()
            .query_selector_within(command, &name_selector(&command_name))?
        else {
            log::warn!("conditional field: no control named {command_name:?}");
            return Ok(());
        };
        let target = Self::target_key(&command_name, &page.dom().value(control)?);

        let fields = self.query_fields(page, widget)?;
        let mut shown = false;
        for field in fields {
            if page.dom().attr(field, &c.name_attr) == Some(target.as_str()) {
                self.show(page, field)?;
                shown = true;
            } else if !page.dom().has_class(field, &c.hidden_class) {
                page.dom_mut().add_class(field, &c.hidden_class)?;
            }
        }
        log::debug!("conditional field: target={target:?} shown={shown}");
        Ok(())
    }

    /// Owned query fields that are not nested inside another query field.
    fn query_fields(&self, page: &Page, widget: NodeId) -> Result<Vec<NodeId>> {
        let dom = page.dom();
        let candidates = owned_within(dom, widget, &self.widget_selector, &self.query_selector)?;
        Ok(candidates
            .iter()
            .copied()
            .filter(|field| {
                !candidates
                    .iter()
                    .any(|outer| outer != field && dom.is_descendant_of(*field, *outer))
            })
            .collect())
    }

    fn show(&self, page: &mut Page, field: NodeId) -> Result<()> {
        let hidden = &self.conventions.hidden_class;
        page.dom_mut().remove_class(field, hidden)?;
        let nested = format!(".{}.{hidden}", self.conventions.form_group_class);
        for group in page.dom().query_selector_all_within(field, &nested)? {
            page.dom_mut().remove_class(group, hidden)?;
        }
        Ok(())
    }
}

impl PageHandler for ConditionalFieldHandler {
    fn name(&self) -> &'static str {
        "conditional-field"
    }

    fn widget_selector(&self) -> &str {
        &self.widget_selector
    }

    fn bind(&self, page: &mut Page, widget: NodeId) -> Result<()> {
        self.render(page, widget)?;

        let commands =
            owned_within(page.dom(), widget, &self.widget_selector, &self.command_selector)?;
        let Some(command) = commands.first().copied() else {
            return Ok(());
        };
        log::debug!("conditional field: binding widget {widget:?}");
        let handler = self.clone();
        page.add_listener(command, "change", move |page, event| {
            match owner_of(page.dom(), event.current_target, &handler.widget_selector)? {
                Some(widget) => handler.render(page, widget),
                None => Ok(()),
            }
        });
        Ok(())
    }
}
