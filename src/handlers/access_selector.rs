use super::{PageHandler, first_owned_within, owned_within, owner_of};
use crate::config::WidgetConventions;
use crate::dom::NodeId;
use crate::page::Page;
use crate::Result;
use crate::selector::name_selector;

/// Dropdown of access levels mirrored into a hidden control.
///
/// Each option anchor carries the level in its access attribute and the
/// icon style as the class of its first `span`. Rendering an option marks
/// it active, writes the level into the control named by the widget, and
/// copies the icon style onto the dropdown toggle.
#[derive(Debug, Clone)]
pub struct AccessSelectorHandler {
    conventions: WidgetConventions,
    widget_selector: String,
    option_selector: String,
    active_option_selector: String,
}

impl AccessSelectorHandler {
    pub fn new(conventions: &WidgetConventions) -> Self {
        let menu = &conventions.dropdown_menu_class;
        Self {
            widget_selector: conventions
                .widget_suffix_selector(&conventions.access_selector_suffix),
            option_selector: format!(".{menu} > li > a"),
            active_option_selector: format!(".{menu} > li.{} > a", conventions.active_class),
            conventions: conventions.clone(),
        }
    }

    /// Strips the id prefix, e.g. `group-visibility` becomes `visibility`.
    pub(crate) fn widget_identity<'a>(&self, id: &'a str) -> &'a str {
        id.strip_prefix(self.conventions.widget_id_prefix.as_str())
            .unwrap_or(id)
    }

    fn render(&self, page: &mut Page, widget: NodeId, option: NodeId) -> Result<()> {
        let c = &self.conventions;
        let identity = self
            .widget_identity(page.dom().attr(widget, "id").unwrap_or_default())
            .to_string();
        let access = page
            .dom()
            .attr(option, &c.access_attr)
            .unwrap_or_default()
            .to_string();
        let icon = match page.dom().query_selector_within(option, "span")? {
            Some(span) => page.dom().attr(span, "class").map(str::to_string),
            None => None,
        };

        let Some(item) = page.dom().parent(option) else {
            return Ok(());
        };
        if let Some(menu) = page.dom().parent(item) {
            for sibling in page.dom().element_children(menu) {
                if page.dom().tag_name(sibling) == Some("li") {
                    page.dom_mut().remove_class(sibling, &c.active_class)?;
                }
            }
            if let Some(container) = page.dom().parent(menu) {
                self.render_icon(page, container, icon.as_deref())?;
            }
        }
        page.dom_mut().add_class(item, &c.active_class)?;

        match page.dom().attr(widget, &c.name_attr).map(str::to_string) {
            Some(name) => match page
                .dom()
                .query_selector_within(widget, &name_selector(&name))?
            {
                Some(control) => page.dom_mut().set_value(control, &access)?,
                None => log::warn!("access selector {identity}: no control named {name:?}"),
            },
            None => log::warn!("access selector {identity}: widget has no control name"),
        }

        log::debug!("access selector {identity}: access={access:?}");
        Ok(())
    }

    /// Copies `icon` onto the toggle's icon element. An option without an
    /// icon leaves the current one in place.
    fn render_icon(&self, page: &mut Page, container: NodeId, icon: Option<&str>) -> Result<()> {
        let Some(icon) = icon else {
            return Ok(());
        };
        let toggle_selector = format!(".{}", self.conventions.dropdown_toggle_class);
        let Some(toggle) = page.dom().query_selector_within(container, &toggle_selector)? else {
            return Ok(());
        };
        let Some(display) = page.dom().query_selector_within(toggle, "span")? else {
            return Ok(());
        };
        page.dom_mut().set_attr(display, "class", icon)
    }
}

impl PageHandler for AccessSelectorHandler {
    fn name(&self) -> &'static str {
        "access-selector"
    }

    fn widget_selector(&self) -> &str {
        &self.widget_selector
    }

    fn bind(&self, page: &mut Page, widget: NodeId) -> Result<()> {
        if let Some(active) = first_owned_within(
            page.dom(),
            widget,
            &self.widget_selector,
            &self.active_option_selector,
        )? {
            self.render(page, widget, active)?;
        }

        let options = owned_within(page.dom(), widget, &self.widget_selector, &self.option_selector)?;
        log::debug!(
            "access selector: binding widget {widget:?} options={}",
            options.len()
        );
        for option in options {
            let handler = self.clone();
            page.add_listener(option, "click", move |page, event| {
                event.prevent_default();
                let option = event.current_target;
                match owner_of(page.dom(), option, &handler.widget_selector)? {
                    Some(widget) => handler.render(page, widget, option),
                    None => Ok(()),
                }
            });
        }
        Ok(())
    }
}
