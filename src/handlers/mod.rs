use crate::config::WidgetConventions;
use crate::dom::{Dom, NodeId};
use crate::page::Page;
use crate::Result;

mod access_selector;
mod bulk_checkbox;
mod conditional_field;
mod repeating_group;

pub use access_selector::AccessSelectorHandler;
pub use bulk_checkbox::BulkCheckboxHandler;
pub use conditional_field::ConditionalFieldHandler;
pub use repeating_group::RepeatingGroupHandler;

/// Behavior attached to one kind of widget.
///
/// [`Page::activate`] finds the widgets matching [`widget_selector`], skips
/// those already bound under [`name`], and calls [`bind`] once for each of
/// the rest. A widget whose `bind` fails stays unbound.
///
/// [`widget_selector`]: PageHandler::widget_selector
/// [`name`]: PageHandler::name
/// [`bind`]: PageHandler::bind
pub trait PageHandler {
    fn name(&self) -> &'static str;

    fn widget_selector(&self) -> &str;

    fn bind(&self, page: &mut Page, widget: NodeId) -> Result<()>;
}

/// Ordered list of handlers passed to [`Page::activate`].
#[derive(Default)]
pub struct HandlerSet {
    handlers: Vec<Box<dyn PageHandler>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four stock behaviors, in binding order.
    pub fn standard(conventions: &WidgetConventions) -> Result<Self> {
        let mut set = Self::new();
        set.register(RepeatingGroupHandler::new(conventions)?);
        set.register(BulkCheckboxHandler::new(conventions));
        set.register(AccessSelectorHandler::new(conventions));
        set.register(ConditionalFieldHandler::new(conventions));
        Ok(set)
    }

    pub fn register<H>(&mut self, handler: H) -> &mut Self
    where
        H: PageHandler + 'static,
    {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn PageHandler> {
        self.handlers.iter().map(|handler| &**handler)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|handler| handler.name()))
            .finish()
    }
}

/// Descendants of `widget` matching `selector` whose nearest enclosing
/// widget of the same kind is `widget` itself.
pub(crate) fn owned_within(
    dom: &Dom,
    widget: NodeId,
    widget_selector: &str,
    selector: &str,
) -> Result<Vec<NodeId>> {
    let mut owned = Vec::new();
    for node in dom.query_selector_all_within(widget, selector)? {
        if owner_of(dom, node, widget_selector)? == Some(widget) {
            owned.push(node);
        }
    }
    Ok(owned)
}

pub(crate) fn first_owned_within(
    dom: &Dom,
    widget: NodeId,
    widget_selector: &str,
    selector: &str,
) -> Result<Option<NodeId>> {
    Ok(owned_within(dom, widget, widget_selector, selector)?
        .into_iter()
        .next())
}

/// Nearest widget strictly above `node`.
pub(crate) fn owner_of(dom: &Dom, node: NodeId, widget_selector: &str) -> Result<Option<NodeId>> {
    match dom.parent(node) {
        Some(parent) => dom.closest(parent, widget_selector),
        None => Ok(None),
    }
}
