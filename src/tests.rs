use super::*;

mod bulk_checkbox_widget;
mod conditional_field_widget;
mod page_events_and_input;

use std::cell::RefCell;
use std::rc::Rc;

fn activated(html: &str) -> Result<Page> {
    let handlers = HandlerSet::standard(&WidgetConventions::default())?;
    let mut page = Page::from_html(html)?;
    page.activate_document(&handlers)?;
    Ok(page)
}

/// Records `event` on every node matching `selector` as `"{event}:{id}"`.
fn record_events(page: &mut Page, selector: &str, event: &str) -> Result<Rc<RefCell<Vec<String>>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for node in page.select_all(selector)? {
        let sink = Rc::clone(&log);
        let label = format!(
            "{event}:{}",
            page.dom().attr(node, "id").unwrap_or_default()
        );
        page.add_listener(node, event, move |_, _| {
            sink.borrow_mut().push(label.clone());
            Ok(())
        });
    }
    Ok(log)
}
