//! Client-side behaviors for server-rendered form widgets.
//!
//! The crate models a page as an in-memory DOM, simulates user input the way a
//! browser would, and binds four widget behaviors to markup produced by a
//! server-side templating layer:
//!
//! - repeating groups whose rows are added from a prototype and removed again,
//! - "toggle all" checkboxes that drive the checkboxes of their field group,
//! - dropdown access-level selectors that keep a hidden control in sync,
//! - filter widgets that show the query field selected by a command control.
//!
//! ```
//! use form_behaviors::{HandlerSet, Page, WidgetConventions};
//!
//! let html = r#"
//!   <div data-widget="RowsFieldField" data-counter="0">
//!     <div data-tag="holder"></div>
//!     <div class="row" data-tag="prototype">
//!       <input id="rows-0" name="rows-0" disabled>
//!     </div>
//!     <button id="add" data-action="add">Add</button>
//!   </div>
//! "#;
//!
//! let handlers = HandlerSet::standard(&WidgetConventions::default())?;
//! let mut page = Page::from_html(html)?;
//! page.activate_document(&handlers)?;
//! page.click("#add")?;
//! page.assert_attr("[data-tag=holder] input", "name", Some("rows-1"))?;
//! # Ok::<(), form_behaviors::Error>(())
//! ```

mod config;
mod dom;
mod events;
mod handlers;
mod html;
mod page;
mod selector;

pub use config::WidgetConventions;
pub use dom::{Dom, NodeId};
pub use events::EventState;
pub use handlers::{
    AccessSelectorHandler, BulkCheckboxHandler, ConditionalFieldHandler, HandlerSet, PageHandler,
    RepeatingGroupHandler,
};
pub use html::parse_html;
pub use page::Page;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error("assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}")]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("dom error: {0}")]
    Dom(String),
    #[error("invalid widget conventions: {0}")]
    Config(String),
    #[error("invalid pattern: {0}")]
    Pattern(String),
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests;
