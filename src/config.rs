use serde::Deserialize;

use crate::selector::{parse_selector_groups, quote_attr_value};
use crate::{Error, Result};

/// The markup contract shared with the server-side templates.
///
/// Every field has a default matching the stock templates, so a TOML
/// document only needs to name what differs:
///
/// ```
/// use form_behaviors::WidgetConventions;
///
/// let conventions = WidgetConventions::from_toml_str(r#"
///     widget_attr = "data-kind"
///     hidden_class = "d-none"
/// "#)?;
/// assert_eq!(conventions.widget_attr, "data-kind");
/// assert_eq!(conventions.active_class, "active");
/// # Ok::<(), form_behaviors::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConventions {
    /// Attribute naming the widget kind of a container.
    pub widget_attr: String,
    /// Suffix of the widget kind marking repeating groups.
    pub repeating_group_suffix: String,
    /// Suffix of the widget kind marking bulk checkbox groups.
    pub bulk_checkbox_suffix: String,
    /// Suffix of the widget kind marking access-level selectors.
    pub access_selector_suffix: String,
    /// Prefix of the widget kinds marking conditional filter fields.
    pub conditional_field_prefix: String,

    pub tag_attr: String,
    pub prototype_tag: String,
    pub item_tag: String,
    pub holder_tag: String,
    pub toggler_tag: String,

    pub action_attr: String,
    pub add_action: String,
    pub remove_action: String,

    pub counter_attr: String,
    pub name_attr: String,
    pub access_attr: String,

    pub row_class: String,
    pub hidden_class: String,
    pub active_class: String,
    pub dropdown_toggle_class: String,
    pub dropdown_menu_class: String,
    pub form_group_class: String,

    /// Ancestor enclosing the checkboxes a toggler drives.
    pub field_group_selector: String,
    /// Prefix stripped from widget ids to obtain the widget identity.
    pub widget_id_prefix: String,
    /// Final segment of the command field's logical name.
    pub command_suffix: String,

    /// Separator preceding the row index in generated attributes.
    pub index_separator: String,
    /// Index carried by the prototype row.
    pub index_placeholder: String,
}

impl Default for WidgetConventions {
    fn default() -> Self {
        Self {
            widget_attr: "data-widget".into(),
            repeating_group_suffix: "FieldField".into(),
            bulk_checkbox_suffix: "MultiCheckbox".into(),
            access_selector_suffix: "Access".into(),
            conditional_field_prefix: "Filter".into(),
            tag_attr: "data-tag".into(),
            prototype_tag: "prototype".into(),
            item_tag: "item".into(),
            holder_tag: "holder".into(),
            toggler_tag: "toggler".into(),
            action_attr: "data-action".into(),
            add_action: "add".into(),
            remove_action: "remove".into(),
            counter_attr: "data-counter".into(),
            name_attr: "data-name".into(),
            access_attr: "data-access".into(),
            row_class: "row".into(),
            hidden_class: "hidden".into(),
            active_class: "active".into(),
            dropdown_toggle_class: "dropdown-toggle".into(),
            dropdown_menu_class: "dropdown-menu".into(),
            form_group_class: "form-group".into(),
            field_group_selector: "fieldset".into(),
            widget_id_prefix: "group-".into(),
            command_suffix: "command".into(),
            index_separator: "-".into(),
            index_placeholder: "0".into(),
        }
    }
}

impl WidgetConventions {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let conventions: Self = toml::from_str(src).map_err(|err| Error::Config(err.to_string()))?;
        conventions.validate()?;
        Ok(conventions)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("widget_attr", &self.widget_attr),
            ("tag_attr", &self.tag_attr),
            ("action_attr", &self.action_attr),
            ("counter_attr", &self.counter_attr),
            ("name_attr", &self.name_attr),
            ("index_placeholder", &self.index_placeholder),
            ("command_suffix", &self.command_suffix),
            ("item_tag", &self.item_tag),
            ("row_class", &self.row_class),
            ("hidden_class", &self.hidden_class),
            ("active_class", &self.active_class),
            ("dropdown_toggle_class", &self.dropdown_toggle_class),
            ("dropdown_menu_class", &self.dropdown_menu_class),
            ("form_group_class", &self.form_group_class),
            ("field_group_selector", &self.field_group_selector),
        ];
        if let Some((key, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(Error::Config(format!("`{key}` must not be empty")));
        }
        parse_selector_groups(&self.field_group_selector).map_err(|_| {
            Error::Config(format!(
                "`field_group_selector` is not a supported selector: {:?}",
                self.field_group_selector
            ))
        })?;
        Ok(())
    }

    pub(crate) fn widget_suffix_selector(&self, suffix: &str) -> String {
        format!("[{}$={}]", self.widget_attr, quote_attr_value(suffix))
    }

    pub(crate) fn widget_prefix_selector(&self, prefix: &str) -> String {
        format!("[{}^={}]", self.widget_attr, quote_attr_value(prefix))
    }

    pub(crate) fn tag_selector(&self, tag: &str) -> String {
        format!("[{}={}]", self.tag_attr, quote_attr_value(tag))
    }

    pub(crate) fn action_selector(&self, action: &str) -> String {
        format!("button[{}={}]", self.action_attr, quote_attr_value(action))
    }
}
