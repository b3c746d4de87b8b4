use form_behaviors::{HandlerSet, Page, WidgetConventions};
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::test_runner::{FileFailurePersistence, TestCaseError, TestCaseResult};

const WIDGET_PROPTEST_REGRESSION_FILE: &str =
    "tests/proptest-regressions/widget_property_test.txt";
const DEFAULT_WIDGET_PROPTEST_CASES: u32 = 64;

const ACCESS_LEVELS: [&str; 4] = ["public", "members", "staff", "private"];
const COMMANDS: [&str; 4] = ["contains", "equals", "between", "empty"];
const QUERY_FIELDS: [&str; 3] = ["contains", "equals", "between"];

fn widget_proptest_cases() -> u32 {
    std::env::var("FORM_BEHAVIORS_PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_WIDGET_PROPTEST_CASES)
}

fn fail(err: form_behaviors::Error) -> TestCaseError {
    TestCaseError::fail(format!("{err:?}"))
}

fn activated(html: &str) -> Result<Page, TestCaseError> {
    let handlers = HandlerSet::standard(&WidgetConventions::default()).map_err(fail)?;
    let mut page = Page::from_html(html).map_err(fail)?;
    page.activate_document(&handlers).map_err(fail)?;
    Ok(page)
}

fn repeating_group_html(counter: u32) -> String {
    format!(
        r#"
        <div id="w" data-widget="RowsFieldField" data-counter="{counter}">
          <div id="holder" data-tag="holder"></div>
          <div class="row" data-tag="prototype">
            <label for="row-0">Row</label>
            <input id="row-0" name="row-0" disabled>
            <button type="button" data-action="remove">x</button>
          </div>
          <button id="add" type="button" data-action="add">+</button>
        </div>
        "#
    )
}

fn row_names(page: &Page) -> Result<Vec<String>, TestCaseError> {
    let rows = page.select_all("#holder > [data-tag=item] input").map_err(fail)?;
    Ok(rows
        .into_iter()
        .map(|node| page.dom().attr(node, "name").unwrap_or_default().to_string())
        .collect())
}

fn assert_adds_are_numbered_from_counter(counter: u32, adds: usize) -> TestCaseResult {
    let mut page = activated(&repeating_group_html(counter))?;
    for _ in 0..adds {
        page.click("#add").map_err(fail)?;
    }

    let expected = (1..=adds)
        .map(|step| format!("row-{}", u64::from(counter) + step as u64))
        .collect::<Vec<_>>();
    prop_assert_eq!(row_names(&page)?, expected);
    prop_assert!(page.assert_count("#holder :disabled", 0).is_ok());
    prop_assert!(page.assert_attr("[data-tag=prototype] input", "name", Some("row-0")).is_ok());
    Ok(())
}

fn assert_removals_keep_sibling_rows(adds: usize, removals: &[usize]) -> TestCaseResult {
    let mut page = activated(&repeating_group_html(0))?;
    for _ in 0..adds {
        page.click("#add").map_err(fail)?;
    }

    let mut expected = row_names(&page)?;
    for pick in removals {
        if expected.is_empty() {
            break;
        }
        let index = pick % expected.len();
        let name = expected.remove(index);
        page.click(&format!("[name={name}] ~ button")).map_err(fail)?;
        prop_assert_eq!(row_names(&page)?, expected.clone());
    }
    Ok(())
}

fn assert_toggler_drives_all(checkboxes: usize, toggles: &[bool]) -> TestCaseResult {
    let boxes = (0..checkboxes)
        .map(|i| format!(r#"<input type="checkbox" name="opt[]" id="opt-{i}">"#))
        .collect::<String>();
    let mut page = activated(&format!(
        r#"<fieldset><span data-widget="OptsMultiCheckbox"><input type="checkbox" id="all" data-tag="toggler"></span>{boxes}</fieldset>"#
    ))?;

    for checked in toggles {
        page.set_checked("#all", *checked).map_err(fail)?;
        for i in 0..checkboxes {
            let selector = format!("#opt-{i}");
            prop_assert!(page.assert_checked(&selector, *checked).is_ok());
        }
    }
    Ok(())
}

fn access_html(active: usize) -> String {
    let options = ACCESS_LEVELS
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let class = if i == active { r#" class="active""# } else { "" };
            format!(r#"<li{class}><a href="" data-access="{level}"><span class="icon-{level}"></span></a></li>"#)
        })
        .collect::<String>();
    format!(
        r#"
        <div id="group-level" data-widget="LevelAccess" data-name="level">
          <input type="hidden" name="level">
          <div><a class="dropdown-toggle"><span></span></a><ul class="dropdown-menu">{options}</ul></div>
        </div>
        "#
    )
}

fn assert_last_access_click_wins(active: usize, clicks: &[usize]) -> TestCaseResult {
    let mut page = activated(&access_html(active))?;
    let mut current = ACCESS_LEVELS[active];
    for pick in clicks {
        current = ACCESS_LEVELS[*pick];
        page.click(&format!("[data-access={current}]")).map_err(fail)?;
    }

    prop_assert!(page.assert_count("li.active", 1).is_ok());
    let active_selector = format!("li.active > a[data-access={current}]");
    prop_assert!(page.assert_exists(&active_selector).is_ok());
    prop_assert!(page.assert_value("[name=level]", current).is_ok());
    let icon = format!("icon-{current}");
    prop_assert!(page
        .assert_attr(".dropdown-toggle span", "class", Some(icon.as_str()))
        .is_ok());
    Ok(())
}

fn filter_html() -> String {
    let options = COMMANDS
        .iter()
        .map(|command| format!(r#"<option value="{command}">{command}</option>"#))
        .collect::<String>();
    let fields = QUERY_FIELDS
        .iter()
        .map(|field| format!(r#"<div data-name="f.{field}"><input name="{field}"></div>"#))
        .collect::<String>();
    format!(
        r#"<div id="filter" data-widget="FilterAny"><div data-name="f.command"><select name="f.command">{options}</select></div>{fields}</div>"#
    )
}

fn assert_only_selected_field_is_visible(commands: &[usize]) -> TestCaseResult {
    let mut page = activated(&filter_html())?;
    for pick in commands {
        let command = COMMANDS[*pick];
        page.select_value("[name='f.command']", command).map_err(fail)?;
        for field in QUERY_FIELDS {
            let selector = format!(r#"[data-name="f.{field}"]"#);
            prop_assert!(page.assert_class(&selector, "hidden", field != command).is_ok());
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: widget_proptest_cases(),
        failure_persistence: Some(Box::new(
            FileFailurePersistence::Direct(WIDGET_PROPTEST_REGRESSION_FILE),
        )),
        .. ProptestConfig::default()
    })]

    #[test]
    fn adds_are_numbered_after_the_counter(counter in 0u32..1000, adds in 0usize..8) {
        assert_adds_are_numbered_from_counter(counter, adds)?;
    }

    #[test]
    fn removing_rows_never_touches_siblings(adds in 1usize..8, removals in vec(any::<usize>(), 1..6)) {
        assert_removals_keep_sibling_rows(adds, &removals)?;
    }

    #[test]
    fn toggler_state_propagates(checkboxes in 0usize..6, toggles in vec(any::<bool>(), 1..8)) {
        assert_toggler_drives_all(checkboxes, &toggles)?;
    }

    #[test]
    fn last_access_click_wins(active in 0usize..4, clicks in vec(0usize..4, 0..8)) {
        assert_last_access_click_wins(active, &clicks)?;
    }

    #[test]
    fn exactly_the_selected_query_field_is_visible(commands in vec(0usize..4, 1..8)) {
        assert_only_selected_field_is_visible(&commands)?;
    }
}
