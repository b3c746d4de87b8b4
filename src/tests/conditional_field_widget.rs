use super::*;

const TITLE_FILTER: &str = r#"
<div id="filter" data-widget="FilterText">
  <div data-name="filter.title.command">
    <select name="filter.title.command">
      <option value="contains">contains</option>
      <option value="equals" selected>equals</option>
      <option value="between">between</option>
      <option value="empty">is empty</option>
    </select>
  </div>
  <div data-name="filter.title.contains" class="hidden">
    <div class="form-group hidden"><input name="contains"></div>
  </div>
  <div data-name="filter.title.equals"><input name="equals"></div>
  <div data-name="filter.title.between">
    <div data-name="filter.title.between.min"><input name="min"></div>
  </div>
</div>
"#;

fn field(key: &str) -> String {
    format!(r#"[data-name="filter.title.{key}"]"#)
}

#[test]
fn activation_shows_the_field_for_the_initial_command() -> Result<()> {
    let page = activated(TITLE_FILTER)?;
    page.assert_class(&field("equals"), "hidden", false)?;
    page.assert_class(&field("contains"), "hidden", true)?;
    page.assert_class(&field("between"), "hidden", true)?;
    page.assert_class(&field("command"), "hidden", false)?;
    Ok(())
}

#[test_log::test]
fn changing_the_command_swaps_the_visible_field() -> Result<()> {
    let mut page = activated(TITLE_FILTER)?;
    page.select_value("[name='filter.title.command']", "contains")?;

    page.assert_class(&field("contains"), "hidden", false)?;
    page.assert_class(&format!("{} .form-group", field("contains")), "hidden", false)?;
    page.assert_class(&field("equals"), "hidden", true)?;
    page.assert_class(&field("between"), "hidden", true)?;
    Ok(())
}

#[test]
fn nested_fields_belong_to_their_enclosing_query_field() -> Result<()> {
    let mut page = activated(TITLE_FILTER)?;
    page.select_value("[name='filter.title.command']", "between")?;

    page.assert_class(&field("between"), "hidden", false)?;
    page.assert_class(&field("between.min"), "hidden", false)?;

    page.select_value("[name='filter.title.command']", "equals")?;
    page.assert_class(&field("between"), "hidden", true)?;
    page.assert_class(&field("between.min"), "hidden", false)?;
    Ok(())
}

#[test]
fn unmatched_command_hides_every_query_field() -> Result<()> {
    let mut page = activated(TITLE_FILTER)?;
    page.select_value("[name='filter.title.command']", "empty")?;
    page.assert_count(r#"#filter > [data-name].hidden"#, 3)?;
    page.assert_class(&field("command"), "hidden", false)?;
    Ok(())
}

#[test]
fn rendering_twice_is_stable() -> Result<()> {
    let mut page = activated(TITLE_FILTER)?;
    page.dispatch("[name='filter.title.command']", "change")?;
    page.dispatch("[name='filter.title.command']", "change")?;
    page.assert_count("#filter > [data-name]:not(.hidden)", 2)?;
    page.assert_attr(&field("contains"), "class", Some("hidden"))?;
    Ok(())
}

#[test]
fn filters_side_by_side_render_independently() -> Result<()> {
    let second = TITLE_FILTER
        .replace(r#"id="filter""#, r#"id="other""#)
        .replace("FilterText", "FilterDate")
        .replace("filter.title", "filter.date");
    let mut page = activated(&format!("{TITLE_FILTER}{second}"))?;

    page.select_value("[name='filter.date.command']", "contains")?;
    page.assert_class(r#"[data-name="filter.date.contains"]"#, "hidden", false)?;
    page.assert_class(&field("contains"), "hidden", true)?;
    page.assert_class(&field("equals"), "hidden", false)?;
    Ok(())
}

#[test]
fn text_commands_are_read_from_inputs_too() -> Result<()> {
    let mut page = activated(
        r#"
        <div data-widget="FilterNumber">
          <div data-name="n.command"><input name="n.command" value="gt"></div>
          <div data-name="n.gt" class="hidden"></div>
          <div data-name="n.lt"></div>
        </div>
        "#,
    )?;
    page.assert_class(r#"[data-name="n.gt"]"#, "hidden", false)?;
    page.assert_class(r#"[data-name="n.lt"]"#, "hidden", true)?;

    page.select_value("[name='n.command']", "lt")?;
    page.assert_class(r#"[data-name="n.gt"]"#, "hidden", true)?;
    page.assert_class(r#"[data-name="n.lt"]"#, "hidden", false)?;
    Ok(())
}

#[test]
fn widget_without_command_field_is_left_alone() -> Result<()> {
    let page = activated(
        r#"<div data-widget="FilterBroken"><div data-name="x.a" class="hidden"></div></div>"#,
    )?;
    page.assert_class(r#"[data-name="x.a"]"#, "hidden", true)?;
    Ok(())
}

#[test]
fn target_key_replaces_the_last_segment() {
    assert_eq!(
        ConditionalFieldHandler::target_key("filter.title.command", "eq"),
        "filter.title.eq"
    );
    assert_eq!(ConditionalFieldHandler::target_key("command", "eq"), "eq");
    assert_eq!(ConditionalFieldHandler::target_key("a.command", ""), "a.");
}
