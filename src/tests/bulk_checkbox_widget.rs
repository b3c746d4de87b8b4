use super::*;

const PERMISSIONS: &str = r#"
<fieldset id="perms">
  <legend>
    <span data-widget="PermsMultiCheckbox">
      <input type="checkbox" id="all" data-tag="toggler"> All
    </span>
  </legend>
  <input type="checkbox" name="perm[]" value="read" id="read">
  <input type="checkbox" name="perm[]" value="write" id="write" checked>
  <input type="checkbox" name="perm[]" value="admin" id="admin">
  <input type="checkbox" id="unnamed">
</fieldset>
<input type="checkbox" name="outside" id="outside">
"#;

#[test_log::test]
fn toggler_drives_every_named_checkbox_in_its_fieldset() -> Result<()> {
    let mut page = activated(PERMISSIONS)?;

    page.click("#all")?;
    for id in ["#read", "#write", "#admin"] {
        page.assert_checked(id, true)?;
    }
    page.assert_checked("#unnamed", false)?;
    page.assert_checked("#outside", false)?;

    page.click("#all")?;
    for id in ["#read", "#write", "#admin"] {
        page.assert_checked(id, false)?;
    }
    Ok(())
}

#[test]
fn each_driven_checkbox_emits_change() -> Result<()> {
    let mut page = activated(PERMISSIONS)?;
    let log = record_events(&mut page, "#perms input[name]", "change")?;

    page.set_checked("#all", true)?;
    assert_eq!(*log.borrow(), ["change:read", "change:write", "change:admin"]);
    Ok(())
}

#[test]
fn named_toggler_does_not_toggle_itself_back() -> Result<()> {
    let mut page = activated(
        r#"
        <fieldset>
          <div data-widget="TagsMultiCheckbox">
            <input type="checkbox" name="all" id="all" data-tag="toggler">
          </div>
          <input type="checkbox" name="tag" id="one">
        </fieldset>
        "#,
    )?;
    page.click("#all")?;
    page.assert_checked("#all", true)?;
    page.assert_checked("#one", true)?;
    Ok(())
}

#[test]
fn widget_is_the_group_when_no_fieldset_encloses_it() -> Result<()> {
    let mut page = activated(
        r#"
        <div data-widget="TagsMultiCheckbox">
          <input type="checkbox" id="all" data-tag="toggler">
          <input type="checkbox" name="tag" id="inside">
        </div>
        <input type="checkbox" name="tag" id="sibling">
        "#,
    )?;
    page.click("#all")?;
    page.assert_checked("#inside", true)?;
    page.assert_checked("#sibling", false)?;
    Ok(())
}

#[test]
fn separate_fieldsets_are_independent() -> Result<()> {
    let mut page = activated(
        r#"
        <fieldset>
          <span data-widget="AMultiCheckbox"><input type="checkbox" id="all-a" data-tag="toggler"></span>
          <input type="checkbox" name="a" id="a">
        </fieldset>
        <fieldset>
          <span data-widget="BMultiCheckbox"><input type="checkbox" id="all-b" data-tag="toggler"></span>
          <input type="checkbox" name="b" id="b">
        </fieldset>
        "#,
    )?;
    page.click("#all-b")?;
    page.assert_checked("#a", false)?;
    page.assert_checked("#b", true)?;
    Ok(())
}
