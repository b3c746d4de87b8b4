use super::*;

#[test]
fn checkbox_click_toggles_then_fires_input_and_change() -> Result<()> {
    let mut page = Page::from_html(r#"<div id="wrap"><input id="flag" type="checkbox"></div>"#)?;
    let log = record_events(&mut page, "#flag", "click")?;
    let input_log = record_events(&mut page, "#flag", "input")?;
    let change_log = record_events(&mut page, "#flag", "change")?;

    page.click("#flag")?;
    page.assert_checked("#flag", true)?;
    assert_eq!(*log.borrow(), ["click:flag"]);
    assert_eq!(*input_log.borrow(), ["input:flag"]);
    assert_eq!(*change_log.borrow(), ["change:flag"]);

    page.click("#flag")?;
    page.assert_checked("#flag", false)?;
    assert_eq!(change_log.borrow().len(), 2);
    Ok(())
}

#[test]
fn prevented_click_keeps_the_checkbox_state() -> Result<()> {
    let mut page = Page::from_html(r#"<input id="flag" type="checkbox">"#)?;
    let flag = page.select_one("#flag")?;
    page.add_listener(flag, "click", |_, event| {
        event.prevent_default();
        Ok(())
    });
    let change_log = record_events(&mut page, "#flag", "change")?;

    page.click("#flag")?;
    page.assert_checked("#flag", false)?;
    assert!(change_log.borrow().is_empty());
    Ok(())
}

#[test]
fn disabled_controls_ignore_user_input() -> Result<()> {
    let mut page = Page::from_html(
        r#"<button id="b" disabled>b</button><input id="c" type="checkbox" disabled><input id="t" disabled>"#,
    )?;
    let clicks = record_events(&mut page, "#b", "click")?;
    page.click("#b")?;
    page.click("#c")?;
    page.set_checked("#c", true)?;
    page.type_text("#t", "ignored")?;

    assert!(clicks.borrow().is_empty());
    page.assert_checked("#c", false)?;
    page.assert_value("#t", "")?;
    Ok(())
}

#[test]
fn radio_click_unchecks_the_rest_of_its_group() -> Result<()> {
    let mut page = Page::from_html(
        r#"
        <input id="r1" type="radio" name="size" value="s" checked>
        <input id="r2" type="radio" name="size" value="m">
        <input id="other" type="radio" name="color" value="red" checked>
        "#,
    )?;
    page.click("#r2")?;
    page.assert_checked("#r1", false)?;
    page.assert_checked("#r2", true)?;
    page.assert_checked("#other", true)?;

    let change_log = record_events(&mut page, "#r2", "change")?;
    page.click("#r2")?;
    assert!(change_log.borrow().is_empty());
    Ok(())
}

#[test]
fn set_checked_only_fires_on_a_real_change() -> Result<()> {
    let mut page = Page::from_html(r#"<input id="flag" type="checkbox" checked><div id="d"></div>"#)?;
    let change_log = record_events(&mut page, "#flag", "change")?;

    page.set_checked("#flag", true)?;
    assert!(change_log.borrow().is_empty());
    page.set_checked("#flag", false)?;
    assert_eq!(*change_log.borrow(), ["change:flag"]);

    assert!(matches!(
        page.set_checked("#d", true),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn type_text_fires_input_only() -> Result<()> {
    let mut page = Page::from_html(r#"<input id="q"><select id="s"><option>a</option></select>"#)?;
    let input_log = record_events(&mut page, "#q", "input")?;
    let change_log = record_events(&mut page, "#q", "change")?;

    page.type_text("#q", "hello")?;
    page.assert_value("#q", "hello")?;
    assert_eq!(*input_log.borrow(), ["input:q"]);
    assert!(change_log.borrow().is_empty());

    assert!(matches!(
        page.type_text("#s", "a"),
        Err(Error::TypeMismatch { .. })
    ));
    Ok(())
}

#[test]
fn select_value_fires_input_and_change() -> Result<()> {
    let mut page = Page::from_html(
        r#"<select id="s"><option value="a">A</option><option value="b">B</option></select>"#,
    )?;
    let change_log = record_events(&mut page, "#s", "change")?;
    page.select_value("#s", "b")?;
    page.assert_value("#s", "b")?;
    assert_eq!(*change_log.borrow(), ["change:s"]);
    Ok(())
}

#[test]
fn events_bubble_with_current_target_and_stop_when_asked() -> Result<()> {
    let mut page = Page::from_html(
        r#"<div id="outer"><div id="inner"><button id="btn">go</button></div></div>"#,
    )?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    for selector in ["#btn", "#inner", "#outer"] {
        let node = page.select_one(selector)?;
        let sink = Rc::clone(&seen);
        page.add_listener(node, "click", move |page, event| {
            let current = page.dom().attr(event.current_target, "id").unwrap_or_default();
            let target = page.dom().attr(event.target, "id").unwrap_or_default();
            sink.borrow_mut().push(format!("{current}<-{target}"));
            if current == "inner" {
                event.stop_propagation();
            }
            Ok(())
        });
    }

    page.click("#btn")?;
    assert_eq!(*seen.borrow(), ["btn<-btn", "inner<-btn"]);
    Ok(())
}

#[test]
fn listeners_added_during_dispatch_wait_for_the_next_event() -> Result<()> {
    let mut page = Page::from_html(r#"<button id="btn">go</button>"#)?;
    let btn = page.select_one("#btn")?;
    let hits = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&hits);
    page.add_listener(btn, "click", move |page, event| {
        *sink.borrow_mut() += 1;
        let inner = Rc::clone(&sink);
        page.add_listener(event.current_target, "click", move |_, _| {
            *inner.borrow_mut() += 100;
            Ok(())
        });
        Ok(())
    });

    page.click("#btn")?;
    assert_eq!(*hits.borrow(), 1);
    assert_eq!(page.listener_count(btn, "click"), 2);
    Ok(())
}

#[test]
fn listener_errors_propagate_to_the_caller() -> Result<()> {
    let mut page = Page::from_html(r#"<button id="btn">go</button>"#)?;
    let btn = page.select_one("#btn")?;
    page.add_listener(btn, "click", |_, _| Err(Error::Dom("boom".into())));
    assert_eq!(page.click("#btn"), Err(Error::Dom("boom".into())));
    Ok(())
}

#[test]
fn cloning_with_behavior_copies_listeners_to_every_copied_node() -> Result<()> {
    let mut page = Page::from_html(r#"<div id="row"><button id="btn">go</button></div><div id="dest"></div>"#)?;
    let clicks = record_events(&mut page, "#btn", "click")?;
    let row = page.select_one("#row")?;
    let dest = page.select_one("#dest")?;

    let clone = page.clone_with_behavior(row)?;
    page.dom_mut().append_child(dest, clone)?;
    page.click("#dest button")?;

    assert_eq!(*clicks.borrow(), ["click:btn"]);
    let cloned_button = page.select_one("#dest button")?;
    assert_eq!(page.listener_count(cloned_button, "click"), 1);
    Ok(())
}

#[test]
fn assertions_report_the_mismatch_with_a_snippet() -> Result<()> {
    let page = Page::from_html(r#"<p id="p" class="note">hello</p><input id="i" value="v">"#)?;
    page.assert_exists("#p")?;
    page.assert_count("p", 1)?;
    page.assert_text("#p", "hello")?;
    page.assert_value("#i", "v")?;
    page.assert_attr("#p", "class", Some("note"))?;
    page.assert_attr("#p", "title", None)?;
    page.assert_class("#p", "note", true)?;
    page.assert_class("#p", "hidden", false)?;

    match page.assert_text("#p", "bye") {
        Err(Error::AssertionFailed {
            expected,
            actual,
            dom_snippet,
            ..
        }) => {
            assert_eq!(expected, "bye");
            assert_eq!(actual, "hello");
            assert_eq!(dom_snippet, r#"<p class="note" id="p">hello</p>"#);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(matches!(
        page.assert_count("p", 2),
        Err(Error::AssertionFailed { .. })
    ));
    assert_eq!(
        page.assert_exists("#missing"),
        Err(Error::SelectorNotFound("#missing".into()))
    );
    Ok(())
}

#[test]
fn long_snippets_are_truncated() {
    assert_eq!(truncate_chars("abcdef", 3), "abc...");
    assert_eq!(truncate_chars("abc", 3), "abc");
    assert_eq!(truncate_chars("äöü", 2), "äö...");
}

#[test]
fn dump_dom_serialises_the_selected_subtree() -> Result<()> {
    let page = Page::from_html(r#"<ul id="l"><li>a</li><li>b</li></ul>"#)?;
    assert_eq!(page.dump_dom("#l")?, r#"<ul id="l"><li>a</li><li>b</li></ul>"#);
    Ok(())
}

#[test_log::test]
fn swap_fragment_replaces_content_and_binds_new_widgets() -> Result<()> {
    let handlers = HandlerSet::standard(&WidgetConventions::default())?;
    let mut page = Page::from_html(r#"<div id="mount"><p id="old">loading</p></div>"#)?;
    assert_eq!(page.activate_document(&handlers)?, 0);

    let bound = page.swap_fragment(
        "#mount",
        r#"
        <div id="group-level" data-widget="LevelAccess" data-name="level">
          <input type="hidden" name="level">
          <div>
            <a class="dropdown-toggle"><span class="icon-none"></span></a>
            <ul class="dropdown-menu">
              <li class="active"><a data-access="read"><span class="icon-eye"></span></a></li>
              <li><a data-access="write"><span class="icon-pen"></span></a></li>
            </ul>
          </div>
        </div>
        "#,
        &handlers,
    )?;

    assert_eq!(bound, 1);
    page.assert_count("#old", 0)?;
    let widget = page.select_one("#group-level")?;
    let write = page.select_one("[data-access=write]")?;
    assert!(page.is_bound("access-selector", widget));
    assert_eq!(page.listener_count(write, "click"), 1);
    page.assert_value("[name=level]", "read")?;
    page.click("[data-access=write]")?;
    page.assert_value("[name=level]", "write")?;

    assert_eq!(page.swap_fragment("#mount", "<p>empty</p>", &handlers)?, 0);
    page.assert_text("#mount", "empty")?;
    assert!(!page.is_bound("access-selector", widget));
    assert_eq!(page.listener_count(write, "click"), 0);
    Ok(())
}
