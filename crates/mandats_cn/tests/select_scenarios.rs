//! End-to-end select scenarios driven through a headless window

use std::cell::RefCell;
use std::rc::Rc;

use mandats_cn::prelude::*;
use mandats_cn::LIST_BOX_OFFSET;
use mandats_core::{KeyCode, Point, Size as Viewport};
use mandats_layout::{ElementGeometry, Placement, Window};

type Calls = Rc<RefCell<Vec<Option<i64>>>>;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("mandats_cn=debug")
        .with_test_writer()
        .try_init();
}

fn letters() -> Vec<LabeledOption<i64>> {
    vec![LabeledOption::new(1, "A"), LabeledOption::new(2, "B")]
}

fn recording(options: Vec<LabeledOption<i64>>) -> (SelectProps<LabeledOption<i64>>, Calls) {
    let calls: Calls = Rc::default();
    let sink = calls.clone();
    let props = SelectProps::simple(options)
        .label("Lettre")
        .placeholder("Choisir")
        .on_select(move |option| sink.borrow_mut().push(option.map(|o| o.value)));
    (props, calls)
}

fn window() -> Window {
    Window::new(Viewport::new(400.0, 600.0))
}

/// Apply pending input and bring the frame up to date
fn settle<T>(select: &mut SelectWidget, window: &mut Window, props: &SelectProps<T>) {
    select.flush(props).unwrap();
    select.mount(window, props).unwrap();
}

fn open_by_click<T>(select: &mut SelectWidget, window: &mut Window, props: &SelectProps<T>) {
    assert!(window.click(&select.part("button")));
    settle(select, window, props);
    assert!(select.is_open());
}

#[test]
fn click_option_calls_on_select_once() {
    init_logging();
    let (props, calls) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    assert!(!window.tree().unwrap().contains("letter-popup"));

    open_by_click(&mut select, &mut window, &props);
    assert_eq!(window.focused(), Some("letter-options"));

    assert!(window.click("letter-option-1"));
    settle(&mut select, &mut window, &props);

    assert_eq!(*calls.borrow(), vec![Some(2)]);
    assert!(!select.is_open());
    assert!(!window.tree().unwrap().contains("letter-popup"));
    assert_eq!(window.focused(), Some("letter-button"));
}

#[test]
fn selected_row_is_marked_and_another_can_be_chosen() {
    let (props, calls) = recording(letters());
    let props = props.selected(Some(LabeledOption::new(1, "A")));
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();

    let tree = window.tree().unwrap();
    assert_eq!(tree.text_content(tree.node_by_id("letter-value").unwrap()), "A");

    open_by_click(&mut select, &mut window, &props);
    let tree = window.tree().unwrap();
    let rows = tree.find_all(|n| n.attribute("role") == Some("option"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].attribute("aria-selected"), Some("true"));
    assert_eq!(rows[1].attribute("aria-selected"), Some("false"));
    assert_eq!(tree.text_content(tree.node_by_id("letter-option-0").unwrap()), "A✓");
    assert_eq!(select.active_index(), Some(0));

    assert!(window.click("letter-option-1"));
    settle(&mut select, &mut window, &props);
    assert_eq!(*calls.borrow(), vec![Some(2)]);
    assert!(!select.is_open());
}

#[test]
fn click_on_option_text_chooses_the_row() {
    let (props, calls) = recording(vec![
        LabeledOption::new(1, "Association Mendoise de Tir Sportif"),
        LabeledOption::new(2, "TAA"),
    ]);
    let mut window = window();
    let mut select = SelectWidget::new("org");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    // The row center lands on its anonymous label wrapper
    let tree = window.tree().unwrap();
    let row = tree.bounding_rect("org-option-0").unwrap();
    let center = Point::new(row.x() + row.width() / 2.0, row.y() + row.height() / 2.0);
    let hit = tree.hit_test(center).unwrap();
    assert_eq!(tree.element_id(hit), None);

    window.click_at(center);
    settle(&mut select, &mut window, &props);

    assert_eq!(*calls.borrow(), vec![Some(1)]);
    assert!(!select.is_open());
}

#[test]
fn disabling_an_open_select_drops_the_pending_choice() {
    let (props, calls) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    assert!(window.click("letter-option-1"));
    assert!(select.pending_intents() > 0);
    let disabled = props.clone().disabled(true);
    settle(&mut select, &mut window, &disabled);

    assert!(calls.borrow().is_empty());
    assert!(!select.is_open());
    assert!(!window.tree().unwrap().contains("letter-popup"));
}

#[test]
fn button_click_toggles_closed() {
    let (props, calls) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();

    open_by_click(&mut select, &mut window, &props);
    assert!(window.click("letter-button"));
    settle(&mut select, &mut window, &props);

    assert!(!select.is_open());
    assert!(calls.borrow().is_empty());
}

#[test]
fn selected_value_outside_options_is_rejected() {
    let (props, calls) = recording(letters());
    let props = props.selected(Some(LabeledOption::new(9, "Z")));
    let mut window = window();
    let mut select = SelectWidget::new("letter");

    let err = select.mount(&mut window, &props).unwrap_err();
    assert!(matches!(err, SelectError::InvalidSelection { .. }));
    assert_eq!(
        err.to_string(),
        "select `letter` contains a selected value `9` that is not in options"
    );
    assert!(window.tree().is_none());
    assert!(calls.borrow().is_empty());
}

#[test]
fn choice_missing_from_current_options_is_an_error() {
    let (props, calls) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    // Options shrink between the frame and the flush
    let shrunk = SelectProps {
        options: vec![LabeledOption::new(1, "A")],
        ..props.clone()
    };
    assert!(window.click("letter-option-1"));
    let err = select.flush(&shrunk).unwrap_err();

    assert!(matches!(
        err,
        SelectError::UnreachableLookup { ref key, .. } if *key == Key::Number(2)
    ));
    assert!(calls.borrow().is_empty());
}

#[test]
fn clear_does_not_open_the_list() {
    let (props, calls) = recording(letters());
    let props = props
        .selected(Some(LabeledOption::new(1, "A")))
        .clearable(true);
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    let tree = window.tree().unwrap();
    assert_eq!(tree.text_content(tree.node_by_id("letter-value").unwrap()), "A");

    assert!(window.click("letter-clear"));
    settle(&mut select, &mut window, &props);

    assert_eq!(*calls.borrow(), vec![None]);
    assert!(!select.is_open());
    assert!(!window.tree().unwrap().contains("letter-popup"));
}

#[test]
fn clear_is_hidden_when_disabled_or_empty() {
    let (props, _) = recording(letters());
    let mut select = SelectWidget::new("letter");

    let root = select.render(&props.clone().clearable(true)).unwrap();
    assert!(root.find("letter-clear").is_none());

    let disabled = props
        .selected(Some(LabeledOption::new(1, "A")))
        .clearable(true)
        .disabled(true);
    let root = select.render(&disabled).unwrap();
    assert!(root.find("letter-clear").is_none());
}

#[test]
fn empty_options_show_hint_and_choose_nothing() {
    let (props, calls) = recording(Vec::new());
    let props = props.empty_hint("Aucune organisation");
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    let tree = window.tree().unwrap();
    let empty = tree.node_by_id("letter-empty").unwrap();
    assert_eq!(tree.text_content(empty), "Aucune organisation");
    assert_eq!(select.active_index(), None);

    window.key_down(KeyCode::Enter);
    settle(&mut select, &mut window, &props);
    assert!(calls.borrow().is_empty());
}

#[test]
fn disabled_select_never_opens() {
    let (props, calls) = recording(letters());
    let props = props.disabled(true);
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();

    assert!(window.click("letter-button"));
    assert!(!select.flush(&props).unwrap());
    select.mount(&mut window, &props).unwrap();

    assert!(!select.is_open());
    assert!(!window.tree().unwrap().contains("letter-popup"));
    assert_eq!(window.focused(), None);
    assert!(calls.borrow().is_empty());
}

#[test]
fn popup_matches_reference_width_and_sits_below() {
    let (props, _) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    let tree = window.tree().unwrap();
    let reference = tree.bounding_rect("letter-reference").unwrap();
    let popup = tree.bounding_rect("letter-popup").unwrap();
    assert_eq!(popup.x(), reference.x().round());
    assert_eq!(popup.y(), (reference.bottom() + LIST_BOX_OFFSET).round());
    assert_eq!(popup.width(), reference.width().round());
    let list = tree.bounding_rect("letter-options").unwrap();
    assert_eq!(list.width(), popup.width());
    assert!(!tree.find("letter-popup").unwrap().props.invisible);
    assert_eq!(
        tree.find("letter-popup")
            .and_then(|n| n.attribute("data-popper-placement")),
        Some(Placement::BottomStart.as_str())
    );

    // Still the reference width after a resize
    window.resize(Viewport::new(300.0, 600.0)).unwrap();
    select.mount(&mut window, &props).unwrap();
    let tree = window.tree().unwrap();
    let reference = tree.bounding_rect("letter-reference").unwrap();
    let popup = tree.bounding_rect("letter-popup").unwrap();
    assert_eq!(reference.width(), 300.0);
    assert_eq!(popup.width(), 300.0);
    assert_eq!(tree.bounding_rect("letter-options").unwrap().width(), 300.0);
}

#[test]
fn popup_follows_scroll() {
    let (props, _) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);
    let before = window.tree().unwrap().bounding_rect("letter-popup").unwrap();

    window.scroll_to(Point::new(0.0, 10.0)).unwrap();
    // Fixed layer does not move on its own
    assert_eq!(
        window.tree().unwrap().bounding_rect("letter-popup"),
        Some(before)
    );

    select.mount(&mut window, &props).unwrap();
    let tree = window.tree().unwrap();
    let reference = tree.bounding_rect("letter-reference").unwrap();
    let after = tree.bounding_rect("letter-popup").unwrap();
    assert_eq!(after.y(), before.y() - 10.0);
    assert_eq!(after.y(), (reference.bottom() + LIST_BOX_OFFSET).round());
}

#[test]
fn fluid_list_aligned_to_end() {
    let (props, _) = recording(letters());
    let props = props
        .fluid_list_box(true)
        .list_box_placement(ListBoxPlacement::End);
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    let style = select.popper().and_then(|p| p.style()).copied().unwrap();
    assert_eq!(style.width, None);

    let tree = window.tree().unwrap();
    let reference = tree.bounding_rect("letter-reference").unwrap();
    let popup = tree.bounding_rect("letter-popup").unwrap();
    assert!(popup.width() < reference.width());
    assert!((popup.right() - reference.right()).abs() <= 1.0);
}

#[test]
fn keyboard_navigation_and_choice() {
    let (props, calls) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();

    assert!(window.focus("letter-button"));
    window.key_down(KeyCode::ArrowDown);
    settle(&mut select, &mut window, &props);
    assert!(select.is_open());
    assert_eq!(select.active_index(), Some(0));
    assert_eq!(window.focused(), Some("letter-options"));

    window.key_down(KeyCode::ArrowDown);
    window.key_down(KeyCode::ArrowDown);
    settle(&mut select, &mut window, &props);
    assert_eq!(select.active_index(), Some(1));
    let options = window.tree().unwrap().find("letter-options").unwrap();
    assert_eq!(options.attribute("aria-activedescendant"), Some("letter-option-1"));

    window.key_down(KeyCode::Home);
    window.key_down(KeyCode::End);
    window.key_down(KeyCode::Enter);
    settle(&mut select, &mut window, &props);

    assert_eq!(*calls.borrow(), vec![Some(2)]);
    assert!(!select.is_open());
    assert_eq!(window.focused(), Some("letter-button"));
}

#[test]
fn escape_closes_and_returns_focus() {
    let (props, calls) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    window.key_down(KeyCode::Escape);
    settle(&mut select, &mut window, &props);

    assert!(!select.is_open());
    assert_eq!(window.focused(), Some("letter-button"));
    assert!(calls.borrow().is_empty());
}

#[test]
fn tab_out_closes_without_choosing() {
    let (props, calls) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    window.key_down(KeyCode::Tab);
    settle(&mut select, &mut window, &props);

    assert!(!select.is_open());
    assert!(calls.borrow().is_empty());
}

#[test]
fn hover_moves_the_highlight() {
    let (props, _) = recording(letters());
    let props = props.highlight_class_name("bg-warning-500");
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);

    assert!(window.hover("letter-option-1"));
    settle(&mut select, &mut window, &props);

    let tree = window.tree().unwrap();
    assert_eq!(select.active_index(), Some(1));
    assert!(tree.find("letter-option-1").unwrap().has_class("bg-warning-500"));
    assert!(!tree.find("letter-option-0").unwrap().has_class("bg-warning-500"));
}

#[test]
fn unmount_detaches_listener() {
    let (props, _) = recording(letters());
    let mut window = window();
    let mut select = SelectWidget::new("letter");
    select.mount(&mut window, &props).unwrap();
    open_by_click(&mut select, &mut window, &props);
    assert_eq!(window.listener_count(), 1);

    select.unmount(&mut window);
    assert_eq!(window.listener_count(), 0);
    assert!(!select.is_open());
    assert!(select.popper().and_then(|p| p.state()).is_none());
}
