//! Select component for single-value selection
//!
//! A labelled button showing the current value, opening a floating list of
//! options anchored under it. The caller owns the options and the selected
//! value; the widget only reports choices through `on_select` and never keeps
//! a copy of the selection.
//!
//! ```text
//! render(props) ──► Div tree ──► Window (layout, input)
//!      ▲                              │ handlers queue intents
//!      │                              ▼
//!  caller state ◄── on_select ◄── flush(props)
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use mandats_cn::prelude::*;
//! use mandats_core::Size;
//! use mandats_layout::Window;
//!
//! let chosen = Rc::new(RefCell::new(None));
//! let sink = chosen.clone();
//! let props = SelectProps::simple(vec!["Validée", "Reportée"])
//!     .label("Statut")
//!     .placeholder("Choisir")
//!     .on_select(move |option| *sink.borrow_mut() = option.copied());
//!
//! let mut window = Window::new(Size::new(320.0, 480.0));
//! let mut select = SelectWidget::new("status");
//! select.mount(&mut window, &props).unwrap();
//!
//! window.click("status-button");
//! select.flush(&props).unwrap();
//! select.mount(&mut window, &props).unwrap();
//! assert!(window.tree().unwrap().contains("status-options"));
//!
//! window.click("status-option-1");
//! select.flush(&props).unwrap();
//! assert_eq!(*chosen.borrow(), Some("Reportée"));
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use mandats_core::KeyCode;
use mandats_layout::prelude::*;
use mandats_theme::{ColorToken, RadiusToken, Size, ThemeState, TypographyTokens};
use serde::{Deserialize, Serialize};

use super::help::Help;
use super::label::label;
use super::listbox::{listbox_events, FocusRequest, Listbox, Navigation};
use super::option::{Key, OptionAccessor, SimpleSelectOption};
use crate::error::{Result, SelectError};

/// Classes applied to the active row unless overridden
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "text-white bg-primary-600";
/// Hint shown when there are no options unless overridden
pub const DEFAULT_EMPTY_HINT: &str = "No options available";
/// Gap between the button and the option list
pub const LIST_BOX_OFFSET: f32 = 5.0;

const MAX_LAYOUT_PASSES: usize = 5;

/// Element id suffixes: the element `part` of select `key` is `{key}-{part}`
pub mod parts {
    pub const LABEL_ROW: &str = "label-row";
    pub const LABEL: &str = "label";
    pub const CORNER: &str = "corner";
    pub const FIELD: &str = "field";
    pub const REFERENCE: &str = "reference";
    pub const BUTTON: &str = "button";
    pub const VALUE: &str = "value";
    pub const PLACEHOLDER: &str = "placeholder";
    pub const CLEAR: &str = "clear";
    pub const POPUP: &str = "popup";
    pub const OPTIONS: &str = "options";
    pub const EMPTY: &str = "empty";
}

/// Horizontal alignment of the option list under the button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListBoxPlacement {
    #[default]
    Start,
    End,
}

impl ListBoxPlacement {
    pub fn placement(&self) -> Placement {
        match self {
            ListBoxPlacement::Start => Placement::BottomStart,
            ListBoxPlacement::End => Placement::BottomEnd,
        }
    }
}

// =============================================================================
// Size presets
// =============================================================================

/// Padding (4px units) and text presets shared by the button and the rows
#[derive(Clone, Copy, Debug, PartialEq)]
struct SizePreset {
    py: f32,
    pl: f32,
    pr: f32,
    list_box_and_button: &'static str,
    button: &'static str,
}

impl SizePreset {
    fn for_size(size: Size) -> Self {
        match size {
            Size::XSmall => SizePreset {
                py: 1.5,
                pl: 2.0,
                pr: 8.0,
                list_box_and_button: "py-1.5 text-sm sm:text-xs",
                button: "pl-2 pr-8",
            },
            Size::Small => SizePreset {
                py: 2.0,
                pl: 2.0,
                pr: 8.0,
                list_box_and_button: "py-2 sm:text-sm",
                button: "pl-2 pr-8",
            },
            Size::Medium => SizePreset {
                py: 2.0,
                pl: 3.0,
                pr: 9.0,
                list_box_and_button: "py-2 sm:text-sm",
                button: "pl-3 pr-9",
            },
            Size::Large => SizePreset {
                py: 2.0,
                pl: 3.0,
                pr: 9.0,
                list_box_and_button: "py-2 text-base",
                button: "pl-3 pr-9",
            },
            Size::XLarge => SizePreset {
                py: 3.0,
                pl: 5.0,
                pr: 11.0,
                list_box_and_button: "py-3 text-base",
                button: "pl-5 pr-11",
            },
        }
    }
}

fn font_size(size: Size, typography: &TypographyTokens) -> f32 {
    match size {
        Size::XSmall => typography.text_xs,
        Size::Small | Size::Medium => typography.text_sm,
        Size::Large | Size::XLarge => typography.text_base,
    }
}

// =============================================================================
// Props
// =============================================================================

/// Callback receiving the chosen option, or `None` when cleared
pub type OnSelect<T> = Rc<dyn Fn(Option<&T>)>;

/// Everything the caller controls about a select
pub struct SelectProps<T> {
    /// Options in display order; keys must be unique
    pub options: Vec<T>,
    /// Must be one of `options` (by key) when present
    pub selected: Option<T>,
    pub on_select: Option<OnSelect<T>>,
    pub accessor: OptionAccessor<T>,
    pub label: Option<String>,
    pub hidden_label: bool,
    pub help: Option<String>,
    pub error: Option<String>,
    pub placeholder: String,
    pub required: bool,
    pub clearable: bool,
    pub disabled: bool,
    /// Classes for the outermost element
    pub class_name: Option<String>,
    pub highlight_class_name: String,
    /// Rendered on the label row, right side
    pub corner: Option<Div>,
    pub empty_hint: String,
    pub size: Size,
    /// Let the option list size to its content instead of the button width
    pub fluid_list_box: bool,
    pub list_box_placement: ListBoxPlacement,
    /// Fixed width in pixels; full width otherwise
    pub width: Option<f32>,
}

impl<T: Clone> Clone for SelectProps<T> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
            selected: self.selected.clone(),
            on_select: self.on_select.clone(),
            accessor: self.accessor.clone(),
            label: self.label.clone(),
            hidden_label: self.hidden_label,
            help: self.help.clone(),
            error: self.error.clone(),
            placeholder: self.placeholder.clone(),
            required: self.required,
            clearable: self.clearable,
            disabled: self.disabled,
            class_name: self.class_name.clone(),
            highlight_class_name: self.highlight_class_name.clone(),
            corner: self.corner.clone(),
            empty_hint: self.empty_hint.clone(),
            size: self.size,
            fluid_list_box: self.fluid_list_box,
            list_box_placement: self.list_box_placement,
            width: self.width,
        }
    }
}

impl<T> SelectProps<T> {
    pub fn new(options: Vec<T>, accessor: OptionAccessor<T>) -> Self {
        Self {
            options,
            selected: None,
            on_select: None,
            accessor,
            label: None,
            hidden_label: false,
            help: None,
            error: None,
            placeholder: String::new(),
            required: false,
            clearable: false,
            disabled: false,
            class_name: None,
            highlight_class_name: DEFAULT_HIGHLIGHT_CLASS.to_string(),
            corner: None,
            empty_hint: DEFAULT_EMPTY_HINT.to_string(),
            size: Size::default(),
            fluid_list_box: false,
            list_box_placement: ListBoxPlacement::default(),
            width: None,
        }
    }

    pub fn selected(mut self, selected: Option<T>) -> Self {
        self.selected = selected;
        self
    }

    pub fn on_select<F>(mut self, on_select: F) -> Self
    where
        F: Fn(Option<&T>) + 'static,
    {
        self.on_select = Some(Rc::new(on_select));
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn hidden_label(mut self, hidden: bool) -> Self {
        self.hidden_label = hidden;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn clearable(mut self, clearable: bool) -> Self {
        self.clearable = clearable;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn highlight_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.highlight_class_name = class_name.into();
        self
    }

    pub fn corner(mut self, corner: Div) -> Self {
        self.corner = Some(corner);
        self
    }

    pub fn empty_hint(mut self, hint: impl Into<String>) -> Self {
        self.empty_hint = hint.into();
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn fluid_list_box(mut self, fluid: bool) -> Self {
        self.fluid_list_box = fluid;
        self
    }

    pub fn list_box_placement(mut self, placement: ListBoxPlacement) -> Self {
        self.list_box_placement = placement;
        self
    }

    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Index of the selected option, if it is present in `options`
    pub fn selected_index(&self) -> Option<usize> {
        let key = self.accessor.value(self.selected.as_ref()?);
        self.position(&key)
    }

    fn position(&self, key: &Key) -> Option<usize> {
        self.options
            .iter()
            .position(|option| self.accessor.value(option) == *key)
    }
}

impl<T: SimpleSelectOption + 'static> SelectProps<T> {
    /// Props for plain option values using the default accessor
    pub fn simple(options: Vec<T>) -> Self {
        Self::new(options, OptionAccessor::default())
    }
}

/// Create props for plain option values
pub fn select<T: SimpleSelectOption + 'static>(options: Vec<T>) -> SelectProps<T> {
    SelectProps::simple(options)
}

// =============================================================================
// Intents
// =============================================================================

/// User intent recorded by element handlers, applied by `SelectWidget::flush`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectIntent {
    Toggle,
    Open,
    Close { restore_focus: bool },
    Escape,
    Blur,
    Choose(Key),
    ChooseActive,
    Navigate(Navigation),
    Hover(usize),
    Clear,
}

type IntentQueue = Rc<RefCell<VecDeque<SelectIntent>>>;

fn enqueue(queue: &IntentQueue, intent: SelectIntent) {
    tracing::trace!(?intent, "select intent queued");
    queue.borrow_mut().push_back(intent);
}

// =============================================================================
// SelectWidget
// =============================================================================

/// Stateful select instance
///
/// Holds only interaction state (open/closed, active row, focus hand-off)
/// and the popper anchoring the list. Create one per select and keep it
/// across renders.
pub struct SelectWidget {
    key: String,
    listbox: Listbox,
    /// Created on first render from the props of that render
    popper: Option<Popper>,
    intents: IntentQueue,
    /// Set by the window listener on scroll and resize
    window_dirty: Rc<Cell<bool>>,
}

impl SelectWidget {
    /// `key` prefixes every element id of the widget
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            listbox: Listbox::new(),
            popper: None,
            intents: Rc::new(RefCell::new(VecDeque::new())),
            window_dirty: Rc::new(Cell::new(false)),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Element id of a widget part (see [`parts`])
    pub fn part(&self, part: &str) -> String {
        format!("{}-{}", self.key, part)
    }

    /// Element id of the option row at `index`
    pub fn option_id(&self, index: usize) -> String {
        format!("{}-option-{}", self.key, index)
    }

    pub fn is_open(&self) -> bool {
        self.listbox.is_open()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.listbox.active()
    }

    pub fn popper(&self) -> Option<&Popper> {
        self.popper.as_ref()
    }

    pub fn pending_intents(&self) -> usize {
        self.intents.borrow().len()
    }

    /// Queue an intent as if it came from the rendered elements
    pub fn queue(&self, intent: SelectIntent) {
        enqueue(&self.intents, intent);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Build the element tree for `props`
    ///
    /// Fails with `InvalidSelection` before building anything when the
    /// selected value is not among the options.
    pub fn render<T>(&mut self, props: &SelectProps<T>) -> Result<Div> {
        let selected_index = self.validate(props)?;

        if props.disabled && self.listbox.force_close() {
            tracing::debug!(select = %self.key, "select disabled while open, closing");
        }

        self.popper.get_or_insert_with(|| {
            Popper::new(
                PositioningConfig::new(props.list_box_placement.placement())
                    .offset(LIST_BOX_OFFSET)
                    .same_width(!props.fluid_list_box),
            )
        });

        let mut root = div().id(&self.key).flex_col().gap_px(4.0);
        root = match props.width {
            Some(width) => root.w(width),
            None => root.w_full(),
        };
        if let Some(class_name) = &props.class_name {
            root = root.class(class_name);
        }

        let help = Help::new(&self.key)
            .error(props.error.as_deref())
            .help(props.help.as_deref())
            .build();

        Ok(root
            .child_opt(self.render_label_row(props))
            .child(self.render_field(props, selected_index))
            .child_opt(help))
    }

    fn validate<T>(&self, props: &SelectProps<T>) -> Result<Option<usize>> {
        let Some(selected) = props.selected.as_ref() else {
            return Ok(None);
        };
        let key = props.accessor.value(selected);
        match props.position(&key) {
            Some(index) => Ok(Some(index)),
            None => {
                tracing::error!(select = %self.key, %key, "selected value is not in options");
                Err(SelectError::InvalidSelection {
                    widget: self.key.clone(),
                    key,
                })
            }
        }
    }

    fn render_label_row<T>(&self, props: &SelectProps<T>) -> Option<Div> {
        if props.label.is_none() && props.corner.is_none() {
            return None;
        }

        let mut row = div()
            .id(self.part(parts::LABEL_ROW))
            .flex_row()
            .items_baseline()
            .justify_between()
            .gap(2.0);
        // Cancel the gap above the control when nothing is visible
        if props.hidden_label && props.corner.is_none() {
            row = row.mb_px(-4.0);
        }

        if let Some(text) = &props.label {
            row = row.child(
                label(text)
                    .id(self.part(parts::LABEL))
                    .required(props.required)
                    .disabled(props.disabled)
                    .hidden(props.hidden_label)
                    .build(),
            );
        }
        if let Some(corner) = &props.corner {
            row = row.child(
                div()
                    .id(self.part(parts::CORNER))
                    .class("text-sm")
                    .child(corner.clone()),
            );
        }
        Some(row)
    }

    fn render_field<T>(&self, props: &SelectProps<T>, selected_index: Option<usize>) -> Div {
        let reference = div()
            .id(self.part(parts::REFERENCE))
            .class("inline-block w-full rounded-md shadow-sm")
            .w_full()
            .rounded(ThemeState::get().radius(RadiusToken::Md))
            .child(self.render_button(props));

        let field = div()
            .id(self.part(parts::FIELD))
            .class("relative")
            .relative()
            .flex_col()
            .child(reference);

        if !props.disabled && self.listbox.is_open() {
            field.child(self.render_popup(props, selected_index))
        } else {
            field
        }
    }

    fn render_button<T>(&self, props: &SelectProps<T>) -> Div {
        let theme = ThemeState::get();
        let preset = SizePreset::for_size(props.size);
        let font_size = font_size(props.size, &theme.typography());
        let has_error = props.error.is_some();
        let open = self.listbox.is_open() && !props.disabled;

        let mut labelled_by = Vec::with_capacity(2);
        if props.label.is_some() {
            labelled_by.push(self.part(parts::LABEL));
        }
        labelled_by.push(self.part(parts::BUTTON));

        let (border_class, border_color) = if has_error {
            ("border-danger-300", theme.color(ColorToken::Danger300))
        } else {
            ("border-neutral-300", theme.color(ColorToken::Neutral300))
        };

        let mut button = div()
            .id(self.part(parts::BUTTON))
            .class("relative w-full cursor-default rounded-md border bg-white text-left shadow-sm")
            .class(preset.button)
            .class(preset.list_box_and_button)
            .class(border_class)
            .relative()
            .w_full()
            .flex_row()
            .items_center()
            .pl(preset.pl)
            .pr(preset.pr)
            .py(preset.py)
            .bg(theme.color(ColorToken::Surface))
            .border(1.0, border_color)
            .rounded(theme.radius(RadiusToken::Md))
            .attr("role", "button")
            .attr("aria-haspopup", "listbox")
            .attr("aria-expanded", open.to_string())
            .attr("aria-labelledby", labelled_by.join(" "));

        if props.disabled {
            button = button
                .attr("aria-disabled", "true")
                .cursor(CursorStyle::NotAllowed);
        } else {
            button = button
                .focusable()
                .auto_focus(self.listbox.focus_request() == Some(FocusRequest::Button));
        }

        // Current value or placeholder
        let value = div()
            .id(self.part(parts::VALUE))
            .class("block truncate")
            .flex_1()
            .flex_row()
            .items_center();
        let value = match props.selected.as_ref() {
            Some(selected) => value.child(props.accessor.render_selected(selected)),
            None => {
                let (class, color) = if has_error {
                    ("text-danger-300", theme.color(ColorToken::Danger300))
                } else {
                    ("text-neutral-400", theme.color(ColorToken::Neutral400))
                };
                value.child(
                    div().id(self.part(parts::PLACEHOLDER)).class(class).child(
                        text(format!("{}\u{a0}", props.placeholder))
                            .font_size(font_size)
                            .color(color),
                    ),
                )
            }
        };
        button = button.child(value);

        if !props.disabled && props.clearable && props.selected.is_some() {
            let intents = Rc::clone(&self.intents);
            button = button.child(
                div()
                    .id(self.part(parts::CLEAR))
                    .class("absolute inset-y-0 right-6 mr-2 flex cursor-pointer items-center")
                    .attr("aria-label", "Clear")
                    .absolute()
                    .top(0.0)
                    .bottom(0.0)
                    .right(32.0)
                    .flex_row()
                    .items_center()
                    .cursor_pointer()
                    .child(
                        text("×")
                            .font_size(theme.typography().text_base)
                            .color(theme.color(ColorToken::Neutral400)),
                    )
                    .on_click(move |ctx| {
                        // The button must not toggle
                        ctx.stop_propagation();
                        enqueue(&intents, SelectIntent::Clear);
                    }),
            );
        }

        // Up/down chevron
        button = button.child(
            div()
                .class("pointer-events-none absolute inset-y-0 right-0 flex items-center pr-1")
                .absolute()
                .top(0.0)
                .bottom(0.0)
                .right(0.0)
                .flex_row()
                .items_center()
                .pr(1.0)
                .child(
                    text("↕")
                        .font_size(theme.typography().text_base)
                        .color(theme.color(ColorToken::Neutral400)),
                ),
        );

        if props.disabled {
            return button;
        }

        let click_intents = Rc::clone(&self.intents);
        let key_intents = Rc::clone(&self.intents);
        button
            .on_click(move |_| enqueue(&click_intents, SelectIntent::Toggle))
            .on_key_down(move |ctx| {
                if matches!(
                    ctx.key,
                    Some(KeyCode::ArrowDown | KeyCode::ArrowUp | KeyCode::Enter | KeyCode::Space)
                ) {
                    ctx.prevent_default();
                    enqueue(&key_intents, SelectIntent::Open);
                }
            })
    }

    fn render_popup<T>(&self, props: &SelectProps<T>, selected_index: Option<usize>) -> Div {
        let theme = ThemeState::get();
        let preset = SizePreset::for_size(props.size);
        let font_size = font_size(props.size, &theme.typography());
        let active = self.listbox.active();

        let labelled_by = if props.label.is_some() {
            self.part(parts::LABEL)
        } else {
            self.part(parts::BUTTON)
        };

        let mut list = div()
            .id(self.part(parts::OPTIONS))
            .class("max-h-60 overflow-auto rounded-md bg-white py-1 text-base ring-1 ring-black ring-opacity-5 focus:outline-none sm:text-sm")
            .flex_col()
            .max_h(240.0)
            .py(1.0)
            .bg(theme.color(ColorToken::Surface))
            .border(1.0, theme.color(ColorToken::Neutral300))
            .rounded(theme.radius(RadiusToken::Md))
            .attr("role", "listbox")
            .attr("aria-labelledby", labelled_by)
            .focusable()
            .auto_focus(self.listbox.focus_request() == Some(FocusRequest::Options))
            .on_key_down(self.list_key_handler())
            .on_blur(self.list_blur_handler());
        if let Some(index) = active {
            list = list.attr("aria-activedescendant", self.option_id(index));
        }

        if props.options.is_empty() {
            list = list.child(
                div()
                    .id(self.part(parts::EMPTY))
                    .class("relative cursor-default select-none pl-8 pr-4")
                    .class(preset.list_box_and_button)
                    .pl(8.0)
                    .pr(4.0)
                    .py(preset.py)
                    .child(
                        div().class("block truncate font-normal text-neutral-500").child(
                            text(&props.empty_hint)
                                .font_size(font_size)
                                .color(theme.color(ColorToken::Neutral500)),
                        ),
                    ),
            );
        }

        for (index, option) in props.options.iter().enumerate() {
            list = list.child(self.render_option(
                props,
                index,
                option,
                selected_index == Some(index),
                active == Some(index),
            ));
        }

        let popup = div()
            .id(self.part(parts::POPUP))
            .class("absolute z-20 rounded-md shadow-lg")
            .flex_col()
            .shadow_lg()
            .rounded(theme.radius(RadiusToken::Md))
            .child(list);

        // Hidden until the popper has measured the elements once
        match self.popper.as_ref().and_then(|popper| popper.state()) {
            Some(state) => state.style.apply(popup.attrs(&state.attributes)),
            None => popup.fixed_at(0.0, 0.0).invisible(),
        }
    }

    fn render_option<T>(
        &self,
        props: &SelectProps<T>,
        index: usize,
        option: &T,
        is_selected: bool,
        is_active: bool,
    ) -> Div {
        let theme = ThemeState::get();
        let preset = SizePreset::for_size(props.size);
        let key = props.accessor.value(option);

        let mut row = div()
            .id(self.option_id(index))
            .attr("role", "option")
            .attr("aria-selected", is_selected.to_string())
            .attr("data-value", key.to_string())
            .class(if is_active {
                props.highlight_class_name.as_str()
            } else {
                "text-neutral-900"
            })
            .class(preset.list_box_and_button)
            .class("relative cursor-default select-none pl-8 pr-4")
            .relative()
            .flex_row()
            .items_center()
            .flex_shrink_0()
            .pl(8.0)
            .pr(4.0)
            .py(preset.py);
        if is_active {
            row = row.bg(theme.color(ColorToken::Primary600));
        }

        row = row.child(
            div()
                .class(if is_selected { "font-semibold" } else { "font-normal" })
                .class("block truncate")
                .child(props.accessor.render(option)),
        );

        if is_selected {
            let (class, color) = if is_active {
                ("text-white", theme.color(ColorToken::TextInverse))
            } else {
                ("text-primary-600", theme.color(ColorToken::Primary600))
            };
            row = row.child(
                div()
                    .class(class)
                    .class("absolute inset-y-0 left-0 flex items-center pl-1.5")
                    .absolute()
                    .top(0.0)
                    .bottom(0.0)
                    .left(0.0)
                    .flex_row()
                    .items_center()
                    .pl(1.5)
                    .child(
                        text("✓")
                            .font_size(theme.typography().text_base)
                            .color(color),
                    ),
            );
        }

        let click_intents = Rc::clone(&self.intents);
        let hover_intents = Rc::clone(&self.intents);
        row.on_click(move |_| enqueue(&click_intents, SelectIntent::Choose(key.clone())))
            .on_hover_enter(move |_| enqueue(&hover_intents, SelectIntent::Hover(index)))
    }

    fn list_key_handler(&self) -> impl Fn(&EventContext) + 'static {
        let intents = Rc::clone(&self.intents);
        move |ctx: &EventContext| {
            let intent = match ctx.key {
                Some(KeyCode::ArrowDown) => SelectIntent::Navigate(Navigation::Down),
                Some(KeyCode::ArrowUp) => SelectIntent::Navigate(Navigation::Up),
                Some(KeyCode::Home) => SelectIntent::Navigate(Navigation::Home),
                Some(KeyCode::End) => SelectIntent::Navigate(Navigation::End),
                Some(KeyCode::Enter | KeyCode::Space) => SelectIntent::ChooseActive,
                Some(KeyCode::Escape) => SelectIntent::Escape,
                Some(KeyCode::Tab) => {
                    // Focus traversal still happens
                    enqueue(&intents, SelectIntent::Close { restore_focus: false });
                    return;
                }
                _ => return,
            };
            ctx.prevent_default();
            ctx.stop_propagation();
            enqueue(&intents, intent);
        }
    }

    fn list_blur_handler(&self) -> impl Fn(&EventContext) + 'static {
        let intents = Rc::clone(&self.intents);
        let button_id = self.part(parts::BUTTON);
        move |ctx: &EventContext| {
            // Pressing the button toggles on its own
            if ctx.related_target.as_deref() == Some(button_id.as_str()) {
                return;
            }
            enqueue(&intents, SelectIntent::Blur);
        }
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Apply queued intents against the current props
    ///
    /// Calls `on_select` at most once per choice or clear. Returns true when
    /// the widget needs to be rendered again. A disabled select closes and
    /// drops everything queued.
    pub fn flush<T>(&mut self, props: &SelectProps<T>) -> Result<bool> {
        let pending: Vec<SelectIntent> = self.intents.borrow_mut().drain(..).collect();
        if props.disabled {
            if !pending.is_empty() {
                tracing::debug!(
                    select = %self.key,
                    dropped = pending.len(),
                    "select disabled, intents ignored"
                );
            }
            return Ok(self.listbox.force_close());
        }
        let mut changed = false;
        for intent in pending {
            changed |= self.apply(intent, props)?;
        }
        Ok(changed)
    }

    fn apply<T>(&mut self, intent: SelectIntent, props: &SelectProps<T>) -> Result<bool> {
        let count = props.options.len();
        let changed = match intent {
            SelectIntent::Toggle => self.listbox.toggle(count, props.selected_index()),
            SelectIntent::Open => self.listbox.open(count, props.selected_index()),
            SelectIntent::Close { restore_focus } => {
                self.listbox.close(listbox_events::CLOSE, restore_focus)
            }
            SelectIntent::Escape => self.listbox.close(listbox_events::ESCAPE, true),
            SelectIntent::Blur => self.listbox.close(listbox_events::BLUR, false),
            SelectIntent::Choose(key) => self.choose(props, key)?,
            SelectIntent::ChooseActive => {
                match self.listbox.active().and_then(|i| props.options.get(i)) {
                    Some(option) => {
                        let key = props.accessor.value(option);
                        self.choose(props, key)?
                    }
                    None => false,
                }
            }
            SelectIntent::Navigate(navigation) => self.listbox.navigate(navigation, count),
            SelectIntent::Hover(index) => self.listbox.set_active(index, count),
            SelectIntent::Clear => self.clear(props),
        };
        Ok(changed)
    }

    fn choose<T>(&mut self, props: &SelectProps<T>, key: Key) -> Result<bool> {
        let Some(index) = props.position(&key) else {
            tracing::error!(select = %self.key, %key, "chosen option is not in options");
            return Err(SelectError::UnreachableLookup {
                widget: self.key.clone(),
                key,
            });
        };
        tracing::debug!(select = %self.key, %key, "option chosen");
        if let (Some(on_select), Some(option)) = (&props.on_select, props.options.get(index)) {
            on_select(Some(option));
        }
        self.listbox.close(listbox_events::SELECT, true);
        Ok(true)
    }

    fn clear<T>(&mut self, props: &SelectProps<T>) -> bool {
        if !props.clearable || props.selected.is_none() {
            tracing::warn!(select = %self.key, "clear ignored");
            return false;
        }
        tracing::debug!(select = %self.key, "selection cleared");
        if let Some(on_select) = &props.on_select {
            on_select(None);
        }
        self.listbox.close(listbox_events::CLOSE, false);
        true
    }

    // =========================================================================
    // Host integration
    // =========================================================================

    /// Scroll or resize notification from the host window
    pub fn on_window_event(&mut self, event: &WindowEvent) {
        if let (true, Some(popper)) = (self.listbox.is_open(), self.popper.as_ref()) {
            tracing::trace!(select = %self.key, ?event, "window changed, repositioning");
            popper.invalidate();
        }
    }

    fn listener_key(&self) -> String {
        format!("select:{}", self.key)
    }

    /// Register the scroll/resize listener on `window`
    pub fn attach(&self, window: &mut Window) {
        let dirty = Rc::clone(&self.window_dirty);
        window.on_window_event(
            self.listener_key(),
            Rc::new(move |_: &WindowEvent| dirty.set(true)),
        );
    }

    /// Post-layout pass: position the popup and hand focus over
    ///
    /// Returns true when another render is needed for the frame to settle.
    pub fn after_layout(&mut self, tree: &RenderTree) -> bool {
        let reference_id = self.part(parts::REFERENCE);
        let popup_id = self.part(parts::POPUP);
        let open = self.listbox.is_open();

        let mut needs_render = false;
        if let Some(popper) = self.popper.as_mut() {
            if self.window_dirty.replace(false) {
                popper.invalidate();
            }
            popper.set_reference_element(open.then_some(reference_id));
            popper.set_popup_element((open && tree.contains(&popup_id)).then_some(popup_id));
            needs_render = popper.update(tree);
        }

        if let Some(request) = self.listbox.focus_request() {
            let target = match request {
                FocusRequest::Options => self.part(parts::OPTIONS),
                FocusRequest::Button => self.part(parts::BUTTON),
            };
            if tree.find(&target).is_some_and(|node| !node.props.invisible) {
                self.listbox.clear_focus_request();
                needs_render = true;
            }
        }

        needs_render
    }

    /// Render, lay out and position until the frame settles
    ///
    /// Convenience for windows hosting a single select.
    pub fn mount<T>(&mut self, window: &mut Window, props: &SelectProps<T>) -> Result<()> {
        self.attach(window);
        for _ in 0..MAX_LAYOUT_PASSES {
            let root = self.render(props)?;
            let tree = window.mount(root)?;
            if !self.after_layout(tree) {
                return Ok(());
            }
        }
        tracing::warn!(select = %self.key, "layout did not settle");
        Ok(())
    }

    /// Detach from `window` and return to the initial closed state
    pub fn unmount(&mut self, window: &mut Window) {
        window.remove_window_listener(&self.listener_key());
        self.listbox.reset();
        if let Some(popper) = self.popper.as_mut() {
            popper.reset();
        }
        self.intents.borrow_mut().clear();
        self.window_dirty.set(false);
    }
}

impl std::fmt::Debug for SelectWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectWidget")
            .field("key", &self.key)
            .field("listbox", &self.listbox)
            .field("popper", &self.popper)
            .field("pending_intents", &self.intents.borrow().len())
            .finish()
    }
}
