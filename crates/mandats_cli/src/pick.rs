//! Scripted organisation picker
//!
//! Drives the organisation select in a headless window, one action at a
//! time, the way a visitor filtering the feed would.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use indexmap::IndexSet;
use mandats_cn::prelude::*;
use mandats_cn::parts;
use mandats_core::{KeyCode, Size as Viewport};
use mandats_layout::Window;

use crate::config::SelectConfig;
use crate::feed::Mandat;

const SELECT_KEY: &str = "org";

/// One scripted step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Open,
    Down,
    Up,
    Home,
    End,
    Enter,
    Escape,
    Clear,
    Click(usize),
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let action = match s {
            "open" => Action::Open,
            "down" => Action::Down,
            "up" => Action::Up,
            "home" => Action::Home,
            "end" => Action::End,
            "enter" => Action::Enter,
            "escape" => Action::Escape,
            "clear" => Action::Clear,
            other => {
                let index = other
                    .strip_prefix("click:")
                    .ok_or_else(|| anyhow!("Unknown action '{}'", other))?;
                let index = index
                    .parse()
                    .map_err(|_| anyhow!("Invalid option index in '{}'", other))?;
                Action::Click(index)
            }
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Open => f.write_str("open"),
            Action::Down => f.write_str("down"),
            Action::Up => f.write_str("up"),
            Action::Home => f.write_str("home"),
            Action::End => f.write_str("end"),
            Action::Enter => f.write_str("enter"),
            Action::Escape => f.write_str("escape"),
            Action::Clear => f.write_str("clear"),
            Action::Click(index) => write!(f, "click:{index}"),
        }
    }
}

/// Parse a comma separated script such as `open,down,enter`
pub fn parse_script(script: &str) -> Result<Vec<Action>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(str::parse)
        .collect()
}

/// Distinct organisations in feed order
pub fn organisations(mandats: &[Mandat]) -> Vec<String> {
    mandats
        .iter()
        .map(|m| m.org.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Organisation select hosted in its own window
pub struct Picker<'a> {
    config: &'a SelectConfig,
    options: Vec<String>,
    selected: Rc<RefCell<Option<String>>>,
    select: SelectWidget,
    window: Window,
}

impl<'a> Picker<'a> {
    pub fn new(options: Vec<String>, config: &'a SelectConfig, viewport: Viewport) -> Self {
        Self {
            config,
            options,
            selected: Rc::default(),
            select: SelectWidget::new(SELECT_KEY),
            window: Window::new(viewport),
        }
    }

    fn props(&self) -> SelectProps<String> {
        let sink = Rc::clone(&self.selected);
        SelectProps::simple(self.options.clone())
            .label("Organisation")
            .placeholder(&self.config.placeholder)
            .empty_hint("Aucune organisation")
            .clearable(true)
            .size(self.config.size)
            .fluid_list_box(self.config.fluid_list_box)
            .list_box_placement(self.config.placement)
            .selected(self.selected.borrow().clone())
            .on_select(move |org| *sink.borrow_mut() = org.cloned())
    }

    /// Render the current state into the window
    pub fn mount(&mut self) -> Result<()> {
        let props = self.props();
        self.select.mount(&mut self.window, &props)?;
        Ok(())
    }

    /// Perform one action and bring the frame up to date
    ///
    /// Returns false when the action had nothing to act on.
    pub fn perform(&mut self, action: Action) -> Result<bool> {
        let handled = match action {
            Action::Open if self.select.is_open() => false,
            Action::Open => self.window.click(&self.select.part(parts::BUTTON)),
            Action::Down => self.key(KeyCode::ArrowDown),
            Action::Up => self.key(KeyCode::ArrowUp),
            Action::Home => self.key(KeyCode::Home),
            Action::End => self.key(KeyCode::End),
            Action::Enter => self.key(KeyCode::Enter),
            Action::Escape => self.key(KeyCode::Escape),
            Action::Clear => self.window.click(&self.select.part(parts::CLEAR)),
            Action::Click(index) => self.window.click(&self.select.option_id(index)),
        };
        if !handled {
            tracing::warn!(%action, "action had no effect");
        }

        let props = self.props();
        self.select.flush(&props)?;
        // on_select may have changed the selection
        self.mount()?;
        Ok(handled)
    }

    // Keys go to the focused element, the button when nothing has focus
    fn key(&mut self, key: KeyCode) -> bool {
        if self.window.focused().is_none() {
            self.window.focus(&self.select.part(parts::BUTTON));
        }
        self.window.key_down(key)
    }

    pub fn selected(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        self.select.is_open()
    }

    /// Outline of the current frame
    pub fn frame(&self) -> String {
        self.window
            .tree()
            .map(|tree| tree.outline())
            .unwrap_or_default()
    }
}
