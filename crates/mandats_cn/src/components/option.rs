//! Option values for selection components
//!
//! Components never inspect caller option types directly. They go through
//! an [`OptionAccessor`], which extracts a [`Key`] identifying each option
//! and renders it. Plain values (`String`, integers, [`LabeledOption`]) get
//! a default accessor through [`SimpleSelectOption`].

use std::fmt;
use std::rc::Rc;

use mandats_layout::prelude::*;

/// Value that uniquely identifies an option
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Text(String),
    Number(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Text(text) => f.write_str(text),
            Key::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Text(value)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Text(value.to_string())
    }
}

macro_rules! impl_number_key {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Key {
                fn from(value: $ty) -> Self {
                    Key::Number(i64::from(value))
                }
            }
        )*
    };
}

impl_number_key!(i8, i16, i32, i64, u8, u16, u32);

/// Extracts the key of an option
pub type GetValue<T> = Rc<dyn Fn(&T) -> Key>;

/// Renders an option
pub type RenderOption<T> = Rc<dyn Fn(&T) -> Div>;

/// How a component reads and renders options of type `T`
pub struct OptionAccessor<T> {
    get_value: GetValue<T>,
    render_option: RenderOption<T>,
    render_selected_option: Option<RenderOption<T>>,
}

impl<T> Clone for OptionAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            get_value: Rc::clone(&self.get_value),
            render_option: Rc::clone(&self.render_option),
            render_selected_option: self.render_selected_option.clone(),
        }
    }
}

impl<T> fmt::Debug for OptionAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionAccessor")
            .field("custom_selected_renderer", &self.render_selected_option.is_some())
            .finish()
    }
}

impl<T> OptionAccessor<T> {
    pub fn new<G, R>(get_value: G, render_option: R) -> Self
    where
        G: Fn(&T) -> Key + 'static,
        R: Fn(&T) -> Div + 'static,
    {
        Self {
            get_value: Rc::new(get_value),
            render_option: Rc::new(render_option),
            render_selected_option: None,
        }
    }

    /// Use a different renderer for the value shown in the button
    pub fn render_selected_with<R>(mut self, render: R) -> Self
    where
        R: Fn(&T) -> Div + 'static,
    {
        self.render_selected_option = Some(Rc::new(render));
        self
    }

    pub fn value(&self, option: &T) -> Key {
        (self.get_value)(option)
    }

    pub fn render(&self, option: &T) -> Div {
        (self.render_option)(option)
    }

    /// Falls back to the option renderer
    pub fn render_selected(&self, option: &T) -> Div {
        match &self.render_selected_option {
            Some(render) => render(option),
            None => (self.render_option)(option),
        }
    }
}

/// Option types usable without a custom accessor
pub trait SimpleSelectOption {
    fn select_value(&self) -> Key;
    fn select_label(&self) -> String;
}

impl SimpleSelectOption for String {
    fn select_value(&self) -> Key {
        Key::Text(self.clone())
    }

    fn select_label(&self) -> String {
        self.clone()
    }
}

impl SimpleSelectOption for &'static str {
    fn select_value(&self) -> Key {
        Key::Text((*self).to_string())
    }

    fn select_label(&self) -> String {
        (*self).to_string()
    }
}

macro_rules! impl_number_option {
    ($($ty:ty),*) => {
        $(
            impl SimpleSelectOption for $ty {
                fn select_value(&self) -> Key {
                    Key::from(*self)
                }

                fn select_label(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_number_option!(i32, i64, u32);

/// A value paired with a display label
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LabeledOption<V> {
    pub value: V,
    pub label: String,
}

impl<V> LabeledOption<V> {
    pub fn new(value: V, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

impl<V: Clone + Into<Key>> SimpleSelectOption for LabeledOption<V> {
    fn select_value(&self) -> Key {
        self.value.clone().into()
    }

    fn select_label(&self) -> String {
        self.label.clone()
    }
}

impl<T: SimpleSelectOption + 'static> Default for OptionAccessor<T> {
    fn default() -> Self {
        OptionAccessor::new(
            |option: &T| option.select_value(),
            |option: &T| text(option.select_label()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display_and_conversions() {
        assert_eq!(Key::from(2).to_string(), "2");
        assert_eq!(Key::from("Mende"), Key::Text("Mende".into()));
        assert_ne!(Key::from(1), Key::from("1"));
    }

    #[test]
    fn test_default_accessor_for_labeled_options() {
        let accessor = OptionAccessor::<LabeledOption<i64>>::default();
        let option = LabeledOption::new(2, "B");
        assert_eq!(accessor.value(&option), Key::Number(2));
        assert_eq!(accessor.render(&option).text_content(), "B");
        assert_eq!(accessor.render_selected(&option).text_content(), "B");
    }

    #[test]
    fn test_selected_renderer_override() {
        let accessor = OptionAccessor::<String>::default()
            .render_selected_with(|o: &String| text(format!("[{o}]")));
        let option = "TAA".to_string();
        assert_eq!(accessor.render(&option).text_content(), "TAA");
        assert_eq!(accessor.render_selected(&option).text_content(), "[TAA]");
    }
}
