//! Control size variants

use serde::{Deserialize, Serialize};

/// Size of a form control
///
/// Components map each variant to fixed padding and font presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Size {
    XSmall,
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
}

impl Size {
    pub const ALL: [Size; 5] = [
        Size::XSmall,
        Size::Small,
        Size::Medium,
        Size::Large,
        Size::XLarge,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Size::XSmall => "xSmall",
            Size::Small => "small",
            Size::Medium => "medium",
            Size::Large => "large",
            Size::XLarge => "xLarge",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        size: Size,
    }

    #[test]
    fn test_default_is_medium() {
        assert_eq!(Size::default(), Size::Medium);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let holder: Holder = toml::from_str("size = \"xLarge\"").unwrap();
        assert_eq!(holder.size, Size::XLarge);
        let holder: Holder = toml::from_str("size = \"xSmall\"").unwrap();
        assert_eq!(holder.size, Size::XSmall);
    }

    #[test]
    fn test_names_match_serde() {
        for size in Size::ALL {
            let parsed: Holder = toml::from_str(&format!("size = \"{}\"", size.name())).unwrap();
            assert_eq!(parsed.size, size);
        }
    }
}
