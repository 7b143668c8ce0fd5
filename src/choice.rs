use impl_helper::ImplHelper;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#eeeeee";

/// Label and value only, safe to hand out in events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSummary {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, ImplHelper)]
pub struct Choice {
    #[helper(get)]
    value: String,

    #[helper(get)]
    label: String,

    #[helper(get)]
    color: String,

    #[helper(copy)]
    disabled: bool,

    #[helper(copy)]
    selected: bool,

    #[helper(copy)]
    shown: bool,

    #[helper(copy)]
    highlighted: bool,

    #[helper(copy)]
    inactive: bool,
}

impl Choice {
    pub fn new(value: String, label: String, color: Option<String>) -> Self {
        Self {
            value,
            label,
            color: color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            disabled: false,
            selected: false,
            shown: true,
            highlighted: false,
            inactive: false,
        }
    }

    /// A stand-in for a value the options don't contain
    pub fn fallback(value: String, label: String) -> Self {
        Self {
            inactive: true,
            ..Self::new(value, label, None)
        }
    }

    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }

    pub fn disable(&mut self) {
        self.disabled = true;
    }

    pub fn enable(&mut self) {
        self.disabled = false;
    }

    pub(crate) fn selected_update(&mut self, value: bool) -> &mut Self {
        self.selected = value;
        self
    }

    pub(crate) fn shown_update(&mut self, value: bool) -> &mut Self {
        self.shown = value;
        self
    }

    pub(crate) fn highlighted_update(&mut self, value: bool) -> &mut Self {
        self.highlighted = value;
        self
    }

    pub fn undecorated_copy(&self) -> ChoiceSummary {
        ChoiceSummary {
            label: self.label.clone(),
            value: self.value.clone(),
        }
    }
}
