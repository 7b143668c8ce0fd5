use impl_helper::ImplHelper;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use wrap_context::{arg_context, liab};

use crate::{
    choice::ChoiceSummary,
    choice_list::{ChoiceKeys, ChoiceList},
    fallback::{FallbackRequest, FallbackResolution},
    utils::coerce_to_string,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    pub multiple: bool,
    pub allow_clear: bool,
    pub placeholder: String,
    pub not_found_msg: String,
    pub max_displayed_options: Option<usize>,
    pub max_displayed_options_message: String,
    pub keys: ChoiceKeys,
    /// The filter input exists only with at least this many options
    pub no_filter: usize,
    /// Emit `ValueChanged` for writes that arrive before the first options
    pub notify_change_before_options_loaded: bool,
    pub custom_colored_tags: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            multiple: false,
            allow_clear: false,
            placeholder: String::default(),
            not_found_msg: String::from("No results found"),
            max_displayed_options: None,
            max_displayed_options_message: String::from("Please filter the results"),
            keys: ChoiceKeys::default(),
            no_filter: 0,
            notify_change_before_options_loaded: false,
            custom_colored_tags: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    Opened,
    Closed,
    Selected(ChoiceSummary),
    Deselected(Vec<ChoiceSummary>),
    NoOptionsFound,
    ValueChanged(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectKey {
    Backspace,
    Tab,
    Enter,
    Esc,
    Space,
    Up,
    Down,
    AltUp,
    AltDown,
}

/// Accepts what a form control may be given: nothing, a string, a number or
/// an array of those.
pub fn normalize_value(value: &Value) -> anyhow::Result<Vec<String>> {
    let values = match value {
        Value::Null => vec![],
        Value::String(string) if string.is_empty() => vec![],
        Value::String(string) => vec![string.clone()],
        Value::Number(_) => vec![coerce_to_string(Some(value))],
        Value::Array(items) => items
            .iter()
            .map(|item| coerce_to_string(Some(item)))
            .collect_vec(),
        _ => liab!("Value must be a string or an array."),
    };

    anyhow::Ok(values)
}

/// Dropdown controller around a [`ChoiceList`].
///
/// Host layers feed it options, values, filter text and keys, then drain
/// [`SelectEvent`]s and [`FallbackRequest`]s.
#[derive(Debug, ImplHelper)]
pub struct Select {
    #[helper(get)]
    config: SelectConfig,

    #[helper(get)]
    options: ChoiceList,

    /// Bumped on every rebuild of `options`
    #[helper(copy)]
    generation: u64,

    committed_value: Vec<String>,
    pending_value: Vec<String>,

    /// No options were given yet, writes are held in `pending_value`
    #[helper(copy)]
    awaiting_options: bool,

    #[helper(copy)]
    is_open: bool,

    #[helper(copy)]
    has_focus: bool,

    #[helper(copy)]
    disabled: bool,

    #[helper(copy)]
    filter_enabled: bool,

    #[helper(get)]
    filter_term: String,

    #[helper(get)]
    placeholder_view: String,

    #[helper(copy)]
    has_selected: bool,

    events: Vec<SelectEvent>,
    fallback_requests: Vec<FallbackRequest>,
}

impl Select {
    pub fn new(config: SelectConfig) -> Self {
        let placeholder_view = config.placeholder.clone();

        Self {
            config,
            options: ChoiceList::default(),
            generation: 0,
            committed_value: vec![],
            pending_value: vec![],
            awaiting_options: true,
            is_open: false,
            has_focus: false,
            disabled: false,
            filter_enabled: true,
            filter_term: String::default(),
            placeholder_view,
            has_selected: false,
            events: vec![],
            fallback_requests: vec![],
        }
    }

    pub fn take_events(&mut self) -> Vec<SelectEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_fallback_requests(&mut self) -> Vec<FallbackRequest> {
        std::mem::take(&mut self.fallback_requests)
    }

    // Options

    /// Replaces the option list. The selection survives when the new records
    /// still carry it.
    pub fn set_options(&mut self, records: Option<Vec<Value>>) {
        let preserved = (!self.awaiting_options).then(|| self.options.value());
        let first_records = self.awaiting_options && records.is_some();

        self.fallback_requests.clear();
        self.generation += 1;
        self.options = ChoiceList::new(
            records.as_deref(),
            &self.config.keys,
            self.config.max_displayed_options,
        );

        tracing::debug!(
            generation = self.generation,
            len = self.options.len(),
            "options rebuilt"
        );

        if let Some(previous) = preserved {
            if !self.options.set_value(Some(previous.as_slice())) {
                self.request_fallback(&previous);
            }

            if !ChoiceList::equal_values(&self.options.value(), &previous) {
                self.value_changed();
            }
        }

        if first_records {
            self.awaiting_options = false;

            let pending = std::mem::take(&mut self.pending_value);
            if !pending.is_empty() {
                if !self.options.set_value(Some(pending.as_slice())) {
                    self.request_fallback(&pending);
                }

                if self.config.notify_change_before_options_loaded {
                    self.sync_value();
                } else {
                    self.value_changed();
                }
            }
        }

        self.filter_enabled = self.options.len() >= self.config.no_filter;
    }

    // Value

    /// Array in multiple mode, otherwise the single value or `null`
    pub fn value(&self) -> Value {
        let values = if self.awaiting_options {
            &self.pending_value
        } else {
            &self.committed_value
        };

        if self.config.multiple {
            Value::Array(values.iter().cloned().map(Value::String).collect_vec())
        } else {
            values.first().cloned().map_or(Value::Null, Value::String)
        }
    }

    pub fn write_value(&mut self, value: &Value) -> anyhow::Result<()> {
        let values = arg_context!(normalize_value(value))?;

        if self.awaiting_options {
            self.pending_value = values;

            if self.config.notify_change_before_options_loaded {
                self.value_changed();
            }

            return anyhow::Ok(());
        }

        if !ChoiceList::equal_values(&values, &self.committed_value) {
            if !self.options.set_value(Some(values.as_slice())) {
                self.request_fallback(&values);
            }

            self.value_changed();
        }

        anyhow::Ok(())
    }

    fn value_changed(&mut self) {
        self.sync_value();

        let value = self.value();
        self.events.push(SelectEvent::ValueChanged(value));
    }

    fn sync_value(&mut self) {
        self.committed_value = self.options.value();
        self.has_selected = !self.committed_value.is_empty();
        self.placeholder_view = if self.has_selected {
            String::default()
        } else {
            self.config.placeholder.clone()
        };
    }

    fn request_fallback(&mut self, values: &[String]) {
        if let Some(value) = values.first() {
            self.fallback_requests.push(FallbackRequest {
                generation: self.generation,
                value: value.clone(),
                values: values.to_vec(),
            });
        }
    }

    /// Returns whether the resolution changed anything
    pub fn apply_fallback(&mut self, resolution: FallbackResolution) -> bool {
        if resolution.generation != self.generation {
            tracing::debug!(
                stale = resolution.generation,
                current = self.generation,
                value = %resolution.value,
                "stale fallback dropped"
            );
            return false;
        }

        let Some(label) = resolution.label.filter(|label| !label.is_empty()) else {
            return false;
        };

        self.options.push_fallback(label, resolution.value);
        self.options.set_value(Some(resolution.values.as_slice()));
        self.value_changed();

        true
    }

    // Selection

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn select_value(&mut self, value: &str) -> anyhow::Result<()> {
        let indices = self
            .options
            .get_by_value(value)
            .into_iter()
            .map(|(index, _)| index)
            .collect_vec();

        for index in indices {
            arg_context!(self.select_choice(index))?;
        }

        anyhow::Ok(())
    }

    pub fn option_clicked(&mut self, index: usize) -> anyhow::Result<()> {
        if self.config.multiple {
            arg_context!(self.toggle_choice(index))
        } else {
            arg_context!(self.select_choice(index))
        }
    }

    fn toggle_choice(&mut self, index: usize) -> anyhow::Result<()> {
        if arg_context!(self.options.get(index))?.selected() {
            arg_context!(self.deselect_choice(index))
        } else {
            arg_context!(self.select_choice(index))
        }
    }

    fn select_choice(&mut self, index: usize) -> anyhow::Result<()> {
        let choice = arg_context!(self.options.get(index))?;
        if choice.selected() {
            return anyhow::Ok(());
        }

        let summary = choice.undecorated_copy();
        arg_context!(self.options.select(index, self.config.multiple))?;
        self.value_changed();
        self.events.push(SelectEvent::Selected(summary));

        anyhow::Ok(())
    }

    fn deselect_choice(&mut self, index: usize) -> anyhow::Result<()> {
        let choice = arg_context!(self.options.get(index))?;
        if !choice.selected() {
            return anyhow::Ok(());
        }

        let summary = choice.undecorated_copy();
        arg_context!(self.options.deselect(index))?;
        self.value_changed();
        self.events.push(SelectEvent::Deselected(vec![summary]));

        if self.config.multiple {
            self.options.highlight();
        }

        anyhow::Ok(())
    }

    pub fn clear(&mut self) {
        let selection = self
            .options
            .selection()
            .into_iter()
            .map(|choice| choice.undecorated_copy())
            .collect_vec();

        if selection.is_empty() {
            return;
        }

        self.options.clear_selection();
        self.value_changed();
        self.events.push(SelectEvent::Deselected(selection));
    }

    pub fn select_highlighted(&mut self) -> anyhow::Result<()> {
        if let Some((index, _)) = self.options.highlighted() {
            arg_context!(self.select_choice(index))?;
            self.close(true);
        }

        anyhow::Ok(())
    }

    /// Drops the last tag and hands its label back to the filter input
    pub fn deselect_last(&mut self) -> anyhow::Result<()> {
        let Some(index) = self.options.selected_indices().last().copied() else {
            return anyhow::Ok(());
        };

        let label = arg_context!(self.options.get(index))?.label().clone();
        arg_context!(self.deselect_choice(index))?;

        if self.filter_enabled {
            self.filter_term = format!("{} ", label);
        }

        anyhow::Ok(())
    }

    // Dropdown

    pub fn open(&mut self) {
        if self.is_open {
            return;
        }

        self.is_open = true;
        self.events.push(SelectEvent::Opened);
    }

    pub fn close(&mut self, focus: bool) {
        if !self.is_open {
            return;
        }

        self.clear_filter_input();
        self.is_open = false;
        if focus {
            self.has_focus = true;
        }
        self.events.push(SelectEvent::Closed);
    }

    /// Closing always works, opening only while enabled
    pub fn toggle(&mut self) {
        if self.is_open {
            self.close(true);
        } else if !self.disabled {
            self.open();
        }
    }

    pub fn focus(&mut self) {
        self.has_focus = true;
    }

    pub fn blur(&mut self) {
        self.has_focus = false;
    }

    // Filter

    fn clear_filter_input(&mut self) {
        self.filter_term.clear();
        self.options.filter("");
    }

    pub fn filter_input(&mut self, term: &str) {
        if self.config.multiple && !self.is_open && !self.disabled {
            self.open();
        }

        self.filter_term = term.to_string();

        if self.options.filter(term) {
            self.events.push(SelectEvent::NoOptionsFound);
        }
    }

    /// Message for the bottom of the dropdown, if any
    pub fn notice(&self) -> Option<&str> {
        if !self.options.is_empty() && self.options.filtered().is_empty() {
            Some(self.config.not_found_msg.as_str())
        } else if self.options.is_truncated() {
            Some(self.config.max_displayed_options_message.as_str())
        } else {
            None
        }
    }

    // Keys

    pub fn handle_key(&mut self, key: SelectKey) -> anyhow::Result<()> {
        if key == SelectKey::Backspace {
            if self.config.multiple
                && self.has_selected
                && self.filter_enabled
                && self.filter_term.is_empty()
            {
                arg_context!(self.deselect_last())?;
            }

            return anyhow::Ok(());
        }

        if self.is_open {
            match key {
                SelectKey::Esc | SelectKey::AltUp => self.close(true),
                SelectKey::Tab => self.close(false),
                SelectKey::Enter => arg_context!(self.select_highlighted())?,
                SelectKey::Up => self.options.highlight_previous(),
                SelectKey::Down => self.options.highlight_next(),
                SelectKey::Space | SelectKey::AltDown | SelectKey::Backspace => {}
            }
        } else if !self.disabled
            && matches!(key, SelectKey::Enter | SelectKey::Space | SelectKey::AltDown)
        {
            self.open();
        }

        anyhow::Ok(())
    }
}
