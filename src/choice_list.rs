use impl_helper::ImplHelper;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use wrap_context::arg_context;

use crate::{
    choice::Choice,
    diacritics::fold_for_search,
    utils::{coerce_to_string, is_truthy},
};

/// Record fields that become a choice's value, label and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceKeys {
    pub value: String,
    pub label: String,
    pub color: Option<String>,
}

impl Default for ChoiceKeys {
    fn default() -> Self {
        Self {
            value: String::from("value"),
            label: String::from("label"),
            color: Some(String::from("color")),
        }
    }
}

/// Shown choices in list order, cut at the display cap.
#[derive(Debug, Default, ImplHelper)]
pub struct FilteredView<'a> {
    #[helper(get)]
    items: Vec<(usize, &'a Choice)>,

    #[helper(copy)]
    truncated: bool,
}

impl FilteredView<'_> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position(&self, index: usize) -> Option<usize> {
        self.items.iter().position(|(i, _)| *i == index)
    }
}

fn record_to_choice(record: &Value, keys: &ChoiceKeys) -> Choice {
    let field = |key: &str| record.as_object().and_then(|object| object.get(key));

    let value = coerce_to_string(field(&keys.value));
    let label = match field(&keys.label) {
        None | Some(Value::Null) => String::default(),
        label => coerce_to_string(label),
    };
    let color = keys
        .color
        .as_deref()
        .and_then(|key| field(key))
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut choice = Choice::new(value, label, color);
    if is_truthy(field("disabled")) {
        choice.disable();
    }

    choice
}

/// The option list behind a dropdown.
///
/// Choices are addressed by their index, which stays stable until the list is
/// rebuilt. Every flag on a choice is written through this type only. At most
/// one choice is highlighted at any time.
#[derive(Debug, Default, Clone, ImplHelper)]
pub struct ChoiceList {
    #[helper(get)]
    choices: Vec<Choice>,

    #[helper(copy)]
    display_cap: Option<usize>,

    /// Whether the last filter (or the construction) left anything shown
    #[helper(copy)]
    has_shown: bool,
}

impl ChoiceList {
    pub fn new(records: Option<&[Value]>, keys: &ChoiceKeys, display_cap: Option<usize>) -> Self {
        let choices = records
            .unwrap_or_default()
            .iter()
            .map(|record| record_to_choice(record, keys))
            .collect_vec();

        let has_shown = !choices.is_empty();

        let mut list = Self {
            choices,
            display_cap,
            has_shown,
        };
        list.highlight();

        tracing::debug!(len = list.len(), ?display_cap, "choice list built");

        list
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    fn choice_mut(&mut self, index: usize) -> anyhow::Result<&mut Choice> {
        arg_context!(self.choices.get_mut(index))
    }

    /// Every choice carrying `value`, duplicates included
    pub fn get_by_value(&self, value: &str) -> Vec<(usize, &Choice)> {
        self.choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.value() == value)
            .collect_vec()
    }

    /// Appends an inactive choice for a value missing from the records and
    /// returns its index.
    pub fn push_fallback(&mut self, label: String, value: String) -> usize {
        tracing::debug!(%value, %label, "fallback choice pushed");

        self.choices.push(Choice::fallback(value, label));
        self.choices.len() - 1
    }

    // Value

    pub fn value(&self) -> Vec<String> {
        self.selection()
            .into_iter()
            .map(|choice| choice.value().clone())
            .collect_vec()
    }

    /// Selects exactly the choices whose value is in `values`.
    /// Returns `false` when nothing matched, so the caller may try a fallback.
    pub fn set_value(&mut self, values: Option<&[String]>) -> bool {
        let values = values.unwrap_or_default();
        let mut one_selected = false;

        for choice in self.choices.iter_mut() {
            let selected = values.contains(choice.value());
            choice.selected_update(selected);
            one_selected |= selected;
        }

        one_selected
    }

    /// Order-independent comparison that still counts duplicates
    pub fn equal_values(lhs: &[String], rhs: &[String]) -> bool {
        lhs.len() == rhs.len() && lhs.iter().sorted().eq(rhs.iter().sorted())
    }

    // Selection

    pub fn selection(&self) -> Vec<&Choice> {
        self.choices
            .iter()
            .filter(|choice| choice.selected())
            .collect_vec()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.choices
            .iter()
            .positions(|choice| choice.selected())
            .collect_vec()
    }

    pub fn select(&mut self, index: usize, multiple: bool) -> anyhow::Result<()> {
        arg_context!(self.choice_mut(index))?;

        if !multiple {
            self.clear_selection();
        }

        arg_context!(self.choice_mut(index))?.selected_update(true);

        anyhow::Ok(())
    }

    pub fn deselect(&mut self, index: usize) -> anyhow::Result<()> {
        arg_context!(self.choice_mut(index))?.selected_update(false);

        anyhow::Ok(())
    }

    pub fn clear_selection(&mut self) {
        for choice in self.choices.iter_mut() {
            choice.selected_update(false);
        }
    }

    pub fn has_selected(&self) -> bool {
        self.choices.iter().any(|choice| choice.selected())
    }

    pub fn has_shown_selected(&self) -> bool {
        self.choices
            .iter()
            .any(|choice| choice.shown() && choice.selected())
    }

    // Filter

    pub fn filtered(&self) -> FilteredView<'_> {
        let mut items = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.shown())
            .collect_vec();

        let truncated = match self.display_cap {
            Some(cap) if items.len() > cap => {
                items.truncate(cap);
                true
            }
            _ => false,
        };

        FilteredView { items, truncated }
    }

    /// More choices are shown than the display cap lets through
    pub fn is_truncated(&self) -> bool {
        let shown = self.choices.iter().filter(|choice| choice.shown()).count();

        self.display_cap.is_some_and(|cap| shown > cap)
    }

    /// Shows the choices whose label contains `term`, ignoring case and accents.
    ///
    /// Returns `true` only when something was shown before and nothing is shown
    /// now.
    pub fn filter(&mut self, term: &str) -> bool {
        let any_shown = if term.trim().is_empty() {
            self.choices.iter_mut().for_each(Choice::show);
            !self.choices.is_empty()
        } else {
            let needle = fold_for_search(term);

            for choice in self.choices.iter_mut() {
                let shown = fold_for_search(choice.label()).contains(&needle);
                choice.shown_update(shown);
            }

            self.choices.iter().any(|choice| choice.shown())
        };

        let became_empty = self.has_shown && !any_shown;

        self.highlight();
        self.has_shown = any_shown;

        tracing::trace!(term, any_shown, became_empty, "filter applied");

        became_empty
    }

    // Highlight

    pub fn highlighted(&self) -> Option<(usize, &Choice)> {
        self.choices
            .iter()
            .enumerate()
            .find(|(_, choice)| choice.highlighted())
    }

    /// Position of the highlighted choice inside `filtered()`
    pub fn highlighted_index(&self) -> Option<usize> {
        let (index, _) = self.highlighted()?;
        self.filtered().position(index)
    }

    /// First shown selected choice, else first shown choice, else nothing
    pub fn highlight(&mut self) {
        let target = if self.has_shown_selected() {
            self.choices
                .iter()
                .position(|choice| choice.shown() && choice.selected())
        } else {
            self.choices.iter().position(|choice| choice.shown())
        };

        self.move_highlight(target);
    }

    pub fn highlight_choice(&mut self, index: Option<usize>) -> anyhow::Result<()> {
        if let Some(index) = index {
            arg_context!(self.choice_mut(index))?;
        }

        self.move_highlight(index);

        anyhow::Ok(())
    }

    // `index` must be in bounds
    fn move_highlight(&mut self, index: Option<usize>) {
        for choice in self.choices.iter_mut().filter(|choice| choice.highlighted()) {
            choice.highlighted_update(false);
        }

        if let Some(choice) = index.and_then(|index| self.choices.get_mut(index)) {
            choice.highlighted_update(true);
        }
    }

    pub fn highlight_next(&mut self) {
        let target = {
            let view = self.filtered();
            self.highlighted()
                .and_then(|(index, _)| view.position(index))
                .and_then(|position| view.items().get(position + 1))
                .map(|(index, _)| *index)
        };

        if target.is_some() {
            self.move_highlight(target);
        }
    }

    pub fn highlight_previous(&mut self) {
        let target = {
            let view = self.filtered();
            self.highlighted()
                .and_then(|(index, _)| view.position(index))
                .and_then(|position| position.checked_sub(1))
                .and_then(|position| view.items().get(position))
                .map(|(index, _)| *index)
        };

        if target.is_some() {
            self.move_highlight(target);
        }
    }
}
