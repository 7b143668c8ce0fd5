use impl_helper::ImplHelper;
use itertools::Itertools;
use ratatui::layout::Rect;

use chooser::{Choice, ChoiceList};

use crate::types::DirectionalConstraint;

/// One row of the open dropdown
#[derive(Default, Debug, Clone, PartialEq, Eq, ImplHelper)]
pub struct DropdownItem {
    #[helper(get)]
    label: String,

    #[helper(get)]
    color: String,

    #[helper(copy)]
    selected: bool,

    #[helper(copy)]
    disabled: bool,

    #[helper(copy)]
    inactive: bool,
}

impl From<&Choice> for DropdownItem {
    fn from(choice: &Choice) -> Self {
        Self {
            label: choice.label().clone(),
            color: choice.color().clone(),
            selected: choice.selected(),
            disabled: choice.disabled(),
            inactive: choice.inactive(),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, ImplHelper)]
pub struct DropdownModel {
    #[helper(all)]
    area: Rect,

    #[helper(get)]
    items: Vec<DropdownItem>,

    #[helper(copy)]
    highlight_index: Option<usize>,

    #[helper(copy, set, upd)]
    is_open: bool,

    #[helper(copy, set)]
    multiple: bool,

    #[helper(copy, set)]
    colored: bool,

    #[helper(copy, set)]
    transparent: bool,

    #[helper(copy, set)]
    constraint: DirectionalConstraint,
}

impl DropdownModel {
    /// Copies what is currently visible from `options`
    pub fn sync(&mut self, options: &ChoiceList) -> &mut Self {
        self.items = options
            .filtered()
            .items()
            .iter()
            .map(|(_, choice)| DropdownItem::from(*choice))
            .collect_vec();
        self.highlight_index = options.highlighted_index();
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use chooser::ChoiceKeys;

    use super::*;

    #[test]
    fn sync_follows_filter_and_highlight() {
        let records = vec![
            json!({"value": "fr", "label": "France", "color": "#0055a4"}),
            json!({"value": "de", "label": "Germany"}),
            json!({"value": "ca", "label": "Canada"}),
        ];
        let mut options = ChoiceList::new(Some(&records[..]), &ChoiceKeys::default(), Some(1));
        options.filter("an");

        let mut model = DropdownModel::default();
        model.sync(&options);

        assert_eq!(
            model
                .items()
                .iter()
                .map(|item| item.label().as_str())
                .collect_vec(),
            vec!["France"]
        );
        assert_eq!(model.items()[0].color(), "#0055a4");
        assert_eq!(model.highlight_index(), Some(0));
    }
}
