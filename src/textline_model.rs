use impl_helper::ImplHelper;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
};

use crate::{types::DirectionalConstraint, utils::clip_string};

pub type Span = (String, Style);

#[derive(Default, Debug, ImplHelper)]
pub struct TextLineModel {
    #[helper(get /* upd is custom */)]
    area: Rect,

    #[helper(/* set and upd are custom */)]
    hide_spans: Vec<Span>,

    #[helper(get)]
    show_spans: Vec<Span>,

    #[helper(get, set)]
    style: Style,

    #[helper(get, set)]
    alignment: Alignment,

    #[helper(copy, set)]
    transparent: bool,

    #[helper(copy, set)]
    constraint: DirectionalConstraint,
}

impl TextLineModel {
    // Spans share the width: once it runs out the rest are dropped
    fn make_show_spans(&mut self) {
        let mut budget = usize::from(self.area.width);
        self.show_spans = Vec::with_capacity(self.hide_spans.len());

        for (content, style) in self.hide_spans.iter() {
            if budget == 0 {
                break;
            }

            let content = clip_string(content.clone(), "…", budget);
            budget = budget.saturating_sub(content.chars().count());
            self.show_spans.push((content, *style));
        }
    }

    pub fn area_update(&mut self, value: Rect) -> &mut Self {
        self.area = value;
        self.make_show_spans();
        self
    }

    #[must_use = "method moves the value of self and returns the modified value"]
    pub fn hide_spans_set(mut self, value: Vec<Span>) -> Self {
        self.hide_spans = value;
        self.make_show_spans();
        self
    }

    pub fn hide_spans_update(&mut self, value: Vec<Span>) -> &mut Self {
        self.hide_spans = value;
        self.make_show_spans();
        self
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn contents(model: &TextLineModel) -> Vec<&str> {
        model
            .show_spans()
            .iter()
            .map(|(content, _)| content.as_str())
            .collect()
    }

    #[test]
    fn spans_share_the_width() {
        let mut model = TextLineModel::default().hide_spans_set(vec![
            (" France ".into(), Style::default()),
            (" ".into(), Style::default()),
            (" Germany ".into(), Style::default()),
        ]);
        model.area_update(Rect::new(0, 0, 12, 1));

        assert_eq!(contents(&model), vec![" France ", " ", " G…"]);
    }

    #[test]
    fn resize_restores_clipped_text() {
        let mut model =
            TextLineModel::default().hide_spans_set(vec![("Canada".into(), Style::default())]);
        model.area_update(Rect::new(0, 0, 3, 1));
        assert_eq!(contents(&model), vec!["Ca…"]);

        model.area_update(Rect::new(0, 0, 20, 1));
        assert_eq!(contents(&model), vec!["Canada"]);
    }
}
