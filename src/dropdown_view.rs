use itertools::Itertools;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState},
    Frame,
};

use chooser::color::parse_hex;

use crate::{
    dropdown_model::{DropdownItem, DropdownModel},
    types::Render,
    utils::clip_string,
};

#[derive(Debug, Clone, Default)]
pub struct DropdownView<'a> {
    area: Rect,
    list: List<'a>,
    state: ListState,
    transparent: bool,
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    parse_hex(hex).map(|(r, g, b)| Color::Rgb(r, g, b))
}

fn item_line<'a>(item: &DropdownItem, model: &DropdownModel, width: usize) -> Line<'a> {
    let marker = match (model.multiple(), item.selected()) {
        (true, true) => "[x] ",
        (true, false) => "[ ] ",
        (false, true) => "● ",
        (false, false) => "  ",
    };

    let mut spans = vec![Span::from(marker)];

    if model.colored() {
        let swatch = Style::default().fg(hex_to_color(item.color()).unwrap_or(Color::Reset));
        spans.push(Span::styled("■ ", swatch));
    }

    let used = spans.iter().map(Span::width).sum::<usize>();
    spans.push(Span::from(clip_string(
        item.label().clone(),
        "…",
        width.saturating_sub(used),
    )));

    Line::from(spans)
}

impl<'a> From<&DropdownModel> for DropdownView<'a> {
    fn from(model: &DropdownModel) -> Self {
        let area = *model.area();

        let items = if model.is_open() {
            model
                .items()
                .iter()
                .map(|item| {
                    let mut style = Style::default();

                    if item.disabled() {
                        style = style.add_modifier(Modifier::DIM);
                    }
                    if item.inactive() {
                        style = style.add_modifier(Modifier::ITALIC);
                    }

                    ListItem::new(item_line(item, model, area.width.into())).style(style)
                })
                .collect_vec()
        } else {
            vec![]
        };

        let list = List::new(items).highlight_style(Style::default().bg(Color::Rgb(214, 94, 14)));
        let state = ListState::default().with_selected(model.highlight_index());

        Self {
            area,
            list,
            state,
            transparent: model.transparent(),
        }
    }
}

impl<'a> Render for DropdownView<'a> {
    fn render(&mut self, frame: &mut Frame) {
        if !self.transparent {
            frame.render_widget(Clear, self.area);
        }

        frame.render_stateful_widget(&self.list, self.area, &mut self.state);
    }
}
