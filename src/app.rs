use itertools::Itertools;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Flex, Rect, Size},
    style::{Color, Modifier, Style, Stylize},
    widgets::Clear,
    Frame,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::mpsc::UnboundedSender;

use wrap_context::{arg_context, raw_context};

use chooser::{
    color::{pick_text_color, DARK_TEXT, LIGHT_TEXT},
    resolve_fallback, ChoiceSummary, FallbackResolution, JsonFileResolver, Select, SelectKey,
};

use crate::{
    dropdown_model::DropdownModel,
    dropdown_view::{hex_to_color, DropdownView},
    event::Event,
    handler::handle_key_events,
    textline_model::{Span, TextLineModel},
    textline_view::TextLineView,
    tui::Tui,
    types::{split_areas, DirectionalConstraint, Render, ViewModel},
};

#[derive(Debug)]
pub struct App<'a> {
    running: bool,
    select: Select,
    file: PathBuf,
    resolver: Option<Arc<JsonFileResolver>>,
    sender: UnboundedSender<Event>,

    selection_textline: ViewModel<TextLineView<'a>, TextLineModel>,
    filter_textline: ViewModel<TextLineView<'a>, TextLineModel>,
    dropdown: ViewModel<DropdownView<'a>, DropdownModel>,
    status_textline: ViewModel<TextLineView<'a>, TextLineModel>,
    flpath_textline: ViewModel<TextLineView<'a>, TextLineModel>,
}

fn tag_style(color: &str, colored: bool) -> Style {
    if !colored {
        return Style::default().reversed();
    }

    let text = pick_text_color(Some(color), LIGHT_TEXT, DARK_TEXT);

    Style::default()
        .bg(hex_to_color(color).unwrap_or(Color::Reset))
        .fg(hex_to_color(text).unwrap_or(Color::Reset))
}

pub fn selection_spans(select: &Select) -> Vec<Span> {
    let selection = select.options().selection();
    let config = select.config();

    let mut spans = match selection.first() {
        None => vec![(
            select.placeholder_view().clone(),
            Style::default().add_modifier(Modifier::DIM),
        )],
        Some(_) if config.multiple => Itertools::intersperse(
            selection.iter().map(|choice| {
                (
                    format!(" {} ", choice.label()),
                    tag_style(choice.color(), config.custom_colored_tags),
                )
            }),
            (String::from(" "), Style::default()),
        )
        .collect_vec(),
        Some(choice) => vec![(choice.label().clone(), Style::default())],
    };

    if config.allow_clear && !selection.is_empty() {
        spans.push((String::from(" ×"), Style::default().add_modifier(Modifier::DIM)));
    }

    spans
}

pub fn filter_spans(select: &Select) -> Vec<Span> {
    if !select.filter_enabled() {
        return vec![];
    }

    vec![
        (String::from("> "), Style::default().add_modifier(Modifier::DIM)),
        (select.filter_term().clone(), Style::default()),
    ]
}

pub fn status_spans(select: &Select) -> Vec<Span> {
    if let Some(notice) = select.notice() {
        return vec![(notice.to_string(), Style::default().yellow())];
    }

    let options = select.options();

    vec![(
        format!(
            "{}/{} shown, {} selected",
            options.filtered().len(),
            options.len(),
            options.selection().len()
        ),
        Style::default(),
    )]
}

impl<'a> App<'a> {
    pub fn new(
        terminal_size: Size,
        file: &Path,
        select: Select,
        resolver: Option<Arc<JsonFileResolver>>,
        sender: UnboundedSender<Event>,
    ) -> anyhow::Result<Self> {
        let file_name = file.display().to_string();
        let file_name_width = u16::try_from(file_name.chars().count()).unwrap_or(u16::MAX);

        let selection_textline = ViewModel::default().model_set(
            TextLineModel::default()
                .style_set(Style::default().bg(Color::Rgb(80, 73, 69)))
                .alignment_set(Alignment::Left)
                .constraint_set(DirectionalConstraint::Vertical(Constraint::Length(1))),
        );

        let filter_textline = ViewModel::default().model_set(
            TextLineModel::default()
                .alignment_set(Alignment::Left)
                .constraint_set(DirectionalConstraint::Vertical(Constraint::Length(1))),
        );

        let dropdown = ViewModel::default().model_set(
            DropdownModel::default()
                .multiple_set(select.config().multiple)
                .colored_set(select.config().custom_colored_tags)
                .constraint_set(DirectionalConstraint::Vertical(Constraint::Min(0))),
        );

        let status_textline = ViewModel::default().model_set(
            TextLineModel::default()
                .style_set(Style::default().white())
                .alignment_set(Alignment::Left)
                .transparent_set(true)
                .constraint_set(DirectionalConstraint::Horizontal(Constraint::Min(1))),
        );

        let flpath_textline = ViewModel::default().model_set(
            TextLineModel::default()
                .hide_spans_set(vec![(file_name, Style::default())])
                .style_set(Style::default().white())
                .alignment_set(Alignment::Right)
                .transparent_set(true)
                .constraint_set(DirectionalConstraint::Horizontal(Constraint::Max(
                    file_name_width,
                ))),
        );

        let mut app = Self {
            running: true,
            select,
            file: file.to_path_buf(),
            resolver,
            sender,
            selection_textline,
            filter_textline,
            dropdown,
            status_textline,
            flpath_textline,
        };

        arg_context!(app.set_terminal_size(terminal_size))?;
        arg_context!(app.sync())?;

        anyhow::Ok(app)
    }

    pub fn select(&self) -> &Select {
        &self.select
    }

    pub async fn run<B: Backend>(&mut self, tui: &mut Tui<B>) -> anyhow::Result<()> {
        let mut draw = true;

        while self.running {
            if draw {
                arg_context!(tui.draw(self))?;
                draw = false;
            }

            let event = arg_context!(tui.events.next().await)?;

            match event {
                Event::Tick => self.tick(),
                Event::Key(key_event) => {
                    arg_context!(handle_key_events(key_event, self))?;
                    draw = true;
                }
                Event::Resize(width, height) => {
                    arg_context!(self.set_terminal_size(Size::new(width, height)))?;
                    draw = true;
                }
                Event::Fallback(resolution) => {
                    raw_context!(self.apply_fallback(resolution))?;
                    draw = true;
                }
            }
        }

        anyhow::Ok(())
    }

    pub fn tick(&self) {}

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn key(&mut self, key: SelectKey) -> anyhow::Result<()> {
        arg_context!(self.select.handle_key(key))?;
        arg_context!(self.sync())
    }

    pub fn clear(&mut self) -> anyhow::Result<()> {
        if self.select.config().allow_clear {
            self.select.clear();
        }

        arg_context!(self.sync())
    }

    pub fn filter_push(&mut self, character: char) -> anyhow::Result<()> {
        if !self.select.filter_enabled() || self.select.disabled() {
            return anyhow::Ok(());
        }

        self.select.open();

        let term = format!("{}{}", self.select.filter_term(), character);
        self.select.filter_input(&term);

        arg_context!(self.sync())
    }

    pub fn filter_pop(&mut self) -> anyhow::Result<()> {
        let mut term = self.select.filter_term().clone();
        term.pop();
        self.select.filter_input(&term);

        arg_context!(self.sync())
    }

    pub fn apply_fallback(&mut self, resolution: FallbackResolution) -> anyhow::Result<()> {
        self.select.apply_fallback(resolution);

        arg_context!(self.sync())
    }

    fn dispatch_fallbacks(&mut self) {
        for request in self.select.take_fallback_requests() {
            let Some(resolver) = self.resolver.clone() else {
                tracing::debug!(value = %request.value, "no fallback source, request dropped");
                continue;
            };
            let sender = self.sender.clone();

            tokio::spawn(async move {
                let resolution = resolve_fallback(resolver.as_ref(), request).await;

                if sender.send(Event::Fallback(resolution)).is_err() {
                    tracing::debug!("event loop is gone, fallback dropped");
                }
            });
        }
    }

    /// Drains the controller's queues and rebuilds every view from it
    fn sync(&mut self) -> anyhow::Result<()> {
        for event in self.select.take_events() {
            tracing::debug!(?event, "select event");
        }

        self.dispatch_fallbacks();

        let select = &self.select;

        raw_context!(self.selection_textline.with_model_mut(|model| {
            model.hide_spans_update(selection_spans(select));
            anyhow::Ok(())
        }))?;

        raw_context!(self.filter_textline.with_model_mut(|model| {
            model.hide_spans_update(filter_spans(select));
            anyhow::Ok(())
        }))?;

        raw_context!(self.dropdown.with_model_mut(|model| {
            model.is_open_update(select.is_open()).sync(select.options());
            anyhow::Ok(())
        }))?;

        raw_context!(self.status_textline.with_model_mut(|model| {
            model.hide_spans_update(status_spans(select));
            anyhow::Ok(())
        }))?;

        anyhow::Ok(())
    }

    pub fn set_terminal_size(&mut self, terminal_size: Size) -> anyhow::Result<()> {
        let terminal_area = Rect::new(0, 0, terminal_size.width, terminal_size.height);

        let [selection_area, filter_area, dropdown_area, bottom_area] = arg_context!(split_areas(
            [
                self.selection_textline.model().constraint(),
                self.filter_textline.model().constraint(),
                self.dropdown.model().constraint(),
                DirectionalConstraint::Vertical(Constraint::Length(1)),
            ],
            terminal_area,
            Flex::Start,
        ))?;

        let [status_area, flpath_area] = arg_context!(split_areas(
            [
                self.status_textline.model().constraint(),
                self.flpath_textline.model().constraint(),
            ],
            bottom_area,
            Flex::SpaceBetween,
        ))?;

        raw_context!(self.selection_textline.with_model_mut(|model| {
            model.area_update(selection_area);
            anyhow::Ok(())
        }))?;

        raw_context!(self.filter_textline.with_model_mut(|model| {
            model.area_update(filter_area);
            anyhow::Ok(())
        }))?;

        raw_context!(self.dropdown.with_model_mut(|model| {
            model.area_update(dropdown_area);
            anyhow::Ok(())
        }))?;

        raw_context!(self.status_textline.with_model_mut(|model| {
            model.area_update(status_area);
            anyhow::Ok(())
        }))?;

        raw_context!(self.flpath_textline.with_model_mut(|model| {
            model.area_update(flpath_area);
            anyhow::Ok(())
        }))?;

        anyhow::Ok(())
    }

    pub fn selection(&self) -> Vec<ChoiceSummary> {
        self.select
            .options()
            .selection()
            .into_iter()
            .map(|choice| choice.undecorated_copy())
            .collect_vec()
    }

    pub fn print(&self) -> anyhow::Result<()> {
        let json = arg_context!(serde_json::to_string(&self.selection()))?;
        println!("{}", json);

        tracing::debug!(file = %self.file.display(), "selection printed");

        anyhow::Ok(())
    }
}

impl<'a> Render for App<'a> {
    fn render(&mut self, frame: &mut Frame) {
        frame.render_widget(Clear, frame.area());

        self.selection_textline.render(frame);
        self.filter_textline.render(frame);
        self.dropdown.render(frame);
        self.status_textline.render(frame);
        self.flpath_textline.render(frame);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use chooser::SelectConfig;

    use super::*;

    fn select(config: SelectConfig) -> Select {
        let mut select = Select::new(config);
        select.set_options(Some(vec![
            json!({"value": "fr", "label": "France", "color": "#0055a4"}),
            json!({"value": "de", "label": "Germany", "color": "#ffce00"}),
            json!({"value": "ca", "label": "Canada"}),
        ]));
        select
    }

    fn contents(spans: &[Span]) -> Vec<&str> {
        spans.iter().map(|(content, _)| content.as_str()).collect()
    }

    #[test]
    fn placeholder_until_something_is_selected() {
        let mut select = select(SelectConfig {
            placeholder: "Country".into(),
            ..SelectConfig::default()
        });
        assert_eq!(contents(&selection_spans(&select)), vec!["Country"]);

        assert!(select.select_value("de").is_ok());
        assert_eq!(contents(&selection_spans(&select)), vec!["Germany"]);
    }

    #[test]
    fn colored_tags() {
        let mut select = select(SelectConfig {
            multiple: true,
            custom_colored_tags: true,
            allow_clear: true,
            ..SelectConfig::default()
        });
        assert!(select.write_value(&json!(["fr", "de"])).is_ok());

        let spans = selection_spans(&select);

        assert_eq!(contents(&spans), vec![" France ", " ", " Germany ", " ×"]);
        assert_eq!(
            spans[0].1,
            Style::default()
                .bg(Color::Rgb(0x00, 0x55, 0xa4))
                .fg(Color::Rgb(0xff, 0xff, 0xff))
        );
        assert_eq!(
            spans[2].1,
            Style::default()
                .bg(Color::Rgb(0xff, 0xce, 0x00))
                .fg(Color::Rgb(0x00, 0x00, 0x00))
        );
    }

    #[test]
    fn status_prefers_notices() {
        let mut select = select(SelectConfig::default());
        assert_eq!(
            contents(&status_spans(&select)),
            vec!["3/3 shown, 0 selected"]
        );

        select.filter_input("zz");
        assert_eq!(contents(&status_spans(&select)), vec!["No results found"]);
    }

    #[test]
    fn filter_line_hidden_when_filtering_is_off() {
        let select = select(SelectConfig {
            no_filter: 5,
            ..SelectConfig::default()
        });

        assert!(filter_spans(&select).is_empty());
    }
}
