use impl_helper::ImplHelper;
use itertools::Itertools;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    Frame,
};

use wrap_context::{arg_context, liab};

pub trait Render {
    fn render(&mut self, frame: &mut Frame);
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum DirectionalConstraint {
    #[default]
    Undefined,
    Vertical(Constraint),
    Horizontal(Constraint),
}

/// Splits `area` along the direction shared by every constraint.
pub fn split_areas<const N: usize>(
    constraints: [DirectionalConstraint; N],
    area: Rect,
    flex: Flex,
) -> anyhow::Result<[Rect; N]> {
    let inner = constraints
        .iter()
        .filter_map(DirectionalConstraint::inner)
        .collect_vec();

    let areas = if constraints
        .iter()
        .all(|constraint| matches!(constraint, DirectionalConstraint::Vertical(_)))
    {
        Layout::vertical(inner).flex(flex).areas(area)
    } else if constraints
        .iter()
        .all(|constraint| matches!(constraint, DirectionalConstraint::Horizontal(_)))
    {
        Layout::horizontal(inner).flex(flex).areas(area)
    } else {
        liab!("Wrong type: {:?}", constraints);
    };

    anyhow::Ok(areas)
}

impl DirectionalConstraint {
    fn inner(&self) -> Option<Constraint> {
        match self {
            Self::Undefined => None,
            Self::Vertical(constraint) | Self::Horizontal(constraint) => Some(*constraint),
        }
    }
}

/// Keeps a view in step with its model: every change of the model rebuilds the view.
#[derive(Debug, Default, ImplHelper)]
pub struct ViewModel<V, M> {
    view: V,

    #[helper(get)]
    model: M,
}

impl<V, M> ViewModel<V, M>
where
    M: std::fmt::Debug,
    V: for<'a> From<&'a M>,
{
    pub fn with_model_mut<F>(&mut self, f: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut M) -> anyhow::Result<()>,
    {
        arg_context!(f(&mut self.model))?;
        self.view = V::from(&self.model);
        anyhow::Ok(())
    }

    #[must_use = "method moves the value of self and returns the modified value"]
    pub fn model_set(mut self, model: M) -> Self {
        self.model = model;
        self.view = V::from(&self.model);
        self
    }
}

impl<V, M> Render for ViewModel<V, M>
where
    V: Render,
{
    fn render(&mut self, frame: &mut Frame) {
        self.view.render(frame);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn vertical_split() {
        let areas = split_areas(
            [
                DirectionalConstraint::Vertical(Constraint::Length(1)),
                DirectionalConstraint::Vertical(Constraint::Min(0)),
            ],
            Rect::new(0, 0, 10, 5),
            Flex::Start,
        );

        assert_eq!(
            areas.ok(),
            Some([Rect::new(0, 0, 10, 1), Rect::new(0, 1, 10, 4)])
        );
    }

    #[test]
    fn mixed_directions_are_rejected() {
        let areas = split_areas(
            [
                DirectionalConstraint::Vertical(Constraint::Length(1)),
                DirectionalConstraint::Horizontal(Constraint::Min(0)),
            ],
            Rect::new(0, 0, 10, 5),
            Flex::Start,
        );

        assert!(areas.is_err());
    }
}
