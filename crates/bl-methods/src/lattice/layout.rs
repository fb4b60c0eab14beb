//! Drawing instructions for lattices.
//!
//! Plotting itself lives outside this crate. [`TreeLayout::build`] turns a
//! finished [`Lattice`] and an explicit [`RenderContext`] into coloured line
//! segments and node labels that any plotting backend can draw. The lattice
//! is only read.

use super::Lattice;
use bl_core::Real;

/// Vertical placement of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutMode {
    /// Height proportional to the node value.
    Real,
    /// Fixed spacing: up and down moves have the same height.
    #[default]
    Stylized,
}

/// Colours, figure size and layout mode handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderContext {
    /// Vertical placement.
    pub mode: LayoutMode,
    /// Colour of up-move edges.
    pub up_color: String,
    /// Colour of down-move edges.
    pub down_color: String,
    /// Colour of node labels.
    pub text_color: String,
    /// Figure width and height, in the renderer's units.
    pub figure_size: (Real, Real),
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Stylized,
            up_color: "cornflowerblue".into(),
            down_color: "salmon".into(),
            text_color: "black".into(),
            figure_size: (16.0, 8.0),
        }
    }
}

impl RenderContext {
    /// Set the layout mode.
    pub fn with_mode(mut self, mode: LayoutMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set edge colours.
    pub fn with_colors(mut self, up: impl Into<String>, down: impl Into<String>) -> Self {
        self.up_color = up.into();
        self.down_color = down.into();
        self
    }

    /// Set the label colour.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// Set the figure size.
    pub fn with_figure_size(mut self, width: Real, height: Real) -> Self {
        self.figure_size = (width, height);
        self
    }
}

/// Direction of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Move {
    /// `(i, j) → (i + 1, j)`.
    Up,
    /// `(i, j) → (i + 1, j + 1)`.
    Down,
}

/// An edge between two nodes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Start point `(x, y)`.
    pub from: (Real, Real),
    /// End point `(x, y)`.
    pub to: (Real, Real),
    /// Edge direction.
    pub direction: Move,
    /// Line colour.
    pub color: String,
}

/// A node value annotation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Label {
    /// Anchor point `(x, y)`.
    pub at: (Real, Real),
    /// Node value rounded to four decimals.
    pub text: String,
    /// Text colour.
    pub color: String,
}

/// Everything a renderer needs to draw one lattice.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeLayout {
    /// Figure width and height.
    pub figure_size: (Real, Real),
    /// Edges, two per non-terminal node.
    pub segments: Vec<Segment>,
    /// One label per node.
    pub labels: Vec<Label>,
}

/// Horizontal offset of a label from its node.
const LABEL_OFFSET: Real = 0.15;

impl TreeLayout {
    /// Lay out `lattice` according to `ctx`.
    pub fn build(lattice: &Lattice, ctx: &RenderContext) -> Self {
        let y = |step: usize, node: usize| match ctx.mode {
            LayoutMode::Real => lattice.value(step, node),
            LayoutMode::Stylized => 100.0 + 10.0 * step as Real - 20.0 * node as Real,
        };

        let mut segments = Vec::with_capacity(lattice.steps() * (lattice.steps() + 1));
        let mut labels = Vec::with_capacity(lattice.size() * (lattice.size() + 1) / 2);

        for (step, node, value) in lattice.nodes() {
            let here = (step as Real, y(step, node));
            if step < lattice.steps() {
                let x_next = (step + 1) as Real;
                segments.push(Segment {
                    from: here,
                    to: (x_next, y(step + 1, node + 1)),
                    direction: Move::Down,
                    color: ctx.down_color.clone(),
                });
                segments.push(Segment {
                    from: here,
                    to: (x_next, y(step + 1, node)),
                    direction: Move::Up,
                    color: ctx.up_color.clone(),
                });
            }
            labels.push(Label {
                at: (here.0 - LABEL_OFFSET, here.1),
                text: format_value(value),
                color: ctx.text_color.clone(),
            });
        }

        Self {
            figure_size: ctx.figure_size,
            segments,
            labels,
        }
    }
}

fn format_value(value: Real) -> String {
    let rounded = (value * 1e4).round() / 1e4;
    format!("{rounded}")
}
