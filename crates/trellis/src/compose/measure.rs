//! Bottom-up sizing of regions and the nodes that own them.
//!
//! Every container (the root region or a node) is sized from its label and
//! its child grid. Children are positioned in the container's local,
//! unscaled coordinates; placement applies the accumulated scales later.

use log::debug;
use trellis_core::{
    draw::{StyledText, TextMeasure},
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    geometry::{Border, Bounds, Point, Size},
    ir::{Config, Gutter, Node, Region, TrackSize},
    span::Span,
};

use crate::{
    CancellationToken, TrellisError,
    compose::grid::{Grid, assign_cells},
};

/// A sized container.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Frame {
    /// Unscaled size, padding included.
    pub local: Size,
    /// The container's own scale factor.
    pub scale: f32,
    /// Label bounds in local units.
    pub label: Option<Bounds>,
    /// One frame per node of the region, in declaration order.
    pub children: Vec<ChildFrame>,
}

impl Frame {
    /// Size as seen by the parent grid.
    pub fn outer(&self) -> Size {
        self.local.scale(self.scale)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChildFrame {
    /// Top-left corner in the parent's local units.
    pub top_left: Point,
    pub frame: Frame,
}

/// Sizing values of a container after validation.
struct Settings {
    padding: Border,
    gutter: Gutter,
    rows: TrackSize,
    columns: TrackSize,
    scale: f32,
    min_size: Size,
}

pub(crate) struct Measurer<'a, 'd> {
    measure: &'a dyn TextMeasure,
    label_spacing: f32,
    cancel: &'a CancellationToken,
    diagnostics: &'d mut DiagnosticCollector,
}

impl<'a, 'd> Measurer<'a, 'd> {
    pub fn new(
        measure: &'a dyn TextMeasure,
        label_spacing: f32,
        cancel: &'a CancellationToken,
        diagnostics: &'d mut DiagnosticCollector,
    ) -> Self {
        Self {
            measure,
            label_spacing: label_spacing.max(0.0),
            cancel,
            diagnostics,
        }
    }

    /// Sizes a container and, recursively, everything inside it.
    ///
    /// `span` locates the owning node; the root region has none.
    pub fn frame(
        &mut self,
        config: &Config,
        region: &Region,
        span: Option<Span>,
    ) -> Result<Frame, TrellisError> {
        let settings = self.settings(config, span);

        let nodes: Vec<&Node> = region.nodes().collect();
        let mut frames = Vec::with_capacity(nodes.len());
        for node in &nodes {
            self.cancel.check()?;
            frames.push(self.frame(node.config(), node.region(), Some(node.span()))?);
        }

        let outer: Vec<Size> = frames.iter().map(Frame::outer).collect();
        let cells = assign_cells(
            nodes
                .iter()
                .map(|node| (node.config().row(), node.config().column())),
        );
        let grid = Grid::new(
            cells,
            &outer,
            settings.rows,
            settings.columns,
            settings.gutter,
        );
        self.report_shared_cells(&nodes, &grid);

        let label = config.label().map(|text| {
            self.measure
                .measure(&StyledText::new(text, config.text().clone()))
        });
        let grid_size = grid.size();
        let inner = match (label, nodes.is_empty()) {
            (Some(label), false) => label.stack_vertical(grid_size, self.label_spacing),
            (Some(label), true) => label,
            (None, false) => grid_size,
            (None, true) => Size::default(),
        };
        let local = inner
            .add_border(settings.padding)
            .max(settings.min_size);

        // Space added by the minimum size is split evenly around the content.
        let padding = settings.padding;
        let content_origin = padding.offset().add_point(Point::new(
            (local.width() - padding.horizontal_sum() - inner.width()) / 2.0,
            (local.height() - padding.vertical_sum() - inner.height()) / 2.0,
        ));
        let label_bounds = label.map(|size| {
            let x = (inner.width() - size.width()) / 2.0;
            Bounds::new_from_top_left(content_origin.add_point(Point::new(x, 0.0)), size)
        });
        let grid_top = label.map_or(0.0, |size| size.height() + self.label_spacing);
        let grid_origin = content_origin.add_point(Point::new(
            (inner.width() - grid_size.width()) / 2.0,
            grid_top,
        ));

        let children = frames
            .into_iter()
            .zip(&nodes)
            .enumerate()
            .map(|(index, (frame, node))| {
                let cell = grid.cell_bounds(index);
                let outer = frame.outer();
                let alignment = node.config().alignment();
                let top_left = grid_origin.add_point(cell.min_point()).add_point(Point::new(
                    alignment.horizontal().offset(cell.width() - outer.width()),
                    alignment.vertical().offset(cell.height() - outer.height()),
                ));
                ChildFrame { top_left, frame }
            })
            .collect();

        let (rows, columns) = grid.dimensions();
        debug!(
            nodes = nodes.len(),
            rows,
            columns,
            width = local.width(),
            height = local.height();
            "Sized container"
        );

        Ok(Frame {
            local,
            scale: settings.scale,
            label: label_bounds,
            children,
        })
    }

    /// Validates the sizing values of `config`, reporting E300 and falling
    /// back to a safe default for each invalid one.
    fn settings(&mut self, config: &Config, span: Option<Span>) -> Settings {
        let mut problems: Vec<String> = Vec::new();

        let padding = config.padding();
        let padding = if padding.is_valid() {
            padding
        } else {
            problems.push("padding must be finite and non-negative".to_string());
            padding.clamped()
        };

        let gutter = if config.gutter().is_valid() {
            config.gutter()
        } else {
            problems.push("gutter must be finite and non-negative".to_string());
            Gutter::default()
        };

        let mut track = |mode: TrackSize, axis: &str| {
            if mode.is_valid() {
                mode
            } else {
                problems.push(format!("{axis} track size must be finite and non-negative"));
                TrackSize::Packed
            }
        };
        let rows = track(config.rows(), "row");
        let columns = track(config.columns(), "column");

        let scale = config.scale();
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            problems.push(format!("scale must be positive, found {scale}"));
            1.0
        };

        let min_size = if config.min_size().is_valid() {
            config.min_size()
        } else {
            problems.push("minimum size must be finite and non-negative".to_string());
            Size::default()
        };

        for problem in problems {
            let mut diag = Diagnostic::error(format!("region cannot be sized: {problem}"))
                .with_code(ErrorCode::E300)
                .with_help("the default value is used instead");
            if let Some(span) = span {
                diag = diag.with_label(span, "in this node");
            }
            self.diagnostics.emit(diag);
        }

        Settings {
            padding,
            gutter,
            rows,
            columns,
            scale,
            min_size,
        }
    }

    fn report_shared_cells(&mut self, nodes: &[&Node], grid: &Grid) {
        for (later, earlier) in grid.shared_cells() {
            let cell = grid.cells()[later];
            self.diagnostics.emit(
                Diagnostic::warning(format!(
                    "`{}` shares grid cell ({}, {}) with `{}`",
                    nodes[later].display_name(),
                    cell.row,
                    cell.column,
                    nodes[earlier].display_name()
                ))
                .with_code(ErrorCode::W402)
                .with_label(nodes[later].span(), "placed here")
                .with_secondary_label(nodes[earlier].span(), "cell already taken"),
            );
        }
    }
}
