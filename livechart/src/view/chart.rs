//! Multi-series line chart drawn on an Iced canvas.

use iced::mouse;
use iced::widget::canvas::{self, Canvas, Frame, Geometry, Path, Stroke, Text};
use iced::widget::{Column, Row, button, column, container, row, text};
use iced::{Alignment, Element, Length, Point, Rectangle, Renderer, Size, Theme};

use crate::config::{AxisSide, ChartConfig};
use crate::data::ChartData;
use crate::message::Message;
use crate::scale::{ValueRange, XScale, scale_ranges, x_tick_slots};
use crate::widget::{LegendEntry, LiveChart};

use super::formatting::format_label;
use super::theme::{self, series_color};

/// Default gutter width for a Y axis.
const AXIS_SIZE: f32 = 50.0;
/// Padding on sides without an axis.
const EDGE_PADDING: f32 = 10.0;
/// Room below the plot for X labels.
const X_LABEL_HEIGHT: f32 = 24.0;
/// Horizontal tick intervals per Y axis.
const Y_DIVISIONS: usize = 4;
/// Minimum horizontal room per X label.
const X_LABEL_SPACING: f32 = 80.0;

/// Where one configured axis is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPlacement {
    /// Index into the chart's axes.
    pub axis: usize,
    pub side: AxisSide,
    /// Left edge of the axis gutter.
    pub x: f32,
    pub width: f32,
}

/// Plot area plus axis gutters for a given canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLayout {
    pub plot: Rectangle,
    pub axes: Vec<AxisPlacement>,
}

impl PlotLayout {
    /// Left axes stack outward from the left edge, right axes from the plot's right edge.
    pub fn compute(config: &ChartConfig, size: Size) -> Self {
        let gutter = |side: AxisSide| -> f32 {
            config
                .axes
                .iter()
                .filter(|a| a.side == side)
                .map(|a| a.size.unwrap_or(AXIS_SIZE))
                .sum()
        };

        let left = gutter(AxisSide::Left).max(EDGE_PADDING);
        let right = gutter(AxisSide::Right).max(EDGE_PADDING);

        let plot = Rectangle {
            x: left,
            y: EDGE_PADDING,
            width: (size.width - left - right).max(0.0),
            height: (size.height - EDGE_PADDING - X_LABEL_HEIGHT).max(0.0),
        };

        let mut axes = Vec::with_capacity(config.axes.len());
        let mut left_x = 0.0;
        let mut right_x = plot.x + plot.width;

        for (index, axis) in config.axes.iter().enumerate() {
            let width = axis.size.unwrap_or(AXIS_SIZE);
            let x = match axis.side {
                AxisSide::Left => {
                    let x = left_x;
                    left_x += width;
                    x
                }
                AxisSide::Right => {
                    let x = right_x;
                    right_x += width;
                    x
                }
            };
            axes.push(AxisPlacement {
                axis: index,
                side: axis.side,
                x,
                width,
            });
        }

        Self { plot, axes }
    }

    /// Vertical pixel for a value in a range, clamped to the plot.
    pub fn y_for(&self, range: &ValueRange, value: f64) -> f32 {
        let t = range.normalize(value).clamp(0.0, 1.0) as f32;
        self.plot.y + self.plot.height * (1.0 - t)
    }

    /// Horizontal pixel for a label slot.
    pub fn x_for(&self, x_scale: &XScale, slot: usize, label: &livechart_common::Label) -> f32 {
        self.plot.x + self.plot.width * x_scale.position(slot, label) as f32
    }
}

/// Polyline runs for one series; gaps split the line.
pub fn series_segments(
    layout: &PlotLayout,
    data: &ChartData,
    series: usize,
    x_scale: &XScale,
    range: &ValueRange,
) -> Vec<Vec<Point>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for (slot, (label, sample)) in data.labels().iter().zip(data.aligned(series)).enumerate() {
        match sample.filter(|v| v.is_finite()) {
            Some(value) => current.push(Point::new(
                layout.x_for(x_scale, slot, label),
                layout.y_for(range, value),
            )),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Canvas program for a mounted [`LiveChart`].
pub struct ChartCanvas<'a> {
    chart: &'a LiveChart,
}

impl<'a> ChartCanvas<'a> {
    pub fn new(chart: &'a LiveChart) -> Self {
        Self { chart }
    }
}

impl<'a> canvas::Program<Message> for ChartCanvas<'a> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let (Some(cache), Some(data)) = (self.chart.cache(), self.chart.data()) else {
            return Vec::new();
        };

        let geometry = cache.draw(renderer, bounds.size(), |frame| {
            draw_chart(frame, bounds.size(), theme, self.chart.config(), data);
        });

        vec![geometry]
    }
}

fn draw_chart(frame: &mut Frame, size: Size, theme: &Theme, config: &ChartConfig, data: &ChartData) {
    let colors = theme::colors(theme);
    let layout = PlotLayout::compute(config, size);

    frame.fill(
        &Path::rectangle(Point::ORIGIN, size),
        colors.chart_outer_background(),
    );

    if layout.plot.width <= 0.0 || layout.plot.height <= 0.0 {
        return;
    }

    frame.fill(
        &Path::rectangle(layout.plot.position(), layout.plot.size()),
        colors.chart_background(),
    );

    let ranges = scale_ranges(config, data);

    draw_y_axes(frame, &layout, config, &ranges, theme);

    if data.is_empty() {
        let no_data = Text {
            content: "No data".to_string(),
            position: Point::new(
                layout.plot.center_x() - 30.0,
                layout.plot.center_y() - 8.0,
            ),
            color: colors.text_dimmed(),
            size: 16.0.into(),
            ..Text::default()
        };
        frame.fill_text(no_data);
        return;
    }

    let x_scale = XScale::for_labels(data.labels());
    draw_x_axis(frame, &layout, data, &x_scale, config, theme);

    for (index, series) in config.series.iter().enumerate() {
        let Some(range) = ranges.get(&series.scale) else {
            continue;
        };
        let color = series_color(&series.color);

        for segment in series_segments(&layout, data, index, &x_scale, range) {
            if let [point] = segment.as_slice() {
                frame.fill(&Path::circle(*point, series.width.max(1.5)), color);
                continue;
            }

            let mut builder = canvas::path::Builder::new();
            for (i, point) in segment.iter().enumerate() {
                if i == 0 {
                    builder.move_to(*point);
                } else {
                    builder.line_to(*point);
                }
            }
            frame.stroke(
                &builder.build(),
                Stroke::default().with_color(color).with_width(series.width),
            );
        }
    }
}

fn draw_y_axes(
    frame: &mut Frame,
    layout: &PlotLayout,
    config: &ChartConfig,
    ranges: &std::collections::BTreeMap<String, ValueRange>,
    theme: &Theme,
) {
    let colors = theme::colors(theme);
    let plot = layout.plot;

    for placement in &layout.axes {
        let axis = &config.axes[placement.axis];
        let Some(range) = ranges.get(&axis.scale) else {
            continue;
        };

        let edge_x = match placement.side {
            AxisSide::Left => placement.x + placement.width,
            AxisSide::Right => placement.x,
        };
        frame.stroke(
            &Path::line(Point::new(edge_x, plot.y), Point::new(edge_x, plot.y + plot.height)),
            Stroke::default().with_color(colors.chart_label()).with_width(1.0),
        );

        for value in range.ticks(Y_DIVISIONS) {
            let y = layout.y_for(range, value);

            if axis.grid {
                frame.stroke(
                    &Path::line(Point::new(plot.x, y), Point::new(plot.x + plot.width, y)),
                    Stroke::default().with_color(colors.chart_grid()).with_width(1.0),
                );
            }

            let label_x = match placement.side {
                AxisSide::Left => placement.x + 4.0,
                AxisSide::Right => placement.x + 6.0,
            };
            frame.fill_text(Text {
                content: axis.format.format_tick(value),
                position: Point::new(label_x, y - 6.0),
                color: colors.chart_label(),
                size: 10.0.into(),
                ..Text::default()
            });
        }
    }
}

fn draw_x_axis(
    frame: &mut Frame,
    layout: &PlotLayout,
    data: &ChartData,
    x_scale: &XScale,
    config: &ChartConfig,
    theme: &Theme,
) {
    let colors = theme::colors(theme);
    let plot = layout.plot;
    let bottom = plot.y + plot.height;
    let max_ticks = ((plot.width / X_LABEL_SPACING) as usize).max(1);

    for slot in x_tick_slots(data.point_count(), max_ticks) {
        let label = &data.labels()[slot];
        let x = layout.x_for(x_scale, slot, label);

        frame.stroke(
            &Path::line(Point::new(x, bottom), Point::new(x, bottom + 4.0)),
            Stroke::default().with_color(colors.chart_label()).with_width(1.0),
        );
        frame.fill_text(Text {
            content: format_label(label, config.time_unit),
            position: Point::new(x - 22.0, bottom + 6.0),
            color: colors.chart_label(),
            size: 10.0.into(),
            ..Text::default()
        });
    }
}

/// Size the plot is drawn at: the mounted surface, else the configured size.
///
/// The width is an upper bound; the card shrinks with the window.
pub fn plot_size(chart: &LiveChart) -> Size {
    chart.surface().map_or_else(
        || Size::new(chart.config().width, chart.config().height),
        |surface| Size::new(surface.width, surface.height),
    )
}

/// Render one chart card: title bar, canvas and legend.
pub fn chart_view<'a>(id: &str, chart: &'a LiveChart) -> Element<'a, Message> {
    let title = container(text(chart.title().to_string()).size(16)).width(Length::Fill);
    let close = button(text("Close").size(12))
        .on_press(Message::CloseChart(id.to_string()))
        .style(iced::widget::button::secondary);

    let header = row![title, close].spacing(10).align_y(Alignment::Center);

    let size = plot_size(chart);
    let plot = Canvas::new(ChartCanvas::new(chart))
        .width(Length::Fill)
        .height(Length::Fixed(size.height));

    let content = column![header, plot, legend_view(chart.legend())].spacing(8);

    container(content)
        .padding(12)
        .width(Length::Fill)
        .max_width(size.width)
        .style(|t: &Theme| container::Style {
            background: Some(iced::Background::Color(theme::colors(t).card_background())),
            border: iced::Border {
                color: theme::colors(t).border(),
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        })
        .into()
}

/// Legend row: a color swatch, the series label and its latest value.
fn legend_view<'a>(entries: Vec<LegendEntry>) -> Element<'a, Message> {
    let mut legend = Row::new().spacing(20).align_y(Alignment::Center);

    for entry in entries {
        let color = series_color(&entry.color);
        let swatch = container(text(""))
            .width(Length::Fixed(12.0))
            .height(Length::Fixed(12.0))
            .style(move |_theme: &Theme| container::Style {
                background: Some(iced::Background::Color(color)),
                ..Default::default()
            });

        let label = text(entry.label).size(12);
        let value = text(entry.value).size(12).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).text_muted()),
        });

        legend = legend.push(row![swatch, label, value].spacing(6).align_y(Alignment::Center));
    }

    Column::new().push(legend).into()
}
