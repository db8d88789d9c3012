//! Dashboard view stacking every mounted chart.

use iced::widget::{Column, column, container, row, rule, scrollable, text};
use iced::{Alignment, Element, Length, Theme};

use crate::host::ChartHost;
use crate::message::Message;

use super::chart::chart_view;
use super::theme;

/// Connection and delivery status shown in the header.
#[derive(Debug, Clone, Default)]
pub struct ConnectionStatus {
    /// Whether the event source is connected.
    pub connected: bool,
    /// Feeding charts from generated data instead of Zenoh.
    pub demo: bool,
    /// Last connection or delivery error, if any.
    pub last_error: Option<String>,
    /// Updates refused by a chart since startup.
    pub rejected: u64,
}

/// Render the dashboard view.
pub fn dashboard_view<'a>(host: &'a ChartHost, status: &'a ConnectionStatus) -> Element<'a, Message> {
    let header = render_header(host, status);
    let charts = render_charts(host);

    let content = column![header, rule::horizontal(1), charts]
        .spacing(10)
        .padding(20);

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Render the header with connection status.
fn render_header<'a>(host: &'a ChartHost, status: &'a ConnectionStatus) -> Element<'a, Message> {
    let title = text("LiveChart").size(24);

    let chart_count = match host.len() {
        1 => "1 chart".to_string(),
        n => format!("{} charts", n),
    };

    let status_text = if status.demo {
        text("Demo mode").size(14).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).status_warning()),
        })
    } else if status.connected {
        text("Connected").size(14).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).status_connected()),
        })
    } else {
        text("Disconnected").size(14).style(|t: &Theme| text::Style {
            color: Some(theme::colors(t).status_disconnected()),
        })
    };

    let mut header_row = row![title, text(chart_count).size(14), status_text]
        .spacing(20)
        .align_y(Alignment::Center);

    if status.rejected > 0 {
        header_row = header_row.push(
            text(format!("{} rejected updates", status.rejected))
                .size(12)
                .style(|t: &Theme| text::Style {
                    color: Some(theme::colors(t).status_warning()),
                }),
        );
    }

    let mut header_col = Column::new().push(header_row);

    if let Some(ref error) = status.last_error {
        let error_text = text(format!("Error: {}", error))
            .size(12)
            .style(|t: &Theme| text::Style {
                color: Some(theme::colors(t).status_disconnected()),
            });
        header_col = header_col.push(error_text);
    }

    header_col.spacing(5).into()
}

/// Render the chart list.
fn render_charts(host: &ChartHost) -> Element<'_, Message> {
    if host.is_empty() {
        return container(text("No charts mounted").size(16))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into();
    }

    let mut charts = Column::new().spacing(16);
    for (id, chart) in host.iter() {
        charts = charts.push(chart_view(id, chart));
    }

    scrollable(charts)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
