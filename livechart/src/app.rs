//! LiveChart Iced application.

use std::time::Duration;

use iced::{Element, Subscription, Task, Theme};

use livechart_common::DEFAULT_WINDOW_SIZE;

use crate::config::ViewerConfig;
use crate::host::{ChartHost, HostError};
use crate::message::{ChartEvent, Message};
use crate::subscription::{DemoCharts, demo_subscription, zenoh_subscription};
use crate::view::dashboard::{ConnectionStatus, dashboard_view};

/// Startup settings for the application.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Viewer configuration (connection, charts, theme).
    pub config: ViewerConfig,
    /// Generate data locally instead of subscribing to Zenoh.
    pub demo: bool,
}

/// The main LiveChart application.
pub struct LiveChartApp {
    settings: Settings,
    /// Mounted charts.
    host: ChartHost,
    /// Header status.
    status: ConnectionStatus,
}

impl LiveChartApp {
    /// Boot the application (called by iced::application).
    ///
    /// Every configured chart is mounted up front.
    pub fn boot(settings: Settings) -> (Self, Task<Message>) {
        let mut status = ConnectionStatus {
            demo: settings.demo,
            ..ConnectionStatus::default()
        };

        let host = match ChartHost::from_configs(&settings.config.charts) {
            Ok(host) => host,
            Err(e) => {
                tracing::error!(error = %e, "Failed to mount charts");
                status.last_error = Some(e.to_string());
                ChartHost::new()
            }
        };

        tracing::info!(charts = host.len(), demo = settings.demo, "LiveChart started");

        let app = Self {
            settings,
            host,
            status,
        };

        (app, Task::none())
    }

    /// Get the window title.
    pub fn title(&self) -> String {
        match self.host.len() {
            0 => "LiveChart".to_string(),
            1 => "LiveChart - 1 chart".to_string(),
            n => format!("LiveChart - {} charts", n),
        }
    }

    /// Handle incoming messages.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::EventReceived(event) => {
                self.handle_event(event);
            }

            Message::Connected => {
                tracing::info!("Connected to event source");
                self.status.connected = true;
                self.status.last_error = None;
            }

            Message::Disconnected(error) => {
                tracing::warn!(error = %error, "Disconnected from Zenoh");
                self.status.connected = false;
                self.status.last_error = Some(error);
            }

            Message::CloseChart(id) => {
                if let Err(e) = self.host.unmount(&id) {
                    tracing::warn!(error = %e, "Failed to close chart");
                }
            }
        }

        Task::none()
    }

    /// Subscribe to Zenoh, or to generated data in demo mode.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.settings.demo {
            demo_subscription(DemoCharts {
                charts: self
                    .host
                    .iter()
                    .map(|(id, chart)| (id.to_string(), chart.config().clone()))
                    .collect(),
                window: DEFAULT_WINDOW_SIZE,
                interval: Duration::from_secs(1),
            })
        } else {
            zenoh_subscription(
                self.settings.config.zenoh.clone(),
                self.settings.config.key_prefix.clone(),
            )
        }
    }

    /// Render the view.
    pub fn view(&self) -> Element<'_, Message> {
        dashboard_view(&self.host, &self.status)
    }

    /// Get the application theme.
    pub fn theme(&self) -> Theme {
        self.settings.config.theme.to_iced_theme()
    }

    pub fn host(&self) -> &ChartHost {
        &self.host
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    /// Route an event to its chart.
    fn handle_event(&mut self, event: ChartEvent) {
        match self.host.dispatch(&event.chart, &event.event, &event.payload) {
            Ok(Some(outcome)) => {
                tracing::trace!(
                    chart = %event.chart,
                    updated = ?outcome.updated,
                    revision = outcome.revision,
                    "Applied update"
                );
            }
            Ok(None) => {}
            Err(HostError::UnknownChart(id)) => {
                tracing::debug!(chart = %id, "Dropping event for unmounted chart");
            }
            Err(e) => {
                self.status.rejected += 1;
                self.status.last_error = Some(e.to_string());
            }
        }
    }
}
