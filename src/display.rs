//! Status and elapsed-time readout surface.

use log::info;
use std::fmt;

/// Style category attached to a status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusStyle {
    Loading,
    Ready,
    Studying,
    Distracted,
    CameraError,
    Paused,
}

impl StatusStyle {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Studying => "studying",
            Self::Distracted => "distracted",
            Self::CameraError => "camera-error",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for StatusStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where status text and the `HH:MM:SS` readout are shown
pub trait StatusSurface: Send {
    /// Replace the status line
    fn show_status(&mut self, text: &str, style: StatusStyle);

    /// Replace the elapsed-time readout
    fn show_elapsed(&mut self, readout: &str);
}

/// Surface that reports through the `log` facade, only on change
#[derive(Debug, Default)]
pub struct LogDisplay {
    last_status: Option<(String, StatusStyle)>,
    last_readout: Option<String>,
}

impl LogDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last status shown
    #[must_use]
    pub fn status(&self) -> Option<(&str, StatusStyle)> {
        self.last_status.as_ref().map(|(text, style)| (text.as_str(), *style))
    }

    /// Last readout shown
    #[must_use]
    pub fn readout(&self) -> Option<&str> {
        self.last_readout.as_deref()
    }
}

impl StatusSurface for LogDisplay {
    fn show_status(&mut self, text: &str, style: StatusStyle) {
        let changed = self
            .last_status
            .as_ref()
            .map_or(true, |(last_text, last_style)| last_text != text || *last_style != style);
        if changed {
            info!("[{style}] {text}");
            self.last_status = Some((text.to_string(), style));
        }
    }

    fn show_elapsed(&mut self, readout: &str) {
        if self.last_readout.as_deref() != Some(readout) {
            info!("Elapsed {readout}");
            self.last_readout = Some(readout.to_string());
        }
    }
}
