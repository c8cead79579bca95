//! Toast notifications
//!
//! Each toast slides in shortly after it is shown, stays up for the display
//! period, slides back out and is removed once the slide-out finishes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::NotificationConfig;
use crate::surface::{ElementId, Surface};
use crate::timer::{TimerId, TimerQueue};
use crate::Result;

const HIDDEN_TRANSFORM: &str = "translateX(400px)";
const SHOWN_TRANSFORM: &str = "translateX(0)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Self::Info => "linear-gradient(135deg, #3b82f6, #2563eb)",
            Self::Success => "linear-gradient(135deg, #10b981, #059669)",
            Self::Error => "linear-gradient(135deg, #ef4444, #dc2626)",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastStep {
    SlideIn,
    SlideOut,
    Remove,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub element: ElementId,
    pub kind: ToastKind,
    pub message: String,
    timers: Vec<TimerId>,
}

#[derive(Debug)]
pub struct NotificationCenter {
    slide_in: Duration,
    display: Duration,
    fade: Duration,
    toasts: Vec<Toast>,
}

impl NotificationCenter {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            slide_in: Duration::from_millis(config.slide_in_ms),
            display: Duration::from_millis(config.display_ms),
            fade: Duration::from_millis(config.fade_ms),
            toasts: Vec::new(),
        }
    }

    /// Toasts currently on the surface, oldest first
    pub fn active(&self) -> &[Toast] {
        &self.toasts
    }

    /// Create a toast and schedule its lifecycle
    ///
    /// `task` builds the queue item for each lifecycle step.
    pub fn show<T, F>(
        &mut self,
        surface: &mut dyn Surface,
        queue: &mut TimerQueue<T>,
        kind: ToastKind,
        message: &str,
        task: F,
    ) -> Result<ElementId>
    where
        T: Clone,
        F: Fn(ElementId, ToastStep) -> T,
    {
        let class = format!("notification-{}", kind.as_str());
        let element = surface.create("div", &["notification", class.as_str()]);
        surface.set_text(element, message)?;
        surface.set_style(element, "transform", HIDDEN_TRANSFORM)?;
        surface.set_style(element, "transition", "transform 0.3s ease")?;
        surface.set_style(element, "background", kind.background())?;
        info!(kind = %kind, message, "Notification");

        let timers = vec![
            queue.set_timeout(self.slide_in, task(element, ToastStep::SlideIn)),
            queue.set_timeout(self.display, task(element, ToastStep::SlideOut)),
        ];
        self.toasts.push(Toast {
            element,
            kind,
            message: message.to_string(),
            timers,
        });
        Ok(element)
    }

    /// Run one lifecycle step for the toast at `element`
    pub fn run<T, F>(
        &mut self,
        element: ElementId,
        step: ToastStep,
        surface: &mut dyn Surface,
        queue: &mut TimerQueue<T>,
        task: F,
    ) -> Result<()>
    where
        T: Clone,
        F: Fn(ElementId, ToastStep) -> T,
    {
        let Some(index) = self.toasts.iter().position(|t| t.element == element) else {
            return Ok(());
        };
        match step {
            ToastStep::SlideIn => surface.set_style(element, "transform", SHOWN_TRANSFORM),
            ToastStep::SlideOut => {
                let id = queue.set_timeout(self.fade, task(element, ToastStep::Remove));
                let toast = &mut self.toasts[index];
                toast.timers.retain(|t| queue.is_active(*t));
                toast.timers.push(id);
                surface.set_style(element, "transform", HIDDEN_TRANSFORM)
            }
            ToastStep::Remove => {
                self.toasts.remove(index);
                if surface.is_attached(element) {
                    surface.remove(element)?;
                }
                Ok(())
            }
        }
    }

    /// Cancel every pending lifecycle timer
    pub fn teardown<T: Clone>(&mut self, queue: &mut TimerQueue<T>) {
        for toast in &mut self.toasts {
            for id in toast.timers.drain(..) {
                queue.cancel(id);
            }
        }
    }
}
