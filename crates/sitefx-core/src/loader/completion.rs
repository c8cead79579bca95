use std::time::Duration;

use tracing::{debug, warn};

use crate::config::LoaderConfig;
use crate::surface::{classes, ElementId, Surface};
use crate::Result;

/// Follow-up stages of the exit sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionTask {
    Fade,
    Remove,
    EnterMain,
    EnterNav,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStage {
    Idle,
    Exiting,
    Fading,
    Removed,
}

/// A stage to run after a delay
pub type Followup = (Duration, CompletionTask);

#[derive(Debug, Clone, Copy)]
pub struct CompletionTimings {
    pub exit: Duration,
    pub fade: Duration,
    pub main_entrance: Duration,
    pub nav_entrance: Duration,
}

impl From<&LoaderConfig> for CompletionTimings {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            exit: Duration::from_millis(config.exit_delay_ms),
            fade: Duration::from_millis(config.fade_delay_ms),
            main_entrance: Duration::from_millis(config.main_entrance_delay_ms),
            nav_entrance: Duration::from_millis(config.nav_entrance_delay_ms),
        }
    }
}

/// Scripted exit of the loader overlay and staggered entrance of the page
///
/// Every stage runs at most once and only in order; surface failures are
/// logged and never stall the sequence.
#[derive(Debug)]
pub struct CompletionCoordinator {
    loader: Option<ElementId>,
    main: Option<ElementId>,
    navbar: Option<ElementId>,
    timings: CompletionTimings,
    stage: CompletionStage,
    main_entered: bool,
    nav_entered: bool,
    ignored_triggers: u32,
}

impl CompletionCoordinator {
    pub fn new(
        loader: Option<ElementId>,
        main: Option<ElementId>,
        navbar: Option<ElementId>,
        timings: CompletionTimings,
    ) -> Self {
        Self {
            loader,
            main,
            navbar,
            timings,
            stage: CompletionStage::Idle,
            main_entered: false,
            nav_entered: false,
            ignored_triggers: 0,
        }
    }

    pub fn stage(&self) -> CompletionStage {
        self.stage
    }

    pub fn has_fired(&self) -> bool {
        self.stage != CompletionStage::Idle
    }

    /// Triggers that arrived after the first one
    pub fn ignored_triggers(&self) -> u32 {
        self.ignored_triggers
    }

    pub fn is_content_revealed(&self) -> bool {
        self.stage == CompletionStage::Removed
    }

    pub fn entrance_done(&self) -> bool {
        (self.main_entered || self.main.is_none()) && (self.nav_entered || self.navbar.is_none())
    }

    /// Begin the exit sequence; later calls are no-ops
    pub fn trigger(&mut self, surface: &mut dyn Surface) -> Vec<Followup> {
        if self.stage != CompletionStage::Idle {
            self.ignored_triggers += 1;
            warn!(stage = ?self.stage, "Completion already triggered, ignoring");
            return Vec::new();
        }
        self.stage = CompletionStage::Exiting;
        debug!("Loader exit sequence started");

        if let Some(loader) = self.loader {
            log_failure(
                "exit transform",
                apply_styles(
                    surface,
                    loader,
                    &[
                        ("animation", "loaderComplete 1s ease-in-out forwards"),
                        ("transform", "scale(1.1)"),
                        ("opacity", "0.7"),
                    ],
                ),
            );
        }
        vec![(self.timings.exit, CompletionTask::Fade)]
    }

    /// Run one follow-up stage, returning the stages it schedules
    pub fn run(&mut self, task: CompletionTask, surface: &mut dyn Surface) -> Vec<Followup> {
        match task {
            CompletionTask::Fade => {
                if self.stage != CompletionStage::Exiting {
                    return Vec::new();
                }
                self.stage = CompletionStage::Fading;
                if let Some(loader) = self.loader {
                    log_failure("fade", surface.set_class(loader, classes::FADE_OUT, true));
                }
                vec![(self.timings.fade, CompletionTask::Remove)]
            }
            CompletionTask::Remove => {
                if self.stage != CompletionStage::Fading {
                    return Vec::new();
                }
                self.stage = CompletionStage::Removed;
                if let Some(loader) = self.loader.filter(|id| surface.is_attached(*id)) {
                    log_failure("remove", surface.remove(loader));
                }
                debug!("Loader removed");

                if let Some(main) = self.main {
                    log_failure(
                        "hide main content",
                        apply_styles(surface, main, &[("opacity", "0"), ("transform", "translateY(30px)")]),
                    );
                }
                if let Some(navbar) = self.navbar {
                    log_failure(
                        "hide navbar",
                        apply_styles(surface, navbar, &[("opacity", "0"), ("transform", "translateY(-100%)")]),
                    );
                }
                vec![
                    (self.timings.main_entrance, CompletionTask::EnterMain),
                    (self.timings.nav_entrance, CompletionTask::EnterNav),
                ]
            }
            CompletionTask::EnterMain => {
                if self.stage != CompletionStage::Removed || self.main_entered {
                    return Vec::new();
                }
                self.main_entered = true;
                if let Some(main) = self.main {
                    log_failure("enter main content", enter(surface, main, "all 1s ease-out"));
                }
                Vec::new()
            }
            CompletionTask::EnterNav => {
                if self.stage != CompletionStage::Removed || self.nav_entered {
                    return Vec::new();
                }
                self.nav_entered = true;
                if let Some(navbar) = self.navbar {
                    log_failure("enter navbar", enter(surface, navbar, "all 0.8s ease-out"));
                }
                Vec::new()
            }
        }
    }
}

fn apply_styles(surface: &mut dyn Surface, id: ElementId, styles: &[(&str, &str)]) -> Result<()> {
    for (property, value) in styles {
        surface.set_style(id, property, value)?;
    }
    Ok(())
}

fn enter(surface: &mut dyn Surface, id: ElementId, transition: &str) -> Result<()> {
    apply_styles(
        surface,
        id,
        &[("transition", transition), ("opacity", "1"), ("transform", "translateY(0)")],
    )
}

fn log_failure(stage: &str, result: Result<()>) {
    if let Err(e) = result {
        warn!(stage, error = %e, "Completion stage could not update the surface");
    }
}
