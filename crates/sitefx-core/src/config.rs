use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub particles: ParticleConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub form: FormConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (logs for the terminal preview)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Staged loader timings and content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Progress simulator tick period
    #[serde(default = "default_progress_tick")]
    pub progress_tick_ms: u64,
    /// Smallest increment added per tick, must be > 0
    #[serde(default = "default_increment_min")]
    pub increment_min: f64,
    /// Largest increment added per tick
    #[serde(default = "default_increment_max")]
    pub increment_max: f64,
    /// Seed for the increment generator (random when unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Indicator never moves past this percentage of its track
    #[serde(default = "default_indicator_max")]
    pub indicator_max: f64,
    /// Delay between reaching 100% and the exit sequence
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_highlight_period")]
    pub highlight_period_ms: u64,
    #[serde(default = "default_message_period")]
    pub message_period_ms: u64,
    #[serde(default = "default_messages")]
    pub messages: Vec<String>,
    #[serde(default = "default_completion_message")]
    pub completion_message: String,
    /// Exit transform to fade-out
    #[serde(default = "default_exit_delay")]
    pub exit_delay_ms: u64,
    /// Fade-out to removal
    #[serde(default = "default_fade_delay")]
    pub fade_delay_ms: u64,
    #[serde(default = "default_main_entrance_delay")]
    pub main_entrance_delay_ms: u64,
    #[serde(default = "default_nav_entrance_delay")]
    pub nav_entrance_delay_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            progress_tick_ms: default_progress_tick(),
            increment_min: default_increment_min(),
            increment_max: default_increment_max(),
            seed: None,
            indicator_max: default_indicator_max(),
            settle_delay_ms: default_settle_delay(),
            highlight_period_ms: default_highlight_period(),
            message_period_ms: default_message_period(),
            messages: default_messages(),
            completion_message: default_completion_message(),
            exit_delay_ms: default_exit_delay(),
            fade_delay_ms: default_fade_delay(),
            main_entrance_delay_ms: default_main_entrance_delay(),
            nav_entrance_delay_ms: default_nav_entrance_delay(),
        }
    }
}

/// Scroll-driven effects: reveal, parallax, navbar state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    /// Element reveals once its top is this many pixels above the viewport bottom
    #[serde(default = "default_reveal_threshold")]
    pub reveal_threshold_px: f64,
    #[serde(default = "default_parallax_speed")]
    pub default_parallax_speed: f64,
    /// Reveal + parallax pass
    #[serde(default = "default_scroll_throttle")]
    pub scroll_throttle_ms: u64,
    #[serde(default = "default_parallax_throttle")]
    pub parallax_throttle_ms: u64,
    #[serde(default = "default_navbar_throttle")]
    pub navbar_throttle_ms: u64,
    #[serde(default = "default_nav_link_throttle")]
    pub nav_link_throttle_ms: u64,
    #[serde(default = "default_scroll_top_throttle")]
    pub scroll_top_throttle_ms: u64,
    #[serde(default = "default_resize_debounce")]
    pub resize_debounce_ms: u64,
    /// Navbar gets its `scrolled` flag past this offset
    #[serde(default = "default_navbar_scrolled_at")]
    pub navbar_scrolled_at: f64,
    /// Scroll-to-top button shows past this offset
    #[serde(default = "default_scroll_top_visible_at")]
    pub scroll_top_visible_at: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            reveal_threshold_px: default_reveal_threshold(),
            default_parallax_speed: default_parallax_speed(),
            scroll_throttle_ms: default_scroll_throttle(),
            parallax_throttle_ms: default_parallax_throttle(),
            navbar_throttle_ms: default_navbar_throttle(),
            nav_link_throttle_ms: default_nav_link_throttle(),
            scroll_top_throttle_ms: default_scroll_top_throttle(),
            resize_debounce_ms: default_resize_debounce(),
            navbar_scrolled_at: default_navbar_scrolled_at(),
            scroll_top_visible_at: default_scroll_top_visible_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    #[serde(default = "default_counter_duration")]
    pub duration_ms: u64,
    #[serde(default = "default_counter_step")]
    pub step_ms: u64,
    /// Fraction of the element that must be visible (0.0-1.0)
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_counter_duration(),
            step_ms: default_counter_step(),
            visibility_threshold: default_visibility_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleConfig {
    #[serde(default = "default_particle_count")]
    pub count: usize,
    /// Max velocity per axis, pixels per nominal frame
    #[serde(default = "default_particle_speed")]
    pub max_speed: f64,
    #[serde(default = "default_radius_min")]
    pub radius_min: f64,
    #[serde(default = "default_radius_max")]
    pub radius_max: f64,
    #[serde(default = "default_opacity_min")]
    pub opacity_min: f64,
    #[serde(default = "default_opacity_max")]
    pub opacity_max: f64,
    #[serde(default = "default_particle_color")]
    pub color: String,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: default_particle_count(),
            max_speed: default_particle_speed(),
            radius_min: default_radius_min(),
            radius_max: default_radius_max(),
            opacity_min: default_opacity_min(),
            opacity_max: default_opacity_max(),
            color: default_particle_color(),
        }
    }
}

/// Easing curve used by smooth scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    Linear,
    #[default]
    EaseInOutQuad,
}

/// Highest display refresh rate `scroll.animation_fps` accepts
pub const MAX_ANIMATION_FPS: u32 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate nav-link and scroll-to-top jumps
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Display refresh rate the frame loop targets
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_toast_display")]
    pub display_ms: u64,
    #[serde(default = "default_toast_slide_in")]
    pub slide_in_ms: u64,
    #[serde(default = "default_toast_fade")]
    pub fade_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            display_ms: default_toast_display(),
            slide_in_ms: default_toast_slide_in(),
            fade_ms: default_toast_fade(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Simulated submission latency
    #[serde(default = "default_submit_delay")]
    pub submit_delay_ms: u64,
    #[serde(default = "default_sending_label")]
    pub sending_label: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: default_submit_delay(),
            sending_label: default_sending_label(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Page pixels per terminal row
    #[serde(default = "default_px_per_row")]
    pub px_per_row: f64,
    #[serde(default = "default_px_per_col")]
    pub px_per_col: f64,
    /// Pixels scrolled per key press
    #[serde(default = "default_scroll_step")]
    pub scroll_step_px: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            px_per_row: default_px_per_row(),
            px_per_col: default_px_per_col(),
            scroll_step_px: default_scroll_step(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sitefx")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_progress_tick() -> u64 {
    150
}

fn default_increment_min() -> f64 {
    1.0
}

fn default_increment_max() -> f64 {
    4.0
}

fn default_indicator_max() -> f64 {
    95.0
}

fn default_settle_delay() -> u64 {
    800
}

fn default_highlight_period() -> u64 {
    1200
}

fn default_message_period() -> u64 {
    1000
}

fn default_messages() -> Vec<String> {
    [
        "Preparing construction site...",
        "Loading building materials...",
        "Setting up construction equipment...",
        "Assembling professional team...",
        "Reviewing building plans...",
        "Quality checking processes...",
        "Finalizing project details...",
        "Ready to build excellence...",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_completion_message() -> String {
    "Welcome to Ozin Group Limited!".to_string()
}

fn default_exit_delay() -> u64 {
    500
}

fn default_fade_delay() -> u64 {
    800
}

fn default_main_entrance_delay() -> u64 {
    100
}

fn default_nav_entrance_delay() -> u64 {
    300
}

fn default_reveal_threshold() -> f64 {
    100.0
}

fn default_parallax_speed() -> f64 {
    0.5
}

fn default_scroll_throttle() -> u64 {
    20
}

fn default_parallax_throttle() -> u64 {
    10
}

fn default_navbar_throttle() -> u64 {
    10
}

fn default_nav_link_throttle() -> u64 {
    100
}

fn default_scroll_top_throttle() -> u64 {
    100
}

fn default_resize_debounce() -> u64 {
    250
}

fn default_navbar_scrolled_at() -> f64 {
    50.0
}

fn default_scroll_top_visible_at() -> f64 {
    300.0
}

fn default_counter_duration() -> u64 {
    2000
}

fn default_counter_step() -> u64 {
    16
}

fn default_visibility_threshold() -> f64 {
    0.7
}

fn default_particle_count() -> usize {
    50
}

fn default_particle_speed() -> f64 {
    0.25
}

fn default_radius_min() -> f64 {
    1.0
}

fn default_radius_max() -> f64 {
    4.0
}

fn default_opacity_min() -> f64 {
    0.2
}

fn default_opacity_max() -> f64 {
    0.7
}

fn default_particle_color() -> String {
    "#d69e2e".to_string()
}

fn default_scroll_duration() -> u64 {
    800
}

fn default_animation_fps() -> u32 {
    60
}

fn default_toast_display() -> u64 {
    5000
}

fn default_toast_slide_in() -> u64 {
    100
}

fn default_toast_fade() -> u64 {
    300
}

fn default_submit_delay() -> u64 {
    2000
}

fn default_sending_label() -> String {
    "Sending...".to_string()
}

fn default_px_per_row() -> f64 {
    20.0
}

fn default_px_per_col() -> f64 {
    8.0
}

fn default_scroll_step() -> f64 {
    60.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when absent
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Reject values that would stall or break the sequencing engine
    pub fn validate(&self) -> crate::Result<()> {
        let loader = &self.loader;
        if !(loader.increment_min > 0.0) || !loader.increment_min.is_finite() {
            return Err(crate::Error::Config(format!(
                "loader.increment_min must be a positive number, got {}",
                loader.increment_min
            )));
        }
        if !(loader.increment_max >= loader.increment_min) || !loader.increment_max.is_finite() {
            return Err(crate::Error::Config(format!(
                "loader.increment_max ({}) must be >= increment_min ({})",
                loader.increment_max, loader.increment_min
            )));
        }
        if loader.progress_tick_ms == 0
            || loader.highlight_period_ms == 0
            || loader.message_period_ms == 0
        {
            return Err(crate::Error::Config(
                "loader timer periods must be non-zero".to_string(),
            ));
        }
        if self.counter.step_ms == 0 {
            return Err(crate::Error::Config(
                "counter.step_ms must be non-zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.counter.visibility_threshold) {
            return Err(crate::Error::Config(format!(
                "counter.visibility_threshold must be within 0.0-1.0, got {}",
                self.counter.visibility_threshold
            )));
        }
        if self.particles.radius_max < self.particles.radius_min
            || self.particles.opacity_max < self.particles.opacity_min
        {
            return Err(crate::Error::Config(
                "particle ranges must have max >= min".to_string(),
            ));
        }
        if self.scroll.animation_fps == 0 || self.scroll.animation_fps > MAX_ANIMATION_FPS {
            return Err(crate::Error::Config(format!(
                "scroll.animation_fps must be within 1-{}, got {}",
                MAX_ANIMATION_FPS, self.scroll.animation_fps
            )));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/sitefx/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("sitefx")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the terminal preview owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("sitefx.log")
    }
}

/// Duration accessors for the loader section
pub trait LoaderConfigExt {
    fn progress_tick(&self) -> Duration;
    fn highlight_period(&self) -> Duration;
    fn message_period(&self) -> Duration;
    fn settle_delay(&self) -> Duration;
}

impl LoaderConfigExt for LoaderConfig {
    #[inline]
    fn progress_tick(&self) -> Duration {
        Duration::from_millis(self.progress_tick_ms)
    }

    #[inline]
    fn highlight_period(&self) -> Duration {
        Duration::from_millis(self.highlight_period_ms)
    }

    #[inline]
    fn message_period(&self) -> Duration {
        Duration::from_millis(self.message_period_ms)
    }

    #[inline]
    fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.loader.progress_tick_ms, 150);
        assert_eq!(config.loader.messages.len(), 8);
        assert_eq!(config.particles.count, 50);
        assert_eq!(config.scroll.easing, EasingType::EaseInOutQuad);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [loader]
            increment_min = 2.0
            seed = 7

            [scroll]
            easing = "linear"
            "#,
        )
        .unwrap();
        assert_eq!(config.loader.increment_min, 2.0);
        assert_eq!(config.loader.increment_max, 4.0);
        assert_eq!(config.loader.seed, Some(7));
        assert_eq!(config.scroll.easing, EasingType::Linear);
        assert_eq!(config.counter.duration_ms, 2000);
    }

    #[test]
    fn test_zero_increment_rejected() {
        let mut config = AppConfig::default();
        config.loader.increment_min = 0.0;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));

        config.loader.increment_min = 3.0;
        config.loader.increment_max = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_animation_fps_range() {
        let mut config = AppConfig::default();
        for fps in [0, MAX_ANIMATION_FPS + 1, 2000] {
            config.scroll.animation_fps = fps;
            assert!(matches!(config.validate(), Err(crate::Error::Config(_))), "fps {fps}");
        }
        for fps in [1, 60, MAX_ANIMATION_FPS] {
            config.scroll.animation_fps = fps;
            assert!(config.validate().is_ok(), "fps {fps}");
        }
    }

    #[test]
    fn test_retired_easing_names_rejected() {
        let parsed: std::result::Result<AppConfig, _> = toml::from_str("[scroll]\neasing = \"cubic\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_from_missing_path() {
        let config = AppConfig::load_from(Path::new("/nonexistent/sitefx/config.toml")).unwrap();
        assert_eq!(config.effects.reveal_threshold_px, 100.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("sitefx-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.loader.seed = Some(42);
        config.ui.px_per_row = 16.0;

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.loader.seed, Some(42));
        assert_eq!(loaded.ui.px_per_row, 16.0);
        assert_eq!(loaded.to_toml().unwrap(), config.to_toml().unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
