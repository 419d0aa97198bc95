use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::scroll::EasingType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub hero: HeroConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            markers: MarkerConfig::default(),
            reveal: RevealConfig::default(),
            hero: HeroConfig::default(),
            loader: LoaderConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Class/attribute names recognized in page markup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Class marking an element as reveal-eligible
    #[serde(default = "default_reveal_class")]
    pub reveal_class: String,
    /// Class applied when an element is revealed
    #[serde(default = "default_visible_class")]
    pub visible_class: String,
    /// Class applied to the loader while it fades out
    #[serde(default = "default_hide_class")]
    pub hide_class: String,
    /// Class held by the document root while the loader is up
    #[serde(default = "default_loading_class")]
    pub loading_class: String,
    /// Class identifying the hero container
    #[serde(default = "default_hero_class")]
    pub hero_class: String,
    /// Element id of the splash loader
    #[serde(default = "default_loader_id")]
    pub loader_id: String,
    /// Attribute opting an anchor out of smooth scrolling
    #[serde(default = "default_no_smooth_attr")]
    pub no_smooth_attr: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            reveal_class: default_reveal_class(),
            visible_class: default_visible_class(),
            hide_class: default_hide_class(),
            loading_class: default_loading_class(),
            hero_class: default_hero_class(),
            loader_id: default_loader_id(),
            no_smooth_attr: default_no_smooth_attr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Visibility ratio that counts as an intersection
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Fraction of viewport height shaved off the bottom of the
    /// observation root
    #[serde(default = "default_bottom_margin")]
    pub bottom_margin: f64,
    /// Fraction of viewport height an element's top must be above for the
    /// geometry fallback pass to reveal it
    #[serde(default = "default_viewport_factor")]
    pub viewport_factor: f64,
    /// Animation frame cadence in milliseconds (growth-pass coalescing and
    /// scroll animation ticks)
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            bottom_margin: default_bottom_margin(),
            viewport_factor: default_viewport_factor(),
            frame_interval_ms: default_frame_interval(),
        }
    }
}

impl RevealConfig {
    #[inline]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroConfig {
    /// Delay between consecutive hero reveals
    #[serde(default = "default_stagger")]
    pub stagger_ms: u64,
    /// Extra delay after the last hero reveal before the gate releases
    #[serde(default = "default_hero_settle")]
    pub settle_ms: u64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            stagger_ms: default_stagger(),
            settle_ms: default_hero_settle(),
        }
    }
}

impl HeroConfig {
    #[inline]
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    #[inline]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Minimum time the loader stays visible
    #[serde(default = "default_min_show")]
    pub min_show_ms: u64,
    /// Failsafe deadline for a load-complete signal that never arrives
    #[serde(default = "default_failsafe")]
    pub failsafe_ms: u64,
    /// Loader fade-out duration
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
    /// Settle delay before the post-removal re-evaluation pass
    #[serde(default = "default_loader_settle")]
    pub settle_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            min_show_ms: default_min_show(),
            failsafe_ms: default_failsafe(),
            fade_ms: default_fade(),
            settle_ms: default_loader_settle(),
        }
    }
}

impl LoaderConfig {
    #[inline]
    pub fn min_show(&self) -> Duration {
        Duration::from_millis(self.min_show_ms)
    }

    #[inline]
    pub fn failsafe(&self) -> Duration {
        Duration::from_millis(self.failsafe_ms)
    }

    #[inline]
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    #[inline]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Enable smooth scrolling for intercepted anchor clicks
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Scroll animation duration in milliseconds
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    /// Easing function for scroll animation
    #[serde(default)]
    pub easing: EasingType,
    /// Offset subtracted from anchor targets to clear a fixed header
    #[serde(default = "default_header_offset")]
    pub header_offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: EasingType::default(),
            header_offset: default_header_offset(),
        }
    }
}

impl ScrollConfig {
    #[inline]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    /// Check if smooth scrolling is effectively enabled
    #[inline]
    pub fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}

impl AppConfig {
    /// Load configuration from file, or defaults if no file exists
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/curtain/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("curtain")
            .join("config.toml")
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reveal_class() -> String {
    "reveal".to_string()
}

fn default_visible_class() -> String {
    "is-visible".to_string()
}

fn default_hide_class() -> String {
    "is-hiding".to_string()
}

fn default_loading_class() -> String {
    "is-loading".to_string()
}

fn default_hero_class() -> String {
    "hero".to_string()
}

fn default_loader_id() -> String {
    "loader".to_string()
}

fn default_no_smooth_attr() -> String {
    "data-no-smooth".to_string()
}

fn default_threshold() -> f64 {
    0.05
}

fn default_bottom_margin() -> f64 {
    0.10
}

fn default_viewport_factor() -> f64 {
    0.9
}

fn default_frame_interval() -> u64 {
    16
}

fn default_stagger() -> u64 {
    120
}

fn default_hero_settle() -> u64 {
    220
}

fn default_min_show() -> u64 {
    1600
}

fn default_failsafe() -> u64 {
    6000
}

fn default_fade() -> u64 {
    600
}

fn default_loader_settle() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_scroll_duration() -> u64 {
    400
}

fn default_header_offset() -> f64 {
    10.0
}
