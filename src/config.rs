//! Startup configuration for the platform layer.

use crate::PlatformError;

/// How the host loop waits between frames.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RunMode {
    /// Render continuously, one frame after every batch of events.
    #[default]
    Poll,
    /// Sleep until the window system delivers an event.
    Wait,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PlatformConfig {
    /// Window title.
    pub title: String,
    /// Initial window width in physical pixels.
    pub width: u32,
    /// Initial window height in physical pixels.
    pub height: u32,
    pub resizable: bool,
    pub run_mode: RunMode,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Handmade Hero".into(),
            width: 640,
            height: 480,
            resizable: true,
            run_mode: RunMode::Poll,
        }
    }
}

impl PlatformConfig {
    /// The default configuration with overrides from `HANDMADE_*` environment variables.
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::from_vars(std::env::vars())
    }

    /// The default configuration with overrides from `(name, value)` pairs.
    ///
    /// Recognized names are `HANDMADE_TITLE`, `HANDMADE_SIZE` (`WIDTHxHEIGHT`) and
    /// `HANDMADE_RUN_MODE` (`poll` or `wait`); anything else is ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, PlatformError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "HANDMADE_TITLE" => config.title = value.to_owned(),
                "HANDMADE_SIZE" => {
                    let (width, height) = parse_size(value).ok_or_else(|| {
                        PlatformError::InvalidConfig {
                            key: "HANDMADE_SIZE",
                            value: value.to_owned(),
                        }
                    })?;
                    config.width = width;
                    config.height = height;
                }
                "HANDMADE_RUN_MODE" => {
                    config.run_mode = match value.trim().to_ascii_lowercase().as_str() {
                        "poll" => RunMode::Poll,
                        "wait" => RunMode::Wait,
                        _ => {
                            return Err(PlatformError::InvalidConfig {
                                key: "HANDMADE_RUN_MODE",
                                value: value.to_owned(),
                            })
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(config)
    }
}

fn parse_size(value: &str) -> Option<(u32, u32)> {
    let (width, height) = value.trim().split_once(|c: char| c == 'x' || c == 'X')?;
    let width = width.trim().parse().ok().filter(|&w: &u32| w > 0)?;
    let height = height.trim().parse().ok().filter(|&h: &u32| h > 0)?;
    Some((width, height))
}
