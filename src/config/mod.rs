// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Application configuration.
//!
//! This module manages the application configuration file and the typed
//! preference options stored in it. Values arrive as text from the command
//! line or the preferences view and are validated before they are stored.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    util::{expand_home, format::validate_format},
};

const CONFIG_NAME: &str = "tagui";

pub(crate) const DEFAULT_PREVIEW_FORMAT: &str = "%a - %l [%n] %t (%y)";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    pub(crate) music_dir: String,
    pub(crate) preview_format: String,
    pub(crate) smooth_scroll: bool,
    pub(crate) vim_mode: bool,
    pub(crate) use_regex_in_search: bool,
    /// Action name to chord overrides.
    pub(crate) keybindings: BTreeMap<String, String>,
}

fn default_music_dir() -> String {
    dirs::audio_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Music")))
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/Music".to_string())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            music_dir: default_music_dir(),
            preview_format: DEFAULT_PREVIEW_FORMAT.to_string(),
            smooth_scroll: false,
            vim_mode: false,
            use_regex_in_search: false,
            keybindings: BTreeMap::new(),
        }
    }
}

/// The user-settable options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PrefOption {
    MusicDir,
    PreviewFormat,
    SmoothScroll,
    VimMode,
    UseRegexInSearch,
}

impl PrefOption {
    pub(crate) const ALL: [PrefOption; 5] = [
        PrefOption::MusicDir,
        PrefOption::PreviewFormat,
        PrefOption::SmoothScroll,
        PrefOption::VimMode,
        PrefOption::UseRegexInSearch,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            PrefOption::MusicDir => "music_dir",
            PrefOption::PreviewFormat => "preview_format",
            PrefOption::SmoothScroll => "smooth_scroll",
            PrefOption::VimMode => "vim_mode",
            PrefOption::UseRegexInSearch => "use_regex_in_search",
        }
    }

    pub(crate) fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.name() == name)
            .ok_or_else(|| AppError::invalid_option(name, "no such option"))
    }

    pub(crate) fn is_flag(self) -> bool {
        matches!(
            self,
            PrefOption::SmoothScroll | PrefOption::VimMode | PrefOption::UseRegexInSearch
        )
    }
}

fn parse_flag(option: PrefOption, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(AppError::invalid_option(
            option.name(),
            format!("expected true or false, got '{value}'"),
        )),
    }
}

/// Typed access to the configuration file.
#[derive(Debug, Clone)]
pub(crate) struct PreferencesStore {
    path: PathBuf,
    config: AppConfig,
}

impl PreferencesStore {
    /// Loads the configuration from `path`, or from the default location.
    ///
    /// A missing file is created with default values.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => confy::get_configuration_file_path(CONFIG_NAME, None)?,
        };
        let config: AppConfig = confy::load_path(&path)?;

        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(Self { path, config })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// The current value of `option` as text.
    pub(crate) fn get(&self, option: PrefOption) -> String {
        match option {
            PrefOption::MusicDir => self.config.music_dir.clone(),
            PrefOption::PreviewFormat => self.config.preview_format.clone(),
            PrefOption::SmoothScroll => self.config.smooth_scroll.to_string(),
            PrefOption::VimMode => self.config.vim_mode.to_string(),
            PrefOption::UseRegexInSearch => self.config.use_regex_in_search.to_string(),
        }
    }

    /// Validates and stores a new value. Does not write the file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidOptionValue`] if `value` does not fit the
    /// option's type. The stored value is left unchanged.
    pub(crate) fn set(&mut self, option: PrefOption, value: &str) -> Result<()> {
        match option {
            PrefOption::MusicDir => {
                let value = value.trim();
                if !expand_home(value).is_dir() {
                    return Err(AppError::invalid_option(
                        option.name(),
                        format!("'{value}' is not a directory"),
                    ));
                }
                self.config.music_dir = value.to_string();
            }
            PrefOption::PreviewFormat => {
                validate_format(value)?;
                self.config.preview_format = value.to_string();
            }
            PrefOption::SmoothScroll => self.config.smooth_scroll = parse_flag(option, value)?,
            PrefOption::VimMode => self.config.vim_mode = parse_flag(option, value)?,
            PrefOption::UseRegexInSearch => {
                self.config.use_regex_in_search = parse_flag(option, value)?
            }
        }

        tracing::debug!(option = option.name(), value, "preference changed");
        Ok(())
    }

    /// Like [`set`](Self::set), with the option given by name.
    pub(crate) fn set_by_name(&mut self, name: &str, value: &str) -> Result<PrefOption> {
        let option = PrefOption::from_name(name.trim())?;
        self.set(option, value)?;
        Ok(option)
    }

    pub(crate) fn is_enabled(&self, option: PrefOption) -> bool {
        match option {
            PrefOption::SmoothScroll => self.config.smooth_scroll,
            PrefOption::VimMode => self.config.vim_mode,
            PrefOption::UseRegexInSearch => self.config.use_regex_in_search,
            PrefOption::MusicDir | PrefOption::PreviewFormat => false,
        }
    }

    pub(crate) fn music_dir(&self) -> PathBuf {
        expand_home(&self.config.music_dir)
    }

    pub(crate) fn preview_format(&self) -> &str {
        &self.config.preview_format
    }

    pub(crate) fn keybindings(&self) -> &BTreeMap<String, String> {
        &self.config.keybindings
    }

    /// Records a key binding override. Does not write the file.
    pub(crate) fn set_binding(&mut self, action: &str, chord: &str) {
        self.config
            .keybindings
            .insert(action.to_string(), chord.to_string());
    }

    /// Re-reads the configuration file, replacing every in-memory value.
    pub(crate) fn reload(&mut self) -> Result<()> {
        self.config = confy::load_path(&self.path)?;
        tracing::info!(path = %self.path.display(), "reloaded configuration");
        Ok(())
    }

    pub(crate) fn save(&self) -> Result<()> {
        confy::store_path(&self.path, &self.config)?;
        tracing::debug!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}
