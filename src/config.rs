// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Editor preference. The `--editor` flag wins over `$EDITOR`, which wins over
//! the `editor` key of the config file, which falls back to `vi`.
use crate::McpError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

pub const APP_NAME: &str = "mcp";
pub const EDITOR_VAR: &str = "EDITOR";
pub const DEFAULT_EDITOR: &str = "vi";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub editor: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            editor: DEFAULT_EDITOR.to_string(),
        }
    }
}

/// Where confy keeps `mcp.toml` for this user, if a home directory is known.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("rs", "", APP_NAME)
        .map(|dirs| dirs.config_dir().join(format!("{}.toml", APP_NAME)))
}

/// Reads `path` when it exists. A missing file yields the defaults and is not
/// created.
pub fn load_from(path: &Path) -> Result<Config, McpError> {
    if !path.is_file() {
        return Ok(Config::default());
    }
    Ok(confy::load_path(path)?)
}

pub fn load() -> Result<Config, McpError> {
    match config_path() {
        Some(path) => load_from(&path),
        None => Ok(Config::default()),
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn resolve_from<F>(flag: Option<&str>, env_editor: Option<String>, load: F) -> String
where
    F: FnOnce() -> Result<Config, McpError>,
{
    if let Some(editor) = flag.and_then(non_blank) {
        debug!(%editor, "editor from command line");
        return editor;
    }
    if let Some(editor) = env_editor.as_deref().and_then(non_blank) {
        debug!(%editor, "editor from environment");
        return editor;
    }
    match load() {
        Ok(config) => match non_blank(&config.editor) {
            Some(editor) => {
                debug!(%editor, "editor from config file");
                editor
            }
            None => DEFAULT_EDITOR.to_string(),
        },
        Err(e) => {
            warn!(error = %e, "ignoring unreadable config file");
            DEFAULT_EDITOR.to_string()
        }
    }
}

/// Picks the editor command for this run. The config file is only read when
/// neither the flag nor the environment names one, and a broken config file
/// falls back to the default editor.
pub fn resolve_editor(flag: Option<&str>) -> String {
    resolve_from(flag, env::var(EDITOR_VAR).ok(), load)
}
