use anyhow::Result;
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::try_exists;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub minecraft: MinecraftConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub syntax_theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    pub indent_width: usize,
    pub line_numbers: bool,
    pub highlight_current_line: bool,
    pub output_height: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    pub base_path: PathBuf,
    pub default_extension: String,
    pub filetypes: Vec<FileType>,
}

/// A named group of file patterns, e.g. `Python files` → `*.py`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
    pub label: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    pub interpreter: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinecraftConfig {
    pub enabled: bool,
    pub executable: String,
    pub process_name: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            syntax_theme: String::from("base16-ocean.dark"),
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            line_numbers: true,
            highlight_current_line: true,
            output_height: 10,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        let base_path = UserDirs::new()
            .map(|dirs| dirs.home_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            base_path,
            default_extension: String::from(".py"),
            filetypes: vec![
                FileType {
                    label: String::from("Python files"),
                    patterns: vec![String::from("*.py")],
                },
                FileType {
                    label: String::from("All files"),
                    patterns: vec![String::from("*")],
                },
            ],
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: String::from("python3"),
            args: vec![String::from("-u"), String::from("-")],
        }
    }
}

impl Default for MinecraftConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            executable: String::from("minecraft-pi"),
            process_name: String::from("minecraft-pi"),
        }
    }
}

impl Config {
    pub async fn load() -> Result<Self> {
        if let Some(config_path) = Self::config_path() {
            if try_exists(&config_path).await? {
                match tokio::fs::read_to_string(&config_path).await {
                    Ok(content) => {
                        if content.trim().is_empty() {
                            log::warn!("Config file is empty, creating new one");
                            return Ok(Self::write_default().await);
                        }

                        match serde_json::from_str::<Self>(&content) {
                            Ok(mut config) => {
                                config.validate()?;
                                log::info!(
                                    "Successfully loaded config from: {}",
                                    config_path.display()
                                );
                                return Ok(config);
                            }
                            Err(json_err) => {
                                log::error!("Failed to parse config file: {}", json_err);

                                let backup_path = config_path.with_extension("bak");
                                if let Err(e) = tokio::fs::copy(&config_path, &backup_path).await {
                                    log::warn!("Failed to backup broken config: {}", e);
                                } else {
                                    log::info!(
                                        "Backed up broken config to: {}",
                                        backup_path.display()
                                    );
                                }

                                return Ok(Self::write_default().await);
                            }
                        }
                    }
                    Err(io_err) => {
                        log::error!("Failed to read config file: {}", io_err);
                    }
                }
            } else {
                log::info!("Config file does not exist, creating default");
            }
        }

        Ok(Self::write_default().await)
    }

    async fn write_default() -> Self {
        let default_config = Self::default();
        if let Err(e) = default_config.save().await {
            log::warn!("Failed to write default config: {}", e);
        }
        default_config
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(config_path) = Self::config_path() {
            let mut config_to_save = self.clone();
            config_to_save.validate()?;

            if let Some(parent) = config_path.parent() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    anyhow::anyhow!(
                        "Failed to create config directory: {} - {}",
                        parent.display(),
                        e
                    )
                })?;
                log::debug!("Config directory exists or was created: {}", parent.display());
            }

            let content = serde_json::to_string_pretty(&config_to_save)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            tokio::fs::write(&config_path, content).await.map_err(|e| {
                anyhow::anyhow!(
                    "Failed to write config file: {} - {}",
                    config_path.display(),
                    e
                )
            })?;
            log::info!("Successfully saved config to: {}", config_path.display());
        }
        Ok(())
    }

    /// Validate configuration values and fix invalid ones
    pub fn validate(&mut self) -> Result<()> {
        let mut has_issues = false;

        if self.editor.indent_width == 0 || self.editor.indent_width > 16 {
            log::warn!("Invalid indent width: {}, using default", self.editor.indent_width);
            self.editor.indent_width = 4;
            has_issues = true;
        }

        if !(3..=40).contains(&self.editor.output_height) {
            log::warn!("Invalid output height: {}, using default", self.editor.output_height);
            self.editor.output_height = 10;
            has_issues = true;
        }

        if self.theme.syntax_theme.is_empty() {
            log::warn!("Empty syntax theme, using default");
            self.theme.syntax_theme = Theme::default().syntax_theme;
            has_issues = true;
        }

        if self.files.default_extension.is_empty() {
            log::warn!("Empty default extension, using default");
            self.files.default_extension = String::from(".py");
            has_issues = true;
        } else if !self.files.default_extension.starts_with('.') {
            self.files.default_extension.insert(0, '.');
            has_issues = true;
        }

        if self.files.filetypes.is_empty() {
            log::warn!("No file types configured, using defaults");
            self.files.filetypes = FilesConfig::default().filetypes;
            has_issues = true;
        }

        if self.runner.interpreter.trim().is_empty() {
            log::warn!("Empty interpreter, using default");
            self.runner = RunnerConfig::default();
            has_issues = true;
        }

        if has_issues {
            log::info!("Configuration validation completed with corrections");
        }

        Ok(())
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("PYEDITOR_CONFIG_PATH") {
            return Some(PathBuf::from(path));
        }

        if let Ok(dir) = std::env::var("PYEDITOR_CONFIG_DIR") {
            return Some(PathBuf::from(dir).join("config.json"));
        }

        ProjectDirs::from("org", "pyeditor", "pyeditor")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }
}
