use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::layout_engine::ScreenOrientation;
use crate::model::OccupantKind;

pub const MAX_SCREENS: usize = 32;

pub fn config_file() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".rift-grid.toml"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct GridSettings {
    #[serde(default = "default_axis_cells")]
    pub short_axis_cells: usize,
    #[serde(default = "default_axis_cells")]
    pub long_axis_cells: usize,
    #[serde(default = "default_cell_width")]
    pub cell_width: i32,
    #[serde(default = "default_cell_height")]
    pub cell_height: i32,
    #[serde(default = "default_padding")]
    pub short_axis_start_padding: i32,
    #[serde(default = "default_padding")]
    pub short_axis_end_padding: i32,
    #[serde(default = "default_padding")]
    pub long_axis_start_padding: i32,
    #[serde(default = "default_padding")]
    pub long_axis_end_padding: i32,
    #[serde(default)]
    pub orientation: ScreenOrientation,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            short_axis_cells: default_axis_cells(),
            long_axis_cells: default_axis_cells(),
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            short_axis_start_padding: default_padding(),
            short_axis_end_padding: default_padding(),
            long_axis_start_padding: default_padding(),
            long_axis_end_padding: default_padding(),
            orientation: ScreenOrientation::default(),
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.short_axis_cells == 0 {
            issues.push("short_axis_cells must be at least 1".to_string());
        }
        if self.long_axis_cells == 0 {
            issues.push("long_axis_cells must be at least 1".to_string());
        }
        if self.cell_width <= 0 {
            issues.push("cell_width must be positive".to_string());
        }
        if self.cell_height <= 0 {
            issues.push("cell_height must be positive".to_string());
        }
        for (name, value) in self.paddings() {
            if value < 0 {
                issues.push(format!("{name} must be non-negative"));
            }
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.short_axis_cells == 0 {
            self.short_axis_cells = default_axis_cells();
            fixes += 1;
        }
        if self.long_axis_cells == 0 {
            self.long_axis_cells = default_axis_cells();
            fixes += 1;
        }
        if self.cell_width <= 0 {
            self.cell_width = default_cell_width();
            fixes += 1;
        }
        if self.cell_height <= 0 {
            self.cell_height = default_cell_height();
            fixes += 1;
        }
        for padding in [
            &mut self.short_axis_start_padding,
            &mut self.short_axis_end_padding,
            &mut self.long_axis_start_padding,
            &mut self.long_axis_end_padding,
        ] {
            if *padding < 0 {
                *padding = 0;
                fixes += 1;
            }
        }

        fixes
    }

    fn paddings(&self) -> [(&'static str, i32); 4] {
        [
            ("short_axis_start_padding", self.short_axis_start_padding),
            ("short_axis_end_padding", self.short_axis_end_padding),
            ("long_axis_start_padding", self.long_axis_start_padding),
            ("long_axis_end_padding", self.long_axis_end_padding),
        ]
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSettings {
    #[serde(default = "default_screen_count")]
    pub screen_count: usize,
    #[serde(default = "default_screen")]
    pub default_screen: usize,
    /// Screens that place occupants freely instead of snapping to cells.
    #[serde(default)]
    pub freeform_screens: Vec<usize>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            screen_count: default_screen_count(),
            default_screen: default_screen(),
            freeform_screens: Vec::new(),
        }
    }
}

impl WorkspaceSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.screen_count == 0 {
            issues.push("screen_count must be at least 1".to_string());
        }
        if self.screen_count > MAX_SCREENS {
            issues.push(format!("screen_count should not exceed {MAX_SCREENS}"));
        }
        if self.default_screen >= self.screen_count {
            issues.push(format!(
                "default_screen {} is out of range for {} screens",
                self.default_screen, self.screen_count
            ));
        }
        for index in &self.freeform_screens {
            if *index >= self.screen_count {
                issues.push(format!(
                    "freeform screen {} is out of range for {} screens",
                    index, self.screen_count
                ));
            }
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if self.screen_count == 0 {
            self.screen_count = 1;
            fixes += 1;
        }
        if self.screen_count > MAX_SCREENS {
            self.screen_count = MAX_SCREENS;
            fixes += 1;
        }
        if self.default_screen >= self.screen_count {
            self.default_screen = self.screen_count / 2;
            fixes += 1;
        }

        let before = self.freeform_screens.len();
        let count = self.screen_count;
        self.freeform_screens.retain(|index| *index < count);
        fixes += before - self.freeform_screens.len();

        fixes
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct DragSettings {
    /// Kinds that refuse to start a drag.
    #[serde(default = "default_undraggable_kinds")]
    pub undraggable_kinds: Vec<OccupantKind>,
    /// Kinds that never contribute to a screen's occupancy.
    #[serde(default = "default_exempt_kinds")]
    pub exempt_kinds: Vec<OccupantKind>,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            undraggable_kinds: default_undraggable_kinds(),
            exempt_kinds: default_exempt_kinds(),
        }
    }
}

impl DragSettings {
    pub fn is_draggable(&self, kind: OccupantKind) -> bool { !self.undraggable_kinds.contains(&kind) }

    pub fn is_exempt(&self, kind: OccupantKind) -> bool { self.exempt_kinds.contains(&kind) }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    grid: GridSettings,
    #[serde(default)]
    workspace: WorkspaceSettings,
    #[serde(default)]
    drag: DragSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub grid: GridSettings,
    pub workspace: WorkspaceSettings,
    pub drag: DragSettings,
}

fn default_axis_cells() -> usize { 4 }

fn default_cell_width() -> i32 { 80 }

fn default_cell_height() -> i32 { 100 }

fn default_padding() -> i32 { 10 }

fn default_screen_count() -> usize { 5 }

fn default_screen() -> usize { 2 }

fn default_undraggable_kinds() -> Vec<OccupantKind> { vec![OccupantKind::SearchWidget] }

fn default_exempt_kinds() -> Vec<OccupantKind> { vec![OccupantKind::Folder] }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&buf)
    }

    pub fn default() -> Config {
        Self::parse(include_str!("../../rift-grid.default.toml")).unwrap_or_else(|_| {
            let file = ConfigFile::default();
            Config {
                grid: file.grid,
                workspace: file.workspace,
                drag: file.drag,
            }
        })
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_file = ConfigFile {
            grid: self.grid.clone(),
            workspace: self.workspace.clone(),
            drag: self.drag.clone(),
        };

        let toml_string = toml::to_string_pretty(&config_file)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.grid.validate());
        issues.extend(self.workspace.validate());
        issues
    }

    /// Attempts to fix configuration values automatically.
    /// Returns the number of fixes applied.
    pub fn auto_fix_values(&mut self) -> usize {
        self.grid.auto_fix_values() + self.workspace.auto_fix_values()
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let c: ConfigFile = toml::from_str(buf)?;
        Ok(Config {
            grid: c.grid,
            workspace: c.workspace,
            drag: c.drag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(include_str!("../../rift-grid.default.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.grid, GridSettings::default());
        assert_eq!(config.workspace.screen_count, 5);
        assert!(config.drag.is_exempt(OccupantKind::Folder));
        assert!(!config.drag.is_draggable(OccupantKind::SearchWidget));
        assert!(config.drag.is_draggable(OccupantKind::Shortcut));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::parse("[grid]\ncolumns = 3\n").is_err());
    }

    #[test]
    fn partial_sections_parse() {
        let config = Config::parse(
            r#"
            [grid]
            short_axis_cells = 5
            orientation = "landscape"

            [workspace]
            screen_count = 3
            default_screen = 0
            freeform_screens = [2]

            [drag]
            undraggable_kinds = []
            "#,
        )
        .unwrap();

        assert_eq!(config.grid.short_axis_cells, 5);
        assert_eq!(config.grid.long_axis_cells, 4);
        assert_eq!(config.grid.orientation, ScreenOrientation::Landscape);
        assert_eq!(config.workspace.freeform_screens, vec![2]);
        assert!(config.drag.is_draggable(OccupantKind::SearchWidget));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_empty());

        config.grid.short_axis_cells = 0;
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("short_axis_cells must be at least 1"));

        let fixes = config.auto_fix_values();
        assert_eq!(fixes, 1);
        assert_eq!(config.grid.short_axis_cells, 4);

        config.workspace.default_screen = 9;
        config.workspace.freeform_screens = vec![1, 12];
        let issues = config.validate();
        assert_eq!(issues.len(), 2);

        let fixes = config.auto_fix_values();
        assert_eq!(fixes, 2);
        assert_eq!(config.workspace.default_screen, 2);
        assert_eq!(config.workspace.freeform_screens, vec![1]);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rift-grid.toml");

        let mut config = Config::default();
        config.grid.long_axis_cells = 6;
        config.workspace.freeform_screens = vec![0];
        config.save(&path).unwrap();

        assert_eq!(Config::read(&path).unwrap(), config);
    }
}
