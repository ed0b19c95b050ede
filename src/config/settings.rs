use crate::app::pools::WorkerCommand;
use crate::config::toml_config::TomlConfig;
use crate::core::executor::{ExecutorOptions, MAX_WORKERS};
use crate::core::ConfigProvider;
use crate::domain::model::{Backend, InputRange, DEFAULT_COUNT, DEFAULT_START};
use crate::utils::error::Result;
use crate::utils::monitor::available_cores;
use crate::utils::validation::{validate_path, validate_range, Validate};
use std::path::PathBuf;

/// 命令列覆蓋值，None 表示未指定
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub start: Option<i64>,
    pub count: Option<usize>,
    pub max_workers: Option<usize>,
    pub backend: Option<Backend>,
    pub preserve_input_order: Option<bool>,
    pub monitor: bool,
}

/// Run parameters after merging CLI flags, the TOML file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub range: InputRange,
    pub max_workers: usize,
    pub backend: Backend,
    pub preserve_input_order: bool,
    pub monitor: bool,
    pub worker_program: Option<PathBuf>,
}

impl RunSettings {
    /// CLI > TOML > default
    pub fn resolve(toml: Option<&TomlConfig>, overrides: &SettingsOverrides) -> Self {
        let file = toml.cloned().unwrap_or_default();

        Self {
            range: InputRange::new(
                overrides.start.or(file.range.start).unwrap_or(DEFAULT_START),
                overrides.count.or(file.range.count).unwrap_or(DEFAULT_COUNT),
            ),
            max_workers: overrides
                .max_workers
                .or(file.executor.max_workers)
                .unwrap_or_else(available_cores),
            backend: overrides
                .backend
                .or(file.executor.backend)
                .unwrap_or_default(),
            preserve_input_order: overrides
                .preserve_input_order
                .or(file.executor.preserve_input_order)
                .unwrap_or(false),
            monitor: overrides.monitor || file.monitoring_enabled(),
            worker_program: file.executor.worker_program.map(PathBuf::from),
        }
    }

    pub fn executor_options(&self) -> Result<ExecutorOptions> {
        let mut options = ExecutorOptions::from_config(self);
        if let Some(program) = &self.worker_program {
            options = options.with_worker_command(WorkerCommand::new(program));
        }
        options.validate()?;
        Ok(options)
    }
}

impl Default for RunSettings {
    fn default() -> Self {
        Self::resolve(None, &SettingsOverrides::default())
    }
}

impl ConfigProvider for RunSettings {
    fn start(&self) -> i64 {
        self.range.start
    }

    fn count(&self) -> usize {
        self.range.count
    }

    fn max_workers(&self) -> usize {
        self.max_workers
    }

    fn backend(&self) -> Backend {
        self.backend
    }

    fn preserve_input_order(&self) -> bool {
        self.preserve_input_order
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        validate_range("max_workers", self.max_workers, 1, MAX_WORKERS)?;
        self.range.end()?;
        if let Some(program) = &self.worker_program {
            validate_path("executor.worker_program", &program.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let settings = RunSettings::default();
        assert_eq!(settings.start(), 10_000_000_000_000);
        assert_eq!(settings.count(), 10_000);
        assert_eq!(settings.backend(), Backend::Thread);
        assert_eq!(settings.max_workers(), available_cores());
        assert!(!settings.preserve_input_order());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_toml() {
        let toml = TomlConfig::from_toml_str(
            "[range]\nstart = 100\ncount = 50\n[executor]\nbackend = \"tokio\"\nmax_workers = 3\n",
        )
        .unwrap();
        let overrides = SettingsOverrides {
            count: Some(7),
            backend: Some(Backend::Process),
            ..Default::default()
        };

        let settings = RunSettings::resolve(Some(&toml), &overrides);
        assert_eq!(settings.range, InputRange::new(100, 7));
        assert_eq!(settings.backend, Backend::Process);
        assert_eq!(settings.max_workers, 3);
    }

    #[test]
    fn test_executor_options_carry_worker_program() {
        let toml =
            TomlConfig::from_toml_str("[executor]\nworker_program = \"/opt/prime-pool\"\n")
                .unwrap();
        let settings = RunSettings::resolve(Some(&toml), &SettingsOverrides::default());
        let options = settings.executor_options().unwrap();
        assert_eq!(
            options.worker_command,
            Some(WorkerCommand::new("/opt/prime-pool"))
        );
    }

    #[test]
    fn test_cli_fixes_invalid_toml_values() {
        let toml = TomlConfig::from_toml_str(
            "[executor]\nmax_workers = 0\npreserve_input_order = true\n",
        )
        .unwrap();
        let overrides = SettingsOverrides {
            max_workers: Some(4),
            preserve_input_order: Some(false),
            ..Default::default()
        };

        let settings = RunSettings::resolve(Some(&toml), &overrides);
        assert_eq!(settings.max_workers, 4);
        assert!(!settings.preserve_input_order);
        assert!(settings.validate().is_ok());

        let untouched = RunSettings::resolve(Some(&toml), &SettingsOverrides::default());
        assert!(untouched.preserve_input_order);
        assert!(untouched.validate().is_err());
    }

    #[test]
    fn test_overflowing_range_fails_validation() {
        let toml =
            TomlConfig::from_toml_str("[range]\nstart = 9223372036854775800\ncount = 100\n")
                .unwrap();
        let settings = RunSettings::resolve(Some(&toml), &SettingsOverrides::default());
        assert!(settings.validate().is_err());

        let shortened = SettingsOverrides {
            count: Some(5),
            ..Default::default()
        };
        assert!(RunSettings::resolve(Some(&toml), &shortened).validate().is_ok());
    }

    #[test]
    fn test_zero_workers_fails_validation() {
        let overrides = SettingsOverrides {
            max_workers: Some(0),
            ..Default::default()
        };
        let settings = RunSettings::resolve(None, &overrides);
        assert!(settings.validate().is_err());
        assert!(settings.executor_options().is_err());
    }
}
