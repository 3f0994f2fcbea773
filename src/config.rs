use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{PipelineError, Result};
use crate::schema::{SchemaVariant, OLD_FORMAT_LAST_YEAR};

/// Where the pipeline reads and writes, and which years it covers.
///
/// Loaded from YAML; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding `<year>.xls`.
    pub input_dir: PathBuf,
    /// Directory receiving `<year>.csv` and the run manifest.
    pub intermediate_dir: PathBuf,
    pub detailed_output: PathBuf,
    pub totals_output: PathBuf,
    pub first_year: u16,
    pub last_year: u16,
    pub old_format_last_year: u16,
    /// Normalize years on the rayon pool instead of one after another.
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("xls"),
            intermediate_dir: PathBuf::from("csv"),
            detailed_output: PathBuf::from("data.csv"),
            totals_output: PathBuf::from("data_total.csv"),
            first_year: 2013,
            last_year: 2022,
            old_format_last_year: OLD_FORMAT_LAST_YEAR,
            parallel: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(text).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.first_year > self.last_year {
            return Err(PipelineError::Config(format!(
                "first_year {} is after last_year {}",
                self.first_year, self.last_year
            )));
        }
        Ok(())
    }

    pub fn years(&self) -> impl Iterator<Item = u16> {
        self.first_year..=self.last_year
    }

    pub fn variant(&self, year: u16) -> SchemaVariant {
        SchemaVariant::for_year(year, self.old_format_last_year)
    }

    pub fn workbook_path(&self, year: u16) -> PathBuf {
        self.input_dir.join(format!("{}.xls", year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_gives_defaults() -> Result<()> {
        let config = PipelineConfig::from_yaml_str("{}")?;
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.years().count(), 10);
        assert_eq!(config.workbook_path(2015), PathBuf::from("xls/2015.xls"));
        Ok(())
    }

    #[test]
    fn partial_yaml_overrides_only_given_keys() -> Result<()> {
        let config = PipelineConfig::from_yaml_str("first_year: 2019\nparallel: false\n")?;
        assert_eq!(config.first_year, 2019);
        assert!(!config.parallel);
        assert_eq!(config.last_year, 2022);
        assert_eq!(config.variant(2019), SchemaVariant::NewFormat);
        Ok(())
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        let err = PipelineConfig::from_yaml_str("first_year: 2022\nlast_year: 2013\n").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(PipelineConfig::from_yaml_str("input: xls\n").is_err());
    }
}
