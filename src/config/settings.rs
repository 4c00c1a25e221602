use serde::{Deserialize, Serialize};

use crate::report::{ReportSettings, DEFAULT_BRAND, DEFAULT_CURRENCY_SYMBOL, DEFAULT_TITLE};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub practice: Practice,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Practice {
    /// Brand label printed in report footers
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_typst_bin")]
    pub typst_bin: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            currency_symbol: default_currency_symbol(),
            output_dir: default_output_dir(),
            typst_bin: default_typst_bin(),
        }
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

fn default_typst_bin() -> String {
    "typst".to_string()
}

impl Config {
    pub fn report_settings(&self) -> ReportSettings {
        let brand = if self.practice.name.trim().is_empty() {
            DEFAULT_BRAND.to_string()
        } else {
            self.practice.name.clone()
        };
        ReportSettings {
            title: self.report.title.clone(),
            brand,
            currency_symbol: self.report.currency_symbol.clone(),
        }
    }
}
