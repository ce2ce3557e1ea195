use crate::domain::model::{Product, DEFAULT_LAYER_NAME};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AoiError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service: ServiceSection,
    #[serde(default)]
    pub layer: LayerSection,
    #[serde(default)]
    pub products: ProductsSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSection {
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSection {
    #[serde(default = "default_layer_name")]
    pub name: String,
}

impl Default for LayerSection {
    fn default() -> Self {
        Self {
            name: default_layer_name(),
        }
    }
}

/// Products ticked when the form opens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductsSection {
    #[serde(default)]
    pub enabled: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_layer_name() -> String {
    DEFAULT_LAYER_NAME.to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

impl ServiceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            service: ServiceSection {
                endpoint: endpoint.into(),
            },
            layer: LayerSection::default(),
            products: ProductsSection::default(),
            output: OutputSection::default(),
        }
    }

    /// Reads and parses a TOML config file, expanding `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AoiError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${NAME}` with the environment value. Unset names are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AoiError::ConfigError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Products from `[products] enabled`, rejecting unknown identifiers.
    pub fn enabled_products(&self) -> Result<Vec<Product>> {
        self.products
            .enabled
            .iter()
            .map(|id| id.parse::<Product>())
            .collect()
    }

    pub fn output_path(&self) -> &str {
        &self.output.path
    }
}

impl ConfigProvider for ServiceConfig {
    fn service_endpoint(&self) -> &str {
        &self.service.endpoint
    }

    fn layer_name(&self) -> &str {
        &self.layer.name
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<()> {
        validate_url("service.endpoint", &self.service.endpoint)?;
        validate_non_empty_string("layer.name", &self.layer.name)?;
        validate_non_empty_string("output.path", &self.output.path)?;
        self.enabled_products().map_err(|e| AoiError::ConfigError {
            field: "products.enabled".to_string(),
            message: format!("{}. Valid products: tmc1, tmc2, ohrc", e),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[service]
endpoint = "https://maps.example.org/geoserver/wfs"

[layer]
name = "Lunar footprints"

[products]
enabled = ["tmc1", "ohrc"]

[output]
path = "./layers"
"#;

        let config = ServiceConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.service_endpoint(),
            "https://maps.example.org/geoserver/wfs"
        );
        assert_eq!(config.layer_name(), "Lunar footprints");
        assert_eq!(
            config.enabled_products().unwrap(),
            vec![Product::Tmc1, Product::Ohrc]
        );
        assert_eq!(config.output_path(), "./layers");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config =
            ServiceConfig::from_toml_str("[service]\nendpoint = \"http://localhost:8080/wfs\"\n")
                .unwrap();
        assert_eq!(config.layer_name(), "Filtered Data");
        assert!(config.enabled_products().unwrap().is_empty());
        assert_eq!(config.output_path(), "./output");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("AOI_TEST_WFS_ENDPOINT", "https://wfs.test/ows");

        let config =
            ServiceConfig::from_toml_str("[service]\nendpoint = \"${AOI_TEST_WFS_ENDPOINT}\"\n")
                .unwrap();
        assert_eq!(config.service_endpoint(), "https://wfs.test/ows");

        std::env::remove_var("AOI_TEST_WFS_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = ServiceConfig::new("not a url");
        assert!(bad_url.validate().is_err());

        let mut bad_product = ServiceConfig::new("https://wfs.test/ows");
        bad_product.products.enabled = vec!["tmc1".to_string(), "dfsar".to_string()];
        match bad_product.validate() {
            Err(AoiError::ConfigError { field, .. }) => assert_eq!(field, "products.enabled"),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_service_section() {
        assert!(ServiceConfig::from_toml_str("[layer]\nname = \"x\"\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\nendpoint = \"https://wfs.test/ows\"\n")
            .unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.service_endpoint(), "https://wfs.test/ows");
    }
}
