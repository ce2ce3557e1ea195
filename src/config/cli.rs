use crate::config::toml_config::ServiceConfig;
use crate::domain::model::Point2D;
use crate::utils::error::{AoiError, Result};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "aoi-query")]
#[command(about = "Query a WFS feature service for products intersecting an area of interest")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Feature service endpoint, overrides the configuration file
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub top: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub bottom: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub left: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    pub right: Option<String>,

    /// Polygon vertex as "lat,lon"; three or more replace the four bounds
    #[arg(long = "point", value_parser = parse_point, allow_hyphen_values = true)]
    pub points: Vec<Point2D>,

    /// Products to query (tmc1, tmc2, ohrc)
    #[arg(long = "product", value_delimiter = ',')]
    pub products: Vec<String>,

    #[arg(long)]
    pub layer_name: Option<String>,

    /// Directory the resulting layer is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Print the request URL without sending it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Loads the configuration file, if any, and applies command line overrides.
    pub fn resolve(&self) -> Result<ServiceConfig> {
        let mut config = match (&self.config, &self.endpoint) {
            (Some(path), _) => ServiceConfig::from_file(path)?,
            (None, Some(endpoint)) => ServiceConfig::new(endpoint.clone()),
            (None, None) => {
                return Err(AoiError::ConfigError {
                    field: "service.endpoint".to_string(),
                    message: "pass --endpoint or --config".to_string(),
                })
            }
        };

        if let Some(endpoint) = &self.endpoint {
            config.service.endpoint = endpoint.clone();
        }
        if let Some(name) = &self.layer_name {
            config.layer.name = name.clone();
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if !self.products.is_empty() {
            config.products.enabled = self.products.clone();
        }

        Ok(config)
    }
}

fn parse_point(s: &str) -> std::result::Result<Point2D, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{}\"", s))?;
    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid latitude \"{}\": {}", lat, e))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid longitude \"{}\": {}", lon, e))?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(format!("coordinates must be finite numbers, got \"{}\"", s));
    }
    Ok(Point2D::new(latitude, longitude))
}
