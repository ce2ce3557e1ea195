use aoi_query::utils::{
    logger::{self, LogFormat},
    validation::Validate,
};
use aoi_query::{
    AoiError, AoiQueryController, CliConfig, CoordField, FileCatalog, HeadlessDrawingSession,
    QueryBuilder, QueryOutcome, ServiceConfig, WfsExecutor,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let log_format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(log_format, cli.verbose);

    tracing::info!("Starting aoi-query");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let catalog = FileCatalog::new(config.output_path());
    let controller = AoiQueryController::new(
        WfsExecutor::new(),
        catalog.clone(),
        HeadlessDrawingSession::new(),
        &config,
    );

    for product in config.enabled_products()? {
        controller.set_product(product, true);
    }

    let typed = [
        (CoordField::Top, &cli.top),
        (CoordField::Bottom, &cli.bottom),
        (CoordField::Left, &cli.left),
        (CoordField::Right, &cli.right),
    ];
    for (field, value) in typed {
        if let Some(value) = value {
            controller.set_field(field, value.clone());
        }
    }

    if !cli.points.is_empty() {
        let drawing = controller.begin_drawing();
        match drawing.points_changed(&cli.points) {
            Some(bbox) => tracing::info!("🔧 AOI from {} drawn points: {:?}", cli.points.len(), bbox),
            None => tracing::warn!(
                "Ignoring {} drawn point(s); at least 3 are needed for an area",
                cli.points.len()
            ),
        }
        drawing.complete();
    }

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the request is printed, not sent");
        match QueryBuilder::new().build(&controller.snapshot()) {
            Ok(query) => println!("{}", query.to_request_url(&config.service.endpoint)),
            Err(e) => exit_with(AoiError::from(e)),
        }
        return Ok(());
    }

    match controller.run_query().await {
        Ok(QueryOutcome::Loaded { token, record }) => {
            let path = catalog.geojson_path(&record.name);
            tracing::info!("✅ Query {} loaded as layer '{}'", token, record.name);
            println!("✅ Layer '{}' loaded", record.name);
            println!("📁 Output saved to: {}", path.display());
        }
        Ok(QueryOutcome::Stale { token, latest }) => {
            tracing::warn!("Query {} superseded by {}", token, latest);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn load_config(cli: &CliConfig) -> aoi_query::Result<ServiceConfig> {
    let config = cli.resolve()?;
    config.validate()?;
    Ok(config)
}

fn exit_with(e: AoiError) -> ! {
    tracing::error!("❌ {}", e);
    eprintln!("❌ {}", e.user_friendly_message());

    // Errors the user can fix get their own exit code.
    let exit_code = if e.is_user_correctable() { 2 } else { 1 };
    std::process::exit(exit_code);
}
