use clap::Parser;
use color_eyre::Result;
use unifi_scraper::{
    init_errors,
    init_logging,
    Catalog,
};
use unifi_scraper_config::{
    Args,
    Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    let list_collections = args.list_collections;
    let config = Config::new(args)?;
    init_logging(config.verbose)?;

    let catalog = match &config.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };

    if list_collections {
        for name in catalog.names() {
            println!("{name}");
        }
        return Ok(());
    }

    unifi_scraper::run(&config, catalog).await?;
    Ok(())
}
