mod app;
mod catalog;
mod explorer;
mod layout;
mod util;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use explorer::ExplorerConfig;
use layout::DEFAULT_RADIUS;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Project catalog exported from the projects API.
    #[arg(long, default_value = "projects.json")]
    catalog: PathBuf,

    /// Distance of the category nodes from the centre anchor.
    #[arg(long, default_value_t = DEFAULT_RADIUS, value_parser = parse_radius)]
    radius: f32,

    /// Log filter directives; falls back to `RUST_LOG`, then `info`.
    #[arg(long)]
    log_filter: Option<String>,
}

fn parse_radius(raw: &str) -> Result<f32, String> {
    let radius = raw
        .parse::<f32>()
        .map_err(|error| format!("`{raw}` is not a number: {error}"))?;
    if radius.is_finite() && radius > 0.0 {
        Ok(radius)
    } else {
        Err(format!("radius must be finite and positive, got `{raw}`"))
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    init_logging(args.log_filter.as_deref());

    let config = ExplorerConfig {
        radius: args.radius,
        ..ExplorerConfig::default()
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "project-orbit",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ExplorerApp::new(
                cc,
                args.catalog.clone(),
                config,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_defaults_and_accepts_positive_values() {
        let args = Args::try_parse_from(["project-orbit"]).expect("defaults parse");
        assert_eq!(args.radius, DEFAULT_RADIUS);

        let args =
            Args::try_parse_from(["project-orbit", "--radius", "80.5"]).expect("radius parses");
        assert_eq!(args.radius, 80.5);
    }

    #[test]
    fn radius_rejects_degenerate_values() {
        for raw in ["NaN", "inf", "0", "-120", "wide"] {
            assert!(
                Args::try_parse_from(["project-orbit", "--radius", raw]).is_err(),
                "{raw} should be rejected"
            );
        }
    }
}
