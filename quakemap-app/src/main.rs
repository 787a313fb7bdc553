use anyhow::Context as _;
use quakemap::{
    quake::classify::MAJOR_MAGNITUDE, FeedSummary, HttpFeed, QuakeMap, QuakeMapConfig,
};
use quakemap::ui::widget::{MapWidget, MapWidgetConfig};

/// Environment variable pointing at an optional JSON configuration file
const CONFIG_PATH_ENV: &str = "QUAKEMAP_CONFIG";

/// Native earthquake map viewer
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    if let Err(e) = run().await {
        log::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let config = load_config()?;
    config.validate().context("invalid configuration")?;

    let feed = HttpFeed::new(&config.feed_url).with_timeout(config.request_timeout());
    let QuakeMap { map, summary } = QuakeMap::load(&config, &feed)
        .await
        .with_context(|| format!("could not load earthquakes from {}", config.feed_url))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquakes - past 30 days"),
        ..Default::default()
    };

    let map_widget = MapWidget::new(map).with_config(MapWidgetConfig::default());
    eframe::run_native(
        "quakemap",
        options,
        Box::new(move |_cc| Box::new(QuakeApp::new(map_widget, summary))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

/// File (first argument or `QUAKEMAP_CONFIG`) then environment overrides
fn load_config() -> anyhow::Result<QuakeMapConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok());

    let config = match path {
        Some(path) => QuakeMapConfig::from_json_file(&path)
            .with_context(|| format!("could not read configuration {path}"))?,
        None => QuakeMapConfig::default(),
    };
    Ok(config.with_env_overrides())
}

struct QuakeApp {
    map_widget: MapWidget,
    summary: FeedSummary,
}

impl QuakeApp {
    fn new(map_widget: MapWidget, summary: FeedSummary) -> Self {
        Self {
            map_widget,
            summary,
        }
    }
}

impl eframe::App for QuakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} earthquakes ({} skipped)",
                    self.summary.accepted, self.summary.skipped
                ));
                ui.separator();
                ui.label(format!("major: magnitude {MAJOR_MAGNITUDE:.1}+"));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let viewport = self.map_widget.map().viewport();
                    ui.label(format!(
                        "Center: {:.4}, {:.4} | Zoom: {:.2}",
                        viewport.center.lat, viewport.center.lng, viewport.zoom
                    ));
                });
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.map_widget.show(ui);
            });
    }
}
