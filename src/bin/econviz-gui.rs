/*!
 * Desktop dashboard for econviz
 *
 * Pick countries (grouped by region), one indicator and a year range; the
 * selection is fetched on a background thread and shown as a chart preview,
 * a data table and a CSV download. Countries that fail to load are listed
 * inline without hiding the others.
 */

use eframe::egui;
use econviz::config::Config;
use econviz::models::{WINDOW_END, WINDOW_START};
use econviz::registry::{self, Region};
use econviz::viz::{ChartKind, ChartOptions};
use econviz::{Client, Dataset, Selection, YearRange, dataset, storage, table, viz};
use log::warn;
use std::collections::BTreeSet;
use std::sync::mpsc;
use std::thread;

const PREVIEW_SIZE: (u32, u32) = (960, 480);

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let config = match Config::resolve(None) {
        Ok(c) => c,
        Err(e) => {
            warn!("{e}; using defaults");
            Config::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Economic Indicators Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "econviz",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
}

/// Main application state
struct DashboardApp {
    config: Config,
    client: Result<Client, String>,

    // Selection
    selected: BTreeSet<&'static str>,
    indicator: &'static str,
    start_year: i32,
    end_year: i32,

    // Presentation
    log_scale: bool,
    chart_kind: ChartKind,

    // Results
    data: Option<Dataset>,
    preview: Option<egui::TextureHandle>,
    preview_dirty: bool,
    status_message: String,
    error_message: String,

    // Background load
    receiver: Option<mpsc::Receiver<Dataset>>,
}

impl DashboardApp {
    fn new(config: Config) -> Self {
        let dash = &config.dashboard;
        let mut selected = BTreeSet::new();
        for name in &dash.countries {
            match registry::country(name) {
                Some(c) => {
                    selected.insert(c.name);
                }
                None => warn!("config names unknown country {name:?}; skipped"),
            }
        }
        let indicator = match registry::indicator(&dash.indicator) {
            Some(i) => i.label,
            None => {
                warn!("config names unknown indicator {:?}", dash.indicator);
                registry::indicators()[0].label
            }
        };
        let start_year = dash.start_year.clamp(WINDOW_START, WINDOW_END);
        let end_year = dash.end_year.clamp(start_year, WINDOW_END);

        let client = Client::new(&config.api).map_err(|e| e.to_string());
        let log_scale = dash.log_scale;

        let mut app = Self {
            config,
            client,
            selected,
            indicator,
            start_year,
            end_year,
            log_scale,
            chart_kind: ChartKind::Lines,
            data: None,
            preview: None,
            preview_dirty: false,
            status_message: String::new(),
            error_message: String::new(),
            receiver: None,
        };
        app.start_load();
        app
    }

    fn is_loading(&self) -> bool {
        self.receiver.is_some()
    }

    /// Countries in registry order, so series colors stay stable.
    fn selection(&self) -> Result<Selection, String> {
        let names: Vec<&str> = registry::countries()
            .iter()
            .map(|c| c.name)
            .filter(|n| self.selected.contains(n))
            .collect();
        let range = YearRange::new(self.start_year, self.end_year).map_err(|e| e.to_string())?;
        Selection::new(names.as_slice(), self.indicator, range).map_err(|e| e.to_string())
    }

    fn start_load(&mut self) {
        let client = match &self.client {
            Ok(c) => c.clone(),
            Err(e) => {
                self.error_message = format!("HTTP client unavailable: {e}");
                return;
            }
        };
        let selection = match self.selection() {
            Ok(s) => s,
            Err(e) => {
                self.error_message = e;
                return;
            }
        };

        self.error_message.clear();
        self.status_message = "Fetching data from the World Bank API...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.receiver = Some(receiver);
        thread::spawn(move || {
            let data = dataset::load(&client, &selection);
            let _ = sender.send(data);
        });
    }

    fn check_load_result(&mut self) {
        let Some(receiver) = &self.receiver else {
            return;
        };
        match receiver.try_recv() {
            Ok(data) => {
                self.receiver = None;
                self.status_message = if data.is_empty() {
                    "No data available for the selected options.".to_string()
                } else {
                    format!(
                        "{} observations for {} countries",
                        data.rows.len(),
                        data.countries().len()
                    )
                };
                self.data = Some(data);
                self.preview_dirty = true;
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.receiver = None;
                self.error_message = "Background load stopped unexpectedly".to_string();
            }
        }
    }

    fn refresh_preview(&mut self, ctx: &egui::Context) {
        self.preview_dirty = false;
        self.preview = None;
        let Some(data) = self.data.as_ref().filter(|d| !d.is_empty()) else {
            return;
        };
        let chart = &self.config.chart;
        let opts = ChartOptions {
            width: PREVIEW_SIZE.0,
            height: PREVIEW_SIZE.1,
            indicator_label: data.indicator_label.clone(),
            title: (self.chart_kind == ChartKind::Lines).then(|| data.title()),
            log_scale: self.log_scale,
            markers: chart.markers,
            legend: chart.legend,
            locale: chart.locale.clone(),
        };
        match viz::render_rgb(&data.rows, self.chart_kind, &opts) {
            Ok(rgb) => {
                let image = egui::ColorImage::from_rgb(
                    [PREVIEW_SIZE.0 as usize, PREVIEW_SIZE.1 as usize],
                    &rgb,
                );
                self.preview =
                    Some(ctx.load_texture("chart-preview", image, egui::TextureOptions::LINEAR));
            }
            Err(e) => self.error_message = format!("Chart failed: {e}"),
        }
    }

    fn download_csv(&mut self) {
        let Some(data) = &self.data else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name("econviz.csv")
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match storage::save_csv(&data.rows, &path) {
            Ok(()) => self.status_message = format!("Saved {}", path.display()),
            Err(e) => self.error_message = format!("Failed to save CSV: {e:#}"),
        }
    }

    fn selection_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Countries");
        ui.horizontal(|ui| {
            if ui.small_button("Clear").clicked() {
                self.selected.clear();
            }
            ui.label(format!("{} selected", self.selected.len()));
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| {
            for region in Region::ALL {
                egui::CollapsingHeader::new(region.label())
                    .default_open(region == Region::Africa)
                    .show(ui, |ui| {
                        for c in registry::countries_in(region) {
                            let mut on = self.selected.contains(c.name);
                            if ui.checkbox(&mut on, c.name).changed() {
                                if on {
                                    self.selected.insert(c.name);
                                } else {
                                    self.selected.remove(c.name);
                                }
                            }
                        }
                    });
            }
        });
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Indicator:");
            egui::ComboBox::from_id_salt("indicator")
                .selected_text(self.indicator)
                .width(320.0)
                .show_ui(ui, |ui| {
                    for i in registry::indicators() {
                        ui.selectable_value(&mut self.indicator, i.label, i.label);
                    }
                });
        });

        ui.horizontal(|ui| {
            let from = ui.add(
                egui::Slider::new(&mut self.start_year, WINDOW_START..=WINDOW_END).text("from"),
            );
            let to = ui
                .add(egui::Slider::new(&mut self.end_year, WINDOW_START..=WINDOW_END).text("to"));
            if from.changed() && self.start_year > self.end_year {
                self.end_year = self.start_year;
            }
            if to.changed() && self.end_year < self.start_year {
                self.start_year = self.end_year;
            }
        });

        ui.horizontal(|ui| {
            if ui
                .add_enabled(!self.is_loading(), egui::Button::new("Fetch data"))
                .clicked()
            {
                self.start_load();
            }
            if self.is_loading() {
                ui.spinner();
            }
            ui.separator();
            let kind_before = self.chart_kind;
            ui.radio_value(&mut self.chart_kind, ChartKind::Lines, "Lines");
            ui.radio_value(&mut self.chart_kind, ChartKind::LatestBar, "Latest year");
            let log_changed = ui.checkbox(&mut self.log_scale, "Log scale").changed();
            if log_changed || kind_before != self.chart_kind {
                self.preview_dirty = true;
            }
            ui.separator();
            let can_download = self.data.as_ref().is_some_and(|d| !d.is_empty());
            if ui
                .add_enabled(can_download, egui::Button::new("Download CSV"))
                .clicked()
            {
                self.download_csv();
            }
        });
    }

    fn messages(&self, ui: &mut egui::Ui) {
        if !self.status_message.is_empty() {
            ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
        }
        if !self.error_message.is_empty() {
            ui.colored_label(egui::Color32::RED, &self.error_message);
        }
        if let Some(data) = &self.data {
            for f in &data.failures {
                ui.colored_label(
                    egui::Color32::RED,
                    format!("Could not load {}: {}", f.country, f.reason),
                );
            }
            let missing = data.missing_countries();
            if !missing.is_empty() {
                ui.colored_label(
                    egui::Color32::DARK_GRAY,
                    format!("No observations for {}", missing.join(", ")),
                );
            }
        }
    }

    fn data_table(&self, ui: &mut egui::Ui) {
        let Some(data) = self.data.as_ref().filter(|d| !d.is_empty()) else {
            return;
        };
        let locale = &self.config.chart.locale;
        ui.collapsing(format!("Data ({} rows)", data.rows.len()), |ui| {
            egui::ScrollArea::vertical()
                .max_height(260.0)
                .show(ui, |ui| {
                    egui::Grid::new("rows").striped(true).show(ui, |ui| {
                        ui.strong("Country");
                        ui.strong("Year");
                        ui.strong("Value");
                        ui.end_row();
                        for r in &data.rows {
                            ui.label(&r.country_name);
                            ui.label(r.year.to_string());
                            ui.label(table::format_value(r.value, locale));
                            ui.end_row();
                        }
                    });
                });
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_result();
        if self.is_loading() {
            ctx.request_repaint();
        }
        if self.preview_dirty {
            self.refresh_preview(ctx);
        }

        egui::SidePanel::left("countries")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| self.selection_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Economic Indicators Dashboard");
                ui.add_space(6.0);
                self.controls(ui);
                ui.add_space(6.0);
                self.messages(ui);
                ui.add_space(6.0);

                if let Some(tex) = &self.preview {
                    ui.add(egui::Image::new((tex.id(), tex.size_vec2())).shrink_to_fit());
                }
                ui.add_space(6.0);
                self.data_table(ui);
            });
        });
    }
}
