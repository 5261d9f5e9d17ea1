use std::f64::consts::TAU;

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use aquadron_sim::config::ScenarioConfig;
use aquadron_sim::dynamics::state::{PSI, V1, Y1, Y2, YAW_RATE};
use aquadron_sim::sim::{Sample, StopReason, Trajectory};
use aquadron_sim::SessionStore;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = ScenarioConfig::default();
    let store = SessionStore::with_law(cfg.law()).with_arrival_tolerance(cfg.run.arrival_tolerance);
    let trajectory = store
        .create(&cfg.vehicle)
        .and_then(|id| store.run(id, &cfg.simulation_request()));

    let trajectory = match trajectory {
        Ok(t) => t,
        Err(e) => {
            eprintln!("simulation failed: {e}");
            std::process::exit(1);
        }
    };

    let app = SimViz { trajectory, cfg };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Aquadron Guidance", options, Box::new(|_| Ok(Box::new(app))))
}

struct SimViz {
    trajectory: Trajectory,
    cfg: ScenarioConfig,
}

impl SimViz {
    fn arrival_circle(&self) -> PlotPoints<'static> {
        let radius = self.cfg.run.arrival_tolerance.sqrt();
        let (cx, cy) = (self.cfg.target.y1, self.cfg.target.y2);
        (0..=64)
            .map(|i| {
                let a = TAU * i as f64 / 64.0;
                [cx + radius * a.cos(), cy + radius * a.sin()]
            })
            .collect()
    }
}

fn time_series(samples: &[&Sample], f: impl Fn(&Sample) -> f64) -> PlotPoints<'static> {
    samples.iter().map(|s| [s.time, f(s)]).collect()
}

impl eframe::App for SimViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let step = (self.trajectory.samples.len() / 2000).max(1);
        let sampled: Vec<&Sample> = self.trajectory.samples.iter().step_by(step).collect();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!(
                "Target ({:.1}, {:.1}) at {:.2} m/s  |  bearing: {}",
                self.cfg.target.y1, self.cfg.target.y2, self.cfg.target.speed, self.cfg.run.bearing
            ));
            let outcome = match self.trajectory.stop_reason {
                StopReason::Arrived => "arrived",
                StopReason::TimeLimit => "time limit",
            };
            ui.label(format!(
                "Stop: {:.2} s ({})  |  Samples: {}",
                self.trajectory.stop_time,
                outcome,
                self.trajectory.samples.len(),
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Path (m)");
                    let path: PlotPoints = sampled.iter().map(|s| [s.state[Y1], s.state[Y2]]).collect();
                    let circle = self.arrival_circle();
                    Plot::new("path")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Y1 (m)")
                        .y_axis_label("Y2 (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Path", path));
                            plot_ui.line(Line::new("Arrival disk", circle));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Surge speed (m/s)");
                    let points = time_series(&sampled, |s| s.state[V1]);
                    Plot::new("surge")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("v1", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Heading (deg)");
                    let points = time_series(&sampled, |s| s.state[PSI].to_degrees());
                    Plot::new("heading")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("psi", points));
                        });
                });

                ui.vertical(|ui| {
                    ui.label("Yaw rate (deg/s)");
                    let points = time_series(&sampled, |s| s.state[YAW_RATE].to_degrees());
                    Plot::new("yaw_rate")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("r", points));
                        });
                });
            });
        });
    }
}
