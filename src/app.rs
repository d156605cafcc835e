//! Interactive shell: two file pickers and a generate button.
//!
//! Generation runs on a worker thread so the form stays responsive; the
//! worker reports stage transitions and the final result over a channel
//! polled in `update()`. Pipeline failures end in the result modal, never
//! in a crash of the shell.

use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{unbounded, Receiver};
use eframe::egui;

use crate::error::PipelineError;
use crate::workflow::{GenerationReport, Progress, RenderSettings, VideoGenerator};

enum JobEvent {
    Progress(Progress),
    Finished(Result<GenerationReport, PipelineError>),
}

struct ModalMessage {
    title: String,
    body: String,
}

#[derive(Default)]
pub struct GeneratorApp {
    audio_path: String,
    output_path: String,
    job: Option<Receiver<JobEvent>>,
    stage: Option<Progress>,
    modal: Option<ModalMessage>,
}

impl GeneratorApp {
    fn start_job(&mut self) {
        let audio = PathBuf::from(self.audio_path.trim());
        let output = PathBuf::from(self.output_path.trim());
        let (tx, rx) = unbounded();

        thread::spawn(move || {
            let generator = VideoGenerator::new(RenderSettings::default());
            let progress_tx = tx.clone();
            let result = generator.generate(&audio, &output, move |p| {
                let _ = progress_tx.send(JobEvent::Progress(p));
            });
            let _ = tx.send(JobEvent::Finished(result));
        });

        self.job = Some(rx);
        self.stage = Some(Progress::Decoding);
    }

    fn poll_job(&mut self) {
        let Some(rx) = &self.job else { return };

        let mut finished = None;
        for event in rx.try_iter() {
            match event {
                JobEvent::Progress(p) => self.stage = Some(p),
                JobEvent::Finished(result) => finished = Some(result),
            }
        }

        if let Some(result) = finished {
            self.job = None;
            self.stage = None;
            self.modal = Some(match result {
                Ok(report) => ModalMessage {
                    title: "Success".to_string(),
                    body: format!(
                        "Video saved to {}\n\n{:.1}s, {} beats{}{}",
                        report.output.display(),
                        report.duration_seconds,
                        report.beat_count,
                        match report.tempo_bpm {
                            Some(bpm) => format!(" at {bpm:.0} BPM"),
                            None => String::new(),
                        },
                        if report.dropped_beats > 0 {
                            format!(" ({} dropped)", report.dropped_beats)
                        } else {
                            String::new()
                        },
                    ),
                },
                Err(e) => ModalMessage {
                    title: "Generation failed".to_string(),
                    body: e.to_string(),
                },
            });
        }
    }

    fn stage_label(&self) -> &'static str {
        match self.stage {
            Some(Progress::Decoding) => "Decoding audio…",
            Some(Progress::Analyzing) => "Detecting beats…",
            Some(Progress::Rendering) => "Rendering frames…",
            Some(Progress::Encoding) => "Encoding video…",
            _ => "Working…",
        }
    }
}

impl eframe::App for GeneratorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_job();
        let busy = self.job.is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Music Video Generator");
            ui.add_space(8.0);

            egui::Grid::new("paths").num_columns(3).show(ui, |ui| {
                ui.label("Audio file:");
                ui.add(egui::TextEdit::singleline(&mut self.audio_path).desired_width(320.0));
                if ui.button("Browse…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Audio Files", &["mp3", "wav"])
                        .pick_file()
                    {
                        self.audio_path = path.display().to_string();
                    }
                }
                ui.end_row();

                ui.label("Output file:");
                ui.add(egui::TextEdit::singleline(&mut self.output_path).desired_width(320.0));
                if ui.button("Browse…").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("MP4 Files", &["mp4"])
                        .set_file_name("output.mp4")
                        .save_file()
                    {
                        self.output_path = path.display().to_string();
                    }
                }
                ui.end_row();
            });

            ui.add_space(8.0);
            ui.add_enabled_ui(!busy, |ui| {
                if ui.button("Generate Video").clicked() {
                    if self.audio_path.trim().is_empty() || self.output_path.trim().is_empty() {
                        self.modal = Some(ModalMessage {
                            title: "Error".to_string(),
                            body: "Please select both an audio file and an output file."
                                .to_string(),
                        });
                    } else {
                        self.start_job();
                    }
                }
            });

            if busy {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(self.stage_label());
                });
                ctx.request_repaint_after(std::time::Duration::from_millis(100));
            }
        });

        if let Some(modal) = &self.modal {
            let mut close = false;
            egui::Window::new(modal.title.as_str())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(modal.body.as_str());
                    ui.add_space(4.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.modal = None;
            }
        }
    }
}

/// Builds the native window and runs the shell until it is closed.
pub fn run() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([560.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Music Video Generator",
        options,
        Box::new(|_cc| Ok(Box::new(GeneratorApp::default()))),
    )
}
