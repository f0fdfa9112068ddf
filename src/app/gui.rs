use crate::app::file_dialogs;
use crate::app::image_processing;
use crate::app::{App, ImageStatus};
use egui::{Color32, Frame, ProgressBar, RichText, Rounding, Slider, Stroke};
use png_webp_converter::utils::format_size;
use png_webp_converter::Quality;

const ACCENT: Color32 = Color32::from_rgb(100, 200, 250);
const DIM: Color32 = Color32::from_rgb(200, 200, 200);

pub fn render(app: &mut App, ctx: &egui::Context) {
    let hovering_files = !ctx.input().raw.hovered_files.is_empty();

    let frame = Frame {
        fill: Color32::from_rgb(30, 30, 40),
        rounding: Rounding::same(10.0),
        stroke: Stroke::new(1.0, if hovering_files { Color32::YELLOW } else { ACCENT }),
        inner_margin: egui::style::Margin::same(20.0),
        ..Default::default()
    };

    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        ui.heading(RichText::new("PNG / WebP Converter").size(28.0).color(ACCENT));
        ui.label(RichText::new("PNG and JPEG become WebP; WebP becomes PNG").color(DIM));
        ui.add_space(20.0);

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                let button_width = 220.0;
                let idle = !app.is_converting();

                ui.add_enabled_ui(idle, |ui| {
                    if ui.add_sized([button_width, 30.0], egui::Button::new("Add Images")).clicked() {
                        if let Some(files) = file_dialogs::select_images() {
                            app.add_paths(files);
                        }
                    }
                    ui.add_space(5.0);
                    if ui.add_sized([button_width, 30.0], egui::Button::new("Add Folder")).clicked() {
                        if let Some(folder) = file_dialogs::select_folder() {
                            app.add_paths(vec![folder]);
                        }
                    }
                    ui.add_space(5.0);
                    ui.horizontal(|ui| {
                        let half = (button_width - ui.spacing().item_spacing.x) / 2.0;
                        if ui.add_sized([half, 24.0], egui::Button::new("Select All")).clicked() {
                            app.select_all();
                        }
                        if ui.add_sized([half, 24.0], egui::Button::new("Remove Selected")).clicked() {
                            app.remove_selected();
                        }
                    });
                    ui.add_space(5.0);
                    if ui.add_sized([button_width, 30.0], egui::Button::new("Clear List")).clicked() {
                        app.clear_queue();
                    }
                });

                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.set_width(button_width);
                    ui.label(RichText::new("Output Folder").size(16.0).color(ACCENT));
                    ui.add(egui::TextEdit::singleline(&mut app.output_folder).hint_text("Same folder as input"));
                    ui.horizontal(|ui| {
                        if ui.button("Choose…").clicked() {
                            if let Some(dir) = file_dialogs::select_output_directory() {
                                app.output_folder = dir.display().to_string();
                            }
                        }
                        if ui.button("Reset").clicked() {
                            app.output_folder.clear();
                        }
                    });
                });

                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.set_width(button_width);
                    ui.label(RichText::new("Conversion Settings").size(16.0).color(ACCENT));
                    ui.add(Slider::new(&mut app.quality, Quality::MIN..=Quality::MAX).text("Quality"));
                    ui.label(RichText::new("Used for WebP output; PNG is lossless").color(DIM));
                });

                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.set_width(button_width);
                    ui.label(RichText::new("Results").size(16.0).color(ACCENT));
                    let converted = app.queue.iter().filter(|i| i.status == ImageStatus::Converted).count();
                    let failed = app
                        .queue
                        .iter()
                        .filter(|i| matches!(i.status, ImageStatus::Failed(_)))
                        .count();
                    let original: u64 = app.queue.iter().map(|i| i.original_size).sum();
                    let output: u64 = app.queue.iter().filter_map(|i| i.converted_size).sum();
                    ui.label(RichText::new(format!("Files: {}", app.queue.len())).color(DIM));
                    ui.label(RichText::new(format!("Converted: {}", converted)).color(DIM));
                    ui.label(RichText::new(format!("Failed: {}", failed)).color(DIM));
                    ui.label(RichText::new(format!("Original Size: {}", format_size(original))).color(DIM));
                    ui.label(RichText::new(format!("Output Size: {}", format_size(output))).color(DIM));
                });

                ui.add_space(10.0);

                if app.is_converting() {
                    if ui.add_sized([button_width, 30.0], egui::Button::new("Stop")).clicked() {
                        app.request_stop();
                    }
                } else {
                    let can_start = !app.queue.is_empty();
                    let label = if app.has_selection() {
                        "Convert Selected"
                    } else {
                        "Start Conversion"
                    };
                    let clicked = ui
                        .add_enabled_ui(can_start, |ui| {
                            ui.add_sized([button_width, 30.0], egui::Button::new(label))
                                .clicked()
                        })
                        .inner;
                    if clicked {
                        image_processing::start_conversion(app);
                    }
                }
            });

            ui.add_space(10.0);

            ui.vertical(|ui| {
                ui.group(|ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(ui.available_height() - 250.0);
                    ui.label(RichText::new("Queue").size(16.0).color(ACCENT));

                    if app.queue.is_empty() {
                        ui.add_space(40.0);
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new("Drop images or folders here").size(20.0).color(DIM));
                        });
                        return;
                    }

                    egui::ScrollArea::vertical().auto_shrink([false; 2]).show(ui, |ui| {
                        egui::Grid::new("queue_grid")
                            .num_columns(7)
                            .striped(true)
                            .show(ui, |ui| {
                                ui.label("");
                                ui.label(RichText::new("#").strong());
                                ui.label(RichText::new("Name").strong());
                                ui.label(RichText::new("Original Size").strong());
                                ui.label(RichText::new("Estimated").strong());
                                ui.label(RichText::new("Output Size").strong());
                                ui.label(RichText::new("Status").strong());
                                ui.end_row();

                                let idle = !app.is_converting();
                                let quality = app.quality;
                                for (index, image) in app.queue.iter_mut().enumerate() {
                                    let text_color = if app.progress.current == Some(index) {
                                        Color32::YELLOW
                                    } else {
                                        Color32::WHITE
                                    };
                                    ui.add_enabled(idle, egui::Checkbox::new(&mut image.selected, ""));
                                    ui.label(RichText::new(format!("{}", index + 1)).color(text_color));
                                    ui.label(RichText::new(&image.name).color(text_color));
                                    ui.label(RichText::new(format_size(image.original_size)).color(text_color));
                                    let estimate = image.estimated_size(quality).map(|size| format!("~{}", format_size(size)));
                                    ui.label(RichText::new(estimate.unwrap_or_else(|| "-".into())).color(DIM));
                                    ui.label(
                                        RichText::new(image.converted_size.map(format_size).unwrap_or_else(|| "-".into()))
                                            .color(text_color),
                                    );
                                    match &image.status {
                                        ImageStatus::Pending => ui.label(RichText::new("Pending").color(text_color)),
                                        ImageStatus::Processing => ui.label(RichText::new("Processing...").color(Color32::YELLOW)),
                                        ImageStatus::Converted => ui.label(RichText::new("Converted").color(Color32::GREEN)),
                                        ImageStatus::Failed(message) => {
                                            ui.label(RichText::new("Failed").color(Color32::RED)).on_hover_text(message.as_str())
                                        }
                                    };
                                    ui.end_row();
                                }
                            });
                    });
                });
            });
        });

        ui.add_space(20.0);

        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new("Conversion Log").size(16.0).color(ACCENT));
                if ui.small_button("Clear").clicked() {
                    app.logger.clear();
                }
            });

            if app.progress.total > 0 {
                let ratio = app.progress.completed as f32 / app.progress.total as f32;
                ui.add(ProgressBar::new(ratio).text(format!(
                    "{} / {} ({:.0}%)",
                    app.progress.completed,
                    app.progress.total,
                    ratio * 100.0
                )));
            }

            egui::ScrollArea::vertical()
                .max_height(200.0)
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    let logs = app.log_messages.lock();
                    for line in logs.iter() {
                        if line.is_error() {
                            ui.label(RichText::new(&line.text).color(Color32::RED));
                        } else {
                            ui.label(&line.text);
                        }
                    }
                });
        });
    });
}
