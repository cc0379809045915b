use eframe::egui::{self, Color32, ColorImage, RichText, TextureHandle, TextureOptions};
use forgery_detect::{ForgeryDetector, Verdict};
use image::RgbaImage;

pub const TITLE: &str = "Image Forgery Detection";

const EXTRA_EXTENSIONS: &[&str] = &["jfif", "jpe"];
const ELA_PREVIEW_SIZE: u32 = 160;
const BUTTON_SIZE: [f32; 2] = [180.0, 28.0];

struct ResultView {
    text: String,
    color: Color32,
    ela: TextureHandle,
}

pub struct ForgeryApp {
    detector: ForgeryDetector,
    preview: Option<TextureHandle>,
    result: Option<ResultView>,
}

impl ForgeryApp {
    pub fn new(detector: ForgeryDetector) -> Self {
        Self {
            detector,
            preview: None,
            result: None,
        }
    }

    fn select_image(&mut self, ctx: &egui::Context) {
        let path = rfd::FileDialog::new()
            .add_filter("Image Files", &picker_extensions())
            .add_filter("All Files", &["*"])
            .pick_file();

        match self.detector.select_image(path) {
            Ok(Some(preview)) => {
                self.preview = Some(load_texture(ctx, "preview", &preview));
                self.result = None;
            }
            Ok(None) => {
                self.preview = None;
                self.result = None;
            }
            Err(err) => {
                log::error!("Could not open image: {}", err);
                show_error(&format!("Could not open image: {}", err));
            }
        }
    }

    fn detect_forgery(&mut self, ctx: &egui::Context) {
        match self.detector.detect() {
            Ok(outcome) => {
                let color = match outcome.detection.verdict {
                    Verdict::Authentic => Color32::from_rgb(0, 140, 0),
                    Verdict::Tampered => Color32::from_rgb(200, 0, 0),
                };
                let ela = forgery_detect::image_utils::thumbnail(
                    &image::DynamicImage::ImageRgb8(outcome.ela.image),
                    ELA_PREVIEW_SIZE,
                );

                self.result = Some(ResultView {
                    text: outcome.detection.summary(),
                    color,
                    ela: load_texture(ctx, "ela", &ela),
                });
            }
            Err(err) => {
                log::error!("Detection failed: {}", err);
                show_error(&err.user_message());
            }
        }
    }
}

impl eframe::App for ForgeryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(10.0);
                ui.label(RichText::new(TITLE).size(20.0).strong());
                ui.add_space(10.0);

                if ui.add_sized(BUTTON_SIZE, egui::Button::new("Select Image")).clicked() {
                    self.select_image(ctx);
                }
                ui.add_space(10.0);

                if let Some(preview) = &self.preview {
                    ui.add(egui::Image::new(egui::load::SizedTexture::from_handle(preview)));
                    ui.add_space(10.0);
                }

                if ui.add_sized(BUTTON_SIZE, egui::Button::new("Detect Forgery")).clicked() {
                    self.detect_forgery(ctx);
                }
                ui.add_space(10.0);

                if let Some(result) = &self.result {
                    ui.label(RichText::new(&result.text).size(16.0).color(result.color));
                    ui.add_space(6.0);
                    ui.label("Error level analysis");
                    ui.add(egui::Image::new(egui::load::SizedTexture::from_handle(&result.ela)));
                }
            });
        });
    }
}

// GTK matches filter patterns case-sensitively, so list both cases.
fn picker_extensions() -> Vec<String> {
    let mut extensions: Vec<String> = image::ImageFormat::all()
        .filter(|format| format.reading_enabled())
        .flat_map(|format| format.extensions_str().iter().copied())
        .chain(EXTRA_EXTENSIONS.iter().copied())
        .flat_map(|ext| [ext.to_lowercase(), ext.to_uppercase()])
        .collect();

    extensions.sort();
    extensions.dedup();
    extensions
}

fn load_texture(ctx: &egui::Context, name: &str, image: &RgbaImage) -> TextureHandle {
    let size = [image.width() as usize, image.height() as usize];
    let color_image = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
    ctx.load_texture(name, color_image, TextureOptions::LINEAR)
}

pub fn show_error(message: &str) {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Error")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
