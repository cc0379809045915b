use image::{DynamicImage, RgbImage, RgbaImage, imageops::FilterType};
use ndarray::Array4;

pub fn rgb_to_input_array(image: &RgbImage, size: u32) -> Array4<f32> {
    let resized = if image.dimensions() == (size, size) {
        image.clone()
    } else {
        image::imageops::resize(image, size, size, FilterType::CatmullRom)
    };

    let side = size as usize;
    Array4::from_shape_fn((1, side, side, 3), |(_, y, x, c)| {
        resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
}

pub fn thumbnail(image: &DynamicImage, max_side: u32) -> RgbaImage {
    let (width, height) = (image.width(), image.height());

    if width <= max_side && height <= max_side {
        return image.to_rgba8();
    }

    image.resize(max_side, max_side, FilterType::Lanczos3).to_rgba8()
}

pub fn channel_extrema(image: &RgbImage) -> [(u8, u8); 3] {
    let mut extrema = [(u8::MAX, u8::MIN); 3];

    for pixel in image.pixels() {
        for (c, (min, max)) in extrema.iter_mut().enumerate() {
            *min = (*min).min(pixel[c]);
            *max = (*max).max(pixel[c]);
        }
    }

    extrema
}
