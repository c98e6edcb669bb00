use crate::error::AppError;
use crate::models::category::Category;
use crate::models::classify_types::ClassificationResult;
use image::imageops::FilterType;
use image::{ImageReader, RgbImage};
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::warn;

pub const INPUT_SIZE: u32 = 224;

/// Memory order of the single-image batch fed to the model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// `(1, H, W, 3)`, as Keras-trained models expect.
    #[default]
    Nhwc,
    /// `(1, 3, H, W)`
    Nchw,
}

pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, AppError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| AppError::Decode(format!("Failed to detect image format: {}", e)))?
        .decode()?;
    Ok(img.to_rgb8())
}

pub fn preprocess_bytes(
    bytes: &[u8],
    input_size: u32,
    layout: TensorLayout,
) -> Result<Array4<f32>, AppError> {
    let rgb = decode_image(bytes)?;
    preprocess_image(&rgb, input_size, layout)
}

/// Resizes (no cropping) to `input_size` square and scales channels from 0..=255 to 0.0..=1.0.
pub fn preprocess_image(
    rgb: &RgbImage,
    input_size: u32,
    layout: TensorLayout,
) -> Result<Array4<f32>, AppError> {
    let resized = image::imageops::resize(rgb, input_size, input_size, FilterType::CatmullRom);
    let raw = resized.into_raw();
    let side = input_size as usize;
    let hw = side * side;

    let scaled: Vec<f32> = raw.iter().map(|&v| v as f32 / 255.0).collect();

    let tensor = match layout {
        TensorLayout::Nhwc => Array4::from_shape_vec((1, side, side, 3), scaled),
        TensorLayout::Nchw => {
            // HWC -> CHW in tiles so the source and all three channel
            // write-heads stay in L1.
            let mut data = vec![0f32; 3 * hw];
            const TILE: usize = 1024;
            for base in (0..hw).step_by(TILE) {
                let end = (base + TILE).min(hw);
                for i in base..end {
                    let src = i * 3;
                    data[i] = scaled[src];
                    data[hw + i] = scaled[src + 1];
                    data[2 * hw + i] = scaled[src + 2];
                }
            }
            Array4::from_shape_vec((1, 3, side, side), data)
        }
    }
    .map_err(|e| AppError::Inference(format!("Failed to create tensor: {}", e)))?;

    Ok(tensor)
}

pub fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let exp_sum: f32 = scores.iter().map(|&x| (x - max).exp()).sum();
    scores.iter().map(|&x| (x - max).exp() / exp_sum).collect()
}

/// Arg-max over the model's output vector.
///
/// Equal maxima resolve to the lower index (first occurrence). That is the
/// behaviour the model was deployed with rather than a deliberate policy.
/// NaN entries never win.
pub fn top1(scores: &[f32]) -> Result<ClassificationResult, AppError> {
    if scores.len() != Category::COUNT {
        return Err(AppError::Inference(format!(
            "Expected {} class scores, model produced {}",
            Category::COUNT,
            scores.len()
        )));
    }

    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((idx, score)),
        }
    }

    let (idx, score) =
        best.ok_or_else(|| AppError::Inference("Model produced only NaN scores".to_string()))?;

    let confidence = if (0.0..=1.0).contains(&score) {
        score
    } else {
        warn!("Clamping out-of-range confidence {} to [0, 1]", score);
        score.clamp(0.0, 1.0)
    };

    let label = Category::from_index(idx)
        .ok_or_else(|| AppError::Inference(format!("No category at output index {}", idx)))?;

    Ok(ClassificationResult { label, confidence })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb};

    fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn nhwc_tensor_is_resized_and_scaled() {
        let bytes = png_bytes(40, 17, [255, 0, 51]);
        let tensor = preprocess_bytes(&bytes, INPUT_SIZE, TensorLayout::Nhwc).unwrap();
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert!((tensor[[0, 100, 100, 0]] - 1.0).abs() < 1e-6);
        assert!(tensor[[0, 100, 100, 1]].abs() < 1e-6);
        assert!((tensor[[0, 100, 100, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn nchw_tensor_puts_channels_first() {
        let bytes = png_bytes(8, 8, [0, 255, 0]);
        let tensor = preprocess_bytes(&bytes, 16, TensorLayout::Nchw).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 16, 16]);
        assert!(tensor[[0, 0, 5, 5]].abs() < 1e-6);
        assert!((tensor[[0, 1, 5, 5]] - 1.0).abs() < 1e-6);
        assert!(tensor[[0, 2, 15, 15]].abs() < 1e-6);
    }

    #[test]
    fn grayscale_input_becomes_three_channels() {
        let img = image::GrayImage::from_pixel(10, 10, image::Luma([128]));
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        let tensor = preprocess_bytes(&buf, 4, TensorLayout::Nhwc).unwrap();
        assert_eq!(tensor.shape(), &[1, 4, 4, 3]);
        assert_eq!(tensor[[0, 1, 1, 0]], tensor[[0, 1, 1, 2]]);
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let err = preprocess_bytes(b"definitely not an image", INPUT_SIZE, TensorLayout::Nhwc)
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn top1_picks_the_maximum() {
        let scores = [0.01, 0.02, 0.05, 0.0, 0.1, 0.6, 0.1, 0.1, 0.01, 0.01];
        let result = top1(&scores).unwrap();
        assert_eq!(result.label, Category::Metal);
        assert_eq!(result.confidence, 0.6);
    }

    #[test]
    fn ties_resolve_to_the_lower_index() {
        let scores = [0.0, 0.0, 0.4, 0.0, 0.0, 0.0, 0.0, 0.4, 0.2, 0.0];
        let result = top1(&scores).unwrap();
        assert_eq!(result.label, Category::Cardboard);
    }

    #[test]
    fn top1_is_deterministic() {
        let scores = [0.1, 0.05, 0.05, 0.1, 0.2, 0.1, 0.1, 0.2, 0.05, 0.05];
        let first = top1(&scores).unwrap();
        for _ in 0..10 {
            let again = top1(&scores).unwrap();
            assert_eq!(again.label, first.label);
            assert_eq!(again.confidence.to_bits(), first.confidence.to_bits());
        }
    }

    #[test]
    fn wrong_output_length_is_rejected() {
        assert!(matches!(top1(&[0.5, 0.5]), Err(AppError::Inference(_))));
    }

    #[test]
    fn nan_never_wins() {
        let mut scores = [0.0f32; 10];
        scores[0] = f32::NAN;
        scores[9] = 0.3;
        assert_eq!(top1(&scores).unwrap().label, Category::Trash);
        assert!(top1(&[f32::NAN; 10]).is_err());
    }

    #[test]
    fn out_of_range_confidence_is_clamped() {
        let mut scores = [0.0f32; 10];
        scores[6] = 3.5;
        let result = top1(&scores).unwrap();
        assert_eq!(result.label, Category::Paper);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn softmax_normalises_logits() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }
}
