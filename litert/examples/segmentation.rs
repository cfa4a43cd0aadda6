//! Runs a multiclass selfie segmentation model on an image and writes the class map as a PNG.
//!
//! ```text
//! cargo run -p litert --example segmentation -- \
//!     --model-path selfie_multiclass_256x256.tflite \
//!     --input-image-path image.jpeg \
//!     --output-image-path /tmp/out.png
//! ```
//!
//! Set `RUST_LOG=debug` to see the runtime calls.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use image::{imageops, ImageBuffer, Rgba, RgbaImage};
use litert::{CompiledModel, EnvironmentBuilder, HwAccelerator, Model, Options};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const IMAGE_WIDTH: u32 = 256;
const IMAGE_HEIGHT: u32 = 256;
const SIGNATURE_INDEX: usize = 0;

const CLASS_COLORS: [[u8; 4]; 21] = [
    [0, 0, 0, 255],
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [64, 64, 64, 255],
    [64, 0, 0, 255],
    [0, 64, 0, 255],
    [0, 0, 64, 255],
    [128, 128, 128, 255],
    [128, 0, 0, 255],
    [0, 128, 0, 255],
    [0, 0, 128, 255],
    [192, 192, 192, 255],
    [192, 0, 0, 255],
    [0, 192, 0, 255],
    [0, 0, 192, 255],
    [255, 0, 255, 255],
    [255, 255, 0, 255],
    [0, 255, 255, 255],
    [192, 255, 255, 255],
    [255, 192, 255, 255],
];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `.tflite` segmentation model.
    #[arg(short, long)]
    model_path: PathBuf,

    #[arg(short, long)]
    input_image_path: PathBuf,

    #[arg(short, long)]
    output_image_path: PathBuf,

    /// Accelerator to compile the model for.
    #[arg(long, default_value = "cpu", value_parser = parse_accelerator)]
    accelerator: HwAccelerator,
}

fn parse_accelerator(value: &str) -> Result<HwAccelerator, String> {
    match value.to_ascii_lowercase().as_str() {
        "cpu" => Ok(HwAccelerator::Cpu),
        "gpu" => Ok(HwAccelerator::Gpu),
        "npu" => Ok(HwAccelerator::Npu),
        other => Err(format!("unknown accelerator `{other}`, expected cpu, gpu or npu")),
    }
}

fn load_image(path: &PathBuf) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to read input image `{}`", path.display()))?;
    Ok(imageops::resize(
        &img,
        IMAGE_WIDTH,
        IMAGE_HEIGHT,
        imageops::FilterType::Lanczos3,
    ))
}

/// Interleaved RGB, normalized to roughly [-1, 1].
fn image_to_tensor(img: &RgbaImage) -> Vec<f32> {
    img.pixels()
        .flat_map(|pixel| pixel.0[..3].iter().map(|&c| (c as f32 - 127.0) / 127.0))
        .collect()
}

fn class_map(logits: &[f32]) -> Result<RgbaImage> {
    let pixels = (IMAGE_WIDTH * IMAGE_HEIGHT) as usize;
    let num_classes = logits.len() / pixels;
    if num_classes == 0 || num_classes > CLASS_COLORS.len() {
        bail!("unexpected number of classes in the output tensor: {num_classes}");
    }
    Ok(ImageBuffer::from_fn(IMAGE_WIDTH, IMAGE_HEIGHT, |x, y| {
        let start = num_classes * (y * IMAGE_WIDTH + x) as usize;
        let class = logits[start..start + num_classes]
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map_or(0, |(i, _)| i);
        Rgba(CLASS_COLORS[class])
    }))
}

fn main() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
    litert::sync_native_log_severity()?;

    let args = Args::parse();

    let env = EnvironmentBuilder::build_default()?;
    let model = Model::from_file(&args.model_path)?;
    let options = Options::with_accelerators(args.accelerator)?;
    let compiled_model = CompiledModel::new(&env, &model, &options)?;
    info!("Model compiled for {}", args.accelerator);

    for signature in model.signatures()? {
        let signature = signature?;
        info!("Signature `{}`", signature.key()?);
        for name in signature.input_names()? {
            info!("  input  `{}`", name?);
        }
        for name in signature.output_names()? {
            info!("  output `{}`", name?);
        }
    }

    let input = image_to_tensor(&load_image(&args.input_image_path)?);

    let inputs = compiled_model.create_input_buffers(SIGNATURE_INDEX)?;
    let outputs = compiled_model.create_output_buffers(SIGNATURE_INDEX)?;
    info!(
        "Input is {}, output is {}",
        inputs[0].element_type(),
        outputs[0].element_type()
    );
    inputs[0].write(&input)?;
    compiled_model.run(SIGNATURE_INDEX, &inputs, &outputs)?;

    let mut logits = vec![0f32; outputs[0].packed_size()? / std::mem::size_of::<f32>()];
    outputs[0].read(&mut logits)?;

    class_map(&logits)?
        .save_with_format(&args.output_image_path, image::ImageFormat::Png)
        .with_context(|| {
            format!(
                "failed to write output image `{}`",
                args.output_image_path.display()
            )
        })?;
    info!("Wrote {}", args.output_image_path.display());
    Ok(())
}
