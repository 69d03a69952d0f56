use std::path::Path;

use dicom_codec_rs::image_pipeline::{DicomPipeline, ExportConfig, PixelBuffer};
use dicom_codec_rs::logger::{self, info, warn};

const SAMPLE_PATH: &str = "data/sample.dcm";
const OUTPUT_PATH: &str = "outputs/test_reconstruct.dcm";

fn main() -> anyhow::Result<()> {
    logger::init();

    let sample = Path::new(SAMPLE_PATH);
    if !sample.exists() {
        warn!("Sample DICOM not found. Place one at '{}'.", SAMPLE_PATH);
        return Ok(());
    }

    let pipeline = DicomPipeline::new(ExportConfig::default());

    let (pixels, metadata) = pipeline.load(sample)?;
    info!("Loaded DICOM successfully");
    info!("Metadata: {:?}", metadata);
    info!(
        "Pixels: {}x{}, source bits allocated: {}",
        metadata.columns, metadata.rows, metadata.bits_allocated
    );

    pipeline.save(&PixelBuffer::Normalized(pixels), &metadata, OUTPUT_PATH)?;

    Ok(())
}
