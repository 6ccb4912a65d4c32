//! Page-ordered PDF assembly.
//!
//! The assembler reads the persisted `page_<index>.<ext>` frames for one
//! run, orders them by the numeric page index parsed out of the file name
//! (a string sort would put `page_10` before `page_2`), and writes one PDF
//! with one page per frame, sized to the frame's pixel dimensions.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::RgbImage;
use once_cell::sync::Lazy;
use printpdf::{
    ColorBits, ColorSpace, Image as PdfImage, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use rayon::prelude::*;
use regex::Regex;
use tracing::{debug, info};

use crate::core::errors::{SheetError, SheetResult};

/// Resolution the pixel dimensions are mapped to PDF points at.
const DPI: f32 = 150.0;

/// Frame counts above this are loaded in parallel.
const PARALLEL_LOAD_THRESHOLD: usize = 4;

static FRAME_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^page_(\d+)\.([A-Za-z0-9]+)$").expect("valid frame name pattern"));

/// Lists the qualifying frame files in `dir` and returns them sorted by
/// numeric page index.
///
/// Only files named `page_<index>.<ext>` with the expected extension
/// qualify; everything else in the directory is ignored.
pub fn collect_frames(dir: &Path, ext: &str) -> SheetResult<Vec<(u32, PathBuf)>> {
    let mut frames = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(captures) = FRAME_NAME.captures(name) else {
            continue;
        };
        if !captures[2].eq_ignore_ascii_case(ext) {
            continue;
        }
        // Index width is bounded by the naming scheme, so this parse only
        // fails on absurd hand-crafted names; skip those like any other
        // non-qualifying file.
        if let Ok(index) = captures[1].parse::<u32>() {
            frames.push((index, path));
        }
    }

    frames.sort_by_key(|(index, _)| *index);
    Ok(frames)
}

/// Assembles the frames in `dir` into a single PDF at `output`.
///
/// # Errors
///
/// * `SheetError::Assembly` if no qualifying frame files exist — no output
///   file is created in that case.
/// * Image or IO errors if a frame cannot be loaded or the PDF cannot be
///   written.
pub fn assemble(dir: &Path, ext: &str, output: &Path) -> SheetResult<PathBuf> {
    let frames = collect_frames(dir, ext)?;
    if frames.is_empty() {
        return Err(SheetError::assembly(format!(
            "no page_*.{ext} frames found in {}",
            dir.display()
        )));
    }

    let images = load_frames(&frames)?;

    let doc = PdfDocument::empty("Sheet Music");
    for (page_number, image) in images.iter().enumerate() {
        let (width, height) = (image.width(), image.height());
        let page_width = Mm::from(Px(width as usize).into_pt(DPI));
        let page_height = Mm::from(Px(height as usize).into_pt(DPI));

        let (page, layer) = doc.add_page(
            page_width,
            page_height,
            format!("Page {}", page_number + 1),
        );

        let xobject = ImageXObject {
            width: Px(width as usize),
            height: Px(height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.as_raw().clone(),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        };
        PdfImage::from(xobject).add_to_layer(
            doc.get_page(page).get_layer(layer),
            ImageTransform {
                dpi: Some(DPI),
                ..Default::default()
            },
        );
        debug!(page = page_number + 1, width, height, "added page");
    }

    doc.save(&mut BufWriter::new(File::create(output)?))?;
    info!(pages = images.len(), output = %output.display(), "assembled document");
    Ok(output.to_path_buf())
}

/// Loads and RGB-normalizes the collected frames, in parallel above a small
/// threshold.
fn load_frames(frames: &[(u32, PathBuf)]) -> SheetResult<Vec<RgbImage>> {
    let load = |path: &PathBuf| -> SheetResult<RgbImage> {
        let image = image::open(path)?;
        Ok(image.to_rgb8())
    };

    if frames.len() > PARALLEL_LOAD_THRESHOLD {
        frames.par_iter().map(|(_, path)| load(path)).collect()
    } else {
        frames.iter().map(|(_, path)| load(path)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn write_frame(dir: &Path, name: &str, shade: u8) {
        let image = RgbImage::from_pixel(16, 16, Rgb([shade, shade, shade]));
        image.save(dir.join(name)).unwrap();
    }

    #[test]
    fn frames_are_sorted_numerically_not_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "page_10.jpg", 10);
        write_frame(dir.path(), "page_2.jpg", 2);
        write_frame(dir.path(), "page_1.jpg", 1);

        let frames = collect_frames(dir.path(), "jpg").unwrap();
        let indices: Vec<u32> = frames.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![1, 2, 10]);
    }

    #[test]
    fn non_matching_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(dir.path(), "page_1.jpg", 1);
        write_frame(dir.path(), "page_2.png", 2);
        std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();
        std::fs::write(dir.path().join("page_x.jpg"), "bad index").unwrap();

        let frames = collect_frames(dir.path(), "jpg").unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, 1);
    }

    #[test]
    fn assemble_orders_pages_and_writes_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        // Written out of order on purpose.
        write_frame(dir.path(), "page_3.jpg", 30);
        write_frame(dir.path(), "page_1.jpg", 10);
        write_frame(dir.path(), "page_2.jpg", 20);

        let output = dir.path().join("out.pdf");
        let written = assemble(dir.path(), "jpg", &output).unwrap();
        assert_eq!(written, output);
        let bytes = std::fs::read(&output).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn assemble_fails_without_frames_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.pdf");
        let result = assemble(dir.path(), "jpg", &output);
        assert!(matches!(result, Err(SheetError::Assembly { .. })));
        assert!(!output.exists());
    }
}
