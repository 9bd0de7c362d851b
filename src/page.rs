//! Sample page generator: one manual illustration per setup step.
//!
//! Each step ranks the image index with its own query and picks the best
//! image not already used by an earlier step, preferring images whose page
//! or heading mentions one of the step's keywords. Chosen assets are copied
//! next to the generated page under deterministic names.

use std::{
    collections::HashSet,
    fmt::Write as _,
    path::{Path, PathBuf},
};

use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{info, warn};

use crate::{bm25, error::Result, record::ImageRecord};

/// Query used when the caller gives none.
pub const DEFAULT_QUERY: &str = "Blender install setup language preferences";

/// Candidates considered per step.
pub const CANDIDATE_LIMIT: usize = 30;

/// Name of the generated page inside the output directory.
pub const PAGE_FILE: &str = "index.html";

/// Directory, inside the output directory, receiving copied images.
pub const IMAGE_DIR: &str = "images";

/// One section of the generated page.
#[derive(Debug, Clone, Copy)]
pub struct Step {
    pub title: &'static str,
    pub body: &'static str,
    pub query: &'static str,
    /// Lower-case fragments that mark an image as a good fit.
    pub prefer: &'static [&'static str],
}

pub const STEPS: &[Step] = &[
    Step {
        title: "Step 1: Download Blender",
        body: "Visit the official Blender site and download the latest stable installer for your OS.",
        query: "download blender",
        prefer: &["download", "getting_started"],
    },
    Step {
        title: "Step 2: Run the Installer",
        body: "Follow the installer prompts and keep the default options for a clean setup.",
        query: "install windows blender",
        prefer: &["install_windows", "install", "installing"],
    },
    Step {
        title: "Step 3: Set Language Preferences",
        body: "Open Preferences, then choose your UI language and save the settings.",
        query: "Blender preferences interface",
        prefer: &["preferences"],
    },
];

/// An image placed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedImage {
    /// Path of the copy, relative to the page.
    pub src: String,
    pub caption: String,
    pub heading: String,
}

/// Outcome of one generation run.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub path: PathBuf,
    /// One entry per step; `None` renders a placeholder.
    pub images: Vec<Option<PlacedImage>>,
}

fn is_preferred(record: &ImageRecord, prefer: &[&str]) -> bool {
    let hay = format!(
        "{} {} {}",
        record.file, record.heading_path, record.page_title
    )
    .to_lowercase();
    prefer.iter().any(|kw| hay.contains(kw))
}

/// Pick the best unused image for `query`.
///
/// Among the top [`CANDIDATE_LIMIT`] hits, the first preferred unused image
/// wins; otherwise the first unused one.
pub fn pick_image<'a>(
    records: &'a [ImageRecord],
    query: &str,
    used: &HashSet<String>,
    prefer: &[&str],
) -> Option<&'a ImageRecord> {
    let ranked = bm25::rank(records, query, CANDIDATE_LIMIT);
    let mut unused = ranked
        .iter()
        .map(|hit| hit.record)
        .filter(|r| !used.contains(&r.image));

    let first = unused.clone().next();
    unused.find(|r| is_preferred(r, prefer)).or(first)
}

/// Create `dir` if needed and delete the regular files directly inside it.
fn reset_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Copy the asset of `record` as `{index+1}-{basename}`.
///
/// Returns `None`, after logging, when the asset is missing or unreadable.
fn copy_image(
    corpus_root: &Path,
    image_dir: &Path,
    record: &ImageRecord,
    index: usize,
) -> Option<String> {
    let filename = format!("{}-{}", index + 1, basename(&record.image));
    let src = corpus_root.join(&record.image);
    match std::fs::copy(&src, image_dir.join(&filename)) {
        Ok(_) => Some(format!("{IMAGE_DIR}/{filename}")),
        Err(e) => {
            warn!(image = %src.display(), "cannot copy image: {e}");
            None
        }
    }
}

/// Generate the sample page under `out_dir`.
///
/// Steps are ranked with their own queries; `query` is used for a step
/// whose own query matches nothing.
pub fn generate(
    records: &[ImageRecord],
    query: &str,
    corpus_root: &Path,
    out_dir: &Path,
) -> Result<GeneratedPage> {
    let image_dir = out_dir.join(IMAGE_DIR);
    reset_dir(&image_dir)?;

    let mut used = HashSet::new();
    let mut images = Vec::with_capacity(STEPS.len());
    for (i, step) in STEPS.iter().enumerate() {
        let record = pick_image(records, step.query, &used, step.prefer)
            .or_else(|| pick_image(records, query, &used, step.prefer));
        let Some(record) = record else {
            info!(step = step.title, "no image found");
            images.push(None);
            continue;
        };
        used.insert(record.image.clone());

        let placed = copy_image(corpus_root, &image_dir, record, i).map(|src| {
            PlacedImage {
                src,
                caption: record
                    .caption
                    .clone()
                    .or_else(|| record.alt.clone())
                    .unwrap_or_default(),
                heading: if record.heading_path.is_empty() {
                    record.page_title.clone()
                } else {
                    record.heading_path.clone()
                },
            }
        });
        images.push(placed);
    }

    let path = out_dir.join(PAGE_FILE);
    std::fs::write(&path, render(STEPS, &images))?;
    info!(path = %path.display(), "wrote sample page");
    Ok(GeneratedPage { path, images })
}

const STYLE: &str = r#"
      :root { --bg: #0f172a; --card: #111827; --accent: #38bdf8; --text: #e2e8f0; --muted: #94a3b8; }
      * { box-sizing: border-box; }
      body { margin: 0; font-family: "Trebuchet MS", "Gill Sans", Arial, sans-serif; background: radial-gradient(circle at top, #1e293b, #0f172a 70%); color: var(--text); }
      header { padding: 48px 24px 20px; text-align: center; }
      header h1 { margin: 0 0 12px; font-size: 2.4rem; letter-spacing: 0.04em; }
      header p { margin: 0 auto; max-width: 640px; color: var(--muted); }
      main { max-width: 960px; margin: 0 auto; padding: 24px; display: grid; gap: 20px; }
      .card { background: rgba(17, 24, 39, 0.9); border: 1px solid rgba(56, 189, 248, 0.2); border-radius: 20px; padding: 24px; display: grid; grid-template-columns: 1fr 1fr; gap: 18px; align-items: center; }
      .step-title { font-size: 1.3rem; font-weight: 700; color: var(--accent); margin-bottom: 10px; }
      .card p { line-height: 1.6; }
      figure { margin: 0; display: grid; gap: 8px; }
      img { width: 100%; border-radius: 16px; border: 1px solid rgba(148, 163, 184, 0.2); background: #0b1220; }
      figcaption, .meta { font-size: 0.9rem; color: var(--muted); }
      .placeholder { display: grid; place-items: center; padding: 24px; border-radius: 16px; border: 1px dashed rgba(148, 163, 184, 0.4); }
      .placeholder-box { width: 100%; height: 160px; border-radius: 12px; background: rgba(148, 163, 184, 0.15); display: grid; place-items: center; color: var(--muted); }
      @media (max-width: 840px) { .card { grid-template-columns: 1fr; } }
"#;

/// Render the page; `images` is parallel to `steps`.
pub fn render(steps: &[Step], images: &[Option<PlacedImage>]) -> String {
    let mut cards = String::new();
    for (step, image) in steps.iter().zip(images) {
        let figure = match image {
            Some(img) => {
                let caption = if img.caption.is_empty() {
                    "Reference image from Blender manual."
                } else {
                    img.caption.as_str()
                };
                let alt = if img.caption.is_empty() {
                    "Blender image"
                } else {
                    img.caption.as_str()
                };
                format!(
                    concat!(
                        "<figure>\n",
                        "            <img src=\"{src}\" alt=\"{alt}\" />\n",
                        "            <figcaption>{caption}</figcaption>\n",
                        "            <div class=\"meta\">{heading}</div>\n",
                        "          </figure>"
                    ),
                    src = encode_double_quoted_attribute(&img.src),
                    alt = encode_double_quoted_attribute(alt),
                    caption = encode_text(caption),
                    heading = encode_text(&img.heading),
                )
            }
            None => concat!(
                "<div class=\"placeholder\">\n",
                "            <div class=\"placeholder-box\">Image pending</div>\n",
                "          </div>"
            )
            .to_string(),
        };
        let _ = write!(
            cards,
            concat!(
                "\n      <section class=\"card\">\n",
                "        <div class=\"step\">\n",
                "          <div class=\"step-title\">{title}</div>\n",
                "          <p>{body}</p>\n",
                "        </div>\n",
                "          {figure}\n",
                "      </section>"
            ),
            title = encode_text(step.title),
            body = encode_text(step.body),
            figure = figure,
        );
    }

    format!(
        concat!(
            "<!doctype html>\n",
            "<html lang=\"en\">\n",
            "  <head>\n",
            "    <meta charset=\"utf-8\" />\n",
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n",
            "    <title>Blender Install Setup (Sample)</title>\n",
            "    <style>{style}    </style>\n",
            "  </head>\n",
            "  <body>\n",
            "    <header>\n",
            "      <h1>Blender Install Setup</h1>\n",
            "      <p>A lightweight sample page generated from Blender manual images and metadata.</p>\n",
            "    </header>\n",
            "    <main>{cards}\n",
            "    </main>\n",
            "  </body>\n",
            "</html>\n"
        ),
        style = STYLE,
        cards = cards,
    )
}
