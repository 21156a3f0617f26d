//! Command implementations. Each returns the text to print on success.

use crate::cli::{Cli, Command};
use crate::error::{CliError, CliResult};
use boothkit_core::{BoundingBox, Editor, EditorConfig, ImageCache, StoreError, Template, TemplateInfo};
use boothkit_render::{DecodingImageLoader, Layer, RenderContext, build_display_list, render_template};
use kurbo::Size;
use std::fmt::Write;
use std::path::Path;

/// Execute a parsed command line.
pub fn run(cli: &Cli) -> CliResult<String> {
    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match &cli.command {
        Command::Preset {
            count,
            orientation,
            name,
            event,
            background,
            out,
        } => {
            let mut editor = Editor::from_preset(*count, *orientation, config)?;
            editor.info = TemplateInfo::new(name.as_str(), event.as_str(), *orientation);
            if let Some(source) = background {
                editor.set_background_image(source.as_str());
            }
            emit(&editor.to_template(), out.as_deref())
        }
        Command::Distribute { template, columns, out } => {
            let (template, mut editor) = open(template, config)?;
            if *columns == Some(0) {
                return Err(CliError::InvalidArgument("columns must be at least 1".to_string()));
            }
            editor.distribute(*columns)?;
            emit(&resave(&template, &editor), out.as_deref())
        }
        Command::Snap {
            template,
            id,
            x,
            y,
            width,
            height,
            out,
        } => {
            let (template, mut editor) = open(template, config)?;
            snap(&template, &mut editor, id, *x, *y, (*width, *height), out.as_deref())
        }
        Command::Render {
            template,
            assets,
            png,
            scale,
        } => {
            let (_, editor) = open(template, config)?;
            let base_dir = match assets {
                Some(dir) => dir.clone(),
                None => template.parent().map(Path::to_path_buf).unwrap_or_default(),
            };
            render(&editor, &DecodingImageLoader::new(base_dir), png.as_deref(), *scale)
        }
        Command::Config => Ok(config.to_json()?),
    }
}

fn open(path: &Path, config: EditorConfig) -> CliResult<(Template, Editor)> {
    let template = Template::load(path)?;
    let editor = Editor::from_template(&template, config)?;
    log::info!(
        "opened {} ({} shapes, {})",
        path.display(),
        editor.store().len(),
        editor.info.orientation
    );
    Ok((template, editor))
}

/// The editor's state under the opened template's id.
fn resave(template: &Template, editor: &Editor) -> Template {
    let mut updated = editor.to_template();
    updated.id = template.id.clone();
    updated
}

fn emit(template: &Template, out: Option<&Path>) -> CliResult<String> {
    match out {
        Some(path) => {
            template.save(path)?;
            Ok(format!("wrote {}", path.display()))
        }
        None => Ok(template.to_json()?),
    }
}

fn snap(
    template: &Template,
    editor: &mut Editor,
    id: &str,
    x: f64,
    y: f64,
    size: (Option<f64>, Option<f64>),
    out: Option<&Path>,
) -> CliResult<String> {
    let current = editor
        .store()
        .get(id)
        .map(|shape| shape.bounds)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    let target = BoundingBox::new(x, y, size.0.unwrap_or(current.width), size.1.unwrap_or(current.height));
    let result = editor.place_shape(id, target)?;

    let b = result.bounds;
    let mut report = format!("{id}: x={} y={} width={} height={}", b.x, b.y, b.width, b.height);
    let rules: Vec<&str> = result.snapped_to.iter().map(|kind| kind.name()).collect();
    if rules.is_empty() {
        report.push_str("\nsnapped: none");
    } else {
        let _ = write!(report, "\nsnapped: {}", rules.join(", "));
    }
    if let Some(v) = result.guides.vertical {
        let _ = write!(report, "\nguide: vertical at x={v}");
    }
    if let Some(h) = result.guides.horizontal {
        let _ = write!(report, "\nguide: horizontal at y={h}");
    }
    if let Some(path) = out {
        resave(template, editor).save(path)?;
        let _ = write!(report, "\nwrote {}", path.display());
    }
    Ok(report)
}

fn render(editor: &Editor, loader: &DecodingImageLoader, png: Option<&Path>, scale: f64) -> CliResult<String> {
    let mut images = ImageCache::new();
    for source in editor.image_sources() {
        images.request(source);
    }
    pollster::block_on(images.load_pending(loader));

    let paper = editor.paper();
    let ctx = RenderContext::new(editor, &images, Size::new(paper.width, paper.height));
    let list = build_display_list(&ctx);

    let mut report = format!(
        "{} {}x{} paper, {} shapes, {} draw commands",
        editor.info.orientation,
        paper.width,
        paper.height,
        editor.store().len(),
        list.len()
    );
    for layer in [Layer::Paper, Layer::Shapes, Layer::Grid, Layer::Margins] {
        let _ = write!(report, "\n  {layer:?}: {}", list.count(layer));
    }
    let loaded = editor
        .image_sources()
        .into_iter()
        .filter(|source| images.bitmap(source).is_some())
        .count();
    let _ = write!(report, "\nimages: {loaded}/{} loaded", editor.image_sources().len());

    if let Some(path) = png {
        let result = render_template(editor, &images, scale)?;
        std::fs::write(path, result.encode_png()?)?;
        let _ = write!(report, "\nwrote {} ({}x{})", path.display(), result.width, result.height);
    }
    Ok(report)
}
