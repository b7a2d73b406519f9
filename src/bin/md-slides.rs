use clap::{Parser, Subcommand};
use md_slides::{
    Capabilities, Exporter, HtmlExporter, Reconciler, SettingsLayer, SlidesError, ViewSnapshot,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::prelude::*;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a markdown deck to standalone HTML
    Render {
        input: PathBuf,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Show slide count, effective config and slide offsets
    Info {
        input: PathBuf,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Render every markdown file under a directory
    Build {
        dir: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlideInfo {
    index: usize,
    start: usize,
    end: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeckInfo<'a> {
    slide_count: usize,
    front_matter: bool,
    config: &'a md_slides::EffectiveConfig,
    slides: Vec<SlideInfo>,
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Render {
            input,
            output,
            settings,
        } => render_command(input, output.as_deref(), settings.as_deref()),
        Commands::Info {
            input,
            json,
            settings,
        } => info_command(input, *json, settings.as_deref()),
        Commands::Build { dir, out, settings } => build_command(dir, out, settings.as_deref()),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn capabilities() -> Capabilities {
    #[cfg(feature = "markdown")]
    {
        Capabilities::none().with_markdown_renderer(Arc::new(md_slides::PulldownRenderer))
    }
    #[cfg(not(feature = "markdown"))]
    {
        Capabilities::none()
    }
}

fn read_settings(path: Option<&Path>) -> md_slides::Result<SettingsLayer> {
    match path {
        Some(path) => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => Ok(SettingsLayer::default()),
    }
}

fn snapshot_of(
    reconciler: &mut Reconciler,
    input: &Path,
    settings: &SettingsLayer,
) -> md_slides::Result<Arc<ViewSnapshot>> {
    let text = fs::read_to_string(input)?;
    Ok(reconciler.reconcile(None, &text, settings))
}

fn exporter_for(input: &Path) -> HtmlExporter {
    let title = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Slides".to_string());
    HtmlExporter::new(title)
}

fn render_command(
    input: &Path,
    output: Option<&Path>,
    settings: Option<&Path>,
) -> md_slides::Result<()> {
    let settings = read_settings(settings)?;
    let mut reconciler = Reconciler::new(md_slides::Dispatcher::probe(&capabilities()));
    let snapshot = snapshot_of(&mut reconciler, input, &settings)?;
    let exporter = exporter_for(input);

    match output {
        Some(path) => exporter.export_to(&snapshot, path),
        None => {
            print!("{}", exporter.export(&snapshot));
            Ok(())
        }
    }
}

fn info_command(input: &Path, json: bool, settings: Option<&Path>) -> md_slides::Result<()> {
    let settings = read_settings(settings)?;
    let mut reconciler = Reconciler::new(md_slides::Dispatcher::minimal());
    let snapshot = snapshot_of(&mut reconciler, input, &settings)?;
    let config = snapshot.config();

    if json {
        let info = DeckInfo {
            slide_count: snapshot.slide_count(),
            front_matter: snapshot.front_matter().is_some(),
            config,
            slides: snapshot
                .slides()
                .iter()
                .enumerate()
                .map(|(index, span)| SlideInfo {
                    index,
                    start: span.start,
                    end: span.end,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Slides: {}", snapshot.slide_count());
    println!("Theme: {}", config.theme);
    println!("Size: {}", config.aspect_ratio);
    println!("Background: {}", config.background_color);
    println!("Text color: {}", config.text_color);
    println!("Font size: {}px", config.font_size_px());
    for (index, span) in snapshot.slides().iter().enumerate() {
        println!("  [{}] {}..{}", index + 1, span.start, span.end);
    }
    Ok(())
}

fn build_command(dir: &Path, out: &Path, settings: Option<&Path>) -> md_slides::Result<()> {
    if !dir.is_dir() {
        return Err(SlidesError::Store(format!(
            "not a directory: {}",
            dir.display()
        )));
    }
    let settings = read_settings(settings)?;
    let mut reconciler = Reconciler::new(md_slides::Dispatcher::probe(&capabilities()));

    let inputs = markdown_files(dir);

    for input in &inputs {
        let relative = input.strip_prefix(dir).unwrap_or(input);
        let mut target = out.join(relative);
        let exporter = exporter_for(input);
        target.set_extension(exporter.extension());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let snapshot = snapshot_of(&mut reconciler, input, &settings)?;
        exporter.export_to(&snapshot, &target)?;
        println!("Rendered: {}", relative.display());
    }

    println!("Built {} deck(s)", inputs.len());
    Ok(())
}

/// Markdown files under `dir`. Entries that cannot be read are logged and
/// skipped.
fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.path().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext == "md" || ext == "markdown")
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markdown_files_skips_walk_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "# A").unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        assert_eq!(markdown_files(dir.path()), vec![dir.path().join("a.md")]);

        let missing = dir.path().join("missing");
        assert!(markdown_files(&missing).is_empty());
    }
}
