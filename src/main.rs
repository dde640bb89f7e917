mod app;
mod color;
mod layout;
mod tag;
mod util;

use std::path::PathBuf;

use clap::Parser;

use app::{GraphOptions, TagViewApp};
use tag::DocumentSource;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON document to visualize.
    data: PathBuf,

    /// Read the document as a nested label tree or as predicted paths.
    #[arg(long, value_enum, default_value_t = Mode::Paths)]
    mode: Mode,

    /// Depth below which the label tree is collapsed (tree mode only).
    #[arg(long, default_value_t = 2)]
    collapse_level: usize,

    /// Content width used for layout and pan bounds.
    #[arg(long, default_value_t = 960.0)]
    width: f32,

    /// Content height used for layout and pan bounds.
    #[arg(long, default_value_t = 960.0)]
    height: f32,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum Mode {
    Tree,
    Paths,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let source = match args.mode {
        Mode::Tree => DocumentSource::LabelTree(args.data),
        Mode::Paths => DocumentSource::PredictionPaths(args.data),
    };
    let graph_options = GraphOptions {
        collapse_level: args.collapse_level,
        ..GraphOptions::default()
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "tagview",
        options,
        Box::new(move |cc| {
            Ok(Box::new(TagViewApp::new(
                cc,
                source,
                graph_options,
                args.width,
                args.height,
            )))
        }),
    )
}
