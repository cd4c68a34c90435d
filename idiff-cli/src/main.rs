use clap::Parser;
use idiff::render::write_results;
use idiff::{
    parse_rois, validate, Finder, ImageSlot, Match, MatchContext, ScalarOps, SearchMode,
    TemplateMatchMethod, ValidationErrors,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Find a template in an image, or the differences between two images")]
struct Cli {
    /// Search for the second image inside the first.
    #[arg(long)]
    find: bool,
    /// Search for regions where the two images differ.
    #[arg(long)]
    diff: bool,
    /// First image: the source (find) or the reference (diff).
    #[arg(long, value_name = "FILE")]
    image1: Option<PathBuf>,
    /// Second image: the template (find) or the image to compare (diff).
    #[arg(long, value_name = "FILE")]
    image2: Option<PathBuf>,
    /// Similarity threshold, exclusive range (0, 1).
    #[arg(long)]
    match_similarity: Option<f64>,
    /// Maximum number of results.
    #[arg(long)]
    limit: Option<usize>,
    /// Correlation method: sqdiff-normed, ccorr-normed or ccoeff-normed.
    #[arg(long)]
    method: Option<TemplateMatchMethod>,
    /// Regions of interest as "x,y,w,h;x,y,w,h;...".
    #[arg(long)]
    rois: Option<String>,
    /// Title shown with the results.
    #[arg(long)]
    title: Option<String>,
    /// Path of the annotated result image.
    #[arg(long, value_name = "FILE")]
    result_image: Option<PathBuf>,
    /// Path of the annotated first image (diff mode).
    #[arg(long, value_name = "FILE")]
    result_source_image: Option<PathBuf>,
    /// Print a table of the matches.
    #[arg(long)]
    show_result: bool,
    /// Compute correlation surfaces row-parallel.
    #[arg(long)]
    parallel: bool,
    /// Write the JSON result here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// JSON file supplying defaults; explicit flags take precedence.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MethodConfig {
    SqdiffNormed,
    CcorrNormed,
    CcoeffNormed,
}

impl From<MethodConfig> for TemplateMatchMethod {
    fn from(value: MethodConfig) -> Self {
        match value {
            MethodConfig::SqdiffNormed => TemplateMatchMethod::SqdiffNormed,
            MethodConfig::CcorrNormed => TemplateMatchMethod::CcorrNormed,
            MethodConfig::CcoeffNormed => TemplateMatchMethod::CcoeffNormed,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    find: bool,
    diff: bool,
    image1: Option<PathBuf>,
    image2: Option<PathBuf>,
    match_similarity: Option<f64>,
    limit: Option<usize>,
    method: Option<MethodConfig>,
    rois: Option<String>,
    title: Option<String>,
    result_image: Option<PathBuf>,
    result_source_image: Option<PathBuf>,
    show_result: bool,
    parallel: bool,
    output_path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    score: f64,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

impl From<&Match> for MatchRecord {
    fn from(value: &Match) -> Self {
        Self {
            score: value.score(),
            x: value.x(),
            y: value.y(),
            width: value.width(),
            height: value.height(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    title: String,
    mode: &'static str,
    matches: Vec<MatchRecord>,
}

fn image_slot(path: Option<PathBuf>) -> ImageSlot {
    path.map_or(ImageSlot::Missing, ImageSlot::load)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("idiff=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config: Config = match &cli.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    let mut builder = MatchContext::builder()
        .find_specified(cli.find || config.find)
        .diff_specified(cli.diff || config.diff)
        .source_slot(image_slot(cli.image1.or(config.image1)))
        .target_slot(image_slot(cli.image2.or(config.image2)))
        .show_result(cli.show_result || config.show_result);
    if let Some(similarity) = cli.match_similarity.or(config.match_similarity) {
        builder = builder.match_similarity(similarity);
    }
    if let Some(limit) = cli.limit.or(config.limit) {
        builder = builder.limit(limit);
    }
    if let Some(method) = cli.method.or(config.method.map(Into::into)) {
        builder = builder.match_method(method);
    }
    if let Some(rois) = cli.rois.or(config.rois) {
        builder = builder.rois(parse_rois(&rois)?);
    }
    if let Some(title) = cli.title.or(config.title) {
        builder = builder.title(title);
    }
    if let Some(path) = cli.result_image.or(config.result_image) {
        builder = builder.result_image(path);
    }
    if let Some(path) = cli.result_source_image.or(config.result_source_image) {
        builder = builder.result_source_image(path);
    }
    let mut ctx = builder.build();

    if let Some(errors) = ValidationErrors::from_messages(validate(&ctx)) {
        for msg in errors.messages() {
            eprintln!("error: {msg}");
        }
        return Err(errors.into());
    }

    let finder = Finder::with_ops(ScalarOps::new().parallel(cli.parallel || config.parallel));
    finder.find(&mut ctx)?;
    write_results(&ctx)?;

    if ctx.show_result() {
        if !ctx.title().is_empty() {
            eprintln!("{}", ctx.title());
        }
        for (idx, m) in ctx.matches().iter().enumerate() {
            eprintln!("{:>4}  {m}", idx + 1);
        }
    }

    let output = Output {
        title: ctx.title().to_string(),
        mode: match ctx.mode() {
            Some(SearchMode::Difference) => "difference",
            _ => "template",
        },
        matches: ctx.matches().iter().map(MatchRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;
    match cli.output.or(config.output_path) {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
