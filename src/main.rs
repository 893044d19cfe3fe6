//! Sheet Composer CLI
//!
//! Usage:
//!   sheet-composer [OPTIONS] [CHARACTER_FILE]
//!
//! Options:
//!   --body/--technique/--spirit/--social <N>  Group scores (digits or empty)
//!   --acquire <SKILL,...>                     Acquired skills
//!   --tiled                                   Legacy 2x2 template sheet
//!   --data-url                                Print a data URL instead of writing a file
//!   -d, --debug                               Debug logging and region outlines
//!   -h, --help                                Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

use sheet_composer::font::{list_local_fonts, scale_preset};
use sheet_composer::renderer::load_template;
use sheet_composer::sheet::read_portrait;
use sheet_composer::{
    compose_tiled, compose_with_config, AppConfig, AttributeGroup, CharacterFile, ComposeConfig,
    ComposeError, ConfigError, Fonts, InputError, Score, SheetRequest, Skill, Stylesheet,
    StylesheetError,
};

const DEFAULT_CONFIG_PATH: &str = "sheet-composer.toml";
const DEFAULT_FONTS_DIR: &str = "assets/fonts";

#[derive(Parser)]
#[command(name = "sheet-composer")]
#[command(about = "Render tabletop RPG character stats into a PNG sheet")]
struct Cli {
    /// Character file (TOML); flags override its values
    character: Option<PathBuf>,

    /// Body score
    #[arg(long)]
    body: Option<String>,

    /// Technique score
    #[arg(long)]
    technique: Option<String>,

    /// Spirit score
    #[arg(long)]
    spirit: Option<String>,

    /// Social score
    #[arg(long)]
    social: Option<String>,

    /// Acquired skills, by identifier or label
    #[arg(long, value_delimiter = ',')]
    acquire: Vec<String>,

    /// Character name
    #[arg(long)]
    name: Option<String>,

    /// Faction: fugeki (a) or tsukumogami (b)
    #[arg(long)]
    faction: Option<String>,

    /// Portrait image (PNG or JPEG, at most 10 MiB)
    #[arg(long)]
    portrait: Option<PathBuf>,

    /// Stylesheet file for colours (TOML format)
    #[arg(long)]
    style: Option<PathBuf>,

    /// Font file used for sheet text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Extra multiplier on font sizes
    #[arg(long)]
    font_scale: Option<f32>,

    /// Put the stats on the left and the portrait on the right
    #[arg(long)]
    swap: bool,

    /// Output file (defaults to <name>.png in the output directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Produce the legacy 2x2 template sheet
    #[arg(long)]
    tiled: bool,

    /// Template sheet image for --tiled
    #[arg(long)]
    template: Option<PathBuf>,

    /// Downscale the result by this factor in (0, 1]
    #[arg(long)]
    scale: Option<f64>,

    /// Print a data:image/png;base64 URL instead of writing a file
    #[arg(long)]
    data_url: bool,

    /// Config file with remembered paths
    #[arg(long)]
    config: Option<PathBuf>,

    /// Remember --font and --template in the config file
    #[arg(long)]
    save_config: bool,

    /// List fonts in the configured fonts directory and exit
    #[arg(long)]
    list_fonts: bool,

    /// Debug mode: verbose logging and region outlines
    #[arg(short, long)]
    debug: bool,
}

/// Everything that can stop the CLI
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Input(#[from] InputError),

    #[error("{0}")]
    Compose(#[from] ComposeError),

    #[error("stylesheet: {0}")]
    Stylesheet(#[from] StylesheetError),

    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_secs()
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let app_config = AppConfig {
        font_path: cli.font.clone(),
        template_path: cli.template.clone(),
        ..AppConfig::default()
    }
    .merged_with(AppConfig::load_or_default(&config_path));

    if cli.save_config {
        app_config.save(&config_path)?;
        println!("Saved config to {}", config_path.display());
    }

    if cli.list_fonts {
        let dir = app_config
            .fonts_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FONTS_DIR));
        for (name, path) in list_local_fonts(&dir) {
            println!("{}\t{}", name, path.display());
        }
        return Ok(());
    }

    let request = build_request(&cli)?;

    let fonts = Fonts::load(
        app_config.font_path.as_deref(),
        app_config.reference_font_path.as_deref(),
    );
    let preset = fonts
        .face()
        .and_then(|face| face.source().file_stem())
        .and_then(|stem| stem.to_str())
        .map(scale_preset)
        .unwrap_or(1.0);

    let stylesheet = match &cli.style {
        Some(path) => Stylesheet::from_file(path)?,
        None => Stylesheet::default(),
    };

    let config = ComposeConfig::from_fonts(fonts)
        .with_font_scale(preset * cli.font_scale.unwrap_or(1.0))
        .with_stylesheet(stylesheet)
        .with_mirrored(cli.swap)
        .with_debug(cli.debug);

    let mut sheet = if cli.tiled {
        let template = app_config.template_path.as_deref().and_then(load_template);
        compose_tiled(&request, &config, template.as_ref())?
    } else {
        compose_with_config(&request, &config)?
    };

    if let Some(factor) = cli.scale {
        sheet = sheet.downscaled(factor)?;
    }

    if cli.data_url {
        println!("{}", sheet.to_data_url());
        return Ok(());
    }

    let output = cli.output.clone().unwrap_or_else(|| {
        let file_name = sheet.file_name();
        match &app_config.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    });
    write_output(&output, &sheet.png)?;
    println!("{} ({}x{})", output.display(), sheet.width, sheet.height);
    Ok(())
}

/// Start from the character file, if any, and apply flag overrides
fn build_request(cli: &Cli) -> Result<SheetRequest, CliError> {
    let mut request = match &cli.character {
        Some(path) => CharacterFile::from_file(path)?.request,
        None => SheetRequest::new(),
    };

    let scores = [
        (AttributeGroup::Body, &cli.body),
        (AttributeGroup::Technique, &cli.technique),
        (AttributeGroup::Spirit, &cli.spirit),
        (AttributeGroup::Social, &cli.social),
    ];
    for (group, input) in scores {
        if let Some(input) = input {
            request.scores.set(group, Score::parse(group, input)?);
        }
    }

    for name in cli.acquire.iter().filter(|n| !n.trim().is_empty()) {
        let skill: Skill = name.trim().parse()?;
        request.skills.set(skill, true);
    }

    if let Some(name) = &cli.name {
        request.name = name.clone();
    }
    if let Some(faction) = &cli.faction {
        request.faction = faction.parse()?;
    }
    if let Some(path) = &cli.portrait {
        request.portrait = read_portrait(path);
    }

    Ok(request)
}

fn write_output(path: &Path, png: &[u8]) -> Result<(), CliError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, png)
    };
    write().map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}
