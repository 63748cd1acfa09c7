//! Tidyshape CLI - reshape wide CSV files into tidy long tables
//!
//! ```bash
//! tidyshape reshape covid_eastafr.csv              # Auto-pick a built-in recipe
//! tidyshape reshape tb.csv --recipe tb.json        # Use a recipe file
//! tidyshape melt billboard.csv --id year --id artist --label week --value rank
//! tidyshape parse input.csv                        # Dump the wide table as JSON
//! tidyshape recipe bindura-tb                      # Print a built-in recipe
//! tidyshape presets                                # List built-in recipes
//! tidyshape samples editorial                      # Print a text sample
//! ```

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use tidyshape::config::Settings;
use tidyshape::logs::{log_info, LOGGER};
use tidyshape::transform::pipeline::format_delimiter;
use tidyshape::transform::PRESET_NAMES;
use tidyshape::{
    find_preset, parse_bytes, preset, reshape_csv, to_csv_string, to_json, OutputFormat,
    PipelineOutput, ReshapeOptions, ReshapeRecipe, Sample,
};

#[derive(Parser)]
#[command(name = "tidyshape")]
#[command(about = "Reshape wide CSV tables into tidy long format", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV file and print it as JSON rows
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Unpivot every non-identifier column
    Melt {
        /// Input CSV file
        input: PathBuf,

        /// Identifier column (repeatable)
        #[arg(long = "id", required = true)]
        identifiers: Vec<String>,

        /// Name of the label column
        #[arg(long, default_value = "variable")]
        label: String,

        /// Name of the value column
        #[arg(long, default_value = "value")]
        value: String,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Split, unpivot and combine following a recipe
    Reshape {
        /// Input CSV file
        input: PathBuf,

        /// Recipe JSON file
        #[arg(short, long, conflicts_with = "preset")]
        recipe: Option<PathBuf>,

        /// Built-in recipe name
        #[arg(short, long)]
        preset: Option<String>,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
    },

    /// Print a built-in recipe as JSON
    Recipe {
        /// Preset name
        name: String,
    },

    /// List built-in recipes
    Presets,

    /// Print text samples
    Samples {
        /// Sample to print (all if omitted)
        #[arg(value_enum)]
        name: Option<Sample>,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    LOGGER.set_verbosity(settings.verbosity);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input,
            delimiter,
            output,
        } => cmd_parse(&input, delimiter.or(settings.delimiter), output.as_deref()),

        Commands::Melt {
            input,
            identifiers,
            label,
            value,
            delimiter,
            output,
            format,
        } => {
            let recipe = ReshapeRecipe::new(identifiers)
                .with_label(label)
                .with_value(value);
            let options = options_for(&settings, delimiter);
            cmd_reshape(&input, &recipe, &options, output.as_deref(), format)
        }

        Commands::Reshape {
            input,
            recipe,
            preset,
            delimiter,
            output,
            format,
        } => {
            let options = options_for(&settings, delimiter);
            pick_recipe(&input, recipe.as_deref(), preset.as_deref(), &options)
                .and_then(|r| cmd_reshape(&input, &r, &options, output.as_deref(), format))
        }

        Commands::Recipe { name } => cmd_recipe(&name),

        Commands::Presets => cmd_presets(),

        Commands::Samples { name } => cmd_samples(name),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn options_for(settings: &Settings, delimiter: Option<char>) -> ReshapeOptions {
    let mut options = ReshapeOptions::from(settings);
    if delimiter.is_some() {
        options.delimiter = delimiter;
    }
    options
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let bytes = fs::read(input)?;
    let result = parse_bytes(&bytes, delimiter)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.headers.join(", "));
    eprintln!("✅ Parsed {} rows", result.table.row_count());

    let rows: Vec<serde_json::Value> = result
        .table
        .rows()
        .iter()
        .map(|row| {
            let obj = result
                .headers
                .iter()
                .zip(row)
                .map(|(h, cell)| (h.clone(), serde_json::to_value(cell).unwrap_or_default()))
                .collect();
            serde_json::Value::Object(obj)
        })
        .collect();

    let json = serde_json::to_string_pretty(&rows)?;
    write_output(&json, output)
}

/// Choose the recipe: explicit file, named preset, or best matching preset.
fn pick_recipe(
    input: &Path,
    recipe_path: Option<&Path>,
    preset_name: Option<&str>,
    options: &ReshapeOptions,
) -> Result<ReshapeRecipe, Box<dyn std::error::Error>> {
    if let Some(path) = recipe_path {
        eprintln!("📋 Recipe file: {}", path.display());
        let content = fs::read_to_string(path)?;
        return Ok(ReshapeRecipe::from_json(&content)?);
    }

    if let Some(name) = preset_name {
        eprintln!("📋 Preset: {}", name);
        return Ok(preset(name)?);
    }

    log_info("Looking for a matching built-in recipe...");
    let bytes = fs::read(input)?;
    let parsed = parse_bytes(&bytes, options.delimiter)?;
    match find_preset(&parsed.headers) {
        Some((name, recipe)) => {
            eprintln!("📋 Matched preset: {}", name);
            Ok(recipe)
        }
        None => Err(format!(
            "No built-in recipe matches columns [{}]; pass --recipe or use `melt`",
            parsed.headers.join(", ")
        )
        .into()),
    }
}

fn cmd_reshape(
    input: &Path,
    recipe: &ReshapeRecipe,
    options: &ReshapeOptions,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let result: PipelineOutput = reshape_csv(input, recipe, options)?;

    for group in &result.groups {
        eprintln!("   {}: {} columns → {} rows", group.name, group.columns, group.rows);
    }
    eprintln!("\n⚙️  Reshaped: {} rows", result.table.len());

    let content = match format {
        OutputFormat::Csv => to_csv_string(&result.table)?,
        OutputFormat::Json => to_json(&result.table)?,
    };
    write_output(&content, output)?;

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_recipe(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", preset(name)?.to_json()?);
    Ok(())
}

fn cmd_presets() -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📋 Built-in recipes ({}):\n", PRESET_NAMES.len());
    for name in PRESET_NAMES {
        let recipe = preset(name)?;
        println!("  📄 {}", name);
        println!("     {}", recipe.description);
        println!("     Identifiers: {}", recipe.identifiers.join(", "));
        println!("     Output: {} / {}", recipe.label, recipe.value);
        if !recipe.groups.is_empty() {
            let groups: Vec<&str> = recipe.groups.iter().map(|g| g.name.as_str()).collect();
            println!("     Groups: {}", groups.join(", "));
        }
        println!();
    }
    Ok(())
}

fn cmd_samples(name: Option<Sample>) -> Result<(), Box<dyn std::error::Error>> {
    let samples = match name {
        Some(sample) => vec![sample],
        None => Sample::all().to_vec(),
    };
    for sample in samples {
        println!("# {} ({} words)\n", sample.name(), sample.words().len());
        for paragraph in sample.paragraphs() {
            println!("{}\n", paragraph);
        }
    }
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
