use clap::{Parser, Subcommand};
use std::path::PathBuf;
use travelogue::{config, generate, output, scan};

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup — trivial, called exactly once
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "travelogue")]
#[command(about = "Static site generator for personal travel blogs")]
#[command(long_about = "\
Static site generator for personal travel blogs

Posts are Markdown with YAML front matter, grouped by travel. Each travel
directory carries an info.json (name, country, start, end); its country code
picks the flag icon shown next to the travel.

Content structure:

  site/
  ├── config.toml                  # Site config (optional)
  ├── flags/                       # Country flag SVGs (jp.svg, kr.svg, ...)
  ├── src/                         # Asset tree, mapped onto the output root
  │   ├── assets/styles/style.scss # Compiled to .css
  │   ├── about.page.json          # JSON page (supports @include)
  │   └── ...                      # Everything else copied as-is
  └── _posts/
      ├── 2018-05-osaka/
      │   ├── info.json
      │   ├── 01-arrival.md
      │   └── 02-dotonbori.md
      └── 2017-11-taipei/
          └── ...

Photos referenced as /photos/... live in the output directory (preserved
across builds) and get EXIF captions; YouTube image links become embeds.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = ".", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "docs", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan posts, render the site
    Build,
    /// Scan and validate content without writing output
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.source)?;

            println!("==> Scanning {}", cli.source.display());
            let report = scan::scan(&cli.source, &config)?;
            output::print_scan(&report);

            println!("==> Generating {}", cli.output.display());
            let generated = generate::generate(&cli.source, &cli.output, &report.travels, &config)?;
            output::print_generate(&generated);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let config = config::load_config(&cli.source)?;

            println!("==> Checking {}", cli.source.display());
            let report = scan::scan(&cli.source, &config)?;
            output::print_scan(&report);

            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
