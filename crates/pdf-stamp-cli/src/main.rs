use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pdf_stamp::SurfaceRect;
use pdf_stamp::constants::PREVIEW_RENDER_SCALE;

#[derive(Parser)]
#[command(name = "pdfstamp", about = "PDF stamping tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Burn a PNG stamp into a PDF
    Stamp {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Stamp image (PNG)
        #[arg(short, long)]
        stamp: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// 1-based page to stamp
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Stamp every page instead of a single one
        #[arg(long)]
        all_pages: bool,

        /// Placement x in editing-surface units (500 × 707.11); give all
        /// four placement values or none for the centered default
        #[arg(long)]
        x: Option<f64>,

        /// Placement y in editing-surface units
        #[arg(long)]
        y: Option<f64>,

        /// Placement width in editing-surface units
        #[arg(long)]
        width: Option<f64>,

        /// Placement height in editing-surface units
        #[arg(long)]
        height: Option<f64>,
    },

    /// Render a page to a PNG image
    Render {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// 1-based page to render
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Render scale factor
        #[arg(long, default_value_t = PREVIEW_RENDER_SCALE)]
        scale: f32,
    },

    /// Print the page count of a PDF
    Pages {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn placement_from_args(
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
) -> Result<Option<SurfaceRect>> {
    match (x, y, width, height) {
        (Some(x), Some(y), Some(width), Some(height)) => {
            Ok(Some(SurfaceRect::new(x, y, width, height)))
        }
        (None, None, None, None) => Ok(None),
        _ => bail!("--x, --y, --width and --height must be given together"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stamp {
            input,
            stamp,
            output,
            page,
            all_pages,
            x,
            y,
            width,
            height,
        } => {
            let placement = placement_from_args(x, y, width, height)?;
            let pdf = tokio::fs::read(&input).await?;
            let stamp_png = tokio::fs::read(&stamp).await?;

            let stamped = if all_pages {
                pdf_stamp::stamp_all_pages(&pdf, &stamp_png, placement).await?
            } else {
                pdf_stamp::stamp_page(&pdf, &stamp_png, placement, page).await?
            };

            tokio::fs::write(&output, stamped).await?;
            if all_pages {
                println!("Stamped all pages → {}", output.display());
            } else {
                println!("Stamped page {} → {}", page, output.display());
            }
        }

        Commands::Render {
            input,
            page,
            output,
            scale,
        } => {
            let pdf = tokio::fs::read(&input).await?;
            let file_name = input
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());

            let rendered = pdf_render::render_page(&pdf, &file_name, page, scale).await?;
            tokio::fs::write(&output, &rendered.png).await?;
            println!(
                "Rendered page {} ({}×{}) → {}",
                rendered.page_number,
                rendered.width,
                rendered.height,
                output.display()
            );
        }

        Commands::Pages { input } => {
            let pdf = tokio::fs::read(&input).await?;
            let count = pdf_stamp::page_count(&pdf).await?;
            println!("{count}");
        }
    }

    Ok(())
}
