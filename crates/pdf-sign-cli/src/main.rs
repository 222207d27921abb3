use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_sign::filter::{
    apply_ink_tint, describe_intensity, remove_background, transparent_pixel_count,
};
use pdf_sign::{CommittedPlacement, CropSelection, PlacementLedger, RelativeRect, SignatureAsset};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfsign", about = "Stamp signatures onto PDF pages", version)]
struct Cli {
    /// JSON options file (defaults apply for missing fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove the paper background from a signature photo
    Clean {
        /// Input photo (PNG, JPEG or BMP)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG with transparency
        #[arg(short, long)]
        output: PathBuf,

        /// Pixels brighter than this become transparent (150-255)
        #[arg(long)]
        brightness: Option<u8>,

        /// Grey pixels below this saturation become transparent (10-100)
        #[arg(long)]
        saturation: Option<u8>,

        /// Skip the median and smoothing pass
        #[arg(long)]
        no_smooth: bool,

        /// Blue ink intensity in percent (0 keeps the original colour)
        #[arg(long, default_value = "0")]
        blue: u8,

        /// Crop the photo first: x,y,width,height in pixels
        #[arg(long, value_parser = parse_crop)]
        crop: Option<CropSelection>,
    },

    /// Stamp a signature onto a PDF
    Sign {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,

        /// Signature image (transparent PNG works best)
        #[arg(short, long)]
        signature: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Placement as PAGE:X,Y,W,H (1-based page, fractions of the page
        /// measured from the top-left corner). Repeat for more signatures.
        #[arg(long = "place", required = true, value_parser = parse_placement)]
        placements: Vec<CommittedPlacement>,
    },

    /// Show page count and page sizes
    Info {
        /// Input PDF file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn parse_numbers<T: std::str::FromStr>(s: &str, expected: usize) -> Result<Vec<T>, String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<T>())
        .collect::<Result<Vec<T>, _>>()
        .map_err(|_| format!("'{}' is not a list of numbers", s))?;
    if values.len() != expected {
        return Err(format!("expected {} values, got {}", expected, values.len()));
    }
    Ok(values)
}

fn parse_crop(s: &str) -> Result<CropSelection, String> {
    let v = parse_numbers::<u32>(s, 4)?;
    Ok(CropSelection {
        x: v[0],
        y: v[1],
        width: v[2],
        height: v[3],
    })
}

fn parse_placement(s: &str) -> Result<CommittedPlacement, String> {
    let (page, rect) = s
        .split_once(':')
        .ok_or_else(|| format!("'{}' is not PAGE:X,Y,W,H", s))?;
    let page: usize = page
        .trim()
        .parse()
        .map_err(|_| format!("invalid page number '{}'", page))?;
    if page == 0 {
        return Err("page numbers start at 1".to_string());
    }

    let v = parse_numbers::<f64>(rect, 4)?;
    let rect = RelativeRect::new(v[0], v[1], v[2], v[3]);
    if !rect.is_normalized() || rect.x + rect.width > 1.0 || rect.y + rect.height > 1.0 {
        return Err(format!("rect {} must lie within the page (0..1)", s));
    }

    Ok(CommittedPlacement {
        page: page - 1,
        rect,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let options = match &cli.config {
        Some(path) => pdf_sign::SignerOptions::load(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => pdf_sign::SignerOptions::default(),
    };

    match cli.command {
        Commands::Clean {
            input,
            output,
            brightness,
            saturation,
            no_smooth,
            blue,
            crop,
        } => {
            let mut params = options.processing;
            if let Some(brightness) = brightness {
                params.brightness_threshold = brightness;
            }
            if let Some(saturation) = saturation {
                params.saturation_threshold = saturation;
            }
            if no_smooth {
                params.smooth = false;
            }
            params.validate()?;
            if blue > pdf_sign::filter::MAX_INTENSITY {
                bail!("Blue intensity must be in 0..=100, got {}", blue);
            }

            let photo = SignatureAsset::load(&input)?;
            let source = match crop {
                Some(selection) => pdf_sign::crop_signature(photo.image(), selection)?,
                None => photo.image().clone(),
            };

            let cleaned = apply_ink_tint(&remove_background(&source, &params), blue);
            let cleared = transparent_pixel_count(&cleaned);
            let total = cleaned.width() as usize * cleaned.height() as usize;

            SignatureAsset::from_image(cleaned)?.save_png(&output)?;

            println!("Signature cleanup:");
            println!("  Size: {}x{}", source.width(), source.height());
            println!(
                "  Background removed: {} of {} pixels ({:.1}%)",
                cleared,
                total,
                100.0 * cleared as f64 / total as f64
            );
            println!("  Ink colour: {}", describe_intensity(blue));
            println!("Cleaned → {}", output.display());
        }

        Commands::Sign {
            input,
            signature,
            output,
            placements,
        } => {
            let document = pdf_sign::load_pdf(&input).await?;
            let signature = SignatureAsset::load(&signature)?;
            let ledger: PlacementLedger = placements.into_iter().collect();

            let signed = pdf_sign::sign_document(&document, &signature, &ledger)?;
            pdf_sign::save_pdf(signed, &output).await?;

            println!("Placements:");
            for (page, group) in ledger.group_by_page() {
                println!("  Page {}: {} signature(s)", page + 1, group.len());
            }
            println!(
                "Signed {} placement(s) → {}",
                ledger.total_count(),
                output.display()
            );
        }

        Commands::Info { input } => {
            let document = pdf_sign::load_pdf(&input).await?;
            let sizes = pdf_sign::compose::page_sizes(&document)?;

            println!("{}", input.display());
            println!("  Pages: {}", sizes.len());
            for (i, size) in sizes.iter().enumerate() {
                println!(
                    "  Page {}: {:.1} x {:.1} pt (origin {:.1}, {:.1})",
                    i + 1,
                    size.width,
                    size.height,
                    size.origin_x,
                    size.origin_y
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placement() {
        let placement = parse_placement("3:0.1,0.2,0.3,0.05").unwrap();
        assert_eq!(placement.page, 2);
        assert_eq!(placement.rect, RelativeRect::new(0.1, 0.2, 0.3, 0.05));
    }

    #[test]
    fn test_parse_placement_rejects_bad_input() {
        assert!(parse_placement("0:0.1,0.1,0.1,0.1").is_err());
        assert!(parse_placement("1:0.9,0.1,0.2,0.1").is_err());
        assert!(parse_placement("1:0.1,0.1,0.1").is_err());
        assert!(parse_placement("0.1,0.1,0.1,0.1").is_err());
    }

    #[test]
    fn test_parse_crop() {
        let crop = parse_crop("10, 20, 300, 80").unwrap();
        assert_eq!((crop.x, crop.y, crop.width, crop.height), (10, 20, 300, 80));
        assert!(parse_crop("10,20").is_err());
    }

    #[test]
    fn test_cli_parses_repeated_places() {
        let cli = Cli::try_parse_from([
            "pdfsign",
            "sign",
            "-i",
            "in.pdf",
            "-s",
            "sig.png",
            "-o",
            "out.pdf",
            "--place",
            "1:0.1,0.1,0.2,0.05",
            "--place",
            "2:0.5,0.5,0.2,0.05",
        ])
        .unwrap();
        match cli.command {
            Commands::Sign { placements, .. } => assert_eq!(placements.len(), 2),
            _ => panic!("Expected sign command"),
        }
    }
}
