use anyhow::Result;
use clap::Parser;
use docscan::config::{BackendKind, ScanConfig};
use docscan::upload::{DriveBackend, HostedBackend, LocalBackend, StorageBackend};

/// Minimal, human-friendly document scanner:
/// - acquire a photo or scanned page from a file
/// - apply a filter plus brightness/contrast grade
/// - encode to JPEG/PNG and store locally or in the cloud with auto-expiry
#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(about = "📄 Scan, filter and store documents with auto-expiry")]
#[command(
    long_about = "Scan a document image, apply per-pixel filters (grayscale, black-and-white,
enhance, vivid) with brightness/contrast controls, then store the encoded result locally,
in Google Drive, or in a hosted storage backend with an auto-expiry policy."
)]
struct Args {
    /// Image file to scan
    #[arg(help = "Path of the image to scan")]
    input: String,

    /// Alternate image tried when the primary cannot be read
    #[arg(long, help = "Fallback image used when the input cannot be acquired")]
    fallback: Option<String>,

    /// Output directory for the local backend
    #[arg(short, long, default_value = "scans",
          help = "Directory scans are written to when using the local backend")]
    out_dir: String,

    /// Filter mode
    #[arg(long, default_value = "original",
          help = "Filter mode: original, grayscale, bw, enhance, vivid (unknown names mean original)")]
    filter: String,

    /// Brightness offset
    #[arg(long, default_value_t = 0, allow_negative_numbers = true,
          help = "Brightness offset, -100 to 100")]
    brightness: i32,

    /// Contrast wire value (100 = no change)
    #[arg(long, default_value_t = 100,
          help = "Contrast slider value, 0 to 300; divided by 100 for the multiplier")]
    contrast: i32,

    /// Output format
    #[arg(long, default_value = "jpeg", help = "Output format: jpeg or png")]
    format: String,

    /// Encoding quality preset
    #[arg(short, long, default_value = "best",
          help = "JPEG quality preset: draft (75), good (85), best (95), or a number 1-100")]
    quality: String,

    /// Storage backend
    #[arg(long, default_value = "local",
          help = "Storage backend: local, drive (DRIVE_ACCESS_TOKEN), hosted (SCANNER_API_URL/KEY)")]
    backend: String,

    /// How long stored scans are kept
    #[arg(long, default_value = "7d",
          help = "Retention before auto-expiry: 7 or 7d (days), 2w (weeks), 24h (hours, rounded up to whole days), 0 = keep forever")]
    retention: String,

    /// Disable auto-expiry for this scan
    #[arg(long, help = "Keep the stored scan forever (overrides --retention)")]
    keep_forever: bool,

    /// Drive folder / hosted bucket name
    #[arg(long, default_value = "Scans", help = "Drive folder or hosted bucket for scans")]
    folder: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    // Resolve retention (e.g. "7d", "2w", "24h", or --keep-forever)
    let retention_days = resolve_retention(args.keep_forever, &args.retention)?;

    // Parse quality preset or explicit factor
    let quality = parse_quality(&args.quality)?;

    let config = ScanConfig {
        input: args.input,
        fallback: args.fallback,
        output_dir: args.out_dir,
        filter: args.filter,
        brightness: args.brightness,
        contrast_wire: args.contrast,
        format: args.format,
        quality,
        backend: args.backend,
        retention_days,
        folder: args.folder,
    };

    config.validate().map_err(anyhow::Error::msg)?;
    let options = config.to_scan_options()?;
    let backend = build_backend(&config)?;

    let outcome = docscan::run_scan(&options, backend.as_ref()).await?;

    println!("Scan complete:");
    println!("  Source: {}x{}", outcome.width, outcome.height);
    println!("  Encoded: {} bytes", outcome.encoded_len);
    println!(
        "  Stored: {} ({})",
        outcome.receipt.filename, outcome.receipt.location
    );
    match outcome.receipt.expires_at {
        Some(expires) => println!("  Expires: {}", expires.format("%Y-%m-%d %H:%M UTC")),
        None => println!("  Expires: never"),
    }
    Ok(())
}

/// Build the configured storage backend, pulling credentials from the
/// environment (tokens never travel via flags).
fn build_backend(config: &ScanConfig) -> Result<Box<dyn StorageBackend>> {
    let kind = config.backend_kind().map_err(anyhow::Error::msg)?;
    match kind {
        BackendKind::Local => Ok(Box::new(LocalBackend::new(&config.output_dir))),
        BackendKind::Drive => {
            let token = std::env::var("DRIVE_ACCESS_TOKEN").map_err(|_| {
                anyhow::anyhow!("Drive backend needs DRIVE_ACCESS_TOKEN in the environment")
            })?;
            Ok(Box::new(DriveBackend::new(token, &config.folder)))
        }
        BackendKind::Hosted => {
            let url = std::env::var("SCANNER_API_URL").map_err(|_| {
                anyhow::anyhow!("Hosted backend needs SCANNER_API_URL in the environment")
            })?;
            let key = std::env::var("SCANNER_API_KEY").map_err(|_| {
                anyhow::anyhow!("Hosted backend needs SCANNER_API_KEY in the environment")
            })?;
            let user =
                std::env::var("SCANNER_USER_ID").unwrap_or_else(|_| "anonymous".to_string());
            Ok(Box::new(HostedBackend::new(url, key, &config.folder, user)))
        }
    }
}

/// Resolve the retention in days: `--keep-forever` wins over the
/// duration string
fn resolve_retention(keep_forever: bool, retention: &str) -> Result<u32> {
    if keep_forever {
        return Ok(0);
    }
    parse_retention(retention)
}

/// Parse retention string like "7", "7d", "2w", "24h" into days.
/// Expiry is tracked at day granularity, so hours round up to the
/// next whole day.
fn parse_retention(retention: &str) -> Result<u32> {
    if let Ok(days) = retention.parse::<u32>() {
        return Ok(days);
    }

    let len = retention.len();
    if len < 2 {
        return Err(anyhow::anyhow!("Invalid retention format: {}", retention));
    }

    let (num_str, unit) = retention.split_at(len - 1);
    let num: u32 = num_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid number in retention: {}", num_str))?;

    match unit {
        "h" => Ok(num.div_ceil(24)),
        "d" => Ok(num),
        "w" => Ok(num * 7),
        _ => Err(anyhow::anyhow!(
            "Invalid retention unit: {}. Use 'h' for hours, 'd' for days, 'w' for weeks",
            unit
        )),
    }
}

/// Parse quality preset into a JPEG quality factor
fn parse_quality(quality: &str) -> Result<u8> {
    if let Ok(factor) = quality.parse::<u8>() {
        return Ok(factor);
    }

    match quality.to_lowercase().as_str() {
        "draft" => Ok(75), // Smaller files, visible artifacts
        "good" => Ok(85),  // Balanced quality/size
        "best" => Ok(95),  // The scanner's default 0.95 factor
        _ => Err(anyhow::anyhow!(
            "Invalid quality preset: {}. Use: draft, good, best, or a number 1-100",
            quality
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_retention() {
        assert_eq!(parse_retention("7").unwrap(), 7);
        assert_eq!(parse_retention("7d").unwrap(), 7);
        assert_eq!(parse_retention("2w").unwrap(), 14);
        assert_eq!(parse_retention("0").unwrap(), 0);
        assert!(parse_retention("7y").is_err());
        assert!(parse_retention("").is_err());
    }

    #[test]
    fn test_parse_retention_hours_round_up_to_days() {
        assert_eq!(parse_retention("24h").unwrap(), 1);
        assert_eq!(parse_retention("12h").unwrap(), 1);
        assert_eq!(parse_retention("36h").unwrap(), 2);
        assert_eq!(parse_retention("0h").unwrap(), 0);
    }

    #[test]
    fn test_keep_forever_overrides_retention() {
        assert_eq!(resolve_retention(true, "7d").unwrap(), 0);
        assert_eq!(resolve_retention(true, "not-a-duration").unwrap(), 0);
        assert_eq!(resolve_retention(false, "7d").unwrap(), 7);
    }

    #[test]
    fn test_keep_forever_flag_parses() {
        let args = Args::parse_from(["docscan", "page.jpg", "--keep-forever"]);
        assert!(args.keep_forever);

        let args = Args::parse_from(["docscan", "page.jpg", "--retention", "24h"]);
        assert!(!args.keep_forever);
        assert_eq!(args.retention, "24h");
    }

    #[test]
    fn test_parse_quality() {
        assert_eq!(parse_quality("draft").unwrap(), 75);
        assert_eq!(parse_quality("good").unwrap(), 85);
        assert_eq!(parse_quality("best").unwrap(), 95);
        assert_eq!(parse_quality("90").unwrap(), 90);
        assert!(parse_quality("perfect").is_err());
    }
}
