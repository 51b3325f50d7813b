//! # Boothprint CLI
//!
//! Command-line interface for the photobooth thermal printer.
//!
//! ## Usage
//!
//! ```bash
//! # Print a QR code with a caption
//! boothprint qr https://example.com/p/42 --label example.com/p/42
//!
//! # Save the QR bitmap instead of printing it
//! boothprint qr https://example.com/p/42 --png qr.png
//!
//! # Print a line of text, then feed 3 lines
//! boothprint line "Thanks for visiting!"
//! boothprint feed 3
//!
//! # Print a photo (resized to the print width and dithered)
//! boothprint image photo.jpg
//!
//! # Write the byte stream to a file instead of the device
//! boothprint --output job.bin qr hello
//!
//! # Show the effective configuration
//! boothprint --config printer.json config
//! ```
//!
//! Set `RUST_LOG=boothprint=debug` to see every buffer as it is sent.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use boothprint::{
    BoothprintError, PrinterConfig, ThermalPrinter, qr,
    render::dither,
    transport::{MemoryLink, PrinterLink},
};

/// Boothprint - photobooth thermal printer utility
#[derive(Parser, Debug)]
#[command(name = "boothprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Printer device path (overrides the config file)
    #[arg(long, global = true)]
    device: Option<PathBuf>,

    /// JSON printer configuration
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the printer byte stream to a file instead of the device
    #[arg(long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a QR code between the greeting and an optional label
    Qr {
        /// Payload to encode
        data: String,

        /// Approximate QR size in dots
        #[arg(long, default_value = "200")]
        size: usize,

        /// Caption printed under the code
        #[arg(long)]
        label: Option<String>,

        /// Save the QR bitmap as PNG instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Print one line of text
    Line {
        text: String,
    },

    /// Feed blank lines
    Feed {
        lines: u8,
    },

    /// Print an image file, resized to the print width and dithered
    Image {
        path: PathBuf,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), BoothprintError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PrinterConfig::load(path)?,
        None => PrinterConfig::default(),
    };
    if let Some(device) = cli.device {
        config = config.with_device(device);
    }

    match &cli.command {
        Commands::Config => {
            println!("{}", config.to_json()?);
            return Ok(());
        }
        Commands::Qr {
            data,
            size,
            png: Some(png_path),
            ..
        } => {
            let bitmap = qr::generate(data, *size)?;
            bitmap
                .to_gray_image()
                .save(png_path)
                .map_err(|e| BoothprintError::Image(format!("Failed to save PNG: {}", e)))?;
            println!("Saved to {}", png_path.display());
            return Ok(());
        }
        _ => {}
    }

    if let Some(output) = &cli.output {
        // Pacing only matters for real hardware
        config.chunk_delay_ms = 0;
        let link = MemoryLink::new();
        let printer = ThermalPrinter::with_link(config, link.clone());
        run_job(&printer, &cli.command)?;
        printer.close()?;

        fs::write(output, link.bytes())?;
        println!("Wrote {} bytes to {}", link.bytes().len(), output.display());
        return Ok(());
    }

    let printer = ThermalPrinter::open(config);
    if !printer.is_connected() {
        eprintln!(
            "No printer at {}, nothing will be printed",
            printer.config().device.display()
        );
    }
    let result = run_job(&printer, &cli.command);
    printer.close()?;
    result
}

/// Run one subcommand against a printer.
fn run_job<L: PrinterLink>(
    printer: &ThermalPrinter<L>,
    command: &Commands,
) -> Result<(), BoothprintError> {
    match command {
        Commands::Qr {
            data, size, label, ..
        } => printer.print_qr(data, *size, label.as_deref()),
        Commands::Line { text } => printer.print_line(text),
        Commands::Feed { lines } => printer.print_empty_lines(*lines),
        Commands::Image { path } => {
            let photo = image::open(path).map_err(|e| {
                BoothprintError::Image(format!("Failed to open {}: {}", path.display(), e))
            })?;
            let bitmap = dither::prepare_photo(&photo, printer.config().width_dots as u32);
            printer.print_image(&bitmap)
        }
        Commands::Config => Ok(()),
    }
}
