use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sigletter::letter::{date, EntityType, Gender, LetterForm, RecipientField};
use sigletter::signature::document::DOWNLOAD_NAME;
use sigletter::signature::{merge_into_carrier, SignatureDocument, StrokeBatch};
use sigletter::{ClientConfig, LetterClient};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sigletter", version, about = "Signature compositing and letter generation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge a captured stroke (surface SVG export) into a signature file
    Merge {
        /// SVG exported by the drawing surface
        #[arg(long)]
        stroke: PathBuf,
        /// Surface width at capture time, in pixels
        #[arg(long)]
        surface_width: f64,
        /// Surface height (defaults to the width; the surface is square)
        #[arg(long)]
        surface_height: Option<f64>,
        /// Existing signature to extend
        #[arg(long)]
        into: Option<PathBuf>,
        /// Output file
        #[arg(long, short, default_value = DOWNLOAD_NAME)]
        out: PathBuf,
    },
    /// Check that a file is an SVG signature and write it back normalized
    Import {
        file: PathBuf,
        #[arg(long, short, default_value = DOWNLOAD_NAME)]
        out: PathBuf,
    },
    /// Print a signature as a data URI
    Export { file: PathBuf },
    /// Request a letter and save the PDF
    Generate {
        /// Letter server base URL (falls back to SERVER_URL)
        #[arg(long)]
        server: Option<String>,
        #[arg(long, default_value = "individual")]
        entity: EntityType,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        middle_name: Option<String>,
        #[arg(long, default_value = "male")]
        gender: Gender,
        #[arg(long)]
        company: Option<String>,
        /// Letter date, DD.MM.YYYY, before today
        #[arg(long)]
        date: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Check that the letter server is reachable
    Ping {
        #[arg(long)]
        server: Option<String>,
    },
}

fn client_config(server: Option<String>, timeout_ms: Option<u64>) -> anyhow::Result<ClientConfig> {
    let mut config = match server {
        Some(server_url) => ClientConfig {
            server_url,
            ..Default::default()
        },
        None => ClientConfig::from_env().context("no --server given")?,
    };
    if let Some(ms) = timeout_ms {
        config.timeout_ms = ms;
    }
    Ok(config)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Merge {
            stroke,
            surface_width,
            surface_height,
            into,
            out,
        } => {
            let exported = std::fs::read_to_string(&stroke)
                .with_context(|| format!("reading {}", stroke.display()))?;
            let batch = StrokeBatch::from_svg(
                &exported,
                surface_width,
                surface_height.unwrap_or(surface_width),
            )
            .context("parsing stroke export")?;

            let current = match &into {
                Some(path) if path.exists() => Some(
                    std::fs::read_to_string(path)
                        .with_context(|| format!("reading {}", path.display()))?,
                ),
                _ => None,
            };

            let Some(doc) = merge_into_carrier(&batch, current.as_deref()) else {
                println!("stroke is empty, nothing merged");
                return Ok(());
            };
            std::fs::write(&out, doc.to_svg())
                .with_context(|| format!("writing {}", out.display()))?;
            println!(
                "{}: {}x{}, {} fragments",
                out.display(),
                doc.width().unwrap_or("auto"),
                doc.height().unwrap_or("auto"),
                doc.content().len()
            );
        }
        Command::Import { file, out } => {
            let bytes = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let doc = match SignatureDocument::import(&bytes) {
                Ok(doc) => doc,
                Err(e) => bail!("{} ({})", e.user_message(), e),
            };
            std::fs::write(&out, doc.to_svg())
                .with_context(|| format!("writing {}", out.display()))?;
            println!("{}: {} fragments", out.display(), doc.content().len());
        }
        Command::Export { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let doc = SignatureDocument::parse(&text)?;
            println!("{}", doc.to_data_uri());
        }
        Command::Generate {
            server,
            entity,
            last_name,
            first_name,
            middle_name,
            gender,
            company,
            date: letter_date,
            out_dir,
            timeout_ms,
        } => {
            let form = LetterForm::new()
                .with_entity_type(entity)
                .with_field(RecipientField::LastName, last_name.unwrap_or_default())
                .with_field(RecipientField::FirstName, first_name.unwrap_or_default())
                .with_field(RecipientField::MiddleName, middle_name.unwrap_or_default())
                .with_field(RecipientField::CompanyName, company.unwrap_or_default())
                .with_gender(gender)
                .with_date(letter_date);

            // Validate before touching the network.
            let today = date::today();
            let request = form.to_request(today)?;
            if let Ok(d) = date::parse_letter_date(&request.date, today) {
                println!("Дата письма: {}", date::format_long_ru(d));
            }

            let client = LetterClient::new(client_config(server, timeout_ms)?)?;
            let letter = match client.generate(&request) {
                Ok(letter) => letter,
                Err(e) => bail!(e.user_message()),
            };
            let path = out_dir.join(&letter.file_name);
            std::fs::write(&path, &letter.bytes)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("saved {} ({} bytes)", path.display(), letter.bytes.len());
        }
        Command::Ping { server } => {
            let client = LetterClient::new(client_config(server, None)?)?;
            client.ping()?;
            println!("{}: Pong", client.config().server_url);
        }
    }
    Ok(())
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("sigletter: {:#}", e);
        std::process::exit(1);
    }
}
