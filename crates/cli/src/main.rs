mod font;

use std::path::PathBuf;

use ab_glyph::FontRef;
use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use doc_render::{CouponRecord, TicketRecord};
use image_pipeline::{
    CropSession, ResizeOptions, ReseedPolicy, encode_batch, read_upload, resize_bounded,
};
use pdf_export::{PageSpec, coupon_filename, ticket_filename};
use platform_access::{Role, visible_sections};

#[derive(Parser)]
#[command(
    name = "pledge-press",
    version,
    about = "Asset pipelines for the donations platform: banner uploads and ticket/coupon PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize a banner image, crop it to 16:9, and print the final data URL
    Banner {
        /// Source image file
        file: PathBuf,

        /// Explicit crop rectangle as X,Y,WIDTH in source pixels
        #[arg(long, value_name = "X,Y,W")]
        crop: Option<String>,

        /// Zoom factor for the centered crop window (1.0..=3.0)
        #[arg(long)]
        zoom: Option<f64>,

        /// Write the data URL to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Encode files as one atomic batch of data URLs (JSON array on stdout)
    Encode {
        /// Files to encode; the whole batch fails on the first bad file
        files: Vec<PathBuf>,
    },

    /// Render a ticket record (JSON) to Event_Ticket_<id>.pdf
    Ticket {
        record: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Render a coupon record (JSON) to coupon-<code>.pdf
    Coupon {
        record: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// List the sidebar sections visible to a role
    Nav {
        /// donor | partner | event_manager | admin | super_admin
        role: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Banner {
            file,
            crop,
            zoom,
            out,
        } => banner(file, crop, zoom, out).await,
        Command::Encode { files } => encode(files).await,
        Command::Ticket { record, out_dir } => ticket(record, out_dir).await,
        Command::Coupon { record, out_dir } => coupon(record, out_dir).await,
        Command::Nav { role } => nav(&role),
    }
}

/// Run a pipeline stage off the async thread; ctrl-c aborts the in-flight
/// stage through its task handle.
async fn run_stage<T, E, F>(label: &'static str, work: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut handle = tokio::task::spawn_blocking(work);
    tokio::select! {
        joined = &mut handle => {
            let result = joined.with_context(|| format!("{label} stage panicked"))?;
            result.with_context(|| format!("{label} stage failed"))
        }
        _ = tokio::signal::ctrl_c() => {
            handle.abort();
            bail!("{label} cancelled");
        }
    }
}

async fn banner(
    file: PathBuf,
    crop: Option<String>,
    zoom: Option<f64>,
    out: Option<PathBuf>,
) -> Result<()> {
    let bounded = run_stage("resize", move || {
        let bytes = read_upload(&file)?;
        resize_bounded(&bytes, &ResizeOptions::default())
    })
    .await?;
    tracing::info!(
        width = bounded.width(),
        height = bounded.height(),
        "Banner bounded"
    );

    let explicit = crop.map(|spec| parse_crop(&spec)).transpose()?;
    let asset = run_stage("crop", move || {
        let mut session = CropSession::new().with_reseed(ReseedPolicy::LastCommitted);
        session.load(bounded);
        if let Some((x, y, width)) = explicit {
            session.set_region(x, y, width)?;
        } else if let Some(zoom) = zoom {
            session.set_zoom(zoom)?;
        }
        session.commit()
    })
    .await?;

    tracing::info!(
        width = asset.width(),
        height = asset.height(),
        "Banner committed"
    );
    match out {
        Some(path) => tokio::fs::write(&path, asset.data_url).await?,
        None => println!("{}", asset.data_url),
    }
    Ok(())
}

async fn encode(files: Vec<PathBuf>) -> Result<()> {
    if files.is_empty() {
        bail!("no files to encode");
    }

    let urls = run_stage("encode", move || {
        let mut batch = Vec::with_capacity(files.len());
        for path in &files {
            batch.push((path.display().to_string(), read_upload(path)?));
        }
        encode_batch(&batch)
    })
    .await?;
    println!("{}", serde_json::to_string_pretty(&urls)?);
    Ok(())
}

async fn ticket(record_path: PathBuf, out_dir: PathBuf) -> Result<()> {
    let json = tokio::fs::read_to_string(&record_path)
        .await
        .with_context(|| format!("reading {}", record_path.display()))?;
    let record: TicketRecord = serde_json::from_str(&json).context("parsing ticket record")?;
    let filename = ticket_filename(&record.ticket_id);

    let font_data = font::load_font_data()?;
    let bitmap = run_stage("rasterize", move || {
        let font = FontRef::try_from_slice(&font_data)
            .map_err(|_| doc_render::RenderError::Font("invalid TTF/OTF data".into()))?;
        doc_render::render_ticket(&record, &font)
    })
    .await?;

    let pdf = run_stage("paginate", move || {
        pdf_export::paginate(&bitmap, &PageSpec::default())
    })
    .await?;

    let path = out_dir.join(filename);
    tokio::fs::write(&path, pdf).await?;
    println!("{}", path.display());
    Ok(())
}

async fn coupon(record_path: PathBuf, out_dir: PathBuf) -> Result<()> {
    let json = tokio::fs::read_to_string(&record_path)
        .await
        .with_context(|| format!("reading {}", record_path.display()))?;
    let record: CouponRecord = serde_json::from_str(&json).context("parsing coupon record")?;
    let filename = coupon_filename(&record.code);

    let font_data = font::load_font_data()?;
    let bitmap = run_stage("rasterize", move || {
        let font = FontRef::try_from_slice(&font_data)
            .map_err(|_| doc_render::RenderError::Font("invalid TTF/OTF data".into()))?;
        doc_render::render_coupon(&record, &font)
    })
    .await?;

    let pdf = run_stage("paginate", move || {
        pdf_export::paginate(&bitmap, &PageSpec::default())
    })
    .await?;

    let path = out_dir.join(filename);
    tokio::fs::write(&path, pdf).await?;
    println!("{}", path.display());
    Ok(())
}

fn nav(role: &str) -> Result<()> {
    let role = parse_role(role)?;
    for section in visible_sections(role) {
        println!("{section:?}");
    }
    Ok(())
}

/// Role names follow the `Role` serde mapping (snake_case), so the CLI and
/// the wire format cannot drift.
fn parse_role(raw: &str) -> Result<Role> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| anyhow!("unknown role: {raw}"))
}

fn parse_crop(spec: &str) -> Result<(u32, u32, u32)> {
    let parts: Vec<&str> = spec.split(',').collect();
    let [x, y, width] = parts.as_slice() else {
        bail!("crop must be X,Y,WIDTH");
    };
    Ok((
        x.trim().parse().context("crop x")?,
        y.trim().parse().context("crop y")?,
        width.trim().parse().context("crop width")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_crop_accepts_triple() {
        assert_eq!(parse_crop("10, 20, 800").unwrap(), (10, 20, 800));
    }

    #[test]
    fn parse_crop_rejects_short_spec() {
        assert!(parse_crop("10,20").is_err());
    }

    #[test]
    fn parse_role_round_trip() {
        assert_eq!(parse_role("super_admin").unwrap(), Role::SuperAdmin);
        assert!(parse_role("root").is_err());
    }

    #[test]
    fn parse_role_accepts_every_serde_name() {
        for role in [
            Role::Donor,
            Role::Partner,
            Role::EventManager,
            Role::Admin,
            Role::SuperAdmin,
        ] {
            let name = serde_json::to_value(role).unwrap();
            assert_eq!(parse_role(name.as_str().unwrap()).unwrap(), role);
        }
    }
}
