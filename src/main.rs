use anyhow::Result;
use livescraper::{catalog, extract, source};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) load the workbook ────────────────────────────────────────
    let dir = std::env::args().nth(1).unwrap_or_else(|| "data".into());
    info!(dir = %dir, "loading workbook");
    let book = source::load_workbook(&dir)?;

    // ─── 3) run the extraction and the catalog listings ──────────────
    let records = extract::extract_live_records(&book)?;
    let albums = catalog::album_entries(&book);
    let album_songs = catalog::album_song_list(&book);
    info!(
        records = records.len(),
        albums = albums.len(),
        album_songs = album_songs.len(),
        "extraction complete"
    );

    // ─── 4) emit one JSON document for the presentation layer ────────
    let payload = json!({
        "liveRecords": records,
        "albums": albums,
        "albumSongs": album_songs,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}
