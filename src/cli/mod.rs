use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::{
    config::{self, Config},
    domain::{
        code::ExchangeCode,
        labels::Taste,
        song::Song,
    },
    http::{Registry, client::HttpRegistry},
    session::{
        SessionContext,
        db::{SqliteStore, i64_seconds_to_local_time},
        keys,
    },
    workflow::{
        catalog::{CatalogFetch, CatalogSource, SongCatalog},
        exchange::{ExchangeBrowser, LinkOpener, creator_label},
        identity::IdentityGate,
        recommend::RecommendationView,
        review::{ReviewState, ReviewWorkflow},
        selector::{PlaylistSelector, SongRef},
        submit::{SubmissionReceipt, playlist_title, submit},
    },
};

#[derive(Parser)]
#[command(name = "playswap")]
#[command(version = "0.1")]
#[command(about = "Build a 5-song playlist, share its code and swap reviews")]
pub struct Cli {
    /// Path to the config TOML file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List candidate songs for a generation and genre
    Songs {
        /// Generation, `2` or `gen2`
        #[arg(short, long)]
        generation: String,
        /// Genre label (보컬, 댄스, 감성, 힙합) or key (vocal, dance, emo, hip)
        #[arg(short = 't', long)]
        genre: String,
    },
    /// Make a playlist from five random candidates and register it
    Make {
        /// At most 6 characters
        #[arg(short, long)]
        nickname: String,
        #[arg(short, long)]
        generation: String,
        #[arg(short = 't', long)]
        genre: String,
        /// Replace a slot with a candidate: SLOT=SONG, the slot counted from 1.
        /// SONG is the id `songs` shows in brackets, or a title.
        #[arg(short, long = "set", value_parser = parse_slot_choice)]
        set: Vec<SlotChoice>,
    },
    /// Show the nickname, code and playlist saved locally
    Session,
    /// Show the playlist recommended for you
    Recommend {
        /// Leave this review on the recommended playlist
        #[arg(short, long)]
        review: Option<String>,
        /// Open the media link of this song, counted from 1
        #[arg(short, long)]
        open: Option<usize>,
    },
    /// Read the reviews left for a code
    Review {
        /// 6-character code
        code: String,
        /// Continue to the playlists exchanged with this code
        #[arg(short, long)]
        browse: bool,
    },
    /// Browse playlists exchanged with a code
    Exchanges {
        /// Defaults to your own code
        #[arg(long)]
        code: Option<String>,
        /// Playlist to show, counted from 1
        #[arg(short, long, default_value_t = 1)]
        select: usize,
        /// Open the media link of this song, counted from 1
        #[arg(short, long)]
        open: Option<usize>,
    },
}

/// zero-based slot and the candidate to put in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChoice {
    pub slot: usize,
    pub song: SongRef,
}

fn parse_one_based(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{s}' is not a positive number")),
        Ok(n) => Ok(n - 1),
    }
}

fn parse_slot_choice(s: &str) -> Result<SlotChoice, String> {
    let (slot, song) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SLOT=SONG, got '{s}'"))?;
    if song.trim().is_empty() {
        return Err(format!("no song given in '{s}'"));
    }
    let Ok(song) = song.parse::<SongRef>();
    Ok(SlotChoice {
        slot: parse_one_based(slot)?,
        song,
    })
}

/// Prints links instead of launching a browser
struct StdoutOpener;

impl LinkOpener for StdoutOpener {
    fn open(&mut self, url: &str) -> anyhow::Result<()> {
        println!("Open: {url}");
        Ok(())
    }
}

fn open_session(cfg: &config::SessionConfig) -> anyhow::Result<SessionContext> {
    let store = SqliteStore::open(cfg).context("Failed to open session store")?;
    Ok(SessionContext::new(store))
}

fn print_songs(songs: &[Song]) {
    for (index, song) in songs.iter().enumerate() {
        println!("  {}. {}", index + 1, song);
    }
}

fn print_candidates(fetch: &CatalogFetch) {
    if fetch.source == CatalogSource::Fallback {
        println!("No candidates from the registry, showing built-in songs:");
    }
    for song in &fetch.songs {
        match song.id {
            Some(id) => println!("  [{id}] {song}"),
            None => println!("  {song}"),
        }
    }
}

fn print_draft(selector: &PlaylistSelector) {
    for (index, slot) in selector.slots().iter().enumerate() {
        match slot {
            Some(song) => println!("  {}. {}", index + 1, song),
            None => println!("  {}. (empty)", index + 1),
        }
    }
}

fn print_receipt(receipt: &SubmissionReceipt) {
    println!("{}", playlist_title(&receipt.nickname));
    print_songs(&receipt.playlist);
    println!(
        "Code: {} ({}세대 {})",
        receipt.user_code,
        receipt.taste.generation_label(),
        receipt.taste.genre_label()
    );
    println!("Share the code, then run `recommend` to get a playlist back.");
}

/// Entrypoint for CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .to_str()
        .ok_or_else(|| anyhow!("config path is not valid UTF-8"))?;
    let cfg = Config::load(config_path)?;
    let registry = HttpRegistry::new(&cfg.api).context("Failed to set up registry client")?;

    match cli.command {
        Commands::Songs { generation, genre } => {
            let taste = Taste::resolve(&generation, &genre);
            let fetch = SongCatalog::new(&registry).fetch(&taste.generation_key, &taste.genre_key);
            print_candidates(&fetch);
        }

        Commands::Make {
            nickname,
            generation,
            genre,
            set,
        } => {
            let mut session = open_session(&cfg.session)?;
            make(&registry, &mut session, nickname, &generation, &genre, &set)?;
        }

        Commands::Session => {
            let session = open_session(&cfg.session)?;
            show_session(&session)?;
        }

        Commands::Recommend { review, open } => {
            let session = open_session(&cfg.session)?;
            let view = RecommendationView::load(&registry, &session)?;

            println!(
                "Recommended for {}, made by a {}세대 {} listener:",
                session.display_nickname()?,
                view.creator_generation,
                view.creator_genre
            );
            print_songs(&view.songs);

            if let Some(song) = open {
                let song = song
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("songs are counted from 1"))?;
                if !view.open_song(song, &mut StdoutOpener)? {
                    println!("That song has no link.");
                }
            }

            if let Some(review) = review {
                view.post_review(&registry, &review)?;
                println!("Review saved.");
            }
        }

        Commands::Review { code, browse } => {
            let session = open_session(&cfg.session)?;
            review(&registry, &session, &code, browse)?;
        }

        Commands::Exchanges { code, select, open } => {
            let session = open_session(&cfg.session)?;
            let browser = match code {
                Some(code) => ExchangeBrowser::load(&registry, ExchangeCode::parse(&code)?)?,
                None => ExchangeBrowser::load_own(&registry, &session)?,
            };
            let select = select
                .checked_sub(1)
                .ok_or_else(|| anyhow!("playlists are counted from 1"))?;
            browse_exchanges(browser, Some(select), open)?;
        }
    }

    Ok(())
}

fn make(
    registry: &dyn Registry,
    session: &mut SessionContext,
    nickname: String,
    generation: &str,
    genre: &str,
    choices: &[SlotChoice],
) -> anyhow::Result<()> {
    let taste = Taste::resolve(generation, genre);
    let fetch = SongCatalog::new(registry).fetch(&taste.generation_key, &taste.genre_key);
    if fetch.source == CatalogSource::Fallback {
        println!("No candidates from the registry, drafting from built-in songs.");
    }
    let mut selector = PlaylistSelector::from_catalog(fetch, &mut rand::thread_rng());

    for choice in choices {
        selector.choose_song(choice.slot, &choice.song)?;
    }

    println!("Draft:");
    print_draft(&selector);

    let mut gate = IdentityGate::new(nickname);
    match submit(registry, session, &mut gate, &selector, &taste) {
        Ok(receipt) => {
            print_receipt(&receipt);
            Ok(())
        }
        Err(e) => {
            println!("Draft was not submitted.");
            Err(e.into())
        }
    }
}

fn show_session(session: &SessionContext) -> anyhow::Result<()> {
    let saved_at = |key: &str| -> anyhow::Result<String> {
        Ok(match session.saved_at(key)? {
            Some(secs) => i64_seconds_to_local_time(secs)?
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            None => "never".to_string(),
        })
    };

    println!(
        "Nickname:    {} (saved {})",
        session.display_nickname()?,
        saved_at(keys::NICKNAME)?
    );
    match session.user_code()? {
        Some(code) => println!("Code:        {code} (saved {})", saved_at(keys::USER_CODE)?),
        None => println!("Code:        none, run `make` first"),
    }
    match session.playlist_id()? {
        Some(id) => println!("Playlist id: {id} (saved {})", saved_at(keys::PLAYLIST_ID)?),
        None => println!("Playlist id: none"),
    }
    Ok(())
}

fn review(
    registry: &dyn Registry,
    session: &SessionContext,
    code: &str,
    browse: bool,
) -> anyhow::Result<()> {
    let mut workflow = ReviewWorkflow::new();

    if let ReviewState::CodeValidated(validated) = workflow.activate(code, registry, session)? {
        println!(
            "Playlist of a {}세대 {} listener:",
            validated.author_generation, validated.author_genre
        );
        for song in &validated.songs {
            println!("  {} - {}", song.title, song.artist);
        }

        if validated.reviews.is_empty() {
            println!("No reviews yet.");
        }
        for review in &validated.reviews {
            println!(
                "  [{}세대 {}] {}: {} ({})",
                review.writer_generation,
                review.writer_genre,
                review.writer_nickname.as_deref().unwrap_or("?"),
                review.content,
                review.created_at
            );
        }
    }

    if !browse {
        return Ok(());
    }

    match workflow.activate(code, registry, session)? {
        ReviewState::Navigated { code } => {
            let browser = ExchangeBrowser::load(registry, code.clone())?;
            browse_exchanges(browser, None, None)
        }
        state => bail!("unexpected review state {state:?}"),
    }
}

fn browse_exchanges(
    mut browser: ExchangeBrowser,
    select: Option<usize>,
    open: Option<usize>,
) -> anyhow::Result<()> {
    println!("Exchanges for {}:", browser.code());
    if browser.playlists().is_empty() {
        println!("  nothing exchanged yet");
        return Ok(());
    }

    if let Some(index) = select {
        browser.select(index)?;
    }

    for (index, playlist) in browser.playlists().iter().enumerate() {
        let marker = if index == browser.selected_index() { '>' } else { ' ' };
        let label = creator_label(playlist).unwrap_or_else(|| "unknown".to_string());
        println!("{marker} {}. {label}", index + 1);
    }

    if let Some(playlist) = browser.selected() {
        println!();
        for (index, song) in playlist.songs.iter().enumerate() {
            let link = if song.media_link().is_some() { " ▶" } else { "" };
            println!("  {}. {} - {}{link}", index + 1, song.artist, song.title);
        }
    }

    if let Some(song) = open {
        let song = song
            .checked_sub(1)
            .ok_or_else(|| anyhow!("songs are counted from 1"))?;
        if !browser.open_song(song, &mut StdoutOpener)? {
            println!("That song has no link.");
        }
    }

    Ok(())
}
