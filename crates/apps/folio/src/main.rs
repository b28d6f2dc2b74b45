mod config;

use std::error::Error;
use std::sync::Arc;

use catalog::{FileStore, Source, load_catalog, load_stories};
use clap::{Parser, Subcommand};
use foundation::SystemClock;
use gallery::{
    Filter, GallerySession, LoaderConfig, MapConfig, PageParams, ScrollMetrics, Update,
    find_highlight_target, group_cached, pick, render_card_positioned, render_luck_info,
    render_placeholder, render_popup, render_story_detail, render_story_feed, resolve_pending,
};
use geocode::Resolver;
use masonry::{CardMetrics, MasonryConfig, Measure};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Photography portfolio engine")]
struct Args {
    /// Catalog source: path or http(s) URL (default: FOLIO_GALLERY_DATA)
    #[arg(long)]
    data: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the masonry gallery as positioned HTML
    Gallery {
        /// Category to show ("all" pages through the catalog)
        #[arg(long, default_value = "all")]
        filter: String,

        /// Container width in pixels (default: FOLIO_CONTAINER_WIDTH)
        #[arg(long)]
        width: Option<f64>,

        /// Keep scrolling until every item is rendered
        #[arg(long)]
        all: bool,

        /// Page query string, e.g. "?highlight=peak.jpg"
        #[arg(long)]
        query: Option<String>,
    },

    /// Resolve location strings to coordinates
    Geocode {
        #[arg(required = true)]
        locations: Vec<String>,
    },

    /// Group the catalog by location and print marker popups
    Map {
        /// Print popup HTML for each marker
        #[arg(long)]
        html: bool,
    },

    /// Render the stories feed, or one story
    Stories {
        /// Stories source (default: FOLIO_STORIES_DATA)
        #[arg(long)]
        source: Option<String>,

        /// Story id for the detail view
        #[arg(long)]
        id: Option<String>,
    },

    /// Pick a random photo
    Luck,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = AppConfig::from_env();
    let http = reqwest::Client::new();
    let data = Source::parse(args.data.as_deref().unwrap_or(&cfg.gallery_data));

    match args.command {
        Command::Gallery {
            filter,
            width,
            all,
            query,
        } => {
            let items = load_catalog(&http, &data).await;
            let width = width.unwrap_or(cfg.container_width);
            cmd_gallery(items, Filter::parse(&filter), width, all, query.as_deref());
        }
        Command::Geocode { locations } => {
            let resolver = open_resolver(&cfg, http)?;
            for loc in &locations {
                match resolver.resolve(loc).await {
                    Some(c) => println!("{loc}\t{:.6},{:.6}", c.lat, c.lng),
                    None => println!("{loc}\t-"),
                }
            }
            resolver.shutdown().await;
        }
        Command::Map { html } => {
            let items = load_catalog(&http, &data).await;
            let resolver = open_resolver(&cfg, http)?;
            cmd_map(&items, &resolver, html).await;
            resolver.shutdown().await;
        }
        Command::Stories { source, id } => {
            let source = Source::parse(source.as_deref().unwrap_or(&cfg.stories_data));
            let stories = load_stories(&http, &source).await;
            match id {
                Some(id) => println!("{}", render_story_detail(&stories, &id)),
                None => println!("{}", render_story_feed(&stories)),
            }
        }
        Command::Luck => {
            let items = load_catalog(&http, &data).await;
            let Some(choice) = pick(&items, &mut rand::rng()) else {
                return Err("no gallery items".into());
            };
            println!("{}", choice.original_url);
            println!("{}", render_luck_info(&choice));
            if let Some(loc) = choice.item.location() {
                let resolver = open_resolver(&cfg, http)?;
                if let Some(c) = resolver.resolve(loc).await {
                    println!("map: {:.6},{:.6} zoom 13", c.lat, c.lng);
                }
                resolver.shutdown().await;
            }
        }
    }
    Ok(())
}

fn open_resolver(cfg: &AppConfig, http: reqwest::Client) -> Result<Resolver, Box<dyn Error>> {
    std::fs::create_dir_all(&cfg.cache_dir)
        .map_err(|e| format!("create {}: {e}", cfg.cache_dir.display()))?;
    let store = Arc::new(FileStore::new(&cfg.cache_dir));
    Ok(Resolver::nominatim(http, store, Arc::new(SystemClock), &cfg.geocode))
}

/// Heights are unknown outside a browser; every card is estimated.
struct Unmeasured;

impl Measure for Unmeasured {
    fn measure(&self, _index: usize) -> CardMetrics {
        CardMetrics::default()
    }
}

fn cmd_gallery(
    items: Vec<catalog::PhotoItem>,
    filter: Filter,
    width: f64,
    all: bool,
    query: Option<&str>,
) {
    let loader = LoaderConfig::default();
    let mut session = GallerySession::new(loader, MasonryConfig::default(), width);
    session.load(items);
    let update = session.set_filter(filter);
    session.frame(&Unmeasured);

    if all {
        // Scroll to the bottom after every frame until nothing is left to load.
        let mut now = 0;
        loop {
            let doc = session.layout().container_height();
            session.on_scroll(ScrollMetrics::new(doc, 900.0, doc), now);
            now += loader.scroll_debounce_ms;
            let Some(batch) = session.tick(now) else {
                break;
            };
            session.frame(&Unmeasured);
            session.finish_batch(&batch);
        }
    }

    let window = session.window();
    info!(
        rendered = window.rendered(),
        matching = window.matching_len(),
        "gallery rendered"
    );

    if let Update::Placeholder { .. } = update {
        println!("{}", render_placeholder());
        return;
    }

    let visible: Vec<_> = window.visible().collect();
    let cards: String = visible
        .iter()
        .zip(session.layout().placements())
        .map(|(item, p)| render_card_positioned(item, p))
        .collect();
    println!(
        r#"<div class="gallery" style="position:relative;height:{}px">{cards}</div>"#,
        session.layout().container_height()
    );

    if let Some(query) = query {
        let params = PageParams::from_query(query);
        let owned: Vec<_> = visible.iter().map(|it| (*it).clone()).collect();
        match find_highlight_target(&owned, &params) {
            Some(i) => eprintln!("highlight: card {i} ({})", owned[i].src),
            None if params.wants_highlight() => eprintln!("highlight: no matching card"),
            None => {}
        }
    }
}

async fn cmd_map(items: &[catalog::PhotoItem], resolver: &Resolver, html: bool) {
    let map = MapConfig::default();
    let (mut groups, pending) = group_cached(items, resolver);
    info!(markers = groups.len(), pending = pending.len(), "initial markers");

    resolve_pending(&mut groups, &pending, resolver, |g| {
        info!(key = %g.key, label = %g.label, items = g.items.len(), "marker updated");
    })
    .await;

    for g in groups.groups() {
        println!("{}\t{}\t{}", g.key, g.label, g.items.len());
        if html {
            println!("{}", render_popup(g, map.popup_photos));
        }
    }
    match groups.bounds() {
        Some(b) => println!(
            "bounds: {:.4},{:.4} .. {:.4},{:.4}",
            b.min.lat, b.min.lng, b.max.lat, b.max.lng
        ),
        None => println!(
            "view: {:.1},{:.1} zoom {}",
            map.center.lat, map.center.lng, map.zoom
        ),
    }
}
