//! # Glow CLI
//!
//! Reads, filters and renders the blog from the API or a static
//! `posts.json`, publishes through the API, and keeps local-only drafts.

use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};

use glow_client::source::DEFAULT_POSTS_JSON_PATH;
use glow_client::{
    ApiSource, BlogSource, BlogState, ImageAttachment, LocalStore, PostForm, Renderer, Theme,
    render,
};

#[derive(Parser)]
#[command(name = "glow")]
#[command(about = "Glow blog client")]
struct Cli {
    /// Base URL of the Glow API. Without it, posts come from a static posts.json.
    #[arg(long, env = "GLOW_API_URL", global = true)]
    api: Option<String>,

    /// Static posts file (path or http(s) URL), used when no API is given
    #[arg(long, default_value = DEFAULT_POSTS_JSON_PATH, global = true)]
    static_json: String,

    /// File holding local drafts and preferences
    #[arg(long, env = "GLOW_LOCAL_STORE", default_value = ".glow/local.json", global = true)]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List posts, newest first
    List(ViewArgs),
    /// Render the blog page as HTML
    Render {
        #[command(flatten)]
        view: ViewArgs,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// List every tag in use
    Tags,
    /// Publish a post through the API
    Publish(PostArgs),
    /// Save a draft that stays on this machine
    Draft(PostArgs),
    /// Show, toggle or set the theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },
}

#[derive(Args)]
struct ViewArgs {
    /// Free-text search over title, author, content and tags
    #[arg(long, short, default_value = "")]
    query: String,
    /// Only posts carrying this tag
    #[arg(long, short)]
    tag: Option<String>,
    /// Number of pages to reveal
    #[arg(long, default_value_t = 1)]
    pages: usize,
}

#[derive(Args)]
struct PostArgs {
    #[arg(long, default_value = "")]
    title: String,
    #[arg(long, default_value = "")]
    author: String,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    tags: String,
    #[arg(long, default_value = "")]
    content: String,
    /// Image file to attach
    #[arg(long)]
    image_file: Option<PathBuf>,
    /// Image URL, used when no file is attached
    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeAction {
    Toggle,
    Light,
    Dark,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let local = LocalStore::new(&cli.store);

    match &cli.command {
        Commands::List(view) => {
            let state = load_state(&cli, &local, view).await?;
            for post in state.visible() {
                println!(
                    "{}  {} — {}{}",
                    render::format_date(&post.date),
                    post.title,
                    post.author,
                    if post.tags.is_empty() {
                        String::new()
                    } else {
                        format!("  [{}]", post.tags.join(", "))
                    }
                );
            }
            println!("Showing {} of {}", state.shown(), state.filtered_len());
        }
        Commands::Render { view, out } => {
            let state = load_state(&cli, &local, view).await?;
            let html = Renderer::new()?.render_page(&state)?;
            match out {
                Some(path) => {
                    tokio::fs::write(path, html)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "Page rendered");
                }
                None => println!("{}", html),
            }
        }
        Commands::Tags => {
            let state = load_state(&cli, &local, &ViewArgs::default()).await?;
            for tag in state.tags() {
                println!("{}", tag);
            }
        }
        Commands::Publish(args) => {
            let Some(api) = &cli.api else {
                bail!("publishing needs --api; use `draft` for local-only posts");
            };
            let form = read_form(args).await?;
            let post = ApiSource::new(api.as_str())
                .publish(form)
                .await
                .context("Failed to publish")?;
            println!("Published post {} ({})", post.id, post.title);
        }
        Commands::Draft(args) => {
            let post = read_form(args).await?.into_draft(Utc::now());
            local
                .save_draft(post.clone())
                .await
                .context("Failed to save draft")?;
            println!(
                "Post \"{}\" added locally, visible only on this machine. To make it permanent, add it to posts.json.",
                post.title
            );
        }
        Commands::Theme { action } => {
            let current = local.theme().await.unwrap_or_default();
            let theme = match action {
                None => current,
                Some(ThemeAction::Toggle) => current.toggled(),
                Some(ThemeAction::Light) => Theme::Light,
                Some(ThemeAction::Dark) => Theme::Dark,
            };
            if action.is_some() {
                local.set_theme(theme).await.context("Failed to save theme")?;
            }
            println!("{} ({})", theme.as_str(), theme.brand_title());
        }
    }

    Ok(())
}

impl Default for ViewArgs {
    fn default() -> Self {
        Self {
            query: String::new(),
            tag: None,
            pages: 1,
        }
    }
}

/// Load posts for the selected mode and apply the view options.
async fn load_state(cli: &Cli, local: &LocalStore, view: &ViewArgs) -> anyhow::Result<BlogState> {
    let source = BlogSource::select(cli.api.as_deref(), &cli.static_json);
    let mut state = source
        .load_state(local)
        .await
        .context("Could not load posts")?;

    if !view.query.trim().is_empty() || view.tag.is_some() {
        state.apply_filters(&view.query, view.tag.as_deref());
    }
    state.reveal_pages(view.pages);

    Ok(state)
}

async fn read_form(args: &PostArgs) -> anyhow::Result<PostForm> {
    let image_file = match &args.image_file {
        Some(path) => Some(
            ImageAttachment::from_path(path)
                .await
                .with_context(|| format!("Failed to read image file {}", path.display()))?,
        ),
        None => None,
    };

    Ok(PostForm {
        title: args.title.clone(),
        author: args.author.clone(),
        tags: args.tags.clone(),
        content: args.content.clone(),
        image_url: args.image_url.clone(),
        image_file,
    })
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,glow_cli=info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
