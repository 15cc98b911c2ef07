use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use byline::app::{AppContext, BylineError};
use byline::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new()?;
    let action = cli.command.action_label();

    if let Err(e) = run(cli, &ctx).await {
        for line in e.user_messages(action) {
            eprintln!("{}", line);
        }
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli, ctx: &AppContext) -> Result<(), BylineError> {
    let session = ctx.session();

    match cli.command {
        Commands::Login { email, password } => {
            commands::login(ctx, &email, &password).await?;
        }
        Commands::Register {
            username,
            email,
            password,
        } => {
            commands::register(ctx, &username, &email, &password).await?;
        }
        Commands::Logout => {
            commands::logout(ctx)?;
        }
        Commands::Whoami => {
            commands::whoami(&session)?;
        }
        Commands::Feed {
            mine,
            tag,
            author,
            favorited,
            page,
        } => {
            commands::feed(ctx, &session, mine, tag, author, favorited, page).await?;
        }
        Commands::Article { slug } => {
            commands::article(ctx, &session, &slug).await?;
        }
        Commands::Favorite { slug } => {
            commands::favorite(ctx, &session, &slug).await?;
        }
        Commands::Follow { username } => {
            commands::follow(ctx, &session, &username).await?;
        }
        Commands::Unfollow { username } => {
            commands::unfollow(ctx, &session, &username).await?;
        }
        Commands::Comments { slug } => {
            commands::comments(ctx, &session, &slug).await?;
        }
        Commands::Comment { slug, body } => {
            commands::comment(ctx, &session, &slug, &body).await?;
        }
        Commands::Uncomment { slug, id } => {
            commands::uncomment(ctx, &session, &slug, id).await?;
        }
    }

    Ok(())
}
