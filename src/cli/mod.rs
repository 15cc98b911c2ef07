pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "byline")]
#[command(about = "A command-line client for a social blogging service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        /// Account email address
        email: String,
        /// Account password
        password: String,
    },
    /// Create an account and persist the session
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Erase the persisted session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List a page of articles
    Feed {
        /// Personalized feed (requires sign-in)
        #[arg(long)]
        mine: bool,
        /// Only articles with this tag
        #[arg(long)]
        tag: Option<String>,
        /// Only articles by this author
        #[arg(long)]
        author: Option<String>,
        /// Only articles favorited by this user
        #[arg(long)]
        favorited: Option<String>,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u64,
    },
    /// Show a single article with its body
    Article {
        /// Article slug
        slug: String,
    },
    /// Toggle the favorite state of an article
    Favorite {
        slug: String,
    },
    /// Follow an author
    Follow {
        username: String,
    },
    /// Unfollow an author
    Unfollow {
        username: String,
    },
    /// List the comments on an article
    Comments {
        slug: String,
    },
    /// Post a comment on an article
    Comment {
        slug: String,
        body: String,
    },
    /// Delete a comment by id
    Uncomment {
        slug: String,
        id: i64,
    },
}

impl Commands {
    /// How this command reads in a user-facing error line
    /// ("Server error while trying to {action}.").
    pub fn action_label(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "sign in",
            Commands::Register { .. } => "register",
            Commands::Logout => "sign out",
            Commands::Whoami => "show the signed-in user",
            Commands::Feed { .. } => "load articles",
            Commands::Article { .. } => "load this article",
            Commands::Favorite { .. } => "favorite this article",
            Commands::Follow { .. } => "follow this author",
            Commands::Unfollow { .. } => "unfollow this author",
            Commands::Comments { .. } => "load comments",
            Commands::Comment { .. } => "post this comment",
            Commands::Uncomment { .. } => "delete this comment",
        }
    }
}
